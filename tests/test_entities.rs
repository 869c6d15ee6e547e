use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use topdown_shooter::compute::init_state;
use topdown_shooter::config::GameConfig;
use topdown_shooter::entities::*;
use topdown_shooter::persistence::MemoryStore;

#[test]
fn facing_from_dominant_axis() {
    assert_eq!(Direction::from_vector(Vec2::new(2.0, 1.0)), Some(Direction::Right));
    assert_eq!(Direction::from_vector(Vec2::new(-2.0, 1.0)), Some(Direction::Left));
    assert_eq!(Direction::from_vector(Vec2::new(0.5, 1.0)), Some(Direction::Up));
    assert_eq!(Direction::from_vector(Vec2::new(0.5, -1.0)), Some(Direction::Down));
    // Ties go vertical.
    assert_eq!(Direction::from_vector(Vec2::new(1.0, 1.0)), Some(Direction::Up));
    assert_eq!(Direction::from_vector(Vec2::ZERO), None);
}

#[test]
fn direction_vectors_round_trip() {
    for dir in [Direction::Up, Direction::Down, Direction::Left, Direction::Right] {
        assert_eq!(dir.to_vec().length(), 1.0);
        assert_eq!(Direction::from_vector(dir.to_vec()), Some(dir));
    }
}

#[test]
fn projectile_tags() {
    assert_eq!(ProjectileKind::Bullet.tag(), Tag::Bullet);
    assert_eq!(ProjectileKind::Arrow.tag(), Tag::Arrow);
}

#[test]
fn ids_are_unique_and_increasing() {
    let mut ids = IdAllocator::default();
    let a = ids.allocate();
    let b = ids.allocate();
    assert!(a < b);
    assert_ne!(a, EntityId(0));
}

#[test]
fn life_icons_fill_from_the_left() {
    let hud = HudSnapshot {
        lives_remaining: 1,
        max_lives: 3,
        score: 0,
        max_score: 0,
        paused: false,
        damage_flash: false,
    };
    assert_eq!(
        hud.life_icons(),
        vec![LifeIcon::Alive, LifeIcon::Dead, LifeIcon::Dead]
    );
}

#[test]
fn game_state_clone_is_independent() {
    let original = init_state(
        GameConfig::default(),
        &MemoryStore::new(),
        &mut StdRng::seed_from_u64(1),
    )
    .unwrap();
    let enemies = original.enemies.len();
    let mut cloned = original.clone();

    // Mutating the clone must not affect the original
    cloned.player.pos = Vec2::new(4.0, 4.0);
    cloned.score = 999;
    cloned.enemies.clear();
    cloned.level.clear();

    assert_eq!(original.player.pos, Vec2::ZERO);
    assert_eq!(original.score, 0);
    assert_eq!(original.enemies.len(), enemies);
    assert!(original.level.active().is_some());
}
