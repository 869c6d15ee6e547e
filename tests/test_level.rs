use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use topdown_shooter::compute::{init_state, regenerate_level};
use topdown_shooter::config::{builtin_levels, GameConfig};
use topdown_shooter::entities::*;
use topdown_shooter::error::LevelError;
use topdown_shooter::level::*;
use topdown_shooter::persistence::MemoryStore;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

fn three_templates() -> Vec<LevelTemplate> {
    let levels = builtin_levels();
    assert_eq!(levels.len(), 3);
    levels
}

#[test]
fn starts_empty() {
    let container = LevelContainer::new(three_templates());
    assert!(container.active().is_none());
    assert_eq!(container.templates().len(), 3);
}

#[test]
fn regenerate_activates_one_of_the_templates() {
    let mut container = LevelContainer::new(three_templates());
    let mut ids = IdAllocator::default();
    let spawned = container
        .regenerate(&mut ids, 0.5, &mut seeded_rng())
        .unwrap();

    let active = container.active().unwrap();
    assert_eq!(active, &spawned.instance);
    assert!(active.template < 3);

    let template = &container.templates()[active.template];
    assert_eq!(active.name, template.name);
    assert_eq!(active.walls.len(), template.walls.len());
    assert_eq!(spawned.enemy_spawns.len(), template.enemies.len());
    assert_eq!(active.door.as_ref().map(|d| d.pos), template.door);
    assert_eq!(active.door.as_ref().map(|d| d.radius), Some(0.5));
}

#[test]
fn regenerate_replaces_the_previous_instance() {
    let mut container = LevelContainer::new(three_templates());
    let mut ids = IdAllocator::default();
    let mut rng = seeded_rng();

    let first = container.regenerate(&mut ids, 0.5, &mut rng).unwrap();
    for _ in 0..10 {
        let next = container.regenerate(&mut ids, 0.5, &mut rng).unwrap();
        assert_ne!(next.instance.id, first.instance.id);
        assert_eq!(container.active().map(|l| l.id), Some(next.instance.id));
    }
}

#[test]
fn every_template_gets_picked() {
    let mut container = LevelContainer::new(three_templates());
    let mut ids = IdAllocator::default();
    let mut rng = seeded_rng();
    let mut seen = [0u32; 3];
    for _ in 0..300 {
        let spawned = container.regenerate(&mut ids, 0.5, &mut rng).unwrap();
        seen[spawned.instance.template] += 1;
    }
    assert!(seen.iter().all(|&n| n > 50), "skewed picks: {seen:?}");
}

#[test]
fn fixtures_get_unique_ids() {
    let mut container = LevelContainer::new(three_templates());
    let mut ids = IdAllocator::default();
    let spawned = container
        .regenerate(&mut ids, 0.5, &mut seeded_rng())
        .unwrap();

    let mut all: Vec<EntityId> = vec![spawned.instance.id];
    all.extend(spawned.instance.door.iter().map(|d| d.id));
    all.extend(spawned.instance.walls.iter().map(|w| w.id));
    all.extend(spawned.enemy_spawns.iter().map(|(id, _)| *id));
    let total = all.len();
    all.sort();
    all.dedup();
    assert_eq!(all.len(), total);
}

#[test]
fn wall_corners_are_normalized() {
    let template = LevelTemplate {
        name: "flipped".to_string(),
        door: None,
        walls: vec![WallSpec {
            min: Vec2::new(2.0, 1.0),
            max: Vec2::new(1.0, -1.0),
        }],
        enemies: Vec::new(),
    };
    let mut container = LevelContainer::new(vec![template]);
    let spawned = container
        .regenerate(&mut IdAllocator::default(), 0.5, &mut seeded_rng())
        .unwrap();
    let wall = &spawned.instance.walls[0];
    assert_eq!(wall.min, Vec2::new(1.0, -1.0));
    assert_eq!(wall.max, Vec2::new(2.0, 1.0));
}

#[test]
fn empty_template_list_is_reported_not_fatal() {
    let mut container = LevelContainer::new(Vec::new());
    let err = container
        .regenerate(&mut IdAllocator::default(), 0.5, &mut seeded_rng())
        .unwrap_err();
    assert_eq!(err, LevelError::NoTemplates);
    assert!(container.active().is_none());
}

#[test]
fn clear_hands_back_the_active_level() {
    let mut container = LevelContainer::new(three_templates());
    container
        .regenerate(&mut IdAllocator::default(), 0.5, &mut seeded_rng())
        .unwrap();
    assert!(container.clear().is_some());
    assert!(container.active().is_none());
    assert!(container.clear().is_none());
}

// ── through the game state ───────────────────────────────────────────────────

#[test]
fn regenerating_the_game_level_removes_old_enemies() {
    let mut rng = seeded_rng();
    let s = init_state(GameConfig::default(), &MemoryStore::new(), &mut rng).unwrap();
    let old_enemies: Vec<EntityId> = s.enemies.iter().map(|e| e.id).collect();

    let s2 = regenerate_level(&s, &mut rng);
    let level = s2.level.active().unwrap();
    assert!(s2.enemies.iter().all(|e| e.level == level.id));
    assert!(s2.enemies.iter().all(|e| !old_enemies.contains(&e.id)));
    assert_eq!(
        s2.enemies.len(),
        s2.config.levels[level.template].enemies.len()
    );
}
