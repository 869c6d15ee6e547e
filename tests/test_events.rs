use rstest::rstest;

use topdown_shooter::entities::*;
use topdown_shooter::events::*;

fn collider(id: u64, tag: Tag) -> Collider {
    Collider {
        id: EntityId(id),
        tag,
    }
}

// ── projectile ownership ─────────────────────────────────────────────────────

#[rstest]
#[case(ProjectileKind::Bullet, Tag::Enemy, true)]
#[case(ProjectileKind::Bullet, Tag::Wall, true)]
#[case(ProjectileKind::Bullet, Tag::Player, false)]
#[case(ProjectileKind::Bullet, Tag::Door, false)]
#[case(ProjectileKind::Bullet, Tag::Arrow, false)]
#[case(ProjectileKind::Arrow, Tag::Player, true)]
#[case(ProjectileKind::Arrow, Tag::Wall, true)]
#[case(ProjectileKind::Arrow, Tag::Enemy, false)]
#[case(ProjectileKind::Arrow, Tag::Door, false)]
#[case(ProjectileKind::Arrow, Tag::Bullet, false)]
fn destroy_sets(#[case] kind: ProjectileKind, #[case] other: Tag, #[case] destroyed: bool) {
    assert_eq!(kind.destroyed_by(other), destroyed);

    let contact = Contact::new(collider(1, kind.tag()), collider(2, other));
    let impact = GameEvent::ProjectileImpact {
        projectile: EntityId(1),
        target: other,
    };
    assert_eq!(route(&contact).contains(&impact), destroyed);
}

// ── routing ──────────────────────────────────────────────────────────────────

#[test]
fn bullet_on_enemy_removes_both() {
    let contact = Contact::new(collider(1, Tag::Bullet), collider(2, Tag::Enemy));
    assert_eq!(
        route(&contact),
        vec![
            GameEvent::ProjectileImpact {
                projectile: EntityId(1),
                target: Tag::Enemy,
            },
            GameEvent::EnemyHit { enemy: EntityId(2) },
        ]
    );
}

#[test]
fn arrow_on_player_only_removes_the_arrow() {
    let contact = Contact::new(collider(0, Tag::Player), collider(7, Tag::Arrow));
    assert_eq!(
        route(&contact),
        vec![GameEvent::ProjectileImpact {
            projectile: EntityId(7),
            target: Tag::Player,
        }]
    );
}

#[test]
fn bullet_on_player_does_nothing() {
    let contact = Contact::new(collider(0, Tag::Player), collider(3, Tag::Bullet));
    assert!(route(&contact).is_empty());
}

#[test]
fn arrow_on_enemy_does_nothing() {
    let contact = Contact::new(collider(4, Tag::Arrow), collider(5, Tag::Enemy));
    assert!(route(&contact).is_empty());
}

#[rstest]
#[case(Tag::Enemy, GameEvent::PlayerHit { enemy: EntityId(9) })]
#[case(Tag::Door, GameEvent::LevelDoor)]
#[case(Tag::Wall, GameEvent::WallBump)]
fn player_contacts(#[case] other: Tag, #[case] expected: GameEvent) {
    let forward = Contact::new(collider(0, Tag::Player), collider(9, other));
    let backward = Contact::new(collider(9, other), collider(0, Tag::Player));
    assert_eq!(route(&forward), vec![expected]);
    assert_eq!(route(&backward), vec![expected]);
}

#[test]
fn projectiles_ignore_each_other() {
    let contact = Contact::new(collider(1, Tag::Bullet), collider(2, Tag::Arrow));
    assert!(route(&contact).is_empty());
}

#[test]
fn enemies_ignore_walls_and_doors() {
    for other in [Tag::Wall, Tag::Door, Tag::Enemy] {
        let contact = Contact::new(collider(1, Tag::Enemy), collider(2, other));
        assert!(route(&contact).is_empty());
    }
}
