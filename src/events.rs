/// Contact notifications and the gameplay events they turn into.
///
/// The physics pass (or a host embedding the core) reports raw contacts
/// between two tagged colliders. `route` translates each contact into the
/// events both sides react to, so ownership rules such as "bullets only
/// stop on enemies and walls" live in one place.

use crate::entities::{EntityId, ProjectileKind, Tag};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Collider {
    pub id: EntityId,
    pub tag: Tag,
}

/// Two colliders started overlapping. Order carries no meaning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Contact {
    pub a: Collider,
    pub b: Collider,
}

impl Contact {
    pub fn new(a: Collider, b: Collider) -> Self {
        Self { a, b }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    /// A projectile touched something in its destroy set.
    ProjectileImpact { projectile: EntityId, target: Tag },
    /// A player bullet reached an enemy.
    EnemyHit { enemy: EntityId },
    /// An enemy touched the player.
    PlayerHit { enemy: EntityId },
    /// The player walked through the level door.
    LevelDoor,
    /// The player ran into a wall.
    WallBump,
}

/// Events produced by one contact, both sides' reactions in order.
pub fn route(contact: &Contact) -> Vec<GameEvent> {
    let mut events = Vec::new();
    for (me, other) in [(contact.a, contact.b), (contact.b, contact.a)] {
        react(me, other, &mut events);
    }
    events
}

fn react(me: Collider, other: Collider, events: &mut Vec<GameEvent>) {
    match me.tag {
        Tag::Bullet | Tag::Arrow => {
            let kind = if me.tag == Tag::Bullet {
                ProjectileKind::Bullet
            } else {
                ProjectileKind::Arrow
            };
            if kind.destroyed_by(other.tag) {
                events.push(GameEvent::ProjectileImpact {
                    projectile: me.id,
                    target: other.tag,
                });
            }
        }
        Tag::Enemy => {
            if other.tag == Tag::Bullet {
                events.push(GameEvent::EnemyHit { enemy: me.id });
            }
        }
        // Enemy-side removal on touching the player rides on `PlayerHit`.
        Tag::Player => match other.tag {
            Tag::Enemy => events.push(GameEvent::PlayerHit { enemy: other.id }),
            Tag::Door => events.push(GameEvent::LevelDoor),
            Tag::Wall => events.push(GameEvent::WallBump),
            _ => {}
        },
        Tag::Wall | Tag::Door => {}
    }
}
