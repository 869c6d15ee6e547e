/// Overlap tests and the per-tick contact pass.
///
/// This stands in for a real physics engine: circles for actors and
/// projectiles, axis-aligned boxes for walls, and "enter" semantics so a
/// contact is reported once when a pair starts touching.

use std::collections::BTreeSet;

use glam::Vec2;

use crate::entities::{EntityId, GameState, Tag, Wall};
use crate::events::{Collider, Contact};

/// The player always carries this id; the allocator starts above it.
pub const PLAYER_ID: EntityId = EntityId(0);

/// Extra reach for player-vs-wall contacts, since movement never lets the
/// player actually overlap a wall.
const WALL_SKIN: f32 = 0.05;

pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance_squared(b) <= (ra + rb) * (ra + rb)
}

pub fn circle_hits_box(center: Vec2, radius: f32, min: Vec2, max: Vec2) -> bool {
    let nearest = center.clamp(min, max);
    center.distance_squared(nearest) <= radius * radius
}

fn hits_any_wall(pos: Vec2, radius: f32, walls: &[Wall]) -> bool {
    walls
        .iter()
        .any(|w| circle_hits_box(pos, radius, w.min, w.max))
}

/// Move a circle from `from` toward `to`, one axis at a time, refusing the
/// component of the step that would push it into a wall.
pub fn slide_against_walls(from: Vec2, to: Vec2, radius: f32, walls: &[Wall]) -> Vec2 {
    let mut pos = from;
    let try_x = Vec2::new(to.x, pos.y);
    if !hits_any_wall(try_x, radius, walls) {
        pos = try_x;
    }
    let try_y = Vec2::new(pos.x, to.y);
    if !hits_any_wall(try_y, radius, walls) {
        pos = try_y;
    }
    pos
}

/// First point along the segment `from -> to` where a circle of `radius`
/// touches a wall. Samples are at most `radius` apart, so no wall is skipped.
pub fn first_wall_hit(from: Vec2, to: Vec2, radius: f32, walls: &[Wall]) -> Option<Vec2> {
    if walls.is_empty() || radius <= 0.0 {
        return None;
    }
    let travel = to - from;
    let steps = ((travel.length() / radius).ceil() as usize).max(1);
    (1..=steps)
        .map(|i| from + travel * (i as f32 / steps as f32))
        .find(|&p| hits_any_wall(p, radius, walls))
}

fn pair_key(a: EntityId, b: EntityId) -> (EntityId, EntityId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Every pair overlapping right now, as contacts.
fn current_overlaps(state: &GameState) -> Vec<Contact> {
    let cfg = &state.config;
    let player = Collider {
        id: PLAYER_ID,
        tag: Tag::Player,
    };
    let player_pos = state.player.pos;
    let player_r = cfg.player.radius;
    let walls: &[Wall] = state
        .level
        .active()
        .map(|l| l.walls.as_slice())
        .unwrap_or(&[]);

    let mut contacts = Vec::new();

    for enemy in &state.enemies {
        if circles_overlap(player_pos, player_r, enemy.pos, cfg.enemy.radius) {
            contacts.push(Contact::new(
                player,
                Collider {
                    id: enemy.id,
                    tag: Tag::Enemy,
                },
            ));
        }
    }

    if let Some(door) = state.level.active().and_then(|l| l.door.as_ref()) {
        if circles_overlap(player_pos, player_r, door.pos, door.radius) {
            contacts.push(Contact::new(
                player,
                Collider {
                    id: door.id,
                    tag: Tag::Door,
                },
            ));
        }
    }

    for wall in walls {
        if circle_hits_box(player_pos, player_r + WALL_SKIN, wall.min, wall.max) {
            contacts.push(Contact::new(
                player,
                Collider {
                    id: wall.id,
                    tag: Tag::Wall,
                },
            ));
        }
    }

    for p in &state.projectiles {
        let radius = match p.kind.tag() {
            Tag::Bullet => cfg.bullet.radius,
            _ => cfg.arrow.radius,
        };
        let me = Collider {
            id: p.id,
            tag: p.kind.tag(),
        };

        if circles_overlap(p.pos, radius, player_pos, player_r) {
            contacts.push(Contact::new(me, player));
        }
        for enemy in &state.enemies {
            if circles_overlap(p.pos, radius, enemy.pos, cfg.enemy.radius) {
                contacts.push(Contact::new(
                    me,
                    Collider {
                        id: enemy.id,
                        tag: Tag::Enemy,
                    },
                ));
            }
        }
        for wall in walls {
            if circle_hits_box(p.pos, radius, wall.min, wall.max) {
                contacts.push(Contact::new(
                    me,
                    Collider {
                        id: wall.id,
                        tag: Tag::Wall,
                    },
                ));
            }
        }
    }

    contacts
}

/// Contacts that started this tick, plus the full set of touching pairs to
/// remember for the next one.
pub fn detect_contacts(state: &GameState) -> (Vec<Contact>, BTreeSet<(EntityId, EntityId)>) {
    let overlaps = current_overlaps(state);
    let touching: BTreeSet<_> = overlaps.iter().map(|c| pair_key(c.a.id, c.b.id)).collect();
    let entered = overlaps
        .into_iter()
        .filter(|c| !state.touching.contains(&pair_key(c.a.id, c.b.id)))
        .collect();
    (entered, touching)
}
