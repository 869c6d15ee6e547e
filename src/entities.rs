/// Entity types and the game state. Plain data; the rules live in `compute`.

use std::collections::BTreeSet;
use std::sync::Arc;

use glam::Vec2;

use crate::config::GameConfig;
use crate::events::GameEvent;
use crate::level::LevelContainer;

// ── Identity ──────────────────────────────────────────────────────────────────

/// Handle of a live object in the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(pub u64);

/// Hands out ids in increasing order; ids are never reused within a run.
/// Id 0 is reserved for the player.
#[derive(Clone, Debug, Default)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn allocate(&mut self) -> EntityId {
        self.next += 1;
        EntityId(self.next)
    }
}

/// Collision classification of a collider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tag {
    Player,
    Enemy,
    Bullet,
    Arrow,
    Wall,
    Door,
}

// ── Facing ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn to_vec(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::Y,
            Direction::Down => Vec2::NEG_Y,
            Direction::Left => Vec2::NEG_X,
            Direction::Right => Vec2::X,
        }
    }

    /// Dominant-axis facing for a movement vector. Ties go vertical.
    /// `None` for the zero vector.
    pub fn from_vector(v: Vec2) -> Option<Direction> {
        if v == Vec2::ZERO {
            return None;
        }
        Some(if v.x.abs() > v.y.abs() {
            if v.x > 0.0 {
                Direction::Right
            } else {
                Direction::Left
            }
        } else if v.y > 0.0 {
            Direction::Up
        } else {
            Direction::Down
        })
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

/// Bullets are fired by the player, arrows by enemies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectileKind {
    Bullet,
    Arrow,
}

impl ProjectileKind {
    pub fn tag(self) -> Tag {
        match self {
            ProjectileKind::Bullet => Tag::Bullet,
            ProjectileKind::Arrow => Tag::Arrow,
        }
    }

    /// Whether touching a collider with `tag` removes this projectile.
    pub fn destroyed_by(self, tag: Tag) -> bool {
        match self {
            ProjectileKind::Bullet => matches!(tag, Tag::Enemy | Tag::Wall),
            ProjectileKind::Arrow => matches!(tag, Tag::Player | Tag::Wall),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Projectile {
    pub id: EntityId,
    pub kind: ProjectileKind,
    pub pos: Vec2,
    /// Unit vector, fixed at spawn.
    pub dir: Vec2,
    pub speed: f32,
    /// Seconds since spawn.
    pub age: f32,
}

// ── Player & enemy ────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    pub pos: Vec2,
    pub facing: Direction,
    /// Discrete directional override; pressing one direction clears the others.
    pub held: Option<Direction>,
    /// Velocity applied during the last tick.
    pub velocity: Vec2,
    pub lives: u32,
    /// Simulation time of the last accepted aimed shot.
    pub last_aimed_shot: Option<f32>,
    /// The damage indicator stays on until this simulation time.
    pub hurt_until: Option<f32>,
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub id: EntityId,
    pub pos: Vec2,
    /// Level instance that spawned this enemy.
    pub level: EntityId,
    pub move_speed: f32,
    pub shoot_range: f32,
    pub shoot_interval: f32,
    /// `None` until the first arrow leaves.
    pub last_shot: Option<f32>,
}

// ── Level fixtures ────────────────────────────────────────────────────────────

/// Axis-aligned solid block.
#[derive(Clone, Debug, PartialEq)]
pub struct Wall {
    pub id: EntityId,
    pub min: Vec2,
    pub max: Vec2,
}

/// Exit that swaps the level when the player walks into it.
#[derive(Clone, Debug, PartialEq)]
pub struct Door {
    pub id: EntityId,
    pub pos: Vec2,
    pub radius: f32,
}

/// A spawned level template.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelInstance {
    pub id: EntityId,
    /// Index into the template list it was built from.
    pub template: usize,
    pub name: String,
    pub door: Option<Door>,
    pub walls: Vec<Wall>,
}

// ── Per-frame input ───────────────────────────────────────────────────────────

/// Everything the host hands the simulation for one tick, besides `dt`.
#[derive(Clone, Debug, Default)]
pub struct FrameInput {
    /// Raw analog movement; normalized before use. Ignored while a discrete
    /// direction is held.
    pub axis: Vec2,
    pub fire_aimed: bool,
    pub fire_random: bool,
    /// Events from an external contact notifier, applied after the built-in ones.
    pub events: Vec<GameEvent>,
}

// ── HUD ───────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifeIcon {
    Alive,
    Dead,
}

/// Read-only view of everything the HUD shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HudSnapshot {
    pub lives_remaining: u32,
    pub max_lives: u32,
    pub score: u32,
    pub max_score: u32,
    pub paused: bool,
    pub damage_flash: bool,
}

impl HudSnapshot {
    /// One icon per life slot, alive slots first.
    pub fn life_icons(&self) -> Vec<LifeIcon> {
        (0..self.max_lives)
            .map(|i| {
                if i < self.lives_remaining {
                    LifeIcon::Alive
                } else {
                    LifeIcon::Dead
                }
            })
            .collect()
    }
}

// ── Master game state ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    Paused,
}

/// The entire game state.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub config: Arc<GameConfig>,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub level: LevelContainer,
    /// Collider pairs overlapping at the end of the last tick, smaller id first.
    /// Contacts are only reported when a pair first starts touching.
    pub touching: BTreeSet<(EntityId, EntityId)>,
    pub ids: IdAllocator,
    pub score: u32,
    /// Best score seen so far; persisted on restart.
    pub max_score: u32,
    /// Enemies destroyed by bullets since the last restart.
    pub kills: u32,
    /// Number of new-game transitions since startup.
    pub restarts: u32,
    pub status: GameStatus,
    /// Simulation clock in seconds. Frozen while paused.
    pub time: f32,
    pub frame: u64,
}
