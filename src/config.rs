/// Gameplay tuning and level templates, loadable from a JSON file.
///
/// Every field has a default, so a config file only needs the values it
/// overrides. `GameConfig::load` validates before returning.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::level::{LevelTemplate, WallSpec};

/// Player movement, firing and damage tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Units per second.
    pub speed: f32,
    pub max_lives: u32,
    /// Minimum seconds between aimed shots.
    pub aimed_cooldown: f32,
    /// Seconds the damage indicator stays on after a hit.
    pub damage_flash: f32,
    pub radius: f32,
    /// Points per enemy destroyed by a bullet.
    pub kill_score: u32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            speed: 5.0,
            max_lives: 3,
            aimed_cooldown: 0.3,
            damage_flash: 0.5,
            radius: 0.4,
            kill_score: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    pub speed: f32,
    /// Enemies only fire when the player is at most this far away.
    pub shoot_range: f32,
    /// Seconds between arrows.
    pub shoot_interval: f32,
    pub radius: f32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            speed: 2.0,
            shoot_range: 5.0,
            shoot_interval: 2.0,
            radius: 0.4,
        }
    }
}

/// Gameplay tuning for one projectile kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileTuning {
    /// Units per second.
    pub speed: f32,
    pub radius: f32,
    /// Seconds before the projectile is despawned without hitting anything.
    pub max_lifetime: f32,
}

impl ProjectileTuning {
    pub fn bullet() -> Self {
        Self {
            speed: 10.0,
            radius: 0.15,
            max_lifetime: 5.0,
        }
    }

    pub fn arrow() -> Self {
        Self {
            speed: 8.0,
            radius: 0.15,
            max_lifetime: 5.0,
        }
    }
}

/// Largest accepted arena half extent, in world units. Keeps the terminal
/// field well inside `u16` cell coordinates.
pub const MAX_ARENA_HALF_EXTENT: f32 = 1000.0;

/// Rectangular play field centred on the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Arena {
    pub half_width: f32,
    pub half_height: f32,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            half_width: 9.0,
            half_height: 5.0,
        }
    }
}

impl Arena {
    pub fn contains(&self, pos: Vec2) -> bool {
        pos.x.abs() <= self.half_width && pos.y.abs() <= self.half_height
    }

    /// Clamp a body of the given radius so it stays fully inside.
    pub fn clamp(&self, pos: Vec2, radius: f32) -> Vec2 {
        let hx = (self.half_width - radius).max(0.0);
        let hy = (self.half_height - radius).max(0.0);
        Vec2::new(pos.x.clamp(-hx, hx), pos.y.clamp(-hy, hy))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub player: PlayerTuning,
    pub enemy: EnemyTuning,
    #[serde(default = "ProjectileTuning::bullet")]
    pub bullet: ProjectileTuning,
    #[serde(default = "ProjectileTuning::arrow")]
    pub arrow: ProjectileTuning,
    pub arena: Arena,
    pub door_radius: f32,
    pub levels: Vec<LevelTemplate>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player: PlayerTuning::default(),
            enemy: EnemyTuning::default(),
            bullet: ProjectileTuning::bullet(),
            arrow: ProjectileTuning::arrow(),
            arena: Arena::default(),
            door_radius: 0.5,
            levels: builtin_levels(),
        }
    }
}

impl GameConfig {
    /// Read, parse and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: GameConfig =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.player.max_lives == 0 {
            return Err(ConfigError::NoLives);
        }

        let positive = [
            ("player.speed", self.player.speed),
            ("player.radius", self.player.radius),
            ("enemy.speed", self.enemy.speed),
            ("enemy.shoot_range", self.enemy.shoot_range),
            ("enemy.radius", self.enemy.radius),
            ("bullet.speed", self.bullet.speed),
            ("bullet.radius", self.bullet.radius),
            ("bullet.max_lifetime", self.bullet.max_lifetime),
            ("arrow.speed", self.arrow.speed),
            ("arrow.radius", self.arrow.radius),
            ("arrow.max_lifetime", self.arrow.max_lifetime),
            ("arena.half_width", self.arena.half_width),
            ("arena.half_height", self.arena.half_height),
            ("door_radius", self.door_radius),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        for (field, value) in [
            ("arena.half_width", self.arena.half_width),
            ("arena.half_height", self.arena.half_height),
        ] {
            if value > MAX_ARENA_HALF_EXTENT {
                return Err(ConfigError::ArenaTooLarge {
                    field,
                    value,
                    max: MAX_ARENA_HALF_EXTENT,
                });
            }
        }

        let non_negative = [
            ("player.aimed_cooldown", self.player.aimed_cooldown),
            ("player.damage_flash", self.player.damage_flash),
            ("enemy.shoot_interval", self.enemy.shoot_interval),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Negative { field, value });
            }
        }

        for template in &self.levels {
            let points = template
                .enemies
                .iter()
                .map(|p| ("an enemy", *p))
                .chain(template.door.map(|p| ("the door", p)))
                .chain(template.walls.iter().flat_map(|w| [("a wall", w.min), ("a wall", w.max)]));
            for (what, p) in points {
                if !self.arena.contains(p) {
                    return Err(ConfigError::OutsideArena {
                        template: template.name.clone(),
                        what,
                        x: p.x,
                        y: p.y,
                    });
                }
            }
        }

        Ok(())
    }
}

fn wall(min: (f32, f32), max: (f32, f32)) -> WallSpec {
    WallSpec {
        min: Vec2::new(min.0, min.1),
        max: Vec2::new(max.0, max.1),
    }
}

/// The three layouts shipped with the game. The origin is kept clear
/// because the player respawns there.
pub fn builtin_levels() -> Vec<LevelTemplate> {
    vec![
        LevelTemplate {
            name: "crossroads".to_string(),
            door: Some(Vec2::new(0.0, 4.2)),
            walls: vec![
                wall((-6.0, 2.0), (-5.0, 3.0)),
                wall((5.0, 2.0), (6.0, 3.0)),
                wall((-6.0, -3.0), (-5.0, -2.0)),
                wall((5.0, -3.0), (6.0, -2.0)),
            ],
            enemies: vec![Vec2::new(-7.5, 3.5), Vec2::new(7.5, -3.5)],
        },
        LevelTemplate {
            name: "corridor".to_string(),
            door: Some(Vec2::new(-8.0, -4.0)),
            walls: vec![
                wall((-7.0, 1.5), (-2.0, 2.0)),
                wall((2.0, -2.0), (7.0, -1.5)),
            ],
            enemies: vec![Vec2::new(7.0, 3.0), Vec2::new(-7.0, -3.0), Vec2::new(0.0, -4.0)],
        },
        LevelTemplate {
            name: "pillars".to_string(),
            door: Some(Vec2::new(8.0, 4.0)),
            walls: vec![
                wall((-3.0, -0.5), (-2.0, 0.5)),
                wall((2.0, -0.5), (3.0, 0.5)),
            ],
            enemies: vec![Vec2::new(-8.0, 4.0), Vec2::new(8.0, -4.0), Vec2::new(-8.0, -4.0)],
        },
    ]
}
