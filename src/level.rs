/// Level templates and the container holding the active level.

use std::sync::Arc;

use glam::Vec2;
use log::{error, info};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::entities::{Door, EntityId, IdAllocator, LevelInstance, Wall};
use crate::error::LevelError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallSpec {
    pub min: Vec2,
    pub max: Vec2,
}

/// Blueprint of a level, positioned relative to the origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelTemplate {
    pub name: String,
    #[serde(default)]
    pub door: Option<Vec2>,
    #[serde(default)]
    pub walls: Vec<WallSpec>,
    /// Spawn points, one enemy each.
    #[serde(default)]
    pub enemies: Vec<Vec2>,
}

/// A freshly instantiated level: the instance itself plus the enemy spawn
/// points it brought with it.
#[derive(Debug, Clone)]
pub struct Spawned {
    pub instance: LevelInstance,
    pub enemy_spawns: Vec<(EntityId, Vec2)>,
}

/// Holds zero or one active level built from a fixed template list.
#[derive(Debug, Clone)]
pub struct LevelContainer {
    templates: Arc<[LevelTemplate]>,
    active: Option<LevelInstance>,
}

impl LevelContainer {
    pub fn new(templates: Vec<LevelTemplate>) -> Self {
        Self {
            templates: templates.into(),
            active: None,
        }
    }

    pub fn templates(&self) -> &[LevelTemplate] {
        &self.templates
    }

    pub fn active(&self) -> Option<&LevelInstance> {
        self.active.as_ref()
    }

    /// Destroy the active level, if any, and hand it back.
    pub fn clear(&mut self) -> Option<LevelInstance> {
        self.active.take()
    }

    /// Replace the active level with a uniformly chosen template.
    ///
    /// The old level is always cleared first, so an empty template list
    /// leaves no active level behind.
    pub fn regenerate(
        &mut self,
        ids: &mut IdAllocator,
        door_radius: f32,
        rng: &mut impl Rng,
    ) -> Result<Spawned, LevelError> {
        self.clear();

        if self.templates.is_empty() {
            error!("cannot generate a level: {}", LevelError::NoTemplates);
            return Err(LevelError::NoTemplates);
        }

        let index = rng.gen_range(0..self.templates.len());
        let template = &self.templates[index];

        let instance = LevelInstance {
            id: ids.allocate(),
            template: index,
            name: template.name.clone(),
            door: template.door.map(|pos| Door {
                id: ids.allocate(),
                pos,
                radius: door_radius,
            }),
            walls: template
                .walls
                .iter()
                .map(|w| Wall {
                    id: ids.allocate(),
                    min: w.min.min(w.max),
                    max: w.min.max(w.max),
                })
                .collect(),
        };
        let enemy_spawns = template
            .enemies
            .iter()
            .map(|&pos| (ids.allocate(), pos))
            .collect();

        info!(
            "generated level `{}` (template {} of {})",
            instance.name,
            index + 1,
            self.templates.len()
        );

        self.active = Some(instance.clone());
        Ok(Spawned {
            instance,
            enemy_spawns,
        })
    }
}
