//! LoadLevel command - replaces the level wholesale.

use crate::commands::projectile::ProjectileRoster;
use crate::components::*;
use crate::epoch::MatchState;
use crate::error::LevelLoadError;
use crate::level::{spawn_heading, LevelDescriptor, TileLayers, UnitRoster, WorldGrid};
use crate::spatial::UnitCells;
use bevy_ecs::prelude::*;
use std::path::Path;
use tracing::{info, warn};

/// A pending level load.
#[derive(Debug, Clone)]
pub struct LoadLevel {
    pub descriptor: LevelDescriptor,
}

impl LoadLevel {
    pub fn new(descriptor: LevelDescriptor) -> Self {
        Self { descriptor }
    }

    /// Read a descriptor file. Fails with `NotFound` if the file is missing.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LevelLoadError> {
        Ok(Self::new(LevelDescriptor::from_path(path)?))
    }

    pub fn apply(self, world: &mut World) -> Result<(), LevelLoadError> {
        load_level(world, &self.descriptor)
    }
}

/// Validate `descriptor` and, if it is sound, replace the current level.
///
/// Replaces the grid, tile layers and units, clears projectiles and resets
/// the match state. On error nothing is touched.
pub fn load_level(world: &mut World, descriptor: &LevelDescriptor) -> Result<(), LevelLoadError> {
    if let Err(err) = descriptor.validate() {
        warn!(error = %err, "rejected level descriptor");
        return Err(err);
    }
    install_level(world, descriptor);
    Ok(())
}

/// Replace the level without validating. Callers guarantee a sound descriptor.
pub(crate) fn install_level(world: &mut World, descriptor: &LevelDescriptor) {
    let old_units = world
        .get_resource::<UnitRoster>()
        .map(|roster| roster.0.clone())
        .unwrap_or_default();
    let old_projectiles = world
        .get_resource::<ProjectileRoster>()
        .map(|roster| roster.entities().to_vec())
        .unwrap_or_default();
    for entity in old_units.into_iter().chain(old_projectiles) {
        world.despawn(entity);
    }

    let mut cells = UnitCells::new();
    let mut roster = Vec::with_capacity(descriptor.units.len());
    for (index, spawn) in descriptor.units.iter().enumerate() {
        let position = Position::from(spawn.position);
        let orientation = Orientation::from_heading(spawn_heading(spawn)).unwrap_or_default();
        let entity = world
            .spawn(UnitBundle::new(index as u32, position, orientation))
            .id();
        if index == 0 {
            world.entity_mut(entity).insert(Player);
        }
        cells.insert(entity, position.cell());
        roster.push(entity);
    }

    world.insert_resource(WorldGrid::new(
        descriptor.width,
        descriptor.height,
        descriptor.cell_size,
    ));
    world.insert_resource(TileLayers {
        ground: descriptor.ground.clone(),
        walls: descriptor.walls.clone(),
    });
    world.insert_resource(UnitRoster(roster));
    world.insert_resource(cells);
    world.insert_resource(MatchState::Running);
    if world.contains_resource::<ProjectileRoster>() {
        world.resource_mut::<ProjectileRoster>().clear();
    } else {
        world.insert_resource(ProjectileRoster::default());
    }

    info!(
        width = descriptor.width,
        height = descriptor.height,
        units = descriptor.units.len(),
        "level loaded"
    );
}
