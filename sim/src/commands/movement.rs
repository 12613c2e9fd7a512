//! Move command - steps a unit by a grid vector.

use crate::commands::read;
use crate::components::*;
use crate::error::StepError;
use crate::level::{TileLayers, WorldGrid};
use crate::spatial::UnitCells;
use bevy_ecs::prelude::*;
use tracing::trace;

/// Move `unit` by `heading` (components in {-1, 0, 1}).
///
/// The move is all or nothing. It is skipped when the unit is destroyed or
/// the destination leaves the grid, is a wall, or holds another unit (wrecks
/// included). On success the unit turns to face the move direction.
pub fn move_unit(world: &mut World, unit: Entity, heading: Offset) -> Result<(), StepError> {
    let status = read::<Status>(world, unit, "moving unit")?;
    let position = read::<Position>(world, unit, "moving unit")?;
    if !status.is_alive() {
        return Ok(());
    }

    let destination = position.offset(heading);
    if !world.resource::<WorldGrid>().contains(&destination) {
        trace!(?unit, ?destination, "move blocked: outside the grid");
        return Ok(());
    }
    let cell = destination.cell();
    if world.resource::<TileLayers>().is_wall(cell) {
        trace!(?unit, ?cell, "move blocked: wall");
        return Ok(());
    }
    if world
        .resource::<UnitCells>()
        .unit_at(cell)
        .is_some_and(|occupant| occupant != unit)
    {
        trace!(?unit, ?cell, "move blocked: occupied");
        return Ok(());
    }

    if let Some(facing) = Orientation::from_heading(heading) {
        if let Some(mut orientation) = world.get_mut::<Orientation>(unit) {
            *orientation = facing;
        }
    }
    if let Some(mut current) = world.get_mut::<Position>(unit) {
        *current = destination;
    }
    world.resource_mut::<UnitCells>().insert(unit, cell);
    Ok(())
}
