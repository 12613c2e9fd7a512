//! SetTarget command - points a unit's weapon.

use crate::components::*;
use crate::error::StepError;
use bevy_ecs::prelude::*;

/// Aim `unit` at `target`. Any point is accepted, including points outside
/// the grid; destroyed units keep tracking too.
pub fn set_target(world: &mut World, unit: Entity, target: Position) -> Result<(), StepError> {
    let mut aim = world
        .get_mut::<WeaponTarget>(unit)
        .ok_or(StepError::MissingEntity { entity: unit, role: "aiming unit" })?;
    aim.0 = target;
    Ok(())
}
