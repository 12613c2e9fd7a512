//! Fire command - spawns projectiles subject to the fire cooldown.

use crate::commands::projectile::ProjectileRoster;
use crate::commands::{read, unit_view};
use crate::components::*;
use crate::config::SimConfig;
use crate::epoch::Epoch;
use crate::error::StepError;
use crate::observer::ObserverRegistry;
use bevy_ecs::prelude::*;
use tracing::{debug, trace};

/// Fire `unit`'s weapon at its current target.
///
/// Skipped when the unit is destroyed or fewer than `fire_cooldown_epochs`
/// epochs have passed since its last shot. The projectile starts from the
/// center of the unit's cell and flies toward the weapon target.
pub fn fire(world: &mut World, unit: Entity) -> Result<(), StepError> {
    let status = read::<Status>(world, unit, "firing unit")?;
    let position = read::<Position>(world, unit, "firing unit")?;
    let target = read::<WeaponTarget>(world, unit, "firing unit")?;
    let last_fired = read::<LastFired>(world, unit, "firing unit")?;
    if !status.is_alive() {
        return Ok(());
    }

    let epoch = world.resource::<Epoch>().0;
    let cooldown = world.resource::<SimConfig>().fire_cooldown_epochs;
    if !last_fired.ready(epoch, cooldown) {
        trace!(?unit, epoch, "fire skipped: cooling down");
        return Ok(());
    }

    if let Some(mut last) = world.get_mut::<LastFired>(unit) {
        last.0 = Some(epoch);
    }
    let id = world.resource_mut::<ProjectileRoster>().next_id();
    let start = position.cell_center();
    let projectile = world
        .spawn(ProjectileBundle::new(id, unit, start, target.0))
        .id();
    world.resource_mut::<ProjectileRoster>().push(projectile);

    let view = unit_view(world, unit)?;
    debug!(shooter = view.id.0, projectile = id, ?start, end = ?target.0, "projectile fired");
    world
        .resource_mut::<ObserverRegistry>()
        .notify_projectile_fired(&view);
    Ok(())
}
