//! ReapDestroyed command - drops destroyed projectiles from the roster.

use crate::commands::projectile::ProjectileRoster;
use crate::components::Status;
use bevy_ecs::prelude::*;
use tracing::trace;

/// Remove every item for which `is_alive` is false, keeping the survivors in
/// their original order. Returns the removed items, also in order.
pub fn reap_destroyed<T, F>(items: &mut Vec<T>, mut is_alive: F) -> Vec<T>
where
    F: FnMut(&T) -> bool,
{
    let mut reaped = Vec::new();
    let mut kept = Vec::with_capacity(items.len());
    for item in items.drain(..) {
        if is_alive(&item) {
            kept.push(item);
        } else {
            reaped.push(item);
        }
    }
    *items = kept;
    reaped
}

/// Drop destroyed projectiles from the roster and despawn them.
///
/// Entries whose entity has vanished are dropped as well.
pub fn reap_projectiles(world: &mut World) {
    let mut entities = world.resource_mut::<ProjectileRoster>().take();
    let reaped = reap_destroyed(&mut entities, |&projectile| {
        world
            .get::<Status>(projectile)
            .is_some_and(|status| status.is_alive())
    });
    world.resource_mut::<ProjectileRoster>().replace(entities);

    if !reaped.is_empty() {
        trace!(count = reaped.len(), "reaped projectiles");
    }
    for projectile in reaped {
        world.despawn(projectile);
    }
}
