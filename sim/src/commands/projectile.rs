//! AdvanceProjectile command - moves a projectile one epoch along its path.
//!
//! Each advance runs these checks in priority order; the first match wins:
//! 1. degenerate path (start == end) - destroyed at once
//! 2. next position outside the grid - destroyed
//! 3. next position at or past the target on both axes - destroyed
//! 4. next position further than `projectile_range` from the start - destroyed
//! 5. next position's cell holds an alive unit other than the owner - both
//!    destroyed, observers notified
//! 6. otherwise the projectile moves on
//!
//! Positions use aim coordinates, where integer values name cell centers, so
//! the hit test shifts by half a cell before truncating.

use crate::commands::{read, unit_view};
use crate::components::*;
use crate::config::SimConfig;
use crate::error::StepError;
use crate::level::WorldGrid;
use crate::observer::ObserverRegistry;
use crate::spatial::UnitCells;
use bevy_ecs::prelude::*;
use tracing::debug;

/// Half-cell shift from aim coordinates to cell-corner coordinates.
const CELL_CENTER_SHIFT: Offset = Offset { dx: 0.5, dy: 0.5 };

/// Projectiles in flight, in firing order.
#[derive(Resource, Debug, Clone, Default)]
pub struct ProjectileRoster {
    entities: Vec<Entity>,
    next_id: u64,
}

impl ProjectileRoster {
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn push(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Drop every entry. Ids keep counting up.
    pub fn clear(&mut self) {
        self.entities.clear();
    }

    /// Allocate the next projectile id.
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    pub(crate) fn take(&mut self) -> Vec<Entity> {
        std::mem::take(&mut self.entities)
    }

    pub(crate) fn replace(&mut self, entities: Vec<Entity>) {
        self.entities = entities;
    }
}

/// Tolerance for the "passed target" test.
const TARGET_EPSILON: f32 = 1e-4;

/// Why a projectile stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Impact {
    Degenerate,
    OutOfBounds,
    ReachedTarget,
    OutOfRange,
    HitUnit(Entity),
}

/// Advance `projectile` by one epoch.
pub fn advance_projectile(world: &mut World, projectile: Entity) -> Result<(), StepError> {
    let flight = read::<Flight>(world, projectile, "projectile")?;
    let status = read::<Status>(world, projectile, "projectile")?;
    let position = read::<Position>(world, projectile, "projectile")?;
    if !status.is_alive() {
        return Ok(());
    }

    let (next, impact) = trace_step(world, &flight, position);
    let Some(impact) = impact else {
        if let Some(mut current) = world.get_mut::<Position>(projectile) {
            *current = next;
        }
        if let Some(mut flight) = world.get_mut::<Flight>(projectile) {
            flight.advances += 1;
        }
        return Ok(());
    };

    if let Some(mut status) = world.get_mut::<Status>(projectile) {
        *status = Status::Destroyed;
    }
    if let Impact::HitUnit(victim) = impact {
        if let Some(mut status) = world.get_mut::<Status>(victim) {
            *status = Status::Destroyed;
        }
        let view = unit_view(world, victim)?;
        let shooter = world.get::<UnitId>(flight.owner).map(|id| id.0);
        debug!(victim = view.id.0, ?shooter, "unit destroyed");
        world
            .resource_mut::<ObserverRegistry>()
            .notify_unit_destroyed(&view);
    }
    Ok(())
}

/// Compute the next position of a projectile and whether it stops there.
fn trace_step(world: &World, flight: &Flight, position: Position) -> (Position, Option<Impact>) {
    let Some(direction) = flight.start.offset_to(&flight.end).normalized() else {
        return (position, Some(Impact::Degenerate));
    };
    let config = world.resource::<SimConfig>();
    let travelled = config.projectile_speed * (flight.advances + 1) as f32;
    let next = flight.start.offset(direction.scaled(travelled));

    if !world.resource::<WorldGrid>().contains(&next) {
        return (next, Some(Impact::OutOfBounds));
    }
    if passed_target(direction, &next, &flight.end) {
        return (next, Some(Impact::ReachedTarget));
    }
    if next.distance_to(&flight.start) > config.projectile_range {
        return (next, Some(Impact::OutOfRange));
    }

    let cell = next.offset(CELL_CENTER_SHIFT).cell();
    let victim = world
        .resource::<UnitCells>()
        .unit_at(cell)
        .filter(|&unit| unit != flight.owner)
        .filter(|&unit| world.get::<Status>(unit).is_some_and(|s| s.is_alive()));
    (next, victim.map(Impact::HitUnit))
}

/// Whether `next` is at or beyond `end` on both axes, in the travel direction,
/// within `TARGET_EPSILON`.
fn passed_target(direction: Offset, next: &Position, end: &Position) -> bool {
    let x_passed = if direction.dx >= 0.0 {
        next.x >= end.x - TARGET_EPSILON
    } else {
        next.x <= end.x + TARGET_EPSILON
    };
    let y_passed = if direction.dy >= 0.0 {
        next.y >= end.y - TARGET_EPSILON
    } else {
        next.y <= end.y + TARGET_EPSILON
    };
    x_passed && y_passed
}
