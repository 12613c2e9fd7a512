//! Commands that mutate simulation state.
//!
//! Every change to the world during a step goes through a `SimCommand`. The
//! orchestrator in `api.rs` builds the queue for an epoch in a fixed order and
//! applies it sequentially; each command sees the effects of the ones before
//! it.
//!
//! - `Move` - step a unit one cell (`movement.rs`)
//! - `SetTarget` - aim a unit's weapon (`targeting.rs`)
//! - `Fire` - spawn a projectile if the cooldown allows (`combat.rs`)
//! - `AdvanceProjectile` - fly, expire, or hit (`projectile.rs`)
//! - `ReapDestroyed` - drop destroyed projectiles (`reap.rs`)
//!
//! Level loading lives in `load_level.rs`; it is fallible and runs outside
//! the per-epoch queue.
//!
//! Gameplay rejections are silent no-ops. A command only errors when an
//! entity it was given no longer exists, which the orchestrator rules out
//! before applying anything.

pub mod combat;
pub mod load_level;
pub mod movement;
pub mod projectile;
pub mod reap;
pub mod targeting;

pub use combat::fire;
pub use load_level::{load_level, LoadLevel};
pub use movement::move_unit;
pub use projectile::{advance_projectile, ProjectileRoster};
pub use reap::{reap_destroyed, reap_projectiles};
pub use targeting::set_target;

use crate::components::*;
use crate::error::StepError;
use crate::observer::UnitView;
use bevy_ecs::prelude::*;

/// A single state mutation queued for the current epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimCommand {
    Move { unit: Entity, heading: Offset },
    SetTarget { unit: Entity, target: Position },
    Fire { unit: Entity },
    AdvanceProjectile { projectile: Entity },
    ReapDestroyed,
}

impl SimCommand {
    /// Apply this command to the world.
    pub fn apply(self, world: &mut World) -> Result<(), StepError> {
        match self {
            SimCommand::Move { unit, heading } => move_unit(world, unit, heading),
            SimCommand::SetTarget { unit, target } => set_target(world, unit, target),
            SimCommand::Fire { unit } => fire(world, unit),
            SimCommand::AdvanceProjectile { projectile } => advance_projectile(world, projectile),
            SimCommand::ReapDestroyed => {
                reap_projectiles(world);
                Ok(())
            }
        }
    }
}

/// Apply commands in order, stopping at the first failure.
pub fn apply_all(
    world: &mut World,
    commands: impl IntoIterator<Item = SimCommand>,
) -> Result<(), StepError> {
    commands
        .into_iter()
        .try_for_each(|command| command.apply(world))
}

/// Read a copy of a component, reporting a missing entity as a step error.
pub(crate) fn read<C: Component + Copy>(
    world: &World,
    entity: Entity,
    role: &'static str,
) -> Result<C, StepError> {
    world
        .get::<C>(entity)
        .copied()
        .ok_or(StepError::MissingEntity { entity, role })
}

/// Observer-facing view of a unit.
pub(crate) fn unit_view(world: &World, unit: Entity) -> Result<UnitView, StepError> {
    Ok(UnitView {
        id: read::<UnitId>(world, unit, "unit")?,
        position: read::<Position>(world, unit, "unit")?,
        orientation: read::<Orientation>(world, unit, "unit")?,
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::config::SimConfig;
    use crate::epoch::{Epoch, MatchState};
    use crate::level::LevelDescriptor;
    use crate::observer::{EventLog, ObserverRegistry};
    use bevy_ecs::prelude::*;

    /// Build a world with every simulation resource and load `ascii` into it.
    ///
    /// `P` is the player, `E` an enemy, `#` a wall, `.` open ground. Units
    /// are numbered player first, then enemies in reading order.
    pub fn world_from_ascii(ascii: &str, config: SimConfig) -> (World, EventLog) {
        let mut world = World::new();
        world.insert_resource(config);
        world.insert_resource(Epoch::default());
        world.insert_resource(MatchState::default());
        world.insert_resource(ObserverRegistry::default());
        let log = EventLog::new();
        world.resource_mut::<ObserverRegistry>().add(Box::new(log.clone()));

        super::load_level(&mut world, &descriptor_from_ascii(ascii)).unwrap();
        (world, log)
    }

    pub fn descriptor_from_ascii(ascii: &str) -> LevelDescriptor {
        use crate::level::{TileRef, UnitSpawn};

        let rows: Vec<&str> = ascii.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        let height = rows.len() as u32;
        let width = rows[0].len() as u32;
        let mut player = None;
        let mut enemies = Vec::new();
        let mut walls = Vec::new();
        for (y, row) in rows.iter().enumerate() {
            let mut wall_row = Vec::new();
            for (x, c) in row.chars().enumerate() {
                let spawn = UnitSpawn {
                    position: [x as f32, y as f32],
                    facing: [0.0, 0.0],
                };
                match c {
                    'P' => player = Some(spawn),
                    'E' => enemies.push(spawn),
                    _ => {}
                }
                wall_row.push((c == '#').then_some(TileRef(1, 1)));
            }
            walls.push(wall_row);
        }

        let mut units = vec![player.expect("ascii level needs a player")];
        units.extend(enemies);
        LevelDescriptor {
            width,
            height,
            cell_size: (64, 64),
            ground: vec![vec![TileRef(5, 1); width as usize]; height as usize],
            walls,
            units,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::world_from_ascii;
    use super::*;
    use crate::config::SimConfig;
    use crate::level::UnitRoster;

    #[test]
    fn test_apply_all_runs_in_order() {
        let (mut world, _) = world_from_ascii(
            "
            P...
            ....
            ",
            SimConfig::default(),
        );
        let player = world.resource::<UnitRoster>().0[0];

        apply_all(
            &mut world,
            [
                SimCommand::Move { unit: player, heading: Offset::new(1.0, 0.0) },
                SimCommand::Move { unit: player, heading: Offset::new(1.0, 0.0) },
                SimCommand::Move { unit: player, heading: Offset::new(0.0, 1.0) },
            ],
        )
        .unwrap();

        assert_eq!(*world.get::<Position>(player).unwrap(), Position::new(2.0, 1.0));
    }

    #[test]
    fn test_despawned_entity_is_an_error() {
        let (mut world, _) = world_from_ascii("P.", SimConfig::default());
        let ghost = world.spawn_empty().id();
        world.despawn(ghost);

        let err = SimCommand::Fire { unit: ghost }.apply(&mut world).unwrap_err();
        assert!(matches!(err, StepError::MissingEntity { .. }));
    }
}
