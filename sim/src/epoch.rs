//! Epoch bookkeeping systems.
//!
//! These run as a chained schedule after the command queue of each step:
//! - `epoch_advance_system` - bumps the epoch counter
//! - `match_outcome_system` - checks for a win or a loss

use crate::components::*;
use crate::level::UnitRoster;
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Global simulation epoch counter.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Epoch(pub u64);

impl Epoch {
    pub fn increment(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }
}

/// Terminal state of the current level.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchState {
    #[default]
    Running,
    /// Every enemy is destroyed.
    Won,
    /// The player is destroyed.
    Lost,
}

impl MatchState {
    pub fn is_over(&self) -> bool {
        !matches!(self, MatchState::Running)
    }
}

/// System that advances the epoch counter.
pub fn epoch_advance_system(mut epoch: ResMut<Epoch>) {
    epoch.increment();
}

/// System that ends the match once the player or every enemy is gone.
///
/// A dead player is checked first, so a step that kills both sides is a loss.
pub fn match_outcome_system(
    epoch: Res<Epoch>,
    roster: Res<UnitRoster>,
    units: Query<&Status, With<Unit>>,
    mut state: ResMut<MatchState>,
) {
    if state.is_over() {
        return;
    }
    let Some(player) = roster.player() else {
        return;
    };
    let is_alive = |entity: Entity| units.get(entity).is_ok_and(|status| status.is_alive());

    let outcome = if !is_alive(player) {
        MatchState::Lost
    } else if !roster.enemies().iter().any(|&enemy| is_alive(enemy)) {
        MatchState::Won
    } else {
        return;
    };

    info!(epoch = epoch.0, ?outcome, "game over");
    *state = outcome;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world_with_units(statuses: &[Status]) -> (World, Vec<Entity>) {
        let mut world = World::new();
        world.insert_resource(Epoch::default());
        world.insert_resource(MatchState::default());

        let entities: Vec<Entity> = statuses
            .iter()
            .enumerate()
            .map(|(i, &status)| {
                let mut bundle = UnitBundle::new(i as u32, Position::new(i as f32, 0.0), Orientation::UP);
                bundle.status = status;
                world.spawn(bundle).id()
            })
            .collect();
        world.insert_resource(UnitRoster(entities.clone()));
        (world, entities)
    }

    fn run(world: &mut World) {
        let mut schedule = Schedule::default();
        schedule.add_systems((epoch_advance_system, match_outcome_system).chain());
        schedule.run(world);
    }

    #[test]
    fn test_epoch_advances() {
        let (mut world, _) = world_with_units(&[Status::Alive, Status::Alive]);
        run(&mut world);
        run(&mut world);
        assert_eq!(world.resource::<Epoch>().0, 2);
        assert_eq!(*world.resource::<MatchState>(), MatchState::Running);
    }

    #[test]
    fn test_dead_player_loses() {
        let (mut world, _) = world_with_units(&[Status::Destroyed, Status::Alive]);
        run(&mut world);
        assert_eq!(*world.resource::<MatchState>(), MatchState::Lost);
    }

    #[test]
    fn test_no_enemies_left_wins() {
        let (mut world, _) =
            world_with_units(&[Status::Alive, Status::Destroyed, Status::Destroyed]);
        run(&mut world);
        assert_eq!(*world.resource::<MatchState>(), MatchState::Won);
    }

    #[test]
    fn test_loss_beats_win() {
        let (mut world, _) = world_with_units(&[Status::Destroyed, Status::Destroyed]);
        run(&mut world);
        assert_eq!(*world.resource::<MatchState>(), MatchState::Lost);
    }

    #[test]
    fn test_outcome_is_sticky() {
        let (mut world, units) = world_with_units(&[Status::Alive, Status::Destroyed]);
        run(&mut world);
        assert_eq!(*world.resource::<MatchState>(), MatchState::Won);

        *world.get_mut::<Status>(units[0]).unwrap() = Status::Destroyed;
        run(&mut world);
        assert_eq!(*world.resource::<MatchState>(), MatchState::Won);
    }
}
