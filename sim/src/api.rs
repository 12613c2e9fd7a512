//! Public API for the simulation.
//!
//! `SimWorld` owns the ECS world and is the only way a host drives it: load a
//! level, register observers, step once per epoch with the player's intent,
//! and read snapshots between steps.
//!
//! ## Epoch order
//!
//! Every step applies, in this order:
//! 1. the player's `Move` (only if a move was requested), `SetTarget`, and
//!    `Fire` (only if requested)
//! 2. for each alive enemy in roster order: `SetTarget` at the player's
//!    current position, then `Fire` if the player is within
//!    `projectile_range`
//! 3. `AdvanceProjectile` for every projectile that was in flight when the
//!    step began
//! 4. `ReapDestroyed`
//! 5. the post-step schedule: epoch advance, then the win/loss check
//!
//! Once the match is over, steps 1 to 4 are skipped until another level
//! loads. The post-step schedule still runs, so the epoch keeps counting.

use crate::commands::{self, apply_all, read, LoadLevel, ProjectileRoster, SimCommand};
use crate::components::*;
use crate::config::SimConfig;
use crate::epoch::{epoch_advance_system, match_outcome_system, Epoch, MatchState};
use crate::error::{LevelLoadError, StepError};
use crate::intent::PlayerIntent;
use crate::level::{LevelDescriptor, UnitRoster};
use crate::observer::{ObserverRegistry, SimObserver};
use crate::world::Snapshot;
use bevy_ecs::prelude::*;
use std::path::Path;
use tracing::trace;

/// The main simulation world container.
pub struct SimWorld {
    world: World,
    post_step: Schedule,
}

/// Entities one step will touch, checked before anything is applied.
struct StepPlan {
    player: Entity,
    enemies: Vec<Entity>,
    in_flight: Vec<Entity>,
}

impl SimWorld {
    /// Create a simulation with default tunables and the built-in empty level.
    pub fn new() -> Self {
        Self::with_config(SimConfig::default())
    }

    /// Create a simulation with custom configuration.
    pub fn with_config(config: SimConfig) -> Self {
        let empty = LevelDescriptor::empty(&config);

        let mut world = World::new();
        world.insert_resource(config);
        world.insert_resource(Epoch::default());
        world.insert_resource(MatchState::default());
        world.insert_resource(ObserverRegistry::default());
        world.insert_resource(ProjectileRoster::default());
        commands::load_level::install_level(&mut world, &empty);

        let mut post_step = Schedule::default();
        post_step.add_systems((epoch_advance_system, match_outcome_system).chain());

        Self { world, post_step }
    }

    /// Replace the current level. On error the previous level stays loaded.
    pub fn load_level(&mut self, descriptor: &LevelDescriptor) -> Result<(), LevelLoadError> {
        commands::load_level(&mut self.world, descriptor)
    }

    /// Read a level descriptor from a JSON file and load it.
    pub fn load_level_file(&mut self, path: impl AsRef<Path>) -> Result<(), LevelLoadError> {
        LoadLevel::from_path(path)?.apply(&mut self.world)
    }

    /// Register an observer. Observers are notified in registration order.
    pub fn add_observer(&mut self, observer: impl SimObserver) {
        self.world
            .resource_mut::<ObserverRegistry>()
            .add(Box::new(observer));
    }

    /// Advance the simulation by one epoch and report the match state.
    pub fn step(&mut self, intent: &PlayerIntent) -> Result<MatchState, StepError> {
        let state = self.match_state();
        if state.is_over() {
            trace!(?state, "commands skipped: match is over");
            self.post_step.run(&mut self.world);
            return Ok(self.match_state());
        }

        let plan = self.plan()?;

        let mut player_commands = Vec::with_capacity(3);
        if intent.wants_move() {
            player_commands.push(SimCommand::Move {
                unit: plan.player,
                heading: intent.move_vector,
            });
        }
        player_commands.push(SimCommand::SetTarget {
            unit: plan.player,
            target: intent.aim_point,
        });
        if intent.fire {
            player_commands.push(SimCommand::Fire { unit: plan.player });
        }
        apply_all(&mut self.world, player_commands)?;

        let range = self.config().projectile_range;
        for &enemy in &plan.enemies {
            if !read::<Status>(&self.world, enemy, "enemy")?.is_alive() {
                continue;
            }
            let player_at = read::<Position>(&self.world, plan.player, "player")?;
            let enemy_at = read::<Position>(&self.world, enemy, "enemy")?;
            SimCommand::SetTarget {
                unit: enemy,
                target: player_at,
            }
            .apply(&mut self.world)?;
            if enemy_at.distance_to(&player_at) <= range {
                SimCommand::Fire { unit: enemy }.apply(&mut self.world)?;
            }
        }

        apply_all(
            &mut self.world,
            plan.in_flight
                .iter()
                .map(|&projectile| SimCommand::AdvanceProjectile { projectile })
                .chain(std::iter::once(SimCommand::ReapDestroyed)),
        )?;

        self.post_step.run(&mut self.world);
        Ok(self.match_state())
    }

    /// Check every entity the step will touch, so a failure leaves no
    /// half-applied epoch behind.
    fn plan(&self) -> Result<StepPlan, StepError> {
        let roster = self.world.resource::<UnitRoster>();
        let player = roster.player().ok_or(StepError::NoPlayer)?;
        let enemies = roster.enemies().to_vec();
        let in_flight = self.world.resource::<ProjectileRoster>().entities().to_vec();

        for (role, &unit) in std::iter::once(("player", &player))
            .chain(enemies.iter().map(|unit| ("enemy", unit)))
        {
            read::<UnitId>(&self.world, unit, role)?;
            read::<Position>(&self.world, unit, role)?;
            read::<Orientation>(&self.world, unit, role)?;
            read::<Status>(&self.world, unit, role)?;
            read::<WeaponTarget>(&self.world, unit, role)?;
            read::<LastFired>(&self.world, unit, role)?;
        }
        for &projectile in &in_flight {
            read::<Flight>(&self.world, projectile, "projectile")?;
            read::<Status>(&self.world, projectile, "projectile")?;
            read::<Position>(&self.world, projectile, "projectile")?;
        }

        Ok(StepPlan {
            player,
            enemies,
            in_flight,
        })
    }

    /// Get a snapshot of the current simulation state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_world(&self.world)
    }

    /// Get the snapshot as a JSON string.
    pub fn snapshot_json(&self) -> String {
        self.snapshot().to_json().unwrap_or_else(|_| "{}".to_string())
    }

    /// Epochs completed since the simulation was created.
    pub fn epoch(&self) -> u64 {
        self.world.resource::<Epoch>().0
    }

    pub fn match_state(&self) -> MatchState {
        *self.world.resource::<MatchState>()
    }

    pub fn is_game_over(&self) -> bool {
        self.match_state().is_over()
    }

    pub fn config(&self) -> &SimConfig {
        self.world.resource::<SimConfig>()
    }

    /// Mutable tunables. Changes apply from the next step on.
    pub fn config_mut(&mut self) -> Mut<'_, SimConfig> {
        self.world.resource_mut::<SimConfig>()
    }

    /// The player's entity.
    pub fn player(&self) -> Option<Entity> {
        self.world.resource::<UnitRoster>().player()
    }

    /// The unit at `index` in spawn order (0 is the player).
    pub fn unit(&self, index: usize) -> Option<Entity> {
        self.world.resource::<UnitRoster>().0.get(index).copied()
    }

    /// Get direct access to the ECS world (for advanced usage).
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Get mutable access to the ECS world (for advanced usage).
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}

impl Default for SimWorld {
    fn default() -> Self {
        Self::new()
    }
}
