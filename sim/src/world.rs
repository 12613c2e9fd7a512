//! Read-only snapshot of the simulation state.
//!
//! The `Snapshot` struct is a serializable copy of everything a renderer
//! needs, taken between steps.

use crate::commands::ProjectileRoster;
use crate::components::*;
use crate::epoch::{Epoch, MatchState};
use crate::level::{TileLayers, TileRef, UnitRoster, WorldGrid};
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Snapshot of a single unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitSnapshot {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    /// Facing in degrees (0 = up, 90 = left, -90 = right, 180 = down).
    pub orientation: f32,
    pub alive: bool,
    pub is_player: bool,
    pub target_x: f32,
    pub target_y: f32,
}

/// Snapshot of a projectile in flight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSnapshot {
    pub id: u64,
    pub owner: u32,
    pub start: Position,
    pub end: Position,
    pub x: f32,
    pub y: f32,
}

/// Complete simulation state snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Epochs completed since the session began.
    pub epoch: u64,
    pub state: MatchState,
    pub game_over: bool,
    pub width: u32,
    pub height: u32,
    pub cell_size: (u32, u32),
    pub ground: Vec<Vec<TileRef>>,
    pub walls: Vec<Vec<Option<TileRef>>>,
    /// Units in roster order, player first. Destroyed units are included.
    pub units: Vec<UnitSnapshot>,
    /// Projectiles in firing order.
    pub projectiles: Vec<ProjectileSnapshot>,
}

impl Snapshot {
    /// Create a snapshot from the ECS world.
    pub fn from_world(world: &World) -> Self {
        let state = world.get_resource::<MatchState>().copied().unwrap_or_default();
        let mut snapshot = Self {
            epoch: world.get_resource::<Epoch>().map_or(0, |e| e.0),
            state,
            game_over: state.is_over(),
            ..Default::default()
        };

        if let Some(grid) = world.get_resource::<WorldGrid>() {
            snapshot.width = grid.width;
            snapshot.height = grid.height;
            snapshot.cell_size = grid.cell_size;
        }
        if let Some(layers) = world.get_resource::<TileLayers>() {
            snapshot.ground = layers.ground.clone();
            snapshot.walls = layers.walls.clone();
        }

        if let Some(roster) = world.get_resource::<UnitRoster>() {
            snapshot.units = roster
                .0
                .iter()
                .filter_map(|&unit| unit_snapshot(world, unit))
                .collect();
        }
        if let Some(roster) = world.get_resource::<ProjectileRoster>() {
            snapshot.projectiles = roster
                .entities()
                .iter()
                .filter_map(|&projectile| projectile_snapshot(world, projectile))
                .collect();
        }

        snapshot
    }

    pub fn player(&self) -> Option<&UnitSnapshot> {
        self.units.iter().find(|unit| unit.is_player)
    }

    /// Serialize snapshot to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize snapshot to pretty JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn unit_snapshot(world: &World, unit: Entity) -> Option<UnitSnapshot> {
    let id = world.get::<UnitId>(unit)?;
    let position = world.get::<Position>(unit)?;
    let orientation = world.get::<Orientation>(unit)?;
    let status = world.get::<Status>(unit)?;
    let target = world.get::<WeaponTarget>(unit)?;
    Some(UnitSnapshot {
        id: id.0,
        x: position.x,
        y: position.y,
        orientation: orientation.0,
        alive: status.is_alive(),
        is_player: world.get::<Player>(unit).is_some(),
        target_x: target.0.x,
        target_y: target.0.y,
    })
}

fn projectile_snapshot(world: &World, projectile: Entity) -> Option<ProjectileSnapshot> {
    let id = world.get::<ProjectileId>(projectile)?;
    let flight = world.get::<Flight>(projectile)?;
    let position = world.get::<Position>(projectile)?;
    let owner = world.get::<UnitId>(flight.owner)?;
    Some(ProjectileSnapshot {
        id: id.0,
        owner: owner.0,
        start: flight.start,
        end: flight.end,
        x: position.x,
        y: position.y,
    })
}
