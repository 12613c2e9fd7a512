//! Tank Battlegrounds - Simulation Core
//!
//! A deterministic, turn-synchronous grid combat simulation: one player tank
//! against enemy tanks on a tile grid, advanced one epoch per call.
//! Uses `bevy_ecs` for the entity-component-system architecture.

pub mod api;
pub mod commands;
pub mod components;
pub mod config;
pub mod epoch;
pub mod error;
pub mod intent;
pub mod level;
pub mod observer;
pub mod render_buffer;
pub mod session;
pub mod spatial;
pub mod world;

pub use api::SimWorld;
pub use commands::{SimCommand, LoadLevel, ProjectileRoster};
pub use components::*;
pub use config::SimConfig;
pub use epoch::{Epoch, MatchState};
pub use error::{LevelLoadError, StepError};
pub use intent::PlayerIntent;
pub use level::{LevelDescriptor, TileRef, UnitSpawn};
pub use observer::{EventLog, SimEvent, SimObserver, UnitView};
pub use session::{GameSession, Mode};
pub use world::{ProjectileSnapshot, Snapshot, UnitSnapshot};
