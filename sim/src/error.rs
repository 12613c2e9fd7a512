//! Error types for level loading and simulation steps.
//!
//! Gameplay rejections (moving into a wall, firing during cooldown, a dead
//! unit acting) are silent no-ops and never show up here.

use bevy_ecs::entity::Entity;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to load a level descriptor. The previously loaded level is left
/// untouched.
#[derive(Debug, Error)]
pub enum LevelLoadError {
    #[error("level descriptor not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read level descriptor {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed level descriptor: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for LevelLoadError {
    fn from(err: serde_json::Error) -> Self {
        LevelLoadError::Malformed(err.to_string())
    }
}

/// Failure of a simulation step. Reported before any command is applied, so
/// the world stays continuable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StepError {
    #[error("level has no player unit")]
    NoPlayer,
    #[error("{role} entity {entity:?} is missing or incomplete")]
    MissingEntity { entity: Entity, role: &'static str },
}
