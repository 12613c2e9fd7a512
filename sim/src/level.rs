//! Level data: grid dimensions, tile layers, unit list, and the JSON level
//! descriptor they are loaded from.
//!
//! The descriptor format is the one the level editor writes:
//!
//! ```json
//! {
//!   "width": 16, "height": 10, "CellSize": [64, 64],
//!   "ground": [[[5, 1], ...], ...],
//!   "walls":  [[null, [1, 3], ...], ...],
//!   "units":  [{ "position": [8, 9], "direction": [1, 0] }, ...]
//! }
//! ```
//!
//! Tile references are `[column, row]` pairs into the renderer's tile sheet;
//! the simulation only cares whether a wall cell is present.

use crate::components::{Offset, Position};
use crate::config::SimConfig;
use crate::error::LevelLoadError;
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

// ============================================================================
// DESCRIPTOR
// ============================================================================

/// Reference to a tile in the tile sheet (`[column, row]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileRef(pub u32, pub u32);

/// Spawn point of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitSpawn {
    pub position: [f32; 2],
    #[serde(rename = "direction", alias = "facing")]
    pub facing: [f32; 2],
}

/// A level as read from disk. Unit 0 is the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDescriptor {
    pub width: u32,
    pub height: u32,
    #[serde(rename = "CellSize", alias = "cell_size")]
    pub cell_size: (u32, u32),
    pub ground: Vec<Vec<TileRef>>,
    pub walls: Vec<Vec<Option<TileRef>>>,
    pub units: Vec<UnitSpawn>,
}

impl LevelDescriptor {
    /// The built-in "empty level": open ground, no walls, and a lone player
    /// at the bottom center facing right.
    pub fn empty(config: &SimConfig) -> Self {
        let (width, height) = config.default_world_size;
        let (width, height) = (width.max(1), height.max(1));
        Self {
            width,
            height,
            cell_size: config.default_cell_size,
            ground: vec![vec![TileRef(5, 1); width as usize]; height as usize],
            walls: vec![vec![None; width as usize]; height as usize],
            units: vec![UnitSpawn {
                position: [(width / 2) as f32, (height - 1) as f32],
                facing: [1.0, 0.0],
            }],
        }
    }

    /// Parse and validate a descriptor from JSON.
    pub fn from_json_str(data: &str) -> Result<Self, LevelLoadError> {
        let descriptor: LevelDescriptor = serde_json::from_str(data)?;
        descriptor.validate()?;
        Ok(descriptor)
    }

    /// Read, parse and validate a descriptor file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LevelLoadError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                LevelLoadError::NotFound(path.to_path_buf())
            } else {
                LevelLoadError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        Self::from_json_str(&data)
    }

    /// Check dimensions, layer shapes and unit placement.
    pub fn validate(&self) -> Result<(), LevelLoadError> {
        if self.width == 0 || self.height == 0 {
            return Err(malformed(format!(
                "grid must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if self.cell_size.0 == 0 || self.cell_size.1 == 0 {
            return Err(malformed(format!(
                "cell size must be positive, got {:?}",
                self.cell_size
            )));
        }
        check_layer_shape("ground", &self.ground, self.width, self.height)?;
        check_layer_shape("walls", &self.walls, self.width, self.height)?;

        if self.units.is_empty() {
            return Err(malformed("level has no units; unit 0 must be the player"));
        }

        let grid = WorldGrid::new(self.width, self.height, self.cell_size);
        let mut occupied = HashSet::new();
        for (index, spawn) in self.units.iter().enumerate() {
            let position = Position::from(spawn.position);
            if !grid.contains(&position) {
                return Err(malformed(format!(
                    "unit {index} at {:?} is outside the {}x{} grid",
                    spawn.position, self.width, self.height
                )));
            }
            let cell = position.cell();
            if self.walls[cell.1 as usize][cell.0 as usize].is_some() {
                return Err(malformed(format!("unit {index} spawns on a wall at {cell:?}")));
            }
            if !occupied.insert(cell) {
                return Err(malformed(format!(
                    "unit {index} spawns on an occupied cell {cell:?}"
                )));
            }
        }
        Ok(())
    }
}

fn malformed(reason: impl Into<String>) -> LevelLoadError {
    LevelLoadError::Malformed(reason.into())
}

fn check_layer_shape<T>(
    name: &str,
    layer: &[Vec<T>],
    width: u32,
    height: u32,
) -> Result<(), LevelLoadError> {
    if layer.len() != height as usize {
        return Err(malformed(format!(
            "{name} layer has {} rows, expected {height}",
            layer.len()
        )));
    }
    if let Some((row, cells)) = layer
        .iter()
        .enumerate()
        .find(|(_, cells)| cells.len() != width as usize)
    {
        return Err(malformed(format!(
            "{name} layer row {row} has {} cells, expected {width}",
            cells.len()
        )));
    }
    Ok(())
}

// ============================================================================
// RESOURCES
// ============================================================================

/// Grid dimensions and cell size of the loaded level.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldGrid {
    pub width: u32,
    pub height: u32,
    /// Cell size in pixels, for renderers and pointer conversion.
    pub cell_size: (u32, u32),
}

impl WorldGrid {
    pub fn new(width: u32, height: u32, cell_size: (u32, u32)) -> Self {
        Self {
            width,
            height,
            cell_size,
        }
    }

    /// Whether `position` lies in `[0, width) x [0, height)`.
    pub fn contains(&self, position: &Position) -> bool {
        position.x >= 0.0
            && position.x < self.width as f32
            && position.y >= 0.0
            && position.y < self.height as f32
    }
}

/// Ground and wall layers, row-major (`layer[y][x]`).
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct TileLayers {
    pub ground: Vec<Vec<TileRef>>,
    pub walls: Vec<Vec<Option<TileRef>>>,
}

impl TileLayers {
    /// Whether a wall occupies `cell`. Cells outside the layer are open.
    pub fn is_wall(&self, cell: (i32, i32)) -> bool {
        let (x, y) = cell;
        if x < 0 || y < 0 {
            return false;
        }
        self.walls
            .get(y as usize)
            .and_then(|row| row.get(x as usize))
            .is_some_and(|tile| tile.is_some())
    }
}

/// Units of the loaded level in descriptor order. Index 0 is the player.
#[derive(Resource, Debug, Clone, Default)]
pub struct UnitRoster(pub Vec<Entity>);

impl UnitRoster {
    pub fn player(&self) -> Option<Entity> {
        self.0.first().copied()
    }

    /// Every unit except the player.
    pub fn enemies(&self) -> &[Entity] {
        self.0.get(1..).unwrap_or(&[])
    }
}

/// Initial facing of a spawn, as a move vector.
pub(crate) fn spawn_heading(spawn: &UnitSpawn) -> Offset {
    Offset::from(spawn.facing)
}
