//! ECS Components for the Tank Battlegrounds simulation.
//!
//! Components are pure data containers attached to entities.
//! All game logic lives in the commands that read and write them.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

// ============================================================================
// SPATIAL COMPONENTS
// ============================================================================

/// 2D position in grid coordinates (x = column, y = row).
///
/// Integer coordinates name cell centers. Sub-cell values are permitted but
/// every collision test is quantized to the truncated cell.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Integer-truncated cell containing this position.
    #[inline]
    pub fn cell(&self) -> (i32, i32) {
        (self.x.trunc() as i32, self.y.trunc() as i32)
    }

    /// The center of the cell containing this position.
    pub fn cell_center(&self) -> Position {
        Position::new(self.x.trunc(), self.y.trunc())
    }

    pub fn offset(&self, by: Offset) -> Position {
        Position::new(self.x + by.dx, self.y + by.dy)
    }

    /// Displacement from `self` to `other`.
    pub fn offset_to(&self, other: &Position) -> Offset {
        Offset::new(other.x - self.x, other.y - self.y)
    }
}

impl From<[f32; 2]> for Position {
    fn from(v: [f32; 2]) -> Self {
        Self::new(v[0], v[1])
    }
}

/// 2D displacement (move vectors, projectile headings).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    pub dx: f32,
    pub dy: f32,
}

impl Offset {
    pub const ZERO: Offset = Offset { dx: 0.0, dy: 0.0 };

    pub fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }

    pub fn magnitude(&self) -> f32 {
        (self.dx * self.dx + self.dy * self.dy).sqrt()
    }

    pub fn is_zero(&self) -> bool {
        self.dx == 0.0 && self.dy == 0.0
    }

    /// Unit vector in the same direction, or `None` for a (near) zero vector.
    pub fn normalized(&self) -> Option<Self> {
        let mag = self.magnitude();
        if !mag.is_finite() || mag < 0.0001 {
            None
        } else {
            Some(Self {
                dx: self.dx / mag,
                dy: self.dy / mag,
            })
        }
    }

    pub fn scaled(&self, factor: f32) -> Self {
        Self::new(self.dx * factor, self.dy * factor)
    }
}

impl From<[f32; 2]> for Offset {
    fn from(v: [f32; 2]) -> Self {
        Self::new(v[0], v[1])
    }
}

/// Facing angle in degrees. 0 = up, 90 = left, -90 = right, 180 = down.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Orientation(pub f32);

impl Orientation {
    pub const UP: Orientation = Orientation(0.0);
    pub const LEFT: Orientation = Orientation(90.0);
    pub const RIGHT: Orientation = Orientation(-90.0);
    pub const DOWN: Orientation = Orientation(180.0);

    /// Facing implied by a move vector.
    ///
    /// Horizontal is checked first and vertical second, so a diagonal input
    /// ends up facing vertically. A zero vector gives `None`.
    pub fn from_heading(heading: Offset) -> Option<Self> {
        let mut facing = None;
        if heading.dx < 0.0 {
            facing = Some(Self::LEFT);
        } else if heading.dx > 0.0 {
            facing = Some(Self::RIGHT);
        }
        if heading.dy < 0.0 {
            facing = Some(Self::UP);
        } else if heading.dy > 0.0 {
            facing = Some(Self::DOWN);
        }
        facing
    }
}

// ============================================================================
// IDENTITY COMPONENTS
// ============================================================================

/// Identifier for a unit, equal to its index in the level's unit list.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitId(pub u32);

/// Identifier for a projectile, unique for the lifetime of a `SimWorld`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectileId(pub u64);

/// Marker for the player-controlled unit (index 0 of the unit list).
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;

/// Marker for tank units.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Unit;

// ============================================================================
// COMBAT COMPONENTS
// ============================================================================

/// Lifecycle status shared by units and projectiles.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Alive,
    Destroyed,
}

impl Status {
    pub fn is_alive(&self) -> bool {
        matches!(self, Status::Alive)
    }
}

/// Aim point of a unit's weapon, in grid coordinates.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WeaponTarget(pub Position);

/// Epoch of the unit's last shot. `None` until the first shot, so the first
/// shot is never held back by the cooldown.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastFired(pub Option<u64>);

impl LastFired {
    /// Whether `cooldown` epochs have elapsed since the last shot.
    pub fn ready(&self, epoch: u64, cooldown: u64) -> bool {
        match self.0 {
            None => true,
            Some(last) => epoch.saturating_sub(last) >= cooldown,
        }
    }
}

/// Flight data of a projectile. The owner is only used to exclude self-hits.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Flight {
    pub owner: Entity,
    pub start: Position,
    pub end: Position,
    /// Epochs flown so far. The position after `n` advances is
    /// `start + heading * speed * n`, never an accumulated sum.
    pub advances: u32,
}

// ============================================================================
// BUNDLES
// ============================================================================

/// Bundle for spawning a unit.
#[derive(Bundle)]
pub struct UnitBundle {
    pub unit: Unit,
    pub id: UnitId,
    pub position: Position,
    pub orientation: Orientation,
    pub status: Status,
    pub target: WeaponTarget,
    pub last_fired: LastFired,
}

impl UnitBundle {
    pub fn new(id: u32, position: Position, orientation: Orientation) -> Self {
        Self {
            unit: Unit,
            id: UnitId(id),
            position,
            orientation,
            status: Status::Alive,
            target: WeaponTarget::default(),
            last_fired: LastFired::default(),
        }
    }
}

/// Bundle for spawning a projectile.
#[derive(Bundle)]
pub struct ProjectileBundle {
    pub id: ProjectileId,
    pub flight: Flight,
    pub position: Position,
    pub status: Status,
}

impl ProjectileBundle {
    pub fn new(id: u64, owner: Entity, start: Position, end: Position) -> Self {
        Self {
            id: ProjectileId(id),
            flight: Flight {
                owner,
                start,
                end,
                advances: 0,
            },
            position: start,
            status: Status::Alive,
        }
    }
}
