//! Player input for one step.

use crate::components::{Offset, Position};
use serde::{Deserialize, Serialize};

/// What the player asked for this epoch.
///
/// `move_vector` components are in {-1, 0, 1}; a zero vector means no move.
/// `aim_point` is in aim coordinates (integer values are cell centers).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerIntent {
    pub move_vector: Offset,
    pub aim_point: Position,
    pub fire: bool,
}

impl PlayerIntent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn moving(mut self, dx: f32, dy: f32) -> Self {
        self.move_vector = Offset::new(dx, dy);
        self
    }

    pub fn aiming_at(mut self, aim_point: Position) -> Self {
        self.aim_point = aim_point;
        self
    }

    pub fn firing(mut self) -> Self {
        self.fire = true;
        self
    }

    /// Convert a pointer position in pixels to an aim point.
    pub fn aim_from_pixels(px: f32, py: f32, cell_size: (u32, u32)) -> Position {
        let (cell_w, cell_h) = cell_size;
        Position::new(
            px / cell_w.max(1) as f32 - 0.5,
            py / cell_h.max(1) as f32 - 0.5,
        )
    }

    pub fn wants_move(&self) -> bool {
        !self.move_vector.is_zero()
    }
}
