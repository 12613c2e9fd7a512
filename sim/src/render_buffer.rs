//! Flat render buffer.
//!
//! Converts a [`Snapshot`] into one contiguous `Vec<f32>` for renderer hosts
//! that would rather index into an array than parse JSON.
//!
//! # Buffer Layout
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │ HEADER (2 elements)                                             │
//! │   [0] unit_count        [1] projectile_count                    │
//! ├─────────────────────────────────────────────────────────────────┤
//! │ UNIT DATA (unit_count × UNIT_STRIDE elements)                   │
//! │ For each unit i (offset = HEADER_SIZE + i * UNIT_STRIDE):       │
//! │   [+0] id           [+1] x            [+2] y                    │
//! │   [+3] orientation  [+4] is_alive     [+5] is_player            │
//! │   [+6] target_x     [+7] target_y                               │
//! ├─────────────────────────────────────────────────────────────────┤
//! │ PROJECTILE DATA (projectile_count × PROJECTILE_STRIDE elements) │
//! │ For each projectile j                                           │
//! │ (offset = projectile_offset(unit_count, j)):                    │
//! │   [+0] id           [+1] owner id     [+2] x        [+3] y      │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Flags are 1.0 for true and 0.0 for false. Units and projectiles keep
//! snapshot order, so equal snapshots give equal buffers.

use crate::world::Snapshot;

/// Number of f32 values in the buffer header.
pub const HEADER_SIZE: usize = 2;

/// Number of f32 values per unit.
pub const UNIT_STRIDE: usize = 8;

/// Number of f32 values per projectile.
pub const PROJECTILE_STRIDE: usize = 4;

pub const UNIT_FIELD_ID: usize = 0;
pub const UNIT_FIELD_X: usize = 1;
pub const UNIT_FIELD_Y: usize = 2;
pub const UNIT_FIELD_ORIENTATION: usize = 3;
pub const UNIT_FIELD_IS_ALIVE: usize = 4;
pub const UNIT_FIELD_IS_PLAYER: usize = 5;
pub const UNIT_FIELD_TARGET_X: usize = 6;
pub const UNIT_FIELD_TARGET_Y: usize = 7;

pub const PROJECTILE_FIELD_ID: usize = 0;
pub const PROJECTILE_FIELD_OWNER: usize = 1;
pub const PROJECTILE_FIELD_X: usize = 2;
pub const PROJECTILE_FIELD_Y: usize = 3;

#[inline]
fn flag(value: bool) -> f32 {
    if value {
        1.0
    } else {
        0.0
    }
}

/// Encode `snapshot` as a flat buffer. See the module docs for the layout.
pub fn snapshot_to_buffer(snapshot: &Snapshot) -> Vec<f32> {
    let buffer_size = calculate_buffer_size(snapshot.units.len(), snapshot.projectiles.len());
    let mut buffer = Vec::with_capacity(buffer_size);

    buffer.push(snapshot.units.len() as f32);
    buffer.push(snapshot.projectiles.len() as f32);

    for unit in &snapshot.units {
        buffer.extend_from_slice(&[
            unit.id as f32,
            unit.x,
            unit.y,
            unit.orientation,
            flag(unit.alive),
            flag(unit.is_player),
            unit.target_x,
            unit.target_y,
        ]);
    }
    for projectile in &snapshot.projectiles {
        buffer.extend_from_slice(&[
            projectile.id as f32,
            projectile.owner as f32,
            projectile.x,
            projectile.y,
        ]);
    }

    debug_assert_eq!(buffer.len(), buffer_size, "Buffer size mismatch");
    buffer
}

/// `HEADER_SIZE + units * UNIT_STRIDE + projectiles * PROJECTILE_STRIDE`
#[inline]
pub const fn calculate_buffer_size(unit_count: usize, projectile_count: usize) -> usize {
    HEADER_SIZE + unit_count * UNIT_STRIDE + projectile_count * PROJECTILE_STRIDE
}

/// Read `(unit_count, projectile_count)` from a buffer header.
///
/// Returns `None` if the buffer is shorter than the header.
pub fn parse_counts(buffer: &[f32]) -> Option<(usize, usize)> {
    match buffer {
        [units, projectiles, ..] => Some((*units as usize, *projectiles as usize)),
        _ => None,
    }
}

#[inline]
pub const fn unit_offset(unit_index: usize) -> usize {
    HEADER_SIZE + unit_index * UNIT_STRIDE
}

#[inline]
pub const fn projectile_offset(unit_count: usize, projectile_index: usize) -> usize {
    unit_offset(unit_count) + projectile_index * PROJECTILE_STRIDE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::SimWorld;
    use crate::commands::test_support::descriptor_from_ascii;
    use crate::components::{Orientation, Position};
    use crate::config::SimConfig;
    use crate::intent::PlayerIntent;

    fn sim(ascii: &str) -> SimWorld {
        let mut sim = SimWorld::with_config(SimConfig {
            fire_cooldown_epochs: 1,
            ..Default::default()
        });
        sim.load_level(&descriptor_from_ascii(ascii)).unwrap();
        sim
    }

    #[test]
    fn test_buffer_of_empty_level() {
        let sim = SimWorld::new();
        let buffer = snapshot_to_buffer(&sim.snapshot());

        assert_eq!(parse_counts(&buffer), Some((1, 0)));
        assert_eq!(buffer.len(), calculate_buffer_size(1, 0));
        let offset = unit_offset(0);
        assert_eq!(buffer[offset + UNIT_FIELD_X], 8.0);
        assert_eq!(buffer[offset + UNIT_FIELD_Y], 9.0);
        assert_eq!(buffer[offset + UNIT_FIELD_ORIENTATION], Orientation::RIGHT.0);
        assert_eq!(buffer[offset + UNIT_FIELD_IS_PLAYER], 1.0);
    }

    #[test]
    fn test_buffer_with_projectiles() {
        let mut sim = sim("P....E");
        let intent = PlayerIntent::new()
            .aiming_at(Position::new(5.0, 0.0))
            .firing();
        sim.step(&intent).unwrap();

        let buffer = snapshot_to_buffer(&sim.snapshot());
        let (units, projectiles) = parse_counts(&buffer).unwrap();
        assert_eq!((units, projectiles), (2, 1));
        assert_eq!(buffer.len(), calculate_buffer_size(units, projectiles));

        let enemy = unit_offset(1);
        assert_eq!(buffer[enemy + UNIT_FIELD_ID], 1.0);
        assert_eq!(buffer[enemy + UNIT_FIELD_IS_PLAYER], 0.0);
        assert_eq!(buffer[enemy + UNIT_FIELD_IS_ALIVE], 1.0);
        assert_eq!(buffer[enemy + UNIT_FIELD_TARGET_X], 0.0);

        let shot = projectile_offset(units, 0);
        assert_eq!(buffer[shot + PROJECTILE_FIELD_OWNER], 0.0);
        assert_eq!(buffer[shot + PROJECTILE_FIELD_X], 0.0);
        assert_eq!(buffer[shot + PROJECTILE_FIELD_Y], 0.0);
    }

    #[test]
    fn test_buffer_determinism() {
        let mut a = sim("P..E\n....");
        let mut b = sim("P..E\n....");
        let intent = PlayerIntent::new().moving(0.0, 1.0);
        a.step(&intent).unwrap();
        b.step(&intent).unwrap();
        assert_eq!(
            snapshot_to_buffer(&a.snapshot()),
            snapshot_to_buffer(&b.snapshot())
        );
    }

    #[test]
    fn test_parse_counts_needs_header() {
        assert_eq!(parse_counts(&[]), None);
        assert_eq!(parse_counts(&[3.0]), None);
        assert_eq!(parse_counts(&[3.0, 0.0]), Some((3, 0)));
    }

    #[test]
    fn test_offsets() {
        assert_eq!(unit_offset(0), HEADER_SIZE);
        assert_eq!(projectile_offset(2, 0), HEADER_SIZE + 2 * UNIT_STRIDE);
        assert_eq!(
            projectile_offset(2, 3),
            HEADER_SIZE + 2 * UNIT_STRIDE + 3 * PROJECTILE_STRIDE
        );
        assert_eq!(UNIT_STRIDE, UNIT_FIELD_TARGET_Y + 1);
        assert_eq!(PROJECTILE_STRIDE, PROJECTILE_FIELD_Y + 1);
    }
}
