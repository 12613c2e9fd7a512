//! Cell index for unit lookups.
//!
//! Answers "which unit stands on this cell" in O(1) for moves and projectile
//! hit tests. Cells hold at most one unit: level loading rejects overlapping
//! spawns and Move refuses occupied cells.
//!
//! Destroyed units stay indexed. Their wrecks keep blocking movement; only the
//! hit test filters on `Status`.

use bevy_ecs::prelude::*;
use std::collections::HashMap;

/// Map from integer cell to the unit occupying it.
#[derive(Resource, Debug, Default)]
pub struct UnitCells {
    cells: HashMap<(i32, i32), Entity>,
    /// Reverse lookup: entity to cell.
    entity_cells: HashMap<Entity, (i32, i32)>,
}

impl UnitCells {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place (or move) a unit onto a cell.
    pub fn insert(&mut self, entity: Entity, cell: (i32, i32)) {
        if let Some(old_cell) = self.entity_cells.insert(entity, cell) {
            if old_cell != cell && self.cells.get(&old_cell) == Some(&entity) {
                self.cells.remove(&old_cell);
            }
        }
        self.cells.insert(cell, entity);
    }

    /// The unit on `cell`, alive or not.
    #[inline]
    pub fn unit_at(&self, cell: (i32, i32)) -> Option<Entity> {
        self.cells.get(&cell).copied()
    }

    pub fn is_occupied(&self, cell: (i32, i32)) -> bool {
        self.cells.contains_key(&cell)
    }

    /// Number of indexed units.
    pub fn len(&self) -> usize {
        self.entity_cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entity_cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_lookup() {
        let mut world = World::new();
        let a = world.spawn_empty().id();
        let b = world.spawn_empty().id();

        let mut cells = UnitCells::new();
        cells.insert(a, (1, 2));
        cells.insert(b, (3, 3));

        assert_eq!(cells.unit_at((1, 2)), Some(a));
        assert_eq!(cells.unit_at((3, 3)), Some(b));
        assert_eq!(cells.unit_at((0, 0)), None);
        assert_eq!(cells.len(), 2);
    }

    #[test]
    fn test_move_frees_old_cell() {
        let mut world = World::new();
        let a = world.spawn_empty().id();

        let mut cells = UnitCells::new();
        cells.insert(a, (1, 1));
        cells.insert(a, (2, 1));

        assert!(!cells.is_occupied((1, 1)));
        assert_eq!(cells.unit_at((2, 1)), Some(a));
        assert_eq!(cells.len(), 1);
    }

    #[test]
    fn test_new_index_is_empty() {
        let cells = UnitCells::new();
        assert!(cells.is_empty());
        assert!(!cells.is_occupied((4, 0)));
    }
}
