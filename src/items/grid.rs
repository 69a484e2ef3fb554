//! Grid occupancy for the player inventory
//!
//! Items occupy `width x height` cells from their origin. The grid is rebuilt
//! from a snapshot whenever the engine needs to park an item, so it never
//! outlives a refresh.

use serde::{Deserialize, Serialize};

use super::item::{Cell, Item, UnitId, Zone};

/// Inventory dimensions
pub const INVENTORY_WIDTH: usize = 10;
pub const INVENTORY_HEIGHT: usize = 4;

/// Per-cell reservation mask from the character config
///
/// Rows of `0|1`; a `0` marks a cell the engine must never place items in.
/// Cells outside the mask are free to use.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InventoryLock(pub Vec<Vec<u8>>);

impl InventoryLock {
    /// A mask reserving nothing
    pub fn none() -> Self {
        Self(Vec::new())
    }

    pub fn is_reserved(&self, x: usize, y: usize) -> bool {
        self.0
            .get(y)
            .and_then(|row| row.get(x))
            .is_some_and(|v| *v == 0)
    }
}

/// Occupancy matrix of a grid zone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryGrid {
    width: usize,
    height: usize,
    /// Each cell holds the id of the item covering it
    cells: Vec<Vec<Option<UnitId>>>,
}

impl InventoryGrid {
    /// Create an empty grid
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![vec![None; width]; height],
        }
    }

    /// Build the inventory matrix from the items that live in the inventory
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a Item>) -> Self {
        let mut grid = Self::new(INVENTORY_WIDTH, INVENTORY_HEIGHT);
        for item in items.into_iter().filter(|i| i.location.zone == Zone::Inventory) {
            grid.occupy(item);
        }
        grid
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Mark the cells under an item as occupied (clipped to the grid)
    pub fn occupy(&mut self, item: &Item) {
        let origin = item.location.cell;
        for dy in 0..item.size.1 as usize {
            for dx in 0..item.size.0 as usize {
                let (x, y) = (origin.x as usize + dx, origin.y as usize + dy);
                if x < self.width && y < self.height {
                    self.cells[y][x] = Some(item.id);
                }
            }
        }
    }

    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        self.cells
            .get(y)
            .and_then(|row| row.get(x))
            .is_some_and(|c| c.is_some())
    }

    /// Item covering a cell
    pub fn get_at(&self, x: usize, y: usize) -> Option<UnitId> {
        self.cells.get(y).and_then(|row| row.get(x)).copied().flatten()
    }

    /// Check whether a `width x height` rectangle at `(x, y)` is free and unlocked
    pub fn can_place_at(&self, x: usize, y: usize, width: usize, height: usize, lock: &InventoryLock) -> bool {
        if x + width > self.width || y + height > self.height {
            return false;
        }
        for dy in 0..height {
            for dx in 0..width {
                if self.is_occupied(x + dx, y + dy) || lock.is_reserved(x + dx, y + dy) {
                    return false;
                }
            }
        }
        true
    }

    /// First origin (top-to-bottom, left-to-right) where the rectangle fits
    pub fn find_free_cell(&self, width: usize, height: usize, lock: &InventoryLock) -> Option<Cell> {
        if width == 0 || height == 0 {
            return None;
        }
        for y in 0..self.height {
            for x in 0..self.width {
                if self.can_place_at(x, y, width, height, lock) {
                    return Some(Cell::new(x as u8, y as u8));
                }
            }
        }
        None
    }

}

/// Find the first free inventory origin for an item footprint
pub fn find_free_cell(grid: &InventoryGrid, size: (u8, u8), lock: &InventoryLock) -> Option<Cell> {
    grid.find_free_cell(size.0 as usize, size.1 as usize, lock)
}
