//! Item system

pub mod grid;
pub mod inventory;
pub mod item;

pub use grid::{find_free_cell, InventoryGrid, InventoryLock, INVENTORY_HEIGHT, INVENTORY_WIDTH};
pub use inventory::{InventoryView, RuneBudget};
pub use item::{
    normalize_base_name, BodySlot, Cell, Item, Location, Quality, StatKind, Tier, UnitId, Zone,
    RUNE_CATEGORY, UNSOCKET_REAGENT,
};
