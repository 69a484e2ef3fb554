//! Input/output driver consumed by the engine
//!
//! The driver turns item positions into screen coordinates, clicks, presses
//! keys and waits for the game to catch up. The engine never reasons in
//! pixels.

use thiserror::Error;

use crate::items::{Cell, Item, Zone};

/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
}

/// Keys held while clicking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    /// Ctrl+click moves a stash item to the inventory
    Ctrl,
}

/// A point on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

impl ScreenPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Failures reported by the driver
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DriverError {
    #[error("{0} did not open")]
    MenuDidNotOpen(&'static str),
    #[error("unsocket failed: {0}")]
    Unsocket(String),
}

/// Low-level game control
pub trait IoDriver {
    fn open_stash(&mut self) -> Result<(), DriverError>;

    fn open_inventory(&mut self) -> Result<(), DriverError>;

    /// Switch to a stash tab (1 = personal, 2..=4 = shared pages)
    fn switch_stash_tab(&mut self, tab: u8);

    fn close_all_menus(&mut self);

    fn click(&mut self, button: MouseButton, at: ScreenPoint);

    fn click_with_modifier(&mut self, button: MouseButton, at: ScreenPoint, modifier: Modifier);

    fn screen_coords_for_item(&self, item: &Item) -> ScreenPoint;

    fn screen_coords_for_cell(&self, cell: Cell, zone: Zone) -> ScreenPoint;

    /// Drop whatever is on the cursor and pick it back up into the inventory
    fn drop_and_recover_cursor_item(&mut self);

    /// Clear every socket of `item` with a `HelRune` and a scroll
    ///
    /// `context` only labels the driver's own logging.
    fn unsocket_with_hel_and_scroll(&mut self, item: &Item, context: &str) -> Result<(), DriverError>;

    /// Cooperative delay letting the game process the last effect
    fn sleep(&mut self, ms: u64);
}
