//! Runeforge - runeword crafting engine
//!
//! Picks bases from inventory and stash, reconciles their sockets with a
//! recipe and drives the game through every click needed to finish the
//! runeword, leaving the cursor empty and the menus closed whatever happens.

pub mod config;
pub mod crafting;
pub mod data;
pub mod items;
pub mod session;
pub mod sim;

// Re-export commonly used types
pub use config::CharacterConfig;
pub use crafting::{make_runewords, CraftError, CraftReport};
pub use data::{Catalogue, DataManager, Recipe};
pub use session::{EngineDeps, IoDriver, SnapshotProvider};
