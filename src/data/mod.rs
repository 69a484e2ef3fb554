//! Data loading and external game content
//!
//! The runeword catalogue is static data: hardcoded defaults that an external
//! RON file may replace.

pub mod loader;
pub mod runewords;

pub use loader::{export_default_data, DataManager, DATA_DIR};
pub use runewords::{category, default_catalogue, Catalogue, Recipe};
