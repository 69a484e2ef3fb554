//! Game session surface
//!
//! The snapshot provider and the I/O driver are owned by the bot; the engine
//! borrows both through [`EngineDeps`].

pub mod deps;
pub mod driver;
pub mod snapshot;

pub use deps::{EngineDeps, Refresh};
pub use driver::{DriverError, IoDriver, Modifier, MouseButton, ScreenPoint};
pub use snapshot::{BaseStats, OpenMenus, Snapshot, SnapshotProvider};
