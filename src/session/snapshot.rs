//! World snapshot consumed by the engine
//!
//! A separate reader produces snapshots of the game; the engine only ever
//! looks at the last one it asked for, and asks again after every effect.

use serde::{Deserialize, Serialize};

use crate::items::Item;

/// Menus the player can have open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OpenMenus {
    pub stash: bool,
    pub inventory: bool,
    pub character: bool,
    pub cube: bool,
}

impl OpenMenus {
    pub fn any(&self) -> bool {
        self.stash || self.inventory || self.character || self.cube
    }
}

/// Unmodified character attributes (no gear bonuses)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BaseStats {
    pub strength: u32,
    pub dexterity: u32,
}

/// Everything the engine reads about the game at one instant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    /// Top-level items in every zone (socketed items hang off their parent)
    pub items: Vec<Item>,
    pub base_stats: BaseStats,
    pub open_menus: OpenMenus,
}

/// Refreshable view of the game
pub trait SnapshotProvider {
    /// Re-read everything (items, player, menus)
    fn refresh_all(&mut self);

    /// Re-read items only; cheaper, used while polling after clicks
    fn refresh_inventory(&mut self);

    /// The most recently read snapshot
    fn snapshot(&self) -> &Snapshot;
}
