//! Explicit dependencies threaded through selection and crafting

use crate::config::CharacterConfig;
use crate::data::Catalogue;
use crate::items::{InventoryView, Item, UnitId};

use super::driver::IoDriver;
use super::snapshot::SnapshotProvider;

/// How much of the snapshot to re-read after an effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    All,
    Inventory,
}

/// Everything the engine talks to
pub struct EngineDeps<'a> {
    pub world: &'a mut dyn SnapshotProvider,
    pub driver: &'a mut dyn IoDriver,
    pub config: &'a CharacterConfig,
    pub catalogue: &'a Catalogue,
}

impl<'a> EngineDeps<'a> {
    pub fn new(
        world: &'a mut dyn SnapshotProvider,
        driver: &'a mut dyn IoDriver,
        config: &'a CharacterConfig,
        catalogue: &'a Catalogue,
    ) -> Self {
        Self { world, driver, config, catalogue }
    }

    /// View over the last snapshot
    pub fn view(&self) -> InventoryView<'_> {
        InventoryView::new(self.world.snapshot())
    }

    pub fn refresh(&mut self, refresh: Refresh) {
        match refresh {
            Refresh::All => self.world.refresh_all(),
            Refresh::Inventory => self.world.refresh_inventory(),
        }
    }

    /// Run an effect, let the game settle, refresh and re-resolve `id`
    ///
    /// Every item-moving call goes through here so no effect is ever
    /// followed by a read of stale data.
    pub fn perform<F>(&mut self, settle_ms: u64, refresh: Refresh, id: UnitId, effect: F) -> Option<Item>
    where
        F: FnOnce(&mut dyn IoDriver),
    {
        effect(&mut *self.driver);
        if settle_ms > 0 {
            self.driver.sleep(settle_ms);
        }
        self.refresh(refresh);
        self.view().find_by_id(id).cloned()
    }
}
