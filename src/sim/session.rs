//! Simulated session handles
//!
//! The world sits behind a shared lock so the driver, the snapshot provider
//! and the test holding the session can all reach it.

use std::sync::Arc;

use parking_lot::Mutex;

use super::screen::{cell_center, item_center, Area};
use super::world::{DriverCall, Faults, SimEvent, SimState};
use crate::data::Catalogue;
use crate::items::{Cell, Item, UnitId, Zone};
use crate::session::{
    DriverError, IoDriver, Modifier, MouseButton, OpenMenus, ScreenPoint, Snapshot, SnapshotProvider,
};

/// Handle on a simulated game
#[derive(Debug, Clone)]
pub struct SimSession {
    state: Arc<Mutex<SimState>>,
}

impl SimSession {
    pub fn new(world: Snapshot, catalogue: Catalogue) -> Self {
        Self { state: Arc::new(Mutex::new(SimState::new(world, catalogue))) }
    }

    pub fn with_faults(self, faults: Faults) -> Self {
        self.state.lock().faults = faults;
        self
    }

    /// Driver and snapshot provider over this session
    pub fn split(&self) -> (SimDriver, SimSnapshot) {
        let driver = SimDriver { state: Arc::clone(&self.state) };
        let snapshot = SimSnapshot::new(Arc::clone(&self.state));
        (driver, snapshot)
    }

    /// Inspect or mutate the world directly
    pub fn with_state<R>(&self, f: impl FnOnce(&mut SimState) -> R) -> R {
        f(&mut self.state.lock())
    }

    pub fn item(&self, id: UnitId) -> Option<Item> {
        self.state.lock().item(id).cloned()
    }

    pub fn cursor_item(&self) -> Option<Item> {
        self.state.lock().cursor_item().cloned()
    }

    pub fn open_menus(&self) -> OpenMenus {
        self.state.lock().world.open_menus
    }

    pub fn calls(&self) -> Vec<DriverCall> {
        self.state.lock().calls.clone()
    }

    pub fn events(&self) -> Vec<SimEvent> {
        self.state.lock().events.clone()
    }

    pub fn clicks(&self) -> usize {
        self.state.lock().clicks()
    }

    /// Copy of the current ground truth
    pub fn world(&self) -> Snapshot {
        self.state.lock().world.clone()
    }
}

/// [`IoDriver`] acting on the simulated world
#[derive(Debug)]
pub struct SimDriver {
    state: Arc<Mutex<SimState>>,
}

impl IoDriver for SimDriver {
    fn open_stash(&mut self) -> Result<(), DriverError> {
        self.state.lock().open_stash()
    }

    fn open_inventory(&mut self) -> Result<(), DriverError> {
        self.state.lock().open_inventory();
        Ok(())
    }

    fn switch_stash_tab(&mut self, tab: u8) {
        self.state.lock().switch_stash_tab(tab);
    }

    fn close_all_menus(&mut self) {
        self.state.lock().close_all_menus();
    }

    fn click(&mut self, button: MouseButton, at: ScreenPoint) {
        self.state.lock().click(button, at, None);
    }

    fn click_with_modifier(&mut self, button: MouseButton, at: ScreenPoint, modifier: Modifier) {
        self.state.lock().click(button, at, Some(modifier));
    }

    fn screen_coords_for_item(&self, item: &Item) -> ScreenPoint {
        item_center(item)
    }

    fn screen_coords_for_cell(&self, cell: Cell, zone: Zone) -> ScreenPoint {
        match Area::of_zone(zone) {
            Some(area) => cell_center(area, cell),
            None => ScreenPoint::default(),
        }
    }

    fn drop_and_recover_cursor_item(&mut self) {
        self.state.lock().drop_and_recover();
    }

    fn unsocket_with_hel_and_scroll(&mut self, item: &Item, context: &str) -> Result<(), DriverError> {
        log::debug!("[{}] unsocketing {} ({})", context, item.display_name, item.id);
        self.state.lock().unsocket(item.id)
    }

    fn sleep(&mut self, ms: u64) {
        self.state.lock().slept_ms += ms;
    }
}

/// [`SnapshotProvider`] reading the simulated world
#[derive(Debug)]
pub struct SimSnapshot {
    state: Arc<Mutex<SimState>>,
    current: Snapshot,
}

impl SimSnapshot {
    fn new(state: Arc<Mutex<SimState>>) -> Self {
        let current = state.lock().world.clone();
        Self { state, current }
    }

    /// Copy the world unless a stale refresh is pending
    fn read(&mut self, items_only: bool) {
        let mut state = self.state.lock();
        if state.stale_refreshes > 0 {
            state.stale_refreshes -= 1;
            return;
        }
        if items_only {
            self.current.items = state.world.items.clone();
        } else {
            self.current = state.world.clone();
        }
    }
}

impl SnapshotProvider for SimSnapshot {
    fn refresh_all(&mut self) {
        self.read(false);
    }

    fn refresh_inventory(&mut self) {
        self.read(true);
    }

    fn snapshot(&self) -> &Snapshot {
        &self.current
    }
}
