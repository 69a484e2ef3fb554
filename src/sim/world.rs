//! Simulated game world
//!
//! Ground truth for the simulated session: items, menus, the visible stash
//! tab and the faults still to be injected. Only models what the crafting
//! engine can observe.

use serde::{Deserialize, Serialize};

use super::screen::{decode, Area, STASH_HEIGHT, STASH_WIDTH};
use crate::data::Catalogue;
use crate::items::{Cell, InventoryGrid, InventoryLock, Item, Location, UnitId, Zone, UNSOCKET_REAGENT};
use crate::session::{DriverError, Modifier, MouseButton, ScreenPoint, Snapshot};

/// Scroll consumed together with the reagent rune when unsocketing
pub const UNSOCKET_SCROLL: &str = "ScrollOfTownPortal";

/// Faults the world injects into driver effects
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Faults {
    /// 1-based click numbers the game ignores
    pub ignored_clicks: Vec<usize>,
    /// Next pick delivers this item instead of the clicked one
    pub wrong_pick: Option<UnitId>,
    /// After click `n`, the next `m` refreshes return the previous snapshot
    pub stale_after_click: Option<(usize, usize)>,
    /// An item moves on its own once the click counter reaches `after_clicks`
    pub relocation: Option<Relocation>,
    /// Number of stash opens that fail before one succeeds
    pub failing_stash_opens: usize,
    pub fail_unsocket: bool,
    /// 1-based click numbers on which a held rune slips back into the
    /// inventory instead of the socket
    pub dropped_inserts: Vec<usize>,
    /// Unsocketing consumes the reagents but leaves the sockets filled
    pub unsocket_keeps_sockets: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relocation {
    pub after_clicks: usize,
    pub item: UnitId,
    pub to: Location,
}

/// Every call the engine made, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverCall {
    OpenStash,
    OpenInventory,
    SwitchTab(u8),
    CloseAllMenus,
    Click { button: MouseButton, at: ScreenPoint, modifier: Option<Modifier> },
    DropAndRecover,
    Unsocket(UnitId),
}

/// What the world did in response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimEvent {
    Picked(UnitId),
    /// Socket contents of the base right after the insertion
    Inserted { base: UnitId, socketed: Vec<String> },
    Completed { base: UnitId, runeword: String },
    Placed { item: UnitId, location: Location },
    MovedToInventory(UnitId),
    Recovered { item: UnitId, location: Location },
    Unsocketed(UnitId),
    Relocated(UnitId),
    IgnoredClick(usize),
}

/// The simulated world
#[derive(Debug, Clone)]
pub struct SimState {
    pub world: Snapshot,
    pub catalogue: Catalogue,
    /// Visible stash tab (1 = personal, 2.. = shared pages)
    pub stash_tab: u8,
    pub faults: Faults,
    pub calls: Vec<DriverCall>,
    pub events: Vec<SimEvent>,
    pub slept_ms: u64,
    clicks: usize,
    /// Refreshes still to be served from the stale copy
    pub(crate) stale_refreshes: usize,
}

impl SimState {
    pub fn new(world: Snapshot, catalogue: Catalogue) -> Self {
        Self {
            world,
            catalogue,
            stash_tab: 1,
            faults: Faults::default(),
            calls: Vec::new(),
            events: Vec::new(),
            slept_ms: 0,
            clicks: 0,
            stale_refreshes: 0,
        }
    }

    pub fn clicks(&self) -> usize {
        self.clicks
    }

    pub fn item(&self, id: UnitId) -> Option<&Item> {
        self.world.items.iter().find(|i| i.id == id)
    }

    fn item_mut(&mut self, id: UnitId) -> Option<&mut Item> {
        self.world.items.iter_mut().find(|i| i.id == id)
    }

    /// Move an item; false if it does not exist
    fn move_item(&mut self, id: UnitId, to: Location) -> bool {
        match self.item_mut(id) {
            Some(item) => {
                item.location = to;
                true
            }
            None => false,
        }
    }

    fn take(&mut self, id: UnitId) -> Option<Item> {
        let index = self.world.items.iter().position(|i| i.id == id)?;
        Some(self.world.items.remove(index))
    }

    pub fn cursor_item(&self) -> Option<&Item> {
        self.world.items.iter().find(|i| i.location.zone == Zone::Cursor)
    }

    fn area_visible(&self, area: Area) -> bool {
        let menus = self.world.open_menus;
        match area {
            Area::Inventory => menus.inventory || menus.stash,
            Area::Stash => menus.stash,
        }
    }

    /// Whether an item is shown on the visible page of `area`
    fn on_visible_page(&self, item: &Item, area: Area) -> bool {
        match (area, item.location.zone) {
            (Area::Inventory, Zone::Inventory) => true,
            (Area::Stash, Zone::Stash | Zone::SharedStash) => item.location.stash_tab() == Some(self.stash_tab),
            _ => false,
        }
    }

    fn location_in(&self, area: Area, cell: Cell) -> Location {
        match area {
            Area::Inventory => Location::inventory(cell.x, cell.y),
            Area::Stash if self.stash_tab <= 1 => Location::stash(cell.x, cell.y),
            Area::Stash => Location::shared_stash(self.stash_tab - 1, cell.x, cell.y),
        }
    }

    fn grid(&self, area: Area) -> InventoryGrid {
        let (w, h) = area.size();
        let mut grid = InventoryGrid::new(w, h);
        for item in self.world.items.iter().filter(|i| self.on_visible_page(i, area)) {
            grid.occupy(item);
        }
        grid
    }

    fn item_under(&self, area: Area, cell: Cell) -> Option<UnitId> {
        self.grid(area).get_at(usize::from(cell.x), usize::from(cell.y))
    }

    /// First inventory origin with room for `size`
    pub fn free_inventory_cell(&self, size: (u8, u8)) -> Option<Cell> {
        InventoryGrid::from_items(self.world.items.iter()).find_free_cell(
            usize::from(size.0),
            usize::from(size.1),
            &InventoryLock::none(),
        )
    }

    fn free_stash_cell(&self, size: (u8, u8)) -> Option<Cell> {
        let mut grid = InventoryGrid::new(STASH_WIDTH, STASH_HEIGHT);
        for item in self.world.items.iter().filter(|i| i.location.zone == Zone::Stash) {
            grid.occupy(item);
        }
        grid.find_free_cell(usize::from(size.0), usize::from(size.1), &InventoryLock::none())
    }

    pub fn click(&mut self, button: MouseButton, at: ScreenPoint, modifier: Option<Modifier>) {
        self.calls.push(DriverCall::Click { button, at, modifier });
        self.clicks += 1;
        let n = self.clicks;

        if self.faults.ignored_clicks.contains(&n) {
            self.events.push(SimEvent::IgnoredClick(n));
        } else if button == MouseButton::Left {
            if let Some((area, cell)) = decode(at).filter(|(area, _)| self.area_visible(*area)) {
                match modifier {
                    Some(Modifier::Ctrl) => self.ctrl_click(area, cell),
                    _ => self.left_click(area, cell),
                }
            }
        }

        if let Some((after, refreshes)) = self.faults.stale_after_click {
            if after == n {
                self.stale_refreshes = refreshes;
            }
        }
        if let Some(r) = self.faults.relocation.filter(|r| r.after_clicks == n) {
            self.faults.relocation = None;
            if self.move_item(r.item, r.to) {
                self.events.push(SimEvent::Relocated(r.item));
            }
        }
    }

    fn left_click(&mut self, area: Area, cell: Cell) {
        let under = self.item_under(area, cell);
        let held = self.cursor_item().map(|i| i.id);

        match (held, under) {
            (None, Some(target)) => {
                let picked = self
                    .faults
                    .wrong_pick
                    .take()
                    .filter(|id| self.item(*id).is_some_and(|i| i.in_zone(&Zone::STORAGE)))
                    .unwrap_or(target);
                if self.move_item(picked, Location::cursor()) {
                    self.events.push(SimEvent::Picked(picked));
                }
            }
            (Some(rune), Some(_)) if self.faults.dropped_inserts.contains(&self.clicks) => self.fumble(rune),
            (Some(rune), Some(target)) => self.insert(rune, target),
            (Some(held), None) => {
                let size = self.item(held).map(|i| i.size).unwrap_or((1, 1));
                let fits = self.grid(area).can_place_at(
                    usize::from(cell.x),
                    usize::from(cell.y),
                    usize::from(size.0),
                    usize::from(size.1),
                    &InventoryLock::none(),
                );
                if fits {
                    let location = self.location_in(area, cell);
                    if self.move_item(held, location) {
                        self.events.push(SimEvent::Placed { item: held, location });
                    }
                }
            }
            (None, None) => {}
        }
    }

    fn insert(&mut self, rune_id: UnitId, base_id: UnitId) {
        let accepts = match (self.item(rune_id), self.item(base_id)) {
            (Some(rune), Some(base)) => {
                rune.is_rune() && !base.is_runeword && base.socketed.len() < usize::from(base.socket_count)
            }
            _ => false,
        };
        if !accepts {
            return;
        }
        let Some(mut rune) = self.take(rune_id) else {
            return;
        };

        let Some(base) = self.item_mut(base_id) else {
            return;
        };
        rune.location = Location::socket(base.socketed.len() as u8);
        base.socketed.push(rune);
        let full = base.socketed.len() == usize::from(base.socket_count);
        let category = base.category.clone();
        let socketed: Vec<String> = base.socketed.iter().map(|s| s.name.clone()).collect();

        let completed = if full {
            let names: Vec<&str> = socketed.iter().map(String::as_str).collect();
            self.catalogue.completed_by(&names, &category).map(|r| r.name.clone())
        } else {
            None
        };
        if let (Some(runeword), Some(base)) = (completed.as_ref(), self.item_mut(base_id)) {
            base.is_runeword = true;
            base.name = runeword.clone();
        }

        self.events.push(SimEvent::Inserted { base: base_id, socketed });
        if let Some(runeword) = completed {
            self.events.push(SimEvent::Completed { base: base_id, runeword });
        }
    }

    /// The held item lands in the first free inventory cell
    fn fumble(&mut self, id: UnitId) {
        let size = self.item(id).map(|i| i.size).unwrap_or((1, 1));
        let Some(cell) = self.free_inventory_cell(size) else {
            return;
        };
        let location = Location::inventory(cell.x, cell.y);
        if self.move_item(id, location) {
            self.events.push(SimEvent::Placed { item: id, location });
        }
    }

    fn ctrl_click(&mut self, area: Area, cell: Cell) {
        if area != Area::Stash || self.cursor_item().is_some() {
            return;
        }
        let Some(id) = self.item_under(area, cell) else {
            return;
        };
        let size = self.item(id).map(|i| i.size).unwrap_or((1, 1));
        if let Some(free) = self.free_inventory_cell(size) {
            if self.move_item(id, Location::inventory(free.x, free.y)) {
                self.events.push(SimEvent::MovedToInventory(id));
            }
        }
    }

    pub fn drop_and_recover(&mut self) {
        self.calls.push(DriverCall::DropAndRecover);
        let Some((id, size)) = self.cursor_item().map(|i| (i.id, i.size)) else {
            return;
        };
        let location = match self.free_inventory_cell(size) {
            Some(cell) => Location::inventory(cell.x, cell.y),
            None => Location::ground(),
        };
        if self.move_item(id, location) {
            self.events.push(SimEvent::Recovered { item: id, location });
        }
    }

    pub fn unsocket(&mut self, base_id: UnitId) -> Result<(), DriverError> {
        self.calls.push(DriverCall::Unsocket(base_id));
        if self.faults.fail_unsocket {
            return Err(DriverError::Unsocket("game refused to unsocket".to_string()));
        }

        let reagent = self.storage_item_named(UNSOCKET_REAGENT);
        let scroll = self.storage_item_named(UNSOCKET_SCROLL);
        let (Some(reagent), Some(scroll)) = (reagent, scroll) else {
            return Err(DriverError::Unsocket("missing reagent".to_string()));
        };
        let keep = self.faults.unsocket_keeps_sockets;
        let freed = match self.item_mut(base_id) {
            Some(_) if keep => Vec::new(),
            Some(base) => std::mem::take(&mut base.socketed),
            None => return Err(DriverError::Unsocket("base not found".to_string())),
        };
        self.take(reagent);
        self.take(scroll);

        for mut item in freed {
            item.location = if let Some(cell) = self.free_inventory_cell(item.size) {
                Location::inventory(cell.x, cell.y)
            } else if let Some(cell) = self.free_stash_cell(item.size) {
                Location::stash(cell.x, cell.y)
            } else {
                Location::ground()
            };
            self.world.items.push(item);
        }
        self.events.push(SimEvent::Unsocketed(base_id));
        Ok(())
    }

    fn storage_item_named(&self, name: &str) -> Option<UnitId> {
        self.world
            .items
            .iter()
            .find(|i| i.name == name && i.in_zone(&Zone::STORAGE))
            .map(|i| i.id)
    }

    pub fn open_stash(&mut self) -> Result<(), DriverError> {
        self.calls.push(DriverCall::OpenStash);
        if self.faults.failing_stash_opens > 0 {
            self.faults.failing_stash_opens -= 1;
            return Err(DriverError::MenuDidNotOpen("stash"));
        }
        self.world.open_menus.stash = true;
        self.world.open_menus.inventory = true;
        Ok(())
    }

    pub fn open_inventory(&mut self) {
        self.calls.push(DriverCall::OpenInventory);
        self.world.open_menus.inventory = true;
    }

    pub fn switch_stash_tab(&mut self, tab: u8) {
        self.calls.push(DriverCall::SwitchTab(tab));
        if self.world.open_menus.stash {
            self.stash_tab = tab;
        }
    }

    pub fn close_all_menus(&mut self) {
        self.calls.push(DriverCall::CloseAllMenus);
        self.world.open_menus = Default::default();
    }
}
