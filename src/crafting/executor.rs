//! Crafting executor
//!
//! Drives the I/O driver through one craft: optional unsocket, base
//! relocation, then pick/insert for every missing rune. Every effect is
//! followed by a refresh and every reference is re-resolved by id.
//!
//! ```text
//! Start -> ValidateBase -> [Unsocket -> ValidateBase] -> PrepareRunes
//!       -> EnsureStash -> CheckCursor -> RelocateBase
//!       -> Pick(0) -> Insert(0) -> ... -> Insert(n-1) -> CloseMenus -> Done
//! ```
//!
//! Any failure leaves through cleanup: the cursor is parked or recovered and
//! all menus are closed before the error is returned.

use std::fmt;

use super::error::CraftError;
use super::gathering::{gather_runes, rune_ids};
use super::sockets::{can_unsocket, prefix_match, SocketStatus};
use crate::data::Recipe;
use crate::items::{find_free_cell, InventoryView, Item, UnitId, Zone};
use crate::session::{DriverError, EngineDeps, IoDriver, Modifier, MouseButton, Refresh};

/// Attempts to get the right rune onto the cursor
pub const PICK_ATTEMPTS: usize = 2;
/// Inventory refreshes while waiting for a picked rune
pub const CURSOR_POLLS: usize = 3;
pub const CURSOR_POLL_MS: u64 = 150;
/// Refreshes while waiting for the socket prefix to grow
pub const INSERT_POLLS: usize = 3;
pub const INSERT_POLL_MS: u64 = 200;
pub const CLICK_SETTLE_MS: u64 = 200;
pub const INSERT_SETTLE_MS: u64 = 300;
pub const STASH_SETTLE_MS: u64 = 500;
pub const STASH_MOVE_ATTEMPTS: usize = 2;
pub const MENU_OPEN_ATTEMPTS: usize = 2;

/// Label passed to the driver for its own logging
const UNSOCKET_CONTEXT: &str = "runeword maker";

/// What the orchestrator decided to build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CraftPlan {
    pub base: UnitId,
    /// Socket prefix the base had at selection time
    pub prefix: usize,
    /// Selection approved clearing a mismatched base; without it a
    /// mismatch is never unsocketed
    pub unsocket: bool,
    /// Distinct rune instances for `recipe.runes[prefix..]`, in order
    pub runes: Vec<UnitId>,
}

/// Executor states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Start,
    ValidateBase,
    Unsocket,
    PrepareRunes,
    EnsureStash,
    CheckCursor,
    RelocateBase,
    Pick(usize),
    Insert(usize),
    CloseMenus,
    Done,
    Skipped,
    Aborted,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Done | Phase::Skipped | Phase::Aborted)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Start => write!(f, "START"),
            Phase::ValidateBase => write!(f, "VALIDATE_BASE"),
            Phase::Unsocket => write!(f, "UNSOCKET"),
            Phase::PrepareRunes => write!(f, "PREPARE_RUNES"),
            Phase::EnsureStash => write!(f, "ENSURE_STASH"),
            Phase::CheckCursor => write!(f, "CHECK_CURSOR"),
            Phase::RelocateBase => write!(f, "RELOCATE_BASE"),
            Phase::Pick(i) => write!(f, "PICK[{i}]"),
            Phase::Insert(i) => write!(f, "INSERT[{i}]"),
            Phase::CloseMenus => write!(f, "CLOSE_MENUS"),
            Phase::Done => write!(f, "DONE"),
            Phase::Skipped => write!(f, "SKIPPED"),
            Phase::Aborted => write!(f, "ABORTED"),
        }
    }
}

/// Build `recipe` on the planned base
///
/// A recipe that cannot proceed after a recoverable failure ends with
/// [`CraftError::Skip`].
pub fn craft(deps: &mut EngineDeps<'_>, recipe: &Recipe, plan: &CraftPlan) -> Result<(), CraftError> {
    Executor::new(deps, recipe, plan).run()
}

/// State of a single craft
struct Executor<'d, 'a> {
    deps: &'d mut EngineDeps<'a>,
    recipe: &'d Recipe,
    plan: &'d CraftPlan,
    phase: Phase,
    /// Sockets of the base already holding the right rune
    prefix: usize,
    /// Rune instances for the missing suffix
    runes: Vec<UnitId>,
    /// Stash tab last switched to during this craft
    current_tab: Option<u8>,
    rechecked: bool,
    unsocketed: bool,
    skip_reason: String,
}

impl<'d, 'a> Executor<'d, 'a> {
    fn new(deps: &'d mut EngineDeps<'a>, recipe: &'d Recipe, plan: &'d CraftPlan) -> Self {
        Self {
            deps,
            recipe,
            plan,
            phase: Phase::Start,
            prefix: plan.prefix,
            runes: Vec::new(),
            current_tab: None,
            rechecked: false,
            unsocketed: false,
            skip_reason: String::new(),
        }
    }

    fn run(mut self) -> Result<(), CraftError> {
        while !self.phase.is_terminal() {
            match self.step() {
                Ok(next) => self.transition(next),
                Err(err) => {
                    log::warn!("{} failed in {}: {}", self.recipe.name, self.phase, err);
                    self.transition(Phase::Aborted);
                    self.cleanup();
                    return Err(err);
                }
            }
        }

        if self.phase == Phase::Skipped {
            self.cleanup();
            return Err(CraftError::Skip {
                recipe: self.recipe_name(),
                reason: std::mem::take(&mut self.skip_reason),
            });
        }
        Ok(())
    }

    fn transition(&mut self, next: Phase) {
        log::debug!("{} -> {}", self.phase, next);
        self.phase = next;
    }

    fn step(&mut self) -> Result<Phase, CraftError> {
        match self.phase {
            Phase::Start => Ok(Phase::ValidateBase),
            Phase::ValidateBase => self.validate_base(),
            Phase::Unsocket => self.unsocket(),
            Phase::PrepareRunes => self.prepare_runes(),
            Phase::EnsureStash => self.ensure_stash(),
            Phase::CheckCursor => self.check_cursor(),
            Phase::RelocateBase => self.relocate_base(),
            Phase::Pick(i) => self.pick(i),
            Phase::Insert(i) => self.insert(i),
            Phase::CloseMenus => {
                self.deps.driver.close_all_menus();
                Ok(Phase::Done)
            }
            Phase::Done | Phase::Skipped | Phase::Aborted => Ok(self.phase),
        }
    }

    fn recipe_name(&self) -> String {
        self.recipe.name.clone()
    }

    /// The base, re-resolved; lost once it leaves inventory and stash
    fn base(&self, during: &'static str) -> Result<Item, CraftError> {
        self.deps
            .view()
            .find_by_id(self.plan.base)
            .filter(|b| b.in_zone(&Zone::STORAGE))
            .cloned()
            .ok_or_else(|| CraftError::BaseLost { recipe: self.recipe_name(), base: self.plan.base, during })
    }

    fn validate_base(&mut self) -> Result<Phase, CraftError> {
        let base = self.base("validation")?;
        if base.is_runeword {
            return Err(CraftError::BaseAlreadyRuneword { recipe: self.recipe_name(), base: base.id });
        }

        let matched = prefix_match(&base, self.recipe);
        match matched.status {
            SocketStatus::Ok if matched.is_complete(self.recipe) => {
                Err(CraftError::BaseAlreadyComplete { recipe: self.recipe_name(), base: base.id })
            }
            SocketStatus::Ok => {
                self.prefix = matched.len;
                Ok(Phase::PrepareRunes)
            }
            _ if self.unsocketed => Err(CraftError::SocketsDiverged {
                recipe: self.recipe_name(),
                reason: format!("{} after unsocket", matched),
            }),
            SocketStatus::RuneMismatch if !self.rechecked => {
                // The socket list may just be stale
                self.rechecked = true;
                self.deps.refresh(Refresh::All);
                Ok(Phase::ValidateBase)
            }
            SocketStatus::RuneMismatch
                if self.plan.unsocket && can_unsocket(&self.deps.view().rune_budget(), self.recipe, &matched) =>
            {
                if self.deps.config.is_leveling() {
                    self.skip_reason = format!("leveling characters do not unsocket ({matched})");
                    Ok(Phase::Skipped)
                } else {
                    Ok(Phase::Unsocket)
                }
            }
            _ => Err(CraftError::BaseIncompatible {
                recipe: self.recipe_name(),
                base: base.id,
                reason: matched.to_string(),
            }),
        }
    }

    fn unsocket(&mut self) -> Result<Phase, CraftError> {
        let base = self.base("unsocket")?;
        log::info!("{}: unsocketing base {} ({})", self.recipe.name, base.id, base.socketed_names().join(","));

        let mut result: Result<(), DriverError> = Ok(());
        let refreshed = self.deps.perform(0, Refresh::All, base.id, |driver| {
            result = driver.unsocket_with_hel_and_scroll(&base, UNSOCKET_CONTEXT);
        });

        if let Err(err) = result {
            log::warn!("{}: failed to unsocket base {}: {}", self.recipe.name, base.id, err);
            self.skip_reason = err.to_string();
            return Ok(Phase::Skipped);
        }
        if refreshed.is_none() {
            return Err(CraftError::BaseLost { recipe: self.recipe_name(), base: base.id, during: "unsocket" });
        }

        self.unsocketed = true;
        Ok(Phase::ValidateBase)
    }

    fn prepare_runes(&mut self) -> Result<Phase, CraftError> {
        let missing = &self.recipe.runes[self.prefix..];
        let view = self.deps.view();

        let planned_still_valid = !self.unsocketed
            && self.plan.prefix == self.prefix
            && self.plan.runes.len() == missing.len()
            && self
                .plan
                .runes
                .iter()
                .zip(missing)
                .all(|(id, name)| view.find_by_id(*id).is_some_and(|r| r.name == *name && r.in_zone(&Zone::STORAGE)));

        self.runes = if planned_still_valid {
            self.plan.runes.clone()
        } else {
            let storage = view.storage();
            let gathered = gather_runes(&storage, missing)
                .ok_or_else(|| CraftError::NoRunes { recipe: self.recipe.name.clone() })?;
            rune_ids(&gathered)
        };

        Ok(Phase::EnsureStash)
    }

    fn ensure_stash(&mut self) -> Result<Phase, CraftError> {
        let view = self.deps.view();
        let base = self.base("stash check")?;
        let participants = std::iter::once(&base).chain(self.runes.iter().filter_map(|id| view.find_by_id(*id)));
        let needs_stash = InventoryView::any_in_stash(participants);
        let menus = view.snapshot().open_menus;

        if needs_stash && !menus.stash {
            open_menu(&mut *self.deps.driver, "stash", |d| d.open_stash())?;
        } else if !needs_stash && !menus.stash && !menus.inventory {
            open_menu(&mut *self.deps.driver, "inventory", |d| d.open_inventory())?;
        }
        Ok(Phase::CheckCursor)
    }

    fn check_cursor(&mut self) -> Result<Phase, CraftError> {
        self.deps.refresh(Refresh::All);
        if let Some(item) = self.deps.view().cursor_item() {
            let item = item.display_name.clone();
            log::warn!("{}: cursor holds {} before socketing", self.recipe.name, item);
            self.deps.driver.drop_and_recover_cursor_item();
            return Err(CraftError::CursorOccupied { recipe: self.recipe_name(), item });
        }
        Ok(Phase::RelocateBase)
    }

    fn relocate_base(&mut self) -> Result<Phase, CraftError> {
        let mut base = self.base("relocation")?;
        let Some(tab) = base.location.stash_tab() else {
            return Ok(Phase::Pick(0));
        };

        let grid = self.deps.view().matrix();
        if find_free_cell(&grid, base.size, &self.deps.config.inventory_lock).is_none() {
            return Err(CraftError::BaseDoesNotFit { recipe: self.recipe_name(), base: base.id });
        }

        self.switch_tab(tab);
        self.deps.driver.sleep(STASH_SETTLE_MS);

        for attempt in 1..=STASH_MOVE_ATTEMPTS {
            let at = self.deps.driver.screen_coords_for_item(&base);
            let moved = self.deps.perform(STASH_SETTLE_MS, Refresh::All, base.id, |driver| {
                driver.click_with_modifier(MouseButton::Left, at, Modifier::Ctrl);
            });
            match moved {
                Some(item) if item.location.zone == Zone::Inventory => {
                    log::debug!("{}: base {} moved to inventory", self.recipe.name, item.id);
                    return Ok(Phase::Pick(0));
                }
                Some(item) => {
                    log::debug!(
                        "{}: base still in {} after attempt {}",
                        self.recipe.name,
                        item.location.zone.name(),
                        attempt
                    );
                    base = item;
                }
                None => break,
            }
        }

        Err(CraftError::StashMoveFailed { recipe: self.recipe_name(), base: self.plan.base })
    }

    fn pick(&mut self, i: usize) -> Result<Phase, CraftError> {
        let rune_id = self.runes[i];
        let expected = self.recipe.runes[self.prefix].clone();

        for _ in 0..PICK_ATTEMPTS {
            let rune = self
                .deps
                .view()
                .find_by_id(rune_id)
                .filter(|r| r.in_zone(&Zone::STORAGE))
                .cloned()
                .ok_or_else(|| CraftError::RuneLost { recipe: self.recipe_name(), rune: expected.clone(), id: rune_id })?;
            if let Some(tab) = rune.location.stash_tab() {
                self.switch_tab(tab);
            }

            let at = self.deps.driver.screen_coords_for_item(&rune);
            self.deps.driver.click(MouseButton::Left, at);
            self.deps.driver.sleep(CLICK_SETTLE_MS);

            let Some(held) = self.poll_cursor() else {
                continue;
            };
            if held.name == expected {
                return Ok(Phase::Insert(i));
            }

            if self.park_cursor_item(&held) {
                log::warn!(
                    "{}: unexpected {} on cursor (wanted {}), parked and retrying",
                    self.recipe.name,
                    held.name,
                    expected
                );
                self.deps.driver.sleep(CURSOR_POLL_MS);
                continue;
            }
            self.deps.driver.drop_and_recover_cursor_item();
            return Err(CraftError::CursorMismatch { recipe: self.recipe_name(), expected, found: held.name });
        }

        Err(CraftError::RuneNotOnCursor { recipe: self.recipe_name(), rune: expected })
    }

    fn insert(&mut self, i: usize) -> Result<Phase, CraftError> {
        let rune = self.recipe.runes[self.prefix].clone();
        let base = match self.base("insert") {
            Ok(base) => base,
            Err(err) => {
                self.deps.driver.drop_and_recover_cursor_item();
                return Err(err);
            }
        };
        if let Some(tab) = base.location.stash_tab() {
            self.switch_tab(tab);
        }

        let at = self.deps.driver.screen_coords_for_item(&base);
        let mut updated = self.deps.perform(CLICK_SETTLE_MS, Refresh::Inventory, base.id, |driver| {
            driver.click(MouseButton::Left, at);
        });

        let mut last_reason: Option<String> = None;
        let mut cursor_busy = false;
        for poll in 0..INSERT_POLLS {
            if poll > 0 {
                self.deps.driver.sleep(INSERT_POLL_MS);
                self.deps.refresh(Refresh::Inventory);
                updated = self.deps.view().find_by_id(base.id).cloned();
            }
            cursor_busy = self.deps.view().cursor_count() > 0;

            let Some(current) = updated.as_ref() else {
                continue;
            };
            let matched = prefix_match(current, self.recipe);
            if matched.is_ok() && matched.len == self.prefix + 1 {
                self.prefix = matched.len;
                log::debug!(
                    "{}: {} socketed into {} ({}/{})",
                    self.recipe.name,
                    rune,
                    base.id,
                    self.prefix,
                    self.recipe.socket_count()
                );
                self.deps.driver.sleep(INSERT_SETTLE_MS);
                return Ok(if i + 1 < self.runes.len() { Phase::Pick(i + 1) } else { Phase::CloseMenus });
            }
            last_reason = matched.reason;
        }

        if cursor_busy {
            self.deps.driver.drop_and_recover_cursor_item();
            return Err(CraftError::InsertFailed { recipe: self.recipe_name(), rune });
        }
        if let Some(reason) = last_reason {
            return Err(CraftError::SocketsDiverged { recipe: self.recipe_name(), reason });
        }
        Err(CraftError::PrefixDidNotAdvance { recipe: self.recipe_name(), rune, stuck_at: self.prefix })
    }

    /// Refresh until something shows up on the cursor
    fn poll_cursor(&mut self) -> Option<Item> {
        for poll in 0..CURSOR_POLLS {
            if poll > 0 {
                self.deps.driver.sleep(CURSOR_POLL_MS);
            }
            self.deps.refresh(Refresh::Inventory);
            if let Some(item) = self.deps.view().cursor_item() {
                return Some(item.clone());
            }
        }
        None
    }

    /// Put the cursor item into the first free unlocked inventory cell
    fn park_cursor_item(&mut self, item: &Item) -> bool {
        let grid = self.deps.view().matrix();
        let Some(cell) = find_free_cell(&grid, item.size, &self.deps.config.inventory_lock) else {
            return false;
        };
        let at = self.deps.driver.screen_coords_for_cell(cell, Zone::Inventory);
        self.deps.driver.click(MouseButton::Left, at);
        self.deps.driver.sleep(CLICK_SETTLE_MS);
        self.deps.refresh(Refresh::Inventory);
        self.deps.view().cursor_count() == 0
    }

    fn switch_tab(&mut self, tab: u8) {
        if self.current_tab != Some(tab) {
            self.deps.driver.switch_stash_tab(tab);
            self.current_tab = Some(tab);
        }
    }

    /// Leave no item on the cursor and no menu open
    fn cleanup(&mut self) {
        self.deps.refresh(Refresh::Inventory);
        if let Some(item) = self.deps.view().cursor_item().cloned() {
            if !self.park_cursor_item(&item) {
                self.deps.driver.drop_and_recover_cursor_item();
            }
        }
        self.deps.driver.close_all_menus();
    }
}

/// Open a menu, retrying once
fn open_menu<F>(driver: &mut dyn IoDriver, name: &str, mut open: F) -> Result<(), DriverError>
where
    F: FnMut(&mut dyn IoDriver) -> Result<(), DriverError>,
{
    let mut last = Ok(());
    for attempt in 1..=MENU_OPEN_ATTEMPTS {
        last = open(&mut *driver);
        match &last {
            Ok(()) => return Ok(()),
            Err(err) => log::debug!("{name} open attempt {attempt} failed: {err}"),
        }
    }
    last
}
