//! Inventory view
//!
//! Read-through adaptor over a snapshot. Partitions items by zone and answers
//! id, position and rune-count queries. Never cached across refreshes.

use std::collections::BTreeMap;

use super::grid::InventoryGrid;
use super::item::{Item, UnitId, Zone, UNSOCKET_REAGENT};
use crate::session::Snapshot;

/// Rune name -> number of instances available
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuneBudget {
    counts: BTreeMap<String, u32>,
}

impl RuneBudget {
    /// Count runes among items (by the `Rune` name suffix)
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a Item>) -> Self {
        let mut counts = BTreeMap::new();
        for item in items {
            if item.name.ends_with("Rune") {
                *counts.entry(item.name.clone()).or_insert(0) += 1;
            }
        }
        Self { counts }
    }

    pub fn count(&self, rune: &str) -> u32 {
        self.counts.get(rune).copied().unwrap_or(0)
    }

    /// Whether the budget covers `runes` (with multiplicity) plus `extra`
    /// additional instances of a single rune
    pub fn covers_with_extra(&self, runes: &[String], extra: Option<&str>) -> bool {
        let mut required: BTreeMap<&str, u32> = BTreeMap::new();
        for rune in runes {
            *required.entry(rune.as_str()).or_insert(0) += 1;
        }
        if let Some(extra) = extra {
            *required.entry(extra).or_insert(0) += 1;
        }
        required.iter().all(|(rune, needed)| self.count(rune) >= *needed)
    }

    /// Whether the budget covers `runes` with multiplicity
    pub fn covers(&self, runes: &[String]) -> bool {
        self.covers_with_extra(runes, None)
    }

    /// Whether the budget covers `runes` and one more unsocket reagent
    pub fn covers_with_reagent(&self, runes: &[String]) -> bool {
        self.covers_with_extra(runes, Some(UNSOCKET_REAGENT))
    }
}

/// Zone-partitioned view over a snapshot
#[derive(Debug, Clone, Copy)]
pub struct InventoryView<'a> {
    snapshot: &'a Snapshot,
}

impl<'a> InventoryView<'a> {
    pub fn new(snapshot: &'a Snapshot) -> Self {
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &'a Snapshot {
        self.snapshot
    }

    /// All top-level items
    pub fn all(&self) -> &'a [Item] {
        &self.snapshot.items
    }

    /// Items living in any of `zones`, in snapshot order
    pub fn by_location(&self, zones: &[Zone]) -> Vec<&'a Item> {
        self.snapshot.items.iter().filter(|i| i.in_zone(zones)).collect()
    }

    /// Items in inventory, stash and shared stash
    pub fn storage(&self) -> Vec<&'a Item> {
        self.by_location(&Zone::STORAGE)
    }

    pub fn find_by_id(&self, id: UnitId) -> Option<&'a Item> {
        self.snapshot.items.iter().find(|i| i.id == id)
    }

    /// Item held on the cursor, if any
    pub fn cursor_item(&self) -> Option<&'a Item> {
        self.snapshot.items.iter().find(|i| i.location.zone == Zone::Cursor)
    }

    pub fn cursor_count(&self) -> usize {
        self.snapshot.items.iter().filter(|i| i.location.zone == Zone::Cursor).count()
    }

    /// Occupancy of the inventory grid
    pub fn matrix(&self) -> InventoryGrid {
        InventoryGrid::from_items(self.snapshot.items.iter())
    }

    /// Runes available in storage zones
    pub fn rune_budget(&self) -> RuneBudget {
        RuneBudget::from_items(self.storage())
    }

    /// Whether any of `items` lives in the stash or shared stash
    pub fn any_in_stash<'b>(items: impl IntoIterator<Item = &'b Item>) -> bool {
        items.into_iter().any(|i| i.location.zone.is_stash())
    }
}
