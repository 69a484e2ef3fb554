//! Rune gathering
//!
//! Matches the runes a craft still needs to concrete item instances.

use std::collections::HashSet;

use crate::items::{Item, UnitId};

/// Pick one distinct instance for each required rune, in order
///
/// `items` is scanned in order for every requirement, so the first instance
/// of a rune in the snapshot is always preferred. Returns `None` unless
/// every requirement is matched.
pub fn gather_runes<'a>(items: &[&'a Item], required: &[String]) -> Option<Vec<&'a Item>> {
    let mut used: HashSet<UnitId> = HashSet::with_capacity(required.len());
    let mut picked = Vec::with_capacity(required.len());

    for rune in required {
        let found = items
            .iter()
            .copied()
            .find(|item| item.name == *rune && !used.contains(&item.id))?;
        used.insert(found.id);
        picked.push(found);
    }

    Some(picked)
}

/// Ids of a gathered rune list
pub fn rune_ids(runes: &[&Item]) -> Vec<UnitId> {
    runes.iter().map(|r| r.id).collect()
}
