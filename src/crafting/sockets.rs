//! Socket reconciliation
//!
//! Pure checks of a base's socketed items against a recipe's rune order.

use std::fmt;

use crate::data::Recipe;
use crate::items::{Item, RuneBudget};

/// Classification of a base's current socket contents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SocketStatus {
    /// Socketed runes are a prefix of the recipe
    Ok,
    /// Too many items, or a non-rune in a socket
    Incompatible,
    /// A rune sits in the wrong slot; salvageable by unsocketing
    RuneMismatch,
}

/// Result of matching a base against a recipe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixMatch {
    /// Number of leading slots already holding the right rune
    pub len: usize,
    pub status: SocketStatus,
    pub reason: Option<String>,
}

impl PrefixMatch {
    fn ok(len: usize) -> Self {
        Self { len, status: SocketStatus::Ok, reason: None }
    }

    fn fail(status: SocketStatus, reason: String) -> Self {
        Self { len: 0, status, reason: Some(reason) }
    }

    pub fn is_ok(&self) -> bool {
        self.status == SocketStatus::Ok
    }

    /// Whether every socket the recipe needs is already filled correctly
    pub fn is_complete(&self, recipe: &Recipe) -> bool {
        self.is_ok() && self.len >= recipe.socket_count()
    }
}

impl fmt::Display for PrefixMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            Some(reason) => write!(f, "{reason}"),
            None => write!(f, "prefix {}", self.len),
        }
    }
}

/// Match the socketed items of `base` against the rune order of `recipe`
pub fn prefix_match(base: &Item, recipe: &Recipe) -> PrefixMatch {
    if base.socketed.is_empty() {
        return PrefixMatch::ok(0);
    }
    if base.socketed.len() > recipe.runes.len() {
        return PrefixMatch::fail(SocketStatus::Incompatible, "too many socketed items".to_string());
    }

    for (slot, socketed) in base.socketed.iter().enumerate() {
        if !socketed.is_rune() {
            return PrefixMatch::fail(
                SocketStatus::Incompatible,
                format!("non-rune {} at slot {}", socketed.name, slot + 1),
            );
        }
        if socketed.name != recipe.runes[slot] {
            return PrefixMatch::fail(SocketStatus::RuneMismatch, format!("rune mismatch at slot {}", slot + 1));
        }
    }

    PrefixMatch::ok(base.socketed.len())
}

/// Whether a mismatched base can be cleared and rebuilt from `budget`
///
/// Needs the whole recipe plus one extra `HelRune` for the reagent.
pub fn can_unsocket(budget: &RuneBudget, recipe: &Recipe, matched: &PrefixMatch) -> bool {
    matched.status == SocketStatus::RuneMismatch && budget.covers_with_reagent(&recipe.runes)
}
