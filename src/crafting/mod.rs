//! Runeword crafting
//!
//! Socket reconciliation, base selection, rune gathering, the crafting
//! executor and the orchestrator tying them together.

pub mod error;
pub mod executor;
pub mod gathering;
pub mod orchestrator;
pub mod selection;
pub mod sockets;

#[cfg(test)]
mod properties;
#[cfg(test)]
mod scenarios;

pub use error::{CraftError, Severity};
pub use executor::{craft, CraftPlan, Phase};
pub use gathering::{gather_runes, rune_ids};
pub use orchestrator::{make_runewords, CraftReport, CreatedRuneword, RecipeEnd, RecipeReport};
pub use selection::{meets_requirements, owned_runeword_tier, rank_candidates, select_base, Candidate, Filters};
pub use sockets::{can_unsocket, prefix_match, PrefixMatch, SocketStatus};
