//! Crafting errors
//!
//! Every failure the engine can report, classified by how the orchestrator
//! reacts to it: soft errors end the current recipe, hard errors unwind.

use thiserror::Error;

use crate::items::UnitId;
use crate::session::DriverError;

/// How the orchestrator treats an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Move on to the next recipe
    Soft,
    /// Stop crafting and report to the caller
    Hard,
}

impl Severity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Soft => "soft",
            Self::Hard => "hard",
        }
    }
}

/// Errors raised while selecting, gathering or crafting
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CraftError {
    #[error("{recipe}: no suitable base")]
    NoBase { recipe: String },

    #[error("{recipe}: not enough runes")]
    NoRunes { recipe: String },

    /// The recipe cannot proceed after a recoverable failure (e.g. unsocket)
    #[error("{recipe}: skipped ({reason})")]
    Skip { recipe: String, reason: String },

    #[error("{recipe}: base {base} is incompatible: {reason}")]
    BaseIncompatible { recipe: String, base: UnitId, reason: String },

    #[error("{recipe}: base {base} is already a runeword")]
    BaseAlreadyRuneword { recipe: String, base: UnitId },

    #[error("{recipe}: base {base} is already fully socketed")]
    BaseAlreadyComplete { recipe: String, base: UnitId },

    #[error("{recipe}: base {base} does not fit in the inventory")]
    BaseDoesNotFit { recipe: String, base: UnitId },

    #[error("{recipe}: could not move base {base} from the stash")]
    StashMoveFailed { recipe: String, base: UnitId },

    #[error("{recipe}: base {base} disappeared during {during}")]
    BaseLost { recipe: String, base: UnitId, during: &'static str },

    #[error("{recipe}: cursor already holds {item}")]
    CursorOccupied { recipe: String, item: String },

    #[error("{recipe}: expected {expected} on cursor, got {found}")]
    CursorMismatch { recipe: String, expected: String, found: String },

    #[error("{recipe}: {rune} never reached the cursor")]
    RuneNotOnCursor { recipe: String, rune: String },

    #[error("{recipe}: rune {rune} ({id}) disappeared before pick")]
    RuneLost { recipe: String, rune: String, id: UnitId },

    #[error("{recipe}: inserting {rune} failed, cursor still holds an item")]
    InsertFailed { recipe: String, rune: String },

    #[error("{recipe}: sockets diverged from recipe: {reason}")]
    SocketsDiverged { recipe: String, reason: String },

    #[error("{recipe}: socket prefix stuck at {stuck_at} after inserting {rune}")]
    PrefixDidNotAdvance { recipe: String, rune: String, stuck_at: usize },

    #[error(transparent)]
    Driver(#[from] DriverError),
}

impl CraftError {
    pub fn severity(&self) -> Severity {
        match self {
            Self::NoBase { .. }
            | Self::NoRunes { .. }
            | Self::Skip { .. }
            | Self::BaseIncompatible { .. }
            | Self::BaseAlreadyRuneword { .. }
            | Self::BaseAlreadyComplete { .. }
            | Self::BaseDoesNotFit { .. }
            | Self::StashMoveFailed { .. } => Severity::Soft,
            _ => Severity::Hard,
        }
    }

    pub fn is_soft(&self) -> bool {
        self.severity() == Severity::Soft
    }

    /// Short machine-readable kind used in reports
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NoBase { .. } => "no_base",
            Self::NoRunes { .. } => "no_runes",
            Self::Skip { .. } => "skip",
            Self::BaseIncompatible { .. } => "base_incompatible",
            Self::BaseAlreadyRuneword { .. } => "base_already_runeword",
            Self::BaseAlreadyComplete { .. } => "base_already_complete",
            Self::BaseDoesNotFit { .. } => "base_does_not_fit",
            Self::StashMoveFailed { .. } => "stash_move_failed",
            Self::BaseLost { .. } => "base_lost",
            Self::CursorOccupied { .. } => "cursor_occupied",
            Self::CursorMismatch { .. } => "cursor_mismatch",
            Self::RuneNotOnCursor { .. } => "rune_not_on_cursor",
            Self::RuneLost { .. } => "rune_lost",
            Self::InsertFailed { .. } => "insert_failed",
            Self::SocketsDiverged { .. } => "sockets_diverged",
            Self::PrefixDidNotAdvance { .. } => "prefix_did_not_advance",
            Self::Driver(_) => "driver",
        }
    }
}
