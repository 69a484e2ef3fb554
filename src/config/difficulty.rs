//! Difficulty settings and the base tier each difficulty calls for

use serde::{Deserialize, Serialize};

use crate::items::Tier;

/// Game difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Normal,
    Nightmare,
    Hell,
}

impl Difficulty {
    /// Base tier picked when tiers follow difficulty
    pub fn base_tier(&self) -> Tier {
        match self {
            Difficulty::Normal => Tier::Normal,
            Difficulty::Nightmare => Tier::Exceptional,
            Difficulty::Hell => Tier::Elite,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Difficulty::Normal => "Normal",
            Difficulty::Nightmare => "Nightmare",
            Difficulty::Hell => "Hell",
        }
    }
}
