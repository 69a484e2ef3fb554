//! Character and runeword maker configuration
//!
//! Received already parsed; see [`super::loader`] for reading it from RON.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::difficulty::Difficulty;
use crate::items::{InventoryLock, Item, Quality, StatKind, Tier};

/// Ethereal restriction for a recipe's bases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EthMode {
    #[default]
    Any,
    Eth,
    NonEth,
}

/// Quality restriction for a recipe's bases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QualityMode {
    #[default]
    Any,
    Normal,
    Superior,
}

impl QualityMode {
    /// Whether `quality` passes; `Any` falls back to "superior or worse"
    pub fn accepts(&self, quality: Quality) -> bool {
        match self {
            QualityMode::Normal => quality == Quality::Normal,
            QualityMode::Superior => quality == Quality::Superior,
            QualityMode::Any => quality <= Quality::Superior,
        }
    }
}

/// How the upgrade gate treats a candidate of the same tier as the
/// runeword the character already owns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UpgradePolicy {
    /// Only a strictly higher tier is an upgrade
    StrictTier,
    /// Equal tier is allowed when the recipe ranks bases by attributes
    #[default]
    AllowEqualTierWhenRanked,
}

/// Per-runeword restrictions, ignored for leveling characters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunewordOverride {
    pub eth_mode: EthMode,
    pub quality_mode: QualityMode,
    /// Comma-separated category codes (`"swor,shie"`)
    pub base_type: String,
    /// Comma-separated tiers (`"exceptional,elite"`)
    pub base_tier: String,
    /// Comma-separated normalized base codes (`"crystalsword"`)
    pub base_name: String,
}

impl RunewordOverride {
    pub fn base_types(&self) -> Vec<String> {
        split_list(&self.base_type)
    }

    /// Parsed tier whitelist; unknown keywords are dropped
    pub fn base_tiers(&self) -> Vec<Tier> {
        split_list(&self.base_tier).iter().filter_map(|t| Tier::parse(t)).collect()
    }

    pub fn base_names(&self) -> Vec<String> {
        split_list(&self.base_name)
            .into_iter()
            .map(|n| n.to_ascii_lowercase())
            .collect()
    }
}

/// Stat thresholds an owned runeword must reach to be kept
///
/// A recipe with reroll rules is crafted even if it is not in
/// `enabled_recipes`, and an owned instance failing every rule does not
/// block the upgrade gate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RerollRule {
    pub min_stats: BTreeMap<StatKind, i32>,
}

impl RerollRule {
    /// Whether `item` reaches every threshold; a missing stat fails
    pub fn is_met_by(&self, item: &Item) -> bool {
        self.min_stats
            .iter()
            .all(|(stat, min)| item.stat(*stat).is_some_and(|v| v >= *min))
    }
}

/// Runeword maker settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunewordMakerConfig {
    pub enabled: bool,
    pub enabled_recipes: Vec<String>,
    pub auto_upgrade: bool,
    pub only_if_wearable: bool,
    pub auto_tier_by_difficulty: bool,
    pub upgrade_policy: UpgradePolicy,
    pub overrides: BTreeMap<String, RunewordOverride>,
    pub reroll_rules: BTreeMap<String, Vec<RerollRule>>,
}

impl Default for RunewordMakerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            enabled_recipes: Vec::new(),
            auto_upgrade: false,
            only_if_wearable: false,
            auto_tier_by_difficulty: false,
            upgrade_policy: UpgradePolicy::default(),
            overrides: BTreeMap::new(),
            reroll_rules: BTreeMap::new(),
        }
    }
}

impl RunewordMakerConfig {
    /// Recipes to process: enabled ones, plus reroll-rule recipes unless leveling
    pub fn active_recipes(&self, leveling: bool) -> BTreeSet<String> {
        let mut set: BTreeSet<String> = self.enabled_recipes.iter().cloned().collect();
        if !leveling {
            set.extend(self.reroll_rules.keys().cloned());
        }
        set
    }
}

/// Per-character settings the engine reads
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterConfig {
    /// Class tag, e.g. `sorceress` or `barb_leveling`
    pub class: String,
    pub difficulty: Difficulty,
    pub inventory_lock: InventoryLock,
    pub runeword_maker: RunewordMakerConfig,
}

impl CharacterConfig {
    /// Leveling builds ignore overrides and never unsocket
    pub fn is_leveling(&self) -> bool {
        self.class.ends_with("_leveling")
    }

    pub fn is_barb_leveling(&self) -> bool {
        self.class == "barb_leveling"
    }
}

fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}
