//! Base selection
//!
//! Filters storage items down to bases a recipe can be built on and ranks
//! them deterministically. Reads the view, never mutates anything.

use std::cmp::Ordering;

use super::sockets::{can_unsocket, prefix_match, SocketStatus};
use crate::config::{CharacterConfig, EthMode, QualityMode, RerollRule, UpgradePolicy};
use crate::data::{category, Recipe};
use crate::items::{InventoryView, Item, RuneBudget, StatKind, Tier, UnitId, Zone};
use crate::session::BaseStats;

/// Recipes the leveling barbarian only builds on one-handed maces and clubs
const BARB_ONE_HAND_RECIPES: [&str; 3] = ["Steel", "Malice", "Strength"];

/// Zones searched for a runeword the character already owns
const OWNED_ZONES: [Zone; 4] = [Zone::Inventory, Zone::Equipped, Zone::Stash, Zone::SharedStash];

/// A base that passed every filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub id: UnitId,
    /// Matching socket prefix the craft resumes from
    pub prefix: usize,
    /// Base must be cleared before socketing
    pub unsocket: bool,
}

/// Restrictions in effect for one recipe
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub eth_mode: EthMode,
    pub quality_mode: QualityMode,
    pub categories: Vec<String>,
    pub tiers: Vec<Tier>,
    pub names: Vec<String>,
    pub allow_unsocket: bool,
    pub barb_one_hand: bool,
    pub check_upgrade: bool,
    pub only_if_wearable: bool,
    pub upgrade_policy: UpgradePolicy,
    /// Owned instances failing all of these are due for a reroll
    pub reroll_rules: Vec<RerollRule>,
}

impl Filters {
    /// Combine recipe overrides, global flags and class policy
    pub fn derive(recipe: &Recipe, config: &CharacterConfig) -> Self {
        let maker = &config.runeword_maker;
        let leveling = config.is_leveling();

        let mut filters = Filters {
            allow_unsocket: !leveling,
            barb_one_hand: config.is_barb_leveling() && BARB_ONE_HAND_RECIPES.contains(&recipe.name.as_str()),
            check_upgrade: leveling || maker.auto_upgrade,
            only_if_wearable: maker.only_if_wearable,
            upgrade_policy: maker.upgrade_policy,
            ..Filters::default()
        };

        if !leveling {
            filters.reroll_rules = maker.reroll_rules.get(&recipe.name).cloned().unwrap_or_default();
            if let Some(ov) = maker.overrides.get(&recipe.name) {
                filters.eth_mode = ov.eth_mode;
                filters.quality_mode = ov.quality_mode;
                filters.categories = ov.base_types();
                filters.tiers = ov.base_tiers();
                filters.names = ov.base_names();
            }
        }

        if filters.tiers.is_empty() && maker.auto_tier_by_difficulty {
            filters.tiers.push(config.difficulty.base_tier());
        }

        filters
    }

    /// Checks that depend only on the item itself
    fn admits(&self, item: &Item, recipe: &Recipe) -> bool {
        if !recipe.accepts_category(&item.category) {
            return false;
        }
        if !self.categories.is_empty() && !self.categories.iter().any(|c| *c == item.category) {
            return false;
        }
        if self.barb_one_hand && !is_one_handed_mace(item) {
            return false;
        }
        if usize::from(item.socket_count) != recipe.socket_count() {
            return false;
        }
        let eth_ok = match self.eth_mode {
            EthMode::Eth => item.ethereal,
            EthMode::NonEth => !item.ethereal,
            EthMode::Any => !item.ethereal || recipe.allow_ethereal,
        };
        if !eth_ok || !self.quality_mode.accepts(item.quality) || item.is_runeword {
            return false;
        }
        if !self.tiers.is_empty() && !self.tiers.contains(&item.tier) {
            return false;
        }
        if !self.names.is_empty() && !self.names.contains(&item.base_code()) {
            return false;
        }
        true
    }
}

fn is_one_handed_mace(item: &Item) -> bool {
    (item.category == category::MACE || item.category == category::CLUB) && !item.is_two_handed()
}

/// Whether the character's unmodified stats cover the base's requirements
pub fn meets_requirements(stats: &BaseStats, item: &Item) -> bool {
    stats.strength >= item.required_strength && stats.dexterity >= item.required_dexterity
}

/// Highest base tier of an owned instance of `recipe` in `category`
///
/// With reroll rules, only instances meeting at least one rule count.
pub fn owned_runeword_tier(
    view: &InventoryView<'_>,
    recipe: &Recipe,
    category: &str,
    reroll_rules: &[RerollRule],
) -> Option<Tier> {
    view.by_location(&OWNED_ZONES)
        .into_iter()
        .filter(|i| recipe.is_instance(i) && i.category == category)
        .filter(|i| reroll_rules.is_empty() || reroll_rules.iter().any(|r| r.is_met_by(i)))
        .map(|i| i.tier)
        .max()
}

/// Whether `candidate` would replace an owned runeword with something better
fn passes_upgrade_gate(policy: UpgradePolicy, recipe: &Recipe, candidate: Tier, owned: Option<Tier>) -> bool {
    let Some(owned) = owned else {
        return true;
    };
    match policy {
        UpgradePolicy::StrictTier => candidate > owned,
        UpgradePolicy::AllowEqualTierWhenRanked => {
            candidate > owned || (candidate == owned && !recipe.sort_order.is_empty())
        }
    }
}

/// Every usable base, best first
pub fn rank_candidates(view: &InventoryView<'_>, recipe: &Recipe, config: &CharacterConfig) -> Vec<Candidate> {
    let filters = Filters::derive(recipe, config);
    let storage = view.storage();
    let budget = RuneBudget::from_items(storage.iter().copied());
    let stats = view.snapshot().base_stats;

    let mut usable: Vec<(&Item, Candidate)> = Vec::new();
    for item in storage.iter().copied() {
        if !filters.admits(item, recipe) {
            continue;
        }

        let matched = prefix_match(item, recipe);
        let (prefix, unsocket) = match matched.status {
            SocketStatus::Ok if matched.len < recipe.socket_count() => (matched.len, false),
            // Exactly one HelRune beyond the recipe's own runes is enough; a Hel the recipe spends is never the reagent
            SocketStatus::RuneMismatch if filters.allow_unsocket && can_unsocket(&budget, recipe, &matched) => {
                (0, true)
            }
            _ => {
                if item.has_socketed_items() {
                    log::debug!("{}: skipping base {} ({})", recipe.name, item.id, matched);
                }
                continue;
            }
        };

        if filters.check_upgrade {
            let owned = owned_runeword_tier(view, recipe, &item.category, &filters.reroll_rules);
            if !passes_upgrade_gate(filters.upgrade_policy, recipe, item.tier, owned) {
                log::debug!("{}: base {} is not an upgrade over the owned runeword", recipe.name, item.id);
                continue;
            }
        }

        if filters.only_if_wearable && !meets_requirements(&stats, item) {
            log::debug!("{}: base {} is not wearable", recipe.name, item.id);
            continue;
        }

        usable.push((item, Candidate { id: item.id, prefix, unsocket }));
    }

    // Only attributes at least one candidate carries take part in ranking
    let sort_stats: Vec<StatKind> = recipe
        .sort_order
        .iter()
        .copied()
        .filter(|s| usable.iter().any(|(item, _)| item.stat(*s).is_some()))
        .collect();

    usable.sort_by(|(a_item, a), (b_item, b)| {
        b.prefix
            .cmp(&a.prefix)
            .then(a.unsocket.cmp(&b.unsocket))
            .then_with(|| {
                if sort_stats.is_empty() {
                    a_item.requirement_total().cmp(&b_item.requirement_total())
                } else {
                    compare_stats(&sort_stats, a_item, b_item)
                }
            })
    });

    usable.into_iter().map(|(_, c)| c).collect()
}

/// Higher values first; an item missing a stat sorts after one that has it
fn compare_stats(stats: &[StatKind], a: &Item, b: &Item) -> Ordering {
    for stat in stats {
        let ord = match (a.stat(*stat), b.stat(*stat)) {
            (None, None) => continue,
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (Some(x), Some(y)) => y.cmp(&x),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

/// The best base for `recipe`, if any
pub fn select_base(view: &InventoryView<'_>, recipe: &Recipe, config: &CharacterConfig) -> Option<Candidate> {
    rank_candidates(view, recipe, config).into_iter().next()
}
