//! Runeword recipe catalogue
//!
//! Recipes can be loaded from a RON file; the table below is the fallback
//! and the reference for rune order and accepted bases.

use serde::{Deserialize, Serialize};

use crate::items::{Item, StatKind};

/// Base category codes
pub mod category {
    pub const SWORD: &str = "swor";
    pub const AXE: &str = "axe";
    pub const MACE: &str = "mace";
    pub const CLUB: &str = "club";
    pub const HAMMER: &str = "hamm";
    pub const SCEPTER: &str = "scep";
    pub const WAND: &str = "wand";
    pub const STAFF: &str = "staf";
    pub const POLEARM: &str = "pole";
    pub const SPEAR: &str = "spea";
    pub const DAGGER: &str = "knif";
    pub const BOW: &str = "bow";
    pub const CROSSBOW: &str = "xbow";
    pub const CLAW: &str = "h2h";
    pub const ARMOR: &str = "tors";
    pub const HELM: &str = "helm";
    pub const CIRCLET: &str = "circ";
    pub const SHIELD: &str = "shie";
    pub const PALADIN_SHIELD: &str = "ashd";
}

use category::*;

const MELEE: &[&str] = &[SWORD, AXE, MACE, CLUB, HAMMER, SCEPTER, WAND, STAFF, POLEARM, SPEAR, DAGGER, CLAW];
const WEAPONS: &[&str] = &[
    SWORD, AXE, MACE, CLUB, HAMMER, SCEPTER, WAND, STAFF, POLEARM, SPEAR, DAGGER, CLAW, BOW, CROSSBOW,
];

/// A runeword recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// Runeword name; also the name the base takes once completed
    pub name: String,
    /// Runes in socket order (`TirRune`, `ElRune`, ...)
    pub runes: Vec<String>,
    /// Accepted base category codes
    pub base_types: Vec<String>,
    #[serde(default)]
    pub allow_ethereal: bool,
    /// Attributes ranking candidate bases, most important first
    #[serde(default)]
    pub sort_order: Vec<StatKind>,
}

impl Recipe {
    /// Build a recipe from short rune names (`"Tir"` -> `TirRune`)
    pub fn new(name: &str, runes: &[&str], base_types: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            runes: runes.iter().map(|r| format!("{r}Rune")).collect(),
            base_types: base_types.iter().map(|t| t.to_string()).collect(),
            allow_ethereal: false,
            sort_order: Vec::new(),
        }
    }

    pub fn allow_ethereal(mut self) -> Self {
        self.allow_ethereal = true;
        self
    }

    pub fn sorted_by(mut self, stats: &[StatKind]) -> Self {
        self.sort_order = stats.to_vec();
        self
    }

    /// Number of sockets a base needs
    pub fn socket_count(&self) -> usize {
        self.runes.len()
    }

    pub fn accepts_category(&self, category: &str) -> bool {
        self.base_types.iter().any(|t| t == category)
    }

    /// Whether `item` is this runeword
    pub fn is_instance(&self, item: &Item) -> bool {
        item.is_runeword && item.name == self.name
    }
}

/// The full recipe table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalogue {
    pub recipes: Vec<Recipe>,
}

impl Catalogue {
    pub fn new(recipes: Vec<Recipe>) -> Self {
        Self { recipes }
    }

    pub fn find(&self, name: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.iter()
    }

    /// Recipe completed by socketing `runes` into a base of `category`
    pub fn completed_by(&self, runes: &[&str], category: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| {
            r.accepts_category(category)
                && r.runes.len() == runes.len()
                && r.runes.iter().zip(runes).all(|(a, b)| a == b)
        })
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

/// Hardcoded recipe table
pub fn default_catalogue() -> Catalogue {
    use StatKind::*;

    Catalogue::new(vec![
        // Low level
        Recipe::new("Steel", &["Tir", "El"], &[SWORD, AXE, MACE, CLUB]),
        Recipe::new("Malice", &["Ith", "El", "Eth"], MELEE),
        Recipe::new("Strength", &["Amn", "Tir"], MELEE),
        Recipe::new("Stealth", &["Tal", "Eth"], &[ARMOR]),
        Recipe::new("Leaf", &["Tir", "Ral"], &[STAFF]),
        Recipe::new("Nadir", &["Nef", "Tir"], &[HELM, CIRCLET]),
        Recipe::new("Smoke", &["Nef", "Lum"], &[ARMOR]),
        Recipe::new("Lore", &["Ort", "Sol"], &[HELM, CIRCLET]),
        Recipe::new("Rhyme", &["Shael", "Eth"], &[SHIELD, PALADIN_SHIELD]),
        Recipe::new("Ancients' Pledge", &["Ral", "Ort", "Tal"], &[SHIELD, PALADIN_SHIELD]),
        Recipe::new("Zephyr", &["Ort", "Eth"], &[BOW, CROSSBOW]),
        Recipe::new("Edge", &["Tir", "Tal", "Amn"], &[BOW, CROSSBOW]),
        Recipe::new("Melody", &["Shael", "Ko", "Nef"], &[BOW, CROSSBOW]),
        Recipe::new("Splendor", &["Eth", "Lum"], &[SHIELD, PALADIN_SHIELD]),
        Recipe::new("Prudence", &["Mal", "Tir"], &[ARMOR]),
        // Mid level
        Recipe::new("Insight", &["Ral", "Tir", "Tal", "Sol"], &[POLEARM, STAFF, BOW, CROSSBOW])
            .allow_ethereal()
            .sorted_by(&[TwoHandedMaxDamage, MaxDamage]),
        Recipe::new("Spirit", &["Tal", "Thul", "Ort", "Amn"], &[SWORD, SHIELD, PALADIN_SHIELD]),
        Recipe::new("Lawbringer", &["Amn", "Lem", "Ko"], &[SWORD, HAMMER, SCEPTER]),
        Recipe::new("King's Grace", &["Amn", "Ral", "Thul"], &[SWORD, SCEPTER]),
        Recipe::new("Treachery", &["Shael", "Thul", "Lem"], &[ARMOR]),
        Recipe::new("Lionheart", &["Hel", "Lum", "Fal"], &[ARMOR]),
        Recipe::new("Myth", &["Hel", "Amn", "Nef"], &[ARMOR]),
        Recipe::new("Peace", &["Shael", "Thul", "Amn"], &[ARMOR]),
        Recipe::new("Rain", &["Ort", "Mal", "Ith"], &[ARMOR]),
        Recipe::new("Honor", &["Amn", "El", "Ith", "Tir", "Sol"], MELEE),
        Recipe::new("Obedience", &["Hel", "Ko", "Thul", "Eth", "Fal"], &[POLEARM, SPEAR])
            .allow_ethereal()
            .sorted_by(&[TwoHandedMaxDamage]),
        Recipe::new("Duress", &["Shael", "Um", "Thul"], &[ARMOR]),
        Recipe::new("Bone", &["Sol", "Um", "Um"], &[ARMOR]),
        Recipe::new("Heart of the Oak", &["Ko", "Vex", "Pul", "Thul"], &[STAFF, MACE, CLUB]),
        // High level
        Recipe::new("Call to Arms", &["Amn", "Ral", "Mal", "Ist", "Ohm"], WEAPONS),
        Recipe::new("Fortitude", &["El", "Sol", "Dol", "Lo"], &[ARMOR])
            .sorted_by(&[Defense]),
        Recipe::new("Chains of Honor", &["Dol", "Um", "Ber", "Ist"], &[ARMOR])
            .sorted_by(&[Defense]),
        Recipe::new("Enigma", &["Jah", "Ith", "Ber"], &[ARMOR])
            .sorted_by(&[Defense]),
        Recipe::new("Grief", &["Eth", "Tir", "Lo", "Mal", "Ral"], &[SWORD, AXE])
            .sorted_by(&[MaxDamage, TwoHandedMaxDamage]),
        Recipe::new("Infinity", &["Ber", "Mal", "Ber", "Ist"], &[POLEARM, SPEAR])
            .allow_ethereal()
            .sorted_by(&[TwoHandedMaxDamage]),
        Recipe::new("Pride", &["Cham", "Sur", "Io", "Lo"], &[POLEARM])
            .allow_ethereal()
            .sorted_by(&[TwoHandedMaxDamage]),
    ])
}
