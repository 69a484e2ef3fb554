//! Item definitions
//!
//! Items as the snapshot provider reports them: identity, storage location,
//! base properties and the ordered list of socketed items.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Category code carried by every rune
pub const RUNE_CATEGORY: &str = "rune";

/// Rune consumed (with a scroll) to clear a base's sockets
pub const UNSOCKET_REAGENT: &str = "HelRune";

/// Game-assigned identity of an item instance
///
/// Positions, pages and socket lists change underneath the engine, so every
/// reference is kept as a `UnitId` and re-resolved after each effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Storage zones an item can live in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    Inventory,
    Stash,
    SharedStash,
    Equipped,
    Mercenary,
    Cube,
    Ground,
    Cursor,
    Vendor,
    /// Inside another item's socket
    Socket,
}

impl Zone {
    /// Zones the crafting engine draws bases and runes from
    pub const STORAGE: [Zone; 3] = [Zone::Inventory, Zone::Stash, Zone::SharedStash];

    /// Whether reaching this zone requires the stash to be open
    pub fn is_stash(&self) -> bool {
        matches!(self, Zone::Stash | Zone::SharedStash)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Zone::Inventory => "inventory",
            Zone::Stash => "stash",
            Zone::SharedStash => "shared stash",
            Zone::Equipped => "equipped",
            Zone::Mercenary => "mercenary",
            Zone::Cube => "cube",
            Zone::Ground => "ground",
            Zone::Cursor => "cursor",
            Zone::Vendor => "vendor",
            Zone::Socket => "socket",
        }
    }
}

/// Body slots for equipped and mercenary items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodySlot {
    Head,
    Neck,
    LeftArm,
    RightArm,
    Torso,
    LeftRing,
    RightRing,
    Belt,
    Feet,
    Gloves,
}

/// A cell in a grid zone (inventory, stash page, cube)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Cell {
    pub x: u8,
    pub y: u8,
}

impl Cell {
    pub fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }
}

/// Where an item currently lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub zone: Zone,
    /// Stash page: 0 for the personal stash, 1.. for shared pages
    #[serde(default)]
    pub page: u8,
    #[serde(default)]
    pub body_slot: Option<BodySlot>,
    /// Top-left cell for grid zones
    #[serde(default)]
    pub cell: Cell,
}

impl Location {
    pub fn inventory(x: u8, y: u8) -> Self {
        Self { zone: Zone::Inventory, page: 0, body_slot: None, cell: Cell::new(x, y) }
    }

    pub fn stash(x: u8, y: u8) -> Self {
        Self { zone: Zone::Stash, page: 0, body_slot: None, cell: Cell::new(x, y) }
    }

    pub fn shared_stash(page: u8, x: u8, y: u8) -> Self {
        Self { zone: Zone::SharedStash, page, body_slot: None, cell: Cell::new(x, y) }
    }

    pub fn equipped(slot: BodySlot) -> Self {
        Self { zone: Zone::Equipped, page: 0, body_slot: Some(slot), cell: Cell::default() }
    }

    pub fn cursor() -> Self {
        Self { zone: Zone::Cursor, page: 0, body_slot: None, cell: Cell::default() }
    }

    pub fn ground() -> Self {
        Self { zone: Zone::Ground, page: 0, body_slot: None, cell: Cell::default() }
    }

    pub fn socket(slot: u8) -> Self {
        Self { zone: Zone::Socket, page: 0, body_slot: None, cell: Cell::new(slot, 0) }
    }

    /// Stash tab (1..=4) showing this location, if it is a stash location
    ///
    /// The personal stash is tab 1, shared page `p` is tab `p + 1`.
    pub fn stash_tab(&self) -> Option<u8> {
        match self.zone {
            Zone::Stash => Some(1),
            Zone::SharedStash => Some(self.page + 1),
            _ => None,
        }
    }
}

/// Base item tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Tier {
    #[default]
    Normal,
    Exceptional,
    Elite,
}

impl Tier {
    pub fn name(&self) -> &'static str {
        match self {
            Tier::Normal => "normal",
            Tier::Exceptional => "exceptional",
            Tier::Elite => "elite",
        }
    }

    /// Parse a tier keyword (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Some(Tier::Normal),
            "exceptional" => Some(Tier::Exceptional),
            "elite" => Some(Tier::Elite),
            _ => None,
        }
    }
}

/// Item quality, ordered from plain to crafted
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Quality {
    #[default]
    Normal,
    Superior,
    Magic,
    Rare,
    Set,
    Unique,
    Crafted,
}

/// Typed attributes used to rank candidate bases
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StatKind {
    MinDamage,
    MaxDamage,
    TwoHandedMinDamage,
    TwoHandedMaxDamage,
    Defense,
    EnhancedDefense,
    EnhancedDamage,
    MaxDurability,
    AttackRating,
}

/// An item instance as reported by the snapshot provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: UnitId,
    /// Category code (e.g. `swor`, `tors`, `rune`)
    pub category: String,
    /// Canonical descriptive name of the base (e.g. "Crystal Sword")
    pub display_name: String,
    /// Current name; runes are identified by it (`TirRune`), and it becomes
    /// the runeword name once a runeword is completed
    pub name: String,
    #[serde(default)]
    pub tier: Tier,
    #[serde(default)]
    pub quality: Quality,
    #[serde(default)]
    pub ethereal: bool,
    #[serde(default)]
    pub is_runeword: bool,
    /// Total sockets the item has
    #[serde(default)]
    pub socket_count: u8,
    /// Items in the sockets, in slot order
    #[serde(default)]
    pub socketed: Vec<Item>,
    pub location: Location,
    /// Inventory footprint (width, height) in cells
    pub size: (u8, u8),
    #[serde(default)]
    pub required_strength: u32,
    #[serde(default)]
    pub required_dexterity: u32,
    #[serde(default)]
    pub stats: BTreeMap<StatKind, i32>,
}

impl Item {
    /// Create a 1x1 item with default properties
    pub fn new(id: u32, name: impl Into<String>, category: impl Into<String>, location: Location) -> Self {
        let name = name.into();
        Self {
            id: UnitId(id),
            category: category.into(),
            display_name: name.clone(),
            name,
            tier: Tier::Normal,
            quality: Quality::Normal,
            ethereal: false,
            is_runeword: false,
            socket_count: 0,
            socketed: Vec::new(),
            location,
            size: (1, 1),
            required_strength: 0,
            required_dexterity: 0,
            stats: BTreeMap::new(),
        }
    }

    /// Create a rune (`"Tir"` becomes `TirRune`)
    pub fn rune(id: u32, rune: &str, location: Location) -> Self {
        let name = if rune.ends_with("Rune") { rune.to_string() } else { format!("{rune}Rune") };
        let mut item = Self::new(id, name, RUNE_CATEGORY, location);
        item.display_name = item.name.trim_end_matches("Rune").to_string() + " Rune";
        item
    }

    /// Create a socketed base
    pub fn base(
        id: u32,
        display_name: &str,
        category: &str,
        sockets: u8,
        size: (u8, u8),
        location: Location,
    ) -> Self {
        let mut item = Self::new(id, display_name.replace(' ', ""), category, location);
        item.display_name = display_name.to_string();
        item.socket_count = sockets;
        item.size = size;
        item
    }

    pub fn with_tier(mut self, tier: Tier) -> Self {
        self.tier = tier;
        self
    }

    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_ethereal(mut self, ethereal: bool) -> Self {
        self.ethereal = ethereal;
        self
    }

    pub fn with_requirements(mut self, strength: u32, dexterity: u32) -> Self {
        self.required_strength = strength;
        self.required_dexterity = dexterity;
        self
    }

    pub fn with_stat(mut self, stat: StatKind, value: i32) -> Self {
        self.stats.insert(stat, value);
        self
    }

    /// Fill sockets with the given runes, in slot order
    pub fn with_socketed_runes(mut self, runes: &[&str], first_id: u32) -> Self {
        self.socketed = runes
            .iter()
            .enumerate()
            .map(|(slot, r)| Item::rune(first_id + slot as u32, r, Location::socket(slot as u8)))
            .collect();
        self
    }

    pub fn is_rune(&self) -> bool {
        self.category == RUNE_CATEGORY
    }

    pub fn has_socketed_items(&self) -> bool {
        !self.socketed.is_empty()
    }

    /// Names of the socketed items, in slot order
    pub fn socketed_names(&self) -> Vec<&str> {
        self.socketed.iter().map(|i| i.name.as_str()).collect()
    }

    pub fn stat(&self, stat: StatKind) -> Option<i32> {
        self.stats.get(&stat).copied()
    }

    pub fn is_two_handed(&self) -> bool {
        self.stats.contains_key(&StatKind::TwoHandedMinDamage)
            || self.stats.contains_key(&StatKind::TwoHandedMaxDamage)
    }

    /// Sum of strength and dexterity requirements
    pub fn requirement_total(&self) -> u32 {
        self.required_strength + self.required_dexterity
    }

    /// Normalized base code used by name whitelists ("Crystal Sword" -> `crystalsword`)
    pub fn base_code(&self) -> String {
        normalize_base_name(&self.display_name)
    }

    pub fn in_zone(&self, zones: &[Zone]) -> bool {
        zones.contains(&self.location.zone)
    }
}

/// Lowercase a descriptive name and strip everything but letters and digits
pub fn normalize_base_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
