//! Configuration surface
//!
//! Per-character settings for the runeword maker, already parsed.

pub mod character;
pub mod difficulty;
pub mod loader;

pub use character::{
    CharacterConfig, EthMode, QualityMode, RerollRule, RunewordMakerConfig, RunewordOverride,
    UpgradePolicy,
};
pub use difficulty::Difficulty;
pub use loader::{
    config_directory, default_config_path, load_character_config, parse_character_config,
    ConfigError,
};
