//! Reading character configs from disk

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::character::CharacterConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

/// Get the config directory path
pub fn config_directory() -> PathBuf {
    use directories::ProjectDirs;

    if let Some(proj_dirs) = ProjectDirs::from("com", "runeforge", "Runeforge") {
        proj_dirs.config_dir().to_path_buf()
    } else {
        // Fallback to current directory
        PathBuf::from("./config")
    }
}

/// Default character config location
pub fn default_config_path() -> PathBuf {
    config_directory().join("character.ron")
}

/// Parse a character config from RON text
pub fn parse_character_config(text: &str, path: &Path) -> Result<CharacterConfig, ConfigError> {
    ron::from_str(text).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
}

/// Load a character config from a RON file
pub fn load_character_config(path: &Path) -> Result<CharacterConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
    let config = parse_character_config(&text, path)?;
    log::info!("Character config loaded from {:?}", path);
    Ok(config)
}
