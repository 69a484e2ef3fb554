//! RON data loader
//!
//! Loads the runeword catalogue from an external RON file, with fallback to
//! the hardcoded table.

use std::fs;
use std::path::{Path, PathBuf};

use super::runewords::{default_catalogue, Catalogue};

/// Default location of external game data
pub const DATA_DIR: &str = "assets/data";

const RUNEWORDS_FILE: &str = "runewords.ron";

/// Manages external game data
#[derive(Debug, Clone)]
pub struct DataManager {
    /// Runeword recipes
    pub runewords: Catalogue,
}

impl DataManager {
    /// Load from the default data directory or fall back to defaults
    pub fn new() -> Self {
        Self::load_from(Path::new(DATA_DIR))
    }

    /// Load from `base_path`, falling back to defaults per file
    pub fn load_from(base_path: &Path) -> Self {
        Self {
            runewords: Self::load_runewords(base_path),
        }
    }

    /// Load the runeword catalogue from RON file
    fn load_runewords(base_path: &Path) -> Catalogue {
        let path = base_path.join(RUNEWORDS_FILE);
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => match ron::from_str::<Catalogue>(&content) {
                    Ok(catalogue) if !catalogue.is_empty() => {
                        log::info!("Loaded {} runeword recipes from {:?}", catalogue.len(), path);
                        return catalogue;
                    }
                    Ok(_) => log::warn!("{:?} has no recipes, using defaults", path),
                    Err(e) => log::warn!("Failed to parse {:?}: {}", path, e),
                },
                Err(e) => log::warn!("Failed to read {:?}: {}", path, e),
            }
        }
        default_catalogue()
    }

    /// Get the runeword catalogue
    pub fn catalogue(&self) -> &Catalogue {
        &self.runewords
    }
}

impl Default for DataManager {
    fn default() -> Self {
        Self {
            runewords: default_catalogue(),
        }
    }
}

/// Export the default catalogue to RON for editing
pub fn export_default_data(base_path: &Path) -> Result<PathBuf, String> {
    if !base_path.exists() {
        fs::create_dir_all(base_path)
            .map_err(|e| format!("Failed to create {:?}: {}", base_path, e))?;
    }

    let catalogue = default_catalogue();
    let ron = ron::ser::to_string_pretty(&catalogue, ron::ser::PrettyConfig::default())
        .map_err(|e| format!("Failed to serialize runewords: {}", e))?;
    let path = base_path.join(RUNEWORDS_FILE);
    fs::write(&path, ron).map_err(|e| format!("Failed to write {:?}: {}", path, e))?;

    Ok(path)
}
