//! World fixtures for the simulator

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::world::Faults;
use crate::config::ConfigError;
use crate::session::Snapshot;

/// Starting world plus the faults to inject
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub world: Snapshot,
    pub faults: Faults,
}

/// Load a scenario from a RON file
pub fn load_scenario(path: &Path) -> Result<Scenario, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
    let scenario: Scenario =
        ron::from_str(&text).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
    log::info!("Scenario loaded from {:?} ({} items)", path, scenario.world.items.len());
    Ok(scenario)
}
