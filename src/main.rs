//! Runeforge - Demo runner
//!
//! Loads a character config and a simulated world, runs the runeword maker
//! against the simulator and prints the report as JSON.
//!
//! Usage: `runeforge [character.ron] [scenario.ron]`
//!        `runeforge --export-data` writes the recipe table to `assets/data`

use std::path::PathBuf;

use anyhow::{Context, Result};

use runeforge::config::{default_config_path, load_character_config};
use runeforge::crafting::make_runewords;
use runeforge::data::{export_default_data, DataManager, DATA_DIR};
use runeforge::session::EngineDeps;
use runeforge::sim::{load_scenario, SimSession};

const DEMO_CONFIG: &str = "assets/config/character.ron";
const DEMO_SCENARIO: &str = "assets/scenarios/demo.ron";

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting Runeforge v{}", env!("CARGO_PKG_VERSION"));

    let mut args = std::env::args().skip(1).peekable();
    if args.peek().map(String::as_str) == Some("--export-data") {
        let path = export_default_data(std::path::Path::new(DATA_DIR)).map_err(anyhow::Error::msg)?;
        log::info!("Exported runeword catalogue to {:?}", path);
        return Ok(());
    }

    let config_path = args.next().map(PathBuf::from).unwrap_or_else(|| {
        let user = default_config_path();
        if user.exists() {
            user
        } else {
            PathBuf::from(DEMO_CONFIG)
        }
    });
    let scenario_path = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from(DEMO_SCENARIO));

    let config = load_character_config(&config_path).context("loading character config")?;
    let scenario = load_scenario(&scenario_path).context("loading scenario")?;
    log::info!("Character {} ({})", config.class, config.difficulty.name());
    let data = DataManager::new();

    let session = SimSession::new(scenario.world, data.catalogue().clone()).with_faults(scenario.faults);
    let (mut driver, mut world) = session.split();
    let mut deps = EngineDeps::new(&mut world, &mut driver, &config, data.catalogue());

    let report = match make_runewords(&mut deps) {
        Ok(report) => report,
        Err(e) => {
            log::error!("Runeword maker stopped: {} ({} {})", e, e.severity().as_str(), e.kind());
            return Err(e.into());
        }
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    log::info!(
        "Runeforge finished: {} runeword(s), {} click(s)",
        report.created_count(),
        session.clicks()
    );
    Ok(())
}
