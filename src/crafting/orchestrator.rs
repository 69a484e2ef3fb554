//! Orchestrator
//!
//! Walks the catalogue in order and, for every enabled recipe, keeps
//! selecting, gathering and crafting until the recipe runs dry.

use std::collections::HashSet;

use serde::Serialize;

use super::error::CraftError;
use super::executor::{craft, CraftPlan};
use super::gathering::{gather_runes, rune_ids};
use super::selection::select_base;
use crate::data::Recipe;
use crate::items::UnitId;
use crate::session::{EngineDeps, Refresh};

/// A runeword the engine finished
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedRuneword {
    pub recipe: String,
    pub base: UnitId,
    pub base_name: String,
}

/// Why the engine stopped working on a recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecipeEnd {
    /// No base left that passes the filters
    NoBase,
    /// A base exists but its runes do not
    NoRunes,
    /// Abandoned after a recoverable failure
    Skipped { reason: String },
    /// A soft craft error ended the recipe
    Rejected { error: String, message: String },
}

/// What happened to one recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeReport {
    pub recipe: String,
    pub created: Vec<CreatedRuneword>,
    pub ended_by: RecipeEnd,
}

/// Summary of one maker run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CraftReport {
    pub recipes: Vec<RecipeReport>,
}

impl CraftReport {
    /// Every runeword created, in creation order
    pub fn created(&self) -> impl Iterator<Item = &CreatedRuneword> {
        self.recipes.iter().flat_map(|r| r.created.iter())
    }

    pub fn created_count(&self) -> usize {
        self.recipes.iter().map(|r| r.created.len()).sum()
    }

    pub fn recipe(&self, name: &str) -> Option<&RecipeReport> {
        self.recipes.iter().find(|r| r.recipe == name)
    }
}

/// Build every enabled runeword the character has the materials for
///
/// Soft failures end the current recipe and are recorded in the report;
/// hard failures stop the run and are returned.
pub fn make_runewords(deps: &mut EngineDeps<'_>) -> Result<CraftReport, CraftError> {
    let mut report = CraftReport::default();
    let maker = &deps.config.runeword_maker;
    if !maker.enabled {
        return Ok(report);
    }

    let active = maker.active_recipes(deps.config.is_leveling());
    if active.is_empty() {
        return Ok(report);
    }

    let catalogue = deps.catalogue;
    for recipe in catalogue.iter().filter(|r| active.contains(&r.name)) {
        log::debug!("Processing runeword recipe {}", recipe.name);
        report.recipes.push(process_recipe(deps, recipe)?);
    }

    log::info!("Runeword maker finished, {} runeword(s) created", report.created_count());
    Ok(report)
}

fn process_recipe(deps: &mut EngineDeps<'_>, recipe: &Recipe) -> Result<RecipeReport, CraftError> {
    let mut created = Vec::new();
    let mut crafted: HashSet<UnitId> = HashSet::new();

    let ended_by = loop {
        let (plan, base_name) = {
            let view = deps.view();
            let Some(candidate) = select_base(&view, recipe, deps.config) else {
                log::debug!("{}: no suitable base", recipe.name);
                break RecipeEnd::NoBase;
            };
            if crafted.contains(&candidate.id) {
                log::warn!("{}: base {} selected again after crafting", recipe.name, candidate.id);
                break RecipeEnd::NoBase;
            }

            let storage = view.storage();
            let Some(runes) = gather_runes(&storage, &recipe.runes[candidate.prefix..]) else {
                log::debug!("{}: no runes for base {}", recipe.name, candidate.id);
                break RecipeEnd::NoRunes;
            };

            let base_name = view
                .find_by_id(candidate.id)
                .map(|b| b.display_name.clone())
                .unwrap_or_default();
            let plan = CraftPlan {
                base: candidate.id,
                prefix: candidate.prefix,
                unsocket: candidate.unsocket,
                runes: rune_ids(&runes),
            };
            (plan, base_name)
        };

        match craft(deps, recipe, &plan) {
            Ok(()) => {
                log::info!("Created runeword {} on {} ({})", recipe.name, base_name, plan.base);
                crafted.insert(plan.base);
                created.push(CreatedRuneword { recipe: recipe.name.clone(), base: plan.base, base_name });
                deps.refresh(Refresh::All);
            }
            Err(CraftError::Skip { reason, .. }) => {
                log::debug!("{}: skipping recipe ({})", recipe.name, reason);
                break RecipeEnd::Skipped { reason };
            }
            Err(err) if err.is_soft() => {
                log::warn!("{} error: {}", err.severity().as_str(), err);
                break RecipeEnd::Rejected { error: err.kind().to_string(), message: err.to_string() };
            }
            Err(err) => return Err(err),
        }
    };

    Ok(RecipeReport { recipe: recipe.name.clone(), created, ended_by })
}
