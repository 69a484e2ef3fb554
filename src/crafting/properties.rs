//! Randomized checks over generated worlds

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::*;
use crate::config::CharacterConfig;
use crate::data::{default_catalogue, Recipe};
use crate::items::{InventoryGrid, InventoryLock, InventoryView, Item, Location, RuneBudget, UnitId, INVENTORY_HEIGHT, INVENTORY_WIDTH};
use crate::session::{BaseStats, EngineDeps, Snapshot, SnapshotProvider};
use crate::sim::screen::{STASH_HEIGHT, STASH_WIDTH};
use crate::sim::{Faults, SimEvent, SimSession, UNSOCKET_SCROLL};

/// Runes that show up next to the ones a recipe needs
const STRAY_RUNES: [&str; 4] = ["Tir", "El", "Hel", "Eth"];
const SEEDS: u64 = 200;

/// Places generated items without overlaps: inventory, personal stash and three shared pages
struct WorldBuilder {
    pages: Vec<InventoryGrid>,
    items: Vec<Item>,
    next_id: u32,
}

impl WorldBuilder {
    fn new() -> Self {
        let mut pages = vec![InventoryGrid::new(INVENTORY_WIDTH, INVENTORY_HEIGHT)];
        pages.extend((0..4).map(|_| InventoryGrid::new(STASH_WIDTH, STASH_HEIGHT)));
        Self { pages, items: Vec::new(), next_id: 1 }
    }

    fn location(page: usize, x: u8, y: u8) -> Location {
        match page {
            0 => Location::inventory(x, y),
            1 => Location::stash(x, y),
            p => Location::shared_stash(p as u8 - 1, x, y),
        }
    }

    /// Add an item on a random page; returns its id if there was room
    fn add(&mut self, rng: &mut StdRng, make: impl FnOnce(u32, Location) -> Item) -> Option<UnitId> {
        let page = rng.gen_range(0..self.pages.len());
        let id = self.next_id;
        let mut item = make(id, Location::inventory(0, 0));
        let cell = self.pages[page].find_free_cell(
            usize::from(item.size.0),
            usize::from(item.size.1),
            &InventoryLock::none(),
        )?;

        item.location = Self::location(page, cell.x, cell.y);
        self.pages[page].occupy(&item);
        self.items.push(item);
        self.next_id += 1;
        Some(UnitId(id))
    }
}

fn random_recipe(rng: &mut StdRng) -> Recipe {
    default_catalogue().recipes.choose(rng).cloned().expect("catalogue is not empty")
}

fn recipe_config(recipe: &Recipe) -> CharacterConfig {
    let mut config = CharacterConfig { class: "paladin".into(), ..CharacterConfig::default() };
    config.runeword_maker.enabled_recipes = vec![recipe.name.clone()];
    config
}

/// The recipe's own runes plus strays
fn rune_pool(recipe: &Recipe) -> Vec<String> {
    let mut pool = recipe.runes.clone();
    pool.extend(STRAY_RUNES.iter().map(|r| format!("{r}Rune")));
    pool
}

/// Socket contents short of complete: a recipe prefix or a random mix
fn random_sockets(rng: &mut StdRng, recipe: &Recipe) -> Vec<String> {
    let len = rng.gen_range(0..recipe.socket_count());
    if rng.gen_bool(0.5) {
        recipe.runes[..len].to_vec()
    } else {
        let pool = rune_pool(recipe);
        (0..len).filter_map(|_| pool.choose(rng).cloned()).collect()
    }
}

/// A base of one of the recipe's categories with the right socket count
fn recipe_base(id: u32, category: &str, recipe: &Recipe, socketed: &[String], location: Location) -> Item {
    let names: Vec<&str> = socketed.iter().map(String::as_str).collect();
    Item::base(id, "Plain Base", category, recipe.socket_count() as u8, (2, 3), location)
        .with_socketed_runes(&names, 1000 + id * 10)
}

fn random_world(rng: &mut StdRng, recipe: &Recipe) -> (Vec<Item>, Faults) {
    let mut world = WorldBuilder::new();

    for _ in 0..rng.gen_range(0..=3) {
        let category = recipe.base_types.choose(rng).cloned().unwrap_or_default();
        let socketed = random_sockets(rng, recipe);
        world.add(rng, |id, loc| recipe_base(id, &category, recipe, &socketed, loc));
    }

    let pool = rune_pool(recipe);
    let mut runes = Vec::new();
    for _ in 0..rng.gen_range(0..recipe.socket_count() * 3) {
        let Some(name) = pool.choose(rng).cloned() else {
            continue;
        };
        if let Some(id) = world.add(rng, |id, loc| Item::rune(id, &name, loc)) {
            runes.push(id);
        }
    }
    if rng.gen_bool(0.5) {
        world.add(rng, |id, loc| Item::new(id, UNSOCKET_SCROLL, "scroll", loc));
    }

    let faults = Faults {
        ignored_clicks: (1..=24).filter(|_| rng.gen_bool(0.15)).collect(),
        wrong_pick: if rng.gen_bool(0.3) { runes.choose(rng).copied() } else { None },
        ..Faults::default()
    };
    (world.items, faults)
}

#[test]
fn runs_leave_cursor_and_menus_clean() {
    let catalogue = default_catalogue();

    for seed in 0..SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let recipe = random_recipe(&mut rng);
        let config = recipe_config(&recipe);
        let (items, faults) = random_world(&mut rng, &recipe);
        let sim = SimSession::new(Snapshot { items, ..Snapshot::default() }, default_catalogue()).with_faults(faults);

        let result = {
            let (mut driver, mut world) = sim.split();
            let mut deps = EngineDeps::new(&mut world, &mut driver, &config, &catalogue);
            make_runewords(&mut deps)
        };

        assert!(sim.cursor_item().is_none(), "seed {seed}: cursor holds {:?}", sim.cursor_item());
        assert!(!sim.open_menus().any(), "seed {seed}: menus left open");

        let mut completed = 0;
        for event in sim.events() {
            match event {
                SimEvent::Inserted { socketed, .. } => {
                    assert!(recipe.runes.starts_with(&socketed), "seed {seed} {}: socketed {socketed:?}", recipe.name);
                }
                SimEvent::Completed { runeword, .. } => {
                    assert_eq!(runeword, recipe.name, "seed {seed}");
                    completed += 1;
                }
                _ => {}
            }
        }

        if let Ok(report) = result {
            assert_eq!(report.created_count(), completed, "seed {seed}");
            let mut bases: Vec<UnitId> = report.created().map(|c| c.base).collect();
            let before = bases.len();
            bases.sort();
            bases.dedup();
            assert_eq!(bases.len(), before, "seed {seed}: base crafted twice");
        }
    }
}

#[test]
fn gathered_runes_are_distinct_and_ordered() {
    for seed in 0..SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let recipe = random_recipe(&mut rng);
        let pool = rune_pool(&recipe);
        let items: Vec<Item> = (0..rng.gen_range(0..12))
            .filter_map(|i| pool.choose(&mut rng).map(|name| Item::rune(i + 1, name, Location::inventory(0, 0))))
            .collect();
        let required = recipe.runes[rng.gen_range(0..recipe.socket_count())..].to_vec();

        let refs: Vec<&Item> = items.iter().collect();
        let budget = RuneBudget::from_items(items.iter());
        match gather_runes(&refs, &required) {
            Some(gathered) => {
                let names: Vec<&str> = gathered.iter().map(|r| r.name.as_str()).collect();
                assert_eq!(names, required.iter().map(String::as_str).collect::<Vec<_>>());
                let mut ids = rune_ids(&gathered);
                ids.sort();
                ids.dedup();
                assert_eq!(ids.len(), required.len(), "seed {seed}: rune used twice");
            }
            None => assert!(!budget.covers(&required), "seed {seed}: runes were available"),
        }
    }
}

#[test]
fn wearability_filter_is_respected() {
    for seed in 0..SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let recipe = random_recipe(&mut rng);
        let mut config = recipe_config(&recipe);
        config.runeword_maker.only_if_wearable = true;

        let stats = BaseStats { strength: rng.gen_range(0..100), dexterity: rng.gen_range(0..100) };
        let items: Vec<Item> = (0..5u8)
            .map(|i| {
                let category = recipe.base_types.choose(&mut rng).cloned().unwrap_or_default();
                recipe_base(u32::from(i) + 1, &category, &recipe, &[], Location::stash(i * 2, 0))
                    .with_requirements(rng.gen_range(0..100), rng.gen_range(0..100))
            })
            .collect();
        let snapshot = Snapshot { items, base_stats: stats, ..Snapshot::default() };
        let view = InventoryView::new(&snapshot);

        let ranked = rank_candidates(&view, &recipe, &config);
        let wearable = snapshot.items.iter().filter(|i| meets_requirements(&stats, i)).count();
        assert_eq!(ranked.len(), wearable, "seed {seed}");
        for candidate in &ranked {
            let item = view.find_by_id(candidate.id).expect("candidate exists");
            assert!(meets_requirements(&stats, item), "seed {seed}: base {} not wearable", item.id);
        }
    }
}

#[test]
fn selection_is_deterministic() {
    for seed in 0..SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let recipe = random_recipe(&mut rng);
        let config = recipe_config(&recipe);
        let (items, _) = random_world(&mut rng, &recipe);
        let snapshot = Snapshot { items, ..Snapshot::default() };
        let view = InventoryView::new(&snapshot);

        let first = rank_candidates(&view, &recipe, &config);
        assert_eq!(first, rank_candidates(&view, &recipe, &config), "seed {seed}");
        assert_eq!(first.first(), select_base(&view, &recipe, &config).as_ref());
        assert!(first.windows(2).all(|w| w[0].prefix >= w[1].prefix), "seed {seed}: {first:?}");
    }
}

#[test]
fn prefix_match_is_stable_across_refresh() {
    for seed in 0..SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let recipe = random_recipe(&mut rng);
        let pool = rune_pool(&recipe);
        let runes: Vec<String> =
            (0..rng.gen_range(0..=recipe.socket_count())).filter_map(|_| pool.choose(&mut rng).cloned()).collect();
        let category = recipe.base_types[0].clone();
        let base = recipe_base(1, &category, &recipe, &runes, Location::inventory(0, 0));

        let before = prefix_match(&base, &recipe);
        let sim = SimSession::new(Snapshot { items: vec![base], ..Snapshot::default() }, default_catalogue());
        let (_driver, mut world) = sim.split();
        world.refresh_all();
        let after = prefix_match(&world.snapshot().items[0], &recipe);

        assert_eq!(before, after, "seed {seed} {}", recipe.name);
        if before.is_ok() {
            assert_eq!(&runes[..before.len], &recipe.runes[..before.len], "seed {seed}");
        }
    }
}
