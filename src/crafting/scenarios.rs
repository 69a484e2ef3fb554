//! End-to-end crafting runs against the simulated session

use super::*;
use crate::config::{CharacterConfig, RerollRule};
use crate::data::{default_catalogue, Catalogue};
use crate::items::{BodySlot, InventoryLock, Item, Location, Tier, UnitId, Zone, UNSOCKET_REAGENT};
use crate::session::{EngineDeps, Modifier, Snapshot};
use crate::sim::{DriverCall, Faults, Relocation, SimEvent, SimSession, UNSOCKET_SCROLL};

fn config(recipes: &[&str]) -> CharacterConfig {
    let mut config = CharacterConfig { class: "paladin".into(), ..CharacterConfig::default() };
    config.runeword_maker.enabled_recipes = recipes.iter().map(|r| r.to_string()).collect();
    config
}

fn session(items: Vec<Item>) -> SimSession {
    SimSession::new(Snapshot { items, ..Snapshot::default() }, default_catalogue())
}

fn run(session: &SimSession, config: &CharacterConfig) -> Result<CraftReport, CraftError> {
    let catalogue = default_catalogue();
    run_with(session, config, &catalogue)
}

fn run_with(session: &SimSession, config: &CharacterConfig, catalogue: &Catalogue) -> Result<CraftReport, CraftError> {
    let (mut driver, mut world) = session.split();
    let mut deps = EngineDeps::new(&mut world, &mut driver, config, catalogue);
    make_runewords(&mut deps)
}

/// Cursor empty and every menu closed
fn assert_clean(session: &SimSession) {
    assert!(session.cursor_item().is_none(), "cursor holds {:?}", session.cursor_item());
    assert!(!session.open_menus().any(), "menus left open: {:?}", session.open_menus());
}

fn broad_sword(id: u32, location: Location) -> Item {
    Item::base(id, "Broad Sword", "swor", 2, (2, 3), location)
}

fn socket_trace(session: &SimSession) -> Vec<SimEvent> {
    session
        .events()
        .into_iter()
        .filter(|e| matches!(e, SimEvent::Picked(_) | SimEvent::Inserted { .. }))
        .collect()
}

fn tab_switches(session: &SimSession) -> Vec<u8> {
    session
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            DriverCall::SwitchTab(tab) => Some(tab),
            _ => None,
        })
        .collect()
}

fn steel_world() -> Vec<Item> {
    vec![
        broad_sword(1, Location::inventory(0, 0)),
        Item::rune(2, "Tir", Location::inventory(2, 0)),
        Item::rune(3, "El", Location::inventory(3, 0)),
    ]
}

#[test]
fn clean_build_inserts_runes_in_order() {
    let sim = session(steel_world());
    let report = run(&sim, &config(&["Steel"])).expect("craft");

    assert_eq!(report.created_count(), 1);
    assert_eq!(report.recipe("Steel").map(|r| &r.ended_by), Some(&RecipeEnd::NoBase));
    assert_eq!(
        socket_trace(&sim),
        vec![
            SimEvent::Picked(UnitId(2)),
            SimEvent::Inserted { base: UnitId(1), socketed: vec!["TirRune".into()] },
            SimEvent::Picked(UnitId(3)),
            SimEvent::Inserted { base: UnitId(1), socketed: vec!["TirRune".into(), "ElRune".into()] },
        ]
    );
    assert_eq!(sim.clicks(), 4);

    let base = sim.item(UnitId(1)).expect("base");
    assert!(base.is_runeword);
    assert_eq!(base.name, "Steel");
    assert_eq!(base.socketed_names(), vec!["TirRune", "ElRune"]);
    assert_clean(&sim);
}

#[test]
fn partial_base_resumes_from_prefix() {
    let sword = broad_sword(1, Location::inventory(0, 0)).with_socketed_runes(&["Tir"], 100);
    let steel = default_catalogue().find("Steel").cloned().expect("Steel");
    assert_eq!(prefix_match(&sword, &steel).len, 1);

    let sim = session(vec![sword, Item::rune(3, "El", Location::inventory(3, 0))]);
    let report = run(&sim, &config(&["Steel"])).expect("craft");

    assert_eq!(report.created_count(), 1);
    assert_eq!(
        socket_trace(&sim),
        vec![
            SimEvent::Picked(UnitId(3)),
            SimEvent::Inserted { base: UnitId(1), socketed: vec!["TirRune".into(), "ElRune".into()] },
        ]
    );
    assert_clean(&sim);
}

#[test]
fn mismatched_base_is_unsocketed_and_rebuilt() {
    let sim = session(vec![
        broad_sword(1, Location::inventory(0, 0)).with_socketed_runes(&["El", "Tir"], 100),
        Item::rune(2, "Tir", Location::inventory(2, 0)),
        Item::rune(3, "El", Location::inventory(3, 0)),
        Item::rune(4, "Hel", Location::inventory(4, 0)),
        Item::rune(5, "Hel", Location::inventory(5, 0)),
        Item::new(6, UNSOCKET_SCROLL, "scroll", Location::inventory(6, 0)),
    ]);
    let report = run(&sim, &config(&["Steel"])).expect("craft");

    assert_eq!(report.created_count(), 1);
    assert!(sim.calls().contains(&DriverCall::Unsocket(UnitId(1))));

    let base = sim.item(UnitId(1)).expect("base");
    assert_eq!(base.socketed_names(), vec!["TirRune", "ElRune"]);
    assert_eq!(base.name, "Steel");

    let world = sim.world();
    let hel_left = world.items.iter().filter(|i| i.name == UNSOCKET_REAGENT).count();
    assert_eq!(hel_left, 1);
    assert!(sim.item(UnitId(6)).is_none());
    // The freed runes are back in storage
    assert!(world.items.iter().any(|i| i.id == UnitId(100) && i.location.zone == Zone::Inventory));
    assert_clean(&sim);
}

#[test]
fn mismatched_base_without_reagent_is_not_selected() {
    let sim = session(vec![
        broad_sword(1, Location::inventory(0, 0)).with_socketed_runes(&["El", "Tir"], 100),
        Item::rune(2, "Tir", Location::inventory(2, 0)),
        Item::rune(3, "El", Location::inventory(3, 0)),
        Item::new(6, UNSOCKET_SCROLL, "scroll", Location::inventory(6, 0)),
    ]);
    let report = run(&sim, &config(&["Steel"])).expect("run");

    assert_eq!(report.recipe("Steel").map(|r| &r.ended_by), Some(&RecipeEnd::NoBase));
    assert!(sim.calls().is_empty());
}

#[test]
fn exactly_one_spare_hel_is_enough_to_unsocket() {
    let sim = session(vec![
        broad_sword(1, Location::inventory(0, 0)).with_socketed_runes(&["El", "Tir"], 100),
        Item::rune(2, "Tir", Location::inventory(2, 0)),
        Item::rune(3, "El", Location::inventory(3, 0)),
        Item::rune(4, "Hel", Location::inventory(4, 0)),
        Item::new(6, UNSOCKET_SCROLL, "scroll", Location::inventory(6, 0)),
    ]);
    let report = run(&sim, &config(&["Steel"])).expect("craft");
    assert_eq!(report.created_count(), 1);
    assert_clean(&sim);
}

#[test]
fn reagent_hel_comes_on_top_of_recipe_hel() {
    let plate = Item::base(1, "Light Plate", "tors", 3, (2, 3), Location::inventory(0, 0))
        .with_socketed_runes(&["Lum"], 100);
    let sim = session(vec![
        plate,
        Item::rune(2, "Hel", Location::inventory(2, 0)),
        Item::rune(3, "Lum", Location::inventory(3, 0)),
        Item::rune(4, "Fal", Location::inventory(4, 0)),
        Item::new(6, UNSOCKET_SCROLL, "scroll", Location::inventory(6, 0)),
    ]);
    let report = run(&sim, &config(&["Lionheart"])).expect("run");
    assert_eq!(report.recipe("Lionheart").map(|r| &r.ended_by), Some(&RecipeEnd::NoBase));
    assert!(sim.calls().is_empty());
}

#[test]
fn cursor_contamination_aborts_after_recovery() {
    let mut items = steel_world();
    items.push(Item::new(9, "Ring", "ring", Location::cursor()));
    let sim = session(items);

    let err = run(&sim, &config(&["Steel"])).unwrap_err();
    assert!(matches!(err, CraftError::CursorOccupied { .. }));
    assert_eq!(err.severity(), Severity::Hard);

    let calls = sim.calls();
    assert!(calls.contains(&DriverCall::DropAndRecover));
    assert_eq!(calls.last(), Some(&DriverCall::CloseAllMenus));
    assert_eq!(sim.clicks(), 0);
    assert_eq!(sim.item(UnitId(9)).map(|i| i.location.zone), Some(Zone::Inventory));
    assert_clean(&sim);
}

#[test]
fn upgrade_gate_rejects_lower_tier_base() {
    let mut owned = Item::base(50, "Phase Blade", "swor", 4, (2, 3), Location::equipped(BodySlot::RightArm))
        .with_tier(Tier::Elite)
        .with_socketed_runes(&["Tal", "Thul", "Ort", "Amn"], 500);
    owned.is_runeword = true;
    owned.name = "Spirit".into();

    let items = vec![
        owned,
        Item::base(1, "Long Sword", "swor", 4, (2, 3), Location::inventory(0, 0)),
        Item::rune(2, "Tal", Location::inventory(2, 0)),
        Item::rune(3, "Thul", Location::inventory(3, 0)),
        Item::rune(4, "Ort", Location::inventory(4, 0)),
        Item::rune(5, "Amn", Location::inventory(5, 0)),
    ];

    let mut cfg = config(&["Spirit"]);
    cfg.runeword_maker.auto_upgrade = true;
    let sim = session(items.clone());
    let report = run(&sim, &cfg).expect("run");
    assert_eq!(report.created_count(), 0);
    assert_eq!(report.recipe("Spirit").map(|r| &r.ended_by), Some(&RecipeEnd::NoBase));
    assert_eq!(sim.clicks(), 0);

    // Without the upgrade check the same base is used
    cfg.runeword_maker.auto_upgrade = false;
    let sim = session(items);
    assert_eq!(run(&sim, &cfg).expect("craft").created_count(), 1);
}

#[test]
fn stash_base_is_moved_to_inventory_first() {
    let sim = session(vec![
        Item::rune(2, "Tir", Location::inventory(0, 0)),
        Item::rune(3, "El", Location::inventory(1, 0)),
        broad_sword(1, Location::stash(0, 0)),
    ]);
    let report = run(&sim, &config(&["Steel"])).expect("craft");
    assert_eq!(report.created_count(), 1);

    let calls = sim.calls();
    assert_eq!(calls[0], DriverCall::OpenStash);
    assert_eq!(calls[1], DriverCall::SwitchTab(1));
    assert!(matches!(calls[2], DriverCall::Click { modifier: Some(Modifier::Ctrl), .. }));
    assert_eq!(sim.item(UnitId(1)).map(|i| i.location.zone), Some(Zone::Inventory));
    assert_clean(&sim);
}

#[test]
fn base_moving_pages_mid_craft_is_followed() {
    let sim = session(vec![
        broad_sword(1, Location::inventory(0, 0)),
        Item::rune(2, "Tir", Location::inventory(2, 0)),
        Item::rune(3, "El", Location::shared_stash(1, 0, 0)),
    ])
    .with_faults(Faults {
        relocation: Some(Relocation { after_clicks: 2, item: UnitId(1), to: Location::shared_stash(2, 0, 0) }),
        ..Faults::default()
    });

    let report = run(&sim, &config(&["Steel"])).expect("craft");
    assert_eq!(report.created_count(), 1);
    assert_eq!(tab_switches(&sim), vec![2, 3]);

    let base = sim.item(UnitId(1)).expect("base");
    assert_eq!(base.name, "Steel");
    assert_eq!(base.location.stash_tab(), Some(3));
    assert_clean(&sim);
}

#[test]
fn ignored_pick_is_retried() {
    let sim = session(steel_world()).with_faults(Faults { ignored_clicks: vec![1], ..Faults::default() });
    let report = run(&sim, &config(&["Steel"])).expect("craft");

    assert_eq!(report.created_count(), 1);
    assert_eq!(sim.clicks(), 5);
    assert!(sim.events().contains(&SimEvent::IgnoredClick(1)));
    assert_clean(&sim);
}

#[test]
fn slow_cursor_is_polled_without_clicking_again() {
    let sim = session(steel_world()).with_faults(Faults { stale_after_click: Some((1, 2)), ..Faults::default() });
    let report = run(&sim, &config(&["Steel"])).expect("craft");

    assert_eq!(report.created_count(), 1);
    assert_eq!(sim.clicks(), 4);
    assert_clean(&sim);
}

#[test]
fn wrong_rune_is_parked_and_pick_retried() {
    let mut items = steel_world();
    items.push(Item::rune(4, "Eth", Location::inventory(4, 0)));
    let sim = session(items).with_faults(Faults { wrong_pick: Some(UnitId(4)), ..Faults::default() });

    let report = run(&sim, &config(&["Steel"])).expect("craft");
    assert_eq!(report.created_count(), 1);
    assert!(sim.events().iter().any(|e| matches!(e, SimEvent::Placed { item, .. } if *item == UnitId(4))));
    assert_eq!(sim.clicks(), 6);
    assert_eq!(sim.item(UnitId(4)).map(|i| i.location.zone), Some(Zone::Inventory));
    assert_clean(&sim);
}

#[test]
fn wrong_rune_without_room_is_recovered_and_aborts() {
    let mut items = steel_world();
    items.push(Item::rune(4, "Eth", Location::inventory(4, 0)));
    let sim = session(items).with_faults(Faults { wrong_pick: Some(UnitId(4)), ..Faults::default() });
    let mut cfg = config(&["Steel"]);
    cfg.inventory_lock = InventoryLock(vec![vec![0; 10]; 4]);

    let err = run(&sim, &cfg).unwrap_err();
    assert!(matches!(err, CraftError::CursorMismatch { ref expected, ref found, .. }
        if expected == "TirRune" && found == "EthRune"));
    assert!(sim.calls().contains(&DriverCall::DropAndRecover));
    assert_clean(&sim);
}

#[test]
fn rune_stuck_on_cursor_is_recovered() {
    let sim = session(steel_world()).with_faults(Faults { ignored_clicks: vec![2], ..Faults::default() });

    let err = run(&sim, &config(&["Steel"])).unwrap_err();
    assert!(matches!(err, CraftError::InsertFailed { ref rune, .. } if rune == "TirRune"));
    assert!(sim.calls().contains(&DriverCall::DropAndRecover));
    assert!(sim.item(UnitId(1)).expect("base").socketed.is_empty());
    assert_clean(&sim);
}

#[test]
fn rune_that_never_reaches_cursor_aborts() {
    let sim = session(steel_world()).with_faults(Faults { ignored_clicks: vec![1, 2], ..Faults::default() });
    let err = run(&sim, &config(&["Steel"])).unwrap_err();
    assert!(matches!(err, CraftError::RuneNotOnCursor { .. }));
    assert_clean(&sim);
}

#[test]
fn failed_stash_move_ends_recipe_softly() {
    let sim = session(vec![
        Item::rune(2, "Tir", Location::inventory(0, 0)),
        Item::rune(3, "El", Location::inventory(1, 0)),
        broad_sword(1, Location::stash(0, 0)),
    ])
    .with_faults(Faults { ignored_clicks: vec![1, 2], ..Faults::default() });

    let report = run(&sim, &config(&["Steel"])).expect("soft failure");
    match report.recipe("Steel").map(|r| &r.ended_by) {
        Some(RecipeEnd::Rejected { error, .. }) => assert_eq!(error, "stash_move_failed"),
        other => panic!("unexpected end {other:?}"),
    }
    assert_eq!(sim.clicks(), 2);
    assert_clean(&sim);
}

#[test]
fn base_that_cannot_fit_is_left_in_stash() {
    let sim = session(vec![
        Item::rune(2, "Tir", Location::inventory(0, 0)),
        Item::rune(3, "El", Location::inventory(1, 0)),
        broad_sword(1, Location::stash(0, 0)),
    ]);
    let mut cfg = config(&["Steel"]);
    cfg.inventory_lock = InventoryLock(vec![vec![0; 10]; 4]);

    let report = run(&sim, &cfg).expect("soft failure");
    assert!(matches!(
        report.recipe("Steel").map(|r| &r.ended_by),
        Some(RecipeEnd::Rejected { error, .. }) if error == "base_does_not_fit"
    ));
    assert_eq!(sim.item(UnitId(1)).map(|i| i.location.zone), Some(Zone::Stash));
    assert_clean(&sim);
}

#[test]
fn unsocket_failure_skips_recipe() {
    let sim = session(vec![
        broad_sword(1, Location::inventory(0, 0)).with_socketed_runes(&["El", "Tir"], 100),
        Item::rune(2, "Tir", Location::inventory(2, 0)),
        Item::rune(3, "El", Location::inventory(3, 0)),
        Item::rune(4, "Hel", Location::inventory(4, 0)),
    ])
    .with_faults(Faults { fail_unsocket: true, ..Faults::default() });

    let report = run(&sim, &config(&["Steel"])).expect("skip is not an error");
    assert!(matches!(report.recipe("Steel").map(|r| &r.ended_by), Some(RecipeEnd::Skipped { .. })));
    assert_eq!(sim.item(UnitId(1)).expect("base").socketed.len(), 2);
    assert_clean(&sim);
}

#[test]
fn leveling_character_skips_instead_of_unsocketing() {
    let sim = session(vec![
        broad_sword(1, Location::inventory(0, 0)).with_socketed_runes(&["El", "Tir"], 100),
        Item::rune(2, "Tir", Location::inventory(2, 0)),
        Item::rune(3, "El", Location::inventory(3, 0)),
        Item::rune(4, "Hel", Location::inventory(4, 0)),
    ]);
    let cfg = CharacterConfig { class: "sorceress_leveling".into(), ..config(&["Steel"]) };
    let catalogue = default_catalogue();
    let steel = catalogue.find("Steel").expect("Steel");
    let plan = CraftPlan { base: UnitId(1), prefix: 0, unsocket: true, runes: vec![UnitId(2), UnitId(3)] };

    let (mut driver, mut world) = sim.split();
    let mut deps = EngineDeps::new(&mut world, &mut driver, &cfg, &catalogue);
    let result = craft(&mut deps, steel, &plan);

    assert!(matches!(result, Err(CraftError::Skip { .. })));
    assert!(!sim.calls().iter().any(|c| matches!(c, DriverCall::Unsocket(_))));
    assert_clean(&sim);
}

#[test]
fn stash_open_is_retried_once() {
    let items = vec![
        broad_sword(1, Location::inventory(0, 0)),
        Item::rune(2, "Tir", Location::stash(0, 0)),
        Item::rune(3, "El", Location::stash(1, 0)),
    ];

    let sim = session(items.clone()).with_faults(Faults { failing_stash_opens: 1, ..Faults::default() });
    assert_eq!(run(&sim, &config(&["Steel"])).expect("craft").created_count(), 1);

    let sim = session(items).with_faults(Faults { failing_stash_opens: 2, ..Faults::default() });
    let err = run(&sim, &config(&["Steel"])).unwrap_err();
    assert!(matches!(err, CraftError::Driver(_)));
    assert_clean(&sim);
}

#[test]
fn tabs_switch_only_when_page_changes() {
    let sim = session(vec![
        Item::base(1, "Voulge", "pole", 4, (2, 4), Location::inventory(0, 0)),
        Item::rune(2, "Ral", Location::shared_stash(1, 0, 0)),
        Item::rune(3, "Tir", Location::shared_stash(1, 1, 0)),
        Item::rune(4, "Tal", Location::shared_stash(2, 0, 0)),
        Item::rune(5, "Sol", Location::shared_stash(2, 1, 0)),
    ]);
    let report = run(&sim, &config(&["Insight"])).expect("craft");

    assert_eq!(report.created_count(), 1);
    assert_eq!(tab_switches(&sim), vec![2, 3]);
    assert_clean(&sim);
}

#[test]
fn every_available_base_is_used() {
    let sim = session(vec![
        broad_sword(1, Location::inventory(0, 0)),
        broad_sword(2, Location::inventory(2, 0)),
        Item::rune(3, "Tir", Location::inventory(4, 0)),
        Item::rune(4, "El", Location::inventory(5, 0)),
        Item::rune(5, "Tir", Location::inventory(6, 0)),
        Item::rune(6, "El", Location::inventory(7, 0)),
    ]);
    let report = run(&sim, &config(&["Steel"])).expect("craft");

    let bases: Vec<UnitId> = report.created().map(|c| c.base).collect();
    assert_eq!(bases, vec![UnitId(1), UnitId(2)]);
    assert_clean(&sim);
}

#[test]
fn reroll_recipes_are_crafted_for_non_leveling_only() {
    let mut cfg = config(&[]);
    cfg.runeword_maker.reroll_rules.insert("Steel".into(), vec![RerollRule::default()]);

    let sim = session(steel_world());
    assert_eq!(run(&sim, &cfg).expect("craft").created_count(), 1);

    cfg.class = "paladin_leveling".into();
    let sim = session(steel_world());
    let report = run(&sim, &cfg).expect("run");
    assert!(report.recipes.is_empty());
    assert!(sim.calls().is_empty());
}

#[test]
fn disabled_maker_does_nothing() {
    let mut cfg = config(&["Steel"]);
    cfg.runeword_maker.enabled = false;
    let sim = session(steel_world());
    assert_eq!(run(&sim, &cfg).expect("run"), CraftReport::default());
    assert!(sim.calls().is_empty());
}

#[test]
fn recipes_follow_catalogue_order() {
    let sim = session(vec![
        Item::base(1, "Quilted Armor", "tors", 2, (2, 3), Location::inventory(0, 0)),
        Item::rune(2, "Tal", Location::inventory(2, 0)),
        Item::rune(3, "Eth", Location::inventory(3, 0)),
        broad_sword(4, Location::inventory(4, 0)),
        Item::rune(5, "Tir", Location::inventory(6, 0)),
        Item::rune(6, "El", Location::inventory(7, 0)),
    ]);
    let report = run(&sim, &config(&["Stealth", "Steel"])).expect("craft");
    let order: Vec<&str> = report.created().map(|c| c.recipe.as_str()).collect();
    assert_eq!(order, vec!["Steel", "Stealth"]);
    assert_clean(&sim);
}

/// Run a single craft of Steel with a hand-made plan
fn craft_steel(sim: &SimSession, cfg: &CharacterConfig, plan: &CraftPlan) -> Result<(), CraftError> {
    let catalogue = default_catalogue();
    let steel = catalogue.find("Steel").expect("Steel");
    let (mut driver, mut world) = sim.split();
    let mut deps = EngineDeps::new(&mut world, &mut driver, cfg, &catalogue);
    craft(&mut deps, steel, plan)
}

fn steel_plan(unsocket: bool) -> CraftPlan {
    CraftPlan { base: UnitId(1), prefix: 0, unsocket, runes: vec![UnitId(2), UnitId(3)] }
}

fn unsocket_calls(sim: &SimSession) -> usize {
    sim.calls().iter().filter(|c| matches!(c, DriverCall::Unsocket(_))).count()
}

#[test]
fn base_vanishing_mid_craft_aborts_with_rune_recovered() {
    let relocation = Relocation { after_clicks: 1, item: UnitId(1), to: Location::ground() };
    let sim = session(steel_world()).with_faults(Faults { relocation: Some(relocation), ..Faults::default() });

    let result = craft_steel(&sim, &config(&["Steel"]), &steel_plan(false));

    assert!(matches!(result, Err(CraftError::BaseLost { during: "insert", .. })), "{result:?}");
    assert!(sim.item(UnitId(2)).is_some_and(|r| r.location.zone == Zone::Inventory));
    assert_clean(&sim);
}

#[test]
fn rune_vanishing_before_pick_aborts() {
    let relocation = Relocation { after_clicks: 2, item: UnitId(3), to: Location::ground() };
    let sim = session(steel_world()).with_faults(Faults { relocation: Some(relocation), ..Faults::default() });

    let result = craft_steel(&sim, &config(&["Steel"]), &steel_plan(false));

    assert!(matches!(result, Err(CraftError::RuneLost { id: UnitId(3), .. })), "{result:?}");
    assert_eq!(sim.item(UnitId(1)).expect("base").socketed_names(), vec!["TirRune"]);
    assert_clean(&sim);
}

#[test]
fn insert_that_lands_elsewhere_reports_stuck_prefix() {
    let sim = session(steel_world()).with_faults(Faults { dropped_inserts: vec![2], ..Faults::default() });

    let result = craft_steel(&sim, &config(&["Steel"]), &steel_plan(false));

    assert!(matches!(result, Err(CraftError::PrefixDidNotAdvance { stuck_at: 0, .. })), "{result:?}");
    assert!(sim.item(UnitId(1)).expect("base").socketed.is_empty());
    assert_clean(&sim);
}

#[test]
fn sockets_unchanged_after_unsocket_abort() {
    let sim = session(vec![
        broad_sword(1, Location::inventory(0, 0)).with_socketed_runes(&["El", "Tir"], 100),
        Item::rune(2, "Tir", Location::inventory(2, 0)),
        Item::rune(3, "El", Location::inventory(3, 0)),
        Item::rune(4, "Hel", Location::inventory(4, 0)),
        Item::new(6, UNSOCKET_SCROLL, "scroll", Location::inventory(6, 0)),
    ])
    .with_faults(Faults { unsocket_keeps_sockets: true, ..Faults::default() });

    let result = craft_steel(&sim, &config(&["Steel"]), &steel_plan(true));

    assert!(matches!(result, Err(CraftError::SocketsDiverged { .. })), "{result:?}");
    assert_eq!(unsocket_calls(&sim), 1);
    assert_eq!(sim.clicks(), 0);
    assert_clean(&sim);
}

#[test]
fn finished_runeword_base_is_refused() {
    let mut base = broad_sword(1, Location::inventory(0, 0)).with_socketed_runes(&["Tir", "El"], 100);
    base.is_runeword = true;
    base.name = "Steel".into();
    let sim = session(vec![base, Item::rune(2, "Tir", Location::inventory(2, 0)), Item::rune(3, "El", Location::inventory(3, 0))]);

    let result = craft_steel(&sim, &config(&["Steel"]), &steel_plan(false));

    assert!(matches!(result, Err(CraftError::BaseAlreadyRuneword { base: UnitId(1), .. })), "{result:?}");
    assert_eq!(sim.clicks(), 0);
    assert_clean(&sim);
}

#[test]
fn fully_socketed_base_is_refused() {
    let sim = session(vec![
        broad_sword(1, Location::inventory(0, 0)).with_socketed_runes(&["Tir", "El"], 100),
        Item::rune(2, "Tir", Location::inventory(2, 0)),
        Item::rune(3, "El", Location::inventory(3, 0)),
    ]);

    let result = craft_steel(&sim, &config(&["Steel"]), &steel_plan(false));

    assert!(matches!(result, Err(CraftError::BaseAlreadyComplete { base: UnitId(1), .. })), "{result:?}");
    assert_eq!(sim.clicks(), 0);
    assert_clean(&sim);
}

#[test]
fn mismatch_without_unsocket_approval_is_incompatible() {
    let sim = session(vec![
        broad_sword(1, Location::inventory(0, 0)).with_socketed_runes(&["El", "Tir"], 100),
        Item::rune(2, "Tir", Location::inventory(2, 0)),
        Item::rune(3, "El", Location::inventory(3, 0)),
        Item::rune(4, "Hel", Location::inventory(4, 0)),
        Item::new(6, UNSOCKET_SCROLL, "scroll", Location::inventory(6, 0)),
    ]);

    let result = craft_steel(&sim, &config(&["Steel"]), &steel_plan(false));

    assert!(matches!(result, Err(CraftError::BaseIncompatible { base: UnitId(1), .. })), "{result:?}");
    assert_eq!(unsocket_calls(&sim), 0);
    assert_eq!(sim.item(UnitId(1)).expect("base").socketed.len(), 2);
    assert_clean(&sim);
}

#[test]
fn mismatch_without_reagent_is_incompatible_after_recheck() {
    let sim = session(vec![
        broad_sword(1, Location::inventory(0, 0)).with_socketed_runes(&["El", "Tir"], 100),
        Item::rune(2, "Tir", Location::inventory(2, 0)),
        Item::rune(3, "El", Location::inventory(3, 0)),
        Item::new(6, UNSOCKET_SCROLL, "scroll", Location::inventory(6, 0)),
    ]);

    let result = craft_steel(&sim, &config(&["Steel"]), &steel_plan(true));

    assert!(matches!(result, Err(CraftError::BaseIncompatible { base: UnitId(1), .. })), "{result:?}");
    assert_eq!(unsocket_calls(&sim), 0);
    assert_clean(&sim);
}
