use quadcalc::core::build::Build;
use quadcalc::core::category::Category;
use quadcalc::core::compat::{self, Severity};
use quadcalc::core::component::Component;
use quadcalc::core::config::QuadcalcConfig;
use quadcalc::core::db::SqliteKv;
use quadcalc::core::kv::{KeyValueStore, MemoryKv};
use quadcalc::core::schemas;
use quadcalc::core::slots::{SlotKey, SlotMap};
use quadcalc::core::store::BuildStore;
use quadcalc::core::time::ManualClock;
use tempfile::tempdir;

fn store_with(kv: &MemoryKv, clock: &ManualClock) -> BuildStore {
    BuildStore::new(
        Box::new(kv.clone()),
        Box::new(clock.clone()),
        QuadcalcConfig::default(),
    )
}

fn fresh() -> (BuildStore, MemoryKv, ManualClock) {
    let kv = MemoryKv::new();
    let clock = ManualClock::new(1_000);
    (store_with(&kv, &clock), kv, clock)
}

fn part(id: &str) -> Component {
    Component::new(id, id.to_uppercase())
}

#[test]
fn test_undo_then_redo_restores_exact_map() {
    let (mut store, _, _) = fresh();
    store.set_component(Category::Frame, &part("f1").with_spec("size", "5"));
    store.set_component(Category::Motors, &part("m1").with_weight(30));
    store.set_component(Category::Frame, &part("f2").with_spec("size", "7"));
    store.clear_component(Category::Motors);

    let before_undo = store.components().clone();
    assert!(store.undo());
    let after_undo = store.components().clone();
    assert_ne!(before_undo, after_undo);
    assert!(store.redo());
    assert_eq!(store.components(), &before_undo);
    assert!(store.undo());
    assert_eq!(store.components(), &after_undo);
}

#[test]
fn test_history_is_capped_and_drops_oldest() {
    let (mut store, _, _) = fresh();
    for i in 0..60 {
        store.set_component(Category::Other, &part(&format!("p{}", i)));
    }
    assert_eq!(store.undo_depth(), 50);
    let oldest = store.history().oldest().unwrap();
    // Snapshots before edits 0..=9 were evicted; the oldest kept one precedes edit 10.
    assert_eq!(oldest.get(Category::Other).unwrap().id, "p9");

    while store.undo() {}
    assert_eq!(store.components().get(Category::Other).unwrap().id, "p9");
}

#[test]
fn test_any_forward_mutation_clears_redo() {
    let (mut store, _, _) = fresh();
    store.set_component(Category::Frame, &part("f"));
    store.set_component(Category::Battery, &part("b"));
    assert!(store.undo());
    assert!(store.can_redo());
    store.clear_component(Category::Frame);
    assert!(!store.can_redo());

    assert!(store.undo());
    store.clear_all();
    assert!(!store.can_redo());

    assert!(store.undo());
    store.load_build(&Build {
        name: String::new(),
        timestamp: 0,
        components: SlotMap::new(),
    });
    assert!(!store.can_redo());
    assert_eq!(store.name(), "Loaded Build");
}

#[test]
fn test_undo_redo_on_empty_stacks_are_noops() {
    let (mut store, _, _) = fresh();
    assert!(!store.undo());
    assert!(!store.redo());
    assert!(store.components().is_empty());
    assert!(!store.autosave_pending());
}

#[test]
fn test_score_is_100_until_a_rule_applies() {
    let (mut store, _, _) = fresh();
    assert_eq!(store.compatibility_score(), 100);
    store.set_component(Category::Frame, &part("f").with_spec("size", "5"));
    assert_eq!(store.compatibility_score(), 100);
    assert_eq!(store.evaluation().applicable, 0);

    store.set_component(Category::Propellers, &part("p").with_spec("size", "5"));
    let eval = store.evaluation();
    assert_eq!(eval.applicable, 1);
    assert_eq!(eval.passing, 1);
    assert_eq!(eval.score(), 100);
}

#[test]
fn test_total_weight_excludes_ground_gear() {
    let (mut store, _, _) = fresh();
    store.set_component(Category::Motors, &part("m").with_weight(5));
    store.set_component(Category::Propellers, &part("p").with_weight(3));
    store.set_component(Category::Tx, &part("tx").with_weight(20));
    store.set_component(Category::Frame, &part("f").with_weight(30));
    assert_eq!(store.total_weight(), 62);
    let breakdown = store.weight_breakdown();
    assert_eq!(breakdown.entries.get(&Category::Motors), Some(&20));
    assert!(!breakdown.entries.contains_key(&Category::Tx));
}

#[test]
fn test_total_cost_counts_four_motors() {
    let (mut store, _, _) = fresh();
    store.set_component(Category::Motors, &part("m").with_cost(1000));
    store.set_component(Category::Frame, &part("f").with_cost(2000));
    assert_eq!(store.total_cost(), 6000);
}

#[test]
fn test_frame_prop_size_mismatch_is_error() {
    let (mut store, _, _) = fresh();
    store.set_component(Category::Frame, &part("f").with_spec("size", "5"));
    store.set_component(Category::Propellers, &part("p").with_spec("size", "3"));
    let alerts = store.alerts();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].id, "frame-prop-size");
    assert_eq!(alerts[0].severity, Severity::Error);
    assert!(alerts[0].message.contains("5\""));
    assert!(alerts[0].message.contains("3\""));
    assert_eq!(store.compatibility_score(), 0);
}

#[test]
fn test_battery_above_esc_range_is_error() {
    let (mut store, _, _) = fresh();
    store.set_component(Category::Battery, &part("b").with_spec("voltage", "6S"));
    store.set_component(Category::Esc, &part("e").with_spec("voltage", "4-5S"));
    let alerts = store.alerts();
    let fired = alerts.iter().find(|a| a.id == "battery-esc-voltage").unwrap();
    assert_eq!(fired.severity, Severity::Error);
}

#[test]
fn test_rx_antenna_shared_band_passes() {
    let (mut store, _, _) = fresh();
    store.set_component(Category::Rx, &part("rx").with_spec("frequency", "868/915MHz"));
    store.set_component(Category::RxAntenna, &part("ant").with_spec("frequency", "915MHz"));
    assert!(store.alerts().iter().all(|a| a.id != "rx-rxAntenna-frequency"));
    assert_eq!(store.evaluation().applicable, 1);

    store.set_component(Category::RxAntenna, &part("ant").with_spec("frequency", "2.4GHz"));
    assert!(store.alerts().iter().any(|a| a.id == "rx-rxAntenna-frequency"));
}

#[test]
fn test_rule_table_order_and_size() {
    let ids: Vec<&str> = compat::rules().iter().map(|r| r.id).collect();
    assert_eq!(ids.len(), 19);
    assert_eq!(ids[0], "frame-prop-size");
    assert_eq!(ids[18], "rx-rxAntenna-frequency");
    assert!(compat::find_rule("battery-frame-size").is_some());
}

#[test]
fn test_draft_ring_never_exceeds_five() {
    let (mut store, kv, clock) = fresh();
    for i in 0..12 {
        store.set_component(Category::Frame, &part(&format!("f{}", i)));
        clock.advance(1_000);
        assert!(store.tick());
    }
    let drafts = store.drafts();
    assert_eq!(drafts.len(), 5);
    assert_eq!(drafts[4].components.get(Category::Frame).unwrap().id, "f11");
    assert_eq!(drafts[0].components.get(Category::Frame).unwrap().id, "f7");
    assert!(kv.raw(schemas::DRAFTS_KEY).is_some());
}

#[test]
fn test_debounce_coalesces_to_latest_state() {
    let (mut store, _, clock) = fresh();
    store.set_component(Category::Frame, &part("f"));
    clock.advance(600);
    assert!(!store.tick());
    store.set_component(Category::Battery, &part("b"));
    clock.advance(600);
    assert!(!store.tick());
    clock.advance(400);
    assert!(store.tick());
    assert!(!store.tick());

    let drafts = store.drafts();
    assert_eq!(drafts.len(), 1);
    assert!(drafts[0].components.is_filled(Category::Frame));
    assert!(drafts[0].components.is_filled(Category::Battery));
    assert_eq!(drafts[0].timestamp, 1_000 + 1_600);
}

#[test]
fn test_recovered_draft_is_not_history() {
    let kv = MemoryKv::new();
    let clock = ManualClock::new(0);
    {
        let mut first = store_with(&kv, &clock);
        first.set_component(Category::Fc, &part("fc"));
        first.set_name("Bench Quad");
        assert!(first.flush_autosave());
    }
    let second = store_with(&kv, &clock);
    assert_eq!(second.get(Category::Fc).unwrap().id, "fc");
    assert_eq!(second.name(), "Bench Quad");
    assert!(!second.can_undo());
    assert!(!second.autosave_pending());
}

#[test]
fn test_storage_full_keeps_memory_state() {
    let kv = MemoryKv::with_quota(8);
    let clock = ManualClock::new(0);
    let mut store = store_with(&kv, &clock);
    store.set_component(Category::Frame, &part("f"));
    clock.advance(1_000);
    assert!(store.tick());
    assert!(store.get(Category::Frame).is_some());
    assert!(kv.raw(schemas::DRAFTS_KEY).is_none());
    assert!(store.drafts().is_empty());
}

#[test]
fn test_corrupt_drafts_are_ignored() {
    let kv = MemoryKv::new();
    kv.insert_raw(schemas::DRAFTS_KEY, "{not json");
    let store = store_with(&kv, &ManualClock::new(0));
    assert!(store.components().is_empty());
    assert_eq!(store.name(), "Untitled Build");
}

#[test]
fn test_unregistered_key_is_inert() {
    let (mut store, _, _) = fresh();
    let slot = store.set_component_by_key("gimbal", &part("g").with_cost(5000).with_weight(50));
    assert_eq!(slot, SlotKey::Unregistered("gimbal".to_string()));
    assert_eq!(store.filled_count(), 0);
    assert_eq!(store.total_cost(), 0);
    assert_eq!(store.total_weight(), 0);
    assert!(store.alerts().is_empty());
    assert_eq!(store.undo_depth(), 1);

    let exported = serde_json::to_value(store.export_build()).unwrap();
    assert_eq!(exported["components"]["gimbal"]["id"], "g");
    assert_eq!(exported["components"]["gimbal"]["category"], "gimbal");

    store.clear_all();
    assert!(store.components().inert().is_empty());
    assert!(store.undo());
    assert!(store.components().inert().contains_key("gimbal"));
}

#[test]
fn test_registered_key_by_string() {
    let (mut store, _, _) = fresh();
    let slot = store.set_component_by_key("vtxAntenna", &part("a"));
    assert_eq!(slot, SlotKey::Registered(Category::VtxAntenna));
    assert_eq!(store.filled_count(), 1);
    store.clear_component_by_key("vtxAntenna");
    assert_eq!(store.filled_count(), 0);
}

#[test]
fn test_load_build_drops_inert_keys_missing_from_document() {
    let (mut store, _, _) = fresh();
    store.set_component_by_key("gimbal", &part("g"));
    let doc: Build = serde_json::from_str(
        r#"{"name": "Imported", "components": {"frame": {"id": "f", "name": "Frame"}}}"#,
    )
    .unwrap();
    store.load_build(&doc);
    assert_eq!(store.name(), "Imported");
    assert!(store.components().inert().is_empty());
    // Loaded components are taken as-is, without category stamping.
    assert_eq!(store.get(Category::Frame).unwrap().category, None);
}

#[test]
fn test_sqlite_backend_round_trips_drafts() {
    let tmp = tempdir().unwrap();
    let clock = ManualClock::new(0);
    {
        let kv = SqliteKv::open(tmp.path()).unwrap();
        let mut store = BuildStore::new(Box::new(kv), Box::new(clock.clone()), QuadcalcConfig::default());
        store.set_component(Category::Goggles, &part("g").with_spec("system", "HDZero"));
        assert!(store.flush_autosave());
    }
    let kv = SqliteKv::open(tmp.path()).unwrap();
    assert!(kv.get(schemas::DRAFTS_KEY).unwrap().is_some());
    let store = BuildStore::new(Box::new(kv), Box::new(clock), QuadcalcConfig::default());
    assert_eq!(store.get(Category::Goggles).unwrap().id, "g");
}

#[test]
fn test_custom_limits_from_config() {
    let config = QuadcalcConfig::from_toml("history_limit = 3\ndraft_limit = 2\nautosave_debounce_ms = 0\n").unwrap();
    let kv = MemoryKv::new();
    let mut store = BuildStore::new(Box::new(kv), Box::new(ManualClock::new(0)), config);
    for i in 0..5 {
        store.set_component(Category::Other, &part(&format!("o{}", i)));
        assert!(store.tick());
    }
    assert_eq!(store.undo_depth(), 3);
    assert_eq!(store.drafts().len(), 2);
}

#[test]
fn test_maximum_debounce_never_fires_on_tick() {
    let config = QuadcalcConfig::from_toml("autosave_debounce_ms = 9223372036854775807\n").unwrap();
    let clock = ManualClock::new(5_000);
    let mut store = BuildStore::new(Box::new(MemoryKv::new()), Box::new(clock.clone()), config);
    store.set_component(Category::Frame, &part("f"));
    assert!(store.autosave_pending());
    clock.advance(1_000_000);
    assert!(!store.tick());
    assert!(store.drafts().is_empty());
}
