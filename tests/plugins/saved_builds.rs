use quadcalc::core::category::Category;
use quadcalc::core::component::Component;
use quadcalc::core::config::QuadcalcConfig;
use quadcalc::core::db::SqliteKv;
use quadcalc::core::kv::MemoryKv;
use quadcalc::core::schemas;
use quadcalc::core::store::BuildStore;
use quadcalc::core::time::ManualClock;
use quadcalc::plugins::saved_builds::{
    delete_saved_build, find_saved_build, list_saved_builds, load_saved_build, save_build,
};
use tempfile::tempdir;

fn store_over(kv: &MemoryKv) -> BuildStore {
    BuildStore::new(
        Box::new(kv.clone()),
        Box::new(ManualClock::new(5_000)),
        QuadcalcConfig::default(),
    )
}

#[test]
fn test_saved_build_lifecycle() {
    let kv = MemoryKv::new();
    let mut store = store_over(&kv);
    store.set_component(Category::Frame, &Component::new("f", "Frame").with_spec("size", "5"));
    store.set_component(Category::Battery, &Component::new("b", "Pack").with_spec("voltage", "6S"));

    // 1. Save under a new name
    let saved = save_build(&mut store, Some("Freestyle 5")).unwrap();
    assert_eq!(saved.build.name, "Freestyle 5");
    assert_eq!(saved.id.len(), 26);

    // 2. Wipe and reload
    store.clear_all();
    assert_eq!(store.filled_count(), 0);
    let depth = store.undo_depth();
    assert!(load_saved_build(&mut store, &saved.id));
    assert_eq!(store.undo_depth(), depth + 1);
    assert_eq!(store.name(), "Freestyle 5");
    assert_eq!(store.get(Category::Battery).unwrap().id, "b");

    // 3. Loading is undoable
    assert!(store.undo());
    assert_eq!(store.filled_count(), 0);

    // 4. Delete
    assert!(delete_saved_build(&kv, &saved.id).unwrap());
    assert!(!load_saved_build(&mut store, &saved.id));
    assert!(list_saved_builds(&kv).is_empty());
}

#[test]
fn test_saved_list_is_separate_from_drafts() {
    let kv = MemoryKv::new();
    let mut store = store_over(&kv);
    for i in 0..8 {
        save_build(&mut store, Some(&format!("Build {}", i))).unwrap();
    }
    assert_eq!(list_saved_builds(&kv).len(), 8);
    store.flush_autosave();
    assert!(store.drafts().len() <= 5);
    assert!(kv.raw(schemas::SAVED_BUILDS_KEY).unwrap().contains("Build 7"));
}

#[test]
fn test_corrupt_saved_list_reads_empty() {
    let kv = MemoryKv::new();
    kv.insert_raw(schemas::SAVED_BUILDS_KEY, "[{\"broken\"");
    assert!(list_saved_builds(&kv).is_empty());
    assert!(find_saved_build(&kv, "x").is_none());
}

#[test]
fn test_saved_builds_persist_in_sqlite() {
    let tmp = tempdir().unwrap();
    let id = {
        let kv = SqliteKv::open(tmp.path()).unwrap();
        let mut store = BuildStore::new(Box::new(kv), Box::new(ManualClock::new(0)), QuadcalcConfig::default());
        store.set_component(Category::Vtx, &Component::new("v", "VTX"));
        save_build(&mut store, Some("Digital")).unwrap().id
    };
    let kv = SqliteKv::open(tmp.path()).unwrap();
    let found = find_saved_build(&kv, &id).unwrap();
    assert_eq!(found.build.name, "Digital");
    assert!(found.build.components.is_filled(Category::Vtx));
}
