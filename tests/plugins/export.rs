use quadcalc::core::category::Category;
use quadcalc::core::component::Component;
use quadcalc::core::error::QuadcalcError;
use quadcalc::core::store::BuildStore;
use quadcalc::plugins::export::{ExportFormat, export_csv, export_file_name, export_json, import_json};
use serde_json::Value;

fn sample_store() -> BuildStore {
    let mut store = BuildStore::in_memory();
    store.set_name("Race \"Rat\"");
    store.set_component(
        Category::Motors,
        &Component::new("m", "2207 1950KV")
            .with_cost(2000)
            .with_weight(32)
            .with_spec("size", "2207")
            .with_spec("protocol", vec!["DShot300", "DShot600"]),
    );
    store.set_component(
        Category::Frame,
        &Component::new("f", "Frame")
            .with_description("6mm arms")
            .with_cost(6000)
            .with_weight(120),
    );
    store
}

#[test]
fn test_csv_rows_and_summary() {
    let store = sample_store();
    let csv = export_csv(&store);
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines[1], "\"Frame\",\"Frame\",\"6mm arms\",\"$60\",\"120 g\",\"\"");
    assert_eq!(
        lines[2],
        "\"Motors\",\"2207 1950KV\",\"\",\"$20\",\"32 g\",\"protocol: DShot300/DShot600; size: 2207\""
    );
    assert_eq!(lines[3], "\"Propellers\",\"(empty)\",\"\",\"\",\"\",\"\"");
    assert_eq!(lines[15], "");
    // 4 x $20 + $60; 4 x 32 g + 120 g
    assert_eq!(lines[16], "\"TOTAL\",\"\",\"\",\"$140\",\"248 g\",\"\"");
    assert_eq!(lines[17], "\"Build Name\",\"Race \"\"Rat\"\"\"");
    assert_eq!(lines[18], "\"Parts\",\"2 / 14\"");
}

#[test]
fn test_json_export_then_import_into_fresh_store() {
    let source = sample_store();
    let json = export_json(&source).unwrap();
    let value: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["name"], "Race \"Rat\"");
    assert!(value["components"]["battery"].is_null());
    assert_eq!(value["components"]["motors"]["cost"], 2000);

    let mut target = BuildStore::in_memory();
    let build = import_json(&mut target, &json).unwrap();
    assert_eq!(build.name, "Race \"Rat\"");
    assert_eq!(target.name(), "Race \"Rat\"");
    assert_eq!(target.components(), source.components());
    assert_eq!(target.undo_depth(), 1);
}

#[test]
fn test_malformed_import_leaves_store_untouched() {
    let mut store = sample_store();
    let before = store.components().clone();
    let depth = store.undo_depth();

    for bad in ["{not json", "42", "{\"components\": [1, 2]}"] {
        let err = import_json(&mut store, bad).unwrap_err();
        assert!(matches!(err, QuadcalcError::InvalidImport(_)), "{}", bad);
    }
    assert_eq!(store.components(), &before);
    assert_eq!(store.undo_depth(), depth);
    assert_eq!(store.name(), "Race \"Rat\"");
}

#[test]
fn test_file_names_follow_build_name() {
    let store = sample_store();
    assert_eq!(export_file_name(store.name(), ExportFormat::Json), "Race__Rat_.json");
    assert_eq!(export_file_name("5in-LR v2", ExportFormat::Csv), "5in_LR_v2.csv");
}

#[test]
fn test_import_tolerates_null_and_mixed_specs() {
    let doc = r#"{"name": "Loose Specs", "timestamp": 1, "components": {
        "esc": {"id": "e", "name": "4in1", "specs": {"voltage": "3-6S", "current": null, "protocol": ["DShot600", 300]}},
        "frame": null
    }}"#;
    let mut store = BuildStore::in_memory();
    import_json(&mut store, doc).unwrap();
    assert_eq!(store.name(), "Loose Specs");
    let esc = store.get(Category::Esc).unwrap();
    assert!(esc.spec("current").is_none());
    assert_eq!(esc.spec_text("voltage").as_deref(), Some("3-6S"));
    assert_eq!(esc.spec_list("protocol"), vec!["DShot600".to_string(), "300".to_string()]);
}

#[test]
fn test_exported_components_follow_registry_order() {
    let json = export_json(&sample_store()).unwrap();
    let keys: Vec<usize> = Category::ALL
        .iter()
        .map(|c| json.find(&format!("\"{}\":", c.key())).unwrap())
        .collect();
    assert!(keys.windows(2).all(|w| w[0] < w[1]), "{}", json);
}
