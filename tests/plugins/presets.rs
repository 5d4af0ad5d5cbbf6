use quadcalc::core::category::Category;
use quadcalc::core::compat::Severity;
use quadcalc::core::component::Component;
use quadcalc::core::kv::MemoryKv;
use quadcalc::core::schemas;
use quadcalc::core::store::BuildStore;
use quadcalc::plugins::presets::{
    catalog, catalog_presets, custom_presets, delete_custom_preset, find_preset, presets_for,
    save_custom_preset,
};

fn stock(category: Category, id: &str) -> Component {
    find_preset(&MemoryKv::new(), category, id).unwrap()
}

#[test]
fn test_stock_five_inch_build_is_clean() {
    let mut store = BuildStore::in_memory();
    let picks = [
        (Category::Frame, "frame-5in-freestyle"),
        (Category::Motors, "motor-2207-1950kv"),
        (Category::Propellers, "prop-5in-tri"),
        (Category::Battery, "lipo-6s-1100"),
        (Category::Fc, "fc-f7-30x30"),
        (Category::Esc, "esc-4in1-55a"),
        (Category::Vtx, "vtx-analog-1w"),
        (Category::VtxAntenna, "vtxant-lhcp-mmcx"),
        (Category::Camera, "cam-analog-1200tvl"),
        (Category::Rx, "rx-elrs-24"),
        (Category::RxAntenna, "rxant-t-24"),
        (Category::Tx, "tx-elrs-radio"),
        (Category::Goggles, "goggles-analog-box"),
    ];
    for (category, id) in picks {
        store.set_component(category, &stock(category, id));
    }
    assert!(store.alerts().is_empty(), "{:?}", store.alerts());
    assert_eq!(store.compatibility_score(), 100);
    assert_eq!(store.filled_count(), 13);
    assert!(store.thrust_to_weight_ratio().is_some());
    assert!(store.estimated_flight_time().is_some());
}

#[test]
fn test_mixed_stock_parts_raise_alerts() {
    let mut store = BuildStore::in_memory();
    store.set_component(Category::Frame, &stock(Category::Frame, "frame-3in-cinewhoop"));
    store.set_component(Category::Battery, &stock(Category::Battery, "lipo-6s-1100"));
    store.set_component(Category::Vtx, &stock(Category::Vtx, "vtx-dji-o3"));
    store.set_component(Category::Goggles, &stock(Category::Goggles, "goggles-hdzero"));
    let alerts = store.alerts();
    assert!(alerts.iter().any(|a| a.id == "battery-frame-size" && a.severity == Severity::Info));
    assert!(alerts.iter().any(|a| a.id == "vtx-goggles-system" && a.severity == Severity::Error));
}

#[test]
fn test_catalog_templates_are_not_mutated_by_assignment() {
    let mut store = BuildStore::in_memory();
    let template = &catalog_presets(Category::Esc)[0];
    store.set_component(Category::Esc, template);
    assert_eq!(store.get(Category::Esc).unwrap().category.as_deref(), Some("esc"));
    assert_eq!(catalog_presets(Category::Esc)[0].category, None);
    assert_eq!(catalog().len(), 14);
}

#[test]
fn test_custom_presets_are_keyed_by_category() {
    let kv = MemoryKv::new();
    let frame = save_custom_preset(&kv, Category::Frame, Component::new("", "Printed Frame")).unwrap();
    save_custom_preset(&kv, Category::Other, Component::new("led-strip", "LED Strip")).unwrap();

    let stored = custom_presets(&kv);
    assert_eq!(stored["frame"].len(), 1);
    assert_eq!(stored["other"][0].id, "led-strip");
    assert!(stored["other"][0].custom);

    let raw = kv.raw(schemas::CUSTOM_PRESETS_KEY).unwrap();
    assert!(raw.contains("\"_custom\":true"));

    let frames = presets_for(&kv, Category::Frame);
    assert_eq!(frames[0].id, frame.id);
    assert_eq!(frames.len(), 1 + catalog_presets(Category::Frame).len());

    assert!(delete_custom_preset(&kv, Category::Frame, &frame.id).unwrap());
    assert!(find_preset(&kv, Category::Frame, &frame.id).is_none());
}
