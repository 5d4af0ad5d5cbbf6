use quadcalc::core::category::Category;
use quadcalc::core::component::Component;
use quadcalc::core::store::BuildStore;
use quadcalc::plugins::assistant::{ToolCall, apply_tool_call, apply_tool_call_json, build_context};

#[test]
fn test_context_for_empty_build() {
    let store = BuildStore::in_memory();
    let context = build_context(&store);
    let lines: Vec<&str> = context.lines().collect();
    assert_eq!(lines[0], "Current FPV Quadcopter Build:");
    assert_eq!(lines[1], "- Frame: (not selected)");
    assert_eq!(lines[14], "- Other: (not selected)");
    assert_eq!(lines[15], "");
    assert_eq!(lines[16], "Compatibility Score: 100%");
    assert_eq!(lines[17], "");
    assert_eq!(lines[18], "No compatibility issues detected.");
    assert_eq!(lines.len(), 19);
}

#[test]
fn test_context_lists_specs_and_issues() {
    let mut store = BuildStore::in_memory();
    store.set_component(
        Category::Frame,
        &Component::new("f", "Source One").with_spec("size", "5").with_spec("mountPattern", "30.5x30.5"),
    );
    store.set_component(
        Category::Propellers,
        &Component::new("p", "Gemfan 3016").with_description("3 inch tri").with_spec("size", "3"),
    );
    let context = build_context(&store);

    assert!(context.contains("- Frame: Source One (no description)\n  Specs: mountPattern: 30.5x30.5, size: 5\n"));
    assert!(context.contains("- Propellers: Gemfan 3016 (3 inch tri)\n  Specs: size: 3\n"));
    assert!(context.contains("\nCompatibility Score: 0%\n"));
    assert!(context.contains("\nCompatibility Issues:\n- [ERROR] Frame ↔ Prop Size: Frame is 5\""));
    assert!(!context.contains("No compatibility issues detected."));
}

#[test]
fn test_tool_calls_restricted_to_registry() {
    let mut store = BuildStore::in_memory();

    let note = apply_tool_call(
        &mut store,
        &ToolCall::SetComponent {
            category: "gimbal".to_string(),
            component: Component::new("g", "Gimbal"),
        },
    );
    assert!(!note.ok);
    assert!(store.components().inert().is_empty());
    assert_eq!(store.undo_depth(), 0);

    let note = apply_tool_call(
        &mut store,
        &ToolCall::SetComponent {
            category: "rx".to_string(),
            component: Component::new("rx", "EP2"),
        },
    );
    assert!(note.ok);
    assert_eq!(note.message, "Set Receiver (RX) to EP2");
    assert_eq!(store.get(Category::Rx).unwrap().category.as_deref(), Some("rx"));
}

#[test]
fn test_clear_tool_call() {
    let mut store = BuildStore::in_memory();
    let note = apply_tool_call_json(
        &mut store,
        r#"{"name": "clear_component", "arguments": {"category": "vtx"}}"#,
    );
    assert!(!note.ok);

    store.set_component(Category::Vtx, &Component::new("v", "VTX"));
    let note = apply_tool_call_json(
        &mut store,
        r#"{"name": "clear_component", "arguments": {"category": "vtx"}}"#,
    );
    assert!(note.ok);
    assert_eq!(note.message, "Cleared VTX");
    assert!(store.get(Category::Vtx).is_none());
    assert!(store.undo());
    assert!(store.get(Category::Vtx).is_some());
}

#[test]
fn test_set_tool_call_from_json() {
    let mut store = BuildStore::in_memory();
    let note = apply_tool_call_json(
        &mut store,
        r#"{"name": "set_component", "arguments": {"category": "battery",
            "component": {"id": "b", "name": "6S 1300", "cost": 4500, "specs": {"voltage": "6S", "capacity": 1300}}}}"#,
    );
    assert!(note.ok, "{}", note.message);
    assert_eq!(store.total_cost(), 4500);
}

#[test]
fn test_tool_call_tolerates_null_and_mixed_specs() {
    let mut store = BuildStore::in_memory();
    let note = apply_tool_call_json(
        &mut store,
        r#"{"name": "set_component", "arguments": {"category": "motors",
            "component": {"id": "m", "name": "2207", "specs": {"size": "2207", "kv": null, "protocol": ["DShot600", 300]}}}}"#,
    );
    assert!(note.ok, "{}", note.message);
    let motor = store.get(Category::Motors).unwrap();
    assert!(motor.spec("kv").is_none());
    assert_eq!(motor.spec_text("size").as_deref(), Some("2207"));
    assert_eq!(motor.spec_list("protocol"), vec!["DShot600".to_string(), "300".to_string()]);
}
