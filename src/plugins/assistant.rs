//! Assistant surface: the plain-text build summary handed to a chat model and
//! the two tool calls it may make back into the store.
//!
//! Tool arguments are restricted to registry keys. Unlike the string-keyed
//! store API, an unknown key here is a failed action rather than an inert slot.

use crate::core::category::Category;
use crate::core::component::Component;
use crate::core::store::BuildStore;
use serde::{Deserialize, Serialize};

/// A tool invocation as emitted by the model:
/// `{"name": "set_component", "arguments": {...}}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "name", content = "arguments", rename_all = "snake_case")]
pub enum ToolCall {
    SetComponent { category: String, component: Component },
    ClearComponent { category: String },
}

/// Outcome shown to the user next to the assistant's reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionNote {
    pub ok: bool,
    pub message: String,
}

impl ActionNote {
    fn ok(message: String) -> Self {
        Self { ok: true, message }
    }

    fn failed(message: String) -> Self {
        Self { ok: false, message }
    }
}

pub fn build_context(store: &BuildStore) -> String {
    let evaluation = store.evaluation();
    let mut parts = vec!["Current FPV Quadcopter Build:".to_string()];
    for category in Category::ALL {
        match store.get(category) {
            Some(c) => {
                parts.push(format!(
                    "- {}: {} ({})",
                    category.label(),
                    c.name,
                    c.description.as_deref().filter(|d| !d.is_empty()).unwrap_or("no description")
                ));
                if !c.specs.is_empty() {
                    parts.push(format!("  Specs: {}", c.flattened_specs(", ")));
                }
            }
            None => parts.push(format!("- {}: (not selected)", category.label())),
        }
    }

    parts.push(format!("\nCompatibility Score: {}%", evaluation.score()));

    if evaluation.alerts.is_empty() {
        parts.push("\nNo compatibility issues detected.".to_string());
    } else {
        parts.push("\nCompatibility Issues:".to_string());
        for alert in &evaluation.alerts {
            parts.push(format!(
                "- [{}] {}: {}",
                alert.severity.as_str().to_uppercase(),
                alert.name,
                alert.message
            ));
        }
    }

    parts.join("\n")
}

fn registered(key: &str) -> Result<Category, ActionNote> {
    Category::from_key(key).ok_or_else(|| ActionNote::failed(format!("Unknown category '{}'", key)))
}

pub fn apply_tool_call(store: &mut BuildStore, call: &ToolCall) -> ActionNote {
    let note = match call {
        ToolCall::SetComponent { category, component } => match registered(category) {
            Ok(c) => {
                store.set_component(c, component);
                ActionNote::ok(format!("Set {} to {}", c.label(), component.name))
            }
            Err(note) => note,
        },
        ToolCall::ClearComponent { category } => match registered(category) {
            Ok(c) if !store.components().is_filled(c) => {
                ActionNote::failed(format!("{} is already empty", c.label()))
            }
            Ok(c) => {
                store.clear_component(c);
                ActionNote::ok(format!("Cleared {}", c.label()))
            }
            Err(note) => note,
        },
    };
    tracing::debug!("tool call -> ok={} {}", note.ok, note.message);
    note
}

/// Decode and apply a raw tool-call payload. Malformed payloads are a failed
/// action, never an error.
pub fn apply_tool_call_json(store: &mut BuildStore, raw: &str) -> ActionNote {
    match serde_json::from_str::<ToolCall>(raw) {
        Ok(call) => apply_tool_call(store, &call),
        Err(e) => {
            tracing::warn!("Rejected tool call: {}", e);
            ActionNote::failed(format!("Malformed tool call: {}", e))
        }
    }
}

/// Function-calling definitions offered to the model.
pub fn tool_definitions() -> serde_json::Value {
    let keys: Vec<&str> = Category::ALL.iter().map(|c| c.key()).collect();
    serde_json::json!([
        {
            "name": "set_component",
            "description": "Put a component into a build slot, replacing whatever is there.",
            "parameters": {
                "type": "object",
                "properties": {
                    "category": { "type": "string", "enum": keys },
                    "component": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" },
                            "name": { "type": "string" },
                            "description": { "type": "string" },
                            "cost": { "type": "integer", "description": "US cents" },
                            "weight": { "type": "integer", "description": "grams" },
                            "specs": { "type": "object" }
                        },
                        "required": ["name"]
                    }
                },
                "required": ["category", "component"]
            }
        },
        {
            "name": "clear_component",
            "description": "Empty a build slot.",
            "parameters": {
                "type": "object",
                "properties": {
                    "category": { "type": "string", "enum": keys }
                },
                "required": ["category"]
            }
        }
    ])
}

pub fn schema() -> serde_json::Value {
    serde_json::json!({
        "name": "assistant",
        "version": "0.1.0",
        "description": "Plain-text build context and assistant tool calls",
        "commands": [
            { "name": "context", "parameters": [] },
            { "name": "tool", "parameters": ["path"] }
        ],
        "tools": tool_definitions()
    })
}
