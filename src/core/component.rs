//! Component data contract.
//!
//! A `Component` is one concrete part that can occupy a slot. Its `specs` map is
//! free-form and varies per category (`size`, `voltage`, `protocol`, `system`,
//! `connector`, `frequency`, `mountPattern`, `shaftSize`, `thrust_grams`, ...).
//! Every accessor here is total: a missing or oddly-typed spec yields `None`
//! rather than an error, which is what keeps rule predicates null-safe.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// A spec value: scalar or ordered list of strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SpecValue {
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
    List(Vec<String>),
}

impl SpecValue {
    /// Lenient conversion from raw JSON. `null` and objects read as absent.
    /// Numbers and booleans inside a list become text; other items are skipped.
    pub fn from_json(value: Value) -> Option<SpecValue> {
        match value {
            Value::Bool(b) => Some(SpecValue::Bool(b)),
            Value::Number(n) => Some(SpecValue::Number(n)),
            Value::String(s) => Some(SpecValue::Text(s)),
            Value::Array(items) => Some(SpecValue::List(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(s) => Some(s),
                        Value::Number(n) => Some(n.to_string()),
                        Value::Bool(b) => Some(b.to_string()),
                        _ => None,
                    })
                    .collect(),
            )),
            Value::Null | Value::Object(_) => None,
        }
    }

    /// JavaScript-style truthiness, used for flag specs like `aio`.
    pub fn is_truthy(&self) -> bool {
        match self {
            SpecValue::Bool(b) => *b,
            SpecValue::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
            SpecValue::Text(s) => !s.is_empty(),
            SpecValue::List(_) => true,
        }
    }
}

impl<'de> Deserialize<'de> for SpecValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        SpecValue::from_json(Value::deserialize(deserializer)?)
            .ok_or_else(|| serde::de::Error::custom("spec value must be a scalar or a list"))
    }
}

/// Spec maps degrade per entry: an unusable value drops that key only.
fn lenient_specs<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeMap<String, SpecValue>, D::Error> {
    let raw: Option<BTreeMap<String, Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(k, v)| SpecValue::from_json(v).map(|v| (k, v)))
        .collect())
}

impl fmt::Display for SpecValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecValue::Bool(b) => write!(f, "{}", b),
            SpecValue::Number(n) => write!(f, "{}", n),
            SpecValue::Text(s) => f.write_str(s),
            SpecValue::List(items) => f.write_str(&items.join("/")),
        }
    }
}

impl From<&str> for SpecValue {
    fn from(value: &str) -> Self {
        SpecValue::Text(value.to_string())
    }
}

impl From<i64> for SpecValue {
    fn from(value: i64) -> Self {
        SpecValue::Number(value.into())
    }
}

impl From<bool> for SpecValue {
    fn from(value: bool) -> Self {
        SpecValue::Bool(value)
    }
}

impl From<Vec<&str>> for SpecValue {
    fn from(value: Vec<&str>) -> Self {
        SpecValue::List(value.into_iter().map(str::to_string).collect())
    }
}

fn is_false(v: &bool) -> bool {
    !*v
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Integer cents.
    #[serde(default)]
    pub cost: Option<i64>,
    /// Integer grams.
    #[serde(default)]
    pub weight: Option<i64>,
    #[serde(default, deserialize_with = "lenient_specs")]
    pub specs: BTreeMap<String, SpecValue>,
    /// Stamped by the build store on assignment; callers should leave it unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// User-authored preset rather than a catalog entry.
    #[serde(default, rename = "_custom", skip_serializing_if = "is_false")]
    pub custom: bool,
    /// ESC slot stand-in for the ESC integrated on an AIO flight controller.
    #[serde(default, rename = "_aioVirtual", skip_serializing_if = "is_false")]
    pub aio_virtual: bool,
}

impl Component {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            cost: None,
            weight: None,
            specs: BTreeMap::new(),
            category: None,
            custom: false,
            aio_virtual: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_cost(mut self, cents: i64) -> Self {
        self.cost = Some(cents);
        self
    }

    pub fn with_weight(mut self, grams: i64) -> Self {
        self.weight = Some(grams);
        self
    }

    pub fn with_spec(mut self, key: impl Into<String>, value: impl Into<SpecValue>) -> Self {
        self.specs.insert(key.into(), value.into());
        self
    }

    /// Owned copy of a template with its category tag overwritten by the slot key.
    pub fn stamped(&self, slot_key: &str) -> Component {
        let mut copy = self.clone();
        copy.category = Some(slot_key.to_string());
        copy
    }

    pub fn spec(&self, key: &str) -> Option<&SpecValue> {
        self.specs.get(key)
    }

    /// Scalar spec as text. Empty strings, booleans and lists read as absent.
    pub fn spec_text(&self, key: &str) -> Option<String> {
        match self.specs.get(key)? {
            SpecValue::Text(s) if !s.is_empty() => Some(s.clone()),
            SpecValue::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Numeric spec; text is parsed by its leading number ("35A" reads as 35).
    pub fn spec_number(&self, key: &str) -> Option<f64> {
        match self.specs.get(key)? {
            SpecValue::Number(n) => n.as_f64(),
            SpecValue::Text(s) => leading_number(s),
            _ => None,
        }
    }

    /// Single value or list, normalized to a list. Absent reads as empty.
    pub fn spec_list(&self, key: &str) -> Vec<String> {
        match self.specs.get(key) {
            Some(SpecValue::List(items)) => items.clone(),
            Some(SpecValue::Text(s)) if !s.is_empty() => vec![s.clone()],
            Some(SpecValue::Number(n)) => vec![n.to_string()],
            _ => Vec::new(),
        }
    }

    pub fn spec_flag(&self, key: &str) -> bool {
        self.specs.get(key).is_some_and(SpecValue::is_truthy)
    }

    /// `k: v` pairs joined by `sep`, lists rendered with `/`.
    pub fn flattened_specs(&self, sep: &str) -> String {
        self.specs
            .iter()
            .map(|(k, v)| format!("{}: {}", k, v))
            .collect::<Vec<_>>()
            .join(sep)
    }
}

/// Leading integer of a string, `parseInt` style: "2205" -> 2205, "2306.5" -> 2306.
pub fn leading_int(s: &str) -> Option<i64> {
    let trimmed = s.trim_start();
    let (sign, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse::<i64>().ok().map(|v| v * sign)
}

/// Leading decimal of a string, `parseFloat` style.
pub fn leading_number(s: &str) -> Option<f64> {
    let trimmed = s.trim_start();
    let mut end = 0;
    let mut seen_dot = false;
    for (i, c) in trimmed.char_indices() {
        if c.is_ascii_digit() || ((c == '-' || c == '+') && i == 0) {
            end = i + c.len_utf8();
        } else if c == '.' && !seen_dot {
            seen_dot = true;
            end = i + 1;
        } else {
            break;
        }
    }
    trimmed[..end].trim_end_matches('.').parse::<f64>().ok()
}
