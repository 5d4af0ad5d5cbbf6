//! Build documents: the exported build, the persisted draft and the saved build.

use crate::core::slots::SlotMap;
use serde::{Deserialize, Serialize};

/// `{name, timestamp, components}`. The exported document and the draft record
/// share this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Build {
    #[serde(default)]
    pub name: String,
    /// Epoch milliseconds.
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub components: SlotMap,
}

/// A user-saved build: the exported document plus a generated id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedBuild {
    pub id: String,
    #[serde(flatten)]
    pub build: Build,
}
