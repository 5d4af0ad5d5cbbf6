//! Category registry: the fourteen fixed slots of a build.
//!
//! The registry is static and ordered. Rendering, the compatibility engine and
//! the assistant surface all iterate [`Category::ALL`] and treat it as the
//! ground truth for which slots exist.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "frame")]
    Frame,
    #[serde(rename = "motors")]
    Motors,
    #[serde(rename = "propellers")]
    Propellers,
    #[serde(rename = "battery")]
    Battery,
    #[serde(rename = "fc")]
    Fc,
    #[serde(rename = "esc")]
    Esc,
    #[serde(rename = "vtx")]
    Vtx,
    #[serde(rename = "vtxAntenna")]
    VtxAntenna,
    #[serde(rename = "camera")]
    Camera,
    #[serde(rename = "rx")]
    Rx,
    #[serde(rename = "rxAntenna")]
    RxAntenna,
    #[serde(rename = "tx")]
    Tx,
    #[serde(rename = "goggles")]
    Goggles,
    #[serde(rename = "other")]
    Other,
}

/// One registry row as exposed to collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryInfo {
    pub key: &'static str,
    pub label: &'static str,
}

impl Category {
    /// Registry order.
    pub const ALL: [Category; 14] = [
        Category::Frame,
        Category::Motors,
        Category::Propellers,
        Category::Battery,
        Category::Fc,
        Category::Esc,
        Category::Vtx,
        Category::VtxAntenna,
        Category::Camera,
        Category::Rx,
        Category::RxAntenna,
        Category::Tx,
        Category::Goggles,
        Category::Other,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Category::Frame => "frame",
            Category::Motors => "motors",
            Category::Propellers => "propellers",
            Category::Battery => "battery",
            Category::Fc => "fc",
            Category::Esc => "esc",
            Category::Vtx => "vtx",
            Category::VtxAntenna => "vtxAntenna",
            Category::Camera => "camera",
            Category::Rx => "rx",
            Category::RxAntenna => "rxAntenna",
            Category::Tx => "tx",
            Category::Goggles => "goggles",
            Category::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Frame => "Frame",
            Category::Motors => "Motors",
            Category::Propellers => "Propellers",
            Category::Battery => "Battery",
            Category::Fc => "Flight Controller",
            Category::Esc => "ESC",
            Category::Vtx => "VTX",
            Category::VtxAntenna => "VTX Antenna",
            Category::Camera => "Camera",
            Category::Rx => "Receiver (RX)",
            Category::RxAntenna => "RX Antenna",
            Category::Tx => "Transmitter (TX)",
            Category::Goggles => "Goggles",
            Category::Other => "Other",
        }
    }

    /// Exact, case-sensitive lookup by registry key.
    pub fn from_key(key: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.key() == key)
    }

    /// Ground equipment stays with the pilot and never counts toward flying weight.
    pub fn is_ground_equipment(self) -> bool {
        matches!(self, Category::Tx | Category::Goggles)
    }

    /// Listed price/weight covers one unit of a set of four.
    pub fn quad_multiplier(self) -> i64 {
        match self {
            Category::Motors | Category::Propellers => 4,
            _ => 1,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::from_key(s).ok_or_else(|| {
            let keys: Vec<&str> = Category::ALL.iter().map(|c| c.key()).collect();
            format!("unknown category '{}' (expected one of: {})", s, keys.join(", "))
        })
    }
}

/// The ordered `{key, label}` registry.
pub fn registry() -> Vec<CategoryInfo> {
    Category::ALL
        .iter()
        .map(|c| CategoryInfo {
            key: c.key(),
            label: c.label(),
        })
        .collect()
}

/// Label lookup by raw key; `None` for keys outside the registry.
pub fn label_for(key: &str) -> Option<&'static str> {
    Category::from_key(key).map(Category::label)
}
