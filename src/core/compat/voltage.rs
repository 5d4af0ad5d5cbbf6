//! Cell-count parsing for battery and device voltage specs.

use regex::Regex;
use std::sync::LazyLock;

static RANGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)-?(\d+)?S").expect("valid voltage range regex"));
static COUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)S").expect("valid cell count regex"));

/// Inclusive supported cell range, e.g. "4-6S" -> 4..=6, "6S" -> 6..=6.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub min: u32,
    pub max: u32,
}

impl CellRange {
    pub fn contains(&self, cells: u32) -> bool {
        cells >= self.min && cells <= self.max
    }

    pub fn overlaps(&self, other: &CellRange) -> bool {
        self.max >= other.min && other.max >= self.min
    }
}

pub fn parse_voltage_range(spec: &str) -> Option<CellRange> {
    let caps = RANGE_RE.captures(spec)?;
    let min = caps.get(1)?.as_str().parse().ok()?;
    let max = match caps.get(2) {
        Some(m) => m.as_str().parse().ok()?,
        None => min,
    };
    Some(CellRange { min, max })
}

/// Battery cell count from the first "<n>S" in the spec.
pub fn parse_s_count(spec: &str) -> Option<u32> {
    COUNT_RE.captures(spec)?.get(1)?.as_str().parse().ok()
}
