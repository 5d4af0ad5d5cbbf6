//! Derived build metrics. Pure functions over a slot map, recomputed on every read.
//!
//! Multipliers: one listed motor or propeller stands for a set of four. Ground
//! equipment (transmitter, goggles) never counts toward flying weight.
//! Sums saturate at `i64::MAX` rather than overflow.

use crate::core::category::Category;
use crate::core::slots::SlotMap;
use serde::Serialize;
use std::collections::BTreeMap;

/// Sustainable share of peak static thrust.
pub const SUSTAINED_THRUST_FACTOR: f64 = 0.8;
pub const CELL_NOMINAL_VOLTS: f64 = 3.7;
/// Average hover/cruise power draw per kilogram of flying weight.
pub const WATTS_PER_KG: f64 = 200.0;
/// Share of pack capacity that is safely usable.
pub const USABLE_CAPACITY_FACTOR: f64 = 0.8;

pub fn filled_count(slots: &SlotMap) -> usize {
    slots.filled().count()
}

/// Total cost in cents; missing costs count as zero.
pub fn total_cost(slots: &SlotMap) -> i64 {
    slots
        .filled()
        .map(|(category, c)| {
            let multiplier = if category == Category::Motors { 4 } else { 1 };
            c.cost.unwrap_or(0).saturating_mul(multiplier)
        })
        .fold(0, i64::saturating_add)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeightBreakdown {
    #[serde(flatten)]
    pub entries: BTreeMap<Category, i64>,
    pub total: i64,
}

/// Per-category flying weight in grams, plus the total.
pub fn weight_breakdown(slots: &SlotMap) -> WeightBreakdown {
    let entries: BTreeMap<Category, i64> = slots
        .filled()
        .filter(|(category, _)| !category.is_ground_equipment())
        .map(|(category, c)| {
            (category, c.weight.unwrap_or(0).saturating_mul(category.quad_multiplier()))
        })
        .collect();
    let total = entries.values().copied().fold(0, i64::saturating_add);
    WeightBreakdown { entries, total }
}

pub fn total_weight(slots: &SlotMap) -> i64 {
    weight_breakdown(slots).total
}

/// Effective thrust over flying weight, from the motor's `thrust_grams` spec.
pub fn thrust_to_weight_ratio(slots: &SlotMap) -> Option<f64> {
    let thrust = slots.get(Category::Motors)?.spec_number("thrust_grams")?;
    let weight = total_weight(slots);
    if weight == 0 {
        return None;
    }
    Some(thrust * 4.0 * SUSTAINED_THRUST_FACTOR / weight as f64)
}

/// Rough flight time in minutes from battery capacity, cell count and weight.
pub fn estimated_flight_time(slots: &SlotMap) -> Option<f64> {
    let battery = slots.get(Category::Battery)?;
    let capacity_mah = battery.spec_number("capacity")?;
    let cells = parse_cell_count(&battery.spec_text("voltage")?)?;
    let weight = total_weight(slots);
    if weight == 0 || cells == 0 {
        return None;
    }
    let nominal_volts = cells as f64 * CELL_NOMINAL_VOLTS;
    let avg_watts = (weight as f64 / 1000.0) * WATTS_PER_KG;
    let avg_amps = avg_watts / nominal_volts;
    Some((capacity_mah * USABLE_CAPACITY_FACTOR) / (avg_amps * 1000.0) * 60.0)
}

/// Cell count of an "NS" string: "6S" -> 6.
pub fn parse_cell_count(voltage: &str) -> Option<u32> {
    crate::core::compat::voltage::parse_s_count(voltage)
}

/// Every derived value in one serializable record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildMetrics {
    pub filled_count: usize,
    pub slot_count: usize,
    pub total_cost: i64,
    pub total_weight: i64,
    pub weight_breakdown: WeightBreakdown,
    pub thrust_to_weight_ratio: Option<f64>,
    pub estimated_flight_time: Option<f64>,
}

pub fn compute(slots: &SlotMap) -> BuildMetrics {
    let weight_breakdown = weight_breakdown(slots);
    BuildMetrics {
        filled_count: filled_count(slots),
        slot_count: Category::ALL.len(),
        total_cost: total_cost(slots),
        total_weight: weight_breakdown.total,
        weight_breakdown,
        thrust_to_weight_ratio: thrust_to_weight_ratio(slots),
        estimated_flight_time: estimated_flight_time(slots),
    }
}
