//! Rule evaluation against a slot map.
//!
//! Nothing is cached: every call walks the rule table over the current slots.
//! A rule applies only when both of its slots are filled; an inapplicable rule
//! counts toward neither the applicable nor the passing total.

use crate::core::category::Category;
use crate::core::compat::rules::{CompatibilityRule, Severity, rules};
use crate::core::slots::SlotMap;
use serde::Serialize;

/// A rule that fired for the currently assigned pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub explanation: &'static str,
    pub severity: Severity,
    pub message: String,
    pub categories: [Category; 2],
}

impl Alert {
    fn from_rule(rule: &CompatibilityRule, message: String) -> Self {
        Self {
            id: rule.id,
            name: rule.name,
            description: rule.description,
            explanation: rule.explanation,
            severity: rule.severity,
            message,
            categories: [rule.categories.0, rule.categories.1],
        }
    }

    pub fn involves(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryStatus {
    Empty,
    Ok,
    Warning,
    Error,
}

/// One full pass over the rule table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    /// Rule-table order.
    pub alerts: Vec<Alert>,
    pub applicable: usize,
    pub passing: usize,
}

impl Evaluation {
    /// Percentage of applicable rules that pass; 100 when none apply.
    pub fn score(&self) -> u32 {
        if self.applicable == 0 {
            return 100;
        }
        ((self.passing as f64 / self.applicable as f64) * 100.0).round() as u32
    }
}

pub fn evaluate(slots: &SlotMap) -> Evaluation {
    evaluate_with(rules(), slots)
}

pub fn evaluate_with(table: &[CompatibilityRule], slots: &SlotMap) -> Evaluation {
    let mut alerts = Vec::new();
    let mut applicable = 0;
    let mut passing = 0;
    for rule in table {
        let (cat_a, cat_b) = rule.categories;
        let (Some(a), Some(b)) = (slots.get(cat_a), slots.get(cat_b)) else {
            continue;
        };
        applicable += 1;
        match (rule.check)(a, b) {
            Some(message) => alerts.push(Alert::from_rule(rule, message)),
            None => passing += 1,
        }
    }
    Evaluation {
        alerts,
        applicable,
        passing,
    }
}

pub fn alerts(slots: &SlotMap) -> Vec<Alert> {
    evaluate(slots).alerts
}

pub fn alerts_with_severity(slots: &SlotMap, severity: Severity) -> Vec<Alert> {
    alerts(slots)
        .into_iter()
        .filter(|a| a.severity == severity)
        .collect()
}

pub fn errors(slots: &SlotMap) -> Vec<Alert> {
    alerts_with_severity(slots, Severity::Error)
}

pub fn warnings(slots: &SlotMap) -> Vec<Alert> {
    alerts_with_severity(slots, Severity::Warning)
}

pub fn infos(slots: &SlotMap) -> Vec<Alert> {
    alerts_with_severity(slots, Severity::Info)
}

pub fn compatibility_score(slots: &SlotMap) -> u32 {
    evaluate(slots).score()
}

pub fn status_from_alerts(slots: &SlotMap, alerts: &[Alert], category: Category) -> CategoryStatus {
    if !slots.is_filled(category) {
        return CategoryStatus::Empty;
    }
    let related = || alerts.iter().filter(|a| a.involves(category));
    if related().any(|a| a.severity == Severity::Error) {
        CategoryStatus::Error
    } else if related().any(|a| a.severity == Severity::Warning) {
        CategoryStatus::Warning
    } else {
        CategoryStatus::Ok
    }
}

pub fn category_status(slots: &SlotMap, category: Category) -> CategoryStatus {
    status_from_alerts(slots, &alerts(slots), category)
}
