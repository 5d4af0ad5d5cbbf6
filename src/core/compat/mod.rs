//! Compatibility engine: a static rule table over category pairs, evaluated
//! lazily against the current slot map.

pub mod engine;
pub mod rules;
pub mod voltage;

pub use engine::{Alert, CategoryStatus, Evaluation, category_status, compatibility_score, evaluate};
pub use rules::{CompatibilityRule, Severity, find_rule, rules};
