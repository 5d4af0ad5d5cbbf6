//! Storage schema and record keys.
//!
//! All persisted state is JSON text under a handful of keys in a single
//! key-value table.

pub const KV_DB_NAME: &str = "quadcalc.db";

pub const KV_DB_SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS kv (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at INTEGER NOT NULL
    )
";

/// Draft ring for crash/reload recovery.
pub const DRAFTS_KEY: &str = "quadcalc_drafts";
/// User-saved builds.
pub const SAVED_BUILDS_KEY: &str = "quadcalc_builds";
/// User-authored component presets, keyed by category.
pub const CUSTOM_PRESETS_KEY: &str = "quadcalc_custom_presets";

pub const CONFIG_FILE_NAME: &str = "quadcalc.toml";
