//! Runtime configuration loaded from `<data-dir>/quadcalc.toml`.

use crate::core::autosave::{DEFAULT_DEBOUNCE_MS, DEFAULT_DRAFT_LIMIT};
use crate::core::error::QuadcalcError;
use crate::core::history::DEFAULT_HISTORY_LIMIT;
use crate::core::schemas;
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_BUILD_NAME: &str = "Untitled Build";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QuadcalcConfig {
    /// Name given to a fresh or cleared build.
    pub default_build_name: String,
    pub history_limit: usize,
    pub draft_limit: usize,
    pub autosave_debounce_ms: i64,
}

impl Default for QuadcalcConfig {
    fn default() -> Self {
        Self {
            default_build_name: DEFAULT_BUILD_NAME.to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            draft_limit: DEFAULT_DRAFT_LIMIT,
            autosave_debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl QuadcalcConfig {
    pub fn from_toml(content: &str) -> Result<Self, QuadcalcError> {
        let config: QuadcalcConfig = toml::from_str(content)?;
        if config.history_limit == 0 || config.draft_limit == 0 {
            return Err(QuadcalcError::ValidationError(
                "history_limit and draft_limit must be at least 1".to_string(),
            ));
        }
        if config.autosave_debounce_ms < 0 {
            return Err(QuadcalcError::ValidationError(
                "autosave_debounce_ms must not be negative".to_string(),
            ));
        }
        Ok(config)
    }
}

/// Load config from the data directory. No file means defaults.
pub fn load_config(data_dir: &Path) -> Result<QuadcalcConfig, QuadcalcError> {
    let config_path = data_dir.join(schemas::CONFIG_FILE_NAME);
    if !config_path.exists() {
        return Ok(QuadcalcConfig::default());
    }
    let content = fs::read_to_string(&config_path).map_err(QuadcalcError::IoError)?;
    QuadcalcConfig::from_toml(&content)
}
