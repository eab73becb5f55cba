use serde::{Deserialize, Serialize};
use crate::ConfigError;

/// Options shared by the front-end passes of one compilation session.
///
/// Loaded from TOML; every key is optional.
///
/// ```toml
/// print-module-tree = true
/// max-suggestions = 3
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct SessionConfig {
    /// Log the module tree at `info` level once it is built
    pub print_module_tree: bool,

    /// Log the rib stack at `trace` level on every path resolution
    pub trace_ribs: bool,

    /// Attach names found in other namespaces to unresolved-name diagnostics
    pub suggest_alternatives: bool,

    /// Maximum number of alternatives listed in a single diagnostic
    pub max_suggestions: usize,

    /// Warn when a path reaches a non-`pub` item from outside its module
    pub lint_private_access: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            print_module_tree: false,
            trace_ribs: false,
            suggest_alternatives: true,
            max_suggestions: 5,
            lint_private_access: true,
        }
    }
}

impl SessionConfig {
    /// Parses a configuration from TOML text, filling missing keys with defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig = toml::from_str(text)?;
        if config.max_suggestions == 0 && config.suggest_alternatives {
            return Err(ConfigError::InvalidValue {
                key: "max-suggestions".to_string(),
                reason: "must be at least 1 while `suggest-alternatives` is enabled".to_string(),
            });
        }
        log::debug!("loaded session config: {:?}", config);
        Ok(config)
    }
}
