//! Configuration types for classlint.

use crate::types::Severity;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Top-level configuration, read from `classlint.toml`.
///
/// Declarative `[[layers]]`, `[[layer-access]]` and `[[naming]]` tables in
/// the same file are read separately by [`crate::declarative`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Built-in preset to use (e.g., "spring-layered", "naming", "layering").
    #[serde(default)]
    pub preset: Option<String>,

    /// Root package of the application, used by the built-in conventions.
    /// Derived from the imported classes when absent.
    #[serde(default)]
    pub base_package: Option<String>,

    /// Severity threshold for failure (default: error).
    #[serde(default)]
    pub fail_on: Option<Severity>,

    /// What to import.
    #[serde(default)]
    pub import: ImportConfig,

    /// How rules are evaluated.
    #[serde(default)]
    pub evaluation: EvaluationConfig,

    /// Per-rule configurations.
    #[serde(default)]
    pub rules: HashMap<String, RuleConfig>,
}

impl Config {
    /// Parses configuration from a TOML string. Declarative tables are
    /// ignored here.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Checks if a rule is enabled.
    #[must_use]
    pub fn is_rule_enabled(&self, rule_name: &str) -> bool {
        self.rules
            .get(rule_name)
            .map_or(true, |c| c.enabled.unwrap_or(true))
    }

    /// Gets the severity override for a rule.
    #[must_use]
    pub fn rule_severity(&self, rule_name: &str) -> Option<Severity> {
        self.rules.get(rule_name).and_then(|c| c.severity)
    }

    /// Gets the configuration table of a rule.
    #[must_use]
    pub fn rule(&self, rule_name: &str) -> Option<&RuleConfig> {
        self.rules.get(rule_name)
    }

    /// Resolves relative import locations against `base`.
    #[must_use]
    pub fn resolve_paths(mut self, base: &Path) -> Self {
        let absolutize = |p: PathBuf| if p.is_absolute() { p } else { base.join(p) };
        self.import.locations = self.import.locations.into_iter().map(absolutize).collect();
        self.import.libraries = self.import.libraries.into_iter().map(absolutize).collect();
        self
    }
}

/// Import configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Class directories or `.jar`/`.zip` archives to analyze.
    #[serde(default)]
    pub locations: Vec<PathBuf>,

    /// Locations imported only to resolve references (e.g. framework jars).
    #[serde(default)]
    pub libraries: Vec<PathBuf>,

    /// Package prefixes to analyze; empty means everything.
    #[serde(default)]
    pub packages: Vec<String>,

    /// Glob patterns on artifact paths to skip.
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// Evaluation configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// Evaluate rules on the rayon pool.
    #[serde(default)]
    pub parallel: bool,

    /// Accept empty selections for rules that do not decide themselves.
    #[serde(default)]
    pub allow_empty_should: bool,
}

/// Per-rule configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Whether this rule is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Severity override for this rule.
    #[serde(default)]
    pub severity: Option<Severity>,

    /// Rule-specific options as key-value pairs.
    #[serde(flatten)]
    pub options: HashMap<String, toml::Value>,
}

impl RuleConfig {
    /// String option `key`; `None` when absent or not a string.
    #[must_use]
    pub fn string(&self, key: &str) -> Option<&str> {
        self.options.get(key)?.as_str()
    }

    /// String-list option `key`; `None` when absent, not an array, or
    /// holding a non-string element.
    #[must_use]
    pub fn strings(&self, key: &str) -> Option<Vec<&str>> {
        self.options
            .get(key)?
            .as_array()?
            .iter()
            .map(toml::Value::as_str)
            .collect()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_enables_everything() {
        let config = Config::default();
        assert!(config.rules.is_empty());
        assert!(config.is_rule_enabled("anything"));
        assert!(!config.evaluation.allow_empty_should);
        assert!(config.fail_on.is_none());
    }

    #[test]
    fn parses_all_sections() {
        let toml = r#"
preset = "spring-layered"
base_package = "com.example.archunitrules"
fail_on = "warning"

[import]
locations = ["build/classes/java/main", "/abs/app.jar"]
packages = ["com.example.archunitrules"]
exclude = ["**/generated/**"]

[evaluation]
parallel = true
allow_empty_should = true

[rules.controller-naming]
severity = "info"

[rules.no-top-level-layer-packages]
packages = ["web", "persistence"]
base-exception = 42
"#;
        let Ok(config) = Config::parse(toml) else {
            panic!("valid config rejected");
        };
        assert_eq!(config.preset.as_deref(), Some("spring-layered"));
        assert_eq!(config.base_package.as_deref(), Some("com.example.archunitrules"));
        assert_eq!(config.fail_on, Some(Severity::Warning));
        assert!(config.evaluation.parallel);
        assert_eq!(config.rule_severity("controller-naming"), Some(Severity::Info));
        let Some(placement) = config.rule("no-top-level-layer-packages") else {
            panic!("rule table missing");
        };
        assert_eq!(placement.strings("packages"), Some(vec!["web", "persistence"]));
        assert_eq!(placement.string("base-exception"), None);
        assert_eq!(placement.strings("missing"), None);

        let resolved = config.resolve_paths(Path::new("/project"));
        assert_eq!(
            resolved.import.locations,
            [
                PathBuf::from("/project/build/classes/java/main"),
                PathBuf::from("/abs/app.jar")
            ]
        );
    }

    #[test]
    fn unknown_severity_is_a_parse_error() {
        let result = Config::parse("fail_on = \"fatal\"");
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn declarative_tables_do_not_break_config_parsing() {
        let toml = r#"
[[layers]]
name = "Service"
packages = ["..service"]
"#;
        assert!(Config::parse(toml).is_ok());
    }
}
