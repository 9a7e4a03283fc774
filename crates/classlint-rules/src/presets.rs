//! Rule presets for common configurations.

use crate::layering::layered_architecture;
use crate::naming::naming_rules;
use crate::spring::spring_rules;
use crate::structure::structure_rules;
use crate::ConventionOptions;
use classlint_core::{DefinitionError, RuleBox};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Preset configurations for classlint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Preset {
    /// Every built-in convention.
    #[default]
    SpringLayered,
    /// Naming rules only.
    Naming,
    /// The layer rule only.
    Layering,
}

impl Preset {
    /// All presets, default first.
    pub const ALL: [Self; 3] = [Self::SpringLayered, Self::Naming, Self::Layering];

    /// Name used in `classlint.toml` and on the command line.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::SpringLayered => "spring-layered",
            Self::Naming => "naming",
            Self::Layering => "layering",
        }
    }

    /// One-line summary for `list-rules`.
    #[must_use]
    pub fn summary(self) -> &'static str {
        match self {
            Self::SpringLayered => "all built-in conventions (default)",
            Self::Naming => "package naming, DTO and mapper naming rules",
            Self::Layering => "Controller -> Service -> Repository layering only",
        }
    }

    /// Returns the rules for this preset.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError`] if `base_package` is not a valid package
    /// name.
    pub fn rules(self, base_package: &str) -> Result<Vec<RuleBox>, DefinitionError> {
        self.rules_with(&ConventionOptions::new(base_package))
    }

    /// Returns the rules for this preset with explicit options.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError`] if an option is not a valid package name.
    pub fn rules_with(self, options: &ConventionOptions) -> Result<Vec<RuleBox>, DefinitionError> {
        let rules = match self {
            Self::SpringLayered => all_rules_with(options)?,
            Self::Naming => naming_rules()?,
            Self::Layering => {
                let rules: Vec<RuleBox> = vec![Box::new(layered_architecture()?)];
                rules
            }
        };
        debug!(
            "Preset '{}' provides {} rule(s) for base package '{}'",
            self,
            rules.len(),
            options.base_package
        );
        Ok(rules)
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A preset name that is not built in.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown preset '{0}' (expected one of: spring-layered, naming, layering)")]
pub struct UnknownPreset(pub String);

impl FromStr for Preset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.name() == s)
            .ok_or_else(|| UnknownPreset(s.to_string()))
    }
}

/// Returns every built-in rule for the application under `base_package`.
///
/// Order: naming, layering, Spring conventions, structure.
///
/// # Errors
///
/// Returns [`DefinitionError`] if `base_package` is not a valid package
/// name.
pub fn all_rules(base_package: &str) -> Result<Vec<RuleBox>, DefinitionError> {
    all_rules_with(&ConventionOptions::new(base_package))
}

/// [`all_rules`] with explicit options.
///
/// # Errors
///
/// Returns [`DefinitionError`] if an option is not a valid package name.
pub fn all_rules_with(options: &ConventionOptions) -> Result<Vec<RuleBox>, DefinitionError> {
    let mut rules = naming_rules()?;
    rules.push(Box::new(layered_architecture()?));
    rules.extend(spring_rules(options)?);
    rules.extend(structure_rules(options)?);
    Ok(rules)
}
