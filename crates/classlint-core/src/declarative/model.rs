//! Pure domain model for declarative architecture rules.
//!
//! No serde and no I/O here. Invariants are enforced at construction time.

use crate::descriptor::ClassKind;
use crate::package::{PackagePattern, PatternError};
use crate::predicates::full_match;
use crate::types::Severity;
use regex::Regex;
use std::collections::HashSet;
use std::fmt;

/// A validated layer name (non-empty, no whitespace).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LayerName(String);

impl LayerName {
    /// Creates a new layer name.
    ///
    /// # Errors
    ///
    /// Returns error if the name is empty or contains whitespace.
    pub fn new(name: &str) -> Result<Self, ModelError> {
        if name.is_empty() {
            return Err(ModelError::EmptyLayerName);
        }
        if name.chars().any(char::is_whitespace) {
            return Err(ModelError::InvalidLayerName {
                name: name.to_string(),
            });
        }
        Ok(Self(name.to_string()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A regular expression that must match a whole simple name.
#[derive(Debug, Clone)]
pub struct NamePattern {
    raw: String,
    compiled: Regex,
}

impl NamePattern {
    /// Compiles a name pattern.
    ///
    /// # Errors
    ///
    /// Returns error if the pattern is empty or not a valid regex.
    pub fn new(pattern: &str) -> Result<Self, ModelError> {
        if pattern.is_empty() {
            return Err(ModelError::EmptyNamePattern);
        }
        let compiled = full_match(pattern).map_err(|e| ModelError::InvalidNamePattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            raw: pattern.to_string(),
            compiled,
        })
    }

    /// Tests a simple name.
    #[must_use]
    pub fn matches(&self, simple_name: &str) -> bool {
        self.compiled.is_match(simple_name)
    }

    /// Returns the pattern as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

/// Parses the `kind` of a naming convention.
///
/// # Errors
///
/// Returns [`ModelError::UnknownKind`] for anything but class, interface,
/// enum or record.
pub fn parse_kind(value: &str) -> Result<ClassKind, ModelError> {
    match value {
        "class" => Ok(ClassKind::Class),
        "interface" => Ok(ClassKind::Interface),
        "enum" => Ok(ClassKind::Enum),
        "record" => Ok(ClassKind::Record),
        _ => Err(ModelError::UnknownKind {
            value: value.to_string(),
        }),
    }
}

/// A layer and the packages it covers.
#[derive(Debug, Clone)]
pub struct LayerDef {
    /// Layer name.
    pub name: LayerName,
    /// Package patterns, at least one.
    pub packages: Vec<PackagePattern>,
}

/// Which layers an access permission names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessList {
    /// No layer at all.
    Nothing,
    /// Only these layers.
    Only(Vec<LayerName>),
}

impl AccessList {
    /// Layer names referenced by this list.
    #[must_use]
    pub fn names(&self) -> &[LayerName] {
        match self {
            Self::Nothing => &[],
            Self::Only(names) => names,
        }
    }
}

/// Access permissions of one layer.
#[derive(Debug, Clone)]
pub struct LayerAccess {
    /// The constrained layer.
    pub layer: LayerName,
    /// Who may depend on it; `None` means anyone.
    pub accessed_by: Option<AccessList>,
    /// What it may depend on; `None` means anything.
    pub may_access: Option<AccessList>,
}

/// "Classes in `package` must have a simple name matching `pattern`".
#[derive(Debug, Clone)]
pub struct NamingConvention {
    /// Rule name.
    pub name: String,
    /// Selected package.
    pub package: PackagePattern,
    /// Required simple-name shape.
    pub pattern: NamePattern,
    /// Required kind, if any.
    pub kind: Option<ClassKind>,
    /// Empty-selection override.
    pub allow_empty: Option<bool>,
    /// Default severity.
    pub severity: Severity,
}

/// The validated aggregate of every declarative section.
#[derive(Debug, Clone, Default)]
pub struct DeclarativeConfig {
    layers: Vec<LayerDef>,
    access: Vec<LayerAccess>,
    naming: Vec<NamingConvention>,
}

impl DeclarativeConfig {
    /// Builds the aggregate, checking cross references.
    ///
    /// # Errors
    ///
    /// Returns every duplicate layer, access entry naming an undeclared
    /// layer, access entry without layers, and duplicate naming rule.
    pub fn new(
        layers: Vec<LayerDef>,
        access: Vec<LayerAccess>,
        naming: Vec<NamingConvention>,
    ) -> Result<Self, Vec<ModelError>> {
        let mut errors = Vec::new();

        let mut declared = HashSet::new();
        for layer in &layers {
            if !declared.insert(layer.name.as_str()) {
                errors.push(ModelError::DuplicateLayer {
                    name: layer.name.to_string(),
                });
            }
        }

        for entry in &access {
            let referenced = std::iter::once(&entry.layer)
                .chain(entry.accessed_by.iter().flat_map(AccessList::names))
                .chain(entry.may_access.iter().flat_map(AccessList::names));
            for name in referenced {
                if !declared.contains(name.as_str()) {
                    errors.push(ModelError::UnknownLayer {
                        name: name.to_string(),
                        referenced_by: entry.layer.to_string(),
                    });
                }
            }
            if entry.accessed_by.is_none() && entry.may_access.is_none() {
                errors.push(ModelError::EmptyAccess {
                    layer: entry.layer.to_string(),
                });
            }
        }

        let mut rule_names = HashSet::new();
        for convention in &naming {
            if !rule_names.insert(convention.name.as_str()) {
                errors.push(ModelError::DuplicateRule {
                    name: convention.name.clone(),
                });
            }
        }

        if errors.is_empty() {
            Ok(Self {
                layers,
                access,
                naming,
            })
        } else {
            Err(errors)
        }
    }

    /// Declared layers.
    #[must_use]
    pub fn layers(&self) -> &[LayerDef] {
        &self.layers
    }

    /// Access permissions.
    #[must_use]
    pub fn access(&self) -> &[LayerAccess] {
        &self.access
    }

    /// Naming conventions.
    #[must_use]
    pub fn naming(&self) -> &[NamingConvention] {
        &self.naming
    }

    /// Whether no declarative rule is defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty() && self.naming.is_empty()
    }
}

/// Validation errors in the declarative model.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Layer name is empty.
    #[error("layer name must not be empty")]
    EmptyLayerName,

    /// Layer name contains whitespace.
    #[error("invalid layer name '{name}': whitespace is not allowed")]
    InvalidLayerName {
        /// The rejected name.
        name: String,
    },

    /// Layer declared without packages.
    #[error("layer must list at least one package")]
    NoPackages,

    /// Package pattern does not parse.
    #[error(transparent)]
    Package(#[from] PatternError),

    /// Name pattern is empty.
    #[error("name pattern must not be empty")]
    EmptyNamePattern,

    /// Name pattern is not a valid regex.
    #[error("invalid name pattern '{pattern}': {reason}")]
    InvalidNamePattern {
        /// The pattern.
        pattern: String,
        /// Compiler message.
        reason: String,
    },

    /// Unknown class kind.
    #[error("unknown kind '{value}', expected: class, interface, enum, record")]
    UnknownKind {
        /// The rejected value.
        value: String,
    },

    /// Access keyword other than "none".
    #[error("unknown access keyword '{value}', expected a list of layers or \"none\"")]
    UnknownAccessKeyword {
        /// The rejected value.
        value: String,
    },

    /// Layer declared twice.
    #[error("layer '{name}' is declared more than once")]
    DuplicateLayer {
        /// Layer name.
        name: String,
    },

    /// Reference to an undeclared layer.
    #[error("layer-access for '{referenced_by}' references unknown layer '{name}'")]
    UnknownLayer {
        /// The unknown name.
        name: String,
        /// The access entry containing it.
        referenced_by: String,
    },

    /// Access entry that constrains nothing.
    #[error("layer-access for '{layer}' sets neither accessed-by nor may-access")]
    EmptyAccess {
        /// Layer name.
        layer: String,
    },

    /// Two naming rules with the same name.
    #[error("naming rule '{name}' is defined more than once")]
    DuplicateRule {
        /// Rule name.
        name: String,
    },
}
