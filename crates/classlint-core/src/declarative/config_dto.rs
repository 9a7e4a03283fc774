//! TOML deserialization types (DTO layer).
//!
//! These types exist solely for serde deserialization.
//! They are converted to domain model types via the loader.

use serde::Deserialize;

/// Raw TOML representation of declarative rules.
///
/// Lives next to the base `Config` keys in `classlint.toml` and adds the
/// `[[layers]]`, `[[layer-access]]` and `[[naming]]` sections.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeclarativeConfigDto {
    /// Layer definitions.
    #[serde(rename = "layers", default)]
    pub layers: Vec<LayerDto>,

    /// Access permissions between layers.
    #[serde(rename = "layer-access", default)]
    pub layer_access: Vec<LayerAccessDto>,

    /// Naming conventions.
    #[serde(rename = "naming", default)]
    pub naming: Vec<NamingDto>,
}

/// TOML representation of a layer.
#[derive(Debug, Clone, Deserialize)]
pub struct LayerDto {
    /// Layer name (e.g., "Controller").
    pub name: String,
    /// Package patterns (e.g., `"..controller"`).
    pub packages: Vec<String>,
}

/// Either a list of layer names or the word `"none"`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum AccessDto {
    /// Only these layers.
    Layers(Vec<String>),
    /// A keyword; only `"none"` is accepted by the loader.
    Keyword(String),
}

/// TOML representation of the permissions of one layer.
#[derive(Debug, Clone, Deserialize)]
pub struct LayerAccessDto {
    /// The layer being constrained.
    pub layer: String,
    /// Layers that may depend on this one.
    #[serde(rename = "accessed-by", default)]
    pub accessed_by: Option<AccessDto>,
    /// Layers this one may depend on.
    #[serde(rename = "may-access", default)]
    pub may_access: Option<AccessDto>,
}

/// TOML representation of a naming convention.
#[derive(Debug, Clone, Deserialize)]
pub struct NamingDto {
    /// Rule name (e.g., "controller-naming").
    pub name: String,
    /// Package pattern selecting the classes.
    pub package: String,
    /// Regular expression the simple name must match entirely.
    pub pattern: String,
    /// Required kind: class, interface, enum or record.
    #[serde(default)]
    pub kind: Option<String>,
    /// Accept packages without classes.
    #[serde(rename = "allow-empty", default)]
    pub allow_empty: Option<bool>,
    /// Severity (default: "error").
    #[serde(default = "default_severity_str")]
    pub severity: String,
}

fn default_severity_str() -> String {
    "error".to_string()
}
