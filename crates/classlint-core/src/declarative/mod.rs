//! Declarative architecture rules driven by TOML configuration.
//!
//! Layers and naming conventions can be declared in `classlint.toml`
//! without writing Rust rule code.
//!
//! # Architecture
//!
//! ```text
//! TOML text
//!   ↓ serde (DTO layer)
//! config_dto types
//!   ↓ validate + convert
//! DeclarativeConfig (pure domain model)
//!   ↓ create_rules()
//! Vec<RuleBox>
//! ```

pub mod config_dto;
pub mod loader;
pub mod model;

use crate::condition::have;
use crate::descriptor::{ClassDescriptor, ClassKind};
use crate::error::DefinitionError;
use crate::layered::LayeredArchitecture;
use crate::predicate::Predicate;
use crate::rule::{classes, RuleBox};
use model::{AccessList, DeclarativeConfig, NamingConvention};

/// Name of the rule produced from `[[layers]]`.
pub const LAYERS_RULE_NAME: &str = "declared-layers";

/// Errors from parsing TOML and loading declarative rules.
#[derive(Debug, thiserror::Error)]
pub enum LoadRulesError {
    /// TOML deserialization failed.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Domain model validation failed.
    #[error("{0}")]
    Load(#[from] loader::LoadError),

    /// A validated definition could not be turned into a rule.
    #[error("{0}")]
    Definition(#[from] DefinitionError),
}

/// Parses TOML content and creates all applicable declarative rules.
///
/// Returns `Ok(vec![])` if no declarative sections are present.
///
/// # Errors
///
/// Returns an error if TOML parsing or model validation fails.
pub fn load_rules_from_toml(content: &str) -> Result<Vec<RuleBox>, LoadRulesError> {
    let dto: config_dto::DeclarativeConfigDto = toml::from_str(content)?;
    let config = loader::load(dto)?;
    Ok(create_rules(&config)?)
}

/// Creates all declarative rules from a validated [`DeclarativeConfig`].
///
/// One layered-architecture rule when layers are declared, then one rule
/// per naming convention in declaration order.
///
/// # Errors
///
/// Returns [`DefinitionError`] if a layer rule cannot be built.
pub fn create_rules(config: &DeclarativeConfig) -> Result<Vec<RuleBox>, DefinitionError> {
    let mut result: Vec<RuleBox> = Vec::new();
    if config.is_empty() {
        return Ok(result);
    }

    if !config.layers().is_empty() {
        result.push(Box::new(layered_rule(config)?));
    }
    for convention in config.naming() {
        result.push(naming_rule(convention));
    }
    Ok(result)
}

fn layered_rule(config: &DeclarativeConfig) -> Result<LayeredArchitecture, DefinitionError> {
    let mut builder = LayeredArchitecture::builder().named(LAYERS_RULE_NAME);
    for layer in config.layers() {
        builder = builder.layer(
            layer.name.as_str(),
            layer.packages.iter().map(|p| p.as_str().to_string()),
        );
    }
    for entry in config.access() {
        let layer = entry.layer.as_str();
        builder = match &entry.accessed_by {
            Some(AccessList::Nothing) => builder.may_not_be_accessed_by_any_layer(layer),
            Some(AccessList::Only(names)) => {
                builder.may_only_be_accessed_by(layer, names.iter().map(|n| n.as_str().to_string()))
            }
            None => builder,
        };
        builder = match &entry.may_access {
            Some(AccessList::Nothing) => builder.may_not_access_any_layer(layer),
            Some(AccessList::Only(names)) => {
                builder.may_only_access(layer, names.iter().map(|n| n.as_str().to_string()))
            }
            None => builder,
        };
    }
    builder.build()
}

fn naming_rule(convention: &NamingConvention) -> RuleBox {
    let package = convention.package.clone();
    let selection = Predicate::new(
        format!("reside in a package '{}'", package.as_str()),
        move |class: &ClassDescriptor, _| package.matches(class.package_name()),
    );

    let pattern = convention.pattern.clone();
    let name_shape = Predicate::new(
        format!("have simple name matching '{}'", pattern.as_str()),
        move |class: &ClassDescriptor, _| pattern.matches(class.simple_name()),
    );

    let mut rule = classes().that(selection).should_be(name_shape);
    if let Some(kind) = convention.kind {
        rule = rule.and_should(have(of_kind(kind)));
    }
    if let Some(allow) = convention.allow_empty {
        rule = rule.allow_empty_should(allow);
    }
    Box::new(
        rule.named(convention.name.as_str())
            .severity(convention.severity),
    )
}

fn of_kind(kind: ClassKind) -> Predicate<ClassDescriptor> {
    let plural = match kind {
        ClassKind::Class => "classes",
        ClassKind::Interface => "interfaces",
        ClassKind::Enum => "enums",
        ClassKind::Record => "records",
        ClassKind::Annotation => "annotations",
    };
    Predicate::new(format!("are {plural}"), move |class: &ClassDescriptor, _| {
        class.kind == kind
    })
}
