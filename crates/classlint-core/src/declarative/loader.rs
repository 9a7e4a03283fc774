//! DTO → Domain model conversion with validation.

use crate::package::PackagePattern;
use crate::types::Severity;

use super::config_dto::{AccessDto, DeclarativeConfigDto, LayerAccessDto, LayerDto, NamingDto};
use super::model::{
    parse_kind, AccessList, DeclarativeConfig, LayerAccess, LayerDef, LayerName, ModelError,
    NamePattern, NamingConvention,
};

/// Errors during DTO → Domain conversion.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// A field-level validation error.
    #[error("{context}: {source}")]
    Validation {
        /// Where the error occurred (e.g., "naming[2].pattern").
        context: String,
        /// The underlying model error.
        source: ModelError,
    },

    /// Unknown severity string.
    #[error("{context}: unknown severity `{value}`, expected: error, warning, info")]
    UnknownSeverity {
        /// Where the error occurred.
        context: String,
        /// The invalid value.
        value: String,
    },

    /// Cross-reference errors from aggregate root construction.
    #[error("configuration validation errors:\n{}", format_errors(.0))]
    CrossRef(Vec<ModelError>),
}

fn format_errors(errors: &[ModelError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn at(context: String) -> impl FnOnce(ModelError) -> LoadError {
    move |source| LoadError::Validation { context, source }
}

/// Converts a `DeclarativeConfigDto` to a validated `DeclarativeConfig`.
///
/// # Errors
///
/// Returns the first field-level error, or every cross-reference error.
pub fn load(dto: DeclarativeConfigDto) -> Result<DeclarativeConfig, LoadError> {
    let layers = dto
        .layers
        .iter()
        .enumerate()
        .map(|(i, l)| convert_layer(l, i))
        .collect::<Result<Vec<_>, _>>()?;

    let access = dto
        .layer_access
        .iter()
        .enumerate()
        .map(|(i, a)| convert_access(a, i))
        .collect::<Result<Vec<_>, _>>()?;

    let naming = dto
        .naming
        .into_iter()
        .enumerate()
        .map(|(i, n)| convert_naming(n, i))
        .collect::<Result<Vec<_>, _>>()?;

    DeclarativeConfig::new(layers, access, naming).map_err(LoadError::CrossRef)
}

fn convert_layer(dto: &LayerDto, index: usize) -> Result<LayerDef, LoadError> {
    let ctx = format!("layers[{index}]");
    let name = LayerName::new(&dto.name).map_err(at(format!("{ctx}.name")))?;
    if dto.packages.is_empty() {
        return Err(LoadError::Validation {
            context: format!("{ctx}.packages"),
            source: ModelError::NoPackages,
        });
    }
    let packages = dto
        .packages
        .iter()
        .enumerate()
        .map(|(j, p)| {
            PackagePattern::parse(p)
                .map_err(ModelError::from)
                .map_err(at(format!("{ctx}.packages[{j}]")))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(LayerDef { name, packages })
}

fn convert_access(dto: &LayerAccessDto, index: usize) -> Result<LayerAccess, LoadError> {
    let ctx = format!("layer-access[{index}]");
    let layer = LayerName::new(&dto.layer).map_err(at(format!("{ctx}.layer")))?;
    let accessed_by = dto
        .accessed_by
        .as_ref()
        .map(|a| convert_access_list(a, &format!("{ctx}.accessed-by")))
        .transpose()?;
    let may_access = dto
        .may_access
        .as_ref()
        .map(|a| convert_access_list(a, &format!("{ctx}.may-access")))
        .transpose()?;
    Ok(LayerAccess {
        layer,
        accessed_by,
        may_access,
    })
}

fn convert_access_list(dto: &AccessDto, ctx: &str) -> Result<AccessList, LoadError> {
    match dto {
        AccessDto::Keyword(word) if word == "none" => Ok(AccessList::Nothing),
        AccessDto::Keyword(word) => Err(LoadError::Validation {
            context: ctx.to_string(),
            source: ModelError::UnknownAccessKeyword {
                value: word.clone(),
            },
        }),
        AccessDto::Layers(names) => names
            .iter()
            .enumerate()
            .map(|(i, n)| LayerName::new(n).map_err(at(format!("{ctx}[{i}]"))))
            .collect::<Result<Vec<_>, _>>()
            .map(AccessList::Only),
    }
}

fn convert_naming(dto: NamingDto, index: usize) -> Result<NamingConvention, LoadError> {
    let ctx = format!("naming[{index}]");
    let package = PackagePattern::parse(&dto.package)
        .map_err(ModelError::from)
        .map_err(at(format!("{ctx}.package")))?;
    let pattern = NamePattern::new(&dto.pattern).map_err(at(format!("{ctx}.pattern")))?;
    let kind = dto
        .kind
        .as_deref()
        .map(parse_kind)
        .transpose()
        .map_err(at(format!("{ctx}.kind")))?;
    let severity = parse_severity(&dto.severity, &format!("naming '{}'", dto.name))?;

    Ok(NamingConvention {
        name: dto.name,
        package,
        pattern,
        kind,
        allow_empty: dto.allow_empty,
        severity,
    })
}

fn parse_severity(value: &str, context: &str) -> Result<Severity, LoadError> {
    value.parse().map_err(|_| LoadError::UnknownSeverity {
        context: context.to_string(),
        value: value.to_string(),
    })
}
