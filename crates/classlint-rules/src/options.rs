//! Application-specific inputs of the built-in conventions.

use crate::spring::{BASE_EXCEPTION, EXCEPTION_HANDLERS};
use crate::structure::{LAYER_PACKAGES, NO_TOP_LEVEL_LAYER_PACKAGES};
use classlint_core::Config;

/// `[rules.exception-handlers]` key naming the base exception class.
pub const BASE_EXCEPTION_OPTION: &str = "base-exception";
/// `[rules.no-top-level-layer-packages]` key listing the layer packages.
pub const LAYER_PACKAGES_OPTION: &str = "packages";

/// What the built-in conventions need to know about the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConventionOptions {
    /// Root package of the application.
    pub base_package: String,
    /// Fully qualified exception whose subclasses need a handler.
    pub base_exception: String,
    /// Layer package names that must not sit directly below the base package.
    pub layer_packages: Vec<String>,
}

impl ConventionOptions {
    /// Defaults for an application rooted at `base_package`: the base
    /// exception is `<base>.common.exception.BaseParametrizedException`.
    #[must_use]
    pub fn new(base_package: impl Into<String>) -> Self {
        let base_package = base_package.into();
        Self {
            base_exception: format!("{base_package}.common.exception.{BASE_EXCEPTION}"),
            layer_packages: LAYER_PACKAGES.iter().map(|p| (*p).to_string()).collect(),
            base_package,
        }
    }

    /// Defaults overridden by the `[rules.*]` tables of `config`.
    #[must_use]
    pub fn from_config(base_package: impl Into<String>, config: &Config) -> Self {
        let mut options = Self::new(base_package);
        if let Some(exception) = config
            .rule(EXCEPTION_HANDLERS)
            .and_then(|rule| rule.string(BASE_EXCEPTION_OPTION))
        {
            options.base_exception = exception.to_string();
        }
        if let Some(packages) = config
            .rule(NO_TOP_LEVEL_LAYER_PACKAGES)
            .and_then(|rule| rule.strings(LAYER_PACKAGES_OPTION))
        {
            options.layer_packages = packages.into_iter().map(String::from).collect();
        }
        options
    }
}
