//! # classlint-core
//!
//! Core framework for architecture rules over a structural model of
//! compiled JVM code.
//!
//! This crate provides:
//!
//! - [`CodeModel`] and the descriptors it holds ([`ClassDescriptor`],
//!   [`FieldDescriptor`], [`MethodDescriptor`], [`Annotation`])
//! - [`PackagePattern`] for `..`-wildcard package matching
//! - [`Predicate`] and [`Condition`] values with readable descriptions,
//!   plus the [`predicates`] and [`conditions`] libraries
//! - [`AnnotationResolver`] for transitive meta-annotation lookup
//! - the fluent [`rule`] API and [`LayeredArchitecture`]
//! - [`RuleSet`] and [`Report`] for running rules and reporting violations
//!
//! ## Example
//!
//! ```
//! use classlint_core::rule::classes;
//! use classlint_core::{conditions, predicates, ClassDescriptor, ClassKind, CodeModel, RuleSet};
//!
//! # fn main() -> Result<(), classlint_core::DefinitionError> {
//! let model = CodeModel::builder()
//!     .class(ClassDescriptor::new("x.controller.OrderController", ClassKind::Class))
//!     .build();
//!
//! let rules = RuleSet::builder()
//!     .rule(
//!         classes()
//!             .that(predicates::resides_in_package("..controller")?)
//!             .should(conditions::have_field_named("PATH")),
//!     )
//!     .build();
//!
//! assert!(rules.check(&model).is_err());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
pub mod condition;
pub mod conditions;
mod config;
mod context;
pub mod declarative;
mod descriptor;
mod element;
mod error;
mod evaluator;
mod layered;
mod model;
mod package;
mod predicate;
pub mod predicates;
mod resolver;
pub mod rule;
mod types;

pub use analyzer::{RuleSet, RuleSetBuilder};
pub use condition::{have, not_have, Condition, ConditionEvents};
pub use config::{Config, ConfigError, EvaluationConfig, ImportConfig, RuleConfig};
pub use context::RuleContext;
pub use descriptor::{
    Annotation, AnnotationValue, ClassDescriptor, ClassKind, Dependency, DependencyKind,
    FieldDescriptor, MethodDescriptor, Modifiers, Parameter, TypeName, Visibility,
    CONSTRUCTOR_NAME,
};
pub use element::{Element, HasAnnotations, HasModifiers, HasName, HasOwner, HasType};
pub use error::{DefinitionError, EvaluationError};
pub use layered::{LayeredArchitecture, LayeredArchitectureBuilder};
pub use model::{CodeModel, CodeModelBuilder};
pub use package::{PackagePattern, PatternError};
pub use predicate::Predicate;
pub use resolver::AnnotationResolver;
pub use rule::{ElementRule, Evaluation, Rule, RuleBox, Selection};
pub use types::{
    AggregateFailure, ElementKind, ElementRef, Report, RuleOutcome, Severity, ViolationEvent,
};
