//! # classlint-rules
//!
//! Built-in architecture conventions for Spring-style layered JVM
//! applications.
//!
//! ## Available Rules
//!
//! | Family | Name | Description |
//! |--------|------|-------------|
//! | naming | `service-naming` | `..service` holds `*Service` interfaces |
//! | naming | `service-implementation-naming` | `..service.impl` holds `*ServiceImpl` classes implementing their interface |
//! | naming | `controller-naming` | `..controller` classes end in `Controller` |
//! | naming | `repository-naming` | `..repository` classes end in `Repository` |
//! | naming | `custom-repository-naming` | `..repository.custom` classes end in `RepositoryCustom` |
//! | naming | `enumeration-package` | `..enumeration` holds enums only |
//! | naming | `request-dto` / `response-dto` | DTOs are `*Rq` / `*Response` records |
//! | naming | `mapper-to-entity` / `mapper-to-response` / `mapper-request-parameter` | mapper method and parameter names |
//! | layering | `layers-top-to-bottom` | Controller -> Service -> Repository |
//! | spring | `validated-request-bodies` | constrained request DTOs are `@Valid @RequestBody` |
//! | spring | `exception-handlers` | every application exception has an `@ExceptionHandler` |
//! | spring | `service-annotation` / `controller-annotation` | stereotype annotations |
//! | spring | `entity-annotations` | `@Entity` with a named `@Table` |
//! | spring | `component-fields` | injected components are private final fields |
//! | structure | `controller-path` / `controller-path-constant` | `public static final String PATH` |
//! | structure | `utility-static-methods` / `utility-private-constructors` | utility classes |
//! | structure | `constant-classes` / `constant-fields` | constant holder classes |
//! | structure | `no-top-level-layer-packages` | layers live in feature packages |
//!
//! Two rules read options from their `[rules.<name>]` table in
//! `classlint.toml` (see [`ConventionOptions::from_config`]):
//! `exception-handlers` takes `base-exception`, and
//! `no-top-level-layer-packages` takes `packages`.
//!
//! ## Usage
//!
//! ```
//! use classlint_core::{CodeModel, RuleSet};
//! use classlint_rules::Preset;
//!
//! # fn main() -> Result<(), classlint_core::DefinitionError> {
//! let rules = RuleSet::builder()
//!     .rules(Preset::SpringLayered.rules("com.example.archunitrules")?)
//!     .build();
//! let report = rules.evaluate(&CodeModel::default());
//! assert!(!report.has_failures_at(classlint_core::Severity::Error));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod layering;
mod naming;
mod options;
mod presets;
mod spring;
mod structure;

pub use layering::{layered_architecture, LAYERS_TOP_TO_BOTTOM};
pub use naming::{
    dto_naming, implement_corresponding_service_interface, layer_suffixes, mapper_naming,
    naming_rules, service_naming, CONTROLLER_NAMING, CUSTOM_REPOSITORY_NAMING,
    ENUMERATION_PACKAGE, MAPPER_REQUEST_PARAMETER, MAPPER_TO_ENTITY, MAPPER_TO_RESPONSE,
    REPOSITORY_NAMING, REQUEST_DTO, RESPONSE_DTO, SERVICE_IMPLEMENTATION_NAMING, SERVICE_NAMING,
};
pub use options::{ConventionOptions, BASE_EXCEPTION_OPTION, LAYER_PACKAGES_OPTION};
pub use presets::{all_rules, all_rules_with, Preset, UnknownPreset};
pub use spring::{
    component_fields, entity_annotations, exception_handlers,
    have_corresponding_exception_handler, spring_rules, stereotype_annotations,
    validated_request_bodies, BASE_EXCEPTION, COMPONENT_FIELDS, CONTROLLER_ANNOTATION,
    ENTITY_ANNOTATIONS, EXCEPTION_HANDLERS, SERVICE_ANNOTATION, VALIDATED_REQUEST_BODIES,
};
pub use structure::{
    constant_classes, controller_path, no_top_level_layer_packages, structure_rules,
    utility_classes, CONSTANT_CLASSES, CONSTANT_FIELDS, CONTROLLER_PATH,
    CONTROLLER_PATH_CONSTANT, LAYER_PACKAGES, NO_TOP_LEVEL_LAYER_PACKAGES,
    UTILITY_PRIVATE_CONSTRUCTORS, UTILITY_STATIC_METHODS,
};

/// Re-export core types for convenience.
pub use classlint_core::{Rule, RuleBox, Severity};

/// Fully qualified names of the framework annotations the rules look for.
pub mod annotations {
    /// `@Component`, the root Spring stereotype.
    pub const COMPONENT: &str = "org.springframework.stereotype.Component";
    /// `@Controller`
    pub const CONTROLLER: &str = "org.springframework.stereotype.Controller";
    /// `@Service`
    pub const SERVICE: &str = "org.springframework.stereotype.Service";
    /// `@ControllerAdvice`
    pub const CONTROLLER_ADVICE: &str = "org.springframework.web.bind.annotation.ControllerAdvice";
    /// `@ExceptionHandler`
    pub const EXCEPTION_HANDLER: &str = "org.springframework.web.bind.annotation.ExceptionHandler";
    /// `@RequestBody`
    pub const REQUEST_BODY: &str = "org.springframework.web.bind.annotation.RequestBody";
    /// `@Valid`
    pub const VALID: &str = "jakarta.validation.Valid";
    /// `@Entity`
    pub const ENTITY: &str = "jakarta.persistence.Entity";
    /// `@Table`
    pub const TABLE: &str = "jakarta.persistence.Table";

    /// Packages whose annotations count as validation constraints.
    pub const VALIDATION_PACKAGES: &[&str] = &[
        "javax.validation.constraints",
        "jakarta.validation.constraints",
        "org.hibernate.validator.constraints",
    ];
}
