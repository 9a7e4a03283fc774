//! Structural conventions: controller paths, utility and constant classes,
//! package placement.

use classlint_core::predicates::{
    has_name, has_name_matching, has_raw_type_named, is_constructor, is_declared_in_class_that,
    is_final, is_public, is_static, resides_in_any_package, resides_in_package,
};
use classlint_core::rule::{classes, fields, methods, no_classes};
use classlint_core::{conditions, have, DefinitionError, RuleBox};
use crate::ConventionOptions;

/// `controller-path`
pub const CONTROLLER_PATH: &str = "controller-path";
/// `controller-path-constant`
pub const CONTROLLER_PATH_CONSTANT: &str = "controller-path-constant";
/// `utility-static-methods`
pub const UTILITY_STATIC_METHODS: &str = "utility-static-methods";
/// `utility-private-constructors`
pub const UTILITY_PRIVATE_CONSTRUCTORS: &str = "utility-private-constructors";
/// `constant-classes`
pub const CONSTANT_CLASSES: &str = "constant-classes";
/// `constant-fields`
pub const CONSTANT_FIELDS: &str = "constant-fields";
/// `no-top-level-layer-packages`
pub const NO_TOP_LEVEL_LAYER_PACKAGES: &str = "no-top-level-layer-packages";

/// Layer package names that must not sit directly below the base package.
pub const LAYER_PACKAGES: &[&str] = &[
    "entity",
    "repository",
    "service",
    "mapper",
    "dto",
    "controller",
    "constant",
    "enumeration",
    "exception",
    "handler",
];

/// Upper snake case without leading or trailing underscores.
const CONSTANT_NAME: &str = "[A-Z](?:[A-Z_]*[A-Z])?";

/// Every structural rule.
///
/// # Errors
///
/// Returns [`DefinitionError`] if the base package or a layer package
/// yields an invalid pattern.
pub fn structure_rules(options: &ConventionOptions) -> Result<Vec<RuleBox>, DefinitionError> {
    let mut rules = controller_path()?;
    rules.extend(utility_classes()?);
    rules.extend(constant_classes()?);
    rules.push(no_top_level_layer_packages(
        &options.base_package,
        &options.layer_packages,
    )?);
    Ok(rules)
}

/// Controllers declare `public static final String PATH`.
///
/// # Errors
///
/// Never fails for the built-in patterns.
pub fn controller_path() -> Result<Vec<RuleBox>, DefinitionError> {
    let declares = classes()
        .that(resides_in_package("..controller")?)
        .should(conditions::have_field_named("PATH"))
        .allow_empty_should(true)
        .named(CONTROLLER_PATH);

    let constant = fields()
        .that(is_declared_in_class_that(resides_in_package("..controller")?))
        .and_that(has_name("PATH"))
        .should_be(is_public())
        .and_should(have(is_static()))
        .and_should(have(is_final()))
        .and_should(have(has_raw_type_named("java.lang.String")))
        .allow_empty_should(true)
        .named(CONTROLLER_PATH_CONSTANT);

    let rules: Vec<RuleBox> = vec![Box::new(declares), Box::new(constant)];
    Ok(rules)
}

/// Classes in `util` packages expose static methods and hide their
/// constructors.
///
/// # Errors
///
/// Never fails for the built-in patterns.
pub fn utility_classes() -> Result<Vec<RuleBox>, DefinitionError> {
    let static_methods = methods()
        .that(is_declared_in_class_that(resides_in_package("..util")?))
        .and_that(is_constructor().negate())
        .should_be(is_static())
        .allow_empty_should(true)
        .named(UTILITY_STATIC_METHODS);

    let private_constructors = classes()
        .that(resides_in_package("..util")?)
        .should(conditions::have_only_private_constructors())
        .allow_empty_should(true)
        .named(UTILITY_PRIVATE_CONSTRUCTORS);

    let rules: Vec<RuleBox> = vec![Box::new(static_methods), Box::new(private_constructors)];
    Ok(rules)
}

/// Classes in `constant` packages only hold `public static final`
/// upper-case constants.
///
/// # Errors
///
/// Never fails for the built-in patterns.
pub fn constant_classes() -> Result<Vec<RuleBox>, DefinitionError> {
    let holders = classes()
        .that(resides_in_package("..constant")?)
        .should(conditions::have_only_private_constructors())
        .and_should(conditions::have_no_methods_except_constructors())
        .allow_empty_should(true)
        .named(CONSTANT_CLASSES);

    let constants = fields()
        .that(is_declared_in_class_that(resides_in_package("..constant")?))
        .should_be(is_public())
        .and_should(have(is_static()))
        .and_should(have(is_final()))
        .and_should(have(has_name_matching(CONSTANT_NAME)?))
        .allow_empty_should(true)
        .named(CONSTANT_FIELDS);

    let rules: Vec<RuleBox> = vec![Box::new(holders), Box::new(constants)];
    Ok(rules)
}

/// No class sits in one of `layer_packages` directly below
/// `base_package`; layers live inside feature packages.
///
/// # Errors
///
/// Returns [`DefinitionError::Pattern`] if `base_package` or a layer
/// package is not a valid package name.
pub fn no_top_level_layer_packages<S: AsRef<str>>(
    base_package: &str,
    layer_packages: &[S],
) -> Result<RuleBox, DefinitionError> {
    let packages: Vec<String> = layer_packages
        .iter()
        .map(|layer| format!("{base_package}.{}", layer.as_ref()))
        .collect();
    Ok(Box::new(
        no_classes()
            .should_be(resides_in_any_package(&packages)?)
            .allow_empty_should(true)
            .named(NO_TOP_LEVEL_LAYER_PACKAGES),
    ))
}
