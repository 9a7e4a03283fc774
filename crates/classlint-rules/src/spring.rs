//! Spring stereotype, validation and persistence conventions.

use crate::annotations::{
    COMPONENT, CONTROLLER, CONTROLLER_ADVICE, ENTITY, EXCEPTION_HANDLER, REQUEST_BODY, SERVICE,
    TABLE, VALID, VALIDATION_PACKAGES,
};
use classlint_core::predicates::{
    annotation_in_any_package, contains_any_field_that, has_raw_type, is_annotated_with,
    is_annotated_with_that, is_child_of, is_declared_in_class_that, is_final,
    is_meta_annotated_with, is_private, property_equals_or_contains, resides_in_package,
};
use classlint_core::rule::{classes, fields};
use classlint_core::{
    have, AnnotationResolver, AnnotationValue, ClassDescriptor, CodeModel, Condition,
    ConditionEvents, DefinitionError, FieldDescriptor, MethodDescriptor, PackagePattern, Predicate,
    RuleBox,
};
use crate::ConventionOptions;
use std::collections::HashSet;

/// `validated-request-bodies`
pub const VALIDATED_REQUEST_BODIES: &str = "validated-request-bodies";
/// `exception-handlers`
pub const EXCEPTION_HANDLERS: &str = "exception-handlers";
/// `service-annotation`
pub const SERVICE_ANNOTATION: &str = "service-annotation";
/// `controller-annotation`
pub const CONTROLLER_ANNOTATION: &str = "controller-annotation";
/// `entity-annotations`
pub const ENTITY_ANNOTATIONS: &str = "entity-annotations";
/// `component-fields`
pub const COMPONENT_FIELDS: &str = "component-fields";

const HANDLER_PACKAGE: &str = "..handler";
const LOMBOK_GENERATED: &str = "lombok.Generated";

/// Simple name of the base exception whose children need handlers.
pub const BASE_EXCEPTION: &str = "BaseParametrizedException";

/// Every Spring convention rule.
///
/// # Errors
///
/// Never fails for the built-in patterns.
pub fn spring_rules(options: &ConventionOptions) -> Result<Vec<RuleBox>, DefinitionError> {
    let mut rules = vec![
        validated_request_bodies()?,
        exception_handlers(&options.base_exception)?,
    ];
    rules.extend(stereotype_annotations()?);
    rules.push(entity_annotations()?);
    rules.push(component_fields());
    Ok(rules)
}

/// Request DTOs with validation constraints are taken as `@Valid
/// @RequestBody` parameters by the controllers of the parent package.
///
/// # Errors
///
/// Never fails for the built-in patterns.
pub fn validated_request_bodies() -> Result<RuleBox, DefinitionError> {
    let constrained: Predicate<FieldDescriptor> =
        is_annotated_with_that(annotation_in_any_package(VALIDATION_PACKAGES))
            .describe_as("are annotated with any validation annotation");
    Ok(Box::new(
        classes()
            .that(resides_in_package("..controller.request")?)
            .and_that(contains_any_field_that(constrained))
            .should(be_validated_request_body())
            .allow_empty_should(true)
            .named(VALIDATED_REQUEST_BODIES),
    ))
}

fn be_validated_request_body() -> Condition<ClassDescriptor> {
    Condition::new(
        "be validated request bodies in the corresponding controller",
        |class: &ClassDescriptor, model: &CodeModel, events: &mut ConditionEvents| {
            let package = class.package_name();
            let controller_package = package.rfind('.').map_or("", |end| &package[..end]);
            let resolver = AnnotationResolver::new(model);

            let controllers = model
                .in_package(controller_package)
                .filter(|c| resolver.is_meta_annotated_with(&c.annotations, CONTROLLER));
            for controller in controllers {
                for method in &controller.methods {
                    let taking_class = method.parameters.iter().filter(|p| p.param_type == class.name);
                    for parameter in taking_class {
                        let annotated = |name: &str| {
                            parameter
                                .annotations
                                .iter()
                                .any(|a| a.type_name.as_str() == name)
                        };
                        if !(annotated(REQUEST_BODY) && annotated(VALID)) {
                            events.violated(
                                class,
                                format!(
                                    "parameter '{}' of {} is not a @Valid @RequestBody",
                                    parameter.name,
                                    method.full_name()
                                ),
                            );
                        }
                    }
                }
            }
        },
    )
}

/// Every direct child of `base_exception` (fully qualified) in an
/// `exception` package is named by an `@ExceptionHandler` of a
/// `@ControllerAdvice` in a `handler` package.
///
/// # Errors
///
/// Returns [`DefinitionError`] if the handler package pattern is invalid.
pub fn exception_handlers(base_exception: &str) -> Result<RuleBox, DefinitionError> {
    Ok(Box::new(
        classes()
            .that(resides_in_package("..exception")?)
            .and_that(is_child_of(base_exception))
            .should(have_corresponding_exception_handler(HANDLER_PACKAGE)?)
            .allow_empty_should(true)
            .named(EXCEPTION_HANDLERS),
    ))
}

/// Some `@ControllerAdvice` in `handler_package` declares an
/// `@ExceptionHandler` whose `value` names the class.
///
/// Handler methods inherited from superclasses count.
///
/// # Errors
///
/// Returns [`DefinitionError::Pattern`] for an invalid package pattern.
pub fn have_corresponding_exception_handler(
    handler_package: &str,
) -> Result<Condition<ClassDescriptor>, DefinitionError> {
    let pattern = PackagePattern::parse(handler_package)?;
    let description = format!("have a corresponding exception handler in {handler_package}");
    Ok(Condition::new(
        description,
        move |class: &ClassDescriptor, model: &CodeModel, events: &mut ConditionEvents| {
            let names_class =
                property_equals_or_contains("value", AnnotationValue::Class(class.name.clone()));
            let resolver = AnnotationResolver::new(model);
            let advices = model
                .classes()
                .iter()
                .filter(|c| pattern.matches(c.package_name()))
                .filter(|c| resolver.is_meta_annotated_with(&c.annotations, CONTROLLER_ADVICE));

            for advice in advices {
                for method in all_methods(advice, model) {
                    for handler in method
                        .annotations
                        .iter()
                        .filter(|a| a.type_name.as_str() == EXCEPTION_HANDLER)
                    {
                        match names_class.test(handler, model) {
                            Ok(true) => return,
                            Ok(false) => {}
                            Err(e) => events.fault(class, e.to_string()),
                        }
                    }
                }
            }
            events.violated(
                class,
                format!(
                    "exception has no corresponding exception handler in {}",
                    pattern.as_str()
                ),
            );
        },
    ))
}

/// Declared and inherited methods, walking superclasses through the model.
fn all_methods<'m>(class: &'m ClassDescriptor, model: &'m CodeModel) -> Vec<&'m MethodDescriptor> {
    let mut methods = Vec::new();
    let mut seen = HashSet::new();
    let mut current = Some(class);
    while let Some(c) = current {
        if !seen.insert(&c.name) {
            break;
        }
        methods.extend(c.methods.iter());
        current = model.superclass_of(c);
    }
    methods
}

/// `@Service` on service implementations and (meta-)`@Controller` on
/// controllers.
///
/// # Errors
///
/// Never fails for the built-in patterns.
pub fn stereotype_annotations() -> Result<Vec<RuleBox>, DefinitionError> {
    let services = classes()
        .that(resides_in_package("..service.impl")?)
        .should_be(is_annotated_with(SERVICE))
        .allow_empty_should(true)
        .named(SERVICE_ANNOTATION);

    let controllers = classes()
        .that(resides_in_package("..controller")?)
        .should_be(is_meta_annotated_with(CONTROLLER))
        .allow_empty_should(true)
        .named(CONTROLLER_ANNOTATION);

    let rules: Vec<RuleBox> = vec![Box::new(services), Box::new(controllers)];
    Ok(rules)
}

/// Entities carry `@Entity` and a `@Table` with a non-blank name.
///
/// # Errors
///
/// Never fails for the built-in patterns.
pub fn entity_annotations() -> Result<RuleBox, DefinitionError> {
    Ok(Box::new(
        classes()
            .that(resides_in_package("..entity")?)
            .and_that(is_annotated_with(LOMBOK_GENERATED).negate())
            .should_be(is_annotated_with(ENTITY))
            .and_should(have_named_table())
            .allow_empty_should(true)
            .named(ENTITY_ANNOTATIONS),
    ))
}

fn have_named_table() -> Condition<ClassDescriptor> {
    Condition::new(
        "be annotated with a named @Table",
        |class: &ClassDescriptor, _: &CodeModel, events: &mut ConditionEvents| {
            let named = class
                .annotations
                .iter()
                .filter(|a| a.type_name.as_str() == TABLE)
                .filter_map(|a| a.property("name").and_then(AnnotationValue::as_str))
                .any(|name| !name.trim().is_empty());
            if !named {
                events.violated(class, "entity has no named @Table annotation");
            }
        },
    )
}

/// Component-typed fields of components are private and final
/// (constructor injection).
#[must_use]
pub fn component_fields() -> RuleBox {
    Box::new(
        fields()
            .that(is_declared_in_class_that(is_meta_annotated_with(COMPONENT)))
            .and_that(has_raw_type(is_meta_annotated_with(COMPONENT)))
            .should_be(is_private())
            .and_should(have(is_final()))
            .allow_empty_should(true)
            .named(COMPONENT_FIELDS),
    )
}
