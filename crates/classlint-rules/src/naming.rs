//! Naming conventions for layer packages and mapper methods.

use crate::annotations::ENTITY;
use classlint_core::predicates::{
    has_name, has_name_matching, has_parameter_that, has_raw_return_type, has_raw_type,
    is_annotated_with, is_declared_in_class_that, is_enum, is_interface, is_record,
    resides_in_package,
};
use classlint_core::rule::{classes, methods};
use classlint_core::{
    conditions, have, not_have, ClassDescriptor, CodeModel, Condition, ConditionEvents,
    DefinitionError, MethodDescriptor, Predicate, RuleBox,
};

/// `service-naming`
pub const SERVICE_NAMING: &str = "service-naming";
/// `service-implementation-naming`
pub const SERVICE_IMPLEMENTATION_NAMING: &str = "service-implementation-naming";
/// `controller-naming`
pub const CONTROLLER_NAMING: &str = "controller-naming";
/// `repository-naming`
pub const REPOSITORY_NAMING: &str = "repository-naming";
/// `custom-repository-naming`
pub const CUSTOM_REPOSITORY_NAMING: &str = "custom-repository-naming";
/// `enumeration-package`
pub const ENUMERATION_PACKAGE: &str = "enumeration-package";
/// `request-dto`
pub const REQUEST_DTO: &str = "request-dto";
/// `response-dto`
pub const RESPONSE_DTO: &str = "response-dto";
/// `mapper-to-entity`
pub const MAPPER_TO_ENTITY: &str = "mapper-to-entity";
/// `mapper-request-parameter`
pub const MAPPER_REQUEST_PARAMETER: &str = "mapper-request-parameter";
/// `mapper-to-response`
pub const MAPPER_TO_RESPONSE: &str = "mapper-to-response";

const LOMBOK_GENERATED: &str = "lombok.Generated";

/// Every naming rule, in catalog order.
///
/// # Errors
///
/// Never fails for the built-in patterns; the error type is shared with
/// user-parameterized families.
pub fn naming_rules() -> Result<Vec<RuleBox>, DefinitionError> {
    let mut rules = service_naming()?;
    rules.extend(layer_suffixes()?);
    rules.extend(dto_naming()?);
    rules.extend(mapper_naming()?);
    Ok(rules)
}

/// Service interfaces end in `Service`; implementations end in
/// `ServiceImpl` and implement their interface.
///
/// # Errors
///
/// See [`naming_rules`].
pub fn service_naming() -> Result<Vec<RuleBox>, DefinitionError> {
    let interfaces = classes()
        .that(resides_in_package("..service")?)
        .should_be(has_name_matching(".+Service")?)
        .and_should(have(is_interface()))
        .allow_empty_should(true)
        .named(SERVICE_NAMING);

    let implementations = classes()
        .that(resides_in_package("..service.impl")?)
        .should_be(has_name_matching(".+ServiceImpl")?)
        .and_should(not_have(is_interface()))
        .and_should(implement_corresponding_service_interface())
        .allow_empty_should(true)
        .named(SERVICE_IMPLEMENTATION_NAMING);

    let rules: Vec<RuleBox> = vec![Box::new(interfaces), Box::new(implementations)];
    Ok(rules)
}

/// `FooServiceImpl` must implement an interface named `Foo...Service`.
#[must_use]
pub fn implement_corresponding_service_interface() -> Condition<ClassDescriptor> {
    Condition::new(
        "implement the corresponding service interface",
        |class: &ClassDescriptor, _: &CodeModel, events: &mut ConditionEvents| {
            let simple = class.simple_name();
            let base = simple
                .rfind("ServiceImpl")
                .map_or(simple, |end| &simple[..end]);
            let found = class.interfaces.iter().any(|interface| {
                let name = interface.simple_name();
                name.starts_with(base) && name.ends_with("Service")
            });
            if !found {
                events.violated(
                    class,
                    format!("No corresponding service interface found for {simple}"),
                );
            }
        },
    )
}

/// Controllers, repositories and custom repositories carry their layer
/// suffix; the enumeration package holds enums only.
///
/// # Errors
///
/// See [`naming_rules`].
pub fn layer_suffixes() -> Result<Vec<RuleBox>, DefinitionError> {
    let suffix = |package: &str, pattern: &str, name: &str| -> Result<RuleBox, DefinitionError> {
        Ok(Box::new(
            classes()
                .that(resides_in_package(package)?)
                .should_be(has_name_matching(pattern)?)
                .allow_empty_should(true)
                .named(name),
        ))
    };

    Ok(vec![
        suffix("..controller", ".+Controller", CONTROLLER_NAMING)?,
        suffix("..repository", ".+Repository", REPOSITORY_NAMING)?,
        suffix(
            "..repository.custom",
            ".+RepositoryCustom",
            CUSTOM_REPOSITORY_NAMING,
        )?,
        Box::new(
            classes()
                .that(resides_in_package("..enumeration")?)
                .should_be(is_enum())
                .allow_empty_should(true)
                .named(ENUMERATION_PACKAGE),
        ),
    ])
}

/// Request DTOs are `*Rq` records, response DTOs are `*Response` records.
///
/// Lombok-generated classes are exempt from the response rule.
///
/// # Errors
///
/// See [`naming_rules`].
pub fn dto_naming() -> Result<Vec<RuleBox>, DefinitionError> {
    let requests = classes()
        .that(resides_in_package("..controller.request")?)
        .should_be(is_record())
        .and_should(have(has_name_matching(".+Rq")?))
        .allow_empty_should(true)
        .named(REQUEST_DTO);

    let responses = classes()
        .that(resides_in_package("..controller.response")?)
        .and_that(is_annotated_with(LOMBOK_GENERATED).negate())
        .should_be(is_record())
        .and_should(have(has_name_matching(".+Response")?))
        .allow_empty_should(true)
        .named(RESPONSE_DTO);

    let rules: Vec<RuleBox> = vec![Box::new(requests), Box::new(responses)];
    Ok(rules)
}

/// Mapper methods: `toEntity` returns an entity, `toResponse` returns a
/// response DTO, and request DTO parameters are named `request`.
///
/// # Errors
///
/// See [`naming_rules`].
pub fn mapper_naming() -> Result<Vec<RuleBox>, DefinitionError> {
    let in_mapper = || -> Result<Predicate<MethodDescriptor>, DefinitionError> {
        Ok(is_declared_in_class_that(resides_in_package("..mapper")?))
    };

    let to_entity = methods()
        .that(in_mapper()?)
        .and_that(has_raw_return_type(is_annotated_with(ENTITY)))
        .should_be(has_name("toEntity"))
        .allow_empty_should(true)
        .named(MAPPER_TO_ENTITY);

    let request_parameter = methods()
        .that(in_mapper()?)
        .and_that(has_parameter_that(has_raw_type(resides_in_package(
            "..controller.request",
        )?)))
        .should(conditions::have_parameter_named("request"))
        .allow_empty_should(true)
        .named(MAPPER_REQUEST_PARAMETER);

    let to_response = methods()
        .that(in_mapper()?)
        .and_that(has_raw_return_type(resides_in_package(
            "..controller.response",
        )?))
        .should_be(has_name("toResponse"))
        .allow_empty_should(true)
        .named(MAPPER_TO_RESPONSE);

    let rules: Vec<RuleBox> = vec![
        Box::new(to_entity),
        Box::new(request_parameter),
        Box::new(to_response),
    ];
    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use classlint_core::{ClassKind, Rule, RuleContext};

    fn violations(rules: &[RuleBox], model: &CodeModel) -> Vec<String> {
        let ctx = RuleContext::new(model);
        rules
            .iter()
            .flat_map(|rule| rule.evaluate(&ctx).violations)
            .map(|v| v.message)
            .collect()
    }

    #[test]
    fn implementation_without_interface_is_reported() {
        let model = CodeModel::builder()
            .class(ClassDescriptor::new("app.service.impl.ArticleServiceImpl", ClassKind::Class))
            .build();
        let Ok(rules) = service_naming() else {
            panic!("built-in patterns compile");
        };

        let messages = violations(&rules, &model);
        assert_eq!(
            messages,
            vec!["No corresponding service interface found for ArticleServiceImpl".to_string()]
        );
    }

    #[test]
    fn implementation_with_prefixed_interface_passes() {
        let model = CodeModel::builder()
            .class(ClassDescriptor::new("app.service.ArticleService", ClassKind::Interface))
            .class(
                ClassDescriptor::new("app.service.impl.ArticleServiceImpl", ClassKind::Class)
                    .implements("app.service.ArticleService"),
            )
            .build();
        let Ok(rules) = service_naming() else {
            panic!("built-in patterns compile");
        };

        assert!(violations(&rules, &model).is_empty());
    }

    #[test]
    fn enumeration_package_rejects_classes() {
        let model = CodeModel::builder()
            .class(ClassDescriptor::new("app.enumeration.Status", ClassKind::Enum))
            .class(ClassDescriptor::new("app.enumeration.StatusHelper", ClassKind::Class))
            .build();
        let Ok(rules) = layer_suffixes() else {
            panic!("built-in patterns compile");
        };

        let ctx = RuleContext::new(&model);
        let Some(rule) = rules.iter().find(|r| r.name() == ENUMERATION_PACKAGE) else {
            panic!("enumeration rule is part of the family");
        };
        let evaluation = rule.evaluate(&ctx);
        assert_eq!(evaluation.selected, 2);
        assert_eq!(evaluation.violations.len(), 1);
        assert_eq!(evaluation.violations[0].element.name, "app.enumeration.StatusHelper");
    }

    #[test]
    fn every_family_is_empty_tolerant() {
        let Ok(rules) = naming_rules() else {
            panic!("built-in patterns compile");
        };
        assert_eq!(rules.len(), 11);
        assert!(violations(&rules, &CodeModel::default()).is_empty());
    }
}
