use crate::descriptor::{ClassDescriptor, ClassKind, FieldDescriptor, TypeName};
use crate::error::DefinitionError;
use crate::model::CodeModel;
use crate::package::{self, PackagePattern};
use crate::predicate::Predicate;
use std::collections::HashSet;

/// Package matches the pattern.
///
/// # Errors
///
/// Returns [`DefinitionError::Pattern`] for an invalid pattern.
pub fn resides_in_package(pattern: &str) -> Result<Predicate<ClassDescriptor>, DefinitionError> {
    let compiled = PackagePattern::parse(pattern)?;
    Ok(Predicate::new(
        format!("reside in a package '{pattern}'"),
        move |class: &ClassDescriptor, _| compiled.matches(class.package_name()),
    ))
}

/// Package matches at least one of the patterns.
///
/// # Errors
///
/// Returns [`DefinitionError::Pattern`] for the first invalid pattern.
pub fn resides_in_any_package<S: AsRef<str>>(
    patterns: &[S],
) -> Result<Predicate<ClassDescriptor>, DefinitionError> {
    let compiled = package::parse_all(patterns)?;
    let listed: Vec<String> = patterns.iter().map(|p| format!("'{}'", p.as_ref())).collect();
    Ok(Predicate::new(
        format!("reside in any package [{}]", listed.join(", ")),
        move |class: &ClassDescriptor, _| package::matches_any(&compiled, class.package_name()),
    ))
}

fn kind_predicate(kind: ClassKind, description: &str) -> Predicate<ClassDescriptor> {
    Predicate::new(description, move |class: &ClassDescriptor, _| {
        class.kind == kind
    })
}

/// Interfaces, excluding annotation types.
#[must_use]
pub fn is_interface() -> Predicate<ClassDescriptor> {
    kind_predicate(ClassKind::Interface, "are interfaces")
}

/// Records.
#[must_use]
pub fn is_record() -> Predicate<ClassDescriptor> {
    kind_predicate(ClassKind::Record, "are records")
}

/// Enums.
#[must_use]
pub fn is_enum() -> Predicate<ClassDescriptor> {
    kind_predicate(ClassKind::Enum, "are enums")
}

/// Annotation types.
#[must_use]
pub fn is_annotation() -> Predicate<ClassDescriptor> {
    kind_predicate(ClassKind::Annotation, "are annotation types")
}

/// Direct superclass is `superclass`.
pub fn is_child_of(superclass: impl Into<TypeName>) -> Predicate<ClassDescriptor> {
    let superclass = superclass.into();
    Predicate::new(
        format!("are children of {}", superclass.simple_name()),
        move |class: &ClassDescriptor, _| class.superclass.as_ref() == Some(&superclass),
    )
}

/// Directly implements `interface`.
pub fn implements(interface: impl Into<TypeName>) -> Predicate<ClassDescriptor> {
    let interface = interface.into();
    Predicate::new(
        format!("implement {interface}"),
        move |class: &ClassDescriptor, _| class.interfaces.contains(&interface),
    )
}

/// Is, extends or implements `target`, following supertypes through the model.
pub fn is_assignable_to(target: impl Into<TypeName>) -> Predicate<ClassDescriptor> {
    let target = target.into();
    Predicate::new(
        format!("are assignable to {target}"),
        move |class: &ClassDescriptor, model| supertypes_contain(class, &target, model),
    )
}

fn supertypes_contain(class: &ClassDescriptor, target: &TypeName, model: &CodeModel) -> bool {
    let mut visited: HashSet<TypeName> = HashSet::new();
    let mut pending: Vec<TypeName> = vec![class.name.clone()];

    while let Some(current) = pending.pop() {
        if &current == target {
            return true;
        }
        if !visited.insert(current.clone()) {
            continue;
        }
        let declaration = if current == class.name {
            Some(class)
        } else {
            model.resolve(current.as_str())
        };
        if let Some(declaration) = declaration {
            pending.extend(declaration.superclass.iter().cloned());
            pending.extend(declaration.interfaces.iter().cloned());
        }
    }
    false
}

/// Declares at least one field matching the predicate.
pub fn contains_any_field_that(
    field: Predicate<FieldDescriptor>,
) -> Predicate<ClassDescriptor> {
    Predicate::try_new(
        format!("contain any fields that {}", field.description()),
        move |class: &ClassDescriptor, model| {
            for f in &class.fields {
                if field.test(f, model)? {
                    return Ok(true);
                }
            }
            Ok(false)
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Annotation;
    use crate::predicates::annotation_in_any_package;
    use crate::predicates::is_annotated_with_that;

    fn model() -> CodeModel {
        CodeModel::builder()
            .class(
                ClassDescriptor::new("x.exception.NotFoundException", ClassKind::Class)
                    .extends("x.common.BaseParametrizedException"),
            )
            .class(
                ClassDescriptor::new("x.common.BaseParametrizedException", ClassKind::Class)
                    .extends("java.lang.RuntimeException"),
            )
            .class(
                ClassDescriptor::new("x.controller.request.ArticleRq", ClassKind::Record)
                    .with_field(
                        FieldDescriptor::new("title", "java.lang.String")
                            .annotated(Annotation::new("jakarta.validation.constraints.NotBlank")),
                    ),
            )
            .build()
    }

    fn class<'m>(model: &'m CodeModel, name: &str) -> &'m ClassDescriptor {
        match model.get(name) {
            Some(c) => c,
            None => panic!("{name} missing"),
        }
    }

    #[test]
    fn package_predicates() {
        let model = model();
        let rq = class(&model, "x.controller.request.ArticleRq");
        let Ok(p) = resides_in_package("..controller.request") else {
            panic!("valid pattern rejected");
        };
        assert_eq!(p.test(rq, &model), Ok(true));
        let Ok(p) = resides_in_any_package(&["..service", "..controller"]) else {
            panic!("valid pattern rejected");
        };
        assert_eq!(p.test(rq, &model), Ok(false));
        assert_eq!(
            p.description(),
            "reside in any package ['..service', '..controller']"
        );
    }

    #[test]
    fn child_of_is_direct_but_assignable_is_transitive() {
        let model = model();
        let ex = class(&model, "x.exception.NotFoundException");
        assert_eq!(is_child_of("x.common.BaseParametrizedException").test(ex, &model), Ok(true));
        assert_eq!(is_child_of("java.lang.RuntimeException").test(ex, &model), Ok(false));
        assert_eq!(is_assignable_to("java.lang.RuntimeException").test(ex, &model), Ok(true));
        assert_eq!(is_assignable_to("java.lang.Error").test(ex, &model), Ok(false));
    }

    #[test]
    fn field_containment_uses_annotation_packages() {
        let model = model();
        let rq = class(&model, "x.controller.request.ArticleRq");
        let validated = is_annotated_with_that(annotation_in_any_package(&[
            "javax.validation.constraints",
            "jakarta.validation.constraints",
        ]));
        assert_eq!(contains_any_field_that(validated).test(rq, &model), Ok(true));
        assert_eq!(is_record().test(rq, &model), Ok(true));
        assert_eq!(is_interface().test(rq, &model), Ok(false));
    }
}
