//! Ready-made predicates.
//!
//! Name and modifier predicates live here and work on any element with the
//! matching capability trait; class-, member- and annotation-specific ones
//! live in the submodules.

mod annotations;
mod classes;
mod members;

pub use annotations::{
    annotation_in_any_package, annotation_of_type, is_annotated_with, is_annotated_with_that,
    is_meta_annotated_with, property_equals_or_contains, property_satisfies,
};
pub use classes::{
    contains_any_field_that, implements, is_annotation, is_assignable_to, is_child_of, is_enum,
    is_interface, is_record, resides_in_any_package, resides_in_package,
};
pub use members::{
    has_parameter_that, has_raw_return_type, has_raw_type, has_raw_type_named,
    is_constructor, is_declared_in_class_that,
};

use crate::element::{HasModifiers, HasName};
use crate::error::DefinitionError;
use crate::predicate::Predicate;
use crate::descriptor::Visibility;
use regex::Regex;

/// Compiles a regex that must match the whole input.
pub(crate) fn full_match(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{pattern})$"))
}

/// Name equals `name` (fully qualified for classes).
pub fn has_name<T: HasName + 'static>(name: impl Into<String>) -> Predicate<T> {
    let name = name.into();
    Predicate::new(format!("have name '{name}'"), move |item: &T, _| {
        item.name() == name
    })
}

/// Whole name matches the regular expression (fully qualified for classes).
///
/// # Errors
///
/// Returns [`DefinitionError::Regex`] for an invalid expression.
pub fn has_name_matching<T: HasName + 'static>(
    pattern: &str,
) -> Result<Predicate<T>, DefinitionError> {
    let regex = full_match(pattern)?;
    Ok(Predicate::new(
        format!("have name matching '{pattern}'"),
        move |item: &T, _| regex.is_match(item.name()),
    ))
}

/// Simple name equals `name`.
pub fn has_simple_name<T: HasName + 'static>(name: impl Into<String>) -> Predicate<T> {
    let name = name.into();
    Predicate::new(format!("have simple name '{name}'"), move |item: &T, _| {
        item.simple_name() == name
    })
}

/// Simple name ends with `suffix`.
pub fn has_simple_name_ending_with<T: HasName + 'static>(
    suffix: impl Into<String>,
) -> Predicate<T> {
    let suffix = suffix.into();
    Predicate::new(
        format!("have simple name ending with '{suffix}'"),
        move |item: &T, _| item.simple_name().ends_with(suffix.as_str()),
    )
}

/// Simple name starts with `prefix`.
pub fn has_simple_name_starting_with<T: HasName + 'static>(
    prefix: impl Into<String>,
) -> Predicate<T> {
    let prefix = prefix.into();
    Predicate::new(
        format!("have simple name starting with '{prefix}'"),
        move |item: &T, _| item.simple_name().starts_with(prefix.as_str()),
    )
}

/// Whole simple name matches the regular expression.
///
/// # Errors
///
/// Returns [`DefinitionError::Regex`] for an invalid expression.
pub fn has_simple_name_matching<T: HasName + 'static>(
    pattern: &str,
) -> Result<Predicate<T>, DefinitionError> {
    let regex = full_match(pattern)?;
    Ok(Predicate::new(
        format!("have simple name matching '{pattern}'"),
        move |item: &T, _| regex.is_match(item.simple_name()),
    ))
}

/// Declared `public`.
pub fn is_public<T: HasModifiers + 'static>() -> Predicate<T> {
    Predicate::new("are public", |item: &T, _| {
        item.modifiers().visibility == Visibility::Public
    })
}

/// Declared `private`.
pub fn is_private<T: HasModifiers + 'static>() -> Predicate<T> {
    Predicate::new("are private", |item: &T, _| {
        item.modifiers().visibility == Visibility::Private
    })
}

/// Declared `static`.
pub fn is_static<T: HasModifiers + 'static>() -> Predicate<T> {
    Predicate::new("are static", |item: &T, _| item.modifiers().is_static)
}

/// Declared `final`.
pub fn is_final<T: HasModifiers + 'static>() -> Predicate<T> {
    Predicate::new("are final", |item: &T, _| item.modifiers().is_final)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{ClassDescriptor, ClassKind, FieldDescriptor, Modifiers};
    use crate::model::CodeModel;

    #[test]
    fn name_matching_is_anchored() {
        let model = CodeModel::default();
        let Ok(p) = has_name_matching::<ClassDescriptor>(".+Service") else {
            panic!("valid regex rejected");
        };
        let service = ClassDescriptor::new("x.service.OrderService", ClassKind::Interface);
        let other = ClassDescriptor::new("x.service.OrderServiceImpl", ClassKind::Class);
        assert_eq!(p.test(&service, &model), Ok(true));
        assert_eq!(p.test(&other, &model), Ok(false));
    }

    #[test]
    fn constant_field_name_pattern() {
        let model = CodeModel::default();
        let Ok(p) = has_name_matching::<FieldDescriptor>("[A-Z](?:[A-Z_]*[A-Z])?") else {
            panic!("valid regex rejected");
        };
        for (name, expected) in [
            ("MAX_SIZE", true),
            ("A", true),
            ("_HIDDEN", false),
            ("TRAILING_", false),
            ("camelCase", false),
        ] {
            let field = FieldDescriptor::new(name, "int");
            assert_eq!(p.test(&field, &model), Ok(expected), "{name}");
        }
    }

    #[test]
    fn invalid_regex_is_a_definition_error() {
        assert!(matches!(
            has_name_matching::<ClassDescriptor>("(unclosed"),
            Err(DefinitionError::Regex(_))
        ));
    }

    #[test]
    fn simple_names_ignore_package_and_outer_class() {
        let model = CodeModel::default();
        let inner = ClassDescriptor::new("x.web.Outer$OrderController", ClassKind::Class);
        let p = has_simple_name_ending_with::<ClassDescriptor>("Controller");
        assert_eq!(p.test(&inner, &model), Ok(true));
        let p = has_simple_name::<ClassDescriptor>("OrderController");
        assert_eq!(p.test(&inner, &model), Ok(true));
    }

    #[test]
    fn modifier_predicates() {
        let model = CodeModel::default();
        let field = FieldDescriptor::new("PATH", "java.lang.String").with_modifiers(Modifiers::constant());
        assert_eq!(is_public().test(&field, &model), Ok(true));
        assert_eq!(is_static().test(&field, &model), Ok(true));
        assert_eq!(is_final().test(&field, &model), Ok(true));
        assert_eq!(is_private().test(&field, &model), Ok(false));
    }

    #[test]
    fn simple_name_prefix_and_pattern() {
        let model = CodeModel::default();
        let inner = ClassDescriptor::new("x.dto.Outer$AbstractRq", ClassKind::Class);
        let starts = has_simple_name_starting_with::<ClassDescriptor>("Abstract");
        assert_eq!(starts.test(&inner, &model), Ok(true));

        let Ok(rq) = has_simple_name_matching::<ClassDescriptor>("[A-Z]\\w*Rq") else {
            panic!("valid regex rejected");
        };
        assert_eq!(rq.test(&inner, &model), Ok(true));
        let outer = ClassDescriptor::new("x.dto.RqOuter", ClassKind::Class);
        assert_eq!(rq.test(&outer, &model), Ok(false));
        assert!(has_simple_name_matching::<ClassDescriptor>("(").is_err());
    }
}
