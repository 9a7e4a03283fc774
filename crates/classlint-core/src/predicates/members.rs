use crate::descriptor::{ClassDescriptor, MethodDescriptor, Parameter, TypeName};
use crate::element::{HasOwner, HasType};
use crate::predicate::Predicate;

/// The declaring class matches the predicate.
///
/// Owners outside the import are tested as name-only stubs.
pub fn is_declared_in_class_that<T: HasOwner + 'static>(
    class: Predicate<ClassDescriptor>,
) -> Predicate<T> {
    Predicate::try_new(
        format!("are declared in classes that {}", class.description()),
        move |item: &T, model| {
            let owner = model.resolve_or_stub(item.owner());
            class.test(&owner, model)
        },
    )
}

/// The declared type (field, parameter or return type) matches the predicate.
pub fn has_raw_type<T: HasType + 'static>(class: Predicate<ClassDescriptor>) -> Predicate<T> {
    Predicate::try_new(
        format!("have raw type that {}", class.description()),
        move |item: &T, model| {
            let raw = model.resolve_or_stub(item.raw_type());
            class.test(&raw, model)
        },
    )
}

/// The declared type has exactly this name.
pub fn has_raw_type_named<T: HasType + 'static>(name: impl Into<TypeName>) -> Predicate<T> {
    let name = name.into();
    Predicate::new(format!("have raw type {name}"), move |item: &T, _| {
        item.raw_type() == &name
    })
}

/// The return type matches the predicate.
#[must_use]
pub fn has_raw_return_type(class: Predicate<ClassDescriptor>) -> Predicate<MethodDescriptor> {
    let description = format!("have raw return type that {}", class.description());
    has_raw_type(class).describe_as(description)
}

/// Constructors.
#[must_use]
pub fn is_constructor() -> Predicate<MethodDescriptor> {
    Predicate::new("are constructors", |method: &MethodDescriptor, _| {
        method.is_constructor
    })
}

/// At least one parameter matches the predicate.
pub fn has_parameter_that(parameter: Predicate<Parameter>) -> Predicate<MethodDescriptor> {
    Predicate::try_new(
        format!("have any parameter that {}", parameter.description()),
        move |method: &MethodDescriptor, model| {
            for p in &method.parameters {
                if parameter.test(p, model)? {
                    return Ok(true);
                }
            }
            Ok(false)
        },
    )
}
