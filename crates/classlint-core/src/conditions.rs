//! Ready-made structural conditions.

use crate::condition::{Condition, ConditionEvents};
use crate::descriptor::{ClassDescriptor, MethodDescriptor, Visibility};
use crate::model::CodeModel;

/// The class declares a field with this name.
pub fn have_field_named(name: impl Into<String>) -> Condition<ClassDescriptor> {
    let name = name.into();
    Condition::new(
        format!("have a field named '{name}'"),
        move |class: &ClassDescriptor, _: &CodeModel, events: &mut ConditionEvents| {
            if class.field(&name).is_none() {
                events.violated(class, format!("declares no field named '{name}'"));
            }
        },
    )
}

/// Every declared constructor is private.
///
/// Reports one violation per non-private constructor.
#[must_use]
pub fn have_only_private_constructors() -> Condition<ClassDescriptor> {
    Condition::new(
        "have only private constructors",
        |class: &ClassDescriptor, _: &CodeModel, events: &mut ConditionEvents| {
            for constructor in class.constructors() {
                if constructor.modifiers.visibility != Visibility::Private {
                    events.violated(
                        class,
                        format!("declares non-private constructor {}", constructor.signature()),
                    );
                }
            }
        },
    )
}

/// The class declares constructors only.
#[must_use]
pub fn have_no_methods_except_constructors() -> Condition<ClassDescriptor> {
    Condition::new(
        "not declare any methods except constructors",
        |class: &ClassDescriptor, _: &CodeModel, events: &mut ConditionEvents| {
            for method in class.methods.iter().filter(|m| !m.is_constructor) {
                events.violated(class, format!("declares method {}", method.signature()));
            }
        },
    )
}

/// The method has a parameter with this name.
pub fn have_parameter_named(name: impl Into<String>) -> Condition<MethodDescriptor> {
    let name = name.into();
    Condition::new(
        format!("have a parameter named '{name}'"),
        move |method: &MethodDescriptor, _: &CodeModel, events: &mut ConditionEvents| {
            if !method.parameters.iter().any(|p| p.name == name) {
                events.violated(method, format!("has no parameter named '{name}'"));
            }
        },
    )
}
