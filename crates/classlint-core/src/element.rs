//! Capability traits shared by classes, members and parameters.
//!
//! Generic predicate constructors are written against these traits so one
//! `is_annotated_with` serves classes, fields, methods and parameters alike.

use crate::descriptor::{
    Annotation, ClassDescriptor, FieldDescriptor, MethodDescriptor, Modifiers, Parameter, TypeName,
};
use crate::model::CodeModel;
use crate::types::{ElementKind, ElementRef};

/// Elements with a name.
pub trait HasName {
    /// Full name: fully qualified for classes, plain for members.
    fn name(&self) -> &str;

    /// Simple name; equals [`HasName::name`] except for classes.
    fn simple_name(&self) -> &str {
        self.name()
    }
}

/// Elements that carry annotations.
pub trait HasAnnotations {
    /// Directly present annotations.
    fn annotations(&self) -> &[Annotation];
}

/// Elements with modifiers.
pub trait HasModifiers {
    /// The modifier flags.
    fn modifiers(&self) -> Modifiers;
}

/// Members declared by a class.
pub trait HasOwner {
    /// Name of the declaring class.
    fn owner(&self) -> &TypeName;
}

/// Elements with a declared type (field type, parameter type, return type).
pub trait HasType {
    /// The raw declared type.
    fn raw_type(&self) -> &TypeName;
}

/// Elements a rule can select from a [`CodeModel`].
pub trait Element: Send + Sync + Sized + 'static {
    /// Kind used in violation references.
    const KIND: ElementKind;

    /// Plural noun used in rule descriptions (`classes`, `fields`, `methods`).
    const PLURAL: &'static str;

    /// All elements of this kind among the analyzed classes, in import order.
    fn collect(model: &CodeModel) -> Vec<&Self>;

    /// Reference used to attribute violations.
    fn element_ref(&self) -> ElementRef;
}

impl HasName for ClassDescriptor {
    fn name(&self) -> &str {
        self.name.as_str()
    }

    fn simple_name(&self) -> &str {
        ClassDescriptor::simple_name(self)
    }
}

impl HasAnnotations for ClassDescriptor {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}

impl HasModifiers for ClassDescriptor {
    fn modifiers(&self) -> Modifiers {
        self.modifiers
    }
}

impl Element for ClassDescriptor {
    const KIND: ElementKind = ElementKind::Class;
    const PLURAL: &'static str = "classes";

    fn collect(model: &CodeModel) -> Vec<&Self> {
        model.classes().iter().collect()
    }

    fn element_ref(&self) -> ElementRef {
        ElementRef::new(ElementKind::Class, self.name.as_str())
    }
}

impl HasName for FieldDescriptor {
    fn name(&self) -> &str {
        &self.name
    }
}

impl HasAnnotations for FieldDescriptor {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}

impl HasModifiers for FieldDescriptor {
    fn modifiers(&self) -> Modifiers {
        self.modifiers
    }
}

impl HasOwner for FieldDescriptor {
    fn owner(&self) -> &TypeName {
        &self.owner
    }
}

impl HasType for FieldDescriptor {
    fn raw_type(&self) -> &TypeName {
        &self.field_type
    }
}

impl Element for FieldDescriptor {
    const KIND: ElementKind = ElementKind::Field;
    const PLURAL: &'static str = "fields";

    fn collect(model: &CodeModel) -> Vec<&Self> {
        model.fields().collect()
    }

    fn element_ref(&self) -> ElementRef {
        ElementRef::new(ElementKind::Field, self.full_name())
    }
}

impl HasName for MethodDescriptor {
    fn name(&self) -> &str {
        &self.name
    }
}

impl HasAnnotations for MethodDescriptor {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}

impl HasModifiers for MethodDescriptor {
    fn modifiers(&self) -> Modifiers {
        self.modifiers
    }
}

impl HasOwner for MethodDescriptor {
    fn owner(&self) -> &TypeName {
        &self.owner
    }
}

impl HasType for MethodDescriptor {
    fn raw_type(&self) -> &TypeName {
        &self.return_type
    }
}

impl Element for MethodDescriptor {
    const KIND: ElementKind = ElementKind::Method;
    const PLURAL: &'static str = "methods";

    fn collect(model: &CodeModel) -> Vec<&Self> {
        model.methods().collect()
    }

    fn element_ref(&self) -> ElementRef {
        ElementRef::new(ElementKind::Method, self.full_name())
    }
}

impl HasName for Parameter {
    fn name(&self) -> &str {
        &self.name
    }
}

impl HasAnnotations for Parameter {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}

impl HasType for Parameter {
    fn raw_type(&self) -> &TypeName {
        &self.param_type
    }
}

impl HasName for Annotation {
    fn name(&self) -> &str {
        self.type_name.as_str()
    }

    fn simple_name(&self) -> &str {
        self.type_name.simple_name()
    }
}
