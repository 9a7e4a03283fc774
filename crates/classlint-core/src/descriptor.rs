//! Structural descriptors for classes, members and annotations.
//!
//! Descriptors are plain data. They carry no executable behavior and are
//! populated entirely at import time; every lookup that needs other classes
//! goes through [`CodeModel`](crate::CodeModel).

use serde::Serialize;
use std::borrow::Borrow;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

const PRIMITIVES: &[&str] = &[
    "boolean", "byte", "char", "short", "int", "long", "float", "double", "void",
];

/// A reference to a type by its fully qualified, dot-separated name.
///
/// Array types carry one `[]` suffix per dimension (e.g. `java.lang.String[]`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TypeName(String);

impl TypeName {
    /// Creates a type name from a fully qualified name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the fully qualified name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for array types.
    #[must_use]
    pub fn is_array(&self) -> bool {
        self.0.ends_with("[]")
    }

    /// Returns `true` for primitive types and `void`.
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        PRIMITIVES.contains(&self.0.as_str())
    }

    /// Strips every array dimension (`int[][]` becomes `int`).
    #[must_use]
    pub fn element_type(&self) -> TypeName {
        Self(self.0.trim_end_matches("[]").to_string())
    }

    /// Package of the (element) type; empty for primitives and the default package.
    #[must_use]
    pub fn package_name(&self) -> &str {
        let element = self.0.trim_end_matches("[]");
        if PRIMITIVES.contains(&element) {
            return "";
        }
        element.rsplit_once('.').map_or("", |(package, _)| package)
    }

    /// Simple name as written in source: `a.b.Outer$Inner[]` becomes `Inner[]`.
    #[must_use]
    pub fn simple_name(&self) -> &str {
        let local = self.0.rsplit_once('.').map_or(self.0.as_str(), |(_, s)| s);
        match local.rsplit_once('$') {
            Some((_, inner)) if !inner.is_empty() => inner,
            _ => local,
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for TypeName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TypeName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TypeName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Access level of a class or member.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// `public`
    Public,
    /// `protected`
    Protected,
    /// No access modifier.
    #[default]
    Package,
    /// `private`
    Private,
}

/// Modifier flags relevant to architecture rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Modifiers {
    /// Access level.
    pub visibility: Visibility,
    /// `static`
    pub is_static: bool,
    /// `final`
    pub is_final: bool,
    /// `abstract`
    pub is_abstract: bool,
}

impl Modifiers {
    /// Modifiers with the given visibility and no flags.
    #[must_use]
    pub fn with_visibility(visibility: Visibility) -> Self {
        Self {
            visibility,
            ..Self::default()
        }
    }

    /// `public static final`, the usual shape of a constant.
    #[must_use]
    pub fn constant() -> Self {
        Self {
            visibility: Visibility::Public,
            is_static: true,
            is_final: true,
            is_abstract: false,
        }
    }

    /// Sets the `static` flag.
    #[must_use]
    pub fn set_static(mut self, value: bool) -> Self {
        self.is_static = value;
        self
    }

    /// Sets the `final` flag.
    #[must_use]
    pub fn set_final(mut self, value: bool) -> Self {
        self.is_final = value;
        self
    }
}

/// The kind of type a class descriptor represents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    /// An ordinary class.
    #[default]
    Class,
    /// An interface.
    Interface,
    /// An enum.
    Enum,
    /// A record.
    Record,
    /// An annotation type.
    Annotation,
}

impl fmt::Display for ClassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Enum => "enum",
            Self::Record => "record",
            Self::Annotation => "annotation",
        };
        f.write_str(s)
    }
}

/// A typed annotation property value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum AnnotationValue {
    /// A string constant.
    String(String),
    /// A class literal (`Foo.class`).
    Class(TypeName),
    /// An enum constant.
    Enum {
        /// The enum type.
        type_name: TypeName,
        /// The constant name.
        constant: String,
    },
    /// An integral constant (`byte`, `short`, `int`, `long`).
    Int(i64),
    /// A floating point constant.
    Float(f64),
    /// A boolean constant.
    Bool(bool),
    /// A character constant.
    Char(char),
    /// A nested annotation.
    Annotation(Box<Annotation>),
    /// An array of values.
    Array(Vec<AnnotationValue>),
}

impl AnnotationValue {
    /// Short name of the value's shape, used in error messages.
    #[must_use]
    pub fn shape(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Class(_) => "class",
            Self::Enum { .. } => "enum",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Bool(_) => "boolean",
            Self::Char(_) => "char",
            Self::Annotation(_) => "annotation",
            Self::Array(_) => "array",
        }
    }

    /// Returns the string content, if this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Equality for scalars, membership for arrays.
    #[must_use]
    pub fn equals_or_contains(&self, value: &AnnotationValue) -> bool {
        match self {
            Self::Array(items) => items.iter().any(|item| item == value),
            scalar => scalar == value,
        }
    }
}

impl fmt::Display for AnnotationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "\"{s}\""),
            Self::Class(t) => write!(f, "{t}.class"),
            Self::Enum {
                type_name,
                constant,
            } => write!(f, "{type_name}.{constant}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Char(c) => write!(f, "'{c}'"),
            Self::Annotation(a) => write!(f, "@{}", a.type_name),
            Self::Array(items) => {
                f.write_str("{")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("}")
            }
        }
    }
}

/// An annotation instance: its type plus explicitly given properties.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    /// The annotation type.
    pub type_name: TypeName,
    /// Property values keyed by property name.
    pub properties: BTreeMap<String, AnnotationValue>,
}

impl Annotation {
    /// Creates an annotation without properties.
    #[must_use]
    pub fn new(type_name: impl Into<TypeName>) -> Self {
        Self {
            type_name: type_name.into(),
            properties: BTreeMap::new(),
        }
    }

    /// Adds a property value.
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, value: AnnotationValue) -> Self {
        self.properties.insert(name.into(), value);
        self
    }

    /// Looks up a property value.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&AnnotationValue> {
        self.properties.get(name)
    }
}

/// A field declared by a class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescriptor {
    /// Declaring class (back-reference by name).
    pub owner: TypeName,
    /// Field name.
    pub name: String,
    /// Declared type.
    pub field_type: TypeName,
    /// Annotations on the field.
    pub annotations: Vec<Annotation>,
    /// Modifiers.
    pub modifiers: Modifiers,
}

impl FieldDescriptor {
    /// Creates a field; the owner is set when it is added to a class.
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: impl Into<TypeName>) -> Self {
        Self {
            owner: TypeName::new(""),
            name: name.into(),
            field_type: field_type.into(),
            annotations: Vec::new(),
            modifiers: Modifiers::default(),
        }
    }

    /// Sets the modifiers.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Adds an annotation.
    #[must_use]
    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// `Owner.name`
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.owner, self.name)
    }
}

/// A method or constructor parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    /// Zero-based position.
    pub index: usize,
    /// Parameter name; `arg<index>` when the class file records none.
    pub name: String,
    /// Declared type.
    pub param_type: TypeName,
    /// Annotations on the parameter.
    pub annotations: Vec<Annotation>,
}

impl Parameter {
    /// Creates a parameter; the index is assigned when added to a method.
    #[must_use]
    pub fn new(name: impl Into<String>, param_type: impl Into<TypeName>) -> Self {
        Self {
            index: 0,
            name: name.into(),
            param_type: param_type.into(),
            annotations: Vec::new(),
        }
    }

    /// Adds an annotation.
    #[must_use]
    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

/// Name used for constructors, matching the class-file convention.
pub const CONSTRUCTOR_NAME: &str = "<init>";

/// A method or constructor declared by a class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodDescriptor {
    /// Declaring class (back-reference by name).
    pub owner: TypeName,
    /// Method name (`<init>` for constructors).
    pub name: String,
    /// Return type (`void` for constructors).
    pub return_type: TypeName,
    /// Parameters in declaration order.
    pub parameters: Vec<Parameter>,
    /// Annotations on the method itself.
    pub annotations: Vec<Annotation>,
    /// Modifiers.
    pub modifiers: Modifiers,
    /// Whether this is a constructor.
    pub is_constructor: bool,
}

impl MethodDescriptor {
    /// Creates a method.
    #[must_use]
    pub fn new(name: impl Into<String>, return_type: impl Into<TypeName>) -> Self {
        Self {
            owner: TypeName::new(""),
            name: name.into(),
            return_type: return_type.into(),
            parameters: Vec::new(),
            annotations: Vec::new(),
            modifiers: Modifiers::with_visibility(Visibility::Public),
            is_constructor: false,
        }
    }

    /// Creates a constructor.
    #[must_use]
    pub fn constructor(visibility: Visibility) -> Self {
        Self {
            is_constructor: true,
            modifiers: Modifiers::with_visibility(visibility),
            ..Self::new(CONSTRUCTOR_NAME, "void")
        }
    }

    /// Appends a parameter, assigning its index.
    #[must_use]
    pub fn with_parameter(mut self, mut parameter: Parameter) -> Self {
        parameter.index = self.parameters.len();
        self.parameters.push(parameter);
        self
    }

    /// Sets the modifiers.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Adds an annotation.
    #[must_use]
    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// `name(param.Type, int)`
    #[must_use]
    pub fn signature(&self) -> String {
        let params: Vec<&str> = self
            .parameters
            .iter()
            .map(|p| p.param_type.as_str())
            .collect();
        format!("{}({})", self.name, params.join(", "))
    }

    /// `Owner.name(param.Type, int)`
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.owner, self.signature())
    }
}

/// How one class structurally depends on another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DependencyKind {
    /// Extends the target.
    Superclass,
    /// Implements (or, for interfaces, extends) the target.
    Interface,
    /// Declares a field of the target type.
    FieldType,
    /// Declares a method or constructor parameter of the target type.
    ParameterType,
    /// Declares a method returning the target type.
    ReturnType,
    /// References the target from bytecode.
    CodeReference,
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Superclass => "extends",
            Self::Interface => "implements",
            Self::FieldType => "field type",
            Self::ParameterType => "parameter type",
            Self::ReturnType => "return type",
            Self::CodeReference => "code reference",
        };
        f.write_str(s)
    }
}

/// A dependency edge from one class to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dependency {
    /// The depending class.
    pub origin: TypeName,
    /// The class depended upon (element type for arrays).
    pub target: TypeName,
    /// How the dependency arises; the first kind found wins.
    pub kind: DependencyKind,
}

/// A class, interface, enum, record or annotation type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassDescriptor {
    /// Fully qualified name; the identity of the descriptor.
    pub name: TypeName,
    /// What kind of type this is.
    pub kind: ClassKind,
    /// Modifiers.
    pub modifiers: Modifiers,
    /// Direct superclass, resolved lazily against the model.
    pub superclass: Option<TypeName>,
    /// Directly implemented interfaces.
    pub interfaces: Vec<TypeName>,
    /// Annotations on the type.
    pub annotations: Vec<Annotation>,
    /// Declared fields, in declaration order.
    pub fields: Vec<FieldDescriptor>,
    /// Declared methods and constructors, in declaration order.
    pub methods: Vec<MethodDescriptor>,
    /// Source file name recorded by the compiler.
    pub source_file: Option<String>,
    /// Classes referenced from bytecode.
    pub code_references: Vec<TypeName>,
}

impl ClassDescriptor {
    /// Creates an empty public descriptor of the given kind.
    #[must_use]
    pub fn new(name: impl Into<TypeName>, kind: ClassKind) -> Self {
        Self {
            name: name.into(),
            kind,
            modifiers: Modifiers::with_visibility(Visibility::Public),
            superclass: None,
            interfaces: Vec::new(),
            annotations: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            source_file: None,
            code_references: Vec::new(),
        }
    }

    /// A name-only stand-in for a type that is not part of the import.
    #[must_use]
    pub fn stub(name: &TypeName) -> Self {
        Self::new(name.clone(), ClassKind::Class)
    }

    /// Sets the superclass.
    #[must_use]
    pub fn extends(mut self, superclass: impl Into<TypeName>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    /// Adds an implemented interface.
    #[must_use]
    pub fn implements(mut self, interface: impl Into<TypeName>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    /// Adds an annotation.
    #[must_use]
    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Adds a field, setting its owner.
    #[must_use]
    pub fn with_field(mut self, mut field: FieldDescriptor) -> Self {
        field.owner = self.name.clone();
        self.fields.push(field);
        self
    }

    /// Adds a method, setting its owner.
    #[must_use]
    pub fn with_method(mut self, mut method: MethodDescriptor) -> Self {
        method.owner = self.name.clone();
        self.methods.push(method);
        self
    }

    /// Sets the modifiers.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Simple name (`Inner` for `a.b.Outer$Inner`).
    #[must_use]
    pub fn simple_name(&self) -> &str {
        self.name.simple_name()
    }

    /// Package name; empty for the default package.
    #[must_use]
    pub fn package_name(&self) -> &str {
        self.name.package_name()
    }

    /// Returns `true` for interfaces (annotation types included).
    #[must_use]
    pub fn is_interface(&self) -> bool {
        matches!(self.kind, ClassKind::Interface | ClassKind::Annotation)
    }

    /// Returns `true` for records.
    #[must_use]
    pub fn is_record(&self) -> bool {
        self.kind == ClassKind::Record
    }

    /// Returns `true` for enums.
    #[must_use]
    pub fn is_enum(&self) -> bool {
        self.kind == ClassKind::Enum
    }

    /// Looks up a declared field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Declared constructors.
    pub fn constructors(&self) -> impl Iterator<Item = &MethodDescriptor> {
        self.methods.iter().filter(|m| m.is_constructor)
    }

    /// Structural dependencies on other types, deduplicated by target.
    ///
    /// Primitive types and self references are skipped; array types
    /// contribute their element type.
    #[must_use]
    pub fn dependencies(&self) -> Vec<Dependency> {
        let mut seen = HashSet::new();
        let mut deps = Vec::new();
        let mut push = |target: &TypeName, kind: DependencyKind| {
            let target = target.element_type();
            if target.is_primitive() || target == self.name {
                return;
            }
            if seen.insert(target.clone()) {
                deps.push(Dependency {
                    origin: self.name.clone(),
                    target,
                    kind,
                });
            }
        };

        if let Some(superclass) = &self.superclass {
            push(superclass, DependencyKind::Superclass);
        }
        for interface in &self.interfaces {
            push(interface, DependencyKind::Interface);
        }
        for field in &self.fields {
            push(&field.field_type, DependencyKind::FieldType);
        }
        for method in &self.methods {
            push(&method.return_type, DependencyKind::ReturnType);
            for parameter in &method.parameters {
                push(&parameter.param_type, DependencyKind::ParameterType);
            }
        }
        for reference in &self.code_references {
            push(reference, DependencyKind::CodeReference);
        }
        deps
    }
}
