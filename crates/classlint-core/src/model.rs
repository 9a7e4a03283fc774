//! The immutable code model produced by one import.

use crate::descriptor::{ClassDescriptor, FieldDescriptor, MethodDescriptor, TypeName};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

#[derive(Debug, Clone, Copy)]
enum Slot {
    Analyzed(usize),
    Library(usize),
}

/// The complete set of classes produced by one import.
///
/// Analyzed classes are the rule domain. Library classes are only used to
/// resolve references (superclasses, annotation types for meta-annotation
/// lookup) and are never selected by rules. The model is built once through
/// [`CodeModelBuilder`] and never mutated afterwards.
#[derive(Debug, Default)]
pub struct CodeModel {
    classes: Vec<ClassDescriptor>,
    library: Vec<ClassDescriptor>,
    index: HashMap<TypeName, Slot>,
    by_package: BTreeMap<String, Vec<usize>>,
    by_annotation: HashMap<TypeName, Vec<usize>>,
}

impl CodeModel {
    /// Creates a builder.
    #[must_use]
    pub fn builder() -> CodeModelBuilder {
        CodeModelBuilder::default()
    }

    /// Analyzed classes in import order.
    #[must_use]
    pub fn classes(&self) -> &[ClassDescriptor] {
        &self.classes
    }

    /// Library classes in import order.
    #[must_use]
    pub fn library_classes(&self) -> &[ClassDescriptor] {
        &self.library
    }

    /// Number of analyzed classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns true if no classes were analyzed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Looks up an analyzed class by fully qualified name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ClassDescriptor> {
        match self.index.get(name)? {
            Slot::Analyzed(i) => self.classes.get(*i),
            Slot::Library(_) => None,
        }
    }

    /// Looks up a class among both analyzed and library classes.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&ClassDescriptor> {
        match self.index.get(name)? {
            Slot::Analyzed(i) => self.classes.get(*i),
            Slot::Library(i) => self.library.get(*i),
        }
    }

    /// Resolves a class, falling back to a name-only stub for unknown types.
    #[must_use]
    pub fn resolve_or_stub(&self, name: &TypeName) -> Cow<'_, ClassDescriptor> {
        self.resolve(name.as_str())
            .map_or_else(|| Cow::Owned(ClassDescriptor::stub(name)), Cow::Borrowed)
    }

    /// Returns true if the name belongs to an analyzed class.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Analyzed classes declared directly in the given package.
    pub fn in_package<'a>(&'a self, package: &str) -> impl Iterator<Item = &'a ClassDescriptor> {
        self.by_package
            .get(package)
            .into_iter()
            .flatten()
            .filter_map(|i| self.classes.get(*i))
    }

    /// Names of every package holding at least one analyzed class, sorted.
    pub fn packages(&self) -> impl Iterator<Item = &str> {
        self.by_package.keys().map(String::as_str)
    }

    /// Longest package prefix shared by every analyzed class, matched on
    /// whole segments. Empty when nothing was analyzed or the classes share
    /// no segment.
    #[must_use]
    pub fn common_package(&self) -> String {
        let mut packages = self.by_package.keys();
        let Some(first) = packages.next() else {
            return String::new();
        };
        let mut common: Vec<&str> = first.split('.').collect();
        for package in packages {
            let shared = common
                .iter()
                .zip(package.split('.'))
                .take_while(|(a, b)| *a == b)
                .count();
            common.truncate(shared);
        }
        common.join(".")
    }

    /// Analyzed classes directly annotated with the given type.
    pub fn annotated_with<'a>(
        &'a self,
        annotation: &str,
    ) -> impl Iterator<Item = &'a ClassDescriptor> {
        self.by_annotation
            .get(annotation)
            .into_iter()
            .flatten()
            .filter_map(|i| self.classes.get(*i))
    }

    /// The class declaring a field or method, by its owner name.
    #[must_use]
    pub fn owner_of(&self, owner: &TypeName) -> Option<&ClassDescriptor> {
        self.resolve(owner.as_str())
    }

    /// The resolved direct superclass, if it is part of the import.
    #[must_use]
    pub fn superclass_of(&self, class: &ClassDescriptor) -> Option<&ClassDescriptor> {
        class
            .superclass
            .as_ref()
            .and_then(|s| self.resolve(s.as_str()))
    }

    /// Fields of all analyzed classes, in import then declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.classes.iter().flat_map(|c| c.fields.iter())
    }

    /// Methods of all analyzed classes, in import then declaration order.
    pub fn methods(&self) -> impl Iterator<Item = &MethodDescriptor> {
        self.classes.iter().flat_map(|c| c.methods.iter())
    }
}

/// Collects descriptors and freezes them into a [`CodeModel`].
///
/// The first descriptor added under a name wins; later duplicates are
/// dropped, so two descriptors with the same name are always one entity.
#[derive(Debug, Default)]
pub struct CodeModelBuilder {
    classes: Vec<ClassDescriptor>,
    library: Vec<ClassDescriptor>,
    index: HashMap<TypeName, Slot>,
}

impl CodeModelBuilder {
    /// Adds an analyzed class.
    #[must_use]
    pub fn class(mut self, class: ClassDescriptor) -> Self {
        self.add(class);
        self
    }

    /// Adds a library class.
    #[must_use]
    pub fn library_class(mut self, class: ClassDescriptor) -> Self {
        self.add_library(class);
        self
    }

    /// Adds an analyzed class in place.
    pub fn add(&mut self, class: ClassDescriptor) {
        if self.index.contains_key(&class.name) {
            debug!("Skipping duplicate class {}", class.name);
            return;
        }
        self.index
            .insert(class.name.clone(), Slot::Analyzed(self.classes.len()));
        self.classes.push(class);
    }

    /// Adds a library class in place.
    pub fn add_library(&mut self, class: ClassDescriptor) {
        if self.index.contains_key(&class.name) {
            debug!("Skipping duplicate library class {}", class.name);
            return;
        }
        self.index
            .insert(class.name.clone(), Slot::Library(self.library.len()));
        self.library.push(class);
    }

    /// Number of analyzed classes added so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns true if no analyzed class was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Builds the package and annotation indexes and freezes the model.
    #[must_use]
    pub fn build(self) -> CodeModel {
        let mut by_package: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        let mut by_annotation: HashMap<TypeName, Vec<usize>> = HashMap::new();

        for (i, class) in self.classes.iter().enumerate() {
            by_package
                .entry(class.package_name().to_string())
                .or_default()
                .push(i);
            for annotation in &class.annotations {
                let entry = by_annotation
                    .entry(annotation.type_name.clone())
                    .or_default();
                if entry.last() != Some(&i) {
                    entry.push(i);
                }
            }
        }

        debug!(
            "Built code model: {} class(es), {} library class(es), {} package(s)",
            self.classes.len(),
            self.library.len(),
            by_package.len()
        );

        CodeModel {
            classes: self.classes,
            library: self.library,
            index: self.index,
            by_package,
            by_annotation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{Annotation, ClassKind};

    fn model() -> CodeModel {
        CodeModel::builder()
            .class(
                ClassDescriptor::new("x.web.OrderController", ClassKind::Class)
                    .extends("x.web.BaseController")
                    .annotated(Annotation::new("org.springframework.web.bind.annotation.RestController")),
            )
            .class(ClassDescriptor::new("x.web.BaseController", ClassKind::Class))
            .class(ClassDescriptor::new("x.web.OrderController", ClassKind::Interface))
            .library_class(ClassDescriptor::new(
                "org.springframework.web.bind.annotation.RestController",
                ClassKind::Annotation,
            ))
            .build()
    }

    #[test]
    fn first_duplicate_wins() {
        let model = model();
        assert_eq!(model.len(), 2);
        let class = model.get("x.web.OrderController");
        assert_eq!(class.map(|c| c.kind), Some(ClassKind::Class));
    }

    #[test]
    fn library_classes_resolve_but_are_not_analyzed() {
        let model = model();
        let name = "org.springframework.web.bind.annotation.RestController";
        assert!(model.get(name).is_none());
        assert!(model.resolve(name).is_some());
    }

    #[test]
    fn indexes_by_package_and_annotation() {
        let model = model();
        assert_eq!(model.in_package("x.web").count(), 2);
        assert_eq!(model.in_package("x").count(), 0);
        let annotated: Vec<_> = model
            .annotated_with("org.springframework.web.bind.annotation.RestController")
            .map(|c| c.simple_name())
            .collect();
        assert_eq!(annotated, ["OrderController"]);
    }

    #[test]
    fn resolve_or_stub_falls_back_to_name_only() {
        let model = model();
        let stub = model.resolve_or_stub(&TypeName::new("java.util.List"));
        assert!(matches!(stub, Cow::Owned(_)));
        assert!(stub.annotations.is_empty());
        let known = model.resolve_or_stub(&TypeName::new("x.web.BaseController"));
        assert!(matches!(known, Cow::Borrowed(_)));
    }

    #[test]
    fn superclass_is_resolved_lazily() {
        let model = model();
        let Some(controller) = model.get("x.web.OrderController") else {
            panic!("controller missing");
        };
        let parent = model.superclass_of(controller).map(|c| c.name.as_str());
        assert_eq!(parent, Some("x.web.BaseController"));
    }

    #[test]
    fn common_package_matches_whole_segments() {
        let model = CodeModel::builder()
            .class(ClassDescriptor::new("com.shop.order.controller.A", ClassKind::Class))
            .class(ClassDescriptor::new("com.shop.order.service.B", ClassKind::Class))
            .class(ClassDescriptor::new("com.shopping.C", ClassKind::Class))
            .build();
        assert_eq!(model.common_package(), "com");
        assert_eq!(CodeModel::default().common_package(), "");
        assert_eq!(self::model().common_package(), "x.web");
    }

    #[test]
    fn members_resolve_their_owner() {
        let model = CodeModel::builder()
            .class(
                ClassDescriptor::new("x.web.Page", ClassKind::Class)
                    .with_field(FieldDescriptor::new("title", "java.lang.String")),
            )
            .build();
        let Some(field) = model.fields().next() else {
            panic!("field missing");
        };
        let owner = model.owner_of(&field.owner).map(|c| c.name.as_str());
        assert_eq!(owner, Some("x.web.Page"));
    }
}
