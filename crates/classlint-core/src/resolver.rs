//! Transitive (meta-)annotation lookup.

use crate::descriptor::{Annotation, TypeName};
use crate::model::CodeModel;
use std::collections::{HashSet, VecDeque};

/// Resolves annotations through the "annotation type is annotated with" graph.
///
/// Annotation types are looked up among analyzed and library classes; types
/// outside the import contribute no further edges.
#[derive(Debug, Clone, Copy)]
pub struct AnnotationResolver<'m> {
    model: &'m CodeModel,
}

impl<'m> AnnotationResolver<'m> {
    /// Creates a resolver over a model.
    #[must_use]
    pub fn new(model: &'m CodeModel) -> Self {
        Self { model }
    }

    /// Breadth-first search from the directly present annotations.
    ///
    /// A direct annotation is a zero-step match. Each annotation type is
    /// visited at most once, so cyclic annotation graphs terminate.
    #[must_use]
    pub fn is_meta_annotated_with(&self, annotations: &[Annotation], target: &str) -> bool {
        self.find(annotations, |t| t.as_str() == target).is_some()
    }

    /// Returns the first annotation type (in BFS order) accepted by `accept`.
    pub fn find<F>(&self, annotations: &[Annotation], mut accept: F) -> Option<TypeName>
    where
        F: FnMut(&TypeName) -> bool,
    {
        self.reachable(annotations).find(|t| accept(t)).cloned()
    }

    /// Every annotation type reachable from the given annotations, in BFS order.
    #[must_use]
    pub fn closure(&self, annotations: &[Annotation]) -> Vec<TypeName> {
        self.reachable(annotations).cloned().collect()
    }

    fn reachable<'a>(&self, annotations: &'a [Annotation]) -> Reachable<'a>
    where
        'm: 'a,
    {
        let mut walk = Reachable {
            model: self.model,
            visited: HashSet::new(),
            queue: VecDeque::new(),
        };
        for annotation in annotations {
            walk.enqueue(&annotation.type_name);
        }
        walk
    }
}

/// Lazy BFS over the meta-annotation graph.
struct Reachable<'a> {
    model: &'a CodeModel,
    visited: HashSet<&'a TypeName>,
    queue: VecDeque<&'a TypeName>,
}

impl<'a> Reachable<'a> {
    fn enqueue(&mut self, type_name: &'a TypeName) {
        if self.visited.insert(type_name) {
            self.queue.push_back(type_name);
        }
    }
}

impl<'a> Iterator for Reachable<'a> {
    type Item = &'a TypeName;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.queue.pop_front()?;
        if let Some(declaration) = self.model.resolve(current.as_str()) {
            for meta in &declaration.annotations {
                self.enqueue(&meta.type_name);
            }
        }
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{ClassDescriptor, ClassKind};

    fn annotation_type(name: &str, meta: &[&str]) -> ClassDescriptor {
        meta.iter().fold(
            ClassDescriptor::new(name, ClassKind::Annotation),
            |class, m| class.annotated(Annotation::new(*m)),
        )
    }

    fn model() -> CodeModel {
        CodeModel::builder()
            .library_class(annotation_type("x.Foo", &["x.Bar"]))
            .library_class(annotation_type("x.Bar", &["x.Baz"]))
            .library_class(annotation_type("x.Baz", &[]))
            .library_class(annotation_type("x.SelfRef", &["x.SelfRef", "x.Loop"]))
            .library_class(annotation_type("x.Loop", &["x.SelfRef"]))
            .build()
    }

    #[test]
    fn direct_annotation_is_zero_step_match() {
        let model = model();
        let resolver = AnnotationResolver::new(&model);
        assert!(resolver.is_meta_annotated_with(&[Annotation::new("x.Foo")], "x.Foo"));
    }

    #[test]
    fn follows_meta_annotations_transitively() {
        let model = model();
        let resolver = AnnotationResolver::new(&model);
        let direct = [Annotation::new("x.Foo")];
        assert!(resolver.is_meta_annotated_with(&direct, "x.Bar"));
        assert!(resolver.is_meta_annotated_with(&direct, "x.Baz"));
        assert!(!resolver.is_meta_annotated_with(&direct, "x.Other"));
    }

    #[test]
    fn cycles_terminate() {
        let model = model();
        let resolver = AnnotationResolver::new(&model);
        let direct = [Annotation::new("x.SelfRef")];
        assert!(!resolver.is_meta_annotated_with(&direct, "x.Missing"));
        let names: Vec<String> = resolver
            .closure(&direct)
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(names, ["x.SelfRef", "x.Loop"]);
    }

    #[test]
    fn find_returns_the_nearest_accepted_type() {
        let model = model();
        let resolver = AnnotationResolver::new(&model);
        let direct = [Annotation::new("x.Foo")];
        let found = resolver.find(&direct, |t| t.as_str().starts_with("x.Ba"));
        assert_eq!(found, Some(TypeName::new("x.Bar")));
        let names: Vec<String> = resolver.closure(&direct).iter().map(ToString::to_string).collect();
        assert_eq!(names, ["x.Foo", "x.Bar", "x.Baz"]);
    }

    #[test]
    fn unknown_annotation_types_end_the_search() {
        let model = CodeModel::default();
        let resolver = AnnotationResolver::new(&model);
        assert!(!resolver.is_meta_annotated_with(&[Annotation::new("x.Foo")], "x.Bar"));
    }
}
