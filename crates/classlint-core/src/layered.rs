//! Layered architecture: named layers and directional access permissions.
//!
//! Only dependencies between classes that both belong to a declared layer
//! are considered. A class belongs to the first layer (in declaration order)
//! with a matching package pattern; dependencies inside one layer are always
//! allowed.

use crate::context::RuleContext;
use crate::descriptor::Dependency;
use crate::error::DefinitionError;
use crate::package::{self, PackagePattern};
use crate::rule::{Evaluation, Rule};
use crate::types::{ElementKind, ElementRef, Severity, ViolationEvent};
use std::collections::HashSet;
use std::fmt::Write;
use tracing::debug;

/// Which layers may take part in an edge with a given layer.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Access {
    Any,
    Only(Vec<String>),
}

impl Access {
    fn permits(&self, layer: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Only(layers) => layers.iter().any(|l| l == layer),
        }
    }
}

#[derive(Debug, Clone)]
struct Layer {
    name: String,
    patterns: Vec<PackagePattern>,
    accessed_by: Access,
    may_access: Access,
}

/// A validated layered-architecture rule.
#[derive(Debug, Clone)]
pub struct LayeredArchitecture {
    name: String,
    description: String,
    layers: Vec<Layer>,
    allow_empty: Option<bool>,
    severity: Severity,
}

impl LayeredArchitecture {
    /// Default rule name.
    pub const NAME: &'static str = "layered-architecture";

    /// Creates a builder.
    #[must_use]
    pub fn builder() -> LayeredArchitectureBuilder {
        LayeredArchitectureBuilder::default()
    }

    /// Names of the declared layers, in declaration order.
    pub fn layer_names(&self) -> impl Iterator<Item = &str> {
        self.layers.iter().map(|l| l.name.as_str())
    }

    /// The layer a package belongs to, if any.
    #[must_use]
    pub fn layer_of(&self, package: &str) -> Option<&str> {
        self.layer_index(package).map(|i| self.layers[i].name.as_str())
    }

    fn layer_index(&self, package: &str) -> Option<usize> {
        self.layers
            .iter()
            .position(|l| package::matches_any(&l.patterns, package))
    }

    /// Describes why the edge is illegal, or `None` when it is permitted.
    fn check_edge(from: &Layer, to: &Layer) -> Option<String> {
        if !to.accessed_by.permits(&from.name) {
            return Some(match &to.accessed_by {
                Access::Only(allowed) if allowed.is_empty() => {
                    format!("layer '{}' may not be accessed by any layer", to.name)
                }
                _ => format!("layer '{}' may not be accessed by layer '{}'", to.name, from.name),
            });
        }
        if !from.may_access.permits(&to.name) {
            return Some(match &from.may_access {
                Access::Only(allowed) if allowed.is_empty() => {
                    format!("layer '{}' may not access any layer", from.name)
                }
                _ => format!("layer '{}' may not access layer '{}'", from.name, to.name),
            });
        }
        None
    }

    fn describe_edge(
        dependency: &Dependency,
        from: &Layer,
        to: &Layer,
        why: &str,
    ) -> ViolationEvent {
        ViolationEvent::new(
            ElementRef::new(ElementKind::Class, dependency.origin.as_str()),
            format!(
                "in layer '{}' depends on <{}> in layer '{}' ({}): {}",
                from.name, dependency.target, to.name, dependency.kind, why
            ),
        )
    }
}

impl Rule for LayeredArchitecture {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Evaluation {
        let mut violations = Vec::new();
        let mut selected = 0usize;

        for class in ctx.model.classes() {
            let Some(from_index) = self.layer_index(class.package_name()) else {
                debug!("{} belongs to no layer, skipping", class.name);
                continue;
            };
            selected += 1;
            let from = &self.layers[from_index];

            for dependency in class.dependencies() {
                let Some(to_index) = self.layer_index(dependency.target.package_name()) else {
                    continue;
                };
                if to_index == from_index {
                    continue;
                }
                let to = &self.layers[to_index];
                if let Some(why) = Self::check_edge(from, to) {
                    violations.push(Self::describe_edge(&dependency, from, to, &why));
                }
            }
        }

        let allow_empty = self.allow_empty.unwrap_or(ctx.allow_empty_default);
        if selected == 0 && !allow_empty {
            violations.push(ViolationEvent::new(
                ElementRef::new(ElementKind::Rule, self.name.as_str()),
                "no class belongs to any declared layer",
            ));
        }

        Evaluation {
            selected,
            violations,
        }
    }
}

#[derive(Debug, Clone)]
enum Constraint {
    AccessedBy(String, Vec<String>),
    MayAccess(String, Vec<String>),
}

/// Builder for [`LayeredArchitecture`]; validated on [`build`](Self::build).
#[derive(Debug, Clone, Default)]
pub struct LayeredArchitectureBuilder {
    name: Option<String>,
    layers: Vec<(String, Vec<String>)>,
    constraints: Vec<Constraint>,
    allow_empty: Option<bool>,
    severity: Option<Severity>,
}

impl LayeredArchitectureBuilder {
    /// Declares a layer by one or more package patterns.
    #[must_use]
    pub fn layer<I, S>(mut self, name: impl Into<String>, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.layers
            .push((name.into(), patterns.into_iter().map(Into::into).collect()));
        self
    }

    /// No other layer may depend on `layer`.
    #[must_use]
    pub fn may_not_be_accessed_by_any_layer(mut self, layer: impl Into<String>) -> Self {
        self.constraints
            .push(Constraint::AccessedBy(layer.into(), Vec::new()));
        self
    }

    /// Only the listed layers may depend on `layer`.
    #[must_use]
    pub fn may_only_be_accessed_by<I, S>(mut self, layer: impl Into<String>, accessors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.constraints.push(Constraint::AccessedBy(
            layer.into(),
            accessors.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// `layer` may not depend on any other layer.
    #[must_use]
    pub fn may_not_access_any_layer(mut self, layer: impl Into<String>) -> Self {
        self.constraints
            .push(Constraint::MayAccess(layer.into(), Vec::new()));
        self
    }

    /// `layer` may only depend on the listed layers.
    #[must_use]
    pub fn may_only_access<I, S>(mut self, layer: impl Into<String>, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.constraints.push(Constraint::MayAccess(
            layer.into(),
            targets.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Whether a model without any layered class is acceptable.
    #[must_use]
    pub fn allow_empty_should(mut self, allow: bool) -> Self {
        self.allow_empty = Some(allow);
        self
    }

    /// Sets the rule name (default: `layered-architecture`).
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the default severity.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    /// Validates layer names and patterns.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError`] for duplicate or pattern-less layers,
    /// invalid patterns, and constraints naming undeclared layers.
    pub fn build(self) -> Result<LayeredArchitecture, DefinitionError> {
        let mut seen = HashSet::new();
        let mut layers = Vec::with_capacity(self.layers.len());

        for (name, patterns) in &self.layers {
            if !seen.insert(name.as_str()) {
                return Err(DefinitionError::DuplicateLayer { name: name.clone() });
            }
            if patterns.is_empty() {
                return Err(DefinitionError::EmptyLayer { name: name.clone() });
            }
            layers.push(Layer {
                name: name.clone(),
                patterns: package::parse_all(patterns)?,
                accessed_by: Access::Any,
                may_access: Access::Any,
            });
        }

        let known = |name: &str| -> Result<(), DefinitionError> {
            if seen.contains(name) {
                Ok(())
            } else {
                Err(DefinitionError::UnknownLayer {
                    name: name.to_string(),
                })
            }
        };

        for constraint in &self.constraints {
            let (subject, others) = match constraint {
                Constraint::AccessedBy(s, o) | Constraint::MayAccess(s, o) => (s, o),
            };
            known(subject)?;
            for other in others {
                known(other)?;
            }
            let Some(layer) = layers.iter_mut().find(|l| &l.name == subject) else {
                continue;
            };
            match constraint {
                Constraint::AccessedBy(..) => layer.accessed_by = Access::Only(others.clone()),
                Constraint::MayAccess(..) => layer.may_access = Access::Only(others.clone()),
            }
        }

        let description = describe(&layers);
        Ok(LayeredArchitecture {
            name: self
                .name
                .unwrap_or_else(|| LayeredArchitecture::NAME.to_string()),
            description,
            layers,
            allow_empty: self.allow_empty,
            severity: self.severity.unwrap_or(Severity::Error),
        })
    }
}

fn describe(layers: &[Layer]) -> String {
    let mut out = String::from("layered architecture considering only dependencies in layers");
    for layer in layers {
        let patterns: Vec<&str> = layer.patterns.iter().map(PackagePattern::as_str).collect();
        let _ = write!(out, "; layer '{}' ('{}')", layer.name, patterns.join("', '"));
    }
    for layer in layers {
        match &layer.accessed_by {
            Access::Only(l) if l.is_empty() => {
                let _ = write!(out, "; '{}' may not be accessed by any layer", layer.name);
            }
            Access::Only(l) => {
                let _ = write!(out, "; '{}' may only be accessed by {:?}", layer.name, l);
            }
            Access::Any => {}
        }
        match &layer.may_access {
            Access::Only(l) if l.is_empty() => {
                let _ = write!(out, "; '{}' may not access any layer", layer.name);
            }
            Access::Only(l) => {
                let _ = write!(out, "; '{}' may only access {:?}", layer.name, l);
            }
            Access::Any => {}
        }
    }
    out
}
