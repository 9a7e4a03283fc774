//! The rule trait and the fluent rule definition API.
//!
//! ```
//! use classlint_core::rule::classes;
//! use classlint_core::{conditions, predicates};
//!
//! # fn main() -> Result<(), classlint_core::DefinitionError> {
//! let rule = classes()
//!     .that(predicates::resides_in_package("..controller")?)
//!     .should(conditions::have_field_named("PATH"))
//!     .allow_empty_should(true)
//!     .named("controllers-declare-path");
//! # Ok(())
//! # }
//! ```

use crate::condition::{have, Condition};
use crate::context::RuleContext;
use crate::descriptor::{ClassDescriptor, FieldDescriptor, MethodDescriptor};
use crate::element::Element;
use crate::evaluator::evaluate_elements;
use crate::predicate::Predicate;
use crate::types::{Severity, ViolationEvent};

/// What one rule evaluation produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Evaluation {
    /// Number of elements the rule selected.
    pub selected: usize,
    /// Violations in evaluation order.
    pub violations: Vec<ViolationEvent>,
}

/// An architecture rule evaluated against a whole code model.
///
/// Implementations must be deterministic: the same model always yields the
/// same ordered violations.
pub trait Rule: Send + Sync {
    /// Returns the rule name used in reports and configuration.
    fn name(&self) -> &str;

    /// Returns a sentence describing what the rule checks.
    fn description(&self) -> &str {
        self.name()
    }

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Evaluates the rule. Never fails: faults become violations.
    fn evaluate(&self, ctx: &RuleContext<'_>) -> Evaluation;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

/// Elements chosen for a rule, before a condition is attached.
#[derive(Debug)]
pub struct Selection<T> {
    predicate: Option<Predicate<T>>,
    negated: bool,
}

/// Selects every analyzed class.
#[must_use]
pub fn classes() -> Selection<ClassDescriptor> {
    Selection::all(false)
}

/// Selects every field of the analyzed classes.
#[must_use]
pub fn fields() -> Selection<FieldDescriptor> {
    Selection::all(false)
}

/// Selects every method and constructor of the analyzed classes.
#[must_use]
pub fn methods() -> Selection<MethodDescriptor> {
    Selection::all(false)
}

/// Selects classes that must not satisfy the condition.
#[must_use]
pub fn no_classes() -> Selection<ClassDescriptor> {
    Selection::all(true)
}

/// Selects fields that must not satisfy the condition.
#[must_use]
pub fn no_fields() -> Selection<FieldDescriptor> {
    Selection::all(true)
}

/// Selects methods that must not satisfy the condition.
#[must_use]
pub fn no_methods() -> Selection<MethodDescriptor> {
    Selection::all(true)
}

impl<T: Element> Selection<T> {
    fn all(negated: bool) -> Self {
        Self {
            predicate: None,
            negated,
        }
    }

    /// Restricts the selection.
    #[must_use]
    pub fn that(self, predicate: Predicate<T>) -> Self {
        self.and_that(predicate)
    }

    /// Adds a further restriction.
    #[must_use]
    pub fn and_that(mut self, predicate: Predicate<T>) -> Self {
        self.predicate = Some(match self.predicate {
            Some(current) => current.and(predicate),
            None => predicate,
        });
        self
    }

    /// Widens the selection.
    #[must_use]
    pub fn or_that(mut self, predicate: Predicate<T>) -> Self {
        self.predicate = Some(match self.predicate {
            Some(current) => current.or(predicate),
            None => predicate,
        });
        self
    }

    /// Attaches the condition every selected element must satisfy.
    #[must_use]
    pub fn should(self, condition: Condition<T>) -> ElementRule<T> {
        ElementRule::new(self, condition)
    }

    /// Shorthand for `should(have(predicate))`.
    #[must_use]
    pub fn should_be(self, predicate: Predicate<T>) -> ElementRule<T> {
        self.should(have(predicate))
    }
}

/// A rule over classes, fields or methods built from a selection and a condition.
#[derive(Debug)]
pub struct ElementRule<T> {
    name: Option<String>,
    description: String,
    selection: Selection<T>,
    condition: Condition<T>,
    allow_empty: Option<bool>,
    reason: Option<String>,
    severity: Severity,
}

impl<T: Element> ElementRule<T> {
    fn new(selection: Selection<T>, condition: Condition<T>) -> Self {
        let mut rule = Self {
            name: None,
            description: String::new(),
            selection,
            condition,
            allow_empty: None,
            reason: None,
            severity: Severity::Error,
        };
        rule.refresh_description();
        rule
    }

    fn refresh_description(&mut self) {
        let mut description = String::new();
        if self.selection.negated {
            description.push_str("no ");
        }
        description.push_str(T::PLURAL);
        if let Some(predicate) = &self.selection.predicate {
            description.push_str(" that ");
            description.push_str(predicate.description());
        }
        description.push_str(" should ");
        description.push_str(self.condition.description());
        if let Some(reason) = &self.reason {
            description.push_str(", because ");
            description.push_str(reason);
        }
        self.description = description;
    }

    /// Adds a condition that must hold as well.
    #[must_use]
    pub fn and_should(mut self, condition: Condition<T>) -> Self {
        self.condition = self.condition.and(condition);
        self.refresh_description();
        self
    }

    /// Adds an alternative condition.
    #[must_use]
    pub fn or_should(mut self, condition: Condition<T>) -> Self {
        self.condition = self.condition.or(condition);
        self.refresh_description();
        self
    }

    /// Whether an empty selection is acceptable (default: context policy).
    #[must_use]
    pub fn allow_empty_should(mut self, allow: bool) -> Self {
        self.allow_empty = Some(allow);
        self
    }

    /// Sets the rule name; defaults to the description.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Appends a rationale to the description.
    #[must_use]
    pub fn because(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self.refresh_description();
        self
    }

    /// Sets the default severity.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl<T: Element> Rule for ElementRule<T> {
    fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.description)
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Evaluation {
        let allow_empty = self.allow_empty.unwrap_or(ctx.allow_empty_default);
        let condition = if self.selection.negated {
            self.condition.clone().never()
        } else {
            self.condition.clone()
        };
        evaluate_elements(
            self.name(),
            self.selection.predicate.as_ref(),
            &condition,
            allow_empty,
            ctx.model,
        )
    }
}
