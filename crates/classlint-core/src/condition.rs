//! Conditions: checks that report violation events for a selected element.

use crate::element::Element;
use crate::model::CodeModel;
use crate::predicate::{infinitive, negate_description, unmet, Predicate};
use crate::types::ViolationEvent;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Unmet,
    Fault,
}

/// Append-only sink of violation events for one element.
///
/// Unmet expectations and evaluation faults are kept apart: negating or
/// or-ing a condition can turn an unmet expectation into a pass, but a
/// fault is always reported.
#[derive(Debug, Default)]
pub struct ConditionEvents {
    events: Vec<(Outcome, ViolationEvent)>,
}

impl ConditionEvents {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a violation attributed to `item`.
    pub fn violated<T: Element>(&mut self, item: &T, message: impl Into<String>) {
        self.add(ViolationEvent::new(item.element_ref(), message));
    }

    /// Records that `item` could not be evaluated.
    pub fn fault<T: Element>(&mut self, item: &T, message: impl Into<String>) {
        self.events
            .push((Outcome::Fault, ViolationEvent::new(item.element_ref(), message)));
    }

    /// Records a prepared event.
    pub fn add(&mut self, event: ViolationEvent) {
        self.events.push((Outcome::Unmet, event));
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Returns true if at least one expectation was not met.
    #[must_use]
    pub fn has_unmet(&self) -> bool {
        self.events.iter().any(|(o, _)| *o == Outcome::Unmet)
    }

    /// Returns true if at least one evaluation fault was recorded.
    #[must_use]
    pub fn has_faults(&self) -> bool {
        self.events.iter().any(|(o, _)| *o == Outcome::Fault)
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Moves every event of `other` into this sink.
    pub fn append(&mut self, other: &mut Self) {
        self.events.append(&mut other.events);
    }

    /// Moves only the faults of `other` into this sink.
    pub fn append_faults(&mut self, other: &mut Self) {
        self.events.extend(
            other
                .events
                .drain(..)
                .filter(|(o, _)| *o == Outcome::Fault),
        );
    }

    fn unmet_messages(&self) -> impl Iterator<Item = &str> {
        self.events
            .iter()
            .filter(|(o, _)| *o == Outcome::Unmet)
            .map(|(_, e)| e.message.as_str())
    }

    /// Returns the recorded events in recording order.
    #[must_use]
    pub fn into_violations(self) -> Vec<ViolationEvent> {
        self.events.into_iter().map(|(_, e)| e).collect()
    }
}

type CheckFn<T> = dyn Fn(&T, &CodeModel, &mut ConditionEvents) + Send + Sync;

/// A described check applied to every selected element.
///
/// A single element may surface several independent violations.
pub struct Condition<T> {
    description: String,
    check: Arc<CheckFn<T>>,
}

impl<T> Clone for Condition<T> {
    fn clone(&self) -> Self {
        Self {
            description: self.description.clone(),
            check: Arc::clone(&self.check),
        }
    }
}

impl<T> fmt::Debug for Condition<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Condition").field(&self.description).finish()
    }
}

impl<T: Element> Condition<T> {
    /// Creates a condition from a check function.
    ///
    /// The description reads after "should", e.g. `have a field named 'PATH'`.
    pub fn new<F>(description: impl Into<String>, check: F) -> Self
    where
        F: Fn(&T, &CodeModel, &mut ConditionEvents) + Send + Sync + 'static,
    {
        Self {
            description: description.into(),
            check: Arc::new(check),
        }
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Replaces the description.
    #[must_use]
    pub fn describe_as(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Applies the condition to one element.
    pub fn check(&self, item: &T, model: &CodeModel, events: &mut ConditionEvents) {
        (self.check)(item, model, events);
    }

    /// Both conditions are checked; violations of either are reported.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        let description = format!("{} and {}", self.description, other.description);
        let (a, b) = (self.check, other.check);
        Self {
            description,
            check: Arc::new(move |item: &T, model: &CodeModel, events: &mut ConditionEvents| {
                a(item, model, events);
                b(item, model, events);
            }),
        }
    }

    /// Passes if either condition passes; otherwise reports one combined
    /// violation. Faults of an evaluated side are always reported.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        let description = format!("{} or {}", self.description, other.description);
        let (a, b) = (self.check, other.check);
        Self {
            description,
            check: Arc::new(move |item: &T, model: &CodeModel, events: &mut ConditionEvents| {
                let mut left = ConditionEvents::new();
                a(item, model, &mut left);
                if left.is_empty() {
                    return;
                }
                let mut right = ConditionEvents::new();
                b(item, model, &mut right);
                if left.has_unmet() && right.has_unmet() {
                    let message = left
                        .unmet_messages()
                        .chain(right.unmet_messages())
                        .collect::<Vec<_>>()
                        .join(" and ");
                    events.violated(item, message);
                }
                events.append_faults(&mut left);
                events.append_faults(&mut right);
            }),
        }
    }

    /// Inverts the condition: an element violates when the original passes.
    ///
    /// Faults of the original are reported as they are, never inverted.
    #[must_use]
    pub fn never(self) -> Self {
        let description = format!("not {}", self.description);
        let original = self.description;
        let inner = self.check;
        Self {
            description,
            check: Arc::new(move |item: &T, model: &CodeModel, events: &mut ConditionEvents| {
                let mut outcome = ConditionEvents::new();
                inner(item, model, &mut outcome);
                if outcome.is_empty() {
                    events.violated(item, format!("matches forbidden condition '{original}'"));
                }
                events.append_faults(&mut outcome);
            }),
        }
    }
}

/// Each element must match the predicate.
///
/// Evaluation errors are recorded as faults of the element.
pub fn have<T: Element>(predicate: Predicate<T>) -> Condition<T> {
    let description = infinitive(predicate.description());
    let message = unmet(predicate.description());
    Condition::new(description, move |item: &T, model: &CodeModel, events: &mut ConditionEvents| {
        match predicate.test(item, model) {
            Ok(true) => {}
            Ok(false) => events.violated(item, message.clone()),
            Err(e) => events.fault(item, e.to_string()),
        }
    })
}

/// Each element must not match the predicate.
pub fn not_have<T: Element>(predicate: Predicate<T>) -> Condition<T> {
    let negated = negate_description(predicate.description());
    have(predicate.negate().describe_as(negated))
}
