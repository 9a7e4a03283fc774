//! Composable, described predicates over model elements.

use crate::error::EvaluationError;
use crate::model::CodeModel;
use std::fmt;
use std::ops::Not;
use std::sync::Arc;

type TestFn<T> = dyn Fn(&T, &CodeModel) -> Result<bool, EvaluationError> + Send + Sync;

/// A boolean test over an element, carrying a human-readable description.
///
/// Descriptions are phrased to follow "classes that ...", e.g.
/// `are interfaces` or `reside in a package '..controller'`.
pub struct Predicate<T> {
    description: String,
    test: Arc<TestFn<T>>,
}

impl<T> Clone for Predicate<T> {
    fn clone(&self) -> Self {
        Self {
            description: self.description.clone(),
            test: Arc::clone(&self.test),
        }
    }
}

impl<T> fmt::Debug for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Predicate").field(&self.description).finish()
    }
}

impl<T: 'static> Predicate<T> {
    /// Creates an infallible predicate.
    pub fn new<F>(description: impl Into<String>, test: F) -> Self
    where
        F: Fn(&T, &CodeModel) -> bool + Send + Sync + 'static,
    {
        Self {
            description: description.into(),
            test: Arc::new(move |item: &T, model: &CodeModel| Ok(test(item, model))),
        }
    }

    /// Creates a predicate that may fail for a given element.
    pub fn try_new<F>(description: impl Into<String>, test: F) -> Self
    where
        F: Fn(&T, &CodeModel) -> Result<bool, EvaluationError> + Send + Sync + 'static,
    {
        Self {
            description: description.into(),
            test: Arc::new(test),
        }
    }

    /// Matches every element.
    #[must_use]
    pub fn always() -> Self {
        Self::new("are any", |_, _| true)
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

    /// Evaluates the predicate.
    ///
    /// # Errors
    ///
    /// Propagates [`EvaluationError`] from the underlying test.
    pub fn test(&self, item: &T, model: &CodeModel) -> Result<bool, EvaluationError> {
        (self.test)(item, model)
    }

    /// Both predicates must hold; the right side is skipped when the left fails.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        let description = format!("{} and {}", self.description, other.description);
        let (a, b) = (self.test, other.test);
        Self {
            description,
            test: Arc::new(move |item: &T, model: &CodeModel| Ok(a(item, model)? && b(item, model)?)),
        }
    }

    /// Either predicate must hold; the right side is skipped when the left holds.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        let description = format!("{} or {}", self.description, other.description);
        let (a, b) = (self.test, other.test);
        Self {
            description,
            test: Arc::new(move |item: &T, model: &CodeModel| Ok(a(item, model)? || b(item, model)?)),
        }
    }

    /// Inverts the predicate. Evaluation errors pass through unchanged.
    #[must_use]
    pub fn negate(self) -> Self {
        let description = negate_description(&self.description);
        let inner = self.test;
        Self {
            description,
            test: Arc::new(move |item: &T, model: &CodeModel| inner(item, model).map(|b| !b)),
        }
    }
}

impl<T: 'static> Not for Predicate<T> {
    type Output = Self;

    fn not(self) -> Self {
        self.negate()
    }
}

/// Turns `are X` into `are not X` and `have X` into `do not have X`.
pub(crate) fn negate_description(description: &str) -> String {
    if let Some(rest) = description.strip_prefix("are not ") {
        return format!("are {rest}");
    }
    if let Some(rest) = description.strip_prefix("are ") {
        return format!("are not {rest}");
    }
    if let Some(rest) = description.strip_prefix("do not ") {
        return rest.to_string();
    }
    if description.contains(" and ") || description.contains(" or ") {
        return format!("do not ({description})");
    }
    format!("do not {description}")
}

/// Turns a predicate description into the infinitive used after "should".
pub(crate) fn infinitive(description: &str) -> String {
    if let Some(rest) = description.strip_prefix("are not ") {
        return format!("not be {rest}");
    }
    if let Some(rest) = description.strip_prefix("are ") {
        return format!("be {rest}");
    }
    description.to_string()
}

/// Describes a single element failing the predicate: `is not public`,
/// `does not have name 'PATH'`.
pub(crate) fn unmet(description: &str) -> String {
    if let Some(rest) = description.strip_prefix("are not ") {
        return format!("is {rest}");
    }
    if let Some(rest) = description.strip_prefix("are ") {
        return format!("is not {rest}");
    }
    if let Some(rest) = description.strip_prefix("do not ") {
        return format!("does {rest}");
    }
    format!("does not {description}")
}
