//! Errors raised while defining and evaluating rules.

use crate::package::PatternError;

/// A fault while evaluating a predicate against one element.
///
/// Never aborts a run: the evaluator turns it into a violation of the rule
/// being evaluated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvaluationError {
    /// An annotation property is absent or has the wrong shape.
    #[error("property '{property}' of @{annotation} cannot be inspected: {reason}")]
    PropertyType {
        /// Annotation type.
        annotation: String,
        /// Property name.
        property: String,
        /// What was wrong.
        reason: String,
    },

    /// A pattern derived from the element could not be compiled.
    #[error("invalid pattern '{pattern}': {reason}")]
    Pattern {
        /// The pattern text.
        pattern: String,
        /// Compiler message.
        reason: String,
    },
}

/// A rule that cannot be constructed.
#[derive(Debug, thiserror::Error)]
pub enum DefinitionError {
    /// Invalid package pattern.
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// Invalid regular expression.
    #[error("invalid regular expression: {0}")]
    Regex(#[from] regex::Error),

    /// A layer constraint names a layer that was never declared.
    #[error("unknown layer '{name}'")]
    UnknownLayer {
        /// Referenced layer name.
        name: String,
    },

    /// The same layer was declared twice.
    #[error("layer '{name}' is declared more than once")]
    DuplicateLayer {
        /// Layer name.
        name: String,
    },

    /// A layer was declared without package patterns.
    #[error("layer '{name}' has no package patterns")]
    EmptyLayer {
        /// Layer name.
        name: String,
    },
}
