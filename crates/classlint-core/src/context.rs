//! Evaluation context passed to rules.

use crate::model::CodeModel;

/// What a rule sees while it is evaluated.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'m> {
    /// The fully built model.
    pub model: &'m CodeModel,
    /// Empty-selection policy for rules that do not set their own.
    pub allow_empty_default: bool,
}

impl<'m> RuleContext<'m> {
    /// Creates a context that fails rules with empty selections.
    #[must_use]
    pub fn new(model: &'m CodeModel) -> Self {
        Self {
            model,
            allow_empty_default: false,
        }
    }

    /// Sets the default empty-selection policy.
    #[must_use]
    pub fn allow_empty_default(mut self, allow: bool) -> Self {
        self.allow_empty_default = allow;
        self
    }
}
