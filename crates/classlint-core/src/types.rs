//! Violation events, per-rule outcomes and the aggregate report.

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity level for rule violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail the check.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(Self::Info),
            "warning" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            other => Err(format!(
                "unknown severity '{other}' (expected error, warning or info)"
            )),
        }
    }
}

/// What kind of element a violation is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// A class.
    Class,
    /// A field.
    Field,
    /// A method or constructor.
    Method,
    /// The rule itself (empty selection).
    Rule,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Class => "class",
            Self::Field => "field",
            Self::Method => "method",
            Self::Rule => "rule",
        };
        f.write_str(s)
    }
}

/// Reference to the offending element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementRef {
    /// Element kind.
    pub kind: ElementKind,
    /// Fully qualified element name (`x.Foo`, `x.Foo.PATH`, `x.Foo.bar(int)`).
    pub name: String,
}

impl ElementRef {
    /// Creates an element reference.
    #[must_use]
    pub fn new(kind: ElementKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.kind, self.name)
    }
}

/// One reported breach of a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationEvent {
    /// Offending element.
    pub element: ElementRef,
    /// Human-readable explanation.
    pub message: String,
}

impl ViolationEvent {
    /// Creates a violation event.
    #[must_use]
    pub fn new(element: ElementRef, message: impl Into<String>) -> Self {
        Self {
            element,
            message: message.into(),
        }
    }
}

impl fmt::Display for ViolationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.element, self.message)
    }
}

/// The result of evaluating one rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleOutcome {
    /// Rule name.
    pub rule: String,
    /// Rule description (selection plus condition, and the reason if given).
    pub description: String,
    /// Effective severity.
    pub severity: Severity,
    /// Number of selected elements.
    pub selected: usize,
    /// Violations in evaluation order.
    pub violations: Vec<ViolationEvent>,
}

impl RuleOutcome {
    /// Returns true if the rule reported nothing.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Result of evaluating a rule set against one code model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Report {
    /// One outcome per evaluated rule, in rule order.
    pub outcomes: Vec<RuleOutcome>,
    /// Number of analyzed classes in the model.
    pub classes_checked: usize,
}

impl Report {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of violation events.
    #[must_use]
    pub fn violation_count(&self) -> usize {
        self.outcomes.iter().map(|o| o.violations.len()).sum()
    }

    /// Checks if any rule at or above the given severity reported violations.
    #[must_use]
    pub fn has_failures_at(&self, severity: Severity) -> bool {
        self.failures(severity).next().is_some()
    }

    /// Outcomes with violations at or above the given severity.
    pub fn failures(&self, severity: Severity) -> impl Iterator<Item = &RuleOutcome> {
        self.outcomes
            .iter()
            .filter(move |o| o.severity >= severity && !o.passed())
    }

    /// Counts violation events by severity: `(errors, warnings, infos)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let count = |severity: Severity| {
            self.outcomes
                .iter()
                .filter(|o| o.severity == severity)
                .map(|o| o.violations.len())
                .sum::<usize>()
        };
        (
            count(Severity::Error),
            count(Severity::Warning),
            count(Severity::Info),
        )
    }

    /// Formats the failing rules as a test failure report.
    ///
    /// Lists every failing rule with each violation's element and message.
    #[must_use]
    pub fn format_test_report(&self, fail_on: Severity) -> String {
        use std::fmt::Write;

        let failing: Vec<&RuleOutcome> = self.failures(fail_on).collect();
        let total: usize = failing.iter().map(|o| o.violations.len()).sum();

        let mut report = String::new();
        let _ = writeln!(
            report,
            "\n=== classlint: {total} violation(s) in {} rule(s) ===\n",
            failing.len()
        );

        for outcome in &failing {
            let _ = writeln!(
                report,
                "Rule '{}' was violated ({} time(s)) [{}]:",
                outcome.rule,
                outcome.violations.len(),
                outcome.severity
            );
            if outcome.description != outcome.rule {
                let _ = writeln!(report, "  = {}", outcome.description);
            }
            for v in &outcome.violations {
                let _ = writeln!(report, "  {v}");
            }
            let _ = writeln!(report);
        }

        let (errors, warnings, infos) = self.count_by_severity();
        let _ = writeln!(
            report,
            "Total: {errors} error(s), {warnings} warning(s), {infos} info(s) in {} class(es)",
            self.classes_checked
        );

        report
    }

    /// Appends the outcomes of another report.
    pub fn extend(&mut self, other: Self) {
        self.outcomes.extend(other.outcomes);
        self.classes_checked = self.classes_checked.max(other.classes_checked);
    }
}

/// Raised by [`RuleSet::check`](crate::RuleSet::check) when one or more rules fail.
///
/// Carries the full report so callers can still inspect every outcome.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{rendered}")]
#[diagnostic(
    code(classlint::rules_violated),
    help("fix the listed elements or relax the rule configuration in classlint.toml")
)]
pub struct AggregateFailure {
    rendered: String,
    report: Report,
}

impl AggregateFailure {
    /// Builds the failure from a report and the severity threshold that failed it.
    #[must_use]
    pub fn new(report: Report, fail_on: Severity) -> Self {
        Self {
            rendered: report.format_test_report(fail_on),
            report,
        }
    }

    /// The report that caused the failure.
    #[must_use]
    pub fn report(&self) -> &Report {
        &self.report
    }

    /// Consumes the failure, returning the report.
    #[must_use]
    pub fn into_report(self) -> Report {
        self.report
    }
}
