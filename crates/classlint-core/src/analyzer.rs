//! Runs an ordered set of rules against one code model.

use crate::config::Config;
use crate::context::RuleContext;
use crate::model::CodeModel;
use crate::rule::{Rule, RuleBox};
use crate::types::{AggregateFailure, Report, RuleOutcome, Severity};
use rayon::prelude::*;
use tracing::{debug, info};

/// Builder for configuring a [`RuleSet`].
#[derive(Default)]
pub struct RuleSetBuilder {
    rules: Vec<RuleBox>,
    config: Option<Config>,
    parallel: Option<bool>,
    fail_on: Option<Severity>,
}

impl RuleSetBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds several boxed rules.
    #[must_use]
    pub fn rules(mut self, rules: impl IntoIterator<Item = RuleBox>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Sets the configuration (rule toggles, severities, evaluation options).
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Evaluates rules on the rayon pool (overrides the configuration).
    #[must_use]
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = Some(parallel);
        self
    }

    /// Severity at which [`RuleSet::check`] fails (overrides the configuration).
    #[must_use]
    pub fn fail_on(mut self, severity: Severity) -> Self {
        self.fail_on = Some(severity);
        self
    }

    /// Builds the rule set.
    #[must_use]
    pub fn build(self) -> RuleSet {
        let config = self.config.unwrap_or_default();
        let parallel = self.parallel.unwrap_or(config.evaluation.parallel);
        let fail_on = self
            .fail_on
            .or(config.fail_on)
            .unwrap_or(Severity::Error);
        RuleSet {
            rules: self.rules,
            config,
            parallel,
            fail_on,
        }
    }
}

/// An ordered list of rules plus the policy for evaluating them.
///
/// Use [`RuleSet::builder()`] to construct an instance.
pub struct RuleSet {
    rules: Vec<RuleBox>,
    config: Config,
    parallel: bool,
    fail_on: Severity,
}

impl RuleSet {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> RuleSetBuilder {
        RuleSetBuilder::new()
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Returns the failure threshold.
    #[must_use]
    pub fn fail_on(&self) -> Severity {
        self.fail_on
    }

    /// Evaluates every enabled rule.
    ///
    /// Rules are independent: each one always runs and reports, and the
    /// outcomes keep rule order even when evaluated in parallel.
    #[must_use]
    pub fn evaluate(&self, model: &CodeModel) -> Report {
        let enabled: Vec<&dyn Rule> = self
            .rules
            .iter()
            .map(|r| &**r)
            .filter(|r| {
                let on = self.config.is_rule_enabled(r.name());
                if !on {
                    debug!("Rule '{}' disabled by configuration", r.name());
                }
                on
            })
            .collect();

        info!(
            "Evaluating {} rule(s) against {} class(es){}",
            enabled.len(),
            model.len(),
            if self.parallel { " in parallel" } else { "" }
        );

        let ctx = RuleContext::new(model)
            .allow_empty_default(self.config.evaluation.allow_empty_should);

        let outcomes: Vec<RuleOutcome> = if self.parallel {
            enabled.par_iter().map(|r| self.run(*r, &ctx)).collect()
        } else {
            enabled.iter().map(|r| self.run(*r, &ctx)).collect()
        };

        let report = Report {
            outcomes,
            classes_checked: model.len(),
        };
        info!(
            "Evaluation finished: {} violation(s) in {} rule(s)",
            report.violation_count(),
            report.outcomes.iter().filter(|o| !o.passed()).count()
        );
        report
    }

    /// Evaluates every enabled rule and fails if any reaches the threshold.
    ///
    /// # Errors
    ///
    /// Returns [`AggregateFailure`] listing every failing rule and all of
    /// its violations.
    pub fn check(&self, model: &CodeModel) -> Result<Report, AggregateFailure> {
        let report = self.evaluate(model);
        if report.has_failures_at(self.fail_on) {
            Err(AggregateFailure::new(report, self.fail_on))
        } else {
            Ok(report)
        }
    }

    fn run(&self, rule: &dyn Rule, ctx: &RuleContext<'_>) -> RuleOutcome {
        let evaluation = rule.evaluate(ctx);
        let severity = self
            .config
            .rule_severity(rule.name())
            .unwrap_or_else(|| rule.default_severity());
        RuleOutcome {
            rule: rule.name().to_string(),
            description: rule.description().to_string(),
            severity,
            selected: evaluation.selected,
            violations: evaluation.violations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::have_field_named;
    use crate::descriptor::{ClassDescriptor, ClassKind};
    use crate::predicates::resides_in_package;
    use crate::rule::classes;

    fn model() -> CodeModel {
        CodeModel::builder()
            .class(ClassDescriptor::new("x.controller.OrderController", ClassKind::Class))
            .class(ClassDescriptor::new("x.controller.UserController", ClassKind::Class))
            .build()
    }

    fn path_rule(name: &str) -> RuleBox {
        let Ok(selection) = resides_in_package("..controller") else {
            panic!("valid pattern rejected");
        };
        Box::new(
            classes()
                .that(selection)
                .should(have_field_named("PATH"))
                .named(name),
        )
    }

    #[test]
    fn evaluates_all_rules_in_order() {
        let set = RuleSet::builder()
            .rule_box(path_rule("first"))
            .rule_box(path_rule("second"))
            .build();
        let report = set.evaluate(&model());
        let names: Vec<&str> = report.outcomes.iter().map(|o| o.rule.as_str()).collect();
        assert_eq!(names, ["first", "second"]);
        assert_eq!(report.violation_count(), 4);
        assert_eq!(report.classes_checked, 2);
    }

    #[test]
    fn parallel_evaluation_keeps_rule_order() {
        let set = RuleSet::builder()
            .rules((0..16).map(|i| path_rule(&format!("rule-{i}"))))
            .parallel(true)
            .build();
        let report = set.evaluate(&model());
        for (i, outcome) in report.outcomes.iter().enumerate() {
            assert_eq!(outcome.rule, format!("rule-{i}"));
        }
    }

    #[test]
    fn config_disables_and_downgrades_rules() {
        let Ok(config) = Config::parse(
            r#"
[rules.first]
enabled = false

[rules.second]
severity = "warning"
"#,
        ) else {
            panic!("valid config rejected");
        };
        let set = RuleSet::builder()
            .rule_box(path_rule("first"))
            .rule_box(path_rule("second"))
            .config(config)
            .build();
        let model = model();
        let report = set.evaluate(&model);
        assert_eq!(report.outcomes.len(), 1);
        assert_eq!(report.outcomes[0].severity, Severity::Warning);
        assert!(set.check(&model).is_ok());
    }

    #[test]
    fn check_fails_with_every_violation() {
        let set = RuleSet::builder().rule_box(path_rule("paths")).build();
        let Err(failure) = set.check(&model()) else {
            panic!("check should fail");
        };
        let text = failure.to_string();
        assert!(text.contains("x.controller.OrderController"));
        assert!(text.contains("x.controller.UserController"));
    }
}
