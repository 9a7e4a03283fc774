//! Report rendering for the `check` command.

use anyhow::Result;
use classlint_core::{Report, Severity};
use std::fmt::Write;

use crate::OutputFormat;

/// Print the report in the specified format.
pub fn print(report: &Report, format: OutputFormat, fail_on: Severity) -> Result<()> {
    let rendered = match format {
        OutputFormat::Text => render_text(report, fail_on),
        OutputFormat::Json => serde_json::to_string_pretty(report)?,
        OutputFormat::Compact => render_compact(report),
    };
    println!("{rendered}");
    Ok(())
}

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "\x1b[31merror\x1b[0m",
        Severity::Warning => "\x1b[33mwarning\x1b[0m",
        Severity::Info => "\x1b[34minfo\x1b[0m",
    }
}

fn render_text(report: &Report, fail_on: Severity) -> String {
    let mut out = String::new();
    for outcome in report.outcomes.iter().filter(|o| !o.passed()) {
        let _ = writeln!(
            out,
            "{}[{}]: {} ({} violation(s))",
            severity_label(outcome.severity),
            outcome.rule,
            outcome.description,
            outcome.violations.len()
        );
        for violation in &outcome.violations {
            let _ = writeln!(out, "  --> {} <{}>", violation.element.kind, violation.element.name);
            let _ = writeln!(out, "      {}", violation.message);
        }
        let _ = writeln!(out);
    }

    let (errors, warnings, infos) = report.count_by_severity();
    let summary_color = if report.has_failures_at(fail_on) {
        "\x1b[31m"
    } else if errors + warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };
    let _ = write!(
        out,
        "{summary_color}Found {errors} error(s), {warnings} warning(s), {infos} info(s) in {} class(es)\x1b[0m",
        report.classes_checked
    );
    out
}

fn render_compact(report: &Report) -> String {
    let mut out = String::new();
    for outcome in &report.outcomes {
        for violation in &outcome.violations {
            if !out.is_empty() {
                out.push('\n');
            }
            let _ = write!(
                out,
                "{}: {} [{}] {}",
                violation.element.name, outcome.severity, outcome.rule, violation.message
            );
        }
    }
    out
}
