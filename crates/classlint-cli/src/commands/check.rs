//! Check command implementation.

use anyhow::{bail, Context, Result};
use classlint_core::declarative::load_rules_from_toml;
use classlint_core::{CodeModel, Config, Rule, RuleBox, RuleSet};
use classlint_import::ClassFileImporter;
use classlint_rules::{ConventionOptions, Preset};
use std::collections::HashSet;
use std::path::PathBuf;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Command-line inputs of `classlint check`.
#[derive(Debug, Default)]
pub struct CheckArgs {
    /// Replace the configured import locations when non-empty.
    pub locations: Vec<PathBuf>,
    /// Added to the configured package filter.
    pub packages: Vec<String>,
    /// Overrides `base_package`.
    pub base_package: Option<String>,
    /// Comma-separated rule names.
    pub rules: Option<String>,
    /// Added to the configured exclude globs.
    pub exclude: Vec<String>,
}

/// Runs the check command.
///
/// Returns `true` when the report fails at the configured `fail_on`
/// severity.
pub fn run(args: CheckArgs, format: OutputFormat, source: &ConfigSource) -> Result<bool> {
    let content = match source.path() {
        None => String::new(),
        Some(p) => {
            if source.is_global() {
                tracing::info!("Using global config: {}", p.display());
            }
            std::fs::read_to_string(p)
                .with_context(|| format!("Failed to read config: {}", p.display()))?
        }
    };

    let cwd = std::env::current_dir().context("Cannot determine working directory")?;
    let config = Config::parse(&content)
        .context("Failed to parse config")?
        .resolve_paths(&source.base_dir(&cwd));
    let config = merge_args(config, &args);

    let model = ClassFileImporter::from_config(&config.import)
        .import()
        .context("Import failed")?;

    let preset: Preset = config
        .preset
        .as_deref()
        .map(str::parse::<Preset>)
        .transpose()?
        .unwrap_or_default();
    let base_package = base_package(&config, &model);
    if base_package.is_empty() && preset == Preset::SpringLayered {
        bail!(
            "Cannot derive the base package from the imported classes; \
             set base_package in classlint.toml or pass --base-package"
        );
    }
    tracing::debug!("Preset {preset} with base package '{base_package}'");

    let options = ConventionOptions::from_config(base_package, &config);
    let mut rules = preset
        .rules_with(&options)
        .context("Failed to build built-in rules")?;
    if !content.is_empty() {
        rules.extend(load_rules_from_toml(&content).context("Invalid declarative rules")?);
    }
    if let Some(filter) = args.rules.as_deref() {
        let names: Vec<&str> = filter.split(',').map(str::trim).collect();
        rules = filter_rules(rules, &names);
    }

    let rule_set = RuleSet::builder().config(config).rules(rules).build();
    tracing::info!(
        "Checking {} class(es) with {} rule(s)",
        model.len(),
        rule_set.rule_count()
    );

    let report = rule_set.evaluate(&model);
    super::output::print(&report, format, rule_set.fail_on())?;

    Ok(report.has_failures_at(rule_set.fail_on()))
}

/// Applies command-line overrides on top of the loaded configuration.
fn merge_args(mut config: Config, args: &CheckArgs) -> Config {
    if !args.locations.is_empty() {
        config.import.locations.clone_from(&args.locations);
    }
    config.import.packages.extend(args.packages.iter().cloned());
    config.import.exclude.extend(args.exclude.iter().cloned());
    if args.base_package.is_some() {
        config.base_package.clone_from(&args.base_package);
    }
    config
}

/// `base_package`, else the first package filter, else the package shared
/// by every analyzed class.
fn base_package(config: &Config, model: &CodeModel) -> String {
    config
        .base_package
        .clone()
        .or_else(|| config.import.packages.first().cloned())
        .unwrap_or_else(|| model.common_package())
}

fn filter_rules(rules: Vec<RuleBox>, names: &[&str]) -> Vec<RuleBox> {
    {
        let known: HashSet<&str> = rules.iter().map(|r| r.name()).collect();
        for name in names.iter().filter(|n| !known.contains(**n)) {
            tracing::warn!("Unknown rule: {}", name);
        }
    }
    rules
        .into_iter()
        .filter(|r| names.contains(&r.name()))
        .collect()
}
