//! List rules command implementation.

use anyhow::{Context, Result};
use classlint_core::Rule;
use classlint_rules::{all_rules, Preset};

/// Package used to instantiate the base-package dependent rules for display.
const SAMPLE_BASE_PACKAGE: &str = "com.example";

/// Runs the list-rules command.
pub fn run() -> Result<()> {
    let rules = all_rules(SAMPLE_BASE_PACKAGE).context("Failed to build built-in rules")?;

    println!("Available rules:\n");
    println!("{:<32} {:<8} Description", "Name", "Severity");
    println!("{}", "-".repeat(100));
    for rule in &rules {
        println!(
            "{:<32} {:<8} {}",
            rule.name(),
            rule.default_severity(),
            rule.description()
        );
    }

    println!("\nPresets:");
    for preset in Preset::ALL {
        println!("  {:<16} - {}", preset.name(), preset.summary());
    }

    println!("\nDeclarative [[layers]] and [[naming]] rules are read from classlint.toml.");
    println!("\nUse --rules to run a subset, e.g.:");
    println!("  classlint check --rules service-naming,layers-top-to-bottom");

    Ok(())
}
