//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# classlint configuration

# Built-in preset: "spring-layered" (default), "naming" or "layering"
preset = "spring-layered"

# Root package of the application (default: derived from the classes)
# base_package = "com.example.app"

# Fail when violations reach this severity: "error", "warning" or "info"
fail_on = "error"

[import]
# Class directories or .jar/.zip archives to analyze
locations = ["build/classes/java/main"]

# Resolution-only locations (framework jars for meta-annotations)
# libraries = ["build/libs/dependencies.jar"]

# Only analyze classes under these packages
# packages = ["com.example.app"]

# Glob patterns of artifacts to skip
exclude = ["**/generated/**"]

[evaluation]
parallel = false
# Rules selecting nothing pass instead of failing
allow_empty_should = false

# Per-rule settings
# [rules.constant-fields]
# severity = "warning"

# [rules.component-fields]
# enabled = false

# [rules.exception-handlers]
# base-exception = "com.example.app.common.exception.AppException"

# [rules.no-top-level-layer-packages]
# packages = ["controller", "service", "repository"]

# Declarative layers
# [[layers]]
# name = "Web"
# packages = ["..web.."]
#
# [[layers]]
# name = "Persistence"
# packages = ["..persistence.."]
#
# [[layer-access]]
# layer = "Persistence"
# accessed-by = ["Web"]

# Declarative naming conventions
# [[naming]]
# name = "dto-naming"
# package = "..dto"
# pattern = ".*Dto"
# kind = "record"
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new("classlint.toml");

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;

    println!("Created classlint.toml");
    println!("\nNext steps:");
    println!("  1. Point [import] locations at your compiled classes");
    println!("  2. Run: classlint check");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use classlint_core::declarative::load_rules_from_toml;
    use classlint_core::Config;

    #[test]
    fn template_is_a_valid_config() {
        let Ok(config) = Config::parse(DEFAULT_CONFIG) else {
            panic!("template does not parse");
        };
        assert_eq!(config.preset.as_deref(), Some("spring-layered"));
        assert_eq!(config.import.locations.len(), 1);

        let Ok(rules) = load_rules_from_toml(DEFAULT_CONFIG) else {
            panic!("template declares invalid rules");
        };
        assert!(rules.is_empty());
    }

    #[test]
    fn uncommented_examples_are_valid_rules() {
        let uncommented: String = DEFAULT_CONFIG
            .lines()
            .filter_map(|line| match line.strip_prefix("# ") {
                Some(toml) if toml.starts_with('[') || toml.contains(" = ") => Some(toml),
                Some(_) => None,
                None => Some(line),
            })
            .filter(|line| !line.starts_with('#'))
            .collect::<Vec<_>>()
            .join("\n");
        let Ok(rules) = load_rules_from_toml(&uncommented) else {
            panic!("uncommented template declares invalid rules");
        };
        assert_eq!(rules.len(), 2);
    }
}
