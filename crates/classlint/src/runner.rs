//! Runner behind `check!()`.
//!
//! `#[doc(hidden)]` and not part of the public API.

use classlint_core::declarative::load_rules_from_toml;
use classlint_core::{CodeModel, Config, RuleBox, RuleSet, Severity};
use classlint_import::ClassFileImporter;
use classlint_rules::{ConventionOptions, Preset};
use std::path::{Path, PathBuf};

/// Config file names to search for, in priority order.
const CONFIG_CANDIDATES: &[&str] = &["classlint.toml", ".classlint.toml"];

/// Runs classlint as part of `cargo test`.
///
/// Reads the config relative to the workspace root, imports the configured
/// locations and evaluates the preset together with the declarative rules.
///
/// # Panics
///
/// Panics with the formatted report if any rule fails at or above the
/// effective `fail_on` severity, and on any configuration or import error.
pub fn run_check(preset: Option<&str>, config_path: Option<&str>, fail_on: Option<&str>) {
    let root = find_project_root();
    let (content, config_dir) = read_config_content(&root, config_path);
    let config = parse_config(&content).resolve_paths(&config_dir);

    let effective_preset = resolve_preset(preset, &config);
    let effective_fail_on = resolve_fail_on(fail_on, &config);

    let model = ClassFileImporter::from_config(&config.import)
        .import()
        .unwrap_or_else(|e| panic!("classlint: import failed: {e}"));

    let base_package = config
        .base_package
        .clone()
        .or_else(|| config.import.packages.first().cloned())
        .unwrap_or_else(|| model.common_package());
    let options = ConventionOptions::from_config(base_package, &config);
    let mut rules = effective_preset
        .rules_with(&options)
        .unwrap_or_else(|e| panic!("classlint: invalid convention options {options:?}: {e}"));
    rules.extend(load_declarative_rules(&content));

    evaluate(rules, config, effective_fail_on, &model);
}

fn evaluate(rules: Vec<RuleBox>, config: Config, fail_on: Severity, model: &CodeModel) {
    let rule_set = RuleSet::builder()
        .config(config)
        .fail_on(fail_on)
        .rules(rules)
        .build();
    if let Err(failure) = rule_set.check(model) {
        panic!("{}", failure.report().format_test_report(fail_on));
    }
}

/// Reads the raw TOML content and returns it with the directory relative
/// import locations are resolved against.
///
/// Returns empty content if no config file is found.
fn read_config_content(root: &Path, explicit_path: Option<&str>) -> (String, PathBuf) {
    let read = |path: &Path| {
        let content = std::fs::read_to_string(path).unwrap_or_else(|e| {
            panic!(
                "classlint: failed to read config from {}: {e}",
                path.display()
            );
        });
        let dir = path.parent().map_or_else(|| root.to_path_buf(), Path::to_path_buf);
        (content, dir)
    };

    if let Some(path) = explicit_path {
        return read(&root.join(path));
    }
    CONFIG_CANDIDATES
        .iter()
        .map(|candidate| root.join(candidate))
        .find(|path| path.exists())
        .map_or_else(|| (String::new(), root.to_path_buf()), |path| read(&path))
}

fn parse_config(content: &str) -> Config {
    Config::parse(content).unwrap_or_else(|e| {
        panic!("classlint: failed to parse config: {e}");
    })
}

fn load_declarative_rules(content: &str) -> Vec<RuleBox> {
    if content.is_empty() {
        return vec![];
    }
    load_rules_from_toml(content)
        .unwrap_or_else(|e| panic!("classlint: declarative config error: {e}"))
}

/// True if the `Cargo.toml` has a `[workspace]` table. Parsed as TOML so
/// comments and strings do not count.
fn has_workspace_section(cargo_toml: &Path) -> bool {
    let Ok(content) = std::fs::read_to_string(cargo_toml) else {
        return false;
    };
    let Ok(table) = content.parse::<toml::Table>() else {
        return false;
    };
    table.contains_key("workspace")
}

/// Walks up from `CARGO_MANIFEST_DIR` to the workspace root.
fn find_project_root() -> PathBuf {
    let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") else {
        return std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    };
    let manifest_path = PathBuf::from(manifest_dir);
    manifest_path
        .ancestors()
        .find(|dir| has_workspace_section(&dir.join("Cargo.toml")))
        .map_or_else(|| manifest_path.clone(), Path::to_path_buf)
}

/// Macro arg > config > `spring-layered`.
fn resolve_preset(macro_arg: Option<&str>, config: &Config) -> Preset {
    macro_arg
        .or(config.preset.as_deref())
        .map_or_else(Preset::default, |name| {
            name.parse()
                .unwrap_or_else(|e| panic!("classlint: {e}"))
        })
}

/// Macro arg > config > `error`.
fn resolve_fail_on(macro_arg: Option<&str>, config: &Config) -> Severity {
    match macro_arg {
        Some(name) => name
            .parse()
            .unwrap_or_else(|e| panic!("classlint: {e}")),
        None => config.fail_on.unwrap_or(Severity::Error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use classlint_core::{ClassDescriptor, ClassKind, Rule};

    #[test]
    fn resolve_preset_defaults_to_spring_layered() {
        assert_eq!(resolve_preset(None, &Config::default()), Preset::SpringLayered);
    }

    #[test]
    fn resolve_preset_macro_arg_takes_precedence() {
        let mut config = Config::default();
        config.preset = Some("naming".to_string());
        assert_eq!(resolve_preset(None, &config), Preset::Naming);
        assert_eq!(resolve_preset(Some("layering"), &config), Preset::Layering);
    }

    #[test]
    #[should_panic(expected = "unknown preset")]
    fn resolve_preset_invalid_panics() {
        resolve_preset(Some("recommended"), &Config::default());
    }

    #[test]
    fn resolve_fail_on_macro_arg_overrides_config() {
        let mut config = Config::default();
        assert_eq!(resolve_fail_on(None, &config), Severity::Error);

        config.fail_on = Some(Severity::Info);
        assert_eq!(resolve_fail_on(None, &config), Severity::Info);
        assert_eq!(resolve_fail_on(Some("error"), &config), Severity::Error);
    }

    #[test]
    #[should_panic(expected = "unknown severity")]
    fn resolve_fail_on_invalid_panics() {
        resolve_fail_on(Some("critical"), &Config::default());
    }

    #[test]
    fn config_sections_do_not_produce_declarative_rules() {
        assert!(load_declarative_rules("").is_empty());
        let toml = r#"
preset = "naming"

[import]
locations = ["build/classes"]
"#;
        assert!(load_declarative_rules(toml).is_empty());
    }

    #[test]
    fn declarative_sections_produce_rules() {
        let toml = r#"
preset = "layering"

[[layers]]
name = "Web"
packages = ["..web.."]

[[layers]]
name = "Domain"
packages = ["..domain.."]

[[layer-access]]
layer = "Web"
accessed-by = "none"

[[naming]]
name = "dto-suffix"
package = "..dto"
pattern = ".*Dto"
"#;
        let rules = load_declarative_rules(toml);
        let names: Vec<&str> = rules.iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["declared-layers", "dto-suffix"]);
        assert_eq!(parse_config(toml).preset.as_deref(), Some("layering"));
    }

    #[test]
    fn missing_config_means_empty_content_at_root() {
        let root = Path::new("/nonexistent-classlint-root");
        let (content, dir) = read_config_content(root, None);
        assert!(content.is_empty());
        assert_eq!(dir, root);
    }

    #[test]
    fn project_root_is_the_workspace() {
        let root = find_project_root();
        assert!(has_workspace_section(&root.join("Cargo.toml")));
    }

    #[test]
    #[should_panic(expected = "Rule 'declared-layers' was violated")]
    fn failing_rules_panic_with_the_report() {
        let Ok(rules) = classlint_core::declarative::load_rules_from_toml(
            r#"
[[layers]]
name = "Web"
packages = ["..web.."]

[[layers]]
name = "Domain"
packages = ["..domain.."]

[[layer-access]]
layer = "Domain"
may-access = "none"
"#,
        ) else {
            panic!("valid declarative rules rejected");
        };
        let model = CodeModel::builder()
            .class(ClassDescriptor::new("app.web.Page", ClassKind::Class))
            .class(
                ClassDescriptor::new("app.domain.Order", ClassKind::Class)
                    .extends("app.web.Page"),
            )
            .build();
        evaluate(rules, Config::default(), Severity::Error, &model);
    }
}
