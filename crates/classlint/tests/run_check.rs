//! `run_check` against class files written to a temporary project.

use classlint::{Annotation, ClassDescriptor, ClassFileWriter, ClassKind, FieldDescriptor};
use std::path::Path;
use tempfile::TempDir;

const BASE: &str = "com.example.archunitrules";

fn write_class(root: &Path, class: &ClassDescriptor) {
    let bytes = ClassFileWriter::new()
        .write(class)
        .expect("fixture class should encode");
    let path = root.join(format!("{}.class", class.name.as_str().replace('.', "/")));
    std::fs::create_dir_all(path.parent().expect("class path has a parent"))
        .expect("package directories should be created");
    std::fs::write(path, bytes).expect("class file should be written");
}

/// A project whose repository is reached straight from a controller.
fn project(config: &str) -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    let classes = dir.path().join("build/classes");
    write_class(
        &classes,
        &ClassDescriptor::new(format!("{BASE}.article.controller.ArticleController"), ClassKind::Class)
            .annotated(Annotation::new("org.springframework.web.bind.annotation.RestController"))
            .with_field(FieldDescriptor::new(
                "repository",
                format!("{BASE}.article.repository.ArticleRepository"),
            )),
    );
    write_class(
        &classes,
        &ClassDescriptor::new(
            format!("{BASE}.article.repository.ArticleRepository"),
            ClassKind::Interface,
        ),
    );
    std::fs::write(dir.path().join("classlint.toml"), config).expect("config should be written");
    dir
}

fn config_path(dir: &TempDir) -> String {
    dir.path()
        .join("classlint.toml")
        .to_str()
        .expect("temp path is UTF-8")
        .to_string()
}

#[test]
#[should_panic(expected = "Rule 'layers-top-to-bottom' was violated")]
fn layer_violation_fails_the_test() {
    let dir = project(
        r#"
[import]
locations = ["build/classes"]
"#,
    );
    classlint::__internal::run_check(Some("layering"), Some(&config_path(&dir)), None);
}

#[test]
fn downgraded_rule_passes_at_error_threshold() {
    let dir = project(
        r#"
[import]
locations = ["build/classes"]

[rules.layers-top-to-bottom]
severity = "warning"
"#,
    );
    classlint::__internal::run_check(Some("layering"), Some(&config_path(&dir)), None);
}

#[test]
fn disabled_rule_is_skipped() {
    let dir = project(
        r#"
preset = "layering"
fail_on = "info"

[import]
locations = ["build/classes"]

[rules.layers-top-to-bottom]
enabled = false
"#,
    );
    classlint::__internal::run_check(None, Some(&config_path(&dir)), None);
}

#[test]
#[should_panic(expected = "Rule 'web-naming' was violated")]
fn declarative_rules_run_with_the_preset() {
    let dir = project(
        r#"
[import]
locations = ["build/classes"]

[[naming]]
name = "web-naming"
package = "..controller"
pattern = ".*Endpoint"
"#,
    );
    classlint::__internal::run_check(Some("layering"), Some(&config_path(&dir)), Some("warning"));
}
