//! Integration test: building models in memory and evaluating rule sets.

use classlint_core::rule::{classes, no_classes};
use classlint_core::{
    conditions, predicates, Annotation, ClassDescriptor, ClassKind, CodeModel, Config,
    ElementKind, FieldDescriptor, LayeredArchitecture, Modifiers, RuleBox, RuleSet, Severity,
};

fn controller_path_rule() -> RuleBox {
    Box::new(
        classes()
            .that(predicates::resides_in_package("..controller").expect("valid pattern"))
            .should(conditions::have_field_named("PATH"))
            .allow_empty_should(true)
            .named("controllers-declare-path"),
    )
}

fn order_controller() -> ClassDescriptor {
    ClassDescriptor::new("x.controller.OrderController", ClassKind::Class)
}

// ── End-to-end: the PATH field scenario ──

#[test]
fn missing_path_field_is_reported_once() {
    let model = CodeModel::builder().class(order_controller()).build();
    let rules = RuleSet::builder().rule_box(controller_path_rule()).build();

    let report = rules.evaluate(&model);
    assert_eq!(report.violation_count(), 1);
    let violation = &report.outcomes[0].violations[0];
    assert_eq!(violation.element.kind, ElementKind::Class);
    assert_eq!(violation.element.name, "x.controller.OrderController");

    let fixed = CodeModel::builder()
        .class(
            order_controller().with_field(
                FieldDescriptor::new("PATH", "java.lang.String").with_modifiers(Modifiers::constant()),
            ),
        )
        .build();
    assert!(rules.check(&fixed).is_ok());
}

#[test]
fn failure_text_lists_rule_and_element() {
    let model = CodeModel::builder().class(order_controller()).build();
    let rules = RuleSet::builder().rule_box(controller_path_rule()).build();

    let failure = rules.check(&model).expect_err("rule should fail");
    insta::assert_snapshot!(failure.to_string().trim(), @r"
    === classlint: 1 violation(s) in 1 rule(s) ===

    Rule 'controllers-declare-path' was violated (1 time(s)) [error]:
      = classes that reside in a package '..controller' should have a field named 'PATH'
      class <x.controller.OrderController> declares no field named 'PATH'

    Total: 1 error(s), 0 warning(s), 0 info(s) in 1 class(es)
    ");
}

// ── Determinism ──

#[test]
fn repeated_evaluation_is_identical() {
    let mut builder = CodeModel::builder();
    for name in ["Order", "User", "Invoice", "Cart", "Payment"] {
        builder.add(ClassDescriptor::new(
            format!("x.controller.{name}Controller"),
            ClassKind::Class,
        ));
    }
    let model = builder.build();
    let rules = RuleSet::builder()
        .rule_box(controller_path_rule())
        .parallel(true)
        .build();

    let first = rules.evaluate(&model);
    let second = rules.evaluate(&model);
    assert_eq!(first.outcomes[0].violations, second.outcomes[0].violations);
    assert_eq!(first.violation_count(), 5);
}

// ── Empty-selection policy ──

#[test]
fn empty_selection_fails_unless_allowed() {
    let model = CodeModel::builder()
        .class(ClassDescriptor::new("x.service.OrderService", ClassKind::Interface))
        .build();
    let selection = || predicates::resides_in_package("..controller").expect("valid pattern");

    let strict = RuleSet::builder()
        .rule(classes().that(selection()).should(conditions::have_field_named("PATH")))
        .build();
    let report = strict.evaluate(&model);
    assert_eq!(report.violation_count(), 1);
    assert_eq!(report.outcomes[0].violations[0].element.kind, ElementKind::Rule);

    let lenient = RuleSet::builder()
        .rule(
            classes()
                .that(selection())
                .should(conditions::have_field_named("PATH"))
                .allow_empty_should(true),
        )
        .build();
    assert_eq!(lenient.evaluate(&model).violation_count(), 0);

    let configured = RuleSet::builder()
        .rule(classes().that(selection()).should(conditions::have_field_named("PATH")))
        .config(Config::parse("[evaluation]\nallow_empty_should = true").expect("valid config"))
        .build();
    assert_eq!(configured.evaluate(&model).violation_count(), 0);
}

// ── Layered architecture ──

fn layered() -> LayeredArchitecture {
    LayeredArchitecture::builder()
        .layer("Controller", ["..controller"])
        .layer("Service", ["..service"])
        .layer("Repository", ["..repository"])
        .may_not_be_accessed_by_any_layer("Controller")
        .may_only_be_accessed_by("Service", ["Controller"])
        .may_only_be_accessed_by("Repository", ["Service"])
        .build()
        .expect("valid layers")
}

#[test]
fn layered_edges_are_checked_in_both_directions() {
    let model = CodeModel::builder()
        .class(
            order_controller()
                .with_field(FieldDescriptor::new("service", "x.service.OrderService"))
                .with_field(FieldDescriptor::new("repository", "x.repository.OrderRepository")),
        )
        .class(
            ClassDescriptor::new("x.service.OrderService", ClassKind::Class)
                .with_field(FieldDescriptor::new("repository", "x.repository.OrderRepository")),
        )
        .class(
            ClassDescriptor::new("x.repository.OrderRepository", ClassKind::Interface)
                .with_field(FieldDescriptor::new("back", "x.controller.OrderController")),
        )
        .class(ClassDescriptor::new("x.util.Strings", ClassKind::Class))
        .build();

    let report = RuleSet::builder().rule(layered()).build().evaluate(&model);
    let violations = &report.outcomes[0].violations;
    assert_eq!(violations.len(), 2, "{violations:#?}");

    assert_eq!(violations[0].element.name, "x.controller.OrderController");
    assert!(violations[0].message.contains("<x.repository.OrderRepository>"));
    assert!(violations[0].message.contains("layer 'Repository'"));

    assert_eq!(violations[1].element.name, "x.repository.OrderRepository");
    assert!(violations[1].message.contains("<x.controller.OrderController>"));
}

// ── Meta-annotations through the fluent API ──

#[test]
fn meta_annotated_controllers_are_selected() {
    let model = CodeModel::builder()
        .library_class(
            ClassDescriptor::new("org.springframework.web.bind.annotation.RestController", ClassKind::Annotation)
                .annotated(Annotation::new("org.springframework.stereotype.Controller")),
        )
        .class(
            order_controller()
                .annotated(Annotation::new("org.springframework.web.bind.annotation.RestController")),
        )
        .class(ClassDescriptor::new("x.controller.Helper", ClassKind::Class))
        .build();

    let rule = classes()
        .that(predicates::is_meta_annotated_with(
            "org.springframework.stereotype.Controller",
        ))
        .should_be(predicates::has_simple_name_ending_with("Controller"));
    let report = RuleSet::builder().rule(rule).build().evaluate(&model);
    assert_eq!(report.outcomes[0].selected, 1);
    assert!(report.outcomes[0].passed());
}

// ── Reports are machine readable ──

#[test]
fn report_serializes_to_json() {
    let model = CodeModel::builder()
        .class(ClassDescriptor::new("com.app.entity.Stray", ClassKind::Class))
        .build();
    let rule = no_classes()
        .should_be(predicates::resides_in_any_package(&["com.app.entity"]).expect("valid pattern"))
        .named("no-top-level-entity")
        .severity(Severity::Warning);
    let rules = RuleSet::builder().rule(rule).build();
    let report = rules.evaluate(&model);
    assert!(rules.check(&model).is_ok(), "warnings do not fail by default");

    let json = serde_json::to_value(&report).expect("report serializes");
    assert_eq!(json["outcomes"][0]["rule"], "no-top-level-entity");
    assert_eq!(json["outcomes"][0]["severity"], "warning");
    assert_eq!(
        json["outcomes"][0]["violations"][0]["element"]["name"],
        "com.app.entity.Stray"
    );
}
