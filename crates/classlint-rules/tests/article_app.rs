//! Integration test: the built-in conventions against a small Spring
//! article service.
//!
//! The model mirrors what the importer produces for the compiled service:
//! application classes are analyzed, framework annotation types are library
//! classes so that meta-annotations resolve.

use classlint_core::{
    Annotation, AnnotationValue, ClassDescriptor, ClassKind, CodeModel, CodeModelBuilder,
    FieldDescriptor, MethodDescriptor, Modifiers, Parameter, Report, RuleSet, Severity,
    Visibility,
};
use classlint_rules::annotations::{
    COMPONENT, CONTROLLER, CONTROLLER_ADVICE, ENTITY, EXCEPTION_HANDLER, REQUEST_BODY, SERVICE,
    TABLE, VALID,
};
use classlint_rules::Preset;

const BASE: &str = "com.example.archunitrules";
const REST_CONTROLLER: &str = "org.springframework.web.bind.annotation.RestController";
const NOT_BLANK: &str = "jakarta.validation.constraints.NotBlank";

fn app(name: &str) -> String {
    format!("{BASE}.article.{name}")
}

fn private_final(name: &str, field_type: &str) -> FieldDescriptor {
    FieldDescriptor::new(name, field_type)
        .with_modifiers(Modifiers::with_visibility(Visibility::Private).set_final(true))
}

fn framework(builder: CodeModelBuilder) -> CodeModelBuilder {
    let annotation = |name: &str, meta: &[&str]| {
        meta.iter().fold(
            ClassDescriptor::new(name, ClassKind::Annotation),
            |class, m| class.annotated(Annotation::new(*m)),
        )
    };
    builder
        .library_class(annotation(COMPONENT, &[]))
        .library_class(annotation(CONTROLLER, &[COMPONENT]))
        .library_class(annotation(REST_CONTROLLER, &[CONTROLLER]))
        .library_class(annotation(SERVICE, &[COMPONENT]))
        .library_class(annotation(CONTROLLER_ADVICE, &[COMPONENT]))
        .library_class(ClassDescriptor::new(
            format!("{BASE}.common.exception.BaseParametrizedException"),
            ClassKind::Class,
        ))
}

fn article_app() -> CodeModelBuilder {
    let controller = ClassDescriptor::new(app("controller.ArticleController"), ClassKind::Class)
        .annotated(Annotation::new(REST_CONTROLLER))
        .with_field(FieldDescriptor::new("PATH", "java.lang.String").with_modifiers(Modifiers::constant()))
        .with_field(private_final("articleService", &app("service.ArticleService")))
        .with_method(
            MethodDescriptor::constructor(Visibility::Public)
                .with_parameter(Parameter::new("articleService", app("service.ArticleService"))),
        )
        .with_method(
            MethodDescriptor::new("create", "org.springframework.http.ResponseEntity").with_parameter(
                Parameter::new("request", app("controller.request.CreateArticleRq"))
                    .annotated(Annotation::new(VALID))
                    .annotated(Annotation::new(REQUEST_BODY)),
            ),
        )
        .with_method(
            MethodDescriptor::new("getOne", app("controller.response.ArticleResponse"))
                .with_parameter(Parameter::new("id", "java.util.UUID")),
        );

    let request = ClassDescriptor::new(app("controller.request.CreateArticleRq"), ClassKind::Record)
        .extends("java.lang.Record")
        .with_field(private_final("title", "java.lang.String").annotated(Annotation::new(NOT_BLANK)))
        .with_field(
            private_final("content", "java.lang.String")
                .annotated(Annotation::new(NOT_BLANK))
                .annotated(
                    Annotation::new("org.hibernate.validator.constraints.Length")
                        .with_property("max", AnnotationValue::Int(500)),
                ),
        );

    let response = ClassDescriptor::new(app("controller.response.ArticleResponse"), ClassKind::Record)
        .extends("java.lang.Record")
        .with_field(private_final("id", "java.util.UUID"));
    let response_builder = ClassDescriptor::new(
        app("controller.response.ArticleResponse$ArticleResponseBuilder"),
        ClassKind::Class,
    )
    .annotated(Annotation::new("lombok.Generated"));

    let service = ClassDescriptor::new(app("service.ArticleService"), ClassKind::Interface)
        .with_method(MethodDescriptor::new("getOne", app("controller.response.ArticleResponse")));

    let service_impl = ClassDescriptor::new(app("service.impl.ArticleServiceImpl"), ClassKind::Class)
        .implements(app("service.ArticleService"))
        .annotated(Annotation::new(SERVICE))
        .with_field(private_final("articleMapper", &app("mapper.ArticleMapper")))
        .with_field(private_final("articleRepository", &app("repository.ArticleRepository")));

    let repository = ClassDescriptor::new(app("repository.ArticleRepository"), ClassKind::Interface)
        .implements("org.springframework.data.jpa.repository.JpaRepository");

    let mapper = ClassDescriptor::new(app("mapper.ArticleMapper"), ClassKind::Class)
        .annotated(Annotation::new(COMPONENT))
        .with_method(
            MethodDescriptor::new("toEntity", app("entity.Article"))
                .with_parameter(Parameter::new("request", app("controller.request.CreateArticleRq")))
                .with_parameter(Parameter::new("ageRating", app("enumeration.AgeRating"))),
        )
        .with_method(
            MethodDescriptor::new("toResponse", app("controller.response.ArticleResponse"))
                .with_parameter(Parameter::new("entity", app("entity.Article"))),
        );

    let entity = ClassDescriptor::new(app("entity.Article"), ClassKind::Class)
        .annotated(Annotation::new(ENTITY))
        .annotated(Annotation::new(TABLE).with_property("name", AnnotationValue::String("article".into())))
        .with_field(private_final("id", "java.util.UUID"));

    let age_rating = ClassDescriptor::new(app("enumeration.AgeRating"), ClassKind::Enum)
        .extends("java.lang.Enum");

    let exception = ClassDescriptor::new(app("exception.ArticleNotFoundException"), ClassKind::Class)
        .extends(format!("{BASE}.common.exception.BaseParametrizedException"));

    let handler = ClassDescriptor::new(app("handler.ArticleExceptionHandler"), ClassKind::Class)
        .annotated(Annotation::new(CONTROLLER_ADVICE))
        .with_method(
            MethodDescriptor::new("handleArticleException", "org.springframework.http.ResponseEntity")
                .annotated(Annotation::new(EXCEPTION_HANDLER).with_property(
                    "value",
                    AnnotationValue::Array(vec![AnnotationValue::Class(
                        app("exception.ArticleNotFoundException").into(),
                    )]),
                ))
                .with_parameter(Parameter::new(
                    "exception",
                    app("exception.ArticleNotFoundException"),
                )),
        );

    let utils = ClassDescriptor::new(app("util.AgeRatingDeterminationUtils"), ClassKind::Class)
        .with_method(MethodDescriptor::constructor(Visibility::Private))
        .with_method(
            MethodDescriptor::new("determineAgeRating", app("enumeration.AgeRating"))
                .with_modifiers(Modifiers::with_visibility(Visibility::Public).set_static(true))
                .with_parameter(Parameter::new("content", "java.lang.String")),
        );

    framework(CodeModel::builder())
        .class(controller)
        .class(request)
        .class(response)
        .class(response_builder)
        .class(service)
        .class(service_impl)
        .class(repository)
        .class(mapper)
        .class(entity)
        .class(age_rating)
        .class(exception)
        .class(handler)
        .class(utils)
}

fn evaluate(model: &CodeModel) -> Report {
    let rules = Preset::SpringLayered
        .rules(BASE)
        .expect("built-in rules should build");
    RuleSet::builder().rules(rules).build().evaluate(model)
}

fn failing_rules(report: &Report) -> Vec<&str> {
    report
        .failures(Severity::Error)
        .map(|outcome| outcome.rule.as_str())
        .collect()
}

#[test]
fn conforming_application_passes_every_rule() {
    let model = article_app().build();
    let report = evaluate(&model);

    assert!(
        !report.has_failures_at(Severity::Info),
        "{}",
        report.format_test_report(Severity::Info)
    );
    assert_eq!(report.classes_checked, 13);
}

#[test]
fn misplaced_controller_breaks_several_conventions() {
    let legacy = ClassDescriptor::new(app("controller.LegacyEndpoint"), ClassKind::Class)
        .with_field(private_final("repository", &app("repository.ArticleRepository")));
    let model = article_app().class(legacy).build();
    let report = evaluate(&model);

    assert_eq!(
        failing_rules(&report),
        vec![
            "controller-naming",
            "layers-top-to-bottom",
            "controller-annotation",
            "controller-path",
        ]
    );
    let layers = report
        .outcomes
        .iter()
        .find(|o| o.rule == "layers-top-to-bottom")
        .expect("layer rule ran");
    assert_eq!(layers.violations.len(), 1);
    assert!(layers.violations[0]
        .message
        .contains("layer 'Repository' may not be accessed by layer 'Controller'"));
}

#[test]
fn unvalidated_request_body_is_reported() {
    let sloppy = ClassDescriptor::new(app("controller.DraftController"), ClassKind::Class)
        .annotated(Annotation::new(REST_CONTROLLER))
        .with_field(FieldDescriptor::new("PATH", "java.lang.String").with_modifiers(Modifiers::constant()))
        .with_method(
            MethodDescriptor::new("draft", "void").with_parameter(
                Parameter::new("request", app("controller.request.CreateArticleRq"))
                    .annotated(Annotation::new(REQUEST_BODY)),
            ),
        );
    let model = article_app().class(sloppy).build();
    let report = evaluate(&model);

    assert_eq!(failing_rules(&report), vec!["validated-request-bodies"]);
    let outcome = report
        .failures(Severity::Error)
        .next()
        .expect("one failing rule");
    assert_eq!(
        outcome.violations[0].element.name,
        app("controller.request.CreateArticleRq")
    );
}

#[test]
fn unhandled_exception_and_top_level_package_are_reported() {
    let orphan = ClassDescriptor::new(app("exception.ArticleLockedException"), ClassKind::Class)
        .extends(format!("{BASE}.common.exception.BaseParametrizedException"));
    let top_level = ClassDescriptor::new(format!("{BASE}.util.Strings"), ClassKind::Class)
        .with_method(MethodDescriptor::constructor(Visibility::Private));
    let misplaced = ClassDescriptor::new(format!("{BASE}.mapper.LegacyMapper"), ClassKind::Class);
    let model = article_app().class(orphan).class(top_level).class(misplaced).build();
    let report = evaluate(&model);

    assert_eq!(
        failing_rules(&report),
        vec!["exception-handlers", "no-top-level-layer-packages"]
    );
    let rendered = report.format_test_report(Severity::Error);
    assert!(rendered.contains("ArticleLockedException"));
    assert!(rendered.contains("LegacyMapper"));
    assert!(!rendered.contains("Strings"));
}
