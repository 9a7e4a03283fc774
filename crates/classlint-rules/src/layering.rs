//! Controller -> Service -> Repository layering.

use classlint_core::{DefinitionError, LayeredArchitecture};

/// `layers-top-to-bottom`
pub const LAYERS_TOP_TO_BOTTOM: &str = "layers-top-to-bottom";

/// Layers are accessed from the top to the bottom only.
///
/// Nothing may depend on controllers, only controllers may depend on
/// services, and only services may depend on repositories.
///
/// # Errors
///
/// Never fails for the built-in layer definitions.
pub fn layered_architecture() -> Result<LayeredArchitecture, DefinitionError> {
    LayeredArchitecture::builder()
        .layer("Controller", ["..controller"])
        .layer("Service", ["..service"])
        .layer("Repository", ["..repository"])
        .may_not_be_accessed_by_any_layer("Controller")
        .may_only_be_accessed_by("Service", ["Controller"])
        .may_only_be_accessed_by("Repository", ["Service"])
        .allow_empty_should(true)
        .named(LAYERS_TOP_TO_BOTTOM)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use classlint_core::{ClassDescriptor, ClassKind, CodeModel, FieldDescriptor, Rule, RuleContext};

    fn class(name: &str, depends_on: &[&str]) -> ClassDescriptor {
        depends_on.iter().enumerate().fold(
            ClassDescriptor::new(name, ClassKind::Class),
            |class, (i, target)| class.with_field(FieldDescriptor::new(format!("f{i}"), *target)),
        )
    }

    #[test]
    fn skipping_the_service_layer_is_reported() {
        let model = CodeModel::builder()
            .class(class("app.controller.ArticleController", &["app.repository.ArticleRepository"]))
            .class(class("app.service.ArticleService", &["app.repository.ArticleRepository"]))
            .class(class("app.repository.ArticleRepository", &[]))
            .build();
        let Ok(rule) = layered_architecture() else {
            panic!("built-in layers are valid");
        };

        let evaluation = rule.evaluate(&RuleContext::new(&model));
        assert_eq!(evaluation.violations.len(), 1);
        assert_eq!(
            evaluation.violations[0].element.name,
            "app.controller.ArticleController"
        );
    }

    #[test]
    fn layer_names_are_declared_in_order() {
        let Ok(rule) = layered_architecture() else {
            panic!("built-in layers are valid");
        };
        assert_eq!(rule.name(), LAYERS_TOP_TO_BOTTOM);
        assert_eq!(
            rule.layer_names().collect::<Vec<_>>(),
            vec!["Controller", "Service", "Repository"]
        );
    }
}
