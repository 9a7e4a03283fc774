use crate::descriptor::{Annotation, AnnotationValue, TypeName};
use crate::element::HasAnnotations;
use crate::error::EvaluationError;
use crate::predicate::Predicate;
use crate::resolver::AnnotationResolver;

/// Directly annotated with the given annotation type.
pub fn is_annotated_with<T: HasAnnotations + 'static>(
    annotation: impl Into<TypeName>,
) -> Predicate<T> {
    let annotation = annotation.into();
    Predicate::new(
        format!("are annotated with @{}", annotation.simple_name()),
        move |item: &T, _| {
            item.annotations()
                .iter()
                .any(|a| a.type_name == annotation)
        },
    )
}

/// Annotated with the given type directly or through meta-annotations.
pub fn is_meta_annotated_with<T: HasAnnotations + 'static>(
    annotation: impl Into<TypeName>,
) -> Predicate<T> {
    let annotation = annotation.into();
    Predicate::new(
        format!("are meta-annotated with @{}", annotation.simple_name()),
        move |item: &T, model| {
            AnnotationResolver::new(model)
                .is_meta_annotated_with(item.annotations(), annotation.as_str())
        },
    )
}

/// At least one directly present annotation matches the predicate.
pub fn is_annotated_with_that<T: HasAnnotations + 'static>(
    annotation: Predicate<Annotation>,
) -> Predicate<T> {
    Predicate::try_new(
        format!("are annotated with an annotation that {}", annotation.description()),
        move |item: &T, model| {
            for a in item.annotations() {
                if annotation.test(a, model)? {
                    return Ok(true);
                }
            }
            Ok(false)
        },
    )
}

/// Annotation has exactly this type.
pub fn annotation_of_type(annotation: impl Into<TypeName>) -> Predicate<Annotation> {
    let annotation = annotation.into();
    Predicate::new(
        format!("has type @{}", annotation.simple_name()),
        move |a: &Annotation, _| a.type_name == annotation,
    )
}

/// Annotation type is declared directly in one of the packages.
pub fn annotation_in_any_package<S: AsRef<str>>(packages: &[S]) -> Predicate<Annotation> {
    let packages: Vec<String> = packages.iter().map(|p| p.as_ref().to_string()).collect();
    Predicate::new(
        format!("is declared in any package [{}]", packages.join(", ")),
        move |a: &Annotation, _| {
            let package = a.type_name.package_name();
            packages.iter().any(|p| p == package)
        },
    )
}

/// Property equals `value`, or contains it when the property is an array.
///
/// Fails with [`EvaluationError::PropertyType`] when the annotation does not
/// carry the property.
pub fn property_equals_or_contains(
    property: impl Into<String>,
    value: AnnotationValue,
) -> Predicate<Annotation> {
    let property = property.into();
    Predicate::try_new(
        format!("has property '{property}' containing {value}"),
        move |a: &Annotation, _| Ok(required_property(a, &property)?.equals_or_contains(&value)),
    )
}

/// Property value satisfies an arbitrary test.
///
/// Fails with [`EvaluationError::PropertyType`] when the annotation does not
/// carry the property.
pub fn property_satisfies<F>(
    property: impl Into<String>,
    description: impl Into<String>,
    test: F,
) -> Predicate<Annotation>
where
    F: Fn(&AnnotationValue) -> bool + Send + Sync + 'static,
{
    let property = property.into();
    Predicate::try_new(description, move |a: &Annotation, _| {
        Ok(test(required_property(a, &property)?))
    })
}

fn required_property<'a>(
    annotation: &'a Annotation,
    property: &str,
) -> Result<&'a AnnotationValue, EvaluationError> {
    annotation
        .property(property)
        .ok_or_else(|| EvaluationError::PropertyType {
            annotation: annotation.type_name.to_string(),
            property: property.to_string(),
            reason: "property is absent".to_string(),
        })
}
