//! Applies a selection and a condition to every element of one kind.

use crate::condition::{Condition, ConditionEvents};
use crate::element::Element;
use crate::model::CodeModel;
use crate::predicate::Predicate;
use crate::rule::Evaluation;
use crate::types::{ElementKind, ElementRef, ViolationEvent};
use tracing::debug;

/// Evaluates elements in import order, so repeated runs yield identical lists.
///
/// A selection predicate that fails for an element is reported as a
/// violation of that element; evaluation continues with the next one.
pub(crate) fn evaluate_elements<T: Element>(
    rule_name: &str,
    selection: Option<&Predicate<T>>,
    condition: &Condition<T>,
    allow_empty: bool,
    model: &CodeModel,
) -> Evaluation {
    let mut events = ConditionEvents::new();
    let mut selected = 0usize;

    for item in T::collect(model) {
        let is_selected = match selection.map(|p| p.test(item, model)) {
            None | Some(Ok(true)) => true,
            Some(Ok(false)) => false,
            Some(Err(e)) => {
                selected += 1;
                events.fault(item, format!("cannot be selected: {e}"));
                continue;
            }
        };
        if is_selected {
            selected += 1;
            condition.check(item, model, &mut events);
        }
    }

    debug!(
        "Rule '{}': {} {} selected, {} violation(s)",
        rule_name,
        selected,
        T::PLURAL,
        events.len()
    );

    if selected == 0 && !allow_empty {
        events.add(ViolationEvent::new(
            ElementRef::new(ElementKind::Rule, rule_name),
            format!(
                "failed to check any {}: the selection matched nothing \
                 (allow empty selections to accept this)",
                T::PLURAL
            ),
        ));
    }

    Evaluation {
        selected,
        violations: events.into_violations(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::have;
    use crate::descriptor::{ClassDescriptor, ClassKind};
    use crate::error::EvaluationError;
    use crate::predicates::{is_interface, resides_in_package};

    fn model() -> CodeModel {
        CodeModel::builder()
            .class(ClassDescriptor::new("x.service.OrderService", ClassKind::Interface))
            .class(ClassDescriptor::new("x.service.PaymentService", ClassKind::Class))
            .class(ClassDescriptor::new("x.service.AuditService", ClassKind::Class))
            .build()
    }

    fn in_package(pattern: &str) -> Predicate<ClassDescriptor> {
        match resides_in_package(pattern) {
            Ok(p) => p,
            Err(e) => panic!("{e}"),
        }
    }

    #[test]
    fn violations_follow_import_order() {
        let model = model();
        let selection = in_package("..service");
        let result = evaluate_elements(
            "services",
            Some(&selection),
            &have(is_interface()),
            false,
            &model,
        );
        assert_eq!(result.selected, 3);
        let names: Vec<&str> = result
            .violations
            .iter()
            .map(|v| v.element.name.as_str())
            .collect();
        assert_eq!(names, ["x.service.PaymentService", "x.service.AuditService"]);
    }

    #[test]
    fn empty_selection_policy() {
        let model = model();
        let selection = in_package("..controller");
        let strict = evaluate_elements("r", Some(&selection), &have(is_interface()), false, &model);
        assert_eq!(strict.violations.len(), 1);
        assert_eq!(strict.violations[0].element.kind, ElementKind::Rule);

        let lenient = evaluate_elements("r", Some(&selection), &have(is_interface()), true, &model);
        assert!(lenient.violations.is_empty());
    }

    #[test]
    fn selection_errors_become_violations() {
        let model = model();
        let broken = Predicate::try_new("are broken", |_: &ClassDescriptor, _| {
            Err(EvaluationError::Pattern {
                pattern: "(".into(),
                reason: "unclosed group".into(),
            })
        });
        let result = evaluate_elements("r", Some(&broken), &have(is_interface()), false, &model);
        assert_eq!(result.violations.len(), 3);
        assert!(result.violations[0].message.starts_with("cannot be selected"));
    }
}
