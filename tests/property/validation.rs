use super::common::*;
use groupform::{SimpleValidator, Validator, has_errors};
use proptest::prelude::*;
use serde_json::Value;

fn validator() -> SimpleValidator {
    SimpleValidator::new(FIELDS.iter().map(|f| f.to_string()).collect(), MESSAGE)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    // Validating the same values twice yields the same errors.
    #[test]
    fn validator_is_idempotent(values in arb_values()) {
        let validator = validator();
        let first = validator.validate(&values, &Value::Null);
        let second = validator.validate(&values, &Value::Null);
        prop_assert_eq!(first, second);
    }

    // The validator reports an entry for every field.
    #[test]
    fn validator_is_total(values in arb_values()) {
        let errors = validator().validate(&values, &Value::Null);
        for f in FIELDS {
            prop_assert!(errors.contains_key(f));
        }
    }

    // After any sequence of operations, every group's errors equal a fresh
    // validation of its current values, and validity aggregates correctly.
    #[test]
    fn errors_never_stale(ops in prop::collection::vec(arb_op(), 0..40)) {
        let validator = validator();
        let mut form = form();
        for op in &ops {
            if let Some(action) = resolve(&form, op) {
                form.dispatch(action).unwrap();
            }

            for group in form.state().groups() {
                prop_assert_eq!(group.errors(), &validator.validate(group.values(), &Value::Null));
                prop_assert_eq!(group.is_valid(), !has_errors(group.errors()));
            }
            let expected = form.state().groups().iter().all(|g| !has_errors(g.errors()));
            prop_assert_eq!(form.are_all_valid(), expected);
        }
    }

    // A submit attempt succeeds exactly when every group is valid.
    #[test]
    fn submit_gated_on_validity(ops in prop::collection::vec(arb_op(), 0..30)) {
        let mut form = form();
        for op in &ops {
            if let Some(action) = resolve(&form, op) {
                form.dispatch(action).unwrap();
            }
        }
        let all_valid = form.are_all_valid();
        let outcome = form.handle_submit().unwrap();
        prop_assert_eq!(outcome.is_submitted(), all_valid);
    }
}
