use super::common::*;
use groupform::Action;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    // A blur touches exactly one (key, field) pair.
    #[test]
    fn blur_touches_one_pair(
        setup in prop::collection::vec(arb_op(), 0..20),
        group in any::<usize>(),
        field in 0..FIELDS.len(),
    ) {
        let mut form = form();
        for op in &setup {
            if let Some(action) = resolve(&form, op) {
                form.dispatch(action).unwrap();
            }
        }
        let Some(Action::Blur { key, field: name }) = resolve(&form, &Op::Blur(group, field)) else {
            return Ok(());
        };

        let before = form.state().clone();
        form.dispatch(Action::blur(key, name.clone())).unwrap();

        for (old, new) in before.groups().iter().zip(form.state().groups()) {
            for f in FIELDS {
                let expected = if old.key() == key && f == name {
                    true
                } else {
                    old.is_touched(f)
                };
                prop_assert_eq!(new.is_touched(f), expected, "group {} field {}", old.key(), f);
            }
            prop_assert_eq!(new.values(), old.values());
            prop_assert_eq!(new.errors(), old.errors());
        }
    }

    // New groups start untouched no matter what happened before.
    #[test]
    fn added_groups_start_untouched(setup in prop::collection::vec(arb_op(), 0..20)) {
        let mut form = form();
        for op in &setup {
            if let Some(action) = resolve(&form, op) {
                form.dispatch(action).unwrap();
            }
        }
        form.dispatch(Action::BlurAll).unwrap();
        let key = form.add();
        let group = form.state().find(key).unwrap();
        for f in FIELDS {
            prop_assert!(!group.is_touched(f));
        }
    }
}
