use super::common::*;
use groupform::Action;
use proptest::prelude::*;
use std::collections::HashSet;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    // Live keys are pairwise distinct and no key is ever handed out twice,
    // even after the group that held it was removed.
    #[test]
    fn keys_unique_for_lifetime(ops in prop::collection::vec(arb_op(), 0..40)) {
        let mut form = form();
        let mut issued: HashSet<_> = form.keys().into_iter().collect();

        for op in &ops {
            let Some(action) = resolve(&form, op) else { continue };
            let before: HashSet<_> = form.keys().into_iter().collect();
            form.dispatch(action).unwrap();

            let live = form.keys();
            let distinct: HashSet<_> = live.iter().copied().collect();
            prop_assert_eq!(distinct.len(), live.len(), "duplicate live key in {:?}", live);

            for key in distinct.difference(&before) {
                prop_assert!(issued.insert(*key), "key {} was reissued", key);
            }
        }
    }

    // `add` appends; `remove` drops exactly one key and keeps the rest in order.
    #[test]
    fn order_preserved(ops in prop::collection::vec(arb_op(), 0..40)) {
        let mut form = form();
        for op in &ops {
            let Some(action) = resolve(&form, op) else { continue };
            let before = form.keys();
            form.dispatch(action.clone()).unwrap();
            let after = form.keys();

            match action {
                Action::Add => {
                    prop_assert_eq!(after.len(), before.len() + 1);
                    prop_assert_eq!(&after[..before.len()], &before[..]);
                }
                Action::Remove { key } => {
                    let expected: Vec<_> = before.iter().copied().filter(|k| *k != key).collect();
                    prop_assert_eq!(after, expected);
                }
                _ => prop_assert_eq!(after, before),
            }
        }
    }

    // Removing an absent key, or removing from an empty list, changes nothing.
    #[test]
    fn absent_remove_is_no_op(ops in prop::collection::vec(arb_op(), 0..20)) {
        let mut form = form();
        for op in &ops {
            if let Some(action) = resolve(&form, op) {
                form.dispatch(action).unwrap();
            }
        }

        let before = form.state().clone();
        let snapshot = form.snapshot();
        let generation = form.handler_generation();
        form.dispatch(Action::remove(groupform::GroupKey::new(u64::MAX))).unwrap();

        prop_assert_eq!(form.state(), &before);
        prop_assert_eq!(form.snapshot(), snapshot);
        prop_assert_eq!(form.handler_generation(), generation);
    }

    // Handler identity only changes when the live-key list does.
    #[test]
    fn handlers_rebuild_only_on_key_changes(ops in prop::collection::vec(arb_op(), 0..40)) {
        let mut form = form();
        for op in &ops {
            let Some(action) = resolve(&form, op) else { continue };
            let keys_before = form.keys();
            let generation = form.handler_generation();
            form.dispatch(action).unwrap();

            if form.keys() == keys_before {
                prop_assert_eq!(form.handler_generation(), generation);
            } else {
                prop_assert_eq!(form.handler_generation(), generation + 1);
            }
        }
    }
}
