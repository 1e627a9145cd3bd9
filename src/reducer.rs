//! The form state machine.
//!
//! [`Reducer::reduce`] computes the next [`FormState`] from the current one
//! and an [`Action`]. Groups the action does not touch are carried over by
//! `Arc`, so unchanged groups are neither cloned nor revalidated.

use crate::action::Action;
use crate::error::FormError;
use crate::keys::KeyGenerator;
use crate::types::{FormState, Group, GroupKey, Values};
use crate::validate::Validator;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Holds everything a transition needs besides the state itself: the field
/// schema, the template used to seed new groups, the validator with its
/// options, and the key generator.
pub struct Reducer {
    template: Values,
    field_names: Vec<String>,
    validator: Box<dyn Validator>,
    options: Value,
    keys: Box<dyn KeyGenerator>,
}

impl fmt::Debug for Reducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reducer")
            .field("template", &self.template)
            .field("field_names", &self.field_names)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Reducer {
    /// The template's field names become the form's fixed schema.
    pub fn new(
        template: Values,
        validator: Box<dyn Validator>,
        options: Value,
        keys: Box<dyn KeyGenerator>,
    ) -> Self {
        let field_names = template.keys().cloned().collect();
        Reducer {
            template,
            field_names,
            validator,
            options,
            keys,
        }
    }

    pub fn field_names(&self) -> &[String] {
        &self.field_names
    }

    pub fn template(&self) -> &Values {
        &self.template
    }

    pub fn options(&self) -> &Value {
        &self.options
    }

    /// Builds a fresh group: new key, validated values, nothing touched.
    pub fn init_group(&mut self, values: Values) -> Group {
        let errors = self.validator.validate(&values, &self.options);
        Group::new(self.keys.next_key(), values, errors, &self.field_names)
    }

    /// Appends a group seeded from the template. Returns the new state and
    /// the appended group's key.
    pub fn append(&mut self, state: &FormState) -> (FormState, GroupKey) {
        let group = self.init_group(self.template.clone());
        let key = group.key();
        let mut groups = state.groups().to_vec();
        groups.push(Arc::new(group));
        (FormState::from_groups(groups), key)
    }

    /// One group per entry, in order.
    pub fn initial_state(&mut self, initial: &[Values]) -> FormState {
        let groups = initial
            .iter()
            .map(|values| Arc::new(self.init_group(values.clone())))
            .collect();
        FormState::from_groups(groups)
    }

    /// Applies `action` to `state`.
    ///
    /// `change` and `blur` require a live key and a known field name;
    /// violating either returns an error and leaves `state` as it was.
    /// `remove` of an absent key yields an unchanged state.
    pub fn reduce(&mut self, state: &FormState, action: Action) -> Result<FormState, FormError> {
        let kind = action.kind();
        let key = action.key();

        let next = match action {
            Action::Change { key, field, value } => {
                let index = self.locate(state, key, &field)?;
                let group = &state.groups()[index];
                let mut values = group.values().clone();
                values.insert(field, value);
                let errors = self.validator.validate(&values, &self.options);
                replace_at(state, index, group.with_values(values, errors))
            }
            Action::Blur { key, field } => {
                let index = self.locate(state, key, &field)?;
                let group = &state.groups()[index];
                if group.is_touched(&field) {
                    state.clone()
                } else {
                    replace_at(state, index, group.with_touched([&field]))
                }
            }
            Action::BlurAll => {
                let groups = state
                    .groups()
                    .iter()
                    .map(|group| {
                        if self.field_names.iter().all(|f| group.is_touched(f)) {
                            Arc::clone(group)
                        } else {
                            Arc::new(group.with_touched(&self.field_names))
                        }
                    })
                    .collect();
                FormState::from_groups(groups)
            }
            Action::Add => self.append(state).0,
            Action::Remove { key } => match state.position(key) {
                Some(index) => {
                    let mut groups = state.groups().to_vec();
                    groups.remove(index);
                    FormState::from_groups(groups)
                }
                None => state.clone(),
            },
        };

        debug!(action = kind, key = ?key, groups = next.len(), "applied form action");
        Ok(next)
    }

    fn locate(&self, state: &FormState, key: GroupKey, field: &str) -> Result<usize, FormError> {
        let index = state.position(key).ok_or(FormError::UnknownGroup(key))?;
        if !self.field_names.iter().any(|f| f == field) {
            return Err(FormError::UnknownField {
                key,
                field: field.to_string(),
            });
        }
        Ok(index)
    }
}

fn replace_at(state: &FormState, index: usize, group: Group) -> FormState {
    let mut groups = state.groups().to_vec();
    groups[index] = Arc::new(group);
    FormState::from_groups(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::SequentialKeys;
    use crate::validate::SimpleValidator;
    use serde_json::json;

    fn reducer() -> Reducer {
        let template = json!({"foo": "", "bar": ""}).as_object().cloned().unwrap();
        let fields = template.keys().cloned().collect();
        Reducer::new(
            template,
            Box::new(SimpleValidator::new(fields, "required")),
            Value::Null,
            Box::new(SequentialKeys::new()),
        )
    }

    #[test]
    fn change_shares_untouched_groups() {
        let mut reducer = reducer();
        let template = reducer.template().clone();
        let state = reducer.initial_state(&[template.clone(), template]);
        let keys = state.keys();

        let next = reducer.reduce(&state, Action::change(keys[1], "foo", "x")).unwrap();
        assert!(Arc::ptr_eq(&state.groups()[0], &next.groups()[0]));
        assert!(!Arc::ptr_eq(&state.groups()[1], &next.groups()[1]));
        assert_eq!(next.groups()[1].error("foo"), None);
        assert_eq!(next.groups()[1].error("bar"), Some("required"));
    }

    #[test]
    fn append_returns_the_new_groups_key() {
        let mut reducer = reducer();
        let template = reducer.template().clone();
        let state = reducer.initial_state(&[template]);

        let (next, key) = reducer.append(&state);
        assert_eq!(next.keys(), vec![state.keys()[0], key]);
        assert!(Arc::ptr_eq(&state.groups()[0], &next.groups()[0]));
        assert_eq!(next.groups()[1].error("foo"), Some("required"));
    }

    #[test]
    fn blur_all_keeps_fully_touched_groups() {
        let mut reducer = reducer();
        let state = reducer.initial_state(&[reducer.template().clone()]);
        let once = reducer.reduce(&state, Action::BlurAll).unwrap();
        let twice = reducer.reduce(&once, Action::BlurAll).unwrap();
        assert!(Arc::ptr_eq(&once.groups()[0], &twice.groups()[0]));
    }

    #[test]
    fn change_of_unknown_field_is_rejected() {
        let mut reducer = reducer();
        let state = reducer.initial_state(&[reducer.template().clone()]);
        let key = state.keys()[0];
        let err = reducer.reduce(&state, Action::change(key, "nope", "x")).unwrap_err();
        assert_eq!(
            err,
            FormError::UnknownField {
                key,
                field: "nope".to_string()
            }
        );
    }

    #[test]
    fn field_order_survives_change() {
        let mut reducer = reducer();
        let state = reducer.initial_state(&[reducer.template().clone()]);
        let key = state.keys()[0];
        let next = reducer.reduce(&state, Action::change(key, "foo", "x")).unwrap();
        let order: Vec<_> = next.groups()[0].values().keys().cloned().collect();
        assert_eq!(order, ["foo", "bar"]);
    }
}
