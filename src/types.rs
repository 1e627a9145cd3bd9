use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

// ─── Field maps ─────────────────────────────────────────────────────────────

/// Current values of one group, keyed by field name in schema order.
pub type Values = Map<String, Value>;

/// Validator output: field name to error message, `None` when the field is valid.
pub type Errors = HashMap<String, Option<String>>;

/// Field name to "has received a blur".
pub type Touched = HashMap<String, bool>;

/// Returns true if any entry carries a non-empty message.
///
/// An empty message counts as no error.
pub fn has_errors(errors: &Errors) -> bool {
    errors
        .values()
        .any(|e| e.as_deref().is_some_and(|msg| !msg.is_empty()))
}

// ─── Group key ──────────────────────────────────────────────────────────────

/// Opaque identity of a group. Never reused, never reassigned.
///
/// Keys are not positions: removing a group shifts the indices of the
/// groups after it but leaves every key intact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupKey(u64);

impl GroupKey {
    pub const fn new(raw: u64) -> Self {
        GroupKey(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─── Group ──────────────────────────────────────────────────────────────────

/// One instance of the repeated field set.
///
/// `errors` is always the validator's output for the current `values`;
/// groups are only built through the reducer, which recomputes it on every
/// value change.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Group {
    key: GroupKey,
    values: Values,
    errors: Errors,
    touched: Touched,
    is_valid: bool,
}

impl Group {
    pub(crate) fn new(
        key: GroupKey,
        values: Values,
        errors: Errors,
        field_names: &[String],
    ) -> Self {
        let is_valid = !has_errors(&errors);
        let touched = field_names.iter().map(|f| (f.clone(), false)).collect();
        Group {
            key,
            values,
            errors,
            touched,
            is_valid,
        }
    }

    /// Copy of this group with `values` replaced and `errors` recomputed.
    pub(crate) fn with_values(&self, values: Values, errors: Errors) -> Self {
        Group {
            key: self.key,
            is_valid: !has_errors(&errors),
            values,
            errors,
            touched: self.touched.clone(),
        }
    }

    /// Copy of this group with the given fields marked as touched.
    pub(crate) fn with_touched<'a>(&self, fields: impl IntoIterator<Item = &'a String>) -> Self {
        let mut touched = self.touched.clone();
        for field in fields {
            touched.insert(field.clone(), true);
        }
        Group {
            touched,
            ..self.clone()
        }
    }

    pub fn key(&self) -> GroupKey {
        self.key
    }

    pub fn values(&self) -> &Values {
        &self.values
    }

    pub fn errors(&self) -> &Errors {
        &self.errors
    }

    pub fn touched(&self) -> &Touched {
        &self.touched
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn value(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// The field's error message, if it has a non-empty one.
    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors
            .get(field)
            .and_then(|e| e.as_deref())
            .filter(|msg| !msg.is_empty())
    }

    pub fn is_touched(&self, field: &str) -> bool {
        self.touched.get(field).copied().unwrap_or(false)
    }
}

// ─── Form state ─────────────────────────────────────────────────────────────

/// Ordered list of groups; insertion order is display order.
///
/// Groups are shared behind `Arc`: a transition that leaves a group
/// untouched carries the same allocation into the next state.
#[derive(Clone, Debug, Default)]
pub struct FormState {
    groups: Vec<Arc<Group>>,
}

impl FormState {
    pub(crate) fn from_groups(groups: Vec<Arc<Group>>) -> Self {
        FormState { groups }
    }

    pub fn groups(&self) -> &[Arc<Group>] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Linear scan; group counts are small.
    pub fn find(&self, key: GroupKey) -> Option<&Arc<Group>> {
        self.groups.iter().find(|g| g.key == key)
    }

    pub fn position(&self, key: GroupKey) -> Option<usize> {
        self.groups.iter().position(|g| g.key == key)
    }

    /// Live keys in display order.
    pub fn keys(&self) -> Vec<GroupKey> {
        self.groups.iter().map(|g| g.key).collect()
    }

    /// True iff every group is valid; vacuously true when empty.
    pub fn are_all_valid(&self) -> bool {
        self.groups.iter().all(|g| g.is_valid)
    }

    pub fn values(&self) -> Vec<Values> {
        self.groups.iter().map(|g| g.values.clone()).collect()
    }
}

impl PartialEq for FormState {
    fn eq(&self, other: &Self) -> bool {
        self.groups.len() == other.groups.len()
            && self
                .groups
                .iter()
                .zip(other.groups.iter())
                .all(|(a, b)| Arc::ptr_eq(a, b) || a == b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_message_is_not_an_error() {
        let mut errors = Errors::new();
        errors.insert("foo".to_string(), Some(String::new()));
        errors.insert("bar".to_string(), None);
        assert!(!has_errors(&errors));

        errors.insert("baz".to_string(), Some("required".to_string()));
        assert!(has_errors(&errors));
    }

    #[test]
    fn new_group_starts_untouched() {
        let fields = vec!["a".to_string(), "b".to_string()];
        let group = Group::new(GroupKey::new(7), Values::new(), Errors::new(), &fields);
        assert!(!group.is_touched("a"));
        assert!(!group.is_touched("b"));
        assert_eq!(group.touched().len(), 2);
        assert!(group.is_valid());
    }
}
