//! Validator contract and the default presence validator.
//!
//! A validator maps one group's values (plus the opaque validation options)
//! to an [`Errors`] map. It must be total, synchronous, and side-effect
//! free: it is called from inside the reducer and may not dispatch.

use crate::types::{Errors, Values};
use serde_json::Value;

/// Message used by [`SimpleValidator`] when none is configured.
pub const DEFAULT_ERROR_MESSAGE: &str = "Looks like that didn't work. Please try again.";

/// Extension point for per-group validation.
///
/// Implementations must return an entry (possibly `None`) for every field
/// present in `values`.
pub trait Validator {
    fn validate(&self, values: &Values, options: &Value) -> Errors;
}

impl<F> Validator for F
where
    F: Fn(&Values, &Value) -> Errors,
{
    fn validate(&self, values: &Values, options: &Value) -> Errors {
        self(values, options)
    }
}

/// Presence check: a field is invalid when its value is the empty string.
///
/// See [`is_empty_value`] for what counts as empty.
#[derive(Clone, Debug)]
pub struct SimpleValidator {
    field_names: Vec<String>,
    message: String,
}

impl SimpleValidator {
    pub fn new(field_names: Vec<String>, message: impl Into<String>) -> Self {
        SimpleValidator {
            field_names,
            message: message.into(),
        }
    }

    pub fn with_default_message(field_names: Vec<String>) -> Self {
        Self::new(field_names, DEFAULT_ERROR_MESSAGE)
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Validator for SimpleValidator {
    fn validate(&self, values: &Values, _options: &Value) -> Errors {
        self.field_names
            .iter()
            .map(|name| {
                let error = is_empty_value(values.get(name)).then(|| self.message.clone());
                (name.clone(), error)
            })
            .collect()
    }
}

/// Only the empty string is empty.
///
/// A missing entry, `null`, `0`, `false`, and empty arrays or objects are
/// present values.
pub fn is_empty_value(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::String(s)) if s.is_empty())
}
