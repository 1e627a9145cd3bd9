//! Form configuration and initial values.

use crate::error::FormError;
use crate::types::Values;
use crate::validate::DEFAULT_ERROR_MESSAGE;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// Recognized form options. Every field has a default, so `{}` is valid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormOptions {
    /// Message used by the default presence validator.
    pub default_error_message: String,
    /// Whether submitting marks every field touched before checking validity.
    pub force_show_on_submit: bool,
    /// Passed unchanged to the validator and to the submit callback.
    pub validation_options: Value,
}

impl Default for FormOptions {
    fn default() -> Self {
        FormOptions {
            default_error_message: DEFAULT_ERROR_MESSAGE.to_string(),
            force_show_on_submit: true,
            validation_options: Value::Null,
        }
    }
}

/// Seed values: one mapping (a single implicit group) or a list of them.
///
/// The first mapping's field set is the form's schema and the template for
/// every group added later.
#[derive(Clone, Debug, PartialEq)]
pub enum InitialValues {
    Single(Values),
    List(Vec<Values>),
}

impl InitialValues {
    pub fn groups(&self) -> &[Values] {
        match self {
            InitialValues::Single(values) => std::slice::from_ref(values),
            InitialValues::List(list) => list,
        }
    }

    /// JSON object → one group, JSON array of objects → one group per entry.
    pub fn from_json(value: Value) -> Result<Self, FormError> {
        match value {
            Value::Object(values) => Ok(InitialValues::Single(values)),
            Value::Array(entries) => entries
                .into_iter()
                .enumerate()
                .map(|(index, entry)| match entry {
                    Value::Object(values) => Ok(values),
                    other => Err(FormError::InvalidInitialValues {
                        index,
                        reason: format!("expected an object, got {}", json_kind(&other)),
                    }),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(InitialValues::List),
            other => Err(FormError::InvalidInitialValues {
                index: 0,
                reason: format!("expected an object or array, got {}", json_kind(&other)),
            }),
        }
    }

    /// Checks the list is non-empty and every entry shares the first entry's
    /// field set. Returns that template.
    pub fn template(&self) -> Result<&Values, FormError> {
        let groups = self.groups();
        let first = groups.first().ok_or(FormError::EmptyInitialValues)?;
        let expected: BTreeSet<&String> = first.keys().collect();

        for (index, values) in groups.iter().enumerate().skip(1) {
            let found: BTreeSet<&String> = values.keys().collect();
            if found != expected {
                return Err(FormError::FieldSetMismatch {
                    index,
                    expected: first.keys().cloned().collect(),
                    found: values.keys().cloned().collect(),
                });
            }
        }
        Ok(first)
    }
}

impl From<Values> for InitialValues {
    fn from(values: Values) -> Self {
        InitialValues::Single(values)
    }
}

impl From<Vec<Values>> for InitialValues {
    fn from(list: Vec<Values>) -> Self {
        InitialValues::List(list)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
