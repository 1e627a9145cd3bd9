use thiserror::Error;

use crate::types::GroupKey;

/// Integration or programming errors raised by the form core.
///
/// Per-field validation failures are not represented here: they are data,
/// carried in each group's [`Errors`](crate::types::Errors) map.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FormError {
    /// The initial values list contained no groups.
    #[error("initial values must contain at least one group")]
    EmptyInitialValues,

    /// An initial values entry was not a field-name mapping.
    #[error("initial values entry {index} is invalid: {reason}")]
    InvalidInitialValues { index: usize, reason: String },

    /// An initial values entry declared a different field set than the first entry.
    #[error("initial values entry {index} has fields {found:?}, expected {expected:?}")]
    FieldSetMismatch {
        index: usize,
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// `change` or `blur` referenced a key that is not live.
    #[error("no group with key {0}")]
    UnknownGroup(GroupKey),

    /// `change` or `blur` named a field outside the form's schema.
    #[error("group {key} has no field '{field}'")]
    UnknownField { key: GroupKey, field: String },

    /// An action message carried an unrecognized kind.
    #[error("unknown action type: {0}")]
    UnknownAction(String),

    /// JSON input could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),
}

impl FormError {
    /// True for errors that indicate a caller bug rather than bad input data.
    pub fn is_invariant_breach(&self) -> bool {
        matches!(
            self,
            FormError::UnknownGroup(_)
                | FormError::UnknownField { .. }
                | FormError::UnknownAction(_)
        )
    }
}
