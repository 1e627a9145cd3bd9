//! JSON text entry points.

use crate::action::Action;
use crate::config::{FormOptions, InitialValues};
use crate::error::FormError;
use serde_json::Value;

fn parse_value(input: &str) -> Result<Value, FormError> {
    if input.trim().is_empty() {
        return Err(FormError::Parse("empty input".to_string()));
    }
    serde_json::from_str(input).map_err(|e| FormError::Parse(e.to_string()))
}

/// Parse initial values: an object (one group) or an array of objects.
pub fn parse_initial_values(input: &str) -> Result<InitialValues, FormError> {
    InitialValues::from_json(parse_value(input)?)
}

/// Parse form options. Missing keys take their defaults.
pub fn parse_options(input: &str) -> Result<FormOptions, FormError> {
    let value = parse_value(input)?;
    if !value.is_object() {
        return Err(FormError::Parse("options must be a JSON object".to_string()));
    }
    serde_json::from_value(value).map_err(|e| FormError::Parse(e.to_string()))
}

/// Parse a single action message such as `{"type": "add"}`.
pub fn parse_action(input: &str) -> Result<Action, FormError> {
    Action::from_json(parse_value(input)?)
}
