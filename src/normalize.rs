//! Normalization of change payloads.
//!
//! UI layers hand change handlers either a raw value or an event-like object
//! whose nested `target` carries the value. Both collapse to a plain value
//! before an action is built.

use serde_json::Value;

/// True if `input` has a `target` member that is compound (an object or an
/// array).
pub fn is_event_like(input: &Value) -> bool {
    input
        .get("target")
        .is_some_and(|target| target.is_object() || target.is_array())
}

/// Extracts `target.value` from event-like input, or returns `input` as-is.
///
/// An event whose target has no `value` yields `null`. Array targets never
/// carry one.
pub fn change_value(input: Value) -> Value {
    if !is_event_like(&input) {
        return input;
    }
    match input {
        Value::Object(mut event) => match event.remove("target") {
            Some(Value::Object(mut target)) => target.remove("value").unwrap_or(Value::Null),
            _ => Value::Null,
        },
        _ => Value::Null,
    }
}
