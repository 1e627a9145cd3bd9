//! Messages accepted by the reducer.

use crate::error::FormError;
use crate::types::GroupKey;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Action kinds, as they appear in the `type` tag of a JSON message.
pub const ACTION_KINDS: &[&str] = &["change", "blur", "blur-all", "add", "remove"];

/// A state transition request.
///
/// Serialized as a tagged object, e.g.
/// `{"type": "change", "key": 3, "fieldName": "email", "value": "a@b.c"}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Action {
    /// Replace one field's value and revalidate the whole group.
    Change {
        key: GroupKey,
        #[serde(rename = "fieldName")]
        field: String,
        #[serde(default)]
        value: Value,
    },
    /// Mark one field of one group as touched.
    Blur {
        key: GroupKey,
        #[serde(rename = "fieldName")]
        field: String,
    },
    /// Mark every field of every group as touched.
    BlurAll,
    /// Append a group seeded from the initial template.
    Add,
    /// Delete the group with this key; no-op if absent.
    Remove { key: GroupKey },
}

impl Action {
    pub fn change(key: GroupKey, field: impl Into<String>, value: impl Into<Value>) -> Self {
        Action::Change {
            key,
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn blur(key: GroupKey, field: impl Into<String>) -> Self {
        Action::Blur {
            key,
            field: field.into(),
        }
    }

    pub fn remove(key: GroupKey) -> Self {
        Action::Remove { key }
    }

    /// The wire name of this action's kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Change { .. } => "change",
            Action::Blur { .. } => "blur",
            Action::BlurAll => "blur-all",
            Action::Add => "add",
            Action::Remove { .. } => "remove",
        }
    }

    /// The group this action targets, if it targets one.
    pub fn key(&self) -> Option<GroupKey> {
        match self {
            Action::Change { key, .. } | Action::Blur { key, .. } | Action::Remove { key } => {
                Some(*key)
            }
            Action::BlurAll | Action::Add => None,
        }
    }

    /// Decodes a JSON action message.
    ///
    /// An unrecognized `type` tag is reported as [`FormError::UnknownAction`]
    /// so that callers can tell integration bugs apart from malformed payloads.
    pub fn from_json(value: Value) -> Result<Self, FormError> {
        let kind = match value.get("type") {
            Some(Value::String(kind)) => kind.clone(),
            Some(other) => return Err(FormError::UnknownAction(other.to_string())),
            None => return Err(FormError::Parse("action is missing a 'type' tag".to_string())),
        };
        if !ACTION_KINDS.contains(&kind.as_str()) {
            return Err(FormError::UnknownAction(kind));
        }
        serde_json::from_value(value).map_err(|e| FormError::Parse(format!("{kind} action: {e}")))
    }
}
