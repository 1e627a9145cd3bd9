//! Stable per-group, per-field callbacks.
//!
//! Handlers never touch form state. Each one builds an [`Action`] and sends
//! it through the form's [`Dispatch`] channel; the form applies queued
//! actions on [`Form::flush`](crate::form::Form::flush).
//!
//! [`HandlerCache`] hands out handlers behind `Arc` so consumers can bind
//! them once and compare identity with `Arc::ptr_eq`. The cache is keyed by
//! the exact ordered list of live keys and only rebuilds when that list
//! changes. A rebuild reuses the entries of keys that are still live, so a
//! key's handlers stay identical for as long as the key lives.

use crate::action::Action;
use crate::normalize::change_value;
use crate::types::GroupKey;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use tracing::{trace, warn};

// ─── Dispatch ───────────────────────────────────────────────────────────────

/// Sending half of a form's action queue.
#[derive(Clone, Debug)]
pub struct Dispatch {
    tx: Sender<Action>,
}

impl Dispatch {
    pub(crate) fn channel() -> (Dispatch, Receiver<Action>) {
        let (tx, rx) = mpsc::channel();
        (Dispatch { tx }, rx)
    }

    /// Queues `action`. Returns false if the owning form is gone.
    pub fn send(&self, action: Action) -> bool {
        let kind = action.kind();
        match self.tx.send(action) {
            Ok(()) => true,
            Err(_) => {
                warn!(action = kind, "form dropped, discarding action");
                false
            }
        }
    }
}

// ─── Individual handlers ────────────────────────────────────────────────────

/// Sends `change` for one field of one group.
#[derive(Clone, Debug)]
pub struct ChangeHandler {
    key: GroupKey,
    field: String,
    dispatch: Dispatch,
}

impl ChangeHandler {
    /// Accepts a raw value or an event-like object (`{"target": {"value": ..}}`).
    pub fn call(&self, input: impl Into<Value>) {
        self.dispatch.send(Action::Change {
            key: self.key,
            field: self.field.clone(),
            value: change_value(input.into()),
        });
    }

    pub fn key(&self) -> GroupKey {
        self.key
    }

    pub fn field(&self) -> &str {
        &self.field
    }
}

/// Sends `blur` for one field of one group.
#[derive(Clone, Debug)]
pub struct BlurHandler {
    key: GroupKey,
    field: String,
    dispatch: Dispatch,
}

impl BlurHandler {
    pub fn call(&self) {
        self.dispatch.send(Action::blur(self.key, self.field.clone()));
    }

    pub fn key(&self) -> GroupKey {
        self.key
    }

    pub fn field(&self) -> &str {
        &self.field
    }
}

/// Sends `remove` for one group.
#[derive(Clone, Debug)]
pub struct RemoveHandler {
    key: GroupKey,
    dispatch: Dispatch,
}

impl RemoveHandler {
    pub fn call(&self) {
        self.dispatch.send(Action::remove(self.key));
    }

    pub fn key(&self) -> GroupKey {
        self.key
    }
}

/// Sends `add`. One per form, stable for the form's lifetime.
#[derive(Clone, Debug)]
pub struct AddHandler {
    dispatch: Dispatch,
}

impl AddHandler {
    pub(crate) fn new(dispatch: Dispatch) -> Self {
        AddHandler { dispatch }
    }

    pub fn call(&self) {
        self.dispatch.send(Action::Add);
    }
}

// ─── Grouped handlers ───────────────────────────────────────────────────────

/// The change/blur pair bound to one field of one group.
#[derive(Debug)]
pub struct FieldHandlers {
    pub on_change: ChangeHandler,
    pub on_blur: BlurHandler,
}

/// All handlers of one group.
#[derive(Debug)]
pub struct GroupHandlers {
    key: GroupKey,
    remove: Arc<RemoveHandler>,
    fields: Vec<(String, Arc<FieldHandlers>)>,
}

impl GroupHandlers {
    fn new(key: GroupKey, field_names: &[String], dispatch: &Dispatch) -> Self {
        let fields = field_names
            .iter()
            .map(|name| {
                let handlers = FieldHandlers {
                    on_change: ChangeHandler {
                        key,
                        field: name.clone(),
                        dispatch: dispatch.clone(),
                    },
                    on_blur: BlurHandler {
                        key,
                        field: name.clone(),
                        dispatch: dispatch.clone(),
                    },
                };
                (name.clone(), Arc::new(handlers))
            })
            .collect();
        GroupHandlers {
            key,
            remove: Arc::new(RemoveHandler {
                key,
                dispatch: dispatch.clone(),
            }),
            fields,
        }
    }

    pub fn key(&self) -> GroupKey {
        self.key
    }

    pub fn remove(&self) -> &Arc<RemoveHandler> {
        &self.remove
    }

    /// Field handlers in schema order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Arc<FieldHandlers>)> {
        self.fields
            .iter()
            .map(|(name, handlers)| (name.as_str(), handlers))
    }

    pub fn field(&self, name: &str) -> Option<&Arc<FieldHandlers>> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, handlers)| handlers)
    }
}

// ─── Cache ──────────────────────────────────────────────────────────────────

/// Memoized handler mapping, keyed by the ordered list of live keys.
///
/// Entries are kept in live-key order, aligned with the form state.
#[derive(Debug)]
pub struct HandlerCache {
    dispatch: Dispatch,
    field_names: Vec<String>,
    keys: Vec<GroupKey>,
    entries: Vec<Arc<GroupHandlers>>,
    generation: u64,
}

impl HandlerCache {
    pub fn new(dispatch: Dispatch, field_names: Vec<String>, live: &[GroupKey]) -> Self {
        let entries = live
            .iter()
            .map(|&key| Arc::new(GroupHandlers::new(key, &field_names, &dispatch)))
            .collect();
        HandlerCache {
            dispatch,
            field_names,
            keys: live.to_vec(),
            entries,
            generation: 0,
        }
    }

    /// Brings the cache in line with `live`. Returns true if it rebuilt.
    ///
    /// Must run before any read that follows a transition which changed the
    /// live-key list.
    pub fn sync(&mut self, live: &[GroupKey]) -> bool {
        if self.keys == live {
            return false;
        }

        let mut previous: HashMap<GroupKey, Arc<GroupHandlers>> = std::mem::take(&mut self.entries)
            .into_iter()
            .map(|handlers| (handlers.key, handlers))
            .collect();
        self.entries = live
            .iter()
            .map(|&key| {
                previous.remove(&key).unwrap_or_else(|| {
                    Arc::new(GroupHandlers::new(key, &self.field_names, &self.dispatch))
                })
            })
            .collect();
        self.keys = live.to_vec();
        self.generation += 1;

        trace!(
            generation = self.generation,
            live = live.len(),
            dropped = previous.len(),
            "rebuilt handler cache"
        );
        true
    }

    pub fn group(&self, key: GroupKey) -> Option<&Arc<GroupHandlers>> {
        self.entries.iter().find(|handlers| handlers.key == key)
    }

    /// Handlers of every live group, in live-key order.
    pub fn entries(&self) -> &[Arc<GroupHandlers>] {
        &self.entries
    }

    pub fn keys(&self) -> &[GroupKey] {
        &self.keys
    }

    /// Number of rebuilds since construction.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
