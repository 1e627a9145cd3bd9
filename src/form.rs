//! The consumer-facing form facade.
//!
//! A [`Form`] owns the reducer state, the handler cache, and the receiving
//! end of the action queue. Reads go through [`Form::groups`], a projection
//! of the current state merged with the cached handlers.

use crate::action::Action;
use crate::config::{FormOptions, InitialValues};
use crate::error::FormError;
use crate::handlers::{AddHandler, Dispatch, FieldHandlers, HandlerCache, RemoveHandler};
use crate::keys::{KeyGenerator, SequentialKeys};
use crate::reducer::Reducer;
use crate::types::{Errors, FormState, GroupKey, Values};
use crate::validate::{SimpleValidator, Validator};
use serde_json::{Map, Value, json};
use std::fmt;
use std::sync::Arc;
use std::sync::mpsc::Receiver;
use tracing::{debug, error};

/// Callback invoked with every group's values on a fully valid submission.
pub type SubmitFn = Box<dyn FnMut(&[Values], &Value)>;

static NULL: Value = Value::Null;

// ─── Builder ────────────────────────────────────────────────────────────────

/// Assembles a [`Form`].
///
/// Without an explicit validator the form uses [`SimpleValidator`] with
/// [`FormOptions::default_error_message`]; without an explicit key
/// generator it counts keys per form from zero.
pub struct FormBuilder {
    initial: InitialValues,
    options: FormOptions,
    validator: Option<Box<dyn Validator>>,
    keys: Option<Box<dyn KeyGenerator>>,
    on_submit: Option<SubmitFn>,
}

impl FormBuilder {
    pub fn new(initial: impl Into<InitialValues>) -> Self {
        FormBuilder {
            initial: initial.into(),
            options: FormOptions::default(),
            validator: None,
            keys: None,
            on_submit: None,
        }
    }

    pub fn options(mut self, options: FormOptions) -> Self {
        self.options = options;
        self
    }

    pub fn default_error_message(mut self, message: impl Into<String>) -> Self {
        self.options.default_error_message = message.into();
        self
    }

    pub fn force_show_on_submit(mut self, force: bool) -> Self {
        self.options.force_show_on_submit = force;
        self
    }

    pub fn validation_options(mut self, options: Value) -> Self {
        self.options.validation_options = options;
        self
    }

    pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validator = Some(Box::new(validator));
        self
    }

    /// Like [`validator`](Self::validator), with closure argument types inferred.
    pub fn validate_with<F>(self, validate: F) -> Self
    where
        F: Fn(&Values, &Value) -> Errors + 'static,
    {
        self.validator(validate)
    }

    pub fn key_generator(mut self, keys: impl KeyGenerator + 'static) -> Self {
        self.keys = Some(Box::new(keys));
        self
    }

    pub fn on_submit<F>(mut self, on_submit: F) -> Self
    where
        F: FnMut(&[Values], &Value) + 'static,
    {
        self.on_submit = Some(Box::new(on_submit));
        self
    }

    pub fn build(self) -> Result<Form, FormError> {
        let template = self.initial.template()?.clone();
        let field_names: Vec<String> = template.keys().cloned().collect();

        let validator = self.validator.unwrap_or_else(|| {
            Box::new(SimpleValidator::new(
                field_names.clone(),
                self.options.default_error_message.clone(),
            ))
        });
        let keys = self.keys.unwrap_or_else(|| Box::new(SequentialKeys::new()));

        let mut reducer = Reducer::new(
            template,
            validator,
            self.options.validation_options.clone(),
            keys,
        );
        let state = reducer.initial_state(self.initial.groups());

        let (dispatch, inbox) = Dispatch::channel();
        let handlers = HandlerCache::new(dispatch.clone(), field_names, &state.keys());

        debug!(groups = state.len(), "form initialized");
        Ok(Form {
            reducer,
            state,
            handlers,
            add: Arc::new(AddHandler::new(dispatch.clone())),
            sender: dispatch,
            inbox,
            force_show_on_submit: self.options.force_show_on_submit,
            on_submit: self.on_submit,
        })
    }
}

// ─── Views ──────────────────────────────────────────────────────────────────

/// Read-only projection of one field.
#[derive(Clone, Debug)]
pub struct FieldView<'a> {
    pub name: &'a str,
    pub value: &'a Value,
    /// The field's error message, if it has a non-empty one.
    pub error: Option<&'a str>,
    pub touched: bool,
    pub handlers: Arc<FieldHandlers>,
}

/// Read-only projection of one group.
#[derive(Clone, Debug)]
pub struct GroupView<'a> {
    pub key: GroupKey,
    pub is_valid: bool,
    pub remove: Arc<RemoveHandler>,
    /// Fields in schema order.
    pub fields: Vec<FieldView<'a>>,
}

impl<'a> GroupView<'a> {
    pub fn field(&self, name: &str) -> Option<&FieldView<'a>> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Result of [`Form::handle_submit`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Every group was valid; the submit callback (if any) ran.
    Submitted,
    /// At least one group was invalid; the callback did not run.
    Blocked { invalid: Vec<GroupKey> },
}

impl SubmitOutcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, SubmitOutcome::Submitted)
    }
}

// ─── Form ───────────────────────────────────────────────────────────────────

/// Form state for an ordered, resizable list of field groups.
pub struct Form {
    reducer: Reducer,
    state: FormState,
    handlers: HandlerCache,
    add: Arc<AddHandler>,
    sender: Dispatch,
    inbox: Receiver<Action>,
    force_show_on_submit: bool,
    on_submit: Option<SubmitFn>,
}

impl fmt::Debug for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Form")
            .field("state", &self.state)
            .field("handler_generation", &self.handlers.generation())
            .field("force_show_on_submit", &self.force_show_on_submit)
            .finish_non_exhaustive()
    }
}

impl Form {
    pub fn builder(initial: impl Into<InitialValues>) -> FormBuilder {
        FormBuilder::new(initial)
    }

    /// Builds a form with the default validator and no submit callback.
    pub fn new(initial: impl Into<InitialValues>, options: FormOptions) -> Result<Self, FormError> {
        FormBuilder::new(initial).options(options).build()
    }

    /// Applies `action` immediately.
    ///
    /// On error the state is left unchanged.
    pub fn dispatch(&mut self, action: Action) -> Result<(), FormError> {
        let next = self.reducer.reduce(&self.state, action)?;
        self.commit(next);
        Ok(())
    }

    fn commit(&mut self, next: FormState) {
        self.state = next;
        self.handlers.sync(&self.state.keys());
    }

    /// Applies every action queued by handlers, in order. Returns how many
    /// were applied.
    ///
    /// Stops at the first failing action; it is dropped and the actions
    /// queued behind it stay queued.
    pub fn flush(&mut self) -> Result<usize, FormError> {
        let mut applied = 0;
        while let Ok(action) = self.inbox.try_recv() {
            let kind = action.kind();
            if let Err(e) = self.dispatch(action) {
                error!(action = kind, error = %e, "queued form action failed");
                return Err(e);
            }
            applied += 1;
        }
        Ok(applied)
    }

    /// Appends a group seeded from the initial template. Returns its key.
    pub fn add(&mut self) -> GroupKey {
        let (next, key) = self.reducer.append(&self.state);
        debug!(action = "add", key = %key, groups = next.len(), "applied form action");
        self.commit(next);
        key
    }

    /// Removes the group with `key`. Returns false if it was not live.
    pub fn remove(&mut self, key: GroupKey) -> Result<bool, FormError> {
        let present = self.state.find(key).is_some();
        self.dispatch(Action::remove(key))?;
        Ok(present)
    }

    /// Submits if every group is valid.
    ///
    /// Queued actions are applied first. With `forceShowOnSubmit`, every
    /// field is marked touched before validity is checked, so an invalid
    /// submission still reveals its errors.
    pub fn handle_submit(&mut self) -> Result<SubmitOutcome, FormError> {
        self.flush()?;
        if self.force_show_on_submit {
            self.dispatch(Action::BlurAll)?;
        }

        let invalid: Vec<GroupKey> = self
            .state
            .groups()
            .iter()
            .filter(|g| !g.is_valid())
            .map(|g| g.key())
            .collect();
        if !invalid.is_empty() {
            debug!(invalid = invalid.len(), groups = self.state.len(), "submit blocked");
            return Ok(SubmitOutcome::Blocked { invalid });
        }

        let values = self.state.values();
        if let Some(on_submit) = self.on_submit.as_mut() {
            on_submit(&values, self.reducer.options());
        }
        debug!(groups = values.len(), "form submitted");
        Ok(SubmitOutcome::Submitted)
    }

    /// Current groups merged with their cached handlers, in display order.
    pub fn groups(&self) -> Vec<GroupView<'_>> {
        self.state
            .groups()
            .iter()
            .zip(self.handlers.entries())
            .map(|(group, handlers)| {
                debug_assert_eq!(group.key(), handlers.key());
                let fields = handlers
                    .fields()
                    .map(|(name, field_handlers)| FieldView {
                        name,
                        value: group.value(name).unwrap_or(&NULL),
                        error: group.error(name),
                        touched: group.is_touched(name),
                        handlers: Arc::clone(field_handlers),
                    })
                    .collect();
                GroupView {
                    key: group.key(),
                    is_valid: group.is_valid(),
                    remove: Arc::clone(handlers.remove()),
                    fields,
                }
            })
            .collect()
    }

    pub fn group(&self, key: GroupKey) -> Option<GroupView<'_>> {
        self.groups().into_iter().find(|g| g.key == key)
    }

    /// True iff every group is valid; vacuously true with no groups.
    pub fn are_all_valid(&self) -> bool {
        self.state.are_all_valid()
    }

    /// Every group's values, in display order.
    pub fn values(&self) -> Vec<Values> {
        self.state.values()
    }

    pub fn keys(&self) -> Vec<GroupKey> {
        self.state.keys()
    }

    pub fn field_names(&self) -> &[String] {
        self.reducer.field_names()
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    /// The form's single `add` handler.
    pub fn add_handler(&self) -> Arc<AddHandler> {
        Arc::clone(&self.add)
    }

    /// A sender for actions built outside the handler cache.
    pub fn dispatcher(&self) -> Dispatch {
        self.sender.clone()
    }

    /// Number of times the handler cache has been rebuilt.
    pub fn handler_generation(&self) -> u64 {
        self.handlers.generation()
    }

    /// JSON rendering of the visible state, without handlers.
    ///
    /// `{"groups": [{"key", "isValid", "fields": {name: {"error", "touched", "value"}}}], "areAllValid"}`
    pub fn snapshot(&self) -> Value {
        let groups: Vec<Value> = self
            .groups()
            .iter()
            .map(|group| {
                let fields: Map<String, Value> = group
                    .fields
                    .iter()
                    .map(|f| {
                        let field = json!({
                            "error": f.error,
                            "touched": f.touched,
                            "value": f.value,
                        });
                        (f.name.to_string(), field)
                    })
                    .collect();
                json!({
                    "key": group.key,
                    "isValid": group.is_valid,
                    "fields": fields,
                })
            })
            .collect();
        json!({
            "groups": groups,
            "areAllValid": self.are_all_valid(),
        })
    }
}
