//! Form-state core for a dynamic list of independently validated field groups.
//!
//! A form holds an ordered list of groups. Each group carries its own
//! values, validator errors, and touched flags, and is identified by a
//! [`GroupKey`] that survives adds, removes, and reorders. All transitions go
//! through a pure reducer:
//!
//! ```text
//! handler.call(input) → Action → Form::flush → Reducer::reduce → FormState
//!                                                             → HandlerCache::sync
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use groupform::Form;
//! use serde_json::json;
//!
//! let initial = groupform::parse_initial_values(r#"[{"name": "", "email": ""}]"#).unwrap();
//! let mut form = Form::builder(initial)
//!     .default_error_message("Please enter a value")
//!     .on_submit(|groups, _options| println!("submitted {} groups", groups.len()))
//!     .build()
//!     .unwrap();
//!
//! let first = form.groups()[0].key;
//! let name = form.groups()[0].field("name").unwrap().handlers.clone();
//! name.on_change.call(json!({"target": {"value": "Ada"}}));
//! form.flush().unwrap();
//!
//! assert_eq!(form.group(first).unwrap().field("name").unwrap().error, None);
//! assert!(!form.handle_submit().unwrap().is_submitted());
//! ```

pub mod action;
pub mod config;
pub mod error;
pub mod form;
pub mod handlers;
pub mod keys;
pub mod normalize;
pub mod parse;
pub mod reducer;
pub mod types;
pub mod validate;

pub use action::Action;
pub use config::{FormOptions, InitialValues};
pub use error::FormError;
pub use form::{FieldView, Form, FormBuilder, GroupView, SubmitOutcome};
pub use keys::{GlobalKeys, KeyGenerator, SequentialKeys, SharedKeys};
pub use types::*;
pub use validate::{SimpleValidator, Validator};

// Re-export entry-point functions at the crate root for convenience.
pub use parse::{parse_action, parse_initial_values, parse_options};
