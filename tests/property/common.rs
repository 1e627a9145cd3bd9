use groupform::{Action, Form, GroupKey, Values};
use proptest::prelude::*;
use serde_json::{Value, json};

pub const FIELDS: [&str; 3] = ["foo", "bar", "baz"];
pub const MESSAGE: &str = "Please enter a value";

/// A form operation addressed by position, resolved against live keys at
/// apply time so that generated sequences stay meaningful after removes.
#[derive(Clone, Debug)]
pub enum Op {
    Add,
    Remove(usize),
    RemoveAbsent,
    Change(usize, usize, String),
    Blur(usize, usize),
    BlurAll,
}

pub fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), "[a-z ]{1,8}"]
}

pub fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        2 => Just(Op::Add),
        2 => any::<usize>().prop_map(Op::Remove),
        1 => Just(Op::RemoveAbsent),
        4 => (any::<usize>(), 0..FIELDS.len(), arb_text())
            .prop_map(|(g, f, t)| Op::Change(g, f, t)),
        2 => (any::<usize>(), 0..FIELDS.len()).prop_map(|(g, f)| Op::Blur(g, f)),
        1 => Just(Op::BlurAll),
    ]
}

pub fn arb_values() -> impl Strategy<Value = Values> {
    (arb_text(), arb_text(), arb_text()).prop_map(|(foo, bar, baz)| {
        json!({"foo": foo, "bar": bar, "baz": baz})
            .as_object()
            .cloned()
            .unwrap()
    })
}

pub fn template() -> Values {
    json!({"foo": "", "bar": "", "baz": ""})
        .as_object()
        .cloned()
        .unwrap()
}

pub fn form() -> Form {
    Form::builder(vec![template()])
        .default_error_message(MESSAGE)
        .build()
        .unwrap()
}

/// Resolves `op` against the form's current keys. `None` when the op
/// addresses a group and there are none.
pub fn resolve(form: &Form, op: &Op) -> Option<Action> {
    let keys = form.keys();
    let pick = |i: usize| keys.get(i % keys.len().max(1)).copied();
    match op {
        Op::Add => Some(Action::Add),
        Op::Remove(i) => pick(*i).map(Action::remove),
        Op::RemoveAbsent => Some(Action::remove(GroupKey::new(u64::MAX))),
        Op::Change(i, f, text) => {
            pick(*i).map(|k| Action::change(k, FIELDS[*f], Value::from(text.as_str())))
        }
        Op::Blur(i, f) => pick(*i).map(|k| Action::blur(k, FIELDS[*f])),
        Op::BlurAll => Some(Action::BlurAll),
    }
}
