#![no_main]

use groupform::{Form, FormOptions};
use libfuzzer_sys::fuzz_target;
use serde_json::json;

// Each line is one JSON action message; the form must absorb any sequence
// without panicking and keep its live keys distinct.
fuzz_target!(|data: &[u8]| {
    let s = String::from_utf8_lossy(data);
    let template = json!({"foo": "", "bar": ""}).as_object().cloned().unwrap();
    let mut form = Form::new(vec![template], FormOptions::default()).unwrap();

    for line in s.lines() {
        if let Ok(action) = groupform::parse_action(line) {
            let _ = form.dispatch(action);
        }
    }

    let mut keys = form.keys();
    let live = keys.len();
    keys.sort();
    keys.dedup();
    assert_eq!(keys.len(), live);
    assert_eq!(form.groups().len(), live);
});
