#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let s = String::from_utf8_lossy(data);
    if let Ok(initial) = groupform::parse_initial_values(&s) {
        if let Ok(mut form) = groupform::Form::builder(initial).build() {
            let _ = form.handle_submit();
        }
    }
});
