#![no_main]

use std::collections::HashMap;
use std::time::Duration;

use libfuzzer_sys::fuzz_target;
use serde::Deserialize;

#[derive(Debug, Default)]
struct Inner {
    x: Option<i64>,
    label: Option<Box<String>>,
}

json_source::record!(Inner {
    pub x(json = "x"),
    pub label(json = "label"),
});

#[derive(Debug, Deserialize)]
struct Nested {
    k: Option<String>,
}

#[derive(Debug, Default)]
struct Doc {
    a: i64,
    f: f32,
    flag: bool,
    c: Option<char>,
    timeout: Option<Duration>,
    inner: Option<Box<Inner>>,
    list: Vec<Nested>,
    map: HashMap<String, u8>,
}

json_source::record!(Doc {
    pub a(json = "a"),
    pub f(json = "f"),
    pub flag(json = "flag"),
    pub c(json = "c"),
    pub timeout(json = "timeout"),
    pub inner(json = "inner"),
    pub list(json = "list"),
    pub map(json = "map"),
});

// Binding must report errors, never panic.
fuzz_target!(|data: &[u8]| {
    if data.len() > 16 * 1024 {
        return;
    }
    let _ = json_source::from_slice::<Doc>(data);
    let mut doc = Doc::default();
    let _ = json_source::bind_slice(data, &mut doc);
    let _ = json_source::bind_slice(data, &mut doc);
});
