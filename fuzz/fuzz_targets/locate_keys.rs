#![no_main]

use json_source::{Document, Options};
use libfuzzer_sys::fuzz_target;

// Arbitrary bytes through the locator, with and without lenient syntax, along
// a few key paths of different depths.
fuzz_target!(|data: &[u8]| {
    if data.len() > 64 * 1024 {
        return;
    }
    let lenient = Options::default();
    let strict = json_source::options! {
        allow_comments: false,
        allow_trailing_commas: false,
        max_depth: 16,
    };
    for options in [&lenient, &strict] {
        let document = Document::new(data, options);
        for keys in [&[][..], &["a"][..], &["a", "b"][..], &["a", "b", "c", "d"][..]] {
            if let Ok(Some(node)) = document.find(keys) {
                let _ = node.unescape();
                let _ = node.quoted();
            }
        }
    }
});
