#![forbid(unsafe_code)]

use std::process::exit;

use json_source::{Document, Location, Options};

/// Locate a value in a JSON file and print its kind and raw text. This tool shows
/// what a record field bound to the given key path would receive. The first
/// parameter is the file name; the remaining ones are the keys to descend.
fn main() {
    let mut args = std::env::args().skip(1);
    let path = match args.next().ok_or(
        "Locates a value in a JSON file the way record binding does. \
        Expected a path to a JSON file as the first argument, followed by the keys to descend",
    ) {
        Ok(path) => path,
        Err(err) => {
            eprintln!("{err}");
            exit(1);
        }
    };
    let keys: Vec<String> = args.collect();

    let content = match std::fs::read(&path) {
        Ok(content) => content,
        Err(err) => {
            eprintln!("Failed to read {path}: {err}");
            exit(2);
        }
    };

    let options = Options::default();
    let document = Document::new(&content, &options);
    let keys: Vec<&str> = keys.iter().map(String::as_str).collect();

    match document.find(&keys) {
        Ok(Some(node)) => {
            let location = Location::locate(&content, node.span());
            println!(
                "{} at line {}, column {}:\n{}",
                node.kind(),
                location.line(),
                location.column(),
                node.raw_text()
            );
        }
        Ok(None) => {
            eprintln!("{path}: no value at {}", keys.join("."));
            exit(3);
        }
        Err(err) => {
            eprintln!("{path} invalid:\n{err}");
            exit(3);
        }
    }
}
