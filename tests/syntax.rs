use indoc::indoc;
use json_source::{from_slice, from_str, from_str_with_options, record, Error};

#[derive(Debug, Default)]
struct Config {
    field_a: String,
    field_b: String,
    list: Vec<u8>,
}

record!(Config {
    pub field_a(key = "field_a"),
    pub field_b(key = "field_b"),
    pub list(key = "list"),
});

#[test]
fn trailing_commas() {
    let json = indoc! {r#"
        {
            "field_a": "content a",
        }
    "#};
    let c: Config = from_str(json).unwrap();
    assert_eq!(c.field_a, "content a");

    let strict = json_source::options! { allow_trailing_commas: false };
    let err = from_str_with_options::<Config>(json, strict).unwrap_err();
    assert!(matches!(err, Error::Malformed { .. }), "{err}");
}

#[test]
fn trailing_commas_inside_generic_values_stay_strict() {
    let err = from_str::<Config>(r#"{"list": [1, 2,]}"#).unwrap_err();
    assert!(matches!(err, Error::Unmarshal { field: "list", .. }), "{err}");
}

#[test]
fn comments() {
    let json = indoc! {r#"
        {
            "field_a": "content a",
            //This is a comment
            "field_b": /* inline */ "content b"
        }
    "#};
    let c: Config = from_str(json).unwrap();
    assert_eq!(c.field_a, "content a");
    assert_eq!(c.field_b, "content b");

    let strict = json_source::options! { allow_comments: false };
    let err = from_str_with_options::<Config>(json, strict).unwrap_err();
    assert!(matches!(err, Error::Malformed { .. }), "{err}");
}

#[test]
fn first_duplicate_key_wins() {
    let c: Config = from_str(r#"{"field_a": "first", "field_a": "second"}"#).unwrap();
    assert_eq!(c.field_a, "first");
}

#[test]
fn escaped_keys_match() {
    let c: Config = from_str(r#"{"field\u005fa": "escaped"}"#).unwrap();
    assert_eq!(c.field_a, "escaped");
}

#[test]
fn empty_document_is_malformed() {
    for json in ["", "   \n", "// only a comment\n"] {
        let err = from_str::<Config>(json).unwrap_err();
        assert!(matches!(err, Error::Malformed { .. }), "{json:?}: {err}");
        assert!(err.is_parse_value());
    }
}

#[test]
fn broken_documents_are_malformed() {
    for json in [
        r#"{"field_a": "unterminated"#,
        r#"{"field_a" "missing colon"}"#,
        r#"{"other": [1, 2 "field_a": "x"}"#,
        r#"{"other": {"deep": }, "field_a": "x"}"#,
    ] {
        let err = from_str::<Config>(json).unwrap_err();
        assert!(matches!(err, Error::Malformed { .. }), "{json}: {err}");
    }
}

#[test]
fn malformed_error_names_the_path_and_location() {
    let json = "{\n  \"field_a\": tru\n}";
    let err = from_str::<Config>(json).unwrap_err();
    match &err {
        Error::Malformed { path, location, .. } => {
            assert_eq!(path.to_string(), "field_a");
            assert_eq!(location.line(), 2);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().starts_with("malformed JSON while accessing 'field_a'"), "{err}");
}

#[test]
fn byte_order_mark_is_ignored() {
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice(br#"{"field_b": "bom"}"#);
    let c: Config = from_slice(&bytes).unwrap();
    assert_eq!(c.field_b, "bom");
}

#[test]
fn nesting_limit() {
    let deep = format!(r#"{{"other": {}{}, "field_a": "x"}}"#, "[".repeat(200), "]".repeat(200));
    let err = from_str::<Config>(&deep).unwrap_err();
    assert!(matches!(err, Error::Malformed { .. }), "{err}");

    let options = json_source::options! { max_depth: 512 };
    let c: Config = from_str_with_options(&deep, options).unwrap();
    assert_eq!(c.field_a, "x");
}
