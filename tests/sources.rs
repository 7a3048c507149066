use std::io::{self, Cursor, Read, Write};

use anyhow::Result;
use json_source::{record, Error, JsonSource, Source};
use tempfile::NamedTempFile;

#[derive(Debug, Default)]
struct Config {
    field_a: String,
    field_b: Option<u32>,
}

record!(Config {
    pub field_a(key = "field_a"),
    pub field_b(json = "field_b"),
});

fn write_temp(content: &[u8]) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(content)?;
    file.flush()?;
    Ok(file)
}

#[test]
fn path_source() -> Result<()> {
    let file = write_temp(br#"{"field_a": "from file", "field_b": 3}"#)?;
    let mut c = Config::default();
    let loaded = JsonSource::new().path(file.path()).parse(&mut c)?;
    assert!(loaded);
    assert_eq!(c.field_a, "from file");
    assert_eq!(c.field_b, Some(3));
    Ok(())
}

#[test]
fn path_source_with_utf16_content() -> Result<()> {
    let mut bytes = vec![0xFF, 0xFE];
    for unit in r#"{"field_a": "wide"}"#.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    let file = write_temp(&bytes)?;
    let mut c = Config::default();
    JsonSource::new().path(file.path()).parse(&mut c)?;
    assert_eq!(c.field_a, "wide");
    Ok(())
}

#[test]
fn missing_path_is_skipped_unless_required() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let missing = dir.path().join("nope.json");
    let mut c = Config {
        field_a: "default".to_owned(),
        ..Config::default()
    };

    let loaded = JsonSource::new().path(&missing).parse(&mut c)?;
    assert!(!loaded);
    assert_eq!(c.field_a, "default");

    let err = JsonSource::new().path(&missing).must().parse(&mut c).unwrap_err();
    assert!(err.is_source_not_found());
    assert!(err.to_string().contains("nope.json"), "{err}");
    Ok(())
}

#[test]
fn reader_source() -> Result<()> {
    let mut c = Config::default();
    let reader = Cursor::new(br#"{"field_a": "from reader"}"#.to_vec());
    assert!(JsonSource::new().reader(reader).must().parse(&mut c)?);
    assert_eq!(c.field_a, "from reader");
    Ok(())
}

struct FailingReader;

impl Read for FailingReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "no access"))
    }
}

struct VanishedReader;

impl Read for VanishedReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::from(io::ErrorKind::NotFound))
    }
}

#[test]
fn reader_errors() {
    let mut c = Config::default();
    let err = JsonSource::new().reader(FailingReader).parse(&mut c).unwrap_err();
    assert!(matches!(err, Error::IOError { .. }), "{err}");
    assert!(!err.is_parse_value());

    assert!(!JsonSource::new().reader(VanishedReader).parse(&mut c).unwrap());
    let err = JsonSource::new().reader(VanishedReader).must().parse(&mut c).unwrap_err();
    assert!(err.is_source_not_found());
}

#[test]
fn source_configuration_is_verified_first() {
    let mut c = Config::default();
    let err = JsonSource::new().must().parse(&mut c).unwrap_err();
    assert!(matches!(err, Error::NoDataSource));

    let err = JsonSource::new()
        .bytes(b"{}".to_vec())
        .reader(Cursor::new(b"{}".to_vec()))
        .parse(&mut c)
        .unwrap_err();
    assert!(matches!(err, Error::MultipleDataSources { count: 2 }));

    // Bytes and strings share one slot; the later call wins.
    let loaded = JsonSource::new()
        .bytes(br#"{"field_b": 1}"#.to_vec())
        .string(r#"{"field_b": 2}"#)
        .parse(&mut c)
        .unwrap();
    assert!(loaded);
    assert_eq!(c.field_b, Some(2));

    // A missing file still counts as configured.
    let err = JsonSource::new()
        .path("does/not/exist.json")
        .string(r#"{"field_a": "x"}"#)
        .parse(&mut c)
        .unwrap_err();
    assert!(matches!(err, Error::MultipleDataSources { .. }));
    assert!(c.field_a.is_empty());
}

#[test]
fn input_limit_applies_to_files() -> Result<()> {
    let file = write_temp(br#"{"field_a": "this is too long"}"#)?;
    let mut c = Config::default();
    let options = json_source::options! { input_limit: Some(8) };
    let err = JsonSource::new()
        .path(file.path())
        .options(options)
        .parse(&mut c)
        .unwrap_err();
    match err {
        Error::IOError { cause } => assert_eq!(cause.kind(), io::ErrorKind::FileTooLarge),
        other => panic!("unexpected error: {other}"),
    }
    Ok(())
}

#[test]
fn key_tag_selects_namespace() -> Result<()> {
    let source = JsonSource::new().bytes(br#"{"field_b": 1, "other": 2}"#.to_vec());
    assert_eq!(source.key_tag(), "json");

    #[derive(Debug, Default)]
    struct Tagged {
        value: u8,
    }
    record!(Tagged { pub value(json = "field_b", cfg = "other") });

    let mut t = Tagged::default();
    JsonSource::new()
        .bytes(br#"{"field_b": 1, "other": 2}"#.to_vec())
        .options(json_source::options! { key_tag: "cfg".into() })
        .parse(&mut t)?;
    assert_eq!(t.value, 2);
    Ok(())
}
