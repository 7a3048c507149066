//! Bind JSON documents onto typed configuration records.
//!
//! A record is a plain struct that lists its bindable fields with
//! [`record!`]. Each field names its JSON key in a tag namespace (`json` by
//! default, `key` as a fallback). Binding locates each key in the document and
//! converts the value into the field's Rust type. Keys missing from the document
//! leave their fields untouched, so one record can be layered from several
//! sources.
//!
//! ```rust
//! use std::time::Duration;
//! use json_source::record;
//!
//! #[derive(Debug, Default)]
//! struct Database {
//!     url: String,
//!     timeout: Option<Duration>,
//! }
//! record!(Database {
//!     pub url(json = "url"),
//!     pub timeout(json = "timeout"),
//! });
//!
//! #[derive(Debug, Default)]
//! struct Config {
//!     name: String,
//!     database: Option<Box<Database>>,
//! }
//! record!(Config {
//!     pub name(key = "name"),
//!     pub database(json = "db"),
//! });
//!
//! let config: Config = json_source::from_str(r#"{
//!     "name": "demo",
//!     "db": { "url": "postgres://localhost", "timeout": "1m30s" }
//! }"#).unwrap();
//!
//! let db = config.database.unwrap();
//! assert_eq!(db.url, "postgres://localhost");
//! assert_eq!(db.timeout, Some(Duration::from_secs(90)));
//! ```

pub use decode::{
    decode_serde, decode_with_json_hook, decode_with_text_hook, Context, Decode, Hook, Outcome,
    UnmarshalJson, UnmarshalText,
};
pub use error::{BoxError, Error};
pub use field::Field;
pub use locate::{Document, SyntaxError};
pub use location::{Location, Span};
pub use node::{Node, NodeKind};
pub use options::Options;
pub use path::JsonPath;
pub use record::{bind_record, decode_record, Fields, Record};
pub use source::{JsonSource, Source};
pub use tags::{FieldDescriptor, Resolution, Tag};

mod buffered_input;
pub mod decode;
mod error;
mod field;
pub mod locate;
mod location;
#[macro_use]
mod macros;
mod node;
pub mod options;
mod parse_scalars;
mod path;
pub mod record;
pub mod source;
pub mod tags;

#[cfg(feature = "miette")]
pub mod miette;

/// Bind a JSON document held in a string into a fresh `T`.
pub fn from_str<T: Record>(input: &str) -> Result<T, Error> {
    from_slice_with_options(input.as_bytes(), Options::default())
}

/// Bind a JSON document held in a string into a fresh `T`, with options.
pub fn from_str_with_options<T: Record>(input: &str, options: Options) -> Result<T, Error> {
    from_slice_with_options(input.as_bytes(), options)
}

/// Bind a JSON document held in bytes into a fresh `T`.
pub fn from_slice<T: Record>(input: &[u8]) -> Result<T, Error> {
    from_slice_with_options(input, Options::default())
}

/// Bind a JSON document held in bytes into a fresh `T`, with options.
///
/// Fields whose keys are absent keep their `Default` values.
pub fn from_slice_with_options<T: Record>(input: &[u8], options: Options) -> Result<T, Error> {
    let mut record = T::default();
    bind_slice_with_options(input, &mut record, options)?;
    Ok(record)
}

/// Bind a JSON string onto an existing record.
///
/// Returns `true` when at least one field was set.
pub fn bind_str<T: Record>(input: &str, record: &mut T) -> Result<bool, Error> {
    bind_slice_with_options(input.as_bytes(), record, Options::default())
}

pub fn bind_str_with_options<T: Record>(input: &str, record: &mut T, options: Options) -> Result<bool, Error> {
    bind_slice_with_options(input.as_bytes(), record, options)
}

/// Bind JSON bytes onto an existing record.
///
/// Returns `true` when at least one field was set. Fields written before an
/// error stay written.
pub fn bind_slice<T: Record>(input: &[u8], record: &mut T) -> Result<bool, Error> {
    bind_slice_with_options(input, record, Options::default())
}

pub fn bind_slice_with_options<T: Record>(input: &[u8], record: &mut T, options: Options) -> Result<bool, Error> {
    let document = Document::new(input, &options);
    bind_record(record, document, &options, JsonPath::root())
}
