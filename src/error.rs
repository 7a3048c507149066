//! Defines error and its location
use std::fmt;

use crate::location::Location;
use crate::node::NodeKind;
use crate::path::JsonPath;

/// Boxed failure reported by a custom decoder.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Every way binding a JSON document onto a record can fail.
///
/// The first error aborts the whole bind call. Fields written before the
/// failure stay written.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// None of bytes, string, path or reader has been configured on a source.
    NoDataSource,
    /// More than one of bytes, string, path or reader has been configured.
    MultipleDataSources { count: usize },
    /// The underlying input does not exist (for example, a missing file).
    /// Only surfaced when the source is marked as `must`.
    SourceNotFound { source: String },
    /// Reading the input failed for a reason other than "not found".
    IOError { cause: std::io::Error },
    /// A bindable field carries no key in any recognized tag namespace.
    MissingKey {
        field: &'static str,
        key_tag: String,
        fallback_key_tag: String,
    },
    /// The coarse type of the node is incompatible with the field's type.
    TypeMismatch {
        field: &'static str,
        path: JsonPath,
        expected: &'static str,
        found: NodeKind,
        location: Location,
    },
    /// The node has the right coarse type but its content does not fit the
    /// field (out of range numbers, invalid duration literals, bad escapes).
    Conversion {
        field: &'static str,
        path: JsonPath,
        value: String,
        expected: &'static str,
        reason: String,
        location: Location,
    },
    /// A custom or generic decoder rejected the raw bytes.
    Unmarshal {
        field: &'static str,
        path: JsonPath,
        cause: BoxError,
        location: Location,
    },
    /// The field's type is not supported and never will be.
    UnsupportedType {
        field: &'static str,
        path: JsonPath,
        type_name: &'static str,
    },
    /// The document is structurally broken along a traversed path.
    Malformed {
        path: JsonPath,
        msg: String,
        location: Location,
    },
}

impl Error {
    /// JSON path of the offending field, when the error concerns one.
    pub fn path(&self) -> Option<&JsonPath> {
        match self {
            Error::TypeMismatch { path, .. }
            | Error::Conversion { path, .. }
            | Error::Unmarshal { path, .. }
            | Error::UnsupportedType { path, .. }
            | Error::Malformed { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Name of the record field the error concerns.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Error::MissingKey { field, .. }
            | Error::TypeMismatch { field, .. }
            | Error::Conversion { field, .. }
            | Error::Unmarshal { field, .. }
            | Error::UnsupportedType { field, .. } => Some(field),
            _ => None,
        }
    }

    /// If the error has a known location, return it.
    pub fn location(&self) -> Option<Location> {
        match self {
            Error::TypeMismatch { location, .. }
            | Error::Conversion { location, .. }
            | Error::Unmarshal { location, .. }
            | Error::Malformed { location, .. } => {
                if location.is_known() {
                    Some(*location)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// True for every failure caused by the document's content rather than by
    /// source configuration, input acquisition or field declarations.
    pub fn is_parse_value(&self) -> bool {
        matches!(
            self,
            Error::TypeMismatch { .. }
                | Error::Conversion { .. }
                | Error::Unmarshal { .. }
                | Error::Malformed { .. }
        )
    }

    /// True when the input could not be found.
    pub fn is_source_not_found(&self) -> bool {
        matches!(self, Error::SourceNotFound { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NoDataSource => f.write_str(
                "no data source specified; configure one of bytes, string, reader or path",
            ),
            Error::MultipleDataSources { count } => write!(
                f,
                "{count} data sources specified; configure only one of bytes, string, reader or path"
            ),
            Error::SourceNotFound { source } => write!(f, "source not found: {source}"),
            Error::IOError { cause } => write!(f, "failed to read source: {cause}"),
            Error::MissingKey {
                field,
                key_tag,
                fallback_key_tag,
            } => write!(
                f,
                "field '{field}' has neither a '{key_tag}' nor a '{fallback_key_tag}' key tag"
            ),
            Error::TypeMismatch {
                field,
                path,
                expected,
                found,
                location,
            } => fmt_with_location(
                f,
                &format!("field '{field}' at '{path}': expected {expected}, found {found}"),
                location,
            ),
            Error::Conversion {
                field,
                path,
                value,
                expected,
                reason,
                location,
            } => fmt_with_location(
                f,
                &format!(
                    "field '{field}' at '{path}': value '{value}' isn't parsable as {expected}: {reason}"
                ),
                location,
            ),
            Error::Unmarshal {
                field,
                path,
                cause,
                location,
            } => fmt_with_location(
                f,
                &format!("error unmarshalling field '{field}' at '{path}': {cause}"),
                location,
            ),
            Error::UnsupportedType {
                field,
                path,
                type_name,
            } => write!(
                f,
                "field '{field}' at '{path}': type '{type_name}' isn't supported and won't ever be"
            ),
            Error::Malformed {
                path,
                msg,
                location,
            } => fmt_with_location(
                f,
                &format!("malformed JSON while accessing '{path}': {msg}"),
                location,
            ),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IOError { cause } => Some(cause),
            Error::Unmarshal { cause, .. } => Some(cause.as_ref()),
            _ => None,
        }
    }
}

fn fmt_with_location(f: &mut fmt::Formatter<'_>, msg: &str, location: &Location) -> fmt::Result {
    if location.is_known() {
        write!(
            f,
            "{msg} at line {}, column {}",
            location.line(),
            location.column()
        )
    } else {
        f.write_str(msg)
    }
}
