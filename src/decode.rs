//! Type dispatch: converting a located node into a concrete field value.
//!
//! Every concrete (indirection-free) field type implements [`Decode`]. The
//! implementation decides statically which strategy applies, in this order of
//! precedence:
//!
//! 1. A JSON-specific hook ([`UnmarshalJson`]) gets the raw JSON value; string
//!    nodes are re-quoted first so escapes mean the same as in a full document.
//! 2. A text hook ([`UnmarshalText`]) gets the unescaped content of a string node.
//! 3. Otherwise the kind of the type decides: strings, booleans and numbers are
//!    converted directly, records recurse into the binder, durations accept a
//!    duration literal, complex numbers are rejected, and everything else goes
//!    through `serde_json`.
//!
//! User types pick their strategy with [`crate::json_decoder!`],
//! [`crate::text_decoder!`], [`crate::serde_decoder!`] or [`crate::record!`].

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use num_complex::Complex;
use serde::de::DeserializeOwned;

use crate::error::{BoxError, Error};
use crate::field::Field;
use crate::locate::{blank_comments, Document};
use crate::location::Location;
use crate::node::{Node, NodeKind};
use crate::options::Options;
use crate::parse_scalars::{parse_duration, parse_f32, parse_f64, parse_int};
use crate::path::JsonPath;

/// Which decoding capability a concrete type exposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Hook {
    /// Built-in conversion or the generic `serde_json` path.
    None,
    /// [`UnmarshalJson`].
    Json,
    /// [`UnmarshalText`].
    Text,
    /// A nested [`crate::Record`].
    Record,
}

/// What decoding a node did to the field.
#[derive(Debug, PartialEq)]
pub enum Outcome<T> {
    /// A new value that the field must be set to.
    Fresh(T),
    /// The existing value was updated in place.
    InPlace,
    /// Nothing applied; the field stays exactly as it was.
    Untouched,
}

/// Decoding hook that receives the raw JSON value.
///
/// String values arrive with their quotes, so `"lower"` is passed as the
/// seven bytes `"lower"`.
pub trait UnmarshalJson: Sized {
    fn unmarshal_json(raw: &[u8]) -> Result<Self, BoxError>;
}

/// Decoding hook that receives the unescaped content of a JSON string.
pub trait UnmarshalText: Sized {
    fn unmarshal_text(text: &str) -> Result<Self, BoxError>;
}

/// Conversion of a located node into a concrete field type.
pub trait Decode: Sized {
    /// Capability flag of the type. The binder reports it when tracing each
    /// field; decoding itself goes through [`Decode::decode`].
    const HOOK: Hook = Hook::None;

    /// Convert `node`.
    ///
    /// `existing` is the current concrete value of the field when there is one
    /// (no `None` layer in between). Only records make use of it.
    fn decode(node: Node<'_>, existing: Option<&mut Self>, cx: &Context<'_>) -> Result<Outcome<Self>, Error>;
}

/// Everything a decoder may need to know about the field being bound.
#[derive(Clone, Debug)]
pub struct Context<'a> {
    pub(crate) document: Document<'a>,
    pub(crate) options: &'a Options,
    pub(crate) field: &'static str,
    pub(crate) path: JsonPath,
}

impl<'a> Context<'a> {
    /// Name of the field being bound.
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Path of the field's node.
    pub fn path(&self) -> &JsonPath {
        &self.path
    }

    pub fn options(&self) -> &'a Options {
        self.options
    }

    pub fn document(&self) -> Document<'a> {
        self.document
    }

    /// Line/column of `node` in the document.
    pub fn location(&self, node: &Node<'_>) -> Location {
        Location::locate(self.document.input(), node.span())
    }

    pub fn type_mismatch(&self, node: &Node<'_>, expected: &'static str) -> Error {
        Error::TypeMismatch {
            field: self.field,
            path: self.path.clone(),
            expected,
            found: node.kind(),
            location: self.location(node),
        }
    }

    pub fn conversion(&self, node: &Node<'_>, expected: &'static str, reason: impl Into<String>) -> Error {
        Error::Conversion {
            field: self.field,
            path: self.path.clone(),
            value: node.raw_text().into_owned(),
            expected,
            reason: reason.into(),
            location: self.location(node),
        }
    }

    pub fn unmarshal(&self, node: &Node<'_>, cause: impl Into<BoxError>) -> Error {
        Error::Unmarshal {
            field: self.field,
            path: self.path.clone(),
            cause: cause.into(),
            location: self.location(node),
        }
    }

    pub fn unsupported(&self, type_name: &'static str) -> Error {
        Error::UnsupportedType {
            field: self.field,
            path: self.path.clone(),
            type_name,
        }
    }
}

/// Decode through a JSON-specific hook.
pub fn decode_with_json_hook<T: UnmarshalJson>(node: Node<'_>, cx: &Context<'_>) -> Result<T, Error> {
    let quoted = node.quoted();
    let raw = if cx.options.allow_comments {
        blank_comments(&quoted)
    } else {
        std::borrow::Cow::Borrowed(&*quoted)
    };
    T::unmarshal_json(&raw).map_err(|cause| cx.unmarshal(&node, cause))
}

/// Decode through a text hook. Only string nodes are accepted.
pub fn decode_with_text_hook<T: UnmarshalText>(node: Node<'_>, cx: &Context<'_>) -> Result<T, Error> {
    let text = unescaped(node, cx)?;
    T::unmarshal_text(&text).map_err(|cause| cx.unmarshal(&node, cause))
}

/// Decode through `serde_json` into a fresh `T`.
pub fn decode_serde<T: DeserializeOwned>(node: Node<'_>, cx: &Context<'_>) -> Result<T, Error> {
    let quoted = node.quoted();
    let result = if cx.options.allow_comments {
        serde_json::from_slice(&blank_comments(&quoted))
    } else {
        serde_json::from_slice(&quoted)
    };
    result.map_err(|cause| cx.unmarshal(&node, cause))
}

/// Unescaped content of a string node.
pub fn unescaped(node: Node<'_>, cx: &Context<'_>) -> Result<String, Error> {
    if node.kind() != NodeKind::String {
        return Err(cx.type_mismatch(&node, "string"));
    }
    node.unescape()
        .map(|text| text.into_owned())
        .map_err(|reason| cx.conversion(&node, "string", reason))
}

/// Raw text of a number node.
fn number_text<'a>(node: &Node<'a>, cx: &Context<'_>, expected: &'static str) -> Result<std::borrow::Cow<'a, str>, Error> {
    if node.kind() != NodeKind::Number {
        return Err(cx.type_mismatch(node, expected));
    }
    Ok(node.raw_text())
}

impl Decode for String {
    fn decode(node: Node<'_>, _existing: Option<&mut Self>, cx: &Context<'_>) -> Result<Outcome<Self>, Error> {
        unescaped(node, cx).map(Outcome::Fresh)
    }
}

impl Decode for char {
    fn decode(node: Node<'_>, _existing: Option<&mut Self>, cx: &Context<'_>) -> Result<Outcome<Self>, Error> {
        let text = unescaped(node, cx)?;
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Outcome::Fresh(c)),
            _ => Err(cx.conversion(&node, "char", "expected exactly one character")),
        }
    }
}

impl Decode for bool {
    fn decode(node: Node<'_>, _existing: Option<&mut Self>, cx: &Context<'_>) -> Result<Outcome<Self>, Error> {
        if node.kind() != NodeKind::Bool {
            return Err(cx.type_mismatch(&node, "boolean"));
        }
        Ok(Outcome::Fresh(node.raw() == b"true"))
    }
}

macro_rules! decode_int {
    ($($ty:ident),* $(,)?) => {
        $(
            impl Decode for $ty {
                fn decode(node: Node<'_>, _existing: Option<&mut Self>, cx: &Context<'_>) -> Result<Outcome<Self>, Error> {
                    let text = number_text(&node, cx, "integer")?;
                    parse_int::<$ty>(&text, stringify!($ty))
                        .map(Outcome::Fresh)
                        .map_err(|reason| cx.conversion(&node, stringify!($ty), reason))
                }
            }
        )*
    };
}

decode_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl Decode for f32 {
    fn decode(node: Node<'_>, _existing: Option<&mut Self>, cx: &Context<'_>) -> Result<Outcome<Self>, Error> {
        let text = number_text(&node, cx, "number")?;
        parse_f32(&text)
            .map(Outcome::Fresh)
            .map_err(|reason| cx.conversion(&node, "f32", reason))
    }
}

impl Decode for f64 {
    fn decode(node: Node<'_>, _existing: Option<&mut Self>, cx: &Context<'_>) -> Result<Outcome<Self>, Error> {
        let text = number_text(&node, cx, "number")?;
        parse_f64(&text)
            .map(Outcome::Fresh)
            .map_err(|reason| cx.conversion(&node, "f64", reason))
    }
}

/// A string node is a duration literal (`"1m30s"`); a number node counts
/// nanoseconds.
impl Decode for Duration {
    fn decode(node: Node<'_>, _existing: Option<&mut Self>, cx: &Context<'_>) -> Result<Outcome<Self>, Error> {
        match node.kind() {
            NodeKind::String => {
                let text = unescaped(node, cx)?;
                parse_duration(&text)
                    .map(Outcome::Fresh)
                    .map_err(|reason| cx.conversion(&node, "duration", reason))
            }
            NodeKind::Number => {
                let text = node.raw_text();
                parse_int::<u64>(&text, "duration in nanoseconds")
                    .map(|nanos| Outcome::Fresh(Duration::from_nanos(nanos)))
                    .map_err(|reason| cx.conversion(&node, "duration", reason))
            }
            _ => Err(cx.type_mismatch(&node, "duration string or nanoseconds")),
        }
    }
}

macro_rules! decode_unsupported {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl Decode for $ty {
                fn decode(_node: Node<'_>, _existing: Option<&mut Self>, cx: &Context<'_>) -> Result<Outcome<Self>, Error> {
                    Err(cx.unsupported($name))
                }
            }
        )*
    };
}

decode_unsupported!(Complex<f32> => "Complex<f32>", Complex<f64> => "Complex<f64>");

macro_rules! decode_via_serde {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Decode for $ty {
                fn decode(node: Node<'_>, _existing: Option<&mut Self>, cx: &Context<'_>) -> Result<Outcome<Self>, Error> {
                    decode_serde(node, cx).map(Outcome::Fresh)
                }
            }
        )*
    };
}

decode_via_serde!(serde_json::Value, PathBuf, IpAddr, SocketAddr);

impl<T: DeserializeOwned> Decode for Vec<T> {
    fn decode(node: Node<'_>, _existing: Option<&mut Self>, cx: &Context<'_>) -> Result<Outcome<Self>, Error> {
        decode_serde(node, cx).map(Outcome::Fresh)
    }
}

impl<V: DeserializeOwned, S: BuildHasher + Default> Decode for HashMap<String, V, S> {
    fn decode(node: Node<'_>, _existing: Option<&mut Self>, cx: &Context<'_>) -> Result<Outcome<Self>, Error> {
        decode_serde(node, cx).map(Outcome::Fresh)
    }
}

impl<V: DeserializeOwned> Decode for BTreeMap<String, V> {
    fn decode(node: Node<'_>, _existing: Option<&mut Self>, cx: &Context<'_>) -> Result<Outcome<Self>, Error> {
        decode_serde(node, cx).map(Outcome::Fresh)
    }
}

crate::leaf_field!(
    String,
    char,
    bool,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    Duration,
    Complex<f32>,
    Complex<f64>,
    serde_json::Value,
    PathBuf,
    IpAddr,
    SocketAddr,
);

impl<T: DeserializeOwned> Field for Vec<T> {
    type Concrete = Self;
    const DEPTH: usize = 0;

    fn wrap(value: Self) -> Self {
        value
    }

    fn concrete_mut(&mut self) -> Option<&mut Self> {
        Some(self)
    }
}

impl<V: DeserializeOwned, S: BuildHasher + Default> Field for HashMap<String, V, S> {
    type Concrete = Self;
    const DEPTH: usize = 0;

    fn wrap(value: Self) -> Self {
        value
    }

    fn concrete_mut(&mut self) -> Option<&mut Self> {
        Some(self)
    }
}

impl<V: DeserializeOwned> Field for BTreeMap<String, V> {
    type Concrete = Self;
    const DEPTH: usize = 0;

    fn wrap(value: Self) -> Self {
        value
    }

    fn concrete_mut(&mut self) -> Option<&mut Self> {
        Some(self)
    }
}
