//! Located JSON nodes: an immutable view over a slice of the input buffer.

use std::borrow::Cow;
use std::fmt;

use crate::location::Span;

/// Coarse type of a located JSON value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    String,
    Number,
    Bool,
    Object,
    Array,
    Null,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::String => "string",
            NodeKind::Number => "number",
            NodeKind::Bool => "boolean",
            NodeKind::Object => "object",
            NodeKind::Array => "array",
            NodeKind::Null => "null",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A located, typed view of a JSON value.
///
/// `raw` borrows the input buffer. String nodes are returned without their
/// surrounding quotes and with escapes still in place; see [`Node::unescape`]
/// and [`Node::quoted`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Node<'a> {
    raw: &'a [u8],
    kind: NodeKind,
    span: Span,
}

impl<'a> Node<'a> {
    pub(crate) fn new(raw: &'a [u8], kind: NodeKind, span: Span) -> Self {
        Self { raw, kind, span }
    }

    pub fn raw(&self) -> &'a [u8] {
        self.raw
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    /// Raw bytes as text, lossily for invalid UTF-8.
    pub fn raw_text(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.raw)
    }

    /// Raw bytes as a complete JSON value: string nodes get their quotes back,
    /// everything else is returned unchanged.
    pub fn quoted(&self) -> Cow<'a, [u8]> {
        if self.kind == NodeKind::String {
            let mut buf = Vec::with_capacity(self.raw.len() + 2);
            buf.push(b'"');
            buf.extend_from_slice(self.raw);
            buf.push(b'"');
            Cow::Owned(buf)
        } else {
            Cow::Borrowed(self.raw)
        }
    }

    /// Decode JSON string escapes in a string node.
    ///
    /// Borrows from the input when the string contains no escapes. Lone
    /// surrogates and malformed escapes are rejected.
    pub fn unescape(&self) -> Result<Cow<'a, str>, String> {
        let raw = self.raw;
        if !raw.contains(&b'\\') {
            return std::str::from_utf8(raw)
                .map(Cow::Borrowed)
                .map_err(|e| format!("invalid UTF-8 in string: {e}"));
        }
        let text = std::str::from_utf8(raw).map_err(|e| format!("invalid UTF-8 in string: {e}"))?;
        let mut out = String::with_capacity(text.len());
        let mut chars = text.chars();
        while let Some(c) = chars.next() {
            if c != '\\' {
                out.push(c);
                continue;
            }
            match chars.next() {
                Some('"') => out.push('"'),
                Some('\\') => out.push('\\'),
                Some('/') => out.push('/'),
                Some('b') => out.push('\u{0008}'),
                Some('f') => out.push('\u{000C}'),
                Some('n') => out.push('\n'),
                Some('r') => out.push('\r'),
                Some('t') => out.push('\t'),
                Some('u') => {
                    let high = read_hex4(&mut chars)?;
                    let code = if (0xD800..0xDC00).contains(&high) {
                        if chars.next() != Some('\\') || chars.next() != Some('u') {
                            return Err(format!("unpaired surrogate \\u{high:04X}"));
                        }
                        let low = read_hex4(&mut chars)?;
                        if !(0xDC00..0xE000).contains(&low) {
                            return Err(format!("invalid low surrogate \\u{low:04X}"));
                        }
                        0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
                    } else if (0xDC00..0xE000).contains(&high) {
                        return Err(format!("unpaired surrogate \\u{high:04X}"));
                    } else {
                        high
                    };
                    match char::from_u32(code) {
                        Some(ch) => out.push(ch),
                        None => return Err(format!("invalid code point U+{code:04X}")),
                    }
                }
                Some(other) => return Err(format!("invalid escape sequence `\\{other}`")),
                None => return Err("unterminated escape sequence".to_owned()),
            }
        }
        Ok(Cow::Owned(out))
    }
}

fn read_hex4(chars: &mut std::str::Chars<'_>) -> Result<u32, String> {
    let mut value = 0u32;
    for _ in 0..4 {
        let digit = chars
            .next()
            .and_then(|c| c.to_digit(16))
            .ok_or_else(|| "invalid \\u escape: expected 4 hex digits".to_owned())?;
        value = value * 16 + digit;
    }
    Ok(value)
}
