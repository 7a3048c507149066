//! Source location utilities.

use serde::Serialize;

/// A byte span within the source JSON document.
///
/// Offsets count raw bytes (UTF-8 code units) from the start of the buffer that
/// was handed to the binder. For string nodes the span covers the content between
/// the quotes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Span {
    pub(crate) offset: usize,
    pub(crate) len: usize,
}

impl Span {
    /// Sentinel span meaning "unknown".
    pub const UNKNOWN: Self = Self { offset: 0, len: 0 };

    pub(crate) const fn new(offset: usize, len: usize) -> Self {
        Self { offset, len }
    }

    /// Byte offset of the first byte of the span.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Length of the span in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Line/column location within the source JSON document (1-indexed).
///
/// Columns count characters, not bytes, so a location stays meaningful for
/// documents with non-ASCII content before the offending node.
///
/// ```
/// json_source::record!(Doc { pub port(key = "port") });
/// #[derive(Debug, Default)]
/// struct Doc { port: u16 }
///
/// let err = json_source::from_str::<Doc>("{\n  \"port\": \"http\"\n}").unwrap_err();
/// let loc = err.location().expect("node location is known");
/// assert_eq!((loc.line(), loc.column()), (2, 12));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Location {
    pub(crate) line: u32,
    pub(crate) column: u32,
    pub(crate) span: Span,
}

impl Location {
    /// Sentinel value meaning "location unknown".
    ///
    /// Used for errors raised before any byte of the document was looked at.
    pub const UNKNOWN: Self = Self {
        line: 0,
        column: 0,
        span: Span::UNKNOWN,
    };

    /// 1-indexed line of the location.
    #[inline]
    pub fn line(&self) -> u64 {
        self.line as u64
    }

    /// 1-indexed column (in characters) of the location.
    #[inline]
    pub fn column(&self) -> u64 {
        self.column as u64
    }

    /// Byte span within the source document.
    #[inline]
    pub fn span(&self) -> Span {
        self.span
    }

    pub(crate) fn is_known(&self) -> bool {
        self.line != 0 && self.column != 0
    }

    /// Compute the location of `span` inside `input`.
    ///
    /// Offsets past the end of `input` are clamped to its end.
    pub fn locate(input: &[u8], span: Span) -> Self {
        let end = span.offset.min(input.len());
        let before = &input[..end];
        let line_start = before
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |pos| pos + 1);
        let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
        // Count characters by skipping UTF-8 continuation bytes.
        let column = before[line_start..]
            .iter()
            .filter(|&&b| (b & 0xC0) != 0x80)
            .count()
            + 1;
        Self {
            line: u32::try_from(line).unwrap_or(u32::MAX),
            column: u32::try_from(column).unwrap_or(u32::MAX),
            span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_byte_is_line_one_column_one() {
        let loc = Location::locate(b"{}", Span::new(0, 1));
        assert_eq!((loc.line(), loc.column()), (1, 1));
        assert!(loc.is_known());
    }

    #[test]
    fn columns_count_characters() {
        let input = "{\"ключ\": 1,\n \"x\": true}".as_bytes();
        let offset = input.iter().position(|&b| b == b't').unwrap();
        let loc = Location::locate(input, Span::new(offset, 4));
        assert_eq!((loc.line(), loc.column()), (2, 7));
        assert_eq!(loc.span().offset(), offset);
    }

    #[test]
    fn unknown_is_not_known() {
        assert!(!Location::UNKNOWN.is_known());
    }
}
