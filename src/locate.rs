//! Zero-copy JSON node locator.
//!
//! The locator walks the input bytes along a key path and returns the node at
//! the end of it without building a tree. Only the parts of the document that
//! lie on the way to the node are scanned: siblings before the matching key are
//! skipped structurally, and nothing after the node is looked at. Errors in
//! parts of the document that are never traversed therefore go unnoticed, the
//! same way a lazy path lookup behaves.
//!
//! Supported leniency (see [`Options`]):
//! - `//` line and `/* */` block comments wherever whitespace is allowed.
//! - A trailing comma before `}` or `]`.

use std::borrow::Cow;
use std::fmt;

use smallvec::SmallVec;

use crate::error::Error;
use crate::location::{Location, Span};
use crate::node::{Node, NodeKind};
use crate::options::Options;
use crate::path::JsonPath;

/// A structural error found while scanning, with its position in the input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyntaxError {
    pub msg: String,
    pub location: Location,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at line {}, column {}",
            self.msg,
            self.location.line(),
            self.location.column()
        )
    }
}

impl std::error::Error for SyntaxError {}

/// A JSON document that nodes can be located in.
#[derive(Clone, Copy, Debug)]
pub struct Document<'a> {
    input: &'a [u8],
    allow_comments: bool,
    allow_trailing_commas: bool,
    max_depth: usize,
}

impl<'a> Document<'a> {
    pub fn new(input: &'a [u8], options: &Options) -> Self {
        Self {
            input,
            allow_comments: options.allow_comments,
            allow_trailing_commas: options.allow_trailing_commas,
            max_depth: options.max_depth,
        }
    }

    pub fn input(&self) -> &'a [u8] {
        self.input
    }

    /// Locate the node at `path`.
    ///
    /// Returns `Ok(None)` when some key along the path is absent or when the
    /// path descends into something that is not an object.
    pub fn locate(&self, path: &JsonPath) -> Result<Option<Node<'a>>, Error> {
        self.find(path.segments())
            .map_err(|SyntaxError { msg, location }| Error::Malformed {
                path: path.clone(),
                msg,
                location,
            })
    }

    /// Same as [`Document::locate`] for keys that are not known statically.
    pub fn find(&self, keys: &[&str]) -> Result<Option<Node<'a>>, SyntaxError> {
        let mut scanner = Scanner::new(self);
        scanner.find(keys).map_err(|fail| SyntaxError {
            msg: fail.msg,
            location: Location::locate(self.input, Span::new(fail.offset, 0)),
        })
    }
}

struct Fail {
    msg: String,
    offset: usize,
}

struct Scanner<'a> {
    input: &'a [u8],
    pos: usize,
    depth: usize,
    allow_comments: bool,
    allow_trailing_commas: bool,
    max_depth: usize,
}

impl<'a> Scanner<'a> {
    fn new(doc: &Document<'a>) -> Self {
        // A UTF-8 byte order mark is not part of the document.
        let pos = if doc.input.starts_with(&[0xEF, 0xBB, 0xBF]) { 3 } else { 0 };
        Self {
            input: doc.input,
            pos,
            depth: 0,
            allow_comments: doc.allow_comments,
            allow_trailing_commas: doc.allow_trailing_commas,
            max_depth: doc.max_depth,
        }
    }

    fn fail(&self, msg: impl Into<String>) -> Fail {
        Fail {
            msg: msg.into(),
            offset: self.pos,
        }
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn find(&mut self, keys: &[&str]) -> Result<Option<Node<'a>>, Fail> {
        self.skip_ws()?;
        if self.peek().is_none() {
            return Err(self.fail("empty document"));
        }
        for key in keys {
            self.skip_ws()?;
            if self.peek() != Some(b'{') {
                return Ok(None);
            }
            self.pos += 1;
            self.enter()?;
            let mut after_comma = false;
            loop {
                let Some((start, end)) = self.object_entry(after_comma)? else {
                    return Ok(None);
                };
                if self.key_matches(start, end, key)? {
                    break;
                }
                self.skip_value()?;
                self.skip_ws()?;
                match self.peek() {
                    Some(b',') => {
                        self.pos += 1;
                        after_comma = true;
                    }
                    Some(b'}') => return Ok(None),
                    Some(_) => return Err(self.fail("expected ',' or '}' after object value")),
                    None => return Err(self.fail("unexpected end of input inside object")),
                }
            }
        }
        self.skip_ws()?;
        self.read_node().map(Some)
    }

    fn enter(&mut self) -> Result<(), Fail> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(self.fail(format!(
                "nesting deeper than {} levels",
                self.max_depth
            )));
        }
        Ok(())
    }

    fn key_matches(&self, start: usize, end: usize, key: &str) -> Result<bool, Fail> {
        let raw = &self.input[start..end];
        if !raw.contains(&b'\\') {
            return Ok(raw == key.as_bytes());
        }
        let node = Node::new(raw, NodeKind::String, Span::new(start, end - start));
        match node.unescape() {
            Ok(text) => Ok(text == key),
            Err(msg) => Err(Fail { msg, offset: start }),
        }
    }

    fn skip_ws(&mut self) -> Result<(), Fail> {
        loop {
            match self.peek() {
                Some(b' ' | b'\t' | b'\n' | b'\r') => self.pos += 1,
                Some(b'/') if self.allow_comments => match self.input.get(self.pos + 1) {
                    Some(b'/') => {
                        self.pos = match self.input[self.pos..].iter().position(|&b| b == b'\n') {
                            Some(nl) => self.pos + nl + 1,
                            None => self.input.len(),
                        };
                    }
                    Some(b'*') => {
                        let body = &self.input[self.pos + 2..];
                        match body.windows(2).position(|w| w == b"*/") {
                            Some(end) => self.pos += 2 + end + 2,
                            None => return Err(self.fail("unterminated block comment")),
                        }
                    }
                    _ => return Ok(()),
                },
                _ => return Ok(()),
            }
        }
    }

    /// Position after `{` or after a `,` inside an object. Returns the key
    /// content span when another member follows, or `None` when the closing
    /// brace (left unconsumed) is next.
    fn object_entry(&mut self, after_comma: bool) -> Result<Option<(usize, usize)>, Fail> {
        self.skip_ws()?;
        match self.peek() {
            Some(b'}') => {
                if after_comma && !self.allow_trailing_commas {
                    return Err(self.fail("trailing comma before '}'"));
                }
                Ok(None)
            }
            Some(b'"') => {
                let key = self.scan_string()?;
                self.skip_ws()?;
                if self.peek() != Some(b':') {
                    return Err(self.fail("expected ':' after object key"));
                }
                self.pos += 1;
                Ok(Some(key))
            }
            Some(_) => Err(self.fail("expected object key")),
            None => Err(self.fail("unexpected end of input inside object")),
        }
    }

    /// Position after `[` or after a `,` inside an array. Returns true when
    /// another element follows.
    fn array_entry(&mut self, after_comma: bool) -> Result<bool, Fail> {
        self.skip_ws()?;
        match self.peek() {
            Some(b']') => {
                if after_comma && !self.allow_trailing_commas {
                    return Err(self.fail("trailing comma before ']'"));
                }
                Ok(false)
            }
            Some(_) => Ok(true),
            None => Err(self.fail("unexpected end of input inside array")),
        }
    }

    /// Scan a string starting at its opening quote. Returns the content span
    /// (without quotes) and leaves the position after the closing quote.
    fn scan_string(&mut self) -> Result<(usize, usize), Fail> {
        self.pos += 1;
        let start = self.pos;
        loop {
            match self.peek() {
                Some(b'"') => {
                    let end = self.pos;
                    self.pos += 1;
                    return Ok((start, end));
                }
                Some(b'\\') => {
                    if self.pos + 1 >= self.input.len() {
                        return Err(self.fail("unterminated string"));
                    }
                    self.pos += 2;
                }
                Some(b) if b < 0x20 => {
                    return Err(self.fail("control character in string"));
                }
                Some(_) => self.pos += 1,
                None => {
                    return Err(Fail {
                        msg: "unterminated string".to_owned(),
                        offset: start - 1,
                    });
                }
            }
        }
    }

    /// Scan a bare literal (number, `true`, `false`, `null`) up to the next
    /// delimiter and classify it by its first byte.
    fn scan_literal(&mut self) -> Result<(usize, usize, NodeKind), Fail> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            let delimiter = matches!(
                b,
                b' ' | b'\t' | b'\n' | b'\r' | b',' | b':' | b'{' | b'}' | b'[' | b']' | b'"'
            ) || (b == b'/' && self.allow_comments);
            if delimiter {
                break;
            }
            self.pos += 1;
        }
        let token = &self.input[start..self.pos];
        let kind = match token {
            [] => {
                return Err(self.fail("expected a value"));
            }
            [b'-' | b'0'..=b'9', ..] => NodeKind::Number,
            b"true" | b"false" => NodeKind::Bool,
            b"null" => NodeKind::Null,
            _ => {
                return Err(Fail {
                    msg: format!("invalid literal `{}`", String::from_utf8_lossy(token)),
                    offset: start,
                });
            }
        };
        Ok((start, self.pos, kind))
    }

    fn read_node(&mut self) -> Result<Node<'a>, Fail> {
        match self.peek() {
            Some(b'"') => {
                let (start, end) = self.scan_string()?;
                Ok(self.node(start, end, NodeKind::String))
            }
            Some(open @ (b'{' | b'[')) => {
                let start = self.pos;
                self.skip_value()?;
                let kind = if open == b'{' {
                    NodeKind::Object
                } else {
                    NodeKind::Array
                };
                Ok(self.node(start, self.pos, kind))
            }
            None => Err(self.fail("unexpected end of input, expected a value")),
            Some(_) => {
                let (start, end, kind) = self.scan_literal()?;
                Ok(self.node(start, end, kind))
            }
        }
    }

    fn node(&self, start: usize, end: usize, kind: NodeKind) -> Node<'a> {
        Node::new(&self.input[start..end], kind, Span::new(start, end - start))
    }

    /// Skip one complete value starting at the current position.
    ///
    /// Iterative, so the only bound on nesting is `max_depth`.
    fn skip_value(&mut self) -> Result<(), Fail> {
        let mut stack: SmallVec<[u8; 32]> = SmallVec::new();
        let base_depth = self.depth;
        'value: loop {
            self.skip_ws()?;
            match self.peek() {
                Some(open @ (b'{' | b'[')) => {
                    self.pos += 1;
                    self.enter()?;
                    if open == b'{' {
                        stack.push(b'}');
                        if self.object_entry(false)?.is_some() {
                            continue 'value;
                        }
                    } else {
                        stack.push(b']');
                        if self.array_entry(false)? {
                            continue 'value;
                        }
                    }
                }
                Some(b'"') => {
                    self.scan_string()?;
                }
                Some(_) => {
                    self.scan_literal()?;
                }
                None => return Err(self.fail("unexpected end of input, expected a value")),
            }
            // A value, or the head of an empty container, has just been consumed.
            loop {
                let Some(&close) = stack.last() else {
                    self.depth = base_depth;
                    return Ok(());
                };
                self.skip_ws()?;
                match self.peek() {
                    Some(b) if b == close => {
                        self.pos += 1;
                        self.depth -= 1;
                        stack.pop();
                    }
                    Some(b',') => {
                        self.pos += 1;
                        let more = if close == b'}' {
                            self.object_entry(true)?.is_some()
                        } else {
                            self.array_entry(true)?
                        };
                        if more {
                            continue 'value;
                        }
                    }
                    Some(_) => {
                        return Err(self.fail(if close == b'}' {
                            "expected ',' or '}' after object value"
                        } else {
                            "expected ',' or ']' after array element"
                        }));
                    }
                    None => return Err(self.fail("unexpected end of input inside container")),
                }
            }
        }
    }
}

/// Blank out comments in a raw value so strict JSON decoders accept it.
///
/// Comment bytes become spaces (newlines are kept), so offsets reported by
/// the decoder still line up with the original slice.
pub(crate) fn blank_comments(raw: &[u8]) -> Cow<'_, [u8]> {
    if !raw.contains(&b'/') {
        return Cow::Borrowed(raw);
    }
    let mut out = raw.to_vec();
    let mut i = 0;
    let mut in_string = false;
    while i < out.len() {
        let b = out[i];
        if in_string {
            match b {
                b'\\' => i += 1,
                b'"' => in_string = false,
                _ => {}
            }
            i += 1;
            continue;
        }
        match (b, out.get(i + 1)) {
            (b'"', _) => {
                in_string = true;
                i += 1;
            }
            (b'/', Some(b'/')) => {
                while i < out.len() && out[i] != b'\n' {
                    out[i] = b' ';
                    i += 1;
                }
            }
            (b'/', Some(b'*')) => {
                let mut closed = false;
                while i < out.len() {
                    if out[i] == b'*' && out.get(i + 1) == Some(&b'/') {
                        out[i] = b' ';
                        out[i + 1] = b' ';
                        i += 2;
                        closed = true;
                        break;
                    }
                    if out[i] != b'\n' {
                        out[i] = b' ';
                    }
                    i += 1;
                }
                if !closed {
                    break;
                }
            }
            _ => i += 1,
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find<'a>(input: &'a str, keys: &[&str]) -> Result<Option<Node<'a>>, SyntaxError> {
        let options = Options::default();
        Document::new(input.as_bytes(), &options).find(keys)
    }

    fn strict(input: &str, keys: &[&str]) -> Result<bool, SyntaxError> {
        let options = crate::options! {
            allow_comments: false,
            allow_trailing_commas: false,
        };
        Document::new(input.as_bytes(), &options)
            .find(keys)
            .map(|n| n.is_some())
    }

    #[test]
    fn finds_top_level_scalars() {
        let doc = r#"{"s": "text", "n": -1.5e3, "b": true, "z": null}"#;
        let s = find(doc, &["s"]).unwrap().unwrap();
        assert_eq!((s.kind(), s.raw()), (NodeKind::String, &b"text"[..]));
        let n = find(doc, &["n"]).unwrap().unwrap();
        assert_eq!((n.kind(), n.raw()), (NodeKind::Number, &b"-1.5e3"[..]));
        assert_eq!(find(doc, &["b"]).unwrap().unwrap().kind(), NodeKind::Bool);
        assert_eq!(find(doc, &["z"]).unwrap().unwrap().kind(), NodeKind::Null);
    }

    #[test]
    fn string_span_excludes_quotes() {
        let doc = r#"{"k":"v"}"#;
        let node = find(doc, &["k"]).unwrap().unwrap();
        assert_eq!(node.span().offset(), 6);
        assert_eq!(node.span().len(), 1);
    }

    #[test]
    fn descends_nested_objects_skipping_siblings() {
        let doc = r#"{
            "a": {"skip": [1, {"x": "}"}, [[]]], "b": {"c": [1, 2]}},
            "d": 1
        }"#;
        let node = find(doc, &["a", "b", "c"]).unwrap().unwrap();
        assert_eq!(node.kind(), NodeKind::Array);
        assert_eq!(node.raw(), b"[1, 2]");
        let obj = find(doc, &["a", "b"]).unwrap().unwrap();
        assert_eq!(obj.raw(), br#"{"c": [1, 2]}"#);
    }

    #[test]
    fn absent_keys_and_scalar_parents_are_not_found() {
        let doc = r#"{"a": {"b": 1}, "s": "str"}"#;
        assert!(find(doc, &["missing"]).unwrap().is_none());
        assert!(find(doc, &["a", "missing"]).unwrap().is_none());
        assert!(find(doc, &["s", "x"]).unwrap().is_none());
        assert!(find("[1, 2]", &["a"]).unwrap().is_none());
        assert!(find("{}", &["a"]).unwrap().is_none());
    }

    #[test]
    fn first_duplicate_key_wins() {
        let node = find(r#"{"a": 1, "a": 2}"#, &["a"]).unwrap().unwrap();
        assert_eq!(node.raw(), b"1");
    }

    #[test]
    fn escaped_keys_match_unescaped_segments() {
        let node = find(r#"{"a\"b": 1, "c": 2}"#, &["c"]).unwrap().unwrap();
        assert_eq!(node.raw(), b"2");
        let node = find(r#"{"a\"b": 1}"#, &["a\"b"]).unwrap().unwrap();
        assert_eq!(node.raw(), b"1");
    }

    #[test]
    fn comments_are_whitespace() {
        let doc = "{\n  // leading\n  \"a\": /* inline */ 1, /* x */\n  \"b\": 2 // tail\n}";
        assert_eq!(find(doc, &["b"]).unwrap().unwrap().raw(), b"2");
        assert!(strict(doc, &["b"]).is_err());
    }

    #[test]
    fn trailing_commas_are_lenient_by_default() {
        let doc = r#"{"a": [1, 2,], "b": {"x": 1,}, }"#;
        assert!(find(doc, &["c"]).unwrap().is_none());
        assert_eq!(find(doc, &["b", "y"]).unwrap(), None);
        let err = strict(doc, &["c"]).unwrap_err();
        assert!(err.msg.contains("trailing comma"), "{err}");
    }

    #[test]
    fn bare_token_runs_to_the_next_delimiter() {
        let node = find("{\"float\": 5.5no float here}", &["float"]).unwrap().unwrap();
        assert_eq!((node.kind(), node.raw()), (NodeKind::Number, &b"5.5no"[..]));
    }

    #[test]
    fn invalid_literal_on_path_is_malformed() {
        let err = find(r#"{"field_b": text}"#, &["field_b"]).unwrap_err();
        assert!(err.msg.contains("invalid literal `text`"), "{err}");
        assert_eq!(err.location.column(), 13);
    }

    #[test]
    fn errors_after_the_node_are_not_seen() {
        assert!(find(r#"{"a": 1, "b": nope"#, &["a"]).unwrap().is_some());
        assert!(find(r#"{"a": nope, "b": 1}"#, &["b"]).is_err());
    }

    #[test]
    fn structural_errors() {
        assert!(find("", &["a"]).unwrap_err().msg.contains("empty document"));
        assert!(find("  /* c */ ", &[]).is_err());
        assert!(find(r#"{"a" 1}"#, &["a"]).is_err());
        assert!(find(r#"{"a": "open"#, &["a"]).is_err());
        assert!(find(r#"{"x": [1 2], "a": 1}"#, &["a"]).is_err());
        assert!(find(r#"{"x": /* never closed"#, &["a"]).is_err());
        assert!(find("{\"a\": \"line\nbreak\"}", &["a"]).is_err());
    }

    #[test]
    fn depth_guard_applies_while_skipping() {
        let deep = format!("{{\"x\": {}1{}, \"a\": 1}}", "[".repeat(200), "]".repeat(200));
        let err = find(&deep, &["a"]).unwrap_err();
        assert!(err.msg.contains("nesting deeper than 128"), "{err}");
        let shallow = format!("{{\"x\": {}1{}, \"a\": 1}}", "[".repeat(100), "]".repeat(100));
        assert!(find(&shallow, &["a"]).unwrap().is_some());
    }

    #[test]
    fn utf8_bom_is_skipped() {
        let doc = "\u{FEFF}{\"a\": 1}";
        assert!(find(doc, &["a"]).unwrap().is_some());
    }

    #[test]
    fn blank_comments_preserves_strings_and_offsets() {
        let raw = b"[1, // one\n \"//not\", /* two */ 3]";
        let out = blank_comments(raw);
        assert_eq!(out.len(), raw.len());
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value, serde_json::json!([1, "//not", 3]));
        assert!(matches!(blank_comments(b"[1, 2]"), Cow::Borrowed(_)));
    }
}
