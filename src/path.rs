//! Key paths from the document root to a field.
//!
//! A [`JsonPath`] is built incrementally while the binder descends into nested
//! records. Segments are the resolved JSON keys, which come from static field
//! descriptors, so a path never owns string data.

use std::fmt;

use smallvec::SmallVec;

/// Ordered key segments from the document root to a node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct JsonPath {
    segments: SmallVec<[&'static str; 8]>,
}

impl JsonPath {
    /// The empty path, pointing at the document root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Return a new path extended by `key`.
    pub fn join(&self, key: &'static str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(key);
        Self { segments }
    }

    pub fn segments(&self) -> &[&'static str] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl<const N: usize> From<[&'static str; N]> for JsonPath {
    fn from(value: [&'static str; N]) -> Self {
        Self {
            segments: value.into_iter().collect(),
        }
    }
}

/// Renders as dotted keys (`server.tls.port`); keys that would make the dotted
/// form ambiguous are rendered in bracket form (`server["a.b"]`).
impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("<root>");
        }
        for (i, seg) in self.segments.iter().enumerate() {
            let plain = !seg.is_empty()
                && seg
                    .chars()
                    .all(|c| c.is_alphanumeric() || c == '_' || c == '-');
            if plain {
                if i > 0 {
                    f.write_str(".")?;
                }
                f.write_str(seg)?;
            } else {
                write!(f, "[{seg:?}]")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_does_not_touch_parent() {
        let parent = JsonPath::root().join("server");
        let child = parent.join("port");
        assert_eq!(parent.segments(), &["server"]);
        assert_eq!(child.segments(), &["server", "port"]);
    }

    #[test]
    fn display_dotted_and_bracketed() {
        assert_eq!(JsonPath::root().to_string(), "<root>");
        assert_eq!(JsonPath::from(["a", "b_c"]).to_string(), "a.b_c");
        assert_eq!(JsonPath::from(["a", "b.c"]).to_string(), "a[\"b.c\"]");
        assert_eq!(JsonPath::from(["", "x"]).to_string(), "[\"\"].x");
    }

    #[test]
    fn deep_paths_spill_to_heap() {
        let mut path = JsonPath::root();
        for _ in 0..20 {
            path = path.join("k");
        }
        assert_eq!(path.len(), 20);
    }
}
