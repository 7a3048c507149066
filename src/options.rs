use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Binder configuration options.
///
/// Use this to configure which tag namespaces name a field's JSON key and how
/// lenient the node locator is about non-standard JSON syntax.
///
/// ```rust
/// let options = json_source::options! {
///     key_tag: "settings".into(),
///     allow_trailing_commas: false,
/// };
/// assert_eq!(options.fallback_key_tag, "key");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Options {
    /// Source-specific tag namespace that is looked up first. Default: `json`.
    pub key_tag: Cow<'static, str>,
    /// Library-wide namespace used when `key_tag` is absent on a field. Default: `key`.
    pub fallback_key_tag: Cow<'static, str>,
    /// Namespace of the skip marker; a field tagged with `true` (any case) is
    /// never touched. Default: `ignore`.
    pub ignore_tag: Cow<'static, str>,
    /// Treat `// line` and `/* block */` comments as whitespace. Default: true.
    pub allow_comments: bool,
    /// Accept a trailing comma before a closing `}` or `]` while locating
    /// nodes. Values decoded through `serde_json` stay strict. Default: true.
    pub allow_trailing_commas: bool,
    /// Maximum container nesting the locator will traverse or skip. Default: 128.
    pub max_depth: usize,
    /// Hard cap on bytes read from a path or reader source.
    /// `None` disables the cap. Default: 64 MiB.
    pub input_limit: Option<usize>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            key_tag: Cow::Borrowed("json"),
            fallback_key_tag: Cow::Borrowed("key"),
            ignore_tag: Cow::Borrowed("ignore"),
            allow_comments: true,
            allow_trailing_commas: true,
            max_depth: 128,
            input_limit: Some(64 * 1024 * 1024),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_default() {
        let opts = Options::default();
        assert_eq!(opts.key_tag, "json");
        assert_eq!(opts.fallback_key_tag, "key");
        assert_eq!(opts.ignore_tag, "ignore");
        assert!(opts.allow_comments);
        assert!(opts.allow_trailing_commas);
        assert_eq!(opts.max_depth, 128);
        assert_eq!(opts.input_limit, Some(64 * 1024 * 1024));
    }

    #[test]
    fn test_options_from_json() {
        let opts: Options = serde_json::from_str(
            r#"{"key_tag":"cfg","fallback_key_tag":"key","ignore_tag":"skip",
                "allow_comments":false,"allow_trailing_commas":false,
                "max_depth":8,"input_limit":null}"#,
        )
        .unwrap();
        assert_eq!(opts.key_tag, "cfg");
        assert_eq!(opts.ignore_tag, "skip");
        assert!(!opts.allow_comments);
        assert_eq!(opts.max_depth, 8);
        assert_eq!(opts.input_limit, None);
    }

    #[test]
    fn test_options_macro() {
        let opts = crate::options! { max_depth: 4 };
        assert_eq!(opts.max_depth, 4);
        assert_eq!(opts.key_tag, "json");
    }
}
