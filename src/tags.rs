//! Field descriptors and JSON key resolution.
//!
//! Every bindable field of a [`crate::Record`] is described by a static
//! [`FieldDescriptor`]: its name, whether it is exported, and the tags that
//! name its key in the various namespaces (`json`, `key`, `ignore`, or any
//! namespace another source uses).

use crate::error::Error;
use crate::options::Options;

/// A `namespace = value` pair attached to a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Tag {
    pub namespace: &'static str,
    pub value: &'static str,
}

impl Tag {
    pub const fn new(namespace: &'static str, value: &'static str) -> Self {
        Self { namespace, value }
    }
}

/// Static metadata of one record field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FieldDescriptor {
    /// Field name, used in diagnostics.
    pub name: &'static str,
    /// Unexported fields are never bound, whatever their tags say.
    pub exported: bool,
    pub tags: &'static [Tag],
}

impl FieldDescriptor {
    pub const fn new(name: &'static str, exported: bool, tags: &'static [Tag]) -> Self {
        Self {
            name,
            exported,
            tags,
        }
    }

    /// Value of the first tag in `namespace`, if any.
    pub fn tag(&self, namespace: &str) -> Option<&'static str> {
        self.tags
            .iter()
            .find(|tag| tag.namespace == namespace)
            .map(|tag| tag.value)
    }

    /// True when the field carries `<ignore_tag> = "true"` (any case).
    pub fn is_ignored(&self, ignore_tag: &str) -> bool {
        self.tag(ignore_tag)
            .is_some_and(|value| value.eq_ignore_ascii_case("true"))
    }
}

/// Result of resolving a field's key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// The field is unexported or ignored and must not be touched.
    Skip,
    /// The JSON key of the field.
    Key(&'static str),
}

/// Resolve the JSON key of `field`.
///
/// The source-specific namespace (`options.key_tag`) wins over the fallback
/// one. Only the part before the first comma is significant, so modifiers
/// such as `field_a,omitempty` are ignored.
pub fn resolve(field: &FieldDescriptor, options: &Options) -> Result<Resolution, Error> {
    if !field.exported || field.is_ignored(&options.ignore_tag) {
        return Ok(Resolution::Skip);
    }
    let value = field
        .tag(&options.key_tag)
        .or_else(|| field.tag(&options.fallback_key_tag))
        .ok_or_else(|| Error::MissingKey {
            field: field.name,
            key_tag: options.key_tag.to_string(),
            fallback_key_tag: options.fallback_key_tag.to_string(),
        })?;
    let key = value.split(',').next().unwrap_or(value);
    Ok(Resolution::Key(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOTH: FieldDescriptor = FieldDescriptor::new(
        "Both",
        true,
        &[Tag::new("key", "generic"), Tag::new("json", "specific,omitempty")],
    );

    #[test]
    fn specific_namespace_wins_and_modifiers_are_dropped() {
        let res = resolve(&BOTH, &Options::default()).unwrap();
        assert_eq!(res, Resolution::Key("specific"));
    }

    #[test]
    fn fallback_namespace() {
        const FIELD: FieldDescriptor =
            FieldDescriptor::new("F", true, &[Tag::new("key", "field_a")]);
        assert_eq!(
            resolve(&FIELD, &Options::default()).unwrap(),
            Resolution::Key("field_a")
        );
        let options = crate::options! { key_tag: "env".into() };
        assert_eq!(resolve(&BOTH, &options).unwrap(), Resolution::Key("generic"));
    }

    #[test]
    fn missing_key() {
        const FIELD: FieldDescriptor = FieldDescriptor::new("Bare", true, &[]);
        let err = resolve(&FIELD, &Options::default()).unwrap_err();
        assert!(matches!(err, Error::MissingKey { field: "Bare", .. }));
        assert!(err.to_string().contains("'json'"));
    }

    #[test]
    fn ignored_and_unexported_are_skipped() {
        const IGNORED: FieldDescriptor =
            FieldDescriptor::new("I", true, &[Tag::new("ignore", "TRUE")]);
        const NOT_IGNORED: FieldDescriptor = FieldDescriptor::new(
            "N",
            true,
            &[Tag::new("ignore", "false"), Tag::new("key", "n")],
        );
        const HIDDEN: FieldDescriptor =
            FieldDescriptor::new("h", false, &[Tag::new("key", "h"), Tag::new("ignore", "false")]);
        let options = Options::default();
        assert_eq!(resolve(&IGNORED, &options).unwrap(), Resolution::Skip);
        assert_eq!(resolve(&NOT_IGNORED, &options).unwrap(), Resolution::Key("n"));
        assert_eq!(resolve(&HIDDEN, &options).unwrap(), Resolution::Skip);
    }
}
