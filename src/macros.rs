//! Public macros for declaring records and wiring field types into the binder.
//!
//! Rust has no runtime field reflection, so records describe their fields
//! with [`record!`] and custom field types pick their decoding strategy with
//! [`json_decoder!`], [`text_decoder!`] or [`serde_decoder!`].

/// Construct [`crate::Options`] from `Default` and a list of field assignments.
///
/// Example:
///
/// ```rust
/// let options = json_source::options! {
///     key_tag: "config".into(),
///     allow_comments: false,
/// };
/// assert_eq!(options.key_tag, "config");
/// ```
#[macro_export]
macro_rules! options {
    ( $( $field:ident : $value:expr ),* $(,)? ) => {{
        let mut opt = $crate::Options::default();
        $(
            #[allow(deprecated)]
            {
                opt.$field = $value;
            }
        )*
        opt
    }};
}

/// Implement [`crate::Record`] for a struct by listing its bindable fields.
///
/// Each entry is the field name, optionally preceded by `pub` and followed by
/// `namespace = "value"` tags. A field without `pub` is unexported and never
/// bound. The struct must implement `Default`.
///
/// ```rust
/// use json_source::record;
///
/// #[derive(Debug, Default)]
/// struct Server {
///     host: String,
///     port: Option<u16>,
///     secret: String,
///     cache: Vec<u8>,
/// }
///
/// record!(Server {
///     pub host(json = "host"),
///     pub port(key = "port"),
///     pub secret(json = "secret", ignore = "true"),
///     cache(json = "cache"),
/// });
///
/// let server: Server = json_source::from_str(r#"{"host": "::1", "port": 8080}"#).unwrap();
/// assert_eq!(server.host, "::1");
/// assert_eq!(server.port, Some(8080));
/// ```
///
/// The macro also makes the struct usable as a nested field of other records.
#[macro_export]
macro_rules! record {
    ( $ty:ty {
        $( $vis:vis $field:ident $( ( $( $ns:ident = $value:literal ),* $(,)? ) )? ),* $(,)?
    } ) => {
        impl $crate::Record for $ty {
            const FIELDS: &'static [$crate::FieldDescriptor] = &[
                $(
                    $crate::FieldDescriptor::new(
                        stringify!($field),
                        !stringify!($vis).is_empty(),
                        &[ $( $( $crate::Tag::new(stringify!($ns), $value) ),* )? ],
                    )
                ),*
            ];

            #[allow(unused_mut, unused_variables, unused_assignments)]
            fn bind_fields(&mut self, fields: &mut $crate::Fields<'_>) -> ::std::result::Result<(), $crate::Error> {
                let descriptors: &'static [$crate::FieldDescriptor] = <Self as $crate::Record>::FIELDS;
                let mut index = 0usize;
                $(
                    fields.field(&descriptors[index], &mut self.$field)?;
                    index += 1;
                )*
                Ok(())
            }
        }

        impl $crate::Decode for $ty {
            const HOOK: $crate::Hook = $crate::Hook::Record;

            fn decode(
                node: $crate::Node<'_>,
                existing: ::std::option::Option<&mut Self>,
                cx: &$crate::Context<'_>,
            ) -> ::std::result::Result<$crate::Outcome<Self>, $crate::Error> {
                $crate::decode_record(node, existing, cx)
            }
        }

        $crate::leaf_field!($ty);
    };
}

/// Make types usable as fields on their own, without `Option`/`Box` layers.
///
/// Every type passed to [`json_decoder!`], [`text_decoder!`],
/// [`serde_decoder!`] or [`record!`] already gets this; invoke it directly
/// only for types with a hand-written [`crate::Decode`] implementation.
#[macro_export]
macro_rules! leaf_field {
    ( $( $ty:ty ),* $(,)? ) => {
        $(
            impl $crate::Field for $ty {
                type Concrete = Self;
                const DEPTH: usize = 0;

                fn wrap(value: Self) -> Self {
                    value
                }

                fn concrete_mut(&mut self) -> ::std::option::Option<&mut Self> {
                    ::std::option::Option::Some(self)
                }
            }
        )*
    };
}

/// Decode the listed types through their [`crate::UnmarshalJson`] implementation.
///
/// The hook receives the raw JSON of the value; strings keep their quotes.
/// When a type implements both hooks, declare it here: the JSON hook wins.
#[macro_export]
macro_rules! json_decoder {
    ( $( $ty:ty ),* $(,)? ) => {
        $(
            impl $crate::Decode for $ty {
                const HOOK: $crate::Hook = $crate::Hook::Json;

                fn decode(
                    node: $crate::Node<'_>,
                    _existing: ::std::option::Option<&mut Self>,
                    cx: &$crate::Context<'_>,
                ) -> ::std::result::Result<$crate::Outcome<Self>, $crate::Error> {
                    $crate::decode_with_json_hook(node, cx).map($crate::Outcome::Fresh)
                }
            }

            $crate::leaf_field!($ty);
        )*
    };
}

/// Decode the listed types through their [`crate::UnmarshalText`] implementation.
///
/// Only JSON strings are accepted; the hook receives the unescaped content.
#[macro_export]
macro_rules! text_decoder {
    ( $( $ty:ty ),* $(,)? ) => {
        $(
            impl $crate::Decode for $ty {
                const HOOK: $crate::Hook = $crate::Hook::Text;

                fn decode(
                    node: $crate::Node<'_>,
                    _existing: ::std::option::Option<&mut Self>,
                    cx: &$crate::Context<'_>,
                ) -> ::std::result::Result<$crate::Outcome<Self>, $crate::Error> {
                    $crate::decode_with_text_hook(node, cx).map($crate::Outcome::Fresh)
                }
            }

            $crate::leaf_field!($ty);
        )*
    };
}

/// Decode the listed types with `serde_json`, the way lists and maps are.
#[macro_export]
macro_rules! serde_decoder {
    ( $( $ty:ty ),* $(,)? ) => {
        $(
            impl $crate::Decode for $ty {
                fn decode(
                    node: $crate::Node<'_>,
                    _existing: ::std::option::Option<&mut Self>,
                    cx: &$crate::Context<'_>,
                ) -> ::std::result::Result<$crate::Outcome<Self>, $crate::Error> {
                    $crate::decode_serde(node, cx).map($crate::Outcome::Fresh)
                }
            }

            $crate::leaf_field!($ty);
        )*
    };
}
