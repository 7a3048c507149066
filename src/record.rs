//! Binding JSON documents onto records.
//!
//! A [`Record`] is a user struct whose fields are described by static
//! [`FieldDescriptor`]s (usually generated by [`crate::record!`]). Binding
//! walks the descriptors in declaration order. For each field it resolves the
//! key, locates the node, and hands it to the field type's [`Decode`]
//! implementation. Fields without a node are left exactly as they were.

use tracing::trace;

use crate::decode::{Context, Decode, Outcome};
use crate::error::Error;
use crate::field::Field;
use crate::locate::Document;
use crate::node::{Node, NodeKind};
use crate::options::Options;
use crate::path::JsonPath;
use crate::tags::{self, FieldDescriptor, Resolution};

/// A struct whose fields can be bound from a JSON document.
pub trait Record: Default {
    /// Descriptors of all fields, in declaration order.
    const FIELDS: &'static [FieldDescriptor];

    /// Offer every field to `fields`, in the order of [`Record::FIELDS`].
    fn bind_fields(&mut self, fields: &mut Fields<'_>) -> Result<(), Error>;
}

/// Binding state for one record level.
pub struct Fields<'a> {
    document: Document<'a>,
    options: &'a Options,
    path: JsonPath,
    any_set: bool,
}

impl<'a> Fields<'a> {
    pub(crate) fn new(document: Document<'a>, options: &'a Options, path: JsonPath) -> Self {
        Self {
            document,
            options,
            path,
            any_set: false,
        }
    }

    /// Path of the record whose fields are being bound.
    pub fn path(&self) -> &JsonPath {
        &self.path
    }

    /// True once any field of this record has been assigned or updated.
    pub fn any_set(&self) -> bool {
        self.any_set
    }

    /// Bind a single field.
    pub fn field<F: Field>(&mut self, descriptor: &'static FieldDescriptor, slot: &mut F) -> Result<(), Error> {
        let key = match tags::resolve(descriptor, self.options)? {
            Resolution::Skip => {
                trace!(field = descriptor.name, "field skipped");
                return Ok(());
            }
            Resolution::Key(key) => key,
        };
        let path = self.path.join(key);
        let Some(node) = self.document.locate(&path)? else {
            trace!(field = descriptor.name, %path, "no value");
            return Ok(());
        };
        if node.kind() == NodeKind::Null {
            trace!(field = descriptor.name, %path, "null value ignored");
            return Ok(());
        }

        let cx = Context {
            document: self.document,
            options: self.options,
            field: descriptor.name,
            path,
        };
        let hook = <F::Concrete as Decode>::HOOK;
        trace!(field = descriptor.name, path = %cx.path, ?hook, "decoding");
        match <F::Concrete as Decode>::decode(node, slot.concrete_mut(), &cx)? {
            Outcome::Fresh(value) => {
                *slot = F::wrap(value);
                self.any_set = true;
                trace!(field = descriptor.name, path = %cx.path, depth = F::DEPTH, "field set");
            }
            Outcome::InPlace => {
                self.any_set = true;
                trace!(field = descriptor.name, path = %cx.path, "record updated in place");
            }
            Outcome::Untouched => {
                trace!(field = descriptor.name, path = %cx.path, "nothing to set");
            }
        }
        Ok(())
    }
}

/// Bind every field of `record` found under `path` in `document`.
///
/// Returns `true` when at least one field was assigned or updated.
pub fn bind_record<R: Record>(record: &mut R, document: Document<'_>, options: &Options, path: JsonPath) -> Result<bool, Error> {
    let mut fields = Fields::new(document, options, path);
    record.bind_fields(&mut fields)?;
    Ok(fields.any_set)
}

/// [`Decode`] implementation shared by every record type.
///
/// An existing record is updated in place. Otherwise a default record is
/// bound and only kept when something in it was set, so a nested record whose
/// keys are all absent leaves an optional field empty. A node that is not an
/// object has no keys to find and leaves the field untouched.
pub fn decode_record<R: Record>(node: Node<'_>, existing: Option<&mut R>, cx: &Context<'_>) -> Result<Outcome<R>, Error> {
    trace!(field = cx.field, kind = ?node.kind(), "descending into record");
    match existing {
        Some(record) => {
            let set = bind_record(record, cx.document, cx.options, cx.path.clone())?;
            Ok(if set { Outcome::InPlace } else { Outcome::Untouched })
        }
        None => {
            let mut record = R::default();
            let set = bind_record(&mut record, cx.document, cx.options, cx.path.clone())?;
            Ok(if set { Outcome::Fresh(record) } else { Outcome::Untouched })
        }
    }
}
