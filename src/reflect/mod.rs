// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Reflective access to records.
//!
//! Generic tooling can inspect and modify any [`Record`] through its
//! descriptors without compile-time knowledge of the message shape:
//!
//! - [`ReflectMessage`] - read operations, shared by [`Record`] and the
//!   read-only [`MessageView`]
//! - [`Record::set`], [`Record::clear`], [`Record::mutable`],
//!   [`Record::new_field`] - mutation, which needs `&mut Record`
//! - [`ListView`] / [`ListMut`] - repeated field adapters

pub mod accessor;
pub mod list;
pub mod record;
pub mod value;
pub mod view;

pub use list::{ListMut, ListView};
pub use record::Record;
pub use value::{Value, ValueRef};
pub use view::MessageView;

use crate::core::Result;
use crate::encoding::unknown::UnknownFields;
use crate::reflect::accessor::field_by_name;
use crate::schema::{FieldDescriptor, MessageDescriptor, OneofDescriptor};

/// Read access to a message through its descriptors.
pub trait ReflectMessage {
    /// The message type.
    fn descriptor(&self) -> &MessageDescriptor;

    /// Whether `field` is populated.
    ///
    /// Implicit-presence scalars are populated when non-zero, lists when
    /// non-empty; message fields and oneof members when explicitly set.
    fn has(&self, field: &FieldDescriptor) -> Result<bool>;

    /// Current value of `field`, or its zero value when unset.
    ///
    /// Unset message fields yield a [`MessageView`] whose `is_valid()` is
    /// false; unset lists yield an empty [`ListView`].
    fn get(&self, field: &FieldDescriptor) -> Result<ValueRef<'_>>;

    /// The member of `oneof` that is currently set.
    fn which_oneof(&self, oneof: &OneofDescriptor) -> Result<Option<FieldDescriptor>>;

    /// Visit populated fields in declaration order until `visit` returns
    /// `false`.
    fn range<F>(&self, visit: F)
    where
        F: FnMut(&FieldDescriptor, ValueRef<'_>) -> bool,
        Self: Sized;

    /// Preserved bytes of unrecognised fields.
    fn unknown_fields(&self) -> &UnknownFields;

    /// [`has`](Self::has) by field name.
    fn has_by_name(&self, name: &str) -> Result<bool> {
        let field = field_by_name(self.descriptor(), name)?;
        self.has(&field)
    }

    /// [`get`](Self::get) by field name.
    fn get_by_name(&self, name: &str) -> Result<ValueRef<'_>> {
        let field = field_by_name(self.descriptor(), name)?;
        self.get(&field)
    }
}

/// Writable handle returned by [`Record::mutable`].
#[derive(Debug)]
pub enum MutableRef<'a> {
    Message(&'a mut Record),
    List(ListMut<'a>),
}

impl<'a> MutableRef<'a> {
    pub fn into_message(self) -> Option<&'a mut Record> {
        match self {
            MutableRef::Message(record) => Some(record),
            MutableRef::List(_) => None,
        }
    }

    pub fn into_list(self) -> Option<ListMut<'a>> {
        match self {
            MutableRef::List(list) => Some(list),
            MutableRef::Message(_) => None,
        }
    }
}

// Records cross threads freely; mutation is serialised by `&mut`.
const _: fn() = || {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Record>();
};
