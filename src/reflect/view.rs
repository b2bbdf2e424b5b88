// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Read-only message views.

use std::fmt;

use crate::core::Result;
use crate::encoding::unknown::UnknownFields;
use crate::reflect::accessor::{default_ref, resolve_field, resolve_oneof};
use crate::reflect::record::Record;
use crate::reflect::value::ValueRef;
use crate::reflect::ReflectMessage;
use crate::schema::{FieldDescriptor, MessageDescriptor, OneofDescriptor};

static NO_UNKNOWN_FIELDS: UnknownFields = UnknownFields::new();

/// A read-only view of an embedded message.
///
/// Returned by `get` for message fields. When the field is unset the view
/// has no backing record: [`is_valid`](Self::is_valid) is false and every
/// read yields the zero value. A view of a set-but-empty message is valid.
#[derive(Clone)]
pub struct MessageView<'a> {
    desc: MessageDescriptor,
    record: Option<&'a Record>,
}

impl<'a> MessageView<'a> {
    pub(crate) fn of(record: &'a Record) -> Self {
        Self {
            desc: record.descriptor().clone(),
            record: Some(record),
        }
    }

    pub(crate) fn unset(desc: MessageDescriptor) -> Self {
        Self { desc, record: None }
    }

    /// Whether the view is backed by a record.
    pub fn is_valid(&self) -> bool {
        self.record.is_some()
    }

    /// The backing record, if any.
    pub fn record(&self) -> Option<&'a Record> {
        self.record
    }

    /// Copy into an owned record; an unset view becomes an empty one.
    pub fn to_record(&self) -> Record {
        match self.record {
            Some(record) => record.clone(),
            None => Record::new(self.desc.clone()),
        }
    }
}

impl ReflectMessage for MessageView<'_> {
    fn descriptor(&self) -> &MessageDescriptor {
        &self.desc
    }

    fn has(&self, field: &FieldDescriptor) -> Result<bool> {
        match self.record {
            Some(record) => record.has(field),
            None => resolve_field(&self.desc, field).map(|_| false),
        }
    }

    fn get(&self, field: &FieldDescriptor) -> Result<ValueRef<'_>> {
        match self.record {
            Some(record) => record.get(field),
            None => {
                let index = resolve_field(&self.desc, field)?;
                Ok(default_ref(&self.desc.declared_field(index)))
            }
        }
    }

    fn which_oneof(&self, oneof: &OneofDescriptor) -> Result<Option<FieldDescriptor>> {
        match self.record {
            Some(record) => record.which_oneof(oneof),
            None => resolve_oneof(&self.desc, oneof).map(|_| None),
        }
    }

    fn range<F>(&self, visit: F)
    where
        F: FnMut(&FieldDescriptor, ValueRef<'_>) -> bool,
    {
        if let Some(record) = self.record {
            record.range(visit);
        }
    }

    fn unknown_fields(&self) -> &UnknownFields {
        self.record
            .map_or(&NO_UNKNOWN_FIELDS, |record| &record.unknown)
    }
}

impl fmt::Debug for MessageView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.record {
            Some(record) => fmt::Debug::fmt(record, f),
            None => write!(f, "{}(unset)", self.desc.full_name()),
        }
    }
}
