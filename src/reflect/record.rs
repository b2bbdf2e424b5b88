// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! In-memory storage for one message instance.

use std::fmt;

use crate::encoding::unknown::UnknownFields;
use crate::reflect::value::Value;
use crate::schema::descriptor::{kind_from_ref, KindRef};
use crate::schema::{Cardinality, MessageDescriptor};

/// A message instance: one slot per declared field, one tagged union per
/// oneof group, and the bytes of every field the schema did not recognise.
///
/// Records are plain owned data. Mutation needs `&mut`, so a record can be
/// read from many threads at once but written from only one.
#[derive(Clone)]
pub struct Record {
    pub(crate) desc: MessageDescriptor,
    pub(crate) slots: Vec<Slot>,
    pub(crate) oneofs: Vec<Option<OneofCase>>,
    pub(crate) unknown: UnknownFields,
}

/// Storage for one declared field.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Slot {
    /// Implicit-presence scalar; the zero value means unset
    Scalar(Value),
    /// Singular embedded message
    Message(Option<Record>),
    /// Repeated field of any kind
    List(Vec<Value>),
    /// Member of the oneof group with this index; the value lives in
    /// [`Record::oneofs`]
    Oneof(usize),
}

/// The member currently set in a oneof group.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct OneofCase {
    /// Declared field index
    pub(crate) field: usize,
    pub(crate) value: Value,
}

impl Record {
    /// Create an empty record: zero scalars, no sub-records, empty lists and
    /// no unknown fields.
    pub fn new(desc: MessageDescriptor) -> Self {
        let inner = desc.inner();
        let slots = inner
            .fields
            .iter()
            .map(|field| match (field.oneof, field.cardinality, field.kind) {
                (Some(group), _, _) => Slot::Oneof(group),
                (None, Cardinality::Repeated, _) => Slot::List(Vec::new()),
                (None, Cardinality::Optional, KindRef::Message(_)) => Slot::Message(None),
                (None, Cardinality::Optional, _) => {
                    Slot::Scalar(Value::default_for(&kind_from_ref(desc.pool(), field.kind)))
                }
            })
            .collect();
        let oneofs = vec![None; inner.oneofs.len()];

        Self {
            desc,
            slots,
            oneofs,
            unknown: UnknownFields::default(),
        }
    }

    /// The record's message type.
    pub fn descriptor(&self) -> &MessageDescriptor {
        &self.desc
    }

    /// Fields this record's schema did not recognise, in wire order.
    pub fn unknown_fields(&self) -> &UnknownFields {
        &self.unknown
    }

    /// Drop all preserved unknown fields.
    pub fn clear_unknown_fields(&mut self) {
        self.unknown.clear();
    }

    /// Reset every field and drop unknown fields.
    pub fn clear_all(&mut self) {
        *self = Record::new(self.desc.clone());
    }

    /// Whether no field is populated and no unknown bytes are held.
    pub fn is_empty(&self) -> bool {
        self.unknown.is_empty()
            && self.oneofs.iter().all(Option::is_none)
            && self.slots.iter().all(|slot| match slot {
                Slot::Scalar(v) => v.is_default(),
                Slot::Message(m) => m.is_none(),
                Slot::List(items) => items.is_empty(),
                Slot::Oneof(_) => true,
            })
    }

    /// Whether declared field `index` is populated.
    pub(crate) fn slot_has(&self, index: usize) -> bool {
        match &self.slots[index] {
            Slot::Scalar(v) => !v.is_default(),
            Slot::Message(m) => m.is_some(),
            Slot::List(items) => !items.is_empty(),
            Slot::Oneof(group) => self.oneofs[*group]
                .as_ref()
                .is_some_and(|case| case.field == index),
        }
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.desc.full_name() == other.desc.full_name()
            && self.slots == other.slots
            && self.oneofs == other.oneofs
            && self.unknown == other.unknown
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(self.desc.full_name());
        let inner = self.desc.inner();
        for (index, field) in inner.fields.iter().enumerate() {
            if !self.slot_has(index) {
                continue;
            }
            match &self.slots[index] {
                Slot::Scalar(v) => s.field(&field.name, v),
                Slot::Message(Some(m)) => s.field(&field.name, m),
                Slot::List(items) => s.field(&field.name, items),
                Slot::Oneof(group) => match &self.oneofs[*group] {
                    Some(case) => s.field(&field.name, &case.value),
                    None => &mut s,
                },
                Slot::Message(None) => &mut s,
            };
        }
        if !self.unknown.is_empty() {
            s.field("unknown_bytes", &self.unknown.len());
        }
        s.finish()
    }
}
