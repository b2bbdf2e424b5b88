// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Descriptor-driven field access on [`Record`].
//!
//! Every operation takes a [`FieldDescriptor`] and first resolves it against
//! the record's own message type:
//!
//! - a field declared by the record's message resolves directly;
//! - a field of a same-named message from another pool resolves by number;
//! - an extension fails with `ExtensionsUnsupported`;
//! - anything else fails with `UnknownField`.

use crate::core::{CodecError, Result};
use crate::encoding::unknown::UnknownFields;
use crate::reflect::list::{ListMut, ListView};
use crate::reflect::record::{OneofCase, Record, Slot};
use crate::reflect::value::{check_field_value, Value, ValueRef};
use crate::reflect::view::MessageView;
use crate::reflect::{MutableRef, ReflectMessage};
use crate::schema::{FieldDescriptor, MessageDescriptor, OneofDescriptor};

/// Map `field` to a declared field index of `desc`.
pub(crate) fn resolve_field(desc: &MessageDescriptor, field: &FieldDescriptor) -> Result<usize> {
    if field.is_extension() {
        return Err(CodecError::extensions_unsupported(
            field.full_name(),
            desc.full_name(),
        ));
    }
    let owner = field.containing_message();
    if owner == *desc {
        if let Some(index) = field.declared_index() {
            return Ok(index);
        }
    } else if owner.full_name() == desc.full_name() {
        if let Some(&index) = desc.inner().by_number.get(&field.number()) {
            return Ok(index);
        }
    }
    Err(CodecError::unknown_field(field.full_name(), desc.full_name()))
}

/// Map `oneof` to a oneof group index of `desc`.
pub(crate) fn resolve_oneof(desc: &MessageDescriptor, oneof: &OneofDescriptor) -> Result<usize> {
    let owner = oneof.containing_message();
    if owner == desc {
        return Ok(oneof.index());
    }
    if owner.full_name() == desc.full_name() {
        if let Some(index) = desc.inner().oneofs.iter().position(|o| o.name == oneof.name()) {
            return Ok(index);
        }
    }
    Err(CodecError::unknown_field(oneof.full_name(), desc.full_name()))
}

/// Look up a field of `desc` by name, failing with `UnknownField`.
pub(crate) fn field_by_name(desc: &MessageDescriptor, name: &str) -> Result<FieldDescriptor> {
    desc.get_field_by_name(name)
        .ok_or_else(|| CodecError::unknown_field(name, desc.full_name()))
}

/// Borrowed zero value of a field: an empty list, an unset message view, or
/// the zero scalar.
pub(crate) fn default_ref(field: &FieldDescriptor) -> ValueRef<'static> {
    if field.is_list() {
        ValueRef::List(ListView::empty())
    } else {
        ValueRef::default_for(field.kind())
    }
}

impl Record {
    fn value_ref(&self, index: usize) -> ValueRef<'_> {
        match &self.slots[index] {
            Slot::Scalar(v) => v.as_ref(),
            Slot::Message(Some(record)) => ValueRef::Message(MessageView::of(record)),
            Slot::List(items) => ValueRef::List(ListView::new(items)),
            Slot::Oneof(group) => match &self.oneofs[*group] {
                Some(case) if case.field == index => case.value.as_ref(),
                _ => default_ref(&self.desc.declared_field(index)),
            },
            Slot::Message(None) => default_ref(&self.desc.declared_field(index)),
        }
    }

    /// Resolve a field name of this record's type.
    pub fn field(&self, name: &str) -> Result<FieldDescriptor> {
        field_by_name(&self.desc, name)
    }

    /// Store `value` in `field`.
    ///
    /// The value must match the field's kind exactly; repeated fields take a
    /// [`Value::List`] whose elements all match. Setting a oneof member
    /// replaces whichever member was set before.
    ///
    /// # Errors
    ///
    /// `UnknownField` / `ExtensionsUnsupported` for foreign descriptors,
    /// `TypeMismatch` for a value of the wrong kind.
    pub fn set(&mut self, field: &FieldDescriptor, value: Value) -> Result<()> {
        let index = resolve_field(&self.desc, field)?;
        let local = self.desc.declared_field(index);
        check_field_value(&local, &value)?;

        match (&mut self.slots[index], value) {
            (Slot::Scalar(slot), value) => *slot = value,
            (Slot::Message(slot), Value::Message(record)) => *slot = Some(record),
            (Slot::List(slot), Value::List(items)) => *slot = items,
            (Slot::Oneof(group), value) => {
                self.oneofs[*group] = Some(OneofCase {
                    field: index,
                    value,
                });
            }
            (_, value) => {
                return Err(CodecError::type_mismatch(
                    local.full_name(),
                    local.kind().type_name(),
                    value.type_name(),
                ))
            }
        }
        Ok(())
    }

    /// Reset `field`; `has` reports false afterwards.
    pub fn clear(&mut self, field: &FieldDescriptor) -> Result<()> {
        let index = resolve_field(&self.desc, field)?;
        let local = self.desc.declared_field(index);

        match &mut self.slots[index] {
            Slot::Scalar(slot) => *slot = Value::default_for(&local.kind()),
            Slot::Message(slot) => *slot = None,
            Slot::List(items) => items.clear(),
            Slot::Oneof(group) => {
                let case = &mut self.oneofs[*group];
                if case.as_ref().is_some_and(|c| c.field == index) {
                    *case = None;
                }
            }
        }
        Ok(())
    }

    /// Writable handle to a message or list field.
    ///
    /// An unset message field (including a oneof member) is first populated
    /// with an empty record, so the field is present afterwards.
    ///
    /// # Errors
    ///
    /// `NotMutable` for scalar fields.
    pub fn mutable(&mut self, field: &FieldDescriptor) -> Result<MutableRef<'_>> {
        let index = resolve_field(&self.desc, field)?;
        let local = self.desc.declared_field(index);
        let message_desc = if local.is_list() {
            None
        } else {
            local.kind().as_message().cloned()
        };

        match (&mut self.slots[index], message_desc) {
            (Slot::List(items), _) => Ok(MutableRef::List(ListMut::new(local, items))),
            (Slot::Message(slot), Some(desc)) => {
                Ok(MutableRef::Message(slot.get_or_insert_with(|| Record::new(desc))))
            }
            (Slot::Oneof(group), Some(desc)) => {
                let case = &mut self.oneofs[*group];
                if !case.as_ref().is_some_and(|c| c.field == index) {
                    *case = Some(OneofCase {
                        field: index,
                        value: Value::Message(Record::new(desc)),
                    });
                }
                match case {
                    Some(OneofCase {
                        value: Value::Message(record),
                        ..
                    }) => Ok(MutableRef::Message(record)),
                    _ => Err(CodecError::invariant_violation(
                        "oneof message member holds a non-message value",
                    )),
                }
            }
            _ => Err(CodecError::not_mutable(local.full_name())),
        }
    }

    /// A fresh, detached zero value suitable for `set` on `field`.
    pub fn new_field(&self, field: &FieldDescriptor) -> Result<Value> {
        let index = resolve_field(&self.desc, field)?;
        let local = self.desc.declared_field(index);
        Ok(if local.is_list() {
            Value::List(Vec::new())
        } else {
            Value::default_for(&local.kind())
        })
    }

    pub fn set_by_name(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let field = self.field(name)?;
        self.set(&field, value.into())
    }

    pub fn clear_by_name(&mut self, name: &str) -> Result<()> {
        let field = self.field(name)?;
        self.clear(&field)
    }

    pub fn mutable_by_name(&mut self, name: &str) -> Result<MutableRef<'_>> {
        let field = self.field(name)?;
        self.mutable(&field)
    }

    /// Mutable access to the embedded message `name`, populating it if unset.
    pub fn message_mut(&mut self, name: &str) -> Result<&mut Record> {
        let field = self.field(name)?;
        match self.mutable(&field)? {
            MutableRef::Message(record) => Ok(record),
            MutableRef::List(_) => Err(CodecError::not_mutable(field.full_name())),
        }
    }

    /// Mutable access to the repeated field `name`.
    pub fn list_mut(&mut self, name: &str) -> Result<ListMut<'_>> {
        let field = self.field(name)?;
        match self.mutable(&field)? {
            MutableRef::List(list) => Ok(list),
            MutableRef::Message(_) => Err(CodecError::not_mutable(field.full_name())),
        }
    }
}

impl ReflectMessage for Record {
    fn descriptor(&self) -> &MessageDescriptor {
        &self.desc
    }

    fn has(&self, field: &FieldDescriptor) -> Result<bool> {
        let index = resolve_field(&self.desc, field)?;
        Ok(self.slot_has(index))
    }

    fn get(&self, field: &FieldDescriptor) -> Result<ValueRef<'_>> {
        let index = resolve_field(&self.desc, field)?;
        Ok(self.value_ref(index))
    }

    fn which_oneof(&self, oneof: &OneofDescriptor) -> Result<Option<FieldDescriptor>> {
        let group = resolve_oneof(&self.desc, oneof)?;
        Ok(self.oneofs[group]
            .as_ref()
            .map(|case| self.desc.declared_field(case.field)))
    }

    fn range<F>(&self, mut visit: F)
    where
        F: FnMut(&FieldDescriptor, ValueRef<'_>) -> bool,
    {
        for index in 0..self.slots.len() {
            if !self.slot_has(index) {
                continue;
            }
            let field = self.desc.declared_field(index);
            if !visit(&field, self.value_ref(index)) {
                break;
            }
        }
    }

    fn unknown_fields(&self) -> &UnknownFields {
        &self.unknown
    }
}
