// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Adapters over repeated fields.

use std::fmt;

use crate::core::{CodecError, Result};
use crate::reflect::record::Record;
use crate::reflect::value::{check_element, Value, ValueRef};
use crate::schema::{FieldDescriptor, Kind};

const NO_ITEMS: &[Value] = &[];

/// Read-only view of a repeated field.
#[derive(Clone, Copy)]
pub struct ListView<'a> {
    items: &'a [Value],
}

impl<'a> ListView<'a> {
    pub(crate) fn new(items: &'a [Value]) -> Self {
        Self { items }
    }

    pub(crate) fn empty() -> Self {
        Self { items: NO_ITEMS }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Element at `index`, or `IndexOutOfRange`.
    pub fn get(&self, index: usize) -> Result<ValueRef<'a>> {
        self.items
            .get(index)
            .map(Value::as_ref)
            .ok_or_else(|| CodecError::index_out_of_range(index, self.items.len()))
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = ValueRef<'a>> + 'a {
        self.items.iter().map(Value::as_ref)
    }

    /// The underlying elements.
    pub fn as_slice(&self) -> &'a [Value] {
        self.items
    }
}

impl fmt::Debug for ListView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items).finish()
    }
}

/// Writable handle to one repeated field of one record.
///
/// Borrowed from the record through [`Record::mutable`]; every element written
/// through it is checked against the field's kind.
pub struct ListMut<'a> {
    field: FieldDescriptor,
    items: &'a mut Vec<Value>,
}

impl<'a> ListMut<'a> {
    pub(crate) fn new(field: FieldDescriptor, items: &'a mut Vec<Value>) -> Self {
        Self { field, items }
    }

    /// The repeated field this list belongs to.
    pub fn field(&self) -> &FieldDescriptor {
        &self.field
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<ValueRef<'_>> {
        ListView::new(&self.items[..]).get(index)
    }

    /// Replace the element at `index`.
    pub fn set(&mut self, index: usize, value: Value) -> Result<()> {
        check_element(&self.field, &value)?;
        let len = self.items.len();
        let slot = self
            .items
            .get_mut(index)
            .ok_or_else(|| CodecError::index_out_of_range(index, len))?;
        *slot = value;
        Ok(())
    }

    pub fn append(&mut self, value: Value) -> Result<()> {
        check_element(&self.field, &value)?;
        self.items.push(value);
        Ok(())
    }

    /// Append an empty record and return it for in-place filling.
    ///
    /// Fails with `NotMutable` unless the list holds messages.
    pub fn append_mutable(&mut self) -> Result<&mut Record> {
        let Kind::Message(desc) = self.field.kind() else {
            return Err(CodecError::not_mutable(self.field.full_name()));
        };
        self.items.push(Value::Message(Record::new(desc)));
        self.items
            .last_mut()
            .and_then(Value::as_message_mut)
            .ok_or_else(|| CodecError::invariant_violation("appended element is not a message"))
    }

    /// Keep the first `len` elements. A larger `len` fails with
    /// `IndexOutOfRange`.
    pub fn truncate(&mut self, len: usize) -> Result<()> {
        if len > self.items.len() {
            return Err(CodecError::index_out_of_range(len, self.items.len()));
        }
        self.items.truncate(len);
        Ok(())
    }

    /// A fresh, detached zero element of the list's kind.
    pub fn new_element(&self) -> Value {
        Value::default_for(&self.field.kind())
    }

    pub fn as_view(&self) -> ListView<'_> {
        ListView::new(&self.items[..])
    }
}

impl fmt::Debug for ListMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListMut")
            .field("field", &self.field.full_name())
            .field("items", &self.items)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::MutableRef;
    use crate::schema::builder::{FieldType, FileBuilder, MessageBuilder};
    use crate::schema::{DescriptorPool, MessageDescriptor};

    fn desc() -> MessageDescriptor {
        let file = FileBuilder::new("list.proto", "list")
            .message(MessageBuilder::new("Item").field("id", 1, FieldType::Uint64))
            .message(
                MessageBuilder::new("Bag")
                    .repeated("ids", 1, FieldType::Uint32)
                    .repeated("items", 2, FieldType::message("list.Item")),
            )
            .build();
        DescriptorPool::builder()
            .add_file(file)
            .build()
            .unwrap()
            .get_message_by_name("list.Bag")
            .unwrap()
    }

    fn list_of<'a>(record: &'a mut Record, name: &str) -> ListMut<'a> {
        let field = record.descriptor().get_field_by_name(name).unwrap();
        match record.mutable(&field).unwrap() {
            MutableRef::List(list) => list,
            MutableRef::Message(_) => panic!("expected a list"),
        }
    }

    #[test]
    fn test_append_get_set() {
        let mut record = Record::new(desc());
        let mut ids = list_of(&mut record, "ids");

        ids.append(Value::U32(1)).unwrap();
        ids.append(Value::U32(2)).unwrap();
        ids.set(0, Value::U32(7)).unwrap();

        assert_eq!(ids.len(), 2);
        assert_eq!(ids.get(0).unwrap().as_u32(), Some(7));
        assert_eq!(ids.get(1).unwrap().as_u32(), Some(2));
    }

    #[test]
    fn test_type_checked_writes() {
        let mut record = Record::new(desc());
        let mut ids = list_of(&mut record, "ids");

        let err = ids.append(Value::U64(1)).unwrap_err();
        assert!(matches!(err, CodecError::TypeMismatch { .. }));
        assert!(ids.is_empty());
    }

    #[test]
    fn test_index_out_of_range() {
        let mut record = Record::new(desc());
        let mut ids = list_of(&mut record, "ids");
        ids.append(Value::U32(1)).unwrap();

        assert_eq!(
            ids.get(1).unwrap_err(),
            CodecError::index_out_of_range(1, 1)
        );
        assert!(ids.set(3, Value::U32(0)).is_err());
        assert!(ids.truncate(2).is_err());
    }

    #[test]
    fn test_truncate() {
        let mut record = Record::new(desc());
        let mut ids = list_of(&mut record, "ids");
        for i in 0..4 {
            ids.append(Value::U32(i)).unwrap();
        }
        ids.truncate(1).unwrap();
        assert_eq!(ids.as_view().iter().filter_map(|v| v.as_u32()).collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_append_mutable_for_messages_only() {
        let mut record = Record::new(desc());
        {
            let mut items = list_of(&mut record, "items");
            let item = items.append_mutable().unwrap();
            item.set_by_name("id", Value::U64(9)).unwrap();
            assert_eq!(items.len(), 1);
        }
        let mut ids = list_of(&mut record, "ids");
        assert!(matches!(
            ids.append_mutable().unwrap_err(),
            CodecError::NotMutable { .. }
        ));
        assert_eq!(ids.new_element(), Value::U32(0));
    }
}
