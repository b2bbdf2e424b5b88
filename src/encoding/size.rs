// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Encoded size computation.

use crate::encoding::wire::{tag_size, varint_size};
use crate::reflect::record::{Record, Slot};
use crate::reflect::value::Value;

/// Exact number of bytes [`marshal`](crate::encoding::marshal) produces for
/// `record`: every populated field's tag and payload, plus the preserved
/// unknown bytes.
pub fn size(record: &Record) -> usize {
    let inner = record.desc.inner();
    let mut total = record.unknown.len();

    for (index, slot) in record.slots.iter().enumerate() {
        let field = &inner.fields[index];
        total += match slot {
            Slot::Scalar(value) if value.is_default() => 0,
            Slot::Scalar(value) => tag_size(field.number) + value_size(value),
            Slot::Message(Some(sub)) => tag_size(field.number) + delimited_size(size(sub)),
            Slot::Message(None) => 0,
            Slot::List(items) if items.is_empty() => 0,
            Slot::List(items) if field.packed => {
                let payload: usize = items.iter().map(value_size).sum();
                tag_size(field.number) + delimited_size(payload)
            }
            Slot::List(items) => items.len() * tag_size(field.number)
                + items.iter().map(value_size).sum::<usize>(),
            Slot::Oneof(group) => match &record.oneofs[*group] {
                Some(case) if case.field == index => tag_size(field.number) + value_size(&case.value),
                _ => 0,
            },
        };
    }
    total
}

/// Payload size of one value, length prefix included for delimited kinds.
pub(crate) fn value_size(value: &Value) -> usize {
    match value {
        Value::String(s) => delimited_size(s.len()),
        Value::Bytes(b) => delimited_size(b.len()),
        Value::Message(sub) => delimited_size(size(sub)),
        Value::List(items) => items.iter().map(value_size).sum(),
        scalar => varint_of(scalar).map_or(0, varint_size),
    }
}

#[inline]
fn delimited_size(payload: usize) -> usize {
    varint_size(payload as u64) + payload
}

/// Raw varint of a varint-coded value. Signed kinds are sign-extended to
/// 64 bits.
#[inline]
pub(crate) fn varint_of(value: &Value) -> Option<u64> {
    match *value {
        Value::Bool(v) => Some(u64::from(v)),
        Value::I32(v) | Value::EnumNumber(v) => Some(i64::from(v) as u64),
        Value::I64(v) => Some(v as u64),
        Value::U32(v) => Some(u64::from(v)),
        Value::U64(v) => Some(v),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::builder::{FieldType, FileBuilder, MessageBuilder};
    use crate::schema::{DescriptorPool, MessageDescriptor};

    fn desc() -> MessageDescriptor {
        let file = FileBuilder::new("size.proto", "size")
            .message(MessageBuilder::new("Leaf").field("v", 1, FieldType::Int32))
            .message(
                MessageBuilder::new("Root")
                    .field("name", 1, FieldType::String)
                    .field("leaf", 2, FieldType::message("size.Leaf"))
                    .repeated("ids", 3, FieldType::Uint64)
                    .repeated("tags", 4, FieldType::String),
            )
            .build();
        DescriptorPool::builder()
            .add_file(file)
            .build()
            .unwrap()
            .get_message_by_name("size.Root")
            .unwrap()
    }

    #[test]
    fn test_empty_record_has_zero_size() {
        assert_eq!(size(&Record::new(desc())), 0);
    }

    #[test]
    fn test_negative_int32_takes_ten_bytes() {
        assert_eq!(value_size(&Value::I32(-1)), 10);
        assert_eq!(value_size(&Value::EnumNumber(-2)), 10);
        assert_eq!(value_size(&Value::U32(u32::MAX)), 5);
    }

    #[test]
    fn test_field_sizes() {
        let mut record = Record::new(desc());
        record.set_by_name("name", "abc").unwrap();
        // tag + len + 3
        assert_eq!(size(&record), 5);

        record.message_mut("leaf").unwrap();
        // empty sub-message: tag + zero length
        assert_eq!(size(&record), 7);

        let mut ids = record.list_mut("ids").unwrap();
        ids.append(Value::U64(1)).unwrap();
        ids.append(Value::U64(300)).unwrap();
        // packed: tag + len + 1 + 2
        assert_eq!(size(&record), 7 + 5);

        let mut tags = record.list_mut("tags").unwrap();
        tags.append(Value::from("x")).unwrap();
        tags.append(Value::from("")).unwrap();
        // one entry per element: (1 + 1 + 1) + (1 + 1)
        assert_eq!(size(&record), 12 + 5);
    }
}
