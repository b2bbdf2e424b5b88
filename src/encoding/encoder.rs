// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Record encoder.
//!
//! The output buffer is sized once with [`size`] and filled back to front:
//! unknown bytes first, then declared fields from the highest field number
//! down, so the finished buffer reads in ascending tag order with unknown
//! fields last. Embedded messages are written in place and prefixed with the
//! number of bytes the cursor moved.

use crate::core::{CodecError, Result};
use crate::encoding::buffer::TailWriter;
use crate::encoding::size::{size, varint_of};
use crate::encoding::wire::WireType;
use crate::reflect::record::{Record, Slot};
use crate::reflect::value::Value;

/// Encode `record` into a freshly allocated buffer.
pub fn encode(record: &Record) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; size(record)];
    let mut writer = TailWriter::new(&mut buf);
    write_record(&mut writer, record)?;
    writer.finish()?;
    Ok(buf)
}

/// Write one record immediately in front of the cursor.
pub(crate) fn write_record(w: &mut TailWriter<'_>, record: &Record) -> Result<()> {
    w.put_bytes(record.unknown.as_bytes())?;

    let inner = record.desc.inner();
    for &index in inner.encode_order.iter().rev() {
        let field = &inner.fields[index];
        let number = field.number;

        match &record.slots[index] {
            Slot::Scalar(value) if value.is_default() => {}
            Slot::Scalar(value) => write_value(w, number, value)?,
            Slot::Message(Some(sub)) => write_message(w, number, sub)?,
            Slot::Message(None) => {}
            Slot::List(items) if items.is_empty() => {}
            Slot::List(items) if field.packed => {
                let end = w.position();
                for item in items.iter().rev() {
                    let raw = varint_of(item).ok_or_else(|| {
                        CodecError::type_mismatch(&field.full_name, "varint", item.type_name())
                    })?;
                    w.put_varint(raw)?;
                }
                w.put_length_since(end)?;
                w.put_tag(number, WireType::LengthDelimited)?;
            }
            Slot::List(items) => {
                for item in items.iter().rev() {
                    write_value(w, number, item)?;
                }
            }
            Slot::Oneof(group) => {
                if let Some(case) = record.oneofs[*group].as_ref().filter(|c| c.field == index) {
                    write_value(w, number, &case.value)?;
                }
            }
        }
    }
    Ok(())
}

/// Write one tagged value. Presence has already been decided by the caller.
fn write_value(w: &mut TailWriter<'_>, number: u32, value: &Value) -> Result<()> {
    match value {
        Value::String(s) => write_delimited(w, number, s.as_bytes()),
        Value::Bytes(b) => write_delimited(w, number, b),
        Value::Message(sub) => write_message(w, number, sub),
        Value::List(_) => Err(CodecError::invariant_violation(
            "nested list value inside a field slot",
        )),
        scalar => {
            let raw = varint_of(scalar).ok_or_else(|| {
                CodecError::invariant_violation("scalar value without a varint encoding")
            })?;
            w.put_varint(raw)?;
            w.put_tag(number, WireType::Varint)
        }
    }
}

fn write_delimited(w: &mut TailWriter<'_>, number: u32, payload: &[u8]) -> Result<()> {
    w.put_bytes(payload)?;
    w.put_varint(payload.len() as u64)?;
    w.put_tag(number, WireType::LengthDelimited)
}

fn write_message(w: &mut TailWriter<'_>, number: u32, sub: &Record) -> Result<()> {
    let end = w.position();
    write_record(w, sub)?;
    w.put_length_since(end)?;
    w.put_tag(number, WireType::LengthDelimited)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::builder::{FieldType, FileBuilder, MessageBuilder};
    use crate::schema::{DescriptorPool, MessageDescriptor};

    fn desc() -> MessageDescriptor {
        let file = FileBuilder::new("enc.proto", "enc")
            .message(MessageBuilder::new("Leaf").field("v", 1, FieldType::Int32))
            .message(
                MessageBuilder::new("Root")
                    .field("leaf", 3, FieldType::message("enc.Leaf"))
                    .field("flag", 1, FieldType::Bool)
                    .repeated("ids", 2, FieldType::Uint32)
                    .oneof("choice", |o| o.field("n", 4, FieldType::Int64)),
            )
            .build();
        DescriptorPool::builder()
            .add_file(file)
            .build()
            .unwrap()
            .get_message_by_name("enc.Root")
            .unwrap()
    }

    #[test]
    fn test_fields_emitted_in_ascending_number_order() {
        let mut record = Record::new(desc());
        record.message_mut("leaf").unwrap().set_by_name("v", 5).unwrap();
        record.set_by_name("flag", true).unwrap();
        record
            .set_by_name("ids", Value::List(vec![Value::U32(1), Value::U32(2)]))
            .unwrap();

        let bytes = encode(&record).unwrap();
        assert_eq!(
            bytes,
            vec![
                0x08, 0x01, // flag
                0x12, 0x02, 0x01, 0x02, // ids, packed
                0x1a, 0x02, 0x08, 0x05, // leaf { v: 5 }
            ]
        );
    }

    #[test]
    fn test_oneof_member_with_default_value_is_emitted() {
        let mut record = Record::new(desc());
        record.set_by_name("n", 0i64).unwrap();
        assert_eq!(encode(&record).unwrap(), vec![0x20, 0x00]);
    }

    #[test]
    fn test_negative_int32_is_sign_extended() {
        let mut record = Record::new(desc());
        record.message_mut("leaf").unwrap().set_by_name("v", -1).unwrap();

        let bytes = encode(&record).unwrap();
        assert_eq!(bytes.len(), 2 + 1 + 10);
        assert_eq!(&bytes[..3], &[0x1a, 0x0b, 0x08]);
        assert_eq!(&bytes[3..], &[0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01]);
    }

    #[test]
    fn test_unknown_bytes_written_last() {
        let mut record = Record::new(desc());
        record.unknown.push_raw(&[0x48, 0x07]);
        record.set_by_name("flag", true).unwrap();
        assert_eq!(encode(&record).unwrap(), vec![0x08, 0x01, 0x48, 0x07]);
    }
}
