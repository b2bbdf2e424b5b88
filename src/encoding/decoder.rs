// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Record decoder.
//!
//! Decoding works on the caller's buffer with absolute offsets: an embedded
//! message is decoded from the same slice truncated at its end, so every
//! error position refers to the original input.

use crate::core::{CodecError, Result};
use crate::encoding::options::UnmarshalOptions;
use crate::encoding::wire::{decode_varint, read_length_delimited, read_tag, skip_field, WireType};
use crate::reflect::record::{OneofCase, Record, Slot};
use crate::reflect::value::Value;
use crate::schema::descriptor::KindRef;
use crate::schema::MessageDescriptor;

/// Decode `buf` into a new record of type `desc`.
pub fn decode(desc: &MessageDescriptor, buf: &[u8], opts: &UnmarshalOptions) -> Result<Record> {
    let mut record = Record::new(desc.clone());
    let mut ctx = DecodeContext::new(opts);
    merge_message(&mut record, buf, 0, opts.recursion_limit, &mut ctx)?;
    ctx.report();
    Ok(record)
}

/// Decode `buf` into an existing record.
///
/// Repeated fields are appended to, singular scalars overwritten and embedded
/// messages merged. On error `record` is left unchanged.
pub fn merge(record: &mut Record, buf: &[u8], opts: &UnmarshalOptions) -> Result<()> {
    let mut staged = record.clone();
    let mut ctx = DecodeContext::new(opts);
    merge_message(&mut staged, buf, 0, opts.recursion_limit, &mut ctx)?;
    ctx.report();
    *record = staged;
    Ok(())
}

struct DecodeContext<'o> {
    opts: &'o UnmarshalOptions,
    discarded: usize,
}

impl<'o> DecodeContext<'o> {
    fn new(opts: &'o UnmarshalOptions) -> Self {
        Self { opts, discarded: 0 }
    }

    fn report(&self) {
        if self.discarded > 0 {
            tracing::debug!(
                context = "unmarshal",
                discarded = self.discarded,
                "discarded unknown fields"
            );
        }
    }
}

/// Decode the fields in `buf[pos..]` into `record`.
fn merge_message(
    record: &mut Record,
    buf: &[u8],
    mut pos: usize,
    depth_left: u32,
    ctx: &mut DecodeContext<'_>,
) -> Result<()> {
    let desc = record.desc.clone();
    let inner = desc.inner();

    while pos < buf.len() {
        let tag_pos = pos;
        let (number, wire_type, next) = read_tag(buf, pos)?;

        match inner.by_number.get(&number) {
            Some(&index) => {
                pos = merge_field(
                    record,
                    &desc,
                    index,
                    buf,
                    next,
                    wire_type,
                    depth_left,
                    ctx,
                )?;
            }
            None => {
                let end = skip_field(buf, next, number, wire_type)?;
                if ctx.opts.discard_unknown {
                    ctx.discarded += 1;
                } else {
                    tracing::trace!(
                        type_name = %inner.full_name,
                        field_number = number,
                        wire_type = %wire_type,
                        "preserving unknown field"
                    );
                    record.unknown.push_raw(&buf[tag_pos..end]);
                }
                pos = end;
            }
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn merge_field(
    record: &mut Record,
    desc: &MessageDescriptor,
    index: usize,
    buf: &[u8],
    pos: usize,
    wire_type: WireType,
    depth_left: u32,
    ctx: &mut DecodeContext<'_>,
) -> Result<usize> {
    let field = &desc.inner().fields[index];

    // Repeated varint kinds accept the packed form as well.
    if wire_type == WireType::LengthDelimited && field.kind.is_varint() {
        if let Slot::List(items) = &mut record.slots[index] {
            let (start, end) = read_length_delimited(buf, pos)?;
            let packed = &buf[..end];
            let mut cursor = start;
            while cursor < end {
                let (raw, next) = decode_varint(packed, cursor)?;
                items.push(scalar_from_varint(field.kind, raw));
                cursor = next;
            }
            return Ok(end);
        }
    }

    let expected = field.kind.wire_type();
    if wire_type != expected {
        return Err(CodecError::wrong_wire_type(
            &field.full_name,
            expected.as_u8(),
            wire_type.as_u8(),
        ));
    }

    match field.kind {
        KindRef::Message(message_index) => {
            let (start, end) = read_length_delimited(buf, pos)?;
            if depth_left == 0 {
                return Err(CodecError::RecursionLimitExceeded {
                    limit: ctx.opts.recursion_limit,
                });
            }
            let sub_desc = MessageDescriptor::new(desc.pool().clone(), message_index);
            let target = message_target(record, index, sub_desc)?;
            merge_message(target, &buf[..end], start, depth_left - 1, ctx)?;
            Ok(end)
        }
        KindRef::String => {
            let (start, end) = read_length_delimited(buf, pos)?;
            let text = std::str::from_utf8(&buf[start..end])
                .map_err(|_| CodecError::invalid_utf8(&field.full_name))?;
            store(record, index, Value::String(text.to_string()));
            Ok(end)
        }
        KindRef::Bytes => {
            let (start, end) = read_length_delimited(buf, pos)?;
            store(record, index, Value::Bytes(buf[start..end].to_vec()));
            Ok(end)
        }
        kind => {
            let (raw, next) = decode_varint(buf, pos)?;
            store(record, index, scalar_from_varint(kind, raw));
            Ok(next)
        }
    }
}

/// Convert a raw varint to the field's value type. Narrower kinds keep the
/// low bits, matching how the value was sign-extended on the way out.
fn scalar_from_varint(kind: KindRef, raw: u64) -> Value {
    match kind {
        KindRef::Bool => Value::Bool(raw != 0),
        KindRef::Int32 => Value::I32(raw as i32),
        KindRef::Int64 => Value::I64(raw as i64),
        KindRef::Uint32 => Value::U32(raw as u32),
        KindRef::Enum(_) => Value::EnumNumber(raw as i32),
        _ => Value::U64(raw),
    }
}

/// Store a decoded non-message value: append to lists, overwrite otherwise.
fn store(record: &mut Record, index: usize, value: Value) {
    match &mut record.slots[index] {
        Slot::List(items) => items.push(value),
        Slot::Oneof(group) => {
            record.oneofs[*group] = Some(OneofCase {
                field: index,
                value,
            });
        }
        Slot::Scalar(slot) => *slot = value,
        Slot::Message(_) => {}
    }
}

/// The record an embedded message on the wire should be merged into: the
/// existing sub-record if one is set, a fresh one otherwise. List entries
/// always get a fresh record.
fn message_target<'r>(
    record: &'r mut Record,
    index: usize,
    sub_desc: MessageDescriptor,
) -> Result<&'r mut Record> {
    match &mut record.slots[index] {
        Slot::Message(slot) => Ok(slot.get_or_insert_with(|| Record::new(sub_desc))),
        Slot::List(items) => {
            items.push(Value::Message(Record::new(sub_desc)));
            items
                .last_mut()
                .and_then(Value::as_message_mut)
                .ok_or_else(|| CodecError::invariant_violation("list entry is not a message"))
        }
        Slot::Oneof(group) => {
            let case = &mut record.oneofs[*group];
            let reuse = matches!(
                case,
                Some(OneofCase { field, value: Value::Message(_) }) if *field == index
            );
            if !reuse {
                *case = Some(OneofCase {
                    field: index,
                    value: Value::Message(Record::new(sub_desc)),
                });
            }
            case.as_mut()
                .and_then(|c| c.value.as_message_mut())
                .ok_or_else(|| CodecError::invariant_violation("oneof member is not a message"))
        }
        Slot::Scalar(_) => Err(CodecError::invariant_violation(
            "message field stored in a scalar slot",
        )),
    }
}
