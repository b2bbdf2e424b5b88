// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Protobuf wire primitives.
//!
//! Varint encoding and decoding, tag composition, and skipping of values
//! whose field number the schema does not declare. Nothing here knows about
//! descriptors; these functions operate on raw byte slices and cursor
//! positions.

use std::fmt;

use crate::core::{CodecError, Result};

/// Maximum encoded width of a 64-bit varint.
pub const MAX_VARINT_LEN: usize = 10;

/// Smallest legal field number.
pub const MIN_FIELD_NUMBER: u32 = 1;

/// Largest legal field number (2^29 - 1).
pub const MAX_FIELD_NUMBER: u32 = (1 << 29) - 1;

/// Nesting depth at which group skipping gives up.
const MAX_GROUP_DEPTH: usize = 100;

/// 3-bit code describing how a field's payload is framed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WireType {
    /// Base-128 varint (bool, int32, int64, uint32, uint64, enum)
    Varint = 0,
    /// Little-endian 8-byte value
    Fixed64 = 1,
    /// Length-prefixed payload (string, bytes, message, packed repeated)
    LengthDelimited = 2,
    /// Deprecated group start
    StartGroup = 3,
    /// Deprecated group end
    EndGroup = 4,
    /// Little-endian 4-byte value
    Fixed32 = 5,
}

impl WireType {
    /// Convert the low three bits of a tag into a wire type.
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0 => Some(WireType::Varint),
            1 => Some(WireType::Fixed64),
            2 => Some(WireType::LengthDelimited),
            3 => Some(WireType::StartGroup),
            4 => Some(WireType::EndGroup),
            5 => Some(WireType::Fixed32),
            _ => None,
        }
    }

    /// Raw numeric value of this wire type.
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireType::Varint => write!(f, "varint"),
            WireType::Fixed64 => write!(f, "fixed64"),
            WireType::LengthDelimited => write!(f, "length-delimited"),
            WireType::StartGroup => write!(f, "start-group"),
            WireType::EndGroup => write!(f, "end-group"),
            WireType::Fixed32 => write!(f, "fixed32"),
        }
    }
}

/// Number of bytes `value` occupies as a varint.
#[inline]
pub const fn varint_size(value: u64) -> usize {
    // (bits + 6) / 7, with zero still taking one byte.
    let bits = 64 - (value | 1).leading_zeros() as usize;
    (bits + 6) / 7
}

/// Encoded width of a tag for `field_number`.
#[inline]
pub const fn tag_size(field_number: u32) -> usize {
    varint_size((field_number as u64) << 3)
}

/// Write `value` as a varint that ends at `pos`, returning the start offset.
///
/// The codec fills buffers from the tail towards the head, so the varint is
/// placed in `buf[pos - varint_size(value)..pos]`. The caller guarantees the
/// room exists.
#[inline]
pub fn encode_varint(buf: &mut [u8], pos: usize, mut value: u64) -> usize {
    let start = pos - varint_size(value);
    let mut i = start;
    while value >= 0x80 {
        buf[i] = (value as u8 & 0x7F) | 0x80;
        value >>= 7;
        i += 1;
    }
    buf[i] = value as u8;
    start
}

/// Append `value` as a varint to the end of `buf`.
#[inline]
pub fn append_varint(buf: &mut Vec<u8>, mut value: u64) {
    while value >= 0x80 {
        buf.push((value as u8 & 0x7F) | 0x80);
        value >>= 7;
    }
    buf.push(value as u8);
}

/// Read a varint starting at `pos`, returning the value and the next offset.
pub fn decode_varint(buf: &[u8], pos: usize) -> Result<(u64, usize)> {
    let mut result: u64 = 0;
    let mut cursor = pos;

    for shift in (0..64).step_by(7) {
        let Some(&byte) = buf.get(cursor) else {
            return Err(CodecError::unexpected_eof(cursor, 1));
        };
        cursor += 1;

        // The tenth byte may only contribute the top bit.
        if shift == 63 && byte > 0x01 {
            return Err(CodecError::integer_overflow(pos));
        }
        result |= u64::from(byte & 0x7F) << shift;
        if byte & 0x80 == 0 {
            return Ok((result, cursor));
        }
    }

    Err(CodecError::integer_overflow(pos))
}

/// Combine a field number and wire type into a tag.
#[inline]
pub const fn compose_tag(field_number: u32, wire_type: WireType) -> u64 {
    ((field_number as u64) << 3) | wire_type as u64
}

/// Split a tag into field number and wire type.
///
/// Group-end and the reserved wire types 6 and 7 are never valid at the
/// position of a field tag and are rejected with `MalformedWireType`.
pub fn decompose_tag(tag: u64) -> Result<(u64, WireType)> {
    match split_tag(tag, 0)? {
        (_, WireType::EndGroup) => Err(CodecError::malformed_wire_type(4, 0)),
        parts => Ok(parts),
    }
}

/// Split a tag without rejecting group-end, reporting `position` on failure.
pub(crate) fn split_tag(tag: u64, position: usize) -> Result<(u64, WireType)> {
    let bits = (tag & 0x07) as u8;
    let wire_type =
        WireType::from_bits(bits).ok_or_else(|| CodecError::malformed_wire_type(bits, position))?;
    Ok((tag >> 3, wire_type))
}

/// Read a tag at `pos`, validating the field number.
///
/// Returns the field number, wire type and the offset after the tag.
pub fn read_tag(buf: &[u8], pos: usize) -> Result<(u32, WireType, usize)> {
    let (tag, next) = decode_varint(buf, pos)?;
    let (number, wire_type) = split_tag(tag, pos)?;
    if wire_type == WireType::EndGroup {
        return Err(CodecError::malformed_wire_type(4, pos));
    }
    if number < u64::from(MIN_FIELD_NUMBER) || number > u64::from(MAX_FIELD_NUMBER) {
        return Err(CodecError::illegal_tag(number, pos));
    }
    Ok((number as u32, wire_type, next))
}

/// Read a length prefix at `pos` and return the payload bounds.
///
/// The returned range is `[start, end)` inside `buf`.
pub fn read_length_delimited(buf: &[u8], pos: usize) -> Result<(usize, usize)> {
    let (length, start) = decode_varint(buf, pos)?;
    let end = usize::try_from(length)
        .ok()
        .and_then(|len| start.checked_add(len))
        .filter(|end| *end <= isize::MAX as usize)
        .ok_or_else(|| CodecError::invalid_length(length, pos))?;
    if end > buf.len() {
        return Err(CodecError::unexpected_eof(buf.len(), end - buf.len()));
    }
    Ok((start, end))
}

/// Advance past one value of the given wire type starting at `pos`.
///
/// `pos` must point just after the tag of field `number`. Returns the offset
/// following the value. A group must close with an end-group tag carrying
/// the same field number.
pub fn skip_field(buf: &[u8], pos: usize, number: u32, wire_type: WireType) -> Result<usize> {
    skip_value(buf, pos, u64::from(number), wire_type, 0)
}

fn skip_value(
    buf: &[u8],
    pos: usize,
    number: u64,
    wire_type: WireType,
    depth: usize,
) -> Result<usize> {
    match wire_type {
        WireType::Varint => decode_varint(buf, pos).map(|(_, next)| next),
        WireType::Fixed64 => skip_fixed(buf, pos, 8),
        WireType::Fixed32 => skip_fixed(buf, pos, 4),
        WireType::LengthDelimited => read_length_delimited(buf, pos).map(|(_, end)| end),
        WireType::StartGroup => skip_group(buf, pos, number, depth + 1),
        WireType::EndGroup => Err(CodecError::malformed_wire_type(4, pos)),
    }
}

fn skip_fixed(buf: &[u8], pos: usize, width: usize) -> Result<usize> {
    let end = pos + width;
    if end > buf.len() {
        return Err(CodecError::unexpected_eof(buf.len(), end - buf.len()));
    }
    Ok(end)
}

/// Skip the fields of a group up to and including its end-group tag.
fn skip_group(buf: &[u8], mut pos: usize, opened: u64, depth: usize) -> Result<usize> {
    if depth > MAX_GROUP_DEPTH {
        return Err(CodecError::RecursionLimitExceeded {
            limit: MAX_GROUP_DEPTH as u32,
        });
    }
    loop {
        let tag_pos = pos;
        let (tag, next) = decode_varint(buf, pos)?;
        let (number, wire_type) = split_tag(tag, tag_pos)?;
        if number == 0 {
            return Err(CodecError::illegal_tag(number, tag_pos));
        }
        if wire_type == WireType::EndGroup {
            if number != opened {
                return Err(CodecError::malformed_wire_type(4, tag_pos));
            }
            return Ok(next);
        }
        pos = skip_value(buf, next, number, wire_type, depth)?;
    }
}
