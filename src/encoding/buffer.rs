// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Tail-to-head output buffer.
//!
//! The encoder fills a pre-sized buffer from the end towards the start. A
//! length-delimited payload is therefore complete before its length prefix
//! is written, and the prefix is simply the distance the cursor moved.

use crate::core::{CodecError, Result};
use crate::encoding::wire::{compose_tag, encode_varint, varint_size, WireType};

/// Writer that prepends into a fixed-size buffer.
#[derive(Debug)]
pub struct TailWriter<'a> {
    buf: &'a mut [u8],
    /// Start of the written region; everything in `buf[pos..]` is output.
    pos: usize,
}

impl<'a> TailWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        let pos = buf.len();
        Self { buf, pos }
    }

    /// Current cursor. Decreases as data is written.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes still free in front of the cursor.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.pos
    }

    #[inline]
    fn reserve(&self, needed: usize) -> Result<()> {
        if needed > self.pos {
            return Err(CodecError::invariant_violation(format!(
                "encoded output exceeds computed size: {needed} byte(s) needed, {} left",
                self.pos
            )));
        }
        Ok(())
    }

    pub fn put_varint(&mut self, value: u64) -> Result<()> {
        self.reserve(varint_size(value))?;
        self.pos = encode_varint(self.buf, self.pos, value);
        Ok(())
    }

    pub fn put_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.reserve(data.len())?;
        let start = self.pos - data.len();
        self.buf[start..self.pos].copy_from_slice(data);
        self.pos = start;
        Ok(())
    }

    pub fn put_tag(&mut self, field_number: u32, wire_type: WireType) -> Result<()> {
        self.put_varint(compose_tag(field_number, wire_type))
    }

    /// Prefix the bytes written since `end` with their length.
    pub fn put_length_since(&mut self, end: usize) -> Result<()> {
        let length = end - self.pos;
        self.put_varint(length as u64)
    }

    /// Check that the buffer was filled exactly.
    pub fn finish(self) -> Result<()> {
        if self.pos != 0 {
            return Err(CodecError::invariant_violation(format!(
                "encoded output is {} byte(s) shorter than computed size",
                self.pos
            )));
        }
        Ok(())
    }
}
