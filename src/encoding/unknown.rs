// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Preserved bytes of unrecognised fields.

use std::fmt;

use crate::core::Result;
use crate::encoding::wire::{read_tag, skip_field, WireType};

/// Append-only log of fields a decoder did not recognise.
///
/// Each entry is stored exactly as it appeared on the wire, tag included,
/// and is written back verbatim after the known fields when the record is
/// encoded again.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct UnknownFields(Vec<u8>);

/// One entry of an [`UnknownFields`] log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownField<'a> {
    pub number: u32,
    pub wire_type: WireType,
    /// The whole entry: tag followed by payload
    pub raw: &'a [u8],
}

impl UnknownFields {
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Total size in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Append one raw entry (tag and payload).
    pub(crate) fn push_raw(&mut self, raw: &[u8]) {
        self.0.extend_from_slice(raw);
    }

    /// Split the log into entries.
    pub fn iter(&self) -> UnknownFieldsIter<'_> {
        UnknownFieldsIter {
            buf: &self.0,
            pos: 0,
        }
    }
}

impl fmt::Debug for UnknownFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UnknownFields({})", hex::encode(&self.0))
    }
}

impl<'a> IntoIterator for &'a UnknownFields {
    type Item = Result<UnknownField<'a>>;
    type IntoIter = UnknownFieldsIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over [`UnknownFields`] entries.
///
/// The log only ever holds entries the decoder already framed, so errors
/// surface only for logs assembled by hand.
pub struct UnknownFieldsIter<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Iterator for UnknownFieldsIter<'a> {
    type Item = Result<UnknownField<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.buf.len() {
            return None;
        }
        let start = self.pos;
        let entry = read_tag(self.buf, start).and_then(|(number, wire_type, payload)| {
            let end = skip_field(self.buf, payload, number, wire_type)?;
            Ok((number, wire_type, end))
        });
        match entry {
            Ok((number, wire_type, end)) => {
                self.pos = end;
                Some(Ok(UnknownField {
                    number,
                    wire_type,
                    raw: &self.buf[start..end],
                }))
            }
            Err(e) => {
                self.pos = self.buf.len();
                Some(Err(e))
            }
        }
    }
}
