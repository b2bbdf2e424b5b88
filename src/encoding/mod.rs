// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Protobuf wire encoding and decoding.
//!
//! This module provides:
//! - [`wire`] - varint, tag and skip primitives
//! - [`size`], [`marshal`], [`unmarshal`], [`unmarshal_merge`] - the codec
//! - [`ProtoCodec`] - options-carrying façade implementing [`MessageCodec`]
//! - [`options`] - encoder/decoder options with TOML loading
//!
//! ## Example
//!
//! ```
//! use protocodec::encoding::{marshal, unmarshal, MarshalOptions, UnmarshalOptions};
//! use protocodec::reflect::{ReflectMessage, Record};
//! use protocodec::schema::builtin_pool;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let desc = builtin_pool()?.require_message("cosmos.authz.v1beta1.GenericAuthorization")?;
//! let mut record = Record::new(desc.clone());
//! record.set_by_name("msg", "/cosmos.bank.v1beta1.MsgSend")?;
//!
//! let bytes = marshal(&record, &MarshalOptions::default())?;
//! assert_eq!(&bytes[..2], &[0x0a, 0x1c]);
//!
//! let back = unmarshal(&desc, &bytes, &UnmarshalOptions::default())?;
//! assert_eq!(back.get_by_name("msg")?.as_str(), Some("/cosmos.bank.v1beta1.MsgSend"));
//! # Ok(())
//! # }
//! ```

pub mod buffer;
pub mod decoder;
pub mod encoder;
pub mod options;
pub mod size;
pub mod unknown;
pub mod wire;

use std::sync::Once;

pub use options::{CodecOptions, MarshalOptions, UnmarshalOptions, DEFAULT_RECURSION_LIMIT};
pub use size::size;
pub use unknown::{UnknownField, UnknownFields};
pub use wire::WireType;

use crate::core::Result;
use crate::reflect::Record;
use crate::schema::MessageDescriptor;

static DETERMINISTIC_NOTICE: Once = Once::new();

/// Encode `record` to protobuf bytes.
///
/// Fields are written in ascending number order followed by any preserved
/// unknown fields. The output length always equals [`size`].
///
/// # Errors
///
/// `InvariantViolation` if the encoded length disagrees with [`size`].
pub fn marshal(record: &Record, opts: &MarshalOptions) -> Result<Vec<u8>> {
    if opts.deterministic {
        DETERMINISTIC_NOTICE.call_once(|| {
            tracing::warn!(
                context = "marshal",
                "deterministic output requested; encoding is already canonical without map fields"
            );
        });
    }
    encoder::encode(record)
}

/// Decode `bytes` as a message of type `desc`.
///
/// Never returns a partially decoded record: any error discards everything
/// decoded so far.
pub fn unmarshal(desc: &MessageDescriptor, bytes: &[u8], opts: &UnmarshalOptions) -> Result<Record> {
    decoder::decode(desc, bytes, opts)
}

/// Decode `bytes` into an existing record.
///
/// Repeated fields append, singular fields overwrite and embedded messages
/// merge. On error `record` is left as it was.
pub fn unmarshal_merge(record: &mut Record, bytes: &[u8], opts: &UnmarshalOptions) -> Result<()> {
    decoder::merge(record, bytes, opts)
}

// =============================================================================
// Codec façade
// =============================================================================

/// Encode/decode interface over one message representation.
///
/// # Type Parameters
///
/// * `S` - What identifies the message type when decoding
pub trait MessageCodec<S: ?Sized>: Send + Sync {
    /// Decoded representation.
    type Message;

    /// Decode raw bytes.
    fn decode(&self, data: &[u8], schema: &S) -> Result<Self::Message>;

    /// Encode a message back to raw bytes.
    fn encode(&self, message: &Self::Message) -> Result<Vec<u8>>;
}

/// Protobuf codec carrying its marshal and unmarshal options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProtoCodec {
    options: CodecOptions,
}

impl ProtoCodec {
    /// Create a codec with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a codec with explicit options.
    pub fn with_options(options: CodecOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    /// Encoded size of `record`.
    pub fn size(&self, record: &Record) -> usize {
        size(record)
    }

    /// Decode into an existing record.
    pub fn merge(&self, record: &mut Record, data: &[u8]) -> Result<()> {
        unmarshal_merge(record, data, &self.options.unmarshal)
    }
}

impl MessageCodec<MessageDescriptor> for ProtoCodec {
    type Message = Record;

    fn decode(&self, data: &[u8], schema: &MessageDescriptor) -> Result<Record> {
        unmarshal(schema, data, &self.options.unmarshal)
    }

    fn encode(&self, message: &Record) -> Result<Vec<u8>> {
        marshal(message, &self.options.marshal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::{ReflectMessage, Value};
    use crate::schema::builtin_pool;

    fn grant_queue_item() -> MessageDescriptor {
        builtin_pool()
            .unwrap()
            .require_message("cosmos.authz.v1beta1.GrantQueueItem")
            .unwrap()
    }

    #[test]
    fn test_codec_round_trip() {
        let codec = ProtoCodec::new();
        let desc = grant_queue_item();
        let mut record = Record::new(desc.clone());
        record
            .set_by_name(
                "msg_type_urls",
                Value::List(vec![Value::from("/a.MsgA"), Value::from("/b.MsgB")]),
            )
            .unwrap();

        let bytes = codec.encode(&record).unwrap();
        assert_eq!(bytes.len(), codec.size(&record));
        let decoded = codec.decode(&bytes, &desc).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_codec_honours_discard_unknown() {
        let options = CodecOptions {
            unmarshal: UnmarshalOptions::default().discard_unknown(true),
            ..Default::default()
        };
        let codec = ProtoCodec::with_options(options);
        let decoded = codec.decode(&[0x10, 0x01], &grant_queue_item()).unwrap();
        assert!(decoded.unknown_fields().is_empty());
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_codec_merge_appends() {
        let codec = ProtoCodec::new();
        let desc = grant_queue_item();
        let mut record = codec.decode(&[0x0a, 0x01, b'a'], &desc).unwrap();
        codec.merge(&mut record, &[0x0a, 0x01, b'b']).unwrap();
        assert_eq!(record.get_by_name("msg_type_urls").unwrap().as_list().unwrap().len(), 2);
    }

    #[test]
    fn test_deterministic_output_is_identical() {
        let desc = grant_queue_item();
        let mut record = Record::new(desc);
        record.list_mut("msg_type_urls").unwrap().append(Value::from("/x")).unwrap();

        let plain = marshal(&record, &MarshalOptions::default()).unwrap();
        let deterministic = marshal(
            &record,
            &MarshalOptions {
                deterministic: true,
            },
        )
        .unwrap();
        assert_eq!(plain, deterministic);
    }
}
