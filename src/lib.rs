// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # Protocodec
//!
//! Schema-driven protobuf wire codec with unknown-field preservation and a
//! reflective field accessor.
//!
//! Every message type is handled by one generic engine driven by descriptors:
//! - **Schema** descriptors and the descriptor pool in [`schema`]
//! - **Records** and reflective access in [`reflect`]
//! - **Wire codec** (size, marshal, unmarshal) in [`encoding`]
//! - **Errors** and lazily built pools in [`core`]
//!
//! ## Architecture
//!
//! - `schema/` - `DescriptorPool` built from `FileDescriptorProto`s, plus the
//!   builtin Cosmos authz/upgrade catalogue
//! - `reflect/` - `Record`, `Value`, `MessageView`, list adapters and the
//!   `ReflectMessage` trait
//! - `encoding/` - varint/tag primitives, tail-to-head encoder, decoder with
//!   unknown-field preservation, codec options
//! - `core/` - `CodecError` and `LazyPool`
//!
//! ## Example: Decoding a Cosmos message
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use protocodec::{builtin_pool, unmarshal, ReflectMessage, UnmarshalOptions};
//!
//! let desc = builtin_pool()?.require_message("cosmos.upgrade.v1beta1.Plan")?;
//! let bytes = [0x0a, 0x02, b'v', b'2', 0x18, 0x64];
//! let plan = unmarshal(&desc, &bytes, &UnmarshalOptions::default())?;
//!
//! assert_eq!(plan.get_by_name("name")?.as_str(), Some("v2"));
//! assert_eq!(plan.get_by_name("height")?.as_i64(), Some(100));
//! # Ok(())
//! # }
//! ```

// Core types
pub mod core;

pub use core::{CodecError, LazyPool, Result};

// Wire encoding/decoding
pub mod encoding;

pub use encoding::{
    marshal, size, unmarshal, unmarshal_merge, CodecOptions, MarshalOptions, MessageCodec,
    ProtoCodec, UnknownFields, UnmarshalOptions,
};

// Reflection
pub mod reflect;

pub use reflect::{ListMut, ListView, MessageView, MutableRef, Record, ReflectMessage, Value, ValueRef};

// Schema descriptors
pub mod schema;

pub use schema::{
    builtin_pool, Cardinality, DescriptorPool, EnumDescriptor, FieldDescriptor, Kind,
    MessageDescriptor, OneofDescriptor,
};
