// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Schema descriptors.
//!
//! This module provides:
//! - [`DescriptorPool`] - resolved catalogue built from `FileDescriptorProto`s
//! - [`MessageDescriptor`], [`FieldDescriptor`], [`OneofDescriptor`],
//!   [`EnumDescriptor`] - immutable handles into a pool
//! - [`builder`] - programmatic schema construction
//! - [`builtin`] - the lazily built catalogue of well-known and Cosmos types

pub mod builder;
pub mod builtin;
pub mod descriptor;
pub mod pool;

pub use builtin::builtin_pool;
pub use descriptor::{
    Cardinality, EnumDescriptor, FieldDescriptor, Kind, MessageDescriptor, OneofDescriptor,
};
pub use pool::{DescriptorPool, PoolBuilder};
