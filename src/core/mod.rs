// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core types used throughout protocodec.
//!
//! - [`CodecError`] - Crate-wide error type
//! - [`LazyPool`] - Process-wide, lazily built descriptor pools

pub mod error;
pub mod registry;

pub use error::{CodecError, Result};
pub use registry::LazyPool;
