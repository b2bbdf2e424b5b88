// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Lazily built, process-wide descriptor pools.
//!
//! Schema families known at compile time are declared as a `static`
//! [`LazyPool`]. The first caller builds the pool; concurrent first callers
//! block until that single build finishes and then share its result. Once
//! built, a pool is never torn down or rebuilt.

use std::fmt;
use std::sync::OnceLock;

use super::error::Result;
use crate::schema::{DescriptorPool, MessageDescriptor};

/// A descriptor pool that is built on first use.
///
/// ```
/// use protocodec::core::LazyPool;
/// use protocodec::schema::builder::{FieldType, FileBuilder, MessageBuilder};
/// use protocodec::schema::DescriptorPool;
///
/// static PING: LazyPool = LazyPool::new("ping", || {
///     let file = FileBuilder::new("ping.proto", "ping")
///         .message(MessageBuilder::new("Ping").field("id", 1, FieldType::Uint64))
///         .build();
///     DescriptorPool::builder().add_file(file).build()
/// });
///
/// let desc = PING.message("ping.Ping").unwrap();
/// assert_eq!(desc.field_count(), 1);
/// ```
pub struct LazyPool {
    family: &'static str,
    init: fn() -> Result<DescriptorPool>,
    cell: OnceLock<Result<DescriptorPool>>,
}

impl LazyPool {
    /// Declare a lazily built pool.
    ///
    /// # Arguments
    ///
    /// * `family` - Name used in log events
    /// * `init` - Builds the pool; runs at most once per process
    pub const fn new(family: &'static str, init: fn() -> Result<DescriptorPool>) -> Self {
        Self {
            family,
            init,
            cell: OnceLock::new(),
        }
    }

    /// Get the pool, building it if this is the first call.
    ///
    /// A failed build is cached as well: every caller sees the same error.
    pub fn get(&self) -> Result<DescriptorPool> {
        self.cell
            .get_or_init(|| {
                let result = (self.init)();
                match &result {
                    Ok(pool) => tracing::debug!(
                        family = self.family,
                        messages = pool.message_count(),
                        "initialised schema family"
                    ),
                    Err(e) => tracing::warn!(
                        family = self.family,
                        error = %e,
                        "failed to initialise schema family"
                    ),
                }
                result
            })
            .clone()
    }

    /// Look up a message in the pool, building it if needed.
    pub fn message(&self, full_name: &str) -> Result<MessageDescriptor> {
        self.get()?.require_message(full_name)
    }

    /// Whether the first build has completed.
    pub fn is_built(&self) -> bool {
        self.cell.get().is_some()
    }

    pub fn family(&self) -> &'static str {
        self.family
    }
}

impl fmt::Debug for LazyPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyPool")
            .field("family", &self.family)
            .field("built", &self.is_built())
            .finish()
    }
}
