// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Encoder and decoder options.
//!
//! Options can be built in code or loaded from TOML:
//!
//! ```toml
//! [marshal]
//! deterministic = false
//!
//! [unmarshal]
//! discard_unknown = true
//! recursion_limit = 64
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{CodecError, Result};

/// Default nesting depth accepted by the decoder.
pub const DEFAULT_RECURSION_LIMIT: u32 = 100;

/// Options for [`marshal`](crate::encoding::marshal).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarshalOptions {
    /// Request a canonical byte order. Output is already canonical because
    /// no supported field kind has unordered entries, so this changes nothing.
    pub deterministic: bool,
}

/// Options for [`unmarshal`](crate::encoding::unmarshal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UnmarshalOptions {
    /// Drop unrecognised fields instead of preserving them.
    pub discard_unknown: bool,
    /// Maximum embedded message depth.
    pub recursion_limit: u32,
}

impl Default for UnmarshalOptions {
    fn default() -> Self {
        Self {
            discard_unknown: false,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }
}

impl UnmarshalOptions {
    pub fn discard_unknown(mut self, discard: bool) -> Self {
        self.discard_unknown = discard;
        self
    }

    pub fn recursion_limit(mut self, limit: u32) -> Self {
        self.recursion_limit = limit;
        self
    }
}

/// Combined codec configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodecOptions {
    pub marshal: MarshalOptions,
    pub unmarshal: UnmarshalOptions,
}

impl CodecOptions {
    /// Parse options from a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| CodecError::parse("codec options", e.to_string()))
    }

    /// Read and parse a TOML options file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            CodecError::parse(
                "codec options",
                format!("failed to read {}: {e}", path.display()),
            )
        })?;
        Self::from_toml_str(&text)
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| CodecError::parse("codec options", e.to_string()))
    }
}
