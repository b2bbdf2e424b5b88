// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! CLI subcommands.

mod decode;
mod roundtrip;
mod schema;

pub use decode::DecodeCmd;
pub use roundtrip::RoundtripCmd;
pub use schema::SchemaCmd;
