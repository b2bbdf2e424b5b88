// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # Protocodec CLI
//!
//! Command-line tool for inspecting schemas and protobuf payloads.
//!
//! ## Usage
//!
//! ```sh
//! # List the builtin message types
//! protocodec schema list
//!
//! # Show the fields of one type from a descriptor set
//! protocodec schema show my.pkg.Msg --descriptor-set types.pb
//!
//! # Decode a payload
//! protocodec decode cosmos.upgrade.v1beta1.Plan --hex 0a027632
//!
//! # Check that a payload re-encodes byte for byte
//! protocodec roundtrip cosmos.upgrade.v1beta1.Plan --file plan.bin
//! ```

mod cmd;
mod common;

use std::process;

use clap::{Parser, Subcommand};
use cmd::{DecodeCmd, RoundtripCmd, SchemaCmd};
use common::Result;

/// Protocodec - schema-driven protobuf toolkit
///
/// Decode, inspect and re-encode protobuf payloads using the builtin
/// catalogue or a compiled FileDescriptorSet.
#[derive(Parser, Clone)]
#[command(name = "protocodec")]
#[command(about = "Schema-driven protobuf codec toolkit", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "ArcheBase")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Clone)]
enum Commands {
    /// Schema operations (list, show)
    #[command(subcommand)]
    Schema(SchemaCmd),

    /// Decode a payload and print its populated fields
    Decode(DecodeCmd),

    /// Decode then re-encode a payload and compare the bytes
    Roundtrip(RoundtripCmd),
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Schema(cmd) => cmd.run(),
        Commands::Decode(cmd) => cmd.run(),
        Commands::Roundtrip(cmd) => cmd.run(),
    }
}

fn main() {
    let result = run();

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
