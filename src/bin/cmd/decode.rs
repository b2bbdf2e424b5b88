// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Decode command - print the populated fields of a payload.

use std::path::PathBuf;

use clap::Args;

use crate::common::{
    decode_failure, load_options, render_fields, to_json, PayloadArgs, Result, SchemaSource,
};
use protocodec::{MessageCodec, ProtoCodec};

/// Decode a payload against a message type.
#[derive(Args, Clone, Debug)]
pub struct DecodeCmd {
    /// Fully qualified message type
    #[arg(value_name = "TYPE")]
    type_name: String,

    #[command(flatten)]
    payload: PayloadArgs,

    #[command(flatten)]
    source: SchemaSource,

    /// Drop fields the schema does not declare
    #[arg(long)]
    discard_unknown: bool,

    /// TOML file with codec options
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(short, long)]
    json: bool,
}

impl DecodeCmd {
    pub fn run(self) -> Result<()> {
        let pool = self.source.load()?;
        let desc = pool.require_message(&self.type_name)?;
        let bytes = self.payload.read()?;

        let mut options = load_options(self.config.as_deref())?;
        if self.discard_unknown {
            options.unmarshal.discard_unknown = true;
        }
        let codec = ProtoCodec::with_options(options);
        let record = codec.decode(&bytes, &desc).map_err(decode_failure)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&to_json(&record))?);
            return Ok(());
        }

        println!("{} ({} bytes)", desc.full_name(), bytes.len());
        let mut out = String::new();
        render_fields(&record, 1, &mut out)?;
        if out.is_empty() {
            println!("  (no populated fields)");
        } else {
            print!("{out}");
        }
        if !record.unknown_fields().is_empty() {
            println!(
                "{} byte(s) of unknown fields preserved",
                record.unknown_fields().len()
            );
        }
        Ok(())
    }
}
