// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Roundtrip command - decode, re-encode and compare.

use clap::Args;
use serde::Serialize;

use crate::common::{decode_failure, output_json_or, PayloadArgs, Result, SchemaSource};
use protocodec::{MessageCodec, ProtoCodec};

/// Decode then re-encode a payload.
#[derive(Args, Clone, Debug)]
pub struct RoundtripCmd {
    /// Fully qualified message type
    #[arg(value_name = "TYPE")]
    type_name: String,

    #[command(flatten)]
    payload: PayloadArgs,

    #[command(flatten)]
    source: SchemaSource,

    /// Output as JSON
    #[arg(short, long)]
    json: bool,
}

impl RoundtripCmd {
    pub fn run(self) -> Result<()> {
        let pool = self.source.load()?;
        let desc = pool.require_message(&self.type_name)?;
        let input = self.payload.read()?;

        let codec = ProtoCodec::new();
        let record = codec.decode(&input, &desc).map_err(decode_failure)?;
        let output = codec.encode(&record)?;

        let report = RoundtripReport {
            message_type: desc.full_name().to_string(),
            input: hex::encode(&input),
            output: hex::encode(&output),
            identical: input == output,
        };

        output_json_or(self.json, &report, || {
            println!("input:     {}", report.input);
            println!("output:    {}", report.output);
            println!(
                "identical: {}",
                if report.identical { "yes" } else { "no" }
            );
            Ok(())
        })
    }
}

#[derive(Serialize)]
struct RoundtripReport {
    message_type: String,
    input: String,
    output: String,
    identical: bool,
}
