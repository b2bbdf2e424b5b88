// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for CLI commands.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Args;
use serde::Serialize;
use serde_json::{Map as JsonMap, Value as JsonValue};

use protocodec::{
    builtin_pool, CodecError, CodecOptions, DescriptorPool, FieldDescriptor, Kind, ReflectMessage,
    ValueRef,
};

pub use anyhow::Result as CliResult;
pub type Result<T = ()> = CliResult<T>;

/// Where message types are looked up.
#[derive(Args, Clone, Debug, Default)]
pub struct SchemaSource {
    /// Binary FileDescriptorSet to load instead of the builtin catalogue
    #[arg(long, value_name = "FILE")]
    pub descriptor_set: Option<PathBuf>,
}

impl SchemaSource {
    pub fn load(&self) -> Result<DescriptorPool> {
        match &self.descriptor_set {
            Some(path) => {
                let bytes = std::fs::read(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                Ok(DescriptorPool::decode_file_descriptor_set(&bytes)?)
            }
            None => Ok(builtin_pool()?),
        }
    }
}

/// Payload given inline as hex or read from a file.
#[derive(Args, Clone, Debug)]
#[group(required = true, multiple = false)]
pub struct PayloadArgs {
    /// Payload as hex digits (whitespace and a leading 0x are ignored)
    #[arg(long, value_name = "HEX")]
    pub hex: Option<String>,

    /// File holding the raw payload
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
}

impl PayloadArgs {
    pub fn read(&self) -> Result<Vec<u8>> {
        match (&self.hex, &self.file) {
            (Some(text), _) => parse_hex(text),
            (None, Some(path)) => {
                std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))
            }
            (None, None) => Err(anyhow::anyhow!("either --hex or --file is required")),
        }
    }
}

/// Parse a hex payload.
pub fn parse_hex(text: &str) -> Result<Vec<u8>> {
    let digits: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let digits = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
        .unwrap_or(&digits);
    hex::decode(digits).map_err(|e| anyhow::anyhow!("Invalid hex payload: {e}"))
}

/// Load codec options, falling back to defaults.
pub fn load_options(config: Option<&Path>) -> Result<CodecOptions> {
    match config {
        Some(path) => Ok(CodecOptions::from_path(path)?),
        None => Ok(CodecOptions::default()),
    }
}

/// Turn a decode failure into a CLI error that carries its structured fields.
pub fn decode_failure(err: CodecError) -> anyhow::Error {
    let details: Vec<String> = err
        .log_fields()
        .into_iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect();
    if details.is_empty() {
        anyhow::Error::new(err)
    } else {
        anyhow::anyhow!("{err} ({})", details.join(", "))
    }
}

pub fn output_json_or<T>(
    json: bool,
    value: &T,
    human_fn: impl FnOnce() -> std::io::Result<()>,
) -> Result<()>
where
    T: Serialize,
{
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        human_fn()?;
    }
    Ok(())
}

// =============================================================================
// Message rendering
// =============================================================================

/// Render the populated fields of `msg`, one per line, nested messages
/// indented. Unknown fields follow as `#number (wire type): hex`.
pub fn render_fields<M: ReflectMessage>(msg: &M, depth: usize, out: &mut String) -> Result<()> {
    let pad = "  ".repeat(depth);
    let mut failure = None;

    msg.range(|field, value| {
        let rendered = match &value {
            ValueRef::List(list) => list
                .iter()
                .try_for_each(|item| render_one(field, &item, depth, out)),
            single => render_one(field, single, depth, out),
        };
        match rendered {
            Ok(()) => true,
            Err(e) => {
                failure = Some(e);
                false
            }
        }
    });
    if let Some(e) = failure {
        return Err(e);
    }

    for entry in msg.unknown_fields() {
        let entry = entry?;
        out.push_str(&format!(
            "{pad}#{} ({}): {}\n",
            entry.number,
            entry.wire_type,
            hex::encode(entry.raw)
        ));
    }
    Ok(())
}

fn render_one(field: &FieldDescriptor, value: &ValueRef<'_>, depth: usize, out: &mut String) -> Result<()> {
    let pad = "  ".repeat(depth);
    match value {
        ValueRef::Message(view) => {
            out.push_str(&format!("{pad}{} {{\n", field.name()));
            render_fields(view, depth + 1, out)?;
            out.push_str(&format!("{pad}}}\n"));
        }
        ValueRef::EnumNumber(number) => {
            let label = match field.kind() {
                Kind::Enum(desc) => desc.value_name(*number).map(str::to_string),
                _ => None,
            };
            match label {
                Some(label) => out.push_str(&format!("{pad}{}: {label} ({number})\n", field.name())),
                None => out.push_str(&format!("{pad}{}: {number}\n", field.name())),
            }
        }
        other => out.push_str(&format!("{pad}{}: {other}\n", field.name())),
    }
    Ok(())
}

/// Populated fields of `msg` as a JSON object keyed by field name.
pub fn to_json<M: ReflectMessage>(msg: &M) -> JsonValue {
    let mut object = JsonMap::new();
    msg.range(|field, value| {
        object.insert(field.name().to_string(), value_to_json(field, &value));
        true
    });
    JsonValue::Object(object)
}

fn value_to_json(field: &FieldDescriptor, value: &ValueRef<'_>) -> JsonValue {
    match value {
        ValueRef::Bool(v) => JsonValue::from(*v),
        ValueRef::I32(v) => JsonValue::from(*v),
        ValueRef::I64(v) => JsonValue::from(*v),
        ValueRef::U32(v) => JsonValue::from(*v),
        ValueRef::U64(v) => JsonValue::from(*v),
        ValueRef::EnumNumber(v) => match field.kind() {
            Kind::Enum(desc) => desc
                .value_name(*v)
                .map_or_else(|| JsonValue::from(*v), JsonValue::from),
            _ => JsonValue::from(*v),
        },
        ValueRef::String(v) => JsonValue::from(*v),
        ValueRef::Bytes(v) => JsonValue::from(hex::encode(v)),
        ValueRef::Message(view) => to_json(view),
        ValueRef::List(list) => list.iter().map(|item| value_to_json(field, &item)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("0a 02").unwrap(), vec![0x0a, 0x02]);
        assert_eq!(parse_hex("0x0A02").unwrap(), vec![0x0a, 0x02]);
        assert!(parse_hex("0g").is_err());
        assert!(parse_hex("abc").is_err());
    }

    #[test]
    fn test_decode_failure_includes_position() {
        let err = decode_failure(CodecError::unexpected_eof(7, 3));
        let text = err.to_string();
        assert!(text.contains("position=7"));
        assert!(text.contains("needed=3"));
    }

    #[test]
    fn test_render_nested_and_enum_free_message() {
        let pool = builtin_pool().unwrap();
        let desc = pool.require_message("cosmos.upgrade.v1beta1.Plan").unwrap();
        let mut plan = protocodec::Record::new(desc);
        plan.set_by_name("name", "v2").unwrap();
        plan.message_mut("time").unwrap().set_by_name("seconds", 5i64).unwrap();

        let mut out = String::new();
        render_fields(&plan, 0, &mut out).unwrap();
        assert_eq!(out, "name: \"v2\"\ntime {\n  seconds: 5\n}\n");

        let json = to_json(&plan);
        assert_eq!(json["name"], "v2");
        assert_eq!(json["time"]["seconds"], 5);
    }
}
