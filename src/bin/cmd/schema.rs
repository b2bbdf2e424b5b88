// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Schema command - list and show message types.

use clap::Subcommand;
use serde::Serialize;

use crate::common::{output_json_or, Result, SchemaSource};
use protocodec::{Cardinality, FieldDescriptor, MessageDescriptor};

/// Schema operations.
#[derive(Subcommand, Clone, Debug)]
pub enum SchemaCmd {
    /// List all message types in the pool
    List {
        #[command(flatten)]
        source: SchemaSource,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the fields of a message type
    Show {
        /// Fully qualified message type
        #[arg(value_name = "TYPE")]
        type_name: String,

        #[command(flatten)]
        source: SchemaSource,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

impl SchemaCmd {
    pub fn run(self) -> Result<()> {
        match self {
            SchemaCmd::List { source, json } => cmd_list(&source, json),
            SchemaCmd::Show {
                type_name,
                source,
                json,
            } => cmd_show(&source, &type_name, json),
        }
    }
}

fn cmd_list(source: &SchemaSource, json: bool) -> Result<()> {
    let pool = source.load()?;

    let mut items: Vec<TypeItem> = pool
        .messages()
        .map(|desc| TypeItem {
            message_type: desc.full_name().to_string(),
            file: desc.file_name().to_string(),
            fields: desc.field_count(),
        })
        .collect();
    items.sort_by(|a, b| a.message_type.cmp(&b.message_type));

    output_json_or(json, &items, || {
        println!("=== Message Types ({}) ===", items.len());
        println!();
        for item in &items {
            println!("{:<60} {:>3} field(s)  {}", item.message_type, item.fields, item.file);
        }
        Ok(())
    })
}

fn cmd_show(source: &SchemaSource, type_name: &str, json: bool) -> Result<()> {
    let pool = source.load()?;
    let desc = pool.require_message(type_name)?;
    let detail = describe(&desc);

    output_json_or(json, &detail, || {
        println!("message {} {{", detail.message_type);
        for field in &detail.fields {
            let label = if field.repeated {
                "repeated "
            } else if field.optional {
                "optional "
            } else {
                ""
            };
            let oneof = field
                .oneof
                .as_deref()
                .map(|o| format!("  // oneof {o}"))
                .unwrap_or_default();
            println!(
                "  {label}{} {} = {};{oneof}",
                field.type_name, field.name, field.number
            );
        }
        println!("}}");
        println!();
        println!("Defined in {}", detail.file);
        Ok(())
    })
}

fn describe(desc: &MessageDescriptor) -> TypeDetail {
    TypeDetail {
        message_type: desc.full_name().to_string(),
        file: desc.file_name().to_string(),
        fields: desc.fields().map(|f| field_item(&f)).collect(),
    }
}

fn field_item(field: &FieldDescriptor) -> FieldItem {
    let oneof = field.containing_oneof();
    FieldItem {
        number: field.number(),
        name: field.name().to_string(),
        type_name: field.kind().type_name().to_string(),
        repeated: field.cardinality() == Cardinality::Repeated,
        optional: oneof.as_ref().is_some_and(|o| o.is_synthetic()),
        oneof: oneof
            .filter(|o| !o.is_synthetic())
            .map(|o| o.name().to_string()),
    }
}

// Output types

#[derive(Serialize)]
struct TypeItem {
    message_type: String,
    file: String,
    fields: usize,
}

#[derive(Serialize)]
struct TypeDetail {
    message_type: String,
    file: String,
    fields: Vec<FieldItem>,
}

#[derive(Serialize)]
struct FieldItem {
    number: u32,
    name: String,
    type_name: String,
    repeated: bool,
    optional: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    oneof: Option<String>,
}
