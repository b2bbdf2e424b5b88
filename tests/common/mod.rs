// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for integration tests.

#![allow(dead_code)]

use protocodec::schema::builder::{EnumBuilder, FieldType, FileBuilder, MessageBuilder};
use protocodec::{DescriptorPool, MessageDescriptor};

// ============================================================================
// Fixture Schema
// ============================================================================

/// Package of the fixture schema.
pub const PACKAGE: &str = "fixture.v1";

/// Build a pool exercising every supported field kind:
///
/// ```text
/// enum Level { LEVEL_UNSPECIFIED = 0; LEVEL_LOW = 1; LEVEL_HIGH = 2; }
///
/// message Leaf { int32 value = 1; string label = 2; }
///
/// message Sample {
///   bool flag = 1;  int32 i32 = 2;  int64 i64 = 3;
///   uint32 u32 = 4; uint64 u64 = 5; string text = 6;
///   bytes blob = 7; Level level = 8; Leaf leaf = 9;
///   repeated int64 counts = 10;
///   repeated string names = 11;
///   repeated Leaf leaves = 12;
///   repeated Level levels = 13;
///   oneof choice { string choice_text = 14; Leaf choice_leaf = 15; uint64 choice_id = 16; }
///   optional int32 maybe = 17;
///   Sample child = 18;
///   repeated uint32 samples = 19 [packed = false];
/// }
/// ```
pub fn fixture_pool() -> DescriptorPool {
    let leaf = FieldType::message("fixture.v1.Leaf");
    let level = FieldType::enumeration("fixture.v1.Level");

    let file = FileBuilder::new("fixture/v1/sample.proto", PACKAGE)
        .enumeration(
            EnumBuilder::new("Level")
                .value("LEVEL_UNSPECIFIED", 0)
                .value("LEVEL_LOW", 1)
                .value("LEVEL_HIGH", 2),
        )
        .message(
            MessageBuilder::new("Leaf")
                .field("value", 1, FieldType::Int32)
                .field("label", 2, FieldType::String),
        )
        .message(
            MessageBuilder::new("Sample")
                .field("flag", 1, FieldType::Bool)
                .field("i32", 2, FieldType::Int32)
                .field("i64", 3, FieldType::Int64)
                .field("u32", 4, FieldType::Uint32)
                .field("u64", 5, FieldType::Uint64)
                .field("text", 6, FieldType::String)
                .field("blob", 7, FieldType::Bytes)
                .field("level", 8, level.clone())
                .field("leaf", 9, leaf.clone())
                .repeated("counts", 10, FieldType::Int64)
                .repeated("names", 11, FieldType::String)
                .repeated("leaves", 12, leaf.clone())
                .repeated("levels", 13, level)
                .oneof("choice", |o| {
                    o.field("choice_text", 14, FieldType::String)
                        .field("choice_leaf", 15, leaf)
                        .field("choice_id", 16, FieldType::Uint64)
                })
                .optional("maybe", 17, FieldType::Int32)
                .field("child", 18, FieldType::message("fixture.v1.Sample"))
                .unpacked("samples", 19, FieldType::Uint32),
        )
        .build();

    DescriptorPool::builder()
        .add_file(file)
        .build()
        .expect("fixture schema builds")
}

/// Look up a fixture message type.
pub fn fixture_message(name: &str) -> MessageDescriptor {
    fixture_pool()
        .require_message(&format!("{PACKAGE}.{name}"))
        .expect("fixture message exists")
}

/// Decode a hex fixture, ignoring whitespace.
pub fn hex_bytes(text: &str) -> Vec<u8> {
    let digits: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    hex::decode(digits).expect("valid hex fixture")
}
