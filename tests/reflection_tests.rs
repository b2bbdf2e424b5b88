// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Reflective accessor integration tests.

mod common;

use common::{fixture_message, fixture_pool};
use protocodec::schema::builder::{FieldType, FileBuilder, MessageBuilder};
use protocodec::{
    marshal, unmarshal, CodecError, DescriptorPool, MarshalOptions, MutableRef, Record,
    ReflectMessage, UnmarshalOptions, Value, ValueRef,
};

// ============================================================================
// Presence
// ============================================================================

#[test]
fn test_unset_versus_set_but_empty_sub_message() {
    let desc = fixture_message("Sample");
    let leaf = desc.get_field_by_name("leaf").unwrap();

    let record = Record::new(desc.clone());
    assert!(!record.has(&leaf).unwrap());
    let value = record.get(&leaf).unwrap();
    let view = value.as_message().unwrap();
    assert!(!view.is_valid());
    assert_eq!(view.descriptor().full_name(), "fixture.v1.Leaf");
    assert_eq!(view.get_by_name("value").unwrap().as_i32(), Some(0));

    let mut record = Record::new(desc);
    record.message_mut("leaf").unwrap();
    assert!(record.has(&leaf).unwrap());
    let value = record.get(&leaf).unwrap();
    let view = value.as_message().unwrap();
    assert!(view.is_valid());
    assert!(view.record().unwrap().is_empty());
}

#[test]
fn test_has_and_clear_agree_for_every_field() {
    let desc = fixture_message("Sample");
    let mut record = Record::new(desc.clone());
    record.set_by_name("flag", true).unwrap();
    record.set_by_name("text", "x").unwrap();
    record.message_mut("leaf").unwrap();
    record.list_mut("names").unwrap().append(Value::from("n")).unwrap();
    record.set_by_name("choice_text", "c").unwrap();
    record.set_by_name("maybe", 0).unwrap();

    for field in desc.fields() {
        if record.has(&field).unwrap() {
            record.clear(&field).unwrap();
        }
        assert!(!record.has(&field).unwrap(), "{} still set", field.name());
    }
    assert!(record.is_empty());
    let bytes = marshal(&record, &MarshalOptions::default()).unwrap();
    assert!(bytes.is_empty());
}

#[test]
fn test_get_unset_returns_defaults() {
    let record = Record::new(fixture_message("Sample"));
    assert_eq!(record.get_by_name("text").unwrap().as_str(), Some(""));
    assert_eq!(record.get_by_name("blob").unwrap().as_bytes(), Some(&[][..]));
    assert!(matches!(
        record.get_by_name("level").unwrap(),
        ValueRef::EnumNumber(0)
    ));
    assert!(record.get_by_name("counts").unwrap().as_list().unwrap().is_empty());
}

// ============================================================================
// Oneofs
// ============================================================================

#[test]
fn test_setting_one_member_clears_the_others() {
    let desc = fixture_message("Sample");
    let choice = desc.get_oneof_by_name("choice").unwrap();
    let mut record = Record::new(desc);

    record.set_by_name("choice_text", "a").unwrap();
    record
        .mutable_by_name("choice_leaf")
        .unwrap()
        .into_message()
        .unwrap()
        .set_by_name("value", 3)
        .unwrap();

    assert!(!record.has_by_name("choice_text").unwrap());
    assert_eq!(record.which_oneof(&choice).unwrap().unwrap().name(), "choice_leaf");

    record.clear_by_name("choice_text").unwrap();
    assert_eq!(record.which_oneof(&choice).unwrap().unwrap().name(), "choice_leaf");

    record.clear_by_name("choice_leaf").unwrap();
    assert!(record.which_oneof(&choice).unwrap().is_none());
}

#[test]
fn test_oneof_member_default_value_counts_as_set() {
    let desc = fixture_message("Sample");
    let mut record = Record::new(desc.clone());
    record.set_by_name("choice_id", 0u64).unwrap();
    assert!(record.has_by_name("choice_id").unwrap());

    let bytes = marshal(&record, &MarshalOptions::default()).unwrap();
    let back = unmarshal(&desc, &bytes, &UnmarshalOptions::default()).unwrap();
    assert!(back.has_by_name("choice_id").unwrap());
}

// ============================================================================
// Lists
// ============================================================================

#[test]
fn test_list_mutation_through_mutable() {
    let desc = fixture_message("Sample");
    let field = desc.get_field_by_name("counts").unwrap();
    let mut record = Record::new(desc);

    match record.mutable(&field).unwrap() {
        MutableRef::List(mut list) => {
            list.append(Value::I64(5)).unwrap();
            list.append(Value::I64(6)).unwrap();
            list.set(0, Value::I64(4)).unwrap();
            let err = list.set(2, Value::I64(0)).unwrap_err();
            assert_eq!(err, CodecError::index_out_of_range(2, 2));
            let err = list.append(Value::I32(1)).unwrap_err();
            assert!(matches!(err, CodecError::TypeMismatch { .. }));
        }
        MutableRef::Message(_) => panic!("expected a list"),
    }

    let counts = record.get(&field).unwrap();
    let counts: Vec<i64> = counts
        .as_list()
        .unwrap()
        .iter()
        .filter_map(|v| v.as_i64())
        .collect();
    assert_eq!(counts, vec![4, 6]);
}

#[test]
fn test_list_of_messages_edit_in_place() {
    let mut record = Record::new(fixture_message("Sample"));
    {
        let mut leaves = record.list_mut("leaves").unwrap();
        for n in 1..=3 {
            leaves.append_mutable().unwrap().set_by_name("value", n).unwrap();
        }
        leaves.truncate(2).unwrap();
        assert!(leaves.truncate(5).is_err());
    }
    assert_eq!(record.get_by_name("leaves").unwrap().as_list().unwrap().len(), 2);
}

// ============================================================================
// Range
// ============================================================================

#[test]
fn test_range_visits_populated_fields_in_declaration_order() {
    let mut record = Record::new(fixture_message("Sample"));
    record.set_by_name("maybe", 1).unwrap();
    record.set_by_name("u32", 9u32).unwrap();
    record.set_by_name("flag", true).unwrap();
    record.set_by_name("choice_id", 2u64).unwrap();

    let mut seen = Vec::new();
    record.range(|field, _| {
        seen.push(field.name().to_string());
        true
    });
    assert_eq!(seen, vec!["flag", "u32", "choice_id", "maybe"]);

    let mut first = Vec::new();
    record.range(|field, _| {
        first.push(field.number());
        false
    });
    assert_eq!(first, vec![1]);
}

#[test]
fn test_range_over_view() {
    let desc = fixture_message("Sample");
    let bytes = [0x4a, 0x05, 0x08, 0x01, 0x12, 0x01, b'z'];
    let record = unmarshal(&desc, &bytes, &UnmarshalOptions::default()).unwrap();

    let leaf = record.get_by_name("leaf").unwrap();
    let view = leaf.as_message().unwrap();
    let mut fields = Vec::new();
    view.range(|field, value| {
        fields.push(format!("{}={value}", field.name()));
        true
    });
    assert_eq!(fields, vec!["value=1", "label=\"z\""]);
}

// ============================================================================
// Contract Violations
// ============================================================================

#[test]
fn test_field_of_another_message_is_rejected() {
    let leaf_field = fixture_message("Leaf").get_field_by_name("value").unwrap();
    let mut record = Record::new(fixture_message("Sample"));

    let err = record.get(&leaf_field).unwrap_err();
    assert!(matches!(err, CodecError::UnknownField { .. }), "{err}");
    assert!(record.set(&leaf_field, Value::I32(1)).is_err());
}

#[test]
fn test_unknown_field_name() {
    let record = Record::new(fixture_message("Sample"));
    let err = record.get_by_name("nope").unwrap_err();
    assert_eq!(err.to_string(), "Message 'fixture.v1.Sample' has no field 'nope'");
}

#[test]
fn test_mutable_on_scalar_is_rejected() {
    let mut record = Record::new(fixture_message("Sample"));
    let err = record.mutable_by_name("text").unwrap_err();
    assert!(matches!(err, CodecError::NotMutable { .. }), "{err}");
}

#[test]
fn test_extension_field_is_rejected() {
    let file = FileBuilder::new("ext.proto", "ext")
        .message(MessageBuilder::new("Host").field("id", 1, FieldType::Uint64))
        .extension("ext.Host", "note", 100, FieldType::String)
        .build();
    let pool = DescriptorPool::builder().add_file(file).build().unwrap();
    let host = pool.require_message("ext.Host").unwrap();
    let note = pool.get_extension_by_name("ext.note").unwrap();
    assert!(note.is_extension());

    let mut record = Record::new(host);
    let err = record.has(&note).unwrap_err();
    assert!(matches!(err, CodecError::ExtensionsUnsupported { .. }), "{err}");
    assert!(record.set(&note, Value::from("x")).is_err());
}

#[test]
fn test_same_type_from_independent_pool() {
    let a = fixture_pool();
    let b = fixture_pool();
    let field_b = b
        .require_message("fixture.v1.Sample")
        .unwrap()
        .get_field_by_name("text")
        .unwrap();

    let mut record = Record::new(a.require_message("fixture.v1.Sample").unwrap());
    record.set(&field_b, Value::from("shared")).unwrap();
    assert_eq!(record.get(&field_b).unwrap().as_str(), Some("shared"));
}

// ============================================================================
// New Field Values
// ============================================================================

#[test]
fn test_new_field_builds_blank_values() {
    let desc = fixture_message("Sample");
    let record = Record::new(desc.clone());

    let leaf = desc.get_field_by_name("leaf").unwrap();
    match record.new_field(&leaf).unwrap() {
        Value::Message(sub) => {
            assert_eq!(sub.descriptor().full_name(), "fixture.v1.Leaf");
            assert!(sub.is_empty());
        }
        other => panic!("unexpected {other:?}"),
    }

    let names = desc.get_field_by_name("names").unwrap();
    assert_eq!(record.new_field(&names).unwrap(), Value::List(Vec::new()));

    let level = desc.get_field_by_name("level").unwrap();
    assert_eq!(record.new_field(&level).unwrap(), Value::EnumNumber(0));
}

#[test]
fn test_set_new_field_then_populate() {
    let desc = fixture_message("Sample");
    let leaf = desc.get_field_by_name("leaf").unwrap();
    let mut record = Record::new(desc);

    let mut value = record.new_field(&leaf).unwrap();
    value
        .as_message_mut()
        .unwrap()
        .set_by_name("label", "fresh")
        .unwrap();
    record.set(&leaf, value).unwrap();

    let got = record.get(&leaf).unwrap();
    assert_eq!(
        got.as_message().unwrap().get_by_name("label").unwrap().as_str(),
        Some("fresh")
    );
}
