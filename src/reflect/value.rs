// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Owned and borrowed field values.

use std::fmt;

use crate::core::{CodecError, Result};
use crate::reflect::list::ListView;
use crate::reflect::record::Record;
use crate::reflect::view::MessageView;
use crate::reflect::ReflectMessage;
use crate::schema::{FieldDescriptor, Kind};

/// An owned field value.
///
/// Produced by [`Record::new_field`] and consumed by [`Record::set`]. Integer
/// variants carry the field's declared width; enum fields use
/// [`Value::EnumNumber`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    I32(i32),
    I64(i64),
    U32(u32),
    U64(u64),
    EnumNumber(i32),
    String(String),
    Bytes(Vec<u8>),
    Message(Record),
    List(Vec<Value>),
}

impl Value {
    /// Zero value for a singular field of `kind`.
    pub fn default_for(kind: &Kind) -> Value {
        match kind {
            Kind::Bool => Value::Bool(false),
            Kind::Int32 => Value::I32(0),
            Kind::Int64 => Value::I64(0),
            Kind::Uint32 => Value::U32(0),
            Kind::Uint64 => Value::U64(0),
            Kind::Enum(_) => Value::EnumNumber(0),
            Kind::String => Value::String(String::new()),
            Kind::Bytes => Value::Bytes(Vec::new()),
            Kind::Message(desc) => Value::Message(Record::new(desc.clone())),
        }
    }

    /// Name of the value's type, used in error messages.
    pub fn type_name(&self) -> String {
        match self {
            Value::Bool(_) => "bool".to_string(),
            Value::I32(_) => "int32".to_string(),
            Value::I64(_) => "int64".to_string(),
            Value::U32(_) => "uint32".to_string(),
            Value::U64(_) => "uint64".to_string(),
            Value::EnumNumber(_) => "enum".to_string(),
            Value::String(_) => "string".to_string(),
            Value::Bytes(_) => "bytes".to_string(),
            Value::Message(record) => record.descriptor().full_name().to_string(),
            Value::List(_) => "list".to_string(),
        }
    }

    /// Whether the value equals the zero value of its type.
    ///
    /// Messages are never considered default: an empty embedded message is
    /// still present.
    pub fn is_default(&self) -> bool {
        match self {
            Value::Bool(v) => !*v,
            Value::I32(v) | Value::EnumNumber(v) => *v == 0,
            Value::I64(v) => *v == 0,
            Value::U32(v) => *v == 0,
            Value::U64(v) => *v == 0,
            Value::String(v) => v.is_empty(),
            Value::Bytes(v) => v.is_empty(),
            Value::Message(_) => false,
            Value::List(v) => v.is_empty(),
        }
    }

    /// Borrow as a [`ValueRef`].
    pub fn as_ref(&self) -> ValueRef<'_> {
        match self {
            Value::Bool(v) => ValueRef::Bool(*v),
            Value::I32(v) => ValueRef::I32(*v),
            Value::I64(v) => ValueRef::I64(*v),
            Value::U32(v) => ValueRef::U32(*v),
            Value::U64(v) => ValueRef::U64(*v),
            Value::EnumNumber(v) => ValueRef::EnumNumber(*v),
            Value::String(v) => ValueRef::String(v),
            Value::Bytes(v) => ValueRef::Bytes(v),
            Value::Message(record) => ValueRef::Message(MessageView::of(record)),
            Value::List(items) => ValueRef::List(ListView::new(items)),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_message(&self) -> Option<&Record> {
        match self {
            Value::Message(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_message_mut(&mut self) -> Option<&mut Record> {
        match self {
            Value::Message(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::I32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::I64(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::U32(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::U64(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<Record> for Value {
    fn from(v: Record) -> Self {
        Value::Message(v)
    }
}

/// A borrowed, read-only field value returned by `get`.
///
/// Composite variants are views: neither [`MessageView`] nor [`ListView`]
/// offers any way to modify the record they borrow from.
#[derive(Debug, Clone)]
pub enum ValueRef<'a> {
    Bool(bool),
    I32(i32),
    I64(i64),
    U32(u32),
    U64(u64),
    EnumNumber(i32),
    String(&'a str),
    Bytes(&'a [u8]),
    Message(MessageView<'a>),
    List(ListView<'a>),
}

impl<'a> ValueRef<'a> {
    /// Borrowed zero value for a singular field of `kind`.
    pub(crate) fn default_for(kind: Kind) -> ValueRef<'a> {
        match kind {
            Kind::Bool => ValueRef::Bool(false),
            Kind::Int32 => ValueRef::I32(0),
            Kind::Int64 => ValueRef::I64(0),
            Kind::Uint32 => ValueRef::U32(0),
            Kind::Uint64 => ValueRef::U64(0),
            Kind::Enum(_) => ValueRef::EnumNumber(0),
            Kind::String => ValueRef::String(""),
            Kind::Bytes => ValueRef::Bytes(&[]),
            Kind::Message(desc) => ValueRef::Message(MessageView::unset(desc)),
        }
    }

    /// Copy into an owned [`Value`]. An unset message view becomes an empty
    /// record.
    pub fn to_value(&self) -> Value {
        match self {
            ValueRef::Bool(v) => Value::Bool(*v),
            ValueRef::I32(v) => Value::I32(*v),
            ValueRef::I64(v) => Value::I64(*v),
            ValueRef::U32(v) => Value::U32(*v),
            ValueRef::U64(v) => Value::U64(*v),
            ValueRef::EnumNumber(v) => Value::EnumNumber(*v),
            ValueRef::String(v) => Value::String((*v).to_string()),
            ValueRef::Bytes(v) => Value::Bytes(v.to_vec()),
            ValueRef::Message(view) => Value::Message(view.to_record()),
            ValueRef::List(list) => Value::List(list.as_slice().to_vec()),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ValueRef::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            ValueRef::I32(v) | ValueRef::EnumNumber(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ValueRef::I64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match self {
            ValueRef::U32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            ValueRef::U64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            ValueRef::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&'a [u8]> {
        match self {
            ValueRef::Bytes(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_message(&self) -> Option<&MessageView<'a>> {
        match self {
            ValueRef::Message(view) => Some(view),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ListView<'a>> {
        match self {
            ValueRef::List(list) => Some(list),
            _ => None,
        }
    }
}

impl fmt::Display for ValueRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueRef::Bool(v) => write!(f, "{v}"),
            ValueRef::I32(v) | ValueRef::EnumNumber(v) => write!(f, "{v}"),
            ValueRef::I64(v) => write!(f, "{v}"),
            ValueRef::U32(v) => write!(f, "{v}"),
            ValueRef::U64(v) => write!(f, "{v}"),
            ValueRef::String(v) => write!(f, "{v:?}"),
            ValueRef::Bytes(v) => write!(f, "0x{}", hex::encode(v)),
            ValueRef::Message(view) => write!(f, "{}{{..}}", view.descriptor().full_name()),
            ValueRef::List(list) => write!(f, "[{} item(s)]", list.len()),
        }
    }
}

/// Check that `value` is acceptable as a single element of `field`.
pub(crate) fn check_element(field: &FieldDescriptor, value: &Value) -> Result<()> {
    let kind = field.kind();
    let ok = match (&kind, value) {
        (Kind::Bool, Value::Bool(_))
        | (Kind::Int32, Value::I32(_))
        | (Kind::Int64, Value::I64(_))
        | (Kind::Uint32, Value::U32(_))
        | (Kind::Uint64, Value::U64(_))
        | (Kind::Enum(_), Value::EnumNumber(_))
        | (Kind::String, Value::String(_))
        | (Kind::Bytes, Value::Bytes(_)) => true,
        (Kind::Message(desc), Value::Message(record)) => {
            record.descriptor().full_name() == desc.full_name()
        }
        _ => false,
    };
    if ok {
        Ok(())
    } else {
        Err(CodecError::type_mismatch(
            field.full_name(),
            kind.type_name(),
            value.type_name(),
        ))
    }
}

/// Check that `value` is acceptable for `field` as a whole: a list of
/// matching elements for repeated fields, a single matching value otherwise.
pub(crate) fn check_field_value(field: &FieldDescriptor, value: &Value) -> Result<()> {
    if !field.is_list() {
        return check_element(field, value);
    }
    match value {
        Value::List(items) => items.iter().try_for_each(|item| check_element(field, item)),
        other => Err(CodecError::type_mismatch(
            field.full_name(),
            format!("list of {}", field.kind().type_name()),
            other.type_name(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_default() {
        assert!(Value::Bool(false).is_default());
        assert!(!Value::Bool(true).is_default());
        assert!(Value::I32(0).is_default());
        assert!(!Value::I64(-1).is_default());
        assert!(Value::String(String::new()).is_default());
        assert!(!Value::Bytes(vec![0]).is_default());
        assert!(Value::List(vec![]).is_default());
    }

    #[test]
    fn test_conversions() {
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(7u64), Value::U64(7));
        assert_eq!(Value::from("x"), Value::String("x".to_string()));
        assert_eq!(Value::from(vec![1u8, 2]).as_bytes(), Some(&[1u8, 2][..]));
    }

    #[test]
    fn test_as_ref_round_trip() {
        let value = Value::String("granter".to_string());
        let borrowed = value.as_ref();
        assert_eq!(borrowed.as_str(), Some("granter"));
        assert_eq!(borrowed.to_value(), value);
    }

    #[test]
    fn test_display() {
        assert_eq!(ValueRef::U64(5).to_string(), "5");
        assert_eq!(ValueRef::String("a").to_string(), "\"a\"");
        assert_eq!(ValueRef::Bytes(&[0xab, 0x01]).to_string(), "0xab01");
    }

    #[test]
    fn test_display_message_and_list() {
        use crate::schema::builder::{FieldType, FileBuilder, MessageBuilder};
        use crate::schema::DescriptorPool;

        let file = FileBuilder::new("val.proto", "val")
            .message(MessageBuilder::new("Inner").field("n", 1, FieldType::Int32))
            .message(
                MessageBuilder::new("Outer")
                    .field("inner", 1, FieldType::message("val.Inner"))
                    .repeated("ids", 2, FieldType::Uint64),
            )
            .build();
        let pool = DescriptorPool::builder().add_file(file).build().unwrap();
        let mut record = Record::new(pool.require_message("val.Outer").unwrap());
        record
            .set_by_name("ids", Value::List(vec![Value::U64(1), Value::U64(2)]))
            .unwrap();

        assert_eq!(record.get_by_name("inner").unwrap().to_string(), "val.Inner{..}");
        assert_eq!(record.get_by_name("ids").unwrap().to_string(), "[2 item(s)]");
    }
}
