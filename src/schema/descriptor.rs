// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Immutable message, field, oneof and enum descriptors.
//!
//! Descriptors are cheap handles into a shared [`DescriptorPool`]: cloning one
//! bumps a reference count, and two handles compare equal when they point at
//! the same definition in the same pool. The pool itself is built once (see
//! [`crate::schema::pool`]) and never mutated afterwards, so descriptors can
//! be read from any thread without locking.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::encoding::wire::WireType;
use crate::schema::pool::DescriptorPool;

// =============================================================================
// Pool-internal definitions
// =============================================================================

/// Resolved field type stored inside the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KindRef {
    Bool,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Enum(usize),
    String,
    Bytes,
    Message(usize),
}

impl KindRef {
    /// Wire type a singular value of this kind is framed with.
    pub(crate) const fn wire_type(self) -> WireType {
        match self {
            KindRef::String | KindRef::Bytes | KindRef::Message(_) => WireType::LengthDelimited,
            _ => WireType::Varint,
        }
    }

    pub(crate) const fn is_varint(self) -> bool {
        matches!(self.wire_type(), WireType::Varint)
    }
}

#[derive(Debug)]
pub(crate) struct FieldInner {
    pub(crate) name: String,
    pub(crate) full_name: String,
    pub(crate) json_name: String,
    pub(crate) number: u32,
    pub(crate) kind: KindRef,
    pub(crate) cardinality: Cardinality,
    pub(crate) oneof: Option<usize>,
    /// Repeated varint field written as one length-delimited run
    pub(crate) packed: bool,
}

#[derive(Debug)]
pub(crate) struct OneofInner {
    pub(crate) name: String,
    pub(crate) full_name: String,
    pub(crate) fields: Vec<usize>,
    pub(crate) synthetic: bool,
}

#[derive(Debug)]
pub(crate) struct MessageInner {
    pub(crate) name: String,
    pub(crate) full_name: String,
    pub(crate) file: String,
    pub(crate) fields: Vec<FieldInner>,
    pub(crate) by_number: BTreeMap<u32, usize>,
    pub(crate) by_name: HashMap<String, usize>,
    pub(crate) oneofs: Vec<OneofInner>,
    /// Field indices sorted by ascending field number
    pub(crate) encode_order: Vec<usize>,
}

#[derive(Debug)]
pub(crate) struct EnumInner {
    pub(crate) full_name: String,
    pub(crate) values: Vec<(String, i32)>,
}

#[derive(Debug)]
pub(crate) struct ExtensionInner {
    pub(crate) field: FieldInner,
    pub(crate) extendee: usize,
}

// =============================================================================
// Public types
// =============================================================================

/// Whether a field holds one value or a sequence of values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    /// Zero or one value
    Optional,
    /// Zero or more values
    Repeated,
}

/// The value type of a field.
#[derive(Clone, PartialEq, Eq)]
pub enum Kind {
    /// `bool`
    Bool,
    /// `int32`, encoded as a sign-extended varint
    Int32,
    /// `int64`
    Int64,
    /// `uint32`
    Uint32,
    /// `uint64`
    Uint64,
    /// An enum, encoded like `int32`
    Enum(EnumDescriptor),
    /// UTF-8 `string`
    String,
    /// `bytes`
    Bytes,
    /// An embedded message
    Message(MessageDescriptor),
}

impl Kind {
    /// Wire type a singular value of this kind is framed with.
    pub fn wire_type(&self) -> WireType {
        match self {
            Kind::String | Kind::Bytes | Kind::Message(_) => WireType::LengthDelimited,
            _ => WireType::Varint,
        }
    }

    /// Get the message descriptor if this is a message kind.
    pub fn as_message(&self) -> Option<&MessageDescriptor> {
        match self {
            Kind::Message(desc) => Some(desc),
            _ => None,
        }
    }

    /// Get the enum descriptor if this is an enum kind.
    pub fn as_enum(&self) -> Option<&EnumDescriptor> {
        match self {
            Kind::Enum(desc) => Some(desc),
            _ => None,
        }
    }

    /// Schema-level name of this kind.
    pub fn type_name(&self) -> &str {
        match self {
            Kind::Bool => "bool",
            Kind::Int32 => "int32",
            Kind::Int64 => "int64",
            Kind::Uint32 => "uint32",
            Kind::Uint64 => "uint64",
            Kind::Enum(desc) => desc.full_name(),
            Kind::String => "string",
            Kind::Bytes => "bytes",
            Kind::Message(desc) => desc.full_name(),
        }
    }
}

impl fmt::Debug for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Enum(desc) => write!(f, "Enum({})", desc.full_name()),
            Kind::Message(desc) => write!(f, "Message({})", desc.full_name()),
            other => write!(f, "{}", other.type_name()),
        }
    }
}

/// A message type definition.
#[derive(Clone)]
pub struct MessageDescriptor {
    pool: DescriptorPool,
    index: usize,
}

/// A field of a message, or an extension declared against one.
#[derive(Clone)]
pub struct FieldDescriptor {
    pool: DescriptorPool,
    message: usize,
    slot: FieldSlot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldSlot {
    Declared(usize),
    Extension(usize),
}

/// A mutually exclusive group of fields.
#[derive(Clone, PartialEq, Eq)]
pub struct OneofDescriptor {
    message: MessageDescriptor,
    index: usize,
}

/// An enum type definition.
#[derive(Clone)]
pub struct EnumDescriptor {
    pool: DescriptorPool,
    index: usize,
}

// =============================================================================
// MessageDescriptor
// =============================================================================

impl MessageDescriptor {
    pub(crate) fn new(pool: DescriptorPool, index: usize) -> Self {
        Self { pool, index }
    }

    #[inline]
    pub(crate) fn inner(&self) -> &MessageInner {
        &self.pool.inner.messages[self.index]
    }

    /// The pool this descriptor belongs to.
    pub fn pool(&self) -> &DescriptorPool {
        &self.pool
    }

    /// Fully qualified name, e.g. `cosmos.authz.v1beta1.Grant`.
    pub fn full_name(&self) -> &str {
        &self.inner().full_name
    }

    /// Unqualified name, e.g. `Grant`.
    pub fn name(&self) -> &str {
        &self.inner().name
    }

    /// Name of the schema file that declared this message.
    pub fn file_name(&self) -> &str {
        &self.inner().file
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> impl ExactSizeIterator<Item = FieldDescriptor> + '_ {
        (0..self.inner().fields.len()).map(move |i| self.declared_field(i))
    }

    /// Number of declared fields.
    pub fn field_count(&self) -> usize {
        self.inner().fields.len()
    }

    /// Look up a field by number.
    pub fn get_field(&self, number: u32) -> Option<FieldDescriptor> {
        self.inner()
            .by_number
            .get(&number)
            .map(|&i| self.declared_field(i))
    }

    /// Look up a field by its short name or its full name.
    pub fn get_field_by_name(&self, name: &str) -> Option<FieldDescriptor> {
        let inner = self.inner();
        let short = name
            .strip_prefix(inner.full_name.as_str())
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(name);
        inner.by_name.get(short).map(|&i| self.declared_field(i))
    }

    /// Oneof groups in declaration order, including synthetic ones.
    pub fn oneofs(&self) -> impl ExactSizeIterator<Item = OneofDescriptor> + '_ {
        (0..self.inner().oneofs.len()).map(move |index| OneofDescriptor {
            message: self.clone(),
            index,
        })
    }

    /// Look up a oneof group by name.
    pub fn get_oneof_by_name(&self, name: &str) -> Option<OneofDescriptor> {
        self.inner()
            .oneofs
            .iter()
            .position(|o| o.name == name)
            .map(|index| OneofDescriptor {
                message: self.clone(),
                index,
            })
    }

    pub(crate) fn declared_field(&self, index: usize) -> FieldDescriptor {
        FieldDescriptor {
            pool: self.pool.clone(),
            message: self.index,
            slot: FieldSlot::Declared(index),
        }
    }
}

impl PartialEq for MessageDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.pool.ptr_eq(&other.pool)
    }
}

impl Eq for MessageDescriptor {}

impl fmt::Debug for MessageDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageDescriptor")
            .field("full_name", &self.full_name())
            .field("fields", &self.field_count())
            .finish()
    }
}

// =============================================================================
// FieldDescriptor
// =============================================================================

impl FieldDescriptor {
    pub(crate) fn extension(pool: DescriptorPool, extendee: usize, index: usize) -> Self {
        Self {
            pool,
            message: extendee,
            slot: FieldSlot::Extension(index),
        }
    }

    #[inline]
    pub(crate) fn inner(&self) -> &FieldInner {
        match self.slot {
            FieldSlot::Declared(i) => &self.pool.inner.messages[self.message].fields[i],
            FieldSlot::Extension(i) => &self.pool.inner.extensions[i].field,
        }
    }

    /// Index within the containing message's declared fields.
    pub(crate) fn declared_index(&self) -> Option<usize> {
        match self.slot {
            FieldSlot::Declared(i) => Some(i),
            FieldSlot::Extension(_) => None,
        }
    }

    /// Short field name.
    pub fn name(&self) -> &str {
        &self.inner().name
    }

    /// Fully qualified name: the containing message's name plus the field name.
    pub fn full_name(&self) -> &str {
        &self.inner().full_name
    }

    /// lowerCamelCase JSON name.
    pub fn json_name(&self) -> &str {
        &self.inner().json_name
    }

    /// Field number.
    pub fn number(&self) -> u32 {
        self.inner().number
    }

    /// Value type.
    pub fn kind(&self) -> Kind {
        kind_from_ref(&self.pool, self.inner().kind)
    }

    /// Singular or repeated.
    pub fn cardinality(&self) -> Cardinality {
        self.inner().cardinality
    }

    /// Whether the field is repeated.
    pub fn is_list(&self) -> bool {
        self.cardinality() == Cardinality::Repeated
    }

    /// Whether the field is a singular embedded message.
    pub fn is_message(&self) -> bool {
        !self.is_list() && matches!(self.inner().kind, KindRef::Message(_))
    }

    /// Whether set-to-default is distinguishable from unset.
    ///
    /// True for singular message fields and members of a oneof (including
    /// proto3 `optional` fields); false for implicit-presence scalars and lists.
    pub fn supports_presence(&self) -> bool {
        !self.is_list() && (self.is_message() || self.inner().oneof.is_some())
    }

    /// Whether the repeated field is written in packed form.
    ///
    /// Repeated varint fields pack unless declared `[packed = false]`.
    pub fn is_packed(&self) -> bool {
        self.inner().packed
    }

    /// Whether this is an extension rather than a declared field.
    pub fn is_extension(&self) -> bool {
        matches!(self.slot, FieldSlot::Extension(_))
    }

    /// The message this field belongs to (the extendee for extensions).
    pub fn containing_message(&self) -> MessageDescriptor {
        MessageDescriptor::new(self.pool.clone(), self.message)
    }

    /// The oneof group this field is a member of, if any.
    pub fn containing_oneof(&self) -> Option<OneofDescriptor> {
        if self.is_extension() {
            return None;
        }
        self.inner().oneof.map(|index| OneofDescriptor {
            message: self.containing_message(),
            index,
        })
    }
}

impl PartialEq for FieldDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.message == other.message
            && self.slot == other.slot
            && self.pool.ptr_eq(&other.pool)
    }
}

impl Eq for FieldDescriptor {}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("full_name", &self.full_name())
            .field("number", &self.number())
            .field("kind", &self.kind())
            .field("cardinality", &self.cardinality())
            .finish()
    }
}

pub(crate) fn kind_from_ref(pool: &DescriptorPool, kind: KindRef) -> Kind {
    match kind {
        KindRef::Bool => Kind::Bool,
        KindRef::Int32 => Kind::Int32,
        KindRef::Int64 => Kind::Int64,
        KindRef::Uint32 => Kind::Uint32,
        KindRef::Uint64 => Kind::Uint64,
        KindRef::Enum(index) => Kind::Enum(EnumDescriptor {
            pool: pool.clone(),
            index,
        }),
        KindRef::String => Kind::String,
        KindRef::Bytes => Kind::Bytes,
        KindRef::Message(index) => Kind::Message(MessageDescriptor::new(pool.clone(), index)),
    }
}

// =============================================================================
// OneofDescriptor
// =============================================================================

impl OneofDescriptor {
    pub(crate) fn inner(&self) -> &OneofInner {
        &self.message.inner().oneofs[self.index]
    }

    pub(crate) fn index(&self) -> usize {
        self.index
    }

    /// Short name of the group.
    pub fn name(&self) -> &str {
        &self.inner().name
    }

    /// Fully qualified name of the group.
    pub fn full_name(&self) -> &str {
        &self.inner().full_name
    }

    /// The message declaring this group.
    pub fn containing_message(&self) -> &MessageDescriptor {
        &self.message
    }

    /// Whether the group was synthesised for a proto3 `optional` field.
    pub fn is_synthetic(&self) -> bool {
        self.inner().synthetic
    }

    /// Member fields in declaration order.
    pub fn fields(&self) -> impl ExactSizeIterator<Item = FieldDescriptor> + '_ {
        self.inner()
            .fields
            .iter()
            .map(move |&i| self.message.declared_field(i))
    }
}

impl fmt::Debug for OneofDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OneofDescriptor")
            .field("full_name", &self.full_name())
            .finish()
    }
}

// =============================================================================
// EnumDescriptor
// =============================================================================

impl EnumDescriptor {
    pub(crate) fn new(pool: DescriptorPool, index: usize) -> Self {
        Self { pool, index }
    }

    fn inner(&self) -> &EnumInner {
        &self.pool.inner.enums[self.index]
    }

    /// Fully qualified name.
    pub fn full_name(&self) -> &str {
        &self.inner().full_name
    }

    /// `(name, number)` pairs in declaration order.
    pub fn values(&self) -> impl ExactSizeIterator<Item = (&str, i32)> + '_ {
        self.inner().values.iter().map(|(n, v)| (n.as_str(), *v))
    }

    /// Look up a value name by number.
    pub fn value_name(&self, number: i32) -> Option<&str> {
        self.inner()
            .values
            .iter()
            .find(|(_, v)| *v == number)
            .map(|(n, _)| n.as_str())
    }
}

impl PartialEq for EnumDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.pool.ptr_eq(&other.pool)
    }
}

impl Eq for EnumDescriptor {}

impl fmt::Debug for EnumDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumDescriptor")
            .field("full_name", &self.full_name())
            .finish()
    }
}

// Keep the handle types usable across threads.
const _: fn() = || {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<MessageDescriptor>();
    assert_send_sync::<FieldDescriptor>();
    assert_send_sync::<EnumDescriptor>();
};
