// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Descriptor pool construction.
//!
//! A [`DescriptorPool`] is built once from `FileDescriptorProto`s, either
//! decoded from a serialized `FileDescriptorSet` or produced by
//! [`crate::schema::builder`]. Building resolves every cross-file type
//! reference and rejects field kinds the codec cannot carry, so the encode
//! and decode paths never have to handle an unresolved or unsupported field.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use prost::Message as _;
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{DescriptorProto, FieldDescriptorProto, FileDescriptorProto, FileDescriptorSet};

use crate::core::{CodecError, Result};
use crate::encoding::wire::{MAX_FIELD_NUMBER, MIN_FIELD_NUMBER};
use crate::schema::descriptor::{
    Cardinality, EnumDescriptor, EnumInner, ExtensionInner, FieldDescriptor, FieldInner, KindRef,
    MessageDescriptor, MessageInner, OneofInner,
};

/// Shared, immutable catalogue of message, enum and extension descriptors.
///
/// Cloning is cheap; all clones refer to the same definitions.
#[derive(Clone)]
pub struct DescriptorPool {
    pub(crate) inner: Arc<PoolInner>,
}

pub(crate) struct PoolInner {
    pub(crate) messages: Vec<MessageInner>,
    pub(crate) enums: Vec<EnumInner>,
    pub(crate) extensions: Vec<ExtensionInner>,
    names: HashMap<String, TypeRef>,
    extension_names: HashMap<String, usize>,
    files: Vec<FileDescriptorProto>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TypeRef {
    Message(usize),
    Enum(usize),
}

impl DescriptorPool {
    /// Start building a pool.
    pub fn builder() -> PoolBuilder {
        PoolBuilder::default()
    }

    /// Build a pool from a decoded `FileDescriptorSet`.
    pub fn from_file_descriptor_set(set: FileDescriptorSet) -> Result<Self> {
        Self::builder().add_file_descriptor_set(set).build()
    }

    /// Build a pool from the serialized bytes of a `FileDescriptorSet`,
    /// e.g. the output of `protoc --descriptor_set_out`.
    pub fn decode_file_descriptor_set(bytes: &[u8]) -> Result<Self> {
        let set = FileDescriptorSet::decode(bytes)
            .map_err(|e| CodecError::parse("FileDescriptorSet", e.to_string()))?;
        Self::from_file_descriptor_set(set)
    }

    /// Look up a message by its fully qualified name. A leading `.` is accepted.
    pub fn get_message_by_name(&self, name: &str) -> Option<MessageDescriptor> {
        match self.inner.names.get(name.trim_start_matches('.')) {
            Some(TypeRef::Message(index)) => Some(MessageDescriptor::new(self.clone(), *index)),
            _ => None,
        }
    }

    /// Like [`get_message_by_name`](Self::get_message_by_name) but fails with
    /// `TypeNotFound`.
    pub fn require_message(&self, name: &str) -> Result<MessageDescriptor> {
        self.get_message_by_name(name)
            .ok_or_else(|| CodecError::type_not_found(name))
    }

    /// Look up an enum by its fully qualified name.
    pub fn get_enum_by_name(&self, name: &str) -> Option<EnumDescriptor> {
        match self.inner.names.get(name.trim_start_matches('.')) {
            Some(TypeRef::Enum(index)) => Some(EnumDescriptor::new(self.clone(), *index)),
            _ => None,
        }
    }

    /// Look up an extension by its fully qualified name.
    pub fn get_extension_by_name(&self, name: &str) -> Option<FieldDescriptor> {
        self.inner
            .extension_names
            .get(name.trim_start_matches('.'))
            .map(|&i| self.extension(i))
    }

    /// All messages, in file then declaration order (nested types follow
    /// their parent).
    pub fn messages(&self) -> impl ExactSizeIterator<Item = MessageDescriptor> + '_ {
        (0..self.inner.messages.len()).map(move |i| MessageDescriptor::new(self.clone(), i))
    }

    /// All declared extensions.
    pub fn extensions(&self) -> impl ExactSizeIterator<Item = FieldDescriptor> + '_ {
        (0..self.inner.extensions.len()).map(move |i| self.extension(i))
    }

    /// Number of message types.
    pub fn message_count(&self) -> usize {
        self.inner.messages.len()
    }

    /// Names of the files the pool was built from.
    pub fn file_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.inner.files.iter().map(|f| f.name())
    }

    /// The source files as a `FileDescriptorSet`.
    pub fn file_descriptor_set(&self) -> FileDescriptorSet {
        FileDescriptorSet {
            file: self.inner.files.clone(),
        }
    }

    /// The source files as serialized `FileDescriptorSet` bytes.
    pub fn encode_file_descriptor_set(&self) -> Vec<u8> {
        self.file_descriptor_set().encode_to_vec()
    }

    pub(crate) fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn extension(&self, index: usize) -> FieldDescriptor {
        let extendee = self.inner.extensions[index].extendee;
        FieldDescriptor::extension(self.clone(), extendee, index)
    }
}

impl fmt::Debug for DescriptorPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DescriptorPool")
            .field("files", &self.inner.files.len())
            .field("messages", &self.inner.messages.len())
            .field("enums", &self.inner.enums.len())
            .field("extensions", &self.inner.extensions.len())
            .finish()
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Collects schema files and resolves them into a [`DescriptorPool`].
#[derive(Debug, Default, Clone)]
pub struct PoolBuilder {
    files: Vec<FileDescriptorProto>,
}

impl PoolBuilder {
    /// Add one schema file.
    pub fn add_file(mut self, file: FileDescriptorProto) -> Self {
        self.files.push(file);
        self
    }

    /// Add several schema files.
    pub fn add_files(mut self, files: impl IntoIterator<Item = FileDescriptorProto>) -> Self {
        self.files.extend(files);
        self
    }

    /// Add every file of a `FileDescriptorSet`.
    pub fn add_file_descriptor_set(self, set: FileDescriptorSet) -> Self {
        self.add_files(set.file)
    }

    /// Resolve all files into a pool.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSchema` for duplicate type names, duplicate field
    /// numbers or names, out-of-range field numbers, unresolved type
    /// references, files not declared `syntax = "proto3"`, and field kinds
    /// outside the supported set (floating point, fixed-width, zig-zag,
    /// groups, maps, required fields).
    pub fn build(self) -> Result<DescriptorPool> {
        let mut resolver = Resolver::default();
        for file in &self.files {
            resolver.collect_file(file)?;
        }

        let mut messages = Vec::with_capacity(resolver.messages.len());
        for entry in &resolver.messages {
            messages.push(resolver.build_message(entry)?);
        }

        let mut extensions = Vec::new();
        let mut extension_names = HashMap::new();
        for (scope, proto) in &resolver.extensions {
            let ext = resolver.build_extension(scope, proto)?;
            if extension_names
                .insert(ext.field.full_name.clone(), extensions.len())
                .is_some()
            {
                return Err(CodecError::invalid_schema(
                    ext.field.full_name.clone(),
                    "duplicate extension name",
                ));
            }
            extensions.push(ext);
        }

        let enums = resolver
            .enums
            .iter()
            .map(|(full_name, proto)| EnumInner {
                full_name: full_name.clone(),
                values: proto
                    .value
                    .iter()
                    .map(|v| (v.name().to_string(), v.number()))
                    .collect(),
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            files = self.files.len(),
            messages = messages.len(),
            enums = enums.len(),
            extensions = extensions.len(),
            "built descriptor pool"
        );

        Ok(DescriptorPool {
            inner: Arc::new(PoolInner {
                messages,
                enums,
                extensions,
                names: resolver.names,
                extension_names,
                files: self.files,
            }),
        })
    }
}

// =============================================================================
// Resolution
// =============================================================================

struct MessageEntry<'a> {
    full_name: String,
    file: String,
    proto: &'a DescriptorProto,
}

#[derive(Default)]
struct Resolver<'a> {
    messages: Vec<MessageEntry<'a>>,
    enums: Vec<(String, &'a prost_types::EnumDescriptorProto)>,
    extensions: Vec<(String, &'a FieldDescriptorProto)>,
    names: HashMap<String, TypeRef>,
    map_entries: Vec<bool>,
}

impl<'a> Resolver<'a> {
    fn collect_file(&mut self, file: &'a FileDescriptorProto) -> Result<()> {
        // Proto2 and editions use explicit scalar presence. An absent syntax
        // means proto2.
        if file.syntax() != "proto3" {
            let syntax = match file.syntax() {
                "" => "proto2",
                other => other,
            };
            return Err(CodecError::invalid_schema(
                file.name(),
                format!("syntax '{syntax}' is not supported, only proto3"),
            ));
        }
        let scope = file.package().to_string();
        for proto in &file.message_type {
            self.collect_message(&scope, file.name(), proto)?;
        }
        for proto in &file.enum_type {
            self.collect_enum(&scope, proto)?;
        }
        for proto in &file.extension {
            self.extensions.push((scope.clone(), proto));
        }
        Ok(())
    }

    fn collect_message(
        &mut self,
        scope: &str,
        file: &str,
        proto: &'a DescriptorProto,
    ) -> Result<()> {
        let full_name = qualify(scope, proto.name());
        self.register(&full_name, TypeRef::Message(self.messages.len()))?;
        self.map_entries.push(
            proto
                .options
                .as_ref()
                .map(|o| o.map_entry())
                .unwrap_or(false),
        );
        self.messages.push(MessageEntry {
            full_name: full_name.clone(),
            file: file.to_string(),
            proto,
        });

        for nested in &proto.nested_type {
            self.collect_message(&full_name, file, nested)?;
        }
        for nested in &proto.enum_type {
            self.collect_enum(&full_name, nested)?;
        }
        for ext in &proto.extension {
            self.extensions.push((full_name.clone(), ext));
        }
        Ok(())
    }

    fn collect_enum(
        &mut self,
        scope: &str,
        proto: &'a prost_types::EnumDescriptorProto,
    ) -> Result<()> {
        let full_name = qualify(scope, proto.name());
        self.register(&full_name, TypeRef::Enum(self.enums.len()))?;
        self.enums.push((full_name, proto));
        Ok(())
    }

    fn register(&mut self, full_name: &str, type_ref: TypeRef) -> Result<()> {
        if self.names.insert(full_name.to_string(), type_ref).is_some() {
            return Err(CodecError::invalid_schema(full_name, "duplicate type name"));
        }
        Ok(())
    }

    /// Resolve a type reference using protobuf scoping: fully qualified names
    /// start with `.`, otherwise enclosing scopes are searched innermost first.
    fn resolve(&self, scope: &str, name: &str) -> Option<TypeRef> {
        if let Some(absolute) = name.strip_prefix('.') {
            return self.names.get(absolute).copied();
        }
        let mut scope = scope;
        loop {
            let candidate = qualify(scope, name);
            if let Some(found) = self.names.get(&candidate) {
                return Some(*found);
            }
            if scope.is_empty() {
                return None;
            }
            scope = scope.rfind('.').map_or("", |i| &scope[..i]);
        }
    }

    fn build_message(&self, entry: &MessageEntry<'a>) -> Result<MessageInner> {
        let proto = entry.proto;
        let mut oneofs: Vec<OneofInner> = proto
            .oneof_decl
            .iter()
            .map(|o| OneofInner {
                name: o.name().to_string(),
                full_name: qualify(&entry.full_name, o.name()),
                fields: Vec::new(),
                synthetic: false,
            })
            .collect();

        let mut fields = Vec::with_capacity(proto.field.len());
        let mut by_number = BTreeMap::new();
        let mut by_name = HashMap::new();

        for (index, field_proto) in proto.field.iter().enumerate() {
            let mut field = self.build_field(&entry.full_name, &entry.full_name, field_proto)?;

            if let Some(oneof_index) = field_proto.oneof_index {
                let oneof = usize::try_from(oneof_index)
                    .ok()
                    .and_then(|i| oneofs.get_mut(i).map(|o| (i, o)));
                let Some((oneof_index, oneof)) = oneof else {
                    return Err(CodecError::invalid_schema(
                        field.full_name,
                        format!("oneof index {oneof_index} out of range"),
                    ));
                };
                if field.cardinality == Cardinality::Repeated {
                    return Err(CodecError::invalid_schema(
                        field.full_name,
                        "repeated fields cannot be oneof members",
                    ));
                }
                oneof.fields.push(index);
                oneof.synthetic |= field_proto.proto3_optional();
                field.oneof = Some(oneof_index);
            }

            if by_number.insert(field.number, index).is_some() {
                return Err(CodecError::invalid_schema(
                    entry.full_name.clone(),
                    format!("duplicate field number {}", field.number),
                ));
            }
            if by_name.insert(field.name.clone(), index).is_some() {
                return Err(CodecError::invalid_schema(
                    entry.full_name.clone(),
                    format!("duplicate field name '{}'", field.name),
                ));
            }
            fields.push(field);
        }

        if let Some(empty) = oneofs.iter().find(|o| o.fields.is_empty()) {
            return Err(CodecError::invalid_schema(
                empty.full_name.clone(),
                "oneof has no member fields",
            ));
        }

        let encode_order = by_number.values().copied().collect();

        Ok(MessageInner {
            name: entry.proto.name().to_string(),
            full_name: entry.full_name.clone(),
            file: entry.file.clone(),
            fields,
            by_number,
            by_name,
            oneofs,
            encode_order,
        })
    }

    fn build_extension(&self, scope: &str, proto: &FieldDescriptorProto) -> Result<ExtensionInner> {
        let full_name = qualify(scope, proto.name());
        let extendee = match self.resolve(scope, proto.extendee()) {
            Some(TypeRef::Message(index)) => index,
            _ => {
                return Err(CodecError::invalid_schema(
                    full_name,
                    format!("unresolved extendee '{}'", proto.extendee()),
                ))
            }
        };
        let mut field = self.build_field(scope, &self.messages[extendee].full_name, proto)?;
        field.full_name = full_name;
        Ok(ExtensionInner { field, extendee })
    }

    /// `scope` is used for type resolution, `owner` to form the full name.
    fn build_field(
        &self,
        scope: &str,
        owner: &str,
        proto: &FieldDescriptorProto,
    ) -> Result<FieldInner> {
        let full_name = qualify(owner, proto.name());

        let number = u32::try_from(proto.number())
            .ok()
            .filter(|n| (MIN_FIELD_NUMBER..=MAX_FIELD_NUMBER).contains(n))
            .ok_or_else(|| {
                CodecError::invalid_schema(
                    full_name.clone(),
                    format!("field number {} out of range", proto.number()),
                )
            })?;

        let cardinality = match proto.label() {
            Label::Optional => Cardinality::Optional,
            Label::Repeated => Cardinality::Repeated,
            Label::Required => {
                return Err(CodecError::invalid_schema(
                    full_name,
                    "required fields are not supported",
                ))
            }
        };

        let kind = match proto.r#type() {
            Type::Bool => KindRef::Bool,
            Type::Int32 => KindRef::Int32,
            Type::Int64 => KindRef::Int64,
            Type::Uint32 => KindRef::Uint32,
            Type::Uint64 => KindRef::Uint64,
            Type::String => KindRef::String,
            Type::Bytes => KindRef::Bytes,
            Type::Enum | Type::Message => match self.resolve(scope, proto.type_name()) {
                Some(TypeRef::Enum(index)) => KindRef::Enum(index),
                Some(TypeRef::Message(index)) if self.map_entries[index] => {
                    return Err(CodecError::invalid_schema(
                        full_name,
                        "map fields are not supported",
                    ))
                }
                Some(TypeRef::Message(index)) => KindRef::Message(index),
                None => {
                    return Err(CodecError::invalid_schema(
                        full_name,
                        format!("unresolved type '{}'", proto.type_name()),
                    ))
                }
            },
            Type::Group => {
                return Err(CodecError::invalid_schema(
                    full_name,
                    "group fields are not supported",
                ))
            }
            other => {
                return Err(CodecError::invalid_schema(
                    full_name,
                    format!("unsupported field type {}", other.as_str_name()),
                ))
            }
        };

        let packed = cardinality == Cardinality::Repeated
            && kind.is_varint()
            && proto.options.as_ref().and_then(|o| o.packed) != Some(false);

        let json_name = match &proto.json_name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => to_json_name(proto.name()),
        };

        Ok(FieldInner {
            name: proto.name().to_string(),
            full_name,
            json_name,
            number,
            kind,
            cardinality,
            oneof: None,
            packed,
        })
    }
}

fn qualify(scope: &str, name: &str) -> String {
    if scope.is_empty() {
        name.to_string()
    } else {
        format!("{scope}.{name}")
    }
}

/// `msg_type_urls` -> `msgTypeUrls`
fn to_json_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for c in name.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
