// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Programmatic schema construction.
//!
//! Produces `prost_types::FileDescriptorProto` values equivalent to what
//! `protoc` emits for a proto3 file, so schemas known at compile time can be
//! declared in Rust without shipping a descriptor set:
//!
//! ```
//! use protocodec::schema::builder::{FieldType, FileBuilder, MessageBuilder};
//! use protocodec::schema::DescriptorPool;
//!
//! let file = FileBuilder::new("demo.proto", "demo.v1")
//!     .message(
//!         MessageBuilder::new("Ping")
//!             .field("id", 1, FieldType::Uint64)
//!             .repeated("tags", 2, FieldType::String),
//!     )
//!     .build();
//! let pool = DescriptorPool::builder().add_file(file).build().unwrap();
//! assert!(pool.get_message_by_name("demo.v1.Ping").is_some());
//! ```

use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
    FieldOptions, FileDescriptorProto, OneofDescriptorProto,
};

/// Field type as written in a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Bool,
    Int32,
    Int64,
    Uint32,
    Uint64,
    String,
    Bytes,
    /// Fully qualified enum name
    Enum(String),
    /// Fully qualified message name
    Message(String),
}

impl FieldType {
    /// Message type reference.
    pub fn message(full_name: impl Into<String>) -> Self {
        FieldType::Message(full_name.into())
    }

    /// Enum type reference.
    pub fn enumeration(full_name: impl Into<String>) -> Self {
        FieldType::Enum(full_name.into())
    }

    fn proto_type(&self) -> Type {
        match self {
            FieldType::Bool => Type::Bool,
            FieldType::Int32 => Type::Int32,
            FieldType::Int64 => Type::Int64,
            FieldType::Uint32 => Type::Uint32,
            FieldType::Uint64 => Type::Uint64,
            FieldType::String => Type::String,
            FieldType::Bytes => Type::Bytes,
            FieldType::Enum(_) => Type::Enum,
            FieldType::Message(_) => Type::Message,
        }
    }

    fn type_name(&self) -> Option<String> {
        match self {
            FieldType::Enum(name) | FieldType::Message(name) => {
                Some(format!(".{}", name.trim_start_matches('.')))
            }
            _ => None,
        }
    }
}

fn field_proto(name: &str, number: u32, ty: &FieldType, label: Label) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number as i32),
        label: Some(label as i32),
        r#type: Some(ty.proto_type() as i32),
        type_name: ty.type_name(),
        ..Default::default()
    }
}

#[derive(Debug, Clone, Copy)]
enum Membership {
    None,
    Oneof(usize),
    Synthetic,
}

/// Builder for one message type.
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    name: String,
    fields: Vec<(FieldDescriptorProto, Membership)>,
    oneofs: Vec<String>,
    nested: Vec<MessageBuilder>,
    enums: Vec<EnumBuilder>,
}

impl MessageBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            oneofs: Vec::new(),
            nested: Vec::new(),
            enums: Vec::new(),
        }
    }

    /// Add a singular field with implicit presence.
    pub fn field(mut self, name: &str, number: u32, ty: FieldType) -> Self {
        self.fields
            .push((field_proto(name, number, &ty, Label::Optional), Membership::None));
        self
    }

    /// Add a repeated field.
    pub fn repeated(mut self, name: &str, number: u32, ty: FieldType) -> Self {
        self.fields
            .push((field_proto(name, number, &ty, Label::Repeated), Membership::None));
        self
    }

    /// Add a repeated varint field declared `[packed = false]`.
    pub fn unpacked(mut self, name: &str, number: u32, ty: FieldType) -> Self {
        let mut proto = field_proto(name, number, &ty, Label::Repeated);
        proto.options = Some(FieldOptions {
            packed: Some(false),
            ..Default::default()
        });
        self.fields.push((proto, Membership::None));
        self
    }

    /// Add a proto3 `optional` field (explicit presence via a synthetic oneof).
    pub fn optional(mut self, name: &str, number: u32, ty: FieldType) -> Self {
        let mut proto = field_proto(name, number, &ty, Label::Optional);
        proto.proto3_optional = Some(true);
        self.fields.push((proto, Membership::Synthetic));
        self
    }

    /// Add a oneof group; `members` adds its fields.
    pub fn oneof(mut self, name: &str, members: impl FnOnce(OneofBuilder) -> OneofBuilder) -> Self {
        let index = self.oneofs.len();
        self.oneofs.push(name.to_string());
        let group = members(OneofBuilder { fields: Vec::new() });
        self.fields.extend(
            group
                .fields
                .into_iter()
                .map(|proto| (proto, Membership::Oneof(index))),
        );
        self
    }

    /// Add a nested message type.
    pub fn nested(mut self, message: MessageBuilder) -> Self {
        self.nested.push(message);
        self
    }

    /// Add a nested enum type.
    pub fn enumeration(mut self, enumeration: EnumBuilder) -> Self {
        self.enums.push(enumeration);
        self
    }

    pub fn build(self) -> DescriptorProto {
        // Synthetic oneofs follow the declared ones, as protoc lays them out.
        let mut oneof_decl: Vec<OneofDescriptorProto> = self
            .oneofs
            .into_iter()
            .map(|name| OneofDescriptorProto {
                name: Some(name),
                options: None,
            })
            .collect();

        let mut fields = Vec::with_capacity(self.fields.len());
        for (mut proto, membership) in self.fields {
            match membership {
                Membership::None => {}
                Membership::Oneof(index) => proto.oneof_index = Some(index as i32),
                Membership::Synthetic => {
                    proto.oneof_index = Some(oneof_decl.len() as i32);
                    oneof_decl.push(OneofDescriptorProto {
                        name: Some(format!("_{}", proto.name())),
                        options: None,
                    });
                }
            }
            fields.push(proto);
        }

        DescriptorProto {
            name: Some(self.name),
            field: fields,
            nested_type: self.nested.into_iter().map(MessageBuilder::build).collect(),
            enum_type: self.enums.into_iter().map(EnumBuilder::build).collect(),
            oneof_decl,
            ..Default::default()
        }
    }
}

/// Collects the members of one oneof group.
#[derive(Debug, Clone)]
pub struct OneofBuilder {
    fields: Vec<FieldDescriptorProto>,
}

impl OneofBuilder {
    pub fn field(mut self, name: &str, number: u32, ty: FieldType) -> Self {
        self.fields
            .push(field_proto(name, number, &ty, Label::Optional));
        self
    }
}

/// Builder for an enum type.
#[derive(Debug, Clone)]
pub struct EnumBuilder {
    name: String,
    values: Vec<(String, i32)>,
}

impl EnumBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
        }
    }

    pub fn value(mut self, name: &str, number: i32) -> Self {
        self.values.push((name.to_string(), number));
        self
    }

    pub fn build(self) -> EnumDescriptorProto {
        EnumDescriptorProto {
            name: Some(self.name),
            value: self
                .values
                .into_iter()
                .map(|(name, number)| EnumValueDescriptorProto {
                    name: Some(name),
                    number: Some(number),
                    options: None,
                })
                .collect(),
            ..Default::default()
        }
    }
}

/// Builder for one proto3 schema file.
#[derive(Debug, Clone)]
pub struct FileBuilder {
    name: String,
    package: String,
    dependencies: Vec<String>,
    messages: Vec<MessageBuilder>,
    enums: Vec<EnumBuilder>,
    extensions: Vec<FieldDescriptorProto>,
}

impl FileBuilder {
    /// # Arguments
    ///
    /// * `name` - File path, e.g. `cosmos/authz/v1beta1/authz.proto`
    /// * `package` - Dotted package name, e.g. `cosmos.authz.v1beta1`
    pub fn new(name: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            package: package.into(),
            dependencies: Vec::new(),
            messages: Vec::new(),
            enums: Vec::new(),
            extensions: Vec::new(),
        }
    }

    /// Declare an imported file.
    pub fn dependency(mut self, file: impl Into<String>) -> Self {
        self.dependencies.push(file.into());
        self
    }

    pub fn message(mut self, message: MessageBuilder) -> Self {
        self.messages.push(message);
        self
    }

    pub fn enumeration(mut self, enumeration: EnumBuilder) -> Self {
        self.enums.push(enumeration);
        self
    }

    /// Declare a file-level extension of `extendee`.
    pub fn extension(mut self, extendee: &str, name: &str, number: u32, ty: FieldType) -> Self {
        let mut proto = field_proto(name, number, &ty, Label::Optional);
        proto.extendee = Some(format!(".{}", extendee.trim_start_matches('.')));
        self.extensions.push(proto);
        self
    }

    pub fn build(self) -> FileDescriptorProto {
        FileDescriptorProto {
            name: Some(self.name),
            package: Some(self.package),
            dependency: self.dependencies,
            message_type: self.messages.into_iter().map(MessageBuilder::build).collect(),
            enum_type: self.enums.into_iter().map(EnumBuilder::build).collect(),
            extension: self.extensions,
            syntax: Some("proto3".to_string()),
            ..Default::default()
        }
    }
}
