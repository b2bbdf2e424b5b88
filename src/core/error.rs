// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core error types for protocodec.
//!
//! Covers every failure the runtime can report:
//! - Structural wire-format errors raised while decoding
//! - Reflective accessor contract violations
//! - Schema ingestion and configuration errors

use std::fmt;

/// Errors that can occur while encoding, decoding or reflecting over records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// A varint ran past the 10-byte / 64-bit limit
    IntegerOverflow {
        /// Byte offset where the varint started
        position: usize,
    },

    /// The buffer ended in the middle of a field
    UnexpectedEndOfInput {
        /// Byte offset where more input was required
        position: usize,
        /// Number of additional bytes the reader needed
        needed: usize,
    },

    /// Illegal wire-type value (group end at top level, or 6/7)
    MalformedWireType {
        /// Raw wire type bits
        wire_type: u8,
        /// Byte offset of the offending tag
        position: usize,
    },

    /// Field number of zero or above the protobuf maximum
    IllegalTag {
        /// Decoded field number
        field_number: u64,
        /// Byte offset of the offending tag
        position: usize,
    },

    /// The wire type on the wire disagrees with the field's declared kind
    WrongWireType {
        /// Full name of the field
        field: String,
        /// Wire type the schema expects
        expected: u8,
        /// Wire type found in the input
        actual: u8,
    },

    /// A length prefix overflowed the address space
    InvalidLength {
        /// Decoded length
        length: u64,
        /// Byte offset of the length prefix
        position: usize,
    },

    /// A string field carried bytes that are not UTF-8
    InvalidUtf8 {
        /// Full name of the field
        field: String,
    },

    /// Nested messages went deeper than the configured limit
    RecursionLimitExceeded {
        /// Configured limit
        limit: u32,
    },

    /// Reflective access with a field this message does not declare
    UnknownField {
        /// Full name of the offending field
        field: String,
        /// Full name of the message that was accessed
        message: String,
    },

    /// Reflective access with an extension field
    ExtensionsUnsupported {
        /// Full name of the extension
        field: String,
        /// Full name of the message that was accessed
        message: String,
    },

    /// A value variant that does not match the field's kind
    TypeMismatch {
        /// Full name of the field
        field: String,
        /// Kind the field declares
        expected: String,
        /// Kind of the supplied value
        actual: String,
    },

    /// Mutable handle requested for a scalar field
    NotMutable {
        /// Full name of the field
        field: String,
    },

    /// List index outside `[0, len)`
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Current list length
        len: usize,
    },

    /// Invalid schema or descriptor catalogue
    InvalidSchema {
        /// Schema name or identifier
        schema_name: String,
        /// Validation error message
        reason: String,
    },

    /// Type not found in a descriptor pool
    TypeNotFound {
        /// Type name that was not found
        type_name: String,
    },

    /// Parse error in configuration or descriptor-set bytes
    ParseError {
        /// What was being parsed
        context: String,
        /// Error message
        message: String,
    },

    /// Internal invariant broken (for example a size/cursor disagreement)
    InvariantViolation {
        /// Description of the invariant that was violated
        invariant: String,
    },
}

impl CodecError {
    /// Create an integer overflow error.
    pub fn integer_overflow(position: usize) -> Self {
        CodecError::IntegerOverflow { position }
    }

    /// Create an unexpected end of input error.
    pub fn unexpected_eof(position: usize, needed: usize) -> Self {
        CodecError::UnexpectedEndOfInput { position, needed }
    }

    /// Create a malformed wire type error.
    pub fn malformed_wire_type(wire_type: u8, position: usize) -> Self {
        CodecError::MalformedWireType {
            wire_type,
            position,
        }
    }

    /// Create an illegal tag error.
    pub fn illegal_tag(field_number: u64, position: usize) -> Self {
        CodecError::IllegalTag {
            field_number,
            position,
        }
    }

    /// Create a wrong wire type error.
    pub fn wrong_wire_type(field: impl Into<String>, expected: u8, actual: u8) -> Self {
        CodecError::WrongWireType {
            field: field.into(),
            expected,
            actual,
        }
    }

    /// Create an invalid length error.
    pub fn invalid_length(length: u64, position: usize) -> Self {
        CodecError::InvalidLength { length, position }
    }

    /// Create an invalid UTF-8 error.
    pub fn invalid_utf8(field: impl Into<String>) -> Self {
        CodecError::InvalidUtf8 {
            field: field.into(),
        }
    }

    /// Create an unknown field error.
    pub fn unknown_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        CodecError::UnknownField {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an extensions unsupported error.
    pub fn extensions_unsupported(field: impl Into<String>, message: impl Into<String>) -> Self {
        CodecError::ExtensionsUnsupported {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a type mismatch error.
    pub fn type_mismatch(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        CodecError::TypeMismatch {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create a not mutable error.
    pub fn not_mutable(field: impl Into<String>) -> Self {
        CodecError::NotMutable {
            field: field.into(),
        }
    }

    /// Create an index out of range error.
    pub fn index_out_of_range(index: usize, len: usize) -> Self {
        CodecError::IndexOutOfRange { index, len }
    }

    /// Create an invalid schema error.
    pub fn invalid_schema(schema_name: impl Into<String>, reason: impl Into<String>) -> Self {
        CodecError::InvalidSchema {
            schema_name: schema_name.into(),
            reason: reason.into(),
        }
    }

    /// Create a "type not found" error.
    pub fn type_not_found(type_name: impl Into<String>) -> Self {
        CodecError::TypeNotFound {
            type_name: type_name.into(),
        }
    }

    /// Create a parse error.
    pub fn parse(context: impl Into<String>, message: impl Into<String>) -> Self {
        CodecError::ParseError {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Create an invariant violation error.
    pub fn invariant_violation(invariant: impl Into<String>) -> Self {
        CodecError::InvariantViolation {
            invariant: invariant.into(),
        }
    }

    /// Whether this error was raised by the decoder for malformed input.
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            CodecError::IntegerOverflow { .. }
                | CodecError::UnexpectedEndOfInput { .. }
                | CodecError::MalformedWireType { .. }
                | CodecError::IllegalTag { .. }
                | CodecError::WrongWireType { .. }
                | CodecError::InvalidLength { .. }
                | CodecError::InvalidUtf8 { .. }
                | CodecError::RecursionLimitExceeded { .. }
        )
    }

    /// Get structured fields for logging.
    pub fn log_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            CodecError::IntegerOverflow { position } => vec![("position", position.to_string())],
            CodecError::UnexpectedEndOfInput { position, needed } => vec![
                ("position", position.to_string()),
                ("needed", needed.to_string()),
            ],
            CodecError::MalformedWireType {
                wire_type,
                position,
            } => vec![
                ("wire_type", wire_type.to_string()),
                ("position", position.to_string()),
            ],
            CodecError::IllegalTag {
                field_number,
                position,
            } => vec![
                ("field_number", field_number.to_string()),
                ("position", position.to_string()),
            ],
            CodecError::WrongWireType {
                field,
                expected,
                actual,
            } => vec![
                ("field", field.clone()),
                ("expected", expected.to_string()),
                ("actual", actual.to_string()),
            ],
            CodecError::InvalidLength { length, position } => vec![
                ("length", length.to_string()),
                ("position", position.to_string()),
            ],
            CodecError::InvalidUtf8 { field } => vec![("field", field.clone())],
            CodecError::RecursionLimitExceeded { limit } => vec![("limit", limit.to_string())],
            CodecError::UnknownField { field, message }
            | CodecError::ExtensionsUnsupported { field, message } => {
                vec![("field", field.clone()), ("message", message.clone())]
            }
            CodecError::TypeMismatch {
                field,
                expected,
                actual,
            } => vec![
                ("field", field.clone()),
                ("expected", expected.clone()),
                ("actual", actual.clone()),
            ],
            CodecError::NotMutable { field } => vec![("field", field.clone())],
            CodecError::IndexOutOfRange { index, len } => {
                vec![("index", index.to_string()), ("len", len.to_string())]
            }
            CodecError::InvalidSchema {
                schema_name,
                reason,
            } => vec![("schema", schema_name.clone()), ("reason", reason.clone())],
            CodecError::TypeNotFound { type_name } => vec![("type", type_name.clone())],
            CodecError::ParseError { context, message } => {
                vec![("context", context.clone()), ("message", message.clone())]
            }
            CodecError::InvariantViolation { invariant } => {
                vec![("invariant", invariant.clone())]
            }
        }
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::IntegerOverflow { position } => {
                write!(f, "Integer overflow: varint at position {position} exceeds 64 bits")
            }
            CodecError::UnexpectedEndOfInput { position, needed } => write!(
                f,
                "Unexpected end of input at position {position}: {needed} more byte(s) required"
            ),
            CodecError::MalformedWireType {
                wire_type,
                position,
            } => write!(
                f,
                "Malformed wire type {wire_type} in tag at position {position}"
            ),
            CodecError::IllegalTag {
                field_number,
                position,
            } => write!(
                f,
                "Illegal tag: field number {field_number} at position {position}"
            ),
            CodecError::WrongWireType {
                field,
                expected,
                actual,
            } => write!(
                f,
                "Wrong wire type for field '{field}': expected {expected}, found {actual}"
            ),
            CodecError::InvalidLength { length, position } => write!(
                f,
                "Invalid length {length} in length prefix at position {position}"
            ),
            CodecError::InvalidUtf8 { field } => {
                write!(f, "Invalid UTF-8 in string field '{field}'")
            }
            CodecError::RecursionLimitExceeded { limit } => {
                write!(f, "Recursion limit of {limit} nested messages exceeded")
            }
            CodecError::UnknownField { field, message } => {
                write!(f, "Message '{message}' has no field '{field}'")
            }
            CodecError::ExtensionsUnsupported { field, message } => write!(
                f,
                "Extensions are unsupported: '{field}' cannot be accessed on '{message}'"
            ),
            CodecError::TypeMismatch {
                field,
                expected,
                actual,
            } => write!(
                f,
                "Type mismatch for field '{field}': expected {expected}, got {actual}"
            ),
            CodecError::NotMutable { field } => {
                write!(f, "Field '{field}' is not a message or list and cannot be mutated in place")
            }
            CodecError::IndexOutOfRange { index, len } => {
                write!(f, "Index {index} out of range for list of length {len}")
            }
            CodecError::InvalidSchema {
                schema_name,
                reason,
            } => {
                write!(f, "Invalid schema '{schema_name}': {reason}")
            }
            CodecError::TypeNotFound { type_name } => {
                write!(f, "Type not found: '{type_name}'")
            }
            CodecError::ParseError { context, message } => {
                write!(f, "Parse error in {context}: {message}")
            }
            CodecError::InvariantViolation { invariant } => {
                write!(f, "Invariant violation: {invariant}")
            }
        }
    }
}

impl std::error::Error for CodecError {}

impl From<std::io::Error> for CodecError {
    fn from(err: std::io::Error) -> Self {
        CodecError::ParseError {
            context: "IO".to_string(),
            message: err.to_string(),
        }
    }
}

/// Result type for protocodec operations.
pub type Result<T> = std::result::Result<T, CodecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_overflow() {
        let err = CodecError::integer_overflow(3);
        assert!(matches!(err, CodecError::IntegerOverflow { .. }));
        assert_eq!(
            err.to_string(),
            "Integer overflow: varint at position 3 exceeds 64 bits"
        );
    }

    #[test]
    fn test_unexpected_eof() {
        let err = CodecError::unexpected_eof(10, 4);
        assert_eq!(
            err.to_string(),
            "Unexpected end of input at position 10: 4 more byte(s) required"
        );
        assert!(err.is_decode_error());
    }

    #[test]
    fn test_wrong_wire_type() {
        let err = CodecError::wrong_wire_type("pkg.Msg.name", 2, 0);
        assert_eq!(
            err.to_string(),
            "Wrong wire type for field 'pkg.Msg.name': expected 2, found 0"
        );
    }

    #[test]
    fn test_unknown_field() {
        let err = CodecError::unknown_field("pkg.Other.id", "pkg.Msg");
        assert_eq!(err.to_string(), "Message 'pkg.Msg' has no field 'pkg.Other.id'");
        assert!(!err.is_decode_error());
    }

    #[test]
    fn test_type_mismatch() {
        let err = CodecError::type_mismatch("pkg.Msg.id", "uint64", "string");
        assert_eq!(
            err.to_string(),
            "Type mismatch for field 'pkg.Msg.id': expected uint64, got string"
        );
    }

    #[test]
    fn test_index_out_of_range() {
        let err = CodecError::index_out_of_range(5, 2);
        assert_eq!(err.to_string(), "Index 5 out of range for list of length 2");
    }

    #[test]
    fn test_invalid_schema_error() {
        let err = CodecError::invalid_schema("MySchema", "invalid field");
        assert_eq!(err.to_string(), "Invalid schema 'MySchema': invalid field");
    }

    #[test]
    fn test_type_not_found_error() {
        let err = CodecError::type_not_found("UnknownType");
        assert_eq!(err.to_string(), "Type not found: 'UnknownType'");
    }

    #[test]
    fn test_log_fields_unexpected_eof() {
        let err = CodecError::unexpected_eof(7, 1);
        let fields = err.log_fields();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0], ("position", "7".to_string()));
        assert_eq!(fields[1], ("needed", "1".to_string()));
    }

    #[test]
    fn test_log_fields_wrong_wire_type() {
        let err = CodecError::wrong_wire_type("f", 0, 2);
        let fields = err.log_fields();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0].0, "field");
        assert_eq!(fields[1].1, "0");
        assert_eq!(fields[2].1, "2");
    }

    #[test]
    fn test_log_fields_illegal_tag() {
        let err = CodecError::illegal_tag(0, 4);
        let fields = err.log_fields();
        assert_eq!(fields[0], ("field_number", "0".to_string()));
        assert_eq!(fields[1], ("position", "4".to_string()));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let codec_err: CodecError = io_err.into();
        assert_eq!(codec_err.to_string(), "Parse error in IO: file not found");
    }

    #[test]
    fn test_error_clone() {
        let err1 = CodecError::not_mutable("pkg.Msg.id");
        let err2 = err1.clone();
        assert_eq!(err1, err2);
    }
}
