// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types.

use crate::types::{NodeId, ValueKind};
use std::fmt;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Schema rejected while building a descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    DuplicateField {
        structure: String,
        field: String,
    },
    EmptyFieldName {
        structure: String,
        index: usize,
    },
    TooManyOptionalFields {
        structure: String,
        count: usize,
        max: usize,
    },
    /// Field references a type id that is neither registered nor loadable.
    UnresolvedType {
        structure: String,
        field: String,
        type_id: NodeId,
    },
    /// Structure reaches itself through its nested field types.
    RecursiveType {
        type_id: NodeId,
    },
    DuplicateEnumName {
        enumeration: String,
        name: String,
    },
    /// `Enumeration` and `Structure` need a referenced type, not a bare kind.
    UnsupportedFieldKind {
        structure: String,
        field: String,
        kind: ValueKind,
    },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateField { structure, field } => {
                write!(f, "Duplicate field '{}' in structure {}", field, structure)
            }
            Self::EmptyFieldName { structure, index } => {
                write!(f, "Field #{} of structure {} has no name", index, structure)
            }
            Self::TooManyOptionalFields {
                structure,
                count,
                max,
            } => write!(
                f,
                "Structure {} declares {} optional fields (max {})",
                structure, count, max
            ),
            Self::UnresolvedType {
                structure,
                field,
                type_id,
            } => write!(
                f,
                "Field '{}' of structure {} references unknown type {}",
                field, structure, type_id
            ),
            Self::RecursiveType { type_id } => {
                write!(f, "Type {} references itself", type_id)
            }
            Self::DuplicateEnumName { enumeration, name } => {
                write!(f, "Duplicate name '{}' in enumeration {}", name, enumeration)
            }
            Self::UnsupportedFieldKind {
                structure,
                field,
                kind,
            } => write!(
                f,
                "Field '{}' of structure {} uses kind {} without a type reference",
                field, structure, kind
            ),
        }
    }
}

impl std::error::Error for SchemaError {}

/// Malformed or oversized input on decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    EndOfStream {
        offset: usize,
        need: usize,
        have: usize,
    },
    InvalidData {
        field: String,
        reason: String,
    },
    /// Union switch value greater than the number of fields.
    SwitchOutOfRange {
        structure: String,
        switch: u32,
        field_count: usize,
    },
    LimitExceeded {
        field: String,
        what: &'static str,
        length: usize,
        max: usize,
    },
    NestingTooDeep {
        max: usize,
    },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndOfStream { offset, need, have } => write!(
                f,
                "Unexpected end of stream at offset {}: need {} bytes, have {}",
                offset, need, have
            ),
            Self::InvalidData { field, reason } => {
                write!(f, "Invalid data in field '{}': {}", field, reason)
            }
            Self::SwitchOutOfRange {
                structure,
                switch,
                field_count,
            } => write!(
                f,
                "Union {} switch {} out of range (1..={})",
                structure, switch, field_count
            ),
            Self::LimitExceeded {
                field,
                what,
                length,
                max,
            } => write!(
                f,
                "Field '{}': {} length {} exceeds limit {}",
                field, what, length, max
            ),
            Self::NestingTooDeep { max } => write!(f, "Nesting depth exceeds {}", max),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Value cannot be represented on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    InvalidData {
        field: String,
        reason: String,
    },
    LimitExceeded {
        field: String,
        what: &'static str,
        length: usize,
        max: usize,
    },
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidData { field, reason } => {
                write!(f, "Cannot encode field '{}': {}", field, reason)
            }
            Self::LimitExceeded {
                field,
                what,
                length,
                max,
            } => write!(
                f,
                "Field '{}': {} length {} exceeds limit {}",
                field, what, length, max
            ),
        }
    }
}

impl std::error::Error for EncodeError {}

/// Top-level error.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    Schema(SchemaError),
    TypeMismatch {
        field: String,
        expected: String,
        found: String,
    },
    FieldNotFound {
        structure: String,
        field: String,
    },
    Decode(DecodeError),
    Encode(EncodeError),
    /// Field kind has no codec route.
    Codec {
        field: String,
        kind: ValueKind,
    },
    /// Instance bound to a different type than expected.
    Type(String),
    /// No descriptor registered for the id.
    UnknownType(NodeId),
    Config(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Schema(e) => write!(f, "Schema error: {}", e),
            Self::TypeMismatch {
                field,
                expected,
                found,
            } => write!(
                f,
                "Type mismatch on field '{}': expected {}, found {}",
                field, expected, found
            ),
            Self::FieldNotFound { structure, field } => {
                write!(f, "Field not found: {}.{}", structure, field)
            }
            Self::Decode(e) => write!(f, "Decode error: {}", e),
            Self::Encode(e) => write!(f, "Encode error: {}", e),
            Self::Codec { field, kind } => {
                write!(f, "No codec route for field '{}' of kind {}", field, kind)
            }
            Self::Type(msg) => write!(f, "Type error: {}", msg),
            Self::UnknownType(id) => write!(f, "Unknown type: {}", id),
            Self::Config(msg) => write!(f, "Config error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Schema(e) => Some(e),
            Self::Decode(e) => Some(e),
            Self::Encode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SchemaError> for Error {
    fn from(e: SchemaError) -> Self {
        Self::Schema(e)
    }
}

impl From<DecodeError> for Error {
    fn from(e: DecodeError) -> Self {
        Self::Decode(e)
    }
}

impl From<EncodeError> for Error {
    fn from(e: EncodeError) -> Self {
        Self::Encode(e)
    }
}
