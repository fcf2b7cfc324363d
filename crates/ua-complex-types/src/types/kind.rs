// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Closed set of wire value kinds.

use std::fmt;

/// Every value kind a structure field can carry.
///
/// The first 25 variants are the protocol built-in types and carry their
/// built-in type id (used by the Variant encoding mask). `Enumeration` and
/// `Structure` are schema-defined and only reach the wire through a field
/// descriptor that references the concrete type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueKind {
    Boolean,
    SByte,
    Byte,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float,
    Double,
    String,
    DateTime,
    Guid,
    ByteString,
    XmlElement,
    NodeId,
    ExpandedNodeId,
    StatusCode,
    QualifiedName,
    LocalizedText,
    ExtensionObject,
    DataValue,
    Variant,
    DiagnosticInfo,
    /// Schema enumeration, encoded as a signed 32-bit integer.
    Enumeration,
    /// Nested schema structure.
    Structure,
}

impl ValueKind {
    /// All built-in kinds, ordered by built-in type id.
    pub const BUILTIN: [ValueKind; 25] = [
        Self::Boolean,
        Self::SByte,
        Self::Byte,
        Self::Int16,
        Self::UInt16,
        Self::Int32,
        Self::UInt32,
        Self::Int64,
        Self::UInt64,
        Self::Float,
        Self::Double,
        Self::String,
        Self::DateTime,
        Self::Guid,
        Self::ByteString,
        Self::XmlElement,
        Self::NodeId,
        Self::ExpandedNodeId,
        Self::StatusCode,
        Self::QualifiedName,
        Self::LocalizedText,
        Self::ExtensionObject,
        Self::DataValue,
        Self::Variant,
        Self::DiagnosticInfo,
    ];

    /// Built-in type id (1..=25), `None` for schema-defined kinds.
    pub fn builtin_type_id(self) -> Option<u8> {
        Self::BUILTIN
            .iter()
            .position(|k| *k == self)
            .map(|idx| (idx + 1) as u8)
    }

    /// Reverse of [`builtin_type_id`](Self::builtin_type_id).
    pub fn from_builtin_type_id(id: u8) -> Option<Self> {
        match id {
            1..=25 => Some(Self::BUILTIN[(id - 1) as usize]),
            _ => None,
        }
    }

    /// True for the protocol built-in kinds.
    pub fn is_builtin(self) -> bool {
        !matches!(self, Self::Enumeration | Self::Structure)
    }

    /// Reverse of [`name`](Self::name), built-in kinds only.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::BUILTIN.iter().copied().find(|k| k.name() == name)
    }

    /// Stable type name as used in schema dictionaries.
    pub fn name(self) -> &'static str {
        match self {
            Self::Boolean => "Boolean",
            Self::SByte => "SByte",
            Self::Byte => "Byte",
            Self::Int16 => "Int16",
            Self::UInt16 => "UInt16",
            Self::Int32 => "Int32",
            Self::UInt32 => "UInt32",
            Self::Int64 => "Int64",
            Self::UInt64 => "UInt64",
            Self::Float => "Float",
            Self::Double => "Double",
            Self::String => "String",
            Self::DateTime => "DateTime",
            Self::Guid => "Guid",
            Self::ByteString => "ByteString",
            Self::XmlElement => "XmlElement",
            Self::NodeId => "NodeId",
            Self::ExpandedNodeId => "ExpandedNodeId",
            Self::StatusCode => "StatusCode",
            Self::QualifiedName => "QualifiedName",
            Self::LocalizedText => "LocalizedText",
            Self::ExtensionObject => "ExtensionObject",
            Self::DataValue => "DataValue",
            Self::Variant => "Variant",
            Self::DiagnosticInfo => "DiagnosticInfo",
            Self::Enumeration => "Enumeration",
            Self::Structure => "Structure",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_type_ids() {
        assert_eq!(ValueKind::Boolean.builtin_type_id(), Some(1));
        assert_eq!(ValueKind::String.builtin_type_id(), Some(12));
        assert_eq!(ValueKind::ExtensionObject.builtin_type_id(), Some(22));
        assert_eq!(ValueKind::DiagnosticInfo.builtin_type_id(), Some(25));
        assert_eq!(ValueKind::Enumeration.builtin_type_id(), None);
        assert_eq!(ValueKind::Structure.builtin_type_id(), None);
    }

    #[test]
    fn test_type_id_reverse_lookup() {
        for kind in ValueKind::BUILTIN {
            let id = kind.builtin_type_id().expect("builtin id");
            assert_eq!(ValueKind::from_builtin_type_id(id), Some(kind));
        }
        assert_eq!(ValueKind::from_builtin_type_id(0), None);
        assert_eq!(ValueKind::from_builtin_type_id(26), None);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(ValueKind::from_name("LocalizedText"), Some(ValueKind::LocalizedText));
        assert_eq!(ValueKind::from_name("Structure"), None);
        assert_eq!(ValueKind::from_name("double"), None);
    }
}
