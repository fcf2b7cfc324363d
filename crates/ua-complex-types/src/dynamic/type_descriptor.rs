// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptors for runtime structure layouts.

use crate::config::MAX_OPTIONAL_FIELDS;
use crate::dynamic::ComplexData;
use crate::error::{Error, Result, SchemaError};
use crate::types::{Array, NodeId, Value, ValueKind};
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "schema-loaders")]
use serde::{Deserialize, Serialize};

/// Wire protocol a structure uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "schema-loaders", derive(Serialize, Deserialize))]
pub enum StructureKind {
    /// Every field, in order.
    #[default]
    Plain,
    /// UInt32 presence mask, then mandatory fields and present optional ones.
    WithOptionalFields,
    /// UInt32 switch (1-based field position, 0 = none), then that field.
    Union,
}

impl fmt::Display for StructureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Plain => "Plain",
            Self::WithOptionalFields => "WithOptionalFields",
            Self::Union => "Union",
        };
        f.write_str(name)
    }
}

/// What a field holds.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    /// A protocol built-in kind.
    Builtin(ValueKind),
    /// A registered enumeration.
    Enumeration(Arc<EnumDescriptor>),
    /// A registered structure.
    Structure(Arc<StructureDescriptor>),
}

impl FieldType {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Builtin(kind) => *kind,
            Self::Enumeration(_) => ValueKind::Enumeration,
            Self::Structure(_) => ValueKind::Structure,
        }
    }

    /// Name for diagnostics: the kind, or the referenced type's name.
    pub fn type_name(&self) -> String {
        match self {
            Self::Builtin(kind) => kind.to_string(),
            Self::Enumeration(e) => e.name.clone(),
            Self::Structure(s) => s.name.clone(),
        }
    }
}

/// A field in a structure.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub field_type: FieldType,
    pub is_array: bool,
    /// Only meaningful for `WithOptionalFields` structures.
    pub is_optional: bool,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            is_array: false,
            is_optional: false,
        }
    }

    /// Make this field a one-dimensional array.
    pub fn array(mut self) -> Self {
        self.is_array = true;
        self
    }

    /// Make this field optional.
    pub fn optional(mut self) -> Self {
        self.is_optional = true;
        self
    }

    /// Type name with an `[]` suffix for arrays.
    pub fn type_name(&self) -> String {
        if self.is_array {
            format!("{}[]", self.field_type.type_name())
        } else {
            self.field_type.type_name()
        }
    }

    /// Value written when a mandatory field is absent.
    pub fn default_value(&self) -> Value {
        if self.is_array {
            return Value::Array(Array::empty(self.field_type.kind()));
        }
        match &self.field_type {
            FieldType::Structure(desc) => Value::Structure(ComplexData::with_defaults(desc)),
            FieldType::Enumeration(_) => Value::Enumeration(0),
            // Builtin(Structure) never survives descriptor validation.
            FieldType::Builtin(kind) => {
                Value::default_scalar(*kind).unwrap_or(Value::Enumeration(0))
            }
        }
    }

    /// Check that `value` fits this field: kind, rank and nested layout.
    pub fn check_value(&self, value: &Value) -> Result<()> {
        let mismatch = |found: String| Error::TypeMismatch {
            field: self.name.clone(),
            expected: self.type_name(),
            found,
        };

        if value.is_array() != self.is_array || value.kind() != self.field_type.kind() {
            return Err(mismatch(value.type_name()));
        }

        if let FieldType::Structure(desc) = &self.field_type {
            let wrong = match value {
                Value::Structure(nested) => (!desc.is_layout_compatible(nested.descriptor()))
                    .then(|| nested.type_name().to_string()),
                Value::Array(Array::Structure(items)) => items
                    .iter()
                    .find(|item| !desc.is_layout_compatible(item.descriptor()))
                    .map(|item| format!("{}[]", item.type_name())),
                _ => None,
            };
            if let Some(found) = wrong {
                return Err(mismatch(found));
            }
        }
        Ok(())
    }
}

/// Compiled layout of one structure type.
#[derive(Debug, Clone, PartialEq)]
pub struct StructureDescriptor {
    pub name: String,
    pub type_id: NodeId,
    pub binary_encoding_id: Option<NodeId>,
    pub xml_encoding_id: Option<NodeId>,
    pub namespace_uri: String,
    structure_kind: StructureKind,
    fields: Vec<FieldDescriptor>,
    /// Mask bit per field; `Some` only for optional fields of
    /// `WithOptionalFields` structures.
    optional_bits: Vec<Option<u32>>,
}

impl StructureDescriptor {
    /// Validate and compile a field list.
    pub fn new(
        name: impl Into<String>,
        type_id: NodeId,
        namespace_uri: impl Into<String>,
        structure_kind: StructureKind,
        fields: Vec<FieldDescriptor>,
    ) -> std::result::Result<Self, SchemaError> {
        let name = name.into();

        for (index, field) in fields.iter().enumerate() {
            if field.name.is_empty() {
                return Err(SchemaError::EmptyFieldName {
                    structure: name,
                    index,
                });
            }
            if fields[..index].iter().any(|f| f.name == field.name) {
                return Err(SchemaError::DuplicateField {
                    structure: name,
                    field: field.name.clone(),
                });
            }
            if let FieldType::Builtin(kind) = field.field_type {
                if !kind.is_builtin() {
                    return Err(SchemaError::UnsupportedFieldKind {
                        structure: name,
                        field: field.name.clone(),
                        kind,
                    });
                }
            }
        }

        let mut optional_bits = vec![None; fields.len()];
        if structure_kind == StructureKind::WithOptionalFields {
            let count = fields.iter().filter(|f| f.is_optional).count();
            if count > MAX_OPTIONAL_FIELDS {
                return Err(SchemaError::TooManyOptionalFields {
                    structure: name,
                    count,
                    max: MAX_OPTIONAL_FIELDS,
                });
            }
            let mut bit = 0u32;
            for (slot, field) in optional_bits.iter_mut().zip(&fields) {
                if field.is_optional {
                    *slot = Some(bit);
                    bit += 1;
                }
            }
        }

        Ok(Self {
            name,
            type_id,
            binary_encoding_id: None,
            xml_encoding_id: None,
            namespace_uri: namespace_uri.into(),
            structure_kind,
            fields,
            optional_bits,
        })
    }

    pub fn structure_kind(&self) -> StructureKind {
        self.structure_kind
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Mask bit of the field at `index`, if it is a counted optional field.
    pub fn optional_bit(&self, index: usize) -> Option<u32> {
        self.optional_bits.get(index).copied().flatten()
    }

    /// Mask with every defined optional bit set.
    pub fn optional_mask(&self) -> u32 {
        self.optional_bits
            .iter()
            .flatten()
            .fold(0u32, |mask, bit| mask | (1 << bit))
    }

    /// True if the field at `index` must be present on the wire.
    pub fn is_mandatory(&self, index: usize) -> bool {
        match self.structure_kind {
            StructureKind::Plain => true,
            StructureKind::WithOptionalFields => self.optional_bit(index).is_none(),
            StructureKind::Union => false,
        }
    }

    /// True if values laid out for `other` fit this descriptor unchanged:
    /// same type id, structure kind and field list.
    pub fn is_layout_compatible(&self, other: &StructureDescriptor) -> bool {
        std::ptr::eq(self, other)
            || (self.type_id == other.type_id
                && self.structure_kind == other.structure_kind
                && self.fields == other.fields)
    }

    /// Encoding ids this descriptor can be found under.
    pub fn encoding_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.binary_encoding_id
            .iter()
            .chain(self.xml_encoding_id.iter())
    }

    /// True if this type or any nested field type has `type_id`.
    pub fn references(&self, type_id: &NodeId) -> bool {
        self.fields.iter().any(|f| match &f.field_type {
            FieldType::Structure(s) => &s.type_id == type_id || s.references(type_id),
            FieldType::Enumeration(e) => &e.type_id == type_id,
            FieldType::Builtin(_) => false,
        })
    }
}

/// One named enumeration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    pub name: String,
    pub value: i32,
}

/// Ordered name/value table of an enumeration type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDescriptor {
    pub name: String,
    pub type_id: NodeId,
    pub namespace_uri: String,
    values: Vec<EnumValue>,
}

impl EnumDescriptor {
    /// Duplicate names are rejected; duplicate values are allowed.
    pub fn new(
        name: impl Into<String>,
        type_id: NodeId,
        namespace_uri: impl Into<String>,
        values: Vec<EnumValue>,
    ) -> std::result::Result<Self, SchemaError> {
        let name = name.into();
        for (index, v) in values.iter().enumerate() {
            if values[..index].iter().any(|prev| prev.name == v.name) {
                return Err(SchemaError::DuplicateEnumName {
                    enumeration: name,
                    name: v.name.clone(),
                });
            }
        }
        Ok(Self {
            name,
            type_id,
            namespace_uri: namespace_uri.into(),
            values,
        })
    }

    pub fn values(&self) -> &[EnumValue] {
        &self.values
    }

    /// First name declared for `value`.
    pub fn name_of(&self, value: i32) -> Option<&str> {
        self.values
            .iter()
            .find(|v| v.value == value)
            .map(|v| v.name.as_str())
    }

    pub fn value_of(&self, name: &str) -> Option<i32> {
        self.values.iter().find(|v| v.name == name).map(|v| v.value)
    }

    pub fn contains(&self, value: i32) -> bool {
        self.values.iter().any(|v| v.value == value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str, kind: ValueKind) -> FieldDescriptor {
        FieldDescriptor::new(name, FieldType::Builtin(kind))
    }

    #[test]
    fn test_optional_bits_skip_mandatory_fields() {
        let desc = StructureDescriptor::new(
            "Reading",
            NodeId::numeric(2, 1),
            "urn:test",
            StructureKind::WithOptionalFields,
            vec![
                field("a", ValueKind::Int32).optional(),
                field("b", ValueKind::Int32),
                field("c", ValueKind::String).optional(),
            ],
        )
        .expect("valid");
        assert_eq!(desc.optional_bit(0), Some(0));
        assert_eq!(desc.optional_bit(1), None);
        assert_eq!(desc.optional_bit(2), Some(1));
        assert_eq!(desc.optional_mask(), 0b11);
        assert!(desc.is_mandatory(1));
        assert!(!desc.is_mandatory(2));
    }

    #[test]
    fn test_optional_flag_ignored_outside_optional_structures() {
        let desc = StructureDescriptor::new(
            "Plain",
            NodeId::numeric(2, 2),
            "",
            StructureKind::Plain,
            vec![field("a", ValueKind::Int32).optional()],
        )
        .expect("valid");
        assert_eq!(desc.optional_bit(0), None);
        assert!(desc.is_mandatory(0));
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let err = StructureDescriptor::new(
            "Dup",
            NodeId::numeric(2, 3),
            "",
            StructureKind::Plain,
            vec![field("a", ValueKind::Int32), field("a", ValueKind::Double)],
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateField { .. }));
    }

    #[test]
    fn test_optional_field_limit() {
        let fields = (0..33)
            .map(|i| field(&format!("f{}", i), ValueKind::Byte).optional())
            .collect();
        let err = StructureDescriptor::new(
            "Wide",
            NodeId::numeric(2, 4),
            "",
            StructureKind::WithOptionalFields,
            fields,
        )
        .unwrap_err();
        assert_eq!(
            err,
            SchemaError::TooManyOptionalFields {
                structure: "Wide".into(),
                count: 33,
                max: 32
            }
        );
    }

    #[test]
    fn test_bare_structure_kind_rejected() {
        let err = StructureDescriptor::new(
            "Bad",
            NodeId::numeric(2, 5),
            "",
            StructureKind::Plain,
            vec![field("s", ValueKind::Structure)],
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::UnsupportedFieldKind { .. }));
    }

    #[test]
    fn test_enum_lookup() {
        let desc = EnumDescriptor::new(
            "Mode",
            NodeId::numeric(2, 10),
            "",
            vec![
                EnumValue {
                    name: "Off".into(),
                    value: 0,
                },
                EnumValue {
                    name: "Auto".into(),
                    value: 5,
                },
                EnumValue {
                    name: "Automatic".into(),
                    value: 5,
                },
            ],
        )
        .expect("duplicate values are legal");
        assert_eq!(desc.name_of(5), Some("Auto"));
        assert_eq!(desc.value_of("Automatic"), Some(5));
        assert!(!desc.contains(1));
    }

    #[test]
    fn test_check_value_rank_and_kind() {
        let f = field("v", ValueKind::Double).array();
        assert!(f.check_value(&Value::from(vec![1.0f64])).is_ok());
        assert!(matches!(
            f.check_value(&Value::Double(1.0)),
            Err(Error::TypeMismatch { .. })
        ));
        assert!(f.check_value(&Value::from(vec![1.0f32])).is_err());
    }
}
