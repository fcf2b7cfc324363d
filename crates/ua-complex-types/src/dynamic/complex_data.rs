// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Generic instance of a runtime structure type.

use crate::dynamic::codec;
use crate::dynamic::{FieldDescriptor, FieldType, StructureDescriptor, StructureKind};
use crate::encoding::{Decoder, Encoder};
use crate::error::{Error, Result};
use crate::types::{FromValue, NodeId, Value};
use std::sync::Arc;

/// Schema-bound value container: a descriptor plus one optional value per
/// field. Absent fields read as `None`, never as a default.
#[derive(Debug, Clone)]
pub struct ComplexData {
    descriptor: Arc<StructureDescriptor>,
    values: Vec<Option<Value>>,
}

impl ComplexData {
    /// Create an instance with every field absent.
    pub fn new(descriptor: &Arc<StructureDescriptor>) -> Self {
        Self {
            descriptor: descriptor.clone(),
            values: vec![None; descriptor.field_count()],
        }
    }

    /// Create an instance with every mandatory field set to its default.
    ///
    /// Optional fields and union members stay absent.
    pub fn with_defaults(descriptor: &Arc<StructureDescriptor>) -> Self {
        let values = descriptor
            .fields()
            .iter()
            .enumerate()
            .map(|(index, field)| {
                descriptor
                    .is_mandatory(index)
                    .then(|| field.default_value())
            })
            .collect();
        Self {
            descriptor: descriptor.clone(),
            values,
        }
    }

    /// Deep copy of `source` bound to `descriptor`.
    ///
    /// Fails with [`Error::Type`] when `source` has a different type id or
    /// was built from a descriptor with another field layout.
    pub fn copy_of(descriptor: &Arc<StructureDescriptor>, source: &ComplexData) -> Result<Self> {
        if source.type_id() != &descriptor.type_id {
            return Err(Error::Type(format!(
                "cannot copy {} ({}) into {} ({})",
                source.type_name(),
                source.type_id(),
                descriptor.name,
                descriptor.type_id
            )));
        }
        if !descriptor.is_layout_compatible(&source.descriptor) {
            return Err(Error::Type(format!(
                "{} ({}) layout differs from the source instance",
                descriptor.name, descriptor.type_id
            )));
        }
        Ok(Self {
            descriptor: descriptor.clone(),
            values: source.values.clone(),
        })
    }

    pub(crate) fn from_parts(descriptor: Arc<StructureDescriptor>, values: Vec<Option<Value>>) -> Self {
        debug_assert_eq!(values.len(), descriptor.field_count());
        Self { descriptor, values }
    }

    pub fn descriptor(&self) -> &Arc<StructureDescriptor> {
        &self.descriptor
    }

    pub fn type_id(&self) -> &NodeId {
        &self.descriptor.type_id
    }

    pub fn type_name(&self) -> &str {
        &self.descriptor.name
    }

    pub(crate) fn values(&self) -> &[Option<Value>] {
        &self.values
    }

    fn index_of(&self, name: &str) -> Result<usize> {
        self.descriptor
            .field_index(name)
            .ok_or_else(|| Error::FieldNotFound {
                structure: self.descriptor.name.clone(),
                field: name.to_string(),
            })
    }

    fn field_at(&self, index: usize) -> Result<&FieldDescriptor> {
        self.descriptor
            .fields()
            .get(index)
            .ok_or_else(|| Error::FieldNotFound {
                structure: self.descriptor.name.clone(),
                field: format!("#{}", index),
            })
    }

    /// Value of a field, `None` when absent or unknown.
    pub fn get(&self, name: &str) -> Option<&Value> {
        let index = self.descriptor.field_index(name)?;
        self.get_index(index)
    }

    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.values.get(index)?.as_ref()
    }

    /// Typed read: `Ok(None)` when absent, `TypeMismatch` on the wrong kind.
    pub fn get_as<T: FromValue>(&self, name: &str) -> Result<Option<T>> {
        let index = self.index_of(name)?;
        match &self.values[index] {
            None => Ok(None),
            Some(value) => T::from_value(value).map(Some).ok_or_else(|| {
                Error::TypeMismatch {
                    field: name.to_string(),
                    expected: std::any::type_name::<T>().to_string(),
                    found: value.type_name(),
                }
            }),
        }
    }

    /// Set a field. For unions, every other member is cleared.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let index = self.index_of(name)?;
        self.set_index(index, value)
    }

    pub fn set_index(&mut self, index: usize, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        self.field_at(index)?.check_value(&value)?;
        if self.descriptor.structure_kind() == StructureKind::Union {
            self.values.iter_mut().for_each(|v| *v = None);
        }
        self.values[index] = Some(value);
        Ok(())
    }

    /// Set an enumeration field by value name.
    pub fn set_enum_name(&mut self, name: &str, variant: &str) -> Result<()> {
        let index = self.index_of(name)?;
        let field = &self.descriptor.fields()[index];
        let value = match &field.field_type {
            FieldType::Enumeration(e) if !field.is_array => {
                e.value_of(variant).ok_or_else(|| Error::TypeMismatch {
                    field: name.to_string(),
                    expected: format!("a value of {}", e.name),
                    found: variant.to_string(),
                })?
            }
            _ => {
                return Err(Error::TypeMismatch {
                    field: name.to_string(),
                    expected: field.type_name(),
                    found: "enumeration name".to_string(),
                })
            }
        };
        self.set_index(index, Value::Enumeration(value))
    }

    /// Name of the enumeration value held by a field, if known.
    pub fn enum_name(&self, name: &str) -> Option<&str> {
        let field = self.descriptor.field(name)?;
        match (&field.field_type, self.get(name)?) {
            (FieldType::Enumeration(e), Value::Enumeration(v)) => e.name_of(*v),
            _ => None,
        }
    }

    /// Make a field absent, returning its previous value.
    pub fn clear(&mut self, name: &str) -> Result<Option<Value>> {
        let index = self.index_of(name)?;
        Ok(self.values[index].take())
    }

    pub fn is_present(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// For unions: the member that would be encoded (first present field).
    pub fn active_member(&self) -> Option<&FieldDescriptor> {
        self.values
            .iter()
            .position(Option::is_some)
            .map(|index| &self.descriptor.fields()[index])
    }

    /// Present fields in descriptor order.
    pub fn present_fields(&self) -> impl Iterator<Item = (&FieldDescriptor, &Value)> {
        self.descriptor
            .fields()
            .iter()
            .zip(&self.values)
            .filter_map(|(field, value)| value.as_ref().map(|v| (field, v)))
    }

    /// Encode through any [`Encoder`].
    pub fn encode<E: Encoder + ?Sized>(&self, encoder: &mut E) -> Result<()> {
        codec::encode_structure(encoder, self)
    }

    /// Decode into this instance. On error the instance is left unchanged.
    pub fn decode<D: Decoder + ?Sized>(&mut self, decoder: &mut D) -> Result<()> {
        let values = codec::decode_fields(decoder, &self.descriptor)?;
        self.values = values;
        Ok(())
    }

    /// Decode a new instance of `descriptor`.
    pub fn decode_new<D: Decoder + ?Sized>(
        descriptor: &Arc<StructureDescriptor>,
        decoder: &mut D,
    ) -> Result<Self> {
        let values = codec::decode_fields(decoder, descriptor)?;
        Ok(Self::from_parts(descriptor.clone(), values))
    }
}

impl PartialEq for ComplexData {
    fn eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        self.descriptor.is_layout_compatible(&other.descriptor) && self.values == other.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamic::{EnumBuilder, StructureBuilder};
    use crate::types::ValueKind;

    fn point() -> Arc<StructureDescriptor> {
        StructureBuilder::new("Point", NodeId::numeric(2, 100))
            .kind(StructureKind::WithOptionalFields)
            .field("x", ValueKind::Double)
            .field("y", ValueKind::Double)
            .optional_field("label", ValueKind::String)
            .build()
            .expect("point")
    }

    fn choice() -> Arc<StructureDescriptor> {
        StructureBuilder::new("Choice", NodeId::numeric(2, 101))
            .kind(StructureKind::Union)
            .field("a", ValueKind::Int32)
            .field("b", ValueKind::String)
            .build()
            .expect("choice")
    }

    #[test]
    fn test_new_instance_is_empty() {
        let data = ComplexData::new(&point());
        assert_eq!(data.get("x"), None);
        assert_eq!(data.present_fields().count(), 0);
    }

    #[test]
    fn test_with_defaults_skips_optional() {
        let data = ComplexData::with_defaults(&point());
        assert_eq!(data.get("x"), Some(&Value::Double(0.0)));
        assert_eq!(data.get("label"), None);

        let union = ComplexData::with_defaults(&choice());
        assert_eq!(union.active_member(), None);
    }

    #[test]
    fn test_set_and_get() {
        let mut data = ComplexData::new(&point());
        data.set("x", 1.5f64).unwrap();
        data.set("label", "A").unwrap();
        assert_eq!(data.get_as::<f64>("x").unwrap(), Some(1.5));
        assert_eq!(data.get_as::<String>("label").unwrap(), Some("A".to_string()));
        assert_eq!(data.get_as::<f64>("y").unwrap(), None);
        assert!(matches!(
            data.get_as::<i32>("x"),
            Err(Error::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_set_type_mismatch() {
        let mut data = ComplexData::new(&point());
        let err = data.set("x", 3i32).unwrap_err();
        assert_eq!(
            err,
            Error::TypeMismatch {
                field: "x".into(),
                expected: "Double".into(),
                found: "Int32".into(),
            }
        );
        assert!(matches!(
            data.set("x", vec![1.0f64]),
            Err(Error::TypeMismatch { .. })
        ));
        assert_eq!(data.get("x"), None);
    }

    #[test]
    fn test_unknown_field() {
        let mut data = ComplexData::new(&point());
        assert!(matches!(
            data.set("z", 1.0f64),
            Err(Error::FieldNotFound { .. })
        ));
        assert!(matches!(
            data.set_index(9, 1.0f64),
            Err(Error::FieldNotFound { .. })
        ));
        assert_eq!(data.get("z"), None);
    }

    #[test]
    fn test_union_set_clears_other_members() {
        let mut data = ComplexData::new(&choice());
        data.set("a", 7i32).unwrap();
        data.set("b", "hi").unwrap();
        assert_eq!(data.get("a"), None);
        assert_eq!(data.active_member().map(|f| f.name.as_str()), Some("b"));
    }

    #[test]
    fn test_nested_structure_type_checked() {
        let inner = point();
        let other = choice();
        let outer = StructureBuilder::new("Segment", NodeId::numeric(2, 102))
            .structure_field("start", inner.clone())
            .build()
            .unwrap();
        let mut data = ComplexData::new(&outer);
        assert!(data.set("start", ComplexData::new(&other)).is_err());
        data.set("start", ComplexData::new(&inner)).unwrap();
    }

    #[test]
    fn test_enum_by_name() {
        let mode = EnumBuilder::new("Mode", NodeId::numeric(2, 103))
            .value("Off", 0)
            .value("Auto", 4)
            .build()
            .unwrap();
        let desc = StructureBuilder::new("Drive", NodeId::numeric(2, 104))
            .enum_field("mode", mode)
            .build()
            .unwrap();
        let mut data = ComplexData::new(&desc);
        data.set_enum_name("mode", "Auto").unwrap();
        assert_eq!(data.get("mode"), Some(&Value::Enumeration(4)));
        assert_eq!(data.enum_name("mode"), Some("Auto"));
        assert!(data.set_enum_name("mode", "Manual").is_err());
    }

    #[test]
    fn test_clone_is_independent() {
        let mut a = ComplexData::new(&point());
        a.set("label", "A").unwrap();
        let mut b = ComplexData::copy_of(a.descriptor(), &a).unwrap();
        assert_eq!(a, b);
        b.set("label", "B").unwrap();
        assert_ne!(a, b);
        assert_eq!(a.get_as::<String>("label").unwrap(), Some("A".into()));
    }

    #[test]
    fn test_copy_of_rejects_other_type() {
        let a = ComplexData::new(&point());
        assert!(matches!(
            ComplexData::copy_of(&choice(), &a),
            Err(Error::Type(_))
        ));
    }

    #[test]
    fn test_equality_across_types() {
        let a = ComplexData::new(&point());
        let b = ComplexData::new(&choice());
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_clear() {
        let mut data = ComplexData::new(&point());
        data.set("y", 2.0f64).unwrap();
        assert_eq!(data.clear("y").unwrap(), Some(Value::Double(2.0)));
        assert!(!data.is_present("y"));
    }
}
