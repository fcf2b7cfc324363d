// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Descriptor construction: from schema entries, or through a fluent builder.

use crate::dynamic::{
    EnumDescriptor, EnumValue, FieldDescriptor, FieldType, StructureDescriptor, StructureKind,
};
use crate::error::SchemaError;
use crate::schema::{SchemaEnumeration, SchemaFieldType, SchemaStructure};
use crate::types::{Identifier, NodeId, ValueKind};
use std::sync::Arc;

/// Resolves type ids referenced by schema fields.
pub trait TypeResolver {
    fn resolve_structure(&self, type_id: &NodeId) -> Option<Arc<StructureDescriptor>>;
    fn resolve_enumeration(&self, type_id: &NodeId) -> Option<Arc<EnumDescriptor>>;
}

/// Resolver that knows no schema types; only built-in ids resolve.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinOnly;

impl TypeResolver for BuiltinOnly {
    fn resolve_structure(&self, _type_id: &NodeId) -> Option<Arc<StructureDescriptor>> {
        None
    }

    fn resolve_enumeration(&self, _type_id: &NodeId) -> Option<Arc<EnumDescriptor>> {
        None
    }
}

/// Built-in data types are addressed as `ns=0;i=1..=25`.
pub(crate) fn builtin_for_type_id(type_id: &NodeId) -> Option<ValueKind> {
    match (type_id.namespace_index, &type_id.identifier) {
        (0, Identifier::Numeric(id)) => u8::try_from(*id)
            .ok()
            .and_then(ValueKind::from_builtin_type_id),
        _ => None,
    }
}

/// Resolve one schema field type.
pub(crate) fn resolve_field_type(
    structure: &str,
    field: &str,
    field_type: &SchemaFieldType,
    resolver: &dyn TypeResolver,
) -> Result<FieldType, SchemaError> {
    match field_type {
        SchemaFieldType::Builtin(kind) => Ok(FieldType::Builtin(*kind)),
        SchemaFieldType::Named(type_id) => {
            if let Some(kind) = builtin_for_type_id(type_id) {
                return Ok(FieldType::Builtin(kind));
            }
            if let Some(e) = resolver.resolve_enumeration(type_id) {
                return Ok(FieldType::Enumeration(e));
            }
            resolver
                .resolve_structure(type_id)
                .map(FieldType::Structure)
                .ok_or_else(|| SchemaError::UnresolvedType {
                    structure: structure.to_string(),
                    field: field.to_string(),
                    type_id: type_id.clone(),
                })
        }
    }
}

/// Compile a schema structure into a descriptor.
///
/// Field order is kept exactly as declared.
pub fn build_structure(
    schema: &SchemaStructure,
    type_id: NodeId,
    namespace_uri: &str,
    resolver: &dyn TypeResolver,
) -> Result<StructureDescriptor, SchemaError> {
    let mut fields = Vec::with_capacity(schema.fields.len());
    for field in &schema.fields {
        let field_type = resolve_field_type(&schema.name, &field.name, &field.field_type, resolver)?;
        fields.push(FieldDescriptor {
            name: field.name.clone(),
            field_type,
            is_array: field.is_array,
            is_optional: field.is_optional,
        });
    }

    let mut desc = StructureDescriptor::new(
        schema.name.clone(),
        type_id,
        namespace_uri,
        schema.structure_kind,
        fields,
    )?;
    desc.binary_encoding_id = schema.binary_encoding_id.clone();
    desc.xml_encoding_id = schema.xml_encoding_id.clone();
    Ok(desc)
}

/// Compile a schema enumeration into a descriptor.
pub fn build_enumeration(
    schema: &SchemaEnumeration,
    type_id: NodeId,
    namespace_uri: &str,
) -> Result<EnumDescriptor, SchemaError> {
    let values = schema
        .values
        .iter()
        .map(|v| EnumValue {
            name: v.name.clone(),
            value: v.value,
        })
        .collect();
    EnumDescriptor::new(schema.name.clone(), type_id, namespace_uri, values)
}

/// Fluent builder for [`StructureDescriptor`].
///
/// ```
/// use ua_complex_types::dynamic::{StructureBuilder, StructureKind};
/// use ua_complex_types::types::{NodeId, ValueKind};
///
/// let point = StructureBuilder::new("Point", NodeId::numeric(2, 3001))
///     .kind(StructureKind::WithOptionalFields)
///     .field("x", ValueKind::Double)
///     .field("y", ValueKind::Double)
///     .optional_field("label", ValueKind::String)
///     .build()
///     .unwrap();
/// assert_eq!(point.field_count(), 3);
/// ```
#[derive(Debug)]
pub struct StructureBuilder {
    name: String,
    type_id: NodeId,
    namespace_uri: String,
    kind: StructureKind,
    binary_encoding_id: Option<NodeId>,
    xml_encoding_id: Option<NodeId>,
    fields: Vec<FieldDescriptor>,
}

impl StructureBuilder {
    pub fn new(name: impl Into<String>, type_id: NodeId) -> Self {
        Self {
            name: name.into(),
            type_id,
            namespace_uri: String::new(),
            kind: StructureKind::Plain,
            binary_encoding_id: None,
            xml_encoding_id: None,
            fields: Vec::new(),
        }
    }

    pub fn namespace(mut self, namespace_uri: impl Into<String>) -> Self {
        self.namespace_uri = namespace_uri.into();
        self
    }

    pub fn kind(mut self, kind: StructureKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn binary_encoding_id(mut self, id: NodeId) -> Self {
        self.binary_encoding_id = Some(id);
        self
    }

    pub fn xml_encoding_id(mut self, id: NodeId) -> Self {
        self.xml_encoding_id = Some(id);
        self
    }

    /// Add a built-in scalar field.
    pub fn field(self, name: impl Into<String>, kind: ValueKind) -> Self {
        self.field_descriptor(FieldDescriptor::new(name, FieldType::Builtin(kind)))
    }

    /// Add a built-in array field.
    pub fn array_field(self, name: impl Into<String>, kind: ValueKind) -> Self {
        self.field_descriptor(FieldDescriptor::new(name, FieldType::Builtin(kind)).array())
    }

    /// Add an optional built-in scalar field.
    pub fn optional_field(self, name: impl Into<String>, kind: ValueKind) -> Self {
        self.field_descriptor(FieldDescriptor::new(name, FieldType::Builtin(kind)).optional())
    }

    pub fn enum_field(self, name: impl Into<String>, enumeration: Arc<EnumDescriptor>) -> Self {
        self.field_descriptor(FieldDescriptor::new(
            name,
            FieldType::Enumeration(enumeration),
        ))
    }

    /// Add a nested structure field.
    pub fn structure_field(
        self,
        name: impl Into<String>,
        structure: Arc<StructureDescriptor>,
    ) -> Self {
        self.field_descriptor(FieldDescriptor::new(name, FieldType::Structure(structure)))
    }

    /// Add a fully specified field.
    pub fn field_descriptor(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn build(self) -> Result<Arc<StructureDescriptor>, SchemaError> {
        let mut desc = StructureDescriptor::new(
            self.name,
            self.type_id,
            self.namespace_uri,
            self.kind,
            self.fields,
        )?;
        desc.binary_encoding_id = self.binary_encoding_id;
        desc.xml_encoding_id = self.xml_encoding_id;
        Ok(Arc::new(desc))
    }
}

/// Fluent builder for [`EnumDescriptor`].
#[derive(Debug)]
pub struct EnumBuilder {
    name: String,
    type_id: NodeId,
    namespace_uri: String,
    values: Vec<EnumValue>,
}

impl EnumBuilder {
    pub fn new(name: impl Into<String>, type_id: NodeId) -> Self {
        Self {
            name: name.into(),
            type_id,
            namespace_uri: String::new(),
            values: Vec::new(),
        }
    }

    pub fn namespace(mut self, namespace_uri: impl Into<String>) -> Self {
        self.namespace_uri = namespace_uri.into();
        self
    }

    pub fn value(mut self, name: impl Into<String>, value: i32) -> Self {
        self.values.push(EnumValue {
            name: name.into(),
            value,
        });
        self
    }

    pub fn build(self) -> Result<Arc<EnumDescriptor>, SchemaError> {
        EnumDescriptor::new(self.name, self.type_id, self.namespace_uri, self.values).map(Arc::new)
    }
}
