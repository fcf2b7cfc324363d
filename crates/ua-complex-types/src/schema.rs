// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema source types: structure and enumeration definitions as a server
//! publishes them, keyed by protocol type id.
//!
//! With the `schema-loaders` feature a [`SchemaDictionary`] deserializes from
//! JSON or YAML:
//!
//! ```yaml
//! namespace_uri: urn:factory:line1
//! enumerations:
//!   - type_id: ns=2;i=3001
//!     name: Mode
//!     values:
//!       - { name: Off, value: 0 }
//!       - { name: Auto, value: 1 }
//! structures:
//!   - type_id: ns=2;i=3002
//!     name: Point
//!     structure_kind: WithOptionalFields
//!     binary_encoding_id: ns=2;i=5002
//!     fields:
//!       - { name: x, type: Double }
//!       - { name: y, type: Double }
//!       - { name: label, type: String, is_optional: true }
//!       - { name: mode, type: "ns=2;i=3001" }
//! ```
//!
//! A field `type` is either a built-in kind name or the type id of another
//! enumeration or structure.

use crate::dynamic::StructureKind;
use crate::types::{NodeId, ValueKind};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "schema-loaders")]
use crate::error::{Error, Result};
#[cfg(feature = "schema-loaders")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "schema-loaders")]
use std::path::Path;

/// Declared type of a schema field.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "schema-loaders",
    derive(Serialize, Deserialize),
    serde(try_from = "String", into = "String")
)]
pub enum SchemaFieldType {
    Builtin(ValueKind),
    /// Enumeration, structure, or built-in referenced by type id.
    Named(NodeId),
}

impl fmt::Display for SchemaFieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin(kind) => write!(f, "{}", kind),
            Self::Named(id) => write!(f, "{}", id),
        }
    }
}

impl FromStr for SchemaFieldType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if let Some(kind) = ValueKind::from_name(s) {
            return Ok(Self::Builtin(kind));
        }
        s.parse::<NodeId>()
            .map(Self::Named)
            .map_err(|e| format!("field type '{}' is neither a built-in kind nor a type id ({})", s, e))
    }
}

impl TryFrom<String> for SchemaFieldType {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SchemaFieldType> for String {
    fn from(value: SchemaFieldType) -> Self {
        value.to_string()
    }
}

/// One field of a schema structure.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "schema-loaders", derive(Serialize, Deserialize))]
pub struct SchemaField {
    pub name: String,
    #[cfg_attr(feature = "schema-loaders", serde(rename = "type"))]
    pub field_type: SchemaFieldType,
    #[cfg_attr(feature = "schema-loaders", serde(default))]
    pub is_array: bool,
    #[cfg_attr(feature = "schema-loaders", serde(default))]
    pub is_optional: bool,
}

impl SchemaField {
    pub fn new(name: impl Into<String>, field_type: SchemaFieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            is_array: false,
            is_optional: false,
        }
    }

    pub fn array(mut self) -> Self {
        self.is_array = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.is_optional = true;
        self
    }
}

/// Structure definition.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "schema-loaders", derive(Serialize, Deserialize))]
pub struct SchemaStructure {
    pub name: String,
    #[cfg_attr(feature = "schema-loaders", serde(default))]
    pub structure_kind: StructureKind,
    #[cfg_attr(feature = "schema-loaders", serde(default))]
    pub binary_encoding_id: Option<NodeId>,
    #[cfg_attr(feature = "schema-loaders", serde(default))]
    pub xml_encoding_id: Option<NodeId>,
    #[cfg_attr(feature = "schema-loaders", serde(default))]
    pub fields: Vec<SchemaField>,
}

impl SchemaStructure {
    pub fn new(name: impl Into<String>, structure_kind: StructureKind) -> Self {
        Self {
            name: name.into(),
            structure_kind,
            binary_encoding_id: None,
            xml_encoding_id: None,
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: SchemaField) -> Self {
        self.fields.push(field);
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

    /// Type ids referenced by fields (not resolved).
    pub fn referenced_type_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.fields.iter().filter_map(|f| match &f.field_type {
            SchemaFieldType::Named(id) => Some(id),
            SchemaFieldType::Builtin(_) => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "schema-loaders", derive(Serialize, Deserialize))]
pub struct SchemaEnumValue {
    pub name: String,
    pub value: i32,
}

/// Enumeration definition.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "schema-loaders", derive(Serialize, Deserialize))]
pub struct SchemaEnumeration {
    pub name: String,
    #[cfg_attr(feature = "schema-loaders", serde(default))]
    pub values: Vec<SchemaEnumValue>,
}

impl SchemaEnumeration {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
        }
    }

    pub fn value(mut self, name: impl Into<String>, value: i32) -> Self {
        self.values.push(SchemaEnumValue {
            name: name.into(),
            value,
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "schema-loaders", derive(Serialize, Deserialize))]
pub struct SchemaStructureEntry {
    pub type_id: NodeId,
    #[cfg_attr(feature = "schema-loaders", serde(flatten))]
    pub definition: SchemaStructure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "schema-loaders", derive(Serialize, Deserialize))]
pub struct SchemaEnumerationEntry {
    pub type_id: NodeId,
    #[cfg_attr(feature = "schema-loaders", serde(flatten))]
    pub definition: SchemaEnumeration,
}

/// All types one server namespace publishes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "schema-loaders", derive(Serialize, Deserialize))]
pub struct SchemaDictionary {
    pub namespace_uri: String,
    #[cfg_attr(feature = "schema-loaders", serde(default))]
    pub enumerations: Vec<SchemaEnumerationEntry>,
    #[cfg_attr(feature = "schema-loaders", serde(default))]
    pub structures: Vec<SchemaStructureEntry>,
}

impl SchemaDictionary {
    pub fn new(namespace_uri: impl Into<String>) -> Self {
        Self {
            namespace_uri: namespace_uri.into(),
            ..Self::default()
        }
    }

    pub fn enumeration(mut self, type_id: NodeId, definition: SchemaEnumeration) -> Self {
        self.enumerations.push(SchemaEnumerationEntry {
            type_id,
            definition,
        });
        self
    }

    pub fn structure(mut self, type_id: NodeId, definition: SchemaStructure) -> Self {
        self.structures.push(SchemaStructureEntry {
            type_id,
            definition,
        });
        self
    }
}

#[cfg(feature = "schema-loaders")]
impl SchemaDictionary {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("Invalid schema dictionary JSON: {}", e)))
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| Error::Config(format!("Invalid schema dictionary YAML: {}", e)))
    }

    /// Load a `.json` file, or YAML for any other extension.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        if crate::config::is_json(path) {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }
}
