// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type registry: descriptors keyed by type id.
//!
//! # Concurrency
//!
//! - Descriptors are built completely outside the table lock, then inserted
//!   under one write lock; readers never see a half-registered type.
//! - A whole dictionary is staged first and published in a single write.
//! - Codec limits sit behind an `ArcSwap` and can be replaced at any time.
//! - Instances keep the `Arc` they were created with, so replacing a type id
//!   never changes existing instances.

use crate::config::CodecLimits;
use crate::dynamic::builder::{build_enumeration, build_structure, builtin_for_type_id, TypeResolver};
use crate::dynamic::{ComplexData, EnumDescriptor, StructureDescriptor};
use crate::encoding::{BinaryDecoder, BinaryEncoder};
use crate::error::{DecodeError, Error, Result, SchemaError};
use crate::schema::{SchemaDictionary, SchemaEnumeration, SchemaStructure, SchemaStructureEntry};
use crate::types::{ExtensionObject, ExtensionObjectBody, NodeId};
use arc_swap::ArcSwap;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Default)]
struct TypeTable {
    structures: HashMap<NodeId, Arc<StructureDescriptor>>,
    enumerations: HashMap<NodeId, Arc<EnumDescriptor>>,
    /// Binary / XML encoding id -> structure type id.
    encodings: HashMap<NodeId, NodeId>,
}

impl TypeTable {
    /// Insert or replace; returns true if a type was replaced.
    fn insert_structure(&mut self, desc: Arc<StructureDescriptor>) -> bool {
        let previous = self.structures.insert(desc.type_id.clone(), desc.clone());
        if let Some(old) = &previous {
            self.release_encodings(old);
        }
        for id in desc.encoding_ids() {
            if let Some(owner) = self.encodings.insert(id.clone(), desc.type_id.clone()) {
                if owner != desc.type_id {
                    log::warn!(
                        "[registry] encoding id {} moved from {} to {}",
                        id,
                        owner,
                        desc.type_id
                    );
                }
            }
        }
        previous.is_some()
    }

    fn remove_structure(&mut self, type_id: &NodeId) -> Option<Arc<StructureDescriptor>> {
        let old = self.structures.remove(type_id)?;
        self.release_encodings(&old);
        Some(old)
    }

    /// Drop the encoding ids of `old` that still point at its type id.
    fn release_encodings(&mut self, old: &StructureDescriptor) {
        for id in old.encoding_ids() {
            if self.encodings.get(id) == Some(&old.type_id) {
                self.encodings.remove(id);
            }
        }
    }

    fn insert_enumeration(&mut self, desc: Arc<EnumDescriptor>) -> bool {
        self.enumerations
            .insert(desc.type_id.clone(), desc)
            .is_some()
    }
}

/// Counts from [`TypeRegistry::load_dictionary`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub enumerations: usize,
    pub structures: usize,
    /// Entries that replaced an already registered type id.
    pub replaced: usize,
}

/// Thread-safe registry of structure and enumeration descriptors.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    table: RwLock<TypeTable>,
    limits: ArcSwap<CodecLimits>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: CodecLimits) -> Self {
        Self {
            table: RwLock::default(),
            limits: ArcSwap::from_pointee(limits),
        }
    }

    /// Limits applied by [`decode`](Self::decode) and extension object decoding.
    pub fn limits(&self) -> CodecLimits {
        **self.limits.load()
    }

    pub fn set_limits(&self, limits: CodecLimits) {
        self.limits.store(Arc::new(limits));
        log::debug!("[registry] codec limits updated: {:?}", limits);
    }

    /// Build and register an enumeration (last write wins).
    pub fn register_enum(
        &self,
        schema: &SchemaEnumeration,
        type_id: NodeId,
        namespace_uri: &str,
    ) -> Result<Arc<EnumDescriptor>> {
        let desc = Arc::new(build_enumeration(schema, type_id, namespace_uri)?);
        self.insert_enumeration(desc.clone());
        Ok(desc)
    }

    /// Build and register a structure (last write wins).
    ///
    /// Nested types must already be registered.
    pub fn register_struct(
        &self,
        schema: &SchemaStructure,
        type_id: NodeId,
        namespace_uri: &str,
    ) -> Result<Arc<StructureDescriptor>> {
        let desc = build_structure(schema, type_id, namespace_uri, self)?;
        if desc.references(&desc.type_id) {
            return Err(SchemaError::RecursiveType {
                type_id: desc.type_id.clone(),
            }
            .into());
        }
        let desc = Arc::new(desc);
        self.insert_structure(desc.clone());
        Ok(desc)
    }

    /// Register a descriptor built elsewhere (e.g. with `StructureBuilder`).
    pub fn insert_structure(&self, desc: Arc<StructureDescriptor>) {
        let replaced = self.table.write().insert_structure(desc.clone());
        if replaced {
            log::debug!("[registry] replaced structure {} ({})", desc.name, desc.type_id);
        } else {
            log::debug!("[registry] registered structure {} ({})", desc.name, desc.type_id);
        }
    }

    pub fn insert_enumeration(&self, desc: Arc<EnumDescriptor>) {
        let replaced = self.table.write().insert_enumeration(desc.clone());
        log::debug!(
            "[registry] {} enumeration {} ({})",
            if replaced { "replaced" } else { "registered" },
            desc.name,
            desc.type_id
        );
    }

    /// Register every type of a dictionary.
    ///
    /// Enumerations come first, then structures in dependency order; references
    /// resolve against the dictionary, then against already registered types.
    /// Nothing is published unless the whole dictionary builds.
    pub fn load_dictionary(&self, dictionary: &SchemaDictionary) -> Result<LoadReport> {
        let ns = dictionary.namespace_uri.as_str();

        let mut enumerations = HashMap::new();
        for entry in &dictionary.enumerations {
            let desc = build_enumeration(&entry.definition, entry.type_id.clone(), ns)?;
            enumerations.insert(entry.type_id.clone(), Arc::new(desc));
        }

        let pending: HashMap<&NodeId, &SchemaStructureEntry> = dictionary
            .structures
            .iter()
            .map(|entry| (&entry.type_id, entry))
            .collect();
        let mut staging = Staging {
            registry: self,
            namespace_uri: ns,
            pending,
            enumerations,
            structures: HashMap::new(),
            in_progress: Vec::new(),
        };
        for entry in &dictionary.structures {
            staging.stage(&entry.type_id)?;
        }

        let mut report = LoadReport {
            enumerations: staging.enumerations.len(),
            structures: staging.structures.len(),
            replaced: 0,
        };
        {
            let mut table = self.table.write();
            for desc in staging.enumerations.into_values() {
                report.replaced += table.insert_enumeration(desc) as usize;
            }
            for desc in staging.structures.into_values() {
                report.replaced += table.insert_structure(desc) as usize;
            }
        }
        log::debug!(
            "[registry] loaded dictionary {}: {} enumerations, {} structures, {} replaced",
            ns,
            report.enumerations,
            report.structures,
            report.replaced
        );
        Ok(report)
    }

    pub fn structure(&self, type_id: &NodeId) -> Option<Arc<StructureDescriptor>> {
        self.table.read().structures.get(type_id).cloned()
    }

    pub fn enumeration(&self, type_id: &NodeId) -> Option<Arc<EnumDescriptor>> {
        self.table.read().enumerations.get(type_id).cloned()
    }

    /// Look up a structure through its binary or XML encoding id.
    pub fn structure_by_encoding_id(&self, encoding_id: &NodeId) -> Option<Arc<StructureDescriptor>> {
        let table = self.table.read();
        let type_id = table.encodings.get(encoding_id)?;
        table.structures.get(type_id).cloned()
    }

    /// Drop a structure or enumeration. Existing instances are unaffected.
    pub fn remove(&self, type_id: &NodeId) -> bool {
        let mut table = self.table.write();
        if let Some(old) = table.remove_structure(type_id) {
            log::debug!("[registry] removed structure {} ({})", old.name, type_id);
            return true;
        }
        table.enumerations.remove(type_id).is_some()
    }

    /// Registered structures and enumerations.
    pub fn len(&self) -> usize {
        let table = self.table.read();
        table.structures.len() + table.enumerations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All registered type ids, structures then enumerations.
    pub fn type_ids(&self) -> Vec<NodeId> {
        let table = self.table.read();
        table
            .structures
            .keys()
            .chain(table.enumerations.keys())
            .cloned()
            .collect()
    }

    /// Empty instance of a registered structure.
    pub fn new_instance(&self, type_id: &NodeId) -> Result<ComplexData> {
        let desc = self
            .structure(type_id)
            .ok_or_else(|| Error::UnknownType(type_id.clone()))?;
        Ok(ComplexData::new(&desc))
    }

    /// Decode a binary body of a registered structure with the current limits.
    pub fn decode(&self, type_id: &NodeId, bytes: &[u8]) -> Result<ComplexData> {
        let desc = self
            .structure(type_id)
            .ok_or_else(|| Error::UnknownType(type_id.clone()))?;
        let mut decoder = BinaryDecoder::with_limits(bytes, self.limits());
        ComplexData::decode_new(&desc, &mut decoder)
    }

    /// Resolve and decode the body of an extension object.
    ///
    /// The extension object's type id may be an encoding id or the type id.
    pub fn decode_extension_object(&self, object: &ExtensionObject) -> Result<ComplexData> {
        let desc = self
            .structure_by_encoding_id(&object.type_id)
            .or_else(|| self.structure(&object.type_id))
            .ok_or_else(|| Error::UnknownType(object.type_id.clone()))?;
        match &object.body {
            ExtensionObjectBody::None => Ok(ComplexData::new(&desc)),
            ExtensionObjectBody::Binary(bytes) => {
                let mut decoder = BinaryDecoder::with_limits(bytes, self.limits());
                ComplexData::decode_new(&desc, &mut decoder)
            }
            ExtensionObjectBody::Xml(_) => Err(DecodeError::InvalidData {
                field: desc.name.clone(),
                reason: "XML extension object bodies are not supported".to_string(),
            }
            .into()),
        }
    }

    /// Wrap an instance as a binary extension object.
    ///
    /// Uses the binary encoding id, or the type id when none is declared.
    pub fn encode_extension_object(&self, data: &ComplexData) -> Result<ExtensionObject> {
        let desc = data.descriptor();
        let type_id = desc
            .binary_encoding_id
            .clone()
            .unwrap_or_else(|| desc.type_id.clone());
        let mut encoder = BinaryEncoder::new();
        data.encode(&mut encoder)?;
        Ok(ExtensionObject::binary(type_id, encoder.into_bytes()))
    }
}

impl TypeResolver for TypeRegistry {
    fn resolve_structure(&self, type_id: &NodeId) -> Option<Arc<StructureDescriptor>> {
        self.structure(type_id)
    }

    fn resolve_enumeration(&self, type_id: &NodeId) -> Option<Arc<EnumDescriptor>> {
        self.enumeration(type_id)
    }
}

/// Dictionary types built so far, resolved before the registry.
struct Staging<'a> {
    registry: &'a TypeRegistry,
    namespace_uri: &'a str,
    pending: HashMap<&'a NodeId, &'a SchemaStructureEntry>,
    enumerations: HashMap<NodeId, Arc<EnumDescriptor>>,
    structures: HashMap<NodeId, Arc<StructureDescriptor>>,
    in_progress: Vec<NodeId>,
}

impl Staging<'_> {
    /// Depth-first build of one dictionary structure and its dependencies.
    fn stage(&mut self, type_id: &NodeId) -> Result<()> {
        if self.structures.contains_key(type_id) {
            return Ok(());
        }
        if self.in_progress.contains(type_id) {
            return Err(SchemaError::RecursiveType {
                type_id: type_id.clone(),
            }
            .into());
        }
        let Some(entry) = self.pending.get(type_id).copied() else {
            return Ok(());
        };

        self.in_progress.push(type_id.clone());
        for dep in entry.definition.referenced_type_ids() {
            if builtin_for_type_id(dep).is_none() && !self.enumerations.contains_key(dep) {
                self.stage(dep)?;
            }
        }
        let desc = build_structure(
            &entry.definition,
            entry.type_id.clone(),
            self.namespace_uri,
            &*self,
        )?;
        self.in_progress.pop();
        self.structures.insert(type_id.clone(), Arc::new(desc));
        Ok(())
    }
}

impl TypeResolver for Staging<'_> {
    fn resolve_structure(&self, type_id: &NodeId) -> Option<Arc<StructureDescriptor>> {
        self.structures
            .get(type_id)
            .cloned()
            .or_else(|| self.registry.structure(type_id))
    }

    fn resolve_enumeration(&self, type_id: &NodeId) -> Option<Arc<EnumDescriptor>> {
        self.enumerations
            .get(type_id)
            .cloned()
            .or_else(|| self.registry.enumeration(type_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamic::{StructureBuilder, StructureKind};
    use crate::schema::{SchemaField, SchemaFieldType};
    use crate::types::ValueKind;

    fn builtin(name: &str, kind: ValueKind) -> SchemaField {
        SchemaField::new(name, SchemaFieldType::Builtin(kind))
    }

    fn named(name: &str, type_id: NodeId) -> SchemaField {
        SchemaField::new(name, SchemaFieldType::Named(type_id))
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = TypeRegistry::new();
        let schema = SchemaStructure::new("Point", StructureKind::Plain)
            .binary_encoding_id(NodeId::numeric(2, 5001))
            .field(builtin("x", ValueKind::Double));
        let desc = registry
            .register_struct(&schema, NodeId::numeric(2, 3001), "urn:a")
            .expect("register");

        assert_eq!(registry.len(), 1);
        assert!(Arc::ptr_eq(
            &registry.structure(&NodeId::numeric(2, 3001)).unwrap(),
            &desc
        ));
        assert!(Arc::ptr_eq(
            &registry
                .structure_by_encoding_id(&NodeId::numeric(2, 5001))
                .unwrap(),
            &desc
        ));
    }

    #[test]
    fn test_replacing_type_keeps_encoding_id_taken_by_other_type() {
        let registry = TypeRegistry::new();
        let shared = NodeId::numeric(2, 500);
        let first = NodeId::numeric(2, 3001);
        let second = NodeId::numeric(2, 3002);
        let schema = |encoding: NodeId| {
            SchemaStructure::new("Tagged", StructureKind::Plain)
                .binary_encoding_id(encoding)
                .field(builtin("x", ValueKind::Int32))
        };

        registry
            .register_struct(&schema(shared.clone()), first.clone(), "urn:a")
            .expect("first");
        let owner = registry
            .register_struct(&schema(shared.clone()), second.clone(), "urn:a")
            .expect("second");
        registry
            .register_struct(&schema(NodeId::numeric(2, 501)), first.clone(), "urn:a")
            .expect("first again");

        let found = registry.structure_by_encoding_id(&shared).expect("still mapped");
        assert!(Arc::ptr_eq(&found, &owner));

        // Removing the previous holder leaves the live mapping alone too.
        registry
            .register_struct(&schema(shared.clone()), first.clone(), "urn:a")
            .expect("first takes it back");
        assert!(registry.remove(&second));
        assert_eq!(
            registry.structure_by_encoding_id(&shared).map(|d| d.type_id.clone()),
            Some(first)
        );
    }

    #[test]
    fn test_register_struct_needs_nested_types() {
        let registry = TypeRegistry::new();
        let schema = SchemaStructure::new("Outer", StructureKind::Plain)
            .field(named("inner", NodeId::numeric(2, 1)));
        let err = registry
            .register_struct(&schema, NodeId::numeric(2, 2), "")
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Schema(SchemaError::UnresolvedType { .. })
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_replacing_type_moves_encoding_ids() {
        let registry = TypeRegistry::new();
        let id = NodeId::numeric(2, 10);
        let v1 = SchemaStructure::new("V", StructureKind::Plain)
            .binary_encoding_id(NodeId::numeric(2, 11))
            .field(builtin("a", ValueKind::Int32));
        let v2 = SchemaStructure::new("V", StructureKind::Plain)
            .binary_encoding_id(NodeId::numeric(2, 12))
            .field(builtin("a", ValueKind::Int32))
            .field(builtin("b", ValueKind::Int32));
        registry.register_struct(&v1, id.clone(), "").unwrap();
        registry.register_struct(&v2, id.clone(), "").unwrap();

        assert!(registry
            .structure_by_encoding_id(&NodeId::numeric(2, 11))
            .is_none());
        assert_eq!(
            registry
                .structure_by_encoding_id(&NodeId::numeric(2, 12))
                .map(|d| d.field_count()),
            Some(2)
        );
    }

    #[test]
    fn test_load_dictionary_dependency_order() {
        // Outer is listed before Inner and uses the enumeration.
        let dict = SchemaDictionary::new("urn:plant")
            .enumeration(
                NodeId::numeric(2, 1),
                SchemaEnumeration::new("Mode").value("Off", 0).value("On", 1),
            )
            .structure(
                NodeId::numeric(2, 3),
                SchemaStructure::new("Outer", StructureKind::Plain)
                    .field(named("inner", NodeId::numeric(2, 2)).array())
                    .field(named("mode", NodeId::numeric(2, 1))),
            )
            .structure(
                NodeId::numeric(2, 2),
                SchemaStructure::new("Inner", StructureKind::Plain)
                    .field(named("value", NodeId::numeric(0, 11))),
            );

        let registry = TypeRegistry::new();
        let report = registry.load_dictionary(&dict).expect("load");
        assert_eq!(
            report,
            LoadReport {
                enumerations: 1,
                structures: 2,
                replaced: 0
            }
        );
        let outer = registry.structure(&NodeId::numeric(2, 3)).unwrap();
        assert_eq!(outer.namespace_uri, "urn:plant");
        assert_eq!(outer.fields()[0].type_name(), "Inner[]");
        assert_eq!(outer.fields()[1].type_name(), "Mode");

        // Reloading replaces everything.
        let again = registry.load_dictionary(&dict).expect("reload");
        assert_eq!(again.replaced, 3);
    }

    #[test]
    fn test_load_dictionary_rejects_cycles_atomically() {
        let dict = SchemaDictionary::new("urn:loop")
            .structure(
                NodeId::numeric(2, 1),
                SchemaStructure::new("A", StructureKind::Plain)
                    .field(named("b", NodeId::numeric(2, 2))),
            )
            .structure(
                NodeId::numeric(2, 2),
                SchemaStructure::new("B", StructureKind::Plain)
                    .field(named("a", NodeId::numeric(2, 1))),
            )
            .structure(
                NodeId::numeric(2, 9),
                SchemaStructure::new("Fine", StructureKind::Plain)
                    .field(builtin("x", ValueKind::Byte)),
            );
        let registry = TypeRegistry::new();
        let err = registry.load_dictionary(&dict).unwrap_err();
        assert!(matches!(
            err,
            Error::Schema(SchemaError::RecursiveType { .. })
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_remove() {
        let registry = TypeRegistry::new();
        let desc = StructureBuilder::new("T", NodeId::numeric(2, 20))
            .binary_encoding_id(NodeId::numeric(2, 21))
            .build()
            .unwrap();
        registry.insert_structure(desc);
        assert!(registry.remove(&NodeId::numeric(2, 20)));
        assert!(registry
            .structure_by_encoding_id(&NodeId::numeric(2, 21))
            .is_none());
        assert!(!registry.remove(&NodeId::numeric(2, 20)));
    }

    #[test]
    fn test_limits_swap() {
        let registry = TypeRegistry::new();
        assert_eq!(registry.limits(), CodecLimits::default());
        let tight = CodecLimits {
            max_string_length: 4,
            ..CodecLimits::default()
        };
        registry.set_limits(tight);
        assert_eq!(registry.limits().max_string_length, 4);
    }

    #[test]
    fn test_unknown_type() {
        let registry = TypeRegistry::new();
        let id = NodeId::numeric(2, 404);
        assert_eq!(
            registry.new_instance(&id).unwrap_err(),
            Error::UnknownType(id.clone())
        );
        let object = ExtensionObject::binary(id.clone(), vec![]);
        assert_eq!(
            registry.decode_extension_object(&object).unwrap_err(),
            Error::UnknownType(id)
        );
    }
}
