// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # ua-complex-types - Runtime complex types for OPC UA clients
//!
//! Represent, encode, decode, clone and compare structure instances whose
//! layout is only known at run time, from a server-supplied data type
//! dictionary.
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------------+
//! |                        Schema Dictionary                            |
//! |   SchemaStructure | SchemaEnumeration | JSON / YAML loaders         |
//! +---------------------------------------------------------------------+
//! |                          Type Registry                              |
//! |   StructureDescriptor | EnumDescriptor | encoding id index          |
//! +---------------------------------------------------------------------+
//! |                        Generic Instance                             |
//! |   ComplexData: get / set / clone / equality                         |
//! +---------------------------------------------------------------------+
//! |                    Codec + Encoder / Decoder                        |
//! |   Plain | WithOptionalFields | Union  ->  BinaryEncoder / Decoder   |
//! +---------------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`TypeRegistry`] | Descriptors keyed by type id, safe for concurrent use |
//! | [`ComplexData`] | Schema-bound value container |
//! | [`StructureDescriptor`] | Ordered field layout of one structure |
//! | [`Value`] | Any built-in value, enumeration, nested structure or array |
//! | [`Encoder`] / [`Decoder`] | Wire boundary; [`BinaryEncoder`] / [`BinaryDecoder`] implement it |
//!
//! ## Quick Start
//!
//! ```rust
//! use ua_complex_types::{SchemaDictionary, TypeRegistry};
//! use ua_complex_types::types::NodeId;
//!
//! # fn main() -> ua_complex_types::Result<()> {
//! let dictionary = SchemaDictionary::from_yaml_str(r#"
//! namespace_uri: "urn:example:plant"
//! structures:
//!   - type_id: "ns=2;i=3001"
//!     name: Choice
//!     structure_kind: Union
//!     fields:
//!       - { name: a, type: Int32 }
//!       - { name: b, type: String }
//! "#)?;
//!
//! let registry = TypeRegistry::new();
//! registry.load_dictionary(&dictionary)?;
//!
//! let mut choice = registry.new_instance(&NodeId::numeric(2, 3001))?;
//! choice.set("b", "hi")?;
//! let object = registry.encode_extension_object(&choice)?;
//! assert_eq!(registry.decode_extension_object(&object)?, choice);
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - `schema-loaders` (default): JSON / YAML loading of schema dictionaries and codec limits

pub mod config;
pub mod dynamic;
pub mod encoding;
pub mod error;
pub mod schema;
pub mod types;

pub use config::CodecLimits;
pub use dynamic::{ComplexData, StructureDescriptor, StructureKind, TypeRegistry};
pub use encoding::{BinaryDecoder, BinaryEncoder, Decoder, Encoder};
pub use error::{DecodeError, EncodeError, Error, Result, SchemaError};
pub use schema::{SchemaDictionary, SchemaEnumeration, SchemaField, SchemaStructure};
pub use types::{NodeId, Value, ValueKind};
