// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime Complex Types
//!
//! Structures and enumerations discovered at run time from a server schema,
//! without compile-time type knowledge.
//!
//! # Features
//!
//! - **StructureDescriptor**: Field layout of one structure (Plain, WithOptionalFields, Union)
//! - **ComplexData**: Schema-bound instance with field access by name or index
//! - **TypeRegistry**: Descriptors keyed by type id, built from schema dictionaries
//! - **Builder API**: Fluent interface for hand-written descriptors
//! - **Codec**: Encode/decode through any [`Encoder`](crate::encoding::Encoder) / [`Decoder`](crate::encoding::Decoder)
//!
//! # Example
//!
//! ```rust
//! use ua_complex_types::dynamic::{decode_binary, encode_binary, ComplexData, StructureBuilder, StructureKind};
//! use ua_complex_types::types::{NodeId, ValueKind};
//!
//! // Build a descriptor at runtime
//! let point = StructureBuilder::new("Point", NodeId::numeric(2, 3001))
//!     .namespace("urn:example:plant")
//!     .kind(StructureKind::WithOptionalFields)
//!     .field("x", ValueKind::Double)
//!     .field("y", ValueKind::Double)
//!     .optional_field("label", ValueKind::String)
//!     .build()
//!     .unwrap();
//!
//! // Create an instance
//! let mut data = ComplexData::new(&point);
//! data.set("x", 1.5f64).unwrap();
//! data.set("y", -2.0f64).unwrap();
//! data.set("label", "A").unwrap();
//!
//! // Binary roundtrip
//! let bytes = encode_binary(&data).unwrap();
//! let decoded = decode_binary(&bytes, &point).unwrap();
//! assert_eq!(decoded, data);
//! assert_eq!(decoded.get_as::<String>("label").unwrap().as_deref(), Some("A"));
//! ```

mod builder;
mod codec;
mod complex_data;
mod registry;
mod type_descriptor;

pub use builder::{
    build_enumeration, build_structure, BuiltinOnly, EnumBuilder, StructureBuilder, TypeResolver,
};
pub use codec::{decode_binary, encode_binary, encode_structure};
pub use complex_data::ComplexData;
pub use registry::{LoadReport, TypeRegistry};
pub use type_descriptor::{
    EnumDescriptor, EnumValue, FieldDescriptor, FieldType, StructureDescriptor, StructureKind,
};
