// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Value model: the built-in wire kinds and the values fields carry.

mod builtin;
mod kind;
mod node_id;
mod value;

pub use builtin::{
    ByteString, DataValue, DateTime, DiagnosticInfo, ExtensionObject, ExtensionObjectBody, Guid,
    LocalizedText, QualifiedName, StatusCode, Variant, XmlElement,
};
pub use kind::ValueKind;
pub use node_id::{ExpandedNodeId, Identifier, NodeId};
pub use value::{Array, FromValue, Value};
