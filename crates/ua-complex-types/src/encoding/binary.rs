// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Little-endian binary wire encoding.
//!
//! No alignment or padding. Strings, byte strings and arrays carry an Int32
//! length prefix where -1 means null.

use super::{read_array, read_value, write_array, write_value, Decoder, Encoder, NamespaceStack};
use crate::config::CodecLimits;
use crate::error::{DecodeError, EncodeError};
use crate::types::{
    Array, DataValue, DateTime, DiagnosticInfo, ExpandedNodeId, ExtensionObject,
    ExtensionObjectBody, Guid, Identifier, LocalizedText, NodeId, QualifiedName, StatusCode,
    Value, ValueKind, Variant, XmlElement,
};

// NodeId encoding byte
const NODE_ID_TWO_BYTE: u8 = 0x00;
const NODE_ID_FOUR_BYTE: u8 = 0x01;
const NODE_ID_NUMERIC: u8 = 0x02;
const NODE_ID_STRING: u8 = 0x03;
const NODE_ID_GUID: u8 = 0x04;
const NODE_ID_BYTE_STRING: u8 = 0x05;
const EXPANDED_SERVER_INDEX_FLAG: u8 = 0x40;
const EXPANDED_NAMESPACE_URI_FLAG: u8 = 0x80;

const LOCALIZED_TEXT_LOCALE: u8 = 0x01;
const LOCALIZED_TEXT_TEXT: u8 = 0x02;

const EXTENSION_OBJECT_NONE: u8 = 0x00;
const EXTENSION_OBJECT_BINARY: u8 = 0x01;
const EXTENSION_OBJECT_XML: u8 = 0x02;

const DATA_VALUE_VALUE: u8 = 0x01;
const DATA_VALUE_STATUS: u8 = 0x02;
const DATA_VALUE_SOURCE_TIMESTAMP: u8 = 0x04;
const DATA_VALUE_SERVER_TIMESTAMP: u8 = 0x08;
const DATA_VALUE_SOURCE_PICOSECONDS: u8 = 0x10;
const DATA_VALUE_SERVER_PICOSECONDS: u8 = 0x20;

const DIAG_SYMBOLIC_ID: u8 = 0x01;
const DIAG_NAMESPACE_URI: u8 = 0x02;
const DIAG_LOCALIZED_TEXT: u8 = 0x04;
const DIAG_LOCALE: u8 = 0x08;
const DIAG_ADDITIONAL_INFO: u8 = 0x10;
const DIAG_INNER_STATUS_CODE: u8 = 0x20;
const DIAG_INNER_DIAGNOSTIC_INFO: u8 = 0x40;

const VARIANT_TYPE_MASK: u8 = 0x3F;
const VARIANT_ARRAY_DIMENSIONS: u8 = 0x40;
const VARIANT_ARRAY: u8 = 0x80;

/// Built-in type id used for a value inside a Variant.
fn variant_type_id(name: &str, kind: ValueKind) -> Result<u8, EncodeError> {
    match kind {
        ValueKind::Enumeration => Ok(6),
        _ => kind.builtin_type_id().ok_or_else(|| EncodeError::InvalidData {
            field: name.to_string(),
            reason: format!("{} cannot be carried by a variant", kind),
        }),
    }
}

/// Binary encoder writing into a growable buffer.
#[derive(Debug, Default)]
pub struct BinaryEncoder {
    buffer: Vec<u8>,
    namespaces: Vec<String>,
}

impl BinaryEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
            namespaces: Vec::new(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Innermost pushed namespace.
    pub fn namespace(&self) -> Option<&str> {
        self.namespaces.last().map(String::as_str)
    }

    fn put(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    fn put_length(&mut self, name: &str, what: &'static str, len: usize) -> Result<(), EncodeError> {
        let len = i32::try_from(len).map_err(|_| EncodeError::LimitExceeded {
            field: name.to_string(),
            what,
            length: len,
            max: i32::MAX as usize,
        })?;
        self.put(&len.to_le_bytes());
        Ok(())
    }

    fn put_string(&mut self, name: &str, value: &str) -> Result<(), EncodeError> {
        self.put_length(name, "string", value.len())?;
        self.put(value.as_bytes());
        Ok(())
    }

    fn put_node_id(&mut self, name: &str, value: &NodeId, flags: u8) -> Result<(), EncodeError> {
        let ns = value.namespace_index;
        match &value.identifier {
            Identifier::Numeric(id) => {
                if ns == 0 && *id <= u8::MAX as u32 {
                    self.put(&[NODE_ID_TWO_BYTE | flags, *id as u8]);
                } else if ns <= u8::MAX as u16 && *id <= u16::MAX as u32 {
                    self.put(&[NODE_ID_FOUR_BYTE | flags, ns as u8]);
                    self.put(&(*id as u16).to_le_bytes());
                } else {
                    self.put(&[NODE_ID_NUMERIC | flags]);
                    self.put(&ns.to_le_bytes());
                    self.put(&id.to_le_bytes());
                }
                Ok(())
            }
            Identifier::String(s) => {
                self.put(&[NODE_ID_STRING | flags]);
                self.put(&ns.to_le_bytes());
                self.put_string(name, s)
            }
            Identifier::Guid(g) => {
                self.put(&[NODE_ID_GUID | flags]);
                self.put(&ns.to_le_bytes());
                self.put_guid(g);
                Ok(())
            }
            Identifier::Opaque(bytes) => {
                self.put(&[NODE_ID_BYTE_STRING | flags]);
                self.put(&ns.to_le_bytes());
                self.put_length(name, "byte string", bytes.len())?;
                self.put(bytes);
                Ok(())
            }
        }
    }

    fn put_guid(&mut self, value: &Guid) {
        self.put(&value.data1.to_le_bytes());
        self.put(&value.data2.to_le_bytes());
        self.put(&value.data3.to_le_bytes());
        self.put(&value.data4);
    }
}

impl NamespaceStack for BinaryEncoder {
    fn push_namespace(&mut self, namespace_uri: &str) {
        self.namespaces.push(namespace_uri.to_string());
    }

    fn pop_namespace(&mut self) {
        self.namespaces.pop();
    }
}

impl Encoder for BinaryEncoder {
    fn write_boolean(&mut self, _name: &str, value: bool) -> Result<(), EncodeError> {
        self.put(&[value as u8]);
        Ok(())
    }

    fn write_sbyte(&mut self, _name: &str, value: i8) -> Result<(), EncodeError> {
        self.put(&value.to_le_bytes());
        Ok(())
    }

    fn write_byte(&mut self, _name: &str, value: u8) -> Result<(), EncodeError> {
        self.put(&[value]);
        Ok(())
    }

    fn write_int16(&mut self, _name: &str, value: i16) -> Result<(), EncodeError> {
        self.put(&value.to_le_bytes());
        Ok(())
    }

    fn write_uint16(&mut self, _name: &str, value: u16) -> Result<(), EncodeError> {
        self.put(&value.to_le_bytes());
        Ok(())
    }

    fn write_int32(&mut self, _name: &str, value: i32) -> Result<(), EncodeError> {
        self.put(&value.to_le_bytes());
        Ok(())
    }

    fn write_uint32(&mut self, _name: &str, value: u32) -> Result<(), EncodeError> {
        self.put(&value.to_le_bytes());
        Ok(())
    }

    fn write_int64(&mut self, _name: &str, value: i64) -> Result<(), EncodeError> {
        self.put(&value.to_le_bytes());
        Ok(())
    }

    fn write_uint64(&mut self, _name: &str, value: u64) -> Result<(), EncodeError> {
        self.put(&value.to_le_bytes());
        Ok(())
    }

    fn write_float(&mut self, _name: &str, value: f32) -> Result<(), EncodeError> {
        self.put(&value.to_le_bytes());
        Ok(())
    }

    fn write_double(&mut self, _name: &str, value: f64) -> Result<(), EncodeError> {
        self.put(&value.to_le_bytes());
        Ok(())
    }

    fn write_string(&mut self, name: &str, value: &str) -> Result<(), EncodeError> {
        self.put_string(name, value)
    }

    fn write_date_time(&mut self, _name: &str, value: DateTime) -> Result<(), EncodeError> {
        self.put(&value.ticks().to_le_bytes());
        Ok(())
    }

    fn write_guid(&mut self, _name: &str, value: &Guid) -> Result<(), EncodeError> {
        self.put_guid(value);
        Ok(())
    }

    fn write_byte_string(&mut self, name: &str, value: &[u8]) -> Result<(), EncodeError> {
        self.put_length(name, "byte string", value.len())?;
        self.put(value);
        Ok(())
    }

    fn write_xml_element(&mut self, name: &str, value: &XmlElement) -> Result<(), EncodeError> {
        self.put_string(name, value.as_str())
    }

    fn write_node_id(&mut self, name: &str, value: &NodeId) -> Result<(), EncodeError> {
        self.put_node_id(name, value, 0)
    }

    fn write_expanded_node_id(
        &mut self,
        name: &str,
        value: &ExpandedNodeId,
    ) -> Result<(), EncodeError> {
        let mut flags = 0;
        if value.namespace_uri.is_some() {
            flags |= EXPANDED_NAMESPACE_URI_FLAG;
        }
        if value.server_index != 0 {
            flags |= EXPANDED_SERVER_INDEX_FLAG;
        }
        self.put_node_id(name, &value.node_id, flags)?;
        if let Some(uri) = &value.namespace_uri {
            self.put_string(name, uri)?;
        }
        if value.server_index != 0 {
            self.put(&value.server_index.to_le_bytes());
        }
        Ok(())
    }

    fn write_status_code(&mut self, _name: &str, value: StatusCode) -> Result<(), EncodeError> {
        self.put(&value.0.to_le_bytes());
        Ok(())
    }

    fn write_qualified_name(
        &mut self,
        name: &str,
        value: &QualifiedName,
    ) -> Result<(), EncodeError> {
        self.put(&value.namespace_index.to_le_bytes());
        self.put_string(name, &value.name)
    }

    fn write_localized_text(
        &mut self,
        name: &str,
        value: &LocalizedText,
    ) -> Result<(), EncodeError> {
        let mut mask = 0;
        if value.locale.is_some() {
            mask |= LOCALIZED_TEXT_LOCALE;
        }
        if value.text.is_some() {
            mask |= LOCALIZED_TEXT_TEXT;
        }
        self.put(&[mask]);
        if let Some(locale) = &value.locale {
            self.put_string(name, locale)?;
        }
        if let Some(text) = &value.text {
            self.put_string(name, text)?;
        }
        Ok(())
    }

    fn write_extension_object(
        &mut self,
        name: &str,
        value: &ExtensionObject,
    ) -> Result<(), EncodeError> {
        self.put_node_id(name, &value.type_id, 0)?;
        match &value.body {
            ExtensionObjectBody::None => {
                self.put(&[EXTENSION_OBJECT_NONE]);
                Ok(())
            }
            ExtensionObjectBody::Binary(body) => {
                self.put(&[EXTENSION_OBJECT_BINARY]);
                self.write_byte_string(name, body)
            }
            ExtensionObjectBody::Xml(xml) => {
                self.put(&[EXTENSION_OBJECT_XML]);
                self.put_string(name, xml.as_str())
            }
        }
    }

    fn write_data_value(&mut self, name: &str, value: &DataValue) -> Result<(), EncodeError> {
        let mut mask = 0;
        if value.value.is_some() {
            mask |= DATA_VALUE_VALUE;
        }
        if value.status.is_some() {
            mask |= DATA_VALUE_STATUS;
        }
        if value.source_timestamp.is_some() {
            mask |= DATA_VALUE_SOURCE_TIMESTAMP;
        }
        if value.server_timestamp.is_some() {
            mask |= DATA_VALUE_SERVER_TIMESTAMP;
        }
        if value.source_picoseconds.is_some() {
            mask |= DATA_VALUE_SOURCE_PICOSECONDS;
        }
        if value.server_picoseconds.is_some() {
            mask |= DATA_VALUE_SERVER_PICOSECONDS;
        }
        self.put(&[mask]);

        if let Some(v) = &value.value {
            self.write_variant(name, v)?;
        }
        if let Some(status) = value.status {
            self.put(&status.0.to_le_bytes());
        }
        if let Some(ts) = value.source_timestamp {
            self.put(&ts.ticks().to_le_bytes());
        }
        if let Some(ps) = value.source_picoseconds {
            self.put(&ps.to_le_bytes());
        }
        if let Some(ts) = value.server_timestamp {
            self.put(&ts.ticks().to_le_bytes());
        }
        if let Some(ps) = value.server_picoseconds {
            self.put(&ps.to_le_bytes());
        }
        Ok(())
    }

    fn write_variant(&mut self, name: &str, value: &Variant) -> Result<(), EncodeError> {
        match value {
            Variant::Empty => {
                self.put(&[0]);
                Ok(())
            }
            Variant::Scalar(scalar) => {
                if matches!(
                    scalar,
                    Value::Variant(_) | Value::Array(_) | Value::Structure(_)
                ) {
                    return Err(EncodeError::InvalidData {
                        field: name.to_string(),
                        reason: format!("{} cannot be a variant scalar", scalar.type_name()),
                    });
                }
                let type_id = variant_type_id(name, scalar.kind())?;
                self.put(&[type_id]);
                write_value(self, name, scalar)
            }
            Variant::Array(array) => {
                let type_id = variant_type_id(name, array.kind())?;
                self.put(&[type_id | VARIANT_ARRAY]);
                write_array(self, name, array)
            }
        }
    }

    fn write_diagnostic_info(
        &mut self,
        name: &str,
        value: &DiagnosticInfo,
    ) -> Result<(), EncodeError> {
        let mut mask = 0;
        if value.symbolic_id.is_some() {
            mask |= DIAG_SYMBOLIC_ID;
        }
        if value.namespace_uri.is_some() {
            mask |= DIAG_NAMESPACE_URI;
        }
        if value.localized_text.is_some() {
            mask |= DIAG_LOCALIZED_TEXT;
        }
        if value.locale.is_some() {
            mask |= DIAG_LOCALE;
        }
        if value.additional_info.is_some() {
            mask |= DIAG_ADDITIONAL_INFO;
        }
        if value.inner_status_code.is_some() {
            mask |= DIAG_INNER_STATUS_CODE;
        }
        if value.inner_diagnostic_info.is_some() {
            mask |= DIAG_INNER_DIAGNOSTIC_INFO;
        }
        self.put(&[mask]);

        for index in [
            value.symbolic_id,
            value.namespace_uri,
            value.locale,
            value.localized_text,
        ]
        .into_iter()
        .flatten()
        {
            self.put(&index.to_le_bytes());
        }
        if let Some(info) = &value.additional_info {
            self.put_string(name, info)?;
        }
        if let Some(status) = value.inner_status_code {
            self.put(&status.0.to_le_bytes());
        }
        if let Some(inner) = &value.inner_diagnostic_info {
            self.write_diagnostic_info(name, inner)?;
        }
        Ok(())
    }

    fn write_enumerated(&mut self, _name: &str, value: i32) -> Result<(), EncodeError> {
        self.put(&value.to_le_bytes());
        Ok(())
    }

    fn write_array_length(&mut self, name: &str, len: usize) -> Result<(), EncodeError> {
        self.put_length(name, "array", len)
    }
}

/// Binary decoder over a borrowed buffer.
#[derive(Debug)]
pub struct BinaryDecoder<'a> {
    buffer: &'a [u8],
    offset: usize,
    namespaces: Vec<String>,
    limits: CodecLimits,
    depth: usize,
}

impl<'a> BinaryDecoder<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self::with_limits(buffer, CodecLimits::default())
    }

    pub fn with_limits(buffer: &'a [u8], limits: CodecLimits) -> Self {
        Self {
            buffer,
            offset: 0,
            namespaces: Vec::new(),
            limits,
            depth: 0,
        }
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.offset)
    }

    /// Innermost pushed namespace.
    pub fn namespace(&self) -> Option<&str> {
        self.namespaces.last().map(String::as_str)
    }

    fn read_bytes(&mut self, count: usize) -> Result<&'a [u8], DecodeError> {
        if count > self.remaining() {
            return Err(DecodeError::EndOfStream {
                offset: self.offset,
                need: count,
                have: self.remaining(),
            });
        }
        let slice = &self.buffer[self.offset..self.offset + count];
        self.offset += count;
        Ok(slice)
    }

    fn read_fixed<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    fn take_u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.read_fixed::<1>()?[0])
    }

    fn take_u16(&mut self) -> Result<u16, DecodeError> {
        Ok(u16::from_le_bytes(self.read_fixed()?))
    }

    fn take_i32(&mut self) -> Result<i32, DecodeError> {
        Ok(i32::from_le_bytes(self.read_fixed()?))
    }

    fn take_u32(&mut self) -> Result<u32, DecodeError> {
        Ok(u32::from_le_bytes(self.read_fixed()?))
    }

    fn take_i64(&mut self) -> Result<i64, DecodeError> {
        Ok(i64::from_le_bytes(self.read_fixed()?))
    }

    /// Length prefix: `None` for null, bounded by `max`. Array elements may be
    /// zero-sized, so only byte-backed lengths check the bytes left.
    fn take_length(
        &mut self,
        name: &str,
        what: &'static str,
        max: usize,
    ) -> Result<Option<usize>, DecodeError> {
        let raw = self.take_i32()?;
        if raw == -1 {
            return Ok(None);
        }
        if raw < 0 {
            return Err(DecodeError::InvalidData {
                field: name.to_string(),
                reason: format!("negative {} length {}", what, raw),
            });
        }
        let len = raw as usize;
        if len > max {
            return Err(DecodeError::LimitExceeded {
                field: name.to_string(),
                what,
                length: len,
                max,
            });
        }
        Ok(Some(len))
    }

    /// Length prefix of a byte-backed value, checked against the bytes left
    /// before anything is allocated.
    fn take_byte_length(
        &mut self,
        name: &str,
        what: &'static str,
        max: usize,
    ) -> Result<Option<usize>, DecodeError> {
        let len = self.take_length(name, what, max)?;
        if let Some(len) = len {
            if len > self.remaining() {
                return Err(DecodeError::EndOfStream {
                    offset: self.offset,
                    need: len,
                    have: self.remaining(),
                });
            }
        }
        Ok(len)
    }

    fn take_string(&mut self, name: &str) -> Result<Option<String>, DecodeError> {
        let max = self.limits.max_string_length;
        let Some(len) = self.take_byte_length(name, "string", max)? else {
            return Ok(None);
        };
        let bytes = self.read_bytes(len)?;
        String::from_utf8(bytes.to_vec())
            .map(Some)
            .map_err(|e| DecodeError::InvalidData {
                field: name.to_string(),
                reason: format!("invalid UTF-8: {}", e),
            })
    }

    fn take_guid(&mut self) -> Result<Guid, DecodeError> {
        Ok(Guid {
            data1: self.take_u32()?,
            data2: self.take_u16()?,
            data3: self.take_u16()?,
            data4: self.read_fixed()?,
        })
    }

    fn take_node_id(&mut self, name: &str, encoding: u8) -> Result<NodeId, DecodeError> {
        let node_id = match encoding {
            NODE_ID_TWO_BYTE => NodeId::numeric(0, self.take_u8()? as u32),
            NODE_ID_FOUR_BYTE => {
                let ns = self.take_u8()? as u16;
                NodeId::numeric(ns, self.take_u16()? as u32)
            }
            NODE_ID_NUMERIC => {
                let ns = self.take_u16()?;
                NodeId::numeric(ns, self.take_u32()?)
            }
            NODE_ID_STRING => {
                let ns = self.take_u16()?;
                NodeId::string(ns, self.take_string(name)?.unwrap_or_default())
            }
            NODE_ID_GUID => {
                let ns = self.take_u16()?;
                NodeId::guid(ns, self.take_guid()?)
            }
            NODE_ID_BYTE_STRING => {
                let ns = self.take_u16()?;
                NodeId::opaque(ns, self.read_byte_string(name)?)
            }
            other => {
                return Err(DecodeError::InvalidData {
                    field: name.to_string(),
                    reason: format!("unknown node id encoding 0x{:02x}", other),
                })
            }
        };
        Ok(node_id)
    }

    fn enter(&mut self) -> Result<(), DecodeError> {
        if self.depth >= self.limits.max_nesting_depth {
            return Err(DecodeError::NestingTooDeep {
                max: self.limits.max_nesting_depth,
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn read_variant_body(&mut self, name: &str, mask: u8) -> Result<Variant, DecodeError> {
        let type_id = mask & VARIANT_TYPE_MASK;
        let kind = ValueKind::from_builtin_type_id(type_id).ok_or_else(|| {
            DecodeError::InvalidData {
                field: name.to_string(),
                reason: format!("unknown variant type id {}", type_id),
            }
        })?;

        if mask & VARIANT_ARRAY != 0 {
            let array: Array = read_array(self, name, kind)?;
            if mask & VARIANT_ARRAY_DIMENSIONS != 0 {
                let dims = self.read_int32_array(name)?;
                log::debug!(
                    "[binary] variant '{}' array dimensions {:?} ignored",
                    name,
                    dims
                );
            }
            return Ok(Variant::Array(array));
        }

        if kind == ValueKind::Variant {
            return Err(DecodeError::InvalidData {
                field: name.to_string(),
                reason: "variant scalar cannot hold a variant".to_string(),
            });
        }
        Ok(Variant::Scalar(read_value(self, name, kind)?))
    }

    fn read_diagnostic_body(&mut self, name: &str) -> Result<DiagnosticInfo, DecodeError> {
        let mask = self.take_u8()?;
        let mut info = DiagnosticInfo::default();
        if mask & DIAG_SYMBOLIC_ID != 0 {
            info.symbolic_id = Some(self.take_i32()?);
        }
        if mask & DIAG_NAMESPACE_URI != 0 {
            info.namespace_uri = Some(self.take_i32()?);
        }
        if mask & DIAG_LOCALE != 0 {
            info.locale = Some(self.take_i32()?);
        }
        if mask & DIAG_LOCALIZED_TEXT != 0 {
            info.localized_text = Some(self.take_i32()?);
        }
        if mask & DIAG_ADDITIONAL_INFO != 0 {
            info.additional_info = self.take_string(name)?;
        }
        if mask & DIAG_INNER_STATUS_CODE != 0 {
            info.inner_status_code = Some(StatusCode(self.take_u32()?));
        }
        if mask & DIAG_INNER_DIAGNOSTIC_INFO != 0 {
            info.inner_diagnostic_info = Some(Box::new(self.read_diagnostic_info(name)?));
        }
        Ok(info)
    }
}

impl NamespaceStack for BinaryDecoder<'_> {
    fn push_namespace(&mut self, namespace_uri: &str) {
        self.namespaces.push(namespace_uri.to_string());
    }

    fn pop_namespace(&mut self) {
        self.namespaces.pop();
    }
}

impl Decoder for BinaryDecoder<'_> {
    fn read_boolean(&mut self, _name: &str) -> Result<bool, DecodeError> {
        Ok(self.take_u8()? != 0)
    }

    fn read_sbyte(&mut self, _name: &str) -> Result<i8, DecodeError> {
        Ok(i8::from_le_bytes(self.read_fixed()?))
    }

    fn read_byte(&mut self, _name: &str) -> Result<u8, DecodeError> {
        self.take_u8()
    }

    fn read_int16(&mut self, _name: &str) -> Result<i16, DecodeError> {
        Ok(i16::from_le_bytes(self.read_fixed()?))
    }

    fn read_uint16(&mut self, _name: &str) -> Result<u16, DecodeError> {
        self.take_u16()
    }

    fn read_int32(&mut self, _name: &str) -> Result<i32, DecodeError> {
        self.take_i32()
    }

    fn read_uint32(&mut self, _name: &str) -> Result<u32, DecodeError> {
        self.take_u32()
    }

    fn read_int64(&mut self, _name: &str) -> Result<i64, DecodeError> {
        self.take_i64()
    }

    fn read_uint64(&mut self, _name: &str) -> Result<u64, DecodeError> {
        Ok(u64::from_le_bytes(self.read_fixed()?))
    }

    fn read_float(&mut self, _name: &str) -> Result<f32, DecodeError> {
        Ok(f32::from_le_bytes(self.read_fixed()?))
    }

    fn read_double(&mut self, _name: &str) -> Result<f64, DecodeError> {
        Ok(f64::from_le_bytes(self.read_fixed()?))
    }

    fn read_string(&mut self, name: &str) -> Result<String, DecodeError> {
        Ok(self.take_string(name)?.unwrap_or_default())
    }

    fn read_date_time(&mut self, _name: &str) -> Result<DateTime, DecodeError> {
        Ok(DateTime::from_ticks(self.take_i64()?))
    }

    fn read_guid(&mut self, _name: &str) -> Result<Guid, DecodeError> {
        self.take_guid()
    }

    fn read_byte_string(&mut self, name: &str) -> Result<Vec<u8>, DecodeError> {
        let max = self.limits.max_byte_string_length;
        match self.take_byte_length(name, "byte string", max)? {
            Some(len) => Ok(self.read_bytes(len)?.to_vec()),
            None => Ok(Vec::new()),
        }
    }

    fn read_xml_element(&mut self, name: &str) -> Result<XmlElement, DecodeError> {
        Ok(XmlElement(self.read_string(name)?))
    }

    fn read_node_id(&mut self, name: &str) -> Result<NodeId, DecodeError> {
        let encoding = self.take_u8()?;
        if encoding & (EXPANDED_NAMESPACE_URI_FLAG | EXPANDED_SERVER_INDEX_FLAG) != 0 {
            return Err(DecodeError::InvalidData {
                field: name.to_string(),
                reason: format!("expanded node id flags 0x{:02x} on a node id", encoding),
            });
        }
        self.take_node_id(name, encoding)
    }

    fn read_expanded_node_id(&mut self, name: &str) -> Result<ExpandedNodeId, DecodeError> {
        let first = self.take_u8()?;
        let flags = first & (EXPANDED_NAMESPACE_URI_FLAG | EXPANDED_SERVER_INDEX_FLAG);
        let node_id = self.take_node_id(name, first & !flags)?;
        let namespace_uri = if flags & EXPANDED_NAMESPACE_URI_FLAG != 0 {
            self.take_string(name)?
        } else {
            None
        };
        let server_index = if flags & EXPANDED_SERVER_INDEX_FLAG != 0 {
            self.take_u32()?
        } else {
            0
        };
        Ok(ExpandedNodeId {
            node_id,
            namespace_uri,
            server_index,
        })
    }

    fn read_status_code(&mut self, _name: &str) -> Result<StatusCode, DecodeError> {
        Ok(StatusCode(self.take_u32()?))
    }

    fn read_qualified_name(&mut self, name: &str) -> Result<QualifiedName, DecodeError> {
        let namespace_index = self.take_u16()?;
        let text = self.read_string(name)?;
        Ok(QualifiedName::new(namespace_index, text))
    }

    fn read_localized_text(&mut self, name: &str) -> Result<LocalizedText, DecodeError> {
        let mask = self.take_u8()?;
        let locale = if mask & LOCALIZED_TEXT_LOCALE != 0 {
            self.take_string(name)?
        } else {
            None
        };
        let text = if mask & LOCALIZED_TEXT_TEXT != 0 {
            self.take_string(name)?
        } else {
            None
        };
        Ok(LocalizedText { locale, text })
    }

    fn read_extension_object(&mut self, name: &str) -> Result<ExtensionObject, DecodeError> {
        let type_id = self.read_node_id(name)?;
        let body = match self.take_u8()? {
            EXTENSION_OBJECT_NONE => ExtensionObjectBody::None,
            EXTENSION_OBJECT_BINARY => ExtensionObjectBody::Binary(self.read_byte_string(name)?),
            EXTENSION_OBJECT_XML => ExtensionObjectBody::Xml(self.read_xml_element(name)?),
            other => {
                return Err(DecodeError::InvalidData {
                    field: name.to_string(),
                    reason: format!("unknown extension object encoding {}", other),
                })
            }
        };
        Ok(ExtensionObject { type_id, body })
    }

    fn read_data_value(&mut self, name: &str) -> Result<DataValue, DecodeError> {
        let mask = self.take_u8()?;
        let mut dv = DataValue::default();
        if mask & DATA_VALUE_VALUE != 0 {
            dv.value = Some(self.read_variant(name)?);
        }
        if mask & DATA_VALUE_STATUS != 0 {
            dv.status = Some(StatusCode(self.take_u32()?));
        }
        if mask & DATA_VALUE_SOURCE_TIMESTAMP != 0 {
            dv.source_timestamp = Some(DateTime::from_ticks(self.take_i64()?));
        }
        if mask & DATA_VALUE_SOURCE_PICOSECONDS != 0 {
            dv.source_picoseconds = Some(self.take_u16()?);
        }
        if mask & DATA_VALUE_SERVER_TIMESTAMP != 0 {
            dv.server_timestamp = Some(DateTime::from_ticks(self.take_i64()?));
        }
        if mask & DATA_VALUE_SERVER_PICOSECONDS != 0 {
            dv.server_picoseconds = Some(self.take_u16()?);
        }
        Ok(dv)
    }

    fn read_variant(&mut self, name: &str) -> Result<Variant, DecodeError> {
        let mask = self.take_u8()?;
        if mask == 0 {
            return Ok(Variant::Empty);
        }
        self.enter()?;
        let result = self.read_variant_body(name, mask);
        self.leave();
        result
    }

    fn read_diagnostic_info(&mut self, name: &str) -> Result<DiagnosticInfo, DecodeError> {
        self.enter()?;
        let result = self.read_diagnostic_body(name);
        self.leave();
        result
    }

    fn read_enumerated(&mut self, _name: &str) -> Result<i32, DecodeError> {
        self.take_i32()
    }

    fn read_array_length(&mut self, name: &str) -> Result<usize, DecodeError> {
        Ok(self
            .take_length(name, "array", self.limits.max_array_length)?
            .unwrap_or(0))
    }

    fn begin_structure(&mut self, _name: &str) -> Result<(), DecodeError> {
        self.enter()
    }

    fn end_structure(&mut self, _name: &str) -> Result<(), DecodeError> {
        self.leave();
        Ok(())
    }
}
