// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Encoder / decoder boundary.
//!
//! The structure codec talks to the wire only through [`Encoder`] and
//! [`Decoder`]: one call per value kind (scalar and array), a namespace stack,
//! and structure begin/end hooks. [`BinaryEncoder`] / [`BinaryDecoder`] are the
//! little-endian binary implementation.
//!
//! # Example
//!
//! ```
//! use ua_complex_types::encoding::{BinaryDecoder, BinaryEncoder, Decoder, Encoder};
//!
//! let mut enc = BinaryEncoder::new();
//! enc.write_string("Name", "pump").unwrap();
//! enc.write_uint32_array("Ids", &[1, 2]).unwrap();
//!
//! let bytes = enc.into_bytes();
//! let mut dec = BinaryDecoder::new(&bytes);
//! assert_eq!(dec.read_string("Name").unwrap(), "pump");
//! assert_eq!(dec.read_uint32_array("Ids").unwrap(), vec![1, 2]);
//! ```

mod binary;
#[cfg(test)]
pub(crate) mod recording;

pub use binary::{BinaryDecoder, BinaryEncoder};

use crate::error::{DecodeError, EncodeError};
use crate::types::{
    Array, DataValue, DateTime, DiagnosticInfo, ExpandedNodeId, ExtensionObject, Guid,
    LocalizedText, NodeId, QualifiedName, StatusCode, Value, ValueKind, Variant, XmlElement,
};
use std::ops::{Deref, DerefMut};

/// Upper bound on speculative `Vec` capacity while decoding arrays.
const PREALLOC_CAP: usize = 1024;

/// Namespace scoping shared by encoders and decoders.
pub trait NamespaceStack {
    fn push_namespace(&mut self, namespace_uri: &str);
    fn pop_namespace(&mut self);
}

/// Pushes a namespace on creation and pops it when dropped, so every exit
/// path (including `?`) restores the stack.
pub struct NamespaceScope<'a, S: NamespaceStack + ?Sized> {
    stack: &'a mut S,
}

impl<'a, S: NamespaceStack + ?Sized> NamespaceScope<'a, S> {
    pub fn new(stack: &'a mut S, namespace_uri: &str) -> Self {
        stack.push_namespace(namespace_uri);
        Self { stack }
    }
}

impl<S: NamespaceStack + ?Sized> Deref for NamespaceScope<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.stack
    }
}

impl<S: NamespaceStack + ?Sized> DerefMut for NamespaceScope<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.stack
    }
}

impl<S: NamespaceStack + ?Sized> Drop for NamespaceScope<'_, S> {
    fn drop(&mut self) {
        self.stack.pop_namespace();
    }
}

macro_rules! array_writer {
    ($array_fn:ident, $scalar_fn:ident, $ty:ty, copy) => {
        fn $array_fn(&mut self, name: &str, values: &[$ty]) -> Result<(), EncodeError> {
            self.write_array_length(name, values.len())?;
            for v in values {
                self.$scalar_fn(name, *v)?;
            }
            Ok(())
        }
    };
    ($array_fn:ident, $scalar_fn:ident, $ty:ty, by_ref) => {
        fn $array_fn(&mut self, name: &str, values: &[$ty]) -> Result<(), EncodeError> {
            self.write_array_length(name, values.len())?;
            for v in values {
                self.$scalar_fn(name, v)?;
            }
            Ok(())
        }
    };
}

/// Write side of the wire boundary.
///
/// Array writes default to a length prefix followed by one scalar write per
/// element under the same field name.
pub trait Encoder: NamespaceStack {
    fn write_boolean(&mut self, name: &str, value: bool) -> Result<(), EncodeError>;
    fn write_sbyte(&mut self, name: &str, value: i8) -> Result<(), EncodeError>;
    fn write_byte(&mut self, name: &str, value: u8) -> Result<(), EncodeError>;
    fn write_int16(&mut self, name: &str, value: i16) -> Result<(), EncodeError>;
    fn write_uint16(&mut self, name: &str, value: u16) -> Result<(), EncodeError>;
    fn write_int32(&mut self, name: &str, value: i32) -> Result<(), EncodeError>;
    fn write_uint32(&mut self, name: &str, value: u32) -> Result<(), EncodeError>;
    fn write_int64(&mut self, name: &str, value: i64) -> Result<(), EncodeError>;
    fn write_uint64(&mut self, name: &str, value: u64) -> Result<(), EncodeError>;
    fn write_float(&mut self, name: &str, value: f32) -> Result<(), EncodeError>;
    fn write_double(&mut self, name: &str, value: f64) -> Result<(), EncodeError>;
    fn write_string(&mut self, name: &str, value: &str) -> Result<(), EncodeError>;
    fn write_date_time(&mut self, name: &str, value: DateTime) -> Result<(), EncodeError>;
    fn write_guid(&mut self, name: &str, value: &Guid) -> Result<(), EncodeError>;
    fn write_byte_string(&mut self, name: &str, value: &[u8]) -> Result<(), EncodeError>;
    fn write_xml_element(&mut self, name: &str, value: &XmlElement) -> Result<(), EncodeError>;
    fn write_node_id(&mut self, name: &str, value: &NodeId) -> Result<(), EncodeError>;
    fn write_expanded_node_id(
        &mut self,
        name: &str,
        value: &ExpandedNodeId,
    ) -> Result<(), EncodeError>;
    fn write_status_code(&mut self, name: &str, value: StatusCode) -> Result<(), EncodeError>;
    fn write_qualified_name(&mut self, name: &str, value: &QualifiedName)
        -> Result<(), EncodeError>;
    fn write_localized_text(&mut self, name: &str, value: &LocalizedText)
        -> Result<(), EncodeError>;
    fn write_extension_object(
        &mut self,
        name: &str,
        value: &ExtensionObject,
    ) -> Result<(), EncodeError>;
    fn write_data_value(&mut self, name: &str, value: &DataValue) -> Result<(), EncodeError>;
    fn write_variant(&mut self, name: &str, value: &Variant) -> Result<(), EncodeError>;
    fn write_diagnostic_info(
        &mut self,
        name: &str,
        value: &DiagnosticInfo,
    ) -> Result<(), EncodeError>;

    /// Enumeration value (signed 32-bit on the wire).
    fn write_enumerated(&mut self, name: &str, value: i32) -> Result<(), EncodeError>;

    /// Length prefix of an array.
    fn write_array_length(&mut self, name: &str, len: usize) -> Result<(), EncodeError>;

    /// Called before the fields of a nested structure.
    fn begin_structure(&mut self, _name: &str) -> Result<(), EncodeError> {
        Ok(())
    }

    /// Called after the fields of a nested structure.
    fn end_structure(&mut self, _name: &str) -> Result<(), EncodeError> {
        Ok(())
    }

    array_writer!(write_boolean_array, write_boolean, bool, copy);
    array_writer!(write_sbyte_array, write_sbyte, i8, copy);
    array_writer!(write_byte_array, write_byte, u8, copy);
    array_writer!(write_int16_array, write_int16, i16, copy);
    array_writer!(write_uint16_array, write_uint16, u16, copy);
    array_writer!(write_int32_array, write_int32, i32, copy);
    array_writer!(write_uint32_array, write_uint32, u32, copy);
    array_writer!(write_int64_array, write_int64, i64, copy);
    array_writer!(write_uint64_array, write_uint64, u64, copy);
    array_writer!(write_float_array, write_float, f32, copy);
    array_writer!(write_double_array, write_double, f64, copy);
    array_writer!(write_string_array, write_string, String, by_ref);
    array_writer!(write_date_time_array, write_date_time, DateTime, copy);
    array_writer!(write_guid_array, write_guid, Guid, by_ref);
    array_writer!(write_byte_string_array, write_byte_string, Vec<u8>, by_ref);
    array_writer!(write_xml_element_array, write_xml_element, XmlElement, by_ref);
    array_writer!(write_node_id_array, write_node_id, NodeId, by_ref);
    array_writer!(write_expanded_node_id_array, write_expanded_node_id, ExpandedNodeId, by_ref);
    array_writer!(write_status_code_array, write_status_code, StatusCode, copy);
    array_writer!(write_qualified_name_array, write_qualified_name, QualifiedName, by_ref);
    array_writer!(write_localized_text_array, write_localized_text, LocalizedText, by_ref);
    array_writer!(write_extension_object_array, write_extension_object, ExtensionObject, by_ref);
    array_writer!(write_data_value_array, write_data_value, DataValue, by_ref);
    array_writer!(write_variant_array, write_variant, Variant, by_ref);
    array_writer!(write_diagnostic_info_array, write_diagnostic_info, DiagnosticInfo, by_ref);
    array_writer!(write_enumerated_array, write_enumerated, i32, copy);
}

macro_rules! array_reader {
    ($array_fn:ident, $scalar_fn:ident, $ty:ty) => {
        fn $array_fn(&mut self, name: &str) -> Result<Vec<$ty>, DecodeError> {
            let len = self.read_array_length(name)?;
            let mut values = Vec::with_capacity(len.min(PREALLOC_CAP));
            for _ in 0..len {
                values.push(self.$scalar_fn(name)?);
            }
            Ok(values)
        }
    };
}

/// Read side of the wire boundary; mirrors [`Encoder`].
///
/// Null strings, byte strings and arrays decode as empty.
pub trait Decoder: NamespaceStack {
    fn read_boolean(&mut self, name: &str) -> Result<bool, DecodeError>;
    fn read_sbyte(&mut self, name: &str) -> Result<i8, DecodeError>;
    fn read_byte(&mut self, name: &str) -> Result<u8, DecodeError>;
    fn read_int16(&mut self, name: &str) -> Result<i16, DecodeError>;
    fn read_uint16(&mut self, name: &str) -> Result<u16, DecodeError>;
    fn read_int32(&mut self, name: &str) -> Result<i32, DecodeError>;
    fn read_uint32(&mut self, name: &str) -> Result<u32, DecodeError>;
    fn read_int64(&mut self, name: &str) -> Result<i64, DecodeError>;
    fn read_uint64(&mut self, name: &str) -> Result<u64, DecodeError>;
    fn read_float(&mut self, name: &str) -> Result<f32, DecodeError>;
    fn read_double(&mut self, name: &str) -> Result<f64, DecodeError>;
    fn read_string(&mut self, name: &str) -> Result<String, DecodeError>;
    fn read_date_time(&mut self, name: &str) -> Result<DateTime, DecodeError>;
    fn read_guid(&mut self, name: &str) -> Result<Guid, DecodeError>;
    fn read_byte_string(&mut self, name: &str) -> Result<Vec<u8>, DecodeError>;
    fn read_xml_element(&mut self, name: &str) -> Result<XmlElement, DecodeError>;
    fn read_node_id(&mut self, name: &str) -> Result<NodeId, DecodeError>;
    fn read_expanded_node_id(&mut self, name: &str) -> Result<ExpandedNodeId, DecodeError>;
    fn read_status_code(&mut self, name: &str) -> Result<StatusCode, DecodeError>;
    fn read_qualified_name(&mut self, name: &str) -> Result<QualifiedName, DecodeError>;
    fn read_localized_text(&mut self, name: &str) -> Result<LocalizedText, DecodeError>;
    fn read_extension_object(&mut self, name: &str) -> Result<ExtensionObject, DecodeError>;
    fn read_data_value(&mut self, name: &str) -> Result<DataValue, DecodeError>;
    fn read_variant(&mut self, name: &str) -> Result<Variant, DecodeError>;
    fn read_diagnostic_info(&mut self, name: &str) -> Result<DiagnosticInfo, DecodeError>;

    fn read_enumerated(&mut self, name: &str) -> Result<i32, DecodeError>;

    /// Array length prefix; a null array reads as 0.
    fn read_array_length(&mut self, name: &str) -> Result<usize, DecodeError>;

    /// Called before the fields of a nested structure.
    fn begin_structure(&mut self, _name: &str) -> Result<(), DecodeError> {
        Ok(())
    }

    /// Called after the fields of a nested structure.
    fn end_structure(&mut self, _name: &str) -> Result<(), DecodeError> {
        Ok(())
    }

    array_reader!(read_boolean_array, read_boolean, bool);
    array_reader!(read_sbyte_array, read_sbyte, i8);
    array_reader!(read_byte_array, read_byte, u8);
    array_reader!(read_int16_array, read_int16, i16);
    array_reader!(read_uint16_array, read_uint16, u16);
    array_reader!(read_int32_array, read_int32, i32);
    array_reader!(read_uint32_array, read_uint32, u32);
    array_reader!(read_int64_array, read_int64, i64);
    array_reader!(read_uint64_array, read_uint64, u64);
    array_reader!(read_float_array, read_float, f32);
    array_reader!(read_double_array, read_double, f64);
    array_reader!(read_string_array, read_string, String);
    array_reader!(read_date_time_array, read_date_time, DateTime);
    array_reader!(read_guid_array, read_guid, Guid);
    array_reader!(read_byte_string_array, read_byte_string, Vec<u8>);
    array_reader!(read_xml_element_array, read_xml_element, XmlElement);
    array_reader!(read_node_id_array, read_node_id, NodeId);
    array_reader!(read_expanded_node_id_array, read_expanded_node_id, ExpandedNodeId);
    array_reader!(read_status_code_array, read_status_code, StatusCode);
    array_reader!(read_qualified_name_array, read_qualified_name, QualifiedName);
    array_reader!(read_localized_text_array, read_localized_text, LocalizedText);
    array_reader!(read_extension_object_array, read_extension_object, ExtensionObject);
    array_reader!(read_data_value_array, read_data_value, DataValue);
    array_reader!(read_variant_array, read_variant, Variant);
    array_reader!(read_diagnostic_info_array, read_diagnostic_info, DiagnosticInfo);
    array_reader!(read_enumerated_array, read_enumerated, i32);
}

fn nested_structure_error(name: &str) -> String {
    format!("field '{}' holds a nested structure, which needs its descriptor", name)
}

/// Write a scalar or array value of any kind except nested structures.
pub fn write_value<E: Encoder + ?Sized>(
    encoder: &mut E,
    name: &str,
    value: &Value,
) -> Result<(), EncodeError> {
    match value {
        Value::Boolean(v) => encoder.write_boolean(name, *v),
        Value::SByte(v) => encoder.write_sbyte(name, *v),
        Value::Byte(v) => encoder.write_byte(name, *v),
        Value::Int16(v) => encoder.write_int16(name, *v),
        Value::UInt16(v) => encoder.write_uint16(name, *v),
        Value::Int32(v) => encoder.write_int32(name, *v),
        Value::UInt32(v) => encoder.write_uint32(name, *v),
        Value::Int64(v) => encoder.write_int64(name, *v),
        Value::UInt64(v) => encoder.write_uint64(name, *v),
        Value::Float(v) => encoder.write_float(name, *v),
        Value::Double(v) => encoder.write_double(name, *v),
        Value::String(v) => encoder.write_string(name, v),
        Value::DateTime(v) => encoder.write_date_time(name, *v),
        Value::Guid(v) => encoder.write_guid(name, v),
        Value::ByteString(v) => encoder.write_byte_string(name, v),
        Value::XmlElement(v) => encoder.write_xml_element(name, v),
        Value::NodeId(v) => encoder.write_node_id(name, v),
        Value::ExpandedNodeId(v) => encoder.write_expanded_node_id(name, v),
        Value::StatusCode(v) => encoder.write_status_code(name, *v),
        Value::QualifiedName(v) => encoder.write_qualified_name(name, v),
        Value::LocalizedText(v) => encoder.write_localized_text(name, v),
        Value::ExtensionObject(v) => encoder.write_extension_object(name, v),
        Value::DataValue(v) => encoder.write_data_value(name, v),
        Value::Variant(v) => encoder.write_variant(name, v),
        Value::DiagnosticInfo(v) => encoder.write_diagnostic_info(name, v),
        Value::Enumeration(v) => encoder.write_enumerated(name, *v),
        Value::Structure(_) => Err(EncodeError::InvalidData {
            field: name.to_string(),
            reason: nested_structure_error(name),
        }),
        Value::Array(array) => write_array(encoder, name, array),
    }
}

/// Write an array of any kind except nested structures.
pub fn write_array<E: Encoder + ?Sized>(
    encoder: &mut E,
    name: &str,
    array: &Array,
) -> Result<(), EncodeError> {
    match array {
        Array::Boolean(v) => encoder.write_boolean_array(name, v),
        Array::SByte(v) => encoder.write_sbyte_array(name, v),
        Array::Byte(v) => encoder.write_byte_array(name, v),
        Array::Int16(v) => encoder.write_int16_array(name, v),
        Array::UInt16(v) => encoder.write_uint16_array(name, v),
        Array::Int32(v) => encoder.write_int32_array(name, v),
        Array::UInt32(v) => encoder.write_uint32_array(name, v),
        Array::Int64(v) => encoder.write_int64_array(name, v),
        Array::UInt64(v) => encoder.write_uint64_array(name, v),
        Array::Float(v) => encoder.write_float_array(name, v),
        Array::Double(v) => encoder.write_double_array(name, v),
        Array::String(v) => encoder.write_string_array(name, v),
        Array::DateTime(v) => encoder.write_date_time_array(name, v),
        Array::Guid(v) => encoder.write_guid_array(name, v),
        Array::ByteString(v) => encoder.write_byte_string_array(name, v),
        Array::XmlElement(v) => encoder.write_xml_element_array(name, v),
        Array::NodeId(v) => encoder.write_node_id_array(name, v),
        Array::ExpandedNodeId(v) => encoder.write_expanded_node_id_array(name, v),
        Array::StatusCode(v) => encoder.write_status_code_array(name, v),
        Array::QualifiedName(v) => encoder.write_qualified_name_array(name, v),
        Array::LocalizedText(v) => encoder.write_localized_text_array(name, v),
        Array::ExtensionObject(v) => encoder.write_extension_object_array(name, v),
        Array::DataValue(v) => encoder.write_data_value_array(name, v),
        Array::Variant(v) => encoder.write_variant_array(name, v),
        Array::DiagnosticInfo(v) => encoder.write_diagnostic_info_array(name, v),
        Array::Enumeration(v) => encoder.write_enumerated_array(name, v),
        Array::Structure(_) => Err(EncodeError::InvalidData {
            field: name.to_string(),
            reason: nested_structure_error(name),
        }),
    }
}

/// Read a scalar of the given kind. Nested structures are rejected.
pub fn read_value<D: Decoder + ?Sized>(
    decoder: &mut D,
    name: &str,
    kind: ValueKind,
) -> Result<Value, DecodeError> {
    let value = match kind {
        ValueKind::Boolean => Value::Boolean(decoder.read_boolean(name)?),
        ValueKind::SByte => Value::SByte(decoder.read_sbyte(name)?),
        ValueKind::Byte => Value::Byte(decoder.read_byte(name)?),
        ValueKind::Int16 => Value::Int16(decoder.read_int16(name)?),
        ValueKind::UInt16 => Value::UInt16(decoder.read_uint16(name)?),
        ValueKind::Int32 => Value::Int32(decoder.read_int32(name)?),
        ValueKind::UInt32 => Value::UInt32(decoder.read_uint32(name)?),
        ValueKind::Int64 => Value::Int64(decoder.read_int64(name)?),
        ValueKind::UInt64 => Value::UInt64(decoder.read_uint64(name)?),
        ValueKind::Float => Value::Float(decoder.read_float(name)?),
        ValueKind::Double => Value::Double(decoder.read_double(name)?),
        ValueKind::String => Value::String(decoder.read_string(name)?),
        ValueKind::DateTime => Value::DateTime(decoder.read_date_time(name)?),
        ValueKind::Guid => Value::Guid(decoder.read_guid(name)?),
        ValueKind::ByteString => Value::ByteString(decoder.read_byte_string(name)?),
        ValueKind::XmlElement => Value::XmlElement(decoder.read_xml_element(name)?),
        ValueKind::NodeId => Value::NodeId(decoder.read_node_id(name)?),
        ValueKind::ExpandedNodeId => Value::ExpandedNodeId(decoder.read_expanded_node_id(name)?),
        ValueKind::StatusCode => Value::StatusCode(decoder.read_status_code(name)?),
        ValueKind::QualifiedName => Value::QualifiedName(decoder.read_qualified_name(name)?),
        ValueKind::LocalizedText => Value::LocalizedText(decoder.read_localized_text(name)?),
        ValueKind::ExtensionObject => {
            Value::ExtensionObject(Box::new(decoder.read_extension_object(name)?))
        }
        ValueKind::DataValue => Value::DataValue(Box::new(decoder.read_data_value(name)?)),
        ValueKind::Variant => Value::Variant(Box::new(decoder.read_variant(name)?)),
        ValueKind::DiagnosticInfo => {
            Value::DiagnosticInfo(Box::new(decoder.read_diagnostic_info(name)?))
        }
        ValueKind::Enumeration => Value::Enumeration(decoder.read_enumerated(name)?),
        ValueKind::Structure => {
            return Err(DecodeError::InvalidData {
                field: name.to_string(),
                reason: nested_structure_error(name),
            })
        }
    };
    Ok(value)
}

/// Read an array of the given element kind. Nested structures are rejected.
pub fn read_array<D: Decoder + ?Sized>(
    decoder: &mut D,
    name: &str,
    kind: ValueKind,
) -> Result<Array, DecodeError> {
    let array = match kind {
        ValueKind::Boolean => Array::Boolean(decoder.read_boolean_array(name)?),
        ValueKind::SByte => Array::SByte(decoder.read_sbyte_array(name)?),
        ValueKind::Byte => Array::Byte(decoder.read_byte_array(name)?),
        ValueKind::Int16 => Array::Int16(decoder.read_int16_array(name)?),
        ValueKind::UInt16 => Array::UInt16(decoder.read_uint16_array(name)?),
        ValueKind::Int32 => Array::Int32(decoder.read_int32_array(name)?),
        ValueKind::UInt32 => Array::UInt32(decoder.read_uint32_array(name)?),
        ValueKind::Int64 => Array::Int64(decoder.read_int64_array(name)?),
        ValueKind::UInt64 => Array::UInt64(decoder.read_uint64_array(name)?),
        ValueKind::Float => Array::Float(decoder.read_float_array(name)?),
        ValueKind::Double => Array::Double(decoder.read_double_array(name)?),
        ValueKind::String => Array::String(decoder.read_string_array(name)?),
        ValueKind::DateTime => Array::DateTime(decoder.read_date_time_array(name)?),
        ValueKind::Guid => Array::Guid(decoder.read_guid_array(name)?),
        ValueKind::ByteString => Array::ByteString(decoder.read_byte_string_array(name)?),
        ValueKind::XmlElement => Array::XmlElement(decoder.read_xml_element_array(name)?),
        ValueKind::NodeId => Array::NodeId(decoder.read_node_id_array(name)?),
        ValueKind::ExpandedNodeId => {
            Array::ExpandedNodeId(decoder.read_expanded_node_id_array(name)?)
        }
        ValueKind::StatusCode => Array::StatusCode(decoder.read_status_code_array(name)?),
        ValueKind::QualifiedName => Array::QualifiedName(decoder.read_qualified_name_array(name)?),
        ValueKind::LocalizedText => Array::LocalizedText(decoder.read_localized_text_array(name)?),
        ValueKind::ExtensionObject => {
            Array::ExtensionObject(decoder.read_extension_object_array(name)?)
        }
        ValueKind::DataValue => Array::DataValue(decoder.read_data_value_array(name)?),
        ValueKind::Variant => Array::Variant(decoder.read_variant_array(name)?),
        ValueKind::DiagnosticInfo => {
            Array::DiagnosticInfo(decoder.read_diagnostic_info_array(name)?)
        }
        ValueKind::Enumeration => Array::Enumeration(decoder.read_enumerated_array(name)?),
        ValueKind::Structure => {
            return Err(DecodeError::InvalidData {
                field: name.to_string(),
                reason: nested_structure_error(name),
            })
        }
    };
    Ok(array)
}
