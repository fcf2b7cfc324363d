// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Test encoder that records every call instead of producing bytes.

use super::{Encoder, NamespaceStack};
use crate::error::EncodeError;
use crate::types::{
    DataValue, DateTime, DiagnosticInfo, ExpandedNodeId, ExtensionObject, Guid, LocalizedText,
    NodeId, QualifiedName, StatusCode, Value, Variant, XmlElement,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Push(String),
    Pop,
    Write(String, Value),
    ArrayLength(String, usize),
    Begin(String),
    End(String),
}

#[derive(Debug, Default)]
pub struct RecordingEncoder {
    pub events: Vec<Event>,
    namespaces: Vec<String>,
}

impl RecordingEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Namespaces currently pushed.
    pub fn depth(&self) -> usize {
        self.namespaces.len()
    }

    /// Names of all scalar writes, in order.
    pub fn written_names(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Write(name, _) => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    fn record(&mut self, name: &str, value: Value) -> Result<(), EncodeError> {
        self.events.push(Event::Write(name.to_string(), value));
        Ok(())
    }
}

impl NamespaceStack for RecordingEncoder {
    fn push_namespace(&mut self, namespace_uri: &str) {
        self.namespaces.push(namespace_uri.to_string());
        self.events.push(Event::Push(namespace_uri.to_string()));
    }

    fn pop_namespace(&mut self) {
        self.namespaces.pop();
        self.events.push(Event::Pop);
    }
}

impl Encoder for RecordingEncoder {
    fn write_boolean(&mut self, name: &str, value: bool) -> Result<(), EncodeError> {
        self.record(name, Value::Boolean(value))
    }
    fn write_sbyte(&mut self, name: &str, value: i8) -> Result<(), EncodeError> {
        self.record(name, Value::SByte(value))
    }
    fn write_byte(&mut self, name: &str, value: u8) -> Result<(), EncodeError> {
        self.record(name, Value::Byte(value))
    }
    fn write_int16(&mut self, name: &str, value: i16) -> Result<(), EncodeError> {
        self.record(name, Value::Int16(value))
    }
    fn write_uint16(&mut self, name: &str, value: u16) -> Result<(), EncodeError> {
        self.record(name, Value::UInt16(value))
    }
    fn write_int32(&mut self, name: &str, value: i32) -> Result<(), EncodeError> {
        self.record(name, Value::Int32(value))
    }
    fn write_uint32(&mut self, name: &str, value: u32) -> Result<(), EncodeError> {
        self.record(name, Value::UInt32(value))
    }
    fn write_int64(&mut self, name: &str, value: i64) -> Result<(), EncodeError> {
        self.record(name, Value::Int64(value))
    }
    fn write_uint64(&mut self, name: &str, value: u64) -> Result<(), EncodeError> {
        self.record(name, Value::UInt64(value))
    }
    fn write_float(&mut self, name: &str, value: f32) -> Result<(), EncodeError> {
        self.record(name, Value::Float(value))
    }
    fn write_double(&mut self, name: &str, value: f64) -> Result<(), EncodeError> {
        self.record(name, Value::Double(value))
    }
    fn write_string(&mut self, name: &str, value: &str) -> Result<(), EncodeError> {
        self.record(name, Value::String(value.to_string()))
    }
    fn write_date_time(&mut self, name: &str, value: DateTime) -> Result<(), EncodeError> {
        self.record(name, Value::DateTime(value))
    }
    fn write_guid(&mut self, name: &str, value: &Guid) -> Result<(), EncodeError> {
        self.record(name, Value::Guid(*value))
    }
    fn write_byte_string(&mut self, name: &str, value: &[u8]) -> Result<(), EncodeError> {
        self.record(name, Value::ByteString(value.to_vec()))
    }
    fn write_xml_element(&mut self, name: &str, value: &XmlElement) -> Result<(), EncodeError> {
        self.record(name, Value::XmlElement(value.clone()))
    }
    fn write_node_id(&mut self, name: &str, value: &NodeId) -> Result<(), EncodeError> {
        self.record(name, Value::NodeId(value.clone()))
    }
    fn write_expanded_node_id(
        &mut self,
        name: &str,
        value: &ExpandedNodeId,
    ) -> Result<(), EncodeError> {
        self.record(name, Value::ExpandedNodeId(value.clone()))
    }
    fn write_status_code(&mut self, name: &str, value: StatusCode) -> Result<(), EncodeError> {
        self.record(name, Value::StatusCode(value))
    }
    fn write_qualified_name(
        &mut self,
        name: &str,
        value: &QualifiedName,
    ) -> Result<(), EncodeError> {
        self.record(name, Value::QualifiedName(value.clone()))
    }
    fn write_localized_text(
        &mut self,
        name: &str,
        value: &LocalizedText,
    ) -> Result<(), EncodeError> {
        self.record(name, Value::LocalizedText(value.clone()))
    }
    fn write_extension_object(
        &mut self,
        name: &str,
        value: &ExtensionObject,
    ) -> Result<(), EncodeError> {
        self.record(name, Value::ExtensionObject(Box::new(value.clone())))
    }
    fn write_data_value(&mut self, name: &str, value: &DataValue) -> Result<(), EncodeError> {
        self.record(name, Value::DataValue(Box::new(value.clone())))
    }
    fn write_variant(&mut self, name: &str, value: &Variant) -> Result<(), EncodeError> {
        self.record(name, Value::Variant(Box::new(value.clone())))
    }
    fn write_diagnostic_info(
        &mut self,
        name: &str,
        value: &DiagnosticInfo,
    ) -> Result<(), EncodeError> {
        self.record(name, Value::DiagnosticInfo(Box::new(value.clone())))
    }
    fn write_enumerated(&mut self, name: &str, value: i32) -> Result<(), EncodeError> {
        self.record(name, Value::Enumeration(value))
    }
    fn write_array_length(&mut self, name: &str, len: usize) -> Result<(), EncodeError> {
        self.events.push(Event::ArrayLength(name.to_string(), len));
        Ok(())
    }
    fn begin_structure(&mut self, name: &str) -> Result<(), EncodeError> {
        self.events.push(Event::Begin(name.to_string()));
        Ok(())
    }
    fn end_structure(&mut self, name: &str) -> Result<(), EncodeError> {
        self.events.push(Event::End(name.to_string()));
        Ok(())
    }
}
