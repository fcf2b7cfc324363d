// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Field values.

use crate::dynamic::ComplexData;
use crate::types::{
    ByteString, DataValue, DateTime, DiagnosticInfo, ExpandedNodeId, ExtensionObject, Guid,
    LocalizedText, NodeId, QualifiedName, StatusCode, ValueKind, Variant, XmlElement,
};

/// A single field value: one scalar of any kind, or a one-dimensional array.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Boolean(bool),
    SByte(i8),
    Byte(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Float(f32),
    Double(f64),
    String(String),
    DateTime(DateTime),
    Guid(Guid),
    ByteString(ByteString),
    XmlElement(XmlElement),
    NodeId(NodeId),
    ExpandedNodeId(ExpandedNodeId),
    StatusCode(StatusCode),
    QualifiedName(QualifiedName),
    LocalizedText(LocalizedText),
    ExtensionObject(Box<ExtensionObject>),
    DataValue(Box<DataValue>),
    Variant(Box<Variant>),
    DiagnosticInfo(Box<DiagnosticInfo>),
    /// Enumeration wire value.
    Enumeration(i32),
    /// Nested structure instance.
    Structure(ComplexData),
    Array(Array),
}

/// Homogeneous one-dimensional array.
#[derive(Debug, Clone, PartialEq)]
pub enum Array {
    Boolean(Vec<bool>),
    SByte(Vec<i8>),
    Byte(Vec<u8>),
    Int16(Vec<i16>),
    UInt16(Vec<u16>),
    Int32(Vec<i32>),
    UInt32(Vec<u32>),
    Int64(Vec<i64>),
    UInt64(Vec<u64>),
    Float(Vec<f32>),
    Double(Vec<f64>),
    String(Vec<String>),
    DateTime(Vec<DateTime>),
    Guid(Vec<Guid>),
    ByteString(Vec<ByteString>),
    XmlElement(Vec<XmlElement>),
    NodeId(Vec<NodeId>),
    ExpandedNodeId(Vec<ExpandedNodeId>),
    StatusCode(Vec<StatusCode>),
    QualifiedName(Vec<QualifiedName>),
    LocalizedText(Vec<LocalizedText>),
    ExtensionObject(Vec<ExtensionObject>),
    DataValue(Vec<DataValue>),
    Variant(Vec<Variant>),
    DiagnosticInfo(Vec<DiagnosticInfo>),
    Enumeration(Vec<i32>),
    Structure(Vec<ComplexData>),
}

/// Expands `$body` once per array variant with `$v` bound to the inner Vec.
macro_rules! each_array {
    ($array:expr, $v:ident => $body:expr) => {
        match $array {
            Array::Boolean($v) => $body,
            Array::SByte($v) => $body,
            Array::Byte($v) => $body,
            Array::Int16($v) => $body,
            Array::UInt16($v) => $body,
            Array::Int32($v) => $body,
            Array::UInt32($v) => $body,
            Array::Int64($v) => $body,
            Array::UInt64($v) => $body,
            Array::Float($v) => $body,
            Array::Double($v) => $body,
            Array::String($v) => $body,
            Array::DateTime($v) => $body,
            Array::Guid($v) => $body,
            Array::ByteString($v) => $body,
            Array::XmlElement($v) => $body,
            Array::NodeId($v) => $body,
            Array::ExpandedNodeId($v) => $body,
            Array::StatusCode($v) => $body,
            Array::QualifiedName($v) => $body,
            Array::LocalizedText($v) => $body,
            Array::ExtensionObject($v) => $body,
            Array::DataValue($v) => $body,
            Array::Variant($v) => $body,
            Array::DiagnosticInfo($v) => $body,
            Array::Enumeration($v) => $body,
            Array::Structure($v) => $body,
        }
    };
}

impl Array {
    /// Empty array of the given element kind.
    pub fn empty(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Boolean => Self::Boolean(Vec::new()),
            ValueKind::SByte => Self::SByte(Vec::new()),
            ValueKind::Byte => Self::Byte(Vec::new()),
            ValueKind::Int16 => Self::Int16(Vec::new()),
            ValueKind::UInt16 => Self::UInt16(Vec::new()),
            ValueKind::Int32 => Self::Int32(Vec::new()),
            ValueKind::UInt32 => Self::UInt32(Vec::new()),
            ValueKind::Int64 => Self::Int64(Vec::new()),
            ValueKind::UInt64 => Self::UInt64(Vec::new()),
            ValueKind::Float => Self::Float(Vec::new()),
            ValueKind::Double => Self::Double(Vec::new()),
            ValueKind::String => Self::String(Vec::new()),
            ValueKind::DateTime => Self::DateTime(Vec::new()),
            ValueKind::Guid => Self::Guid(Vec::new()),
            ValueKind::ByteString => Self::ByteString(Vec::new()),
            ValueKind::XmlElement => Self::XmlElement(Vec::new()),
            ValueKind::NodeId => Self::NodeId(Vec::new()),
            ValueKind::ExpandedNodeId => Self::ExpandedNodeId(Vec::new()),
            ValueKind::StatusCode => Self::StatusCode(Vec::new()),
            ValueKind::QualifiedName => Self::QualifiedName(Vec::new()),
            ValueKind::LocalizedText => Self::LocalizedText(Vec::new()),
            ValueKind::ExtensionObject => Self::ExtensionObject(Vec::new()),
            ValueKind::DataValue => Self::DataValue(Vec::new()),
            ValueKind::Variant => Self::Variant(Vec::new()),
            ValueKind::DiagnosticInfo => Self::DiagnosticInfo(Vec::new()),
            ValueKind::Enumeration => Self::Enumeration(Vec::new()),
            ValueKind::Structure => Self::Structure(Vec::new()),
        }
    }

    /// Element kind.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Boolean(_) => ValueKind::Boolean,
            Self::SByte(_) => ValueKind::SByte,
            Self::Byte(_) => ValueKind::Byte,
            Self::Int16(_) => ValueKind::Int16,
            Self::UInt16(_) => ValueKind::UInt16,
            Self::Int32(_) => ValueKind::Int32,
            Self::UInt32(_) => ValueKind::UInt32,
            Self::Int64(_) => ValueKind::Int64,
            Self::UInt64(_) => ValueKind::UInt64,
            Self::Float(_) => ValueKind::Float,
            Self::Double(_) => ValueKind::Double,
            Self::String(_) => ValueKind::String,
            Self::DateTime(_) => ValueKind::DateTime,
            Self::Guid(_) => ValueKind::Guid,
            Self::ByteString(_) => ValueKind::ByteString,
            Self::XmlElement(_) => ValueKind::XmlElement,
            Self::NodeId(_) => ValueKind::NodeId,
            Self::ExpandedNodeId(_) => ValueKind::ExpandedNodeId,
            Self::StatusCode(_) => ValueKind::StatusCode,
            Self::QualifiedName(_) => ValueKind::QualifiedName,
            Self::LocalizedText(_) => ValueKind::LocalizedText,
            Self::ExtensionObject(_) => ValueKind::ExtensionObject,
            Self::DataValue(_) => ValueKind::DataValue,
            Self::Variant(_) => ValueKind::Variant,
            Self::DiagnosticInfo(_) => ValueKind::DiagnosticInfo,
            Self::Enumeration(_) => ValueKind::Enumeration,
            Self::Structure(_) => ValueKind::Structure,
        }
    }

    pub fn len(&self) -> usize {
        each_array!(self, v => v.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Value {
    /// Kind of the value; for arrays, the element kind.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Boolean(_) => ValueKind::Boolean,
            Self::SByte(_) => ValueKind::SByte,
            Self::Byte(_) => ValueKind::Byte,
            Self::Int16(_) => ValueKind::Int16,
            Self::UInt16(_) => ValueKind::UInt16,
            Self::Int32(_) => ValueKind::Int32,
            Self::UInt32(_) => ValueKind::UInt32,
            Self::Int64(_) => ValueKind::Int64,
            Self::UInt64(_) => ValueKind::UInt64,
            Self::Float(_) => ValueKind::Float,
            Self::Double(_) => ValueKind::Double,
            Self::String(_) => ValueKind::String,
            Self::DateTime(_) => ValueKind::DateTime,
            Self::Guid(_) => ValueKind::Guid,
            Self::ByteString(_) => ValueKind::ByteString,
            Self::XmlElement(_) => ValueKind::XmlElement,
            Self::NodeId(_) => ValueKind::NodeId,
            Self::ExpandedNodeId(_) => ValueKind::ExpandedNodeId,
            Self::StatusCode(_) => ValueKind::StatusCode,
            Self::QualifiedName(_) => ValueKind::QualifiedName,
            Self::LocalizedText(_) => ValueKind::LocalizedText,
            Self::ExtensionObject(_) => ValueKind::ExtensionObject,
            Self::DataValue(_) => ValueKind::DataValue,
            Self::Variant(_) => ValueKind::Variant,
            Self::DiagnosticInfo(_) => ValueKind::DiagnosticInfo,
            Self::Enumeration(_) => ValueKind::Enumeration,
            Self::Structure(_) => ValueKind::Structure,
            Self::Array(array) => array.kind(),
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Kind name with an `[]` suffix for arrays, for diagnostics.
    pub fn type_name(&self) -> String {
        if self.is_array() {
            format!("{}[]", self.kind())
        } else {
            self.kind().to_string()
        }
    }

    /// Zero value of a scalar kind.
    ///
    /// Returns `None` for `Structure`, whose default needs a descriptor.
    pub fn default_scalar(kind: ValueKind) -> Option<Self> {
        let value = match kind {
            ValueKind::Boolean => Self::Boolean(false),
            ValueKind::SByte => Self::SByte(0),
            ValueKind::Byte => Self::Byte(0),
            ValueKind::Int16 => Self::Int16(0),
            ValueKind::UInt16 => Self::UInt16(0),
            ValueKind::Int32 => Self::Int32(0),
            ValueKind::UInt32 => Self::UInt32(0),
            ValueKind::Int64 => Self::Int64(0),
            ValueKind::UInt64 => Self::UInt64(0),
            ValueKind::Float => Self::Float(0.0),
            ValueKind::Double => Self::Double(0.0),
            ValueKind::String => Self::String(String::new()),
            ValueKind::DateTime => Self::DateTime(DateTime::MIN),
            ValueKind::Guid => Self::Guid(Guid::NULL),
            ValueKind::ByteString => Self::ByteString(Vec::new()),
            ValueKind::XmlElement => Self::XmlElement(XmlElement::default()),
            ValueKind::NodeId => Self::NodeId(NodeId::NULL),
            ValueKind::ExpandedNodeId => Self::ExpandedNodeId(ExpandedNodeId::default()),
            ValueKind::StatusCode => Self::StatusCode(StatusCode::GOOD),
            ValueKind::QualifiedName => Self::QualifiedName(QualifiedName::default()),
            ValueKind::LocalizedText => Self::LocalizedText(LocalizedText::default()),
            ValueKind::ExtensionObject => Self::ExtensionObject(Box::default()),
            ValueKind::DataValue => Self::DataValue(Box::default()),
            ValueKind::Variant => Self::Variant(Box::default()),
            ValueKind::DiagnosticInfo => Self::DiagnosticInfo(Box::default()),
            ValueKind::Enumeration => Self::Enumeration(0),
            ValueKind::Structure => return None,
        };
        Some(value)
    }

    /// Try to get as a nested structure.
    pub fn as_structure(&self) -> Option<&ComplexData> {
        match self {
            Self::Structure(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as a string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as an array.
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Self::Array(v) => Some(v),
            _ => None,
        }
    }
}

/// Conversion out of a [`Value`], used by typed field getters.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! impl_value_conversions {
    ($ty:ty, $variant:ident) => {
        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::$variant(v)
            }
        }

        impl FromValue for $ty {
            fn from_value(value: &Value) -> Option<Self> {
                match value {
                    Value::$variant(v) => Some(v.clone()),
                    _ => None,
                }
            }
        }

        impl From<Vec<$ty>> for Array {
            fn from(v: Vec<$ty>) -> Self {
                Array::$variant(v)
            }
        }
    };
}

macro_rules! impl_boxed_conversions {
    ($ty:ty, $variant:ident) => {
        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::$variant(Box::new(v))
            }
        }

        impl FromValue for $ty {
            fn from_value(value: &Value) -> Option<Self> {
                match value {
                    Value::$variant(v) => Some((**v).clone()),
                    _ => None,
                }
            }
        }

        impl From<Vec<$ty>> for Array {
            fn from(v: Vec<$ty>) -> Self {
                Array::$variant(v)
            }
        }
    };
}

/// Vec conversions that go through [`Array`]. `Vec<u8>` is left out and maps
/// to `ByteString`.
macro_rules! impl_array_conversions {
    ($ty:ty, $variant:ident) => {
        impl From<Vec<$ty>> for Value {
            fn from(v: Vec<$ty>) -> Self {
                Value::Array(Array::$variant(v))
            }
        }

        impl FromValue for Vec<$ty> {
            fn from_value(value: &Value) -> Option<Self> {
                match value {
                    Value::Array(Array::$variant(v)) => Some(v.clone()),
                    _ => None,
                }
            }
        }
    };
}

impl_value_conversions!(bool, Boolean);
impl_value_conversions!(i8, SByte);
impl_value_conversions!(u8, Byte);
impl_value_conversions!(i16, Int16);
impl_value_conversions!(u16, UInt16);
impl_value_conversions!(i32, Int32);
impl_value_conversions!(u32, UInt32);
impl_value_conversions!(i64, Int64);
impl_value_conversions!(u64, UInt64);
impl_value_conversions!(f32, Float);
impl_value_conversions!(f64, Double);
impl_value_conversions!(String, String);
impl_value_conversions!(DateTime, DateTime);
impl_value_conversions!(Guid, Guid);
impl_value_conversions!(XmlElement, XmlElement);
impl_value_conversions!(NodeId, NodeId);
impl_value_conversions!(ExpandedNodeId, ExpandedNodeId);
impl_value_conversions!(StatusCode, StatusCode);
impl_value_conversions!(QualifiedName, QualifiedName);
impl_value_conversions!(LocalizedText, LocalizedText);
impl_value_conversions!(ComplexData, Structure);

impl_boxed_conversions!(ExtensionObject, ExtensionObject);
impl_boxed_conversions!(DataValue, DataValue);
impl_boxed_conversions!(Variant, Variant);
impl_boxed_conversions!(DiagnosticInfo, DiagnosticInfo);

impl_array_conversions!(bool, Boolean);
impl_array_conversions!(i8, SByte);
impl_array_conversions!(i16, Int16);
impl_array_conversions!(u16, UInt16);
impl_array_conversions!(i32, Int32);
impl_array_conversions!(u32, UInt32);
impl_array_conversions!(i64, Int64);
impl_array_conversions!(u64, UInt64);
impl_array_conversions!(f32, Float);
impl_array_conversions!(f64, Double);
impl_array_conversions!(String, String);
impl_array_conversions!(DateTime, DateTime);
impl_array_conversions!(Guid, Guid);
impl_array_conversions!(ByteString, ByteString);
impl_array_conversions!(XmlElement, XmlElement);
impl_array_conversions!(NodeId, NodeId);
impl_array_conversions!(ExpandedNodeId, ExpandedNodeId);
impl_array_conversions!(StatusCode, StatusCode);
impl_array_conversions!(QualifiedName, QualifiedName);
impl_array_conversions!(LocalizedText, LocalizedText);
impl_array_conversions!(ExtensionObject, ExtensionObject);
impl_array_conversions!(DataValue, DataValue);
impl_array_conversions!(Variant, Variant);
impl_array_conversions!(DiagnosticInfo, DiagnosticInfo);
impl_array_conversions!(ComplexData, Structure);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<ByteString> for Value {
    fn from(v: ByteString) -> Self {
        Value::ByteString(v)
    }
}

impl FromValue for ByteString {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::ByteString(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl From<Array> for Value {
    fn from(v: Array) -> Self {
        Value::Array(v)
    }
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_kind_of_arrays() {
        let v = Value::from(vec![1.5f64, 2.5]);
        assert!(v.is_array());
        assert_eq!(v.kind(), ValueKind::Double);
        assert_eq!(v.type_name(), "Double[]");
        assert_eq!(v.as_array().map(Array::len), Some(2));
    }

    #[test]
    fn test_byte_vec_is_byte_string() {
        let v = Value::from(vec![1u8, 2, 3]);
        assert_eq!(v.kind(), ValueKind::ByteString);
        assert!(!v.is_array());
    }

    #[test]
    fn test_default_scalars() {
        for kind in ValueKind::BUILTIN {
            let v = Value::default_scalar(kind).expect("builtin default");
            assert_eq!(v.kind(), kind);
        }
        assert_eq!(
            Value::default_scalar(ValueKind::Enumeration),
            Some(Value::Enumeration(0))
        );
        assert_eq!(Value::default_scalar(ValueKind::Structure), None);
    }

    #[test]
    fn test_from_value_roundtrip() {
        let v = Value::from("pump");
        assert_eq!(String::from_value(&v), Some("pump".to_string()));
        assert_eq!(i32::from_value(&v), None);

        let dv = Value::from(DataValue::new(Variant::new(3u32)));
        let back = DataValue::from_value(&dv).expect("data value");
        assert_eq!(back.value, Some(Variant::Scalar(Value::UInt32(3))));

        let arr = Value::from(vec!["a".to_string()]);
        assert_eq!(Vec::<String>::from_value(&arr), Some(vec!["a".to_string()]));
    }

    #[test]
    fn test_empty_array_kinds() {
        assert_eq!(Array::empty(ValueKind::Guid).kind(), ValueKind::Guid);
        assert!(Array::empty(ValueKind::Structure).is_empty());
    }
}
