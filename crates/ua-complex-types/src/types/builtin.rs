// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Built-in protocol value types that are not plain Rust primitives.

use crate::types::{Array, NodeId, Value};
use std::fmt;
use std::str::FromStr;

/// Raw byte string.
pub type ByteString = Vec<u8>;

/// 100-nanosecond ticks between 1601-01-01 and 1970-01-01.
const UNIX_EPOCH_TICKS: i64 = 116_444_736_000_000_000;
const TICKS_PER_MILLI: i64 = 10_000;

/// Timestamp as 100ns ticks since 1601-01-01 UTC.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DateTime(i64);

impl DateTime {
    /// The minimum (null) timestamp.
    pub const MIN: DateTime = DateTime(0);

    pub fn from_ticks(ticks: i64) -> Self {
        Self(ticks)
    }

    pub fn ticks(self) -> i64 {
        self.0
    }

    /// Build from milliseconds since the Unix epoch.
    pub fn from_unix_millis(millis: i64) -> Self {
        Self(
            millis
                .saturating_mul(TICKS_PER_MILLI)
                .saturating_add(UNIX_EPOCH_TICKS),
        )
    }

    /// Milliseconds since the Unix epoch (negative before 1970).
    pub fn to_unix_millis(self) -> i64 {
        (self.0 - UNIX_EPOCH_TICKS) / TICKS_PER_MILLI
    }
}

/// 128-bit identifier in the protocol's mixed-endian field layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Guid {
    pub data1: u32,
    pub data2: u16,
    pub data3: u16,
    pub data4: [u8; 8],
}

impl Guid {
    pub const NULL: Guid = Guid {
        data1: 0,
        data2: 0,
        data3: 0,
        data4: [0; 8],
    };

    pub fn new(data1: u32, data2: u16, data3: u16, data4: [u8; 8]) -> Self {
        Self {
            data1,
            data2,
            data3,
            data4,
        }
    }

    pub fn is_null(&self) -> bool {
        *self == Self::NULL
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:08x}-{:04x}-{:04x}-{:02x}{:02x}-",
            self.data1, self.data2, self.data3, self.data4[0], self.data4[1]
        )?;
        for b in &self.data4[2..] {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

impl FromStr for Guid {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('-').collect();
        let lengths = [8usize, 4, 4, 4, 12];
        if parts.len() != 5 || parts.iter().zip(lengths).any(|(p, len)| p.len() != len) {
            return Err(format!("malformed guid: {}", s));
        }
        let bad = |_| format!("malformed guid: {}", s);
        let data1 = u32::from_str_radix(parts[0], 16).map_err(bad)?;
        let data2 = u16::from_str_radix(parts[1], 16).map_err(bad)?;
        let data3 = u16::from_str_radix(parts[2], 16).map_err(bad)?;
        let tail = format!("{}{}", parts[3], parts[4]);
        let mut data4 = [0u8; 8];
        for (i, byte) in data4.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&tail[i * 2..i * 2 + 2], 16).map_err(bad)?;
        }
        Ok(Self::new(data1, data2, data3, data4))
    }
}

/// Operation status code (severity in the top two bits).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct StatusCode(pub u32);

impl StatusCode {
    pub const GOOD: StatusCode = StatusCode(0);
    pub const BAD_DECODING_ERROR: StatusCode = StatusCode(0x8007_0000);

    pub fn is_good(self) -> bool {
        self.0 & 0xC000_0000 == 0
    }

    pub fn is_uncertain(self) -> bool {
        self.0 & 0xC000_0000 == 0x4000_0000
    }

    pub fn is_bad(self) -> bool {
        self.0 & 0x8000_0000 != 0
    }
}

/// Name qualified by a namespace index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    pub namespace_index: u16,
    pub name: String,
}

impl QualifiedName {
    pub fn new(namespace_index: u16, name: impl Into<String>) -> Self {
        Self {
            namespace_index,
            name: name.into(),
        }
    }
}

/// Human-readable text with an optional locale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct LocalizedText {
    pub locale: Option<String>,
    pub text: Option<String>,
}

impl LocalizedText {
    pub fn new(locale: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            locale: Some(locale.into()),
            text: Some(text.into()),
        }
    }

    /// Text without a locale.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            locale: None,
            text: Some(text.into()),
        }
    }
}

/// XML fragment carried as UTF-8 text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct XmlElement(pub String);

impl XmlElement {
    pub fn new(xml: impl Into<String>) -> Self {
        Self(xml.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Vendor diagnostics attached to a status code.
///
/// Indices refer to the string table of the enclosing response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticInfo {
    pub symbolic_id: Option<i32>,
    pub namespace_uri: Option<i32>,
    pub locale: Option<i32>,
    pub localized_text: Option<i32>,
    pub additional_info: Option<String>,
    pub inner_status_code: Option<StatusCode>,
    pub inner_diagnostic_info: Option<Box<DiagnosticInfo>>,
}

/// A value with its quality and timestamps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataValue {
    pub value: Option<Variant>,
    pub status: Option<StatusCode>,
    pub source_timestamp: Option<DateTime>,
    pub source_picoseconds: Option<u16>,
    pub server_timestamp: Option<DateTime>,
    pub server_picoseconds: Option<u16>,
}

impl DataValue {
    pub fn new(value: Variant) -> Self {
        Self {
            value: Some(value),
            ..Self::default()
        }
    }
}

/// Body of an [`ExtensionObject`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExtensionObjectBody {
    #[default]
    None,
    /// Binary-encoded structure body.
    Binary(ByteString),
    /// XML-encoded structure body.
    Xml(XmlElement),
}

/// Opaque encoded structure tagged with its encoding id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionObject {
    /// Encoding id (binary or XML) of the contained structure.
    pub type_id: NodeId,
    pub body: ExtensionObjectBody,
}

impl ExtensionObject {
    pub fn binary(type_id: NodeId, body: ByteString) -> Self {
        Self {
            type_id,
            body: ExtensionObjectBody::Binary(body),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.body, ExtensionObjectBody::None)
    }
}

/// Self-describing value of any built-in kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Variant {
    #[default]
    Empty,
    /// A built-in scalar (never an enumeration, structure or nested variant).
    Scalar(Value),
    /// One-dimensional array of a built-in kind.
    Array(Array),
}

impl Variant {
    /// Wrap a value, routing arrays to [`Variant::Array`].
    pub fn new(value: impl Into<Value>) -> Self {
        match value.into() {
            Value::Array(array) => Self::Array(array),
            scalar => Self::Scalar(scalar),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guid_text_roundtrip() {
        let guid = Guid::new(
            0x72962B91,
            0xFA75,
            0x4AE6,
            [0x8D, 0x28, 0xB4, 0x04, 0xDC, 0x7D, 0xAF, 0x63],
        );
        let text = guid.to_string();
        assert_eq!(text, "72962b91-fa75-4ae6-8d28-b404dc7daf63");
        assert_eq!(text.parse::<Guid>(), Ok(guid));
        assert!("72962b91-fa75".parse::<Guid>().is_err());
    }

    #[test]
    fn test_date_time_unix_conversion() {
        let dt = DateTime::from_unix_millis(1_702_900_000_000);
        assert_eq!(dt.to_unix_millis(), 1_702_900_000_000);
        assert_eq!(DateTime::from_unix_millis(0).ticks(), UNIX_EPOCH_TICKS);
    }

    #[test]
    fn test_status_code_severity() {
        assert!(StatusCode::GOOD.is_good());
        assert!(StatusCode::BAD_DECODING_ERROR.is_bad());
        assert!(StatusCode(0x4000_0000).is_uncertain());
    }

    #[test]
    fn test_variant_from_value() {
        assert_eq!(Variant::new(5i32), Variant::Scalar(Value::Int32(5)));
        assert_eq!(
            Variant::new(vec![1u16, 2]),
            Variant::Array(Array::UInt16(vec![1, 2]))
        );
    }
}
