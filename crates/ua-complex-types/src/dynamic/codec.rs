// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Structure codec: Plain, WithOptionalFields and Union protocols over the
//! [`Encoder`] / [`Decoder`] boundary.

use crate::config::{OPTIONAL_FIELD_MASK_NAME, SWITCH_FIELD_NAME};
use crate::dynamic::{ComplexData, FieldDescriptor, FieldType, StructureDescriptor, StructureKind};
use crate::encoding::{
    read_array, read_value, write_value, BinaryDecoder, BinaryEncoder, Decoder, Encoder,
    NamespaceScope,
};
use crate::error::{DecodeError, Error, Result};
use crate::types::{Array, Value};
use std::borrow::Cow;
use std::sync::Arc;

/// Upper bound on speculative capacity for structure arrays.
const PREALLOC_CAP: usize = 1024;

/// Encode `data` with the binary encoding.
pub fn encode_binary(data: &ComplexData) -> Result<Vec<u8>> {
    let mut encoder = BinaryEncoder::new();
    encode_structure(&mut encoder, data)?;
    Ok(encoder.into_bytes())
}

/// Decode a `descriptor` instance from binary bytes (default limits).
pub fn decode_binary(bytes: &[u8], descriptor: &Arc<StructureDescriptor>) -> Result<ComplexData> {
    let mut decoder = BinaryDecoder::new(bytes);
    ComplexData::decode_new(descriptor, &mut decoder)
}

/// Encode one structure. The structure namespace is pushed for the duration.
pub fn encode_structure<E: Encoder + ?Sized>(encoder: &mut E, data: &ComplexData) -> Result<()> {
    let desc = data.descriptor();
    let mut scope = NamespaceScope::new(encoder, &desc.namespace_uri);
    let encoder = &mut *scope;

    match desc.structure_kind() {
        StructureKind::Plain => {
            for (field, value) in desc.fields().iter().zip(data.values()) {
                encode_field(encoder, field, value_or_default(field, value))?;
            }
        }
        StructureKind::WithOptionalFields => {
            let mut mask = 0u32;
            for (index, value) in data.values().iter().enumerate() {
                if let (Some(bit), Some(_)) = (desc.optional_bit(index), value) {
                    mask |= 1 << bit;
                }
            }
            encoder.write_uint32(OPTIONAL_FIELD_MASK_NAME, mask)?;

            for (index, (field, value)) in desc.fields().iter().zip(data.values()).enumerate() {
                match (desc.optional_bit(index), value) {
                    (Some(_), Some(v)) => encode_field(encoder, field, Cow::Borrowed(v))?,
                    (Some(_), None) => {}
                    (None, _) => encode_field(encoder, field, value_or_default(field, value))?,
                }
            }
        }
        StructureKind::Union => match data.values().iter().position(Option::is_some) {
            None => encoder.write_uint32(SWITCH_FIELD_NAME, 0)?,
            Some(index) => {
                encoder.write_uint32(SWITCH_FIELD_NAME, index as u32 + 1)?;
                if let Some(value) = &data.values()[index] {
                    encode_field(encoder, &desc.fields()[index], Cow::Borrowed(value))?;
                }
            }
        },
    }
    Ok(())
}

fn value_or_default<'a>(field: &FieldDescriptor, value: &'a Option<Value>) -> Cow<'a, Value> {
    match value {
        Some(v) => Cow::Borrowed(v),
        None => Cow::Owned(field.default_value()),
    }
}

fn encode_field<E: Encoder + ?Sized>(
    encoder: &mut E,
    field: &FieldDescriptor,
    value: Cow<'_, Value>,
) -> Result<()> {
    let name = field.name.as_str();
    match &field.field_type {
        FieldType::Builtin(kind) if !kind.is_builtin() => Err(Error::Codec {
            field: field.name.clone(),
            kind: *kind,
        }),
        FieldType::Builtin(_) | FieldType::Enumeration(_) => {
            field.check_value(&value)?;
            write_value(encoder, name, &value)?;
            Ok(())
        }
        FieldType::Structure(_) => {
            field.check_value(&value)?;
            match value.as_ref() {
                Value::Structure(nested) => encode_nested(encoder, name, nested),
                Value::Array(Array::Structure(items)) => {
                    encoder.write_array_length(name, items.len())?;
                    for item in items {
                        encode_nested(encoder, name, item)?;
                    }
                    Ok(())
                }
                other => Err(Error::TypeMismatch {
                    field: field.name.clone(),
                    expected: field.type_name(),
                    found: other.type_name(),
                }),
            }
        }
    }
}

fn encode_nested<E: Encoder + ?Sized>(
    encoder: &mut E,
    name: &str,
    nested: &ComplexData,
) -> Result<()> {
    encoder.begin_structure(name)?;
    encode_structure(encoder, nested)?;
    encoder.end_structure(name)?;
    Ok(())
}

/// Decode the field table of one `descriptor` instance.
pub(crate) fn decode_fields<D: Decoder + ?Sized>(
    decoder: &mut D,
    desc: &Arc<StructureDescriptor>,
) -> Result<Vec<Option<Value>>> {
    let mut scope = NamespaceScope::new(decoder, &desc.namespace_uri);
    let decoder = &mut *scope;
    let fields = desc.fields();
    let mut values: Vec<Option<Value>> = vec![None; fields.len()];

    match desc.structure_kind() {
        StructureKind::Plain => {
            for (slot, field) in values.iter_mut().zip(fields) {
                *slot = Some(decode_field(decoder, field)?);
            }
        }
        StructureKind::WithOptionalFields => {
            let mask = decoder.read_uint32(OPTIONAL_FIELD_MASK_NAME)?;
            let unused = mask & !desc.optional_mask();
            if unused != 0 {
                log::warn!(
                    "[codec] {}: ignoring undefined optional bits 0x{:08x}",
                    desc.name,
                    unused
                );
            }
            for (index, (slot, field)) in values.iter_mut().zip(fields).enumerate() {
                let present = match desc.optional_bit(index) {
                    Some(bit) => mask & (1 << bit) != 0,
                    None => true,
                };
                if present {
                    *slot = Some(decode_field(decoder, field)?);
                }
            }
        }
        StructureKind::Union => {
            let switch = decoder.read_uint32(SWITCH_FIELD_NAME)?;
            if switch as usize > fields.len() {
                return Err(DecodeError::SwitchOutOfRange {
                    structure: desc.name.clone(),
                    switch,
                    field_count: fields.len(),
                }
                .into());
            }
            if switch > 0 {
                let index = switch as usize - 1;
                values[index] = Some(decode_field(decoder, &fields[index])?);
            }
        }
    }
    Ok(values)
}

fn decode_field<D: Decoder + ?Sized>(decoder: &mut D, field: &FieldDescriptor) -> Result<Value> {
    let name = field.name.as_str();
    let value = match &field.field_type {
        FieldType::Builtin(kind) if !kind.is_builtin() => {
            return Err(Error::Codec {
                field: field.name.clone(),
                kind: *kind,
            })
        }
        FieldType::Builtin(kind) => {
            if field.is_array {
                Value::Array(read_array(decoder, name, *kind)?)
            } else {
                read_value(decoder, name, *kind)?
            }
        }
        FieldType::Enumeration(e) => {
            if field.is_array {
                let values = decoder.read_enumerated_array(name)?;
                if let Some(unknown) = values.iter().find(|v| !e.contains(**v)) {
                    log::warn!("[codec] {}: unknown {} value {}", name, e.name, unknown);
                }
                Value::Array(Array::Enumeration(values))
            } else {
                let value = decoder.read_enumerated(name)?;
                if !e.contains(value) {
                    log::warn!("[codec] {}: unknown {} value {}", name, e.name, value);
                }
                Value::Enumeration(value)
            }
        }
        FieldType::Structure(desc) => {
            if field.is_array {
                let len = decoder.read_array_length(name)?;
                let mut items = Vec::with_capacity(len.min(PREALLOC_CAP));
                for _ in 0..len {
                    items.push(decode_nested(decoder, name, desc)?);
                }
                Value::Array(Array::Structure(items))
            } else {
                Value::Structure(decode_nested(decoder, name, desc)?)
            }
        }
    };
    Ok(value)
}

fn decode_nested<D: Decoder + ?Sized>(
    decoder: &mut D,
    name: &str,
    desc: &Arc<StructureDescriptor>,
) -> Result<ComplexData> {
    decoder.begin_structure(name)?;
    let values = decode_fields(decoder, desc)?;
    decoder.end_structure(name)?;
    Ok(ComplexData::from_parts(desc.clone(), values))
}
