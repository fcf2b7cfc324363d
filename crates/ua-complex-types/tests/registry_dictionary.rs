// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test/bench code readability over pedantic
#![allow(clippy::missing_panics_doc)] // Tests/examples panic on failure
#![allow(clippy::too_many_lines)] // Example/test code
#![cfg(feature = "schema-loaders")]

//! Dictionary loading from files and concurrent registry use.

use std::io::Write;
use std::sync::Arc;
use std::thread;
use ua_complex_types::dynamic::{encode_binary, ComplexData, StructureKind};
use ua_complex_types::types::{LocalizedText, NodeId, Value};
use ua_complex_types::{Error, SchemaDictionary, SchemaError, TypeRegistry};

const PLANT_YAML: &str = r#"
namespace_uri: "urn:test:plant"
enumerations:
  - type_id: "ns=2;i=3000"
    name: PumpState
    values:
      - { name: Stopped, value: 0 }
      - { name: Running, value: 1 }
      - { name: Fault, value: 7 }
structures:
  - type_id: "ns=2;i=3002"
    name: Station
    binary_encoding_id: "ns=2;i=5002"
    fields:
      - { name: pumps, type: "ns=2;i=3001", is_array: true }
      - { name: note, type: LocalizedText }
  - type_id: "ns=2;i=3001"
    name: Pump
    structure_kind: WithOptionalFields
    binary_encoding_id: "ns=2;i=5001"
    fields:
      - { name: id, type: "ns=0;i=7" }
      - { name: state, type: "ns=2;i=3000" }
      - { name: speed, type: Double, is_optional: true }
"#;

fn write_temp(content: &str, suffix: &str) -> tempfile::NamedTempFile {
    let mut f = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("create temp file");
    f.write_all(content.as_bytes()).expect("write temp file");
    f.flush().expect("flush temp file");
    f
}

#[test]
fn test_load_yaml_dictionary_file() {
    let file = write_temp(PLANT_YAML, ".yaml");
    let dictionary = SchemaDictionary::load_from_file(file.path()).expect("load yaml");

    let registry = TypeRegistry::new();
    let report = registry.load_dictionary(&dictionary).expect("register");
    assert_eq!(report.enumerations, 1);
    assert_eq!(report.structures, 2);

    let pump = registry
        .structure_by_encoding_id(&NodeId::numeric(2, 5001))
        .expect("Pump by encoding id");
    assert_eq!(pump.structure_kind(), StructureKind::WithOptionalFields);
    assert_eq!(pump.namespace_uri, "urn:test:plant");
    assert_eq!(pump.fields()[0].type_name(), "UInt32");

    let mut p = registry.new_instance(&pump.type_id).expect("Pump");
    p.set("id", 12u32).expect("id");
    p.set_enum_name("state", "Fault").expect("state");

    let mut station = registry
        .new_instance(&NodeId::numeric(2, 3002))
        .expect("Station");
    station.set("pumps", vec![p.clone(), p]).expect("pumps");
    station
        .set("note", LocalizedText::new("en", "north hall"))
        .expect("note");

    let object = registry.encode_extension_object(&station).expect("encode");
    let decoded = registry.decode_extension_object(&object).expect("decode");
    assert_eq!(decoded, station);
}

#[test]
fn test_json_and_yaml_dictionaries_agree() {
    let from_yaml = SchemaDictionary::from_yaml_str(PLANT_YAML).expect("yaml");
    let json = write_temp(
        &serde_json::to_string(&from_yaml).expect("to json"),
        ".json",
    );
    let from_json = SchemaDictionary::load_from_file(json.path()).expect("json");
    assert_eq!(from_json, from_yaml);
}

#[test]
fn test_invalid_dictionary_is_config_error() {
    let err = SchemaDictionary::from_yaml_str("structures: 12").unwrap_err();
    assert!(matches!(err, Error::Config(_)));

    let err = SchemaDictionary::from_json_str(
        r#"{"namespace_uri": "u", "structures": [{"type_id": "ns=x", "name": "A"}]}"#,
    )
    .unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn test_duplicate_field_rejected() {
    let yaml = r#"
namespace_uri: "urn:test:dup"
structures:
  - type_id: "ns=2;i=1"
    name: Dup
    fields:
      - { name: a, type: Int32 }
      - { name: a, type: String }
"#;
    let dictionary = SchemaDictionary::from_yaml_str(yaml).expect("yaml");
    let registry = TypeRegistry::new();
    let err = registry.load_dictionary(&dictionary).unwrap_err();
    assert!(matches!(
        err,
        Error::Schema(SchemaError::DuplicateField { .. })
    ));
    assert!(registry.is_empty());
}

#[test]
fn test_concurrent_lookup_during_reregistration() {
    let registry = Arc::new(TypeRegistry::new());
    let dictionary = SchemaDictionary::from_yaml_str(PLANT_YAML).expect("yaml");
    registry.load_dictionary(&dictionary).expect("initial load");
    let pump_id = NodeId::numeric(2, 3001);

    let writer = {
        let registry = Arc::clone(&registry);
        let dictionary = dictionary.clone();
        thread::spawn(move || {
            for _ in 0..100 {
                registry.load_dictionary(&dictionary).expect("reload");
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let registry = Arc::clone(&registry);
            let pump_id = pump_id.clone();
            thread::spawn(move || {
                for i in 0..500u32 {
                    let mut pump = registry.new_instance(&pump_id).expect("Pump");
                    pump.set("id", i).expect("id");
                    pump.set("speed", f64::from(i)).expect("speed");
                    let bytes = encode_binary(&pump).expect("encode");
                    let back = registry.decode(&pump_id, &bytes).expect("decode");
                    assert_eq!(back.get("id"), Some(&Value::UInt32(i)));
                }
            })
        })
        .collect();

    writer.join().expect("writer");
    for reader in readers {
        reader.join().expect("reader");
    }
    assert_eq!(registry.len(), 3);
}

#[test]
fn test_instance_survives_removal() {
    let registry = TypeRegistry::new();
    let dictionary = SchemaDictionary::from_yaml_str(PLANT_YAML).expect("yaml");
    registry.load_dictionary(&dictionary).expect("load");

    let station_id = NodeId::numeric(2, 3002);
    let station = registry.new_instance(&station_id).expect("Station");
    assert!(registry.remove(&station_id));
    assert!(registry.new_instance(&station_id).is_err());

    let copy: ComplexData = station.clone();
    assert_eq!(copy.type_name(), "Station");
    assert!(encode_binary(&copy).is_ok());
}
