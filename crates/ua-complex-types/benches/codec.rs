// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test/bench code readability over pedantic
#![allow(clippy::missing_panics_doc)] // Tests/examples panic on failure
#![allow(clippy::semicolon_if_nothing_returned)] // Benchmark code formatting

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use std::sync::Arc;
use ua_complex_types::dynamic::{
    decode_binary, encode_binary, ComplexData, FieldDescriptor, FieldType, StructureBuilder,
    StructureDescriptor, StructureKind,
};
use ua_complex_types::types::{LocalizedText, NodeId, ValueKind};

fn sample_types() -> (Arc<StructureDescriptor>, Arc<StructureDescriptor>) {
    let reading = StructureBuilder::new("Reading", NodeId::numeric(2, 1))
        .kind(StructureKind::WithOptionalFields)
        .field("sensor_id", ValueKind::UInt32)
        .field("value", ValueKind::Double)
        .field("timestamp", ValueKind::DateTime)
        .optional_field("unit", ValueKind::LocalizedText)
        .build()
        .expect("Reading");
    let batch = StructureBuilder::new("Batch", NodeId::numeric(2, 2))
        .field("source", ValueKind::String)
        .field_descriptor(
            FieldDescriptor::new("readings", FieldType::Structure(reading.clone())).array(),
        )
        .build()
        .expect("Batch");
    (reading, batch)
}

fn sample_batch(reading: &Arc<StructureDescriptor>, batch: &Arc<StructureDescriptor>) -> ComplexData {
    let readings: Vec<ComplexData> = (0..256u32)
        .map(|i| {
            let mut r = ComplexData::with_defaults(reading);
            r.set("sensor_id", i).expect("sensor_id");
            r.set("value", f64::from(i) * 0.5).expect("value");
            if i % 2 == 0 {
                r.set("unit", LocalizedText::new("en", "degC")).expect("unit");
            }
            r
        })
        .collect();
    let mut data = ComplexData::new(batch);
    data.set("source", "line-1").expect("source");
    data.set("readings", readings).expect("readings");
    data
}

/// Benchmark: encode a batch of 256 nested structures
fn bench_encode_batch(c: &mut Criterion) {
    let (reading, batch) = sample_types();
    let data = sample_batch(&reading, &batch);
    let size = encode_binary(&data).expect("encode").len();

    let mut group = c.benchmark_group("codec");
    group.throughput(Throughput::Bytes(size as u64));
    group.bench_function("encode_batch_256", |b| {
        b.iter(|| encode_binary(black_box(&data)).expect("encode"))
    });
    group.finish();
}

/// Benchmark: decode the same batch
fn bench_decode_batch(c: &mut Criterion) {
    let (reading, batch) = sample_types();
    let bytes = encode_binary(&sample_batch(&reading, &batch)).expect("encode");

    let mut group = c.benchmark_group("codec");
    group.throughput(Throughput::Bytes(bytes.len() as u64));
    group.bench_function("decode_batch_256", |b| {
        b.iter(|| decode_binary(black_box(&bytes), &batch).expect("decode"))
    });
    group.finish();
}

/// Benchmark: field access by name
fn bench_field_access(c: &mut Criterion) {
    let (reading, _) = sample_types();
    let mut data = ComplexData::with_defaults(&reading);
    data.set("value", 1.0f64).expect("value");

    c.bench_function("get_as_f64", |b| {
        b.iter(|| data.get_as::<f64>(black_box("value")).expect("get"))
    });
}

criterion_group!(
    benches,
    bench_encode_batch,
    bench_decode_batch,
    bench_field_access
);
criterion_main!(benches);
