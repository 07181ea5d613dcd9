use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lattice_common::graph::{diff, DiffOptions};
use lattice_common::strings::StrExt;
use lattice_common::{encoding, Timestamp};
use serde_json::json;

fn bench_encoding_detection(c: &mut Criterion) {
    let ascii: Vec<u8> = b"The quick brown fox jumps over the lazy dog. "
        .iter()
        .copied()
        .cycle()
        .take(0x10000)
        .collect();
    let utf16: Vec<u8> = ascii.iter().flat_map(|&b| [b, 0]).take(0x10000).collect();

    c.bench_function("detect_ascii_64k", |b| {
        b.iter(|| encoding::detect(black_box(&ascii)));
    });
    c.bench_function("detect_utf16le_64k", |b| {
        b.iter(|| encoding::detect(black_box(&utf16)));
    });
}

fn bench_string_hashing(c: &mut Criterion) {
    let text = "sample payload for digesting".repeat(32);
    c.bench_function("md5_hex", |b| {
        b.iter(|| black_box(text.as_str()).md5_hex());
    });
}

fn bench_graph_diff(c: &mut Criterion) {
    let left = json!({
        "id": 1,
        "name": "pump-1",
        "config": {"rate": 42, "mode": "auto", "tags": ["a", "b", "c"]},
    });
    let mut right = left.clone();
    right["config"]["rate"] = json!(43);
    let options = DiffOptions::default();

    c.bench_function("diff_nested_object", |b| {
        b.iter(|| diff(black_box(&left), black_box(&right), &options));
    });
}

fn bench_timestamp_bytes(c: &mut Criterion) {
    let ts = Timestamp::new(0x0123_4567_89AB_CDEF);
    c.bench_function("timestamp_byte_round_trip", |b| {
        b.iter(|| Timestamp::from_be_bytes(black_box(ts).to_be_bytes()));
    });
}

criterion_group!(
    benches,
    bench_encoding_detection,
    bench_string_hashing,
    bench_graph_diff,
    bench_timestamp_bytes
);
criterion_main!(benches);
