//! Criterion benchmarks for the configuration codec.
//!
//! Measures encode and decode latency for both on-disk formats and for the
//! format-sniffing fallback used when a file carries an unrecognized
//! extension. Encoding sits on the editor's save path, so its latency is
//! directly user-visible.
//!
//! Run with:
//! ```bash
//! cargo bench --package dashkeeper-core --bench codec_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dashkeeper_core::codec::{decode, encode, ContentFormat};
use dashkeeper_core::Document;

// ── Document fixtures ─────────────────────────────────────────────────────────

/// Small flat mapping, the shape of a typical settings file.
fn make_settings() -> Document {
    serde_yaml::from_str(
        "title: Home\n\
         theme: dark\n\
         color: slate\n\
         headerStyle: boxed\n\
         hideVersion: true\n\
         language: en\n",
    )
    .expect("fixture")
}

/// Nested sequences-of-mappings, the shape of a bookmarks file.
fn make_bookmarks(categories: usize) -> Document {
    let mut text = String::new();
    for c in 0..categories {
        text.push_str(&format!("category-{c}:\n"));
        for b in 0..8 {
            text.push_str(&format!(
                "  - name: Bookmark {b}\n    href: https://host-{c}-{b}.example.net/\n    icon: mdi-bookmark\n"
            ));
        }
    }
    serde_yaml::from_str(&text).expect("fixture")
}

/// Wide mapping of service definitions, the largest file class in practice.
fn make_services(count: usize) -> Document {
    let mut text = String::new();
    for i in 0..count {
        text.push_str(&format!(
            "service-{i}:\n  \
               href: http://host-{i}.lan:8080\n  \
               description: Autogenerated service number {i}\n  \
               icon: mdi-server\n  \
               ping: http://host-{i}.lan:8080/health\n"
        ));
    }
    serde_yaml::from_str(&text).expect("fixture")
}

fn fixtures() -> Vec<(&'static str, Document)> {
    vec![
        ("settings", make_settings()),
        ("bookmarks-10", make_bookmarks(10)),
        ("services-50", make_services(50)),
        ("services-500", make_services(500)),
    ]
}

// ── Benchmark groups ──────────────────────────────────────────────────────────

/// Benchmarks `encode` into each explicit format.
fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    for (name, document) in &fixtures() {
        group.bench_with_input(BenchmarkId::new("yaml", name), document, |b, document| {
            b.iter(|| {
                encode(black_box(document), black_box(Some(ContentFormat::Yaml)))
                    .expect("encode must succeed")
            })
        });
        group.bench_with_input(BenchmarkId::new("json", name), document, |b, document| {
            b.iter(|| {
                encode(black_box(document), black_box(Some(ContentFormat::Json)))
                    .expect("encode must succeed")
            })
        });
    }
    group.finish();
}

/// Benchmarks `decode` with the format known up front (from pre-encoded text).
fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    for (name, document) in &fixtures() {
        let yaml = encode(document, Some(ContentFormat::Yaml)).expect("fixture encode");
        let json = encode(document, Some(ContentFormat::Json)).expect("fixture encode");
        group.bench_with_input(BenchmarkId::new("yaml", name), &yaml, |b, text| {
            b.iter(|| {
                decode(black_box(text.as_bytes()), black_box(Some(ContentFormat::Yaml)))
                    .expect("decode must succeed")
            })
        });
        group.bench_with_input(BenchmarkId::new("json", name), &json, |b, text| {
            b.iter(|| {
                decode(black_box(text.as_bytes()), black_box(Some(ContentFormat::Json)))
                    .expect("decode must succeed")
            })
        });
    }
    group.finish();
}

/// Benchmarks the sniffing fallback (no format hint), which is what a read
/// of an unrecognized extension pays.
fn bench_decode_sniffing(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_sniffing");
    let services = make_services(50);
    let yaml = encode(&services, Some(ContentFormat::Yaml)).expect("fixture encode");
    let json = encode(&services, Some(ContentFormat::Json)).expect("fixture encode");

    group.bench_function("yaml_content", |b| {
        b.iter(|| decode(black_box(yaml.as_bytes()), black_box(None)).expect("decode must succeed"))
    });
    group.bench_function("json_content", |b| {
        b.iter(|| decode(black_box(json.as_bytes()), black_box(None)).expect("decode must succeed"))
    });
    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode, bench_decode_sniffing);
criterion_main!(benches);
