//! Benchmark – `JsonParser` and `TagParser` fed the same document in
//! different chunkings.
#![allow(missing_docs)]

use std::time::Duration;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use streamtrace::{JsonParser, JsonParserOptions, TagEvent, TagParser};

/// A deterministic JSON document of about `target_len` bytes: an array of
/// small records, the shape of a tool call listing results.
fn make_json_payload(target_len: usize) -> String {
    let mut s = String::with_capacity(target_len + 64);
    s.push_str("{\"results\":[");
    let mut i = 0usize;
    while s.len() < target_len {
        if i > 0 {
            s.push(',');
        }
        s.push_str(&format!(
            "{{\"id\":{i},\"title\":\"item number {i}\",\"score\":{}.5,\"ok\":true}}",
            i % 97
        ));
        i += 1;
    }
    s.push_str("]}");
    s
}

/// Markup of about `target_len` bytes with nested, attributed elements.
fn make_markup_payload(target_len: usize) -> String {
    let mut s = String::with_capacity(target_len + 64);
    s.push_str("<results>");
    let mut i = 0usize;
    while s.len() < target_len {
        s.push_str(&format!(
            "<item id=\"{i}\"><title>item number {i}</title><br/><p>score {}</p></item>",
            i % 97
        ));
        i += 1;
    }
    s.push_str("</results>");
    s
}

/// Splits `payload` into `parts` chunks on character boundaries.
fn split(payload: &str, parts: usize) -> Vec<&str> {
    let size = payload.len().div_ceil(parts).max(1);
    let mut chunks = Vec::with_capacity(parts);
    let mut start = 0;
    while start < payload.len() {
        let mut end = (start + size).min(payload.len());
        while !payload.is_char_boundary(end) {
            end += 1;
        }
        chunks.push(&payload[start..end]);
        start = end;
    }
    chunks
}

fn run_json(chunks: &[&str], auto_fix: bool) -> usize {
    let mut parser = JsonParser::new(JsonParserOptions {
        auto_fix,
        ..Default::default()
    });
    let mut events = Vec::new();
    for chunk in chunks {
        parser.trace(chunk, &mut events).expect("valid payload");
    }
    parser.end().expect("complete payload");
    events.len()
}

fn run_tags(chunks: &[&str]) -> usize {
    let mut parser = TagParser::default();
    let mut produced = 0usize;
    let mut sink = streamtrace::FnSink(|_: TagEvent| produced += 1);
    for chunk in chunks {
        parser.trace(chunk, &mut sink);
    }
    parser.end(&mut sink);
    drop(sink);
    produced
}

fn bench_json(c: &mut Criterion) {
    let payload = make_json_payload(10_000);
    let mut group = c.benchmark_group("json_split");

    for &parts in &[1usize, 100, 1_000, payload.len()] {
        let chunks = split(&payload, parts);
        for auto_fix in [false, true] {
            let name = if auto_fix { "auto_fix" } else { "strict" };
            group.bench_with_input(BenchmarkId::new(parts.to_string(), name), &chunks, |b, chunks| {
                b.iter(|| black_box(run_json(black_box(chunks), auto_fix)));
            });
        }
    }
    group.finish();
}

fn bench_tags(c: &mut Criterion) {
    let payload = make_markup_payload(10_000);
    let mut group = c.benchmark_group("tag_split");

    for &parts in &[1usize, 100, 1_000, payload.len()] {
        let chunks = split(&payload, parts);
        group.bench_with_input(BenchmarkId::from_parameter(parts), &chunks, |b, chunks| {
            b.iter(|| black_box(run_tags(black_box(chunks))));
        });
    }
    group.finish();
}

fn criterion() -> Criterion {
    let mut c = Criterion::default();
    if cfg!(feature = "bench-fast") {
        c = c
            .warm_up_time(Duration::from_millis(10))
            .measurement_time(Duration::from_millis(100))
            .sample_size(10);
    } else {
        c = c
            .warm_up_time(Duration::from_secs(5))
            .measurement_time(Duration::from_secs(10));
    }
    c
}

criterion_group! { name = benches; config = criterion(); targets = bench_json, bench_tags }
criterion_main!(benches);
