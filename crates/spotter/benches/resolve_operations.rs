// Benchmarks for resolution
//
// This benchmark suite measures the in-page half of resolution on synthetic
// captured pages:
// - Global text lookup as the page grows
// - Relative lookup (label, then the field under it) on a form grid
// - The JSON entry point, including request decoding

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use spotter::dom::{SnapshotDocument, SnapshotNode};
use spotter::{Chain, Position, ResolveOptions, by, resolve, resolve_json};
use std::hint::black_box;

/// A grid of labelled inputs, `rows` high and four columns wide.
fn form_grid(rows: usize) -> SnapshotDocument {
    let mut fields = Vec::with_capacity(rows * 8);
    for row in 0..rows {
        for column in 0..4 {
            let left = column as f64 * 300.0;
            let top = row as f64 * 60.0;
            fields.push(
                SnapshotNode::new("label")
                    .text(format!("Field {}-{}", row, column))
                    .at(left, top, 250.0, 20.0),
            );
            fields.push(
                SnapshotNode::new("input")
                    .attr("name", format!("f{}_{}", row, column))
                    .at(left, top + 25.0, 250.0, 25.0),
            );
        }
    }
    let height = rows as f64 * 60.0;
    SnapshotDocument::new(
        SnapshotNode::new("body")
            .at(0.0, 0.0, 1280.0, height.max(720.0))
            .children(fields),
    )
}

fn global_lookup_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("global_lookup");
    let options = ResolveOptions::default();

    for rows in [10, 100, 500] {
        let doc = form_grid(rows);
        let chain = Chain::global("Field 3-2");
        group.bench_with_input(BenchmarkId::from_parameter(rows), &rows, |b, _| {
            b.iter(|| black_box(resolve(&doc, &chain, &options)));
        });
    }

    group.finish();
}

fn relative_lookup_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("relative_lookup");
    let options = ResolveOptions::default();

    for rows in [10, 100] {
        let doc = form_grid(rows);
        let chain = Chain::global("Field 5-1").then(Position::Under, by::css("input"));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &rows, |b, _| {
            b.iter(|| black_box(resolve(&doc, &chain, &options)));
        });
    }

    group.finish();
}

fn json_entry_benchmark(c: &mut Criterion) {
    let doc = form_grid(50);
    let chain = serde_json::to_string(
        &Chain::global("Field 2-3")
            .then(Position::Under, by::css("input"))
            .to_vec(),
    )
    .unwrap();

    c.bench_function("resolve_json", |b| {
        b.iter(|| black_box(resolve_json(&doc, black_box(&chain), black_box("{}"))));
    });
}

criterion_group!(
    benches,
    global_lookup_benchmark,
    relative_lookup_benchmark,
    json_entry_benchmark
);
criterion_main!(benches);
