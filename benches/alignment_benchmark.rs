//! Alignment pass benchmarks for large diffs.
//!
//! Measures one full engine pass (overrides, alignments, zones, sync) and the
//! alignment computation alone over files with many hunks and wrapped lines.
//!
//! Run with: cargo bench --bench alignment_benchmark

#![allow(missing_docs)] // criterion macros generate undocumented items

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use diffsync::alignment::compute_alignments;
use diffsync::config::EngineConfig;
use diffsync::engine::{DiffAlignmentEngine, DiffSnapshot};
use diffsync::layout::compute_line_height_overrides;
use diffsync::model::{LineRange, LineRangeMapping, PerSide, Timestamp};
use diffsync::scenario::{ScenarioHost, ScenarioView, SideLayout};
use std::collections::HashSet;

/// A replaced line every 5 lines, with an inserted pair instead every 25.
fn synthetic_diff(line_count: u32) -> (u32, Vec<LineRangeMapping>) {
    let mut mappings = Vec::new();
    let mut shift = 0;
    let mut line = 5;
    while line + 3 < line_count {
        if line % 25 == 0 {
            mappings.push(LineRangeMapping::new(
                LineRange::empty_at(line),
                LineRange::of_length(line + shift, 2),
            ));
            shift += 2;
        } else {
            mappings.push(LineRangeMapping::new(
                LineRange::of_length(line, 1),
                LineRange::of_length(line + shift, 1),
            ));
        }
        line += 5;
    }
    (line_count + shift, mappings)
}

/// Every 7th line wraps once.
fn wrapped_view(line_count: u32) -> ScenarioView {
    let mut layout = SideLayout::new(line_count);
    layout
        .wrapped_lines
        .extend((7..=line_count).step_by(7).map(|line| (line, 2)));
    ScenarioView::new(layout)
}

fn bench_compute_alignments(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_alignments");

    for line_count in [1_000u32, 10_000, 50_000] {
        let (modified_count, mappings) = synthetic_diff(line_count);
        let original = wrapped_view(line_count);
        let modified = ScenarioView::with_lines(modified_count);

        group.bench_with_input(
            BenchmarkId::from_parameter(line_count),
            &mappings,
            |b, mappings| {
                b.iter(|| {
                    let overrides = PerSide::new(
                        compute_line_height_overrides(&original, &HashSet::new()),
                        compute_line_height_overrides(&modified, &HashSet::new()),
                    );
                    black_box(compute_alignments(
                        mappings, &original, &modified, overrides, true,
                    ))
                })
            },
        );
    }

    group.finish();
}

fn bench_engine_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_pass");

    for line_count in [1_000u32, 10_000] {
        let (modified_count, mappings) = synthetic_diff(line_count);
        let mut host = ScenarioHost::new(
            wrapped_view(line_count),
            ScenarioView::with_lines(modified_count),
        );
        let mut engine = DiffAlignmentEngine::new(EngineConfig::default());
        engine.set_diff(DiffSnapshot {
            mappings,
            ..DiffSnapshot::default()
        });

        group.bench_function(BenchmarkId::from_parameter(line_count), |b| {
            b.iter(|| {
                engine.invalidate();
                black_box(engine.flush(&mut host, Timestamp::default()))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compute_alignments, bench_engine_pass);
criterion_main!(benches);
