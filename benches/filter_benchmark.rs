//! Filtered-view and layout benchmarks on a large synthetic run log.
//!
//! Run with: cargo bench

#![allow(missing_docs)] // criterion macros generate undocumented items

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use runlog::model::{EntryId, EntryKind, LogEntry};
use runlog::state::{ExpandedSet, LogState};
use runlog::view_state::ancestry::AncestryIndex;
use runlog::view_state::filter::build_filtered_view;
use runlog::view_state::types::LineOffset;
use std::sync::Arc;

/// 200 tasks of 50 elements with 4 log lines each: about 50k entries.
fn generate_entries() -> Arc<Vec<LogEntry>> {
    let mut entries = Vec::new();
    for t in 0..200 {
        let task = EntryId::root(t);
        entries.push(
            LogEntry::new(task.clone(), 0, EntryKind::Task).with_field("name", format!("task {t}")),
        );
        for e in 0..50 {
            let element = task.child(e);
            entries.push(
                LogEntry::new(element.clone(), 1, EntryKind::Element)
                    .with_field("name", format!("step_{e}")),
            );
            for l in 0..4 {
                let message = if (t * 50 + e) % 997 == 0 {
                    format!("needle found at {l}\ndetails")
                } else {
                    format!("line {l} of step {e}")
                };
                entries.push(
                    LogEntry::new(element.child(l), 2, EntryKind::Log)
                        .with_field("message", message),
                );
            }
        }
    }
    Arc::new(entries)
}

fn all_expanded(entries: &[LogEntry]) -> ExpandedSet {
    entries
        .iter()
        .filter(|e| e.level() < 2)
        .map(|e| e.id().clone())
        .collect()
}

fn bench_filtered_view(c: &mut Criterion) {
    let entries = generate_entries();
    let ancestry = AncestryIndex::build(&entries);
    let expanded = all_expanded(&entries);

    c.bench_function("expanded_view_50k", |b| {
        b.iter(|| build_filtered_view(black_box(&entries), &ancestry, &expanded, ""))
    });

    c.bench_function("filtered_view_50k", |b| {
        b.iter(|| build_filtered_view(black_box(&entries), &ancestry, &expanded, "needle"))
    });
}

fn bench_visible_range(c: &mut Criterion) {
    let entries = generate_entries();
    let mut state = LogState::new();
    state.set_entries(Arc::clone(&entries), &[], 0);
    state.expand_all();

    c.bench_function("visible_range_top", |b| {
        b.iter(|| state.visible_range(black_box(LineOffset::new(0)), 50))
    });

    let bottom = state.total_height().saturating_sub(50);
    c.bench_function("visible_range_bottom_measured", |b| {
        b.iter(|| state.visible_range(black_box(LineOffset::new(bottom)), 50))
    });
}

criterion_group!(benches, bench_filtered_view, bench_visible_range);
criterion_main!(benches);
