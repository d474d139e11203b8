//! Benchmark suite for the ledger engine.
//!
//! Measures the three passes every operation is built from:
//! - Parsing a ledger into lines and entries
//! - Placing a new entry (section lookup plus block walk)
//! - Aggregating a report
//!
//! # Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench
//!
//! # Save baseline for comparison
//! cargo bench -- --save-baseline main
//!
//! # Compare against baseline
//! cargo bench -- --baseline main
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::fmt::Write;

use chrono::NaiveDate;
use todo_ledger::document::codec::parse_entries;
use todo_ledger::document::{Document, EntryId, NewEntry};
use todo_ledger::ledger::insert_entry;
use todo_ledger::Report;

/// Ledger text with `count` entries spread over ten sections.
fn generate_ledger(count: usize) -> String {
    let mut out = String::from("# TODOs\n\nGenerated for benchmarks.\n\n---\n\n");
    let per_section = count.div_ceil(10).max(1);
    for i in 0..count {
        if i % per_section == 0 {
            let _ = writeln!(out, "## Section {}\n", i / per_section);
        }
        let mark = if i % 3 == 0 { 'x' } else { ' ' };
        let _ = writeln!(
            out,
            "- [{mark}] **ID: {i:08x}-0000-4000-8000-000000000000** — Task number {i}\n  - Priority: Medium\n  - Location: src/module_{}.rs\n  - Added: 2024-01-01\n",
            i % 25
        );
    }
    out
}

// ============================================================================
// Parse Benchmarks
// ============================================================================

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for size in [10, 100, 1000] {
        let source = generate_ledger(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("entries", size), &source, |b, source| {
            b.iter(|| {
                let doc = Document::parse(black_box(source));
                black_box(parse_entries(&doc))
            });
        });
    }

    group.finish();
}

// ============================================================================
// Insert Placement Benchmarks
// ============================================================================

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    let added = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();
    let id = EntryId::new("bench-0000");

    for size in [10, 100, 1000] {
        let doc = Document::parse(&generate_ledger(size));
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("existing_section", size), &doc, |b, doc| {
            let entry = NewEntry::new("Benchmark entry").in_section("Section 5");
            b.iter(|| {
                let mut doc = doc.clone();
                black_box(insert_entry(&mut doc, &entry, "General", &id, added))
            });
        });

        group.bench_with_input(BenchmarkId::new("new_section", size), &doc, |b, doc| {
            let entry = NewEntry::new("Benchmark entry").in_section("Brand New");
            b.iter(|| {
                let mut doc = doc.clone();
                black_box(insert_entry(&mut doc, &entry, "General", &id, added))
            });
        });
    }

    group.finish();
}

// ============================================================================
// Report Benchmarks
// ============================================================================

fn bench_report(c: &mut Criterion) {
    let mut group = c.benchmark_group("report");

    for size in [10, 100, 1000] {
        let doc = Document::parse(&generate_ledger(size));
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("from_document", size), &doc, |b, doc| {
            b.iter(|| black_box(Report::from_document(black_box(doc))));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_insert, bench_report);
criterion_main!(benches);
