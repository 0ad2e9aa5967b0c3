//! Normalizer benchmarks.
//!
//! Every cell of the source goes through one of these functions at load
//! time, so their per-call cost multiplies by the table size.
//!
//! ```sh
//! cargo bench --bench normalization_bench
//! ```

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use parc_core::normalize::{
    clean_comment, clean_serial, is_blank, normalize_registration, normalize_text,
};

const PLATES: &[&str] = &["AB-123-CD", "ab 123 cd", "AB123CD", "  ef-456-gh ", "1234 ZX 75"];
const SERIALS: &[&str] = &["SN  42", "lieb\t99 ", "nan", "(vide)", "GR-7781-A"];

fn normalize_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");
    group.bench_function("text", |b| {
        b.iter(|| {
            for s in PLATES {
                black_box(normalize_text(black_box(*s)));
            }
        })
    });
    group.bench_function("registration", |b| {
        b.iter(|| {
            for s in PLATES {
                black_box(normalize_registration(black_box(*s)));
            }
        })
    });
    group.finish();
}

fn clean_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("clean");
    group.bench_function("serial", |b| {
        b.iter(|| {
            for s in SERIALS {
                black_box(clean_serial(black_box(*s)));
            }
        })
    });
    group.bench_function("comment", |b| {
        b.iter(|| black_box(clean_comment(black_box("  révision mars, pneus neufs  "))))
    });
    group.bench_function("is_blank", |b| {
        b.iter(|| {
            for s in SERIALS {
                black_box(is_blank(black_box(*s)));
            }
        })
    });
    group.finish();
}

criterion_group!(benches, normalize_bench, clean_bench);
criterion_main!(benches);
