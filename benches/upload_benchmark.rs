use bucketdrop::services::csv_preview::preview_csv;
use bucketdrop::services::secure_filename;
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

fn benchmark_secure_filename(c: &mut Criterion) {
    let mut group = c.benchmark_group("secure_filename");

    group.bench_function("plain", |b| {
        b.iter(|| secure_filename(black_box("quarterly-report.csv")))
    });

    group.bench_function("hostile", |b| {
        b.iter(|| {
            secure_filename(black_box(
                "../../..\\windows\\ CON .  r\u{e9}sum\u{e9} (final) [v2]!!.tar.gz",
            ))
        })
    });

    group.finish();
}

fn benchmark_csv_preview(c: &mut Criterion) {
    // 10k rows, roughly what a spreadsheet export looks like
    let mut data = String::from("id,name,email,amount,created_at\n");
    for i in 0..10_000 {
        data.push_str(&format!(
            "{i},user {i},user{i}@example.com,{}.{:02},2026-01-01T00:00:00Z\n",
            i * 3,
            i % 100
        ));
    }
    let data = data.into_bytes();

    let mut group = c.benchmark_group("csv_preview");

    group.bench_function("preview_20_of_10k", |b| {
        b.iter(|| preview_csv(black_box(&data), 20).expect("valid csv"))
    });

    group.bench_function("preview_500_of_10k", |b| {
        b.iter(|| preview_csv(black_box(&data), 500).expect("valid csv"))
    });

    group.finish();
}

criterion_group!(benches, benchmark_secure_filename, benchmark_csv_preview);
criterion_main!(benches);
