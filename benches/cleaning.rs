use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use rust_data_cleaning::cleaning::{apply_operation, CleaningOperation, NumericFill, TextFill, TextFormat};
use rust_data_cleaning::export::to_csv_string;
use rust_data_cleaning::ingestion::{ingest_from_bytes, IngestionOptions};
use rust_data_cleaning::statistics::dataset_statistics;
use rust_data_cleaning::types::{DataType, Field, Schema, Table, Value};

const CITIES: [&str; 5] = ["New York", "  chicago", "BOSTON ", "Denver", "miami"];

fn synthetic(rows: usize) -> Table {
    let schema = Schema::new(vec![
        Field::new("id", DataType::Int64),
        Field::new("city", DataType::Utf8),
        Field::new("salary", DataType::Float64),
        Field::new("age", DataType::Int64),
    ]);
    let rows = (0..rows)
        .map(|i| {
            let city = if i % 11 == 0 {
                Value::Null
            } else {
                Value::Utf8(CITIES[i % CITIES.len()].to_string())
            };
            let salary = if i % 13 == 0 { Value::Null } else { Value::Float64(40_000.0 + (i % 997) as f64) };
            let age = if i % 17 == 0 { Value::Null } else { Value::Int64(20 + (i % 45) as i64) };
            // Every fifth row repeats its predecessor's id.
            vec![Value::Int64((i - i % 5 / 4) as i64), city, salary, age]
        })
        .collect();
    Table::new(schema, rows)
}

fn bench_operations(c: &mut Criterion) {
    let ops = [
        ("fill_mean", CleaningOperation::FillNumeric(NumericFill::Mean)),
        ("fill_mode", CleaningOperation::FillNumeric(NumericFill::Mode)),
        ("fill_text_ffill", CleaningOperation::FillText(TextFill::ForwardFill)),
        ("title_case", CleaningOperation::Format(TextFormat::TitleCase)),
        ("drop_duplicates", CleaningOperation::DropDuplicateRows),
    ];

    let mut group = c.benchmark_group("operations");
    for rows in [1_000, 50_000] {
        let table = synthetic(rows);
        for (name, op) in &ops {
            group.bench_with_input(BenchmarkId::new(*name, rows), &table, |b, table| {
                b.iter(|| apply_operation(black_box(table), black_box(op)))
            });
        }
    }
    group.finish();
}

fn bench_statistics(c: &mut Criterion) {
    let table = synthetic(50_000);
    c.bench_function("dataset_statistics_50k", |b| {
        b.iter(|| dataset_statistics(black_box(&table)))
    });
}

fn bench_roundtrip(c: &mut Criterion) {
    let table = synthetic(10_000);
    let Ok(csv) = to_csv_string(&table) else {
        return;
    };
    let opts = IngestionOptions::default();

    let mut group = c.benchmark_group("csv_roundtrip_10k");
    group.bench_function("export", |b| b.iter(|| to_csv_string(black_box(&table))));
    group.bench_function("ingest_inferred", |b| {
        b.iter(|| ingest_from_bytes(black_box(csv.as_bytes()), "bench", None, &opts))
    });
    group.finish();
}

criterion_group!(benches, bench_operations, bench_statistics, bench_roundtrip);
criterion_main!(benches);
