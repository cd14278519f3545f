//! Relational layer benchmarks for reldb.
//!
//! Benchmarks for:
//! - Row and key encoding
//! - INSERT with primary key checks
//! - Filtered single-table selects
//! - Cartesian joins across several tables
//! - DELETE with nullable and non-nullable references

use criterion::{
    black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput,
};
use reldb_bench::utils::{
    generate_user_rows, int_table, open_database, parent_child, users_table,
};
use reldb_sql::storage::codec::{decode_row, encode_key, encode_row};
use reldb_sql::{ColumnRef, CompareOp, Condition, Row, Select, TableRef, Value};

/// Benchmark row and key encoding.
fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("query/codec");
    let rows: Vec<Row> = generate_user_rows(1000).into_iter().map(Row::new).collect();
    group.throughput(Throughput::Elements(rows.len() as u64));

    group.bench_function("encode_row", |b| {
        b.iter(|| {
            for row in &rows {
                black_box(encode_row(row).unwrap());
            }
        });
    });

    let encoded: Vec<_> = rows.iter().map(|r| encode_row(r).unwrap()).collect();
    group.bench_function("decode_row", |b| {
        b.iter(|| {
            for bytes in &encoded {
                black_box(decode_row(bytes.as_bytes()).unwrap());
            }
        });
    });

    group.bench_function("encode_key", |b| {
        b.iter(|| {
            for row in &rows {
                black_box(encode_key(&row.values()[..2]));
            }
        });
    });

    group.finish();
}

/// Benchmark INSERT into a table with a primary key.
fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("query/insert");

    for size in [100, 1000].iter() {
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| {
                let db = open_database(1);
                users_table(&db, size);
                black_box(db)
            });
        });
    }

    group.finish();
}

/// Benchmark a filtered single-table select.
fn bench_select_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("query/select_filter");

    for size in [1000, 10_000].iter() {
        let db = open_database(1);
        users_table(&db, *size);
        let query = Select::all(vec![TableRef::new("users")])
            .columns(vec![ColumnRef::new("name")])
            .filter(Condition::and(
                Condition::compare(ColumnRef::new("age"), CompareOp::Ge, Value::Int(30)),
                Condition::not(Condition::compare(
                    ColumnRef::new("name"),
                    CompareOp::Lt,
                    Value::char("D"),
                )),
            ));

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(db.select(&query).unwrap().len()));
        });
    }

    group.finish();
}

/// Benchmark Cartesian joins of growing width.
fn bench_join(c: &mut Criterion) {
    let mut group = c.benchmark_group("query/join");

    for tables in [2usize, 3, 4].iter() {
        let db = open_database(*tables);
        let names: Vec<String> = (0..*tables).map(|i| format!("t{}", i)).collect();
        for name in &names {
            int_table(&db, name, 10);
        }
        let query = Select::all(names.iter().map(TableRef::new).collect()).filter(
            Condition::compare(
                ColumnRef::qualified("t0", "v"),
                CompareOp::Eq,
                ColumnRef::qualified(names[tables - 1].as_str(), "v"),
            ),
        );

        group.throughput(Throughput::Elements(10u64.pow(*tables as u32)));
        group.bench_with_input(BenchmarkId::from_parameter(tables), tables, |b, _| {
            b.iter(|| black_box(db.select(&query).unwrap().len()));
        });
    }

    group.finish();
}

/// Benchmark DELETE of every parent with blocking and nulling references.
fn bench_delete_integrity(c: &mut Criterion) {
    let mut group = c.benchmark_group("query/delete_integrity");

    for (label, nullable) in [("set_null", true), ("blocked", false)] {
        group.bench_function(BenchmarkId::new(label, 100), |b| {
            b.iter_batched(
                || {
                    let db = open_database(2);
                    parent_child(&db, 100, 5, nullable);
                    db
                },
                |db| black_box(db.delete("parent", None).unwrap()),
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_codec,
    bench_insert,
    bench_select_filter,
    bench_join,
    bench_delete_integrity,
);
criterion_main!(benches);
