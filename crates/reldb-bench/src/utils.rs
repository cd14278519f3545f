//! Benchmark utilities and helpers.

use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use reldb_common::config::DatabaseConfig;
use reldb_common::types::{Key, Value as Bytes};
use reldb_sql::storage::CreateTable;
use reldb_sql::{DataType, Database, Value};

/// Generates random string data for benchmarks.
pub fn random_string(rng: &mut StdRng, len: usize) -> String {
    rng.sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Generates a batch of random key-value pairs.
pub fn generate_kv_pairs(count: usize, key_size: usize, value_size: usize) -> Vec<(Key, Bytes)> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..count)
        .map(|_| {
            let key: Vec<u8> = (0..key_size).map(|_| rng.gen()).collect();
            let value: Vec<u8> = (0..value_size).map(|_| rng.gen()).collect();
            (Key::from(key), Bytes::from(value))
        })
        .collect()
}

/// Generates sequential keys for benchmarks.
pub fn generate_sequential_keys(count: usize, prefix: &str) -> Vec<String> {
    (0..count).map(|i| format!("{}{:08}", prefix, i)).collect()
}

/// Generates random user rows `(id, name, age)` in shuffled id order.
pub fn generate_user_rows(count: usize) -> Vec<Vec<Value>> {
    let mut rng = StdRng::seed_from_u64(42);
    let names = [
        "Alice", "Bob", "Charlie", "Diana", "Eve", "Frank", "Grace", "Henry",
    ];

    let mut ids: Vec<i64> = (1..=count as i64).collect();
    ids.shuffle(&mut rng);
    ids.into_iter()
        .map(|id| {
            let name = names[rng.gen_range(0..names.len())];
            let suffix = random_string(&mut rng, 3);
            let age = rng.gen_range(18..80);
            vec![
                Value::Int(id),
                Value::char(format!("{}_{}", name, suffix)),
                Value::Int(age),
            ]
        })
        .collect()
}

/// Opens a database whose join limit admits `tables` tables.
pub fn open_database(tables: usize) -> Database {
    let mut config = DatabaseConfig::default();
    config.query.max_join_tables = config.query.max_join_tables.max(tables);
    Database::open(config).expect("benchmark database")
}

/// Creates `users(id PK, name char(16), age)` filled with `count` rows.
pub fn users_table(db: &Database, count: usize) {
    db.create_table(
        CreateTable::new("users")
            .column("id", DataType::Int, true)
            .column("name", DataType::Char(16), false)
            .column("age", DataType::Int, false)
            .primary_key(["id"]),
    )
    .expect("create users");
    for row in generate_user_rows(count) {
        db.insert("users", None, row).expect("insert user");
    }
}

/// Creates a single-column table `name(v int)` holding `0..rows`.
pub fn int_table(db: &Database, name: &str, rows: usize) {
    db.create_table(CreateTable::new(name).column("v", DataType::Int, false))
        .expect("create table");
    for i in 0..rows as i64 {
        db.insert(name, None, vec![Value::Int(i)])
            .expect("insert row");
    }
}

/// Creates `parent(id PK)` with `parents` rows and `child(id PK, parent)`
/// with `per_parent` rows for each parent. The child reference is nullable
/// when `nullable` is true.
pub fn parent_child(db: &Database, parents: usize, per_parent: usize, nullable: bool) {
    db.create_table(
        CreateTable::new("parent")
            .column("id", DataType::Int, true)
            .primary_key(["id"]),
    )
    .expect("create parent");
    db.create_table(
        CreateTable::new("child")
            .column("id", DataType::Int, true)
            .column("parent", DataType::Int, !nullable)
            .primary_key(["id"])
            .foreign_key(["parent"], "parent", ["id"]),
    )
    .expect("create child");

    let mut next_child = 0i64;
    for p in 0..parents as i64 {
        db.insert("parent", None, vec![Value::Int(p)])
            .expect("insert parent");
        for _ in 0..per_parent {
            db.insert("child", None, vec![Value::Int(next_child), Value::Int(p)])
                .expect("insert child");
            next_child += 1;
        }
    }
}
