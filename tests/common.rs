// Predicate Pushdown Library for JDBC-style Table Connectors
// Copyright 2026 MinIO, Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Common helper functions for integration tests

#![allow(dead_code)]

use predicate_pushdown::config::Properties;
use serde_json::{Map, Value};

/// Initialize logging once; set RUST_LOG="debug" to see decomposition output
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Build a property map from key/value pairs
pub fn props(pairs: &[(&str, &str)]) -> Properties {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Table properties of a MySQL-backed table with the given columns
pub fn mysql_table() -> Properties {
    props(&[
        ("connector.database.type", "MYSQL"),
        ("connector.jdbc.url", "jdbc:mysql://localhost:3306/shop"),
        ("connector.jdbc.driver", "com.mysql.jdbc.Driver"),
        ("connector.table", "orders"),
        ("connector.dbcp.username", "reader"),
        ("EXTERNAL", "TRUE"),
    ])
}

/// Convert a JSON object literal into a row
pub fn row(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("row must be a JSON object, got {other}"),
    }
}
