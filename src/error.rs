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

//! Error definitions for predicate pushdown

use thiserror::Error;

/// Errors raised by the pushdown layer.
///
/// Decomposition itself never fails on a well-formed predicate tree; only
/// configuration problems (column lists, operator sets, job properties) and
/// serialization of non-pushable trees are reported here.
#[derive(Debug, Error)]
pub enum Error {
    /// The allow-list of filterable columns is empty
    #[error("column list is empty; at least one filterable column is required")]
    EmptyColumnList,

    /// A column name in the allow-list is blank
    #[error("invalid column name at position {position}: {name:?}")]
    InvalidColumnName { position: usize, name: String },

    /// The same column appears twice in the allow-list
    #[error("column {0:?} is listed more than once")]
    DuplicateColumn(String),

    /// The set of supported operators is empty
    #[error("supported operator set is empty")]
    EmptyOperatorSet,

    /// An operator name could not be recognized
    #[error("unknown operator: {0:?}")]
    UnknownOperator(String),

    /// A required configuration property is missing
    #[error("missing required property: {0}")]
    MissingProperty(String),

    /// A predicate tree references a node that does not precede its parent
    #[error("malformed predicate: node {node} references child {child}")]
    MalformedPredicate { node: usize, child: usize },

    /// A predicate tree references the same node from two parents
    #[error("malformed predicate: node {node} shares child {child} with another node")]
    SharedNode { node: usize, child: usize },

    /// A predicate tree cannot be rendered as a remote filter clause
    #[error("cannot serialize filter: {0}")]
    Unserializable(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
