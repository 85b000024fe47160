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

//! # Predicate pushdown (`predicate-pushdown`)
//!
//! This crate splits a query engine's filter predicate into the part a
//! remote, JDBC-style source can evaluate and the part that has to be
//! evaluated locally on the rows the source returns.
//!
//! ## Basic Usage
//!
//! ```
//! use predicate_pushdown::decompose::decompose;
//! use predicate_pushdown::expr::{Predicate, col};
//! use predicate_pushdown::operator::OperatorSet;
//! use predicate_pushdown::sql::{SqlStyle, to_sql};
//!
//! let predicate = Predicate::from(
//!     col("colA").eq(5).and(col("colC").gt(10)),
//! );
//! let result = decompose(&predicate, ["colA", "colB"], OperatorSet::all()).unwrap();
//!
//! let pushed = result.pushed.unwrap();
//! assert_eq!(to_sql(&pushed, &SqlStyle::default()).unwrap(), r#""colA" = 5"#);
//! assert_eq!(result.residual.unwrap().to_string(), "colC > 10");
//! ```
//!
//! ## Design
//! - [`expr::Predicate`] is an arena-backed tree; search conditions refer to
//!   the node they came from by [`expr::ExprId`]
//! - [`decompose::PredicateDecomposer`] is configured once with the allowed
//!   columns and the supported [`operator::OperatorSet`], then decomposes
//!   any number of predicates without failing
//! - [`sql::to_sql`] renders the pushed part; [`eval::evaluate`] applies the
//!   residual to returned rows
//! - [`handler::JdbcStorageHandler`] wires job properties, decomposition and
//!   filter installation together for a host engine

pub mod config;
pub mod decompose;
pub mod error;
pub mod eval;
pub mod expr;
pub mod handler;
pub mod operator;
pub mod sql;

pub use decompose::{DecomposedPredicate, PredicateDecomposer, SearchCondition, decompose};
pub use error::Error;
pub use expr::{Expr, ExprId, ExprNode, Predicate};
pub use operator::{OperatorKind, OperatorSet};

#[cfg(test)]
#[macro_use]
extern crate quickcheck;
