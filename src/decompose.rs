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

//! Splitting a filter predicate into pushed and residual parts.
//!
//! A remote source that only understands a narrow filter grammar can still
//! take part of the work: every conjunct of the filter that is a simple
//! comparison between an allowed column and constants can be evaluated
//! remotely, while everything else is kept for local evaluation.
//!
//! The decomposer separates a predicate into two categories:
//! - **Pushed**: a conjunction of search conditions the source evaluates
//! - **Residual**: the remaining conjuncts, applied after rows return
//!
//! Evaluating the residual on rows that already passed the pushed filter is
//! equivalent to evaluating the original predicate. The residual alone is
//! *not* equivalent: callers must always apply the pushed part upstream.
//!
//! Conjunctions are decomposed child by child, recursing into nested
//! conjunctions. Disjunctions, functions and comparisons that do not fit the
//! pushable shape are opaque and go to the residual whole, since pushing
//! half of an OR would change its meaning.
//!
//! # Example
//!
//! ```
//! use predicate_pushdown::decompose::PredicateDecomposer;
//! use predicate_pushdown::expr::{Predicate, col};
//! use predicate_pushdown::operator::OperatorSet;
//!
//! let decomposer = PredicateDecomposer::new(["a", "b"], OperatorSet::all()).unwrap();
//! let predicate = Predicate::from(col("a").eq(5).and(col("c").gt(10)));
//!
//! let result = decomposer.decompose(&predicate);
//! assert_eq!(result.pushed.unwrap().to_string(), "a = 5");
//! assert_eq!(result.residual.unwrap().to_string(), "c > 10");
//! ```

use crate::error::Error;
use crate::expr::{Expr, ExprId, ExprNode, Predicate, PredicateBuilder};
use crate::operator::{OperatorKind, OperatorSet};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;

/// A leaf comparison accepted for pushdown.
///
/// Comparisons written constant-first (`5 < x`) are stored column-first with
/// the mirrored operator (`x > 5`).
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCondition {
    /// Node of the original predicate this condition was taken from
    pub origin: ExprId,
    pub column: String,
    pub op: OperatorKind,
    /// Constant operands in order; empty for unary operators
    pub constants: Vec<Value>,
}

impl SearchCondition {
    /// Rebuilds the condition as a column-first comparison.
    pub fn to_expr(&self) -> Expr {
        let mut args = Vec::with_capacity(self.constants.len() + 1);
        args.push(Expr::Column(self.column.clone()));
        args.extend(self.constants.iter().cloned().map(Expr::Literal));
        Expr::Call { op: self.op, args }
    }
}

impl fmt::Display for SearchCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (from node {})", self.to_expr(), self.origin)
    }
}

/// Result of decomposing a predicate.
///
/// `pushed` is `None` when nothing could be pushed; `residual` is `None`
/// when nothing is left to evaluate locally.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecomposedPredicate {
    pub pushed: Option<Predicate>,
    pub residual: Option<Predicate>,
    /// The search conditions `pushed` was built from, in discovery order
    pub search_conditions: Vec<SearchCondition>,
}

impl DecomposedPredicate {
    /// Returns `true` when the whole predicate is evaluated remotely.
    pub fn is_fully_pushed(&self) -> bool {
        self.residual.is_none()
    }

    /// Returns `true` when nothing is evaluated remotely.
    pub fn is_nothing_pushed(&self) -> bool {
        self.pushed.is_none()
    }
}

/// Decomposes predicates against a fixed column allow-list and operator set.
///
/// A decomposer holds no mutable state and can be shared between threads.
#[derive(Debug, Clone)]
pub struct PredicateDecomposer {
    columns: Vec<String>,
    allowed: HashSet<String>,
    operators: OperatorSet,
}

impl PredicateDecomposer {
    /// Creates a decomposer.
    ///
    /// # Errors
    ///
    /// Fails when `columns` is empty, contains a blank name or a duplicate,
    /// or when `operators` is empty.
    pub fn new<I, S>(columns: I, operators: OperatorSet) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        if columns.is_empty() {
            return Err(Error::EmptyColumnList);
        }
        if operators.is_empty() {
            return Err(Error::EmptyOperatorSet);
        }

        let mut allowed = HashSet::with_capacity(columns.len());
        for (position, name) in columns.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(Error::InvalidColumnName {
                    position,
                    name: name.clone(),
                });
            }
            if !allowed.insert(name.clone()) {
                return Err(Error::DuplicateColumn(name.clone()));
            }
        }

        Ok(Self {
            columns,
            allowed,
            operators,
        })
    }

    /// Allowed columns in declaration order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn operators(&self) -> &OperatorSet {
        &self.operators
    }

    /// Splits `predicate` into pushed and residual parts.
    ///
    /// Never fails: anything the decomposer does not recognize is kept in
    /// the residual.
    pub fn decompose(&self, predicate: &Predicate) -> DecomposedPredicate {
        let Some(root) = predicate.root() else {
            return DecomposedPredicate::default();
        };

        let mut search_conditions = Vec::new();
        let mut residual_ids = Vec::new();
        self.classify(predicate, root, &mut search_conditions, &mut residual_ids);

        let pushed = conjunction(
            search_conditions
                .iter()
                .map(SearchCondition::to_expr)
                .collect(),
        );

        let residual = if residual_ids.is_empty() {
            None
        } else if residual_ids == [root] {
            Some(predicate.clone())
        } else {
            let mut builder = PredicateBuilder::default();
            let children: Vec<ExprId> = residual_ids
                .iter()
                .map(|id| builder.copy_from(predicate, *id))
                .collect();
            let root = if children.len() == 1 {
                children[0]
            } else {
                builder.push(ExprNode::And { children })
            };
            Some(builder.finish(Some(root)))
        };

        DecomposedPredicate {
            pushed,
            residual,
            search_conditions,
        }
    }

    /// Walks the conjunction spine under `root` in operand order, splitting
    /// its leaves into search conditions and residual subtrees.
    fn classify(
        &self,
        predicate: &Predicate,
        root: ExprId,
        search_conditions: &mut Vec<SearchCondition>,
        residual: &mut Vec<ExprId>,
    ) {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            match predicate.node(id) {
                ExprNode::And { children } => stack.extend(children.iter().rev()),
                ExprNode::Call { .. } => match self.search_condition(predicate, id) {
                    Some(condition) => search_conditions.push(condition),
                    None => residual.push(id),
                },
                _ => residual.push(id),
            }
        }
    }

    /// Returns the search condition for a pushable leaf comparison.
    fn search_condition(&self, predicate: &Predicate, id: ExprId) -> Option<SearchCondition> {
        let ExprNode::Call { op, args } = predicate.node(id) else {
            return None;
        };
        if !op.accepts_arity(args.len()) {
            return None;
        }

        let operands: Vec<Operand<'_>> = args
            .iter()
            .map(|arg| Operand::of(predicate.node(*arg)))
            .collect();

        let (column, op, constants) = match operands.as_slice() {
            [Operand::Column(c), Operand::Constant(v)] if op.is_binary_comparison() => {
                (*c, *op, vec![(*v).clone()])
            }
            [Operand::Constant(v), Operand::Column(c)] if op.is_binary_comparison() => {
                (*c, op.mirrored()?, vec![(*v).clone()])
            }
            [Operand::Column(c)] if op.is_unary() => (*c, *op, Vec::new()),
            [Operand::Column(c), rest @ ..]
                if matches!(op, OperatorKind::In | OperatorKind::Between) =>
            {
                let constants = rest
                    .iter()
                    .map(|operand| match operand {
                        Operand::Constant(v) => Some((*v).clone()),
                        _ => None,
                    })
                    .collect::<Option<Vec<_>>>()?;
                (*c, *op, constants)
            }
            _ => return None,
        };

        if !self.operators.contains(op) || !self.allowed.contains(column) {
            return None;
        }

        Some(SearchCondition {
            origin: id,
            column: column.to_string(),
            op,
            constants,
        })
    }
}

/// Classification of a comparison operand.
enum Operand<'a> {
    Column(&'a str),
    Constant(&'a Value),
    Other,
}

impl<'a> Operand<'a> {
    fn of(node: &'a ExprNode) -> Self {
        match node {
            ExprNode::Column { name } => Operand::Column(name),
            ExprNode::Literal { value } if is_scalar(value) => Operand::Constant(value),
            _ => Operand::Other,
        }
    }
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}

fn conjunction(mut exprs: Vec<Expr>) -> Option<Predicate> {
    match exprs.len() {
        0 => None,
        1 => exprs.pop().map(Predicate::from),
        _ => Some(Predicate::from(Expr::And(exprs))),
    }
}

/// Decomposes `predicate` in one call.
///
/// # Errors
///
/// Returns a configuration error when the column list or operator set is
/// malformed; see [`PredicateDecomposer::new`].
pub fn decompose<I, S>(
    predicate: &Predicate,
    allowed_columns: I,
    supported_operators: OperatorSet,
) -> Result<DecomposedPredicate, Error>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Ok(PredicateDecomposer::new(allowed_columns, supported_operators)?.decompose(predicate))
}
