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

//! Local evaluation of predicates against rows.
//!
//! Residual predicates are applied here after rows come back from the remote
//! source. Evaluation follows SQL three-valued logic: `None` stands for
//! UNKNOWN, and a row passes a filter only when the result is `Some(true)`.
//!
//! Opaque functions are not interpreted and evaluate to UNKNOWN.

use crate::expr::{ExprId, ExprNode, Predicate};
use crate::operator::OperatorKind;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

/// A row whose columns can be looked up by name.
pub trait Row {
    /// Returns the value of `column`, or `None` when the row has no such
    /// column. A missing column reads as SQL NULL.
    fn get(&self, column: &str) -> Option<&Value>;
}

impl Row for HashMap<String, Value> {
    fn get(&self, column: &str) -> Option<&Value> {
        HashMap::get(self, column)
    }
}

impl Row for BTreeMap<String, Value> {
    fn get(&self, column: &str) -> Option<&Value> {
        BTreeMap::get(self, column)
    }
}

impl Row for serde_json::Map<String, Value> {
    fn get(&self, column: &str) -> Option<&Value> {
        serde_json::Map::get(self, column)
    }
}

/// Evaluates `predicate` against `row`. The always-true predicate yields
/// `Some(true)`.
pub fn evaluate<R: Row + ?Sized>(predicate: &Predicate, row: &R) -> Option<bool> {
    match predicate.root() {
        Some(root) => eval_ordered(predicate, &predicate.subtree(root), row),
        None => Some(true),
    }
}

/// Returns `true` when `row` passes `predicate`.
pub fn matches<R: Row + ?Sized>(predicate: &Predicate, row: &R) -> bool {
    evaluate(predicate, row) == Some(true)
}

/// Keeps the rows that pass `predicate`.
pub fn filter_rows<R: Row>(predicate: &Predicate, rows: Vec<R>) -> Vec<R> {
    let Some(root) = predicate.root() else {
        return rows;
    };
    let order = predicate.subtree(root);
    rows.into_iter()
        .filter(|r| eval_ordered(predicate, &order, r) == Some(true))
        .collect()
}

/// Evaluates the nodes of `order` bottom-up. `order` lists a subtree in
/// allocation order, so each child is computed before its parent and the
/// subtree root comes last.
fn eval_ordered<R: Row + ?Sized>(p: &Predicate, order: &[ExprId], row: &R) -> Option<bool> {
    let mut values: HashMap<ExprId, Value> = HashMap::with_capacity(order.len());
    for id in order {
        let mut take = |ids: &[ExprId]| -> Vec<Value> {
            ids.iter()
                .map(|c| values.remove(c).unwrap_or(Value::Null))
                .collect()
        };
        let value = match p.node(*id) {
            ExprNode::Column { name } => row.get(name).cloned().unwrap_or(Value::Null),
            ExprNode::Literal { value } => value.clone(),
            ExprNode::Call { op, args } => truth(eval_call(*op, &take(args))),
            ExprNode::And { children } => truth(eval_and(&take(children))),
            ExprNode::Or { children } => truth(eval_or(&take(children))),
            ExprNode::Function { args, .. } => {
                take(args);
                Value::Null
            }
        };
        values.insert(*id, value);
    }
    order
        .last()
        .and_then(|root| values.get(root))
        .and_then(as_bool)
}

fn truth(b: Option<bool>) -> Value {
    b.map_or(Value::Null, Value::Bool)
}

fn eval_and(children: &[Value]) -> Option<bool> {
    let mut result = Some(true);
    for child in children {
        match as_bool(child) {
            Some(false) => return Some(false),
            None => result = None,
            Some(true) => {}
        }
    }
    result
}

fn eval_or(children: &[Value]) -> Option<bool> {
    let mut result = Some(false);
    for child in children {
        match as_bool(child) {
            Some(true) => return Some(true),
            None => result = None,
            Some(false) => {}
        }
    }
    result
}

fn eval_call(op: OperatorKind, args: &[Value]) -> Option<bool> {
    if !op.accepts_arity(args.len()) {
        return None;
    }

    match op {
        OperatorKind::Equal => compare(&args[0], &args[1]).map(|o| o == Ordering::Equal),
        OperatorKind::NotEqual => compare(&args[0], &args[1]).map(|o| o != Ordering::Equal),
        OperatorKind::LessThan => compare(&args[0], &args[1]).map(|o| o == Ordering::Less),
        OperatorKind::LessOrEqual => compare(&args[0], &args[1]).map(|o| o != Ordering::Greater),
        OperatorKind::GreaterThan => {
            compare(&args[0], &args[1]).map(|o| o == Ordering::Greater)
        }
        OperatorKind::GreaterOrEqual => compare(&args[0], &args[1]).map(|o| o != Ordering::Less),
        OperatorKind::In => {
            let needle = &args[0];
            if needle.is_null() {
                return None;
            }
            let mut result = Some(false);
            for candidate in &args[1..] {
                match compare(needle, candidate) {
                    Some(Ordering::Equal) => return Some(true),
                    Some(_) => {}
                    None => result = None,
                }
            }
            result
        }
        OperatorKind::Between => {
            let v = &args[0];
            let low = compare(v, &args[1]).map(|o| o != Ordering::Less);
            let high = compare(v, &args[2]).map(|o| o != Ordering::Greater);
            match (low, high) {
                (Some(false), _) | (_, Some(false)) => Some(false),
                (Some(true), Some(true)) => Some(true),
                _ => None,
            }
        }
        OperatorKind::Not => as_bool(&args[0]).map(|b| !b),
        OperatorKind::IsNull => Some(args[0].is_null()),
        OperatorKind::IsNotNull => Some(!args[0].is_null()),
    }
}

fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        _ => None,
    }
}

/// Compares two scalar values. NULLs and values of different kinds are
/// incomparable.
pub fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => match (l.as_i64(), r.as_i64()) {
            (Some(l), Some(r)) => Some(l.cmp(&r)),
            _ => l.as_f64()?.partial_cmp(&r.as_f64()?),
        },
        (Value::String(l), Value::String(r)) => Some(l.cmp(r)),
        (Value::Bool(l), Value::Bool(r)) => Some(l.cmp(r)),
        _ => None,
    }
}
