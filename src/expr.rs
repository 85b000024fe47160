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

//! Filter expression model.
//!
//! Two representations are provided:
//!
//! - [`Expr`], an owned tree with a fluent builder API, convenient for
//!   constructing predicates by hand;
//! - [`Predicate`], a flat arena of [`ExprNode`]s addressed by [`ExprId`].
//!   This is what the decomposer consumes and produces, so that a pushed
//!   search condition can refer back to the node it came from by index.
//!
//! Every node in a [`Predicate`] only references children with a smaller
//! [`ExprId`] than its own, and no node has two parents. Trees built through
//! [`Predicate::from`] satisfy this by construction, and deserialized trees
//! are validated against it. Walks over the arena use explicit work lists,
//! so depth is bounded by memory rather than by the call stack.
//!
//! # Example
//!
//! ```
//! use predicate_pushdown::expr::{ExprBuilder, Predicate, col};
//!
//! // Build: age >= 18 AND status = 'active'
//! let expr = ExprBuilder::column("age")
//!     .gt_eq(18)
//!     .and(col("status").eq("active"));
//!
//! let predicate = Predicate::from(expr);
//! assert_eq!(predicate.to_string(), "age >= 18 AND status = 'active'");
//! ```

use crate::error::Error;
use crate::operator::OperatorKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::ops::Not;

/// Owned filter expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Reference to a column by name
    Column(String),
    /// Constant value
    Literal(Value),
    /// Comparison operator applied to operands
    Call { op: OperatorKind, args: Vec<Expr> },
    /// Logical AND of all children
    And(Vec<Expr>),
    /// Logical OR of all children
    Or(Vec<Expr>),
    /// Any other scalar function, never evaluated remotely
    Function { name: String, args: Vec<Expr> },
}

/// Creates a column reference expression.
pub fn col(name: impl Into<String>) -> Expr {
    Expr::Column(name.into())
}

/// Creates a constant expression.
pub fn lit(value: impl Into<Value>) -> Expr {
    Expr::Literal(value.into())
}

macro_rules! impl_from_literal {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Expr {
                fn from(value: $t) -> Self {
                    Expr::Literal(Value::from(value))
                }
            }
        )*
    };
}

impl_from_literal!(i32, i64, u32, u64, f64, bool, &str, String);

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Expr::Literal(value)
    }
}

impl Expr {
    fn call(op: OperatorKind, args: Vec<Expr>) -> Expr {
        Expr::Call { op, args }
    }

    /// Creates an opaque function call: `name(args...)`
    pub fn function(name: impl Into<String>, args: Vec<Expr>) -> Expr {
        Expr::Function {
            name: name.into(),
            args,
        }
    }

    /// Creates an equality comparison: self = other
    pub fn eq(self, other: impl Into<Expr>) -> Expr {
        Expr::call(OperatorKind::Equal, vec![self, other.into()])
    }

    /// Creates a not-equal comparison: self <> other
    pub fn not_eq(self, other: impl Into<Expr>) -> Expr {
        Expr::call(OperatorKind::NotEqual, vec![self, other.into()])
    }

    /// Creates a less-than comparison: self < other
    pub fn lt(self, other: impl Into<Expr>) -> Expr {
        Expr::call(OperatorKind::LessThan, vec![self, other.into()])
    }

    /// Creates a less-than-or-equal comparison: self <= other
    pub fn lt_eq(self, other: impl Into<Expr>) -> Expr {
        Expr::call(OperatorKind::LessOrEqual, vec![self, other.into()])
    }

    /// Creates a greater-than comparison: self > other
    pub fn gt(self, other: impl Into<Expr>) -> Expr {
        Expr::call(OperatorKind::GreaterThan, vec![self, other.into()])
    }

    /// Creates a greater-than-or-equal comparison: self >= other
    pub fn gt_eq(self, other: impl Into<Expr>) -> Expr {
        Expr::call(OperatorKind::GreaterOrEqual, vec![self, other.into()])
    }

    /// Creates an IN comparison: self IN (values...)
    pub fn in_list<V: Into<Expr>>(self, values: impl IntoIterator<Item = V>) -> Expr {
        let mut args = vec![self];
        args.extend(values.into_iter().map(Into::into));
        Expr::call(OperatorKind::In, args)
    }

    /// Creates an inclusive range comparison: self BETWEEN low AND high
    pub fn between(self, low: impl Into<Expr>, high: impl Into<Expr>) -> Expr {
        Expr::call(OperatorKind::Between, vec![self, low.into(), high.into()])
    }

    /// Creates an IS NULL check
    pub fn is_null(self) -> Expr {
        Expr::call(OperatorKind::IsNull, vec![self])
    }

    /// Creates an IS NOT NULL check
    pub fn is_not_null(self) -> Expr {
        Expr::call(OperatorKind::IsNotNull, vec![self])
    }

    /// Combines this expression with another using AND.
    ///
    /// When `self` is already a conjunction, `other` is appended to it
    /// rather than nesting a new one.
    pub fn and(self, other: Expr) -> Expr {
        match self {
            Expr::And(mut children) => {
                children.push(other);
                Expr::And(children)
            }
            this => Expr::And(vec![this, other]),
        }
    }

    /// Combines this expression with another using OR, appending to an
    /// existing disjunction.
    pub fn or(self, other: Expr) -> Expr {
        match self {
            Expr::Or(mut children) => {
                children.push(other);
                Expr::Or(children)
            }
            this => Expr::Or(vec![this, other]),
        }
    }
}

impl Not for Expr {
    type Output = Expr;

    /// Negates this expression using the `!` operator.
    fn not(self) -> Expr {
        Expr::call(OperatorKind::Not, vec![self])
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&Predicate::from(self.clone()), f)
    }
}

/// Fluent builder for column comparisons.
pub struct ExprBuilder;

impl ExprBuilder {
    /// Starts building a comparison for the given column.
    ///
    /// # Example
    ///
    /// ```
    /// use predicate_pushdown::expr::ExprBuilder;
    ///
    /// let filter = ExprBuilder::column("age").gt_eq(18);
    /// ```
    pub fn column(name: impl Into<String>) -> Expr {
        col(name)
    }
}

/// Combines expressions with AND. Returns `None` for an empty list and the
/// sole element for a single-element list.
pub fn and_all(exprs: Vec<Expr>) -> Option<Expr> {
    let mut iter = exprs.into_iter();
    let first = iter.next()?;
    Some(iter.fold(first, |acc, e| acc.and(e)))
}

/// Combines expressions with OR, see [`and_all`].
pub fn or_all(exprs: Vec<Expr>) -> Option<Expr> {
    let mut iter = exprs.into_iter();
    let first = iter.next()?;
    Some(iter.fold(first, |acc, e| acc.or(e)))
}

/// Stable index of a node inside a [`Predicate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExprId(usize);

impl ExprId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One node of an arena-backed predicate tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ExprNode {
    Column { name: String },
    Literal { value: Value },
    Call { op: OperatorKind, args: Vec<ExprId> },
    And { children: Vec<ExprId> },
    Or { children: Vec<ExprId> },
    Function { name: String, args: Vec<ExprId> },
}

impl ExprNode {
    /// Child nodes referenced by this node, in operand order.
    pub fn children(&self) -> &[ExprId] {
        match self {
            ExprNode::Column { .. } | ExprNode::Literal { .. } => &[],
            ExprNode::Call { args, .. } | ExprNode::Function { args, .. } => args,
            ExprNode::And { children } | ExprNode::Or { children } => children,
        }
    }
}

/// Arena-backed filter expression tree.
///
/// A predicate without a root is the always-true filter: nothing to push,
/// nothing left to evaluate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPredicate")]
pub struct Predicate {
    nodes: Vec<ExprNode>,
    root: Option<ExprId>,
}

#[derive(Deserialize)]
struct RawPredicate {
    nodes: Vec<ExprNode>,
    root: Option<ExprId>,
}

impl TryFrom<RawPredicate> for Predicate {
    type Error = Error;

    fn try_from(raw: RawPredicate) -> Result<Self, Self::Error> {
        let mut referenced = vec![false; raw.nodes.len()];
        for (index, node) in raw.nodes.iter().enumerate() {
            for child in node.children() {
                if child.index() >= index {
                    return Err(Error::MalformedPredicate {
                        node: index,
                        child: child.index(),
                    });
                }
                if std::mem::replace(&mut referenced[child.index()], true) {
                    return Err(Error::SharedNode {
                        node: index,
                        child: child.index(),
                    });
                }
            }
        }
        if let Some(root) = raw.root.filter(|r| r.index() >= raw.nodes.len()) {
            return Err(Error::MalformedPredicate {
                node: raw.nodes.len(),
                child: root.index(),
            });
        }
        Ok(Predicate {
            nodes: raw.nodes,
            root: raw.root,
        })
    }
}

impl Predicate {
    /// The empty, always-true predicate.
    pub fn always_true() -> Self {
        Self::default()
    }

    pub fn root(&self) -> Option<ExprId> {
        self.root
    }

    pub fn is_always_true(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the node stored at `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this predicate.
    pub fn node(&self, id: ExprId) -> &ExprNode {
        &self.nodes[id.index()]
    }

    /// All nodes in allocation order.
    pub fn nodes(&self) -> &[ExprNode] {
        &self.nodes
    }

    /// Number of nodes reachable from the root.
    pub fn size(&self) -> usize {
        self.root.map_or(0, |root| self.subtree(root).len())
    }

    /// Ids of the subtree rooted at `id` in allocation order, so every
    /// child comes before its parent.
    pub(crate) fn subtree(&self, id: ExprId) -> Vec<ExprId> {
        let mut ids = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            ids.push(next);
            stack.extend_from_slice(self.node(next).children());
        }
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Converts this predicate back into an owned [`Expr`] tree.
    pub fn to_expr(&self) -> Option<Expr> {
        self.root.map(|root| self.expr_at(root))
    }

    /// Converts the subtree rooted at `id` into an owned [`Expr`].
    ///
    /// The arena is walked without recursion, but the owned tree is
    /// recursive: keep very deep predicates in arena form.
    pub fn expr_at(&self, id: ExprId) -> Expr {
        let mut built: HashMap<ExprId, Expr> = HashMap::new();
        for next in self.subtree(id) {
            let mut take = |ids: &[ExprId]| -> Vec<Expr> {
                ids.iter()
                    .map(|c| built.remove(c).unwrap_or(Expr::Literal(Value::Null)))
                    .collect()
            };
            let expr = match self.node(next) {
                ExprNode::Column { name } => Expr::Column(name.clone()),
                ExprNode::Literal { value } => Expr::Literal(value.clone()),
                ExprNode::Call { op, args } => Expr::Call {
                    op: *op,
                    args: take(args),
                },
                ExprNode::And { children } => Expr::And(take(children)),
                ExprNode::Or { children } => Expr::Or(take(children)),
                ExprNode::Function { name, args } => Expr::Function {
                    name: name.clone(),
                    args: take(args),
                },
            };
            built.insert(next, expr);
        }
        built.remove(&id).unwrap_or(Expr::Literal(Value::Null))
    }

    /// Serializes this predicate to its JSON form.
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses a predicate from its JSON form, rejecting trees whose nodes
    /// reference children that do not precede them.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }
}

impl From<Expr> for Predicate {
    fn from(expr: Expr) -> Self {
        let mut builder = PredicateBuilder::default();
        let root = builder.lower(expr);
        builder.finish(Some(root))
    }
}

impl From<Option<Expr>> for Predicate {
    fn from(expr: Option<Expr>) -> Self {
        expr.map(Predicate::from).unwrap_or_default()
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = crate::sql::render_display(self);
        f.write_str(&rendered)
    }
}

/// Allocates nodes for a new [`Predicate`], children before parents.
#[derive(Debug, Default)]
pub(crate) struct PredicateBuilder {
    nodes: Vec<ExprNode>,
}

impl PredicateBuilder {
    pub(crate) fn push(&mut self, node: ExprNode) -> ExprId {
        self.nodes.push(node);
        ExprId(self.nodes.len() - 1)
    }

    pub(crate) fn lower(&mut self, expr: Expr) -> ExprId {
        let node = match expr {
            Expr::Column(name) => ExprNode::Column { name },
            Expr::Literal(value) => ExprNode::Literal { value },
            Expr::Call { op, args } => ExprNode::Call {
                op,
                args: args.into_iter().map(|a| self.lower(a)).collect(),
            },
            Expr::And(children) => ExprNode::And {
                children: children.into_iter().map(|c| self.lower(c)).collect(),
            },
            Expr::Or(children) => ExprNode::Or {
                children: children.into_iter().map(|c| self.lower(c)).collect(),
            },
            Expr::Function { name, args } => ExprNode::Function {
                name,
                args: args.into_iter().map(|a| self.lower(a)).collect(),
            },
        };
        self.push(node)
    }

    /// Copies the subtree rooted at `id` of `source` into this builder.
    pub(crate) fn copy_from(&mut self, source: &Predicate, id: ExprId) -> ExprId {
        let mut copied: HashMap<ExprId, ExprId> = HashMap::new();
        let mut last = None;
        for next in source.subtree(id) {
            let remap = |ids: &[ExprId]| -> Vec<ExprId> {
                ids.iter().filter_map(|c| copied.get(c).copied()).collect()
            };
            let node = match source.node(next) {
                ExprNode::Call { op, args } => ExprNode::Call {
                    op: *op,
                    args: remap(args),
                },
                ExprNode::And { children } => ExprNode::And {
                    children: remap(children),
                },
                ExprNode::Or { children } => ExprNode::Or {
                    children: remap(children),
                },
                ExprNode::Function { name, args } => ExprNode::Function {
                    name: name.clone(),
                    args: remap(args),
                },
                leaf => leaf.clone(),
            };
            let new_id = self.push(node);
            copied.insert(next, new_id);
            last = Some(new_id);
        }
        // the subtree root has the largest id and is copied last
        last.unwrap_or_else(|| self.push(source.node(id).clone()))
    }

    pub(crate) fn finish(self, root: Option<ExprId>) -> Predicate {
        Predicate {
            nodes: self.nodes,
            root,
        }
    }
}
