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

//! Rendering of predicates as SQL filter clauses.
//!
//! [`to_sql`] turns a pushed predicate into a WHERE-clause fragment the
//! connector appends to its remote query. Only conjunctions of comparisons
//! over scalar constants can be rendered; disjunctions and opaque functions
//! are rejected, since they are never part of a pushed predicate.
//!
//! # Example
//!
//! ```
//! use predicate_pushdown::expr::{Predicate, col};
//! use predicate_pushdown::sql::{SqlStyle, to_sql};
//!
//! let pushed = Predicate::from(col("age").gt_eq(18).and(col("name").eq("O'Neil")));
//! let clause = to_sql(&pushed, &SqlStyle::default()).unwrap();
//! assert_eq!(clause, r#""age" >= 18 AND "name" = 'O''Neil'"#);
//! ```

use crate::error::Error;
use crate::expr::{ExprId, ExprNode, Predicate};
use crate::operator::OperatorKind;
use serde_json::Value;

/// Identifier quoting used when rendering column names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SqlStyle {
    /// Character wrapped around identifiers; `None` leaves them bare
    pub identifier_quote: Option<char>,
}

impl Default for SqlStyle {
    fn default() -> Self {
        SqlStyle {
            identifier_quote: Some('"'),
        }
    }
}

impl SqlStyle {
    /// Backtick quoting, as used by MySQL-family databases.
    pub fn backtick() -> Self {
        SqlStyle {
            identifier_quote: Some('`'),
        }
    }

    /// Picks the quoting convention for a `connector.database.type` value.
    pub fn for_database_type(database_type: &str) -> Self {
        match database_type.to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" | "hive" | "h2-mysql" => Self::backtick(),
            _ => Self::default(),
        }
    }
}

/// Renders a pushed predicate as a SQL WHERE-clause fragment.
///
/// The always-true predicate renders as `TRUE`.
pub fn to_sql(predicate: &Predicate, style: &SqlStyle) -> Result<String, Error> {
    let renderer = Renderer {
        style: *style,
        strict: true,
    };
    let mut out = String::new();
    match predicate.root() {
        Some(root) => renderer.render(predicate, root, &mut out)?,
        None => out.push_str("TRUE"),
    }
    Ok(out)
}

/// Human-readable rendering used by `Display`; never fails.
pub(crate) fn render_display(predicate: &Predicate) -> String {
    let renderer = Renderer {
        style: SqlStyle {
            identifier_quote: None,
        },
        strict: false,
    };
    let mut out = String::new();
    match predicate.root() {
        // non-strict rendering has no error path
        Some(root) => {
            let _ = renderer.render(predicate, root, &mut out);
        }
        None => out.push_str("TRUE"),
    }
    out
}

struct Renderer {
    style: SqlStyle,
    /// Reject nodes that cannot be sent to a remote source
    strict: bool,
}

/// Pending output of an iterative render.
enum Step<'a> {
    Node(ExprId),
    Text(&'a str),
}

impl Renderer {
    fn render(&self, p: &Predicate, root: ExprId, out: &mut String) -> Result<(), Error> {
        let mut stack = vec![Step::Node(root)];
        let mut steps = Vec::new();
        while let Some(step) = stack.pop() {
            match step {
                Step::Text(text) => out.push_str(text),
                Step::Node(id) => {
                    self.expand(p, id, &mut steps, out)?;
                    stack.extend(steps.drain(..).rev());
                }
            }
        }
        Ok(())
    }

    /// Writes a leaf straight to `out`, or queues the pieces of an inner
    /// node in output order.
    fn expand<'a>(
        &self,
        p: &'a Predicate,
        id: ExprId,
        steps: &mut Vec<Step<'a>>,
        out: &mut String,
    ) -> Result<(), Error> {
        match p.node(id) {
            ExprNode::Column { name } => self.identifier(name, out),
            ExprNode::Literal { value } => self.literal(value, out)?,
            ExprNode::Call { op, args } => self.call(p, *op, args, steps)?,
            ExprNode::And { children } => junction(p, children, " AND ", "TRUE", steps),
            ExprNode::Or { children } => {
                if self.strict {
                    return Err(Error::Unserializable(format!(
                        "disjunction at node {id} cannot be pushed"
                    )));
                }
                junction(p, children, " OR ", "FALSE", steps)
            }
            ExprNode::Function { name, args } => {
                if self.strict {
                    return Err(Error::Unserializable(format!(
                        "function {name:?} at node {id} cannot be pushed"
                    )));
                }
                steps.push(Step::Text(name.as_str()));
                steps.push(Step::Text("("));
                list(p, args, steps);
                steps.push(Step::Text(")"));
            }
        }
        Ok(())
    }

    fn call<'a>(
        &self,
        p: &'a Predicate,
        op: OperatorKind,
        args: &'a [ExprId],
        steps: &mut Vec<Step<'a>>,
    ) -> Result<(), Error> {
        if !op.accepts_arity(args.len()) {
            if self.strict {
                return Err(Error::Unserializable(format!(
                    "{op} cannot take {} operands",
                    args.len()
                )));
            }
            steps.push(Step::Text(op.as_str()));
            steps.push(Step::Text("("));
            list(p, args, steps);
            steps.push(Step::Text(")"));
            return Ok(());
        }

        match op {
            OperatorKind::In => {
                operand(p, args[0], steps);
                steps.push(Step::Text(" IN ("));
                list(p, &args[1..], steps);
                steps.push(Step::Text(")"));
            }
            OperatorKind::Between => {
                operand(p, args[0], steps);
                steps.push(Step::Text(" BETWEEN "));
                operand(p, args[1], steps);
                steps.push(Step::Text(" AND "));
                operand(p, args[2], steps);
            }
            OperatorKind::Not => {
                steps.push(Step::Text("NOT "));
                operand(p, args[0], steps);
            }
            OperatorKind::IsNull | OperatorKind::IsNotNull => {
                operand(p, args[0], steps);
                steps.push(Step::Text(" "));
                steps.push(Step::Text(op.as_str()));
            }
            _ => {
                operand(p, args[0], steps);
                steps.push(Step::Text(" "));
                steps.push(Step::Text(op.as_str()));
                steps.push(Step::Text(" "));
                operand(p, args[1], steps);
            }
        }
        Ok(())
    }

    fn identifier(&self, name: &str, out: &mut String) {
        match self.style.identifier_quote {
            Some(q) => {
                out.push(q);
                for c in name.chars() {
                    if c == q {
                        out.push(q);
                    }
                    out.push(c);
                }
                out.push(q);
            }
            None => out.push_str(name),
        }
    }

    fn literal(&self, value: &Value, out: &mut String) -> Result<(), Error> {
        match value {
            Value::Null => out.push_str("NULL"),
            Value::Bool(true) => out.push_str("TRUE"),
            Value::Bool(false) => out.push_str("FALSE"),
            Value::Number(n) => out.push_str(&n.to_string()),
            Value::String(s) => {
                out.push('\'');
                out.push_str(&s.replace('\'', "''"));
                out.push('\'');
            }
            Value::Array(_) | Value::Object(_) => {
                if self.strict {
                    return Err(Error::Unserializable(format!(
                        "non-scalar constant {value}"
                    )));
                }
                out.push_str(&value.to_string());
            }
        }
        Ok(())
    }
}

/// Queues a child, parenthesised when it is itself an operator application
/// or junction.
fn operand(p: &Predicate, id: ExprId, steps: &mut Vec<Step<'_>>) {
    let compound = matches!(
        p.node(id),
        ExprNode::Call { .. } | ExprNode::And { .. } | ExprNode::Or { .. }
    );
    if compound {
        steps.extend([Step::Text("("), Step::Node(id), Step::Text(")")]);
    } else {
        steps.push(Step::Node(id));
    }
}

fn junction<'a>(
    p: &Predicate,
    children: &[ExprId],
    separator: &'a str,
    empty: &'a str,
    steps: &mut Vec<Step<'a>>,
) {
    if children.is_empty() {
        steps.push(Step::Text(empty));
        return;
    }
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            steps.push(Step::Text(separator));
        }
        if matches!(p.node(*child), ExprNode::And { .. } | ExprNode::Or { .. }) {
            steps.extend([Step::Text("("), Step::Node(*child), Step::Text(")")]);
        } else {
            steps.push(Step::Node(*child));
        }
    }
}

fn list(p: &Predicate, ids: &[ExprId], steps: &mut Vec<Step<'_>>) {
    for (i, id) in ids.iter().enumerate() {
        if i > 0 {
            steps.push(Step::Text(", "));
        }
        operand(p, *id, steps);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{Expr, PredicateBuilder, col};
    use serde_json::json;

    fn sql(expr: Expr) -> Result<String, Error> {
        to_sql(&Predicate::from(expr), &SqlStyle::default())
    }

    #[test]
    fn test_binary_comparisons() {
        assert_eq!(sql(col("a").eq(5)).unwrap(), r#""a" = 5"#);
        assert_eq!(sql(col("a").not_eq(5)).unwrap(), r#""a" <> 5"#);
        assert_eq!(sql(col("a").lt(1.5)).unwrap(), r#""a" < 1.5"#);
        assert_eq!(sql(col("a").lt_eq(-3)).unwrap(), r#""a" <= -3"#);
        assert_eq!(sql(col("a").gt(true)).unwrap(), r#""a" > TRUE"#);
        assert_eq!(sql(col("a").gt_eq("x")).unwrap(), r#""a" >= 'x'"#);
    }

    #[test]
    fn test_in_between_null_not() {
        assert_eq!(
            sql(col("s").in_list(["a", "b"])).unwrap(),
            r#""s" IN ('a', 'b')"#
        );
        assert_eq!(
            sql(col("n").between(1, 9)).unwrap(),
            r#""n" BETWEEN 1 AND 9"#
        );
        assert_eq!(sql(col("n").is_null()).unwrap(), r#""n" IS NULL"#);
        assert_eq!(sql(col("n").is_not_null()).unwrap(), r#""n" IS NOT NULL"#);
        assert_eq!(sql(!col("flag")).unwrap(), r#"NOT "flag""#);
    }

    #[test]
    fn test_conjunction() {
        let clause = sql(col("a").eq(5).and(col("b").gt(10)).and(col("c").is_null())).unwrap();
        assert_eq!(clause, r#""a" = 5 AND "b" > 10 AND "c" IS NULL"#);
    }

    #[test]
    fn test_escaping() {
        assert_eq!(
            sql(col(r#"we"ird"#).eq("it's")).unwrap(),
            r#""we""ird" = 'it''s'"#
        );
        let backtick = to_sql(
            &Predicate::from(col("a`b").eq(Value::Null)),
            &SqlStyle::for_database_type("MySQL"),
        )
        .unwrap();
        assert_eq!(backtick, "`a``b` = NULL");
    }

    #[test]
    fn test_rejects_opaque_nodes() {
        let err = sql(col("a").eq(1).or(col("b").eq(2))).unwrap_err();
        assert!(matches!(err, Error::Unserializable(_)));

        let err = sql(Expr::function("upper", vec![col("a")]).eq("X")).unwrap_err();
        assert!(matches!(err, Error::Unserializable(_)));

        let err = sql(col("a").eq(json!([1, 2]))).unwrap_err();
        assert!(matches!(err, Error::Unserializable(_)));

        let malformed = Expr::Call {
            op: OperatorKind::Equal,
            args: vec![col("a")],
        };
        assert!(sql(malformed).is_err());
    }

    #[test]
    fn test_always_true() {
        assert_eq!(
            to_sql(&Predicate::always_true(), &SqlStyle::default()).unwrap(),
            "TRUE"
        );
    }

    #[test]
    fn test_display_is_permissive() {
        let expr = col("a")
            .eq(1)
            .or(Expr::function("len", vec![col("b")]).gt(2))
            .and(col("c").in_list([1, 2]));
        assert_eq!(
            Predicate::from(expr).to_string(),
            "(a = 1 OR len(b) > 2) AND c IN (1, 2)"
        );
    }

    #[test]
    fn test_deeply_nested_conjunction() {
        let depth = 50_000;
        let mut builder = PredicateBuilder::default();
        let column = builder.push(ExprNode::Column {
            name: "a".to_string(),
        });
        let value = builder.push(ExprNode::Literal { value: json!(1) });
        let mut top = builder.push(ExprNode::Call {
            op: OperatorKind::Equal,
            args: vec![column, value],
        });
        for _ in 0..depth {
            top = builder.push(ExprNode::And { children: vec![top] });
        }
        let predicate = builder.finish(Some(top));

        let clause = to_sql(&predicate, &SqlStyle::default()).unwrap();
        assert_eq!(clause.len(), r#""a" = 1"#.len() + 2 * (depth - 1));
        assert!(clause.starts_with(r#"(("#));
        assert!(clause.ends_with(r#""a" = 1))"#));
    }
}
