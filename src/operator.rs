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

//! Comparison operators recognized by the predicate decomposer.
//!
//! The operator set is closed: every comparison a connector may be able to
//! evaluate remotely is an [`OperatorKind`] variant, and the subset a given
//! connector actually supports is an [`OperatorSet`] handed to the
//! decomposer at construction time.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Comparison operators for leaf predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OperatorKind {
    /// Equal to
    Equal,
    /// Greater than or equal to
    GreaterOrEqual,
    /// Less than or equal to
    LessOrEqual,
    /// Less than
    LessThan,
    /// Greater than
    GreaterThan,
    /// Value is contained in set (IN operator)
    In,
    /// Value lies in an inclusive range (BETWEEN operator)
    Between,
    /// Logical negation of a boolean column
    Not,
    /// Is not null
    IsNotNull,
    /// Is null
    IsNull,
    /// Not equal to
    NotEqual,
}

impl OperatorKind {
    /// Every operator, in declaration order.
    pub const ALL: [OperatorKind; 11] = [
        OperatorKind::Equal,
        OperatorKind::GreaterOrEqual,
        OperatorKind::LessOrEqual,
        OperatorKind::LessThan,
        OperatorKind::GreaterThan,
        OperatorKind::In,
        OperatorKind::Between,
        OperatorKind::Not,
        OperatorKind::IsNotNull,
        OperatorKind::IsNull,
        OperatorKind::NotEqual,
    ];

    /// Returns the SQL spelling of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            OperatorKind::Equal => "=",
            OperatorKind::GreaterOrEqual => ">=",
            OperatorKind::LessOrEqual => "<=",
            OperatorKind::LessThan => "<",
            OperatorKind::GreaterThan => ">",
            OperatorKind::In => "IN",
            OperatorKind::Between => "BETWEEN",
            OperatorKind::Not => "NOT",
            OperatorKind::IsNotNull => "IS NOT NULL",
            OperatorKind::IsNull => "IS NULL",
            OperatorKind::NotEqual => "<>",
        }
    }

    /// Returns `true` for the six two-operand comparison operators.
    pub fn is_binary_comparison(self) -> bool {
        matches!(
            self,
            OperatorKind::Equal
                | OperatorKind::NotEqual
                | OperatorKind::LessThan
                | OperatorKind::LessOrEqual
                | OperatorKind::GreaterThan
                | OperatorKind::GreaterOrEqual
        )
    }

    /// Returns `true` for operators taking a single operand.
    pub fn is_unary(self) -> bool {
        matches!(
            self,
            OperatorKind::Not | OperatorKind::IsNull | OperatorKind::IsNotNull
        )
    }

    /// Checks whether `n` operands is a valid shape for this operator.
    pub fn accepts_arity(self, n: usize) -> bool {
        match self {
            op if op.is_binary_comparison() => n == 2,
            op if op.is_unary() => n == 1,
            OperatorKind::In => n >= 2,
            OperatorKind::Between => n == 3,
            _ => false,
        }
    }

    /// Returns the operator obtained by swapping the two operands of a binary
    /// comparison, so that `5 < x` can be rewritten as `x > 5`.
    ///
    /// Returns `None` for operators whose operands are not interchangeable.
    pub fn mirrored(self) -> Option<OperatorKind> {
        match self {
            OperatorKind::Equal => Some(OperatorKind::Equal),
            OperatorKind::NotEqual => Some(OperatorKind::NotEqual),
            OperatorKind::LessThan => Some(OperatorKind::GreaterThan),
            OperatorKind::GreaterThan => Some(OperatorKind::LessThan),
            OperatorKind::LessOrEqual => Some(OperatorKind::GreaterOrEqual),
            OperatorKind::GreaterOrEqual => Some(OperatorKind::LessOrEqual),
            _ => None,
        }
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperatorKind {
    type Err = Error;

    /// Parses an operator from its SQL spelling (case-insensitive, inner
    /// whitespace collapsed).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_lowercase();
        match normalized.as_str() {
            "=" | "==" => Ok(OperatorKind::Equal),
            ">=" => Ok(OperatorKind::GreaterOrEqual),
            "<=" => Ok(OperatorKind::LessOrEqual),
            "<" => Ok(OperatorKind::LessThan),
            ">" => Ok(OperatorKind::GreaterThan),
            "in" => Ok(OperatorKind::In),
            "between" => Ok(OperatorKind::Between),
            "not" => Ok(OperatorKind::Not),
            "is not null" => Ok(OperatorKind::IsNotNull),
            "is null" => Ok(OperatorKind::IsNull),
            "<>" | "!=" => Ok(OperatorKind::NotEqual),
            _ => Err(Error::UnknownOperator(s.to_string())),
        }
    }
}

/// The set of operators a connector can evaluate remotely.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OperatorSet(BTreeSet<OperatorKind>);

impl OperatorSet {
    /// Creates an empty operator set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every [`OperatorKind`], the set a plain JDBC source supports.
    pub fn all() -> Self {
        OperatorKind::ALL.into_iter().collect()
    }

    /// Parses a comma-separated list of operator names, e.g. `"=, >, in"`.
    ///
    /// Empty tokens are skipped; unknown names are rejected.
    pub fn parse_list(list: &str) -> Result<Self, Error> {
        list.split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(OperatorKind::from_str)
            .collect()
    }

    pub fn insert(&mut self, op: OperatorKind) -> bool {
        self.0.insert(op)
    }

    pub fn contains(&self, op: OperatorKind) -> bool {
        self.0.contains(&op)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = OperatorKind> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<OperatorKind> for OperatorSet {
    fn from_iter<I: IntoIterator<Item = OperatorKind>>(iter: I) -> Self {
        OperatorSet(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[OperatorKind; N]> for OperatorSet {
    fn from(ops: [OperatorKind; N]) -> Self {
        ops.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_operator_names() {
        assert_eq!("=".parse::<OperatorKind>().unwrap(), OperatorKind::Equal);
        assert_eq!("!=".parse::<OperatorKind>().unwrap(), OperatorKind::NotEqual);
        assert_eq!("<>".parse::<OperatorKind>().unwrap(), OperatorKind::NotEqual);
        assert_eq!(
            "IS  NOT\tNULL".parse::<OperatorKind>().unwrap(),
            OperatorKind::IsNotNull
        );
        assert_eq!(
            "Between".parse::<OperatorKind>().unwrap(),
            OperatorKind::Between
        );
    }

    #[test]
    fn test_parse_unknown_operator() {
        let err = "like".parse::<OperatorKind>().unwrap_err();
        assert!(matches!(err, Error::UnknownOperator(ref s) if s == "like"));
    }

    #[test]
    fn test_round_trip_sql_spelling() {
        for op in OperatorKind::ALL {
            assert_eq!(op.as_str().parse::<OperatorKind>().unwrap(), op);
        }
    }

    #[test]
    fn test_mirrored_is_involution() {
        for op in OperatorKind::ALL {
            if let Some(m) = op.mirrored() {
                assert_eq!(m.mirrored(), Some(op));
            } else {
                assert!(!op.is_binary_comparison());
            }
        }
    }

    #[test]
    fn test_arity() {
        assert!(OperatorKind::Equal.accepts_arity(2));
        assert!(!OperatorKind::Equal.accepts_arity(3));
        assert!(OperatorKind::In.accepts_arity(2));
        assert!(OperatorKind::In.accepts_arity(5));
        assert!(!OperatorKind::In.accepts_arity(1));
        assert!(OperatorKind::Between.accepts_arity(3));
        assert!(OperatorKind::IsNull.accepts_arity(1));
        assert!(!OperatorKind::Not.accepts_arity(2));
    }

    #[test]
    fn test_parse_list() {
        let set = OperatorSet::parse_list(" =, >,, in ").unwrap();
        assert_eq!(set.len(), 3);
        assert!(set.contains(OperatorKind::Equal));
        assert!(set.contains(OperatorKind::GreaterThan));
        assert!(set.contains(OperatorKind::In));
        assert!(!set.contains(OperatorKind::LessThan));

        assert!(OperatorSet::parse_list("").unwrap().is_empty());
        assert!(OperatorSet::parse_list("=, ~").is_err());
    }

    #[test]
    fn test_all_contains_every_operator() {
        let all = OperatorSet::all();
        assert_eq!(all.len(), OperatorKind::ALL.len());
        assert!(OperatorKind::ALL.iter().all(|op| all.contains(*op)));
    }
}
