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

mod common;

use common::{init_logger, row};
use predicate_pushdown::eval::{filter_rows, matches};
use predicate_pushdown::expr::{Expr, Predicate, and_all, col};
use predicate_pushdown::sql::{SqlStyle, to_sql};
use predicate_pushdown::{OperatorKind, OperatorSet, PredicateDecomposer, decompose};
use serde_json::json;

fn eq_gt() -> OperatorSet {
    OperatorSet::from([OperatorKind::Equal, OperatorKind::GreaterThan])
}

#[test]
fn fully_pushed_conjunction() {
    init_logger();
    let predicate = Predicate::from(col("colA").eq(5).and(col("colB").gt(10)));

    let result = decompose(&predicate, ["colA", "colB"], eq_gt()).unwrap();

    let pushed = result.pushed.as_ref().unwrap();
    assert_eq!(
        to_sql(pushed, &SqlStyle::default()).unwrap(),
        r#""colA" = 5 AND "colB" > 10"#
    );
    assert!(result.residual.is_none());
    assert!(result.is_fully_pushed());
    assert_eq!(result.search_conditions.len(), 2);
}

#[test]
fn partially_pushed_conjunction() {
    init_logger();
    let predicate = Predicate::from(col("colA").eq(5).and(col("colC").gt(10)));

    let result = decompose(&predicate, ["colA", "colB"], OperatorSet::all()).unwrap();

    assert_eq!(result.pushed.unwrap().to_string(), "colA = 5");
    assert_eq!(result.residual.unwrap().to_string(), "colC > 10");
}

#[test]
fn disjunction_stays_local() {
    init_logger();
    let predicate = Predicate::from(col("colA").eq(5).or(col("colB").gt(10)));

    let result = decompose(&predicate, ["colA", "colB"], OperatorSet::all()).unwrap();

    assert!(result.is_nothing_pushed());
    assert!(result.search_conditions.is_empty());
    assert_eq!(result.residual, Some(predicate));
}

#[test]
fn column_to_column_stays_local() {
    init_logger();
    let predicate = Predicate::from(col("colA").eq(col("colB")));

    let result = decompose(&predicate, ["colA", "colB"], OperatorSet::all()).unwrap();

    assert!(result.pushed.is_none());
    assert_eq!(result.residual.unwrap().to_string(), "colA = colB");
}

#[test]
fn always_true_yields_nothing() {
    init_logger();
    let result = decompose(&Predicate::always_true(), ["colA"], OperatorSet::all()).unwrap();

    assert!(result.pushed.is_none());
    assert!(result.residual.is_none());
    assert!(result.search_conditions.is_empty());
}

#[test]
fn mixed_conjunction_keeps_opaque_children_in_order() {
    init_logger();
    let predicate = Predicate::from(
        and_all(vec![
            col("region").eq("eu"),
            col("total").gt(100).or(col("vip").eq(true)),
            col("status").in_list(["open", "paid"]),
            Expr::function("lower", vec![col("name")]).eq("bob"),
            col("created").between(1, 10),
        ])
        .unwrap(),
    );
    let decomposer =
        PredicateDecomposer::new(["region", "status", "created", "total"], OperatorSet::all())
            .unwrap();

    let result = decomposer.decompose(&predicate);

    assert_eq!(
        to_sql(result.pushed.as_ref().unwrap(), &SqlStyle::backtick()).unwrap(),
        "`region` = 'eu' AND `status` IN ('open', 'paid') AND `created` BETWEEN 1 AND 10"
    );
    assert_eq!(
        result.residual.as_ref().unwrap().to_string(),
        "(total > 100 OR vip = TRUE) AND lower(name) = 'bob'"
    );

    let rows = vec![
        row(json!({"region": "eu", "total": 150, "vip": false, "status": "open",
                   "name": "BOB", "created": 3})),
        row(json!({"region": "eu", "total": 10, "vip": false, "status": "open",
                   "name": "bob", "created": 3})),
        row(json!({"region": "us", "total": 150, "vip": true, "status": "paid",
                   "name": "bob", "created": 5})),
    ];
    for r in &rows {
        let pushed_ok = matches(result.pushed.as_ref().unwrap(), r);
        let local_ok = matches(result.residual.as_ref().unwrap(), r);
        assert_eq!(pushed_ok && local_ok, matches(&predicate, r));
    }
}

#[test]
fn constant_first_comparison_is_mirrored() {
    init_logger();
    let predicate = Predicate::from(Expr::from(5).lt(col("age")));

    let result = decompose(&predicate, ["age"], OperatorSet::all()).unwrap();

    assert_eq!(result.search_conditions[0].op, OperatorKind::GreaterThan);
    assert_eq!(result.pushed.unwrap().to_string(), "age > 5");
    assert!(result.residual.is_none());
}

#[test]
fn pushed_and_residual_filter_same_rows() {
    init_logger();
    let predicate = Predicate::from(
        col("age")
            .gt_eq(18)
            .and(col("country").not_eq("NZ"))
            .and(col("nickname").is_not_null().or(col("age").lt(21))),
    );
    let result = decompose(&predicate, ["age", "country"], OperatorSet::all()).unwrap();

    let rows = vec![
        row(json!({"age": 17, "country": "AU", "nickname": "kid"})),
        row(json!({"age": 19, "country": "AU", "nickname": null})),
        row(json!({"age": 30, "country": "AU", "nickname": null})),
        row(json!({"age": 30, "country": "NZ", "nickname": "kiwi"})),
        row(json!({"age": 40, "country": "AU", "nickname": "ace"})),
    ];

    let remote = filter_rows(result.pushed.as_ref().unwrap(), rows.clone());
    let local = filter_rows(result.residual.as_ref().unwrap(), remote);
    let expected = filter_rows(&predicate, rows);
    assert_eq!(local, expected);
    assert_eq!(local.len(), 2);
}

#[test]
fn decomposition_survives_json_transport() {
    init_logger();
    let predicate = Predicate::from(col("a").eq(1).and(col("b").gt(2)).and(col("c").eq(3)));
    let json = predicate.to_json().unwrap();
    let restored = Predicate::from_json(&json).unwrap();

    let original = decompose(&predicate, ["a", "b"], OperatorSet::all()).unwrap();
    let transported = decompose(&restored, ["a", "b"], OperatorSet::all()).unwrap();
    assert_eq!(original, transported);
}
