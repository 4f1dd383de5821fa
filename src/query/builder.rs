//! Parameterized SQL generation.
//!
//! Values only ever reach the store as `?` placeholders. Table and column names cannot be
//! bound, so every identifier is checked against a registered [`TableModel`] before it is
//! written into the statement text.

use crate::domain::condition::{ColumnUpdate, Condition, Predicate, QueryInput, Scalar};
use crate::domain::model::{ModelRegistry, TableModel};
use crate::error::ValidationError;

/// SQL text plus its bind values, in placeholder order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Scalar>,
}

impl Statement {
    pub fn new(sql: impl Into<String>, params: Vec<Scalar>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }
}

/// Builds the body of a WHERE clause (without the `WHERE` keyword).
///
/// Conditions are joined with ` AND ` in input order. No conditions yields an empty
/// statement; callers that mean "every row" must say so explicitly.
pub fn build_where(
    model: &dyn TableModel,
    conditions: &[Condition],
) -> Result<Statement, ValidationError> {
    let mut fragments = Vec::with_capacity(conditions.len());
    let mut params = Vec::with_capacity(conditions.iter().map(|c| c.predicate.param_count()).sum());

    for condition in conditions {
        let column = model.require_column(&condition.column)?.name;
        match &condition.predicate {
            Predicate::Range(low, high) => {
                fragments.push(format!("{column} BETWEEN ? AND ?"));
                params.push(low.clone());
                params.push(high.clone());
            }
            Predicate::Contains(needle) => {
                fragments.push(format!("{column} LIKE ?"));
                params.push(Scalar::Text(format!("%{needle}%")));
            }
            Predicate::Equals(value) => {
                fragments.push(format!("{column} = ?"));
                params.push(value.clone());
            }
        }
    }

    Ok(Statement::new(fragments.join(" AND "), params))
}

/// `SELECT <cols|*> FROM <table> [WHERE ...] [LIMIT ?]`
pub fn build_select(
    registry: &ModelRegistry,
    input: &QueryInput,
) -> Result<Statement, ValidationError> {
    let model = registry.require(&input.table)?;

    let projection = match input.columns.as_deref() {
        None | Some([]) => "*".to_string(),
        Some(columns) => columns
            .iter()
            .map(|c| model.require_column(c).map(|def| def.name))
            .collect::<Result<Vec<_>, _>>()?
            .join(", "),
    };

    let mut sql = format!("SELECT {projection} FROM {}", model.table_name());
    let filter = build_where(model.as_ref(), &input.conditions)?;
    let mut params = filter.params;
    if !filter.sql.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&filter.sql);
    }

    if let Some(limit) = input.limit {
        if limit == 0 {
            return Err(ValidationError::InvalidLimit);
        }
        sql.push_str(" LIMIT ?");
        params.push(Scalar::Integer(i64::from(limit)));
    }

    Ok(Statement::new(sql, params))
}

/// `UPDATE <table> SET a = ?, b = ? [WHERE ...]`
///
/// SET values come first in the parameter list, then WHERE values, matching placeholder
/// order in the text. Each update is validated by the table model, which may normalize the
/// value.
pub fn build_update(
    registry: &ModelRegistry,
    table: &str,
    conditions: &[Condition],
    updates: &[ColumnUpdate],
) -> Result<Statement, ValidationError> {
    build_update_with_derived(registry, table, conditions, updates, &[])
}

/// Like [`build_update`], with extra `derived` assignments appended after `updates`.
///
/// Derived values are computed by the caller for read-only columns (`country_code` from
/// `country`). Their columns must still exist on the table but skip the updatability check
/// and value validation.
pub fn build_update_with_derived(
    registry: &ModelRegistry,
    table: &str,
    conditions: &[Condition],
    updates: &[ColumnUpdate],
    derived: &[ColumnUpdate],
) -> Result<Statement, ValidationError> {
    let model = registry.require(table)?;
    if updates.is_empty() {
        return Err(ValidationError::EmptyUpdate);
    }

    let mut assignments = Vec::with_capacity(updates.len() + derived.len());
    let mut params = Vec::with_capacity(updates.len() + derived.len());
    for update in updates {
        let update = model.validate_update(update.clone())?;
        let column = model.require_column(&update.column)?.name;
        assignments.push(format!("{column} = ?"));
        params.push(update.value);
    }
    for update in derived {
        let column = model.require_column(&update.column)?.name;
        assignments.push(format!("{column} = ?"));
        params.push(update.value.clone());
    }

    let mut sql = format!("UPDATE {} SET {}", model.table_name(), assignments.join(", "));
    let filter = build_where(model.as_ref(), conditions)?;
    if !filter.sql.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&filter.sql);
    }
    params.extend(filter.params);

    Ok(Statement::new(sql, params))
}

/// `DELETE FROM <table> WHERE ...`
///
/// With no conditions every row is deleted, written as the explicit `WHERE 1=1`.
pub fn build_delete(
    registry: &ModelRegistry,
    table: &str,
    conditions: &[Condition],
) -> Result<Statement, ValidationError> {
    let model = registry.require(table)?;
    let filter = build_where(model.as_ref(), conditions)?;
    let predicate = if filter.sql.is_empty() {
        "1=1"
    } else {
        filter.sql.as_str()
    };
    let sql = format!("DELETE FROM {} WHERE {predicate}", model.table_name());
    Ok(Statement::new(sql, filter.params))
}

/// `INSERT INTO <table> (a, b) VALUES (?, ?)`; rows are bound by the gateway.
pub fn build_insert(
    registry: &ModelRegistry,
    table: &str,
    columns: &[&str],
) -> Result<String, ValidationError> {
    let model = registry.require(table)?;
    if columns.is_empty() {
        return Err(ValidationError::invalid_value(table, "insert needs at least one column"));
    }
    let names = columns
        .iter()
        .map(|c| model.require_column(c).map(|def| def.name))
        .collect::<Result<Vec<_>, _>>()?;
    let placeholders = vec!["?"; names.len()].join(", ");
    Ok(format!(
        "INSERT INTO {} ({}) VALUES ({placeholders})",
        model.table_name(),
        names.join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ReviewsModel, REVIEW_INSERT_COLUMNS};
    use chrono::NaiveDate;

    fn registry() -> ModelRegistry {
        ModelRegistry::with_reviews()
    }

    #[test]
    fn where_single_range() {
        let stmt = build_where(
            &ReviewsModel,
            &[Condition::range("review_date", "2021-01-01", "2021-01-31")],
        )
        .unwrap();
        assert_eq!(stmt.sql, "review_date BETWEEN ? AND ?");
        assert_eq!(
            stmt.params,
            vec![Scalar::from("2021-01-01"), Scalar::from("2021-01-31")]
        );
    }

    #[test]
    fn where_joins_in_input_order() {
        let stmt = build_where(
            &ReviewsModel,
            &[
                Condition::range("review_date", "2021-01-01", "2021-01-31"),
                Condition::contains("reviewer_name", "John"),
                Condition::equals("review_rating", 5_i64),
            ],
        )
        .unwrap();
        assert_eq!(
            stmt.sql,
            "review_date BETWEEN ? AND ? AND reviewer_name LIKE ? AND review_rating = ?"
        );
        assert_eq!(
            stmt.params,
            vec![
                Scalar::from("2021-01-01"),
                Scalar::from("2021-01-31"),
                Scalar::from("%John%"),
                Scalar::Integer(5),
            ]
        );
    }

    #[test]
    fn where_fragment_and_param_counts() {
        let cases: Vec<Vec<Condition>> = vec![
            vec![],
            vec![Condition::equals("country", "Canada")],
            vec![
                Condition::contains("review_title", "great"),
                Condition::range("review_rating", 1_i64, 3_i64),
            ],
            vec![
                Condition::range("review_date", "2024-01-01", "2024-12-31"),
                Condition::range("review_rating", 4_i64, 5_i64),
                Condition::equals("email_address", "a@b.co"),
                Condition::contains("review_content", "food"),
            ],
        ];
        for conditions in cases {
            let stmt = build_where(&ReviewsModel, &conditions).unwrap();
            let expected_params: usize =
                conditions.iter().map(|c| c.predicate.param_count()).sum();
            assert_eq!(stmt.params.len(), expected_params);
            assert_eq!(stmt.sql.matches('?').count(), expected_params);
            if conditions.is_empty() {
                assert!(stmt.is_empty());
            } else {
                // BETWEEN also contains one AND, so count top-level joins instead.
                assert_eq!(stmt.sql.split(" AND ").count() - count_ranges(&conditions), conditions.len());
            }
        }
    }

    fn count_ranges(conditions: &[Condition]) -> usize {
        conditions
            .iter()
            .filter(|c| matches!(c.predicate, Predicate::Range(..)))
            .count()
    }

    #[test]
    fn where_rejects_unknown_columns() {
        let err = build_where(
            &ReviewsModel,
            &[Condition::equals("1=1 OR reviewer_name", "x")],
        )
        .unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownColumn {
                table: "reviews".to_string(),
                column: "1=1 OR reviewer_name".to_string()
            }
        );
    }

    #[test]
    fn values_never_appear_in_sql_text() {
        let hostile = "x'; DROP TABLE reviews; --";
        let stmt = build_where(
            &ReviewsModel,
            &[
                Condition::equals("reviewer_name", hostile),
                Condition::contains("review_title", hostile),
            ],
        )
        .unwrap();
        assert!(!stmt.sql.contains("DROP"));
        assert_eq!(stmt.params[0], Scalar::from(hostile));
    }

    #[test]
    fn select_all_without_filter() {
        let stmt = build_select(&registry(), &QueryInput::all("reviews")).unwrap();
        assert_eq!(stmt, Statement::new("SELECT * FROM reviews", vec![]));

        let empty_columns = QueryInput {
            columns: Some(vec![]),
            ..QueryInput::all("reviews")
        };
        assert_eq!(
            build_select(&registry(), &empty_columns).unwrap().sql,
            "SELECT * FROM reviews"
        );
    }

    #[test]
    fn select_columns_with_filter_and_limit() {
        let input = QueryInput {
            table: "reviews".to_string(),
            columns: Some(vec!["review_date".to_string(), "country".to_string()]),
            conditions: vec![
                Condition::range("review_date", "2021-01-01", "2021-01-31"),
                Condition::contains("reviewer_name", "John"),
            ],
            limit: Some(2),
        };
        let stmt = build_select(&registry(), &input).unwrap();
        assert_eq!(
            stmt.sql,
            "SELECT review_date, country FROM reviews WHERE review_date BETWEEN ? AND ? AND reviewer_name LIKE ? LIMIT ?"
        );
        assert_eq!(
            stmt.params,
            vec![
                Scalar::from("2021-01-01"),
                Scalar::from("2021-01-31"),
                Scalar::from("%John%"),
                Scalar::Integer(2),
            ]
        );
    }

    #[test]
    fn select_validates_identifiers_and_limit() {
        let bad_table = QueryInput::all("sqlite_master");
        assert_eq!(
            build_select(&registry(), &bad_table).unwrap_err(),
            ValidationError::UnknownTable("sqlite_master".to_string())
        );

        let bad_column = QueryInput {
            columns: Some(vec!["id".to_string(), "password".to_string()]),
            ..QueryInput::all("reviews")
        };
        assert!(matches!(
            build_select(&registry(), &bad_column),
            Err(ValidationError::UnknownColumn { .. })
        ));

        let zero = QueryInput {
            limit: Some(0),
            ..QueryInput::all("reviews")
        };
        assert_eq!(
            build_select(&registry(), &zero).unwrap_err(),
            ValidationError::InvalidLimit
        );
    }

    #[test]
    fn update_orders_set_params_before_where_params() {
        let stmt = build_update(
            &registry(),
            "reviews",
            &[
                Condition::equals("country", "United States"),
                Condition::range("review_rating", 1_i64, 2_i64),
            ],
            &[
                ColumnUpdate::new("reviewer_name", "splanny walters"),
                ColumnUpdate::new("review_date", "2024-02-23"),
            ],
        )
        .unwrap();
        assert_eq!(
            stmt.sql,
            "UPDATE reviews SET reviewer_name = ?, review_date = ? WHERE country = ? AND review_rating BETWEEN ? AND ?"
        );
        assert_eq!(
            stmt.params,
            vec![
                Scalar::from("Splanny Walters"),
                Scalar::Date(NaiveDate::from_ymd_opt(2024, 2, 23).unwrap()),
                Scalar::from("United States"),
                Scalar::Integer(1),
                Scalar::Integer(2),
            ]
        );
    }

    #[test]
    fn update_without_conditions_and_invalid_updates() {
        let stmt = build_update(
            &registry(),
            "reviews",
            &[],
            &[ColumnUpdate::new("review_title", "Updated Title")],
        )
        .unwrap();
        assert_eq!(stmt.sql, "UPDATE reviews SET review_title = ?");

        assert_eq!(
            build_update(&registry(), "reviews", &[], &[]).unwrap_err(),
            ValidationError::EmptyUpdate
        );
        assert!(matches!(
            build_update(&registry(), "reviews", &[], &[ColumnUpdate::new("id", 9_i64)]),
            Err(ValidationError::ReadOnlyColumn { .. })
        ));
    }

    #[test]
    fn derived_assignments_follow_user_updates() {
        let stmt = build_update_with_derived(
            &registry(),
            "reviews",
            &[Condition::equals("id", 1_i64)],
            &[ColumnUpdate::new("country", "United States")],
            &[ColumnUpdate::new("country_code", "USA")],
        )
        .unwrap();
        assert_eq!(
            stmt.sql,
            "UPDATE reviews SET country = ?, country_code = ? WHERE id = ?"
        );
        assert_eq!(
            stmt.params,
            vec![Scalar::from("United States"), Scalar::from("USA"), Scalar::Integer(1)]
        );

        // Derived columns alone do not make an update.
        assert_eq!(
            build_update_with_derived(
                &registry(),
                "reviews",
                &[],
                &[],
                &[ColumnUpdate::new("country_code", "USA")]
            )
            .unwrap_err(),
            ValidationError::EmptyUpdate
        );
    }

    #[test]
    fn builders_are_pure() {
        let conditions = [
            Condition::contains("reviewer_name", "Danny"),
            Condition::equals("country", "United Kingdom"),
        ];
        let updates = [ColumnUpdate::new("review_title", "Updated Title")];
        assert_eq!(
            build_where(&ReviewsModel, &conditions).unwrap(),
            build_where(&ReviewsModel, &conditions).unwrap()
        );
        assert_eq!(
            build_update(&registry(), "reviews", &conditions, &updates).unwrap(),
            build_update(&registry(), "reviews", &conditions, &updates).unwrap()
        );
    }

    #[test]
    fn delete_uses_explicit_tautology_when_unfiltered() {
        assert_eq!(
            build_delete(&registry(), "reviews", &[]).unwrap(),
            Statement::new("DELETE FROM reviews WHERE 1=1", vec![])
        );
        assert_eq!(
            build_delete(
                &registry(),
                "reviews",
                &[Condition::contains("reviewer_name", "Danny")]
            )
            .unwrap(),
            Statement::new(
                "DELETE FROM reviews WHERE reviewer_name LIKE ?",
                vec![Scalar::from("%Danny%")]
            )
        );
    }

    #[test]
    fn insert_lists_allowed_columns() {
        let sql = build_insert(&registry(), "reviews", REVIEW_INSERT_COLUMNS).unwrap();
        assert_eq!(
            sql,
            "INSERT INTO reviews (reviewer_name, review_title, review_rating, review_content, email_address, country, country_code, review_date) VALUES (?, ?, ?, ?, ?, ?, ?, ?)"
        );
        assert!(build_insert(&registry(), "reviews", &["nope"]).is_err());
        assert!(build_insert(&registry(), "reviews", &[]).is_err());
    }
}
