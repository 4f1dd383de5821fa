//! Request-scoped value objects: scalars, filter conditions, column updates and select input.

use crate::error::ValidationError;
use chrono::NaiveDate;
use serde_json::Value as JsonValue;
use std::fmt;

/// A single value bound to a `?` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scalar {
    Null,
    Text(String),
    Integer(i64),
    Date(NaiveDate),
}

impl Scalar {
    /// Converts a JSON value into a scalar. `column` is only used for the error message.
    ///
    /// Strings become `Text` and integers become `Integer`; everything else is rejected.
    pub fn from_json(column: &str, value: &JsonValue) -> Result<Self, ValidationError> {
        match value {
            JsonValue::String(s) => Ok(Scalar::Text(s.clone())),
            JsonValue::Number(n) => n.as_i64().map(Scalar::Integer).ok_or_else(|| {
                ValidationError::invalid_value(column, format!("expected an integer, got {n}"))
            }),
            JsonValue::Null => Err(ValidationError::invalid_value(column, "null is not allowed")),
            JsonValue::Bool(_) => Err(ValidationError::invalid_value(
                column,
                "expected a string or integer, got a boolean",
            )),
            JsonValue::Array(_) | JsonValue::Object(_) => Err(ValidationError::invalid_value(
                column,
                "expected a string or integer",
            )),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => f.write_str("NULL"),
            Scalar::Text(s) => write!(f, "{s:?}"),
            Scalar::Integer(i) => write!(f, "{i}"),
            Scalar::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Scalar::Integer(i)
    }
}

impl From<NaiveDate> for Scalar {
    fn from(d: NaiveDate) -> Self {
        Scalar::Date(d)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Scalar::Null)
    }
}

/// The comparison applied by a [`Condition`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `column = ?`
    Equals(Scalar),
    /// `column LIKE ?` with the value wrapped in `%`. `%` and `_` inside the value are not escaped.
    Contains(String),
    /// `column BETWEEN ? AND ?`
    Range(Scalar, Scalar),
}

impl Predicate {
    /// Number of placeholders this predicate emits.
    pub fn param_count(&self) -> usize {
        match self {
            Predicate::Range(..) => 2,
            Predicate::Contains(_) | Predicate::Equals(_) => 1,
        }
    }
}

/// A filter on one column. The column is checked against the table allow-list by the builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub column: String,
    pub predicate: Predicate,
}

impl Condition {
    pub fn equals(column: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self {
            column: column.into(),
            predicate: Predicate::Equals(value.into()),
        }
    }

    pub fn contains(column: impl Into<String>, needle: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            predicate: Predicate::Contains(needle.into()),
        }
    }

    pub fn range(column: impl Into<String>, low: impl Into<Scalar>, high: impl Into<Scalar>) -> Self {
        Self {
            column: column.into(),
            predicate: Predicate::Range(low.into(), high.into()),
        }
    }

    /// Builds a condition from the loose wire shape `{column, equals?, contains?, range?}`.
    ///
    /// Exactly one of the three must be present.
    pub fn from_parts(
        column: String,
        equals: Option<Scalar>,
        contains: Option<String>,
        range: Option<Vec<Scalar>>,
    ) -> Result<Self, ValidationError> {
        let predicate = match (equals, contains, range) {
            (Some(value), None, None) => Predicate::Equals(value),
            (None, Some(needle), None) => Predicate::Contains(needle),
            (None, None, Some(bounds)) => {
                let got = bounds.len();
                let mut bounds = bounds.into_iter();
                match (bounds.next(), bounds.next(), bounds.next()) {
                    (Some(low), Some(high), None) => Predicate::Range(low, high),
                    _ => return Err(ValidationError::RangeArity { column, got }),
                }
            }
            (None, None, None) => return Err(ValidationError::MissingPredicate(column)),
            _ => return Err(ValidationError::AmbiguousPredicate(column)),
        };

        Ok(Self { column, predicate })
    }
}

/// New value for one column in an UPDATE.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnUpdate {
    pub column: String,
    pub value: Scalar,
}

impl ColumnUpdate {
    pub fn new(column: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }
}

/// Input for a SELECT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryInput {
    pub table: String,
    /// `None` or empty selects all columns.
    pub columns: Option<Vec<String>>,
    pub conditions: Vec<Condition>,
    pub limit: Option<u32>,
}

impl QueryInput {
    pub fn all(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: None,
            conditions: Vec::new(),
            limit: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_parts_requires_exactly_one_predicate() {
        let none = Condition::from_parts("country".into(), None, None, None);
        assert_eq!(none, Err(ValidationError::MissingPredicate("country".into())));

        let both = Condition::from_parts(
            "country".into(),
            Some(Scalar::from("Canada")),
            Some("Can".into()),
            None,
        );
        assert_eq!(both, Err(ValidationError::AmbiguousPredicate("country".into())));
    }

    #[test]
    fn from_parts_checks_range_arity() {
        let err = Condition::from_parts(
            "review_date".into(),
            None,
            None,
            Some(vec![Scalar::from("2024-01-01")]),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ValidationError::RangeArity {
                column: "review_date".into(),
                got: 1
            }
        );

        let ok = Condition::from_parts(
            "review_date".into(),
            None,
            None,
            Some(vec![Scalar::from("2024-01-01"), Scalar::from("2024-01-31")]),
        )
        .unwrap();
        assert_eq!(ok, Condition::range("review_date", "2024-01-01", "2024-01-31"));
    }

    #[test]
    fn scalar_from_json() {
        assert_eq!(Scalar::from_json("c", &json!("x")).unwrap(), Scalar::from("x"));
        assert_eq!(Scalar::from_json("c", &json!(5)).unwrap(), Scalar::Integer(5));
        assert!(Scalar::from_json("c", &json!(1.5)).is_err());
        assert!(Scalar::from_json("c", &json!(true)).is_err());
        assert!(Scalar::from_json("c", &json!(null)).is_err());
        assert!(Scalar::from_json("c", &json!({"a": 1})).is_err());
    }
}
