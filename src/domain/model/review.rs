use super::{ColumnDef, ColumnKind, TableModel};
use crate::domain::condition::{ColumnUpdate, Scalar};
use crate::domain::normalize::{collapse_whitespace, is_valid_email, parse_date, title_case};
use crate::error::ValidationError;

pub const REVIEWS_TABLE: &str = "reviews";

/// Columns written by an insert, in bind order. `id` is generated by the store.
pub const REVIEW_INSERT_COLUMNS: &[&str] = &[
    "reviewer_name",
    "review_title",
    "review_rating",
    "review_content",
    "email_address",
    "country",
    "country_code",
    "review_date",
];

const REVIEW_COLUMNS: &[ColumnDef] = &[
    ColumnDef::read_only("id", ColumnKind::Integer),
    ColumnDef::new("reviewer_name", ColumnKind::Text),
    ColumnDef::new("review_title", ColumnKind::Text),
    ColumnDef::new("review_rating", ColumnKind::Integer),
    ColumnDef::new("review_content", ColumnKind::Text),
    ColumnDef::new("email_address", ColumnKind::Text),
    ColumnDef::new("country", ColumnKind::Text),
    // Derived from `country`; rewritten together with it.
    ColumnDef::read_only("country_code", ColumnKind::Text),
    ColumnDef::new("review_date", ColumnKind::Date),
];

/// The `reviews` table.
pub struct ReviewsModel;

impl TableModel for ReviewsModel {
    fn table_name(&self) -> &str {
        REVIEWS_TABLE
    }

    fn primary_key_field(&self) -> &str {
        "id"
    }

    fn get_create_table_sql(&self) -> &str {
        "CREATE TABLE IF NOT EXISTS reviews (
            id INTEGER PRIMARY KEY,
            reviewer_name TEXT,
            review_title TEXT,
            review_rating INTEGER CHECK (review_rating >= 0),
            review_content TEXT,
            email_address TEXT,
            country TEXT,
            country_code TEXT,
            review_date DATE
        )"
    }

    fn columns(&self) -> &[ColumnDef] {
        REVIEW_COLUMNS
    }

    fn validate_update(&self, update: ColumnUpdate) -> Result<ColumnUpdate, ValidationError> {
        let def = self.require_column(&update.column)?;
        if !def.updatable {
            return Err(ValidationError::ReadOnlyColumn {
                table: REVIEWS_TABLE.to_string(),
                column: update.column,
            });
        }

        let ColumnUpdate { column, value } = update;
        let value = match (column.as_str(), value) {
            ("review_rating", Scalar::Integer(r)) if r >= 1 => Scalar::Integer(r),
            ("review_rating", other) => {
                return Err(ValidationError::invalid_value(
                    &column,
                    format!("rating must be an integer >= 1, got {other}"),
                ))
            }
            ("email_address", Scalar::Text(s)) if is_valid_email(s.trim()) => {
                Scalar::Text(s.trim().to_string())
            }
            ("email_address", other) => {
                return Err(ValidationError::invalid_value(
                    &column,
                    format!("not a valid email address: {other}"),
                ))
            }
            ("review_date", Scalar::Date(d)) => Scalar::Date(d),
            ("review_date", Scalar::Text(s)) => match parse_date(&s) {
                Some(d) => Scalar::Date(d),
                None => {
                    return Err(ValidationError::invalid_value(
                        &column,
                        format!("not a calendar date: {s:?}"),
                    ))
                }
            },
            ("reviewer_name", Scalar::Text(s)) => Scalar::Text(title_case(&collapse_whitespace(&s))),
            (_, Scalar::Text(s)) if def.kind == ColumnKind::Text => {
                Scalar::Text(collapse_whitespace(&s))
            }
            (_, other) => {
                return Err(ValidationError::invalid_value(
                    &column,
                    format!("unexpected value {other}"),
                ))
            }
        };

        Ok(ColumnUpdate { column, value })
    }
}
