//! Cleaning stages for raw review exports.
//!
//! Stages run in order: header normalization, schema and type checks, country
//! normalization, reviewer name normalization, then row-level filtering. Only the first two
//! can fail the whole job; bad rows are dropped and reported.

use super::frame::RawTable;
use crate::domain::condition::Scalar;
use crate::domain::country::{CountryLookup, CountryMatch};
use crate::domain::model::ColumnKind;
use crate::domain::normalize::{
    collapse_whitespace, is_valid_email, is_valid_rating, parse_date, title_case,
};
use crate::error::PipelineError;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

/// Columns the input must carry, with the type each is coerced to.
pub const EXPECTED_COLUMNS: &[(&str, ColumnKind)] = &[
    ("reviewer_name", ColumnKind::Text),
    ("review_title", ColumnKind::Text),
    ("review_rating", ColumnKind::Integer),
    ("review_content", ColumnKind::Text),
    ("email_address", ColumnKind::Text),
    ("country", ColumnKind::Text),
    ("review_date", ColumnKind::Date),
];

/// A typed review row. `country_code` is empty until countries are normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanRow {
    pub reviewer_name: String,
    pub review_title: String,
    pub review_rating: i64,
    pub review_content: String,
    pub email_address: String,
    pub country: String,
    pub country_code: String,
    /// `None` when the input could not be parsed as a date.
    pub review_date: Option<NaiveDate>,
}

impl CleanRow {
    /// Bind values in [`crate::domain::model::REVIEW_INSERT_COLUMNS`] order.
    pub fn insert_params(&self) -> Vec<Scalar> {
        vec![
            Scalar::from(self.reviewer_name.as_str()),
            Scalar::from(self.review_title.as_str()),
            Scalar::Integer(self.review_rating),
            Scalar::from(self.review_content.as_str()),
            Scalar::from(self.email_address.as_str()),
            Scalar::from(self.country.as_str()),
            Scalar::from(self.country_code.as_str()),
            Scalar::from(self.review_date),
        ]
    }
}

/// A row excluded by the row-level checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowRejection {
    /// 1-based data row number (the header is not counted).
    pub row: usize,
    pub reviewer_name: String,
    pub email_address: String,
    pub review_rating: i64,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleaningReport {
    pub rows: Vec<CleanRow>,
    pub rejected: Vec<RowRejection>,
}

impl CleaningReport {
    /// Number of input rows that reached row-level validation.
    pub fn total(&self) -> usize {
        self.rows.len() + self.rejected.len()
    }
}

/// Trims, lower-cases and replaces spaces with underscores in every header.
pub fn normalize_column_names(table: &mut RawTable) {
    for header in &mut table.headers {
        *header = header.trim().to_lowercase().replace(' ', "_");
    }
}

/// Checks that every expected column is present and coerces each row to its typed form.
///
/// All missing columns are reported together. An integer cell that does not parse fails
/// the job; an unparseable date becomes `None`. Columns outside the mapping are ignored.
pub fn validate_and_convert_types(table: &RawTable) -> Result<Vec<CleanRow>, PipelineError> {
    let missing: Vec<String> = EXPECTED_COLUMNS
        .iter()
        .filter(|(name, _)| table.column_index(name).is_none())
        .map(|(name, _)| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(PipelineError::MissingColumns(missing));
    }

    (0..table.len())
        .map(|row| -> Result<CleanRow, PipelineError> {
            let text = |column: &str| collapse_whitespace(table.cell(row, column));
            Ok(CleanRow {
                reviewer_name: text("reviewer_name"),
                review_title: text("review_title"),
                review_rating: integer_cell(table, row, "review_rating")?,
                review_content: text("review_content"),
                email_address: text("email_address"),
                country: text("country"),
                country_code: String::new(),
                review_date: parse_date(table.cell(row, "review_date")),
            })
        })
        .collect()
}

/// Parses an integer cell. Integral floats such as `5.0` are accepted.
fn integer_cell(table: &RawTable, row: usize, column: &str) -> Result<i64, PipelineError> {
    let raw = table.cell(row, column);
    let trimmed = raw.trim();
    trimmed.parse::<i64>().or_else(|source| {
        trimmed
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64)
            .map(|f| f as i64)
            .ok_or_else(|| PipelineError::InvalidColumnDtype {
                column: column.to_string(),
                row: row + 1,
                value: raw.to_string(),
                source,
            })
    })
}

/// Replaces each country with its canonical name and fills in the ISO3 code.
///
/// Unresolved countries are kept with the "Not Found" sentinel in both fields.
pub fn normalize_countries(rows: &mut [CleanRow], countries: &dyn CountryLookup) {
    for row in rows {
        let resolved = countries.resolve(&row.country).unwrap_or_else(|| {
            warn!(target: "data_loader", country = %row.country, "country not found");
            CountryMatch::not_found()
        });
        row.country = resolved.name;
        row.country_code = resolved.iso3;
    }
}

pub fn normalize_reviewer_names(rows: &mut [CleanRow]) {
    for row in rows {
        row.reviewer_name = title_case(row.reviewer_name.trim());
    }
}

/// Drops rows with a malformed email address or a negative rating.
pub fn filter_valid_rows(rows: Vec<CleanRow>) -> CleaningReport {
    let mut report = CleaningReport::default();

    for (index, row) in rows.into_iter().enumerate() {
        let mut reasons = Vec::new();
        if !is_valid_email(&row.email_address) {
            reasons.push(format!("invalid email address {:?}", row.email_address));
        }
        if !is_valid_rating(row.review_rating) {
            reasons.push(format!("invalid review rating {}", row.review_rating));
        }

        if reasons.is_empty() {
            report.rows.push(row);
        } else {
            warn!(
                target: "data_loader",
                row = index + 1,
                reviewer_name = %row.reviewer_name,
                email_address = %row.email_address,
                review_rating = row.review_rating,
                "dropping row: {}",
                reasons.join("; ")
            );
            report.rejected.push(RowRejection {
                row: index + 1,
                reviewer_name: row.reviewer_name,
                email_address: row.email_address,
                review_rating: row.review_rating,
                reasons,
            });
        }
    }

    if !report.rejected.is_empty() {
        warn!(
            target: "data_loader",
            "{} of {} rows failed validation",
            report.rejected.len(),
            report.total()
        );
    }
    report
}

/// Runs every cleaning stage over `table`.
pub fn prepare_data_for_loading(
    mut table: RawTable,
    countries: &dyn CountryLookup,
) -> Result<CleaningReport, PipelineError> {
    normalize_column_names(&mut table);
    let mut rows = validate_and_convert_types(&table)?;
    normalize_countries(&mut rows, countries);
    normalize_reviewer_names(&mut rows);
    let report = filter_valid_rows(rows);
    info!(
        target: "data_loader",
        "prepared {} rows ({} rejected)",
        report.rows.len(),
        report.rejected.len()
    );
    Ok(report)
}
