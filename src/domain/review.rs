//! Review records accepted through the API.

use crate::domain::condition::Scalar;
use crate::domain::country::CountryLookup;
use crate::domain::normalize::{collapse_whitespace, is_valid_email, title_case};
use crate::error::ValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Raw review body as posted by clients. Nothing here has been validated yet.
#[derive(Deserialize, Serialize, Debug, Clone, ToSchema)]
pub struct ReviewInput {
    pub reviewer_name: String,
    pub review_title: String,
    pub review_rating: i64,
    pub review_content: String,
    pub email_address: String,
    pub country: String,
    /// Calendar date, `YYYY-MM-DD`.
    #[schema(value_type = String, format = Date, example = "2024-03-03")]
    pub review_date: NaiveDate,
}

/// A validated, normalized review ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Review {
    reviewer_name: String,
    review_title: String,
    review_rating: i64,
    review_content: String,
    email_address: String,
    country: String,
    country_code: String,
    review_date: NaiveDate,
}

impl Review {
    /// Validates and normalizes `input`.
    ///
    /// Fails on a rating below 1, a malformed email address or a country the lookup cannot
    /// resolve. Text fields have their whitespace collapsed and the reviewer name is
    /// title-cased.
    pub fn new(input: ReviewInput, countries: &dyn CountryLookup) -> Result<Self, ValidationError> {
        if input.review_rating < 1 {
            return Err(ValidationError::invalid_field(
                "review_rating",
                format!("must be >= 1, got {}", input.review_rating),
            ));
        }

        let email_address = input.email_address.trim().to_string();
        if !is_valid_email(&email_address) {
            return Err(ValidationError::invalid_field(
                "email_address",
                format!("{email_address:?} is not a valid email address"),
            ));
        }

        let country = countries
            .resolve(&input.country)
            .ok_or_else(|| ValidationError::UnknownCountry(input.country.clone()))?;

        let reviewer_name = title_case(&collapse_whitespace(&input.reviewer_name));
        if reviewer_name.is_empty() {
            return Err(ValidationError::invalid_field(
                "reviewer_name",
                "must not be empty",
            ));
        }

        Ok(Self {
            reviewer_name,
            review_title: collapse_whitespace(&input.review_title),
            review_rating: input.review_rating,
            review_content: collapse_whitespace(&input.review_content),
            email_address,
            country: country.name,
            country_code: country.iso3,
            review_date: input.review_date,
        })
    }

    pub fn reviewer_name(&self) -> &str {
        &self.reviewer_name
    }

    pub fn review_rating(&self) -> i64 {
        self.review_rating
    }

    pub fn email_address(&self) -> &str {
        &self.email_address
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    pub fn review_date(&self) -> NaiveDate {
        self.review_date
    }

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
            Scalar::Date(self.review_date),
        ]
    }
}
