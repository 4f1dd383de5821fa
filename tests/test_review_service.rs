//! Review service against an in-memory SQLite store.

use chrono::NaiveDate;
use review_store::{
    ColumnUpdate, Condition, QueryInput, ReviewInput, ReviewService, ServiceError, ValidationError,
};
use serde_json::Value as JsonValue;

fn review(name: &str, rating: i64, country: &str, date: (i32, u32, u32)) -> ReviewInput {
    ReviewInput {
        reviewer_name: name.to_string(),
        review_title: format!("Review by {name}"),
        review_rating: rating,
        review_content: "Good food".to_string(),
        email_address: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        country: country.to_string(),
        review_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
    }
}

fn sample() -> Vec<ReviewInput> {
    vec![
        review("Danny Walters", 5, "United Kingdom", (2024, 3, 3)),
        review("Jeff Bezos", 5, "United States", (2024, 3, 3)),
        review("Alexa Johnson", 4, "Canada", (2024, 4, 15)),
        review("Samuel Lee", 4, "UK", (2024, 5, 21)),
        review("Maria Garcia", 5, "Australia", (2024, 6, 10)),
    ]
}

async fn service() -> ReviewService {
    ReviewService::connect("sqlite::memory:", 1)
        .await
        .expect("in-memory store")
}

#[tokio::test]
async fn test_insert_then_select_by_identifying_fields() -> Result<(), Box<dyn std::error::Error>> {
    let service = service().await;
    let ids = service.insert_reviews(sample()).await?;
    assert_eq!(ids.len(), 5);

    let input = QueryInput {
        table: "reviews".to_string(),
        columns: Some(vec![
            "review_title".to_string(),
            "review_rating".to_string(),
            "country".to_string(),
            "country_code".to_string(),
            "review_date".to_string(),
        ]),
        conditions: vec![Condition::equals("reviewer_name", "Alexa Johnson")],
        limit: None,
    };
    let rows = service.select(&input).await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(
        JsonValue::Object(rows[0].clone()),
        serde_json::json!({
            "review_title": "Review by Alexa Johnson",
            "review_rating": 4,
            "country": "Canada",
            "country_code": "CAN",
            "review_date": "2024-04-15"
        })
    );

    let uk = service
        .select(&QueryInput {
            conditions: vec![Condition::equals("country_code", "GBR")],
            ..QueryInput::all("reviews")
        })
        .await?;
    assert_eq!(uk.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_select_with_range_contains_and_limit() -> Result<(), Box<dyn std::error::Error>> {
    let service = service().await;
    service.insert_reviews(sample()).await?;

    let march = service
        .select(&QueryInput {
            conditions: vec![Condition::range("review_date", "2024-03-01", "2024-03-31")],
            ..QueryInput::all("reviews")
        })
        .await?;
    assert_eq!(march.len(), 2);

    let limited = service
        .select(&QueryInput {
            conditions: vec![Condition::range("review_rating", 4_i64, 5_i64)],
            limit: Some(3),
            ..QueryInput::all("reviews")
        })
        .await?;
    assert_eq!(limited.len(), 3);

    let contains = service
        .select(&QueryInput {
            conditions: vec![Condition::contains("reviewer_name", "a")],
            ..QueryInput::all("reviews")
        })
        .await?;
    assert_eq!(contains.len(), 4);
    Ok(())
}

#[tokio::test]
async fn test_batch_with_one_invalid_review_persists_nothing() {
    let service = service().await;
    let mut batch = sample();
    batch[3].email_address = "bad".to_string();

    let err = service.insert_reviews(batch).await.unwrap_err();
    match err {
        ServiceError::Validation(ValidationError::InBatch { index, .. }) => assert_eq!(index, 3),
        other => panic!("unexpected error: {other}"),
    }
    assert!(service.select_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_rewrites_country_code_with_country() -> Result<(), Box<dyn std::error::Error>> {
    let service = service().await;
    service.insert_reviews(sample()).await?;

    let updated = service
        .update(
            &[Condition::contains("reviewer_name", "Danny")],
            vec![
                ColumnUpdate::new("review_title", "Updated Title"),
                ColumnUpdate::new("country", "usa"),
            ],
        )
        .await?;
    assert_eq!(updated, 1);

    let rows = service
        .select(&QueryInput {
            conditions: vec![Condition::equals("review_title", "Updated Title")],
            ..QueryInput::all("reviews")
        })
        .await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["reviewer_name"], "Danny Walters");
    assert_eq!(rows[0]["country"], "United States");
    assert_eq!(rows[0]["country_code"], "USA");

    let err = service
        .update(&[], vec![ColumnUpdate::new("country", "Atlantis")])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::UnknownCountry(_))
    ));

    let err = service
        .update(&[], vec![ColumnUpdate::new("country_code", "FRA")])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::ReadOnlyColumn { .. })
    ));
    Ok(())
}

#[tokio::test]
async fn test_delete_and_truncate() -> Result<(), Box<dyn std::error::Error>> {
    let service = service().await;
    service.insert_reviews(sample()).await?;

    let deleted = service
        .delete(&[Condition::equals("country", "United Kingdom")])
        .await?;
    assert_eq!(deleted, 2);
    assert_eq!(service.select_all().await?.len(), 3);

    let truncated = service.truncate().await?;
    assert_eq!(truncated, 3);
    assert!(service.select_all().await?.is_empty());
    assert_eq!(service.truncate().await?, 0);
    Ok(())
}

#[tokio::test]
async fn test_rejects_identifiers_outside_the_allow_list() {
    let service = service().await;
    let err = service
        .select(&QueryInput::all("sqlite_master"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::UnknownTable(_))
    ));

    let err = service
        .delete(&[Condition::equals("reviewer_name = '' OR 1", "x")])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::UnknownColumn { .. })
    ));
}
