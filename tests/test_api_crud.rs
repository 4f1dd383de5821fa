//! End-to-end HTTP tests: the router is served in-process on an ephemeral port and driven
//! with reqwest.

use reqwest::StatusCode;
use review_store::{transport, ReviewService};
use serde_json::{json, Value as JsonValue};
use std::sync::Arc;

async fn spawn_server() -> Result<String, Box<dyn std::error::Error>> {
    let service = ReviewService::connect("sqlite::memory:", 1).await?;
    let app_state = transport::http::AppState {
        service: Arc::new(service),
    };
    let router = transport::http::create_router(app_state);

    // Bind to an ephemeral port to avoid conflicts if an API server is already running.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    Ok(format!("http://127.0.0.1:{}", port))
}

fn sample_reviews() -> JsonValue {
    json!([
        {
            "reviewer_name": "Danny Walters",
            "review_title": "Excellent Meal",
            "review_rating": 5,
            "review_content": "Good food",
            "email_address": "dwdanielwalters@gmail.com",
            "country": "United Kingdom",
            "review_date": "2024-03-03"
        },
        {
            "reviewer_name": "Jeff Bezos",
            "review_title": "Terrible company",
            "review_rating": 5,
            "review_content": "takes too long to order products",
            "email_address": "jeffbezos@amazon.com",
            "country": "United States",
            "review_date": "2024-03-03"
        },
        {
            "reviewer_name": "Alexa Johnson",
            "review_title": "Great Service",
            "review_rating": 4,
            "review_content": "The service was quick and friendly.",
            "email_address": "alexa.johnson@example.com",
            "country": "Canada",
            "review_date": "2024-04-15"
        },
        {
            "reviewer_name": "Samuel Lee",
            "review_title": "Lovely Ambiance",
            "review_rating": 4,
            "review_content": "Loved the atmosphere and decor at the restaurant.",
            "email_address": "samlee_2024@example.com",
            "country": "United Kingdom",
            "review_date": "2024-05-21"
        },
        {
            "reviewer_name": "Maria Garcia",
            "review_title": "Best Coffee in Town",
            "review_rating": 5,
            "review_content": "The coffee and pastries are absolutely delightful!",
            "email_address": "mgarcia@example.net",
            "country": "Australia",
            "review_date": "2024-06-10"
        }
    ])
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_select_on_empty_table_returns_empty_object() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = spawn_server().await?;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/reviews/select", base_url))
        .json(&json!({ "table": "reviews" }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.json::<JsonValue>().await?, json!({}));

    let resp = client.get(format!("{}/reviews", base_url)).send().await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.json::<JsonValue>().await?, json!({}));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_insert_then_select() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = spawn_server().await?;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/reviews/insert", base_url))
        .json(&sample_reviews())
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = resp.json::<JsonValue>().await?;
    assert_eq!(body["inserted_ids"].as_array().map(Vec::len), Some(5));

    let resp = client
        .post(format!("{}/reviews/select", base_url))
        .json(&json!({
            "table": "reviews",
            "columns": ["review_title", "review_rating", "review_content", "email_address", "country", "review_date"],
            "conditions": [{ "column": "reviewer_name", "equals": "Alexa Johnson" }]
        }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let rows = resp.json::<JsonValue>().await?;
    assert_eq!(
        rows[0],
        json!({
            "review_title": "Great Service",
            "review_rating": 4,
            "review_content": "The service was quick and friendly.",
            "email_address": "alexa.johnson@example.com",
            "country": "Canada",
            "review_date": "2024-04-15"
        })
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_invalid_review_rejects_whole_batch() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = spawn_server().await?;
    let client = reqwest::Client::new();

    let mut reviews = sample_reviews();
    reviews[2]["review_rating"] = json!(0);
    let resp = client
        .post(format!("{}/reviews/insert", base_url))
        .json(&reviews)
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = resp.json::<JsonValue>().await?;
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].as_str().unwrap_or_default().contains("review #2"));

    let resp = client.get(format!("{}/reviews", base_url)).send().await?;
    assert_eq!(resp.json::<JsonValue>().await?, json!({}));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_update_specific_reviews() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = spawn_server().await?;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/reviews/insert", base_url))
        .json(&json!([sample_reviews()[0].clone()]))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = client
        .patch(format!("{}/reviews/update", base_url))
        .json(&json!({
            "conditions": [{ "column": "reviewer_name", "contains": "Danny" }],
            "columns_to_update": [{ "column_name": "review_title", "column_value": "Updated Title" }]
        }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(resp.json::<JsonValue>().await?, json!({ "num_updated_rows": 1 }));

    let resp = client
        .post(format!("{}/reviews/select", base_url))
        .json(&json!({
            "conditions": [{ "column": "reviewer_name", "contains": "Danny" }]
        }))
        .send()
        .await?;
    let rows = resp.json::<JsonValue>().await?;
    assert_eq!(rows[0]["review_title"], json!("Updated Title"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_delete_and_truncate() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = spawn_server().await?;
    let client = reqwest::Client::new();

    client
        .post(format!("{}/reviews/insert", base_url))
        .json(&sample_reviews())
        .send()
        .await?;

    let resp = client
        .delete(format!("{}/reviews/delete", base_url))
        .json(&json!([{ "column": "reviewer_name", "contains": "Danny" }]))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(resp.json::<JsonValue>().await?, json!({ "num_deleted_rows": 1 }));

    let resp = client
        .delete(format!("{}/reviews/truncate", base_url))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(resp.json::<JsonValue>().await?, json!({ "num_deleted_rows": 4 }));

    let resp = client
        .post(format!("{}/reviews/select", base_url))
        .json(&json!({ "table": "reviews" }))
        .send()
        .await?;
    assert_eq!(resp.json::<JsonValue>().await?, json!({}));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_error_statuses() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = spawn_server().await?;
    let client = reqwest::Client::new();

    // Unknown column: allow-list violation.
    let resp = client
        .post(format!("{}/reviews/select", base_url))
        .json(&json!({
            "conditions": [{ "column": "reviewer_name; DROP TABLE reviews", "equals": "x" }]
        }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Two predicates on one condition.
    let resp = client
        .post(format!("{}/reviews/select", base_url))
        .json(&json!({
            "conditions": [{ "column": "country", "equals": "Canada", "contains": "Can" }]
        }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // limit = 0
    let resp = client
        .post(format!("{}/reviews/select", base_url))
        .json(&json!({ "limit": 0 }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Empty update list.
    let resp = client
        .patch(format!("{}/reviews/update", base_url))
        .json(&json!({ "conditions": [], "columns_to_update": [] }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Malformed body.
    let resp = client
        .post(format!("{}/reviews/insert", base_url))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Wrong field type.
    let resp = client
        .post(format!("{}/reviews/insert", base_url))
        .json(&json!([{ "reviewer_name": "A" }]))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_health() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = spawn_server().await?;
    let resp = reqwest::get(format!("{}/health", base_url)).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.json::<JsonValue>().await?;
    assert_eq!(body["data"]["status"], json!("ok"));
    Ok(())
}
