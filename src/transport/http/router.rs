use crate::domain::review::ReviewInput;
use crate::transport::http::handlers::{health, reviews};
use crate::transport::http::types::{
    ApiResponse, AppState, ColumnUpdateBody, ConditionBody, DeletedRows, InsertedIds,
    QueryInputBody, UpdateRequest, UpdatedRows,
};
use axum::routing::{delete, get, patch, post};
use axum::Router;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        reviews::list_reviews_handler,
        reviews::select_reviews_handler,
        reviews::insert_reviews_handler,
        reviews::delete_reviews_handler,
        reviews::truncate_reviews_handler,
        reviews::update_reviews_handler
    ),
    components(schemas(
        ApiResponse,
        ReviewInput,
        ConditionBody,
        ColumnUpdateBody,
        QueryInputBody,
        UpdateRequest,
        InsertedIds,
        DeletedRows,
        UpdatedRows
    ))
)]
pub struct ApiDoc;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route("/reviews", get(reviews::list_reviews_handler))
        .route("/reviews/select", post(reviews::select_reviews_handler))
        .route("/reviews/insert", post(reviews::insert_reviews_handler))
        .route("/reviews/delete", delete(reviews::delete_reviews_handler))
        .route("/reviews/truncate", delete(reviews::truncate_reviews_handler))
        .route("/reviews/update", patch(reviews::update_reviews_handler))
        .with_state(app_state)
}
