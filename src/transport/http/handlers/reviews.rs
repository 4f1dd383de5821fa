use crate::domain::condition::{ColumnUpdate, QueryInput};
use crate::domain::review::ReviewInput;
use crate::storage::gateway::Record;
use crate::transport::http::handlers::common::ApiError;
use crate::transport::http::types::{
    json_422, to_conditions, AppState, ConditionBody, DeletedRows, InsertedIds,
    QueryInputBody, UpdateRequest, UpdatedRows,
};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::info;

/// Rows as a JSON array, or `{}` when nothing matched.
fn rows_response(rows: Vec<Record>) -> Response {
    if rows.is_empty() {
        (StatusCode::OK, Json(serde_json::json!({}))).into_response()
    } else {
        (StatusCode::OK, Json(rows)).into_response()
    }
}

#[utoipa::path(
    get,
    path = "/reviews",
    responses(
        (status = 200, description = "Every review, or {} when the table is empty"),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn list_reviews_handler(State(state): State<AppState>) -> Result<Response, ApiError> {
    let rows = state.service.select_all().await?;
    info!(target: "api", "GET /reviews returned {} rows", rows.len());
    Ok(rows_response(rows))
}

#[utoipa::path(
    post,
    path = "/reviews/select",
    request_body = QueryInputBody,
    responses(
        (status = 200, description = "Matching rows, or {} when nothing matched"),
        (status = 400, description = "Bad request", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn select_reviews_handler(
    State(state): State<AppState>,
    request: Result<Json<QueryInputBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = match request {
        Ok(v) => v,
        Err(e) => {
            return Ok(json_422(e, "{\"table\", \"columns\", \"conditions\", \"limit\"}").into_response())
        }
    };

    let input = QueryInput::try_from(body)?;
    let rows = state.service.select(&input).await?;
    info!(target: "api", "POST /reviews/select returned {} rows", rows.len());
    Ok(rows_response(rows))
}

#[utoipa::path(
    post,
    path = "/reviews/insert",
    request_body = [ReviewInput],
    responses(
        (status = 201, description = "Reviews inserted", body = InsertedIds),
        (status = 400, description = "A review failed validation; nothing was inserted", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn insert_reviews_handler(
    State(state): State<AppState>,
    request: Result<Json<Vec<ReviewInput>>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(reviews) = match request {
        Ok(v) => v,
        Err(e) => return Ok(json_422(e, "[{review}, ...]").into_response()),
    };

    let inserted_ids = state.service.insert_reviews(reviews).await?;
    info!(target: "api", "POST /reviews/insert inserted {} reviews", inserted_ids.len());
    Ok((StatusCode::CREATED, Json(InsertedIds { inserted_ids })).into_response())
}

#[utoipa::path(
    delete,
    path = "/reviews/delete",
    request_body = [ConditionBody],
    responses(
        (status = 201, description = "Matching reviews deleted", body = DeletedRows),
        (status = 400, description = "Bad request", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn delete_reviews_handler(
    State(state): State<AppState>,
    request: Result<Json<Vec<ConditionBody>>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(conditions) = match request {
        Ok(v) => v,
        Err(e) => return Ok(json_422(e, "[{condition}, ...]").into_response()),
    };

    let conditions = to_conditions(conditions)?;
    let num_deleted_rows = state.service.delete(&conditions).await?;
    info!(target: "api", "DELETE /reviews/delete removed {} rows", num_deleted_rows);
    Ok((StatusCode::CREATED, Json(DeletedRows { num_deleted_rows })).into_response())
}

#[utoipa::path(
    delete,
    path = "/reviews/truncate",
    responses(
        (status = 201, description = "Every review deleted", body = DeletedRows),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn truncate_reviews_handler(State(state): State<AppState>) -> Result<Response, ApiError> {
    let num_deleted_rows = state.service.truncate().await?;
    info!(target: "api", "DELETE /reviews/truncate removed {} rows", num_deleted_rows);
    Ok((StatusCode::CREATED, Json(DeletedRows { num_deleted_rows })).into_response())
}

#[utoipa::path(
    patch,
    path = "/reviews/update",
    request_body = UpdateRequest,
    responses(
        (status = 201, description = "Matching reviews updated", body = UpdatedRows),
        (status = 400, description = "Bad request", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn update_reviews_handler(
    State(state): State<AppState>,
    request: Result<Json<UpdateRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => {
            return Ok(json_422(e, "{\"conditions\": [...], \"columns_to_update\": [...]}")
                .into_response())
        }
    };

    let conditions = to_conditions(request.conditions)?;
    let updates = request
        .columns_to_update
        .into_iter()
        .map(ColumnUpdate::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    let num_updated_rows = state.service.update(&conditions, updates).await?;
    info!(target: "api", "PATCH /reviews/update changed {} rows", num_updated_rows);
    Ok((StatusCode::CREATED, Json(UpdatedRows { num_updated_rows })).into_response())
}
