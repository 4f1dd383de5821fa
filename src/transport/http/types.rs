use crate::app::review_service::ReviewService;
use crate::domain::condition::{ColumnUpdate, Condition, QueryInput, Scalar};
use crate::domain::model::REVIEWS_TABLE;
use crate::error::ValidationError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ReviewService>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    pub fn ok(data: JsonValue) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// A filter as sent by clients. Exactly one of `equals`, `contains`, `range` must be set.
#[derive(Deserialize, Serialize, Debug, Clone, ToSchema)]
pub struct ConditionBody {
    pub column: String,
    /// String or integer.
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "United Kingdom")]
    pub equals: Option<JsonValue>,
    /// Substring match. `%` and `_` are passed through as wildcards.
    #[serde(default)]
    pub contains: Option<String>,
    /// Inclusive `[low, high]`; strings or integers.
    #[serde(default)]
    #[schema(value_type = Option<Vec<String>>, example = json!(["2024-01-01", "2024-01-31"]))]
    pub range: Option<Vec<JsonValue>>,
}

impl TryFrom<ConditionBody> for Condition {
    type Error = ValidationError;

    fn try_from(body: ConditionBody) -> Result<Self, Self::Error> {
        let equals = body
            .equals
            .as_ref()
            .map(|v| Scalar::from_json(&body.column, v))
            .transpose()?;
        let range = body
            .range
            .as_ref()
            .map(|bounds| {
                bounds
                    .iter()
                    .map(|v| Scalar::from_json(&body.column, v))
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;
        Condition::from_parts(body.column, equals, body.contains, range)
    }
}

pub fn to_conditions(bodies: Vec<ConditionBody>) -> Result<Vec<Condition>, ValidationError> {
    bodies.into_iter().map(Condition::try_from).collect()
}

#[derive(Deserialize, Serialize, Debug, Clone, ToSchema)]
pub struct ColumnUpdateBody {
    #[serde(rename = "column_name", alias = "column")]
    pub column: String,
    #[serde(rename = "column_value", alias = "value")]
    #[schema(value_type = String, example = "Updated Title")]
    pub value: JsonValue,
}

impl TryFrom<ColumnUpdateBody> for ColumnUpdate {
    type Error = ValidationError;

    fn try_from(body: ColumnUpdateBody) -> Result<Self, Self::Error> {
        let value = Scalar::from_json(&body.column, &body.value)?;
        Ok(ColumnUpdate::new(body.column, value))
    }
}

fn default_table() -> String {
    REVIEWS_TABLE.to_string()
}

#[derive(Deserialize, Serialize, Debug, Clone, ToSchema)]
pub struct QueryInputBody {
    /// Defaults to `reviews`.
    #[serde(default = "default_table")]
    pub table: String,
    /// Omitted or empty selects every column.
    #[serde(default)]
    pub columns: Option<Vec<String>>,
    #[serde(default)]
    pub conditions: Vec<ConditionBody>,
    /// Must be positive when set.
    #[serde(default)]
    pub limit: Option<u32>,
}

impl TryFrom<QueryInputBody> for QueryInput {
    type Error = ValidationError;

    fn try_from(body: QueryInputBody) -> Result<Self, Self::Error> {
        Ok(QueryInput {
            table: body.table,
            columns: body.columns,
            conditions: to_conditions(body.conditions)?,
            limit: body.limit,
        })
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, ToSchema)]
pub struct UpdateRequest {
    #[serde(default)]
    pub conditions: Vec<ConditionBody>,
    pub columns_to_update: Vec<ColumnUpdateBody>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct InsertedIds {
    pub inserted_ids: Vec<i64>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct DeletedRows {
    pub num_deleted_rows: u64,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct UpdatedRows {
    pub num_updated_rows: u64,
}

pub fn json_422(err: JsonRejection, expected: &str) -> (StatusCode, Json<ApiResponse>) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ApiResponse::err(format!(
            "Invalid JSON body: {} (expected: {})",
            err, expected
        ))),
    )
}
