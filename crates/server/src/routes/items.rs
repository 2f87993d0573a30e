//! Handlers for `/api/items`.
//!
//! Items are addressed by position. An index is only meaningful until the next
//! add or delete; clients should re-list before reusing one.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use service::items::SortStrategy;
use tracing::debug;

use crate::errors::ApiError;
use crate::observability;
use crate::routes::ServerState;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(rename = "sortStrategy", alias = "sortstrategy")]
    pub sort_strategy: Option<i64>,
}

/// Get the item at `index`
#[utoipa::path(
    get,
    path = "/api/items/{index}",
    tag = "items",
    params(("index" = i64, Path, description = "Zero-based position")),
    responses(
        (status = 200, description = "Item at the position", body = String, content_type = "text/plain"),
        (status = 400, description = "Negative index", body = String),
        (status = 404, description = "No item at the position", body = String)
    )
)]
pub async fn get_item(
    State(state): State<ServerState>,
    Path(index): Path<i64>,
) -> Result<String, ApiError> {
    let res = state.items.get(index).await.map_err(ApiError::from);
    observability::record("get", &res);
    res
}

/// Count items whose name matches `name`, ignoring case
#[utoipa::path(
    get,
    path = "/api/items/count/{name}",
    tag = "items",
    params(("name" = String, Path, description = "Name to match, case-insensitive")),
    responses(
        (status = 200, description = "Number of matching items", body = usize),
        (status = 400, description = "Blank name", body = String)
    )
)]
pub async fn count_items(
    State(state): State<ServerState>,
    Path(name): Path<String>,
) -> Result<Json<usize>, ApiError> {
    let res = state.items.count_by_name(&name).await.map_err(ApiError::from);
    observability::record("count", &res);
    res.map(Json)
}

/// List all items, optionally sorted
#[utoipa::path(
    get,
    path = "/api/items",
    tag = "items",
    params(("sortStrategy" = Option<i64>, Query, description = "0 or absent: stored order, 1: ascending, -1: descending")),
    responses(
        (status = 200, description = "Items in the requested order", body = [String]),
        (status = 400, description = "Unknown sortStrategy", body = String)
    )
)]
pub async fn list_items(
    State(state): State<ServerState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<String>>, ApiError> {
    let res = match SortStrategy::from_param(q.sort_strategy) {
        Ok(strategy) => {
            debug!(?strategy, "listing items");
            Ok(state.items.list(strategy).await)
        }
        Err(e) => Err(ApiError::from(e)),
    };
    observability::record("list", &res);
    res.map(Json)
}

/// Append an item
#[utoipa::path(
    post,
    path = "/api/items",
    tag = "items",
    request_body(content = String, description = "Item as a JSON string", content_type = "application/json"),
    responses(
        (status = 200, description = "Item appended"),
        (status = 400, description = "Blank item", body = String)
    )
)]
pub async fn add_item(
    State(state): State<ServerState>,
    body: Result<Json<Option<String>>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let res = match item_from_body(body) {
        Ok(item) => state.items.add(item).await.map_err(ApiError::from),
        Err(e) => Err(e),
    };
    finish_mutation("add", res)
}

/// Replace the item at `index`
#[utoipa::path(
    put,
    path = "/api/items/{index}",
    tag = "items",
    params(("index" = i64, Path, description = "Zero-based position")),
    request_body(content = String, description = "New item as a JSON string", content_type = "application/json"),
    responses(
        (status = 200, description = "Item replaced"),
        (status = 400, description = "Negative index or blank item", body = String),
        (status = 404, description = "No item at the position", body = String)
    )
)]
pub async fn update_item(
    State(state): State<ServerState>,
    Path(index): Path<i64>,
    body: Result<Json<Option<String>>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let res = match item_from_body(body) {
        Ok(new_item) => state.items.update(index, new_item).await.map_err(ApiError::from),
        // index errors take precedence over a malformed body
        Err(e) => match state.items.get(index).await {
            Ok(_) => Err(e),
            Err(index_err) => Err(ApiError::from(index_err)),
        },
    };
    finish_mutation("update", res)
}

/// Remove the item at `index`; later items move up by one
#[utoipa::path(
    delete,
    path = "/api/items/{index}",
    tag = "items",
    params(("index" = i64, Path, description = "Zero-based position")),
    responses(
        (status = 200, description = "Item removed"),
        (status = 400, description = "Negative index", body = String),
        (status = 404, description = "No item at the position", body = String)
    )
)]
pub async fn delete_item(
    State(state): State<ServerState>,
    Path(index): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let res = state.items.delete(index).await.map_err(ApiError::from);
    finish_mutation("delete", res)
}

/// JSON string body; `null` reads as an empty item, anything else is a 400.
fn item_from_body(body: Result<Json<Option<String>>, JsonRejection>) -> Result<String, ApiError> {
    match body {
        Ok(Json(item)) => Ok(item.unwrap_or_default()),
        Err(rejection) => Err(ApiError::BadRequest(rejection.body_text())),
    }
}

fn finish_mutation(operation: &str, res: Result<usize, ApiError>) -> Result<StatusCode, ApiError> {
    observability::record(operation, &res);
    let len = res?;
    observability::set_item_count(len);
    Ok(StatusCode::OK)
}
