use axum::{
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;
use service::items::ItemsStore;

use crate::openapi::ApiDoc;

pub mod items;

/// Base route of the items resource.
pub const ITEMS_BASE: &str = "/api/items";

/// State shared by every handler.
#[derive(Clone, Debug, Default)]
pub struct ServerState {
    pub items: ItemsStore,
}

impl ServerState {
    pub fn new(items: ItemsStore) -> Self {
        Self { items }
    }
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse))
)]
pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router: items resource, health and API docs.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let items_routes = Router::new()
        .route("/", get(items::list_items).post(items::add_item))
        .route("/count/:name", get(items::count_items))
        .route(
            "/:index",
            get(items::get_item)
                .put(items::update_item)
                .delete(items::delete_item),
        );

    Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .nest(ITEMS_BASE, items_routes)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 5xx responses
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
