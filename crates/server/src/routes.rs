pub mod collection;
pub mod tires;

use axum::{extract::DefaultBodyLimit, routing::get, Json, Router};
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;

use crate::openapi::{CollectionApiDoc, TiresApiDoc};
use crate::state::{CollectionState, TiresState};

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn collection_openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(CollectionApiDoc::openapi())
}

async fn tires_openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(TiresApiDoc::openapi())
}

fn trace_layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
        .on_failure(DefaultOnFailure::new().level(Level::ERROR))
}

/// Router of the collection service.
pub fn build_collection_router(state: CollectionState, cors: CorsLayer, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(collection_openapi))
        .route("/api/collection/enums", get(collection::enums))
        .route("/api/companies", get(collection::companies))
        .route("/api/collection", get(collection::list).post(collection::create))
        .route("/api/collection/bulk-upload", axum::routing::post(collection::bulk_upload))
        .route(
            "/api/collection/:id",
            get(collection::get).put(collection::update).delete(collection::delete),
        )
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(cors)
        .layer(trace_layer())
}

/// Router of the tires catalog service.
pub fn build_tires_router(state: TiresState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(tires_openapi))
        .route("/api/tires", get(tires::list).post(tires::create))
        .route("/api/tires/:id", get(tires::get).put(tires::update).delete(tires::delete))
        .route("/api/filters", get(tires::filters))
        .with_state(state)
        .layer(cors)
        .layer(trace_layer())
}
