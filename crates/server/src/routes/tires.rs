use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};

use common::types::{ApiResponse, MessageResponse};
use models::tire::{self, TireInput};
use service::tire::{TireFilterOptions, TireListQuery};

use super::collection::path_id;
use crate::errors::JsonApiError;
use crate::state::TiresState;

#[utoipa::path(
    get, path = "/api/tires", tag = "tires",
    params(
        ("page" = Option<u64>, Query, description = "1-based page, default 1"),
        ("limit" = Option<u64>, Query, description = "Page size 1..=100, default 20"),
        ("search" = Option<String>, Query, description = "Substring of brand, model or size"),
        ("brand" = Option<String>, Query, description = "Exact brand"),
        ("model" = Option<String>, Query, description = "Exact model"),
        ("size" = Option<String>, Query, description = "Exact size"),
        ("position" = Option<String>, Query, description = "Exact position")
    ),
    responses(
        (status = 200, description = "Page of tires"),
        (status = 400, description = "Invalid Pagination"),
        (status = 500, description = "Query Failed")
    )
)]
pub async fn list(
    State(state): State<TiresState>,
    query: Result<Query<TireListQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<tire::Model>>>, JsonApiError> {
    let Query(q) = query.map_err(|e| JsonApiError::bad_request(e.body_text()))?;
    let (filter, pagination) = q.into_parts()?;
    let page = state.tires.list(&filter, pagination).await?;
    Ok(Json(ApiResponse::paged(page.items, page.info)))
}

#[utoipa::path(
    get, path = "/api/tires/{id}", tag = "tires",
    params(("id" = i32, Path, description = "Tire ID")),
    responses(
        (status = 200, description = "OK"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get(
    State(state): State<TiresState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<ApiResponse<tire::Model>>, JsonApiError> {
    let t = state.tires.get(path_id(id)?).await?;
    Ok(Json(ApiResponse::ok(t)))
}

#[utoipa::path(
    post, path = "/api/tires", tag = "tires",
    request_body = crate::openapi::TireInputDoc,
    responses(
        (status = 201, description = "Created"),
        (status = 400, description = "Validation Error"),
        (status = 409, description = "Duplicate Tire")
    )
)]
pub async fn create(
    State(state): State<TiresState>,
    body: Result<Json<TireInput>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), JsonApiError> {
    let Json(input) = body.map_err(|e| JsonApiError::bad_request(e.body_text()))?;
    let id = state.tires.create(&input).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::created(format!("Tire created successfully with ID {id}"), id)),
    ))
}

#[utoipa::path(
    put, path = "/api/tires/{id}", tag = "tires",
    params(("id" = i32, Path, description = "Tire ID")),
    request_body = crate::openapi::TireInputDoc,
    responses(
        (status = 200, description = "Replaced"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Duplicate Tire")
    )
)]
pub async fn update(
    State(state): State<TiresState>,
    id: Result<Path<i32>, PathRejection>,
    body: Result<Json<TireInput>, JsonRejection>,
) -> Result<Json<MessageResponse>, JsonApiError> {
    let id = path_id(id)?;
    let Json(input) = body.map_err(|e| JsonApiError::bad_request(e.body_text()))?;
    state.tires.update(id, &input).await?;
    Ok(Json(MessageResponse::new("Tire updated successfully")))
}

#[utoipa::path(
    delete, path = "/api/tires/{id}", tag = "tires",
    params(("id" = i32, Path, description = "Tire ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete(
    State(state): State<TiresState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<MessageResponse>, JsonApiError> {
    state.tires.delete(path_id(id)?).await?;
    Ok(Json(MessageResponse::new("Tire deleted successfully")))
}

#[utoipa::path(
    get, path = "/api/filters", tag = "tires",
    responses(
        (status = 200, description = "Distinct brands, models, sizes and positions"),
        (status = 500, description = "Query Failed")
    )
)]
pub async fn filters(State(state): State<TiresState>) -> Result<Json<ApiResponse<TireFilterOptions>>, JsonApiError> {
    let options = state.tires.filter_options().await?;
    Ok(Json(ApiResponse::ok(options)))
}
