use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Multipart, Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use tracing::info;

use common::types::{ApiResponse, MessageResponse};
use models::collection::{CollectionPatch, CollectionRecord, NewCollection};
use models::company;
use service::bulk_import::BulkImportSummary;
use service::collection::{enum_catalog, CollectionListQuery, EnumCatalog};
use service::company::list_companies;

use crate::errors::JsonApiError;
use crate::state::CollectionState;

pub(crate) fn path_id(path: Result<Path<i32>, PathRejection>) -> Result<i32, JsonApiError> {
    path.map(|Path(id)| id).map_err(|e| JsonApiError::bad_request(e.body_text()))
}

#[utoipa::path(
    get, path = "/api/collection/enums", tag = "collection",
    responses((status = 200, description = "Allowed services, statuses, branches and periods"))
)]
pub async fn enums() -> Json<ApiResponse<EnumCatalog>> {
    Json(ApiResponse::ok(enum_catalog()))
}

#[utoipa::path(
    get, path = "/api/companies", tag = "collection",
    responses(
        (status = 200, description = "Companies ordered by name"),
        (status = 500, description = "Query Failed")
    )
)]
pub async fn companies(State(state): State<CollectionState>) -> Result<Json<ApiResponse<Vec<company::Model>>>, JsonApiError> {
    let list = list_companies(&state.db).await?;
    Ok(Json(ApiResponse::ok(list)))
}

#[utoipa::path(
    get, path = "/api/collection", tag = "collection",
    params(
        ("page" = Option<u64>, Query, description = "1-based page, default 1"),
        ("limit" = Option<u64>, Query, description = "Page size 1..=100, default 20"),
        ("company_id" = Option<i32>, Query, description = "Exact company"),
        ("status" = Option<String>, Query, description = "pending, partially_paid, paid, overdue, cancelled"),
        ("service" = Option<String>, Query, description = "Service line"),
        ("branch" = Option<String>, Query, description = "Q1, Q2 or QT"),
        ("period" = Option<String>, Query, description = "Named period; overrides from_date/to_date"),
        ("from_date" = Option<String>, Query, description = "Inclusive lower invoice_date"),
        ("to_date" = Option<String>, Query, description = "Inclusive upper invoice_date")
    ),
    responses(
        (status = 200, description = "Page of records"),
        (status = 400, description = "Invalid Filter"),
        (status = 500, description = "Query Failed")
    )
)]
pub async fn list(
    State(state): State<CollectionState>,
    query: Result<Query<CollectionListQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<CollectionRecord>>>, JsonApiError> {
    let Query(q) = query.map_err(|e| JsonApiError::bad_request(e.body_text()))?;
    let (filter, pagination) = q.into_parts()?;
    let page = state.collections.list(&filter, pagination).await?;
    Ok(Json(ApiResponse::paged(page.items, page.info)))
}

#[utoipa::path(
    get, path = "/api/collection/{id}", tag = "collection",
    params(("id" = i32, Path, description = "Collection ID")),
    responses(
        (status = 200, description = "OK"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get(
    State(state): State<CollectionState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<ApiResponse<CollectionRecord>>, JsonApiError> {
    let record = state.collections.get(path_id(id)?).await?;
    Ok(Json(ApiResponse::ok(record)))
}

#[utoipa::path(
    post, path = "/api/collection", tag = "collection",
    request_body = crate::openapi::NewCollectionDoc,
    responses(
        (status = 201, description = "Created"),
        (status = 400, description = "Validation Error"),
        (status = 409, description = "Duplicate Invoice")
    )
)]
pub async fn create(
    State(state): State<CollectionState>,
    body: Result<Json<NewCollection>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), JsonApiError> {
    let Json(input) = body.map_err(|e| JsonApiError::bad_request(e.body_text()))?;
    let id = state.collections.create(&input).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::created(format!("Collection created successfully with ID {id}"), id)),
    ))
}

#[utoipa::path(
    put, path = "/api/collection/{id}", tag = "collection",
    params(("id" = i32, Path, description = "Collection ID")),
    request_body = crate::openapi::CollectionPatchDoc,
    responses(
        (status = 200, description = "Updated"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Duplicate Invoice")
    )
)]
pub async fn update(
    State(state): State<CollectionState>,
    id: Result<Path<i32>, PathRejection>,
    body: Result<Json<CollectionPatch>, JsonRejection>,
) -> Result<Json<MessageResponse>, JsonApiError> {
    let id = path_id(id)?;
    let Json(patch) = body.map_err(|e| JsonApiError::bad_request(e.body_text()))?;
    state.collections.update(id, &patch).await?;
    Ok(Json(MessageResponse::new("Collection updated successfully")))
}

#[utoipa::path(
    delete, path = "/api/collection/{id}", tag = "collection",
    params(("id" = i32, Path, description = "Collection ID")),
    responses(
        (status = 200, description = "Soft-deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete(
    State(state): State<CollectionState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<MessageResponse>, JsonApiError> {
    state.collections.delete(path_id(id)?).await?;
    Ok(Json(MessageResponse::new("Collection deleted successfully")))
}

#[utoipa::path(
    post, path = "/api/collection/bulk-upload", tag = "collection",
    request_body(content = String, content_type = "multipart/form-data", description = "Field `file`: .csv, .xlsx or .xls"),
    responses(
        (status = 200, description = "Per-row import summary"),
        (status = 400, description = "Unsupported file or missing columns")
    )
)]
pub async fn bulk_upload(
    State(state): State<CollectionState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<BulkImportSummary>, JsonApiError> {
    let mut multipart = multipart.map_err(|e| JsonApiError::bad_request(e.body_text()))?;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| JsonApiError::new(e.status(), e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let content = field
            .bytes()
            .await
            .map_err(|e| JsonApiError::new(e.status(), e.body_text()))?;
        info!(%filename, bytes = content.len(), "bulk upload received");
        let summary = state.collections.bulk_import(&filename, &content).await?;
        return Ok(Json(summary));
    }
    Err(JsonApiError::bad_request("Missing multipart field 'file'"))
}
