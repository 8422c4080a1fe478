use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct NewCollectionDoc {
    pub invoice_number: String,
    pub company_id: i32,
    pub customer_name: String,
    pub user_id: i32,
    /// app, sensors, field_service, installations, spare_parts, general_service, tires, hardware, training
    pub service: String,
    /// YYYY-MM-DD
    pub invoice_date: String,
    pub due_date: String,
    pub amount: f64,
    pub amount_paid: Option<f64>,
    /// Defaults to `pending`.
    pub status: Option<String>,
    pub last_partial_payment_date: Option<String>,
    /// Q1, Q2 or QT
    pub branch: String,
}

#[derive(ToSchema)]
pub struct CollectionPatchDoc {
    pub invoice_number: Option<String>,
    pub company_id: Option<i32>,
    pub customer_name: Option<String>,
    pub user_id: Option<i32>,
    pub service: Option<String>,
    pub invoice_date: Option<String>,
    pub due_date: Option<String>,
    pub amount: Option<f64>,
    pub amount_paid: Option<f64>,
    pub status: Option<String>,
    pub last_partial_payment_date: Option<String>,
    pub branch: Option<String>,
}

#[derive(ToSchema)]
pub struct TireInputDoc {
    pub brand: String,
    pub model: String,
    pub size: String,
    pub layer_index: Option<String>,
    pub layers: Option<i32>,
    pub max_pressure: Option<i32>,
    pub min_pressure: Option<i32>,
    pub max_depth: Option<i32>,
    pub min_depth: Option<i32>,
    pub wear_type: Option<String>,
    pub profitability: Option<i32>,
    pub performance: Option<i32>,
    pub temperature: Option<String>,
    pub speed: Option<String>,
    pub speed_number: Option<i32>,
    pub braking: Option<String>,
    pub load_type: Option<String>,
    pub load: Option<i32>,
    pub road_type: Option<String>,
    pub terrain_type: Option<String>,
    pub position: Option<String>,
}

#[derive(ToSchema)]
pub struct ErrorBodyDoc { pub success: bool, pub error: String, pub detail: String }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::collection::enums,
        crate::routes::collection::companies,
        crate::routes::collection::list,
        crate::routes::collection::get,
        crate::routes::collection::create,
        crate::routes::collection::update,
        crate::routes::collection::delete,
        crate::routes::collection::bulk_upload,
    ),
    components(schemas(HealthResponse, NewCollectionDoc, CollectionPatchDoc, ErrorBodyDoc)),
    tags((name = "health"), (name = "collection"))
)]
pub struct CollectionApiDoc;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::tires::list,
        crate::routes::tires::get,
        crate::routes::tires::create,
        crate::routes::tires::update,
        crate::routes::tires::delete,
        crate::routes::tires::filters,
    ),
    components(schemas(HealthResponse, TireInputDoc, ErrorBodyDoc)),
    tags((name = "health"), (name = "tires"))
)]
pub struct TiresApiDoc;
