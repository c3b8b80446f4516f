use axum::{
    extract::{Json, Path, Query, State},
    routing::{delete, get, post, put},
    Router,
};
use uuid::Uuid;

use crate::{
    common::StatusFilter,
    entities::sparepart,
    errors::ServiceError,
    handlers::{
        common::{created_response, deleted_response, success_response, Created, Deleted},
        AppState,
    },
    services::assets::spareparts::{CreateSparepart, UpdateSparepart},
    ApiResponse, ApiResult,
};

/// List spareparts
#[utoipa::path(
    get,
    path = "/api/sparepart/list",
    params(StatusFilter),
    responses((status = 200, description = "Spareparts", body = [sparepart::Model])),
    tag = "spareparts"
)]
pub async fn list_spareparts(
    State(state): State<AppState>,
    Query(filter): Query<StatusFilter>,
) -> ApiResult<Vec<sparepart::Model>> {
    Ok(success_response(
        state.services.spareparts.list(filter.status).await?,
    ))
}

/// Spareparts at or below their minimum stock
#[utoipa::path(
    get,
    path = "/api/sparepart/low-stock",
    responses((status = 200, description = "Low stock spareparts", body = [sparepart::Model])),
    tag = "spareparts"
)]
pub async fn low_stock_spareparts(
    State(state): State<AppState>,
) -> ApiResult<Vec<sparepart::Model>> {
    Ok(success_response(state.services.spareparts.low_stock().await?))
}

/// Create a sparepart
#[utoipa::path(
    post,
    path = "/api/sparepart/create",
    request_body = CreateSparepart,
    responses(
        (status = 201, description = "Sparepart created", body = sparepart::Model),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 409, description = "Code already in use", body = crate::errors::ErrorResponse)
    ),
    tag = "spareparts"
)]
pub async fn create_sparepart(
    State(state): State<AppState>,
    Json(payload): Json<CreateSparepart>,
) -> Result<Created<sparepart::Model>, ServiceError> {
    let created = state.services.spareparts.create(payload).await?;
    Ok(created_response(created, "Sparepart created"))
}

/// Update a sparepart
#[utoipa::path(
    put,
    path = "/api/sparepart/update/{id}",
    params(("id" = Uuid, Path, description = "Sparepart ID")),
    request_body = UpdateSparepart,
    responses(
        (status = 200, description = "Sparepart updated", body = sparepart::Model),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Code already in use", body = crate::errors::ErrorResponse)
    ),
    tag = "spareparts"
)]
pub async fn update_sparepart(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSparepart>,
) -> ApiResult<sparepart::Model> {
    let updated = state.services.spareparts.update(id, payload).await?;
    Ok(Json(
        ApiResponse::success(updated).with_message("Sparepart updated"),
    ))
}

/// Delete a sparepart
///
/// Deleting a sparepart also removes its transactions.
#[utoipa::path(
    delete,
    path = "/api/sparepart/delete/{id}",
    params(("id" = Uuid, Path, description = "Sparepart ID")),
    responses(
        (status = 200, description = "Sparepart deleted", body = Deleted),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "spareparts"
)]
pub async fn delete_sparepart(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Deleted> {
    state.services.spareparts.delete(id).await?;
    Ok(deleted_response(id, "Sparepart deleted"))
}

pub fn sparepart_routes() -> Router<AppState> {
    Router::new()
        .route("/list", get(list_spareparts))
        .route("/low-stock", get(low_stock_spareparts))
        .route("/create", post(create_sparepart))
        .route("/update/:id", put(update_sparepart))
        .route("/delete/:id", delete(delete_sparepart))
}
