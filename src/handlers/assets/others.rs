use axum::{
    extract::{Json, Path, Query, State},
    routing::{delete, get, post, put},
    Router,
};
use uuid::Uuid;

use crate::{
    common::StatusFilter,
    entities::other_asset,
    errors::ServiceError,
    handlers::{
        common::{created_response, deleted_response, success_response, Created, Deleted},
        AppState,
    },
    services::assets::others::{CreateOtherAsset, UpdateOtherAsset},
    ApiResponse, ApiResult,
};

/// List other assets
#[utoipa::path(
    get,
    path = "/api/other/list",
    params(StatusFilter),
    responses((status = 200, description = "Other assets", body = [other_asset::Model])),
    tag = "other-assets"
)]
pub async fn list_other_assets(
    State(state): State<AppState>,
    Query(filter): Query<StatusFilter>,
) -> ApiResult<Vec<other_asset::Model>> {
    Ok(success_response(
        state.services.others.list(filter.status).await?,
    ))
}

/// Other assets at or below their minimum stock
#[utoipa::path(
    get,
    path = "/api/other/low-stock",
    responses((status = 200, description = "Low stock other assets", body = [other_asset::Model])),
    tag = "other-assets"
)]
pub async fn low_stock_other_assets(
    State(state): State<AppState>,
) -> ApiResult<Vec<other_asset::Model>> {
    Ok(success_response(state.services.others.low_stock().await?))
}

/// Create an other asset
#[utoipa::path(
    post,
    path = "/api/other/create",
    request_body = CreateOtherAsset,
    responses(
        (status = 201, description = "Other asset created", body = other_asset::Model),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 409, description = "Code already in use", body = crate::errors::ErrorResponse)
    ),
    tag = "other-assets"
)]
pub async fn create_other_asset(
    State(state): State<AppState>,
    Json(payload): Json<CreateOtherAsset>,
) -> Result<Created<other_asset::Model>, ServiceError> {
    let created = state.services.others.create(payload).await?;
    Ok(created_response(created, "Other asset created"))
}

/// Update an other asset
#[utoipa::path(
    put,
    path = "/api/other/update/{id}",
    params(("id" = Uuid, Path, description = "Other asset ID")),
    request_body = UpdateOtherAsset,
    responses(
        (status = 200, description = "Other asset updated", body = other_asset::Model),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Code already in use", body = crate::errors::ErrorResponse)
    ),
    tag = "other-assets"
)]
pub async fn update_other_asset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOtherAsset>,
) -> ApiResult<other_asset::Model> {
    let updated = state.services.others.update(id, payload).await?;
    Ok(Json(
        ApiResponse::success(updated).with_message("Other asset updated"),
    ))
}

/// Delete an other asset
///
/// Deleting an asset also removes its transactions.
#[utoipa::path(
    delete,
    path = "/api/other/delete/{id}",
    params(("id" = Uuid, Path, description = "Other asset ID")),
    responses(
        (status = 200, description = "Other asset deleted", body = Deleted),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "other-assets"
)]
pub async fn delete_other_asset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Deleted> {
    state.services.others.delete(id).await?;
    Ok(deleted_response(id, "Other asset deleted"))
}

pub fn other_routes() -> Router<AppState> {
    Router::new()
        .route("/list", get(list_other_assets))
        .route("/low-stock", get(low_stock_other_assets))
        .route("/create", post(create_other_asset))
        .route("/update/:id", put(update_other_asset))
        .route("/delete/:id", delete(delete_other_asset))
}
