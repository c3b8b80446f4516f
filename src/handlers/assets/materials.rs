use axum::{
    extract::{Json, Path, Query, State},
    routing::{delete, get, post, put},
    Router,
};
use uuid::Uuid;

use crate::{
    common::StatusFilter,
    entities::material,
    errors::ServiceError,
    handlers::{
        common::{created_response, deleted_response, success_response, Created, Deleted},
        AppState,
    },
    services::assets::materials::{CreateMaterial, UpdateMaterial},
    ApiResponse, ApiResult,
};

/// List materials
#[utoipa::path(
    get,
    path = "/api/material/list",
    params(StatusFilter),
    responses((status = 200, description = "Materials", body = [material::Model])),
    tag = "materials"
)]
pub async fn list_materials(
    State(state): State<AppState>,
    Query(filter): Query<StatusFilter>,
) -> ApiResult<Vec<material::Model>> {
    Ok(success_response(
        state.services.materials.list(filter.status).await?,
    ))
}

/// Materials at or below their minimum stock
#[utoipa::path(
    get,
    path = "/api/material/low-stock",
    responses((status = 200, description = "Low stock materials", body = [material::Model])),
    tag = "materials"
)]
pub async fn low_stock_materials(
    State(state): State<AppState>,
) -> ApiResult<Vec<material::Model>> {
    Ok(success_response(state.services.materials.low_stock().await?))
}

/// Create a material
#[utoipa::path(
    post,
    path = "/api/material/create",
    request_body = CreateMaterial,
    responses(
        (status = 201, description = "Material created", body = material::Model),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 409, description = "Code already in use", body = crate::errors::ErrorResponse)
    ),
    tag = "materials"
)]
pub async fn create_material(
    State(state): State<AppState>,
    Json(payload): Json<CreateMaterial>,
) -> Result<Created<material::Model>, ServiceError> {
    let created = state.services.materials.create(payload).await?;
    Ok(created_response(created, "Material created"))
}

/// Update a material
#[utoipa::path(
    put,
    path = "/api/material/update/{id}",
    params(("id" = Uuid, Path, description = "Material ID")),
    request_body = UpdateMaterial,
    responses(
        (status = 200, description = "Material updated", body = material::Model),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Code already in use", body = crate::errors::ErrorResponse)
    ),
    tag = "materials"
)]
pub async fn update_material(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMaterial>,
) -> ApiResult<material::Model> {
    let updated = state.services.materials.update(id, payload).await?;
    Ok(Json(
        ApiResponse::success(updated).with_message("Material updated"),
    ))
}

/// Delete a material
#[utoipa::path(
    delete,
    path = "/api/material/delete/{id}",
    params(("id" = Uuid, Path, description = "Material ID")),
    responses(
        (status = 200, description = "Material deleted", body = Deleted),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "materials"
)]
pub async fn delete_material(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Deleted> {
    state.services.materials.delete(id).await?;
    Ok(deleted_response(id, "Material deleted"))
}

pub fn material_routes() -> Router<AppState> {
    Router::new()
        .route("/list", get(list_materials))
        .route("/low-stock", get(low_stock_materials))
        .route("/create", post(create_material))
        .route("/update/:id", put(update_material))
        .route("/delete/:id", delete(delete_material))
}
