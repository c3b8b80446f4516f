use axum::{
    extract::{Json, Path, Query, State},
    routing::{delete, get, post, put},
    Router,
};
use uuid::Uuid;

use super::common::{created_response, deleted_response, success_response, Created, Deleted};
use crate::{
    entities::maintenance_record,
    errors::ServiceError,
    handlers::AppState,
    services::maintenance::{CreateMaintenance, MaintenanceFilter, UpdateMaintenance},
    ApiResponse, ApiResult,
};

/// List maintenance records, optionally for one extruder
#[utoipa::path(
    get,
    path = "/api/maintenance/list",
    params(MaintenanceFilter),
    responses((status = 200, description = "Maintenance records", body = [maintenance_record::Model])),
    tag = "maintenance"
)]
pub async fn list_maintenance(
    State(state): State<AppState>,
    Query(filter): Query<MaintenanceFilter>,
) -> ApiResult<Vec<maintenance_record::Model>> {
    Ok(success_response(
        state.services.maintenance.list(filter).await?,
    ))
}

/// Record maintenance on an existing extruder
#[utoipa::path(
    post,
    path = "/api/maintenance/create",
    request_body = CreateMaintenance,
    responses(
        (status = 201, description = "Maintenance recorded", body = maintenance_record::Model),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Extruder not found", body = crate::errors::ErrorResponse)
    ),
    tag = "maintenance"
)]
pub async fn create_maintenance(
    State(state): State<AppState>,
    Json(payload): Json<CreateMaintenance>,
) -> Result<Created<maintenance_record::Model>, ServiceError> {
    let created = state.services.maintenance.create(payload).await?;
    Ok(created_response(created, "Maintenance recorded"))
}

#[utoipa::path(
    put,
    path = "/api/maintenance/update/{id}",
    params(("id" = Uuid, Path, description = "Maintenance record ID")),
    request_body = UpdateMaintenance,
    responses(
        (status = 200, description = "Maintenance updated", body = maintenance_record::Model),
        (status = 404, description = "Record or extruder not found", body = crate::errors::ErrorResponse)
    ),
    tag = "maintenance"
)]
pub async fn update_maintenance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMaintenance>,
) -> ApiResult<maintenance_record::Model> {
    let updated = state.services.maintenance.update(id, payload).await?;
    Ok(Json(
        ApiResponse::success(updated).with_message("Maintenance updated"),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/maintenance/delete/{id}",
    params(("id" = Uuid, Path, description = "Maintenance record ID")),
    responses(
        (status = 200, description = "Maintenance deleted", body = Deleted),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "maintenance"
)]
pub async fn delete_maintenance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Deleted> {
    state.services.maintenance.delete(id).await?;
    Ok(deleted_response(id, "Maintenance deleted"))
}

pub fn maintenance_routes() -> Router<AppState> {
    Router::new()
        .route("/list", get(list_maintenance))
        .route("/create", post(create_maintenance))
        .route("/update/:id", put(update_maintenance))
        .route("/delete/:id", delete(delete_maintenance))
}
