use axum::{
    extract::{Json, Path, Query, State},
    routing::{delete, get, post, put},
    Router,
};
use uuid::Uuid;

use crate::{
    common::StatusFilter,
    entities::extruder,
    errors::ServiceError,
    handlers::{
        common::{created_response, deleted_response, success_response, Created, Deleted},
        AppState,
    },
    services::assets::extruders::{CreateExtruder, UpdateExtruder},
    ApiResponse, ApiResult,
};

/// List extruders
#[utoipa::path(
    get,
    path = "/api/extruder/list",
    params(StatusFilter),
    responses((status = 200, description = "Extruders", body = [extruder::Model])),
    tag = "extruders"
)]
pub async fn list_extruders(
    State(state): State<AppState>,
    Query(filter): Query<StatusFilter>,
) -> ApiResult<Vec<extruder::Model>> {
    Ok(success_response(
        state.services.extruders.list(filter.status).await?,
    ))
}

/// Create an extruder
#[utoipa::path(
    post,
    path = "/api/extruder/create",
    request_body = CreateExtruder,
    responses(
        (status = 201, description = "Extruder created", body = extruder::Model),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 409, description = "Code already in use", body = crate::errors::ErrorResponse)
    ),
    tag = "extruders"
)]
pub async fn create_extruder(
    State(state): State<AppState>,
    Json(payload): Json<CreateExtruder>,
) -> Result<Created<extruder::Model>, ServiceError> {
    let created = state.services.extruders.create(payload).await?;
    Ok(created_response(created, "Extruder created"))
}

/// Update an extruder
#[utoipa::path(
    put,
    path = "/api/extruder/update/{id}",
    params(("id" = Uuid, Path, description = "Extruder ID")),
    request_body = UpdateExtruder,
    responses(
        (status = 200, description = "Extruder updated", body = extruder::Model),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Code already in use", body = crate::errors::ErrorResponse)
    ),
    tag = "extruders"
)]
pub async fn update_extruder(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateExtruder>,
) -> ApiResult<extruder::Model> {
    let updated = state.services.extruders.update(id, payload).await?;
    Ok(Json(
        ApiResponse::success(updated).with_message("Extruder updated"),
    ))
}

/// Delete an extruder
///
/// Deleting an extruder also removes the transactions issued to it.
#[utoipa::path(
    delete,
    path = "/api/extruder/delete/{id}",
    params(("id" = Uuid, Path, description = "Extruder ID")),
    responses(
        (status = 200, description = "Extruder deleted", body = Deleted),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "extruders"
)]
pub async fn delete_extruder(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Deleted> {
    state.services.extruders.delete(id).await?;
    Ok(deleted_response(id, "Extruder deleted"))
}

pub fn extruder_routes() -> Router<AppState> {
    Router::new()
        .route("/list", get(list_extruders))
        .route("/create", post(create_extruder))
        .route("/update/:id", put(update_extruder))
        .route("/delete/:id", delete(delete_extruder))
}
