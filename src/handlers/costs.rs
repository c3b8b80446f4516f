use axum::{
    extract::{Json, Path, Query, State},
    routing::{delete, get, post, put},
    Router,
};
use uuid::Uuid;

use super::common::{created_response, deleted_response, success_response, Created, Deleted};
use crate::{
    entities::cost,
    errors::ServiceError,
    handlers::AppState,
    services::costs::{CostFilter, CreateCost, UpdateCost},
    ApiResponse, ApiResult,
};

/// List costs, optionally by category and date range
#[utoipa::path(
    get,
    path = "/api/cost/list",
    params(CostFilter),
    responses(
        (status = 200, description = "Costs", body = [cost::Model]),
        (status = 400, description = "Invalid date range", body = crate::errors::ErrorResponse)
    ),
    tag = "costs"
)]
pub async fn list_costs(
    State(state): State<AppState>,
    Query(filter): Query<CostFilter>,
) -> ApiResult<Vec<cost::Model>> {
    Ok(success_response(state.services.costs.list(filter).await?))
}

#[utoipa::path(
    post,
    path = "/api/cost/create",
    request_body = CreateCost,
    responses(
        (status = 201, description = "Cost recorded", body = cost::Model),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "costs"
)]
pub async fn create_cost(
    State(state): State<AppState>,
    Json(payload): Json<CreateCost>,
) -> Result<Created<cost::Model>, ServiceError> {
    let created = state.services.costs.create(payload).await?;
    Ok(created_response(created, "Cost recorded"))
}

#[utoipa::path(
    put,
    path = "/api/cost/update/{id}",
    params(("id" = Uuid, Path, description = "Cost ID")),
    request_body = UpdateCost,
    responses(
        (status = 200, description = "Cost updated", body = cost::Model),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "costs"
)]
pub async fn update_cost(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCost>,
) -> ApiResult<cost::Model> {
    let updated = state.services.costs.update(id, payload).await?;
    Ok(Json(ApiResponse::success(updated).with_message("Cost updated")))
}

#[utoipa::path(
    delete,
    path = "/api/cost/delete/{id}",
    params(("id" = Uuid, Path, description = "Cost ID")),
    responses(
        (status = 200, description = "Cost deleted", body = Deleted),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "costs"
)]
pub async fn delete_cost(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Deleted> {
    state.services.costs.delete(id).await?;
    Ok(deleted_response(id, "Cost deleted"))
}

pub fn cost_routes() -> Router<AppState> {
    Router::new()
        .route("/list", get(list_costs))
        .route("/create", post(create_cost))
        .route("/update/:id", put(update_cost))
        .route("/delete/:id", delete(delete_cost))
}
