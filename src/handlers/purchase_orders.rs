use axum::{
    extract::{Json, Path, Query, State},
    routing::{delete, get, post, put},
    Router,
};
use uuid::Uuid;

use super::common::{created_response, deleted_response, success_response, Created, Deleted};
use crate::{
    common::StatusFilter,
    entities::purchase_order,
    errors::ServiceError,
    handlers::AppState,
    services::purchase_orders::{CreatePurchaseOrder, UpdatePurchaseOrder},
    ApiResponse, ApiResult,
};

/// List purchase orders
#[utoipa::path(
    get,
    path = "/api/order/list",
    params(StatusFilter),
    responses((status = 200, description = "Purchase orders", body = [purchase_order::Model])),
    tag = "purchase-orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    Query(filter): Query<StatusFilter>,
) -> ApiResult<Vec<purchase_order::Model>> {
    Ok(success_response(state.services.orders.list(filter.status).await?))
}

/// Create a purchase order; the total is computed from quantity and unit price
#[utoipa::path(
    post,
    path = "/api/order/create",
    request_body = CreatePurchaseOrder,
    responses(
        (status = 201, description = "Purchase order created", body = purchase_order::Model),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 409, description = "Order number taken", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<CreatePurchaseOrder>,
) -> Result<Created<purchase_order::Model>, ServiceError> {
    let created = state.services.orders.create(payload).await?;
    Ok(created_response(created, "Purchase order created"))
}

#[utoipa::path(
    put,
    path = "/api/order/update/{id}",
    params(("id" = Uuid, Path, description = "Purchase order ID")),
    request_body = UpdatePurchaseOrder,
    responses(
        (status = 200, description = "Purchase order updated", body = purchase_order::Model),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Order number taken", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePurchaseOrder>,
) -> ApiResult<purchase_order::Model> {
    let updated = state.services.orders.update(id, payload).await?;
    Ok(Json(
        ApiResponse::success(updated).with_message("Purchase order updated"),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/order/delete/{id}",
    params(("id" = Uuid, Path, description = "Purchase order ID")),
    responses(
        (status = 200, description = "Purchase order deleted", body = Deleted),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Deleted> {
    state.services.orders.delete(id).await?;
    Ok(deleted_response(id, "Purchase order deleted"))
}

pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/list", get(list_orders))
        .route("/create", post(create_order))
        .route("/update/:id", put(update_order))
        .route("/delete/:id", delete(delete_order))
}
