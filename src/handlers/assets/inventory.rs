use axum::{
    extract::{Json, Path, Query, State},
    routing::{delete, get, post, put},
    Router,
};
use uuid::Uuid;

use crate::{
    common::StatusFilter,
    entities::inventory_item,
    errors::ServiceError,
    handlers::{
        common::{created_response, deleted_response, success_response, Created, Deleted},
        AppState,
    },
    services::assets::inventory::{CreateInventoryItem, UpdateInventoryItem},
    ApiResponse, ApiResult,
};

/// List inventory items
#[utoipa::path(
    get,
    path = "/api/inventory/list",
    params(StatusFilter),
    responses((status = 200, description = "Inventory items", body = [inventory_item::Model])),
    tag = "inventory"
)]
pub async fn list_inventory_items(
    State(state): State<AppState>,
    Query(filter): Query<StatusFilter>,
) -> ApiResult<Vec<inventory_item::Model>> {
    Ok(success_response(
        state.services.inventory.list(filter.status).await?,
    ))
}

/// Inventory items at or below their minimum stock
#[utoipa::path(
    get,
    path = "/api/inventory/low-stock",
    responses((status = 200, description = "Low stock inventory items", body = [inventory_item::Model])),
    tag = "inventory"
)]
pub async fn low_stock_inventory_items(
    State(state): State<AppState>,
) -> ApiResult<Vec<inventory_item::Model>> {
    Ok(success_response(state.services.inventory.low_stock().await?))
}

/// Create an inventory item
#[utoipa::path(
    post,
    path = "/api/inventory/create",
    request_body = CreateInventoryItem,
    responses(
        (status = 201, description = "Inventory item created", body = inventory_item::Model),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 409, description = "Code already in use", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn create_inventory_item(
    State(state): State<AppState>,
    Json(payload): Json<CreateInventoryItem>,
) -> Result<Created<inventory_item::Model>, ServiceError> {
    let created = state.services.inventory.create(payload).await?;
    Ok(created_response(created, "Inventory item created"))
}

/// Update an inventory item
#[utoipa::path(
    put,
    path = "/api/inventory/update/{id}",
    params(("id" = Uuid, Path, description = "Inventory item ID")),
    request_body = UpdateInventoryItem,
    responses(
        (status = 200, description = "Inventory item updated", body = inventory_item::Model),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Code already in use", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn update_inventory_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateInventoryItem>,
) -> ApiResult<inventory_item::Model> {
    let updated = state.services.inventory.update(id, payload).await?;
    Ok(Json(
        ApiResponse::success(updated).with_message("Inventory item updated"),
    ))
}

/// Delete an inventory item
#[utoipa::path(
    delete,
    path = "/api/inventory/delete/{id}",
    params(("id" = Uuid, Path, description = "Inventory item ID")),
    responses(
        (status = 200, description = "Inventory item deleted", body = Deleted),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn delete_inventory_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Deleted> {
    state.services.inventory.delete(id).await?;
    Ok(deleted_response(id, "Inventory item deleted"))
}

pub fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route("/list", get(list_inventory_items))
        .route("/low-stock", get(low_stock_inventory_items))
        .route("/create", post(create_inventory_item))
        .route("/update/:id", put(update_inventory_item))
        .route("/delete/:id", delete(delete_inventory_item))
}
