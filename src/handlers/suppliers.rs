use axum::{
    extract::{Json, Path, Query, State},
    routing::{delete, get, post, put},
    Router,
};
use uuid::Uuid;

use super::common::{created_response, deleted_response, success_response, Created, Deleted};
use crate::{
    common::StatusFilter,
    entities::supplier,
    errors::ServiceError,
    handlers::AppState,
    services::suppliers::{CreateSupplier, UpdateSupplier},
    ApiResponse, ApiResult,
};

/// List suppliers
#[utoipa::path(
    get,
    path = "/api/supplier/list",
    params(StatusFilter),
    responses((status = 200, description = "Suppliers", body = [supplier::Model])),
    tag = "suppliers"
)]
pub async fn list_suppliers(
    State(state): State<AppState>,
    Query(filter): Query<StatusFilter>,
) -> ApiResult<Vec<supplier::Model>> {
    Ok(success_response(
        state.services.suppliers.list(filter.status).await?,
    ))
}

/// Create a supplier
#[utoipa::path(
    post,
    path = "/api/supplier/create",
    request_body = CreateSupplier,
    responses(
        (status = 201, description = "Supplier created", body = supplier::Model),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 409, description = "Supplier name taken", body = crate::errors::ErrorResponse)
    ),
    tag = "suppliers"
)]
pub async fn create_supplier(
    State(state): State<AppState>,
    Json(payload): Json<CreateSupplier>,
) -> Result<Created<supplier::Model>, ServiceError> {
    let created = state.services.suppliers.create(payload).await?;
    Ok(created_response(created, "Supplier created"))
}

/// Update a supplier
#[utoipa::path(
    put,
    path = "/api/supplier/update/{id}",
    params(("id" = Uuid, Path, description = "Supplier ID")),
    request_body = UpdateSupplier,
    responses(
        (status = 200, description = "Supplier updated", body = supplier::Model),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Supplier name taken", body = crate::errors::ErrorResponse)
    ),
    tag = "suppliers"
)]
pub async fn update_supplier(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSupplier>,
) -> ApiResult<supplier::Model> {
    let updated = state.services.suppliers.update(id, payload).await?;
    Ok(Json(
        ApiResponse::success(updated).with_message("Supplier updated"),
    ))
}

/// Delete a supplier
#[utoipa::path(
    delete,
    path = "/api/supplier/delete/{id}",
    params(("id" = Uuid, Path, description = "Supplier ID")),
    responses(
        (status = 200, description = "Supplier deleted", body = Deleted),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "suppliers"
)]
pub async fn delete_supplier(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Deleted> {
    state.services.suppliers.delete(id).await?;
    Ok(deleted_response(id, "Supplier deleted"))
}

pub fn supplier_routes() -> Router<AppState> {
    Router::new()
        .route("/list", get(list_suppliers))
        .route("/create", post(create_supplier))
        .route("/update/:id", put(update_supplier))
        .route("/delete/:id", delete(delete_supplier))
}
