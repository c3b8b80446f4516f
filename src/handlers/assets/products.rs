use axum::{
    extract::{Json, Path, Query, State},
    routing::{delete, get, post, put},
    Router,
};
use uuid::Uuid;

use crate::{
    common::StatusFilter,
    entities::product,
    errors::ServiceError,
    handlers::{
        common::{created_response, deleted_response, success_response, Created, Deleted},
        AppState,
    },
    services::assets::products::{CreateProduct, UpdateProduct},
    ApiResponse, ApiResult,
};

/// List products
#[utoipa::path(
    get,
    path = "/api/product/list",
    params(StatusFilter),
    responses((status = 200, description = "Products", body = [product::Model])),
    tag = "products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(filter): Query<StatusFilter>,
) -> ApiResult<Vec<product::Model>> {
    Ok(success_response(
        state.services.products.list(filter.status).await?,
    ))
}

/// Create a product
#[utoipa::path(
    post,
    path = "/api/product/create",
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created", body = product::Model),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 409, description = "Code already in use", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProduct>,
) -> Result<Created<product::Model>, ServiceError> {
    let created = state.services.products.create(payload).await?;
    Ok(created_response(created, "Product created"))
}

/// Update a product
#[utoipa::path(
    put,
    path = "/api/product/update/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Product updated", body = product::Model),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Code already in use", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProduct>,
) -> ApiResult<product::Model> {
    let updated = state.services.products.update(id, payload).await?;
    Ok(Json(
        ApiResponse::success(updated).with_message("Product updated"),
    ))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/api/product/delete/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product deleted", body = Deleted),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Deleted> {
    state.services.products.delete(id).await?;
    Ok(deleted_response(id, "Product deleted"))
}

pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/list", get(list_products))
        .route("/create", post(create_product))
        .route("/update/:id", put(update_product))
        .route("/delete/:id", delete(delete_product))
}
