use axum::{
    extract::{Json, Path, Query, State},
    routing::{delete, get, post, put},
    Router,
};
use uuid::Uuid;

use super::common::{created_response, deleted_response, success_response, Created, Deleted};
use crate::{
    common::StatusFilter,
    entities::user,
    errors::ServiceError,
    handlers::AppState,
    services::users::{CreateUser, UpdateUser},
    ApiResponse, ApiResult,
};

/// List users
#[utoipa::path(
    get,
    path = "/api/user/list",
    params(StatusFilter),
    responses(
        (status = 200, description = "Users, most recently updated first", body = [user::Model])
    ),
    tag = "users"
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(filter): Query<StatusFilter>,
) -> ApiResult<Vec<user::Model>> {
    let users = state.services.users.list(filter.status).await?;
    Ok(success_response(users))
}

/// Create a user
#[utoipa::path(
    post,
    path = "/api/user/create",
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = user::Model),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 409, description = "Username taken", body = crate::errors::ErrorResponse)
    ),
    tag = "users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUser>,
) -> Result<Created<user::Model>, ServiceError> {
    let created = state.services.users.create(payload).await?;
    Ok(created_response(created, "User created"))
}

/// Update a user
#[utoipa::path(
    put,
    path = "/api/user/update/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = user::Model),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Username taken", body = crate::errors::ErrorResponse)
    ),
    tag = "users"
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUser>,
) -> ApiResult<user::Model> {
    let updated = state.services.users.update(id, payload).await?;
    Ok(Json(ApiResponse::success(updated).with_message("User updated")))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/api/user/delete/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = Deleted),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "users"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Deleted> {
    state.services.users.delete(id).await?;
    Ok(deleted_response(id, "User deleted"))
}

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/list", get(list_users))
        .route("/create", post(create_user))
        .route("/update/:id", put(update_user))
        .route("/delete/:id", delete(delete_user))
}
