use axum::{
    extract::{Json, Path, Query, State},
    routing::{delete, get, post, put},
    Router,
};
use uuid::Uuid;

use super::common::{created_response, deleted_response, success_response, Created, Deleted};
use crate::{
    entities::todo,
    errors::ServiceError,
    handlers::AppState,
    services::todos::{CreateTodo, TodoFilter, UpdateTodo},
    ApiResponse, ApiResult,
};

/// List todos, including the generated occurrences of recurring ones
#[utoipa::path(
    get,
    path = "/api/todo/list",
    params(TodoFilter),
    responses(
        (status = 200, description = "Todos", body = [todo::Model]),
        (status = 400, description = "Invalid date range", body = crate::errors::ErrorResponse)
    ),
    tag = "todos"
)]
pub async fn list_todos(
    State(state): State<AppState>,
    Query(filter): Query<TodoFilter>,
) -> ApiResult<Vec<todo::Model>> {
    Ok(success_response(state.services.todos.list(filter).await?))
}

/// Create a todo
///
/// With a recurrence, one child todo is stored for every later occurrence.
#[utoipa::path(
    post,
    path = "/api/todo/create",
    request_body = CreateTodo,
    responses(
        (status = 201, description = "Todo created", body = todo::Model),
        (status = 400, description = "Invalid request or recurrence", body = crate::errors::ErrorResponse)
    ),
    tag = "todos"
)]
pub async fn create_todo(
    State(state): State<AppState>,
    Json(payload): Json<CreateTodo>,
) -> Result<Created<todo::Model>, ServiceError> {
    let created = state.services.todos.create(payload).await?;
    Ok(created_response(created, "Todo created"))
}

#[utoipa::path(
    put,
    path = "/api/todo/update/{id}",
    params(("id" = Uuid, Path, description = "Todo ID")),
    request_body = UpdateTodo,
    responses(
        (status = 200, description = "Todo updated", body = todo::Model),
        (status = 400, description = "Invalid request or recurrence", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "todos"
)]
pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTodo>,
) -> ApiResult<todo::Model> {
    let updated = state.services.todos.update(id, payload).await?;
    Ok(Json(ApiResponse::success(updated).with_message("Todo updated")))
}

/// Toggle a todo between complete and incomplete
#[utoipa::path(
    put,
    path = "/api/todo/complete/{id}",
    params(("id" = Uuid, Path, description = "Todo ID")),
    responses(
        (status = 200, description = "Todo status toggled", body = todo::Model),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "todos"
)]
pub async fn complete_todo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<todo::Model> {
    let updated = state.services.todos.toggle_complete(id).await?;
    let message = format!("Todo marked {}", updated.status);
    Ok(Json(ApiResponse::success(updated).with_message(message)))
}

#[utoipa::path(
    delete,
    path = "/api/todo/delete/{id}",
    params(("id" = Uuid, Path, description = "Todo ID")),
    responses(
        (status = 200, description = "Todo and its occurrences deleted", body = Deleted),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "todos"
)]
pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Deleted> {
    state.services.todos.delete(id).await?;
    Ok(deleted_response(id, "Todo deleted"))
}

pub fn todo_routes() -> Router<AppState> {
    Router::new()
        .route("/list", get(list_todos))
        .route("/create", post(create_todo))
        .route("/update/:id", put(update_todo))
        .route("/complete/:id", put(complete_todo))
        .route("/delete/:id", delete(delete_todo))
}
