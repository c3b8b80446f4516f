use axum::{http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::ApiResponse;

/// Response of every create endpoint
pub type Created<T> = (StatusCode, Json<ApiResponse<T>>);

/// Standard success response
pub fn success_response<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success(data))
}

/// Standard created response
pub fn created_response<T: Serialize>(data: T, message: impl Into<String>) -> Created<T> {
    (
        StatusCode::CREATED,
        Json(ApiResponse::success(data).with_message(message)),
    )
}

/// Body of a successful delete
#[derive(Debug, Serialize, ToSchema)]
pub struct Deleted {
    pub id: Uuid,
}

pub fn deleted_response(id: Uuid, message: impl Into<String>) -> Json<ApiResponse<Deleted>> {
    Json(ApiResponse::success(Deleted { id }).with_message(message))
}
