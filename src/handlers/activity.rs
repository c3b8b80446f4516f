use axum::{
    extract::{Query, State},
    routing::get,
    Router,
};

use super::common::success_response;
use crate::{
    entities::activity, handlers::AppState, services::activity::ActivityQuery, ApiResult,
};

/// Read the activity log, newest first
#[utoipa::path(
    get,
    path = "/api/activity/list",
    params(ActivityQuery),
    responses(
        (status = 200, description = "Activity records", body = [activity::Model]),
        (status = 400, description = "Invalid date range", body = crate::errors::ErrorResponse)
    ),
    tag = "activity"
)]
pub async fn list_activity(
    State(state): State<AppState>,
    Query(query): Query<ActivityQuery>,
) -> ApiResult<Vec<activity::Model>> {
    Ok(success_response(state.services.activity.list(query).await?))
}

pub fn activity_routes() -> Router<AppState> {
    Router::new().route("/list", get(list_activity))
}
