//! Job, productivity and planning endpoints. A job opens a lot; the other two
//! kinds are created with it and kept in step on every update.

use axum::{
    extract::{Json, Path, Query, State},
    routing::{delete, get, post, put},
    Router,
};
use uuid::Uuid;

use super::common::{created_response, deleted_response, success_response, Created, Deleted};
use crate::{
    entities::{production_record, ProductionKind},
    errors::ServiceError,
    handlers::AppState,
    services::production::{CreateJob, ProductionFilter, ProductivitySummary, UpdateProduction},
    ApiResponse, ApiResult,
};

async fn list_records(
    state: &AppState,
    kind: ProductionKind,
    filter: ProductionFilter,
) -> ApiResult<Vec<production_record::Model>> {
    Ok(success_response(
        state.services.production.list(kind, filter).await?,
    ))
}

async fn update_record(
    state: &AppState,
    kind: ProductionKind,
    id: Uuid,
    payload: UpdateProduction,
) -> ApiResult<production_record::Model> {
    let updated = state.services.production.update(kind, id, payload).await?;
    Ok(Json(
        ApiResponse::success(updated).with_message(format!("{} updated", kind)),
    ))
}

async fn delete_record(state: &AppState, kind: ProductionKind, id: Uuid) -> ApiResult<Deleted> {
    state.services.production.delete(kind, id).await?;
    Ok(deleted_response(id, format!("{} deleted", kind)))
}

#[utoipa::path(
    get,
    path = "/api/job/list",
    params(ProductionFilter),
    responses((status = 200, description = "Jobs", body = [production_record::Model])),
    tag = "production"
)]
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(filter): Query<ProductionFilter>,
) -> ApiResult<Vec<production_record::Model>> {
    list_records(&state, ProductionKind::Job, filter).await
}

/// Open a lot
///
/// Creates the job together with its productivity and planning records.
#[utoipa::path(
    post,
    path = "/api/job/create",
    request_body = CreateJob,
    responses(
        (status = 201, description = "Lot created", body = production_record::Model),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 409, description = "Lot number taken", body = crate::errors::ErrorResponse)
    ),
    tag = "production"
)]
pub async fn create_job(
    State(state): State<AppState>,
    Json(payload): Json<CreateJob>,
) -> Result<Created<production_record::Model>, ServiceError> {
    let created = state.services.production.create_job(payload).await?;
    Ok(created_response(created, "Job created"))
}

#[utoipa::path(
    put,
    path = "/api/job/update/{id}",
    params(("id" = Uuid, Path, description = "Job ID")),
    request_body = UpdateProduction,
    responses(
        (status = 200, description = "Lot updated", body = production_record::Model),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Lot number taken", body = crate::errors::ErrorResponse)
    ),
    tag = "production"
)]
pub async fn update_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProduction>,
) -> ApiResult<production_record::Model> {
    update_record(&state, ProductionKind::Job, id, payload).await
}

/// Delete a job and every record of its lot
#[utoipa::path(
    delete,
    path = "/api/job/delete/{id}",
    params(("id" = Uuid, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Lot deleted", body = Deleted),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "production"
)]
pub async fn delete_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Deleted> {
    delete_record(&state, ProductionKind::Job, id).await
}

#[utoipa::path(
    get,
    path = "/api/productivity/list",
    params(ProductionFilter),
    responses((status = 200, description = "Productivity records", body = [production_record::Model])),
    tag = "production"
)]
pub async fn list_productivity(
    State(state): State<AppState>,
    Query(filter): Query<ProductionFilter>,
) -> ApiResult<Vec<production_record::Model>> {
    list_records(&state, ProductionKind::Productivity, filter).await
}

/// Average OEE factors and output totals
#[utoipa::path(
    get,
    path = "/api/productivity/summary",
    params(ProductionFilter),
    responses((status = 200, description = "Productivity summary", body = ProductivitySummary)),
    tag = "production"
)]
pub async fn productivity_summary(
    State(state): State<AppState>,
    Query(filter): Query<ProductionFilter>,
) -> ApiResult<ProductivitySummary> {
    Ok(success_response(
        state.services.production.summary(filter).await?,
    ))
}

#[utoipa::path(
    put,
    path = "/api/productivity/update/{id}",
    params(("id" = Uuid, Path, description = "Productivity record ID")),
    request_body = UpdateProduction,
    responses(
        (status = 200, description = "Lot updated", body = production_record::Model),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "production"
)]
pub async fn update_productivity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProduction>,
) -> ApiResult<production_record::Model> {
    update_record(&state, ProductionKind::Productivity, id, payload).await
}

#[utoipa::path(
    delete,
    path = "/api/productivity/delete/{id}",
    params(("id" = Uuid, Path, description = "Productivity record ID")),
    responses(
        (status = 200, description = "Productivity record deleted", body = Deleted),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "production"
)]
pub async fn delete_productivity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Deleted> {
    delete_record(&state, ProductionKind::Productivity, id).await
}

#[utoipa::path(
    get,
    path = "/api/planning/list",
    params(ProductionFilter),
    responses((status = 200, description = "Planning records", body = [production_record::Model])),
    tag = "production"
)]
pub async fn list_planning(
    State(state): State<AppState>,
    Query(filter): Query<ProductionFilter>,
) -> ApiResult<Vec<production_record::Model>> {
    list_records(&state, ProductionKind::Planning, filter).await
}

#[utoipa::path(
    put,
    path = "/api/planning/update/{id}",
    params(("id" = Uuid, Path, description = "Planning record ID")),
    request_body = UpdateProduction,
    responses(
        (status = 200, description = "Lot updated", body = production_record::Model),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "production"
)]
pub async fn update_planning(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProduction>,
) -> ApiResult<production_record::Model> {
    update_record(&state, ProductionKind::Planning, id, payload).await
}

#[utoipa::path(
    delete,
    path = "/api/planning/delete/{id}",
    params(("id" = Uuid, Path, description = "Planning record ID")),
    responses(
        (status = 200, description = "Planning record deleted", body = Deleted),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "production"
)]
pub async fn delete_planning(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Deleted> {
    delete_record(&state, ProductionKind::Planning, id).await
}

pub fn job_routes() -> Router<AppState> {
    Router::new()
        .route("/list", get(list_jobs))
        .route("/create", post(create_job))
        .route("/update/:id", put(update_job))
        .route("/delete/:id", delete(delete_job))
}

pub fn productivity_routes() -> Router<AppState> {
    Router::new()
        .route("/list", get(list_productivity))
        .route("/summary", get(productivity_summary))
        .route("/update/:id", put(update_productivity))
        .route("/delete/:id", delete(delete_productivity))
}

pub fn planning_routes() -> Router<AppState> {
    Router::new()
        .route("/list", get(list_planning))
        .route("/update/:id", put(update_planning))
        .route("/delete/:id", delete(delete_planning))
}
