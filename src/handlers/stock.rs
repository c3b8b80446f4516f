//! Movement and transaction ledgers. Both share the stock service and differ
//! only in the item types they accept.

use axum::{
    extract::{Json, Path, Query, State},
    routing::{delete, get, post, put},
    Router,
};
use std::str::FromStr;
use uuid::Uuid;

use super::common::{created_response, deleted_response, success_response, Created, Deleted};
use crate::{
    entities::{stock_entry, ItemType, LedgerKind},
    errors::{ApiError, ServiceError},
    handlers::AppState,
    services::stock::{CreateStockEntry, StockEntryFilter, StockLevel, UpdateStockEntry},
    ApiResponse, ApiResult,
};

fn parse_item_type(raw: &str) -> Result<ItemType, ApiError> {
    ItemType::from_str(raw)
        .map_err(|_| ApiError::BadRequest(format!("Unknown item type '{}'", raw)))
}

async fn list_entries(
    state: &AppState,
    kind: LedgerKind,
    filter: StockEntryFilter,
) -> ApiResult<Vec<stock_entry::Model>> {
    Ok(success_response(state.services.stock.list(kind, filter).await?))
}

async fn entry_balance(
    state: &AppState,
    kind: LedgerKind,
    item_type: &str,
    code: &str,
) -> Result<Json<ApiResponse<StockLevel>>, ApiError> {
    let item_type = parse_item_type(item_type)?;
    let level = state.services.stock.balance(kind, item_type, code).await?;
    Ok(success_response(level))
}

async fn create_entry(
    state: &AppState,
    kind: LedgerKind,
    payload: CreateStockEntry,
) -> Result<Created<stock_entry::Model>, ServiceError> {
    let created = state.services.stock.create(kind, payload).await?;
    Ok(created_response(created, format!("{} recorded", kind)))
}

async fn update_entry(
    state: &AppState,
    kind: LedgerKind,
    id: Uuid,
    payload: UpdateStockEntry,
) -> ApiResult<stock_entry::Model> {
    let updated = state.services.stock.update(kind, id, payload).await?;
    Ok(Json(
        ApiResponse::success(updated).with_message(format!("{} updated", kind)),
    ))
}

async fn delete_entry(state: &AppState, kind: LedgerKind, id: Uuid) -> ApiResult<Deleted> {
    state.services.stock.delete(kind, id).await?;
    Ok(deleted_response(id, format!("{} deleted", kind)))
}

/// List stock movements of inventory items, materials and products
#[utoipa::path(
    get,
    path = "/api/movement/list",
    params(StockEntryFilter),
    responses((status = 200, description = "Movements", body = [stock_entry::Model])),
    tag = "movements"
)]
pub async fn list_movements(
    State(state): State<AppState>,
    Query(filter): Query<StockEntryFilter>,
) -> ApiResult<Vec<stock_entry::Model>> {
    list_entries(&state, LedgerKind::Movement, filter).await
}

/// Current balance of one item on the movement ledger
#[utoipa::path(
    get,
    path = "/api/movement/balance/{item_type}/{code}",
    params(
        ("item_type" = String, Path, description = "Inventory, Material or Product"),
        ("code" = String, Path, description = "Asset code")
    ),
    responses(
        (status = 200, description = "Current balance", body = StockLevel),
        (status = 400, description = "Item type not on this ledger", body = crate::errors::ErrorResponse),
        (status = 404, description = "Asset not found", body = crate::errors::ErrorResponse)
    ),
    tag = "movements"
)]
pub async fn movement_balance(
    State(state): State<AppState>,
    Path((item_type, code)): Path<(String, String)>,
) -> Result<Json<ApiResponse<StockLevel>>, ApiError> {
    entry_balance(&state, LedgerKind::Movement, &item_type, &code).await
}

/// Record a movement
///
/// The item's ledger is recomputed; a movement that would take the running
/// balance below zero is rejected.
#[utoipa::path(
    post,
    path = "/api/movement/create",
    request_body = CreateStockEntry,
    responses(
        (status = 201, description = "Movement recorded", body = stock_entry::Model),
        (status = 400, description = "Invalid request or insufficient balance", body = crate::errors::ErrorResponse),
        (status = 404, description = "Asset not found", body = crate::errors::ErrorResponse)
    ),
    tag = "movements"
)]
pub async fn create_movement(
    State(state): State<AppState>,
    Json(payload): Json<CreateStockEntry>,
) -> Result<Created<stock_entry::Model>, ServiceError> {
    create_entry(&state, LedgerKind::Movement, payload).await
}

#[utoipa::path(
    put,
    path = "/api/movement/update/{id}",
    params(("id" = Uuid, Path, description = "Movement ID")),
    request_body = UpdateStockEntry,
    responses(
        (status = 200, description = "Movement updated", body = stock_entry::Model),
        (status = 400, description = "Invalid request or insufficient balance", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "movements"
)]
pub async fn update_movement(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStockEntry>,
) -> ApiResult<stock_entry::Model> {
    update_entry(&state, LedgerKind::Movement, id, payload).await
}

#[utoipa::path(
    delete,
    path = "/api/movement/delete/{id}",
    params(("id" = Uuid, Path, description = "Movement ID")),
    responses(
        (status = 200, description = "Movement deleted", body = Deleted),
        (status = 400, description = "Insufficient balance", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "movements"
)]
pub async fn delete_movement(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Deleted> {
    delete_entry(&state, LedgerKind::Movement, id).await
}

/// List sparepart and other-asset transactions
#[utoipa::path(
    get,
    path = "/api/transaction/list",
    params(StockEntryFilter),
    responses((status = 200, description = "Transactions", body = [stock_entry::Model])),
    tag = "transactions"
)]
pub async fn list_transactions(
    State(state): State<AppState>,
    Query(filter): Query<StockEntryFilter>,
) -> ApiResult<Vec<stock_entry::Model>> {
    list_entries(&state, LedgerKind::Transaction, filter).await
}

/// Current balance of one item on the transaction ledger
#[utoipa::path(
    get,
    path = "/api/transaction/balance/{item_type}/{code}",
    params(
        ("item_type" = String, Path, description = "Sparepart or Other"),
        ("code" = String, Path, description = "Asset code")
    ),
    responses(
        (status = 200, description = "Current balance", body = StockLevel),
        (status = 400, description = "Item type not on this ledger", body = crate::errors::ErrorResponse),
        (status = 404, description = "Asset not found", body = crate::errors::ErrorResponse)
    ),
    tag = "transactions"
)]
pub async fn transaction_balance(
    State(state): State<AppState>,
    Path((item_type, code)): Path<(String, String)>,
) -> Result<Json<ApiResponse<StockLevel>>, ApiError> {
    entry_balance(&state, LedgerKind::Transaction, &item_type, &code).await
}

/// Record a transaction, optionally against the extruder the part was used on
#[utoipa::path(
    post,
    path = "/api/transaction/create",
    request_body = CreateStockEntry,
    responses(
        (status = 201, description = "Transaction recorded", body = stock_entry::Model),
        (status = 400, description = "Invalid request or insufficient balance", body = crate::errors::ErrorResponse),
        (status = 404, description = "Asset or extruder not found", body = crate::errors::ErrorResponse)
    ),
    tag = "transactions"
)]
pub async fn create_transaction(
    State(state): State<AppState>,
    Json(payload): Json<CreateStockEntry>,
) -> Result<Created<stock_entry::Model>, ServiceError> {
    create_entry(&state, LedgerKind::Transaction, payload).await
}

#[utoipa::path(
    put,
    path = "/api/transaction/update/{id}",
    params(("id" = Uuid, Path, description = "Transaction ID")),
    request_body = UpdateStockEntry,
    responses(
        (status = 200, description = "Transaction updated", body = stock_entry::Model),
        (status = 400, description = "Invalid request or insufficient balance", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "transactions"
)]
pub async fn update_transaction(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStockEntry>,
) -> ApiResult<stock_entry::Model> {
    update_entry(&state, LedgerKind::Transaction, id, payload).await
}

#[utoipa::path(
    delete,
    path = "/api/transaction/delete/{id}",
    params(("id" = Uuid, Path, description = "Transaction ID")),
    responses(
        (status = 200, description = "Transaction deleted", body = Deleted),
        (status = 400, description = "Insufficient balance", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "transactions"
)]
pub async fn delete_transaction(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Deleted> {
    delete_entry(&state, LedgerKind::Transaction, id).await
}

pub fn movement_routes() -> Router<AppState> {
    Router::new()
        .route("/list", get(list_movements))
        .route("/balance/:item_type/:code", get(movement_balance))
        .route("/create", post(create_movement))
        .route("/update/:id", put(update_movement))
        .route("/delete/:id", delete(delete_movement))
}

pub fn transaction_routes() -> Router<AppState> {
    Router::new()
        .route("/list", get(list_transactions))
        .route("/balance/:item_type/:code", get(transaction_balance))
        .route("/create", post(create_transaction))
        .route("/update/:id", put(update_transaction))
        .route("/delete/:id", delete(delete_transaction))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn item_types_parse_by_name() {
        assert_eq!(parse_item_type("Sparepart").unwrap(), ItemType::Sparepart);
        assert_matches!(parse_item_type("Widget"), Err(ApiError::BadRequest(_)));
    }
}
