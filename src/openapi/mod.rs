use axum::Json;
use utoipa::OpenApi;

use crate::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Factory Ops API",
        version = "0.1.0",
        description = r#"
# Factory Operations API

Backend for an extrusion plant: master data, stock ledgers, purchasing,
maintenance, production OEE tracking and a recurring to-do calendar.

## Conventions

- Every resource lives under `/api/<resource>` with `/list`, `/create`,
  `/update/{id}` and `/delete/{id}` operations.
- Successful responses use the envelope
  `{ "success": true, "data": ..., "message": ..., "meta": { "requestId", "timestamp" } }`.
- Errors use `{ "success": false, "statusCode", "message", "requestId", "timestamp" }`.
- Dates accept RFC 3339, `YYYY-MM-DDTHH:MM[:SS]` or `YYYY-MM-DD`; values
  without an offset are read as UTC.

## Stock ledgers

Movements (inventory items, materials, products) and transactions
(spareparts, other assets) keep a running balance per item. Any change that
would make a running balance negative is rejected with 400.
        "#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers((url = "http://localhost:8080", description = "Local development")),
    tags(
        (name = "users", description = "User accounts"),
        (name = "suppliers", description = "Supplier master data"),
        (name = "inventory", description = "General inventory items"),
        (name = "extruders", description = "Extrusion lines"),
        (name = "materials", description = "Raw materials"),
        (name = "products", description = "Finished products"),
        (name = "spareparts", description = "Extruder spareparts"),
        (name = "other-assets", description = "Other stocked assets"),
        (name = "movements", description = "Stock ledger of inventory, materials and products"),
        (name = "transactions", description = "Stock ledger of spareparts and other assets"),
        (name = "purchase-orders", description = "Purchasing"),
        (name = "costs", description = "Operating costs"),
        (name = "maintenance", description = "Extruder maintenance log"),
        (name = "production", description = "Jobs, productivity and planning with OEE"),
        (name = "todos", description = "To-do calendar with recurring series"),
        (name = "activity", description = "Audit trail of every change")
    ),
    paths(
        handlers::users::list_users,
        handlers::users::create_user,
        handlers::users::update_user,
        handlers::users::delete_user,
        handlers::suppliers::list_suppliers,
        handlers::suppliers::create_supplier,
        handlers::suppliers::update_supplier,
        handlers::suppliers::delete_supplier,
        handlers::assets::inventory::list_inventory_items,
        handlers::assets::inventory::low_stock_inventory_items,
        handlers::assets::inventory::create_inventory_item,
        handlers::assets::inventory::update_inventory_item,
        handlers::assets::inventory::delete_inventory_item,
        handlers::assets::extruders::list_extruders,
        handlers::assets::extruders::create_extruder,
        handlers::assets::extruders::update_extruder,
        handlers::assets::extruders::delete_extruder,
        handlers::assets::materials::list_materials,
        handlers::assets::materials::low_stock_materials,
        handlers::assets::materials::create_material,
        handlers::assets::materials::update_material,
        handlers::assets::materials::delete_material,
        handlers::assets::products::list_products,
        handlers::assets::products::create_product,
        handlers::assets::products::update_product,
        handlers::assets::products::delete_product,
        handlers::assets::spareparts::list_spareparts,
        handlers::assets::spareparts::low_stock_spareparts,
        handlers::assets::spareparts::create_sparepart,
        handlers::assets::spareparts::update_sparepart,
        handlers::assets::spareparts::delete_sparepart,
        handlers::assets::others::list_other_assets,
        handlers::assets::others::low_stock_other_assets,
        handlers::assets::others::create_other_asset,
        handlers::assets::others::update_other_asset,
        handlers::assets::others::delete_other_asset,
        handlers::stock::list_movements,
        handlers::stock::movement_balance,
        handlers::stock::create_movement,
        handlers::stock::update_movement,
        handlers::stock::delete_movement,
        handlers::stock::list_transactions,
        handlers::stock::transaction_balance,
        handlers::stock::create_transaction,
        handlers::stock::update_transaction,
        handlers::stock::delete_transaction,
        handlers::purchase_orders::list_orders,
        handlers::purchase_orders::create_order,
        handlers::purchase_orders::update_order,
        handlers::purchase_orders::delete_order,
        handlers::costs::list_costs,
        handlers::costs::create_cost,
        handlers::costs::update_cost,
        handlers::costs::delete_cost,
        handlers::maintenance::list_maintenance,
        handlers::maintenance::create_maintenance,
        handlers::maintenance::update_maintenance,
        handlers::maintenance::delete_maintenance,
        handlers::production::list_jobs,
        handlers::production::create_job,
        handlers::production::update_job,
        handlers::production::delete_job,
        handlers::production::list_productivity,
        handlers::production::productivity_summary,
        handlers::production::update_productivity,
        handlers::production::delete_productivity,
        handlers::production::list_planning,
        handlers::production::update_planning,
        handlers::production::delete_planning,
        handlers::todos::list_todos,
        handlers::todos::create_todo,
        handlers::todos::update_todo,
        handlers::todos::complete_todo,
        handlers::todos::delete_todo,
        handlers::activity::list_activity,
    ),
    components(
        schemas(
            crate::errors::ErrorResponse,
            crate::ResponseMeta,
            handlers::common::Deleted,
            crate::entities::ItemType,
            crate::entities::Direction,
            crate::entities::LedgerKind,
            crate::entities::ProductionKind,
            crate::services::recurrence::RecurrenceUnit,
            crate::services::todos::RecurrenceInput,
        )
    )
)]
pub struct ApiDoc;

/// Serves the generated OpenAPI document
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_resource() {
        let json = serde_json::to_string(&ApiDoc::openapi()).unwrap();
        assert!(json.contains("Factory Ops API"));
        for path in [
            "/api/user/list",
            "/api/movement/balance/{item_type}/{code}",
            "/api/job/create",
            "/api/productivity/summary",
            "/api/todo/complete/{id}",
            "/api/activity/list",
        ] {
            assert!(json.contains(path), "missing {}", path);
        }
    }
}
