pub mod activity;
pub mod assets;
pub mod common;
pub mod costs;
pub mod maintenance;
pub mod production;
pub mod purchase_orders;
pub mod stock;
pub mod suppliers;
pub mod todos;
pub mod users;

use std::sync::Arc;

use crate::{
    db::DbPool,
    events::EventSender,
    services::{
        activity::ActivityService,
        assets::{
            extruders::ExtruderService, inventory::InventoryService, materials::MaterialService,
            others::OtherAssetService, products::ProductService, spareparts::SparepartService,
        },
        costs::CostService,
        maintenance::MaintenanceService,
        production::ProductionService,
        purchase_orders::PurchaseOrderService,
        stock::StockService,
        suppliers::SupplierService,
        todos::TodoService,
        users::UserService,
    },
};

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub users: Arc<UserService>,
    pub suppliers: Arc<SupplierService>,
    pub inventory: Arc<InventoryService>,
    pub extruders: Arc<ExtruderService>,
    pub materials: Arc<MaterialService>,
    pub products: Arc<ProductService>,
    pub spareparts: Arc<SparepartService>,
    pub others: Arc<OtherAssetService>,
    pub stock: Arc<StockService>,
    pub orders: Arc<PurchaseOrderService>,
    pub costs: Arc<CostService>,
    pub maintenance: Arc<MaintenanceService>,
    pub production: Arc<ProductionService>,
    pub todos: Arc<TodoService>,
    pub activity: Arc<ActivityService>,
}

impl AppServices {
    /// Wires every service to the shared connection pool and event channel.
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self {
            users: Arc::new(UserService::new(db.clone(), event_sender.clone())),
            suppliers: Arc::new(SupplierService::new(db.clone(), event_sender.clone())),
            inventory: Arc::new(InventoryService::new(db.clone(), event_sender.clone())),
            extruders: Arc::new(ExtruderService::new(db.clone(), event_sender.clone())),
            materials: Arc::new(MaterialService::new(db.clone(), event_sender.clone())),
            products: Arc::new(ProductService::new(db.clone(), event_sender.clone())),
            spareparts: Arc::new(SparepartService::new(db.clone(), event_sender.clone())),
            others: Arc::new(OtherAssetService::new(db.clone(), event_sender.clone())),
            stock: Arc::new(StockService::new(db.clone(), event_sender.clone())),
            orders: Arc::new(PurchaseOrderService::new(db.clone(), event_sender.clone())),
            costs: Arc::new(CostService::new(db.clone(), event_sender.clone())),
            maintenance: Arc::new(MaintenanceService::new(db.clone(), event_sender.clone())),
            production: Arc::new(ProductionService::new(db.clone(), event_sender.clone())),
            todos: Arc::new(TodoService::new(db.clone(), event_sender)),
            activity: Arc::new(ActivityService::new(db)),
        }
    }
}
