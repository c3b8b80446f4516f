//! SeaORM entities. One module per table; enums shared between tables live
//! next to the table that introduced them.

pub mod activity;
pub mod cost;
pub mod extruder;
pub mod inventory_item;
pub mod maintenance_record;
pub mod material;
pub mod other_asset;
pub mod product;
pub mod production_record;
pub mod purchase_order;
pub mod sparepart;
pub mod stock_entry;
pub mod supplier;
pub mod todo;
pub mod user;

pub use production_record::ProductionKind;
pub use stock_entry::{Direction, ItemType, LedgerKind};
