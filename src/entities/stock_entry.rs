use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

/// Which ledger an entry belongs to. Movements cover inventory, materials and
/// products; transactions cover spareparts and other assets.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    Display, EnumString, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum LedgerKind {
    #[sea_orm(string_value = "Movement")]
    Movement,
    #[sea_orm(string_value = "Transaction")]
    Transaction,
}

impl LedgerKind {
    pub fn accepts(&self, item_type: ItemType) -> bool {
        match self {
            LedgerKind::Movement => matches!(
                item_type,
                ItemType::Inventory | ItemType::Material | ItemType::Product
            ),
            LedgerKind::Transaction => matches!(item_type, ItemType::Sparepart | ItemType::Other),
        }
    }

    pub fn resource(&self) -> &'static str {
        match self {
            LedgerKind::Movement => "movement",
            LedgerKind::Transaction => "transaction",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    Display, EnumString, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum ItemType {
    #[sea_orm(string_value = "Inventory")]
    Inventory,
    #[sea_orm(string_value = "Material")]
    Material,
    #[sea_orm(string_value = "Product")]
    Product,
    #[sea_orm(string_value = "Sparepart")]
    Sparepart,
    #[sea_orm(string_value = "Other")]
    Other,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    Display, EnumString, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum Direction {
    #[sea_orm(string_value = "In")]
    In,
    #[sea_orm(string_value = "Out")]
    Out,
}

impl Direction {
    /// Signed effect of `quantity` on a running balance.
    pub fn apply(&self, quantity: f64) -> f64 {
        match self {
            Direction::In => quantity,
            Direction::Out => -quantity,
        }
    }
}

/// One line in a stock ledger. `balance` is the running balance of the
/// item after this entry, in (date, created_at) order.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = StockEntry)]
#[sea_orm(table_name = "stock_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub ledger: LedgerKind,
    pub date: DateTime<Utc>,
    pub item_type: ItemType,
    pub code: String,
    pub direction: Direction,
    pub quantity: f64,
    pub balance: f64,
    /// Extruder the part was issued to (transactions only)
    pub extruder: Option<String>,
    pub reference: Option<String>,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
