//! Stocked assets: inventory items, extruders, materials, products,
//! spareparts and other assets. Balances are owned by the stock ledgers;
//! these services only maintain the master data.

pub mod extruders;
pub mod inventory;
pub mod materials;
pub mod others;
pub mod products;
pub mod spareparts;

use sea_orm::{
    sea_query::Expr, ColumnTrait, ConnectionTrait, DbBackend, EntityTrait, QueryFilter,
    QuerySelect, Select,
};

use crate::{
    entities::{
        inventory_item, material, other_asset, product, sparepart, stock_entry, ItemType,
    },
    errors::ServiceError,
};

pub(crate) const DEFAULT_STATUS: &str = "Active";

/// Stock figures of one asset as stored on its master record
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct AssetSnapshot {
    pub balance: f64,
    /// Products carry no minimum
    pub min_stock: Option<f64>,
}

/// Adds `FOR UPDATE` to `select` on backends with row locks. SQLite already
/// serializes writers.
fn for_update<E: EntityTrait>(select: Select<E>, backend: DbBackend, lock: bool) -> Select<E> {
    if lock && backend != DbBackend::Sqlite {
        select.lock_exclusive()
    } else {
        select
    }
}

pub(crate) async fn snapshot<C: ConnectionTrait>(
    conn: &C,
    item_type: ItemType,
    code: &str,
) -> Result<Option<AssetSnapshot>, ServiceError> {
    read_asset(conn, item_type, code, false).await
}

/// Like [`snapshot`], but holds a row lock on the asset until the
/// transaction ends, so concurrent rebalances of one item run one at a time.
pub(crate) async fn lock_asset<C: ConnectionTrait>(
    conn: &C,
    item_type: ItemType,
    code: &str,
) -> Result<Option<AssetSnapshot>, ServiceError> {
    read_asset(conn, item_type, code, true).await
}

async fn read_asset<C: ConnectionTrait>(
    conn: &C,
    item_type: ItemType,
    code: &str,
    lock: bool,
) -> Result<Option<AssetSnapshot>, ServiceError> {
    let backend = conn.get_database_backend();
    let found = match item_type {
        ItemType::Inventory => for_update(inventory_item::Entity::find(), backend, lock)
            .filter(inventory_item::Column::Code.eq(code))
            .one(conn)
            .await?
            .map(|m| AssetSnapshot {
                balance: m.balance,
                min_stock: Some(m.min_stock),
            }),
        ItemType::Material => for_update(material::Entity::find(), backend, lock)
            .filter(material::Column::Code.eq(code))
            .one(conn)
            .await?
            .map(|m| AssetSnapshot {
                balance: m.balance,
                min_stock: Some(m.min_stock),
            }),
        ItemType::Product => for_update(product::Entity::find(), backend, lock)
            .filter(product::Column::Code.eq(code))
            .one(conn)
            .await?
            .map(|m| AssetSnapshot {
                balance: m.balance,
                min_stock: None,
            }),
        ItemType::Sparepart => for_update(sparepart::Entity::find(), backend, lock)
            .filter(sparepart::Column::Code.eq(code))
            .one(conn)
            .await?
            .map(|m| AssetSnapshot {
                balance: m.balance,
                min_stock: Some(m.min_stock),
            }),
        ItemType::Other => for_update(other_asset::Entity::find(), backend, lock)
            .filter(other_asset::Column::Code.eq(code))
            .one(conn)
            .await?
            .map(|m| AssetSnapshot {
                balance: m.balance,
                min_stock: Some(m.min_stock),
            }),
    };
    Ok(found)
}

/// Stores `balance` on the asset and returns its minimum stock, if any.
pub(crate) async fn write_balance<C: ConnectionTrait>(
    conn: &C,
    item_type: ItemType,
    code: &str,
    balance: f64,
) -> Result<Option<f64>, ServiceError> {
    match item_type {
        ItemType::Inventory => {
            inventory_item::Entity::update_many()
                .col_expr(inventory_item::Column::Balance, Expr::value(balance))
                .filter(inventory_item::Column::Code.eq(code))
                .exec(conn)
                .await?;
        }
        ItemType::Material => {
            material::Entity::update_many()
                .col_expr(material::Column::Balance, Expr::value(balance))
                .filter(material::Column::Code.eq(code))
                .exec(conn)
                .await?;
        }
        ItemType::Product => {
            product::Entity::update_many()
                .col_expr(product::Column::Balance, Expr::value(balance))
                .filter(product::Column::Code.eq(code))
                .exec(conn)
                .await?;
        }
        ItemType::Sparepart => {
            sparepart::Entity::update_many()
                .col_expr(sparepart::Column::Balance, Expr::value(balance))
                .filter(sparepart::Column::Code.eq(code))
                .exec(conn)
                .await?;
        }
        ItemType::Other => {
            other_asset::Entity::update_many()
                .col_expr(other_asset::Column::Balance, Expr::value(balance))
                .filter(other_asset::Column::Code.eq(code))
                .exec(conn)
                .await?;
        }
    }
    Ok(snapshot(conn, item_type, code).await?.and_then(|s| s.min_stock))
}

/// Points the ledger entries of a renamed asset at its new code.
pub(crate) async fn rekey_entries<C: ConnectionTrait>(
    conn: &C,
    item_type: ItemType,
    old_code: &str,
    new_code: &str,
) -> Result<u64, ServiceError> {
    let result = stock_entry::Entity::update_many()
        .col_expr(stock_entry::Column::Code, Expr::value(new_code))
        .filter(stock_entry::Column::ItemType.eq(item_type))
        .filter(stock_entry::Column::Code.eq(old_code))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

/// Removes every ledger entry of an asset that is being deleted.
pub(crate) async fn delete_entries<C: ConnectionTrait>(
    conn: &C,
    item_type: ItemType,
    code: &str,
) -> Result<u64, ServiceError> {
    let result = stock_entry::Entity::delete_many()
        .filter(stock_entry::Column::ItemType.eq(item_type))
        .filter(stock_entry::Column::Code.eq(code))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::QueryTrait;

    fn lookup(backend: DbBackend, lock: bool) -> String {
        for_update(material::Entity::find(), backend, lock)
            .filter(material::Column::Code.eq("PP-01"))
            .build(backend)
            .to_string()
    }

    #[test]
    fn rebalance_lookups_lock_the_asset_row() {
        assert!(lookup(DbBackend::Postgres, true).ends_with("FOR UPDATE"));
        assert!(!lookup(DbBackend::Postgres, false).contains("FOR UPDATE"));
        assert!(!lookup(DbBackend::Sqlite, true).contains("FOR UPDATE"));
    }
}
