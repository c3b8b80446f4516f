use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait,
    DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{parse_timestamp, DateRangeParams},
    db,
    entities::{extruder, stock_entry, Direction, ItemType, LedgerKind},
    errors::ServiceError,
    events::{Event, EventSender},
    services::{
        activity, assets,
        ledger::{self, LedgerError, LedgerLine},
        merge, merge_opt,
    },
};

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateStockEntry {
    /// Posting date; the ledger is ordered by it
    #[validate(length(min = 1))]
    pub date: String,
    pub item_type: ItemType,
    #[validate(length(min = 1, max = 100))]
    pub code: String,
    pub direction: Direction,
    pub quantity: f64,
    /// Extruder code the part was issued to (transactions only)
    pub extruder: Option<String>,
    pub reference: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateStockEntry {
    pub date: Option<String>,
    pub item_type: Option<ItemType>,
    #[validate(length(min = 1, max = 100))]
    pub code: Option<String>,
    pub direction: Option<Direction>,
    pub quantity: Option<f64>,
    pub extruder: Option<String>,
    pub reference: Option<String>,
    pub remarks: Option<String>,
}

fn check_quantity(quantity: f64) -> Result<(), ServiceError> {
    if quantity.is_finite() && quantity > 0.0 {
        Ok(())
    } else {
        Err(ServiceError::ValidationError(
            "Quantity must be greater than zero".to_string(),
        ))
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StockEntryFilter {
    pub item_type: Option<ItemType>,
    pub code: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Current balance of one item
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct StockLevel {
    pub item_type: ItemType,
    pub code: String,
    pub balance: f64,
    pub min_stock: Option<f64>,
}

impl StockLevel {
    pub fn into_event(self) -> Event {
        Event::StockRebalanced {
            item_type: self.item_type.to_string(),
            code: self.code,
            balance: self.balance,
            min_stock: self.min_stock,
        }
    }
}

/// Replays the ledger of one item and writes back every entry balance that
/// moved plus the asset's balance column. Fails without writing anything
/// when the replay goes negative. The asset row stays locked until the
/// caller's transaction ends.
pub(crate) async fn rebalance_item<C: ConnectionTrait>(
    conn: &C,
    item_type: ItemType,
    code: &str,
) -> Result<StockLevel, ServiceError> {
    assets::lock_asset(conn, item_type, code).await?;
    let entries = stock_entry::Entity::find()
        .filter(stock_entry::Column::ItemType.eq(item_type))
        .filter(stock_entry::Column::Code.eq(code))
        .all(conn)
        .await?;

    let result = ledger::rebalance(entries.iter().map(LedgerLine::from).collect()).map_err(
        |LedgerError::Negative { date, balance, .. }| {
            ServiceError::InsufficientBalance(format!(
                "{} {} would drop to {} on {}",
                item_type,
                code,
                balance,
                date.format("%Y-%m-%d")
            ))
        },
    )?;

    for (id, balance) in &result.changed {
        stock_entry::Entity::update_many()
            .col_expr(stock_entry::Column::Balance, Expr::value(*balance))
            .filter(stock_entry::Column::Id.eq(*id))
            .exec(conn)
            .await?;
    }

    let min_stock = assets::write_balance(conn, item_type, code, result.closing).await?;

    Ok(StockLevel {
        item_type,
        code: code.to_string(),
        balance: result.closing,
        min_stock,
    })
}

/// Movement and transaction ledgers. Every method takes the ledger it acts
/// on; item types outside that ledger are rejected.
#[derive(Clone)]
pub struct StockService {
    db: Arc<DatabaseConnection>,
    event_sender: EventSender,
}

impl StockService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    fn check_item_type(kind: LedgerKind, item_type: ItemType) -> Result<(), ServiceError> {
        if kind.accepts(item_type) {
            Ok(())
        } else {
            Err(ServiceError::InvalidInput(format!(
                "Item type {} is not tracked by the {} ledger",
                item_type,
                kind.resource()
            )))
        }
    }

    async fn require_asset<C: ConnectionTrait>(
        conn: &C,
        item_type: ItemType,
        code: &str,
    ) -> Result<(), ServiceError> {
        match assets::snapshot(conn, item_type, code).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::NotFound(format!(
                "{} {} not found",
                item_type, code
            ))),
        }
    }

    async fn require_extruder<C: ConnectionTrait>(
        conn: &C,
        kind: LedgerKind,
        code: Option<&str>,
    ) -> Result<(), ServiceError> {
        let Some(code) = code else {
            return Ok(());
        };
        if kind != LedgerKind::Transaction {
            return Err(ServiceError::InvalidInput(
                "Only transactions can reference an extruder".to_string(),
            ));
        }
        extruder::Entity::find()
            .filter(extruder::Column::Code.eq(code))
            .one(conn)
            .await?
            .map(|_| ())
            .ok_or_else(|| ServiceError::NotFound(format!("Extruder {} not found", code)))
    }

    async fn find_entry<C: ConnectionTrait>(
        conn: &C,
        kind: LedgerKind,
        id: Uuid,
    ) -> Result<stock_entry::Model, ServiceError> {
        stock_entry::Entity::find_by_id(id)
            .filter(stock_entry::Column::Ledger.eq(kind))
            .one(conn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("{} {} not found", kind, id)))
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        kind: LedgerKind,
        filter: StockEntryFilter,
    ) -> Result<Vec<stock_entry::Model>, ServiceError> {
        let (from, to) = DateRangeParams {
            from: filter.from,
            to: filter.to,
        }
        .bounds()?;

        let mut select =
            stock_entry::Entity::find().filter(stock_entry::Column::Ledger.eq(kind));
        if let Some(item_type) = filter.item_type {
            select = select.filter(stock_entry::Column::ItemType.eq(item_type));
        }
        if let Some(code) = filter.code {
            select = select.filter(stock_entry::Column::Code.eq(code));
        }
        if let Some(from) = from {
            select = select.filter(stock_entry::Column::Date.gte(from));
        }
        if let Some(to) = to {
            select = select.filter(to.condition(stock_entry::Column::Date));
        }

        Ok(select
            .order_by_desc(stock_entry::Column::UpdatedAt)
            .order_by_desc(stock_entry::Column::CreatedAt)
            .all(&*self.db)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn balance(
        &self,
        kind: LedgerKind,
        item_type: ItemType,
        code: &str,
    ) -> Result<StockLevel, ServiceError> {
        Self::check_item_type(kind, item_type)?;
        let snapshot = assets::snapshot(&*self.db, item_type, code)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("{} {} not found", item_type, code)))?;
        Ok(StockLevel {
            item_type,
            code: code.to_string(),
            balance: snapshot.balance,
            min_stock: snapshot.min_stock,
        })
    }

    #[instrument(skip(self))]
    pub async fn create(
        &self,
        kind: LedgerKind,
        input: CreateStockEntry,
    ) -> Result<stock_entry::Model, ServiceError> {
        input.validate()?;
        check_quantity(input.quantity)?;
        Self::check_item_type(kind, input.item_type)?;
        let date = parse_timestamp(&input.date)?;
        let code = input.code.trim().to_string();
        let extruder = crate::common::non_blank(input.extruder);

        let txn = db::begin(&self.db).await?;
        Self::require_asset(&txn, input.item_type, &code).await?;
        Self::require_extruder(&txn, kind, extruder.as_deref()).await?;

        let now = Utc::now();
        let id = Uuid::new_v4();
        stock_entry::ActiveModel {
            id: Set(id),
            ledger: Set(kind),
            date: Set(date),
            item_type: Set(input.item_type),
            code: Set(code.clone()),
            direction: Set(input.direction),
            quantity: Set(input.quantity),
            balance: Set(0.0),
            extruder: Set(extruder),
            reference: Set(input.reference),
            remarks: Set(input.remarks),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let level = rebalance_item(&txn, input.item_type, &code).await?;
        let entry = Self::find_entry(&txn, kind, id).await?;

        activity::record(
            &txn,
            format!("Create {}", kind),
            format!(
                "{} {} {} {} (balance {})",
                input.item_type, code, entry.direction, entry.quantity, level.balance
            ),
        )
        .await?;
        db::commit(txn, "stock.create").await?;

        info!(ledger = %kind, item_type = %input.item_type, code = %code, balance = level.balance, "Stock entry created");
        self.event_sender
            .publish(Event::created(kind.resource(), id))
            .await;
        self.event_sender.publish(level.into_event()).await;
        Ok(entry)
    }

    /// Applies a partial change. Moving an entry to another item rebalances both items.
    #[instrument(skip(self))]
    pub async fn update(
        &self,
        kind: LedgerKind,
        id: Uuid,
        input: UpdateStockEntry,
    ) -> Result<stock_entry::Model, ServiceError> {
        input.validate()?;
        if let Some(quantity) = input.quantity {
            check_quantity(quantity)?;
        }
        let date = input.date.as_deref().map(parse_timestamp).transpose()?;

        let txn = db::begin(&self.db).await?;
        let existing = Self::find_entry(&txn, kind, id).await?;
        let previous_item = (existing.item_type, existing.code.clone());

        let mut item_type = existing.item_type;
        let mut code = existing.code.clone();
        let mut direction = existing.direction;
        let mut quantity = existing.quantity;
        let mut extruder = existing.extruder.clone();
        let mut reference = existing.reference.clone();
        let mut remarks = existing.remarks.clone();
        let mut posted = existing.date;
        merge(&mut item_type, input.item_type);
        merge(&mut code, input.code.map(|c| c.trim().to_string()));
        merge(&mut direction, input.direction);
        merge(&mut quantity, input.quantity);
        merge(&mut posted, date);
        merge_opt(&mut extruder, input.extruder.map(|e| e.trim().to_string()));
        merge_opt(&mut reference, input.reference);
        merge_opt(&mut remarks, input.remarks);
        let extruder = extruder.filter(|e| !e.is_empty());

        Self::check_item_type(kind, item_type)?;
        if (item_type, code.as_str()) != (previous_item.0, previous_item.1.as_str()) {
            Self::require_asset(&txn, item_type, &code).await?;
        }
        if extruder != existing.extruder {
            Self::require_extruder(&txn, kind, extruder.as_deref()).await?;
        }

        let mut active: stock_entry::ActiveModel = existing.into();
        active.item_type = Set(item_type);
        active.code = Set(code.clone());
        active.direction = Set(direction);
        active.quantity = Set(quantity);
        active.date = Set(posted);
        active.extruder = Set(extruder);
        active.reference = Set(reference);
        active.remarks = Set(remarks);
        active.updated_at = Set(Utc::now());
        active.update(&txn).await?;

        let mut levels = vec![rebalance_item(&txn, item_type, &code).await?];
        if previous_item != (item_type, code.clone()) {
            levels.push(rebalance_item(&txn, previous_item.0, &previous_item.1).await?);
        }
        let entry = Self::find_entry(&txn, kind, id).await?;

        activity::record(
            &txn,
            format!("Update {}", kind),
            format!(
                "{} {} {} {} (balance {})",
                item_type, code, direction, quantity, levels[0].balance
            ),
        )
        .await?;
        db::commit(txn, "stock.update").await?;

        self.event_sender
            .publish(Event::updated(kind.resource(), id))
            .await;
        for level in levels {
            self.event_sender.publish(level.into_event()).await;
        }
        Ok(entry)
    }

    /// Deletes one entry. Removing a receipt that later issues depend on is
    /// rejected as insufficient balance.
    #[instrument(skip(self))]
    pub async fn delete(&self, kind: LedgerKind, id: Uuid) -> Result<(), ServiceError> {
        let txn = db::begin(&self.db).await?;
        let existing = Self::find_entry(&txn, kind, id).await?;

        stock_entry::Entity::delete_by_id(id).exec(&txn).await?;
        let level = rebalance_item(&txn, existing.item_type, &existing.code).await?;

        activity::record(
            &txn,
            format!("Delete {}", kind),
            format!(
                "{} {} {} {} removed (balance {})",
                existing.item_type, existing.code, existing.direction, existing.quantity, level.balance
            ),
        )
        .await?;
        db::commit(txn, "stock.delete").await?;

        warn!(ledger = %kind, id = %id, "Stock entry deleted");
        self.event_sender
            .publish(Event::deleted(kind.resource(), id, 0))
            .await;
        self.event_sender.publish(level.into_event()).await;
        Ok(())
    }
}
