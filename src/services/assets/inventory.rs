use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection,
    EntityTrait, QueryFilter, QueryOrder,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::{rekey_entries, DEFAULT_STATUS};
use crate::{
    db,
    entities::{inventory_item, ItemType},
    errors::ServiceError,
    events::{Event, EventSender},
    services::{activity, ensure_unique, merge, merge_opt},
};

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateInventoryItem {
    #[validate(length(min = 1, max = 100))]
    pub code: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub location: Option<String>,
    #[validate(range(min = 0.0))]
    pub min_stock: Option<f64>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateInventoryItem {
    #[validate(length(min = 1, max = 100))]
    pub code: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub location: Option<String>,
    #[validate(range(min = 0.0))]
    pub min_stock: Option<f64>,
    pub status: Option<String>,
}

/// Service for general inventory items
#[derive(Clone)]
pub struct InventoryService {
    db: Arc<DatabaseConnection>,
    event_sender: EventSender,
}

impl InventoryService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        status: Option<String>,
    ) -> Result<Vec<inventory_item::Model>, ServiceError> {
        let mut select = inventory_item::Entity::find();
        if let Some(status) = status {
            select = select.filter(inventory_item::Column::Status.eq(status));
        }
        Ok(select
            .order_by_desc(inventory_item::Column::UpdatedAt)
            .order_by_desc(inventory_item::Column::CreatedAt)
            .all(&*self.db)
            .await?)
    }

    /// Items whose balance is at or below their minimum stock
    #[instrument(skip(self))]
    pub async fn low_stock(&self) -> Result<Vec<inventory_item::Model>, ServiceError> {
        Ok(inventory_item::Entity::find()
            .filter(
                Expr::col(inventory_item::Column::Balance)
                    .lte(Expr::col(inventory_item::Column::MinStock)),
            )
            .order_by_asc(inventory_item::Column::Code)
            .all(&*self.db)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn create(
        &self,
        input: CreateInventoryItem,
    ) -> Result<inventory_item::Model, ServiceError> {
        input.validate()?;
        let code = input.code.trim().to_string();

        let txn = db::begin(&self.db).await?;
        ensure_unique(
            &txn,
            inventory_item::Entity::find().filter(inventory_item::Column::Code.eq(code.as_str())),
            "Inventory",
            &code,
        )
        .await?;

        let now = Utc::now();
        let item = inventory_item::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(code),
            name: Set(input.name),
            category: Set(input.category),
            unit: Set(input.unit),
            location: Set(input.location),
            min_stock: Set(input.min_stock.unwrap_or(0.0)),
            balance: Set(0.0),
            status: Set(input.status.unwrap_or_else(|| DEFAULT_STATUS.to_string())),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        activity::record(
            &txn,
            "Create Inventory",
            format!("Inventory item {} ({}) created", item.code, item.name),
        )
        .await?;
        db::commit(txn, "inventory.create").await?;

        info!(code = %item.code, "Inventory item created");
        self.event_sender
            .publish(Event::created("inventory", item.id))
            .await;
        Ok(item)
    }

    #[instrument(skip(self))]
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateInventoryItem,
    ) -> Result<inventory_item::Model, ServiceError> {
        input.validate()?;

        let txn = db::begin(&self.db).await?;
        let mut item = inventory_item::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Inventory item {} not found", id)))?;
        let old_code = item.code.clone();

        if let Some(code) = input.code.map(|c| c.trim().to_string()) {
            if code != old_code {
                ensure_unique(
                    &txn,
                    inventory_item::Entity::find()
                        .filter(inventory_item::Column::Code.eq(code.as_str()))
                        .filter(inventory_item::Column::Id.ne(id)),
                    "Inventory",
                    &code,
                )
                .await?;
                rekey_entries(&txn, ItemType::Inventory, &old_code, &code).await?;
            }
            item.code = code;
        }
        merge(&mut item.name, input.name);
        merge_opt(&mut item.category, input.category);
        merge_opt(&mut item.unit, input.unit);
        merge_opt(&mut item.location, input.location);
        merge(&mut item.min_stock, input.min_stock);
        merge(&mut item.status, input.status);

        let mut active: inventory_item::ActiveModel = item.into();
        active.updated_at = Set(Utc::now());
        // Every column is written back
        let active = active.reset_all();
        let item = active.update(&txn).await?;

        activity::record(
            &txn,
            "Update Inventory",
            format!("Inventory item {} updated", item.code),
        )
        .await?;
        db::commit(txn, "inventory.update").await?;

        self.event_sender
            .publish(Event::updated("inventory", item.id))
            .await;
        Ok(item)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let txn = db::begin(&self.db).await?;
        let item = inventory_item::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Inventory item {} not found", id)))?;

        inventory_item::Entity::delete_by_id(id).exec(&txn).await?;
        activity::record(
            &txn,
            "Delete Inventory",
            format!("Inventory item {} ({}) deleted", item.code, item.name),
        )
        .await?;
        db::commit(txn, "inventory.delete").await?;

        self.event_sender
            .publish(Event::deleted("inventory", id, 0))
            .await;
        Ok(())
    }
}
