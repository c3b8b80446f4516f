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

use super::{delete_entries, rekey_entries, DEFAULT_STATUS};
use crate::{
    db,
    entities::{other_asset, ItemType},
    errors::ServiceError,
    events::{Event, EventSender},
    services::{activity, ensure_unique, merge, merge_opt},
};

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateOtherAsset {
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
pub struct UpdateOtherAsset {
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

/// Service for consumables and tools tracked through transactions
#[derive(Clone)]
pub struct OtherAssetService {
    db: Arc<DatabaseConnection>,
    event_sender: EventSender,
}

impl OtherAssetService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        status: Option<String>,
    ) -> Result<Vec<other_asset::Model>, ServiceError> {
        let mut select = other_asset::Entity::find();
        if let Some(status) = status {
            select = select.filter(other_asset::Column::Status.eq(status));
        }
        Ok(select
            .order_by_desc(other_asset::Column::UpdatedAt)
            .order_by_desc(other_asset::Column::CreatedAt)
            .all(&*self.db)
            .await?)
    }

    /// Assets whose balance is at or below their minimum stock
    #[instrument(skip(self))]
    pub async fn low_stock(&self) -> Result<Vec<other_asset::Model>, ServiceError> {
        Ok(other_asset::Entity::find()
            .filter(
                Expr::col(other_asset::Column::Balance)
                    .lte(Expr::col(other_asset::Column::MinStock)),
            )
            .order_by_asc(other_asset::Column::Code)
            .all(&*self.db)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn create(
        &self,
        input: CreateOtherAsset,
    ) -> Result<other_asset::Model, ServiceError> {
        input.validate()?;
        let code = input.code.trim().to_string();

        let txn = db::begin(&self.db).await?;
        ensure_unique(
            &txn,
            other_asset::Entity::find().filter(other_asset::Column::Code.eq(code.as_str())),
            "Other",
            &code,
        )
        .await?;

        let now = Utc::now();
        let item = other_asset::ActiveModel {
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
            "Create Other",
            format!("Asset {} ({}) created", item.code, item.name),
        )
        .await?;
        db::commit(txn, "other.create").await?;

        info!(code = %item.code, "Asset created");
        self.event_sender
            .publish(Event::created("other", item.id))
            .await;
        Ok(item)
    }

    #[instrument(skip(self))]
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateOtherAsset,
    ) -> Result<other_asset::Model, ServiceError> {
        input.validate()?;

        let txn = db::begin(&self.db).await?;
        let mut item = other_asset::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Asset {} not found", id)))?;
        let old_code = item.code.clone();

        if let Some(code) = input.code.map(|c| c.trim().to_string()) {
            if code != old_code {
                ensure_unique(
                    &txn,
                    other_asset::Entity::find()
                        .filter(other_asset::Column::Code.eq(code.as_str()))
                        .filter(other_asset::Column::Id.ne(id)),
                    "Other",
                    &code,
                )
                .await?;
                rekey_entries(&txn, ItemType::Other, &old_code, &code).await?;
            }
            item.code = code;
        }
        merge(&mut item.name, input.name);
        merge_opt(&mut item.category, input.category);
        merge_opt(&mut item.unit, input.unit);
        merge_opt(&mut item.location, input.location);
        merge(&mut item.min_stock, input.min_stock);
        merge(&mut item.status, input.status);

        let mut active: other_asset::ActiveModel = item.into();
        active.updated_at = Set(Utc::now());
        // Every column is written back
        let active = active.reset_all();
        let item = active.update(&txn).await?;

        activity::record(
            &txn,
            "Update Other",
            format!("Asset {} updated", item.code),
        )
        .await?;
        db::commit(txn, "other.update").await?;

        self.event_sender
            .publish(Event::updated("other", item.id))
            .await;
        Ok(item)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let txn = db::begin(&self.db).await?;
        let item = other_asset::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Asset {} not found", id)))?;

        let cascaded = delete_entries(&txn, ItemType::Other, &item.code).await?;
        other_asset::Entity::delete_by_id(id).exec(&txn).await?;
        activity::record(
            &txn,
            "Delete Other",
            format!(
                "Asset {} ({}) deleted with {} transactions",
                item.code, item.name, cascaded
            ),
        )
        .await?;
        db::commit(txn, "other.delete").await?;

        self.event_sender
            .publish(Event::deleted("other", id, cascaded))
            .await;
        Ok(())
    }
}
