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
    entities::{sparepart, ItemType},
    errors::ServiceError,
    events::{Event, EventSender},
    services::{activity, ensure_unique, merge, merge_opt},
};

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateSparepart {
    #[validate(length(min = 1, max = 100))]
    pub code: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Extruder code the part is dedicated to
    pub extruder: Option<String>,
    pub unit: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    pub supplier: Option<String>,
    pub location: Option<String>,
    #[validate(range(min = 0.0))]
    pub min_stock: Option<f64>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateSparepart {
    #[validate(length(min = 1, max = 100))]
    pub code: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    /// Extruder code the part is dedicated to
    pub extruder: Option<String>,
    pub unit: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    pub supplier: Option<String>,
    pub location: Option<String>,
    #[validate(range(min = 0.0))]
    pub min_stock: Option<f64>,
    pub status: Option<String>,
}

/// Service for extruder spareparts
#[derive(Clone)]
pub struct SparepartService {
    db: Arc<DatabaseConnection>,
    event_sender: EventSender,
}

impl SparepartService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        status: Option<String>,
    ) -> Result<Vec<sparepart::Model>, ServiceError> {
        let mut select = sparepart::Entity::find();
        if let Some(status) = status {
            select = select.filter(sparepart::Column::Status.eq(status));
        }
        Ok(select
            .order_by_desc(sparepart::Column::UpdatedAt)
            .order_by_desc(sparepart::Column::CreatedAt)
            .all(&*self.db)
            .await?)
    }

    /// Spareparts whose balance is at or below their minimum stock
    #[instrument(skip(self))]
    pub async fn low_stock(&self) -> Result<Vec<sparepart::Model>, ServiceError> {
        Ok(sparepart::Entity::find()
            .filter(
                Expr::col(sparepart::Column::Balance)
                    .lte(Expr::col(sparepart::Column::MinStock)),
            )
            .order_by_asc(sparepart::Column::Code)
            .all(&*self.db)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn create(
        &self,
        input: CreateSparepart,
    ) -> Result<sparepart::Model, ServiceError> {
        input.validate()?;
        let code = input.code.trim().to_string();

        let txn = db::begin(&self.db).await?;
        ensure_unique(
            &txn,
            sparepart::Entity::find().filter(sparepart::Column::Code.eq(code.as_str())),
            "Sparepart",
            &code,
        )
        .await?;

        let now = Utc::now();
        let item = sparepart::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(code),
            name: Set(input.name),
            extruder: Set(input.extruder),
            unit: Set(input.unit),
            price: Set(input.price),
            supplier: Set(input.supplier),
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
            "Create Sparepart",
            format!("Sparepart {} ({}) created", item.code, item.name),
        )
        .await?;
        db::commit(txn, "sparepart.create").await?;

        info!(code = %item.code, "Sparepart created");
        self.event_sender
            .publish(Event::created("sparepart", item.id))
            .await;
        Ok(item)
    }

    #[instrument(skip(self))]
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateSparepart,
    ) -> Result<sparepart::Model, ServiceError> {
        input.validate()?;

        let txn = db::begin(&self.db).await?;
        let mut item = sparepart::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Sparepart {} not found", id)))?;
        let old_code = item.code.clone();

        if let Some(code) = input.code.map(|c| c.trim().to_string()) {
            if code != old_code {
                ensure_unique(
                    &txn,
                    sparepart::Entity::find()
                        .filter(sparepart::Column::Code.eq(code.as_str()))
                        .filter(sparepart::Column::Id.ne(id)),
                    "Sparepart",
                    &code,
                )
                .await?;
                rekey_entries(&txn, ItemType::Sparepart, &old_code, &code).await?;
            }
            item.code = code;
        }
        merge(&mut item.name, input.name);
        merge_opt(&mut item.extruder, input.extruder);
        merge_opt(&mut item.unit, input.unit);
        merge_opt(&mut item.price, input.price);
        merge_opt(&mut item.supplier, input.supplier);
        merge_opt(&mut item.location, input.location);
        merge(&mut item.min_stock, input.min_stock);
        merge(&mut item.status, input.status);

        let mut active: sparepart::ActiveModel = item.into();
        active.updated_at = Set(Utc::now());
        // Every column is written back
        let active = active.reset_all();
        let item = active.update(&txn).await?;

        activity::record(
            &txn,
            "Update Sparepart",
            format!("Sparepart {} updated", item.code),
        )
        .await?;
        db::commit(txn, "sparepart.update").await?;

        self.event_sender
            .publish(Event::updated("sparepart", item.id))
            .await;
        Ok(item)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let txn = db::begin(&self.db).await?;
        let item = sparepart::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Sparepart {} not found", id)))?;

        let cascaded = delete_entries(&txn, ItemType::Sparepart, &item.code).await?;
        sparepart::Entity::delete_by_id(id).exec(&txn).await?;
        activity::record(
            &txn,
            "Delete Sparepart",
            format!(
                "Sparepart {} ({}) deleted with {} transactions",
                item.code, item.name, cascaded
            ),
        )
        .await?;
        db::commit(txn, "sparepart.delete").await?;

        self.event_sender
            .publish(Event::deleted("sparepart", id, cascaded))
            .await;
        Ok(())
    }
}
