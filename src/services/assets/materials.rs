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
    entities::{material, ItemType},
    errors::ServiceError,
    events::{Event, EventSender},
    services::{activity, ensure_unique, merge, merge_opt},
};

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateMaterial {
    #[validate(length(min = 1, max = 100))]
    pub code: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub grade: Option<String>,
    pub supplier: Option<String>,
    pub unit: Option<String>,
    #[validate(range(min = 0.0))]
    pub min_stock: Option<f64>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateMaterial {
    #[validate(length(min = 1, max = 100))]
    pub code: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub grade: Option<String>,
    pub supplier: Option<String>,
    pub unit: Option<String>,
    #[validate(range(min = 0.0))]
    pub min_stock: Option<f64>,
    pub status: Option<String>,
}

/// Service for raw materials
#[derive(Clone)]
pub struct MaterialService {
    db: Arc<DatabaseConnection>,
    event_sender: EventSender,
}

impl MaterialService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        status: Option<String>,
    ) -> Result<Vec<material::Model>, ServiceError> {
        let mut select = material::Entity::find();
        if let Some(status) = status {
            select = select.filter(material::Column::Status.eq(status));
        }
        Ok(select
            .order_by_desc(material::Column::UpdatedAt)
            .order_by_desc(material::Column::CreatedAt)
            .all(&*self.db)
            .await?)
    }

    /// Materials whose balance is at or below their minimum stock
    #[instrument(skip(self))]
    pub async fn low_stock(&self) -> Result<Vec<material::Model>, ServiceError> {
        Ok(material::Entity::find()
            .filter(
                Expr::col(material::Column::Balance)
                    .lte(Expr::col(material::Column::MinStock)),
            )
            .order_by_asc(material::Column::Code)
            .all(&*self.db)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn create(
        &self,
        input: CreateMaterial,
    ) -> Result<material::Model, ServiceError> {
        input.validate()?;
        let code = input.code.trim().to_string();

        let txn = db::begin(&self.db).await?;
        ensure_unique(
            &txn,
            material::Entity::find().filter(material::Column::Code.eq(code.as_str())),
            "Material",
            &code,
        )
        .await?;

        let now = Utc::now();
        let item = material::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(code),
            name: Set(input.name),
            grade: Set(input.grade),
            supplier: Set(input.supplier),
            unit: Set(input.unit),
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
            "Create Material",
            format!("Material {} ({}) created", item.code, item.name),
        )
        .await?;
        db::commit(txn, "material.create").await?;

        info!(code = %item.code, grade = ?item.grade, "Material created");
        self.event_sender
            .publish(Event::created("material", item.id))
            .await;
        Ok(item)
    }

    #[instrument(skip(self))]
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateMaterial,
    ) -> Result<material::Model, ServiceError> {
        input.validate()?;

        let txn = db::begin(&self.db).await?;
        let mut item = material::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Material {} not found", id)))?;
        let old_code = item.code.clone();

        if let Some(code) = input.code.map(|c| c.trim().to_string()) {
            if code != old_code {
                ensure_unique(
                    &txn,
                    material::Entity::find()
                        .filter(material::Column::Code.eq(code.as_str()))
                        .filter(material::Column::Id.ne(id)),
                    "Material",
                    &code,
                )
                .await?;
                rekey_entries(&txn, ItemType::Material, &old_code, &code).await?;
            }
            item.code = code;
        }
        merge(&mut item.name, input.name);
        merge_opt(&mut item.grade, input.grade);
        merge_opt(&mut item.supplier, input.supplier);
        merge_opt(&mut item.unit, input.unit);
        merge(&mut item.min_stock, input.min_stock);
        merge(&mut item.status, input.status);

        let mut active: material::ActiveModel = item.into();
        active.updated_at = Set(Utc::now());
        // Every column is written back
        let active = active.reset_all();
        let item = active.update(&txn).await?;

        activity::record(
            &txn,
            "Update Material",
            format!("Material {} updated", item.code),
        )
        .await?;
        db::commit(txn, "material.update").await?;

        self.event_sender
            .publish(Event::updated("material", item.id))
            .await;
        Ok(item)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let txn = db::begin(&self.db).await?;
        let item = material::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Material {} not found", id)))?;

        material::Entity::delete_by_id(id).exec(&txn).await?;
        activity::record(
            &txn,
            "Delete Material",
            format!("Material {} ({}) deleted", item.code, item.name),
        )
        .await?;
        db::commit(txn, "material.delete").await?;

        self.event_sender
            .publish(Event::deleted("material", id, 0))
            .await;
        Ok(())
    }
}
