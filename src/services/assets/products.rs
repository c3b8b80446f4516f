use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder,
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
    entities::{product, ItemType},
    errors::ServiceError,
    events::{Event, EventSender},
    services::{activity, ensure_unique, merge, merge_opt},
};

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 100))]
    pub code: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
    /// Material code the product is made from
    pub material: Option<String>,
    pub unit: Option<String>,
    #[validate(range(min = 0.0))]
    pub weight: Option<f64>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProduct {
    #[validate(length(min = 1, max = 100))]
    pub code: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub description: Option<String>,
    /// Material code the product is made from
    pub material: Option<String>,
    pub unit: Option<String>,
    #[validate(range(min = 0.0))]
    pub weight: Option<f64>,
    pub status: Option<String>,
}

/// Service for finished products
#[derive(Clone)]
pub struct ProductService {
    db: Arc<DatabaseConnection>,
    event_sender: EventSender,
}

impl ProductService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        status: Option<String>,
    ) -> Result<Vec<product::Model>, ServiceError> {
        let mut select = product::Entity::find();
        if let Some(status) = status {
            select = select.filter(product::Column::Status.eq(status));
        }
        Ok(select
            .order_by_desc(product::Column::UpdatedAt)
            .order_by_desc(product::Column::CreatedAt)
            .all(&*self.db)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn create(
        &self,
        input: CreateProduct,
    ) -> Result<product::Model, ServiceError> {
        input.validate()?;
        let code = input.code.trim().to_string();

        let txn = db::begin(&self.db).await?;
        ensure_unique(
            &txn,
            product::Entity::find().filter(product::Column::Code.eq(code.as_str())),
            "Product",
            &code,
        )
        .await?;

        let now = Utc::now();
        let item = product::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(code),
            name: Set(input.name),
            description: Set(input.description),
            material: Set(input.material),
            unit: Set(input.unit),
            weight: Set(input.weight),
            balance: Set(0.0),
            status: Set(input.status.unwrap_or_else(|| DEFAULT_STATUS.to_string())),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        activity::record(
            &txn,
            "Create Product",
            format!("Product {} ({}) created", item.code, item.name),
        )
        .await?;
        db::commit(txn, "product.create").await?;

        info!(code = %item.code, "Product created");
        self.event_sender
            .publish(Event::created("product", item.id))
            .await;
        Ok(item)
    }

    #[instrument(skip(self))]
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateProduct,
    ) -> Result<product::Model, ServiceError> {
        input.validate()?;

        let txn = db::begin(&self.db).await?;
        let mut item = product::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", id)))?;
        let old_code = item.code.clone();

        if let Some(code) = input.code.map(|c| c.trim().to_string()) {
            if code != old_code {
                ensure_unique(
                    &txn,
                    product::Entity::find()
                        .filter(product::Column::Code.eq(code.as_str()))
                        .filter(product::Column::Id.ne(id)),
                    "Product",
                    &code,
                )
                .await?;
                rekey_entries(&txn, ItemType::Product, &old_code, &code).await?;
            }
            item.code = code;
        }
        merge(&mut item.name, input.name);
        merge_opt(&mut item.description, input.description);
        merge_opt(&mut item.material, input.material);
        merge_opt(&mut item.unit, input.unit);
        merge_opt(&mut item.weight, input.weight);
        merge(&mut item.status, input.status);

        let mut active: product::ActiveModel = item.into();
        active.updated_at = Set(Utc::now());
        // Every column is written back
        let active = active.reset_all();
        let item = active.update(&txn).await?;

        activity::record(
            &txn,
            "Update Product",
            format!("Product {} updated", item.code),
        )
        .await?;
        db::commit(txn, "product.update").await?;

        self.event_sender
            .publish(Event::updated("product", item.id))
            .await;
        Ok(item)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let txn = db::begin(&self.db).await?;
        let item = product::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", id)))?;

        product::Entity::delete_by_id(id).exec(&txn).await?;
        activity::record(
            &txn,
            "Delete Product",
            format!("Product {} ({}) deleted", item.code, item.name),
        )
        .await?;
        db::commit(txn, "product.delete").await?;

        self.event_sender
            .publish(Event::deleted("product", id, 0))
            .await;
        Ok(())
    }
}
