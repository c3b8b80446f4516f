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

use crate::{
    db,
    entities::supplier,
    errors::ServiceError,
    events::{Event, EventSender},
    services::{activity, ensure_unique, merge, merge_opt},
};

const DEFAULT_STATUS: &str = "Active";

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateSupplier {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub contact: Option<String>,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub address: Option<String>,
    pub status: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateSupplier {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub contact: Option<String>,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub address: Option<String>,
    pub status: Option<String>,
    pub remarks: Option<String>,
}

/// Service for managing suppliers
#[derive(Clone)]
pub struct SupplierService {
    db: Arc<DatabaseConnection>,
    event_sender: EventSender,
}

impl SupplierService {
    /// Creates a new supplier service instance
    pub fn new(db: Arc<DatabaseConnection>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    /// Lists suppliers, most recently touched first
    #[instrument(skip(self))]
    pub async fn list(&self, status: Option<String>) -> Result<Vec<supplier::Model>, ServiceError> {
        let mut select = supplier::Entity::find();
        if let Some(status) = status {
            select = select.filter(supplier::Column::Status.eq(status));
        }
        Ok(select
            .order_by_desc(supplier::Column::UpdatedAt)
            .order_by_desc(supplier::Column::CreatedAt)
            .all(&*self.db)
            .await?)
    }

    /// Creates a new supplier
    #[instrument(skip(self))]
    pub async fn create(&self, input: CreateSupplier) -> Result<supplier::Model, ServiceError> {
        input.validate()?;
        let name = input.name.trim().to_string();

        let txn = db::begin(&self.db).await?;
        ensure_unique(
            &txn,
            supplier::Entity::find().filter(supplier::Column::Name.eq(name.as_str())),
            "Supplier",
            &name,
        )
        .await?;

        let now = Utc::now();
        let created = supplier::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            contact: Set(input.contact),
            phone: Set(input.phone),
            email: Set(input.email),
            address: Set(input.address),
            status: Set(input.status.unwrap_or_else(|| DEFAULT_STATUS.to_string())),
            remarks: Set(input.remarks),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        activity::record(
            &txn,
            "Create Supplier",
            format!("Supplier {} created", created.name),
        )
        .await?;
        db::commit(txn, "supplier.create").await?;

        info!(supplier_id = %created.id, "Supplier created");
        self.event_sender
            .publish(Event::created("supplier", created.id))
            .await;
        Ok(created)
    }

    /// Updates an existing supplier
    #[instrument(skip(self))]
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateSupplier,
    ) -> Result<supplier::Model, ServiceError> {
        input.validate()?;

        let txn = db::begin(&self.db).await?;
        let mut existing = supplier::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Supplier {} not found", id)))?;

        if let Some(name) = input.name.map(|n| n.trim().to_string()) {
            if name != existing.name {
                ensure_unique(
                    &txn,
                    supplier::Entity::find()
                        .filter(supplier::Column::Name.eq(name.as_str()))
                        .filter(supplier::Column::Id.ne(id)),
                    "Supplier",
                    &name,
                )
                .await?;
            }
            existing.name = name;
        }
        merge_opt(&mut existing.contact, input.contact);
        merge_opt(&mut existing.phone, input.phone);
        merge_opt(&mut existing.email, input.email);
        merge_opt(&mut existing.address, input.address);
        merge(&mut existing.status, input.status);
        merge_opt(&mut existing.remarks, input.remarks);

        let mut active: supplier::ActiveModel = existing.into();
        active.updated_at = Set(Utc::now());
        let updated = active.reset_all().update(&txn).await?;

        activity::record(
            &txn,
            "Update Supplier",
            format!("Supplier {} updated", updated.name),
        )
        .await?;
        db::commit(txn, "supplier.update").await?;

        self.event_sender
            .publish(Event::updated("supplier", updated.id))
            .await;
        Ok(updated)
    }

    /// Deletes a supplier
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let txn = db::begin(&self.db).await?;
        let existing = supplier::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Supplier {} not found", id)))?;

        supplier::Entity::delete_by_id(id).exec(&txn).await?;
        activity::record(
            &txn,
            "Delete Supplier",
            format!("Supplier {} deleted", existing.name),
        )
        .await?;
        db::commit(txn, "supplier.delete").await?;

        self.event_sender
            .publish(Event::deleted("supplier", id, 0))
            .await;
        Ok(())
    }
}
