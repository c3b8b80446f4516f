use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection,
    EntityTrait, QueryFilter, QueryOrder,
};
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::DEFAULT_STATUS;
use crate::{
    db,
    entities::{extruder, maintenance_record, production_record, stock_entry},
    errors::ServiceError,
    events::{Event, EventSender},
    services::{activity, ensure_unique, merge, merge_opt, stock::rebalance_item},
};

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateExtruder {
    #[validate(length(min = 1, max = 100))]
    pub code: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub model: Option<String>,
    /// kg per hour
    #[validate(range(min = 0.0))]
    pub capacity: Option<f64>,
    pub location: Option<String>,
    pub status: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateExtruder {
    #[validate(length(min = 1, max = 100))]
    pub code: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub model: Option<String>,
    #[validate(range(min = 0.0))]
    pub capacity: Option<f64>,
    pub location: Option<String>,
    pub status: Option<String>,
    pub remarks: Option<String>,
}

/// Service for production lines
#[derive(Clone)]
pub struct ExtruderService {
    db: Arc<DatabaseConnection>,
    event_sender: EventSender,
}

impl ExtruderService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, status: Option<String>) -> Result<Vec<extruder::Model>, ServiceError> {
        let mut select = extruder::Entity::find();
        if let Some(status) = status {
            select = select.filter(extruder::Column::Status.eq(status));
        }
        Ok(select
            .order_by_desc(extruder::Column::UpdatedAt)
            .order_by_desc(extruder::Column::CreatedAt)
            .all(&*self.db)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn create(&self, input: CreateExtruder) -> Result<extruder::Model, ServiceError> {
        input.validate()?;
        let code = input.code.trim().to_string();

        let txn = db::begin(&self.db).await?;
        ensure_unique(
            &txn,
            extruder::Entity::find().filter(extruder::Column::Code.eq(code.as_str())),
            "Extruder",
            &code,
        )
        .await?;

        let now = Utc::now();
        let line = extruder::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(code),
            name: Set(input.name),
            model: Set(input.model),
            capacity: Set(input.capacity),
            location: Set(input.location),
            status: Set(input.status.unwrap_or_else(|| DEFAULT_STATUS.to_string())),
            remarks: Set(input.remarks),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        activity::record(
            &txn,
            "Create Extruder",
            format!("Extruder {} ({}) created", line.code, line.name),
        )
        .await?;
        db::commit(txn, "extruder.create").await?;

        info!(code = %line.code, "Extruder created");
        self.event_sender
            .publish(Event::created("extruder", line.id))
            .await;
        Ok(line)
    }

    /// Renaming the code carries transactions and maintenance records along.
    #[instrument(skip(self))]
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateExtruder,
    ) -> Result<extruder::Model, ServiceError> {
        input.validate()?;

        let txn = db::begin(&self.db).await?;
        let mut line = extruder::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Extruder {} not found", id)))?;
        let old_code = line.code.clone();

        if let Some(code) = input.code.map(|c| c.trim().to_string()) {
            if code != old_code {
                ensure_unique(
                    &txn,
                    extruder::Entity::find()
                        .filter(extruder::Column::Code.eq(code.as_str()))
                        .filter(extruder::Column::Id.ne(id)),
                    "Extruder",
                    &code,
                )
                .await?;

                stock_entry::Entity::update_many()
                    .col_expr(stock_entry::Column::Extruder, Expr::value(code.as_str()))
                    .filter(stock_entry::Column::Extruder.eq(old_code.as_str()))
                    .exec(&txn)
                    .await?;
                maintenance_record::Entity::update_many()
                    .col_expr(
                        maintenance_record::Column::Extruder,
                        Expr::value(code.as_str()),
                    )
                    .filter(maintenance_record::Column::Extruder.eq(old_code.as_str()))
                    .exec(&txn)
                    .await?;
                production_record::Entity::update_many()
                    .col_expr(
                        production_record::Column::Extruder,
                        Expr::value(code.as_str()),
                    )
                    .filter(production_record::Column::Extruder.eq(old_code.as_str()))
                    .exec(&txn)
                    .await?;
            }
            line.code = code;
        }
        merge(&mut line.name, input.name);
        merge_opt(&mut line.model, input.model);
        merge_opt(&mut line.capacity, input.capacity);
        merge_opt(&mut line.location, input.location);
        merge(&mut line.status, input.status);
        merge_opt(&mut line.remarks, input.remarks);

        let mut active: extruder::ActiveModel = line.into();
        active.updated_at = Set(Utc::now());
        let line = active.reset_all().update(&txn).await?;

        activity::record(
            &txn,
            "Update Extruder",
            format!("Extruder {} updated", line.code),
        )
        .await?;
        db::commit(txn, "extruder.update").await?;

        self.event_sender
            .publish(Event::updated("extruder", line.id))
            .await;
        Ok(line)
    }

    /// Deletes the extruder and every transaction issued to it, then
    /// rebalances the parts those transactions touched.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let txn = db::begin(&self.db).await?;
        let line = extruder::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Extruder {} not found", id)))?;

        let issued = stock_entry::Entity::find()
            .filter(stock_entry::Column::Extruder.eq(line.code.as_str()))
            .all(&txn)
            .await?;
        let touched: HashSet<_> = issued
            .iter()
            .map(|entry| (entry.item_type, entry.code.clone()))
            .collect();

        let cascaded = stock_entry::Entity::delete_many()
            .filter(stock_entry::Column::Extruder.eq(line.code.as_str()))
            .exec(&txn)
            .await?
            .rows_affected;

        let mut levels = Vec::with_capacity(touched.len());
        for (item_type, code) in &touched {
            levels.push(rebalance_item(&txn, *item_type, code).await?);
        }

        extruder::Entity::delete_by_id(id).exec(&txn).await?;
        activity::record(
            &txn,
            "Delete Extruder",
            format!(
                "Extruder {} ({}) deleted with {} transactions",
                line.code, line.name, cascaded
            ),
        )
        .await?;
        db::commit(txn, "extruder.delete").await?;

        self.event_sender
            .publish(Event::deleted("extruder", id, cascaded))
            .await;
        for level in levels {
            self.event_sender.publish(level.into_event()).await;
        }
        Ok(())
    }
}
