use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::instrument;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{parse_timestamp, DateRangeParams},
    db,
    entities::cost,
    errors::ServiceError,
    events::{Event, EventSender},
    services::{activity, merge, merge_opt},
};

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCost {
    pub date: String,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub amount: f64,
    pub reference: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCost {
    pub date: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub category: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub amount: Option<f64>,
    pub reference: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CostFilter {
    pub category: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Operating costs
#[derive(Clone)]
pub struct CostService {
    db: Arc<DatabaseConnection>,
    event_sender: EventSender,
}

impl CostService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, filter: CostFilter) -> Result<Vec<cost::Model>, ServiceError> {
        let (from, to) = DateRangeParams {
            from: filter.from,
            to: filter.to,
        }
        .bounds()?;

        let mut select = cost::Entity::find();
        if let Some(category) = filter.category {
            select = select.filter(cost::Column::Category.eq(category));
        }
        if let Some(from) = from {
            select = select.filter(cost::Column::Date.gte(from));
        }
        if let Some(to) = to {
            select = select.filter(to.condition(cost::Column::Date));
        }
        Ok(select
            .order_by_desc(cost::Column::UpdatedAt)
            .order_by_desc(cost::Column::CreatedAt)
            .all(&*self.db)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn create(&self, input: CreateCost) -> Result<cost::Model, ServiceError> {
        input.validate()?;
        let date = parse_timestamp(&input.date)?;

        let txn = db::begin(&self.db).await?;
        let now = Utc::now();
        let created = cost::ActiveModel {
            id: Set(Uuid::new_v4()),
            date: Set(date),
            category: Set(input.category),
            description: Set(input.description),
            amount: Set(input.amount),
            reference: Set(input.reference),
            remarks: Set(input.remarks),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        activity::record(
            &txn,
            "Create Cost",
            format!("{} cost of {} recorded", created.category, created.amount),
        )
        .await?;
        db::commit(txn, "cost.create").await?;

        self.event_sender
            .publish(Event::created("cost", created.id))
            .await;
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn update(&self, id: Uuid, input: UpdateCost) -> Result<cost::Model, ServiceError> {
        input.validate()?;
        let date = input.date.as_deref().map(parse_timestamp).transpose()?;

        let txn = db::begin(&self.db).await?;
        let mut existing = cost::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Cost {} not found", id)))?;

        merge(&mut existing.date, date);
        merge(&mut existing.category, input.category);
        merge_opt(&mut existing.description, input.description);
        merge(&mut existing.amount, input.amount);
        merge_opt(&mut existing.reference, input.reference);
        merge_opt(&mut existing.remarks, input.remarks);

        let mut active: cost::ActiveModel = existing.into();
        active.updated_at = Set(Utc::now());
        let updated = active.reset_all().update(&txn).await?;

        activity::record(
            &txn,
            "Update Cost",
            format!("{} cost updated to {}", updated.category, updated.amount),
        )
        .await?;
        db::commit(txn, "cost.update").await?;

        self.event_sender
            .publish(Event::updated("cost", updated.id))
            .await;
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let txn = db::begin(&self.db).await?;
        let existing = cost::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Cost {} not found", id)))?;

        cost::Entity::delete_by_id(id).exec(&txn).await?;
        activity::record(
            &txn,
            "Delete Cost",
            format!("{} cost of {} deleted", existing.category, existing.amount),
        )
        .await?;
        db::commit(txn, "cost.delete").await?;

        self.event_sender
            .publish(Event::deleted("cost", id, 0))
            .await;
        Ok(())
    }
}
