use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::instrument;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{common::DateRangeParams, entities::activity, errors::ServiceError};

pub const DEFAULT_LIMIT: u64 = 200;
pub const MAX_LIMIT: u64 = 1000;

/// Appends an audit line. Callers pass their open transaction so the line
/// commits or rolls back with the change it describes.
pub async fn record<C: ConnectionTrait>(
    conn: &C,
    action: impl Into<String>,
    detail: impl Into<String>,
) -> Result<(), ServiceError> {
    activity::ActiveModel {
        id: Set(Uuid::new_v4()),
        date: Set(Utc::now()),
        activity: Set(action.into()),
        detail: Set(detail.into()),
    }
    .insert(conn)
    .await?;
    Ok(())
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ActivityQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<u64>,
}

/// Read side of the audit log
#[derive(Clone)]
pub struct ActivityService {
    db: Arc<DatabaseConnection>,
}

impl ActivityService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Newest first, capped at [`MAX_LIMIT`] rows
    #[instrument(skip(self))]
    pub async fn list(&self, query: ActivityQuery) -> Result<Vec<activity::Model>, ServiceError> {
        let range = DateRangeParams {
            from: query.from,
            to: query.to,
        };
        let (from, to) = range.bounds()?;
        let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

        let mut select = activity::Entity::find();
        if let Some(from) = from {
            select = select.filter(activity::Column::Date.gte(from));
        }
        if let Some(to) = to {
            select = select.filter(to.condition(activity::Column::Date));
        }

        Ok(select
            .order_by_desc(activity::Column::Date)
            .limit(limit)
            .all(&*self.db)
            .await?)
    }
}
