use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::parse_timestamp,
    db,
    entities::{extruder, maintenance_record},
    errors::ServiceError,
    events::{Event, EventSender},
    services::{activity, merge, merge_opt},
};

const DEFAULT_TYPE: &str = "Preventive";
const DEFAULT_STATUS: &str = "Incomplete";

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateMaintenance {
    pub date: String,
    #[validate(length(min = 1, max = 100))]
    pub extruder: String,
    pub maintenance_type: Option<String>,
    pub description: Option<String>,
    pub sparepart: Option<String>,
    pub technician: Option<String>,
    /// Minutes
    #[validate(range(min = 0.0))]
    pub downtime: Option<f64>,
    #[validate(range(min = 0.0))]
    pub cost: Option<f64>,
    pub status: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateMaintenance {
    pub date: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub extruder: Option<String>,
    pub maintenance_type: Option<String>,
    pub description: Option<String>,
    pub sparepart: Option<String>,
    pub technician: Option<String>,
    #[validate(range(min = 0.0))]
    pub downtime: Option<f64>,
    #[validate(range(min = 0.0))]
    pub cost: Option<f64>,
    pub status: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MaintenanceFilter {
    pub extruder: Option<String>,
    pub status: Option<String>,
}

async fn require_extruder<C: ConnectionTrait>(conn: &C, code: &str) -> Result<(), ServiceError> {
    let found = extruder::Entity::find()
        .filter(extruder::Column::Code.eq(code))
        .count(conn)
        .await?;
    if found == 0 {
        return Err(ServiceError::NotFound(format!("Extruder {} not found", code)));
    }
    Ok(())
}

/// Maintenance log of the extruders
#[derive(Clone)]
pub struct MaintenanceService {
    db: Arc<DatabaseConnection>,
    event_sender: EventSender,
}

impl MaintenanceService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        filter: MaintenanceFilter,
    ) -> Result<Vec<maintenance_record::Model>, ServiceError> {
        let mut select = maintenance_record::Entity::find();
        if let Some(extruder) = filter.extruder {
            select = select.filter(maintenance_record::Column::Extruder.eq(extruder));
        }
        if let Some(status) = filter.status {
            select = select.filter(maintenance_record::Column::Status.eq(status));
        }
        Ok(select
            .order_by_desc(maintenance_record::Column::UpdatedAt)
            .order_by_desc(maintenance_record::Column::CreatedAt)
            .all(&*self.db)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn create(
        &self,
        input: CreateMaintenance,
    ) -> Result<maintenance_record::Model, ServiceError> {
        input.validate()?;
        let date = parse_timestamp(&input.date)?;
        let extruder_code = input.extruder.trim().to_string();

        let txn = db::begin(&self.db).await?;
        require_extruder(&txn, &extruder_code).await?;

        let now = Utc::now();
        let record = maintenance_record::ActiveModel {
            id: Set(Uuid::new_v4()),
            date: Set(date),
            extruder: Set(extruder_code),
            maintenance_type: Set(input
                .maintenance_type
                .unwrap_or_else(|| DEFAULT_TYPE.to_string())),
            description: Set(input.description),
            sparepart: Set(input.sparepart),
            technician: Set(input.technician),
            downtime: Set(input.downtime.unwrap_or(0.0)),
            cost: Set(input.cost.unwrap_or(0.0)),
            status: Set(input.status.unwrap_or_else(|| DEFAULT_STATUS.to_string())),
            remarks: Set(input.remarks),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        activity::record(
            &txn,
            "Create Maintenance",
            format!(
                "{} maintenance on extruder {}",
                record.maintenance_type, record.extruder
            ),
        )
        .await?;
        db::commit(txn, "maintenance.create").await?;

        info!(extruder = %record.extruder, downtime = record.downtime, "Maintenance recorded");
        self.event_sender
            .publish(Event::created("maintenance", record.id))
            .await;
        Ok(record)
    }

    #[instrument(skip(self))]
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateMaintenance,
    ) -> Result<maintenance_record::Model, ServiceError> {
        input.validate()?;
        let date = input.date.as_deref().map(parse_timestamp).transpose()?;

        let txn = db::begin(&self.db).await?;
        let mut record = maintenance_record::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Maintenance {} not found", id)))?;

        if let Some(code) = input.extruder.map(|c| c.trim().to_string()) {
            if code != record.extruder {
                require_extruder(&txn, &code).await?;
            }
            record.extruder = code;
        }
        merge(&mut record.date, date);
        merge(&mut record.maintenance_type, input.maintenance_type);
        merge_opt(&mut record.description, input.description);
        merge_opt(&mut record.sparepart, input.sparepart);
        merge_opt(&mut record.technician, input.technician);
        merge(&mut record.downtime, input.downtime);
        merge(&mut record.cost, input.cost);
        merge(&mut record.status, input.status);
        merge_opt(&mut record.remarks, input.remarks);

        let mut active: maintenance_record::ActiveModel = record.into();
        active.updated_at = Set(Utc::now());
        let record = active.reset_all().update(&txn).await?;

        activity::record(
            &txn,
            "Update Maintenance",
            format!(
                "Maintenance on extruder {} updated ({})",
                record.extruder, record.status
            ),
        )
        .await?;
        db::commit(txn, "maintenance.update").await?;

        self.event_sender
            .publish(Event::updated("maintenance", record.id))
            .await;
        Ok(record)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let txn = db::begin(&self.db).await?;
        let record = maintenance_record::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Maintenance {} not found", id)))?;

        maintenance_record::Entity::delete_by_id(id).exec(&txn).await?;
        activity::record(
            &txn,
            "Delete Maintenance",
            format!("Maintenance on extruder {} deleted", record.extruder),
        )
        .await?;
        db::commit(txn, "maintenance.delete").await?;

        self.event_sender
            .publish(Event::deleted("maintenance", id, 0))
            .await;
        Ok(())
    }
}
