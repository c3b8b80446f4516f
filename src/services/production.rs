//! Jobs, productivity and planning records. The three kinds are views of one
//! production lot and always carry the same inputs and metrics.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::oee::{self, ProductionInputs, ProductionMetrics};
use crate::{
    common::{parse_optional_timestamp, round_to, DateRangeParams},
    db,
    entities::{production_record, ProductionKind},
    errors::ServiceError,
    events::{Event, EventSender},
    services::{activity, ensure_unique, merge, merge_opt},
};

const DEFAULT_STATUS: &str = "Incomplete";
const LOT_KINDS: [ProductionKind; 3] = [
    ProductionKind::Job,
    ProductionKind::Productivity,
    ProductionKind::Planning,
];

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateJob {
    #[validate(length(min = 1, max = 100))]
    pub lotno: String,
    pub orderdate: Option<String>,
    pub product: Option<String>,
    pub extruder: Option<String>,
    pub customer: Option<String>,
    pub operator: Option<String>,
    #[validate(range(min = 0.0))]
    pub totalorder: Option<f64>,
    /// Ideal run rate, units per minute
    #[validate(range(min = 0.0))]
    pub irr: Option<f64>,
    #[validate(range(min = 0.0))]
    pub ipqc: Option<f64>,
    #[validate(range(min = 0.0))]
    pub setup: Option<f64>,
    pub starttime: Option<String>,
    pub endtime: Option<String>,
    #[validate(range(min = 0.0))]
    pub downtime: Option<f64>,
    #[validate(range(min = 0.0))]
    pub totaloutput: Option<f64>,
    #[validate(range(min = 0.0))]
    pub reject: Option<f64>,
    pub status: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProduction {
    #[validate(length(min = 1, max = 100))]
    pub lotno: Option<String>,
    pub orderdate: Option<String>,
    pub product: Option<String>,
    pub extruder: Option<String>,
    pub customer: Option<String>,
    pub operator: Option<String>,
    #[validate(range(min = 0.0))]
    pub totalorder: Option<f64>,
    #[validate(range(min = 0.0))]
    pub irr: Option<f64>,
    #[validate(range(min = 0.0))]
    pub ipqc: Option<f64>,
    #[validate(range(min = 0.0))]
    pub setup: Option<f64>,
    pub starttime: Option<String>,
    pub endtime: Option<String>,
    #[validate(range(min = 0.0))]
    pub downtime: Option<f64>,
    #[validate(range(min = 0.0))]
    pub totaloutput: Option<f64>,
    #[validate(range(min = 0.0))]
    pub reject: Option<f64>,
    pub status: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductionFilter {
    pub status: Option<String>,
    pub extruder: Option<String>,
    /// Lower bound on `starttime`
    pub from: Option<String>,
    /// Upper bound on `starttime`
    pub to: Option<String>,
}

/// Aggregate figures over productivity records
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct ProductivitySummary {
    pub records: u64,
    pub availability: f64,
    pub performance: f64,
    pub quality: f64,
    pub oee: f64,
    pub totaloutput: f64,
    pub reject: f64,
}

impl ProductivitySummary {
    pub fn from_records(records: &[production_record::Model]) -> Self {
        if records.is_empty() {
            return Self::default();
        }
        let n = records.len() as f64;
        let avg = |f: fn(&production_record::Model) -> f64| {
            round_to(records.iter().map(f).sum::<f64>() / n, 4)
        };
        Self {
            records: records.len() as u64,
            availability: avg(|r| r.availability),
            performance: avg(|r| r.performance),
            quality: avg(|r| r.quality),
            oee: avg(|r| r.oee),
            totaloutput: records.iter().map(|r| r.totaloutput).sum(),
            reject: records.iter().map(|r| r.reject).sum(),
        }
    }
}

fn inputs_of(record: &production_record::Model) -> ProductionInputs {
    ProductionInputs {
        orderdate: record.orderdate,
        starttime: record.starttime,
        endtime: record.endtime,
        totalorder: record.totalorder,
        irr: record.irr,
        ipqc: record.ipqc,
        setup: record.setup,
        downtime: record.downtime,
        totaloutput: record.totaloutput,
        reject: record.reject,
    }
}

fn apply_metrics(record: &mut production_record::Model, metrics: ProductionMetrics) {
    record.operatingtime = metrics.operatingtime;
    record.prodleadtime = metrics.prodleadtime;
    record.planprodtime = metrics.planprodtime;
    record.availability = metrics.availability;
    record.performance = metrics.performance;
    record.quality = metrics.quality;
    record.oee = metrics.oee;
}

/// Copy of `template` carrying the given identity.
fn as_sibling(
    template: &production_record::Model,
    id: Uuid,
    kind: ProductionKind,
    created_at: chrono::DateTime<Utc>,
) -> production_record::ActiveModel {
    let mut record = template.clone();
    record.id = id;
    record.kind = kind;
    record.created_at = created_at;
    let active: production_record::ActiveModel = record.into();
    active.reset_all()
}

#[derive(Clone)]
pub struct ProductionService {
    db: Arc<DatabaseConnection>,
    event_sender: EventSender,
}

impl ProductionService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        kind: ProductionKind,
        filter: ProductionFilter,
    ) -> Result<Vec<production_record::Model>, ServiceError> {
        let (from, to) = DateRangeParams {
            from: filter.from,
            to: filter.to,
        }
        .bounds()?;

        let mut select =
            production_record::Entity::find().filter(production_record::Column::Kind.eq(kind));
        if let Some(status) = filter.status {
            select = select.filter(production_record::Column::Status.eq(status));
        }
        if let Some(extruder) = filter.extruder {
            select = select.filter(production_record::Column::Extruder.eq(extruder));
        }
        if let Some(from) = from {
            select = select.filter(production_record::Column::Starttime.gte(from));
        }
        if let Some(to) = to {
            select = select.filter(to.condition(production_record::Column::Starttime));
        }
        Ok(select
            .order_by_desc(production_record::Column::UpdatedAt)
            .order_by_desc(production_record::Column::CreatedAt)
            .all(&*self.db)
            .await?)
    }

    /// Averages over the productivity records matching `filter`.
    #[instrument(skip(self))]
    pub async fn summary(
        &self,
        filter: ProductionFilter,
    ) -> Result<ProductivitySummary, ServiceError> {
        let records = self.list(ProductionKind::Productivity, filter).await?;
        Ok(ProductivitySummary::from_records(&records))
    }

    /// Opens a lot: one job, one productivity and one planning record.
    #[instrument(skip(self))]
    pub async fn create_job(
        &self,
        input: CreateJob,
    ) -> Result<production_record::Model, ServiceError> {
        input.validate()?;
        let lotno = input.lotno.trim().to_string();
        let now = Utc::now();

        let mut job = production_record::Model {
            id: Uuid::new_v4(),
            kind: ProductionKind::Job,
            lotno,
            orderdate: parse_optional_timestamp(input.orderdate.as_deref())?,
            product: input.product,
            extruder: input.extruder,
            customer: input.customer,
            operator: input.operator,
            totalorder: input.totalorder.unwrap_or(0.0),
            irr: input.irr.unwrap_or(0.0),
            ipqc: input.ipqc.unwrap_or(0.0),
            setup: input.setup.unwrap_or(0.0),
            starttime: parse_optional_timestamp(input.starttime.as_deref())?,
            endtime: parse_optional_timestamp(input.endtime.as_deref())?,
            downtime: input.downtime.unwrap_or(0.0),
            totaloutput: input.totaloutput.unwrap_or(0.0),
            reject: input.reject.unwrap_or(0.0),
            operatingtime: 0.0,
            prodleadtime: 0.0,
            planprodtime: 0.0,
            availability: 0.0,
            performance: 0.0,
            quality: 0.0,
            oee: 0.0,
            status: input.status.unwrap_or_else(|| DEFAULT_STATUS.to_string()),
            remarks: input.remarks,
            created_at: now,
            updated_at: now,
        };
        let metrics = oee::compute(&inputs_of(&job));
        apply_metrics(&mut job, metrics);

        let txn = db::begin(&self.db).await?;
        ensure_unique(
            &txn,
            production_record::Entity::find()
                .filter(production_record::Column::Lotno.eq(job.lotno.as_str())),
            "Lot",
            &job.lotno,
        )
        .await?;

        let mut created = None;
        for kind in LOT_KINDS {
            let id = if kind == ProductionKind::Job {
                job.id
            } else {
                Uuid::new_v4()
            };
            let record = as_sibling(&job, id, kind, now).insert(&txn).await?;
            if kind == ProductionKind::Job {
                created = Some(record);
            }
        }
        let created = created.ok_or_else(|| {
            ServiceError::InternalError("Job record was not created".to_string())
        })?;

        activity::record(
            &txn,
            "Create Job",
            format!(
                "Lot {} created (OEE {:.2}%)",
                created.lotno,
                created.oee * 100.0
            ),
        )
        .await?;
        db::commit(txn, "job.create").await?;

        info!(lotno = %created.lotno, oee = created.oee, "Production lot opened");
        self.event_sender
            .publish(Event::created("job", created.id))
            .await;
        Ok(created)
    }

    /// Applies a partial change to one record and writes the resulting inputs
    /// and metrics to every record of its lot.
    #[instrument(skip(self))]
    pub async fn update(
        &self,
        kind: ProductionKind,
        id: Uuid,
        input: UpdateProduction,
    ) -> Result<production_record::Model, ServiceError> {
        input.validate()?;
        let orderdate = parse_optional_timestamp(input.orderdate.as_deref())?;
        let starttime = parse_optional_timestamp(input.starttime.as_deref())?;
        let endtime = parse_optional_timestamp(input.endtime.as_deref())?;

        let txn = db::begin(&self.db).await?;
        let mut record = production_record::Entity::find_by_id(id)
            .filter(production_record::Column::Kind.eq(kind))
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("{} {} not found", kind, id)))?;
        let old_lotno = record.lotno.clone();

        if let Some(lotno) = input.lotno.map(|l| l.trim().to_string()) {
            if lotno != old_lotno {
                ensure_unique(
                    &txn,
                    production_record::Entity::find()
                        .filter(production_record::Column::Lotno.eq(lotno.as_str())),
                    "Lot",
                    &lotno,
                )
                .await?;
            }
            record.lotno = lotno;
        }
        merge_opt(&mut record.orderdate, orderdate);
        merge_opt(&mut record.product, input.product);
        merge_opt(&mut record.extruder, input.extruder);
        merge_opt(&mut record.customer, input.customer);
        merge_opt(&mut record.operator, input.operator);
        merge(&mut record.totalorder, input.totalorder);
        merge(&mut record.irr, input.irr);
        merge(&mut record.ipqc, input.ipqc);
        merge(&mut record.setup, input.setup);
        merge_opt(&mut record.starttime, starttime);
        merge_opt(&mut record.endtime, endtime);
        merge(&mut record.downtime, input.downtime);
        merge(&mut record.totaloutput, input.totaloutput);
        merge(&mut record.reject, input.reject);
        merge(&mut record.status, input.status);
        merge_opt(&mut record.remarks, input.remarks);
        let metrics = oee::compute(&inputs_of(&record));
        apply_metrics(&mut record, metrics);
        record.updated_at = Utc::now();

        let lot = production_record::Entity::find()
            .filter(production_record::Column::Lotno.eq(old_lotno.as_str()))
            .all(&txn)
            .await?;
        let mut updated = None;
        for sibling in &lot {
            let saved = as_sibling(&record, sibling.id, sibling.kind, sibling.created_at)
                .update(&txn)
                .await?;
            if saved.id == id {
                updated = Some(saved);
            }
        }
        let updated = updated
            .ok_or_else(|| ServiceError::NotFound(format!("{} {} not found", kind, id)))?;

        activity::record(
            &txn,
            format!("Update {}", kind),
            format!(
                "Lot {} updated across {} records (OEE {:.2}%)",
                updated.lotno,
                lot.len(),
                updated.oee * 100.0
            ),
        )
        .await?;
        db::commit(txn, "production.update").await?;

        self.event_sender
            .publish(Event::updated(kind.resource(), id))
            .await;
        self.event_sender
            .publish(Event::LotSynchronized {
                lotno: updated.lotno.clone(),
                records: lot.len() as u64,
                oee: updated.oee,
            })
            .await;
        Ok(updated)
    }

    /// Deleting a job closes the whole lot; other kinds remove only themselves.
    #[instrument(skip(self))]
    pub async fn delete(&self, kind: ProductionKind, id: Uuid) -> Result<(), ServiceError> {
        let txn = db::begin(&self.db).await?;
        let record = production_record::Entity::find_by_id(id)
            .filter(production_record::Column::Kind.eq(kind))
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("{} {} not found", kind, id)))?;

        let removed = match kind {
            ProductionKind::Job => {
                production_record::Entity::delete_many()
                    .filter(production_record::Column::Lotno.eq(record.lotno.as_str()))
                    .exec(&txn)
                    .await?
                    .rows_affected
            }
            _ => {
                production_record::Entity::delete_by_id(id)
                    .exec(&txn)
                    .await?
                    .rows_affected
            }
        };
        activity::record(
            &txn,
            format!("Delete {}", kind),
            format!("{} of lot {} deleted ({} records)", kind, record.lotno, removed),
        )
        .await?;
        db::commit(txn, "production.delete").await?;

        self.event_sender
            .publish(Event::deleted(
                kind.resource(),
                id,
                removed.saturating_sub(1),
            ))
            .await;
        Ok(())
    }
}
