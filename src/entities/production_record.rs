use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

/// The three views of a production lot. A job creates one record of each
/// kind, all sharing the lot number.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    Display, EnumString, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum ProductionKind {
    #[sea_orm(string_value = "Job")]
    Job,
    #[sea_orm(string_value = "Productivity")]
    Productivity,
    #[sea_orm(string_value = "Planning")]
    Planning,
}

impl ProductionKind {
    pub fn resource(&self) -> &'static str {
        match self {
            ProductionKind::Job => "job",
            ProductionKind::Productivity => "productivity",
            ProductionKind::Planning => "planning",
        }
    }
}

/// Quantities are in units of product; times are in minutes.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = ProductionRecord)]
#[sea_orm(table_name = "production_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub kind: ProductionKind,
    pub lotno: String,
    pub orderdate: Option<DateTime<Utc>>,
    pub product: Option<String>,
    pub extruder: Option<String>,
    pub customer: Option<String>,
    pub operator: Option<String>,
    pub totalorder: f64,
    pub irr: f64,
    pub ipqc: f64,
    pub setup: f64,
    pub starttime: Option<DateTime<Utc>>,
    pub endtime: Option<DateTime<Utc>>,
    pub downtime: f64,
    pub totaloutput: f64,
    pub reject: f64,
    pub operatingtime: f64,
    pub prodleadtime: f64,
    pub planprodtime: f64,
    pub availability: f64,
    pub performance: f64,
    pub quality: f64,
    pub oee: f64,
    pub status: String,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
