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
    common::{parse_optional_timestamp, parse_timestamp, round_to},
    db,
    entities::{purchase_order, ItemType},
    errors::ServiceError,
    events::{Event, EventSender},
    services::{activity, ensure_unique, merge, merge_opt},
};

const DEFAULT_STATUS: &str = "Pending";

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreatePurchaseOrder {
    #[validate(length(min = 1, max = 100))]
    pub order_no: String,
    pub date: String,
    #[validate(length(min = 1, max = 255))]
    pub supplier: String,
    pub item_type: ItemType,
    #[validate(length(min = 1, max = 100))]
    pub code: String,
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub quantity: f64,
    #[validate(range(min = 0.0))]
    pub unit_price: f64,
    pub delivery_date: Option<String>,
    pub status: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdatePurchaseOrder {
    #[validate(length(min = 1, max = 100))]
    pub order_no: Option<String>,
    pub date: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub supplier: Option<String>,
    pub item_type: Option<ItemType>,
    #[validate(length(min = 1, max = 100))]
    pub code: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub quantity: Option<f64>,
    #[validate(range(min = 0.0))]
    pub unit_price: Option<f64>,
    pub delivery_date: Option<String>,
    pub status: Option<String>,
    pub remarks: Option<String>,
}

fn order_total(quantity: f64, unit_price: f64) -> f64 {
    round_to(quantity * unit_price, 4)
}

#[derive(Clone)]
pub struct PurchaseOrderService {
    db: Arc<DatabaseConnection>,
    event_sender: EventSender,
}

impl PurchaseOrderService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        status: Option<String>,
    ) -> Result<Vec<purchase_order::Model>, ServiceError> {
        let mut select = purchase_order::Entity::find();
        if let Some(status) = status {
            select = select.filter(purchase_order::Column::Status.eq(status));
        }
        Ok(select
            .order_by_desc(purchase_order::Column::UpdatedAt)
            .order_by_desc(purchase_order::Column::CreatedAt)
            .all(&*self.db)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn create(
        &self,
        input: CreatePurchaseOrder,
    ) -> Result<purchase_order::Model, ServiceError> {
        input.validate()?;
        let order_no = input.order_no.trim().to_string();
        let date = parse_timestamp(&input.date)?;
        let delivery_date = parse_optional_timestamp(input.delivery_date.as_deref())?;

        let txn = db::begin(&self.db).await?;
        ensure_unique(
            &txn,
            purchase_order::Entity::find()
                .filter(purchase_order::Column::OrderNo.eq(order_no.as_str())),
            "Purchase order",
            &order_no,
        )
        .await?;

        let now = Utc::now();
        let order = purchase_order::ActiveModel {
            id: Set(Uuid::new_v4()),
            order_no: Set(order_no),
            date: Set(date),
            supplier: Set(input.supplier),
            item_type: Set(input.item_type),
            code: Set(input.code.trim().to_string()),
            description: Set(input.description),
            quantity: Set(input.quantity),
            unit_price: Set(input.unit_price),
            total: Set(order_total(input.quantity, input.unit_price)),
            delivery_date: Set(delivery_date),
            status: Set(input.status.unwrap_or_else(|| DEFAULT_STATUS.to_string())),
            remarks: Set(input.remarks),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        activity::record(
            &txn,
            "Create Purchase Order",
            format!(
                "Order {} for {} {} {} from {}",
                order.order_no, order.quantity, order.item_type, order.code, order.supplier
            ),
        )
        .await?;
        db::commit(txn, "order.create").await?;

        info!(order_no = %order.order_no, total = order.total, "Purchase order created");
        self.event_sender
            .publish(Event::created("order", order.id))
            .await;
        Ok(order)
    }

    /// Applies a partial change and recomputes the order total.
    #[instrument(skip(self))]
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdatePurchaseOrder,
    ) -> Result<purchase_order::Model, ServiceError> {
        input.validate()?;
        let date = input.date.as_deref().map(parse_timestamp).transpose()?;
        let delivery_date = parse_optional_timestamp(input.delivery_date.as_deref())?;

        let txn = db::begin(&self.db).await?;
        let mut order = purchase_order::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Purchase order {} not found", id)))?;

        if let Some(order_no) = input.order_no.map(|n| n.trim().to_string()) {
            if order_no != order.order_no {
                ensure_unique(
                    &txn,
                    purchase_order::Entity::find()
                        .filter(purchase_order::Column::OrderNo.eq(order_no.as_str()))
                        .filter(purchase_order::Column::Id.ne(id)),
                    "Purchase order",
                    &order_no,
                )
                .await?;
            }
            order.order_no = order_no;
        }
        merge(&mut order.date, date);
        merge(&mut order.supplier, input.supplier);
        merge(&mut order.item_type, input.item_type);
        merge(&mut order.code, input.code.map(|c| c.trim().to_string()));
        merge_opt(&mut order.description, input.description);
        merge(&mut order.quantity, input.quantity);
        merge(&mut order.unit_price, input.unit_price);
        merge_opt(&mut order.delivery_date, delivery_date);
        merge(&mut order.status, input.status);
        merge_opt(&mut order.remarks, input.remarks);
        order.total = order_total(order.quantity, order.unit_price);

        let mut active: purchase_order::ActiveModel = order.into();
        active.updated_at = Set(Utc::now());
        let order = active.reset_all().update(&txn).await?;

        activity::record(
            &txn,
            "Update Purchase Order",
            format!("Order {} updated ({})", order.order_no, order.status),
        )
        .await?;
        db::commit(txn, "order.update").await?;

        self.event_sender
            .publish(Event::updated("order", order.id))
            .await;
        Ok(order)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let txn = db::begin(&self.db).await?;
        let order = purchase_order::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Purchase order {} not found", id)))?;

        purchase_order::Entity::delete_by_id(id).exec(&txn).await?;
        activity::record(
            &txn,
            "Delete Purchase Order",
            format!("Order {} deleted", order.order_no),
        )
        .await?;
        db::commit(txn, "order.delete").await?;

        self.event_sender
            .publish(Event::deleted("order", id, 0))
            .await;
        Ok(())
    }
}
