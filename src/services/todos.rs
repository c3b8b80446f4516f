//! Todos and recurring todo series.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait,
    DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use serde::Deserialize;
use std::{str::FromStr, sync::Arc};
use tracing::{info, instrument, warn};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::recurrence::{self, RecurrenceError, RecurrenceRule, RecurrenceUnit};
use crate::{
    common::{parse_date, DateRangeParams},
    db,
    entities::todo,
    errors::ServiceError,
    events::{Event, EventSender},
    services::{activity, merge, merge_opt},
};

const DEFAULT_PRIORITY: &str = "Normal";
const STATUS_COMPLETE: &str = "Complete";
const STATUS_INCOMPLETE: &str = "Incomplete";
const INSERT_CHUNK: usize = 100;

impl From<RecurrenceError> for ServiceError {
    fn from(err: RecurrenceError) -> Self {
        ServiceError::InvalidInput(err.to_string())
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RecurrenceInput {
    pub unit: RecurrenceUnit,
    /// Step size in units, at least 1
    pub count: Option<u32>,
    /// Last date of the series; one year after the current start when omitted
    pub until: Option<String>,
}

impl RecurrenceInput {
    fn into_rule(self) -> Result<RecurrenceRule, ServiceError> {
        Ok(RecurrenceRule {
            unit: self.unit,
            count: self.count.unwrap_or(1),
            until: self.until.as_deref().map(parse_date).transpose()?,
        })
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateTodo {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    pub description: Option<String>,
    pub date: String,
    pub end_date: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub assignee: Option<String>,
    pub recurrence: Option<RecurrenceInput>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateTodo {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub end_date: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub assignee: Option<String>,
    pub recurrence: Option<RecurrenceInput>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TodoFilter {
    pub status: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

/// The rule stored on a series parent, if it still parses.
fn stored_rule(parent: &todo::Model) -> Option<RecurrenceRule> {
    let unit = parent.recurrence_unit.as_deref()?;
    match RecurrenceUnit::from_str(unit) {
        Ok(unit) => Some(RecurrenceRule {
            unit,
            count: parent.recurrence_count.map_or(1, |c| c.max(1) as u32),
            until: parent.recurrence_until,
        }),
        Err(_) => {
            warn!(todo_id = %parent.id, unit, "Ignoring unknown recurrence unit");
            None
        }
    }
}

fn stored_count(rule: &RecurrenceRule) -> Result<i32, ServiceError> {
    i32::try_from(rule.count).map_err(|_| {
        ServiceError::InvalidInput(format!("recurrence count {} is too large", rule.count))
    })
}

fn check_dates(date: NaiveDate, end_date: Option<NaiveDate>) -> Result<(), ServiceError> {
    match end_date {
        Some(end) if end < date => Err(ServiceError::InvalidInput(
            "end_date must not be before date".to_string(),
        )),
        _ => Ok(()),
    }
}

/// Occurrences of `parent`'s series after the first, as child rows.
fn children_of(parent: &todo::Model, dates: &[NaiveDate]) -> Vec<todo::ActiveModel> {
    let span = parent.end_date.map(|end| end - parent.date);
    let now = Utc::now();
    dates
        .iter()
        .skip(1)
        .map(|date| todo::ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(parent.title.clone()),
            description: Set(parent.description.clone()),
            date: Set(*date),
            end_date: Set(span.map(|span| *date + span)),
            priority: Set(parent.priority.clone()),
            status: Set(parent.status.clone()),
            assignee: Set(parent.assignee.clone()),
            recurrence_unit: Set(None),
            recurrence_count: Set(None),
            recurrence_until: Set(None),
            parent_id: Set(Some(parent.id)),
            created_at: Set(now),
            updated_at: Set(now),
        })
        .collect()
}

async fn insert_children<C: ConnectionTrait>(
    conn: &C,
    children: Vec<todo::ActiveModel>,
) -> Result<(), ServiceError> {
    let mut children = children.into_iter().peekable();
    while children.peek().is_some() {
        let chunk: Vec<_> = children.by_ref().take(INSERT_CHUNK).collect();
        todo::Entity::insert_many(chunk).exec(conn).await?;
    }
    Ok(())
}

async fn delete_children<C: ConnectionTrait>(conn: &C, parent_id: Uuid) -> Result<u64, ServiceError> {
    let result = todo::Entity::delete_many()
        .filter(todo::Column::ParentId.eq(parent_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

#[derive(Clone)]
pub struct TodoService {
    db: Arc<DatabaseConnection>,
    event_sender: EventSender,
}

impl TodoService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, filter: TodoFilter) -> Result<Vec<todo::Model>, ServiceError> {
        let (from, to) = DateRangeParams {
            from: filter.from,
            to: filter.to,
        }
        .date_bounds()?;

        let mut select = todo::Entity::find();
        if let Some(status) = filter.status {
            select = select.filter(todo::Column::Status.eq(status));
        }
        if let Some(from) = from {
            select = select.filter(todo::Column::Date.gte(from));
        }
        if let Some(to) = to {
            select = select.filter(todo::Column::Date.lte(to));
        }
        Ok(select
            .order_by_desc(todo::Column::UpdatedAt)
            .order_by_desc(todo::Column::CreatedAt)
            .all(&*self.db)
            .await?)
    }

    /// Creates a todo. With a recurrence the todo becomes the first occurrence
    /// of a series and one child is stored per later occurrence.
    #[instrument(skip(self))]
    pub async fn create(&self, input: CreateTodo) -> Result<todo::Model, ServiceError> {
        input.validate()?;
        let date = parse_date(&input.date)?;
        let end_date = input.end_date.as_deref().map(parse_date).transpose()?;
        check_dates(date, end_date)?;

        let rule = input.recurrence.map(RecurrenceInput::into_rule).transpose()?;
        let count = rule.as_ref().map(stored_count).transpose()?;
        let dates = match &rule {
            Some(rule) => recurrence::occurrences(date, rule)?,
            None => vec![date],
        };

        let txn = db::begin(&self.db).await?;
        let now = Utc::now();
        let parent = todo::ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(input.title),
            description: Set(input.description),
            date: Set(date),
            end_date: Set(end_date),
            priority: Set(input.priority.unwrap_or_else(|| DEFAULT_PRIORITY.to_string())),
            status: Set(input.status.unwrap_or_else(|| STATUS_INCOMPLETE.to_string())),
            assignee: Set(input.assignee),
            recurrence_unit: Set(rule.as_ref().map(|r| r.unit.to_string())),
            recurrence_count: Set(count),
            recurrence_until: Set(rule.as_ref().and_then(|r| r.until)),
            parent_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        insert_children(&txn, children_of(&parent, &dates)).await?;
        activity::record(
            &txn,
            "Create Todo",
            format!("Todo '{}' created ({} occurrences)", parent.title, dates.len()),
        )
        .await?;
        db::commit(txn, "todo.create").await?;

        info!(todo_id = %parent.id, occurrences = dates.len(), "Todo created");
        self.event_sender
            .publish(Event::created("todo", parent.id))
            .await;
        if rule.is_some() {
            self.event_sender
                .publish(Event::TodoSeriesGenerated {
                    parent_id: parent.id,
                    occurrences: dates.len(),
                })
                .await;
        }
        Ok(parent)
    }

    /// Updates a todo. A series parent whose date or recurrence changed gets
    /// its children regenerated; otherwise its shared fields are copied to them.
    #[instrument(skip(self))]
    pub async fn update(&self, id: Uuid, input: UpdateTodo) -> Result<todo::Model, ServiceError> {
        input.validate()?;
        let date = input.date.as_deref().map(parse_date).transpose()?;
        let end_date = input.end_date.as_deref().map(parse_date).transpose()?;
        let new_rule = input.recurrence.map(RecurrenceInput::into_rule).transpose()?;

        let txn = db::begin(&self.db).await?;
        let mut existing = todo::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Todo {} not found", id)))?;

        if existing.parent_id.is_some() && new_rule.is_some() {
            return Err(ServiceError::InvalidInput(
                "Recurrence can only be set on the first todo of a series".to_string(),
            ));
        }

        let old_date = existing.date;
        merge(&mut existing.title, input.title);
        merge_opt(&mut existing.description, input.description);
        merge(&mut existing.date, date);
        merge_opt(&mut existing.end_date, end_date);
        merge(&mut existing.priority, input.priority);
        merge(&mut existing.status, input.status);
        merge_opt(&mut existing.assignee, input.assignee);
        check_dates(existing.date, existing.end_date)?;

        let recurrence_changed = new_rule.is_some();
        let date_changed = existing.date != old_date;
        if let Some(rule) = &new_rule {
            existing.recurrence_unit = Some(rule.unit.to_string());
            existing.recurrence_count = Some(stored_count(rule)?);
            existing.recurrence_until = rule.until;
        }
        let rule = new_rule.or_else(|| stored_rule(&existing));
        let dates = match &rule {
            Some(rule) if existing.parent_id.is_none() && (recurrence_changed || date_changed) => {
                Some(recurrence::occurrences(existing.date, rule)?)
            }
            _ => None,
        };

        let mut active: todo::ActiveModel = existing.into();
        active.updated_at = Set(Utc::now());
        let updated = active.reset_all().update(&txn).await?;

        match &dates {
            Some(dates) => {
                delete_children(&txn, updated.id).await?;
                insert_children(&txn, children_of(&updated, dates)).await?;
            }
            None if updated.parent_id.is_none() => {
                todo::Entity::update_many()
                    .col_expr(todo::Column::Title, Expr::value(updated.title.clone()))
                    .col_expr(
                        todo::Column::Description,
                        Expr::value(updated.description.clone()),
                    )
                    .col_expr(todo::Column::Priority, Expr::value(updated.priority.clone()))
                    .col_expr(todo::Column::Assignee, Expr::value(updated.assignee.clone()))
                    .col_expr(todo::Column::UpdatedAt, Expr::value(updated.updated_at))
                    .filter(todo::Column::ParentId.eq(updated.id))
                    .exec(&txn)
                    .await?;
            }
            None => {}
        }

        activity::record(
            &txn,
            "Update Todo",
            match &dates {
                Some(dates) => format!(
                    "Todo '{}' updated, series regenerated ({} occurrences)",
                    updated.title,
                    dates.len()
                ),
                None => format!("Todo '{}' updated", updated.title),
            },
        )
        .await?;
        db::commit(txn, "todo.update").await?;

        self.event_sender
            .publish(Event::updated("todo", updated.id))
            .await;
        if let Some(dates) = dates {
            self.event_sender
                .publish(Event::TodoSeriesGenerated {
                    parent_id: updated.id,
                    occurrences: dates.len(),
                })
                .await;
        }
        Ok(updated)
    }

    /// Deletes a todo together with its generated children.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let txn = db::begin(&self.db).await?;
        let existing = todo::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Todo {} not found", id)))?;

        let cascaded = delete_children(&txn, id).await?;
        todo::Entity::delete_by_id(id).exec(&txn).await?;
        activity::record(
            &txn,
            "Delete Todo",
            format!("Todo '{}' deleted with {} children", existing.title, cascaded),
        )
        .await?;
        db::commit(txn, "todo.delete").await?;

        self.event_sender
            .publish(Event::deleted("todo", id, cascaded))
            .await;
        Ok(())
    }

    /// Flips a todo between `Complete` and `Incomplete`.
    #[instrument(skip(self))]
    pub async fn toggle_complete(&self, id: Uuid) -> Result<todo::Model, ServiceError> {
        let txn = db::begin(&self.db).await?;
        let existing = todo::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Todo {} not found", id)))?;

        let (status, action) = if existing.status == STATUS_COMPLETE {
            (STATUS_INCOMPLETE, "Reopen Todo")
        } else {
            (STATUS_COMPLETE, "Complete Todo")
        };
        let mut active: todo::ActiveModel = existing.into();
        active.status = Set(status.to_string());
        active.updated_at = Set(Utc::now());
        let updated = active.update(&txn).await?;

        activity::record(
            &txn,
            action,
            format!("Todo '{}' marked {}", updated.title, updated.status),
        )
        .await?;
        db::commit(txn, "todo.complete").await?;

        self.event_sender
            .publish(Event::updated("todo", updated.id))
            .await;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn parent(date: NaiveDate, end_date: Option<NaiveDate>) -> todo::Model {
        let now = Utc::now();
        todo::Model {
            id: Uuid::new_v4(),
            title: "Clean hopper".into(),
            description: None,
            date,
            end_date,
            priority: DEFAULT_PRIORITY.into(),
            status: STATUS_INCOMPLETE.into(),
            assignee: Some("op1".into()),
            recurrence_unit: Some("weekly".into()),
            recurrence_count: Some(1),
            recurrence_until: None,
            parent_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn children_skip_first_occurrence_and_shift_end_date() {
        let p = parent(day(2024, 1, 1), Some(day(2024, 1, 3)));
        let dates = [day(2024, 1, 1), day(2024, 1, 8), day(2024, 1, 15)];
        let children = children_of(&p, &dates);

        assert_eq!(children.len(), 2);
        assert_eq!(children[0].date.clone().unwrap(), day(2024, 1, 8));
        assert_eq!(children[0].end_date.clone().unwrap(), Some(day(2024, 1, 10)));
        assert_eq!(children[1].parent_id.clone().unwrap(), Some(p.id));
        assert_eq!(children[1].recurrence_unit.clone().unwrap(), None);
    }

    #[test]
    fn stored_rule_round_trips_unit() {
        let mut p = parent(day(2024, 1, 1), None);
        p.recurrence_unit = Some("custom-monthly".into());
        p.recurrence_count = Some(2);
        let rule = stored_rule(&p).unwrap();
        assert_eq!(rule.unit, RecurrenceUnit::CustomMonthly);
        assert_eq!(rule.count, 2);

        p.recurrence_unit = Some("fortnightly".into());
        assert!(stored_rule(&p).is_none());
    }

    #[test]
    fn end_before_start_is_rejected() {
        assert_matches!(
            check_dates(day(2024, 1, 5), Some(day(2024, 1, 4))),
            Err(ServiceError::InvalidInput(_))
        );
        assert!(check_dates(day(2024, 1, 5), Some(day(2024, 1, 5))).is_ok());
    }

    #[test]
    fn oversized_counts_are_rejected() {
        let rule = RecurrenceRule {
            unit: RecurrenceUnit::Daily,
            count: u32::MAX,
            until: None,
        };
        assert_matches!(stored_count(&rule), Err(ServiceError::InvalidInput(_)));

        let rule = RecurrenceRule { count: 3, ..rule };
        assert_eq!(stored_count(&rule).unwrap(), 3);
    }

    #[test]
    fn stored_rule_leaves_open_end_unresolved() {
        let p = parent(day(2024, 1, 1), None);
        assert_eq!(stored_rule(&p).unwrap().until, None);
    }

    #[test]
    fn recurrence_errors_are_bad_input() {
        let err: ServiceError = RecurrenceError::ZeroCount.into();
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }
}
