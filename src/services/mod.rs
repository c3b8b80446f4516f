//! Business services. Each service owns a pool handle and the event sender;
//! every mutation runs in one transaction together with its activity record.

pub mod activity;
pub mod assets;
pub mod costs;
pub mod ledger;
pub mod maintenance;
pub mod oee;
pub mod production;
pub mod purchase_orders;
pub mod recurrence;
pub mod stock;
pub mod suppliers;
pub mod todos;
pub mod users;

use sea_orm::{ConnectionTrait, EntityTrait, Select};

use crate::errors::ServiceError;

/// Fails with `Conflict` when `select` matches a row.
pub(crate) async fn ensure_unique<E, C>(
    conn: &C,
    select: Select<E>,
    what: &str,
    key: &str,
) -> Result<(), ServiceError>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    match select.one(conn).await? {
        Some(_) => Err(ServiceError::exists(what, key)),
        None => Ok(()),
    }
}

/// Overwrites `slot` when the patch carries a value.
pub(crate) fn merge<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

/// Same as [`merge`] for nullable columns.
pub(crate) fn merge_opt<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_only_overwrites_present_values() {
        let mut name = "Line 1".to_string();
        merge(&mut name, None);
        assert_eq!(name, "Line 1");
        merge(&mut name, Some("Line 2".to_string()));
        assert_eq!(name, "Line 2");

        let mut remarks = Some("keep".to_string());
        merge_opt(&mut remarks, None);
        assert_eq!(remarks.as_deref(), Some("keep"));
    }
}
