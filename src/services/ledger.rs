//! Running-balance engine shared by the movement and transaction ledgers.
//!
//! The entries of one item are replayed in `(date, created_at, id)` order
//! starting from zero. Every entry stores the balance after itself, and no
//! prefix of the ledger may go negative.

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::entities::{stock_entry, Direction};

/// Tolerance for comparing accumulated `f64` balances
const EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq)]
pub struct LedgerLine {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub direction: Direction,
    pub quantity: f64,
    /// Balance currently stored for this entry
    pub balance: f64,
}

impl From<&stock_entry::Model> for LedgerLine {
    fn from(entry: &stock_entry::Model) -> Self {
        Self {
            id: entry.id,
            date: entry.date,
            created_at: entry.created_at,
            direction: entry.direction,
            quantity: entry.quantity,
            balance: entry.balance,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rebalanced {
    /// Balance after the last entry, 0 for an empty ledger
    pub closing: f64,
    /// Entries whose stored balance differs from the replayed one
    pub changed: Vec<(Uuid, f64)>,
}

#[derive(Debug, Error, PartialEq)]
pub enum LedgerError {
    #[error("entry {id} on {date} would leave a balance of {balance}")]
    Negative {
        id: Uuid,
        date: DateTime<Utc>,
        balance: f64,
    },
}

/// Replays `lines` and reports which stored balances need rewriting.
pub fn rebalance(mut lines: Vec<LedgerLine>) -> Result<Rebalanced, LedgerError> {
    lines.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then(a.created_at.cmp(&b.created_at))
            .then(a.id.cmp(&b.id))
    });

    let mut running = 0.0_f64;
    let mut changed = Vec::new();
    for line in &lines {
        running += line.direction.apply(line.quantity);
        if running < -EPSILON {
            return Err(LedgerError::Negative {
                id: line.id,
                date: line.date,
                balance: running,
            });
        }
        // Snap tiny float residue back to zero so stored balances stay clean
        if running.abs() < EPSILON {
            running = 0.0;
        }
        if (line.balance - running).abs() > EPSILON {
            changed.push((line.id, running));
        }
    }

    Ok(Rebalanced {
        closing: running,
        changed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    fn day(n: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(n)
    }

    fn line(n: i64, direction: Direction, quantity: f64) -> LedgerLine {
        LedgerLine {
            id: Uuid::new_v4(),
            date: day(n),
            created_at: day(0),
            direction,
            quantity,
            balance: 0.0,
        }
    }

    #[test]
    fn empty_ledger_closes_at_zero() {
        let result = rebalance(Vec::new()).unwrap();
        assert_eq!(result.closing, 0.0);
        assert!(result.changed.is_empty());
    }

    #[test]
    fn replays_in_date_order_regardless_of_input_order() {
        let receipt = line(1, Direction::In, 100.0);
        let issue = line(2, Direction::Out, 40.0);
        let result = rebalance(vec![issue.clone(), receipt.clone()]).unwrap();

        assert_eq!(result.closing, 60.0);
        assert_eq!(result.changed, vec![(receipt.id, 100.0), (issue.id, 60.0)]);
    }

    #[test]
    fn same_date_falls_back_to_creation_order() {
        let mut first = line(1, Direction::In, 10.0);
        let mut second = line(1, Direction::Out, 10.0);
        first.created_at = day(0);
        second.created_at = day(0) + Duration::seconds(5);

        let result = rebalance(vec![second, first]).unwrap();
        assert_eq!(result.closing, 0.0);
    }

    #[test]
    fn out_before_any_in_is_rejected() {
        let issue = line(1, Direction::Out, 5.0);
        let receipt = line(2, Direction::In, 50.0);
        let err = rebalance(vec![receipt, issue.clone()]).unwrap_err();
        assert_matches!(err, LedgerError::Negative { id, balance, .. } if id == issue.id && balance == -5.0);
    }

    #[test]
    fn unchanged_balances_are_not_reported() {
        let mut receipt = line(1, Direction::In, 12.5);
        receipt.balance = 12.5;
        let result = rebalance(vec![receipt]).unwrap();
        assert!(result.changed.is_empty());
        assert_eq!(result.closing, 12.5);
    }

    #[test]
    fn float_residue_snaps_to_zero() {
        let result = rebalance(vec![
            line(1, Direction::In, 0.1),
            line(2, Direction::In, 0.2),
            line(3, Direction::Out, 0.3),
        ])
        .unwrap();
        assert_eq!(result.closing, 0.0);
    }

    proptest! {
        #[test]
        fn accepted_ledgers_never_go_negative(
            moves in prop::collection::vec((any::<bool>(), 1u32..500), 0..40)
        ) {
            let lines: Vec<LedgerLine> = moves
                .iter()
                .enumerate()
                .map(|(i, (inbound, qty))| {
                    let direction = if *inbound { Direction::In } else { Direction::Out };
                    line(i as i64, direction, f64::from(*qty))
                })
                .collect();

            let mut running = 0.0;
            let mut ever_negative = false;
            for l in &lines {
                running += l.direction.apply(l.quantity);
                ever_negative |= running < 0.0;
            }

            match rebalance(lines) {
                Ok(result) => {
                    prop_assert!(!ever_negative);
                    prop_assert!(result.closing >= 0.0);
                    prop_assert_eq!(result.closing, running);
                }
                Err(LedgerError::Negative { balance, .. }) => {
                    prop_assert!(ever_negative);
                    prop_assert!(balance < 0.0);
                }
            }
        }
    }
}
