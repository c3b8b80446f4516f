//! Date expansion for recurring todos.

use chrono::{Datelike, Duration, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;
use utoipa::ToSchema;

/// Hard cap on the size of one series
pub const MAX_OCCURRENCES: usize = 1000;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum RecurrenceUnit {
    Daily,
    Weekly,
    Monthly,
    Yearly,
    /// Same weekday occurrence of the month, e.g. the second Tuesday
    CustomMonthly,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceRule {
    pub unit: RecurrenceUnit,
    pub count: u32,
    /// Last date a series may land on; defaults to one year after the start
    pub until: Option<NaiveDate>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecurrenceError {
    #[error("recurrence count must be at least 1")]
    ZeroCount,
    #[error("recurrence ends on {until}, before the start date {start}")]
    EndsBeforeStart { start: NaiveDate, until: NaiveDate },
    #[error("recurrence produces more than {} occurrences", MAX_OCCURRENCES)]
    TooMany,
}

pub fn default_until(start: NaiveDate) -> NaiveDate {
    start
        .checked_add_months(Months::new(12))
        .unwrap_or(NaiveDate::MAX)
}

/// The `n`th (1-based) `weekday` of a month, or the last one when the month
/// has fewer than `n`.
fn nth_weekday(year: i32, month: u32, weekday: Weekday, n: u8) -> Option<NaiveDate> {
    NaiveDate::from_weekday_of_month_opt(year, month, weekday, n)
        .or_else(|| NaiveDate::from_weekday_of_month_opt(year, month, weekday, n - 1))
}

/// Occurrence `k` of the series (`k = 0` is the start itself).
fn step(start: NaiveDate, unit: RecurrenceUnit, count: u32, k: u32) -> Option<NaiveDate> {
    let n = count.checked_mul(k)?;
    match unit {
        RecurrenceUnit::Daily => start.checked_add_signed(Duration::days(i64::from(n))),
        RecurrenceUnit::Weekly => start.checked_add_signed(Duration::weeks(i64::from(n))),
        RecurrenceUnit::Monthly => start.checked_add_months(Months::new(n)),
        RecurrenceUnit::Yearly => start.checked_add_months(Months::new(n.checked_mul(12)?)),
        RecurrenceUnit::CustomMonthly => {
            let month_start = start.with_day(1)?.checked_add_months(Months::new(n))?;
            let ordinal = ((start.day() - 1) / 7 + 1) as u8;
            nth_weekday(
                month_start.year(),
                month_start.month(),
                start.weekday(),
                ordinal,
            )
        }
    }
}

/// All dates of the series in order, starting with `start`.
///
/// Monthly and yearly steps are anchored to the start date, so a series
/// starting on the 31st lands on the last day of shorter months and returns
/// to the 31st afterwards.
pub fn occurrences(
    start: NaiveDate,
    rule: &RecurrenceRule,
) -> Result<Vec<NaiveDate>, RecurrenceError> {
    if rule.count == 0 {
        return Err(RecurrenceError::ZeroCount);
    }
    let until = rule.until.unwrap_or_else(|| default_until(start));
    if until < start {
        return Err(RecurrenceError::EndsBeforeStart { start, until });
    }

    let mut dates = Vec::new();
    let mut k = 0u32;
    while let Some(date) = step(start, rule.unit, rule.count, k) {
        if date > until {
            break;
        }
        if dates.len() == MAX_OCCURRENCES {
            return Err(RecurrenceError::TooMany);
        }
        dates.push(date);
        k += 1;
    }
    Ok(dates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn rule(unit: RecurrenceUnit, count: u32, until: NaiveDate) -> RecurrenceRule {
        RecurrenceRule {
            unit,
            count,
            until: Some(until),
        }
    }

    #[rstest]
    #[case(RecurrenceUnit::Daily, 2, d(2024, 1, 7), vec![d(2024, 1, 1), d(2024, 1, 3), d(2024, 1, 5), d(2024, 1, 7)])]
    #[case(RecurrenceUnit::Weekly, 1, d(2024, 1, 20), vec![d(2024, 1, 1), d(2024, 1, 8), d(2024, 1, 15)])]
    #[case(RecurrenceUnit::Monthly, 3, d(2024, 12, 31), vec![d(2024, 1, 1), d(2024, 4, 1), d(2024, 7, 1), d(2024, 10, 1)])]
    #[case(RecurrenceUnit::Yearly, 1, d(2026, 1, 1), vec![d(2024, 1, 1), d(2025, 1, 1), d(2026, 1, 1)])]
    fn fixed_steps(
        #[case] unit: RecurrenceUnit,
        #[case] count: u32,
        #[case] until: NaiveDate,
        #[case] expected: Vec<NaiveDate>,
    ) {
        assert_eq!(
            occurrences(d(2024, 1, 1), &rule(unit, count, until)).unwrap(),
            expected
        );
    }

    #[test]
    fn month_end_is_clamped_then_restored() {
        let dates = occurrences(
            d(2024, 1, 31),
            &rule(RecurrenceUnit::Monthly, 1, d(2024, 4, 30)),
        )
        .unwrap();
        assert_eq!(
            dates,
            vec![d(2024, 1, 31), d(2024, 2, 29), d(2024, 3, 31), d(2024, 4, 30)]
        );
    }

    #[test]
    fn leap_day_yearly_falls_back_to_feb_28() {
        let dates =
            occurrences(d(2024, 2, 29), &rule(RecurrenceUnit::Yearly, 1, d(2025, 3, 1))).unwrap();
        assert_eq!(dates, vec![d(2024, 2, 29), d(2025, 2, 28)]);
    }

    #[test]
    fn custom_monthly_keeps_weekday_ordinal() {
        // 2024-01-09 is the second Tuesday of January
        let dates = occurrences(
            d(2024, 1, 9),
            &rule(RecurrenceUnit::CustomMonthly, 1, d(2024, 4, 30)),
        )
        .unwrap();
        assert_eq!(
            dates,
            vec![d(2024, 1, 9), d(2024, 2, 13), d(2024, 3, 12), d(2024, 4, 9)]
        );
    }

    #[test]
    fn custom_monthly_fifth_weekday_uses_last() {
        // 2024-01-31 is the fifth Wednesday; February 2024 only has four
        let dates = occurrences(
            d(2024, 1, 31),
            &rule(RecurrenceUnit::CustomMonthly, 1, d(2024, 2, 29)),
        )
        .unwrap();
        assert_eq!(dates, vec![d(2024, 1, 31), d(2024, 2, 28)]);
    }

    #[test]
    fn until_defaults_to_one_year() {
        let dates = occurrences(
            d(2024, 1, 1),
            &RecurrenceRule {
                unit: RecurrenceUnit::Monthly,
                count: 1,
                until: None,
            },
        )
        .unwrap();
        assert_eq!(dates.len(), 13);
        assert_eq!(dates.last(), Some(&d(2025, 1, 1)));
    }

    #[test]
    fn rejects_bad_rules() {
        assert_eq!(
            occurrences(d(2024, 1, 1), &rule(RecurrenceUnit::Daily, 0, d(2024, 2, 1))),
            Err(RecurrenceError::ZeroCount)
        );
        assert!(matches!(
            occurrences(d(2024, 1, 1), &rule(RecurrenceUnit::Daily, 1, d(2023, 12, 1))),
            Err(RecurrenceError::EndsBeforeStart { .. })
        ));
        assert_eq!(
            occurrences(d(2024, 1, 1), &rule(RecurrenceUnit::Daily, 1, d(2030, 1, 1))),
            Err(RecurrenceError::TooMany)
        );
    }

    #[test]
    fn exactly_the_cap_is_allowed() {
        let until = d(2024, 1, 1) + Duration::days(MAX_OCCURRENCES as i64 - 1);
        let dates = occurrences(d(2024, 1, 1), &rule(RecurrenceUnit::Daily, 1, until)).unwrap();
        assert_eq!(dates.len(), MAX_OCCURRENCES);
    }

    #[test]
    fn unit_names_round_trip_through_strings() {
        assert_eq!(
            RecurrenceUnit::from_str("custom-monthly").unwrap(),
            RecurrenceUnit::CustomMonthly
        );
        assert_eq!(RecurrenceUnit::Weekly.to_string(), "weekly");
    }
}
