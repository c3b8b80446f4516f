//! Common types and utilities shared across handlers and services
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use sea_orm::{sea_query::SimpleExpr, ColumnTrait};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::errors::ServiceError;

const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Parses a request timestamp. Accepts RFC 3339, `YYYY-MM-DDTHH:MM[:SS]` and
/// plain `YYYY-MM-DD`; values without an offset are taken as UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, ServiceError> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
        .map_err(|_| ServiceError::InvalidInput(format!("Invalid date '{}'", value)))
}

/// Parses a calendar date. Full timestamps are accepted and truncated to their UTC date.
pub fn parse_date(value: &str) -> Result<NaiveDate, ServiceError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .or_else(|_| parse_timestamp(value).map(|ts| ts.date_naive()))
}

pub fn parse_optional_timestamp(
    value: Option<&str>,
) -> Result<Option<DateTime<Utc>>, ServiceError> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(parse_timestamp)
        .transpose()
}

/// Status filter accepted by most list endpoints
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StatusFilter {
    pub status: Option<String>,
}

/// Inclusive date range filter for list endpoints
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DateRangeParams {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Upper end of a resolved date range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeEnd {
    /// Up to and including this instant
    Through(DateTime<Utc>),
    /// Strictly before this instant
    Before(DateTime<Utc>),
}

impl RangeEnd {
    pub fn condition<C: ColumnTrait>(self, column: C) -> SimpleExpr {
        match self {
            RangeEnd::Through(ts) => column.lte(ts),
            RangeEnd::Before(ts) => column.lt(ts),
        }
    }

    fn includes(self, ts: DateTime<Utc>) -> bool {
        match self {
            RangeEnd::Through(end) => ts <= end,
            RangeEnd::Before(end) => ts < end,
        }
    }

    /// Last calendar day inside the range.
    fn last_day(self) -> NaiveDate {
        match self {
            RangeEnd::Through(end) => end.date_naive(),
            RangeEnd::Before(end) => {
                let day = end.date_naive();
                if end.time() == NaiveTime::MIN {
                    day.pred_opt().unwrap_or(day)
                } else {
                    day
                }
            }
        }
    }
}

impl DateRangeParams {
    /// Resolves the range to timestamps. A bare `to` date covers that whole
    /// day, up to the start of the next one.
    pub fn bounds(&self) -> Result<(Option<DateTime<Utc>>, Option<RangeEnd>), ServiceError> {
        let from = parse_optional_timestamp(self.from.as_deref())?;
        let to = match self.to.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            Some(raw) if NaiveDate::parse_from_str(raw, "%Y-%m-%d").is_ok() => {
                let day = parse_date(raw)?;
                Some(match day.succ_opt() {
                    Some(next) => RangeEnd::Before(next.and_time(NaiveTime::MIN).and_utc()),
                    None => RangeEnd::Through(DateTime::<Utc>::MAX_UTC),
                })
            }
            Some(raw) => Some(RangeEnd::Through(parse_timestamp(raw)?)),
            None => None,
        };
        if let (Some(from), Some(to)) = (from, to) {
            if !to.includes(from) {
                return Err(ServiceError::InvalidInput(
                    "'from' must not be after 'to'".to_string(),
                ));
            }
        }
        Ok((from, to))
    }

    /// Same range as inclusive calendar dates.
    pub fn date_bounds(&self) -> Result<(Option<NaiveDate>, Option<NaiveDate>), ServiceError> {
        let (from, to) = self.bounds()?;
        Ok((from.map(|f| f.date_naive()), to.map(RangeEnd::last_day)))
    }
}

/// Rounds to `places` decimals, half away from zero.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Treats blank strings as absent.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::TimeZone;
    use rstest::rstest;

    #[rstest]
    #[case("2024-01-01T08:00", Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap())]
    #[case("2024-01-01T08:00:30", Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 30).unwrap())]
    #[case("2024-01-01T08:00:00+02:00", Utc.with_ymd_and_hms(2024, 1, 1, 6, 0, 0).unwrap())]
    #[case("2024-01-01T08:00:00Z", Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap())]
    #[case("2024-01-01", Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())]
    fn parses_supported_formats(#[case] raw: &str, #[case] expected: DateTime<Utc>) {
        assert_eq!(parse_timestamp(raw).unwrap(), expected);
    }

    #[test]
    fn rejects_garbage() {
        assert_matches!(parse_timestamp("yesterday"), Err(ServiceError::InvalidInput(_)));
    }

    #[test]
    fn date_only_upper_bound_covers_the_day() {
        let range = DateRangeParams {
            from: Some("2024-03-01".into()),
            to: Some("2024-03-01".into()),
        };
        let (from, to) = range.bounds().unwrap();
        assert_eq!(from, Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()));
        let end = to.unwrap();
        assert_eq!(
            end,
            RangeEnd::Before(Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap())
        );

        let last_second = Utc.with_ymd_and_hms(2024, 3, 1, 23, 59, 59).unwrap()
            + chrono::Duration::milliseconds(500);
        assert!(end.includes(last_second));
        assert!(!end.includes(Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap()));
        assert_eq!(
            range.date_bounds().unwrap(),
            (
                NaiveDate::from_ymd_opt(2024, 3, 1),
                NaiveDate::from_ymd_opt(2024, 3, 1)
            )
        );
    }

    #[test]
    fn timestamp_upper_bound_is_inclusive() {
        let range = DateRangeParams {
            from: Some("2024-03-01T08:00".into()),
            to: Some("2024-03-01T08:00".into()),
        };
        let (_, to) = range.bounds().unwrap();
        assert_eq!(
            to,
            Some(RangeEnd::Through(Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()))
        );
    }

    #[test]
    fn inverted_range_is_rejected() {
        let range = DateRangeParams {
            from: Some("2024-03-02".into()),
            to: Some("2024-03-01".into()),
        };
        assert!(range.bounds().is_err());
    }

    #[test]
    fn blank_strings_are_absent() {
        assert_eq!(non_blank(Some("  ".into())), None);
        assert_eq!(non_blank(Some(" EX-01 ".into())), Some("EX-01".into()));
        assert_eq!(parse_optional_timestamp(Some("")).unwrap(), None);
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round_to(1.25, 1), 1.3);
        assert_eq!(round_to(0.3333, 1), 0.3);
    }
}
