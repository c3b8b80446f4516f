//! Production time and OEE arithmetic. Times are in minutes, lead time in days.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::common::round_to;

/// Inputs that drive the computed columns of a production record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductionInputs {
    pub orderdate: Option<DateTime<Utc>>,
    pub starttime: Option<DateTime<Utc>>,
    pub endtime: Option<DateTime<Utc>>,
    pub totalorder: f64,
    /// Ideal run rate, units per minute
    pub irr: f64,
    pub ipqc: f64,
    pub setup: f64,
    pub downtime: f64,
    pub totaloutput: f64,
    pub reject: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, ToSchema)]
pub struct ProductionMetrics {
    pub operatingtime: f64,
    pub prodleadtime: f64,
    pub planprodtime: f64,
    pub availability: f64,
    pub performance: f64,
    pub quality: f64,
    pub oee: f64,
}

fn minutes_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    (end - start).num_seconds() as f64 / 60.0
}

/// Run time minus downtime; 0 when either end of the run is unknown.
pub fn operating_time(
    starttime: Option<DateTime<Utc>>,
    endtime: Option<DateTime<Utc>>,
    downtime: f64,
) -> f64 {
    match (starttime, endtime) {
        (Some(start), Some(end)) => minutes_between(start, end) - downtime,
        _ => 0.0,
    }
}

/// Days from order to end of production, one decimal.
pub fn production_lead_time(
    orderdate: Option<DateTime<Utc>>,
    endtime: Option<DateTime<Utc>>,
) -> f64 {
    match (orderdate, endtime) {
        (Some(order), Some(end)) => {
            round_to((end - order).num_seconds() as f64 / 86_400.0, 1)
        }
        _ => 0.0,
    }
}

pub fn planned_production_time(totalorder: f64, irr: f64, ipqc: f64, setup: f64) -> f64 {
    if irr > 0.0 {
        (totalorder / irr + ipqc + setup).round()
    } else {
        (ipqc + setup).round()
    }
}

pub fn availability(operatingtime: f64, planprodtime: f64) -> f64 {
    if planprodtime <= 0.0 {
        0.0
    } else {
        operatingtime / planprodtime
    }
}

pub fn performance(totaloutput: f64, operatingtime: f64, irr: f64) -> f64 {
    if operatingtime <= 0.0 || irr <= 0.0 {
        0.0
    } else {
        (totaloutput / operatingtime) / irr
    }
}

pub fn quality(totaloutput: f64, reject: f64) -> f64 {
    if totaloutput <= 0.0 {
        0.0
    } else {
        (totaloutput - reject) / totaloutput
    }
}

pub fn oee(availability: f64, performance: f64, quality: f64) -> f64 {
    if availability > 0.0 && performance > 0.0 && quality > 0.0 {
        availability * performance * quality
    } else {
        0.0
    }
}

pub fn compute(inputs: &ProductionInputs) -> ProductionMetrics {
    let operatingtime = operating_time(inputs.starttime, inputs.endtime, inputs.downtime);
    let prodleadtime = production_lead_time(inputs.orderdate, inputs.endtime);
    let planprodtime =
        planned_production_time(inputs.totalorder, inputs.irr, inputs.ipqc, inputs.setup);
    let availability = availability(operatingtime, planprodtime);
    let performance = performance(inputs.totaloutput, operatingtime, inputs.irr);
    let quality = quality(inputs.totaloutput, inputs.reject);

    ProductionMetrics {
        operatingtime,
        prodleadtime,
        planprodtime,
        availability,
        performance,
        quality,
        oee: oee(availability, performance, quality),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::parse_timestamp;
    use rstest::rstest;

    fn at(raw: &str) -> Option<DateTime<Utc>> {
        Some(parse_timestamp(raw).unwrap())
    }

    #[test]
    fn eight_hour_shift_with_half_hour_down() {
        assert_eq!(
            operating_time(at("2024-01-01T08:00"), at("2024-01-01T16:00"), 30.0),
            450.0
        );
    }

    #[test]
    fn missing_times_give_zero() {
        assert_eq!(operating_time(None, at("2024-01-01T16:00"), 30.0), 0.0);
        assert_eq!(production_lead_time(at("2024-01-01T08:00"), None), 0.0);
    }

    #[test]
    fn lead_time_is_days_to_one_decimal() {
        assert_eq!(
            production_lead_time(at("2024-01-01T00:00"), at("2024-01-03T12:00")),
            2.5
        );
        assert_eq!(
            production_lead_time(at("2024-01-01T00:00"), at("2024-01-01T08:00")),
            0.3
        );
    }

    #[rstest]
    #[case(1000.0, 2.0, 15.0, 30.0, 545.0)]
    #[case(1000.0, 3.0, 10.0, 20.0, 363.0)]
    #[case(1000.0, 0.0, 10.4, 20.0, 30.0)]
    fn planned_time_rounds_to_whole_minutes(
        #[case] totalorder: f64,
        #[case] irr: f64,
        #[case] ipqc: f64,
        #[case] setup: f64,
        #[case] expected: f64,
    ) {
        assert_eq!(planned_production_time(totalorder, irr, ipqc, setup), expected);
    }

    #[rstest]
    #[case(450.0, 0.0, 0.0)]
    #[case(450.0, -5.0, 0.0)]
    #[case(450.0, 500.0, 0.9)]
    fn availability_guards_plan(#[case] op: f64, #[case] plan: f64, #[case] expected: f64) {
        assert_eq!(availability(op, plan), expected);
    }

    #[test]
    fn performance_and_quality_guard_denominators() {
        assert_eq!(performance(900.0, 0.0, 2.0), 0.0);
        assert_eq!(performance(900.0, 450.0, 0.0), 0.0);
        assert_eq!(performance(900.0, 450.0, 2.0), 1.0);
        assert_eq!(quality(0.0, 0.0), 0.0);
        assert_eq!(quality(1000.0, 50.0), 0.95);
    }

    #[test]
    fn oee_requires_every_factor() {
        assert_eq!(oee(0.9, 1.0, 0.0), 0.0);
        assert_eq!(oee(0.9, -1.0, 0.5), 0.0);
        assert!((oee(0.9, 1.0, 0.95) - 0.855).abs() < 1e-12);
    }

    #[test]
    fn compute_fills_every_metric() {
        let inputs = ProductionInputs {
            orderdate: at("2023-12-30T08:00"),
            starttime: at("2024-01-01T08:00"),
            endtime: at("2024-01-01T16:00"),
            totalorder: 900.0,
            irr: 2.0,
            ipqc: 20.0,
            setup: 30.0,
            downtime: 30.0,
            totaloutput: 900.0,
            reject: 45.0,
        };
        let m = compute(&inputs);
        assert_eq!(m.operatingtime, 450.0);
        assert_eq!(m.prodleadtime, 2.3);
        assert_eq!(m.planprodtime, 500.0);
        assert_eq!(m.availability, 0.9);
        assert_eq!(m.performance, 1.0);
        assert_eq!(m.quality, 0.95);
        assert!((m.oee - 0.855).abs() < 1e-12);
    }
}
