//! Property-based tests for the OEE arithmetic and the todo recurrence engine.

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use factory_ops::services::{
    oee::{self, ProductionInputs},
    recurrence::{occurrences, RecurrenceRule, RecurrenceUnit},
};
use proptest::prelude::*;

fn unit_strategy() -> impl Strategy<Value = RecurrenceUnit> {
    prop_oneof![
        Just(RecurrenceUnit::Daily),
        Just(RecurrenceUnit::Weekly),
        Just(RecurrenceUnit::Monthly),
        Just(RecurrenceUnit::Yearly),
        Just(RecurrenceUnit::CustomMonthly),
    ]
}

fn start_strategy() -> impl Strategy<Value = NaiveDate> {
    (0i64..3650).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + Duration::days(offset)
    })
}

fn run_strategy() -> impl Strategy<Value = ProductionInputs> {
    (
        1i64..2_000,
        0.0f64..100.0,
        0.0f64..5_000.0,
        0.1f64..20.0,
        0.0f64..60.0,
        0.0f64..120.0,
        0.0f64..1.0,
    )
        .prop_map(|(minutes, downtime, output, irr, ipqc, setup, reject_share)| {
            let start = Utc.with_ymd_and_hms(2024, 1, 1, 6, 0, 0).unwrap();
            ProductionInputs {
                orderdate: Some(start - Duration::days(2)),
                starttime: Some(start),
                endtime: Some(start + Duration::minutes(minutes)),
                totalorder: output,
                irr,
                ipqc,
                setup,
                downtime,
                totaloutput: output,
                reject: output * reject_share,
            }
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn series_start_on_the_start_date_and_stay_in_range(
        start in start_strategy(),
        unit in unit_strategy(),
        count in 1u32..4,
        span in 0i64..400,
    ) {
        let until = start + Duration::days(span);
        let rule = RecurrenceRule { unit, count, until: Some(until) };
        let dates = occurrences(start, &rule).unwrap();

        prop_assert_eq!(dates.first().copied(), Some(start));
        prop_assert!(dates.iter().all(|d| *d >= start && *d <= until));
        prop_assert!(dates.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn quality_and_oee_stay_within_bounds(inputs in run_strategy()) {
        let metrics = oee::compute(&inputs);

        prop_assert!((0.0..=1.0).contains(&metrics.quality));
        prop_assert!(metrics.availability >= 0.0 || metrics.operatingtime < 0.0);
        if metrics.oee != 0.0 {
            let product = metrics.availability * metrics.performance * metrics.quality;
            prop_assert!((metrics.oee - product).abs() < 1e-9);
        }
    }

    #[test]
    fn planned_time_is_a_whole_number_of_minutes(inputs in run_strategy()) {
        let planned = oee::planned_production_time(
            inputs.totalorder,
            inputs.irr,
            inputs.ipqc,
            inputs.setup,
        );
        prop_assert_eq!(planned, planned.round());
        prop_assert!(planned >= 0.0);
    }
}
