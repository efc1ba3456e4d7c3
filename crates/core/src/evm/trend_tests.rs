use super::*;
use crate::settings::EvmSettings;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn snapshot(day: u32, cpi: Option<Decimal>, spi: Option<Decimal>) -> EvmSnapshot {
    let index = |value: Option<Decimal>, reason| match value {
        Some(value) => PerformanceIndex::Measurable { value },
        None => PerformanceIndex::NotYetMeasurable { reason },
    };
    EvmSnapshot {
        project_id: "depot".to_string(),
        as_of_date: NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
        budget_at_completion: dec!(1000),
        planned_percent_complete: Decimal::ZERO,
        actual_percent_complete: Decimal::ZERO,
        planned_value: Decimal::ZERO,
        earned_value: Decimal::ZERO,
        actual_cost: Decimal::ZERO,
        cost_variance: Decimal::ZERO,
        schedule_variance: Decimal::ZERO,
        cost_performance_index: index(cpi, UndefinedReason::NoCostDataYet),
        schedule_performance_index: index(spi, UndefinedReason::NoPlannedValueYet),
        estimate_at_completion: dec!(1000),
        estimate_to_complete: dec!(1000),
        variance_at_completion: Decimal::ZERO,
        cost_variance_percent: None,
        schedule_variance_percent: None,
        status: ProjectStatus::NotYetMeasurable,
        warnings: Vec::new(),
    }
}

#[test]
fn test_improving_and_declining() {
    let snapshots = vec![
        snapshot(1, Some(dec!(0.80)), Some(dec!(1.20))),
        snapshot(2, Some(dec!(0.90)), Some(dec!(1.10))),
        snapshot(3, Some(dec!(1.00)), Some(dec!(1.00))),
    ];
    let trend = analyze_trend("depot", &snapshots, &EvmSettings::default());

    assert_eq!(trend.cpi_trend, TrendDirection::Improving);
    assert_eq!(trend.spi_trend, TrendDirection::Declining);
    assert_eq!(trend.latest_cpi.and_then(|i| i.value()), Some(dec!(1.00)));
    assert_eq!(trend.data_points, 3);
}

#[test]
fn test_change_within_tolerance_is_stable() {
    let snapshots = vec![
        snapshot(1, Some(dec!(1.00)), Some(dec!(0.95))),
        snapshot(2, Some(dec!(1.02)), Some(dec!(0.95))),
        snapshot(3, Some(dec!(1.05)), Some(dec!(0.93))),
    ];
    let trend = analyze_trend("depot", &snapshots, &EvmSettings::default());
    assert_eq!(trend.cpi_trend, TrendDirection::Stable);
    assert_eq!(trend.spi_trend, TrendDirection::Stable);
}

#[test]
fn test_only_recent_window_counts() {
    // A long decline followed by a recent recovery.
    let snapshots = vec![
        snapshot(1, Some(dec!(1.50)), Some(dec!(1))),
        snapshot(2, Some(dec!(1.00)), Some(dec!(1))),
        snapshot(3, Some(dec!(0.50)), Some(dec!(1))),
        snapshot(4, Some(dec!(0.70)), Some(dec!(1))),
        snapshot(5, Some(dec!(0.90)), Some(dec!(1))),
    ];
    let trend = analyze_trend("depot", &snapshots, &EvmSettings::default());
    assert_eq!(trend.cpi_trend, TrendDirection::Improving);
}

#[test]
fn test_unmeasurable_points_are_skipped() {
    let snapshots = vec![
        snapshot(1, None, None),
        snapshot(2, Some(dec!(1.0)), None),
        snapshot(3, Some(dec!(0.8)), Some(dec!(0.9))),
    ];
    let trend = analyze_trend("depot", &snapshots, &EvmSettings::default());
    assert_eq!(trend.cpi_trend, TrendDirection::Declining);
    // One measurable SPI point is not enough for a direction.
    assert_eq!(trend.spi_trend, TrendDirection::Stable);
}

#[test]
fn test_empty_series() {
    let trend = analyze_trend("depot", &[], &EvmSettings::default());
    assert_eq!(trend.latest_cpi, None);
    assert_eq!(trend.latest_spi, None);
    assert_eq!(trend.cpi_trend, TrendDirection::Stable);
    assert_eq!(trend.data_points, 0);
}
