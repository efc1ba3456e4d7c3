use super::*;
use crate::evm::{
    build_series, EvmSnapshot, PerformanceIndex, ProjectRecords, ProjectSeries, ProjectStatus,
    ReportingBucket, UndefinedReason,
};
use crate::projects::ProjectBudget;
use crate::records::{CostRecord, ProgressRecord};
use crate::settings::EvmSettings;
use crate::utils::DateRange;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ============================================================================
// Helpers
// ============================================================================

fn d(m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, m, day).unwrap()
}

fn range(start: NaiveDate, end: NaiveDate) -> DateRange {
    DateRange::new(start, end).unwrap()
}

fn snap(project_id: &str, date: NaiveDate, pv: Decimal, ev: Decimal, ac: Decimal) -> EvmSnapshot {
    EvmSnapshot {
        project_id: project_id.to_string(),
        as_of_date: date,
        budget_at_completion: dec!(1000),
        planned_percent_complete: pv / dec!(10),
        actual_percent_complete: ev / dec!(10),
        planned_value: pv,
        earned_value: ev,
        actual_cost: ac,
        cost_variance: ev - ac,
        schedule_variance: ev - pv,
        cost_performance_index: PerformanceIndex::ratio(ev, ac, UndefinedReason::NoCostDataYet)
            .unwrap(),
        schedule_performance_index: PerformanceIndex::ratio(
            ev,
            pv,
            UndefinedReason::NoPlannedValueYet,
        )
        .unwrap(),
        estimate_at_completion: dec!(1000),
        estimate_to_complete: dec!(1000) - ac,
        variance_at_completion: Decimal::ZERO,
        cost_variance_percent: None,
        schedule_variance_percent: None,
        status: ProjectStatus::NotYetMeasurable,
        warnings: Vec::new(),
    }
}

fn series(project_id: &str, r: DateRange, snapshots: Vec<EvmSnapshot>) -> ProjectSeries {
    ProjectSeries {
        project_id: project_id.to_string(),
        bucket: ReportingBucket::Month,
        range: r,
        snapshots,
    }
}

// ============================================================================
// Weighting
// ============================================================================

#[test]
fn test_weighted_cpi_is_ratio_of_sums() {
    let r = range(d(3, 1), d(3, 1));
    let a = series("a", r, vec![snap("a", d(3, 1), dec!(100), dec!(100), dec!(50))]);
    let b = series("b", r, vec![snap("b", d(3, 1), dec!(100), dec!(100), dec!(200))]);

    let result = aggregate(&[a, b], r).unwrap();

    assert_eq!(result.points.len(), 1);
    let point = &result.points[0];
    assert_eq!(point.total_earned_value, dec!(200));
    assert_eq!(point.total_actual_cost, dec!(250));
    // Mean of ratios would be (2.0 + 0.5) / 2 = 1.25.
    assert_eq!(point.weighted_cpi.value(), Some(dec!(0.8)));
    assert_eq!(point.weighted_spi.value(), Some(dec!(1)));
    assert_eq!(point.total_cost_variance, dec!(-50));
    assert_eq!(point.total_schedule_variance, Decimal::ZERO);
    assert_eq!(point.contributing_projects, 2);
}

#[test]
fn test_zero_denominators_are_not_yet_measurable() {
    let r = range(d(1, 1), d(1, 1));
    let a = series("a", r, vec![snap("a", d(1, 1), Decimal::ZERO, Decimal::ZERO, Decimal::ZERO)]);

    let result = aggregate(&[a], r).unwrap();

    assert_eq!(
        result.points[0].weighted_cpi,
        PerformanceIndex::NotYetMeasurable {
            reason: UndefinedReason::NoCostDataYet
        }
    );
    assert_eq!(
        result.points[0].weighted_spi,
        PerformanceIndex::NotYetMeasurable {
            reason: UndefinedReason::NoPlannedValueYet
        }
    );
}

// ============================================================================
// Timeline alignment
// ============================================================================

#[test]
fn test_staggered_projects_carry_forward() {
    let r = range(d(1, 1), d(4, 1));
    let early = series(
        "early",
        r,
        vec![
            snap("early", d(1, 1), dec!(100), dec!(100), dec!(100)),
            snap("early", d(2, 1), dec!(200), dec!(180), dec!(190)),
        ],
    );
    let late = series(
        "late",
        r,
        vec![
            snap("late", d(3, 1), dec!(50), dec!(40), dec!(60)),
            snap("late", d(4, 1), dec!(80), dec!(80), dec!(90)),
        ],
    );

    let result = aggregate(&[early, late], r).unwrap();
    let dates: Vec<NaiveDate> = result.points.iter().map(|p| p.date).collect();
    assert_eq!(dates, vec![d(1, 1), d(2, 1), d(3, 1), d(4, 1)]);

    // Only "early" has data before March.
    assert_eq!(result.points[1].total_planned_value, dec!(200));
    assert_eq!(result.points[1].contributing_projects, 1);

    // "early" carries its February snapshot into March and April.
    assert_eq!(result.points[2].total_planned_value, dec!(250));
    assert_eq!(result.points[3].total_actual_cost, dec!(280));
    assert_eq!(result.points[3].contributing_projects, 2);
}

#[test]
fn test_snapshots_outside_range_are_ignored() {
    let full = range(d(1, 1), d(6, 1));
    let project = series(
        "p",
        full,
        vec![
            snap("p", d(1, 1), dec!(10), dec!(10), dec!(10)),
            snap("p", d(3, 1), dec!(30), dec!(30), dec!(30)),
            snap("p", d(6, 1), dec!(60), dec!(60), dec!(60)),
        ],
    );

    let result = aggregate(&[project], range(d(2, 1), d(5, 1))).unwrap();

    assert_eq!(result.points.len(), 1);
    assert_eq!(result.points[0].date, d(3, 1));
    assert_eq!(result.points[0].total_planned_value, dec!(30));
}

#[test]
fn test_empty_selection_is_empty() {
    let result = aggregate(&[], range(d(1, 1), d(12, 1))).unwrap();
    assert!(result.points.is_empty());
    assert!(result.included_projects.is_empty());
    assert!(result.excluded_projects.is_empty());
}

// ============================================================================
// Exclusions
// ============================================================================

#[test]
fn test_duplicate_and_failed_projects_are_excluded() {
    let r = range(d(1, 1), d(1, 1));
    let a = series("a", r, vec![snap("a", d(1, 1), dec!(10), dec!(10), dec!(10))]);
    let again = a.clone();

    let mut aggregator = PortfolioAggregator::new(r);
    aggregator
        .include(&a)
        .include(&again)
        .exclude("ghost", "Unknown project 'ghost'");
    let result = aggregator.finish().unwrap();

    assert_eq!(result.included_projects, vec!["a".to_string()]);
    assert_eq!(result.points[0].total_planned_value, dec!(10));
    assert_eq!(result.excluded_projects.len(), 2);
    assert_eq!(result.excluded_projects[1].project_id, "ghost");
}

// ============================================================================
// Single-project identity
// ============================================================================

#[test]
fn test_single_project_twelve_months_round_trip() {
    let budget = ProjectBudget {
        project_id: "tower".to_string(),
        name: None,
        budget_at_completion: dec!(120000),
        planned_duration_days: 365,
        start_date: Some(d(1, 1)),
    };
    let costs: Vec<CostRecord> = (1..=12u32)
        .map(|m| CostRecord {
            project_id: "tower".to_string(),
            date: d(m, 10),
            planned_cost: dec!(10000),
            actual_cost: dec!(10500),
        })
        .collect();
    let progress: Vec<ProgressRecord> = (1..=12u32)
        .map(|m| ProgressRecord {
            project_id: "tower".to_string(),
            date: d(m, 25),
            percent_complete: Decimal::from(m * 8),
        })
        .collect();
    let records = ProjectRecords::new(&budget, &costs, &progress).unwrap();
    let settings = EvmSettings::default();
    let r = range(d(1, 1), d(12, 31));
    let project_series = build_series(&records, r, ReportingBucket::Month, &settings)
        .collect_series()
        .unwrap();

    let result = aggregate(std::slice::from_ref(&project_series), r).unwrap();

    assert_eq!(result.points.len(), 12);
    for (point, snapshot) in result.points.iter().zip(&project_series.snapshots) {
        assert_eq!(point.date, snapshot.as_of_date);
        assert_eq!(point.total_planned_value, snapshot.planned_value);
        assert_eq!(point.total_earned_value, snapshot.earned_value);
        assert_eq!(point.total_actual_cost, snapshot.actual_cost);
        assert_eq!(point.weighted_cpi, snapshot.cost_performance_index);
        assert_eq!(point.weighted_spi, snapshot.schedule_performance_index);
    }
}
