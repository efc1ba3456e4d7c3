//! Portfolio domain models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::evm::{EvmSnapshot, PerformanceIndex, ProjectStatus, UndefinedReason};
use crate::utils::DateRange;

/// Portfolio totals at a single date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSnapshot {
    pub date: NaiveDate,
    pub total_planned_value: Decimal,
    pub total_earned_value: Decimal,
    pub total_actual_cost: Decimal,
    pub total_cost_variance: Decimal,
    pub total_schedule_variance: Decimal,
    /// ΣEV / ΣAC
    pub weighted_cpi: PerformanceIndex,
    /// ΣEV / ΣPV
    pub weighted_spi: PerformanceIndex,
    /// Projects with a snapshot at or before `date`
    pub contributing_projects: usize,
}

impl PortfolioSnapshot {
    /// Sums the given project snapshots. The indices are cost-weighted ratios
    /// of the sums, never a mean of per-project ratios.
    pub fn from_snapshots<'a, I>(date: NaiveDate, snapshots: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a EvmSnapshot>,
    {
        let overflow = |what: &str| Error::Overflow(format!("portfolio {} on {}", what, date));

        let mut planned = Decimal::ZERO;
        let mut earned = Decimal::ZERO;
        let mut actual = Decimal::ZERO;
        let mut contributing = 0;
        for snapshot in snapshots {
            planned = planned
                .checked_add(snapshot.planned_value)
                .ok_or_else(|| overflow("planned value"))?;
            earned = earned
                .checked_add(snapshot.earned_value)
                .ok_or_else(|| overflow("earned value"))?;
            actual = actual
                .checked_add(snapshot.actual_cost)
                .ok_or_else(|| overflow("actual cost"))?;
            contributing += 1;
        }

        Ok(Self {
            date,
            total_planned_value: planned,
            total_earned_value: earned,
            total_actual_cost: actual,
            total_cost_variance: earned
                .checked_sub(actual)
                .ok_or_else(|| overflow("cost variance"))?,
            total_schedule_variance: earned
                .checked_sub(planned)
                .ok_or_else(|| overflow("schedule variance"))?,
            weighted_cpi: PerformanceIndex::ratio(earned, actual, UndefinedReason::NoCostDataYet)
                .ok_or_else(|| overflow("cost performance index"))?,
            weighted_spi: PerformanceIndex::ratio(
                earned,
                planned,
                UndefinedReason::NoPlannedValueYet,
            )
            .ok_or_else(|| overflow("schedule performance index"))?,
            contributing_projects: contributing,
        })
    }
}

/// A selected project left out of the totals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExcludedProject {
    pub project_id: String,
    pub reason: String,
}

/// Portfolio totals over a date range, one point per bucket date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSeries {
    pub range: DateRange,
    pub points: Vec<PortfolioSnapshot>,
    pub included_projects: Vec<String>,
    pub excluded_projects: Vec<ExcludedProject>,
}

/// Number of projects per status.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub ahead: usize,
    pub on_track: usize,
    pub behind: usize,
    pub not_yet_measurable: usize,
}

impl StatusCounts {
    pub fn record(&mut self, status: ProjectStatus) {
        match status {
            ProjectStatus::Ahead => self.ahead += 1,
            ProjectStatus::OnTrack => self.on_track += 1,
            ProjectStatus::Behind => self.behind += 1,
            ProjectStatus::NotYetMeasurable => self.not_yet_measurable += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.ahead + self.on_track + self.behind + self.not_yet_measurable
    }
}

impl<'a> FromIterator<&'a EvmSnapshot> for StatusCounts {
    fn from_iter<I: IntoIterator<Item = &'a EvmSnapshot>>(iter: I) -> Self {
        let mut counts = StatusCounts::default();
        for snapshot in iter {
            counts.record(snapshot.status);
        }
        counts
    }
}

/// Dashboard filter over per-project snapshots.
///
/// An index that is not yet measurable never fails a minimum.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectFilter {
    pub status: Option<ProjectStatus>,
    pub min_cpi: Option<Decimal>,
    pub min_spi: Option<Decimal>,
}

impl ProjectFilter {
    pub fn matches(&self, snapshot: &EvmSnapshot) -> bool {
        if let Some(status) = self.status {
            if snapshot.status != status {
                return false;
            }
        }
        meets_minimum(&snapshot.cost_performance_index, self.min_cpi)
            && meets_minimum(&snapshot.schedule_performance_index, self.min_spi)
    }
}

fn meets_minimum(index: &PerformanceIndex, minimum: Option<Decimal>) -> bool {
    match (index.value(), minimum) {
        (Some(value), Some(minimum)) => value >= minimum,
        _ => true,
    }
}

/// Portfolio state at one date with the per-project breakdown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub as_of_date: NaiveDate,
    /// Totals over every successfully computed project, regardless of the filter.
    pub totals: PortfolioSnapshot,
    pub status_counts: StatusCounts,
    /// Project snapshots that pass the filter.
    pub projects: Vec<EvmSnapshot>,
    pub excluded_projects: Vec<ExcludedProject>,
}
