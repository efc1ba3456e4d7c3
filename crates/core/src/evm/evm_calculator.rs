//! Point-in-time earned value calculation.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::data_quality::{inspect_records, DataQualityWarning};
use super::evm_model::{EvmSnapshot, PerformanceIndex, ProjectStatus, UndefinedReason};
use crate::constants::FULL_COMPLETION_PERCENT;
use crate::errors::{Error, Result, ValidationError};
use crate::projects::ProjectBudget;
use crate::records::{CostRecord, ProgressRecord};
use crate::settings::EvmSettings;

/// A project's budget and records, borrowed for the duration of a calculation.
///
/// Construction validates the budget and record ownership and runs the
/// data-quality checks once, so every snapshot taken from it is cheap and
/// independent of the others.
#[derive(Debug, Clone)]
pub struct ProjectRecords<'a> {
    budget: &'a ProjectBudget,
    cost_records: &'a [CostRecord],
    progress_records: &'a [ProgressRecord],
    warnings: Vec<DataQualityWarning>,
}

impl<'a> ProjectRecords<'a> {
    pub fn new(
        budget: &'a ProjectBudget,
        cost_records: &'a [CostRecord],
        progress_records: &'a [ProgressRecord],
    ) -> Result<Self> {
        budget.ensure_valid()?;

        let foreign = cost_records
            .iter()
            .map(|r| &r.project_id)
            .chain(progress_records.iter().map(|r| &r.project_id))
            .find(|id| **id != budget.project_id);
        if let Some(found) = foreign {
            return Err(ValidationError::ProjectMismatch {
                expected: budget.project_id.clone(),
                found: found.clone(),
            }
            .into());
        }

        let warnings = inspect_records(budget, cost_records, progress_records);
        Ok(Self {
            budget,
            cost_records,
            progress_records,
            warnings,
        })
    }

    pub fn budget(&self) -> &ProjectBudget {
        self.budget
    }

    pub fn project_id(&self) -> &str {
        &self.budget.project_id
    }

    /// Every data-quality finding across all records.
    pub fn warnings(&self) -> &[DataQualityWarning] {
        &self.warnings
    }

    /// Computes the snapshot as of `as_of`, looking only at records dated on or before it.
    ///
    /// Fails with `Error::Overflow` when a total or ratio does not fit in a `Decimal`.
    pub fn snapshot_at(&self, as_of: NaiveDate, settings: &EvmSettings) -> Result<EvmSnapshot> {
        let bac = self.budget.budget_at_completion;
        let overflow = |what: &str| {
            Error::Overflow(format!(
                "{} of project '{}' as of {}",
                what, self.budget.project_id, as_of
            ))
        };

        let (cumulative_planned, actual_cost) = self
            .cost_records
            .iter()
            .filter(|r| r.date <= as_of)
            .try_fold((Decimal::ZERO, Decimal::ZERO), |(planned, actual), r| {
                Some((
                    planned.checked_add(r.planned_cost)?,
                    actual.checked_add(r.actual_cost)?,
                ))
            })
            .ok_or_else(|| overflow("cost totals"))?;

        // Stepped at the last planned record and never beyond BAC.
        let planned_value = cumulative_planned.min(bac);
        let planned_percent_complete =
            percent_of(planned_value, bac).ok_or_else(|| overflow("planned percent complete"))?;

        // max_by_key keeps the last of equal dates, i.e. the latest booked report.
        let actual_percent_complete = self
            .progress_records
            .iter()
            .filter(|r| r.date <= as_of)
            .max_by_key(|r| r.date)
            .map(|r| r.percent_complete)
            .unwrap_or(Decimal::ZERO);
        let earned_value = bac
            .checked_mul(actual_percent_complete / FULL_COMPLETION_PERCENT)
            .ok_or_else(|| overflow("earned value"))?;

        let cost_variance = earned_value
            .checked_sub(actual_cost)
            .ok_or_else(|| overflow("cost variance"))?;
        let schedule_variance = earned_value
            .checked_sub(planned_value)
            .ok_or_else(|| overflow("schedule variance"))?;

        let cpi = PerformanceIndex::ratio(earned_value, actual_cost, UndefinedReason::NoCostDataYet)
            .ok_or_else(|| overflow("cost performance index"))?;
        let spi = PerformanceIndex::ratio(
            earned_value,
            planned_value,
            UndefinedReason::NoPlannedValueYet,
        )
        .ok_or_else(|| overflow("schedule performance index"))?;

        let estimate_at_completion = estimate_at_completion(bac, earned_value, actual_cost, &cpi)
            .ok_or_else(|| overflow("estimate at completion"))?;
        let estimate_to_complete = estimate_at_completion
            .checked_sub(actual_cost)
            .ok_or_else(|| overflow("estimate to complete"))?;
        let variance_at_completion = bac
            .checked_sub(estimate_at_completion)
            .ok_or_else(|| overflow("variance at completion"))?;

        let (cost_variance_percent, schedule_variance_percent) = if planned_value > Decimal::ZERO {
            (
                Some(
                    percent_of(cost_variance, planned_value)
                        .ok_or_else(|| overflow("cost variance percent"))?,
                ),
                Some(
                    percent_of(schedule_variance, planned_value)
                        .ok_or_else(|| overflow("schedule variance percent"))?,
                ),
            )
        } else {
            (None, None)
        };

        Ok(EvmSnapshot {
            project_id: self.budget.project_id.clone(),
            as_of_date: as_of,
            budget_at_completion: bac,
            planned_percent_complete,
            actual_percent_complete,
            planned_value,
            earned_value,
            actual_cost,
            cost_variance,
            schedule_variance,
            cost_performance_index: cpi,
            schedule_performance_index: spi,
            estimate_at_completion,
            estimate_to_complete,
            variance_at_completion,
            cost_variance_percent,
            schedule_variance_percent,
            status: classify_status(&cpi, &spi, settings),
            warnings: self
                .warnings
                .iter()
                .filter(|w| w.date <= as_of)
                .cloned()
                .collect(),
        })
    }
}

fn percent_of(value: Decimal, base: Decimal) -> Option<Decimal> {
    value.checked_div(base)?.checked_mul(FULL_COMPLETION_PERCENT)
}

/// EAC = AC + (BAC - EV) / CPI while CPI is measurable and positive, otherwise BAC.
///
/// With CPI = EV / AC the remaining work term is (BAC - EV) * AC / EV, which
/// avoids the rounded quotient. When that product does not fit, the division
/// goes first, and the rounded CPI is the last resort.
fn estimate_at_completion(
    bac: Decimal,
    earned_value: Decimal,
    actual_cost: Decimal,
    cpi: &PerformanceIndex,
) -> Option<Decimal> {
    match cpi.value() {
        Some(index) if index > Decimal::ZERO => {
            let remaining = bac.checked_sub(earned_value)?;
            let remaining_cost = remaining
                .checked_mul(actual_cost)
                .and_then(|product| product.checked_div(earned_value))
                .or_else(|| remaining.checked_div(earned_value)?.checked_mul(actual_cost))
                .or_else(|| remaining.checked_div(index))?;
            actual_cost.checked_add(remaining_cost)
        }
        _ => Some(bac),
    }
}

/// Ahead when both indices reach `ahead_threshold`, on track when both reach
/// `on_track_threshold`, behind otherwise.
pub fn classify_status(
    cpi: &PerformanceIndex,
    spi: &PerformanceIndex,
    settings: &EvmSettings,
) -> ProjectStatus {
    let (Some(cpi), Some(spi)) = (cpi.value(), spi.value()) else {
        return ProjectStatus::NotYetMeasurable;
    };
    if cpi >= settings.ahead_threshold && spi >= settings.ahead_threshold {
        ProjectStatus::Ahead
    } else if cpi >= settings.on_track_threshold && spi >= settings.on_track_threshold {
        ProjectStatus::OnTrack
    } else {
        ProjectStatus::Behind
    }
}

/// Computes a single snapshot from a project's budget and records.
pub fn compute_snapshot(
    budget: &ProjectBudget,
    cost_records: &[CostRecord],
    progress_records: &[ProgressRecord],
    as_of: NaiveDate,
    settings: &EvmSettings,
) -> Result<EvmSnapshot> {
    ProjectRecords::new(budget, cost_records, progress_records)?.snapshot_at(as_of, settings)
}
