//! Data-quality checks over a project's records.
//!
//! Findings are annotations: the calculator still uses the records as given.

use chrono::NaiveDate;
use log::warn;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::projects::ProjectBudget;
use crate::records::{CostRecord, ProgressRecord};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DataQualityIssue {
    /// A progress report lower than an earlier one.
    #[serde(rename_all = "camelCase")]
    NonMonotonicProgress {
        previous_percent: Decimal,
        reported_percent: Decimal,
    },
    /// A cost record dated before the project start.
    #[serde(rename_all = "camelCase")]
    CostBeforeProjectStart { project_start: NaiveDate },
    /// Cumulative planned cost went past the budget at completion.
    #[serde(rename_all = "camelCase")]
    PlannedCostExceedsBudget {
        cumulative_planned_cost: Decimal,
        budget_at_completion: Decimal,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQualityWarning {
    pub project_id: String,
    /// Date of the offending record
    pub date: NaiveDate,
    #[serde(flatten)]
    pub issue: DataQualityIssue,
}

impl std::fmt::Display for DataQualityWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.issue {
            DataQualityIssue::NonMonotonicProgress {
                previous_percent,
                reported_percent,
            } => write!(
                f,
                "project '{}' reported {}% on {} after an earlier {}%",
                self.project_id, reported_percent, self.date, previous_percent
            ),
            DataQualityIssue::CostBeforeProjectStart { project_start } => write!(
                f,
                "project '{}' has a cost record on {} before its start {}",
                self.project_id, self.date, project_start
            ),
            DataQualityIssue::PlannedCostExceedsBudget {
                cumulative_planned_cost,
                budget_at_completion,
            } => write!(
                f,
                "project '{}' planned cost reaches {} on {}, above its budget {}",
                self.project_id, cumulative_planned_cost, self.date, budget_at_completion
            ),
        }
    }
}

/// Runs every check and returns the findings ordered by date.
pub fn inspect_records(
    budget: &ProjectBudget,
    cost_records: &[CostRecord],
    progress_records: &[ProgressRecord],
) -> Vec<DataQualityWarning> {
    let mut warnings = Vec::new();
    warnings.extend(check_progress_monotonic(budget, progress_records));
    warnings.extend(check_costs_after_start(budget, cost_records));
    warnings.extend(check_planned_within_budget(budget, cost_records));
    warnings.sort_by_key(|w| w.date);

    for warning in &warnings {
        warn!("Data quality: {}", warning);
    }
    warnings
}

fn check_progress_monotonic(
    budget: &ProjectBudget,
    progress_records: &[ProgressRecord],
) -> Vec<DataQualityWarning> {
    let mut ordered: Vec<&ProgressRecord> = progress_records.iter().collect();
    ordered.sort_by_key(|r| r.date);

    let mut highest: Option<Decimal> = None;
    let mut warnings = Vec::new();
    for record in ordered {
        match highest {
            Some(previous) if record.percent_complete < previous => {
                warnings.push(DataQualityWarning {
                    project_id: budget.project_id.clone(),
                    date: record.date,
                    issue: DataQualityIssue::NonMonotonicProgress {
                        previous_percent: previous,
                        reported_percent: record.percent_complete,
                    },
                });
            }
            _ => highest = Some(record.percent_complete),
        }
    }
    warnings
}

fn check_costs_after_start(
    budget: &ProjectBudget,
    cost_records: &[CostRecord],
) -> Vec<DataQualityWarning> {
    let Some(project_start) = budget.start_date else {
        return Vec::new();
    };
    cost_records
        .iter()
        .filter(|r| r.date < project_start)
        .map(|r| DataQualityWarning {
            project_id: budget.project_id.clone(),
            date: r.date,
            issue: DataQualityIssue::CostBeforeProjectStart { project_start },
        })
        .collect()
}

fn check_planned_within_budget(
    budget: &ProjectBudget,
    cost_records: &[CostRecord],
) -> Option<DataQualityWarning> {
    let mut ordered: Vec<&CostRecord> = cost_records.iter().collect();
    ordered.sort_by_key(|r| r.date);

    let mut cumulative = Decimal::ZERO;
    for record in ordered {
        cumulative = cumulative.saturating_add(record.planned_cost);
        if cumulative > budget.budget_at_completion {
            return Some(DataQualityWarning {
                project_id: budget.project_id.clone(),
                date: record.date,
                issue: DataQualityIssue::PlannedCostExceedsBudget {
                    cumulative_planned_cost: cumulative,
                    budget_at_completion: budget.budget_at_completion,
                },
            });
        }
    }
    None
}
