//! Cost and progress record models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::FULL_COMPLETION_PERCENT;
use crate::errors::{Result, ValidationError};
use crate::projects::NewProjectBudget;

/// Planned and actual spend booked for one reporting period.
///
/// Amounts are per period; the cumulative curves are running sums by date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CostRecord {
    pub project_id: String,
    pub date: NaiveDate,
    pub planned_cost: Decimal,
    pub actual_cost: Decimal,
}

/// Physical progress reported on a date, in percent (0-100).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub project_id: String,
    pub date: NaiveDate,
    pub percent_complete: Decimal,
}

/// Raw cost row before validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCostRecord {
    pub project_id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub planned_cost: Decimal,
    #[serde(default)]
    pub actual_cost: Decimal,
}

impl NewCostRecord {
    pub fn validate(&self) -> Result<()> {
        if self.project_id.trim().is_empty() {
            return Err(ValidationError::MissingField("projectId".to_string()).into());
        }
        for (field, value) in [
            ("planned cost", self.planned_cost),
            ("actual cost", self.actual_cost),
        ] {
            if value < Decimal::ZERO {
                return Err(ValidationError::NegativeCost {
                    project_id: self.project_id.clone(),
                    date: self.date,
                    field,
                    value,
                }
                .into());
            }
        }
        Ok(())
    }
}

impl TryFrom<NewCostRecord> for CostRecord {
    type Error = crate::errors::Error;

    fn try_from(raw: NewCostRecord) -> Result<Self> {
        raw.validate()?;
        Ok(Self {
            project_id: raw.project_id.trim().to_string(),
            date: raw.date,
            planned_cost: raw.planned_cost,
            actual_cost: raw.actual_cost,
        })
    }
}

/// Raw progress row before validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProgressRecord {
    pub project_id: String,
    pub date: NaiveDate,
    pub percent_complete: Decimal,
}

impl NewProgressRecord {
    pub fn validate(&self) -> Result<()> {
        if self.project_id.trim().is_empty() {
            return Err(ValidationError::MissingField("projectId".to_string()).into());
        }
        if self.percent_complete < Decimal::ZERO || self.percent_complete > FULL_COMPLETION_PERCENT
        {
            return Err(ValidationError::PercentOutOfRange {
                project_id: self.project_id.clone(),
                date: self.date,
                value: self.percent_complete,
            }
            .into());
        }
        Ok(())
    }
}

impl TryFrom<NewProgressRecord> for ProgressRecord {
    type Error = crate::errors::Error;

    fn try_from(raw: NewProgressRecord) -> Result<Self> {
        raw.validate()?;
        Ok(Self {
            project_id: raw.project_id.trim().to_string(),
            date: raw.date,
            percent_complete: raw.percent_complete,
        })
    }
}

/// A bulk set of raw rows, as exported by an external record source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSet {
    #[serde(default)]
    pub budgets: Vec<NewProjectBudget>,
    #[serde(default)]
    pub cost_records: Vec<NewCostRecord>,
    #[serde(default)]
    pub progress_records: Vec<NewProgressRecord>,
}
