//! Project budget domain models.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{ConfigurationError, Result, ValidationError};

/// Validated budget baseline of a project. One per project; BAC is always positive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectBudget {
    pub project_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Budget at completion
    pub budget_at_completion: Decimal,
    /// Planned duration in calendar days
    pub planned_duration_days: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
}

impl ProjectBudget {
    /// Planned finish date, when the start date is known.
    pub fn planned_finish(&self) -> Option<NaiveDate> {
        self.start_date?
            .checked_add_signed(Duration::days(i64::from(self.planned_duration_days)))
    }

    /// Re-checks the BAC invariant. Budgets built through `NewProjectBudget`
    /// already satisfy it; budgets deserialized directly may not.
    pub fn ensure_valid(&self) -> Result<()> {
        if self.budget_at_completion <= Decimal::ZERO {
            return Err(ConfigurationError::NonPositiveBudget {
                project_id: self.project_id.clone(),
                bac: self.budget_at_completion,
            }
            .into());
        }
        Ok(())
    }
}

/// Raw budget row as supplied by an external record source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProjectBudget {
    pub project_id: String,
    pub name: Option<String>,
    pub budget_at_completion: Decimal,
    #[serde(default)]
    pub planned_duration_days: u32,
    pub start_date: Option<NaiveDate>,
}

impl NewProjectBudget {
    pub fn validate(&self) -> Result<()> {
        if self.project_id.trim().is_empty() {
            return Err(ValidationError::MissingField("projectId".to_string()).into());
        }
        if self.budget_at_completion <= Decimal::ZERO {
            return Err(ConfigurationError::NonPositiveBudget {
                project_id: self.project_id.clone(),
                bac: self.budget_at_completion,
            }
            .into());
        }
        Ok(())
    }
}

impl TryFrom<NewProjectBudget> for ProjectBudget {
    type Error = crate::errors::Error;

    fn try_from(raw: NewProjectBudget) -> Result<Self> {
        raw.validate()?;
        Ok(Self {
            project_id: raw.project_id.trim().to_string(),
            name: raw
                .name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            budget_at_completion: raw.budget_at_completion,
            planned_duration_days: raw.planned_duration_days,
            start_date: raw.start_date,
        })
    }
}
