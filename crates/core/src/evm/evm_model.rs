//! Earned value domain models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::data_quality::DataQualityWarning;
use crate::errors::ValidationError;
use crate::utils::DateRange;

/// Why a performance index cannot be computed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UndefinedReason {
    /// Actual cost is zero, so CPI has no denominator.
    NoCostDataYet,
    /// Planned value is zero, so SPI has no denominator.
    NoPlannedValueYet,
}

/// A CPI/SPI style ratio that may not be measurable yet.
///
/// A missing denominator is its own state. It is never folded into 0 or 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum PerformanceIndex {
    Measurable { value: Decimal },
    NotYetMeasurable { reason: UndefinedReason },
}

impl PerformanceIndex {
    /// `numerator / denominator`, or `NotYetMeasurable(reason)` when the denominator is not positive.
    ///
    /// `None` when the quotient does not fit in a `Decimal`.
    pub fn ratio(numerator: Decimal, denominator: Decimal, reason: UndefinedReason) -> Option<Self> {
        if denominator > Decimal::ZERO {
            numerator
                .checked_div(denominator)
                .map(|value| PerformanceIndex::Measurable { value })
        } else {
            Some(PerformanceIndex::NotYetMeasurable { reason })
        }
    }

    pub fn value(&self) -> Option<Decimal> {
        match self {
            PerformanceIndex::Measurable { value } => Some(*value),
            PerformanceIndex::NotYetMeasurable { .. } => None,
        }
    }

    pub fn is_measurable(&self) -> bool {
        matches!(self, PerformanceIndex::Measurable { .. })
    }
}

/// Schedule/cost health derived from CPI and SPI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProjectStatus {
    Ahead,
    OnTrack,
    Behind,
    NotYetMeasurable,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Ahead => "ahead",
            ProjectStatus::OnTrack => "onTrack",
            ProjectStatus::Behind => "behind",
            ProjectStatus::NotYetMeasurable => "notYetMeasurable",
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .trim()
            .to_ascii_lowercase()
            .replace(|c: char| c == '_' || c == '-', "");
        match normalized.as_str() {
            "ahead" => Ok(ProjectStatus::Ahead),
            "ontrack" => Ok(ProjectStatus::OnTrack),
            "behind" => Ok(ProjectStatus::Behind),
            "notyetmeasurable" => Ok(ProjectStatus::NotYetMeasurable),
            other => Err(ValidationError::InvalidInput(format!(
                "unknown project status '{}'",
                other
            ))),
        }
    }
}

/// Reporting interval used to resample records onto a uniform timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportingBucket {
    /// Every calendar day
    Day,
    /// Every Thursday, when weekly site reports close
    Week,
    /// First day of every month
    #[default]
    Month,
}

impl ReportingBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportingBucket::Day => "day",
            ReportingBucket::Week => "week",
            ReportingBucket::Month => "month",
        }
    }
}

impl FromStr for ReportingBucket {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" | "daily" => Ok(ReportingBucket::Day),
            "week" | "weekly" => Ok(ReportingBucket::Week),
            "month" | "monthly" => Ok(ReportingBucket::Month),
            other => Err(ValidationError::InvalidInput(format!(
                "unknown reporting bucket '{}'",
                other
            ))),
        }
    }
}

/// Point-in-time earned value metrics of one project.
///
/// Always recomputed from records; never mutated after construction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EvmSnapshot {
    pub project_id: String,
    pub as_of_date: NaiveDate,
    pub budget_at_completion: Decimal,
    /// Planned percent complete (0-100), clamped at 100
    pub planned_percent_complete: Decimal,
    /// Latest reported percent complete (0-100)
    pub actual_percent_complete: Decimal,
    pub planned_value: Decimal,
    pub earned_value: Decimal,
    pub actual_cost: Decimal,
    /// EV - AC
    pub cost_variance: Decimal,
    /// EV - PV
    pub schedule_variance: Decimal,
    pub cost_performance_index: PerformanceIndex,
    pub schedule_performance_index: PerformanceIndex,
    pub estimate_at_completion: Decimal,
    pub estimate_to_complete: Decimal,
    pub variance_at_completion: Decimal,
    /// CV as a percentage of PV; `None` while PV is zero
    pub cost_variance_percent: Option<Decimal>,
    /// SV as a percentage of PV; `None` while PV is zero
    pub schedule_variance_percent: Option<Decimal>,
    pub status: ProjectStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<DataQualityWarning>,
}

/// Ordered per-bucket snapshots of one project, the S-curve data source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSeries {
    pub project_id: String,
    pub bucket: ReportingBucket,
    pub range: DateRange,
    pub snapshots: Vec<EvmSnapshot>,
}

/// Direction of a performance index over the most recent reporting points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TrendDirection {
    Improving,
    Stable,
    Declining,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrendAnalysis {
    pub project_id: String,
    pub latest_cpi: Option<PerformanceIndex>,
    pub latest_spi: Option<PerformanceIndex>,
    pub cpi_trend: TrendDirection,
    pub spi_trend: TrendDirection,
    pub data_points: usize,
}
