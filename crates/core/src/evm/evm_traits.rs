//! EVM service traits.

use chrono::NaiveDate;

use super::evm_model::{EvmSnapshot, ProjectSeries, ReportingBucket, TrendAnalysis};
use crate::errors::Result;
use crate::utils::DateRange;

/// Per-project earned value operations.
pub trait EvmServiceTrait: Send + Sync {
    /// Snapshot of a project as of `as_of`.
    ///
    /// Fails with a configuration error for unknown projects or a
    /// non-positive budget. Data-quality findings are attached to the
    /// snapshot instead of failing.
    fn get_snapshot(&self, project_id: &str, as_of: NaiveDate) -> Result<EvmSnapshot>;

    /// One snapshot per bucket boundary inside `range`, ordered by date.
    fn get_series(
        &self,
        project_id: &str,
        range: DateRange,
        bucket: ReportingBucket,
    ) -> Result<ProjectSeries>;

    /// CPI/SPI trend over the bucketed series of `range`.
    fn get_trend(
        &self,
        project_id: &str,
        range: DateRange,
        bucket: ReportingBucket,
    ) -> Result<TrendAnalysis>;
}
