//! Portfolio service traits.

use chrono::NaiveDate;

use super::portfolio_model::{PortfolioSeries, PortfolioSummary, ProjectFilter};
use crate::errors::Result;
use crate::evm::ReportingBucket;
use crate::projects::ProjectBudget;
use crate::utils::DateRange;

/// Multi-project operations over a selection of project ids.
///
/// A project that fails to compute is listed as excluded and left out of the
/// totals; it never fails the whole call. An empty selection yields empty
/// results.
pub trait PortfolioServiceTrait: Send + Sync {
    /// Portfolio totals per bucket date over `range`.
    fn aggregate(
        &self,
        project_ids: &[String],
        range: DateRange,
        bucket: ReportingBucket,
    ) -> Result<PortfolioSeries>;

    /// Totals, status counts and filtered project snapshots as of `as_of`.
    fn summarize(
        &self,
        project_ids: &[String],
        as_of: NaiveDate,
        filter: &ProjectFilter,
    ) -> Result<PortfolioSummary>;

    /// Budgets of every known project.
    fn list_projects(&self) -> Result<Vec<ProjectBudget>>;
}
