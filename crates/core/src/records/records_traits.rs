//! Query contract the engine expects from a record store.

use chrono::NaiveDate;

use super::{CostRecord, ProgressRecord};
use crate::errors::Result;
use crate::projects::ProjectBudget;

/// Read access to validated project records.
///
/// Implementations return rows ordered by date ascending and already
/// validated. An unknown project id is reported as
/// `ConfigurationError::UnknownProject`.
pub trait RecordStoreTrait: Send + Sync {
    /// Cost records of a project within an optional inclusive date range.
    fn get_cost_records(
        &self,
        project_id: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<CostRecord>>;

    /// Progress records of a project within an optional inclusive date range.
    fn get_progress_records(
        &self,
        project_id: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<ProgressRecord>>;

    /// Budget baseline of a project.
    fn get_budget(&self, project_id: &str) -> Result<ProjectBudget>;

    /// Ids of every known project, in a stable order.
    fn list_project_ids(&self) -> Result<Vec<String>>;
}
