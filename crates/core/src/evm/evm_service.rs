//! EVM service implementation.

use chrono::NaiveDate;
use log::debug;
use std::sync::Arc;

use super::evm_calculator::ProjectRecords;
use super::evm_model::{EvmSnapshot, ProjectSeries, ReportingBucket, TrendAnalysis};
use super::evm_traits::EvmServiceTrait;
use super::series_builder::build_series;
use super::trend::analyze_trend;
use crate::errors::Result;
use crate::projects::ProjectBudget;
use crate::records::{CostRecord, ProgressRecord, RecordStoreTrait};
use crate::settings::EvmSettings;
use crate::utils::DateRange;

/// Records of one project, owned after being fetched from the store.
struct LoadedProject {
    budget: ProjectBudget,
    cost_records: Vec<CostRecord>,
    progress_records: Vec<ProgressRecord>,
}

impl LoadedProject {
    fn records(&self) -> Result<ProjectRecords<'_>> {
        ProjectRecords::new(&self.budget, &self.cost_records, &self.progress_records)
    }
}

/// Fetches project records from a record store and runs the calculator on them.
pub struct EvmService {
    record_store: Arc<dyn RecordStoreTrait>,
    settings: EvmSettings,
}

impl EvmService {
    pub fn new(record_store: Arc<dyn RecordStoreTrait>, settings: EvmSettings) -> Self {
        Self {
            record_store,
            settings,
        }
    }

    /// Loads everything up to `end`. The start stays open so cumulative sums are complete.
    fn load_project(&self, project_id: &str, end: NaiveDate) -> Result<LoadedProject> {
        let budget = self.record_store.get_budget(project_id)?;
        let cost_records = self
            .record_store
            .get_cost_records(project_id, None, Some(end))?;
        let progress_records = self
            .record_store
            .get_progress_records(project_id, None, Some(end))?;
        debug!(
            "Loaded project '{}' up to {}: {} cost records, {} progress records",
            project_id,
            end,
            cost_records.len(),
            progress_records.len()
        );
        Ok(LoadedProject {
            budget,
            cost_records,
            progress_records,
        })
    }
}

impl EvmServiceTrait for EvmService {
    fn get_snapshot(&self, project_id: &str, as_of: NaiveDate) -> Result<EvmSnapshot> {
        let loaded = self.load_project(project_id, as_of)?;
        loaded.records()?.snapshot_at(as_of, &self.settings)
    }

    fn get_series(
        &self,
        project_id: &str,
        range: DateRange,
        bucket: ReportingBucket,
    ) -> Result<ProjectSeries> {
        let loaded = self.load_project(project_id, range.end())?;
        let records = loaded.records()?;
        let series = build_series(&records, range, bucket, &self.settings).collect_series_par()?;
        debug!(
            "Built {} {} buckets for project '{}' over {}",
            series.snapshots.len(),
            bucket.as_str(),
            project_id,
            range
        );
        Ok(series)
    }

    fn get_trend(
        &self,
        project_id: &str,
        range: DateRange,
        bucket: ReportingBucket,
    ) -> Result<TrendAnalysis> {
        let series = self.get_series(project_id, range, bucket)?;
        Ok(analyze_trend(project_id, &series.snapshots, &self.settings))
    }
}
