//! Portfolio service implementation.

use chrono::NaiveDate;
use log::{debug, warn};
use rayon::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;

use super::portfolio_aggregator::PortfolioAggregator;
use super::portfolio_model::{
    ExcludedProject, PortfolioSeries, PortfolioSnapshot, PortfolioSummary, ProjectFilter,
    StatusCounts,
};
use super::portfolio_traits::PortfolioServiceTrait;
use crate::errors::Result;
use crate::evm::{EvmServiceTrait, EvmSnapshot, ReportingBucket};
use crate::projects::ProjectBudget;
use crate::records::RecordStoreTrait;
use crate::utils::DateRange;

/// Runs the per-project engine across a selection and rolls the results up.
pub struct PortfolioService {
    record_store: Arc<dyn RecordStoreTrait>,
    evm_service: Arc<dyn EvmServiceTrait>,
}

impl PortfolioService {
    pub fn new(
        record_store: Arc<dyn RecordStoreTrait>,
        evm_service: Arc<dyn EvmServiceTrait>,
    ) -> Self {
        Self {
            record_store,
            evm_service,
        }
    }
}

/// Selection order is kept; repeated ids are dropped.
fn unique_ids(project_ids: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    project_ids
        .iter()
        .map(String::as_str)
        .filter(|id| seen.insert(*id))
        .collect()
}

impl PortfolioServiceTrait for PortfolioService {
    fn aggregate(
        &self,
        project_ids: &[String],
        range: DateRange,
        bucket: ReportingBucket,
    ) -> Result<PortfolioSeries> {
        let ids = unique_ids(project_ids);
        let results: Vec<_> = ids
            .par_iter()
            .map(|id| (*id, self.evm_service.get_series(id, range, bucket)))
            .collect();

        let mut computed = Vec::with_capacity(results.len());
        let mut failed = Vec::new();
        for (id, result) in results {
            match result {
                Ok(series) => computed.push(series),
                Err(e) => failed.push((id, e.to_string())),
            }
        }

        let mut aggregator = PortfolioAggregator::new(range);
        for series in &computed {
            aggregator.include(series);
        }
        for (id, reason) in failed {
            aggregator.exclude(id, reason);
        }
        aggregator.finish()
    }

    fn summarize(
        &self,
        project_ids: &[String],
        as_of: NaiveDate,
        filter: &ProjectFilter,
    ) -> Result<PortfolioSummary> {
        let ids = unique_ids(project_ids);
        let results: Vec<_> = ids
            .par_iter()
            .map(|id| (*id, self.evm_service.get_snapshot(id, as_of)))
            .collect();

        let mut snapshots: Vec<EvmSnapshot> = Vec::with_capacity(results.len());
        let mut excluded_projects = Vec::new();
        for (id, result) in results {
            match result {
                Ok(snapshot) => snapshots.push(snapshot),
                Err(e) => {
                    warn!("Excluding project '{}' from summary: {}", id, e);
                    excluded_projects.push(ExcludedProject {
                        project_id: id.to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        let totals = PortfolioSnapshot::from_snapshots(as_of, &snapshots)?;
        let status_counts: StatusCounts = snapshots.iter().collect();
        let projects: Vec<EvmSnapshot> = snapshots
            .into_iter()
            .filter(|s| filter.matches(s))
            .collect();

        debug!(
            "Summarized {} projects as of {}: {} listed, {} excluded",
            status_counts.total(),
            as_of,
            projects.len(),
            excluded_projects.len()
        );

        Ok(PortfolioSummary {
            as_of_date: as_of,
            totals,
            status_counts,
            projects,
            excluded_projects,
        })
    }

    fn list_projects(&self) -> Result<Vec<ProjectBudget>> {
        self.record_store
            .list_project_ids()?
            .iter()
            .map(|id| self.record_store.get_budget(id))
            .collect()
    }
}
