//! Rolls per-project series up into portfolio totals.

use chrono::NaiveDate;
use log::{debug, warn};
use std::collections::{BTreeSet, HashSet};

use super::portfolio_model::{ExcludedProject, PortfolioSeries, PortfolioSnapshot};
use crate::errors::Result;
use crate::evm::{EvmSnapshot, ProjectSeries};
use crate::utils::DateRange;

/// Collects project series and excluded projects, then sums them per date.
///
/// Dates are the union of every included project's snapshot dates inside the
/// range. At each date a project contributes its latest snapshot at or before
/// that date; a project with no snapshot yet contributes nothing.
pub struct PortfolioAggregator<'a> {
    range: DateRange,
    series: Vec<&'a ProjectSeries>,
    seen: HashSet<&'a str>,
    excluded: Vec<ExcludedProject>,
}

impl<'a> PortfolioAggregator<'a> {
    pub fn new(range: DateRange) -> Self {
        Self {
            range,
            series: Vec::new(),
            seen: HashSet::new(),
            excluded: Vec::new(),
        }
    }

    /// Adds a project series. A second series for the same project is excluded.
    pub fn include(&mut self, series: &'a ProjectSeries) -> &mut Self {
        if self.seen.insert(series.project_id.as_str()) {
            self.series.push(series);
        } else {
            self.exclude(&series.project_id, "duplicate project in selection");
        }
        self
    }

    /// Records a project that could not be computed.
    pub fn exclude(&mut self, project_id: &str, reason: impl Into<String>) -> &mut Self {
        let reason = reason.into();
        warn!("Excluding project '{}' from portfolio: {}", project_id, reason);
        self.excluded.push(ExcludedProject {
            project_id: project_id.to_string(),
            reason,
        });
        self
    }

    /// Fails only when a portfolio total does not fit in a `Decimal`.
    pub fn finish(self) -> Result<PortfolioSeries> {
        let range = self.range;

        // In-range snapshots per project, ordered by date.
        let in_range: Vec<Vec<&EvmSnapshot>> = self
            .series
            .iter()
            .map(|series| {
                let mut snapshots: Vec<&EvmSnapshot> = series
                    .snapshots
                    .iter()
                    .filter(|s| range.contains(s.as_of_date))
                    .collect();
                snapshots.sort_by_key(|s| s.as_of_date);
                snapshots
            })
            .collect();

        let dates: BTreeSet<NaiveDate> = in_range
            .iter()
            .flat_map(|snapshots| snapshots.iter().map(|s| s.as_of_date))
            .collect();

        let points: Vec<PortfolioSnapshot> = dates
            .into_iter()
            .map(|date| {
                let carried = in_range
                    .iter()
                    .filter_map(|snapshots| latest_at_or_before(snapshots, date));
                PortfolioSnapshot::from_snapshots(date, carried)
            })
            .collect::<Result<_>>()?;

        debug!(
            "Aggregated {} projects into {} portfolio points over {} ({} excluded)",
            self.series.len(),
            points.len(),
            range,
            self.excluded.len()
        );

        Ok(PortfolioSeries {
            range,
            points,
            included_projects: self
                .series
                .iter()
                .map(|s| s.project_id.clone())
                .collect(),
            excluded_projects: self.excluded,
        })
    }
}

fn latest_at_or_before<'s>(
    snapshots: &[&'s EvmSnapshot],
    date: NaiveDate,
) -> Option<&'s EvmSnapshot> {
    let idx = snapshots.partition_point(|s| s.as_of_date <= date);
    idx.checked_sub(1).map(|i| snapshots[i])
}

/// Aggregates the given project series over `range`.
pub fn aggregate(series: &[ProjectSeries], range: DateRange) -> Result<PortfolioSeries> {
    let mut aggregator = PortfolioAggregator::new(range);
    for project in series {
        aggregator.include(project);
    }
    aggregator.finish()
}
