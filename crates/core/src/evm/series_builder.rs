//! Resamples a project's records onto a uniform reporting timeline.

use chrono::{Duration, NaiveDate};
use rayon::prelude::*;

use super::evm_calculator::ProjectRecords;
use super::evm_model::{EvmSnapshot, ProjectSeries, ReportingBucket};
use crate::constants::WEEKLY_BUCKET_WEEKDAY;
use crate::errors::Result;
use crate::settings::EvmSettings;
use crate::utils::time_utils::{first_of_next_month, month_start_on_or_after, weekday_on_or_after};
use crate::utils::DateRange;

/// Bucket boundary dates inside an inclusive range, in ascending order.
#[derive(Debug, Clone)]
pub struct BucketTimeline {
    bucket: ReportingBucket,
    end: NaiveDate,
    next: Option<NaiveDate>,
}

impl BucketTimeline {
    pub fn new(range: DateRange, bucket: ReportingBucket) -> Self {
        let first = match bucket {
            ReportingBucket::Day => Some(range.start()),
            ReportingBucket::Week => weekday_on_or_after(range.start(), WEEKLY_BUCKET_WEEKDAY),
            ReportingBucket::Month => month_start_on_or_after(range.start()),
        };
        Self {
            bucket,
            end: range.end(),
            next: first.filter(|d| *d <= range.end()),
        }
    }

    fn advance(&self, date: NaiveDate) -> Option<NaiveDate> {
        match self.bucket {
            ReportingBucket::Day => date.succ_opt(),
            ReportingBucket::Week => date.checked_add_signed(Duration::days(7)),
            ReportingBucket::Month => first_of_next_month(date),
        }
    }
}

impl Iterator for BucketTimeline {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next?;
        self.next = self.advance(current).filter(|d| *d <= self.end);
        Some(current)
    }
}

/// Lazy, restartable series of snapshots, one per bucket boundary.
///
/// Each snapshot is computed from scratch at its own date, so partial
/// consumption, restarts and parallel evaluation all yield the same values.
#[derive(Debug, Clone)]
pub struct SeriesBuilder<'a> {
    records: &'a ProjectRecords<'a>,
    range: DateRange,
    bucket: ReportingBucket,
    settings: &'a EvmSettings,
}

impl<'a> SeriesBuilder<'a> {
    pub fn new(
        records: &'a ProjectRecords<'a>,
        range: DateRange,
        bucket: ReportingBucket,
        settings: &'a EvmSettings,
    ) -> Self {
        Self {
            records,
            range,
            bucket,
            settings,
        }
    }

    pub fn timeline(&self) -> BucketTimeline {
        BucketTimeline::new(self.range, self.bucket)
    }

    /// A fresh pass over the series.
    pub fn iter(&self) -> impl Iterator<Item = Result<EvmSnapshot>> + 'a {
        let records = self.records;
        let settings = self.settings;
        self.timeline()
            .map(move |date| records.snapshot_at(date, settings))
    }

    /// Stops at the first bucket whose snapshot cannot be computed.
    pub fn collect_series(&self) -> Result<ProjectSeries> {
        Ok(self.wrap(self.iter().collect::<Result<_>>()?))
    }

    /// Same result as `collect_series`, with buckets evaluated on the rayon pool.
    pub fn collect_series_par(&self) -> Result<ProjectSeries> {
        let dates: Vec<NaiveDate> = self.timeline().collect();
        let snapshots = dates
            .par_iter()
            .map(|date| self.records.snapshot_at(*date, self.settings))
            .collect::<Result<_>>()?;
        Ok(self.wrap(snapshots))
    }

    fn wrap(&self, snapshots: Vec<EvmSnapshot>) -> ProjectSeries {
        ProjectSeries {
            project_id: self.records.project_id().to_string(),
            bucket: self.bucket,
            range: self.range,
            snapshots,
        }
    }
}

/// Builds the bucketed series of a project over `range`.
pub fn build_series<'a>(
    records: &'a ProjectRecords<'a>,
    range: DateRange,
    bucket: ReportingBucket,
    settings: &'a EvmSettings,
) -> SeriesBuilder<'a> {
    SeriesBuilder::new(records, range, bucket, settings)
}
