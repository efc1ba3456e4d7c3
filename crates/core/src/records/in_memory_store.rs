//! In-memory record store.

use chrono::NaiveDate;
use log::debug;
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use super::{CostRecord, ProgressRecord, RecordSet, RecordStoreTrait};
use crate::errors::{ConfigurationError, Error, Result};
use crate::projects::ProjectBudget;

#[derive(Default)]
struct StoreState {
    budgets: BTreeMap<String, ProjectBudget>,
    cost_records: HashMap<String, Vec<CostRecord>>,
    progress_records: HashMap<String, Vec<ProgressRecord>>,
}

/// Record store backed by process memory.
///
/// Rows are validated when inserted and kept sorted by date; insertion order
/// breaks ties between rows sharing a date.
#[derive(Default)]
pub struct InMemoryRecordStore {
    state: RwLock<StoreState>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from raw rows, rejecting the whole set on the first malformed row.
    pub fn from_record_set(set: RecordSet) -> Result<Self> {
        let store = Self::new();
        for raw in set.budgets {
            store.upsert_budget(raw.try_into()?)?;
        }
        for raw in set.cost_records {
            store.append_cost_record(raw.try_into()?)?;
        }
        for raw in set.progress_records {
            store.append_progress_record(raw.try_into()?)?;
        }
        debug!(
            "Loaded record set for {} projects",
            store.list_project_ids()?.len()
        );
        Ok(store)
    }

    pub fn upsert_budget(&self, budget: ProjectBudget) -> Result<()> {
        budget.ensure_valid()?;
        let mut state = self.write()?;
        state.budgets.insert(budget.project_id.clone(), budget);
        Ok(())
    }

    pub fn append_cost_record(&self, record: CostRecord) -> Result<()> {
        let mut state = self.write()?;
        ensure_known(&state, &record.project_id)?;
        let rows = state
            .cost_records
            .entry(record.project_id.clone())
            .or_default();
        let at = rows.partition_point(|r| r.date <= record.date);
        rows.insert(at, record);
        Ok(())
    }

    pub fn append_progress_record(&self, record: ProgressRecord) -> Result<()> {
        let mut state = self.write()?;
        ensure_known(&state, &record.project_id)?;
        let rows = state
            .progress_records
            .entry(record.project_id.clone())
            .or_default();
        let at = rows.partition_point(|r| r.date <= record.date);
        rows.insert(at, record);
        Ok(())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, StoreState>> {
        self.state
            .read()
            .map_err(|_| Error::Repository("record store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, StoreState>> {
        self.state
            .write()
            .map_err(|_| Error::Repository("record store lock poisoned".to_string()))
    }
}

fn ensure_known(state: &StoreState, project_id: &str) -> Result<()> {
    if state.budgets.contains_key(project_id) {
        Ok(())
    } else {
        Err(ConfigurationError::UnknownProject(project_id.to_string()).into())
    }
}

fn in_range(date: NaiveDate, start: Option<NaiveDate>, end: Option<NaiveDate>) -> bool {
    start.map_or(true, |s| date >= s) && end.map_or(true, |e| date <= e)
}

impl RecordStoreTrait for InMemoryRecordStore {
    fn get_cost_records(
        &self,
        project_id: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<CostRecord>> {
        let state = self.read()?;
        ensure_known(&state, project_id)?;
        Ok(state
            .cost_records
            .get(project_id)
            .map(|rows| {
                rows.iter()
                    .filter(|r| in_range(r.date, start_date, end_date))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn get_progress_records(
        &self,
        project_id: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<ProgressRecord>> {
        let state = self.read()?;
        ensure_known(&state, project_id)?;
        Ok(state
            .progress_records
            .get(project_id)
            .map(|rows| {
                rows.iter()
                    .filter(|r| in_range(r.date, start_date, end_date))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn get_budget(&self, project_id: &str) -> Result<ProjectBudget> {
        let state = self.read()?;
        state
            .budgets
            .get(project_id)
            .cloned()
            .ok_or_else(|| ConfigurationError::UnknownProject(project_id.to_string()).into())
    }

    fn list_project_ids(&self) -> Result<Vec<String>> {
        Ok(self.read()?.budgets.keys().cloned().collect())
    }
}
