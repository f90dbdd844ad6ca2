//! Saved-search list.
//!
//! The list keeps its own copy of the saved records, separate from the
//! orchestrator's displayed weather. It reloads when first synced and
//! whenever the reload counter it is handed changes.

use std::sync::Arc;

use crate::client::{ClientResult, WeatherBackend};
use crate::model::HistoryRecord;

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this record?";

/// Blocking yes/no question asked before destructive actions.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug)]
pub struct HistoryList {
    backend: Arc<dyn WeatherBackend>,
    records: Vec<HistoryRecord>,
    seen: Option<u64>,
}

impl HistoryList {
    pub fn new(backend: Arc<dyn WeatherBackend>) -> Self {
        Self {
            backend,
            records: Vec::new(),
            seen: None,
        }
    }

    /// Newest first.
    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    pub fn get(&self, id: i64) -> Option<&HistoryRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Reload if this is the first sync or `counter` moved since the last one.
    /// Returns whether a reload happened.
    pub async fn sync(&mut self, counter: u64) -> bool {
        if self.seen == Some(counter) {
            return false;
        }
        self.seen = Some(counter);
        self.reload().await;
        true
    }

    /// Fetch all records, logging a failure. On failure the current list is kept.
    pub async fn reload(&mut self) {
        if let Err(e) = self.try_reload().await {
            tracing::warn!(error = %e, "failed to load history");
        }
    }

    /// Fetch all records. On failure the current list is kept and the error returned.
    pub async fn try_reload(&mut self) -> ClientResult<()> {
        let mut records = self.backend.history().await?;
        sort_newest_first(&mut records);
        self.records = records;
        Ok(())
    }

    /// Delete a record after confirmation, then reload.
    ///
    /// Returns `Ok(false)` without touching the backend when the user declines.
    pub async fn delete(&mut self, id: i64, confirm: &impl Confirm) -> ClientResult<bool> {
        if !confirm.confirm(DELETE_PROMPT) {
            return Ok(false);
        }

        if let Err(e) = self.backend.delete_record(id).await {
            tracing::warn!(id, error = %e, "failed to delete record");
            return Err(e);
        }

        self.reload().await;
        Ok(true)
    }
}

/// Record ids stand in for recency.
pub fn sort_newest_first(records: &mut [HistoryRecord]) {
    records.sort_by(|a, b| b.id.cmp(&a.id));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, MockBackend};
    use std::cell::Cell;

    fn list_with(ids: &[i64]) -> (Arc<MockBackend>, HistoryList) {
        let mock = MockBackend::default();
        {
            let mut history = mock.history.lock().unwrap();
            for id in ids {
                history.push(testing::record(*id, &format!("City {id}")));
            }
        }
        let mock = Arc::new(mock);
        let backend: Arc<dyn WeatherBackend> = mock.clone();
        (mock, HistoryList::new(backend))
    }

    fn ids(list: &HistoryList) -> Vec<i64> {
        list.records().iter().map(|r| r.id).collect()
    }

    #[test]
    fn sorts_by_descending_id() {
        let mut records: Vec<_> = [3, 11, 1, 7]
            .iter()
            .map(|id| testing::record(*id, "x"))
            .collect();
        sort_newest_first(&mut records);
        let sorted: Vec<_> = records.iter().map(|r| r.id).collect();
        assert_eq!(sorted, [11, 7, 3, 1]);
    }

    #[tokio::test]
    async fn sync_loads_on_mount_and_on_counter_change() {
        let (mock, mut list) = list_with(&[2, 5, 1]);

        assert!(list.sync(0).await);
        assert_eq!(ids(&list), [5, 2, 1]);

        assert!(!list.sync(0).await);
        assert_eq!(mock.call_count("history"), 1);

        mock.history.lock().unwrap().push(testing::record(6, "Oslo"));
        assert!(list.sync(1).await);
        assert_eq!(ids(&list), [6, 5, 2, 1]);
        assert_eq!(list.get(6).unwrap().conditions.location, "Oslo");
    }

    #[tokio::test]
    async fn failed_reload_keeps_previous_records() {
        let (_mock, mut list) = list_with(&[1, 2]);
        list.sync(0).await;

        let failing: Arc<dyn WeatherBackend> = Arc::new(MockBackend {
            fail_history: true,
            ..Default::default()
        });
        list.backend = failing;
        list.sync(1).await;

        assert_eq!(ids(&list), [2, 1]);
    }

    #[tokio::test]
    async fn try_reload_reports_unreachable_backend() {
        let (_mock, mut list) = list_with(&[4]);
        list.try_reload().await.unwrap();
        assert_eq!(ids(&list), [4]);

        list.backend = Arc::new(MockBackend {
            fail_history: true,
            ..Default::default()
        });
        let err = list.try_reload().await.unwrap_err();

        assert!(err.to_string().contains("404"));
        assert_eq!(ids(&list), [4]);
    }

    #[tokio::test]
    async fn declined_delete_issues_no_request() {
        let (mock, mut list) = list_with(&[1, 2]);
        list.sync(0).await;

        let asked = Cell::new(false);
        let deleted = list
            .delete(2, &|prompt: &str| {
                asked.set(prompt == DELETE_PROMPT);
                false
            })
            .await
            .unwrap();

        assert!(asked.get());
        assert!(!deleted);
        assert_eq!(mock.call_count("delete"), 0);
        assert_eq!(ids(&list), [2, 1]);
    }

    #[tokio::test]
    async fn confirmed_delete_reloads_list() {
        let (mock, mut list) = list_with(&[1, 2, 3]);
        list.sync(0).await;

        let deleted = list.delete(2, &|_: &str| true).await.unwrap();

        assert!(deleted);
        assert_eq!(mock.call_count("delete 2"), 1);
        assert_eq!(ids(&list), [3, 1]);
    }
}
