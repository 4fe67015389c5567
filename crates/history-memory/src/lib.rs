//! In-memory history store. Suitable for development and testing.
//!
//! Mirrors the remote engine's query semantics: pages are sorted
//! ascending by end time (instances without a parsable end time sort
//! first, as the engine sorts nulls first ascending), the limit is
//! applied after sorting, and deleting an unknown id fails.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use flowreap_history::{HistoryError, HistoryStore, ProcessInstance};

/// In-memory [`HistoryStore`] over a mutex-guarded vector.
///
/// Every stored instance is treated as finished; harnesses insert only
/// completed instances.
#[derive(Default)]
pub struct MemoryHistoryStore {
    instances: Mutex<Vec<ProcessInstance>>,
    /// Number of list calls served, so tests can assert that a pass
    /// made (or did not make) store requests.
    fetches: AtomicUsize,
}

impl MemoryHistoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with the given instances.
    pub fn with_instances(instances: impl IntoIterator<Item = ProcessInstance>) -> Self {
        let store = Self::new();
        store
            .instances
            .lock()
            .expect("instance lock poisoned")
            .extend(instances);
        store
    }

    /// Insert one instance.
    pub fn insert(&self, instance: ProcessInstance) {
        self.instances
            .lock()
            .expect("instance lock poisoned")
            .push(instance);
    }

    /// Number of list requests served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Ids of all remaining instances, in insertion order.
    pub fn remaining_ids(&self) -> Vec<String> {
        self.instances
            .lock()
            .expect("instance lock poisoned")
            .iter()
            .map(|i| i.id.clone())
            .collect()
    }

    fn sorted_page(
        &self,
        limit: usize,
        before: Option<DateTime<Utc>>,
    ) -> Vec<ProcessInstance> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let instances = self.instances.lock().expect("instance lock poisoned");
        let mut page: Vec<ProcessInstance> = instances
            .iter()
            .filter(|i| match before {
                // The server-side filter only matches instances with a
                // valid end time strictly before the cutoff.
                Some(cutoff) => i
                    .end_time_parsed()
                    .is_some_and(|end| end.with_timezone(&Utc) < cutoff),
                None => true,
            })
            .cloned()
            .collect();
        page.sort_by_key(ProcessInstance::end_time_parsed);
        page.truncate(limit);
        page
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn list_finished(&self, limit: usize) -> Result<Vec<ProcessInstance>, HistoryError> {
        Ok(self.sorted_page(limit, None))
    }

    async fn list_finished_before(
        &self,
        limit: usize,
        before: DateTime<Utc>,
    ) -> Result<Vec<ProcessInstance>, HistoryError> {
        Ok(self.sorted_page(limit, Some(before)))
    }

    async fn delete_instance(&self, id: &str) -> Result<(), HistoryError> {
        let mut instances = self.instances.lock().expect("instance lock poisoned");
        let before = instances.len();
        instances.retain(|i| i.id != id);
        if instances.len() == before {
            return Err(HistoryError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn count_finished(&self) -> Result<i64, HistoryError> {
        let len = self.instances.lock().expect("instance lock poisoned").len();
        Ok(i64::try_from(len).unwrap_or(i64::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use flowreap_history::ENGINE_TIME_FORMAT;

    fn finished(id: &str, age: Duration) -> ProcessInstance {
        ProcessInstance {
            id: id.to_string(),
            end_time: Some((Utc::now() - age).format(ENGINE_TIME_FORMAT).to_string()),
            ..ProcessInstance::default()
        }
    }

    #[tokio::test]
    async fn pages_are_sorted_oldest_first_and_limited() {
        let store = MemoryHistoryStore::with_instances([
            finished("young", Duration::minutes(1)),
            finished("old", Duration::hours(3)),
            finished("middle", Duration::minutes(30)),
        ]);

        let page = store.list_finished(2).await.unwrap();
        let ids: Vec<&str> = page.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["old", "middle"]);
    }

    #[tokio::test]
    async fn unparsable_end_times_sort_first() {
        let store = MemoryHistoryStore::with_instances([
            finished("ok", Duration::minutes(5)),
            ProcessInstance {
                id: "garbled".to_string(),
                end_time: Some("yesterday-ish".to_string()),
                ..ProcessInstance::default()
            },
        ]);

        let page = store.list_finished(10).await.unwrap();
        assert_eq!(page[0].id, "garbled");
    }

    #[tokio::test]
    async fn before_filter_excludes_younger_and_unparsable() {
        let store = MemoryHistoryStore::with_instances([
            finished("old", Duration::hours(2)),
            finished("young", Duration::minutes(1)),
            ProcessInstance {
                id: "garbled".to_string(),
                end_time: Some("???".to_string()),
                ..ProcessInstance::default()
            },
        ]);

        let cutoff = Utc::now() - Duration::minutes(10);
        let page = store.list_finished_before(10, cutoff).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, "old");
    }

    #[tokio::test]
    async fn delete_of_missing_id_fails() {
        let store = MemoryHistoryStore::with_instances([finished("a", Duration::minutes(1))]);
        store.delete_instance("a").await.unwrap();
        let err = store.delete_instance("a").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn count_and_fetch_tracking() {
        let store = MemoryHistoryStore::with_instances([
            finished("a", Duration::minutes(1)),
            finished("b", Duration::minutes(2)),
        ]);
        assert_eq!(store.count_finished().await.unwrap(), 2);
        assert_eq!(store.fetch_count(), 0);
        store.list_finished(1).await.unwrap();
        assert_eq!(store.fetch_count(), 1);
    }
}
