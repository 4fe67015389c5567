use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::HistoryError;
use crate::instance::ProcessInstance;

/// Trait for workflow history storage backends.
///
/// Both list operations return finished instances only, sorted
/// ascending by end time, starting at offset 0, and at most `limit`
/// entries long. A page shorter than `limit` means the backend holds
/// no further matching instances; the cleanup engine relies on this to
/// terminate.
///
/// Implementations must be `Send + Sync` to be shared across async
/// tasks.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Fetch one page of finished instances, oldest first.
    async fn list_finished(&self, limit: usize) -> Result<Vec<ProcessInstance>, HistoryError>;

    /// Fetch one page of finished instances that completed strictly
    /// before `before`, oldest first.
    async fn list_finished_before(
        &self,
        limit: usize,
        before: DateTime<Utc>,
    ) -> Result<Vec<ProcessInstance>, HistoryError>;

    /// Delete the history of a single instance.
    ///
    /// Deleting an id the backend does not know is an error
    /// ([`HistoryError::NotFound`]), not a no-op.
    async fn delete_instance(&self, id: &str) -> Result<(), HistoryError>;

    /// Total number of finished instances.
    ///
    /// Not used by the cleanup loop; exists for operational checks and
    /// the test harness.
    async fn count_finished(&self) -> Result<i64, HistoryError>;
}
