use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{
    AssignmentHistoryEntry, AssignmentRecord, ExpertisePreference, ProductId, ReviewTask,
    Reviewer, ReviewerId, RoundId,
};

/// Read side of the reviewer pool.
///
/// Implementations must fail closed: a data-access error is an error, never
/// a silently truncated reviewer list.
pub trait ReviewerDirectory: Send + Sync {
    /// All reviewers, optionally restricted to those declaring a preference
    /// for the given category, each with parsed expertise and current
    /// workload.
    fn reviewers(&self, category: Option<&str>) -> Result<Vec<Reviewer>, DirectoryError>;
}

/// Reviewer directory failures; propagated unchanged so planning aborts.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("reviewer directory unavailable: {0}")]
    Unavailable(String),
}

/// Read side of the product catalog, reduced to the scoring projection.
pub trait TaskSource: Send + Sync {
    /// Projections for the requested product ids, in any order. Unknown ids
    /// are omitted rather than reported.
    fn tasks(&self, ids: &[ProductId]) -> Result<Vec<ReviewTask>, TaskSourceError>;
}

/// Task source failures; propagated unchanged so planning aborts.
#[derive(Debug, thiserror::Error)]
pub enum TaskSourceError {
    #[error("task source unavailable: {0}")]
    Unavailable(String),
}

/// Aggregate counters maintained on the owning round at commit time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundTotals {
    pub total_tasks: usize,
    pub total_assignments: usize,
}

/// Write side of the persistence boundary consumed by the committer.
///
/// The three writes are separate operations with no transactional guarantee
/// between them; the committer reports rather than hides a gap.
pub trait AssignmentStore: Send + Sync {
    /// Persist the batch, returning how many records were written.
    fn insert_assignments(&self, records: &[AssignmentRecord]) -> Result<usize, StoreError>;
    /// Append audit events; entries are never mutated or deleted afterwards.
    fn append_history(&self, entries: &[AssignmentHistoryEntry]) -> Result<(), StoreError>;
    /// Refresh the owning round's aggregate counters.
    fn update_round_totals(&self, round_id: &RoundId, totals: RoundTotals)
        -> Result<(), StoreError>;
}

/// Persistence failures; converted into a reportable commit outcome.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("assignment store rejected the batch: {0}")]
    Rejected(String),
    #[error("assignment store unavailable: {0}")]
    Unavailable(String),
}

/// One message per reviewer summarizing their newly committed assignments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentNotice {
    pub reviewer_id: ReviewerId,
    pub round_name: String,
    pub task_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    pub task_names: Vec<String>,
}

/// Outbound notification hook (e-mail, in-app, etc.). Delivery failures are
/// logged by the committer and never affect the commit result.
pub trait ReviewerNotifier: Send + Sync {
    fn notify(&self, notice: AssignmentNotice) -> Result<(), NotifyError>;
}

/// Notification dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Validate a loosely-typed expertise payload into typed preferences.
///
/// Directory backends store expertise as free-form JSON; malformed entries
/// are logged and dropped here so nothing untyped reaches scoring.
pub fn parse_preferences(raw: &serde_json::Value) -> Vec<ExpertisePreference> {
    let Some(entries) = raw.as_array() else {
        if !raw.is_null() {
            tracing::warn!("expertise payload is not an array; ignoring");
        }
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| match serde_json::from_value(entry.clone()) {
            Ok(preference) => Some(preference),
            Err(err) => {
                tracing::warn!(error = %err, "skipping malformed expertise entry");
                None
            }
        })
        .collect()
}
