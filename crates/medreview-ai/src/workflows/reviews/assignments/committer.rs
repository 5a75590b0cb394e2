use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{
    AssignmentChange, AssignmentHistoryEntry, AssignmentPriority, AssignmentRecord,
    AssignmentStatus, ProductId, ProposedAssignment, ReviewRound, ReviewTask, ReviewerId,
};
use super::repository::{AssignmentNotice, AssignmentStore, ReviewerNotifier, RoundTotals};

/// Result of a bulk commit, reportable to an interactive caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitOutcome {
    pub success_count: usize,
    pub failed_count: usize,
    pub errors: Vec<String>,
}

impl CommitOutcome {
    pub fn is_clean(&self) -> bool {
        self.failed_count == 0 && self.errors.is_empty()
    }
}

/// Persists a finalized plan through the external persistence boundary.
///
/// Per committed assignment: one `pending` record and one `initial` history
/// entry with no previous assignee. Round aggregates are refreshed and each
/// affected reviewer is notified once, batched across their tasks. The
/// record, history, and round-total writes are not atomic with each other;
/// failures after the record insert are reported in `errors` so the operator
/// can see the audit gap. Duplicate prevention across repeated commits is the
/// caller's responsibility.
pub struct BulkAssignmentCommitter<S, N> {
    store: Arc<S>,
    notifier: Arc<N>,
}

impl<S, N> BulkAssignmentCommitter<S, N>
where
    S: AssignmentStore + 'static,
    N: ReviewerNotifier + 'static,
{
    pub fn new(store: Arc<S>, notifier: Arc<N>) -> Self {
        Self { store, notifier }
    }

    pub fn commit(
        &self,
        round: &ReviewRound,
        proposals: &[ProposedAssignment],
        tasks: &[ReviewTask],
        deadline: Option<NaiveDate>,
        priority: AssignmentPriority,
        actor: &str,
    ) -> CommitOutcome {
        if proposals.is_empty() {
            return CommitOutcome::default();
        }

        let records: Vec<AssignmentRecord> = proposals
            .iter()
            .map(|proposal| AssignmentRecord {
                task_id: proposal.task_id.clone(),
                reviewer_id: proposal.reviewer_id.clone(),
                round_id: round.id.clone(),
                status: AssignmentStatus::Pending,
                priority,
                deadline,
            })
            .collect();

        let inserted = match self.store.insert_assignments(&records) {
            Ok(inserted) => inserted,
            Err(err) => {
                tracing::warn!(round = %round.id.0, error = %err, "assignment batch rejected");
                return CommitOutcome {
                    success_count: 0,
                    failed_count: proposals.len(),
                    errors: vec![err.to_string()],
                };
            }
        };

        let mut errors = Vec::new();
        let recorded_at = Utc::now();
        let history: Vec<AssignmentHistoryEntry> = proposals
            .iter()
            .map(|proposal| AssignmentHistoryEntry {
                round_id: round.id.clone(),
                task_id: proposal.task_id.clone(),
                assigned_to: proposal.reviewer_id.clone(),
                previous_assignee: None,
                change: AssignmentChange::Initial,
                actor: actor.to_string(),
                reason: None,
                recorded_at,
            })
            .collect();

        if let Err(err) = self.store.append_history(&history) {
            tracing::warn!(round = %round.id.0, error = %err, "assignment history append failed");
            errors.push(err.to_string());
        }

        let totals = RoundTotals {
            total_tasks: proposals.len(),
            total_assignments: proposals.len(),
        };
        if let Err(err) = self.store.update_round_totals(&round.id, totals) {
            tracing::warn!(round = %round.id.0, error = %err, "round total update failed");
            errors.push(err.to_string());
        }

        self.dispatch_notices(round, proposals, tasks, deadline);

        CommitOutcome {
            success_count: inserted,
            failed_count: proposals.len().saturating_sub(inserted),
            errors,
        }
    }

    /// Best-effort, one notice per reviewer. Failures are logged and
    /// swallowed; they never surface in the commit outcome.
    fn dispatch_notices(
        &self,
        round: &ReviewRound,
        proposals: &[ProposedAssignment],
        tasks: &[ReviewTask],
        deadline: Option<NaiveDate>,
    ) {
        let names: HashMap<&ProductId, &str> = tasks
            .iter()
            .map(|task| (&task.id, task.name.as_str()))
            .collect();

        let mut by_reviewer: BTreeMap<&ReviewerId, Vec<&ProductId>> = BTreeMap::new();
        for proposal in proposals {
            by_reviewer
                .entry(&proposal.reviewer_id)
                .or_default()
                .push(&proposal.task_id);
        }

        for (reviewer_id, task_ids) in by_reviewer {
            let task_names: Vec<String> = task_ids
                .iter()
                .map(|id| {
                    names
                        .get(id)
                        .map_or_else(|| id.0.clone(), |name| (*name).to_string())
                })
                .collect();

            let notice = AssignmentNotice {
                reviewer_id: reviewer_id.clone(),
                round_name: round.name.clone(),
                task_count: task_names.len(),
                deadline,
                task_names,
            };

            if let Err(err) = self.notifier.notify(notice) {
                tracing::warn!(
                    reviewer = %reviewer_id.0,
                    round = %round.id.0,
                    error = %err,
                    "assignment notification failed"
                );
            }
        }
    }
}
