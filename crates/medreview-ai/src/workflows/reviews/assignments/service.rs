use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::committer::{BulkAssignmentCommitter, CommitOutcome};
use super::domain::{
    AssignmentPriority, ProductId, ProposedAssignment, ReviewRound, ReviewTask,
};
use super::engine::{AssignmentPlanner, AssignmentStrategy, PlanningError};
use super::repository::{
    AssignmentStore, DirectoryError, ReviewerDirectory, ReviewerNotifier, TaskSource,
    TaskSourceError,
};

/// Failures surfaced while preparing a plan.
#[derive(Debug, thiserror::Error)]
pub enum AssignmentServiceError {
    #[error(transparent)]
    Planning(#[from] PlanningError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    #[error(transparent)]
    Tasks(#[from] TaskSourceError),
}

/// Orchestrates the two-phase assignment flow: pure planning over an
/// immutable snapshot, then an explicit commit of the finalized list.
pub struct ReviewAssignmentService<D, T, S, N> {
    directory: Arc<D>,
    tasks: Arc<T>,
    committer: BulkAssignmentCommitter<S, N>,
}

impl<D, T, S, N> ReviewAssignmentService<D, T, S, N>
where
    D: ReviewerDirectory + 'static,
    T: TaskSource + 'static,
    S: AssignmentStore + 'static,
    N: ReviewerNotifier + 'static,
{
    pub fn new(directory: Arc<D>, tasks: Arc<T>, store: Arc<S>, notifier: Arc<N>) -> Self {
        Self {
            directory,
            tasks,
            committer: BulkAssignmentCommitter::new(store, notifier),
        }
    }

    /// Build a plan preview. Nothing is persisted.
    ///
    /// Requested ids are de-duplicated (first occurrence wins) and ids the
    /// catalog no longer knows are skipped. A seed pins the outcome for
    /// reproducible previews; without one each call may distribute
    /// differently.
    pub fn plan(
        &self,
        task_ids: &[ProductId],
        strategy: AssignmentStrategy,
        category: Option<&str>,
        seed: Option<u64>,
    ) -> Result<Vec<ProposedAssignment>, AssignmentServiceError> {
        let mut seen = HashSet::new();
        let unique: Vec<ProductId> = task_ids
            .iter()
            .filter(|id| seen.insert((*id).clone()))
            .cloned()
            .collect();

        let reviewers = self.directory.reviewers(category)?;
        let tasks = self.tasks.tasks(&unique)?;
        tracing::debug!(
            strategy = strategy.as_str(),
            tasks = tasks.len(),
            reviewers = reviewers.len(),
            "planning assignments"
        );

        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let planner = AssignmentPlanner::new(strategy);
        Ok(planner.plan(&tasks, &reviewers, &mut rng)?)
    }

    /// Persist a finalized plan against the given round.
    ///
    /// Task names for the notification batch are re-fetched from the catalog;
    /// if that read fails the commit still proceeds and notices fall back to
    /// raw task ids.
    pub fn commit(
        &self,
        round: &ReviewRound,
        proposals: &[ProposedAssignment],
        deadline: Option<NaiveDate>,
        priority: AssignmentPriority,
        actor: &str,
    ) -> CommitOutcome {
        let ids: Vec<ProductId> = proposals
            .iter()
            .map(|proposal| proposal.task_id.clone())
            .collect();
        let tasks: Vec<ReviewTask> = match self.tasks.tasks(&ids) {
            Ok(tasks) => tasks,
            Err(err) => {
                tracing::warn!(error = %err, "task lookup failed; notices will use raw ids");
                Vec::new()
            }
        };

        self.committer
            .commit(round, proposals, &tasks, deadline, priority, actor)
    }
}
