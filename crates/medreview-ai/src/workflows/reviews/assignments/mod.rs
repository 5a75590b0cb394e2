//! Review assignment planning and commit for the product directory.
//!
//! A planning run takes an immutable snapshot of tasks (products under
//! review) and reviewers, distributes every task to exactly one reviewer
//! under the selected strategy, and hands the proposals back for preview.
//! Nothing is persisted until the committer is invoked with the finalized
//! list.

pub mod committer;
pub mod domain;
pub(crate) mod engine;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use committer::{BulkAssignmentCommitter, CommitOutcome};
pub use domain::{
    AssignmentChange, AssignmentHistoryEntry, AssignmentPriority, AssignmentRecord,
    AssignmentStatus, ExpertisePreference, ExpertiseTarget, ProductId, ProposedAssignment,
    ReviewRound, ReviewTask, Reviewer, ReviewerId, RoundId, RoundStatus,
};
pub use engine::{
    match_score, target_allocations, AssignmentPlanner, AssignmentStrategy, PlanningError,
    RunningWorkload, CATEGORY_MATCH_POINTS, COMPANY_MATCH_POINTS, CONTINUITY_BONUS,
    PRODUCT_MATCH_POINTS,
};
pub use repository::{
    parse_preferences, AssignmentNotice, AssignmentStore, DirectoryError, NotifyError,
    ReviewerDirectory, ReviewerNotifier, RoundTotals, StoreError, TaskSource, TaskSourceError,
};
pub use router::assignment_router;
pub use service::{AssignmentServiceError, ReviewAssignmentService};
