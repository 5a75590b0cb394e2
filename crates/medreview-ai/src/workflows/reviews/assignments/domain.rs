use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for catalog products.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProductId(pub String);

/// Identifier wrapper for human reviewers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ReviewerId(pub String);

/// Identifier wrapper for review rounds.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RoundId(pub String);

/// Minimal projection of a catalog product needed to plan a review round.
///
/// Owned by the external catalog; the engine never mutates it. Scoring reads
/// only id, category, and company; `name` is carried so reviewer
/// notifications can list what was assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewTask {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub company: String,
}

/// Tagged expertise target declared by a reviewer.
///
/// Serializes as `{"category": "..."}`, `{"company": "..."}`, or
/// `{"product": "..."}`, matching the payload stored by the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpertiseTarget {
    Category(String),
    Company(String),
    Product(ProductId),
}

/// A reviewer's declared affinity for a category, company, or product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpertisePreference {
    #[serde(flatten)]
    pub target: ExpertiseTarget,
    #[serde(default = "default_priority")]
    pub priority: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn default_priority() -> u8 {
    1
}

/// Immutable reviewer snapshot taken at planning time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reviewer {
    pub id: ReviewerId,
    pub display_name: String,
    #[serde(default)]
    pub preferences: Vec<ExpertisePreference>,
    /// Count of already-active assignments when the snapshot was taken.
    #[serde(default)]
    pub active_assignments: u32,
}

/// Planner output for one task; transient until committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposedAssignment {
    pub task_id: ProductId,
    pub reviewer_id: ReviewerId,
    pub match_score: u32,
}

/// Lifecycle of a review round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundStatus {
    Draft,
    Active,
    Completed,
    Archived,
}

impl RoundStatus {
    pub const fn label(self) -> &'static str {
        match self {
            RoundStatus::Draft => "draft",
            RoundStatus::Active => "active",
            RoundStatus::Completed => "completed",
            RoundStatus::Archived => "archived",
        }
    }
}

/// A named, time-boxed batch of tasks requiring review.
///
/// Created and mutated by collaborators outside this workflow; consumed here
/// only as the aggregate committed assignments hang off of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRound {
    pub id: RoundId,
    pub name: String,
    pub round_number: u32,
    pub status: RoundStatus,
    pub starts_on: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ends_on: Option<NaiveDate>,
}

/// Status tracked on persisted assignment records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    Pending,
    InProgress,
    Completed,
    Removed,
}

impl AssignmentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            AssignmentStatus::Pending => "pending",
            AssignmentStatus::InProgress => "in_progress",
            AssignmentStatus::Completed => "completed",
            AssignmentStatus::Removed => "removed",
        }
    }
}

/// Urgency attached to committed assignments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentPriority {
    Low,
    Normal,
    High,
}

impl AssignmentPriority {
    pub const fn label(self) -> &'static str {
        match self {
            AssignmentPriority::Low => "low",
            AssignmentPriority::Normal => "normal",
            AssignmentPriority::High => "high",
        }
    }
}

impl Default for AssignmentPriority {
    fn default() -> Self {
        AssignmentPriority::Normal
    }
}

/// Persisted link between one task, one reviewer, and one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRecord {
    pub task_id: ProductId,
    pub reviewer_id: ReviewerId,
    pub round_id: RoundId,
    pub status: AssignmentStatus,
    pub priority: AssignmentPriority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
}

/// Kind of change captured in the assignment audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentChange {
    Initial,
    Reassign,
    Remove,
}

impl AssignmentChange {
    pub const fn label(self) -> &'static str {
        match self {
            AssignmentChange::Initial => "initial",
            AssignmentChange::Reassign => "reassign",
            AssignmentChange::Remove => "remove",
        }
    }
}

/// Append-only audit event; never mutated or deleted once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentHistoryEntry {
    pub round_id: RoundId,
    pub task_id: ProductId,
    pub assigned_to: ReviewerId,
    pub previous_assignee: Option<ReviewerId>,
    pub change: AssignmentChange,
    pub actor: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub recorded_at: DateTime<Utc>,
}
