use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::reviews::assignments::domain::{
    AssignmentHistoryEntry, AssignmentRecord, ExpertisePreference, ExpertiseTarget, ProductId,
    ReviewRound, ReviewTask, Reviewer, ReviewerId, RoundId, RoundStatus,
};
use crate::workflows::reviews::assignments::repository::{
    AssignmentNotice, AssignmentStore, DirectoryError, NotifyError, ReviewerDirectory,
    ReviewerNotifier, RoundTotals, StoreError, TaskSource, TaskSourceError,
};
use crate::workflows::reviews::assignments::ReviewAssignmentService;

pub(super) fn task(id: &str, name: &str, category: &str, company: &str) -> ReviewTask {
    ReviewTask {
        id: ProductId(id.to_string()),
        name: name.to_string(),
        category: category.to_string(),
        company: company.to_string(),
    }
}

pub(super) fn category_preference(category: &str) -> ExpertisePreference {
    ExpertisePreference {
        target: ExpertiseTarget::Category(category.to_string()),
        priority: 1,
        notes: None,
    }
}

pub(super) fn reviewer(
    id: &str,
    preferences: Vec<ExpertisePreference>,
    active: u32,
) -> Reviewer {
    Reviewer {
        id: ReviewerId(id.to_string()),
        display_name: id.to_string(),
        preferences,
        active_assignments: active,
    }
}

/// Three radiology tasks plus one cardiology task.
pub(super) fn mixed_category_tasks() -> Vec<ReviewTask> {
    vec![
        task("prod-ct-lung", "LungScreen CT", "Radiology", "Aidence"),
        task("prod-xr-chest", "ChestView XR", "Radiology", "Lunit"),
        task("prod-mri-brain", "NeuroScan MRI", "Radiology", "Icometrix"),
        task("prod-ecg-triage", "CardioSort ECG", "Cardiology", "HeartFlow"),
    ]
}

/// One radiology specialist, one generalist with no declared expertise.
pub(super) fn expertise_pair() -> Vec<Reviewer> {
    vec![
        reviewer("rev-specialist", vec![category_preference("Radiology")], 0),
        reviewer("rev-generalist", Vec::new(), 0),
    ]
}

pub(super) fn sample_round() -> ReviewRound {
    ReviewRound {
        id: RoundId("round-2026-q3".to_string()),
        name: "2026 Q3 directory refresh".to_string(),
        round_number: 11,
        status: RoundStatus::Active,
        starts_on: NaiveDate::from_ymd_opt(2026, 7, 1).expect("valid date"),
        ends_on: NaiveDate::from_ymd_opt(2026, 9, 30),
    }
}

pub(super) fn deadline() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 15).expect("valid date")
}

#[derive(Default, Clone)]
pub(super) struct MemoryDirectory {
    pub(super) pool: Vec<Reviewer>,
}

impl MemoryDirectory {
    pub(super) fn with(pool: Vec<Reviewer>) -> Self {
        Self { pool }
    }
}

impl ReviewerDirectory for MemoryDirectory {
    fn reviewers(&self, category: Option<&str>) -> Result<Vec<Reviewer>, DirectoryError> {
        let Some(wanted) = category else {
            return Ok(self.pool.clone());
        };
        Ok(self
            .pool
            .iter()
            .filter(|reviewer| {
                reviewer.preferences.iter().any(|preference| {
                    matches!(
                        &preference.target,
                        ExpertiseTarget::Category(category)
                            if category.eq_ignore_ascii_case(wanted)
                    )
                })
            })
            .cloned()
            .collect())
    }
}

pub(super) struct UnavailableDirectory;

impl ReviewerDirectory for UnavailableDirectory {
    fn reviewers(&self, _category: Option<&str>) -> Result<Vec<Reviewer>, DirectoryError> {
        Err(DirectoryError::Unavailable("directory offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryTasks {
    pub(super) catalog: Vec<ReviewTask>,
}

impl MemoryTasks {
    pub(super) fn with(catalog: Vec<ReviewTask>) -> Self {
        Self { catalog }
    }
}

impl TaskSource for MemoryTasks {
    fn tasks(&self, ids: &[ProductId]) -> Result<Vec<ReviewTask>, TaskSourceError> {
        let by_id: HashMap<&ProductId, &ReviewTask> =
            self.catalog.iter().map(|task| (&task.id, task)).collect();
        Ok(ids
            .iter()
            .filter_map(|id| by_id.get(id).map(|task| (*task).clone()))
            .collect())
    }
}

pub(super) struct UnavailableTasks;

impl TaskSource for UnavailableTasks {
    fn tasks(&self, _ids: &[ProductId]) -> Result<Vec<ReviewTask>, TaskSourceError> {
        Err(TaskSourceError::Unavailable("catalog offline".to_string()))
    }
}

#[derive(Default)]
pub(super) struct MemoryStore {
    records: Mutex<Vec<AssignmentRecord>>,
    history: Mutex<Vec<AssignmentHistoryEntry>>,
    totals: Mutex<Vec<(RoundId, RoundTotals)>>,
}

impl MemoryStore {
    pub(super) fn records(&self) -> Vec<AssignmentRecord> {
        self.records.lock().expect("store mutex poisoned").clone()
    }

    pub(super) fn history(&self) -> Vec<AssignmentHistoryEntry> {
        self.history.lock().expect("store mutex poisoned").clone()
    }

    pub(super) fn totals(&self) -> Vec<(RoundId, RoundTotals)> {
        self.totals.lock().expect("store mutex poisoned").clone()
    }
}

impl AssignmentStore for MemoryStore {
    fn insert_assignments(&self, records: &[AssignmentRecord]) -> Result<usize, StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        guard.extend_from_slice(records);
        Ok(records.len())
    }

    fn append_history(&self, entries: &[AssignmentHistoryEntry]) -> Result<(), StoreError> {
        let mut guard = self.history.lock().expect("store mutex poisoned");
        guard.extend_from_slice(entries);
        Ok(())
    }

    fn update_round_totals(
        &self,
        round_id: &RoundId,
        totals: RoundTotals,
    ) -> Result<(), StoreError> {
        let mut guard = self.totals.lock().expect("store mutex poisoned");
        guard.push((round_id.clone(), totals));
        Ok(())
    }
}

pub(super) struct RejectingStore;

impl AssignmentStore for RejectingStore {
    fn insert_assignments(&self, _records: &[AssignmentRecord]) -> Result<usize, StoreError> {
        Err(StoreError::Rejected("constraint violation".to_string()))
    }

    fn append_history(&self, _entries: &[AssignmentHistoryEntry]) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn update_round_totals(
        &self,
        _round_id: &RoundId,
        _totals: RoundTotals,
    ) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

/// Accepts the record batch, then fails every follow-up write.
#[derive(Default)]
pub(super) struct AuditFailingStore {
    records: Mutex<Vec<AssignmentRecord>>,
}

impl AuditFailingStore {
    pub(super) fn records(&self) -> Vec<AssignmentRecord> {
        self.records.lock().expect("store mutex poisoned").clone()
    }
}

impl AssignmentStore for AuditFailingStore {
    fn insert_assignments(&self, records: &[AssignmentRecord]) -> Result<usize, StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        guard.extend_from_slice(records);
        Ok(records.len())
    }

    fn append_history(&self, _entries: &[AssignmentHistoryEntry]) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("history table offline".to_string()))
    }

    fn update_round_totals(
        &self,
        _round_id: &RoundId,
        _totals: RoundTotals,
    ) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("rounds table offline".to_string()))
    }
}

#[derive(Default)]
pub(super) struct MemoryNotifier {
    notices: Mutex<Vec<AssignmentNotice>>,
}

impl MemoryNotifier {
    pub(super) fn notices(&self) -> Vec<AssignmentNotice> {
        self.notices.lock().expect("notifier mutex poisoned").clone()
    }
}

impl ReviewerNotifier for MemoryNotifier {
    fn notify(&self, notice: AssignmentNotice) -> Result<(), NotifyError> {
        self.notices
            .lock()
            .expect("notifier mutex poisoned")
            .push(notice);
        Ok(())
    }
}

pub(super) struct FailingNotifier;

impl ReviewerNotifier for FailingNotifier {
    fn notify(&self, _notice: AssignmentNotice) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("smtp relay unreachable".to_string()))
    }
}

pub(super) type MemoryService =
    ReviewAssignmentService<MemoryDirectory, MemoryTasks, MemoryStore, MemoryNotifier>;

pub(super) fn build_service() -> (Arc<MemoryService>, Arc<MemoryStore>, Arc<MemoryNotifier>) {
    let directory = Arc::new(MemoryDirectory::with(expertise_pair()));
    let tasks = Arc::new(MemoryTasks::with(mixed_category_tasks()));
    let store = Arc::new(MemoryStore::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let service = Arc::new(ReviewAssignmentService::new(
        directory,
        tasks,
        store.clone(),
        notifier.clone(),
    ));
    (service, store, notifier)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
