use chrono::NaiveDate;
use medreview_ai::workflows::reviews::assignments::{
    AssignmentHistoryEntry, AssignmentNotice, AssignmentRecord, AssignmentStore,
    AssignmentStrategy, DirectoryError, ExpertisePreference, ExpertiseTarget, NotifyError,
    ProductId, ReviewTask, Reviewer, ReviewerDirectory, ReviewerId, ReviewerNotifier, RoundId,
    RoundTotals, StoreError, TaskSource, TaskSourceError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Static reviewer pool standing in for the directory's staff database.
#[derive(Clone)]
pub(crate) struct InMemoryReviewerDirectory {
    pool: Vec<Reviewer>,
}

impl InMemoryReviewerDirectory {
    pub(crate) fn new(pool: Vec<Reviewer>) -> Self {
        Self { pool }
    }
}

impl ReviewerDirectory for InMemoryReviewerDirectory {
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
                        ExpertiseTarget::Category(label)
                            if label.eq_ignore_ascii_case(wanted)
                    )
                })
            })
            .cloned()
            .collect())
    }
}

/// Static product catalog projection.
#[derive(Clone)]
pub(crate) struct InMemoryTaskSource {
    catalog: Vec<ReviewTask>,
}

impl InMemoryTaskSource {
    pub(crate) fn new(catalog: Vec<ReviewTask>) -> Self {
        Self { catalog }
    }
}

impl TaskSource for InMemoryTaskSource {
    fn tasks(&self, ids: &[ProductId]) -> Result<Vec<ReviewTask>, TaskSourceError> {
        let by_id: HashMap<&ProductId, &ReviewTask> =
            self.catalog.iter().map(|task| (&task.id, task)).collect();
        Ok(ids
            .iter()
            .filter_map(|id| by_id.get(id).map(|task| (*task).clone()))
            .collect())
    }
}

#[derive(Default)]
pub(crate) struct InMemoryAssignmentStore {
    records: Mutex<Vec<AssignmentRecord>>,
    history: Mutex<Vec<AssignmentHistoryEntry>>,
    totals: Mutex<Vec<(RoundId, RoundTotals)>>,
}

impl InMemoryAssignmentStore {
    pub(crate) fn records(&self) -> Vec<AssignmentRecord> {
        self.records.lock().expect("store mutex poisoned").clone()
    }

    pub(crate) fn history(&self) -> Vec<AssignmentHistoryEntry> {
        self.history.lock().expect("store mutex poisoned").clone()
    }
}

impl AssignmentStore for InMemoryAssignmentStore {
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

/// Notification hook for the served process: assignments land in the log
/// until a mail transport is wired up.
#[derive(Default, Clone)]
pub(crate) struct LoggingReviewerNotifier;

impl ReviewerNotifier for LoggingReviewerNotifier {
    fn notify(&self, notice: AssignmentNotice) -> Result<(), NotifyError> {
        tracing::info!(
            reviewer = %notice.reviewer_id.0,
            round = %notice.round_name,
            tasks = notice.task_count,
            "reviewer notified of new assignments"
        );
        Ok(())
    }
}

/// Capturing notifier used by the CLI demo so notices can be printed.
#[derive(Default)]
pub(crate) struct InMemoryReviewerNotifier {
    notices: Mutex<Vec<AssignmentNotice>>,
}

impl InMemoryReviewerNotifier {
    pub(crate) fn notices(&self) -> Vec<AssignmentNotice> {
        self.notices
            .lock()
            .expect("notifier mutex poisoned")
            .clone()
    }
}

impl ReviewerNotifier for InMemoryReviewerNotifier {
    fn notify(&self, notice: AssignmentNotice) -> Result<(), NotifyError> {
        self.notices
            .lock()
            .expect("notifier mutex poisoned")
            .push(notice);
        Ok(())
    }
}

fn review_task(id: &str, name: &str, category: &str, company: &str) -> ReviewTask {
    ReviewTask {
        id: ProductId(id.to_string()),
        name: name.to_string(),
        category: category.to_string(),
        company: company.to_string(),
    }
}

fn category(label: &str) -> ExpertisePreference {
    ExpertisePreference {
        target: ExpertiseTarget::Category(label.to_string()),
        priority: 1,
        notes: None,
    }
}

fn company(label: &str) -> ExpertisePreference {
    ExpertisePreference {
        target: ExpertiseTarget::Company(label.to_string()),
        priority: 1,
        notes: None,
    }
}

/// Sample slice of the product directory used by `serve` (until the real
/// catalog adapter lands), `plan`, and `demo`.
pub(crate) fn sample_catalog() -> Vec<ReviewTask> {
    vec![
        review_task("prod-ct-lung", "LungScreen CT", "Radiology", "Aidence"),
        review_task("prod-xr-chest", "ChestView XR", "Radiology", "Lunit"),
        review_task("prod-mri-brain", "NeuroScan MRI", "Radiology", "Icometrix"),
        review_task("prod-mammo-density", "DenseMap Mammo", "Radiology", "Volpara"),
        review_task("prod-ecg-triage", "CardioSort ECG", "Cardiology", "HeartFlow"),
        review_task("prod-ct-ffr", "FlowFraction CT", "Cardiology", "HeartFlow"),
        review_task("prod-path-breast", "MammoPath", "Pathology", "PathAI"),
        review_task("prod-path-prostate", "ProstateDx", "Pathology", "Ibex"),
        review_task("prod-retina-dr", "RetinaGrade DR", "Ophthalmology", "Digital Diagnostics"),
        review_task("prod-derm-lesion", "LesionScan", "Dermatology", "SkinVision"),
    ]
}

pub(crate) fn sample_reviewers() -> Vec<Reviewer> {
    vec![
        Reviewer {
            id: ReviewerId("rev-imaging".to_string()),
            display_name: "Imaging reviewer".to_string(),
            preferences: vec![category("Radiology"), category("Ophthalmology")],
            active_assignments: 2,
        },
        Reviewer {
            id: ReviewerId("rev-cardio".to_string()),
            display_name: "Cardiology reviewer".to_string(),
            preferences: vec![category("Cardiology"), company("HeartFlow")],
            active_assignments: 0,
        },
        Reviewer {
            id: ReviewerId("rev-path".to_string()),
            display_name: "Pathology reviewer".to_string(),
            preferences: vec![category("Pathology")],
            active_assignments: 1,
        },
        Reviewer {
            id: ReviewerId("rev-generalist".to_string()),
            display_name: "Generalist reviewer".to_string(),
            preferences: Vec::new(),
            active_assignments: 0,
        },
    ]
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_strategy(raw: &str) -> Result<AssignmentStrategy, String> {
    raw.parse::<AssignmentStrategy>()
}
