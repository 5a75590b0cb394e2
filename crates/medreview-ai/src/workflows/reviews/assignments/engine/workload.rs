use std::collections::BTreeMap;

use super::super::domain::{Reviewer, ReviewerId};

/// Number of tasks each reviewer should receive so per-reviewer counts stay
/// within one of each other.
///
/// Base allocation is `total_tasks / reviewer_count`; the remainder is handed
/// out one unit at a time to the reviewers carrying the least active work.
/// Further ties fall to snapshot order (the sort is stable).
pub fn target_allocations(
    total_tasks: usize,
    reviewers: &[Reviewer],
) -> BTreeMap<ReviewerId, usize> {
    let mut allocations = BTreeMap::new();
    if reviewers.is_empty() {
        return allocations;
    }

    let base = total_tasks / reviewers.len();
    let remainder = total_tasks % reviewers.len();

    let mut by_load: Vec<&Reviewer> = reviewers.iter().collect();
    by_load.sort_by_key(|reviewer| reviewer.active_assignments);

    for (index, reviewer) in by_load.iter().enumerate() {
        let extra = usize::from(index < remainder);
        allocations.insert(reviewer.id.clone(), base + extra);
    }

    allocations
}

/// Per-reviewer counters tracked while a plan is being built.
///
/// `effective` load is seeded from each reviewer's active assignments so
/// tie-breaks respect pre-existing work; `placed` counts only this run's
/// placements and backs allocation-cap enforcement.
#[derive(Debug, Clone)]
pub struct RunningWorkload {
    effective: BTreeMap<ReviewerId, u32>,
    placed: BTreeMap<ReviewerId, u32>,
}

impl RunningWorkload {
    pub fn seeded(reviewers: &[Reviewer]) -> Self {
        let mut effective = BTreeMap::new();
        let mut placed = BTreeMap::new();
        for reviewer in reviewers {
            effective.insert(reviewer.id.clone(), reviewer.active_assignments);
            placed.insert(reviewer.id.clone(), 0);
        }
        Self { effective, placed }
    }

    pub fn record(&mut self, reviewer: &ReviewerId) {
        *self.effective.entry(reviewer.clone()).or_insert(0) += 1;
        *self.placed.entry(reviewer.clone()).or_insert(0) += 1;
    }

    pub fn effective(&self, reviewer: &ReviewerId) -> u32 {
        self.effective.get(reviewer).copied().unwrap_or(0)
    }

    pub fn placed(&self, reviewer: &ReviewerId) -> u32 {
        self.placed.get(reviewer).copied().unwrap_or(0)
    }
}
