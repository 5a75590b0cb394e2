use std::collections::{HashMap, HashSet};

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::super::domain::{ProposedAssignment, ReviewTask, Reviewer, ReviewerId};
use super::scoring::{match_score, normalize_label, CONTINUITY_BONUS};
use super::workload::{target_allocations, RunningWorkload};

/// Distribution strategies selectable by round administrators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStrategy {
    Balanced,
    Random,
    ExpertiseFirst,
}

impl AssignmentStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentStrategy::Balanced => "balanced",
            AssignmentStrategy::Random => "random",
            AssignmentStrategy::ExpertiseFirst => "expertise_first",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AssignmentStrategy::Balanced => "Balanced workload",
            AssignmentStrategy::Random => "Random distribution",
            AssignmentStrategy::ExpertiseFirst => "Expertise first",
        }
    }
}

impl Default for AssignmentStrategy {
    fn default() -> Self {
        AssignmentStrategy::Balanced
    }
}

impl std::str::FromStr for AssignmentStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "balanced" => Ok(AssignmentStrategy::Balanced),
            "random" => Ok(AssignmentStrategy::Random),
            "expertise_first" | "expertise-first" => Ok(AssignmentStrategy::ExpertiseFirst),
            other => Err(format!("unknown assignment strategy: {other}")),
        }
    }
}

/// Planning failures surfaced to the operator before any commit is attempted.
#[derive(Debug, thiserror::Error)]
pub enum PlanningError {
    #[error("no reviewers available for assignment")]
    NoReviewersAvailable,
}

/// Maps every task to exactly one reviewer under the selected strategy.
///
/// Randomness is injected: callers hand in any [`Rng`], so tests pin exact
/// outcomes with a seeded generator while production uses entropy.
pub struct AssignmentPlanner {
    strategy: AssignmentStrategy,
}

impl AssignmentPlanner {
    pub fn new(strategy: AssignmentStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> AssignmentStrategy {
        self.strategy
    }

    /// Produce one proposal per task. Fails when the reviewer pool is empty;
    /// otherwise every task id appears exactly once in the result.
    pub fn plan<R: Rng>(
        &self,
        tasks: &[ReviewTask],
        reviewers: &[Reviewer],
        rng: &mut R,
    ) -> Result<Vec<ProposedAssignment>, PlanningError> {
        if reviewers.is_empty() {
            return Err(PlanningError::NoReviewersAvailable);
        }

        let proposals = match self.strategy {
            AssignmentStrategy::Random => plan_random(tasks, reviewers, rng),
            AssignmentStrategy::ExpertiseFirst => plan_expertise_first(tasks, reviewers),
            AssignmentStrategy::Balanced => plan_balanced(tasks, reviewers, rng),
        };

        Ok(proposals)
    }
}

/// Round-robin over a uniformly shuffled task order. Expertise is ignored and
/// scores are reported as zero; per-reviewer counts still differ by at most
/// one.
fn plan_random<R: Rng>(
    tasks: &[ReviewTask],
    reviewers: &[Reviewer],
    rng: &mut R,
) -> Vec<ProposedAssignment> {
    let mut order: Vec<&ReviewTask> = tasks.iter().collect();
    order.shuffle(rng);

    order
        .iter()
        .enumerate()
        .map(|(index, task)| ProposedAssignment {
            task_id: task.id.clone(),
            reviewer_id: reviewers[index % reviewers.len()].id.clone(),
            match_score: 0,
        })
        .collect()
}

/// Greedy best-match per task with no per-reviewer cap: a reviewer with
/// strong expertise may take disproportionately many tasks. Ties fall to the
/// lowest running workload.
fn plan_expertise_first(tasks: &[ReviewTask], reviewers: &[Reviewer]) -> Vec<ProposedAssignment> {
    let mut workload = RunningWorkload::seeded(reviewers);
    let mut ledger = CategoryLedger::default();
    let mut proposals = Vec::with_capacity(tasks.len());

    for task in sorted_by_category(tasks) {
        let category_key = normalize_label(&task.category);

        let mut winner = &reviewers[0];
        let mut winner_score =
            match_score(task, &winner.preferences) + ledger.bonus(&winner.id, &category_key);

        for reviewer in &reviewers[1..] {
            let score =
                match_score(task, &reviewer.preferences) + ledger.bonus(&reviewer.id, &category_key);
            let better = score > winner_score
                || (score == winner_score
                    && workload.effective(&reviewer.id) < workload.effective(&winner.id));
            if better {
                winner = reviewer;
                winner_score = score;
            }
        }

        workload.record(&winner.id);
        ledger.claim(&winner.id, &category_key);
        proposals.push(ProposedAssignment {
            task_id: task.id.clone(),
            reviewer_id: winner.id.clone(),
            match_score: winner_score,
        });
    }

    proposals
}

/// Expertise-aware planning bounded by the workload balancer's allocations.
///
/// Tasks are claimed in repeated rounds: every reviewer with capacity gets
/// one claim per round, and the strongest pending claim resolves first so
/// expertise decides before the pool thins out. Reviewers past the shared
/// floor may only claim while unconsumed `total mod n` extra slots remain,
/// which keeps the per-reviewer spread at most one.
fn plan_balanced<R: Rng>(
    tasks: &[ReviewTask],
    reviewers: &[Reviewer],
    rng: &mut R,
) -> Vec<ProposedAssignment> {
    let targets = target_allocations(tasks.len(), reviewers);
    let floor = targets.values().copied().min().unwrap_or(0);
    let mut extra_slots = tasks.len().saturating_sub(floor * reviewers.len());

    let mut workload = RunningWorkload::seeded(reviewers);
    let mut ledger = CategoryLedger::default();
    let mut remaining: Vec<&ReviewTask> = sorted_by_category(tasks);
    let mut proposals = Vec::with_capacity(tasks.len());

    while !remaining.is_empty() {
        let mut order: Vec<&Reviewer> = reviewers.iter().collect();
        order.shuffle(rng);

        let mut claimed_this_round: HashSet<ReviewerId> = HashSet::new();
        let mut progressed = false;

        while !remaining.is_empty() {
            let mut winning: Option<Claim<'_>> = None;

            for &reviewer in &order {
                if claimed_this_round.contains(&reviewer.id) {
                    continue;
                }
                let placed = workload.placed(&reviewer.id) as usize;
                let eligible = placed < floor || (placed == floor && extra_slots > 0);
                if !eligible {
                    continue;
                }

                for (task_index, task) in remaining.iter().enumerate() {
                    let category_key = normalize_label(&task.category);
                    let base = match_score(task, &reviewer.preferences)
                        + ledger.bonus(&reviewer.id, &category_key);
                    let claim = Claim {
                        reviewer,
                        task_index,
                        base,
                        effective: workload.effective(&reviewer.id),
                        // breaks exact ties only; real score gaps are >= 5
                        jitter: rng.gen::<f64>(),
                    };
                    if winning.as_ref().map_or(true, |current| claim.beats(current)) {
                        winning = Some(claim);
                    }
                }
            }

            let Some(claim) = winning else {
                break;
            };

            let task = remaining.remove(claim.task_index);
            if workload.placed(&claim.reviewer.id) as usize >= floor {
                extra_slots -= 1;
            }
            workload.record(&claim.reviewer.id);
            ledger.claim(&claim.reviewer.id, &normalize_label(&task.category));
            claimed_this_round.insert(claim.reviewer.id.clone());
            progressed = true;

            proposals.push(ProposedAssignment {
                task_id: task.id.clone(),
                reviewer_id: claim.reviewer.id.clone(),
                match_score: claim.base,
            });
        }

        if !progressed {
            break;
        }
    }

    proposals
}

struct Claim<'a> {
    reviewer: &'a Reviewer,
    task_index: usize,
    base: u32,
    effective: u32,
    jitter: f64,
}

impl Claim<'_> {
    /// Higher score first, then lower running workload, then jitter.
    fn beats(&self, other: &Claim<'_>) -> bool {
        if self.base != other.base {
            return self.base > other.base;
        }
        if self.effective != other.effective {
            return self.effective < other.effective;
        }
        self.jitter > other.jitter
    }
}

/// Stable category ordering so same-category tasks sit together, which lets
/// the continuity bonus group them with one reviewer.
fn sorted_by_category(tasks: &[ReviewTask]) -> Vec<&ReviewTask> {
    let mut ordered: Vec<&ReviewTask> = tasks.iter().collect();
    ordered.sort_by_key(|task| normalize_label(&task.category));
    ordered
}

/// Tracks which reviewer holds which category within a single planning run.
#[derive(Default)]
struct CategoryLedger {
    owned: HashMap<ReviewerId, HashSet<String>>,
}

impl CategoryLedger {
    fn bonus(&self, reviewer: &ReviewerId, category_key: &str) -> u32 {
        let owned = self
            .owned
            .get(reviewer)
            .map_or(false, |categories| categories.contains(category_key));
        if !category_key.is_empty() && owned {
            CONTINUITY_BONUS
        } else {
            0
        }
    }

    fn claim(&mut self, reviewer: &ReviewerId, category_key: &str) {
        if category_key.is_empty() {
            return;
        }
        self.owned
            .entry(reviewer.clone())
            .or_default()
            .insert(category_key.to_string());
    }
}
