use crate::infra::{
    sample_catalog, sample_reviewers, InMemoryAssignmentStore, InMemoryReviewerDirectory,
    InMemoryReviewerNotifier, InMemoryTaskSource,
};
use chrono::{Local, NaiveDate};
use clap::Args;
use medreview_ai::config::AppConfig;
use medreview_ai::error::AppError;
use medreview_ai::workflows::reviews::assignments::{
    AssignmentPriority, AssignmentStrategy, ProductId, ProposedAssignment,
    ReviewAssignmentService, ReviewRound, ReviewTask, ReviewerId, RoundId, RoundStatus,
};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct PlanArgs {
    /// Distribution strategy (balanced, random, expertise_first).
    /// Defaults to APP_ASSIGNMENT_STRATEGY.
    #[arg(long, value_parser = crate::infra::parse_strategy)]
    pub(crate) strategy: Option<AssignmentStrategy>,
    /// Restrict the reviewer pool to reviewers declaring this category.
    #[arg(long)]
    pub(crate) category: Option<String>,
    /// Seed the planner for reproducible output.
    #[arg(long)]
    pub(crate) seed: Option<u64>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Distribution strategy (balanced, random, expertise_first).
    /// Defaults to APP_ASSIGNMENT_STRATEGY.
    #[arg(long, value_parser = crate::infra::parse_strategy)]
    pub(crate) strategy: Option<AssignmentStrategy>,
    /// Seed the planner for reproducible output.
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Review deadline (YYYY-MM-DD). Defaults to today + 14 days.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) deadline: Option<NaiveDate>,
    /// Recorded as the audit-trail actor for the committed batch.
    #[arg(long, default_value = "demo@medreview")]
    pub(crate) actor: String,
}

type DemoService = ReviewAssignmentService<
    InMemoryReviewerDirectory,
    InMemoryTaskSource,
    InMemoryAssignmentStore,
    InMemoryReviewerNotifier,
>;

fn build_demo_service() -> (
    Arc<DemoService>,
    Arc<InMemoryAssignmentStore>,
    Arc<InMemoryReviewerNotifier>,
) {
    let store = Arc::new(InMemoryAssignmentStore::default());
    let notifier = Arc::new(InMemoryReviewerNotifier::default());
    let service = Arc::new(ReviewAssignmentService::new(
        Arc::new(InMemoryReviewerDirectory::new(sample_reviewers())),
        Arc::new(InMemoryTaskSource::new(sample_catalog())),
        store.clone(),
        notifier.clone(),
    ));
    (service, store, notifier)
}

fn resolve_strategy(requested: Option<AssignmentStrategy>) -> Result<AssignmentStrategy, AppError> {
    match requested {
        Some(strategy) => Ok(strategy),
        None => Ok(AppConfig::load()?.assignments.default_strategy),
    }
}

fn catalog_ids() -> Vec<ProductId> {
    sample_catalog().into_iter().map(|task| task.id).collect()
}

pub(crate) fn run_plan_preview(args: PlanArgs) -> Result<(), AppError> {
    let PlanArgs {
        strategy,
        category,
        seed,
    } = args;

    let strategy = resolve_strategy(strategy)?;
    let (service, _, _) = build_demo_service();

    let proposals = service.plan(&catalog_ids(), strategy, category.as_deref(), seed)?;
    render_plan(strategy, &proposals, &sample_catalog());

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        strategy,
        seed,
        deadline,
        actor,
    } = args;

    let strategy = resolve_strategy(strategy)?;
    let today = Local::now().date_naive();
    let deadline = deadline.unwrap_or(today + chrono::Duration::days(14));

    println!("Review assignment demo");
    let (service, store, notifier) = build_demo_service();

    let proposals = service.plan(&catalog_ids(), strategy, None, seed)?;
    render_plan(strategy, &proposals, &sample_catalog());

    let round = ReviewRound {
        id: RoundId(format!("round-{today}")),
        name: format!("Demo round {today}"),
        round_number: 1,
        status: RoundStatus::Active,
        starts_on: today,
        ends_on: Some(deadline),
    };

    let outcome = service.commit(
        &round,
        &proposals,
        Some(deadline),
        AssignmentPriority::Normal,
        &actor,
    );

    println!("\nCommit outcome");
    println!(
        "- {} committed | {} failed | deadline {}",
        outcome.success_count, outcome.failed_count, deadline
    );
    for error in &outcome.errors {
        println!("- error: {error}");
    }
    println!(
        "- {} records persisted, {} audit entries recorded",
        store.records().len(),
        store.history().len()
    );

    println!("\nReviewer notifications");
    for notice in notifier.notices() {
        println!(
            "- {} <- {} task(s) for '{}':",
            notice.reviewer_id.0, notice.task_count, notice.round_name
        );
        for name in &notice.task_names {
            println!("    - {name}");
        }
    }

    Ok(())
}

fn render_plan(
    strategy: AssignmentStrategy,
    proposals: &[ProposedAssignment],
    catalog: &[ReviewTask],
) {
    let by_id: BTreeMap<&ProductId, &ReviewTask> =
        catalog.iter().map(|task| (&task.id, task)).collect();

    println!(
        "\nProposed plan ({}, {} tasks)",
        strategy.label(),
        proposals.len()
    );
    for proposal in proposals {
        let (name, category) = by_id
            .get(&proposal.task_id)
            .map(|task| (task.name.as_str(), task.category.as_str()))
            .unwrap_or((proposal.task_id.0.as_str(), "?"));
        println!(
            "- {name} [{category}] -> {} (score {})",
            proposal.reviewer_id.0, proposal.match_score
        );
    }

    let mut counts: BTreeMap<&ReviewerId, usize> = BTreeMap::new();
    for proposal in proposals {
        *counts.entry(&proposal.reviewer_id).or_insert(0) += 1;
    }
    println!("Reviewer load:");
    for (reviewer, count) in counts {
        println!("  - {}: {count} task(s)", reviewer.0);
    }
}
