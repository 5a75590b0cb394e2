use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{AssignmentPriority, ProductId, ProposedAssignment, ReviewRound};
use super::engine::{AssignmentStrategy, PlanningError};
use super::service::{AssignmentServiceError, ReviewAssignmentService};
use super::repository::{AssignmentStore, ReviewerDirectory, ReviewerNotifier, TaskSource};

#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    pub task_ids: Vec<ProductId>,
    #[serde(default)]
    pub strategy: AssignmentStrategy,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub strategy: AssignmentStrategy,
    pub assignments: Vec<ProposedAssignment>,
}

#[derive(Debug, Deserialize)]
pub struct CommitRequest {
    pub round: ReviewRound,
    pub assignments: Vec<ProposedAssignment>,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub priority: AssignmentPriority,
    pub actor: String,
}

/// Router builder exposing HTTP endpoints for plan previews and commits.
pub fn assignment_router<D, T, S, N>(
    service: Arc<ReviewAssignmentService<D, T, S, N>>,
) -> Router
where
    D: ReviewerDirectory + 'static,
    T: TaskSource + 'static,
    S: AssignmentStore + 'static,
    N: ReviewerNotifier + 'static,
{
    Router::new()
        .route(
            "/api/v1/reviews/assignments/plan",
            post(plan_handler::<D, T, S, N>),
        )
        .route(
            "/api/v1/reviews/assignments/commit",
            post(commit_handler::<D, T, S, N>),
        )
        .with_state(service)
}

pub(crate) async fn plan_handler<D, T, S, N>(
    State(service): State<Arc<ReviewAssignmentService<D, T, S, N>>>,
    axum::Json(request): axum::Json<PlanRequest>,
) -> Response
where
    D: ReviewerDirectory + 'static,
    T: TaskSource + 'static,
    S: AssignmentStore + 'static,
    N: ReviewerNotifier + 'static,
{
    match service.plan(
        &request.task_ids,
        request.strategy,
        request.category.as_deref(),
        request.seed,
    ) {
        Ok(assignments) => {
            let view = PlanResponse {
                strategy: request.strategy,
                assignments,
            };
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(AssignmentServiceError::Planning(PlanningError::NoReviewersAvailable)) => {
            let payload = json!({
                "error": PlanningError::NoReviewersAvailable.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn commit_handler<D, T, S, N>(
    State(service): State<Arc<ReviewAssignmentService<D, T, S, N>>>,
    axum::Json(request): axum::Json<CommitRequest>,
) -> Response
where
    D: ReviewerDirectory + 'static,
    T: TaskSource + 'static,
    S: AssignmentStore + 'static,
    N: ReviewerNotifier + 'static,
{
    let outcome = service.commit(
        &request.round,
        &request.assignments,
        request.deadline,
        request.priority,
        &request.actor,
    );
    (StatusCode::OK, axum::Json(outcome)).into_response()
}
