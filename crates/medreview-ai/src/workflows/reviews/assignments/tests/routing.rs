use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use super::common::*;
use crate::workflows::reviews::assignments::domain::ProductId;
use crate::workflows::reviews::assignments::router::{plan_handler, PlanRequest};
use crate::workflows::reviews::assignments::{
    assignment_router, AssignmentStrategy, ReviewAssignmentService,
};

fn plan_request() -> PlanRequest {
    PlanRequest {
        task_ids: mixed_category_tasks()
            .into_iter()
            .map(|task| task.id)
            .collect(),
        strategy: AssignmentStrategy::Balanced,
        category: None,
        seed: Some(11),
    }
}

#[tokio::test]
async fn plan_handler_returns_proposals() {
    let (service, _, _) = build_service();

    let response = plan_handler::<MemoryDirectory, MemoryTasks, MemoryStore, MemoryNotifier>(
        State(service),
        axum::Json(plan_request()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("strategy"), Some(&json!("balanced")));
    assert_eq!(
        payload
            .get("assignments")
            .and_then(serde_json::Value::as_array)
            .map(Vec::len),
        Some(4)
    );
}

#[tokio::test]
async fn plan_handler_rejects_an_empty_pool() {
    let service = Arc::new(ReviewAssignmentService::new(
        Arc::new(MemoryDirectory::default()),
        Arc::new(MemoryTasks::with(mixed_category_tasks())),
        Arc::new(MemoryStore::default()),
        Arc::new(MemoryNotifier::default()),
    ));

    let response = plan_handler::<MemoryDirectory, MemoryTasks, MemoryStore, MemoryNotifier>(
        State(service),
        axum::Json(plan_request()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert!(payload
        .get("error")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default()
        .contains("no reviewers"));
}

#[tokio::test]
async fn plan_handler_maps_directory_outages_to_internal_errors() {
    let service = Arc::new(ReviewAssignmentService::new(
        Arc::new(UnavailableDirectory),
        Arc::new(MemoryTasks::with(mixed_category_tasks())),
        Arc::new(MemoryStore::default()),
        Arc::new(MemoryNotifier::default()),
    ));

    let response = plan_handler::<UnavailableDirectory, MemoryTasks, MemoryStore, MemoryNotifier>(
        State(service),
        axum::Json(plan_request()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn plan_route_accepts_payloads() {
    let (service, _, _) = build_service();
    let router = assignment_router(service);

    let body = json!({
        "task_ids": ["prod-ct-lung", "prod-ecg-triage"],
        "strategy": "expertise_first",
        "seed": 3,
    });

    let response = router
        .oneshot(
            axum::http::Request::post("/api/v1/reviews/assignments/plan")
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    serde_json::to_vec(&body).unwrap(),
                ))
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("strategy"), Some(&json!("expertise_first")));
}

#[tokio::test]
async fn plan_route_defaults_to_the_balanced_strategy() {
    let (service, _, _) = build_service();
    let router = assignment_router(service);

    let body = json!({
        "task_ids": ["prod-ct-lung"],
    });

    let response = router
        .oneshot(
            axum::http::Request::post("/api/v1/reviews/assignments/plan")
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    serde_json::to_vec(&body).unwrap(),
                ))
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("strategy"), Some(&json!("balanced")));
}

#[tokio::test]
async fn commit_route_persists_and_reports_the_outcome() {
    let (service, store, _) = build_service();
    let planned = service
        .plan(
            &[ProductId("prod-ct-lung".to_string())],
            AssignmentStrategy::Balanced,
            None,
            Some(7),
        )
        .expect("plan succeeds");

    let body = json!({
        "round": sample_round(),
        "assignments": planned,
        "deadline": deadline(),
        "priority": "high",
        "actor": "ops@directory",
    });

    let router = assignment_router(service);
    let response = router
        .oneshot(
            axum::http::Request::post("/api/v1/reviews/assignments/commit")
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    serde_json::to_vec(&body).unwrap(),
                ))
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("success_count"), Some(&json!(1)));
    assert_eq!(payload.get("failed_count"), Some(&json!(0)));
    assert_eq!(store.records().len(), 1);
}
