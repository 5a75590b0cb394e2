mod planner;
mod scoring;
mod workload;

pub use planner::{AssignmentPlanner, AssignmentStrategy, PlanningError};
pub use scoring::{
    match_score, CATEGORY_MATCH_POINTS, COMPANY_MATCH_POINTS, CONTINUITY_BONUS,
    PRODUCT_MATCH_POINTS,
};
pub use workload::{target_allocations, RunningWorkload};
