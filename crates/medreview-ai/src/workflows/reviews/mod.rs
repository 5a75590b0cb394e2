pub mod assignments;

pub use assignments::{AssignmentStrategy, ReviewAssignmentService};
