//! Library crate backing the medical AI product directory's review tooling.
//!
//! The interesting machinery lives in [`workflows::reviews::assignments`]:
//! planning which reviewer evaluates which product and committing the
//! resulting assignments through the persistence boundary.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
