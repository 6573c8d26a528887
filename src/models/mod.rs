//! Domain model types for capacitated vehicle routing.
//!
//! Provides the immutable problem instance (distances, demands, fleet,
//! depot), the extracted route and solution snapshots, and constraint
//! violation types.

mod problem;
mod route;
mod solution;
mod vehicle;
mod violation;

pub use problem::Problem;
pub use route::{Route, Visit};
pub use solution::{SearchStatistics, Solution};
pub use vehicle::Vehicle;
pub use violation::{Violation, ViolationType};
