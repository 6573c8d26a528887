//! Solve entry points and search configuration.
//!
//! [`solve`] builds a [`Registry`](crate::evaluation::Registry) from
//! [`SearchParameters`], constructs a first assignment, improves it with
//! [`LocalSearch`](crate::local_search::LocalSearch), and extracts the best
//! assignment seen as a [`Solution`](crate::models::Solution).

mod extract;
mod params;
mod solver;

pub use crate::constructive::FirstSolutionStrategy;
pub use extract::extract_solution;
pub use params::{
    DistanceDimension, GuidedLocalSearchParams, Metaheuristic, ObjectiveKind, SearchParameters,
    Termination, Threads,
};
pub use solver::{solve, SolveStatus, Solver};
