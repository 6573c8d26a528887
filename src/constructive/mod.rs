//! Constructive heuristics for building an initial feasible assignment.
//!
//! - [`cheapest_insertion`] — Global cheapest-arc insertion (default), O(n³·V)
//! - [`path_cheapest_arc`] — Per-vehicle path extension along the cheapest arc, O(n²·V)
//!
//! - `repair` — Backtracking repacking when a greedy heuristic strands customers
//!
//! Both heuristics report [`InfeasibleError`](crate::error::InfeasibleError)
//! instead of returning a partial assignment when some customer cannot be
//! placed. [`FirstSolutionStrategy::construct`] then falls back to the repair
//! and reports the heuristic's error only if that fails too.

mod cheapest_insertion;
mod path_cheapest_arc;
mod repair;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::assignment::RouteAssignment;
use crate::error::RoutingError;
use crate::evaluation::Registry;

pub use cheapest_insertion::cheapest_insertion;
pub use path_cheapest_arc::path_cheapest_arc;

/// Heuristic used to build the first assignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FirstSolutionStrategy {
    /// See [`cheapest_insertion`].
    #[default]
    CheapestInsertion,
    /// See [`path_cheapest_arc`].
    PathCheapestArc,
}

impl FirstSolutionStrategy {
    /// Runs this heuristic, repairing its result if it strands customers.
    pub fn construct(self, registry: &Registry<'_>) -> Result<RouteAssignment, RoutingError> {
        let built = match self {
            FirstSolutionStrategy::CheapestInsertion => cheapest_insertion(registry),
            FirstSolutionStrategy::PathCheapestArc => path_cheapest_arc(registry),
        };
        let err = match built {
            Err(RoutingError::Infeasible(err)) => err,
            other => return other,
        };

        let Some(routes) = repair::repack(registry) else {
            return Err(err.into());
        };
        info!(stranded = ?err.unrouted, strategy = ?self, "repacked stalled construction");
        let mut assignment = RouteAssignment::new(registry.problem());
        assignment.commit(registry, routes.into_iter().enumerate().collect())?;
        Ok(assignment)
    }
}
