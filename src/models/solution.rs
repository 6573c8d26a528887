//! Solution and search statistics types.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::Route;

/// Counters collected while a solution was searched for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchStatistics {
    /// Cost of the assignment produced by the construction heuristic.
    pub construction_cost: f64,
    /// Committed local search moves.
    pub iterations: usize,
    /// Moves that produced a new best assignment.
    pub improvements: usize,
    /// Guided local search penalty rounds.
    pub perturbations: usize,
    /// Wall-clock time from construction start to extraction.
    pub elapsed: Duration,
}

/// An immutable snapshot of a solved assignment.
///
/// Holds one [`Route`] per vehicle (unused vehicles have the trivial
/// depot → depot route) in vehicle ID order.
///
/// # Examples
///
/// ```
/// use u_cvrp::models::{Route, Solution, Visit};
///
/// let depot = |load| Visit { node: 0, cumuls: vec![load] };
/// let sol = Solution::new(
///     vec!["Capacity".to_string()],
///     vec![Route::new(0, vec![depot(0.0), depot(0.0)])],
/// );
/// assert_eq!(sol.num_routes(), 1);
/// assert_eq!(sol.num_used_vehicles(), 0);
/// assert_eq!(sol.dimension_index("Capacity"), Some(0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    dimensions: Vec<String>,
    routes: Vec<Route>,
    statistics: SearchStatistics,
}

impl Solution {
    /// Creates a solution from per-vehicle routes.
    pub fn new(dimensions: Vec<String>, routes: Vec<Route>) -> Self {
        Self {
            dimensions,
            routes,
            statistics: SearchStatistics::default(),
        }
    }

    /// Attaches search statistics.
    pub fn with_statistics(mut self, statistics: SearchStatistics) -> Self {
        self.statistics = statistics;
        self
    }

    /// Returns the routes, one per vehicle.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// The route of vehicle `vehicle_id`.
    pub fn route(&self, vehicle_id: usize) -> Option<&Route> {
        self.routes.get(vehicle_id)
    }

    /// Returns the number of routes (one per vehicle).
    pub fn num_routes(&self) -> usize {
        self.routes.len()
    }

    /// Number of vehicles serving at least one customer.
    pub fn num_used_vehicles(&self) -> usize {
        self.routes.iter().filter(|r| !r.is_empty()).count()
    }

    /// Total number of customers served (across all routes).
    pub fn num_served(&self) -> usize {
        self.routes.iter().map(|r| r.len()).sum()
    }

    /// Dimension names in the order used by [`Visit::cumuls`](super::Visit).
    pub fn dimensions(&self) -> &[String] {
        &self.dimensions
    }

    /// Position of the dimension called `name`.
    pub fn dimension_index(&self, name: &str) -> Option<usize> {
        self.dimensions.iter().position(|d| d == name)
    }

    /// Grand total cost: the sum of per-vehicle costs.
    pub fn total_cost(&self) -> f64 {
        self.routes.iter().map(|r| r.cost()).sum()
    }

    /// Total raw travel distance across all routes.
    pub fn total_distance(&self) -> f64 {
        self.routes.iter().map(|r| r.distance()).sum()
    }

    /// Search counters.
    pub fn statistics(&self) -> &SearchStatistics {
        &self.statistics
    }
}
