//! Extracted route and visit types.

use serde::{Deserialize, Serialize};

/// A single stop on an extracted route.
///
/// `cumuls[d]` is the value of dimension `d` on arrival at `node`, in the
/// order the owning [`Solution`](super::Solution) lists its dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visit {
    /// Node visited.
    pub node: usize,
    /// Cumulative value of every registered dimension at this stop.
    pub cumuls: Vec<f64>,
}

/// A vehicle's route from depot to depot with its aggregated metrics.
///
/// Unlike the search-time sequence, `visits` includes both depot stops, so
/// an unused vehicle has the two-visit route `depot → depot`.
///
/// # Examples
///
/// ```
/// use u_cvrp::models::{Route, Visit};
///
/// let route = Route::new(
///     0,
///     vec![
///         Visit { node: 0, cumuls: vec![0.0] },
///         Visit { node: 2, cumuls: vec![0.0] },
///         Visit { node: 0, cumuls: vec![7.0] },
///     ],
/// );
/// assert_eq!(route.nodes(), vec![0, 2, 0]);
/// assert_eq!(route.customer_ids(), vec![2]);
/// assert_eq!(route.end_cumul(0), Some(7.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    vehicle_id: usize,
    visits: Vec<Visit>,
    distance: f64,
    arc_cost: f64,
    span_cost: f64,
    global_span_cost: f64,
}

impl Route {
    /// Creates a route for the given vehicle with zeroed metrics.
    pub fn new(vehicle_id: usize, visits: Vec<Visit>) -> Self {
        Self {
            vehicle_id,
            visits,
            distance: 0.0,
            arc_cost: 0.0,
            span_cost: 0.0,
            global_span_cost: 0.0,
        }
    }

    /// Returns the vehicle assigned to this route.
    pub fn vehicle_id(&self) -> usize {
        self.vehicle_id
    }

    /// Returns every stop, depot start and end included.
    pub fn visits(&self) -> &[Visit] {
        &self.visits
    }

    /// Node sequence, depot start and end included.
    pub fn nodes(&self) -> Vec<usize> {
        self.visits.iter().map(|v| v.node).collect()
    }

    /// Customers in visit order.
    pub fn customer_ids(&self) -> Vec<usize> {
        let n = self.visits.len();
        if n < 2 {
            return Vec::new();
        }
        self.visits[1..n - 1].iter().map(|v| v.node).collect()
    }

    /// Number of customer visits.
    pub fn len(&self) -> usize {
        self.visits.len().saturating_sub(2)
    }

    /// Returns `true` if the vehicle serves no customer.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value of dimension `dimension` at the route end.
    pub fn end_cumul(&self, dimension: usize) -> Option<f64> {
        self.visits
            .last()
            .and_then(|v| v.cumuls.get(dimension).copied())
    }

    /// Raw travel distance from the distance matrix.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Sum of objective arc costs along the route.
    pub fn arc_cost(&self) -> f64 {
        self.arc_cost
    }

    /// Per-vehicle span penalties of all dimensions.
    pub fn span_cost(&self) -> f64 {
        self.span_cost
    }

    /// Share of global span penalties attributed to this route.
    pub fn global_span_cost(&self) -> f64 {
        self.global_span_cost
    }

    /// Total cost of this route: arc cost plus span penalties.
    pub fn cost(&self) -> f64 {
        self.arc_cost + self.span_cost + self.global_span_cost
    }

    pub(crate) fn set_metrics(&mut self, distance: f64, arc_cost: f64, span_cost: f64) {
        self.distance = distance;
        self.arc_cost = arc_cost;
        self.span_cost = span_cost;
    }

    pub(crate) fn add_global_span_cost(&mut self, cost: f64) {
        self.global_span_cost += cost;
    }
}
