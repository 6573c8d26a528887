//! Cheapest-arc insertion heuristic.
//!
//! # Algorithm
//!
//! Starting with every vehicle on its trivial depot route, repeatedly pick
//! the unrouted customer and insertion point (vehicle, position) with the
//! smallest marginal objective cost
//!
//! ```text
//! delta = c(prev, k) + c(k, next) - c(prev, next)
//! ```
//!
//! among insertions that keep the route feasible, until every customer is
//! routed or no feasible insertion remains.
//!
//! Ties go to the lexicographically smallest (vehicle, position, customer).
//!
//! # Complexity
//!
//! O(n² × (n + V)) marginal cost evaluations for n customers and V vehicles;
//! a route is only re-checked when its candidate beats the current best.

use tracing::{debug, instrument, warn};

use crate::assignment::RouteAssignment;
use crate::error::{InfeasibleError, RoutingError};
use crate::evaluation::{Registry, FEASIBILITY_TOLERANCE};

#[derive(Debug, Clone, Copy)]
struct Insertion {
    vehicle: usize,
    after: usize,
    node: usize,
    delta: f64,
}

/// Builds an assignment by global cheapest-arc insertion.
///
/// # Examples
///
/// ```
/// use u_cvrp::constructive::cheapest_insertion;
/// use u_cvrp::distance::DistanceMatrix;
/// use u_cvrp::evaluation::Registry;
/// use u_cvrp::models::{Problem, Vehicle};
///
/// let dm = DistanceMatrix::from_rows(vec![
///     vec![0.0, 1.0, 2.0, 3.0],
///     vec![1.0, 0.0, 1.0, 2.0],
///     vec![2.0, 1.0, 0.0, 1.0],
///     vec![3.0, 2.0, 1.0, 0.0],
/// ])
/// .unwrap();
/// let problem = Problem::new(dm, vec![0, 10, 10, 10], Vehicle::fleet(&[30])).unwrap();
/// let mut registry = Registry::new(&problem);
/// registry.add_capacity_dimension().unwrap();
///
/// let assignment = cheapest_insertion(&registry).unwrap();
/// assert!(assignment.is_complete());
/// assert_eq!(assignment.cost(&registry).unwrap(), 6.0);
/// ```
#[instrument(skip_all, level = "debug")]
pub fn cheapest_insertion(registry: &Registry<'_>) -> Result<RouteAssignment, RoutingError> {
    let problem = registry.problem();
    let depot = problem.depot();
    let mut assignment = RouteAssignment::new(problem);
    let mut unrouted: Vec<usize> = problem.customers().collect();

    while !unrouted.is_empty() {
        let mut best: Option<Insertion> = None;

        for vehicle in 0..problem.num_vehicles() {
            let route = assignment.route(vehicle);
            for after in 0..=route.len() {
                let prev = if after == 0 { depot } else { route[after - 1] };
                let next = if after == route.len() {
                    depot
                } else {
                    route[after]
                };
                let removed = registry.arc_cost(prev, next);

                for &node in &unrouted {
                    let delta =
                        registry.arc_cost(prev, node) + registry.arc_cost(node, next) - removed;
                    if best.is_some_and(|b| delta >= b.delta - FEASIBILITY_TOLERANCE) {
                        continue;
                    }

                    let mut candidate = route.to_vec();
                    candidate.insert(after, node);
                    if registry.evaluate_route(vehicle, &candidate).is_ok() {
                        best = Some(Insertion {
                            vehicle,
                            after,
                            node,
                            delta,
                        });
                    }
                }
            }
        }

        let Some(insertion) = best else {
            warn!(unrouted = ?unrouted, "no feasible insertion left");
            return Err(InfeasibleError { unrouted }.into());
        };

        assignment.insert(registry, insertion.vehicle, insertion.after, insertion.node)?;
        unrouted.retain(|&node| node != insertion.node);
        debug!(
            node = insertion.node,
            vehicle = insertion.vehicle,
            after = insertion.after,
            delta = insertion.delta,
            "inserted customer"
        );
    }

    Ok(assignment)
}
