//! Path-cheapest-arc heuristic.
//!
//! Builds routes one vehicle at a time: starting from the depot, always
//! extend the path along the cheapest arc to an unrouted customer whose
//! addition keeps the route feasible. When no customer fits, move on to
//! the next vehicle.
//!
//! # Complexity
//!
//! O(n² × L) where n = number of customers and L = route length checked
//! per feasible extension.

use tracing::{debug, instrument, warn};

use crate::assignment::RouteAssignment;
use crate::error::{InfeasibleError, RoutingError};
use crate::evaluation::{Registry, FEASIBILITY_TOLERANCE};

/// Constructs an assignment by extending each vehicle's path greedily.
///
/// Ties go to the lowest customer ID.
///
/// # Examples
///
/// ```
/// use u_cvrp::constructive::path_cheapest_arc;
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
/// let problem = Problem::new(dm, vec![0, 10, 10, 10], Vehicle::fleet(&[20, 20])).unwrap();
/// let mut registry = Registry::new(&problem);
/// registry.add_capacity_dimension().unwrap();
///
/// let assignment = path_cheapest_arc(&registry).unwrap();
/// assert_eq!(assignment.route(0), &[1, 2]);
/// assert_eq!(assignment.route(1), &[3]);
/// ```
#[instrument(skip_all, level = "debug")]
pub fn path_cheapest_arc(registry: &Registry<'_>) -> Result<RouteAssignment, RoutingError> {
    let problem = registry.problem();
    let depot = problem.depot();
    let mut assignment = RouteAssignment::new(problem);
    let mut unrouted: Vec<usize> = problem.customers().collect();

    for vehicle in 0..problem.num_vehicles() {
        if unrouted.is_empty() {
            break;
        }

        let mut current = depot;
        loop {
            let route = assignment.route(vehicle);
            let mut best: Option<(usize, f64)> = None;
            for &node in &unrouted {
                let cost = registry.arc_cost(current, node);
                if best.is_some_and(|(_, b)| cost >= b - FEASIBILITY_TOLERANCE) {
                    continue;
                }
                let mut candidate = route.to_vec();
                candidate.push(node);
                if registry.evaluate_route(vehicle, &candidate).is_ok() {
                    best = Some((node, cost));
                }
            }

            let Some((next, _)) = best else {
                break;
            };
            let len = route.len();
            assignment.insert(registry, vehicle, len, next)?;
            unrouted.retain(|&node| node != next);
            current = next;
        }

        debug!(vehicle, route = ?assignment.route(vehicle), "closed path");
    }

    if !unrouted.is_empty() {
        warn!(unrouted = ?unrouted, "customers left after every vehicle closed its path");
        return Err(InfeasibleError { unrouted }.into());
    }

    Ok(assignment)
}
