//! Backtracking repair for stalled constructions.
//!
//! # Algorithm
//!
//! Greedy construction fixes each placement for good and can strand a
//! customer that only fits once an earlier customer sits on another
//! vehicle. The repair rebuilds the routes by depth-first search:
//!
//! 1. Order customers by decreasing demand (ties by ID).
//! 2. For each vehicle in turn, place the next customer at its cheapest
//!    feasible position on that vehicle and recurse.
//! 3. When a customer fits nowhere, undo the previous placement and try
//!    that customer's next vehicle.
//!
//! Vehicle choices are enumerated exhaustively, so a problem whose only
//! dimension is capacity is repaired whenever any packing exists.
//!
//! # Complexity
//!
//! Exponential in the worst case; bounded by [`REPAIR_BUDGET`] route
//! evaluations.

use std::cmp::Reverse;

use tracing::{debug, instrument};

use crate::evaluation::{Registry, FEASIBILITY_TOLERANCE};

/// Route evaluations the repair may spend before giving up.
pub(crate) const REPAIR_BUDGET: usize = 200_000;

/// Searches for per-vehicle routes serving every customer.
///
/// Returns `None` when no packing exists or the budget runs out first.
#[instrument(skip_all, level = "debug")]
pub(crate) fn repack(registry: &Registry<'_>) -> Option<Vec<Vec<usize>>> {
    let problem = registry.problem();
    let mut order: Vec<usize> = problem.customers().collect();
    order.sort_by_key(|&customer| Reverse(problem.demand(customer)));

    let mut routes = vec![Vec::new(); problem.num_vehicles()];
    let mut budget = REPAIR_BUDGET;
    let found = place(registry, &order, &mut routes, &mut budget);
    debug!(found, spent = REPAIR_BUDGET - budget, "repair finished");
    found.then_some(routes)
}

fn place(
    registry: &Registry<'_>,
    order: &[usize],
    routes: &mut [Vec<usize>],
    budget: &mut usize,
) -> bool {
    let Some((&node, rest)) = order.split_first() else {
        return true;
    };

    for vehicle in 0..routes.len() {
        let Some(after) = cheapest_position(registry, vehicle, &routes[vehicle], node, budget)
        else {
            continue;
        };
        routes[vehicle].insert(after, node);
        if place(registry, rest, routes, budget) {
            return true;
        }
        routes[vehicle].remove(after);
        if *budget == 0 {
            break;
        }
    }
    false
}

fn cheapest_position(
    registry: &Registry<'_>,
    vehicle: usize,
    route: &[usize],
    node: usize,
    budget: &mut usize,
) -> Option<usize> {
    let depot = registry.problem().depot();
    let mut best: Option<(usize, f64)> = None;
    let mut candidate = Vec::with_capacity(route.len() + 1);

    for after in 0..=route.len() {
        if *budget == 0 {
            return None;
        }
        let prev = if after == 0 { depot } else { route[after - 1] };
        let next = route.get(after).copied().unwrap_or(depot);
        let delta = registry.arc_cost(prev, node) + registry.arc_cost(node, next)
            - registry.arc_cost(prev, next);
        if best.is_some_and(|(_, b)| delta >= b - FEASIBILITY_TOLERANCE) {
            continue;
        }

        candidate.clear();
        candidate.extend_from_slice(&route[..after]);
        candidate.push(node);
        candidate.extend_from_slice(&route[after..]);
        *budget -= 1;
        if registry.evaluate_route(vehicle, &candidate).is_ok() {
            best = Some((after, delta));
        }
    }
    best.map(|(after, _)| after)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceMatrix;
    use crate::models::{Problem, Vehicle};

    fn registry(p: &Problem) -> Registry<'_> {
        let mut r = Registry::new(p);
        r.add_capacity_dimension().expect("valid");
        r
    }

    fn uniform(size: usize) -> DistanceMatrix {
        DistanceMatrix::from_rows(
            (0..size)
                .map(|i| (0..size).map(|j| if i == j { 0.0 } else { 1.0 }).collect())
                .collect(),
        )
        .expect("valid")
    }

    #[test]
    fn test_packs_large_demands_first() {
        // 4 + 3 + 3 + 2 = 12 only fits as {4, 2} and {3, 3}.
        let p = Problem::new(uniform(5), vec![0, 2, 3, 3, 4], Vehicle::fleet(&[6, 6]))
            .expect("valid");
        let r = registry(&p);
        let routes = repack(&r).expect("packing exists");
        assert_eq!(routes, vec![vec![1, 4], vec![3, 2]]);
    }

    #[test]
    fn test_backtracks_out_of_dead_end() {
        // Both 3s go on the first vehicle and strand the last 2; one of them
        // has to move to the second vehicle.
        let p = Problem::new(uniform(6), vec![0, 3, 3, 2, 2, 2], Vehicle::fleet(&[7, 5]))
            .expect("valid");
        let r = registry(&p);
        let routes = repack(&r).expect("packing exists");
        for (vehicle, route) in routes.iter().enumerate() {
            assert!(r.evaluate_route(vehicle, route).is_ok());
        }
        let mut served: Vec<usize> = routes.concat();
        served.sort_unstable();
        assert_eq!(served, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_no_packing() {
        let p = Problem::new(uniform(4), vec![0, 3, 3, 3], Vehicle::fleet(&[4, 4]))
            .expect("valid");
        let r = registry(&p);
        assert_eq!(repack(&r), None);
    }
}
