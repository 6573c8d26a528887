//! Conversion of a final assignment into a reported [`Solution`].

use crate::assignment::RouteAssignment;
use crate::error::AssignmentError;
use crate::evaluation::Registry;
use crate::models::{Route, SearchStatistics, Solution};

/// Walks every vehicle's route with the registry the search ran against
/// and reports its stops, cumuls, and costs.
///
/// Each dimension's global span term is charged to the vehicle with the
/// largest end cumul (lowest id on ties), so [`Solution::total_cost`] equals
/// [`RouteAssignment::cost`].
///
/// # Examples
///
/// ```
/// use u_cvrp::assignment::RouteAssignment;
/// use u_cvrp::distance::DistanceMatrix;
/// use u_cvrp::evaluation::Registry;
/// use u_cvrp::models::{Problem, SearchStatistics, Vehicle};
/// use u_cvrp::solver::extract_solution;
///
/// let dm = DistanceMatrix::from_rows(vec![vec![0.0, 7.0], vec![7.0, 0.0]]).unwrap();
/// let problem = Problem::new(dm, vec![0, 5], Vehicle::fleet(&[10])).unwrap();
/// let mut registry = Registry::new(&problem);
/// registry.add_capacity_dimension().unwrap();
///
/// let mut assignment = RouteAssignment::new(&problem);
/// assignment.insert(&registry, 0, 0, 1).unwrap();
///
/// let solution = extract_solution(&registry, &assignment, SearchStatistics::default()).unwrap();
/// assert_eq!(solution.routes()[0].nodes(), vec![0, 1, 0]);
/// assert_eq!(solution.routes()[0].end_cumul(0), Some(5.0));
/// assert_eq!(solution.total_cost(), 14.0);
/// ```
pub fn extract_solution(
    registry: &Registry<'_>,
    assignment: &RouteAssignment,
    statistics: SearchStatistics,
) -> Result<Solution, AssignmentError> {
    let mut metrics = Vec::with_capacity(assignment.num_vehicles());
    let mut routes = Vec::with_capacity(assignment.num_vehicles());
    for (vehicle, customers) in assignment.routes().iter().enumerate() {
        let (route_metrics, visits) = registry
            .trace_route(vehicle, customers)
            .map_err(AssignmentError::Rejected)?;
        let mut route = Route::new(vehicle, visits);
        route.set_metrics(
            route_metrics.distance,
            route_metrics.arc_cost,
            route_metrics.span_cost,
        );
        routes.push(route);
        metrics.push(route_metrics);
    }

    for (d, dimension) in registry.dimensions().iter().enumerate() {
        let coefficient = dimension.global_span_cost_coefficient();
        if coefficient == 0.0 {
            continue;
        }
        let min_start = metrics
            .iter()
            .map(|m| m.dimensions[d].start)
            .fold(f64::INFINITY, f64::min);
        let widest = metrics
            .iter()
            .enumerate()
            .fold(None, |widest: Option<(usize, f64)>, (vehicle, m)| {
                let end = m.dimensions[d].end;
                match widest {
                    Some((_, best)) if best >= end => widest,
                    _ => Some((vehicle, end)),
                }
            });
        if let Some((vehicle, max_end)) = widest {
            routes[vehicle].add_global_span_cost(coefficient * (max_end - min_start));
        }
    }

    let dimensions = registry
        .dimensions()
        .iter()
        .map(|dimension| dimension.name().to_string())
        .collect();
    let solution = Solution::new(dimensions, routes).with_statistics(statistics);
    Ok(solution)
}
