//! Per-vehicle successor structure with validated mutators.

use crate::error::AssignmentError;
use crate::evaluation::{Registry, RouteMetrics};
use crate::models::{Problem, Violation, Visit};

/// Read-only view of one vehicle's route with its running cumuls.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteView {
    /// Vehicle owning the route.
    pub vehicle: usize,
    /// Every stop, depot start and end included.
    pub visits: Vec<Visit>,
    /// Priced summary of the route.
    pub metrics: RouteMetrics,
}

impl RouteView {
    /// Node sequence, depot start and end included.
    pub fn nodes(&self) -> Vec<usize> {
        self.visits.iter().map(|v| v.node).collect()
    }

    /// Running cumul of dimension `dimension` at every stop.
    pub fn cumuls(&self, dimension: usize) -> Vec<f64> {
        self.visits.iter().map(|v| v.cumuls[dimension]).collect()
    }
}

/// For each vehicle, the ordered customers it serves.
///
/// The depot is implicit at both ends of every sequence, so a vehicle with
/// no customers has the trivial `depot → depot` route. A customer is either
/// unrouted or appears in exactly one sequence exactly once.
///
/// Mutators check the affected routes against every registered dimension
/// and each vehicle's max route cost; a rejected mutation leaves the
/// assignment untouched.
///
/// # Examples
///
/// ```
/// use u_cvrp::assignment::RouteAssignment;
/// use u_cvrp::distance::DistanceMatrix;
/// use u_cvrp::evaluation::Registry;
/// use u_cvrp::models::{Problem, Vehicle};
///
/// let dm = DistanceMatrix::from_rows(vec![
///     vec![0.0, 2.0, 3.0],
///     vec![2.0, 0.0, 1.0],
///     vec![3.0, 1.0, 0.0],
/// ])
/// .unwrap();
/// let problem = Problem::new(dm, vec![0, 6, 6], Vehicle::fleet(&[10, 10])).unwrap();
/// let mut registry = Registry::new(&problem);
/// registry.add_capacity_dimension().unwrap();
///
/// let mut assignment = RouteAssignment::new(&problem);
/// assignment.insert(&registry, 0, 0, 1).unwrap();
/// // 6 + 6 exceeds capacity 10: rejected without partial application.
/// assert!(assignment.insert(&registry, 0, 1, 2).is_err());
/// assert_eq!(assignment.route(0), &[1]);
///
/// assignment.insert(&registry, 1, 0, 2).unwrap();
/// assert!(assignment.is_complete());
/// assert_eq!(assignment.inspect(&registry, 1).unwrap().nodes(), vec![0, 2, 0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RouteAssignment {
    routes: Vec<Vec<usize>>,
    locations: Vec<Option<(usize, usize)>>,
    depot: usize,
}

impl RouteAssignment {
    /// Creates an assignment with every customer unrouted.
    pub fn new(problem: &Problem) -> Self {
        Self {
            routes: vec![Vec::new(); problem.num_vehicles()],
            locations: vec![None; problem.num_nodes()],
            depot: problem.depot(),
        }
    }

    /// Number of vehicles.
    pub fn num_vehicles(&self) -> usize {
        self.routes.len()
    }

    /// Customers of `vehicle` in visit order.
    pub fn route(&self, vehicle: usize) -> &[usize] {
        &self.routes[vehicle]
    }

    /// All customer sequences, indexed by vehicle.
    pub fn routes(&self) -> &[Vec<usize>] {
        &self.routes
    }

    /// `(vehicle, index)` of a routed customer.
    pub fn location(&self, node: usize) -> Option<(usize, usize)> {
        self.locations.get(node).copied().flatten()
    }

    /// Returns `true` if `node` is served by some vehicle.
    pub fn is_routed(&self, node: usize) -> bool {
        self.location(node).is_some()
    }

    /// Customers not yet served, ascending.
    pub fn unrouted(&self) -> Vec<usize> {
        (0..self.locations.len())
            .filter(|&node| node != self.depot && self.locations[node].is_none())
            .collect()
    }

    /// Returns `true` if every customer is served.
    pub fn is_complete(&self) -> bool {
        self.unrouted().is_empty()
    }

    /// Inserts `node` after visit `after` of `vehicle`, counting the depot
    /// start as visit 0.
    pub fn insert(
        &mut self,
        registry: &Registry<'_>,
        vehicle: usize,
        after: usize,
        node: usize,
    ) -> Result<(), AssignmentError> {
        self.check_customer(node)?;
        if self.is_routed(node) {
            return Err(AssignmentError::AlreadyRouted(node));
        }
        let route = self.route_checked(vehicle)?;
        if after > route.len() {
            return Err(AssignmentError::PositionOutOfRange {
                vehicle,
                position: after,
                len: route.len(),
            });
        }

        let mut candidate = route.to_vec();
        candidate.insert(after, node);
        self.commit(registry, vec![(vehicle, candidate)])
    }

    /// Removes a routed customer, leaving it unrouted.
    pub fn remove(&mut self, registry: &Registry<'_>, node: usize) -> Result<(), AssignmentError> {
        let (vehicle, index) = self.routed_location(node)?;
        let mut candidate = self.routes[vehicle].clone();
        candidate.remove(index);
        self.commit(registry, vec![(vehicle, candidate)])
    }

    /// Moves a routed customer so it becomes visit `after + 1` of `vehicle`,
    /// positions being counted after the customer is taken out.
    pub fn relocate(
        &mut self,
        registry: &Registry<'_>,
        node: usize,
        vehicle: usize,
        after: usize,
    ) -> Result<(), AssignmentError> {
        let (from_vehicle, index) = self.routed_location(node)?;
        self.route_checked(vehicle)?;

        let mut source = self.routes[from_vehicle].clone();
        source.remove(index);
        let mut target = if vehicle == from_vehicle {
            source.clone()
        } else {
            self.routes[vehicle].clone()
        };
        if after > target.len() {
            return Err(AssignmentError::PositionOutOfRange {
                vehicle,
                position: after,
                len: target.len(),
            });
        }
        target.insert(after, node);

        if vehicle == from_vehicle {
            self.commit(registry, vec![(vehicle, target)])
        } else {
            self.commit(registry, vec![(from_vehicle, source), (vehicle, target)])
        }
    }

    /// Exchanges the positions of two routed customers.
    pub fn swap(
        &mut self,
        registry: &Registry<'_>,
        a: usize,
        b: usize,
    ) -> Result<(), AssignmentError> {
        let (va, ia) = self.routed_location(a)?;
        let (vb, ib) = self.routed_location(b)?;

        if va == vb {
            let mut route = self.routes[va].clone();
            route.swap(ia, ib);
            self.commit(registry, vec![(va, route)])
        } else {
            let mut route_a = self.routes[va].clone();
            let mut route_b = self.routes[vb].clone();
            route_a[ia] = b;
            route_b[ib] = a;
            self.commit(registry, vec![(va, route_a), (vb, route_b)])
        }
    }

    /// Reverses customers `start..=end` of `vehicle` (a 2-opt move).
    pub fn reverse(
        &mut self,
        registry: &Registry<'_>,
        vehicle: usize,
        start: usize,
        end: usize,
    ) -> Result<(), AssignmentError> {
        let route = self.route_checked(vehicle)?;
        if start > end || end >= route.len() {
            return Err(AssignmentError::PositionOutOfRange {
                vehicle,
                position: end.max(start),
                len: route.len(),
            });
        }
        let mut candidate = route.to_vec();
        candidate[start..=end].reverse();
        self.commit(registry, vec![(vehicle, candidate)])
    }

    /// Replaces whole routes atomically after validating each one.
    ///
    /// Customers missing from their new route become unrouted; customers in
    /// a new route must not be served by a vehicle left unchanged.
    pub(crate) fn commit(
        &mut self,
        registry: &Registry<'_>,
        changes: Vec<(usize, Vec<usize>)>,
    ) -> Result<(), AssignmentError> {
        for (vehicle, route) in &changes {
            registry
                .evaluate_route(*vehicle, route)
                .map_err(AssignmentError::Rejected)?;
        }

        for (vehicle, _) in &changes {
            for &node in &self.routes[*vehicle] {
                self.locations[node] = None;
            }
        }
        for (vehicle, route) in changes {
            for (index, &node) in route.iter().enumerate() {
                debug_assert!(
                    self.locations[node].is_none(),
                    "node {node} routed twice"
                );
                self.locations[node] = Some((vehicle, index));
            }
            self.routes[vehicle] = route;
        }
        Ok(())
    }

    /// Route of `vehicle` with its running cumuls.
    pub fn inspect(&self, registry: &Registry<'_>, vehicle: usize) -> Result<RouteView, Violation> {
        let (metrics, visits) = registry.trace_route(vehicle, &self.routes[vehicle])?;
        Ok(RouteView {
            vehicle,
            visits,
            metrics,
        })
    }

    /// Priced summary of every route, indexed by vehicle.
    pub fn metrics(&self, registry: &Registry<'_>) -> Result<Vec<RouteMetrics>, Violation> {
        self.routes
            .iter()
            .enumerate()
            .map(|(vehicle, route)| registry.evaluate_route(vehicle, route))
            .collect()
    }

    /// Total cost: route costs plus global span penalties.
    pub fn cost(&self, registry: &Registry<'_>) -> Result<f64, Violation> {
        let metrics = self.metrics(registry)?;
        let routes: f64 = metrics.iter().map(RouteMetrics::cost).sum();
        Ok(routes + registry.global_span_cost(&metrics))
    }

    fn check_customer(&self, node: usize) -> Result<(), AssignmentError> {
        if node >= self.locations.len() {
            Err(AssignmentError::UnknownNode(node))
        } else if node == self.depot {
            Err(AssignmentError::DepotNotRoutable)
        } else {
            Ok(())
        }
    }

    fn route_checked(&self, vehicle: usize) -> Result<&[usize], AssignmentError> {
        self.routes
            .get(vehicle)
            .map(Vec::as_slice)
            .ok_or(AssignmentError::UnknownVehicle(vehicle))
    }

    fn routed_location(&self, node: usize) -> Result<(usize, usize), AssignmentError> {
        self.check_customer(node)?;
        self.location(node).ok_or(AssignmentError::NotRouted(node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceMatrix;
    use crate::models::{Vehicle, ViolationType};

    fn problem() -> Problem {
        let dm = DistanceMatrix::from_rows(vec![
            vec![0.0, 1.0, 2.0, 3.0, 4.0],
            vec![1.0, 0.0, 1.0, 2.0, 3.0],
            vec![2.0, 1.0, 0.0, 1.0, 2.0],
            vec![3.0, 2.0, 1.0, 0.0, 1.0],
            vec![4.0, 3.0, 2.0, 1.0, 0.0],
        ])
        .expect("valid");
        Problem::new(dm, vec![0, 4, 4, 4, 4], Vehicle::fleet(&[8, 12])).expect("valid")
    }

    fn registry(p: &Problem) -> Registry<'_> {
        let mut r = Registry::new(p);
        r.add_capacity_dimension().expect("valid");
        r
    }

    fn assignment(p: &Problem, r: &Registry<'_>, routes: &[&[usize]]) -> RouteAssignment {
        let mut a = RouteAssignment::new(p);
        for (vehicle, route) in routes.iter().enumerate() {
            for (i, &node) in route.iter().enumerate() {
                a.insert(r, vehicle, i, node).expect("feasible");
            }
        }
        a
    }

    #[test]
    fn test_new_is_empty() {
        let p = problem();
        let a = RouteAssignment::new(&p);
        assert_eq!(a.num_vehicles(), 2);
        assert_eq!(a.unrouted(), vec![1, 2, 3, 4]);
        assert!(!a.is_complete());
    }

    #[test]
    fn test_insert_and_locations() {
        let p = problem();
        let r = registry(&p);
        let a = assignment(&p, &r, &[&[1, 2], &[3, 4]]);
        assert!(a.is_complete());
        assert_eq!(a.location(2), Some((0, 1)));
        assert_eq!(a.location(4), Some((1, 1)));
        assert_eq!(a.location(0), None);
    }

    #[test]
    fn test_insert_errors() {
        let p = problem();
        let r = registry(&p);
        let mut a = assignment(&p, &r, &[&[1], &[]]);
        assert_eq!(
            a.insert(&r, 0, 0, 0),
            Err(AssignmentError::DepotNotRoutable)
        );
        assert_eq!(a.insert(&r, 0, 0, 9), Err(AssignmentError::UnknownNode(9)));
        assert_eq!(
            a.insert(&r, 1, 0, 1),
            Err(AssignmentError::AlreadyRouted(1))
        );
        assert_eq!(
            a.insert(&r, 2, 0, 2),
            Err(AssignmentError::UnknownVehicle(2))
        );
        assert_eq!(
            a.insert(&r, 0, 3, 2),
            Err(AssignmentError::PositionOutOfRange {
                vehicle: 0,
                position: 3,
                len: 1
            })
        );
    }

    #[test]
    fn test_insert_rejected_by_capacity() {
        let p = problem();
        let r = registry(&p);
        let mut a = assignment(&p, &r, &[&[1, 2], &[]]);
        let before = a.clone();
        let err = a.insert(&r, 0, 2, 3).unwrap_err();
        assert!(matches!(
            err,
            AssignmentError::Rejected(Violation {
                vehicle: 0,
                kind: ViolationType::DimensionExceeded { .. }
            })
        ));
        assert_eq!(a, before);
    }

    #[test]
    fn test_remove() {
        let p = problem();
        let r = registry(&p);
        let mut a = assignment(&p, &r, &[&[1, 2], &[3]]);
        a.remove(&r, 1).expect("feasible");
        assert_eq!(a.route(0), &[2]);
        assert_eq!(a.location(2), Some((0, 0)));
        assert_eq!(a.unrouted(), vec![1, 4]);
        assert_eq!(a.remove(&r, 1), Err(AssignmentError::NotRouted(1)));
    }

    #[test]
    fn test_relocate_between_vehicles() {
        let p = problem();
        let r = registry(&p);
        let mut a = assignment(&p, &r, &[&[1, 2], &[3]]);
        a.relocate(&r, 1, 1, 1).expect("feasible");
        assert_eq!(a.route(0), &[2]);
        assert_eq!(a.route(1), &[3, 1]);
        assert_eq!(a.location(1), Some((1, 1)));
    }

    #[test]
    fn test_relocate_within_vehicle() {
        let p = problem();
        let r = registry(&p);
        let mut a = assignment(&p, &r, &[&[], &[1, 2, 3]]);
        a.relocate(&r, 1, 1, 2).expect("feasible");
        assert_eq!(a.route(1), &[2, 3, 1]);
    }

    #[test]
    fn test_relocate_rejected() {
        let p = problem();
        let r = registry(&p);
        let mut a = assignment(&p, &r, &[&[1, 2], &[3, 4]]);
        let before = a.clone();
        assert!(matches!(
            a.relocate(&r, 3, 0, 0),
            Err(AssignmentError::Rejected(_))
        ));
        assert_eq!(a, before);
    }

    #[test]
    fn test_swap() {
        let p = problem();
        let r = registry(&p);
        let mut a = assignment(&p, &r, &[&[1, 2], &[3, 4]]);
        a.swap(&r, 2, 3).expect("feasible");
        assert_eq!(a.route(0), &[1, 3]);
        assert_eq!(a.route(1), &[2, 4]);
        a.swap(&r, 2, 4).expect("feasible");
        assert_eq!(a.route(1), &[4, 2]);
        assert_eq!(a.location(2), Some((1, 1)));
    }

    #[test]
    fn test_reverse() {
        let p = problem();
        let r = registry(&p);
        let mut a = assignment(&p, &r, &[&[], &[1, 2, 3]]);
        a.reverse(&r, 1, 0, 2).expect("feasible");
        assert_eq!(a.route(1), &[3, 2, 1]);
        assert_eq!(a.location(3), Some((1, 0)));
        assert!(a.reverse(&r, 1, 2, 3).is_err());
    }

    #[test]
    fn test_reverse_rejected_by_max_route_cost() {
        let dm = DistanceMatrix::from_rows(vec![
            vec![0.0, 1.0, 5.0],
            vec![5.0, 0.0, 1.0],
            vec![1.0, 5.0, 0.0],
        ])
        .expect("valid");
        let fleet = vec![Vehicle::new(0, 10).with_max_route_cost(4.0)];
        let p = Problem::new(dm, vec![0, 1, 1], fleet).expect("valid");
        let r = Registry::new(&p);
        let mut a = RouteAssignment::new(&p);
        // 0 -> 1 -> 0 alone costs 6, so build the whole route at once.
        assert!(a.insert(&r, 0, 0, 1).is_err());
        a.commit(&r, vec![(0, vec![1, 2])]).expect("0-1-2-0 costs 3");
        assert!(matches!(
            a.reverse(&r, 0, 0, 1),
            Err(AssignmentError::Rejected(Violation {
                kind: ViolationType::MaxRouteCostExceeded { .. },
                ..
            }))
        ));
        assert_eq!(a.route(0), &[1, 2]);
    }

    #[test]
    fn test_inspect_and_cost() {
        let p = problem();
        let r = registry(&p);
        let a = assignment(&p, &r, &[&[1, 2], &[4]]);
        let view = a.inspect(&r, 0).expect("feasible");
        assert_eq!(view.nodes(), vec![0, 1, 2, 0]);
        assert_eq!(view.cumuls(0), vec![0.0, 0.0, 4.0, 8.0]);
        // 1 + 1 + 2 and 4 + 4
        assert_eq!(a.cost(&r).expect("feasible"), 12.0);
    }
}
