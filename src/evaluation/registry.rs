//! Cost and constraint registry.

use tracing::debug;

use crate::error::ValidationError;
use crate::models::{Problem, Violation, Visit};

use super::{Dimension, DimensionId, RouteEvaluator, RouteMetrics, Transit, TransitId};

/// Name under which [`Registry::add_capacity_dimension`] registers demand.
pub const CAPACITY_DIMENSION: &str = "Capacity";

/// Name of the optional route-distance dimension.
pub const DISTANCE_DIMENSION: &str = "Distance";

/// Typed registry of arc costs and dimensions for one problem.
///
/// Transit 0 is always [`Transit::Distance`] and is the initial objective
/// arc cost evaluator. Everything registered here is read-only during a
/// solve and shared by all search workers.
///
/// # Examples
///
/// ```
/// use u_cvrp::distance::DistanceMatrix;
/// use u_cvrp::evaluation::{Registry, Transit};
/// use u_cvrp::models::{Problem, Vehicle};
///
/// let dm = DistanceMatrix::from_rows(vec![
///     vec![0.0, 3.0, 4.0],
///     vec![3.0, 0.0, 5.0],
///     vec![4.0, 5.0, 0.0],
/// ])
/// .unwrap();
/// let problem = Problem::new(dm, vec![0, 6, 6], Vehicle::fleet(&[10, 10])).unwrap();
///
/// let mut registry = Registry::new(&problem);
/// registry.add_capacity_dimension().unwrap();
/// let distance = registry.register_transit(Transit::Distance).unwrap();
/// let dim = registry.add_dimension(distance, 0.0, 100.0, true, "Distance").unwrap();
/// registry.set_global_span_cost_coefficient(dim, 10.0).unwrap();
///
/// let metrics = registry.evaluate_route(0, &[1]).unwrap();
/// assert_eq!(metrics.arc_cost, 6.0);
///
/// // 6 + 6 > 10: rejected by the capacity dimension.
/// assert!(registry.evaluate_route(0, &[1, 2]).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Registry<'a> {
    problem: &'a Problem,
    transits: Vec<Transit>,
    objective: TransitId,
    dimensions: Vec<Dimension>,
}

impl<'a> Registry<'a> {
    /// Creates a registry pricing arcs by distance, with no dimensions.
    pub fn new(problem: &'a Problem) -> Self {
        Self {
            problem,
            transits: vec![Transit::Distance],
            objective: TransitId(0),
            dimensions: Vec::new(),
        }
    }

    /// The problem this registry prices.
    pub fn problem(&self) -> &'a Problem {
        self.problem
    }

    /// Registers a transit and returns its handle.
    ///
    /// Caller closures must be pure. They are evaluated once on every arc
    /// between distinct nodes here, and registration fails with
    /// [`ValidationError::InvalidTransitValue`] on the first negative or
    /// non-finite value.
    pub fn register_transit(&mut self, transit: Transit) -> Result<TransitId, ValidationError> {
        if let Some(c) = transit.coefficient() {
            check_coefficient(c)?;
        }
        if matches!(transit, Transit::Binary(_) | Transit::Unary(_)) {
            self.check_transit_values(&transit)?;
        }
        self.transits.push(transit);
        Ok(TransitId(self.transits.len() - 1))
    }

    /// Selects the transit used to price arcs in the objective.
    pub fn set_arc_cost_evaluator(&mut self, transit: TransitId) -> Result<(), ValidationError> {
        self.check_transit(transit)?;
        self.objective = transit;
        Ok(())
    }

    /// The objective arc cost evaluator.
    pub fn arc_cost_evaluator(&self) -> TransitId {
        self.objective
    }

    /// Adds a dimension with the same bound for every vehicle.
    pub fn add_dimension(
        &mut self,
        transit: TransitId,
        slack_max: f64,
        capacity: f64,
        fix_start_cumul_to_zero: bool,
        name: impl Into<String>,
    ) -> Result<DimensionId, ValidationError> {
        let capacities = vec![capacity; self.problem.num_vehicles()];
        self.add_dimension_with_vehicle_capacity(
            transit,
            slack_max,
            capacities,
            fix_start_cumul_to_zero,
            name,
        )
    }

    /// Adds a dimension with one bound per vehicle.
    pub fn add_dimension_with_vehicle_capacity(
        &mut self,
        transit: TransitId,
        slack_max: f64,
        capacities: Vec<f64>,
        fix_start_cumul_to_zero: bool,
        name: impl Into<String>,
    ) -> Result<DimensionId, ValidationError> {
        let name = name.into();
        self.check_transit(transit)?;
        if self.dimension_by_name(&name).is_some() {
            return Err(ValidationError::DuplicateDimension(name));
        }
        if capacities.len() != self.problem.num_vehicles() {
            return Err(ValidationError::CapacityCount {
                expected: self.problem.num_vehicles(),
                found: capacities.len(),
            });
        }
        if !slack_max.is_finite() || slack_max < 0.0 {
            return Err(ValidationError::InvalidDimensionBound {
                name,
                value: slack_max,
            });
        }
        if let Some(&bad) = capacities.iter().find(|c| c.is_nan() || **c < 0.0) {
            return Err(ValidationError::InvalidDimensionBound { name, value: bad });
        }

        debug!(dimension = %name, transit = transit.index(), "registered dimension");
        self.dimensions.push(Dimension::new(
            name,
            transit,
            slack_max,
            capacities,
            fix_start_cumul_to_zero,
        ));
        Ok(DimensionId(self.dimensions.len() - 1))
    }

    /// Registers demand as a unary transit and bounds it by each vehicle's
    /// capacity in a dimension named [`CAPACITY_DIMENSION`].
    pub fn add_capacity_dimension(&mut self) -> Result<DimensionId, ValidationError> {
        let demand = self.register_transit(Transit::Demand)?;
        let capacities = self
            .problem
            .fleet()
            .iter()
            .map(|v| v.capacity() as f64)
            .collect();
        self.add_dimension_with_vehicle_capacity(demand, 0.0, capacities, true, CAPACITY_DIMENSION)
    }

    /// Sets the per-vehicle span cost coefficient of a dimension.
    pub fn set_span_cost_coefficient(
        &mut self,
        dimension: DimensionId,
        coefficient: f64,
    ) -> Result<(), ValidationError> {
        check_coefficient(coefficient)?;
        self.dimension_mut(dimension)?
            .set_span_cost_coefficient(coefficient);
        Ok(())
    }

    /// Sets the global span cost coefficient of a dimension.
    pub fn set_global_span_cost_coefficient(
        &mut self,
        dimension: DimensionId,
        coefficient: f64,
    ) -> Result<(), ValidationError> {
        check_coefficient(coefficient)?;
        self.dimension_mut(dimension)?
            .set_global_span_cost_coefficient(coefficient);
        Ok(())
    }

    /// All dimensions in registration order.
    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    /// The dimension behind `id`.
    pub fn dimension(&self, id: DimensionId) -> &Dimension {
        &self.dimensions[id.0]
    }

    /// Looks a dimension up by name.
    pub fn dimension_by_name(&self, name: &str) -> Option<DimensionId> {
        self.dimensions
            .iter()
            .position(|d| d.name() == name)
            .map(DimensionId)
    }

    /// Objective cost of arc `from → to`.
    #[inline]
    pub fn arc_cost(&self, from: usize, to: usize) -> f64 {
        self.transit(self.objective, from, to)
    }

    /// Value of a registered transit on arc `from → to`.
    #[inline]
    pub fn transit(&self, id: TransitId, from: usize, to: usize) -> f64 {
        self.transits[id.0].evaluate(self.problem, from, to)
    }

    /// Checks and prices a vehicle's customer sequence.
    pub fn evaluate_route(
        &self,
        vehicle: usize,
        customers: &[usize],
    ) -> Result<RouteMetrics, Violation> {
        RouteEvaluator::new(self, vehicle).evaluate(customers)
    }

    /// Like [`evaluate_route`](Self::evaluate_route), also returning every
    /// stop with its cumuls.
    pub fn trace_route(
        &self,
        vehicle: usize,
        customers: &[usize],
    ) -> Result<(RouteMetrics, Vec<Visit>), Violation> {
        RouteEvaluator::new(self, vehicle).trace(customers)
    }

    /// Global span penalty of a full set of routes, one entry per vehicle.
    pub fn global_span_cost<'m>(&self, routes: impl IntoIterator<Item = &'m RouteMetrics>) -> f64 {
        let mut max_end: Vec<f64> = vec![f64::NEG_INFINITY; self.dimensions.len()];
        let mut min_start: Vec<f64> = vec![f64::INFINITY; self.dimensions.len()];
        for metrics in routes {
            for (d, summary) in metrics.dimensions.iter().enumerate() {
                max_end[d] = max_end[d].max(summary.end);
                min_start[d] = min_start[d].min(summary.start);
            }
        }
        self.dimensions
            .iter()
            .enumerate()
            .filter(|(d, dim)| dim.global_span_cost_coefficient() > 0.0 && max_end[*d].is_finite())
            .map(|(d, dim)| dim.global_span_cost_coefficient() * (max_end[d] - min_start[d]))
            .sum()
    }

    fn check_transit_values(&self, transit: &Transit) -> Result<(), ValidationError> {
        let n = self.problem.num_nodes();
        for from in 0..n {
            for to in (0..n).filter(|&to| to != from) {
                let value = transit.value(self.problem, from, to);
                if !value.is_finite() || value < 0.0 {
                    return Err(ValidationError::InvalidTransitValue { from, to, value });
                }
                if transit.is_unary() {
                    break;
                }
            }
        }
        Ok(())
    }

    fn check_transit(&self, transit: TransitId) -> Result<(), ValidationError> {
        if transit.0 < self.transits.len() {
            Ok(())
        } else {
            Err(ValidationError::UnknownTransit(transit.0))
        }
    }

    fn dimension_mut(&mut self, id: DimensionId) -> Result<&mut Dimension, ValidationError> {
        self.dimensions
            .get_mut(id.0)
            .ok_or(ValidationError::UnknownDimension(id.0))
    }
}

fn check_coefficient(coefficient: f64) -> Result<(), ValidationError> {
    if coefficient.is_finite() && coefficient >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidCoefficient(coefficient))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceMatrix;
    use crate::models::Vehicle;

    fn problem() -> Problem {
        let dm = DistanceMatrix::from_rows(vec![
            vec![0.0, 10.0, 10.0],
            vec![10.0, 0.0, 2.0],
            vec![10.0, 2.0, 0.0],
        ])
        .expect("valid");
        Problem::new(dm, vec![0, 4, 5], Vehicle::fleet(&[10, 8])).expect("valid")
    }

    #[test]
    fn test_default_objective_is_distance() {
        let p = problem();
        let registry = Registry::new(&p);
        assert_eq!(registry.arc_cost_evaluator(), TransitId(0));
        assert_eq!(registry.arc_cost(1, 2), 2.0);
    }

    #[test]
    fn test_switch_objective() {
        let p = problem();
        let mut registry = Registry::new(&p);
        let shaped = registry
            .register_transit(Transit::DemandWeightedDistance { rate: 1.5 })
            .expect("valid");
        registry.set_arc_cost_evaluator(shaped).expect("registered");
        assert_eq!(registry.arc_cost(1, 2), 2.0 * 1.5 * 4.0);
        assert_eq!(registry.arc_cost(0, 1), 0.0);
    }

    #[test]
    fn test_unknown_transit() {
        let p = problem();
        let mut registry = Registry::new(&p);
        assert_eq!(
            registry.set_arc_cost_evaluator(TransitId(7)),
            Err(ValidationError::UnknownTransit(7))
        );
    }

    #[test]
    fn test_closure_values_checked_on_registration() {
        let p = problem();
        let mut registry = Registry::new(&p);
        assert!(registry
            .register_transit(Transit::binary(|from, to| (from + to) as f64))
            .is_ok());

        let err = registry
            .register_transit(Transit::binary(|from, to| from as f64 - to as f64))
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidTransitValue {
                from: 0,
                to: 1,
                value: -1.0
            }
        );

        let nan_at_last = Transit::unary(|node| if node == 2 { f64::NAN } else { 1.0 });
        let err = registry.register_transit(nan_at_last).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidTransitValue { from: 2, to: 0, .. }
        ));
        // Rejected transits are not registered.
        assert_eq!(
            registry.set_arc_cost_evaluator(TransitId(2)),
            Err(ValidationError::UnknownTransit(2))
        );
    }

    #[test]
    fn test_invalid_coefficients() {
        let p = problem();
        let mut registry = Registry::new(&p);
        assert_eq!(
            registry.register_transit(Transit::ScaledDistance { factor: -1.0 }),
            Err(ValidationError::InvalidCoefficient(-1.0))
        );
        let cap = registry.add_capacity_dimension().expect("valid");
        assert!(registry
            .set_global_span_cost_coefficient(cap, f64::NAN)
            .is_err());
        assert_eq!(
            registry.set_span_cost_coefficient(DimensionId(9), 1.0),
            Err(ValidationError::UnknownDimension(9))
        );
    }

    #[test]
    fn test_capacity_dimension() {
        let p = problem();
        let mut registry = Registry::new(&p);
        let cap = registry.add_capacity_dimension().expect("valid");
        assert_eq!(registry.dimension_by_name(CAPACITY_DIMENSION), Some(cap));
        let dim = registry.dimension(cap);
        assert_eq!(dim.capacities(), &[10.0, 8.0]);
        assert!(dim.fix_start_cumul_to_zero());
    }

    #[test]
    fn test_duplicate_dimension() {
        let p = problem();
        let mut registry = Registry::new(&p);
        registry.add_capacity_dimension().expect("valid");
        assert_eq!(
            registry.add_capacity_dimension(),
            Err(ValidationError::DuplicateDimension("Capacity".into()))
        );
    }

    #[test]
    fn test_capacity_count_mismatch() {
        let p = problem();
        let mut registry = Registry::new(&p);
        let t = registry.register_transit(Transit::Distance).expect("valid");
        assert_eq!(
            registry.add_dimension_with_vehicle_capacity(t, 0.0, vec![1.0], true, "Distance"),
            Err(ValidationError::CapacityCount {
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn test_negative_dimension_bound() {
        let p = problem();
        let mut registry = Registry::new(&p);
        let t = registry.register_transit(Transit::Distance).expect("valid");
        assert!(matches!(
            registry.add_dimension(t, 0.0, -1.0, true, "Distance"),
            Err(ValidationError::InvalidDimensionBound { .. })
        ));
        assert!(matches!(
            registry.add_dimension(t, -2.0, 10.0, true, "Distance"),
            Err(ValidationError::InvalidDimensionBound { .. })
        ));
    }

    #[test]
    fn test_global_span_cost_takes_longest_route() {
        let p = problem();
        let mut registry = Registry::new(&p);
        let t = registry.register_transit(Transit::Distance).expect("valid");
        let dim = registry
            .add_dimension(t, 0.0, 1000.0, true, DISTANCE_DIMENSION)
            .expect("valid");
        registry
            .set_global_span_cost_coefficient(dim, 100.0)
            .expect("valid");

        let together = registry.evaluate_route(0, &[1, 2]).expect("feasible");
        let empty = registry.evaluate_route(1, &[]).expect("feasible");
        assert_eq!(together.cost(), 22.0);
        assert_eq!(registry.global_span_cost([&together, &empty]), 2200.0);

        let first = registry.evaluate_route(0, &[1]).expect("feasible");
        let second = registry.evaluate_route(1, &[2]).expect("feasible");
        assert_eq!(registry.global_span_cost([&first, &second]), 2000.0);
    }
}
