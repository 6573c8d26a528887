//! Route evaluator that computes arc cost, cumuls, and feasibility.

use smallvec::{smallvec, SmallVec};

use crate::models::{Violation, ViolationType, Visit};

use super::{DimensionSummary, Registry};

/// Slack allowed when comparing a cumul against its bound.
pub const FEASIBILITY_TOLERANCE: f64 = 1e-9;

/// Priced summary of one vehicle's route.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteMetrics {
    /// Sum of objective arc costs.
    pub arc_cost: f64,
    /// Sum of raw matrix distances.
    pub distance: f64,
    /// Per-vehicle span penalties summed over dimensions.
    pub span_cost: f64,
    /// One summary per registered dimension.
    pub dimensions: SmallVec<[DimensionSummary; 4]>,
}

impl RouteMetrics {
    /// Route cost excluding global span terms.
    pub fn cost(&self) -> f64 {
        self.arc_cost + self.span_cost
    }
}

/// Walks a vehicle's route `depot → customers… → depot`, accumulating every
/// dimension and rejecting the route at the first broken bound.
///
/// # Examples
///
/// ```
/// use u_cvrp::distance::DistanceMatrix;
/// use u_cvrp::evaluation::{Registry, RouteEvaluator};
/// use u_cvrp::models::{Problem, Vehicle};
///
/// let dm = DistanceMatrix::from_rows(vec![
///     vec![0.0, 5.0, 8.0],
///     vec![5.0, 0.0, 3.0],
///     vec![8.0, 3.0, 0.0],
/// ])
/// .unwrap();
/// let problem = Problem::new(dm, vec![0, 10, 20], Vehicle::fleet(&[100])).unwrap();
/// let mut registry = Registry::new(&problem);
/// registry.add_capacity_dimension().unwrap();
///
/// let (metrics, visits) = RouteEvaluator::new(&registry, 0).trace(&[1, 2]).unwrap();
/// assert_eq!(metrics.arc_cost, 16.0);
/// assert_eq!(visits.len(), 4);
/// assert_eq!(visits[3].cumuls, vec![30.0]);
/// ```
pub struct RouteEvaluator<'r, 'a> {
    registry: &'r Registry<'a>,
    vehicle: usize,
}

impl<'r, 'a> RouteEvaluator<'r, 'a> {
    /// Creates an evaluator for one vehicle.
    pub fn new(registry: &'r Registry<'a>, vehicle: usize) -> Self {
        Self { registry, vehicle }
    }

    /// Prices the route without recording per-stop cumuls.
    pub fn evaluate(&self, customers: &[usize]) -> Result<RouteMetrics, Violation> {
        self.walk(customers, |_, _| {})
    }

    /// Prices the route and records every stop, depot start and end included.
    pub fn trace(&self, customers: &[usize]) -> Result<(RouteMetrics, Vec<Visit>), Violation> {
        let mut visits = Vec::with_capacity(customers.len() + 2);
        let metrics = self.walk(customers, |node, cumuls| {
            visits.push(Visit {
                node,
                cumuls: cumuls.to_vec(),
            })
        })?;
        Ok((metrics, visits))
    }

    fn walk(
        &self,
        customers: &[usize],
        mut on_visit: impl FnMut(usize, &[f64]),
    ) -> Result<RouteMetrics, Violation> {
        let registry = self.registry;
        let problem = registry.problem();
        let dimensions = registry.dimensions();
        let depot = problem.depot();

        let mut cumuls: SmallVec<[f64; 4]> = smallvec![0.0; dimensions.len()];
        let mut metrics = RouteMetrics {
            dimensions: smallvec![DimensionSummary::default(); dimensions.len()],
            ..Default::default()
        };

        on_visit(depot, &cumuls);
        if customers.is_empty() {
            // An unused vehicle stays at the depot.
            on_visit(depot, &cumuls);
            return Ok(metrics);
        }

        let mut prev = depot;
        for (i, node) in customers.iter().copied().chain([depot]).enumerate() {
            metrics.arc_cost += registry.arc_cost(prev, node);
            metrics.distance += problem.distance(prev, node);

            for (d, dimension) in dimensions.iter().enumerate() {
                cumuls[d] += registry.transit(dimension.transit(), prev, node);
                let capacity = dimension.capacity(self.vehicle);
                if cumuls[d] > capacity + FEASIBILITY_TOLERANCE
                    || cumuls[d] < -FEASIBILITY_TOLERANCE
                {
                    return Err(Violation::new(
                        self.vehicle,
                        ViolationType::DimensionExceeded {
                            dimension: dimension.name().to_string(),
                            position: i + 1,
                            cumul: cumuls[d],
                            capacity,
                        },
                    ));
                }
                metrics.dimensions[d].record(cumuls[d]);
            }

            on_visit(node, &cumuls);
            prev = node;
        }

        if let Some(max) = problem.vehicle(self.vehicle).max_route_cost() {
            if metrics.arc_cost > max + FEASIBILITY_TOLERANCE {
                return Err(Violation::new(
                    self.vehicle,
                    ViolationType::MaxRouteCostExceeded {
                        cost: metrics.arc_cost,
                        max_route_cost: max,
                    },
                ));
            }
        }

        metrics.span_cost = dimensions
            .iter()
            .zip(&metrics.dimensions)
            .map(|(dimension, summary)| dimension.span_cost_coefficient() * summary.span())
            .sum();

        Ok(metrics)
    }
}
