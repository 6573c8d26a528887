//! Capacitated routing problem instance.

use crate::distance::DistanceMatrix;
use crate::error::ValidationError;

use super::Vehicle;

/// An immutable CVRP instance: distances, demands, fleet, and depot.
///
/// Construction validates every input; afterwards all accessors are
/// infallible for in-range node and vehicle indices.
///
/// # Examples
///
/// ```
/// use u_cvrp::distance::DistanceMatrix;
/// use u_cvrp::models::{Problem, Vehicle};
///
/// let distances = DistanceMatrix::from_rows(vec![
///     vec![0.0, 4.0, 6.0],
///     vec![4.0, 0.0, 3.0],
///     vec![6.0, 3.0, 0.0],
/// ])
/// .unwrap();
/// let problem = Problem::new(distances, vec![0, 5, 7], Vehicle::fleet(&[10, 10])).unwrap();
///
/// assert_eq!(problem.num_nodes(), 3);
/// assert_eq!(problem.depot(), 0);
/// assert_eq!(problem.demand(2), 7);
/// assert_eq!(problem.customers().collect::<Vec<_>>(), vec![1, 2]);
/// ```
#[derive(Debug, Clone)]
pub struct Problem {
    distances: DistanceMatrix,
    demands: Vec<i64>,
    fleet: Vec<Vehicle>,
    depot: usize,
}

impl Problem {
    /// Creates a problem with the depot at node 0.
    pub fn new(
        distances: DistanceMatrix,
        demands: Vec<i64>,
        fleet: Vec<Vehicle>,
    ) -> Result<Self, ValidationError> {
        Self::with_depot(distances, demands, fleet, 0)
    }

    /// Creates a problem with an explicit depot index.
    pub fn with_depot(
        distances: DistanceMatrix,
        demands: Vec<i64>,
        fleet: Vec<Vehicle>,
        depot: usize,
    ) -> Result<Self, ValidationError> {
        distances.validate()?;
        let n = distances.size();
        if depot >= n {
            return Err(ValidationError::DepotOutOfRange { depot, nodes: n });
        }
        if demands.len() != n {
            return Err(ValidationError::DemandLength {
                expected: n,
                found: demands.len(),
            });
        }
        if let Some((node, &demand)) = demands.iter().enumerate().find(|(_, d)| **d < 0) {
            return Err(ValidationError::NegativeDemand { node, demand });
        }
        if demands[depot] != 0 {
            return Err(ValidationError::DepotDemand {
                demand: demands[depot],
            });
        }
        if fleet.is_empty() {
            return Err(ValidationError::EmptyFleet);
        }
        for (index, vehicle) in fleet.iter().enumerate() {
            if vehicle.id() != index {
                return Err(ValidationError::VehicleId {
                    index,
                    id: vehicle.id(),
                });
            }
            if vehicle.capacity() < 0 {
                return Err(ValidationError::NegativeCapacity {
                    vehicle: index,
                    capacity: vehicle.capacity(),
                });
            }
            if let Some(max) = vehicle.max_route_cost() {
                if !max.is_finite() || max < 0.0 {
                    return Err(ValidationError::InvalidMaxRouteCost {
                        vehicle: index,
                        value: max,
                    });
                }
            }
        }

        Ok(Self {
            distances,
            demands,
            fleet,
            depot,
        })
    }

    /// Number of nodes including the depot.
    pub fn num_nodes(&self) -> usize {
        self.distances.size()
    }

    /// Number of customers (nodes other than the depot).
    pub fn num_customers(&self) -> usize {
        self.num_nodes() - 1
    }

    /// Number of vehicles in the fleet.
    pub fn num_vehicles(&self) -> usize {
        self.fleet.len()
    }

    /// Depot node index.
    pub fn depot(&self) -> usize {
        self.depot
    }

    /// Customer node indices in ascending order.
    pub fn customers(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.num_nodes()).filter(move |&node| node != self.depot)
    }

    /// Travel distance from `from` to `to`.
    #[inline]
    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.distances.get(from, to)
    }

    /// Demand of `node`.
    #[inline]
    pub fn demand(&self, node: usize) -> i64 {
        self.demands[node]
    }

    /// Sum of all customer demands.
    pub fn total_demand(&self) -> i64 {
        self.demands.iter().sum()
    }

    /// The underlying distance matrix.
    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    /// The fleet, ordered by vehicle ID.
    pub fn fleet(&self) -> &[Vehicle] {
        &self.fleet
    }

    /// The vehicle with the given ID.
    pub fn vehicle(&self, id: usize) -> &Vehicle {
        &self.fleet[id]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> DistanceMatrix {
        DistanceMatrix::from_rows(vec![
            vec![0.0, 5.0, 8.0],
            vec![5.0, 0.0, 3.0],
            vec![8.0, 3.0, 0.0],
        ])
        .expect("valid")
    }

    #[test]
    fn test_valid_problem() {
        let problem = Problem::new(matrix(), vec![0, 10, 20], Vehicle::fleet(&[100]))
            .expect("valid");
        assert_eq!(problem.num_nodes(), 3);
        assert_eq!(problem.num_customers(), 2);
        assert_eq!(problem.num_vehicles(), 1);
        assert_eq!(problem.total_demand(), 30);
        assert_eq!(problem.distance(1, 2), 3.0);
        assert_eq!(problem.vehicle(0).capacity(), 100);
    }

    #[test]
    fn test_custom_depot() {
        let problem =
            Problem::with_depot(matrix(), vec![4, 0, 6], Vehicle::fleet(&[100]), 1).expect("valid");
        assert_eq!(problem.depot(), 1);
        assert_eq!(problem.customers().collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn test_unchecked_matrix_entries_rejected() {
        let mut dm = DistanceMatrix::new(3);
        dm.set(0, 1, -5.0);
        let err = Problem::new(dm.clone(), vec![0, 1, 1], Vehicle::fleet(&[10])).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidDistance { from: 0, to: 1, .. }
        ));

        dm.set(0, 1, 5.0);
        dm.set(2, 2, 7.0);
        let err = Problem::new(dm, vec![0, 1, 1], Vehicle::fleet(&[10])).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NonZeroDiagonal {
                node: 2,
                value: 7.0
            }
        );
    }

    #[test]
    fn test_demand_length_mismatch() {
        let err = Problem::new(matrix(), vec![0, 10], Vehicle::fleet(&[100])).unwrap_err();
        assert_eq!(
            err,
            ValidationError::DemandLength {
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn test_negative_demand() {
        let err = Problem::new(matrix(), vec![0, -1, 2], Vehicle::fleet(&[100])).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NegativeDemand {
                node: 1,
                demand: -1
            }
        );
    }

    #[test]
    fn test_depot_demand() {
        let err = Problem::new(matrix(), vec![3, 1, 2], Vehicle::fleet(&[100])).unwrap_err();
        assert_eq!(err, ValidationError::DepotDemand { demand: 3 });
    }

    #[test]
    fn test_empty_fleet() {
        let err = Problem::new(matrix(), vec![0, 1, 2], vec![]).unwrap_err();
        assert_eq!(err, ValidationError::EmptyFleet);
    }

    #[test]
    fn test_depot_out_of_range() {
        let err =
            Problem::with_depot(matrix(), vec![0, 1, 2], Vehicle::fleet(&[100]), 3).unwrap_err();
        assert_eq!(err, ValidationError::DepotOutOfRange { depot: 3, nodes: 3 });
    }

    #[test]
    fn test_vehicle_id_mismatch() {
        let fleet = vec![Vehicle::new(0, 10), Vehicle::new(5, 10)];
        let err = Problem::new(matrix(), vec![0, 1, 2], fleet).unwrap_err();
        assert_eq!(err, ValidationError::VehicleId { index: 1, id: 5 });
    }

    #[test]
    fn test_negative_capacity() {
        let err = Problem::new(matrix(), vec![0, 1, 2], Vehicle::fleet(&[-5])).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NegativeCapacity {
                vehicle: 0,
                capacity: -5
            }
        );
    }

    #[test]
    fn test_invalid_max_route_cost() {
        let fleet = vec![Vehicle::new(0, 10).with_max_route_cost(f64::INFINITY)];
        let err = Problem::new(matrix(), vec![0, 1, 2], fleet).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidMaxRouteCost { vehicle: 0, .. }
        ));
    }
}
