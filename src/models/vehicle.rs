//! Vehicle type with capacity and route cost limit.

use serde::{Deserialize, Serialize};

/// A vehicle that starts and ends its route at the depot.
///
/// # Examples
///
/// ```
/// use u_cvrp::models::Vehicle;
///
/// let v = Vehicle::new(0, 200).with_max_route_cost(500.0);
/// assert_eq!(v.id(), 0);
/// assert_eq!(v.capacity(), 200);
/// assert_eq!(v.max_route_cost(), Some(500.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    id: usize,
    capacity: i64,
    max_route_cost: Option<f64>,
}

impl Vehicle {
    /// Creates a vehicle with the given ID and capacity and no route cost limit.
    pub fn new(id: usize, capacity: i64) -> Self {
        Self {
            id,
            capacity,
            max_route_cost: None,
        }
    }

    /// Builds a fleet from a list of capacities; vehicle IDs follow list order.
    ///
    /// ```
    /// use u_cvrp::models::Vehicle;
    ///
    /// let fleet = Vehicle::fleet(&[2000, 1139, 1000]);
    /// assert_eq!(fleet[1].id(), 1);
    /// assert_eq!(fleet[1].capacity(), 1139);
    /// ```
    pub fn fleet(capacities: &[i64]) -> Vec<Vehicle> {
        capacities
            .iter()
            .enumerate()
            .map(|(id, &capacity)| Vehicle::new(id, capacity))
            .collect()
    }

    /// Sets the maximum route cost, measured with the objective arc cost.
    pub fn with_max_route_cost(mut self, max: f64) -> Self {
        self.max_route_cost = Some(max);
        self
    }

    /// Vehicle ID (its position in the fleet).
    pub fn id(&self) -> usize {
        self.id
    }

    /// Maximum cumulative demand this vehicle can carry.
    pub fn capacity(&self) -> i64 {
        self.capacity
    }

    /// Maximum objective arc cost of this vehicle's route, if any.
    pub fn max_route_cost(&self) -> Option<f64> {
        self.max_route_cost
    }
}
