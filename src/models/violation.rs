//! Constraint violation types.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The constraint a route broke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ViolationType {
    /// A dimension's cumulative value left `[0, capacity]`.
    DimensionExceeded {
        /// Dimension name.
        dimension: String,
        /// Visit position (0 = depot start) where the bound was broken.
        position: usize,
        /// Cumulative value at that position.
        cumul: f64,
        /// The vehicle's bound for this dimension.
        capacity: f64,
    },
    /// The route's objective arc cost exceeds the vehicle's maximum.
    MaxRouteCostExceeded {
        /// Arc cost of the route.
        cost: f64,
        /// Vehicle limit.
        max_route_cost: f64,
    },
}

impl fmt::Display for ViolationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationType::DimensionExceeded {
                dimension,
                position,
                cumul,
                capacity,
            } => write!(
                f,
                "{dimension} cumul {cumul} at position {position} exceeds bound {capacity}"
            ),
            ViolationType::MaxRouteCostExceeded {
                cost,
                max_route_cost,
            } => write!(f, "route cost {cost} exceeds maximum {max_route_cost}"),
        }
    }
}

/// A constraint violation on one vehicle's route.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("vehicle {vehicle}: {kind}")]
pub struct Violation {
    /// Vehicle whose route is infeasible.
    pub vehicle: usize,
    /// The type of violation.
    pub kind: ViolationType,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(vehicle: usize, kind: ViolationType) -> Self {
        Self { vehicle, kind }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_violation_display() {
        let v = Violation::new(
            1,
            ViolationType::DimensionExceeded {
                dimension: "Capacity".into(),
                position: 3,
                cumul: 25.0,
                capacity: 20.0,
            },
        );
        assert_eq!(
            v.to_string(),
            "vehicle 1: Capacity cumul 25 at position 3 exceeds bound 20"
        );
    }

    #[test]
    fn test_max_route_cost_display() {
        let v = Violation::new(
            0,
            ViolationType::MaxRouteCostExceeded {
                cost: 12.5,
                max_route_cost: 10.0,
            },
        );
        assert_eq!(
            v.to_string(),
            "vehicle 0: route cost 12.5 exceeds maximum 10"
        );
    }
}
