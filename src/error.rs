//! Error types for model validation, construction, and route mutation.

use thiserror::Error;

use crate::models::Violation;

/// Malformed problem input or registry configuration.
///
/// Raised immediately when a [`Problem`](crate::models::Problem) or a
/// [`Registry`](crate::evaluation::Registry) is built; never retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("distance matrix has no rows")]
    EmptyMatrix,
    #[error("distance matrix row {row} has {found} entries, expected {expected}")]
    RaggedMatrix {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("distance matrix of size {size} holds {found} entries")]
    MatrixSize { size: usize, found: usize },
    #[error("distance {from} -> {to} is {value}, expected a finite non-negative value")]
    InvalidDistance { from: usize, to: usize, value: f64 },
    #[error("distance from node {node} to itself is {value}, expected 0")]
    NonZeroDiagonal { node: usize, value: f64 },
    #[error("demand vector has {found} entries, expected {expected}")]
    DemandLength { expected: usize, found: usize },
    #[error("node {node} has negative demand {demand}")]
    NegativeDemand { node: usize, demand: i64 },
    #[error("depot demand must be 0, got {demand}")]
    DepotDemand { demand: i64 },
    #[error("fleet is empty")]
    EmptyFleet,
    #[error("depot index {depot} is out of range for {nodes} nodes")]
    DepotOutOfRange { depot: usize, nodes: usize },
    #[error("vehicle at fleet position {index} has id {id}")]
    VehicleId { index: usize, id: usize },
    #[error("vehicle {vehicle} has negative capacity {capacity}")]
    NegativeCapacity { vehicle: usize, capacity: i64 },
    #[error("vehicle {vehicle} has invalid max route cost {value}")]
    InvalidMaxRouteCost { vehicle: usize, value: f64 },
    #[error("transit {from} -> {to} returned {value}, expected a finite non-negative value")]
    InvalidTransitValue { from: usize, to: usize, value: f64 },
    #[error("transit {0} is not registered")]
    UnknownTransit(usize),
    #[error("dimension {0} is not registered")]
    UnknownDimension(usize),
    #[error("dimension {0:?} is already registered")]
    DuplicateDimension(String),
    #[error("dimension needs {expected} vehicle capacities, got {found}")]
    CapacityCount { expected: usize, found: usize },
    #[error("dimension {name:?} has invalid bound {value}")]
    InvalidDimensionBound { name: String, value: f64 },
    #[error("invalid cost coefficient {0}")]
    InvalidCoefficient(f64),
}

/// No assignment respecting every dimension bound could be constructed.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("no feasible assignment: {} customer(s) could not be routed: {unrouted:?}", unrouted.len())]
pub struct InfeasibleError {
    /// Customers left without a feasible insertion point, ascending.
    pub unrouted: Vec<usize>,
}

/// Misuse of a [`RouteAssignment`](crate::assignment::RouteAssignment) or
/// a mutation rejected by a constraint.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssignmentError {
    #[error("node {0} does not exist")]
    UnknownNode(usize),
    #[error("the depot cannot be routed as a customer")]
    DepotNotRoutable,
    #[error("node {0} is already routed")]
    AlreadyRouted(usize),
    #[error("node {0} is not routed")]
    NotRouted(usize),
    #[error("vehicle {0} does not exist")]
    UnknownVehicle(usize),
    #[error("position {position} is out of range for vehicle {vehicle} with {len} visits")]
    PositionOutOfRange {
        vehicle: usize,
        position: usize,
        len: usize,
    },
    #[error("mutation rejected: {0}")]
    Rejected(Violation),
}

/// Top-level error returned by the solver.
#[derive(Debug, Error)]
pub enum RoutingError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Infeasible(#[from] InfeasibleError),
    #[error(transparent)]
    Assignment(#[from] AssignmentError),
    #[error("failed to build search thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infeasible_message_lists_nodes() {
        let err = InfeasibleError {
            unrouted: vec![3, 5],
        };
        assert_eq!(
            err.to_string(),
            "no feasible assignment: 2 customer(s) could not be routed: [3, 5]"
        );
    }

    #[test]
    fn test_routing_error_from_validation() {
        let err: RoutingError = ValidationError::EmptyFleet.into();
        assert!(matches!(
            err,
            RoutingError::Validation(ValidationError::EmptyFleet)
        ));
        assert_eq!(err.to_string(), "fleet is empty");
    }
}
