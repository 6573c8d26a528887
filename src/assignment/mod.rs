//! Route assignment state.
//!
//! The mutable structure searched over: one customer sequence per vehicle,
//! with the depot implicit at both ends. Every mutation re-validates the
//! affected routes against the registry before it is committed.

mod route_assignment;

pub use route_assignment::{RouteAssignment, RouteView};
