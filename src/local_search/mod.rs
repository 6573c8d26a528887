//! Local search over route assignments.
//!
//! Neighborhoods, each generating [`Move`]s for one pair of vehicles:
//!
//! - [`relocate`] — Move one customer within or across routes
//! - [`swap`] — Exchange two customers
//! - [`two_opt`] — Reverse a segment of one route
//! - [`or_opt`] — Move a chain of 2-3 customers
//! - [`exchange`] — Trade route tails (2-opt*)
//!
//! [`LocalSearch`] scores every neighbor on a snapshot, commits the best
//! one, and escapes local optima with [`ArcPenalties`] when guided local
//! search is enabled.

mod exchange;
mod guided;
mod moves;
mod or_opt;
mod relocate;
mod search;
mod swap;
mod two_opt;

pub use guided::{penalty_factor, ArcPenalties};
pub use moves::{Move, RouteChanges};
pub use search::{LocalSearch, SearchOutcome};
