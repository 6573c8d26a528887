//! # u-cvrp
//!
//! Capacitated vehicle routing engine: a validated problem model, a registry
//! of arc costs and cumulative dimensions, constructive heuristics, and a
//! local search with guided local search escapes.
//!
//! ## Modules
//!
//! - [`models`] — Domain model types (Problem, Vehicle, Route, Solution)
//! - [`distance`] — Validated distance matrix
//! - [`evaluation`] — Cost & constraint registry (transits, dimensions, route pricing)
//! - [`assignment`] — Mutable per-vehicle route sequences with feasibility checks
//! - [`constructive`] — First solution heuristics (cheapest insertion, path cheapest arc)
//! - [`local_search`] — Neighborhood moves and the improvement loop
//! - [`solver`] — Search parameters, solve driver, and solution extraction
//! - [`error`] — Error types
//!
//! ## Example
//!
//! ```
//! use std::time::Duration;
//! use u_cvrp::distance::DistanceMatrix;
//! use u_cvrp::models::{Problem, Vehicle};
//! use u_cvrp::solver::{solve, DistanceDimension, SearchParameters, Termination};
//!
//! let dm = DistanceMatrix::from_rows(vec![
//!     vec![0.0, 2.0, 3.0, 4.0],
//!     vec![2.0, 0.0, 1.5, 3.0],
//!     vec![3.0, 1.5, 0.0, 2.0],
//!     vec![4.0, 3.0, 2.0, 0.0],
//! ])
//! .unwrap();
//! let problem = Problem::new(dm, vec![0, 1, 1, 1], Vehicle::fleet(&[10, 10])).unwrap();
//!
//! let params = SearchParameters {
//!     distance_dimension: Some(DistanceDimension::default()),
//!     terminations: vec![Termination::Duration(Duration::from_secs(1))],
//!     ..SearchParameters::default()
//! };
//! let solution = solve(&problem, &params).unwrap();
//! assert_eq!(solution.num_served(), 3);
//! for route in solution.routes() {
//!     println!("vehicle {}: {:?} cost {}", route.vehicle_id(), route.nodes(), route.cost());
//! }
//! ```

pub mod assignment;
pub mod constructive;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod local_search;
pub mod models;
pub mod solver;
