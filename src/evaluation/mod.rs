//! Cost and constraint registry.
//!
//! - [`Transit`] — arc cost and dimension increment functions
//! - [`Dimension`] — cumulative quantities with per-vehicle bounds and span costs
//! - [`Registry`] — typed handles to registered transits and dimensions
//! - [`RouteEvaluator`] — route feasibility checking and pricing

mod dimension;
mod evaluator;
mod registry;
mod transit;

pub use dimension::{Dimension, DimensionId, DimensionSummary};
pub use evaluator::{RouteEvaluator, RouteMetrics, FEASIBILITY_TOLERANCE};
pub use registry::{Registry, CAPACITY_DIMENSION, DISTANCE_DIMENSION};
pub use transit::{BinaryTransitFn, Transit, TransitId, UnaryTransitFn};

pub use crate::models::{Violation, ViolationType};
