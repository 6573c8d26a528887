//! Transit functions: arc costs and dimension increments.

use std::fmt;
use std::sync::Arc;

use crate::models::Problem;

/// Caller-supplied cost of travelling `from → to`.
pub type BinaryTransitFn = Arc<dyn Fn(usize, usize) -> f64 + Send + Sync>;

/// Caller-supplied quantity consumed when leaving `from`.
pub type UnaryTransitFn = Arc<dyn Fn(usize) -> f64 + Send + Sync>;

/// Handle of a transit registered in a [`Registry`](super::Registry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransitId(pub(crate) usize);

impl TransitId {
    /// Registration order of this transit.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A function from an ordered node pair to a non-negative quantity.
///
/// Built-in variants read the [`Problem`] they are evaluated against, so no
/// lookup table has to be captured. `Binary` and `Unary` wrap caller
/// closures; they must be pure and return finite, non-negative values.
///
/// # Examples
///
/// ```
/// use u_cvrp::distance::DistanceMatrix;
/// use u_cvrp::evaluation::Transit;
/// use u_cvrp::models::{Problem, Vehicle};
///
/// let dm = DistanceMatrix::from_rows(vec![vec![0.0, 4.0], vec![4.0, 0.0]]).unwrap();
/// let problem = Problem::new(dm, vec![0, 3], Vehicle::fleet(&[10])).unwrap();
///
/// let shaped = Transit::DemandWeightedDistance { rate: 1.5 };
/// assert_eq!(shaped.evaluate(&problem, 1, 0), 4.0 * 1.5 * 3.0);
/// assert_eq!(Transit::Demand.evaluate(&problem, 0, 1), 0.0);
///
/// let flat = Transit::binary(|_, _| 2.0);
/// assert_eq!(flat.evaluate(&problem, 0, 1), 2.0);
/// ```
#[derive(Clone)]
pub enum Transit {
    /// Distance matrix entry.
    Distance,
    /// Distance matrix entry times `factor`.
    ScaledDistance { factor: f64 },
    /// Distance times `rate` times the demand of the arc's origin.
    DemandWeightedDistance { rate: f64 },
    /// Demand of the arc's origin.
    Demand,
    /// Caller closure over both endpoints.
    Binary(BinaryTransitFn),
    /// Caller closure over the origin only.
    Unary(UnaryTransitFn),
}

impl Transit {
    /// Wraps a closure over both arc endpoints.
    pub fn binary(f: impl Fn(usize, usize) -> f64 + Send + Sync + 'static) -> Self {
        Transit::Binary(Arc::new(f))
    }

    /// Wraps a closure over the arc's origin.
    pub fn unary(f: impl Fn(usize) -> f64 + Send + Sync + 'static) -> Self {
        Transit::Unary(Arc::new(f))
    }

    /// Returns `true` if the value depends only on the arc's origin.
    pub fn is_unary(&self) -> bool {
        matches!(self, Transit::Demand | Transit::Unary(_))
    }

    /// Evaluates the transit of arc `from → to`.
    #[inline]
    pub fn evaluate(&self, problem: &Problem, from: usize, to: usize) -> f64 {
        let value = self.value(problem, from, to);
        debug_assert!(
            value.is_finite() && value >= 0.0,
            "transit {from} -> {to} returned {value}"
        );
        value
    }

    /// Unchecked value of arc `from → to`.
    pub(crate) fn value(&self, problem: &Problem, from: usize, to: usize) -> f64 {
        match self {
            Transit::Distance => problem.distance(from, to),
            Transit::ScaledDistance { factor } => problem.distance(from, to) * factor,
            Transit::DemandWeightedDistance { rate } => {
                problem.distance(from, to) * rate * problem.demand(from) as f64
            }
            Transit::Demand => problem.demand(from) as f64,
            Transit::Binary(f) => f(from, to),
            Transit::Unary(f) => f(from),
        }
    }

    /// Scaling parameter of a built-in variant, if it has one.
    pub(crate) fn coefficient(&self) -> Option<f64> {
        match self {
            Transit::ScaledDistance { factor } => Some(*factor),
            Transit::DemandWeightedDistance { rate } => Some(*rate),
            _ => None,
        }
    }
}

impl fmt::Debug for Transit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transit::Distance => f.write_str("Distance"),
            Transit::ScaledDistance { factor } => f
                .debug_struct("ScaledDistance")
                .field("factor", factor)
                .finish(),
            Transit::DemandWeightedDistance { rate } => f
                .debug_struct("DemandWeightedDistance")
                .field("rate", rate)
                .finish(),
            Transit::Demand => f.write_str("Demand"),
            Transit::Binary(_) => f.write_str("Binary(..)"),
            Transit::Unary(_) => f.write_str("Unary(..)"),
        }
    }
}
