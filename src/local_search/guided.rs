//! Guided local search penalties.
//!
//! Features are the arcs `from → to` used by the routes. At a local optimum
//! the arcs of highest utility
//!
//! ```text
//! utility(a) = arc_cost(a) / (1 + penalty(a))
//! ```
//!
//! have their penalty raised by one, and the search continues on the
//! augmented objective `cost + λ × Σ penalty(a)` over every used arc.
//!
//! # Reference
//!
//! Voudouris, C. & Tsang, E. (1999). "Guided local search and its application
//! to the traveling salesman problem", *European Journal of Operational
//! Research* 113(2), 469-499.

use crate::assignment::RouteAssignment;
use crate::evaluation::{Registry, FEASIBILITY_TOLERANCE};

/// Dense `n × n` arc penalty counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArcPenalties {
    counts: Vec<u32>,
    size: usize,
}

impl ArcPenalties {
    /// All-zero penalties for `size` nodes.
    pub fn new(size: usize) -> Self {
        Self {
            counts: vec![0; size * size],
            size,
        }
    }

    /// Penalty of arc `from → to`.
    #[inline]
    pub fn get(&self, from: usize, to: usize) -> u32 {
        debug_assert!(from < self.size && to < self.size);
        self.counts[from * self.size + to]
    }

    /// Raises the penalty of arc `from → to` by one, saturating.
    #[inline]
    pub fn increment(&mut self, from: usize, to: usize) {
        let count = &mut self.counts[from * self.size + to];
        *count = count.saturating_add(1);
    }

    /// Sum of penalties along `depot → customers… → depot`.
    pub fn route_penalty(&self, depot: usize, customers: &[usize]) -> f64 {
        arcs(depot, customers)
            .map(|(from, to)| f64::from(self.get(from, to)))
            .sum()
    }

    /// Penalizes every maximum-utility arc of `assignment`.
    ///
    /// Returns the number of arcs penalized (zero only when every route is
    /// empty).
    pub fn penalize(&mut self, registry: &Registry<'_>, assignment: &RouteAssignment) -> usize {
        let depot = registry.problem().depot();
        let utility = |penalties: &Self, from: usize, to: usize| {
            registry.arc_cost(from, to) / (1.0 + f64::from(penalties.get(from, to)))
        };

        let used = || assignment.routes().iter().flat_map(|route| arcs(depot, route));
        let Some(max_utility) = used()
            .map(|(from, to)| utility(self, from, to))
            .reduce(f64::max)
        else {
            return 0;
        };

        let targets: Vec<(usize, usize)> = used()
            .filter(|&(from, to)| utility(self, from, to) >= max_utility - FEASIBILITY_TOLERANCE)
            .collect();
        for &(from, to) in &targets {
            self.increment(from, to);
        }
        targets.len()
    }
}

/// Penalty weight λ derived from a local optimum: `coefficient` times the
/// average objective cost of the arcs in use.
pub fn penalty_factor(
    registry: &Registry<'_>,
    assignment: &RouteAssignment,
    coefficient: f64,
) -> f64 {
    let depot = registry.problem().depot();
    let (total, count) = assignment
        .routes()
        .iter()
        .flat_map(|route| arcs(depot, route))
        .fold((0.0, 0usize), |(total, count), (from, to)| {
            (total + registry.arc_cost(from, to), count + 1)
        });
    if count == 0 {
        0.0
    } else {
        coefficient * total / count as f64
    }
}

/// Arcs of a non-empty route, depot legs included.
fn arcs(depot: usize, customers: &[usize]) -> impl Iterator<Item = (usize, usize)> + '_ {
    let (first, last) = match (customers.first(), customers.last()) {
        (Some(&first), Some(&last)) => (Some((depot, first)), Some((last, depot))),
        _ => (None, None),
    };
    first
        .into_iter()
        .chain(customers.windows(2).map(|pair| (pair[0], pair[1])))
        .chain(last)
}
