//! Cumulative dimensions tracked along routes.

use super::TransitId;

/// Handle of a dimension registered in a [`Registry`](super::Registry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DimensionId(pub(crate) usize);

impl DimensionId {
    /// Registration order of this dimension.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A named quantity accumulated along each route.
///
/// The value starts at zero at the depot and grows by the transit of every
/// traversed arc. At each stop of vehicle `v` it must lie in
/// `[0, capacity(v)]`.
#[derive(Debug, Clone)]
pub struct Dimension {
    name: String,
    transit: TransitId,
    slack_max: f64,
    capacities: Vec<f64>,
    fix_start_cumul_to_zero: bool,
    span_cost_coefficient: f64,
    global_span_cost_coefficient: f64,
}

impl Dimension {
    pub(crate) fn new(
        name: String,
        transit: TransitId,
        slack_max: f64,
        capacities: Vec<f64>,
        fix_start_cumul_to_zero: bool,
    ) -> Self {
        Self {
            name,
            transit,
            slack_max,
            capacities,
            fix_start_cumul_to_zero,
            span_cost_coefficient: 0.0,
            global_span_cost_coefficient: 0.0,
        }
    }

    /// Dimension name, unique within its registry.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Transit accumulated on each arc.
    pub fn transit(&self) -> TransitId {
        self.transit
    }

    /// Maximum waiting slack per stop. Cumuls advance by exactly the transit.
    pub fn slack_max(&self) -> f64 {
        self.slack_max
    }

    /// Upper bound of the cumul for vehicle `vehicle`.
    #[inline]
    pub fn capacity(&self, vehicle: usize) -> f64 {
        self.capacities[vehicle]
    }

    /// Per-vehicle upper bounds.
    pub fn capacities(&self) -> &[f64] {
        &self.capacities
    }

    /// Whether the cumul is pinned to zero at each vehicle's start.
    pub fn fix_start_cumul_to_zero(&self) -> bool {
        self.fix_start_cumul_to_zero
    }

    /// Weight of `max cumul − min cumul` on each vehicle's own route.
    pub fn span_cost_coefficient(&self) -> f64 {
        self.span_cost_coefficient
    }

    /// Weight of `max end cumul − min start cumul` across all vehicles.
    pub fn global_span_cost_coefficient(&self) -> f64 {
        self.global_span_cost_coefficient
    }

    pub(crate) fn set_span_cost_coefficient(&mut self, coefficient: f64) {
        self.span_cost_coefficient = coefficient;
    }

    pub(crate) fn set_global_span_cost_coefficient(&mut self, coefficient: f64) {
        self.global_span_cost_coefficient = coefficient;
    }
}

/// Extremes of one dimension's cumul along one route.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DimensionSummary {
    /// Cumul at the depot start.
    pub start: f64,
    /// Cumul back at the depot.
    pub end: f64,
    /// Smallest cumul along the route.
    pub min: f64,
    /// Largest cumul along the route.
    pub max: f64,
}

impl DimensionSummary {
    /// `max − min`.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub(crate) fn record(&mut self, cumul: f64) {
        self.min = self.min.min(cumul);
        self.max = self.max.max(cumul);
        self.end = cumul;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_accessors() {
        let mut dim = Dimension::new("Capacity".into(), TransitId(1), 0.0, vec![10.0, 20.0], true);
        dim.set_global_span_cost_coefficient(100.0);
        assert_eq!(dim.name(), "Capacity");
        assert_eq!(dim.transit(), TransitId(1));
        assert_eq!(dim.capacity(1), 20.0);
        assert!(dim.fix_start_cumul_to_zero());
        assert_eq!(dim.span_cost_coefficient(), 0.0);
        assert_eq!(dim.global_span_cost_coefficient(), 100.0);
    }

    #[test]
    fn test_summary_span() {
        let mut summary = DimensionSummary::default();
        for cumul in [3.0, 7.0, 12.0] {
            summary.record(cumul);
        }
        assert_eq!(summary.start, 0.0);
        assert_eq!(summary.end, 12.0);
        assert_eq!(summary.span(), 12.0);
    }
}
