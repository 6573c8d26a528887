//! Search configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constructive::FirstSolutionStrategy;
use crate::error::ValidationError;
use crate::evaluation::{Registry, Transit, DISTANCE_DIMENSION};
use crate::models::Problem;

/// Everything that shapes a solve besides the problem itself.
///
/// Missing fields take their [`Default`] values when deserialized.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_cvrp::solver::{Metaheuristic, SearchParameters, Termination};
///
/// let params = SearchParameters {
///     metaheuristic: Metaheuristic::GuidedLocalSearch,
///     terminations: vec![Termination::Duration(Duration::from_secs(10))],
///     ..SearchParameters::default()
/// };
/// assert!(params.distance_dimension.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParameters {
    pub objective: ObjectiveKind,
    pub distance_dimension: Option<DistanceDimension>,
    pub first_solution_strategy: FirstSolutionStrategy,
    pub metaheuristic: Metaheuristic,
    pub guided_local_search: GuidedLocalSearchParams,
    pub terminations: Vec<Termination>,
    pub threads: Threads,
}

impl Default for SearchParameters {
    fn default() -> Self {
        Self {
            objective: ObjectiveKind::Distance,
            distance_dimension: None,
            first_solution_strategy: FirstSolutionStrategy::CheapestInsertion,
            metaheuristic: Metaheuristic::GreedyDescent,
            guided_local_search: GuidedLocalSearchParams::default(),
            terminations: vec![
                Termination::Duration(Duration::from_secs(10)),
                Termination::Iterations(100_000),
            ],
            threads: Threads::Single,
        }
    }
}

/// Arc cost evaluator used as the objective.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum ObjectiveKind {
    /// Raw distance.
    #[default]
    Distance,
    /// Distance times a constant, e.g. a currency per distance unit.
    ScaledDistance { factor: f64 },
    /// Distance times `rate` times the demand carried away from the arc's
    /// origin.
    DemandWeightedDistance { rate: f64 },
}

impl ObjectiveKind {
    fn transit(self) -> Transit {
        match self {
            ObjectiveKind::Distance => Transit::Distance,
            ObjectiveKind::ScaledDistance { factor } => Transit::ScaledDistance { factor },
            ObjectiveKind::DemandWeightedDistance { rate } => {
                Transit::DemandWeightedDistance { rate }
            }
        }
    }
}

/// A "Distance" dimension bounding every route's length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceDimension {
    pub max_route_distance: f64,
    pub global_span_cost_coefficient: f64,
}

impl Default for DistanceDimension {
    fn default() -> Self {
        Self {
            max_route_distance: 1000.0,
            global_span_cost_coefficient: 100.0,
        }
    }
}

/// What happens once no improving move is left.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Metaheuristic {
    /// Stop at the first local optimum.
    #[default]
    GreedyDescent,
    /// Penalize high-cost arcs and keep searching.
    GuidedLocalSearch,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuidedLocalSearchParams {
    /// λ as a fraction of the mean arc cost at the first local optimum.
    pub lambda_coefficient: f64,
    /// Penalty rounds before the search gives up.
    pub max_perturbations: usize,
}

impl Default for GuidedLocalSearchParams {
    fn default() -> Self {
        Self {
            lambda_coefficient: 0.1,
            max_perturbations: 200,
        }
    }
}

/// A stop condition; the search ends at the first one reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Termination {
    /// Wall-clock budget from the start of the solve.
    Duration(Duration),
    /// Committed moves.
    Iterations(usize),
    /// Committed moves since the best assignment last improved.
    IterationsWithoutImprovement(usize),
}

/// Worker threads used to score neighborhoods.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Threads {
    #[default]
    Single,
    Auto,
    Multi(usize),
}

impl Threads {
    pub fn number_of_threads(&self) -> usize {
        match self {
            Threads::Single => 1,
            Threads::Multi(num) => (*num).max(1),
            Threads::Auto => std::thread::available_parallelism().map_or(1, |n| n.get()),
        }
    }
}

impl<'a> Registry<'a> {
    /// Builds the registry a solve runs against: the configured objective,
    /// the "Capacity" dimension, and the optional "Distance" dimension.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_cvrp::distance::DistanceMatrix;
    /// use u_cvrp::evaluation::{Registry, CAPACITY_DIMENSION, DISTANCE_DIMENSION};
    /// use u_cvrp::models::{Problem, Vehicle};
    /// use u_cvrp::solver::{DistanceDimension, SearchParameters};
    ///
    /// let dm = DistanceMatrix::from_rows(vec![vec![0.0, 3.0], vec![3.0, 0.0]]).unwrap();
    /// let problem = Problem::new(dm, vec![0, 1], Vehicle::fleet(&[4])).unwrap();
    /// let params = SearchParameters {
    ///     distance_dimension: Some(DistanceDimension::default()),
    ///     ..SearchParameters::default()
    /// };
    ///
    /// let registry = Registry::from_parameters(&problem, &params).unwrap();
    /// assert!(registry.dimension_by_name(CAPACITY_DIMENSION).is_some());
    /// assert!(registry.dimension_by_name(DISTANCE_DIMENSION).is_some());
    /// ```
    pub fn from_parameters(
        problem: &'a Problem,
        params: &SearchParameters,
    ) -> Result<Self, ValidationError> {
        let mut registry = Registry::new(problem);
        if params.objective != ObjectiveKind::Distance {
            let objective = registry.register_transit(params.objective.transit())?;
            registry.set_arc_cost_evaluator(objective)?;
        }

        registry.add_capacity_dimension()?;

        if let Some(distance) = params.distance_dimension {
            let transit = registry.register_transit(Transit::Distance)?;
            let dimension = registry.add_dimension(
                transit,
                0.0,
                distance.max_route_distance,
                true,
                DISTANCE_DIMENSION,
            )?;
            registry.set_global_span_cost_coefficient(
                dimension,
                distance.global_span_cost_coefficient,
            )?;
        }
        Ok(registry)
    }
}
