//! Best-improvement local search with optional guided perturbation.

use std::time::Instant;

use rayon::prelude::*;
use smallvec::SmallVec;
use tracing::{debug, instrument};

use super::guided::{penalty_factor, ArcPenalties};
use super::{exchange, or_opt, relocate, swap, two_opt, Move};
use crate::assignment::RouteAssignment;
use crate::error::{AssignmentError, RoutingError};
use crate::evaluation::{Registry, RouteMetrics};
use crate::models::SearchStatistics;
use crate::solver::{Metaheuristic, SearchParameters, Termination};

/// Smallest augmented cost decrease accepted as an improvement.
const IMPROVEMENT_EPSILON: f64 = 1e-9;

/// End cumuls kept per dimension to price global spans incrementally. A
/// move touches at most two vehicles, so the third largest is always
/// enough.
const TOP_ENDS: usize = 3;

/// Result of an improvement run.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Best assignment seen, by true cost.
    pub best: RouteAssignment,
    pub best_cost: f64,
    pub statistics: SearchStatistics,
}

/// Improves a feasible assignment move by move.
///
/// Every iteration scores the whole neighborhood of the current
/// assignment, one rayon task per vehicle pair, and commits the single
/// best move. Ties go to the earliest pair and, within a pair, to the
/// first generated move, so the result does not depend on the number of
/// threads.
///
/// # Examples
///
/// ```
/// use std::time::Instant;
/// use u_cvrp::constructive::FirstSolutionStrategy;
/// use u_cvrp::distance::DistanceMatrix;
/// use u_cvrp::evaluation::Registry;
/// use u_cvrp::local_search::LocalSearch;
/// use u_cvrp::models::{Problem, Vehicle};
/// use u_cvrp::solver::SearchParameters;
///
/// let dm = DistanceMatrix::from_rows(vec![
///     vec![0.0, 1.0, 2.0, 3.0],
///     vec![1.0, 0.0, 1.0, 2.0],
///     vec![2.0, 1.0, 0.0, 1.0],
///     vec![3.0, 2.0, 1.0, 0.0],
/// ]).unwrap();
/// let problem = Problem::new(dm, vec![0, 1, 1, 1], Vehicle::fleet(&[3, 3])).unwrap();
/// let params = SearchParameters::default();
/// let registry = Registry::from_parameters(&problem, &params).unwrap();
///
/// let initial = FirstSolutionStrategy::CheapestInsertion.construct(&registry).unwrap();
/// let outcome = LocalSearch::new(&registry, &params).unwrap()
///     .run(initial, Instant::now())
///     .unwrap();
/// assert_eq!(outcome.best_cost, 6.0);
/// ```
pub struct LocalSearch<'r, 'a> {
    registry: &'r Registry<'a>,
    params: &'r SearchParameters,
    pool: rayon::ThreadPool,
    pairs: Vec<(usize, usize)>,
}

impl<'r, 'a> LocalSearch<'r, 'a> {
    pub fn new(
        registry: &'r Registry<'a>,
        params: &'r SearchParameters,
    ) -> Result<Self, RoutingError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(params.threads.number_of_threads())
            .build()?;
        let vehicles = registry.problem().num_vehicles();
        let pairs = (0..vehicles)
            .flat_map(|r1| (r1..vehicles).map(move |r2| (r1, r2)))
            .collect();
        Ok(Self {
            registry,
            params,
            pool,
            pairs,
        })
    }

    /// Runs until a termination condition holds or no move improves the
    /// (augmented) cost and perturbation is exhausted.
    ///
    /// `started` is the instant the solve began; duration budgets count
    /// from there.
    #[instrument(skip_all, level = "debug")]
    pub fn run(
        &self,
        initial: RouteAssignment,
        started: Instant,
    ) -> Result<SearchOutcome, RoutingError> {
        let registry = self.registry;
        let gls = self.params.guided_local_search;
        let guided = self.params.metaheuristic == Metaheuristic::GuidedLocalSearch;

        let mut current = initial;
        let mut best_cost = current.cost(registry).map_err(AssignmentError::Rejected)?;
        let mut best = current.clone();
        let mut statistics = SearchStatistics {
            construction_cost: best_cost,
            ..SearchStatistics::default()
        };

        let mut penalties = ArcPenalties::new(registry.problem().num_nodes());
        let mut lambda = None;
        let mut since_improvement = 0;

        while !self.should_stop(started, statistics.iterations, since_improvement) {
            let candidate = {
                let snapshot =
                    Snapshot::new(registry, &current, &penalties, lambda.unwrap_or(0.0))?;
                self.best_move(&snapshot)
            };

            let Some((_, mv)) = candidate else {
                if !guided || statistics.perturbations >= gls.max_perturbations {
                    break;
                }
                let factor = *lambda.get_or_insert_with(|| {
                    penalty_factor(registry, &current, gls.lambda_coefficient)
                });
                let penalized = penalties.penalize(registry, &current);
                statistics.perturbations += 1;
                debug!(
                    perturbation = statistics.perturbations,
                    penalized,
                    lambda = factor,
                    "local optimum, penalizing arcs"
                );
                if penalized == 0 || factor == 0.0 {
                    break;
                }
                continue;
            };

            let changes = mv.apply(current.routes());
            current.commit(registry, changes.into_vec())?;
            statistics.iterations += 1;

            let cost = current.cost(registry).map_err(AssignmentError::Rejected)?;
            if cost < best_cost - IMPROVEMENT_EPSILON {
                best_cost = cost;
                best = current.clone();
                statistics.improvements += 1;
                since_improvement = 0;
                debug!(
                    iteration = statistics.iterations,
                    operator = mv.name(),
                    cost,
                    "new best assignment"
                );
            } else {
                since_improvement += 1;
            }
        }

        Ok(SearchOutcome {
            best,
            best_cost,
            statistics,
        })
    }

    fn should_stop(&self, started: Instant, iterations: usize, since_improvement: usize) -> bool {
        self.params.terminations.iter().any(|termination| match termination {
            Termination::Duration(budget) => started.elapsed() >= *budget,
            Termination::Iterations(max) => iterations >= *max,
            Termination::IterationsWithoutImprovement(max) => since_improvement >= *max,
        })
    }

    /// Best improving move over every vehicle pair.
    fn best_move(&self, snapshot: &Snapshot<'_, '_, '_>) -> Option<(f64, Move)> {
        let per_pair: Vec<Option<(f64, Move)>> = self.pool.install(|| {
            self.pairs
                .par_iter()
                .map(|&pair| snapshot.best_move(pair))
                .collect()
        });
        per_pair
            .into_iter()
            .flatten()
            .fold(None, |best: Option<(f64, Move)>, candidate| match best {
                Some((delta, _)) if delta <= candidate.0 => best,
                _ => Some(candidate),
            })
    }
}

/// Read-only view of the current assignment shared by the scoring workers.
struct Snapshot<'s, 'r, 'a> {
    registry: &'r Registry<'a>,
    routes: &'s [Vec<usize>],
    metrics: Vec<RouteMetrics>,
    penalties: &'s ArcPenalties,
    route_penalties: Vec<f64>,
    lambda: f64,
    /// Per dimension with a global span coefficient: the largest end cumuls
    /// as `(cumul, vehicle)`, descending.
    top_ends: Vec<SmallVec<[(f64, usize); TOP_ENDS]>>,
    global_span_cost: f64,
}

impl<'s, 'r, 'a> Snapshot<'s, 'r, 'a> {
    fn new(
        registry: &'r Registry<'a>,
        assignment: &'s RouteAssignment,
        penalties: &'s ArcPenalties,
        lambda: f64,
    ) -> Result<Self, AssignmentError> {
        let metrics = assignment
            .metrics(registry)
            .map_err(AssignmentError::Rejected)?;
        let depot = registry.problem().depot();
        let route_penalties = if lambda > 0.0 {
            assignment
                .routes()
                .iter()
                .map(|route| penalties.route_penalty(depot, route))
                .collect()
        } else {
            vec![0.0; metrics.len()]
        };

        let top_ends = registry
            .dimensions()
            .iter()
            .enumerate()
            .map(|(d, dimension)| {
                if dimension.global_span_cost_coefficient() == 0.0 {
                    return SmallVec::new();
                }
                let mut ends: Vec<(f64, usize)> = metrics
                    .iter()
                    .enumerate()
                    .map(|(vehicle, m)| (m.dimensions[d].end, vehicle))
                    .collect();
                ends.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));
                ends.into_iter().take(TOP_ENDS).collect()
            })
            .collect();
        let global_span_cost = registry.global_span_cost(&metrics);

        Ok(Self {
            registry,
            routes: assignment.routes(),
            metrics,
            penalties,
            route_penalties,
            lambda,
            top_ends,
            global_span_cost,
        })
    }

    fn best_move(&self, pair: (usize, usize)) -> Option<(f64, Move)> {
        let mut best: Option<(f64, Move)> = None;
        let mut consider = |mv: Move| {
            let Some(delta) = self.delta(&mv) else {
                return;
            };
            if delta < -IMPROVEMENT_EPSILON && best.as_ref().map_or(true, |(b, _)| delta < *b) {
                best = Some((delta, mv));
            }
        };
        relocate::generate(self.routes, pair, &mut consider);
        swap::generate(self.routes, pair, &mut consider);
        two_opt::generate(self.routes, pair, &mut consider);
        or_opt::generate(self.routes, pair, &mut consider);
        exchange::generate(self.routes, pair, &mut consider);
        best
    }

    /// Augmented cost change of `mv`, or `None` if it breaks a bound.
    fn delta(&self, mv: &Move) -> Option<f64> {
        let depot = self.registry.problem().depot();
        let mut delta = 0.0;
        let mut touched: SmallVec<[(usize, RouteMetrics); 2]> = SmallVec::new();
        for (vehicle, route) in mv.apply(self.routes) {
            let metrics = self.registry.evaluate_route(vehicle, &route).ok()?;
            delta += metrics.cost() - self.metrics[vehicle].cost();
            if self.lambda > 0.0 {
                delta += self.lambda
                    * (self.penalties.route_penalty(depot, &route) - self.route_penalties[vehicle]);
            }
            touched.push((vehicle, metrics));
        }
        let span_delta = self.global_span_cost_with(&touched) - self.global_span_cost;
        Some(delta + span_delta)
    }

    /// Global span cost once `touched` routes replace their current versions.
    ///
    /// Start cumuls are always zero, so each term is the coefficient times
    /// the largest end cumul.
    fn global_span_cost_with(&self, touched: &[(usize, RouteMetrics)]) -> f64 {
        self.registry
            .dimensions()
            .iter()
            .zip(&self.top_ends)
            .enumerate()
            .filter(|(_, (dimension, _))| dimension.global_span_cost_coefficient() > 0.0)
            .map(|(d, (dimension, top))| {
                let untouched = top
                    .iter()
                    .find(|(_, vehicle)| touched.iter().all(|(t, _)| t != vehicle))
                    .map_or(0.0, |&(end, _)| end);
                let max_end = touched
                    .iter()
                    .map(|(_, m)| m.dimensions[d].end)
                    .fold(untouched, f64::max);
                dimension.global_span_cost_coefficient() * max_end
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::distance::DistanceMatrix;
    use crate::models::{Problem, Vehicle};
    use crate::solver::{DistanceDimension, GuidedLocalSearchParams, Threads};

    fn line_problem(capacities: &[i64]) -> Problem {
        let n = 5;
        let rows = (0..n)
            .map(|i| (0..n).map(|j| (i as f64 - j as f64).abs()).collect())
            .collect();
        let dm = DistanceMatrix::from_rows(rows).expect("valid");
        Problem::new(dm, vec![0, 1, 1, 1, 1], Vehicle::fleet(capacities)).expect("valid")
    }

    fn run(
        problem: &Problem,
        params: &SearchParameters,
        initial: Vec<Vec<usize>>,
    ) -> SearchOutcome {
        let registry = Registry::from_parameters(problem, params).expect("valid");
        let mut assignment = RouteAssignment::new(problem);
        let changes = initial.into_iter().enumerate().collect();
        assignment.commit(&registry, changes).expect("feasible");
        LocalSearch::new(&registry, params)
            .expect("pool")
            .run(assignment, Instant::now())
            .expect("search")
    }

    #[test]
    fn test_untangles_route() {
        let p = line_problem(&[10]);
        let outcome = run(&p, &SearchParameters::default(), vec![vec![3, 1, 4, 2]]);
        // Any order that sweeps out and back once is optimal on a line.
        assert_eq!(outcome.best_cost, 8.0);
        assert_eq!(outcome.statistics.construction_cost, 12.0);
        assert!(outcome.statistics.improvements >= 1);
    }

    #[test]
    fn test_merges_routes_when_cheaper() {
        let p = line_problem(&[10, 10]);
        let params = SearchParameters::default();
        let outcome = run(&p, &params, vec![vec![1, 2], vec![3, 4]]);
        assert_eq!(outcome.best_cost, 8.0);
        assert!(outcome.best.is_complete());
    }

    #[test]
    fn test_respects_capacity() {
        let p = line_problem(&[2, 2]);
        let params = SearchParameters::default();
        let outcome = run(&p, &params, vec![vec![1, 4], vec![2, 3]]);
        assert_eq!(outcome.best_cost, 12.0);
        for route in outcome.best.routes() {
            assert!(route.len() <= 2);
        }
    }

    #[test]
    fn test_global_span_balances_routes() {
        let dm = DistanceMatrix::from_rows(vec![
            vec![0.0, 10.0, 10.0],
            vec![10.0, 0.0, 2.0],
            vec![10.0, 2.0, 0.0],
        ])
        .expect("valid");
        let p = Problem::new(dm, vec![0, 1, 1], Vehicle::fleet(&[10, 10])).expect("valid");
        let params = SearchParameters {
            distance_dimension: Some(DistanceDimension {
                max_route_distance: 1000.0,
                global_span_cost_coefficient: 100.0,
            }),
            ..SearchParameters::default()
        };
        let outcome = run(&p, &params, vec![vec![1, 2], vec![]]);
        assert_eq!(outcome.best_cost, 2040.0);
        assert!(outcome.best.routes().iter().all(|r| r.len() == 1));
    }

    #[test]
    fn test_iteration_cap() {
        let p = line_problem(&[10]);
        let params = SearchParameters {
            terminations: vec![Termination::Iterations(0)],
            ..SearchParameters::default()
        };
        let outcome = run(&p, &params, vec![vec![3, 1, 4, 2]]);
        assert_eq!(outcome.statistics.iterations, 0);
        assert_eq!(outcome.best_cost, 12.0);
    }

    #[test]
    fn test_zero_duration_returns_initial() {
        let p = line_problem(&[10]);
        let params = SearchParameters {
            terminations: vec![Termination::Duration(Duration::ZERO)],
            ..SearchParameters::default()
        };
        let outcome = run(&p, &params, vec![vec![3, 1, 4, 2]]);
        assert_eq!(outcome.best.route(0), &[3, 1, 4, 2]);
    }

    #[test]
    fn test_guided_keeps_best() {
        let p = line_problem(&[2, 2, 2]);
        let params = SearchParameters {
            metaheuristic: Metaheuristic::GuidedLocalSearch,
            guided_local_search: GuidedLocalSearchParams {
                lambda_coefficient: 0.5,
                max_perturbations: 25,
            },
            terminations: vec![Termination::Iterations(500)],
            ..SearchParameters::default()
        };
        let outcome = run(&p, &params, vec![vec![1, 4], vec![2, 3], vec![]]);
        assert_eq!(outcome.best_cost, 12.0);
        assert!(outcome.statistics.perturbations > 0);
        let registry = Registry::from_parameters(&p, &params).expect("valid");
        let recomputed = outcome.best.cost(&registry).expect("feasible");
        assert_eq!(recomputed, outcome.best_cost);
    }

    #[test]
    fn test_thread_count_does_not_change_result() {
        let dm = DistanceMatrix::from_rows(vec![
            vec![0.0, 4.0, 6.0, 5.0, 7.0, 3.0],
            vec![4.0, 0.0, 3.0, 6.0, 8.0, 5.0],
            vec![6.0, 3.0, 0.0, 4.0, 5.0, 7.0],
            vec![5.0, 6.0, 4.0, 0.0, 2.0, 6.0],
            vec![7.0, 8.0, 5.0, 2.0, 0.0, 6.0],
            vec![3.0, 5.0, 7.0, 6.0, 6.0, 0.0],
        ])
        .expect("valid");
        let p = Problem::new(dm, vec![0, 2, 3, 1, 2, 3], Vehicle::fleet(&[5, 5, 6]))
            .expect("valid");
        let initial = vec![vec![1, 2], vec![3, 4], vec![5]];

        let single = run(&p, &SearchParameters::default(), initial.clone());
        let multi = run(
            &p,
            &SearchParameters {
                threads: Threads::Multi(4),
                ..SearchParameters::default()
            },
            initial,
        );
        assert_eq!(single.best, multi.best);
        assert_eq!(single.best_cost, multi.best_cost);
    }
}
