//! Solve driver: construction, improvement, extraction.

use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{extract_solution, SearchParameters};
use crate::error::RoutingError;
use crate::evaluation::Registry;
use crate::local_search::LocalSearch;
use crate::models::{Problem, Solution};

/// Lifecycle of a solve.
///
/// `Unsolved → Constructing → Improving → Solved`, or
/// `Constructing → Infeasible` when no feasible assignment can be built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveStatus {
    Unsolved,
    Constructing,
    Improving,
    Solved,
    Infeasible,
}

impl SolveStatus {
    /// Returns `true` for `Solved` and `Infeasible`.
    pub fn is_terminal(self) -> bool {
        matches!(self, SolveStatus::Solved | SolveStatus::Infeasible)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SolveStatus::Unsolved => "unsolved",
            SolveStatus::Constructing => "constructing",
            SolveStatus::Improving => "improving",
            SolveStatus::Solved => "solved",
            SolveStatus::Infeasible => "infeasible",
        };
        f.write_str(name)
    }
}

/// Runs one problem through construction, local search, and extraction.
///
/// # Examples
///
/// ```
/// use u_cvrp::distance::DistanceMatrix;
/// use u_cvrp::models::{Problem, Vehicle};
/// use u_cvrp::solver::{SearchParameters, SolveStatus, Solver};
///
/// let dm = DistanceMatrix::from_rows(vec![vec![0.0, 7.0], vec![7.0, 0.0]]).unwrap();
/// let problem = Problem::new(dm, vec![0, 5], Vehicle::fleet(&[10])).unwrap();
///
/// let mut solver = Solver::new(&problem, SearchParameters::default());
/// assert_eq!(solver.status(), SolveStatus::Unsolved);
///
/// let solution = solver.solve().unwrap();
/// assert_eq!(solver.status(), SolveStatus::Solved);
/// assert_eq!(solution.routes()[0].nodes(), vec![0, 1, 0]);
/// assert_eq!(solution.total_cost(), 14.0);
/// ```
#[derive(Debug)]
pub struct Solver<'a> {
    problem: &'a Problem,
    params: SearchParameters,
    status: SolveStatus,
}

impl<'a> Solver<'a> {
    pub fn new(problem: &'a Problem, params: SearchParameters) -> Self {
        Self {
            problem,
            params,
            status: SolveStatus::Unsolved,
        }
    }

    pub fn status(&self) -> SolveStatus {
        self.status
    }

    pub fn params(&self) -> &SearchParameters {
        &self.params
    }

    /// Solves the problem, returning the best feasible solution found
    /// within the configured terminations.
    ///
    /// Configuration errors leave the status at `Unsolved`; a construction
    /// that cannot route every customer ends in `Infeasible` with
    /// [`RoutingError::Infeasible`]. Calling `solve` again starts over.
    pub fn solve(&mut self) -> Result<Solution, RoutingError> {
        let started = Instant::now();
        self.status = SolveStatus::Unsolved;
        info!(
            customers = self.problem.num_customers(),
            vehicles = self.problem.num_vehicles(),
            "solve started"
        );

        let registry = Registry::from_parameters(self.problem, &self.params)?;

        self.transition(SolveStatus::Constructing);
        let initial = match self.params.first_solution_strategy.construct(&registry) {
            Ok(assignment) => assignment,
            Err(err) => {
                if let RoutingError::Infeasible(infeasible) = &err {
                    warn!(unrouted = ?infeasible.unrouted, "no feasible first solution");
                    self.transition(SolveStatus::Infeasible);
                }
                return Err(err);
            }
        };

        self.transition(SolveStatus::Improving);
        let outcome = LocalSearch::new(&registry, &self.params)?.run(initial, started)?;

        let mut statistics = outcome.statistics;
        statistics.elapsed = started.elapsed();
        let solution = extract_solution(&registry, &outcome.best, statistics)?;
        self.transition(SolveStatus::Solved);

        info!(
            cost = solution.total_cost(),
            construction_cost = solution.statistics().construction_cost,
            iterations = solution.statistics().iterations,
            vehicles_used = solution.num_used_vehicles(),
            elapsed = ?solution.statistics().elapsed,
            "solve finished"
        );
        Ok(solution)
    }

    fn transition(&mut self, next: SolveStatus) {
        debug!(from = %self.status, to = %next, "status");
        self.status = next;
    }
}

/// Solves `problem` with `params`.
///
/// Shorthand for [`Solver::solve`] when the status is not needed.
pub fn solve(problem: &Problem, params: &SearchParameters) -> Result<Solution, RoutingError> {
    Solver::new(problem, params.clone()).solve()
}
