//! Inter-route tail exchange (2-opt*).
//!
//! # Algorithm
//!
//! Given R1 = [a₁, ..., aᵢ, aᵢ₊₁, ..., aₙ] and
//! R2 = [b₁, ..., bⱼ, bⱼ₊₁, ..., bₘ], produces:
//!
//! R1' = [a₁, ..., aᵢ, bⱼ₊₁, ..., bₘ]
//! R2' = [b₁, ..., bⱼ, aᵢ₊₁, ..., aₙ]
//!
//! Cut points range over every position including both ends, so whole
//! routes can trade vehicles. With a heterogeneous fleet that alone may
//! restore feasibility or change span costs.
//!
//! # Complexity
//!
//! O(n₁ × n₂) candidates per route pair.
//!
//! # Reference
//!
//! Potvin, J.-Y. & Rousseau, J.-M. (1995). "An Exchange Heuristic for
//! Routeing Problems with Time Windows", *Journal of the Operational Research
//! Society* 46(12), 1433-1446.

use super::Move;

/// Emits every tail exchange between two distinct routes.
pub(crate) fn generate(
    routes: &[Vec<usize>],
    (r1, r2): (usize, usize),
    emit: &mut impl FnMut(Move),
) {
    if r1 == r2 {
        return;
    }
    let (n1, n2) = (routes[r1].len(), routes[r2].len());
    for first_cut in 0..=n1 {
        for second_cut in 0..=n2 {
            // Both tails empty leaves the routes as they are.
            if first_cut == n1 && second_cut == n2 {
                continue;
            }
            emit(Move::Exchange {
                first: r1,
                first_cut,
                second: r2,
                second_cut,
            });
        }
    }
}
