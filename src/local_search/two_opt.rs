//! Intra-route 2-opt neighborhood.
//!
//! # Algorithm
//!
//! Reversing customers `start..=end` replaces arcs
//! `(r[start-1], r[start])` and `(r[end], r[end+1])` with
//! `(r[start-1], r[end])` and `(r[start], r[end+1])`, the depot standing in
//! at both ends. Arc costs may be asymmetric, so every candidate is priced
//! on the full rewritten route.
//!
//! # Complexity
//!
//! O(n²) candidates per route.
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use super::Move;

/// Emits every segment reversal of route `r1`; inter-route pairs yield nothing.
pub(crate) fn generate(
    routes: &[Vec<usize>],
    (r1, r2): (usize, usize),
    emit: &mut impl FnMut(Move),
) {
    if r1 != r2 {
        return;
    }
    let n = routes[r1].len();
    for start in 0..n {
        for end in start + 1..n {
            emit(Move::TwoOpt {
                vehicle: r1,
                start,
                end,
            });
        }
    }
}
