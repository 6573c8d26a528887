//! Or-opt neighborhood: chain relocation.
//!
//! # Algorithm
//!
//! Moves chains of 2 or 3 consecutive customers, in their original order,
//! to another position in the same route or in the partner route. Single
//! customer moves are left to [`relocate`](super::relocate).
//!
//! # Complexity
//!
//! O(n₁ × n₂) candidates per chain length and route pair.
//!
//! # Reference
//!
//! Or, I. (1976). "Traveling Salesman-Type Combinatorial Problems and Their
//! Relation to the Logistics of Blood Banking". PhD thesis.

use super::Move;

const CHAIN_LENGTHS: [usize; 2] = [2, 3];

/// Emits every chain move between the routes of `pair`.
pub(crate) fn generate(
    routes: &[Vec<usize>],
    (r1, r2): (usize, usize),
    emit: &mut impl FnMut(Move),
) {
    for len in CHAIN_LENGTHS {
        if r1 == r2 {
            let n = routes[r1].len();
            if n <= len {
                continue;
            }
            for start in 0..=n - len {
                for after in (0..=n - len).filter(|&after| after != start) {
                    emit(Move::OrOpt {
                        from_vehicle: r1,
                        start,
                        len,
                        to_vehicle: r1,
                        after,
                    });
                }
            }
            continue;
        }

        for (source, target) in [(r1, r2), (r2, r1)] {
            let n = routes[source].len();
            if n < len {
                continue;
            }
            for start in 0..=n - len {
                for after in 0..=routes[target].len() {
                    emit(Move::OrOpt {
                        from_vehicle: source,
                        start,
                        len,
                        to_vehicle: target,
                        after,
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(routes: &[Vec<usize>], pair: (usize, usize)) -> Vec<Move> {
        let mut moves = Vec::new();
        generate(routes, pair, &mut |mv| moves.push(mv));
        moves
    }

    #[test]
    fn test_short_route_has_no_intra_chain_moves() {
        assert!(collect(&[vec![1, 2]], (0, 0)).is_empty());
    }

    #[test]
    fn test_intra_moves_change_route() {
        let routes = vec![vec![1, 2, 3, 4]];
        let moves = collect(&routes, (0, 0));
        assert!(!moves.is_empty());
        for mv in &moves {
            let changed = mv.apply(&routes);
            assert_ne!(changed[0].1, routes[0]);
            let mut sorted = changed[0].1.clone();
            sorted.sort_unstable();
            assert_eq!(sorted, vec![1, 2, 3, 4]);
        }
    }

    #[test]
    fn test_whole_route_chain_moves_across() {
        let routes = vec![vec![1, 2], vec![3]];
        let moves = collect(&routes, (0, 1));
        assert!(moves.contains(&Move::OrOpt {
            from_vehicle: 0,
            start: 0,
            len: 2,
            to_vehicle: 1,
            after: 1,
        }));
    }
}
