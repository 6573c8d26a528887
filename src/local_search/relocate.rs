//! Relocate neighborhood.
//!
//! # Algorithm
//!
//! Takes a single customer out of its route and reinserts it at every other
//! position, either in the same vehicle or in the partner vehicle of the
//! pair being scanned. Inter-route pairs are scanned in both directions.
//!
//! # Complexity
//!
//! O(n₁ × n₂) candidates per route pair.
//!
//! # Reference
//!
//! Or, I. (1976). "Traveling Salesman-Type Combinatorial Problems and Their
//! Relation to the Logistics of Blood Banking". PhD thesis.

use super::Move;

/// Emits every relocate move between the routes of `pair`.
pub(crate) fn generate(
    routes: &[Vec<usize>],
    (r1, r2): (usize, usize),
    emit: &mut impl FnMut(Move),
) {
    if r1 == r2 {
        let n = routes[r1].len();
        for from in 0..n {
            // After removal the route has n - 1 customers, so n insertion slots.
            for after in (0..n).filter(|&after| after != from) {
                emit(Move::Relocate {
                    from_vehicle: r1,
                    from,
                    to_vehicle: r1,
                    after,
                });
            }
        }
        return;
    }

    for (source, target) in [(r1, r2), (r2, r1)] {
        for from in 0..routes[source].len() {
            for after in 0..=routes[target].len() {
                emit(Move::Relocate {
                    from_vehicle: source,
                    from,
                    to_vehicle: target,
                    after,
                });
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
    fn test_intra_route_skips_noop() {
        let routes = vec![vec![1, 2, 3]];
        let moves = collect(&routes, (0, 0));
        assert_eq!(moves.len(), 6);
        for mv in &moves {
            assert_ne!(mv.apply(&routes)[0].1, routes[0]);
        }
    }

    #[test]
    fn test_inter_route_both_directions() {
        let routes = vec![vec![1, 2], vec![3]];
        let moves = collect(&routes, (0, 1));
        // 2 customers × 2 slots + 1 customer × 3 slots
        assert_eq!(moves.len(), 7);
        assert!(moves.contains(&Move::Relocate {
            from_vehicle: 1,
            from: 0,
            to_vehicle: 0,
            after: 2,
        }));
    }

    #[test]
    fn test_into_empty_route() {
        let routes = vec![vec![1], vec![]];
        let moves = collect(&routes, (0, 1));
        assert_eq!(
            moves,
            vec![Move::Relocate {
                from_vehicle: 0,
                from: 0,
                to_vehicle: 1,
                after: 0,
            }]
        );
    }
}
