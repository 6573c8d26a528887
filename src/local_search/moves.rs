//! Neighborhood moves over a route assignment.

use smallvec::{smallvec, SmallVec};

/// Routes rewritten by a move, as `(vehicle, new customer sequence)`.
pub type RouteChanges = SmallVec<[(usize, Vec<usize>); 2]>;

/// A candidate mutation of the assignment.
///
/// Positions index the customer sequences of the snapshot the move was
/// generated from; `after` positions are counted once the moved customers
/// have been taken out of their route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Move {
    /// Move one customer to another position or vehicle.
    Relocate {
        from_vehicle: usize,
        from: usize,
        to_vehicle: usize,
        after: usize,
    },
    /// Move a chain of `len` consecutive customers, keeping their order.
    OrOpt {
        from_vehicle: usize,
        start: usize,
        len: usize,
        to_vehicle: usize,
        after: usize,
    },
    /// Exchange two customers.
    Swap {
        first: (usize, usize),
        second: (usize, usize),
    },
    /// Reverse customers `start..=end` of one vehicle.
    TwoOpt {
        vehicle: usize,
        start: usize,
        end: usize,
    },
    /// Exchange the tails of two routes (2-opt*).
    Exchange {
        first: usize,
        first_cut: usize,
        second: usize,
        second_cut: usize,
    },
}

impl Move {
    /// Operator name, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Move::Relocate { .. } => "relocate",
            Move::OrOpt { .. } => "or-opt",
            Move::Swap { .. } => "swap",
            Move::TwoOpt { .. } => "two-opt",
            Move::Exchange { .. } => "exchange",
        }
    }

    /// Builds the rewritten routes without touching `routes`.
    pub fn apply(&self, routes: &[Vec<usize>]) -> RouteChanges {
        match *self {
            Move::Relocate {
                from_vehicle,
                from,
                to_vehicle,
                after,
            } => move_chain(routes, from_vehicle, from, 1, to_vehicle, after),
            Move::OrOpt {
                from_vehicle,
                start,
                len,
                to_vehicle,
                after,
            } => move_chain(routes, from_vehicle, start, len, to_vehicle, after),
            Move::Swap {
                first: (va, ia),
                second: (vb, ib),
            } => {
                if va == vb {
                    let mut route = routes[va].clone();
                    route.swap(ia, ib);
                    smallvec![(va, route)]
                } else {
                    let mut route_a = routes[va].clone();
                    let mut route_b = routes[vb].clone();
                    std::mem::swap(&mut route_a[ia], &mut route_b[ib]);
                    smallvec![(va, route_a), (vb, route_b)]
                }
            }
            Move::TwoOpt {
                vehicle,
                start,
                end,
            } => {
                let mut route = routes[vehicle].clone();
                route[start..=end].reverse();
                smallvec![(vehicle, route)]
            }
            Move::Exchange {
                first,
                first_cut,
                second,
                second_cut,
            } => {
                let (head_a, tail_a) = routes[first].split_at(first_cut);
                let (head_b, tail_b) = routes[second].split_at(second_cut);
                let route_a = head_a.iter().chain(tail_b).copied().collect();
                let route_b = head_b.iter().chain(tail_a).copied().collect();
                smallvec![(first, route_a), (second, route_b)]
            }
        }
    }
}

fn move_chain(
    routes: &[Vec<usize>],
    from_vehicle: usize,
    start: usize,
    len: usize,
    to_vehicle: usize,
    after: usize,
) -> RouteChanges {
    let mut source = routes[from_vehicle].clone();
    let chain: Vec<usize> = source.drain(start..start + len).collect();
    if from_vehicle == to_vehicle {
        source.splice(after..after, chain);
        smallvec![(from_vehicle, source)]
    } else {
        let mut target = routes[to_vehicle].clone();
        target.splice(after..after, chain);
        smallvec![(from_vehicle, source), (to_vehicle, target)]
    }
}
