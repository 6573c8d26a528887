//! Swap neighborhood: exchange two customers.

use super::Move;

/// Emits every swap between the routes of `pair`.
pub(crate) fn generate(
    routes: &[Vec<usize>],
    (r1, r2): (usize, usize),
    emit: &mut impl FnMut(Move),
) {
    if r1 == r2 {
        let n = routes[r1].len();
        for i in 0..n {
            for j in i + 1..n {
                emit(Move::Swap {
                    first: (r1, i),
                    second: (r1, j),
                });
            }
        }
        return;
    }

    for i in 0..routes[r1].len() {
        for j in 0..routes[r2].len() {
            emit(Move::Swap {
                first: (r1, i),
                second: (r2, j),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let routes = vec![vec![1, 2, 3], vec![4, 5]];
        let mut intra = 0;
        generate(&routes, (0, 0), &mut |_| intra += 1);
        assert_eq!(intra, 3);

        let mut inter = 0;
        generate(&routes, (0, 1), &mut |_| inter += 1);
        assert_eq!(inter, 6);
    }
}
