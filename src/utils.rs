//! Assorted helpers shared by the planner and the step sequencer.

/// Chain length below which the `parallel` feature still fills sequentially.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 64;

/// Number of non-trivial cells (`i < j`) for a chain of `n` matrices:
/// `n(n-1)/2`.
#[inline]
pub fn step_count(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// Cells `(i, j)` with `i < j` in dependency order: chain length ascending,
/// then start index ascending.
///
/// Every subchain that `(i, j)` depends on appears before it.
pub fn fill_order(n: usize) -> impl Iterator<Item = (usize, usize)> + Clone {
    (2..=n).flat_map(move |len| (0..=n - len).map(move |i| (i, i + len - 1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_count_small_chains() {
        assert_eq!(step_count(0), 0);
        assert_eq!(step_count(1), 0);
        assert_eq!(step_count(2), 1);
        assert_eq!(step_count(6), 15);
    }

    #[test]
    fn fill_order_respects_dependencies() {
        let order: Vec<_> = fill_order(4).collect();
        assert_eq!(
            order,
            vec![(0, 1), (1, 2), (2, 3), (0, 2), (1, 3), (0, 3)]
        );
        for (pos, &(i, j)) in order.iter().enumerate() {
            for k in i..j {
                for dep in [(i, k), (k + 1, j)] {
                    if dep.0 < dep.1 {
                        let dep_pos = order.iter().position(|&c| c == dep).unwrap();
                        assert!(dep_pos < pos, "{dep:?} must precede ({i},{j})");
                    }
                }
            }
        }
    }

    #[test]
    fn fill_order_len_matches_step_count() {
        for n in 0..20 {
            assert_eq!(fill_order(n).count(), step_count(n), "n={n}");
        }
    }
}
