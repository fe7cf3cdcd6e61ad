//! Square DP tables indexed by subchain `(i, j)`.
//!
//! Cells are `Option<T>`: `None` marks an entry that is undefined (below the
//! diagonal) or not yet resolved.

use serde::Serialize;

/// An `n x n` table stored row-major.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Table<T> {
    n: usize,
    cells: Vec<Option<T>>,
}

/// Scalar-multiplication count. Wide enough that sums of `u32`-bounded
/// pair costs stay exact.
pub type Cost = u128;

/// `cost[i][j]`: minimum scalar multiplications for matrices `i..=j`.
pub type CostTable = Table<Cost>;

/// `split[i][j]`: the split point `k` achieving `cost[i][j]`, for `i < j`.
pub type SplitTable = Table<usize>;

impl<T: Copy> Table<T> {
    /// A table with every cell undefined.
    pub fn empty(n: usize) -> Self {
        Self {
            n,
            cells: vec![None; n * n],
        }
    }

    /// Side length `n`.
    #[inline]
    pub fn dim(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> Option<T> {
        if i < self.n && j < self.n {
            self.cells[i * self.n + j]
        } else {
            None
        }
    }

    /// # Panics
    /// Panics if `i` or `j` is out of range.
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: T) {
        assert!(i < self.n && j < self.n, "cell ({i},{j}) outside {0}x{0} table", self.n);
        self.cells[i * self.n + j] = Some(value);
    }

    /// Row `i` as a slice of cells.
    pub fn row(&self, i: usize) -> &[Option<T>] {
        &self.cells[i * self.n..(i + 1) * self.n]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Option<T>]> + '_ {
        (0..self.n).map(move |i| self.row(i))
    }

    /// Number of defined cells.
    pub fn filled(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}

impl CostTable {
    /// Cost table with only the diagonal (`cost[i][i] = 0`) filled.
    pub fn with_zero_diagonal(n: usize) -> Self {
        let mut t = Self::empty(n);
        for i in 0..n {
            t.set(i, i, 0);
        }
        t
    }

    /// Value of a cell that the recurrence has already resolved.
    ///
    /// The DP only reads strictly shorter subchains, which are always filled;
    /// an undefined cell reads as `Cost::MAX` so that it can never win a
    /// minimum.
    #[inline]
    pub(crate) fn resolved(&self, i: usize, j: usize) -> Cost {
        self.get(i, j).unwrap_or(Cost::MAX)
    }
}
