//! Lower-triangular distance matrix for pairwise DDTW distances.

use std::ops::Index;

use crate::distance::Distance;

/// Symmetric distance matrix stored as a lower-triangular flat vector.
///
/// For `n` signals, stores `n*(n-1)/2` distances. Access is symmetric:
/// `get(i, j) == get(j, i)`. Diagonal is always zero.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    n: usize,
    data: Vec<Distance>,
}

impl DistanceMatrix {
    /// Number of stored (off-diagonal, lower-triangle) entries for `n` signals.
    pub(crate) fn triangle_len(n: usize) -> usize {
        n * n.saturating_sub(1) / 2
    }

    /// Create a matrix from pre-computed lower-triangular data laid out as
    /// `data[row*(row-1)/2 + col]` with `row > col`.
    pub(crate) fn from_raw(n: usize, data: Vec<Distance>) -> Self {
        debug_assert_eq!(data.len(), Self::triangle_len(n));
        Self { n, data }
    }

    /// Return the number of signals in the matrix.
    #[must_use]
    pub fn len(&self) -> usize {
        self.n
    }

    /// Return true if the matrix covers no signals.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Return the distance between signal `i` and signal `j`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= n` or `j >= n`.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> Distance {
        assert!(i < self.n, "row index {i} out of bounds for matrix of size {}", self.n);
        assert!(j < self.n, "column index {j} out of bounds for matrix of size {}", self.n);
        if i == j {
            return Distance::ZERO;
        }
        let (row, col) = if i > j { (i, j) } else { (j, i) };
        self.data[row * (row - 1) / 2 + col]
    }

    /// Iterate over all unique pairs `(i, j, distance)` where `i > j`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Distance)> + '_ {
        (1..self.n).flat_map(move |i| (0..i).map(move |j| (i, j, self.data[i * (i - 1) / 2 + j])))
    }

    /// Return all distances from signal `i`, indexed by the other signal.
    #[must_use]
    pub fn row(&self, i: usize) -> Vec<Distance> {
        (0..self.n).map(|j| self.get(i, j)).collect()
    }

    /// Return the full symmetric matrix as nested rows.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.n)
            .map(|i| self.row(i).into_iter().map(Distance::value).collect())
            .collect()
    }
}

impl Index<(usize, usize)> for DistanceMatrix {
    type Output = Distance;

    /// Off-diagonal access only; the diagonal is not stored.
    fn index(&self, (i, j): (usize, usize)) -> &Self::Output {
        assert!(i != j, "cannot index diagonal, use get() instead");
        let (row, col) = if i > j { (i, j) } else { (j, i) };
        &self.data[row * (row - 1) / 2 + col]
    }
}
