//! Warping window constraints for the DTW cost matrix.

use std::ops::Range;

/// Constraint on the DTW warping window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BandConstraint {
    /// No constraint: the full cost matrix is computed.
    #[default]
    Unconstrained,

    /// Sakoe-Chiba band: cell (i,j) is valid only if |i - j| <= radius.
    SakoeChibaRadius(usize),
}

impl BandConstraint {
    /// Build a constraint from a CLI-style window radius, where `0` means unconstrained.
    #[must_use]
    pub fn from_window(radius: usize) -> Self {
        if radius == 0 {
            Self::Unconstrained
        } else {
            Self::SakoeChibaRadius(radius)
        }
    }

    /// Return the constraint actually applied to an `n x m` matrix.
    ///
    /// A Sakoe-Chiba radius smaller than `|n - m|` would leave `(n-1, m-1)`
    /// outside the band, so it is widened to `|n - m|`.
    #[must_use]
    pub fn effective(&self, n: usize, m: usize) -> Self {
        match *self {
            Self::Unconstrained => Self::Unconstrained,
            Self::SakoeChibaRadius(r) => Self::SakoeChibaRadius(r.max(n.abs_diff(m))),
        }
    }

    /// Return the valid column range for a given row in the cost matrix.
    ///
    /// For unconstrained DTW, returns `0..n_cols`.
    /// For Sakoe-Chiba, returns the intersection of `[row - r, row + r]` with `[0, n_cols)`.
    #[must_use]
    pub fn column_range(&self, row: usize, n_cols: usize) -> Range<usize> {
        match self {
            Self::Unconstrained => 0..n_cols,
            Self::SakoeChibaRadius(r) => {
                let start = row.saturating_sub(*r).min(n_cols);
                let end = (row + r + 1).min(n_cols);
                start..end
            }
        }
    }

    /// Return the maximum band width for a matrix with `m` columns.
    #[must_use]
    pub fn band_width(&self, m: usize) -> usize {
        match self {
            Self::Unconstrained => m,
            Self::SakoeChibaRadius(r) => (2 * r + 1).min(m),
        }
    }
}
