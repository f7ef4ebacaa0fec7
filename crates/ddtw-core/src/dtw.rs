//! Exact banded DTW alignment.

use tracing::{debug, instrument};

use crate::aligner::{Aligner, Alignment, PointDistance};
use crate::constraint::BandConstraint;
use crate::distance::Distance;
use crate::error::{AlignerError, SignalPosition};
use crate::path::{WarpingPath, WarpingStep};

/// Immutable DTW configuration. Thread-safe and copyable.
///
/// Computes the exact optimal alignment inside the configured warping window.
/// The distance is the plain sum of point distances along the path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dtw {
    constraint: BandConstraint,
}

impl Dtw {
    /// Create an unconstrained DTW aligner.
    #[must_use]
    pub fn unconstrained() -> Self {
        Self {
            constraint: BandConstraint::Unconstrained,
        }
    }

    /// Create a DTW aligner with a Sakoe-Chiba band constraint.
    #[must_use]
    pub fn with_sakoe_chiba(radius: usize) -> Self {
        Self {
            constraint: BandConstraint::SakoeChibaRadius(radius),
        }
    }

    /// Create a DTW aligner from an existing [`BandConstraint`].
    #[must_use]
    pub fn from_constraint(constraint: BandConstraint) -> Self {
        Self { constraint }
    }

    /// Compute only the DTW distance between two sequences.
    ///
    /// Uses a rolling two-row buffer rather than the full cost matrix. Runs in
    /// O(n * bw) time and O(bw) space, where `bw` is the band width. Equal to
    /// the distance returned by [`align`](Aligner::align).
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`AlignerError::EmptySequence`] | `a` or `b` is empty |
    /// | [`AlignerError::NonFiniteCost`] | `dist` returns NaN, infinity, or a negative value |
    #[instrument(skip_all, fields(n = a.len(), m = b.len()))]
    pub fn distance(
        &self,
        a: &[f64],
        b: &[f64],
        dist: PointDistance,
    ) -> Result<Distance, AlignerError> {
        check_non_empty(a, b)?;
        let total = self.rolling(a, b, dist)?;
        Ok(Distance::new(total))
    }

    /// Rolling two-row buffer DTW.
    ///
    /// Each row buffer has `bw + 2` slots. Index 0 is the left sentinel (INF)
    /// and index `bw + 1` is the right sentinel (INF). Active columns occupy
    /// indices `1..=bw`.
    ///
    /// For column `j` in row `i`:
    /// - current local index: `j - col_range.start + 1`
    /// - above `C[i-1][j]`: `j - prev_start + 1` in `prev`
    /// - diagonal `C[i-1][j-1]`: `j - prev_start` in `prev`
    /// - left `C[i][j-1]`: `curr_local - 1`
    fn rolling(&self, a: &[f64], b: &[f64], dist: PointDistance) -> Result<f64, AlignerError> {
        let n = a.len();
        let m = b.len();
        let constraint = self.constraint.effective(n, m);

        let bw = constraint.band_width(m);
        let buf_width = bw + 2;

        let mut prev = vec![f64::INFINITY; buf_width];
        let mut curr = vec![f64::INFINITY; buf_width];
        let mut prev_start: usize = 0;

        for i in 0..n {
            curr.fill(f64::INFINITY);

            let col_range = constraint.column_range(i, m);
            let curr_start = col_range.start;

            for j in col_range {
                let cost = point_cost(dist, a, b, i, j)?;
                let cj = j - curr_start + 1;

                if i == 0 && j == 0 {
                    curr[cj] = cost;
                    continue;
                }

                let left = curr[cj - 1];

                let above = if i > 0 {
                    let pj = j.wrapping_sub(prev_start).wrapping_add(1);
                    prev.get(pj).copied().unwrap_or(f64::INFINITY)
                } else {
                    f64::INFINITY
                };

                let diag = if i > 0 && j > 0 {
                    let pj = (j - 1).wrapping_sub(prev_start).wrapping_add(1);
                    prev.get(pj).copied().unwrap_or(f64::INFINITY)
                } else {
                    f64::INFINITY
                };

                curr[cj] = cost + left.min(above).min(diag);
            }

            prev_start = curr_start;
            std::mem::swap(&mut prev, &mut curr);
        }

        // After the final swap, `prev` holds the last completed row.
        let final_range = constraint.column_range(n - 1, m);
        Ok(prev[(m - 1) - final_range.start + 1])
    }

    /// Banded DTW returning both distance and warping path.
    ///
    /// Costs live in two rolling rows of `bw` slots; only the direction matrix
    /// is kept in full for the traceback. Direction bits: 0 = diagonal,
    /// 1 = above, 2 = left. Ties prefer the diagonal, then above. Cell `(i, j)`
    /// lives at local index `j - col_range.start` of its row.
    fn full_band(
        &self,
        a: &[f64],
        b: &[f64],
        dist: PointDistance,
    ) -> Result<(f64, Vec<WarpingStep>), AlignerError> {
        let n = a.len();
        let m = b.len();
        let constraint = self.constraint.effective(n, m);
        let bw = constraint.band_width(m);
        debug!(band_width = bw, ?constraint, "allocating direction matrix");

        let mut prev = vec![f64::INFINITY; bw];
        let mut curr = vec![f64::INFINITY; bw];
        let mut dirs = vec![0u8; n * bw];
        let mut prev_col_range = 0..0;

        for i in 0..n {
            let col_range = constraint.column_range(i, m);
            curr.fill(f64::INFINITY);

            for j in col_range.clone() {
                let c = point_cost(dist, a, b, i, j)?;
                let local_j = j - col_range.start;

                if i == 0 && j == 0 {
                    curr[local_j] = c;
                    continue;
                }

                let diag = if j > 0 && prev_col_range.contains(&(j - 1)) {
                    prev[j - 1 - prev_col_range.start]
                } else {
                    f64::INFINITY
                };

                let above = if prev_col_range.contains(&j) {
                    prev[j - prev_col_range.start]
                } else {
                    f64::INFINITY
                };

                let left = if j > col_range.start {
                    curr[local_j - 1]
                } else {
                    f64::INFINITY
                };

                let (min_val, dir) = if diag <= above && diag <= left {
                    (diag, 0u8)
                } else if above <= left {
                    (above, 1u8)
                } else {
                    (left, 2u8)
                };

                curr[local_j] = c + min_val;
                dirs[i * bw + local_j] = dir;
            }

            prev_col_range = col_range;
            std::mem::swap(&mut prev, &mut curr);
        }

        // After the final swap, `prev` holds the last completed row.
        let total = prev[m - 1 - prev_col_range.start];

        // Traceback from (n-1, m-1) to (0, 0).
        let mut path = Vec::with_capacity(n + m - 1);
        let mut i = n - 1;
        let mut j = m - 1;

        loop {
            path.push(WarpingStep { a: i, b: j });
            if i == 0 && j == 0 {
                break;
            }
            let idx = i * bw + (j - constraint.column_range(i, m).start);
            match dirs[idx] {
                0 => {
                    i -= 1;
                    j -= 1;
                }
                1 => i -= 1,
                _ => j -= 1,
            }
        }

        path.reverse();

        Ok((total, path))
    }
}

impl Aligner for Dtw {
    #[instrument(skip_all, fields(n = a.len(), m = b.len(), constraint = ?self.constraint))]
    fn align(&self, a: &[f64], b: &[f64], dist: PointDistance) -> Result<Alignment, AlignerError> {
        check_non_empty(a, b)?;
        let (total, steps) = self.full_band(a, b, dist)?;
        debug!(distance = total, path_len = steps.len(), "alignment complete");
        Ok(Alignment {
            distance: Distance::new(total),
            path: WarpingPath::new(steps),
        })
    }
}

fn check_non_empty(a: &[f64], b: &[f64]) -> Result<(), AlignerError> {
    if a.is_empty() {
        return Err(AlignerError::EmptySequence {
            position: SignalPosition::First,
        });
    }
    if b.is_empty() {
        return Err(AlignerError::EmptySequence {
            position: SignalPosition::Second,
        });
    }
    Ok(())
}

fn point_cost(
    dist: PointDistance,
    a: &[f64],
    b: &[f64],
    i: usize,
    j: usize,
) -> Result<f64, AlignerError> {
    let cost = dist(a[i], b[j]);
    if cost.is_finite() && cost >= 0.0 {
        Ok(cost)
    } else {
        Err(AlignerError::NonFiniteCost { a: i, b: j, cost })
    }
}
