//! The alignment seam: anything that can warp one sequence onto another.

use serde::{Deserialize, Serialize};

use crate::distance::Distance;
use crate::error::AlignerError;
use crate::path::WarpingPath;

/// Pointwise cost between two samples. Must be symmetric and non-negative.
pub type PointDistance = fn(f64, f64) -> f64;

/// Euclidean distance between two scalars, i.e. their absolute difference.
#[must_use]
pub fn euclidean(x: f64, y: f64) -> f64 {
    (x - y).abs()
}

/// Result of aligning two sequences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alignment {
    /// Total cost along the path.
    pub distance: Distance,
    /// Matched index pairs, ordered from the start of both sequences.
    pub path: WarpingPath,
}

/// A DTW-style alignment strategy.
///
/// Given two sequences and a point distance, produce the total cost and the
/// warping path. Conforming implementations return a path that starts at
/// `(0, 0)`, ends at `(a.len() - 1, b.len() - 1)`, and never decreases in
/// either coordinate.
///
/// [`Dtw`](crate::Dtw) is the exact implementation shipped with this crate.
/// Approximate searches (coarsen, project, refine) plug in here too.
pub trait Aligner {
    /// Align `a` onto `b` under `dist`.
    ///
    /// # Errors
    ///
    /// Implementation-defined; see [`AlignerError`].
    fn align(&self, a: &[f64], b: &[f64], dist: PointDistance) -> Result<Alignment, AlignerError>;
}

impl<A: Aligner + ?Sized> Aligner for &A {
    fn align(&self, a: &[f64], b: &[f64], dist: PointDistance) -> Result<Alignment, AlignerError> {
        (**self).align(a, b, dist)
    }
}

impl<A: Aligner + ?Sized> Aligner for Box<A> {
    fn align(&self, a: &[f64], b: &[f64], dist: PointDistance) -> Result<Alignment, AlignerError> {
        (**self).align(a, b, dist)
    }
}

/// An [`Aligner`] backed by a closure. Built by [`from_fn`].
#[derive(Clone, Copy)]
pub struct FnAligner<F>(F);

impl<F> std::fmt::Debug for FnAligner<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnAligner").finish_non_exhaustive()
    }
}

/// Wrap a closure as an [`Aligner`].
///
/// ```
/// use ddtw_core::{aligner, Alignment, Distance, WarpingPath};
///
/// let fixed = aligner::from_fn(|_a, _b, _dist| {
///     Ok(Alignment {
///         distance: Distance::new(1.0),
///         path: WarpingPath::from_pairs([(0, 0)]),
///     })
/// });
/// let result = ddtw_core::align_via_derivatives(&fixed, [1.0, 2.0, 3.0], [3.0, 2.0, 1.0]).unwrap();
/// assert_eq!(result.distance.value(), 1.0);
/// ```
pub fn from_fn<F>(f: F) -> FnAligner<F>
where
    F: Fn(&[f64], &[f64], PointDistance) -> Result<Alignment, AlignerError>,
{
    FnAligner(f)
}

impl<F> Aligner for FnAligner<F>
where
    F: Fn(&[f64], &[f64], PointDistance) -> Result<Alignment, AlignerError>,
{
    fn align(&self, a: &[f64], b: &[f64], dist: PointDistance) -> Result<Alignment, AlignerError> {
        (self.0)(a, b, dist)
    }
}
