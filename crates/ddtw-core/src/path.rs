//! Warping path types for DTW alignment.

use serde::{Deserialize, Serialize};

use crate::error::PathError;

/// A single step in a warping path, mapping index `a` in the first sequence
/// to index `b` in the second sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WarpingStep {
    /// Index in the first sequence.
    pub a: usize,
    /// Index in the second sequence.
    pub b: usize,
}

impl From<(usize, usize)> for WarpingStep {
    fn from((a, b): (usize, usize)) -> Self {
        Self { a, b }
    }
}

/// An ordered sequence of warping steps, normally from `(0, 0)` to `(n-1, m-1)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WarpingPath(Vec<WarpingStep>);

impl WarpingPath {
    /// Create a new warping path from a vector of steps.
    ///
    /// No ordering is enforced; use [`is_monotonic`](Self::is_monotonic) to check
    /// paths received from third-party aligners.
    #[must_use]
    pub fn new(steps: Vec<WarpingStep>) -> Self {
        Self(steps)
    }

    /// Build a path from `(a, b)` index pairs.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        Self(pairs.into_iter().map(WarpingStep::from).collect())
    }

    /// Return the warping steps as a slice.
    #[must_use]
    pub fn steps(&self) -> &[WarpingStep] {
        &self.0
    }

    /// Iterate over the steps as `(a, b)` tuples.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.0.iter().map(|s| (s.a, s.b))
    }

    /// Return the number of steps in the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return true if the path contains no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Return the first step, if any.
    #[must_use]
    pub fn first(&self) -> Option<WarpingStep> {
        self.0.first().copied()
    }

    /// Return the last step, if any.
    #[must_use]
    pub fn last(&self) -> Option<WarpingStep> {
        self.0.last().copied()
    }

    /// Return true if neither coordinate ever decreases along the path.
    #[must_use]
    pub fn is_monotonic(&self) -> bool {
        self.0.windows(2).all(|w| w[1].a >= w[0].a && w[1].b >= w[0].b)
    }

    /// Return true if every step advances each coordinate by at most one and
    /// at least one coordinate by exactly one.
    #[must_use]
    pub fn is_continuous(&self) -> bool {
        self.0.windows(2).all(|w| {
            let (Some(da), Some(db)) = (w[1].a.checked_sub(w[0].a), w[1].b.checked_sub(w[0].b))
            else {
                return false;
            };
            da <= 1 && db <= 1 && da + db >= 1
        })
    }

    /// Return a copy of the path with `offset` added to both coordinates.
    ///
    /// Derivative position `i` is centered at sample `i + 1` of its signal, so
    /// `shifted(1)` maps a derivative-space path onto the raw signals.
    #[must_use]
    pub fn shifted(&self, offset: usize) -> Self {
        Self(
            self.0
                .iter()
                .map(|s| WarpingStep {
                    a: s.a + offset,
                    b: s.b + offset,
                })
                .collect(),
        )
    }

    /// Resample two sequences along the path: output position `k` holds
    /// `a[path[k].a]` and `b[path[k].b]`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`PathError::IndexOutOfBounds`] | A step indexes past the end of `a` or `b` |
    pub fn warp(&self, a: &[f64], b: &[f64]) -> Result<WarpedPair, PathError> {
        let mut first = Vec::with_capacity(self.0.len());
        let mut second = Vec::with_capacity(self.0.len());

        for (step, s) in self.0.iter().enumerate() {
            match (a.get(s.a), b.get(s.b)) {
                (Some(&va), Some(&vb)) => {
                    first.push(va);
                    second.push(vb);
                }
                _ => {
                    return Err(PathError::IndexOutOfBounds {
                        step,
                        a: s.a,
                        b: s.b,
                        len_a: a.len(),
                        len_b: b.len(),
                    });
                }
            }
        }

        Ok(WarpedPair { first, second })
    }
}

impl<'a> IntoIterator for &'a WarpingPath {
    type Item = &'a WarpingStep;
    type IntoIter = std::slice::Iter<'a, WarpingStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(usize, usize)> for WarpingPath {
    fn from_iter<I: IntoIterator<Item = (usize, usize)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

/// Two sequences resampled onto a common warped time axis.
#[derive(Debug, Clone, PartialEq)]
pub struct WarpedPair {
    /// Samples of the first sequence, one per path step.
    pub first: Vec<f64>,
    /// Samples of the second sequence, one per path step.
    pub second: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_pairs_preserves_order() {
        let path = WarpingPath::from_pairs([(0, 0), (1, 0), (2, 1)]);
        assert_eq!(path.len(), 3);
        assert_eq!(path.first(), Some(WarpingStep { a: 0, b: 0 }));
        assert_eq!(path.last(), Some(WarpingStep { a: 2, b: 1 }));
        assert_eq!(path.pairs().collect::<Vec<_>>(), vec![(0, 0), (1, 0), (2, 1)]);
    }

    #[test]
    fn monotonic_detection() {
        assert!(WarpingPath::from_pairs([(0, 0), (0, 1), (1, 1)]).is_monotonic());
        assert!(!WarpingPath::from_pairs([(0, 0), (1, 1), (0, 2)]).is_monotonic());
        assert!(WarpingPath::default().is_monotonic());
    }

    #[test]
    fn continuity_detection() {
        assert!(WarpingPath::from_pairs([(0, 0), (1, 1), (1, 2)]).is_continuous());
        // jump of two
        assert!(!WarpingPath::from_pairs([(0, 0), (2, 1)]).is_continuous());
        // repeated step
        assert!(!WarpingPath::from_pairs([(0, 0), (0, 0)]).is_continuous());
        // step backwards
        assert!(!WarpingPath::from_pairs([(1, 1), (0, 2)]).is_continuous());
    }

    #[test]
    fn shifted_offsets_both_coordinates() {
        let path = WarpingPath::from_pairs([(0, 0), (1, 2)]).shifted(1);
        assert_eq!(path.pairs().collect::<Vec<_>>(), vec![(1, 1), (2, 3)]);
    }

    #[test]
    fn warp_resamples_along_path() {
        let path = WarpingPath::from_pairs([(0, 0), (1, 0), (2, 1)]);
        let warped = path.warp(&[10.0, 20.0, 30.0], &[1.0, 2.0]).unwrap();
        assert_eq!(warped.first, vec![10.0, 20.0, 30.0]);
        assert_eq!(warped.second, vec![1.0, 1.0, 2.0]);
    }

    #[test]
    fn warp_rejects_out_of_bounds() {
        let path = WarpingPath::from_pairs([(0, 0), (1, 3)]);
        let result = path.warp(&[1.0, 2.0], &[1.0, 2.0]);
        assert_eq!(
            result,
            Err(PathError::IndexOutOfBounds {
                step: 1,
                a: 1,
                b: 3,
                len_a: 2,
                len_b: 2,
            })
        );
    }

    #[test]
    fn serializes_as_array_of_steps() {
        let path = WarpingPath::from_pairs([(0, 0), (1, 1)]);
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, r#"[{"a":0,"b":0},{"a":1,"b":1}]"#);
    }
}
