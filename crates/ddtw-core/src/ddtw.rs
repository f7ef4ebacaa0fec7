//! Derivative-space alignment: estimate derivatives, then delegate to an aligner.

use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::aligner::{Aligner, Alignment, PointDistance, euclidean};
use crate::derivative::estimate_derivatives;
use crate::error::{AlignError, SignalPosition};
use crate::matrix::DistanceMatrix;
use crate::series::{Derivatives, IntoSignal, Signal};

/// Derivative DTW configuration: an aligner plus the point distance handed to it.
///
/// Defaults to [`euclidean`] point distance.
///
/// ```
/// use ddtw_core::{Ddtw, Dtw};
///
/// let ddtw = Ddtw::new(Dtw::unconstrained());
/// let alignment = ddtw.align([0.0, 1.0, 3.0, 6.0], [0.0, 1.0, 3.0, 6.0]).unwrap();
/// assert_eq!(alignment.distance.value(), 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct Ddtw<A> {
    aligner: A,
    point_distance: PointDistance,
}

impl<A: Aligner> Ddtw<A> {
    /// Wrap an aligner with Euclidean point distance.
    #[must_use]
    pub fn new(aligner: A) -> Self {
        Self {
            aligner,
            point_distance: euclidean,
        }
    }

    /// Replace the point distance passed to the aligner.
    #[must_use]
    pub fn with_point_distance(mut self, point_distance: PointDistance) -> Self {
        self.point_distance = point_distance;
        self
    }

    /// Align two signals in derivative space.
    ///
    /// Both signals are validated before the aligner is called, so a rejected
    /// input never reaches it. The aligner's result is returned unchanged.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`AlignError::Signal`] | Either signal is shorter than 3 samples or non-finite |
    /// | [`AlignError::Aligner`] | The aligner itself failed |
    #[instrument(skip_all)]
    pub fn align<S1, S2>(&self, signal_1: S1, signal_2: S2) -> Result<Alignment, AlignError>
    where
        S1: IntoSignal,
        S2: IntoSignal,
    {
        let d1 = estimate_derivatives(signal_1).map_err(AlignError::signal(SignalPosition::First))?;
        let d2 =
            estimate_derivatives(signal_2).map_err(AlignError::signal(SignalPosition::Second))?;
        debug!(len_1 = d1.len(), len_2 = d2.len(), "derivatives estimated");
        self.align_derivatives(&d1, &d2)
    }

    /// Align two already-estimated derivative sequences.
    ///
    /// # Errors
    ///
    /// Returns [`AlignError::Aligner`] if the aligner fails.
    pub fn align_derivatives(
        &self,
        d1: &Derivatives,
        d2: &Derivatives,
    ) -> Result<Alignment, AlignError> {
        Ok(self
            .aligner
            .align(d1.as_slice(), d2.as_slice(), self.point_distance)?)
    }

    /// Compute pairwise DDTW distances for a collection of signals.
    ///
    /// Derivatives are estimated once per signal, then all unique pairs are
    /// aligned in parallel using rayon.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`AlignError::BatchSignal`] | A signal is shorter than 3 samples |
    /// | [`AlignError::Aligner`] | The aligner failed on any pair |
    #[instrument(skip_all, fields(n = signals.len()))]
    pub fn pairwise(&self, signals: &[Signal]) -> Result<DistanceMatrix, AlignError>
    where
        A: Sync,
    {
        let derivatives = signals
            .iter()
            .enumerate()
            .map(|(index, s)| {
                estimate_derivatives(s).map_err(|source| AlignError::BatchSignal { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let n = derivatives.len();
        let pairs: Vec<(usize, usize)> = (1..n).flat_map(|i| (0..i).map(move |j| (i, j))).collect();
        debug_assert_eq!(pairs.len(), DistanceMatrix::triangle_len(n));

        let distances = pairs
            .into_par_iter()
            .map(|(i, j)| {
                self.align_derivatives(&derivatives[i], &derivatives[j])
                    .map(|alignment| alignment.distance)
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(n_pairs = distances.len(), "pairwise distances computed");
        Ok(DistanceMatrix::from_raw(n, distances))
    }
}

/// Align two signals in derivative space with Euclidean point distance.
///
/// Shorthand for `Ddtw::new(aligner).align(signal_1, signal_2)`.
///
/// # Errors
///
/// See [`Ddtw::align`].
pub fn align_via_derivatives<A, S1, S2>(
    aligner: &A,
    signal_1: S1,
    signal_2: S2,
) -> Result<Alignment, AlignError>
where
    A: Aligner + ?Sized,
    S1: IntoSignal,
    S2: IntoSignal,
{
    Ddtw::new(aligner).align(signal_1, signal_2)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::Dtw;
    use crate::aligner::from_fn;
    use crate::distance::Distance;
    use crate::error::{AlignerError, SignalError};
    use crate::path::WarpingPath;

    #[test]
    fn identical_signals_align_on_diagonal() {
        let s = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];
        let alignment = align_via_derivatives(&Dtw::unconstrained(), s, s).unwrap();
        assert_eq!(alignment.distance.value(), 0.0);
        let expected: Vec<_> = (0..s.len() - 2).map(|i| (i, i)).collect();
        assert_eq!(alignment.path.pairs().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn aligner_receives_derivatives_and_euclidean() {
        let aligner = from_fn(|a, b, dist| {
            assert_eq!(a, &[1.25, 2.25, 3.25]);
            assert_eq!(b, &[1.0]);
            assert_eq!(dist(1.0, -2.0), 3.0);
            Ok(Alignment {
                distance: Distance::new(7.0),
                path: WarpingPath::from_pairs([(0, 0), (1, 0), (2, 0)]),
            })
        });
        let alignment = align_via_derivatives(&aligner, [1, 2, 4, 7, 11], [0, 1, 2]).unwrap();
        assert_eq!(alignment.distance.value(), 7.0);
        assert_eq!(alignment.path.len(), 3);
    }

    #[test]
    fn short_first_signal_never_reaches_aligner() {
        let calls = AtomicUsize::new(0);
        let aligner = from_fn(|_, _, _| {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(AlignerError::external("should not be called"))
        });
        let result = align_via_derivatives(&aligner, [1.0, 2.0], [1.0, 2.0, 3.0, 4.0]);
        assert!(matches!(
            result,
            Err(AlignError::Signal {
                position: SignalPosition::First,
                source: SignalError::TooShort { len: 2, .. },
            })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn short_second_signal_is_named() {
        let result = align_via_derivatives(&Dtw::unconstrained(), [1.0, 2.0, 3.0], [1.0]);
        assert!(matches!(
            result,
            Err(AlignError::Signal {
                position: SignalPosition::Second,
                ..
            })
        ));
    }

    #[test]
    fn short_non_finite_signal_is_too_short() {
        let result = align_via_derivatives(&Dtw::unconstrained(), [f64::INFINITY], [1.0, 2.0, 3.0]);
        assert!(matches!(
            result,
            Err(AlignError::Signal {
                position: SignalPosition::First,
                source: SignalError::TooShort { len: 1, min: 3 },
            })
        ));
    }

    #[test]
    fn aligner_error_passes_through() {
        let aligner = from_fn(|_, _, _| {
            Err(AlignerError::EmptySequence {
                position: SignalPosition::Second,
            })
        });
        let result = align_via_derivatives(&aligner, [1.0, 2.0, 3.0], [1.0, 2.0, 3.0]);
        assert!(matches!(
            result,
            Err(AlignError::Aligner(AlignerError::EmptySequence {
                position: SignalPosition::Second
            }))
        ));
    }

    #[test]
    fn custom_point_distance_is_forwarded() {
        fn squared(x: f64, y: f64) -> f64 {
            (x - y).powi(2)
        }
        let ddtw = Ddtw::new(Dtw::with_sakoe_chiba(0)).with_point_distance(squared);
        // derivatives: [1.0] vs [3.0]
        let alignment = ddtw.align([0.0, 1.0, 2.0], [0.0, 3.0, 6.0]).unwrap();
        assert!((alignment.distance.value() - 4.0).abs() < 1e-10);
    }

    #[test]
    fn offset_signals_have_zero_distance() {
        let a: Vec<f64> = (0..20).map(|i| (i as f64 * 0.3).sin()).collect();
        let b: Vec<f64> = a.iter().map(|v| v + 10.0).collect();
        let alignment = Ddtw::new(Dtw::unconstrained()).align(&a, &b).unwrap();
        assert!(alignment.distance.value() < 1e-9);
    }

    #[test]
    fn pairwise_matches_individual() {
        let signals: Vec<Signal> = [
            vec![1.0, 2.0, 4.0, 7.0],
            vec![4.0, 3.0, 1.0, 0.0, -2.0],
            vec![0.0, 0.5, 0.0, 0.5],
        ]
        .into_iter()
        .map(|v| Signal::new(v).unwrap())
        .collect();
        let ddtw = Ddtw::new(Dtw::unconstrained());
        let matrix = ddtw.pairwise(&signals).unwrap();

        assert_eq!(matrix.len(), 3);
        for (i, j, d) in matrix.iter() {
            let direct = ddtw.align(&signals[i], &signals[j]).unwrap().distance;
            assert!((d.value() - direct.value()).abs() < 1e-10, "mismatch at ({i}, {j})");
        }
    }

    #[test]
    fn pairwise_reports_offending_index() {
        let signals = vec![
            Signal::new(vec![1.0, 2.0, 3.0]).unwrap(),
            Signal::new(vec![1.0, 2.0]).unwrap(),
        ];
        let result = Ddtw::new(Dtw::unconstrained()).pairwise(&signals);
        assert!(matches!(result, Err(AlignError::BatchSignal { index: 1, .. })));
    }

    #[test]
    fn pairwise_empty_batch() {
        let matrix = Ddtw::new(Dtw::unconstrained()).pairwise(&[]).unwrap();
        assert!(matrix.is_empty());
    }
}
