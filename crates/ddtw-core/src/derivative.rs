//! Local derivative estimation.

use tracing::instrument;

use crate::error::{MIN_SIGNAL_LEN, SignalError};
use crate::series::{Derivatives, IntoSignal};

/// Estimate the local derivatives of a signal.
///
/// For each interior sample `x[i]` (`1 <= i <= n - 2`):
///
/// ```text
/// d[i - 1] = ((x[i] - x[i-1]) + (x[i+1] - x[i-1]) / 2) / 2
/// ```
///
/// The backward difference carries full weight and the two-step difference
/// half weight. Output length is `n - 2` (the first and last samples have no
/// estimate).
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`SignalError::TooShort`] | Input has fewer than 3 samples, whatever its values |
/// | [`SignalError::NonFiniteValue`] | Input contains NaN or infinity |
///
/// # Example
///
/// ```
/// let d = ddtw_core::estimate_derivatives([1.0, 2.0, 4.0, 7.0, 11.0]).unwrap();
/// assert_eq!(d.as_slice(), &[1.25, 2.25, 3.25]);
/// ```
#[instrument(skip_all)]
pub fn estimate_derivatives<S: IntoSignal>(signal: S) -> Result<Derivatives, SignalError> {
    let n = signal.sample_count();
    if n < MIN_SIGNAL_LEN {
        return Err(SignalError::TooShort {
            len: n,
            min: MIN_SIGNAL_LEN,
        });
    }

    let signal = signal.into_signal()?;
    let data = signal.as_slice();

    let deriv = data
        .windows(3)
        .map(|w| ((w[1] - w[0]) + (w[2] - w[0]) / 2.0) / 2.0)
        .collect();

    Ok(Derivatives::new(deriv))
}
