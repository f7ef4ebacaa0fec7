//! Signal and derivative sequence types with validation guarantees.

use std::ops::Index;

use crate::error::SignalError;

/// Owned, validated signal. Guaranteed to hold only finite values.
///
/// Length is not constrained here; derivative estimation enforces its own
/// minimum so that too-short inputs are reported as such.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal(Vec<f64>);

impl Signal {
    /// Create a new signal, validating that all values are finite.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`SignalError::NonFiniteValue`] | Any value is NaN or infinite |
    pub fn new(values: Vec<f64>) -> Result<Self, SignalError> {
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(SignalError::NonFiniteValue { index });
        }
        Ok(Self(values))
    }

    /// Return the samples as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Return the number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return true if the signal has no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume and return the inner vector.
    #[must_use]
    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

impl AsRef<[f64]> for Signal {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

impl Index<usize> for Signal {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl TryFrom<Vec<f64>> for Signal {
    type Error = SignalError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

/// Conversion of ordered numeric input into a dense [`Signal`].
///
/// Implemented for owned and borrowed vectors, slices, and arrays of any
/// `Copy` type that widens losslessly into `f64`, and for [`Signal`] itself.
pub trait IntoSignal {
    /// Number of samples the converted signal will hold.
    ///
    /// Available before conversion so callers can reject short input without
    /// inspecting its values.
    fn sample_count(&self) -> usize;

    /// Convert into a validated signal.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError::NonFiniteValue`] if any value is NaN or infinite.
    fn into_signal(self) -> Result<Signal, SignalError>;
}

impl IntoSignal for Signal {
    fn sample_count(&self) -> usize {
        self.len()
    }

    fn into_signal(self) -> Result<Signal, SignalError> {
        Ok(self)
    }
}

impl IntoSignal for &Signal {
    fn sample_count(&self) -> usize {
        self.len()
    }

    fn into_signal(self) -> Result<Signal, SignalError> {
        Ok(self.clone())
    }
}

impl<T: Copy + Into<f64>> IntoSignal for &[T] {
    fn sample_count(&self) -> usize {
        self.len()
    }

    fn into_signal(self) -> Result<Signal, SignalError> {
        Signal::new(self.iter().map(|&v| v.into()).collect())
    }
}

impl<T: Copy + Into<f64>> IntoSignal for &Vec<T> {
    fn sample_count(&self) -> usize {
        self.len()
    }

    fn into_signal(self) -> Result<Signal, SignalError> {
        self.as_slice().into_signal()
    }
}

impl<T: Copy + Into<f64>> IntoSignal for Vec<T> {
    fn sample_count(&self) -> usize {
        self.len()
    }

    fn into_signal(self) -> Result<Signal, SignalError> {
        Signal::new(self.into_iter().map(Into::into).collect())
    }
}

impl<T: Copy + Into<f64>, const N: usize> IntoSignal for [T; N] {
    fn sample_count(&self) -> usize {
        N
    }

    fn into_signal(self) -> Result<Signal, SignalError> {
        self.as_slice().into_signal()
    }
}

impl<T: Copy + Into<f64>, const N: usize> IntoSignal for &[T; N] {
    fn sample_count(&self) -> usize {
        N
    }

    fn into_signal(self) -> Result<Signal, SignalError> {
        self.as_slice().into_signal()
    }
}

/// Local derivative estimates of a [`Signal`].
///
/// Element `i` is centered at sample `i + 1` of the source signal, so a
/// signal of length `n` yields `n - 2` derivatives.
#[derive(Debug, Clone, PartialEq)]
pub struct Derivatives(Vec<f64>);

impl Derivatives {
    pub(crate) fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    /// Return the derivative estimates as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Return the number of estimates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return true if there are no estimates.
    ///
    /// Derivatives produced by [`estimate_derivatives`](crate::estimate_derivatives)
    /// always hold at least one element.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume and return the inner vector.
    #[must_use]
    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

impl AsRef<[f64]> for Derivatives {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

impl Index<usize> for Derivatives {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_nan() {
        let result = Signal::new(vec![1.0, f64::NAN, 3.0]);
        assert!(matches!(result, Err(SignalError::NonFiniteValue { index: 1 })));
    }

    #[test]
    fn rejects_infinity() {
        let result = Signal::new(vec![1.0, 2.0, f64::INFINITY]);
        assert!(matches!(result, Err(SignalError::NonFiniteValue { index: 2 })));
    }

    #[test]
    fn rejects_neg_infinity() {
        let result = Signal::new(vec![f64::NEG_INFINITY, 2.0]);
        assert!(matches!(result, Err(SignalError::NonFiniteValue { index: 0 })));
    }

    #[test]
    fn accepts_empty_signal() {
        let signal = Signal::new(vec![]).unwrap();
        assert!(signal.is_empty());
    }

    #[test]
    fn integer_slices_widen() {
        let raw: &[i32] = &[1, 2, 4];
        let signal = raw.into_signal().unwrap();
        assert_eq!(signal.as_slice(), &[1.0, 2.0, 4.0]);
    }

    #[test]
    fn f32_vec_widens() {
        let signal = vec![0.5_f32, 1.5, 2.5].into_signal().unwrap();
        assert_eq!(signal.as_slice(), &[0.5, 1.5, 2.5]);
    }

    #[test]
    fn array_coercion_checks_finiteness() {
        let result = [1.0, f64::NAN].into_signal();
        assert!(matches!(result, Err(SignalError::NonFiniteValue { index: 1 })));
    }

    #[test]
    fn borrowed_signal_is_cloned() {
        let signal = Signal::new(vec![1.0, 2.0]).unwrap();
        let coerced = (&signal).into_signal().unwrap();
        assert_eq!(coerced, signal);
    }

    #[test]
    fn try_from_vec() {
        let signal: Result<Signal, _> = vec![1.0, 2.0].try_into();
        assert!(signal.is_ok());
    }

    #[test]
    fn indexing() {
        let signal = Signal::new(vec![10.0, 20.0, 30.0]).unwrap();
        assert_eq!(signal[0], 10.0);
        assert_eq!(signal[2], 30.0);
    }
}
