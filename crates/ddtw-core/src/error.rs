//! Error types for signal validation, alignment, and path resampling.

use std::fmt;

/// Minimum number of samples needed to estimate derivatives.
pub const MIN_SIGNAL_LEN: usize = 3;

/// Errors from signal coercion and derivative estimation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SignalError {
    /// Returned when a signal is too short to estimate derivatives.
    #[error("signal length must be at least {min} to estimate derivatives, got {len}")]
    TooShort {
        /// Number of samples in the rejected signal.
        len: usize,
        /// Minimum accepted length.
        min: usize,
    },

    /// Returned when a signal contains NaN, infinity, or negative infinity.
    #[error("signal contains non-finite value at index {index}")]
    NonFiniteValue {
        /// Position of the first non-finite value found.
        index: usize,
    },
}

/// Which argument of a two-signal operation an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalPosition {
    /// The first signal.
    First,
    /// The second signal.
    Second,
}

impl fmt::Display for SignalPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => f.write_str("first"),
            Self::Second => f.write_str("second"),
        }
    }
}

/// Errors raised by an [`Aligner`](crate::Aligner) implementation.
#[derive(Debug, thiserror::Error)]
pub enum AlignerError {
    /// Returned when one of the sequences handed to the aligner is empty.
    #[error("{position} sequence is empty")]
    EmptySequence {
        /// The empty sequence.
        position: SignalPosition,
    },

    /// Returned when the point distance yields NaN, infinity, or a negative value.
    #[error("point distance returned {cost} at cell ({a}, {b})")]
    NonFiniteCost {
        /// Index into the first sequence.
        a: usize,
        /// Index into the second sequence.
        b: usize,
        /// The offending cost.
        cost: f64,
    },

    /// Failure from an aligner implemented outside this crate.
    #[error(transparent)]
    External(Box<dyn std::error::Error + Send + Sync>),
}

impl AlignerError {
    /// Wrap an arbitrary error raised by a third-party aligner.
    pub fn external<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::External(error.into())
    }
}

/// Errors from derivative-space alignment.
#[derive(Debug, thiserror::Error)]
pub enum AlignError {
    /// One of the input signals could not be turned into derivatives.
    #[error("{position} signal rejected: {source}")]
    Signal {
        /// Which argument failed.
        position: SignalPosition,
        /// The underlying validation error.
        source: SignalError,
    },

    /// A signal in a pairwise batch could not be turned into derivatives.
    #[error("signal {index} in batch rejected: {source}")]
    BatchSignal {
        /// Position of the signal in the batch.
        index: usize,
        /// The underlying validation error.
        source: SignalError,
    },

    /// The aligner failed. Carried as-is.
    #[error(transparent)]
    Aligner(#[from] AlignerError),
}

impl AlignError {
    pub(crate) fn signal(position: SignalPosition) -> impl FnOnce(SignalError) -> Self {
        move |source| Self::Signal { position, source }
    }
}

/// Errors from resampling sequences along a warping path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// Returned when a step indexes past the end of either sequence.
    #[error("step {step} at ({a}, {b}) is out of bounds for sequences of length {len_a} and {len_b}")]
    IndexOutOfBounds {
        /// Position of the offending step in the path.
        step: usize,
        /// Index into the first sequence.
        a: usize,
        /// Index into the second sequence.
        b: usize,
        /// Length of the first sequence.
        len_a: usize,
        /// Length of the second sequence.
        len_b: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_short_message_names_minimum() {
        let err = SignalError::TooShort { len: 2, min: MIN_SIGNAL_LEN };
        assert_eq!(
            err.to_string(),
            "signal length must be at least 3 to estimate derivatives, got 2"
        );
    }

    #[test]
    fn align_error_names_position() {
        let err = AlignError::signal(SignalPosition::Second)(SignalError::TooShort {
            len: 1,
            min: MIN_SIGNAL_LEN,
        });
        assert!(err.to_string().starts_with("second signal rejected"));
    }

    #[test]
    fn external_aligner_error_is_transparent() {
        let err: AlignError = AlignerError::external("backend exploded").into();
        assert_eq!(err.to_string(), "backend exploded");
    }
}
