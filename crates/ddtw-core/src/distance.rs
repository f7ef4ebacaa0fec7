//! Alignment distance newtype wrapper.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Total cost of an alignment: the sum of point distances along the path.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Distance(f64);

impl Distance {
    /// Zero distance, produced by aligning a sequence with itself.
    pub const ZERO: Self = Self(0.0);

    /// Wrap a raw distance value.
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    /// Return the raw distance value.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}
