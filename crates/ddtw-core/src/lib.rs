//! Derivative Dynamic Time Warping for one-dimensional signals.
//!
//! Pure math library with zero I/O. Estimates local derivatives of each
//! signal, then aligns the derivative sequences through an [`Aligner`]. The
//! crate ships [`Dtw`], an exact banded aligner; approximate searches can be
//! plugged in by implementing the trait.
//!
//! ```
//! use ddtw_core::{align_via_derivatives, Dtw};
//!
//! let a = [0.0, 1.0, 3.0, 6.0, 10.0];
//! let b = [0.0, 1.0, 1.0, 3.0, 6.0, 10.0];
//! let alignment = align_via_derivatives(&Dtw::unconstrained(), a, b).unwrap();
//! assert_eq!(alignment.path.first().map(|s| (s.a, s.b)), Some((0, 0)));
//! assert_eq!(alignment.path.last().map(|s| (s.a, s.b)), Some((2, 3)));
//! ```

pub mod aligner;
mod constraint;
mod ddtw;
mod derivative;
mod distance;
mod dtw;
mod error;
mod matrix;
mod path;
mod series;

pub use aligner::{Aligner, Alignment, PointDistance, euclidean};
pub use constraint::BandConstraint;
pub use ddtw::{Ddtw, align_via_derivatives};
pub use derivative::estimate_derivatives;
pub use distance::Distance;
pub use dtw::Dtw;
pub use error::{AlignError, AlignerError, MIN_SIGNAL_LEN, PathError, SignalError, SignalPosition};
pub use matrix::DistanceMatrix;
pub use path::{WarpedPair, WarpingPath, WarpingStep};
pub use series::{Derivatives, IntoSignal, Signal};
