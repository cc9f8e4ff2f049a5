// Error type for the morph search library.
//
// Only precondition violations are errors here: mismatched dimensions, bad
// interval or step counts, shrinking upsamples, invalid option values, and
// unknown metric names. Non-convergence is not an error (engines return their
// best effort). The one degenerate outcome that is surfaced is
// `ConstraintUnsatisfied`, produced when the duplicate-coordinate retry budget
// of the point generator or path builder runs out.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MorphError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MorphError {
    /// Two operands of a binary vector operation have different lengths.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// `interpolate_path` interval outside the open range (0, 1).
    #[error("interpolation interval must be in (0, 1), got {0}")]
    InvalidInterval(f64),

    /// Step count of zero where at least one step is required.
    #[error("step count must be positive, got {0}")]
    InvalidStepCount(usize),

    /// `upsample` asked to produce fewer elements than it was given.
    #[error("cannot upsample a vector of length {len} down to {new_size}")]
    UpsampleShrink { len: usize, new_size: usize },

    /// An operation that needs at least one coordinate got none.
    #[error("vector must not be empty")]
    EmptyVector,

    /// An options struct failed validation.
    #[error("invalid options: {0}")]
    InvalidOptions(String),

    /// Every attempt produced a point with duplicate coordinates.
    #[error("could not find a point with distinct coordinates after {attempts} attempts")]
    ConstraintUnsatisfied { attempts: usize },

    /// Registry lookup for a metric name that was never registered.
    #[error("unknown metric: {0}")]
    UnknownMetric(String),
}

/// Check that two operands share a dimensionality.
pub(crate) fn check_dims(a: &[f64], b: &[f64]) -> Result<()> {
    if a.len() == b.len() {
        Ok(())
    } else {
        Err(MorphError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        })
    }
}
