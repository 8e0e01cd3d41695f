//! # Errors
//!
//! $$
//! \text{inputs} \to \text{result} \,\cup\, \{\text{alignment, missing-input}\}
//! $$
//!
//! Recoverable failure kinds reported by model operations. Both leave the
//! model untouched so the caller can correct the inputs and retry.

use thiserror::Error;

/// Failures surfaced by [`crate::Model`] operations and frame construction.
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
  /// The returns, classification and weights matrices disagree on periods
  /// or assets (content or order).
  #[error("misaligned inputs: {0}")]
  Alignment(String),

  /// A required input matrix was never supplied.
  #[error("missing input: {0}")]
  MissingInput(&'static str),

  /// Frame values do not match the declared index/column dimensions.
  #[error("shape mismatch: values are {rows}x{cols}, index/columns imply {expected_rows}x{expected_cols}")]
  Shape {
    rows: usize,
    cols: usize,
    expected_rows: usize,
    expected_cols: usize,
  },
}
