//! Errors for the structural-model collaborator surface (parameter
//! validation, candidate installation, solving, and posterior
//! evaluation).
//!
//! This module defines a typed solve outcome, [`SolveError`], and a model
//! error type, [`ModelError`], used by everything that implements
//! [`StructuralModel`](crate::model::structural::StructuralModel). Both
//! implement `Display`/`Error`.
//!
//! ## Conventions
//! - **Indices are 0-based** and refer to positions in the model's
//!   parameter list.
//! - [`SolveError`] is deliberately a two-variant enum: these are the
//!   only failure kinds the optimization driver treats as recoverable
//!   (retry during proposal generation, large objective value during
//!   evaluation). Everything else travels through [`ModelError`] and
//!   aborts the run.

/// Result alias for model operations that may produce [`ModelError`].
pub type ModelResult<T> = Result<T, ModelError>;

/// Typed outcome of a failed model solve.
///
/// The driver branches on this kind: both variants are recoverable
/// during neighbor-proposal generation (the draw is discarded and
/// retried) and during error-tolerant objective evaluation (the point is
/// scored with a large finite objective value). Models must reserve
/// these variants for exactly those two conditions and report anything
/// unexpected through [`ModelError`] instead.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveError {
    /// A parameter value escaped its declared support.
    BoundsViolation { index: usize, value: f64, lower: f64, upper: f64 },

    /// The equation system has no admissible solution at this point
    /// (e.g., indeterminacy or non-existence of a stable solution).
    StructuralFailure { reason: String },
}

impl std::error::Error for SolveError {}

impl std::fmt::Display for SolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveError::BoundsViolation { index, value, lower, upper } => {
                write!(
                    f,
                    "Parameter {index} violates bounds: {value} outside [{lower}, {upper}]"
                )
            }
            SolveError::StructuralFailure { reason } => {
                write!(f, "Structural solution failure: {reason}")
            }
        }
    }
}

/// Unified error type for the structural-model surface.
///
/// Covers parameter construction and validation, candidate installation
/// (`update`), solve failures, and posterior evaluation. Solve failures
/// are wrapped so callers can classify them without string matching.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    // ---- Solve outcomes ----
    /// The model failed to solve; the kind decides recoverability.
    Solve(SolveError),

    // ---- Parameter validation ----
    /// A parameter value is NaN/±∞.
    NonFiniteParameter { index: usize, value: f64 },

    /// A standalone parameter value is NaN/±∞ (no list position known).
    NonFiniteValue { value: f64 },

    /// Bounds must satisfy lower < upper and contain no NaN.
    InvalidBounds { lower: f64, upper: f64 },

    /// A free parameter's value must lie inside its support.
    ValueOutsideBounds { value: f64, lower: f64, upper: f64 },

    // ---- Candidate installation ----
    /// Candidate vector length does not match the parameter count.
    DimensionMismatch { expected: usize, actual: usize },

    // ---- Posterior evaluation ----
    /// Posterior evaluation failed for a reason the model could not
    /// classify as a solve failure. Never swallowed by the driver.
    Evaluation { reason: String },
}

impl std::error::Error for ModelError {}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::Solve(e) => write!(f, "{e}"),
            ModelError::NonFiniteParameter { index, value } => {
                write!(f, "Non-finite parameter at index {index}: {value}")
            }
            ModelError::NonFiniteValue { value } => {
                write!(f, "Non-finite parameter value: {value}")
            }
            ModelError::InvalidBounds { lower, upper } => {
                write!(f, "Invalid bounds: ({lower}, {upper}), need lower < upper without NaN")
            }
            ModelError::ValueOutsideBounds { value, lower, upper } => {
                write!(f, "Parameter value {value} outside bounds [{lower}, {upper}]")
            }
            ModelError::DimensionMismatch { expected, actual } => {
                write!(f, "Candidate length mismatch: expected {expected}, actual {actual}")
            }
            ModelError::Evaluation { reason } => {
                write!(f, "Posterior evaluation failed: {reason}")
            }
        }
    }
}

impl From<SolveError> for ModelError {
    fn from(err: SolveError) -> Self {
        ModelError::Solve(err)
    }
}
