//! Validation helpers for posterior-mode search.
//!
//! This module centralizes common consistency checks used across the
//! mode-finder interface:
//!
//! - **Configuration checks**: [`verify_tolerance`] and
//!   [`verify_positive_finite`] ensure numeric options are finite and
//!   strictly positive, reporting through a caller-supplied error
//!   constructor so each field keeps its own variant.
//! - **Gradient validation**: [`validate_gradient`] enforces correct
//!   dimension and finite entries.
//! - **Minimizer validation**: [`validate_minimum`] ensures a candidate
//!   minimum exists and contains only finite values.
//! - **Objective values**: [`validate_value`] checks scalar outputs for
//!   finiteness.
//! - **Curvature validation**: [`validate_curvature`] checks the shape
//!   and entries of curvature matrices.
//!
//! These helpers standardize error reporting by returning domain-specific
//! [`OptError`] variants, making higher-level code more uniform and easier
//! to debug.
use crate::optimization::{
    errors::{OptError, OptResult},
    mode_finder::types::{CurvatureMatrix, FreeVector, Grad},
};

/// Validate a tolerance value through a field-specific error constructor.
///
/// The value must be **finite** and **strictly positive**.
///
/// # Errors
/// Returns the error built by `make_err` with the offending value and a
/// reason string.
pub fn verify_tolerance<E>(tol: f64, make_err: E) -> OptResult<()>
where
    E: Fn(f64, &'static str) -> OptError,
{
    if !tol.is_finite() {
        return Err(make_err(tol, "Tolerance must be finite."));
    }
    if tol <= 0.0 {
        return Err(make_err(tol, "Tolerance must be positive."));
    }
    Ok(())
}

/// Validate a positive scale-like option through a field-specific error
/// constructor.
///
/// The value must be **finite** and **strictly positive**.
///
/// # Errors
/// Returns the error built by `make_err` with the offending value and a
/// reason string.
pub fn verify_positive_finite<E>(value: f64, make_err: E) -> OptResult<()>
where
    E: Fn(f64, &'static str) -> OptError,
{
    if !value.is_finite() {
        return Err(make_err(value, "Value must be finite."));
    }
    if value <= 0.0 {
        return Err(make_err(value, "Value must be positive."));
    }
    Ok(())
}

/// Validate a gradient vector against dimension and finiteness.
///
/// Checks:
/// - `gradient.len() == dim`
/// - every element is finite (`NaN` or `±∞` are rejected)
///
/// # Errors
/// - [`OptError::GradientDimMismatch`] if length does not match `dim`.
/// - [`OptError::InvalidGradient`] with the index/value/reason of the first
///   offending element.
pub fn validate_gradient(gradient: &Grad, dim: usize) -> OptResult<()> {
    if gradient.len() != dim {
        return Err(OptError::GradientDimMismatch { expected: dim, found: gradient.len() });
    }
    for (index, &value) in gradient.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidGradient {
                index,
                value,
                reason: "Gradient elements must be finite.",
            });
        }
    }
    Ok(())
}

/// Validate and unwrap a candidate minimizer.
///
/// Accepts only a present vector with all **finite** entries.
///
/// # Returns
/// The owned `FreeVector` if valid.
///
/// # Errors
/// - [`OptError::MissingMinimum`] if no vector was provided.
/// - [`OptError::InvalidMinimum`] if any element is non-finite.
pub fn validate_minimum(minimum: Option<FreeVector>) -> OptResult<FreeVector> {
    match minimum {
        Some(m) => {
            for (index, &value) in m.iter().enumerate() {
                if !value.is_finite() {
                    return Err(OptError::InvalidMinimum {
                        index,
                        value,
                        reason: "Minimizer entries must be finite.",
                    });
                }
            }
            Ok(m)
        }
        None => Err(OptError::MissingMinimum),
    }
}

/// Validate that a scalar objective or posterior value is finite.
///
/// Negative values are fine as long as they are finite.
///
/// # Errors
/// Returns [`OptError::NonFiniteCost`] if the value is `NaN` or infinite.
pub fn validate_value(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(())
}

/// Validate the shape and entries of a curvature matrix.
///
/// # Checks
/// 1. Matrix dimensions must equal `dim x dim`.
/// 2. All entries must be finite (no NaN or ±∞).
///
/// # Errors
/// - [`OptError::HessianDimMismatch`] if dimensions do not match `dim`.
/// - [`OptError::InvalidHessian`] if any entry is non-finite, with offending
///   row/col indices and value.
pub fn validate_curvature(curvature: &CurvatureMatrix, dim: usize) -> OptResult<()> {
    if curvature.nrows() != dim || curvature.ncols() != dim {
        return Err(OptError::HessianDimMismatch {
            expected: dim,
            found: (curvature.nrows(), curvature.ncols()),
        });
    }
    for ((i, j), &value) in curvature.indexed_iter() {
        if !value.is_finite() {
            return Err(OptError::InvalidHessian { row: i, col: j, value });
        }
    }
    Ok(())
}
