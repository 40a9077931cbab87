//! Bidirectional transforms between bounded model space and the
//! unconstrained real line.
//!
//! Purpose
//! -------
//! Give unbounded optimizers a coordinate system in which every free
//! parameter ranges over all of ℝ, while the model keeps its bounded
//! native coordinates. The transform is chosen per parameter from its
//! bound pattern:
//!
//! - two-sided bounds `(a, b)`: affine map onto (0, 1) composed with the
//!   logit, inverted with the logistic,
//! - lower bound only: shifted softplus, `x = a + softplus(y)`,
//! - upper bound only: reflected softplus, `x = b - softplus(y)`,
//! - unbounded or fixed: identity.
//!
//! All scalar kernels come from
//! [`numerical_stability`](crate::optimization::numerical_stability), so
//! boundary values produce large finite coordinates instead of ±∞.
//!
//! Conventions
//! -----------
//! - Both directions take the parameter list as the first argument; the
//!   transform of entry `i` is decided by `params[i]` and applied to the
//!   `i`-th vector entry. Fixed parameters pass through unchanged in
//!   both directions, so a full real-line vector keeps fixed values at
//!   their original positions.
//! - [`to_real_line`] validates containment; [`to_model_space`] always
//!   produces in-support values by construction and only checks length.
//! - [`update_to_model_space`] is the in-place model-mutating variant:
//!   it maps a real-line vector and installs the result into the model.
use crate::{
    model::{
        errors::{ModelError, ModelResult},
        parameter::Parameter,
        structural::StructuralModel,
    },
    optimization::numerical_stability::transformations::{
        LOGIT_EPS, safe_logistic, safe_logit, safe_softplus, safe_softplus_inv,
    },
};
use ndarray::Array1;

/// Map one model-space scalar onto the real line.
fn real_of(param: &Parameter, x: f64) -> f64 {
    if param.fixed {
        return x;
    }
    let (lower, upper) = param.bounds;
    match (lower.is_finite(), upper.is_finite()) {
        (true, true) => safe_logit((x - lower) / (upper - lower)),
        (true, false) => safe_softplus_inv((x - lower).max(LOGIT_EPS)),
        (false, true) => safe_softplus_inv((upper - x).max(LOGIT_EPS)),
        (false, false) => x,
    }
}

/// Map one real-line scalar back into model space.
fn model_of(param: &Parameter, y: f64) -> f64 {
    if param.fixed {
        return y;
    }
    let (lower, upper) = param.bounds;
    match (lower.is_finite(), upper.is_finite()) {
        (true, true) => lower + (upper - lower) * safe_logistic(y),
        (true, false) => lower + safe_softplus(y),
        (false, true) => upper - safe_softplus(y),
        (false, false) => y,
    }
}

/// Transform a full model-space vector onto the real line.
///
/// Entry `i` is transformed according to `params[i]`; fixed entries pass
/// through unchanged.
///
/// # Errors
/// - [`ModelError::DimensionMismatch`] when the vector length differs
///   from the parameter count.
/// - [`ModelError::ValueOutsideBounds`] when a free entry escapes its
///   support (boundary values are tolerated through clamping).
pub fn to_real_line(params: &[Parameter], model_space: &Array1<f64>) -> ModelResult<Array1<f64>> {
    if model_space.len() != params.len() {
        return Err(ModelError::DimensionMismatch {
            expected: params.len(),
            actual: model_space.len(),
        });
    }
    for (param, &x) in params.iter().zip(model_space.iter()) {
        if !param.fixed && !param.contains(x) {
            let (lower, upper) = param.bounds;
            return Err(ModelError::ValueOutsideBounds { value: x, lower, upper });
        }
    }
    Ok(Array1::from_iter(
        params.iter().zip(model_space.iter()).map(|(p, &x)| real_of(p, x)),
    ))
}

/// Transform a full real-line vector back into model space.
///
/// The result is in-support by construction for every free entry; fixed
/// entries pass through unchanged.
///
/// # Errors
/// - [`ModelError::DimensionMismatch`] when the vector length differs
///   from the parameter count.
pub fn to_model_space(params: &[Parameter], real_line: &Array1<f64>) -> ModelResult<Array1<f64>> {
    if real_line.len() != params.len() {
        return Err(ModelError::DimensionMismatch {
            expected: params.len(),
            actual: real_line.len(),
        });
    }
    Ok(Array1::from_iter(
        params.iter().zip(real_line.iter()).map(|(p, &y)| model_of(p, y)),
    ))
}

/// In-place model-mutating variant of [`to_model_space`].
///
/// Maps `real_line` into model space using the model's own parameter
/// list and installs the result via
/// [`StructuralModel::update`], leaving the model re-materialized at
/// that point. Returns the installed model-space vector.
///
/// # Errors
/// - Propagates length errors from the transform and any error raised by
///   `update`.
pub fn update_to_model_space<M: StructuralModel>(
    model: &mut M, real_line: &Array1<f64>,
) -> ModelResult<Array1<f64>> {
    let candidate = to_model_space(model.parameters(), real_line)?;
    model.update(&candidate)?;
    Ok(candidate)
}
