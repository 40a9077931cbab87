//! mode_finder::finite_diff — finite-difference gradient and curvature
//! helpers.
//!
//! Purpose
//! -------
//! Provide finite-difference gradient and curvature approximations
//! around a free parameter vector, together with validation and symmetry
//! cleanup, so the rest of the mode finder can request derivatives
//! without depending directly on the `finitediff` API.
//!
//! Key behaviors
//! -------------
//! - Compute forward-difference gradients with error capture and
//!   post-hoc validation via [`run_fd_diff`].
//! - Construct central-difference curvature matrices, falling back to
//!   forward differences when validation fails, via
//!   [`compute_curvature`]. This supplies the free-space curvature
//!   estimate for the stochastic backend, which has no curvature of its
//!   own.
//! - Enforce symmetry of curvature matrices in-place using
//!   [`symmetrize`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Free vectors, gradients, and curvature matrices are `ndarray`
//!   containers over `f64`.
//! - Any error raised by the objective during finite differencing is
//!   routed into the shared `closure_err` cell and treated as a hard
//!   failure for the computation.
//! - Matrices returned from this module satisfy
//!   [`validate_curvature`](crate::optimization::mode_finder::validation::validate_curvature)
//!   on the chosen finite-difference path.
//!
//! Conventions
//! -----------
//! - Finite differences are taken with respect to the free real-line
//!   vector; the bounded reparametrization is handled by higher layers.
//! - Central differences are preferred; forward differences are a
//!   fallback when the central approximation fails validation.
use crate::optimization::{
    errors::OptResult,
    mode_finder::{
        types::{CurvatureMatrix, FreeVector, Grad},
        validation::{validate_curvature, validate_gradient},
    },
};
use argmin::core::Error;
use finitediff::FiniteDiff;
use std::cell::RefCell;

/// Forward-difference gradient with error capture and validation.
///
/// The FD closure can't return `Result`, so any error raised by `func`
/// is stored into `closure_err` and the closure returns `NaN`. This
/// helper:
/// - clears `closure_err`,
/// - performs `forward_diff`,
/// - if an error was captured, returns it as `Err`,
/// - validates the resulting gradient,
/// - if validation succeeds, returns the gradient as `Ok(grad)`.
///
/// # Errors
/// Returns any error captured during evaluation of `func` inside the FD
/// routine or by validation of the resulting gradient.
pub fn run_fd_diff<G: Fn(&FreeVector) -> f64>(
    x: &FreeVector, func: &G, closure_err: &RefCell<Option<Error>>,
) -> OptResult<Grad> {
    closure_err.replace(None);
    let fd_grad = x.forward_diff(func);
    let dim = x.len();
    if let Some(err) = closure_err.take() {
        return Err(err.into());
    }
    validate_gradient(&fd_grad, dim)?;
    Ok(fd_grad)
}

/// Finite-difference curvature of a gradient map, with validation and
/// symmetry.
///
/// Approximates the curvature of the objective at `x` by differencing
/// the supplied gradient function, preferring a central-difference
/// scheme and falling back to forward differences when validation
/// fails. The resulting matrix is symmetrized in-place before being
/// returned.
///
/// # Parameters
/// - `f`: gradient map `x ↦ ∇c(x)` of the scalar objective.
/// - `x`: free real-line point; its length defines the matrix dimension.
///
/// # Errors
/// - `OptError::HessianDimMismatch` / `OptError::InvalidHessian` when
///   both finite-difference paths fail validation.
pub fn compute_curvature<F: Fn(&FreeVector) -> Grad>(
    f: &F, x: &FreeVector,
) -> OptResult<CurvatureMatrix> {
    let dim = x.len();
    let mut central = x.central_hessian(f);
    match validate_curvature(&central, dim) {
        Ok(_) => {
            symmetrize(&mut central);
            Ok(central)
        }
        Err(_) => {
            let mut forward = x.forward_hessian(f);
            validate_curvature(&forward, dim)?;
            symmetrize(&mut forward);
            Ok(forward)
        }
    }
}

// ---- Helper methods ----

/// Enforce symmetry of a curvature matrix in-place.
///
/// Replaces each off-diagonal pair `(i, j)` / `(j, i)` with their
/// average; the diagonal is left untouched. Called only after the matrix
/// has passed validation, so no shape or finiteness checks are repeated
/// here.
fn symmetrize(matrix: &mut CurvatureMatrix) {
    for i in 0..matrix.nrows() {
        for j in 0..i {
            let avg = 0.5 * (matrix[[i, j]] + matrix[[j, i]]);
            matrix[[i, j]] = avg;
            matrix[[j, i]] = avg;
        }
    }
}
