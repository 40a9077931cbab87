//! The structural-model collaborator trait consumed by the mode finder.
//!
//! Purpose
//! -------
//! Define the surface a structural (DSGE-style) statistical model must
//! expose so the optimization driver can search its posterior: an
//! ordered parameter list, in-place installation of candidate vectors,
//! a typed solve operation, a posterior evaluator, a prior sampler, and
//! an explicit random-source handle. The driver orchestrates these; it
//! never looks inside the model's equation system.
//!
//! Key behaviors
//! -------------
//! - `parameters()` is the single source of truth for ordering, fixed
//!   flags, and bounds; every vector the driver produces or consumes is
//!   indexed identically to it.
//! - `update` installs a full model-space candidate vector, mutating the
//!   model in place. `solve` re-derives the model's internal solution at
//!   the currently installed parameters and reports failure as a typed
//!   [`SolveError`] so callers can branch on the kind instead of
//!   pattern-matching error strings.
//! - `posterior` evaluates the (log) posterior density for a dataset at
//!   the currently installed parameters, solving internally as needed.
//! - `sample_prior` produces a matrix of prior draws used by the
//!   stochastic backend to scale neighbor proposals.
//! - `rng` hands out the model-owned pseudo-random generator as an
//!   explicit, shareable handle, keeping stochastic search reproducible
//!   per model instance.
//!
//! Invariants & assumptions
//! ------------------------
//! - The fixed/free status and bounds of every parameter are stable for
//!   the duration of one optimization run.
//! - `update` and `posterior` mutate model state; callers must not
//!   assume pre-call parameter state survives an evaluation.
//! - Models are not shared across concurrent optimization runs; all
//!   driver access is single-threaded and synchronous.
//!
//! Conventions
//! -----------
//! - All vectors are `ndarray::Array1<f64>` in model space unless a
//!   function says otherwise; the real-line reparametrization is applied
//!   by the driver through `model::transforms`.
//! - `sample_prior` returns a `(n_parameters, n_draws)` matrix: rows are
//!   parameters, columns are independent prior draws.
//! - Recoverable failures travel as `SolveError`; anything else is a
//!   `ModelError` and aborts the optimization run unmodified.
//!
//! Downstream usage
//! ----------------
//! - Model crates implement this trait for their types and call
//!   [`find_mode`](crate::optimization::mode_finder::find_mode) with a
//!   dataset and [`ModeOptions`](crate::optimization::mode_finder::ModeOptions).
//! - The optimizer adapter wraps a `&mut` model behind interior
//!   mutability; implementations never need to be `Sync`.
//!
//! Testing notes
//! -------------
//! - The crate's unit and integration tests implement this trait for
//!   small analytic models (quadratic posteriors with known modes,
//!   solve-failure injection) rather than mocking individual methods.
use crate::model::{
    errors::{ModelResult, SolveError},
    parameter::Parameter,
};
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use std::sync::{Arc, Mutex};

/// Surface a structural statistical model exposes to the mode finder.
///
/// See the module documentation for the contract of each method. The
/// provided counting methods derive from `parameters()` and rarely need
/// overriding.
pub trait StructuralModel {
    /// Observed dataset consumed by the posterior evaluator.
    type Data;

    /// Ordered parameter list; the index space of every full vector.
    fn parameters(&self) -> &[Parameter];

    /// Total parameter count.
    fn n_parameters(&self) -> usize {
        self.parameters().len()
    }

    /// Count of parameters the optimizer may vary.
    fn n_parameters_free(&self) -> usize {
        self.parameters().iter().filter(|p| !p.fixed).count()
    }

    /// Install a full model-space candidate vector in place.
    ///
    /// # Errors
    /// - [`ModelError::DimensionMismatch`](crate::model::errors::ModelError::DimensionMismatch)
    ///   when the candidate length differs from `n_parameters()`.
    /// - `ModelError::Solve(SolveError::BoundsViolation { .. })` when a
    ///   free entry escapes its support.
    fn update(&mut self, candidate: &Array1<f64>) -> ModelResult<()>;

    /// Re-derive the model's internal solution at the installed
    /// parameters.
    ///
    /// # Errors
    /// A typed [`SolveError`] naming the failure kind; the driver treats
    /// both kinds as recoverable in its proposal loop.
    fn solve(&mut self) -> Result<(), SolveError>;

    /// Evaluate the log posterior density for `data` at the installed
    /// parameters, solving internally as needed.
    ///
    /// # Errors
    /// - `ModelError::Solve(_)` when the model cannot be solved at the
    ///   installed point (classified as recoverable by the driver).
    /// - Any other `ModelError` for unexpected evaluation failures
    ///   (propagated unmodified by the driver).
    fn posterior(&mut self, data: &Self::Data) -> ModelResult<f64>;

    /// Draw a `(n_parameters, n_draws)` matrix of prior samples.
    ///
    /// Rows are parameters (fixed rows may be constant), columns are
    /// independent draws. The stochastic backend derives per-parameter
    /// step scales from the sample covariance of this matrix.
    fn sample_prior(&mut self, rng: &mut StdRng) -> ModelResult<Array2<f64>>;

    /// The model-owned pseudo-random generator handle.
    ///
    /// The driver threads this explicitly into neighbor proposals, prior
    /// sampling, and the annealing backend so stochastic search is
    /// reproducible per model instance. The handle is not safeguarded
    /// against concurrent reuse.
    fn rng(&self) -> Arc<Mutex<StdRng>>;
}
