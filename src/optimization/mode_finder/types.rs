//! mode_finder::types — shared numeric aliases and solver wiring.
//!
//! Purpose
//! -------
//! Centralize the core numeric types and solver aliases used by the
//! posterior-mode finder. By defining these in one place, the rest of
//! the optimization code can stay agnostic to `ndarray` and Argmin
//! generics and can more easily evolve if the backend changes.
//!
//! Key behaviors
//! -------------
//! - Define canonical aliases for full and free parameter vectors,
//!   gradients, curvature matrices, and scalar costs.
//! - Provide a standard map type for Argmin function-evaluation counters
//!   (`FnEvalMap`).
//! - Expose pre-wired solver aliases for the two supported backends,
//!   using the common `(FreeVector, Gradient, Cost)` numeric shapes.
//! - Pin the shared numeric constants of the driver: the disfavoring
//!   objective value for unsolvable points and the backend defaults.
//!
//! Invariants & assumptions
//! ------------------------
//! - All optimizer vectors and matrices are represented as `ndarray`
//!   containers over `f64`.
//! - `Cost` is the negated log posterior; higher layers handle the sign
//!   flip back to posterior space.
//! - The solver aliases assume Argmin's generic forms as of the pinned
//!   Argmin version.
//!
//! Conventions
//! -----------
//! - [`FullVector`] is indexed identically to the model's parameter
//!   list; [`FreeVector`] is its projection onto free positions in the
//!   same relative order.
//! - [`CurvatureMatrix`] is dense and square: free x free when produced
//!   by a backend, full x full after reconstruction.
//! - This module defines no runtime behavior beyond what `ndarray` and
//!   Argmin require when these types are instantiated elsewhere.
//!
//! Downstream usage
//! ----------------
//! - Other mode-finder modules import these aliases instead of referring
//!   directly to `ndarray` or Argmin generics.
//! - Builders construct concrete solver instances via [`QuasiNewton`]
//!   and [`Annealer`].
//!
//! Testing notes
//! -------------
//! - This module only defines type aliases and constants; there are no
//!   dedicated unit tests. Correctness is exercised indirectly by the
//!   surrounding optimizer modules.
use argmin::solver::{
    linesearch::MoreThuenteLineSearch, quasinewton::BFGS, simulatedannealing::SimulatedAnnealing,
};
use ndarray::{Array1, Array2};
use rand_xoshiro::Xoshiro256PlusPlus;
use std::collections::HashMap;

/// Full model-space or real-line parameter vector, indexed identically
/// to the model's parameter list.
///
/// Alias for `ndarray::Array1<f64>`.
pub type FullVector = Array1<f64>;

/// Projection of a [`FullVector`] onto free-parameter positions, in the
/// same relative order.
///
/// Alias for `ndarray::Array1<f64>`.
pub type FreeVector = Array1<f64>;

/// Ordered positions in a [`FullVector`] that correspond to free
/// parameters. Computed once per run and stable for its duration.
pub type FreeIndexSet = Vec<usize>;

/// Gradient of the scalar objective with respect to a [`FreeVector`].
///
/// Alias for `ndarray::Array1<f64>`, matching the free-vector shape.
pub type Grad = Array1<f64>;

/// Dense curvature (Hessian-like) matrix.
///
/// Alias for `ndarray::Array2<f64>`; free x free from a backend,
/// full x full after reconstruction.
pub type CurvatureMatrix = Array2<f64>;

/// Scalar objective value used by the optimizer: the negated log
/// posterior.
pub type Cost = f64;

/// Function-evaluation counters as reported by the solver.
///
/// Maps human-readable counter names (e.g., `"cost_count"`) to counts.
pub type FnEvalMap = HashMap<String, u64>;

/// Objective value assigned to points where the model fails to solve
/// during error-tolerant evaluation.
///
/// Large enough that any solvable point is preferred, but finite so
/// finite-difference gradients and annealing acceptance arithmetic stay
/// well defined.
pub const BAD_EVAL_COST: Cost = 1e10;

/// Default scale of the initial inverse curvature matrix
/// `h0_scale * I` handed to the quasi-Newton backend.
pub const DEFAULT_H0_SCALE: f64 = 1e-4;

/// Default neighbor-proposal step-scale constant (`cc`).
pub const DEFAULT_STEP_SCALE: f64 = 0.01;

/// Default annealing start temperature.
pub const DEFAULT_TEMPERATURE: f64 = 100.0;

/// More-Thuente line search specialized to this crate's numeric types.
pub type MoreThuenteLS = MoreThuenteLineSearch<FreeVector, Grad, Cost>;

/// Quasi-Newton (BFGS) solver wired to the More-Thuente line search.
pub type QuasiNewton = BFGS<MoreThuenteLS, Cost>;

/// Simulated-annealing solver with its acceptance RNG.
///
/// The generator is seeded from the model's RNG handle by the builder,
/// keeping stochastic runs reproducible per model instance.
pub type Annealer = SimulatedAnnealing<Cost, Xoshiro256PlusPlus>;
