//! mode_finder — constrained posterior-mode search over structural
//! models.
//!
//! Purpose
//! -------
//! Provide the driver that lets a *generic* optimizer maximize the
//! posterior of a structural model whose parameters may be fixed or
//! bounded. Callers implement
//! [`StructuralModel`](crate::model::StructuralModel) and invoke
//! [`find_mode`]; the driver handles the free-parameter view, the
//! real-line reparametrization, error-tolerant objective evaluation,
//! solve-checked neighbor proposals for stochastic search, backend
//! dispatch, and reconstruction of full-dimension results.
//!
//! Key behaviors
//! -------------
//! - Convert the model's posterior into a scalar minimization objective
//!   over free real-line coordinates via [`adapter::PosteriorCost`],
//!   mapping solve failures to a large finite disfavoring value instead
//!   of raising.
//! - Expose a single user-facing entrypoint [`find_mode`] that:
//!   - snapshots the free-parameter view ([`view::EvalContext`]),
//!   - selects a backend from [`Method`] (quasi-Newton or simulated
//!     annealing) built by [`builders`],
//!   - executes it via [`run`], and
//!   - lifts the result to full dimension via [`reconstruct`],
//!     embedding the free curvature block into a full matrix with
//!     structural zeros at fixed positions.
//! - Guarantee, through the `Anneal` implementation in [`neighbor`],
//!   that stochastic candidate steps always correspond to model
//!   configurations that solve.
//! - Centralize configuration ([`ModeOptions`], [`Tolerances`],
//!   [`TraceOptions`]) and validation ([`validation`]) so downstream
//!   code can assume sane, finite inputs.
//!
//! Invariants & assumptions
//! ------------------------
//! - The driver **always maximizes** a posterior by minimizing its
//!   negation; user-facing values ([`ModeOutcome::value`]) are posterior
//!   values.
//! - Fixed/free status and bounds are stable for the duration of a run.
//! - The model is mutated in place by every evaluation and proposal
//!   check; there is no rollback when an unclassified failure aborts a
//!   run mid-evaluation.
//! - Execution is single-threaded and synchronous; one model instance
//!   must not be shared across concurrent runs.
//!
//! Conventions
//! -----------
//! - Backends operate on [`types::FreeVector`] in real-line coordinates;
//!   all bound handling happens in `model::transforms`.
//! - Errors bubble up as [`OptResult`](crate::optimization::errors::OptResult) /
//!   [`OptError`](crate::optimization::errors::OptError); recoverable
//!   solve failures are consumed internally and never surface to the
//!   caller.
//!
//! Downstream usage
//! ----------------
//! - Model crates implement `StructuralModel`, then call [`find_mode`]
//!   with a dataset and [`ModeOptions`] (parse backend tags via
//!   [`Method::from_str`]).
//! - Front-ends are expected to interact only with the re-exported
//!   surface: [`find_mode`], [`Method`], [`ModeOptions`],
//!   [`Tolerances`], [`TraceOptions`], [`ModeOutcome`], [`ModeResult`],
//!   plus the numeric aliases from [`types`].
//!
//! Testing notes
//! -------------
//! - Unit tests in submodules cover the free-parameter view, the
//!   error-tolerant adapter, solve-checked proposals, solver wiring,
//!   trace recording, and reconstruction invariants.
//! - The integration pipeline exercises [`find_mode`] end to end on
//!   analytic models under both backends.

pub mod adapter;
pub mod api;
pub mod builders;
pub mod finite_diff;
pub mod neighbor;
pub mod reconstruct;
pub mod run;
pub mod trace;
pub mod traits;
pub mod types;
pub mod validation;
pub mod view;

#[cfg(test)]
pub mod fixtures;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::find_mode;
pub use self::trace::TraceEntry;
pub use self::traits::{Method, ModeOptions, ModeOutcome, ModeResult, Tolerances, TraceOptions};
pub use self::types::{
    BAD_EVAL_COST, Cost, CurvatureMatrix, FnEvalMap, FreeIndexSet, FreeVector, FullVector, Grad,
};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use posterior_mode::optimization::mode_finder::prelude::*;
//
// to import the main mode-finder surface in a single line.

pub mod prelude {
    pub use super::api::find_mode;
    pub use super::traits::{
        Method, ModeOptions, ModeOutcome, ModeResult, Tolerances, TraceOptions,
    };
    pub use super::types::{Cost, CurvatureMatrix, FreeVector, FullVector, Grad};
}
