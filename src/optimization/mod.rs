//! optimization — mode-finder stack, numerical helpers, and unified
//! error surface.
//!
//! Purpose
//! -------
//! Provide a cohesive optimization layer for posterior-mode estimation,
//! combining an Argmin-backed mode finder, numerically stable scalar
//! transforms, and a single error/result surface. Callers implement a
//! structural model, choose a backend and tolerances, and obtain a
//! full-dimension mode and curvature without touching backend solver
//! details.
//!
//! Key behaviors
//! -------------
//! - Expose a high-level API for **maximizing posteriors**
//!   (`mode_finder`), including backend selection, stopping criteria,
//!   and per-iteration tracing.
//! - Supply shared numerical primitives (`numerical_stability`) used by
//!   the bounded-parameter reparametrization.
//! - Normalize configuration issues, numerical failures, model failures,
//!   and backend solver errors into a single enum (`errors::OptError`)
//!   with a common result alias (`OptResult<T>`).
//!
//! Invariants & assumptions
//! ------------------------
//! - Backends operate in an unconstrained parameter space and assume
//!   that inputs are finite once validation has passed; invalid states
//!   are reported as `OptError`, not panics.
//! - Models are expected to report solve failures as typed, recoverable
//!   errors; the optimization layer consumes those internally (retry or
//!   disfavoring objective value) and propagates everything else.
//!
//! Conventions
//! -----------
//! - All solvers conceptually maximize a posterior by minimizing its
//!   negation; user-facing APIs and outcomes are expressed in posterior
//!   terms.
//! - Parameters, gradients, and curvature matrices are represented
//!   using `ndarray`-based aliases (`FullVector`, `FreeVector`, `Grad`,
//!   `CurvatureMatrix`); the mapping between bounded model space and
//!   the real line is handled by `model::transforms`.
//! - Public optimization entrypoints that can fail return
//!   `OptResult<T>`; callers never see raw Argmin errors or
//!   model-specific error enums.
//!
//! Downstream usage
//! ----------------
//! - Model crates implement `StructuralModel` for their types and call
//!   `find_mode` with a dataset and `ModeOptions` to obtain a
//!   `ModeResult` (via `mode_finder`).
//! - Front-ends typically import the curated surface via
//!   `optimization::prelude::*`, which forwards the submodule preludes
//!   and the core error types.
//!
//! Testing notes
//! -------------
//! - Unit tests in the submodules focus on local concerns: solver
//!   wiring, tolerance handling, proposal guarantees, reconstruction
//!   invariants, and error conversions.
//! - Higher-level integration tests exercise end-to-end mode searches,
//!   verifying that configuration mistakes, numerical problems, and
//!   backend failures all surface as sensible `OptError` values and
//!   that successful runs produce stable `ModeResult`s.

pub mod errors;
pub mod mode_finder;
pub mod numerical_stability;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use posterior_mode::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::mode_finder::prelude::*;
    pub use super::numerical_stability::prelude::*;
}
