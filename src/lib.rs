//! posterior_mode — constrained posterior-mode estimation for structural
//! statistical models.
//!
//! Purpose
//! -------
//! Serve as the crate root for the posterior-mode driver: the layer
//! between a structural (DSGE-style) model abstraction — which knows how
//! to solve itself and evaluate a posterior density — and generic
//! numerical optimizers. The crate owns the transformation, dispatch,
//! and recovery logic that lets a generic optimizer work correctly on a
//! model with fixed parameters, bounded parameters requiring a real-line
//! reparametrization, and a neighbor-proposal mechanism for
//! derivative-free search that rejects candidates the model cannot
//! solve.
//!
//! Key behaviors
//! -------------
//! - Re-export the two public layers: [`model`] (the collaborator
//!   surface a structural model implements) and [`optimization`] (the
//!   mode finder, numerical helpers, and error surface).
//! - Keep all heavy lifting in the inner modules; this file is module
//!   wiring only.
//!
//! Invariants & assumptions
//! ------------------------
//! - Execution is single-threaded and synchronous; a model instance is
//!   never shared across concurrent optimization runs.
//! - Randomness is always threaded through explicit handles owned by
//!   the model, never global state.
//!
//! Downstream usage
//! ----------------
//! - Implement [`model::StructuralModel`] for a concrete model, then
//!   call [`optimization::mode_finder::find_mode`] with a dataset and
//!   [`optimization::mode_finder::ModeOptions`].
//! - The typical import is `use posterior_mode::prelude::*;`.
//!
//! Testing notes
//! -------------
//! - Core behavior is covered by unit tests in the inner modules and by
//!   the integration pipeline under `tests/`, which drives both
//!   backends end to end on analytic models.

pub mod model;
pub mod optimization;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use posterior_mode::prelude::*;
//
// to import the main crate surface in a single line.

pub mod prelude {
    pub use crate::model::prelude::*;
    pub use crate::optimization::prelude::*;
}
