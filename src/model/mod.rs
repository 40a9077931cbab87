//! model — the structural-model collaborator surface.
//!
//! Purpose
//! -------
//! Define everything the mode finder needs to know about a structural
//! statistical model without knowing the model itself: the scalar
//! [`Parameter`] descriptor (value, fixed flag, bounds), the
//! [`StructuralModel`] trait (update/solve/posterior/prior-sampling and
//! the model-owned RNG handle), typed error kinds separating recoverable
//! solve failures from everything else, and the bound-preserving
//! transforms between model space and the unconstrained real line.
//!
//! Key behaviors
//! -------------
//! - Parameters are owned by the model; the driver reads flags and
//!   bounds and overwrites values in place, never creating or destroying
//!   entries.
//! - `solve` reports failure as a typed [`SolveError`] so the proposal
//!   loop can branch on the kind; unexpected failures travel as
//!   [`ModelError`] and abort a run unmodified.
//! - Transforms are chosen per parameter from its bound pattern and are
//!   identity for fixed parameters, so full vectors keep fixed values in
//!   place in either coordinate system.
//!
//! Downstream usage
//! ----------------
//! - Implement [`StructuralModel`] for a concrete model type, then call
//!   [`find_mode`](crate::optimization::mode_finder::find_mode).
//! - The optimizer layer consumes this module exclusively through the
//!   trait and the transform functions.
//!
//! Testing notes
//! -------------
//! - Unit tests cover parameter validation and transform round trips;
//!   trait behavior is exercised end-to-end by the integration pipeline
//!   with small analytic models.

pub mod errors;
pub mod parameter;
pub mod structural;
pub mod transforms;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{ModelError, ModelResult, SolveError};
pub use self::parameter::Parameter;
pub use self::structural::StructuralModel;
pub use self::transforms::{to_model_space, to_real_line, update_to_model_space};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use posterior_mode::model::prelude::*;
//
// to import the main model surface in a single line.

pub mod prelude {
    pub use super::errors::{ModelError, ModelResult, SolveError};
    pub use super::parameter::Parameter;
    pub use super::structural::StructuralModel;
    pub use super::transforms::{to_model_space, to_real_line, update_to_model_space};
}
