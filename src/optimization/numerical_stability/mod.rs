//! numerical_stability — numerically robust scalar transforms.
//!
//! Purpose
//! -------
//! Collect the guarded scalar kernels used by the bounded-parameter
//! reparametrization (softplus and logistic pairs) together with the
//! small shared tolerances (`GENERAL_TOL`, `LOGIT_EPS`). Centralizing
//! these lets the transform and optimizer layers assume well-conditioned
//! `f64` arithmetic without repeating overflow guards at every call site.
//!
//! Key behaviors
//! -------------
//! - Provide stable scalar transforms (`safe_softplus`, its inverse,
//!   `safe_logistic`, and `safe_logit`) for mapping unconstrained reals
//!   into strictly positive or (0, 1) quantities and back.
//! - Centralize the numeric tolerances shared by transform round-trip
//!   checks and boundary clamping.
//!
//! Invariants & assumptions
//! ------------------------
//! - All public transforms assume finite `f64` inputs; domain validation
//!   (e.g., bound containment) is enforced in the model and optimizer
//!   layers, not here.
//! - `safe_logit` clamps its argument into `[LOGIT_EPS, 1 - LOGIT_EPS]`,
//!   so boundary proportions yield large finite logits rather than ±∞.
//!
//! Conventions
//! -----------
//! - These routines are pure scalar helpers: no logging, no I/O, no
//!   global state, suitable for tight inner loops.
//! - Vector-level bound transforms are built on top of these kernels in
//!   `model::transforms`.
//!
//! Downstream usage
//! ----------------
//! - `model::transforms` composes these kernels per parameter according
//!   to its bound pattern (two-sided, one-sided, unbounded).
//! - Tests across the crate reuse `GENERAL_TOL` as the round-trip
//!   comparison threshold.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`transformations`] cover agreement with naïve
//!   formulas on safe grids, round-trip consistency, tail stability,
//!   and boundary clamping.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{
    GENERAL_TOL, LOGIT_EPS, safe_logistic, safe_logit, safe_softplus, safe_softplus_inv,
};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use posterior_mode::optimization::numerical_stability::prelude::*;
//
// to import the main numerical-stability surface in a single line.

pub mod prelude {
    pub use super::transformations::{
        GENERAL_TOL, LOGIT_EPS, safe_logistic, safe_logit, safe_softplus, safe_softplus_inv,
    };
}
