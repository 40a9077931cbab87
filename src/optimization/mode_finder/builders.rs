//! mode_finder::builders — backend solver construction helpers.
//!
//! Purpose
//! -------
//! Provide small, focused builders for the two supported backends. These
//! helpers hide Argmin's generic wiring and apply crate-level options
//! (tolerances, temperature, RNG seeding) so higher-level code can
//! request a configured solver without touching Argmin-specific types.
//!
//! Key behaviors
//! -------------
//! - Construct the quasi-Newton (BFGS) solver with a More-Thuente line
//!   search and the configured gradient/objective tolerances.
//! - Construct the simulated-annealing solver with the configured start
//!   temperature and an acceptance RNG seeded from the model's
//!   generator handle, so stochastic runs stay reproducible per model
//!   instance.
//! - Leave the initial parameter vector, initial inverse curvature, and
//!   iteration cap to the runner/executor layer, keeping these builders
//!   side-effect free.
//!
//! Invariants & assumptions
//! ------------------------
//! - All solvers operate on the canonical numeric types
//!   [`FreeVector`](crate::optimization::mode_finder::types::FreeVector),
//!   [`Grad`](crate::optimization::mode_finder::types::Grad), and
//!   [`Cost`](crate::optimization::mode_finder::types::Cost).
//! - Options have been validated by [`ModeOptions::new`]; any residual
//!   invalid tolerance rejected by Argmin surfaces as an
//!   [`OptError`](crate::optimization::errors::OptError) via the crate's
//!   `From<Error>` implementation.
//!
//! Conventions
//! -----------
//! - The builders do **not** set the initial iterate or `max_iters`;
//!   these are treated as runtime concerns and are applied by the
//!   runners.
//! - Errors are always reported via `OptResult`; raw
//!   `argmin::core::Error` values never leak across module boundaries.
use crate::optimization::{
    errors::OptResult,
    mode_finder::{
        traits::ModeOptions,
        types::{Annealer, MoreThuenteLS, QuasiNewton},
    },
};
use argmin::solver::simulatedannealing::SATempFunc;
use rand::{Rng, SeedableRng, rngs::StdRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use std::sync::{Arc, Mutex};

/// Construct the quasi-Newton backend (BFGS + More-Thuente line search).
///
/// Applies `tols.grtol` and `tols.ftol` from the options; the initial
/// iterate and inverse curvature `h0_scale * I` are applied later by the
/// runner.
///
/// # Errors
/// - `OptError` (via `From<argmin::core::Error>`) if Argmin rejects a
///   tolerance.
pub fn build_quasi_newton(opts: &ModeOptions) -> OptResult<QuasiNewton> {
    let linesearch = MoreThuenteLS::new();
    let solver = QuasiNewton::new(linesearch)
        .with_tolerance_grad(opts.tols.grtol)?
        .with_tolerance_cost(opts.tols.ftol)?;
    Ok(solver)
}

/// Construct the simulated-annealing backend.
///
/// The acceptance RNG is seeded from the model's generator handle, so a
/// given model instance reproduces its stochastic search. Cooling
/// follows the Boltzmann schedule; termination is governed by the
/// runner's iteration cap.
///
/// # Errors
/// - `OptError` (via `From<argmin::core::Error>`) if Argmin rejects the
///   start temperature.
pub fn build_annealer(opts: &ModeOptions, rng: &Arc<Mutex<StdRng>>) -> OptResult<Annealer> {
    let seed: u64 = rng.lock().expect("model RNG handle poisoned").gen();
    let acceptance_rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let solver = Annealer::new_with_rng(opts.initial_temperature, acceptance_rng)?
        .with_temp_func(SATempFunc::Boltzmann);
    Ok(solver)
}
