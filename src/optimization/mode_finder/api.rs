//! High-level entry point for posterior-mode search.
//!
//! This builds the objective adapter over a model and dataset, gathers
//! the initial free iterate from the model's current parameters,
//! dispatches to the configured backend, and lifts the free-space result
//! back to full parameter space.
use crate::{
    model::structural::StructuralModel,
    optimization::{
        errors::OptResult,
        mode_finder::{
            adapter::PosteriorCost,
            builders::{build_annealer, build_quasi_newton},
            reconstruct,
            run::{run_annealing, run_quasi_newton},
            traits::{Method, ModeOptions, ModeResult},
        },
    },
};

/// Find the posterior-maximizing parameter vector of a structural model.
///
/// # Behavior
/// - Snapshots the model's parameters (free indices, bounds) and maps
///   its current values onto the real line; the free projection is the
///   backend's starting point.
/// - Dispatches on `opts.method`:
///   - [`Method::Bfgs`]: quasi-Newton minimization of the negated
///     posterior, seeded with the inverse curvature `h0_scale * I`.
///   - [`Method::SimulatedAnnealing`]: stochastic search whose candidate
///     steps come from the solve-checked neighbor-proposal generator and
///     whose acceptance RNG is seeded from the model's generator.
/// - Lifts the result to full dimension: fixed parameters reappear at
///   their original positions, and the full Hessian carries structural
///   zeros at fixed rows/columns. The model is left re-materialized at
///   the mode.
///
/// Unsupported method names never reach this function: they fail at
/// [`Method::from_str`] time, before any model access.
///
/// # Parameters
/// - `model`: the structural model; mutated in place throughout the run.
/// - `data`: observed dataset passed through to the posterior evaluator.
/// - `opts`: validated driver options.
///
/// # Errors
/// - Propagates adapter-construction errors (no free parameters, current
///   values outside their support).
/// - Propagates builder, runtime, and reconstruction errors. Recoverable
///   solve failures never surface here; they are absorbed by the
///   error-tolerant objective and the proposal loop.
///
/// # Example
/// ```ignore
/// let opts = ModeOptions { method: "bfgs".parse()?, ..ModeOptions::default() };
/// let result = find_mode(&mut model, &data, &opts)?;
/// println!("mode: {:?}", result.minimizer_model);
/// ```
pub fn find_mode<M: StructuralModel>(
    model: &mut M, data: &M::Data, opts: &ModeOptions,
) -> OptResult<ModeResult> {
    let problem = PosteriorCost::new(model, data, opts)?;
    let x0 = problem.initial_free();
    let (outcome, problem) = match opts.method {
        Method::Bfgs => {
            let solver = build_quasi_newton(opts)?;
            run_quasi_newton(x0, opts, problem, solver)?
        }
        Method::SimulatedAnnealing => {
            let solver = build_annealer(opts, &problem.rng)?;
            run_annealing(x0, opts, problem, solver)?
        }
    };
    reconstruct::lift(&problem, outcome)
}
