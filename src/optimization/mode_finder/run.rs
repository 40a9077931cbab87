//! Execution helpers that run an `argmin` backend on a posterior problem
//! and return a crate-friendly [`ModeOutcome`].
//!
//! Both runners wire up the adapter, the chosen solver, the initial
//! iterate, the iteration cap, and any requested observers, then execute
//! and normalize the terminal state. The adapter is handed back to the
//! caller so reconstruction can reuse its evaluation context and model
//! borrow.
//!
//! Curvature conventions:
//! - The quasi-Newton backend maintains an inverse curvature estimate in
//!   its state (seeded with `h0_scale * I`); the terminal estimate is
//!   reported as the outcome's curvature.
//! - The annealing backend carries no curvature of its own; a central
//!   finite-difference estimate is computed at the accepted minimum.
use crate::{
    model::structural::StructuralModel,
    optimization::{
        errors::{OptError, OptResult},
        mode_finder::{
            adapter::PosteriorCost,
            finite_diff::compute_curvature,
            trace::TraceRecorder,
            traits::{ModeOptions, ModeOutcome},
            types::{Annealer, CurvatureMatrix, FreeVector, Grad, QuasiNewton},
        },
    },
};
use argmin::core::{Executor, Gradient, State, observers::ObserverMode};
use ndarray::Array1;
use std::cell::RefCell;

/// Run the quasi-Newton backend.
///
/// Configures the executor with the initial iterate, the initial inverse
/// curvature `h0_scale * I`, and the iteration cap, attaches observers
/// per the trace options, runs to termination, and normalizes the state
/// into a [`ModeOutcome`] whose curvature is the backend's terminal
/// inverse-curvature estimate.
///
/// # Errors
/// - Propagates Argmin runtime errors (line-search failures, etc.) via
///   the crate's `From<argmin::core::Error>` conversion.
/// - [`OptError::MissingCurvature`] if the backend state lost its
///   estimate.
/// - Propagates validation errors from [`ModeOutcome::new`].
pub fn run_quasi_newton<'a, M: StructuralModel>(
    x0: FreeVector, opts: &ModeOptions, problem: PosteriorCost<'a, M>, solver: QuasiNewton,
) -> OptResult<(ModeOutcome, PosteriorCost<'a, M>)> {
    let n_free = x0.len();
    let h0: CurvatureMatrix = CurvatureMatrix::eye(n_free) * opts.h0_scale;
    let recorder = TraceRecorder::new(&opts.trace);
    let trace_handle = recorder.handle();

    let mut executor = Executor::new(problem, solver)
        .configure(|state| state.param(x0).inv_hessian(h0).max_iters(opts.iterations));
    if recorder.is_active() {
        executor = executor.add_observer(recorder, ObserverMode::Always);
    }
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        executor = executor
            .add_observer(argmin_observer_slog::SlogLogger::term_noblock(), ObserverMode::Always);
    }

    let mut result = executor.run()?;
    let problem = result.problem.take_problem().ok_or(OptError::UnknownError)?;
    let state = &mut result.state;

    let iterations = state.get_iter();
    let fn_evals = state.get_func_counts().clone();
    let termination = state.get_termination_status().clone();
    let value = -state.get_best_cost();
    let curvature = state.take_inv_hessian().ok_or(OptError::MissingCurvature)?;
    let minimum = state.take_best_param();
    let trace = opts.trace.store_trace.then(|| TraceRecorder::drain(&trace_handle));

    let outcome =
        ModeOutcome::new(minimum, value, curvature, termination, iterations, fn_evals, trace)?;
    Ok((outcome, problem))
}

/// Run the simulated-annealing backend.
///
/// Configures the executor with the initial iterate and the iteration
/// cap, attaches observers per the trace options, runs to termination,
/// and normalizes the state into a [`ModeOutcome`]. The curvature is a
/// central finite-difference estimate of the objective at the accepted
/// minimum (forward fallback per
/// [`compute_curvature`]); errors raised by the objective during that
/// estimation propagate in preference to the validation failure they
/// cause.
///
/// # Errors
/// - Propagates Argmin runtime errors, including non-recoverable
///   failures raised inside the neighbor-proposal loop.
/// - Propagates curvature-estimation and outcome-validation errors.
pub fn run_annealing<'a, M: StructuralModel>(
    x0: FreeVector, opts: &ModeOptions, problem: PosteriorCost<'a, M>, solver: Annealer,
) -> OptResult<(ModeOutcome, PosteriorCost<'a, M>)> {
    let recorder = TraceRecorder::new(&opts.trace);
    let trace_handle = recorder.handle();

    let mut executor = Executor::new(problem, solver)
        .configure(|state| state.param(x0).max_iters(opts.iterations));
    if recorder.is_active() {
        executor = executor.add_observer(recorder, ObserverMode::Always);
    }
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        executor = executor
            .add_observer(argmin_observer_slog::SlogLogger::term_noblock(), ObserverMode::Always);
    }

    let mut result = executor.run()?;
    let problem = result.problem.take_problem().ok_or(OptError::UnknownError)?;
    let state = &mut result.state;

    let iterations = state.get_iter();
    let fn_evals = state.get_func_counts().clone();
    let termination = state.get_termination_status().clone();
    let value = -state.get_best_cost();
    let minimum = state.take_best_param().ok_or(OptError::MissingMinimum)?;

    let closure_err: RefCell<Option<argmin::core::Error>> = RefCell::new(None);
    let grad_fn = |x: &FreeVector| -> Grad {
        match problem.gradient(x) {
            Ok(g) => g,
            Err(e) => {
                let mut slot = closure_err.borrow_mut();
                if slot.is_none() {
                    *slot = Some(e);
                }
                Array1::from_elem(x.len(), f64::NAN)
            }
        }
    };
    let curvature = match compute_curvature(&grad_fn, &minimum) {
        Ok(c) => c,
        Err(validation_err) => match closure_err.take() {
            Some(captured) => return Err(captured.into()),
            None => return Err(validation_err),
        },
    };
    let trace = opts.trace.store_trace.then(|| TraceRecorder::drain(&trace_handle));

    let outcome = ModeOutcome::new(
        Some(minimum),
        value,
        curvature,
        termination,
        iterations,
        fn_evals,
        trace,
    )?;
    Ok((outcome, problem))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::mode_finder::{
        builders::{build_annealer, build_quasi_newton},
        fixtures::{QuadraticModel, quadratic_data},
        traits::TraceOptions,
    };

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - A full quasi-Newton run on a smooth quadratic posterior,
    //   including convergence to the analytic mode and curvature shape.
    // - A short annealing run on a bounded model, including the
    //   finite-difference curvature estimate.
    // - Stored traces being surfaced through the outcome.
    //
    // They intentionally DO NOT cover:
    // - Reconstruction to full dimension (reconstruct.rs / api tests).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that the quasi-Newton runner converges to the analytic mode
    // of a 2-parameter quadratic posterior.
    //
    // Given
    // -----
    // - An unbounded quadratic model with mode mu = (1.5, -0.5) and
    //   default options.
    //
    // Expect
    // ------
    // - A converged outcome with |minimum - mu| < 1e-4 componentwise and
    //   a 2x2 curvature estimate.
    fn quasi_newton_converges_on_quadratic() {
        // Arrange
        let mut model = QuadraticModel::unbounded(&[0.0, 0.0], 23);
        let data = quadratic_data(&[1.5, -0.5]);
        let opts = ModeOptions::default();
        let problem = PosteriorCost::new(&mut model, &data, &opts).unwrap();
        let x0 = problem.initial_free();
        let solver = build_quasi_newton(&opts).unwrap();

        // Act
        let (outcome, _problem) =
            run_quasi_newton(x0, &opts, problem, solver).expect("run should succeed");

        // Assert
        assert!(outcome.converged, "status: {}", outcome.status);
        assert!((outcome.minimum[0] - 1.5).abs() < 1e-4);
        assert!((outcome.minimum[1] - (-0.5)).abs() < 1e-4);
        assert_eq!(outcome.curvature.shape(), &[2, 2]);
        assert!(outcome.value <= 0.0 && outcome.value > -1e-6);
    }

    #[test]
    // Purpose
    // -------
    // Verify a short annealing run returns a validated outcome with a
    // finite-difference curvature.
    //
    // Given
    // -----
    // - A bounded 2-parameter quadratic model, 50 iterations.
    //
    // Expect
    // ------
    // - A finite minimum of length 2 and a finite 2x2 curvature whose
    //   diagonal is positive (the cost is convex).
    fn annealing_returns_validated_outcome() {
        // Arrange
        let mut model =
            QuadraticModel::bounded(&[(0.4, 0.0, 1.0), (0.5, -2.0, 2.0)], 29);
        let data = quadratic_data(&[0.6, 0.0]);
        let mut opts = ModeOptions::default();
        opts.iterations = 50;
        let problem = PosteriorCost::new(&mut model, &data, &opts).unwrap();
        let x0 = problem.initial_free();
        let solver = build_annealer(&opts, &problem.rng).unwrap();

        // Act
        let (outcome, _problem) =
            run_annealing(x0, &opts, problem, solver).expect("run should succeed");

        // Assert
        assert_eq!(outcome.minimum.len(), 2);
        assert!(outcome.minimum.iter().all(|v| v.is_finite()));
        assert_eq!(outcome.curvature.shape(), &[2, 2]);
        assert!(outcome.curvature[[0, 0]] > 0.0);
        assert!(outcome.converged);
    }

    #[test]
    // Purpose
    // -------
    // Ensure store_trace produces entries in the outcome.
    //
    // Given
    // -----
    // - The quadratic quasi-Newton setup with store_trace on.
    //
    // Expect
    // ------
    // - `outcome.trace` is Some and non-empty, with increasing iteration
    //   counters.
    fn store_trace_surfaces_entries() {
        // Arrange
        let mut model = QuadraticModel::unbounded(&[0.0, 0.0], 31);
        let data = quadratic_data(&[1.0, 1.0]);
        let mut opts = ModeOptions::default();
        opts.trace = TraceOptions { store_trace: true, show_trace: false, extended_trace: true };
        let problem = PosteriorCost::new(&mut model, &data, &opts).unwrap();
        let x0 = problem.initial_free();
        let solver = build_quasi_newton(&opts).unwrap();

        // Act
        let (outcome, _problem) = run_quasi_newton(x0, &opts, problem, solver).unwrap();

        // Assert
        let trace = outcome.trace.expect("store_trace should retain entries");
        assert!(!trace.is_empty());
        assert!(trace.windows(2).all(|w| w[0].iter <= w[1].iter));
        assert!(trace[0].param.is_some());
    }
}
