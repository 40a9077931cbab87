//! Adapter that exposes a structural model's posterior as an `argmin`
//! problem.
//!
//! We convert *maximization* of a log posterior into a *minimization*
//! problem by defining the cost as the negated posterior over the free
//! parameters in real-line coordinates. Evaluation is error tolerant:
//! points where the model fails to solve score [`BAD_EVAL_COST`] instead
//! of raising, so both backends can traverse unsolvable regions. Any
//! failure the model does not classify as a solve failure propagates
//! unmodified. Gradients are finite-differenced from the cost (central
//! first, forward fallback), since the posterior collaborator exposes no
//! derivatives.
use crate::{
    model::{errors::ModelError, structural::StructuralModel, transforms::to_model_space},
    optimization::{
        errors::{OptError, OptResult},
        mode_finder::{
            finite_diff::run_fd_diff,
            traits::ModeOptions,
            types::{BAD_EVAL_COST, Cost, FreeVector, Grad},
            validation::validate_gradient,
            view::EvalContext,
        },
    },
};
use argmin::core::{CostFunction, Error, Gradient};
use finitediff::FiniteDiff;
use rand::rngs::StdRng;
use std::{
    cell::RefCell,
    sync::{Arc, Mutex},
};

/// Bridges a structural model to `argmin`'s `CostFunction` and
/// `Gradient`, and (in `neighbor`) to `Anneal`.
///
/// Owns the per-run [`EvalContext`] (parameter snapshot, free-index set,
/// cached full real-line vector) and borrows the model behind interior
/// mutability, since `argmin` evaluates problems through `&self` while
/// every posterior evaluation mutates model state.
///
/// - `CostFunction::cost` returns the negated posterior, with solve
///   failures mapped to [`BAD_EVAL_COST`].
/// - `Gradient::gradient` returns a finite-difference gradient of the
///   cost (central differences, forward fallback).
pub struct PosteriorCost<'a, M: StructuralModel> {
    pub(crate) model: RefCell<&'a mut M>,
    pub(crate) data: &'a M::Data,
    pub(crate) ctx: RefCell<EvalContext>,
    pub(crate) rng: Arc<Mutex<StdRng>>,
    pub(crate) step_scale: f64,
    pub(crate) retry_cap: Option<usize>,
}

impl<'a, M: StructuralModel> PosteriorCost<'a, M> {
    /// Construct an adapter over a model and dataset.
    ///
    /// Builds the [`EvalContext`] from the model's current state (free
    /// indices, real-line cache) and takes the model's RNG handle for the
    /// stochastic pieces.
    ///
    /// # Errors
    /// - Propagates context-construction errors
    ///   ([`OptError::NoFreeParameters`], transform failures).
    pub fn new(model: &'a mut M, data: &'a M::Data, opts: &ModeOptions) -> OptResult<Self> {
        let ctx = EvalContext::new(&*model)?;
        let rng = model.rng();
        Ok(Self {
            model: RefCell::new(model),
            data,
            ctx: RefCell::new(ctx),
            rng,
            step_scale: opts.step_scale,
            retry_cap: opts.proposal_retry_cap,
        })
    }

    /// The starting point for the backend: the free projection of the
    /// model's current parameters in real-line coordinates.
    pub fn initial_free(&self) -> FreeVector {
        self.ctx.borrow().gather()
    }

    /// Number of free parameters seen by the backend.
    pub fn n_free(&self) -> usize {
        self.ctx.borrow().n_free()
    }

    /// Map a recoverable model failure to the disfavoring cost; let
    /// anything else propagate.
    fn tolerate(err: ModelError) -> Result<Cost, Error> {
        match err {
            ModelError::Solve(_) => Ok(BAD_EVAL_COST),
            other => Err(OptError::from(other).into()),
        }
    }
}

impl<M: StructuralModel> CostFunction for PosteriorCost<'_, M> {
    type Param = FreeVector;
    type Output = Cost;

    /// Evaluate the cost (negated posterior) at a free real-line point.
    ///
    /// - Scatters `x_opt` into the cached full real-line vector, maps it
    ///   to model space, and installs it (mutating the model; pre-call
    ///   parameter state does not survive).
    /// - Solve failures during installation or posterior evaluation, and
    ///   non-finite posterior values, score [`BAD_EVAL_COST`].
    ///
    /// # Errors
    /// Propagates dimension errors and any model failure that is not a
    /// solve failure.
    fn cost(&self, x_opt: &Self::Param) -> Result<Self::Output, Error> {
        let mut ctx = self.ctx.borrow_mut();
        ctx.scatter(x_opt)?;
        let candidate = to_model_space(&ctx.params, &ctx.full_real).map_err(OptError::from)?;
        drop(ctx);

        let mut model = self.model.borrow_mut();
        if let Err(err) = model.update(&candidate) {
            return Self::tolerate(err);
        }
        match model.posterior(self.data) {
            Ok(value) => {
                let cost = -value;
                if cost.is_finite() { Ok(cost) } else { Ok(BAD_EVAL_COST) }
            }
            Err(err) => Self::tolerate(err),
        }
    }
}

impl<M: StructuralModel> Gradient for PosteriorCost<'_, M> {
    type Param = FreeVector;
    type Gradient = Grad;

    /// Evaluate a finite-difference gradient of the cost at `x_opt`.
    ///
    /// Behavior:
    /// - Try *central* differences first.
    /// - If any evaluation of the cost closure failed (captured via
    ///   `closure_err`), retry with *forward* differences.
    /// - Validate the FD gradient; if it fails (e.g., non-finite), retry
    ///   once with *forward* differences and validate again.
    ///
    /// Implementation notes:
    /// - The FD closure must return `f64`, so we can't use `?` inside it;
    ///   we capture the first error in `closure_err` and return `NaN`
    ///   from the closure. After FD, we turn that captured error back
    ///   into a real error (or switch to forward differences).
    ///
    /// # Errors
    /// - Propagates any error raised by cost evaluations performed
    ///   during FD.
    /// - Returns validation errors if the gradient has wrong dimension
    ///   or non-finite entries.
    fn gradient(&self, x_opt: &Self::Param) -> Result<Self::Gradient, Error> {
        let dim = x_opt.len();
        let closure_err: RefCell<Option<Error>> = RefCell::new(None);
        let cost_func = |x: &FreeVector| -> f64 {
            match self.cost(x) {
                Ok(val) => val,
                Err(e) => {
                    let mut slot = closure_err.borrow_mut();
                    if slot.is_none() {
                        *slot = Some(e);
                    }
                    f64::NAN
                }
            }
        };
        let fd_grad = x_opt.central_diff(&cost_func);
        if closure_err.borrow().is_some() {
            return Ok(run_fd_diff(x_opt, &cost_func, &closure_err)?);
        }
        match validate_gradient(&fd_grad, dim) {
            Ok(()) => Ok(fd_grad),
            Err(_) => Ok(run_fd_diff(x_opt, &cost_func, &closure_err)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::mode_finder::fixtures::{QuadraticModel, quadratic_data};
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Sign convention: cost is the negated posterior.
    // - Determinism of repeated evaluations at the same free point.
    // - Error tolerance: solve failures score BAD_EVAL_COST (large,
    //   finite, not NaN) instead of raising.
    // - Propagation of unclassified model errors.
    // - Finite-difference gradients on a smooth quadratic posterior.
    //
    // They intentionally DO NOT cover:
    // - Neighbor proposals (neighbor.rs) and full backend runs (run.rs /
    //   integration tests).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that the adapter's cost equals the negated posterior and
    // that two evaluations at the same point agree.
    //
    // Given
    // -----
    // - An unbounded 2-parameter quadratic model with mode at the data
    //   vector, evaluated at the origin.
    //
    // Expect
    // ------
    // - cost(0) == 0.5 * ||mu||^2 twice in a row.
    fn cost_is_negated_posterior_and_deterministic() {
        // Arrange
        let mut model = QuadraticModel::unbounded(&[0.0, 0.0], 7);
        let data = quadratic_data(&[1.0, -2.0]);
        let opts = ModeOptions::default();
        let problem = PosteriorCost::new(&mut model, &data, &opts).unwrap();
        let origin = array![0.0, 0.0];

        // Act
        let first = problem.cost(&origin).unwrap();
        let second = problem.cost(&origin).unwrap();

        // Assert
        let expected = 0.5 * (1.0f64.powi(2) + 2.0f64.powi(2));
        assert!((first - expected).abs() < 1e-12);
        assert_eq!(first, second);
    }

    #[test]
    // Purpose
    // -------
    // Ensure a structural solve failure maps to the large finite
    // disfavoring cost rather than an error, NaN, or infinity.
    //
    // Given
    // -----
    // - A quadratic model that fails to solve whenever its first
    //   parameter exceeds 0.5, evaluated beyond that threshold.
    //
    // Expect
    // ------
    // - cost == BAD_EVAL_COST, finite and not NaN.
    fn solve_failure_scores_large_finite_cost() {
        // Arrange
        let mut model = QuadraticModel::unbounded(&[0.0, 0.0], 7).failing_above(0.5);
        let data = quadratic_data(&[0.0, 0.0]);
        let opts = ModeOptions::default();
        let problem = PosteriorCost::new(&mut model, &data, &opts).unwrap();

        // Act
        let cost = problem.cost(&array![1.0, 0.0]).unwrap();

        // Assert
        assert_eq!(cost, BAD_EVAL_COST);
        assert!(cost.is_finite());
    }

    #[test]
    // Purpose
    // -------
    // Verify that unclassified model errors propagate instead of being
    // swallowed into the disfavoring cost.
    //
    // Given
    // -----
    // - A model whose posterior raises ModelError::Evaluation at every
    //   point.
    //
    // Expect
    // ------
    // - cost() returns Err mapping to OptError::EvaluationFailed.
    fn unclassified_errors_propagate() {
        // Arrange
        let mut model = QuadraticModel::unbounded(&[0.0, 0.0], 7).poisoned();
        let data = quadratic_data(&[0.0, 0.0]);
        let opts = ModeOptions::default();
        let problem = PosteriorCost::new(&mut model, &data, &opts).unwrap();

        // Act
        let err = problem.cost(&array![0.0, 0.0]).expect_err("poisoned model must error");

        // Assert
        assert!(matches!(OptError::from(err), OptError::EvaluationFailed { .. }));
    }

    #[test]
    // Purpose
    // -------
    // Check the finite-difference gradient against the analytic gradient
    // of the quadratic cost.
    //
    // Given
    // -----
    // - The unbounded quadratic model with mode mu = (1, -2), evaluated
    //   at the origin, where the cost gradient is -mu.
    //
    // Expect
    // ------
    // - FD gradient within 1e-4 of (-1, 2) componentwise.
    fn gradient_matches_analytic_quadratic() {
        // Arrange
        let mut model = QuadraticModel::unbounded(&[0.0, 0.0], 7);
        let data = quadratic_data(&[1.0, -2.0]);
        let opts = ModeOptions::default();
        let problem = PosteriorCost::new(&mut model, &data, &opts).unwrap();

        // Act
        let grad = problem.gradient(&array![0.0, 0.0]).unwrap();

        // Assert
        assert!((grad[0] - (-1.0)).abs() < 1e-4);
        assert!((grad[1] - 2.0).abs() < 1e-4);
    }

    #[test]
    // Purpose
    // -------
    // Verify that the initial free vector is the free projection of the
    // model's current values, skipping fixed entries.
    //
    // Given
    // -----
    // - A 3-parameter model with the middle parameter fixed.
    //
    // Expect
    // ------
    // - initial_free() has length 2 and carries the free values.
    fn initial_free_skips_fixed_entries() {
        // Arrange
        let mut model = QuadraticModel::with_middle_fixed(&[0.25, 9.0, -0.75], 7);
        let data = quadratic_data(&[0.0, 9.0, 0.0]);
        let opts = ModeOptions::default();
        let problem = PosteriorCost::new(&mut model, &data, &opts).unwrap();

        // Act
        let x0 = problem.initial_free();

        // Assert
        assert_eq!(problem.n_free(), 2);
        assert_eq!(x0.len(), 2);
        assert!((x0[0] - 0.25).abs() < 1e-12);
        assert!((x0[1] - (-0.75)).abs() < 1e-12);
    }
}
