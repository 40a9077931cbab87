//! mode_finder::neighbor — solve-checked neighbor proposals for
//! stochastic search.
//!
//! Purpose
//! -------
//! Implement `argmin`'s `Anneal` trait on the objective adapter so the
//! simulated-annealing backend draws its candidate steps from this
//! module. A proposal is only ever returned if the model provably solves
//! at it: draws for which `solve` reports a bounds violation or a
//! structural failure are discarded and redrawn; any other error class
//! propagates and aborts the run.
//!
//! Key behaviors
//! -------------
//! - Per call, draw a fresh prior sample from the model and use the
//!   diagonal of its covariance as per-parameter step scales. The
//!   estimate is recomputed on every call, so step sizes vary across
//!   proposals with the sampling noise.
//! - Perturb every free parameter in model space by
//!   `((b - a) * U(0,1) + a) * cc * var_i`, where `(a, b)` are the
//!   parameter's bounds and `cc` the configured step scale. Fixed
//!   parameters are never touched. Parameters without two finite bounds
//!   fall back to the unit interval `(-1, 1)` for the uniform factor.
//! - Retry without bound by default; an optional retry cap surfaces
//!   [`OptError::ProposalRetriesExhausted`] when hit.
//!
//! Invariants & assumptions
//! ------------------------
//! - On return, the proposal is a free real-line point whose model
//!   configuration solved successfully during this call.
//! - The annealing temperature is not consulted: step sizes come from
//!   the prior scales and `cc` alone, so cooling only affects
//!   acceptance, not proposal width.
//! - An unsolvable bounded region can loop indefinitely when no cap is
//!   configured; this is accepted behavior, not a defect.
use crate::{
    model::{
        errors::ModelError,
        structural::StructuralModel,
        transforms::{to_model_space, to_real_line},
    },
    optimization::{
        errors::{OptError, OptResult},
        mode_finder::{adapter::PosteriorCost, types::FreeVector},
    },
};
use argmin::{core::Error, solver::simulatedannealing::Anneal};
use ndarray::Array1;
use ndarray_stats::CorrelationExt;
use rand::Rng;

impl<M: StructuralModel> PosteriorCost<'_, M> {
    /// Per-parameter step scales from a fresh prior sample.
    ///
    /// Draws `sample_prior` through the model's RNG handle and returns
    /// the diagonal of the sample covariance (one variance per
    /// parameter, full index space).
    ///
    /// # Errors
    /// - [`OptError::PriorSampleDimMismatch`] when the draw matrix row
    ///   count differs from the parameter count.
    /// - [`OptError::EmptyPriorSample`] when the sample holds no draws.
    fn prior_step_scales(&self) -> OptResult<Array1<f64>> {
        let draws = {
            let mut model = self.model.borrow_mut();
            let mut rng = self.rng.lock().expect("model RNG handle poisoned");
            model.sample_prior(&mut rng)?
        };
        let expected = self.ctx.borrow().n_full();
        if draws.nrows() != expected {
            return Err(OptError::PriorSampleDimMismatch { expected, found: draws.nrows() });
        }
        let cov = draws.cov(1.0).map_err(|_| OptError::EmptyPriorSample)?;
        Ok(cov.diag().to_owned())
    }
}

impl<M: StructuralModel> Anneal for PosteriorCost<'_, M> {
    type Param = FreeVector;
    type Output = FreeVector;
    type Float = f64;

    /// Produce a solve-checked candidate step from the current point.
    ///
    /// `x` is the current free real-line point. The proposal is built in
    /// model space (where bounds and prior scales live) and converted
    /// back to the real line on acceptance.
    ///
    /// # Errors
    /// - Propagates prior-sampling and transform errors.
    /// - Propagates model errors that are not solve failures.
    /// - [`OptError::ProposalRetriesExhausted`] when a configured retry
    ///   cap is hit.
    fn anneal(&self, x: &Self::Param, _extent: Self::Float) -> Result<Self::Output, Error> {
        let scales = self.prior_step_scales()?;

        let ctx = self.ctx.borrow();
        let mut current_real = ctx.full_real.clone();
        for (k, &i) in ctx.free.iter().enumerate() {
            current_real[i] = x[k];
        }
        let x_model = to_model_space(&ctx.params, &current_real).map_err(OptError::from)?;
        let params = ctx.params.clone();
        let free = ctx.free.clone();
        drop(ctx);

        let mut attempts = 0usize;
        let accepted = loop {
            if let Some(cap) = self.retry_cap {
                if attempts >= cap {
                    return Err(OptError::ProposalRetriesExhausted { attempts }.into());
                }
            }
            attempts += 1;

            let mut candidate = x_model.clone();
            {
                let mut rng = self.rng.lock().expect("model RNG handle poisoned");
                for &i in &free {
                    let (lower, upper) = params[i].bounds;
                    let (a, b) = if lower.is_finite() && upper.is_finite() {
                        (lower, upper)
                    } else {
                        (-1.0, 1.0)
                    };
                    let u: f64 = rng.gen_range(0.0..1.0);
                    candidate[i] = x_model[i] + ((b - a) * u + a) * self.step_scale * scales[i];
                }
            }

            let mut model = self.model.borrow_mut();
            match model.update(&candidate) {
                Ok(()) => {}
                Err(ModelError::Solve(_)) => continue,
                Err(other) => return Err(OptError::from(other).into()),
            }
            match model.solve() {
                Ok(()) => break candidate,
                Err(_) => continue,
            }
        };

        let accepted_real = to_real_line(&params, &accepted).map_err(OptError::from)?;
        Ok(Array1::from_iter(free.iter().map(|&i| accepted_real[i])))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::transforms::to_model_space,
        optimization::mode_finder::{
            fixtures::{QuadraticModel, quadratic_data},
            traits::ModeOptions,
        },
    };

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Termination and validity of proposals on a fully solvable
    //   bounded support.
    // - The guarantee that accepted proposals never correspond to a
    //   failing solve, even when part of the support fails.
    // - Fixed-parameter preservation through a proposal.
    // - The opt-in retry cap on an everywhere-failing model.
    //
    // They intentionally DO NOT cover:
    // - Full annealing runs (integration tests) or acceptance behavior,
    //   which belongs to the argmin backend.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that the generator terminates and produces an in-support
    // proposal when the model solves on its entire bounded support.
    //
    // Given
    // -----
    // - A 2-parameter model bounded on (0, 1) x (-2, 2) with no failure
    //   injection.
    //
    // Expect
    // ------
    // - `anneal` returns a free vector whose model-space image lies in
    //   the support.
    fn proposals_terminate_on_fully_solvable_support() {
        // Arrange
        let mut model = QuadraticModel::bounded(&[(0.4, 0.0, 1.0), (0.5, -2.0, 2.0)], 11);
        let data = quadratic_data(&[0.4, 0.5]);
        let opts = ModeOptions::default();
        let problem = PosteriorCost::new(&mut model, &data, &opts).unwrap();
        let x0 = problem.initial_free();

        // Act
        let proposal = problem.anneal(&x0, 1.0).expect("solvable support must terminate");

        // Assert
        let ctx = problem.ctx.borrow();
        let mut full = ctx.full_real.clone();
        for (k, &i) in ctx.free.iter().enumerate() {
            full[i] = proposal[k];
        }
        let model_space = to_model_space(&ctx.params, &full).unwrap();
        for (p, &v) in ctx.params.iter().zip(model_space.iter()) {
            assert!(p.contains(v), "proposal escaped the support: {v}");
        }
    }

    #[test]
    // Purpose
    // -------
    // Ensure accepted proposals never land where the model's solve
    // fails, by installing each proposal and re-solving.
    //
    // Given
    // -----
    // - A model on (0, 1) whose solve fails above 0.5, and several
    //   proposal rounds.
    //
    // Expect
    // ------
    // - Every accepted proposal maps to a first parameter ≤ 0.5.
    fn proposals_never_return_failing_candidates() {
        // Arrange
        let mut model =
            QuadraticModel::bounded(&[(0.2, 0.0, 1.0)], 13).failing_above(0.5);
        let data = quadratic_data(&[0.2]);
        let opts = ModeOptions::default();
        let problem = PosteriorCost::new(&mut model, &data, &opts).unwrap();
        let mut x = problem.initial_free();

        // Act / Assert
        for _ in 0..20 {
            x = problem.anneal(&x, 1.0).expect("proposal must eventually be accepted");
            let ctx = problem.ctx.borrow();
            let mut full = ctx.full_real.clone();
            for (k, &i) in ctx.free.iter().enumerate() {
                full[i] = x[k];
            }
            let model_space = to_model_space(&ctx.params, &full).unwrap();
            assert!(
                model_space[0] <= 0.5,
                "accepted proposal {} lies in the failing region",
                model_space[0]
            );
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify that fixed parameters are left untouched by proposals.
    //
    // Given
    // -----
    // - A 3-parameter model with the middle parameter fixed at 9.0.
    //
    // Expect
    // ------
    // - After a proposal, the installed middle parameter still reads
    //   9.0 and the proposal has free length 2.
    fn proposals_leave_fixed_parameters_untouched() {
        // Arrange
        let mut model = QuadraticModel::with_middle_fixed(&[0.1, 9.0, -0.1], 17);
        let data = quadratic_data(&[0.0, 9.0, 0.0]);
        let opts = ModeOptions::default();
        let problem = PosteriorCost::new(&mut model, &data, &opts).unwrap();
        let x0 = problem.initial_free();

        // Act
        let proposal = problem.anneal(&x0, 1.0).unwrap();

        // Assert
        assert_eq!(proposal.len(), 2);
        let model = problem.model.borrow();
        assert_eq!(model.installed()[1], 9.0);
    }

    #[test]
    // Purpose
    // -------
    // Check that the opt-in retry cap converts a non-terminating
    // rejection loop into an error.
    //
    // Given
    // -----
    // - A model whose solve fails everywhere (threshold below the
    //   support) and a retry cap of 8.
    //
    // Expect
    // ------
    // - `OptError::ProposalRetriesExhausted { attempts: 8 }`.
    fn retry_cap_surfaces_exhaustion() {
        // Arrange
        let mut model =
            QuadraticModel::bounded(&[(0.5, 0.1, 1.0)], 19).failing_above(0.0);
        let data = quadratic_data(&[0.5]);
        let mut opts = ModeOptions::default();
        opts.proposal_retry_cap = Some(8);
        let problem = PosteriorCost::new(&mut model, &data, &opts).unwrap();
        let x0 = problem.initial_free();

        // Act
        let err = problem.anneal(&x0, 1.0).expect_err("cap must trip on unsolvable support");

        // Assert
        match OptError::from(err) {
            OptError::ProposalRetriesExhausted { attempts } => assert_eq!(attempts, 8),
            other => panic!("Expected ProposalRetriesExhausted, got {other:?}"),
        }
    }
}
