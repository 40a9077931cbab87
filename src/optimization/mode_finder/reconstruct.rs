//! mode_finder::reconstruct — lift free-space results back to full
//! parameter space.
//!
//! Purpose
//! -------
//! Turn a backend's free-space [`ModeOutcome`] into the user-facing
//! [`ModeResult`]: the full-dimension minimizer (fixed entries at their
//! original positions), the model-space image of that point, and the
//! full curvature matrix with structural zeros at fixed rows and
//! columns. The model is left re-materialized at the mode.
//!
//! Key behaviors
//! -------------
//! - The backend minimum is scattered into the run's cached full
//!   real-line vector; fixed positions keep the values they held before
//!   optimization began.
//! - The free x free curvature block is copied position for position
//!   into a zero-initialized full x full matrix through the free-index
//!   set; every fixed row and column stays exactly zero.
//! - The model-space minimizer is installed into the model via `update`,
//!   so the caller finds the model parameterized at the mode.
//!
//! Invariants & assumptions
//! ------------------------
//! - `hessian[[i, j]] == curvature[[a, b]]` whenever `i` and `j` are the
//!   `a`-th and `b`-th free indices; all other entries are 0.0 exactly.
//! - When every parameter is free, the full-dimension minimizer equals
//!   the backend's raw minimum with no reordering.
use crate::{
    model::{structural::StructuralModel, transforms::update_to_model_space},
    optimization::{
        errors::OptResult,
        mode_finder::{
            adapter::PosteriorCost,
            traits::{ModeOutcome, ModeResult},
            types::CurvatureMatrix,
        },
    },
};

/// Lift a free-space outcome to full parameter space and re-materialize
/// the model at the mode.
///
/// # Errors
/// - Propagates scatter/transform dimension errors.
/// - Propagates any model error raised while installing the mode (an
///   accepted minimum failing installation is unexpected and aborts).
pub fn lift<M: StructuralModel>(
    problem: &PosteriorCost<'_, M>, outcome: ModeOutcome,
) -> OptResult<ModeResult> {
    let mut ctx = problem.ctx.borrow_mut();
    ctx.scatter(&outcome.minimum)?;
    let minimizer = ctx.full_real.clone();

    let n_full = ctx.n_full();
    let mut hessian = CurvatureMatrix::zeros((n_full, n_full));
    for (a, &i) in ctx.free.iter().enumerate() {
        for (b, &j) in ctx.free.iter().enumerate() {
            hessian[[i, j]] = outcome.curvature[[a, b]];
        }
    }
    drop(ctx);

    let mut model = problem.model.borrow_mut();
    let minimizer_model = update_to_model_space(&mut **model, &minimizer)?;

    Ok(ModeResult { minimizer, minimizer_model, hessian, outcome })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::mode_finder::{
        fixtures::{QuadraticModel, quadratic_data},
        traits::{ModeOptions, ModeOutcome},
        types::FnEvalMap,
    };
    use argmin::core::{TerminationReason, TerminationStatus};
    use ndarray::{Array2, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Identity lifting when every parameter is free.
    // - Zero rows/columns at fixed positions and position-for-position
    //   copying of the free curvature block.
    // - Model re-materialization at the mode.
    //
    // They intentionally DO NOT cover:
    // - End-to-end runs (api.rs and the integration pipeline).
    // -------------------------------------------------------------------------

    fn outcome_with(minimum: ndarray::Array1<f64>, curvature: Array2<f64>) -> ModeOutcome {
        ModeOutcome::new(
            Some(minimum),
            -1.0,
            curvature,
            TerminationStatus::Terminated(TerminationReason::SolverConverged),
            5,
            FnEvalMap::new(),
            None,
        )
        .unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Verify that with all parameters free the lifted minimizer equals
    // the backend minimum and the hessian equals the raw curvature.
    //
    // Given
    // -----
    // - A 2-parameter unbounded model and a distinctive 2x2 curvature.
    //
    // Expect
    // ------
    // - minimizer == minimum (no reordering); hessian == curvature.
    fn all_free_lifts_identically() {
        // Arrange
        let mut model = QuadraticModel::unbounded(&[0.0, 0.0], 37);
        let data = quadratic_data(&[0.0, 0.0]);
        let opts = ModeOptions::default();
        let problem = PosteriorCost::new(&mut model, &data, &opts).unwrap();
        let curvature =
            Array2::from_shape_vec((2, 2), vec![2.0, 0.5, 0.5, 3.0]).unwrap();
        let outcome = outcome_with(array![0.7, -0.3], curvature.clone());

        // Act
        let result = lift(&problem, outcome).unwrap();

        // Assert
        assert_eq!(result.minimizer, array![0.7, -0.3]);
        assert_eq!(result.hessian, curvature);
    }

    #[test]
    // Purpose
    // -------
    // Verify structural zeros at the fixed position and exact placement
    // of the free block, per the embedding invariant.
    //
    // Given
    // -----
    // - A 3-parameter model with the middle parameter fixed at 9.0 and a
    //   2x2 free curvature block.
    //
    // Expect
    // ------
    // - Row/column 1 of the hessian is all zeros; the (0, 2) block holds
    //   the free curvature position for position; the minimizer carries
    //   9.0 at index 1.
    fn fixed_positions_get_zero_rows_and_columns() {
        // Arrange
        let mut model = QuadraticModel::with_middle_fixed(&[0.0, 9.0, 0.0], 41);
        let data = quadratic_data(&[0.0, 9.0, 0.0]);
        let opts = ModeOptions::default();
        let problem = PosteriorCost::new(&mut model, &data, &opts).unwrap();
        let curvature =
            Array2::from_shape_vec((2, 2), vec![4.0, 1.0, 1.0, 5.0]).unwrap();
        let outcome = outcome_with(array![0.25, -0.75], curvature.clone());

        // Act
        let result = lift(&problem, outcome).unwrap();

        // Assert
        assert_eq!(result.minimizer.len(), 3);
        assert_eq!(result.minimizer[1], 9.0);
        for k in 0..3 {
            assert_eq!(result.hessian[[1, k]], 0.0);
            assert_eq!(result.hessian[[k, 1]], 0.0);
        }
        for (a, &i) in [0usize, 2].iter().enumerate() {
            for (b, &j) in [0usize, 2].iter().enumerate() {
                assert_eq!(result.hessian[[i, j]], curvature[[a, b]]);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Ensure the model is left re-materialized at the mode.
    //
    // Given
    // -----
    // - The fixed-middle model and a backend minimum.
    //
    // Expect
    // ------
    // - The model's installed vector equals the lifted model-space
    //   minimizer.
    fn model_is_rematerialized_at_the_mode() {
        // Arrange
        let mut model = QuadraticModel::with_middle_fixed(&[0.0, 9.0, 0.0], 43);
        let data = quadratic_data(&[0.0, 9.0, 0.0]);
        let opts = ModeOptions::default();
        let problem = PosteriorCost::new(&mut model, &data, &opts).unwrap();
        let outcome = outcome_with(array![0.5, 0.5], Array2::eye(2));

        // Act
        let result = lift(&problem, outcome).unwrap();

        // Assert
        let model = problem.model.borrow();
        assert_eq!(model.installed(), &result.minimizer_model);
    }
}
