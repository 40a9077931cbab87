//! Shared test fixtures for the mode-finder unit tests.
//!
//! Provides a small analytic [`QuadraticModel`] implementing
//! [`StructuralModel`]: a Gaussian-shaped log posterior
//! `-(1/2) * ||x - mu||^2` whose mode is the data vector `mu`. Solve
//! failures and unclassified evaluation failures can be injected to
//! exercise the driver's error classification, and update calls are
//! counted so tests can assert on (absence of) model mutation.
use crate::model::{
    errors::{ModelError, ModelResult, SolveError},
    parameter::Parameter,
    structural::StructuralModel,
};
use ndarray::{Array1, Array2};
use rand::{Rng, SeedableRng, rngs::StdRng};
use statrs::distribution::{Normal, Uniform};
use std::sync::{Arc, Mutex};

/// Number of prior draws produced by [`QuadraticModel::sample_prior`].
const PRIOR_DRAWS: usize = 32;

/// Analytic quadratic-posterior model for tests.
pub struct QuadraticModel {
    params: Vec<Parameter>,
    installed: Array1<f64>,
    rng: Arc<Mutex<StdRng>>,
    fail_above: Option<f64>,
    poisoned: bool,
    /// Number of successful `update` calls (mutation counter).
    pub update_calls: usize,
}

impl QuadraticModel {
    fn from_params(params: Vec<Parameter>, seed: u64) -> Self {
        let installed = Array1::from_iter(params.iter().map(|p| p.value));
        QuadraticModel {
            params,
            installed,
            rng: Arc::new(Mutex::new(StdRng::seed_from_u64(seed))),
            fail_above: None,
            poisoned: false,
            update_calls: 0,
        }
    }

    /// All-free, unbounded parameters at the given values.
    pub fn unbounded(values: &[f64], seed: u64) -> Self {
        let params = values
            .iter()
            .map(|&v| Parameter::free(v, f64::NEG_INFINITY, f64::INFINITY).unwrap())
            .collect();
        Self::from_params(params, seed)
    }

    /// All-free parameters with two-sided bounds, given as
    /// `(value, lower, upper)` triples.
    pub fn bounded(entries: &[(f64, f64, f64)], seed: u64) -> Self {
        let params = entries
            .iter()
            .map(|&(v, lo, hi)| Parameter::free(v, lo, hi).unwrap())
            .collect();
        Self::from_params(params, seed)
    }

    /// Three parameters at the given values, the middle one fixed.
    pub fn with_middle_fixed(values: &[f64], seed: u64) -> Self {
        assert_eq!(values.len(), 3, "fixture expects exactly three values");
        let params = vec![
            Parameter::free(values[0], f64::NEG_INFINITY, f64::INFINITY).unwrap(),
            Parameter::fixed(values[1]).unwrap(),
            Parameter::free(values[2], f64::NEG_INFINITY, f64::INFINITY).unwrap(),
        ];
        Self::from_params(params, seed)
    }

    /// Make `solve` fail with a structural failure whenever the first
    /// parameter exceeds `threshold`.
    pub fn failing_above(mut self, threshold: f64) -> Self {
        self.fail_above = Some(threshold);
        self
    }

    /// Make `posterior` raise an unclassified evaluation error at every
    /// point.
    pub fn poisoned(mut self) -> Self {
        self.poisoned = true;
        self
    }

    /// The currently installed model-space vector.
    pub fn installed(&self) -> &Array1<f64> {
        &self.installed
    }
}

impl StructuralModel for QuadraticModel {
    type Data = Array1<f64>;

    fn parameters(&self) -> &[Parameter] {
        &self.params
    }

    fn update(&mut self, candidate: &Array1<f64>) -> ModelResult<()> {
        if candidate.len() != self.params.len() {
            return Err(ModelError::DimensionMismatch {
                expected: self.params.len(),
                actual: candidate.len(),
            });
        }
        for (index, (param, &value)) in self.params.iter().zip(candidate.iter()).enumerate() {
            if !param.fixed && !param.contains(value) {
                let (lower, upper) = param.bounds;
                return Err(ModelError::Solve(SolveError::BoundsViolation {
                    index,
                    value,
                    lower,
                    upper,
                }));
            }
        }
        for (param, &value) in self.params.iter_mut().zip(candidate.iter()) {
            param.value = value;
        }
        self.installed.assign(candidate);
        self.update_calls += 1;
        Ok(())
    }

    fn solve(&mut self) -> Result<(), SolveError> {
        if let Some(threshold) = self.fail_above {
            if self.installed[0] > threshold {
                return Err(SolveError::StructuralFailure {
                    reason: format!("no stable solution above {threshold}"),
                });
            }
        }
        Ok(())
    }

    fn posterior(&mut self, data: &Self::Data) -> ModelResult<f64> {
        if self.poisoned {
            return Err(ModelError::Evaluation { reason: "injected failure".to_string() });
        }
        self.solve()?;
        let mut sum_sq = 0.0;
        for (&x, &mu) in self.installed.iter().zip(data.iter()) {
            sum_sq += (x - mu) * (x - mu);
        }
        Ok(-0.5 * sum_sq)
    }

    fn sample_prior(&mut self, rng: &mut StdRng) -> ModelResult<Array2<f64>> {
        let n = self.params.len();
        let mut draws = Array2::<f64>::zeros((n, PRIOR_DRAWS));
        for (i, param) in self.params.iter().enumerate() {
            for j in 0..PRIOR_DRAWS {
                draws[[i, j]] = if param.fixed {
                    param.value
                } else if param.has_finite_bounds() {
                    let (lower, upper) = param.bounds;
                    rng.sample(Uniform::new(lower, upper).unwrap())
                } else {
                    param.value + rng.sample(Normal::new(0.0, 1.0).unwrap())
                };
            }
        }
        Ok(draws)
    }

    fn rng(&self) -> Arc<Mutex<StdRng>> {
        self.rng.clone()
    }
}

/// Build the dataset (the posterior's mode) for a [`QuadraticModel`].
pub fn quadratic_data(mu: &[f64]) -> Array1<f64> {
    Array1::from(mu.to_vec())
}
