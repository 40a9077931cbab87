//! Public API surface for posterior-mode search.
//!
//! - [`Method`]: the two supported backend tags.
//! - [`ModeOptions`], [`Tolerances`], [`TraceOptions`]: configuration for
//!   the driver.
//! - [`ModeOutcome`]: normalized free-space result from a backend run.
//! - [`ModeResult`]: full-dimension result after reconstruction.
//!
//! Convention: backends *minimize* the negated log posterior over free
//! parameters in real-line coordinates. All user-facing values
//! ([`ModeOutcome::value`]) are expressed as the posterior itself.
use crate::optimization::{
    errors::{OptError, OptResult},
    mode_finder::{
        trace::TraceEntry,
        types::{
            CurvatureMatrix, DEFAULT_H0_SCALE, DEFAULT_STEP_SCALE, DEFAULT_TEMPERATURE, FnEvalMap,
            FreeVector, FullVector,
        },
        validation::{
            validate_curvature, validate_minimum, validate_value, verify_positive_finite,
            verify_tolerance,
        },
    },
};
use argmin::core::TerminationStatus;
use std::str::FromStr;

/// Supported optimization backends.
///
/// Variants:
/// - `Bfgs`: quasi-Newton deterministic optimizer seeded with an initial
///   inverse curvature matrix.
/// - `SimulatedAnnealing`: stochastic search driven by the
///   neighbor-proposal generator.
///
/// Parsing:
/// This enum implements `FromStr` and accepts case-insensitive tags
/// (`"bfgs"`, `"simulated_annealing"`). Unknown tags return
/// [`OptError::InvalidMethod`] naming the offending value, before any
/// optimization work is performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Bfgs,
    SimulatedAnnealing,
}

impl FromStr for Method {
    type Err = OptError;

    /// Parse a backend tag from a string (case-insensitive).
    ///
    /// Accepts:
    /// - `"bfgs"`
    /// - `"simulated_annealing"`
    /// - Any case variant (e.g., `"BFGS"`, `"Simulated_Annealing"`).
    ///
    /// Any other value returns [`OptError::InvalidMethod`] with the
    /// offending name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bfgs" => Ok(Method::Bfgs),
            "simulated_annealing" => Ok(Method::SimulatedAnnealing),
            _ => Err(OptError::InvalidMethod {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'bfgs' or 'simulated_annealing'.",
            }),
        }
    }
}

/// Numerical tolerances used by the backends.
///
/// - `xtol`: parameter-space convergence tolerance. Validated and
///   carried for interface stability; the Argmin backends terminate on
///   the gradient/objective criteria below, and the default is small
///   enough to never bind.
/// - `ftol`: objective-change convergence tolerance.
/// - `grtol`: gradient-norm convergence tolerance (quasi-Newton only).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub xtol: f64,
    pub ftol: f64,
    pub grtol: f64,
}

impl Tolerances {
    /// Construct validated tolerances.
    ///
    /// # Rules
    /// All three tolerances must be **finite and strictly positive**.
    ///
    /// # Errors
    /// [`OptError::InvalidTolX`] / [`OptError::InvalidTolF`] /
    /// [`OptError::InvalidTolGrad`] for the offending value.
    pub fn new(xtol: f64, ftol: f64, grtol: f64) -> OptResult<Self> {
        verify_tolerance(xtol, |tol, reason| OptError::InvalidTolX { tol, reason })?;
        verify_tolerance(ftol, |tol, reason| OptError::InvalidTolF { tol, reason })?;
        verify_tolerance(grtol, |tol, reason| OptError::InvalidTolGrad { tol, reason })?;
        Ok(Self { xtol, ftol, grtol })
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        Self { xtol: 1e-32, ftol: 1e-14, grtol: 1e-8 }
    }
}

/// Per-iteration trace configuration.
///
/// - `store_trace`: retain entries in [`ModeOutcome::trace`].
/// - `show_trace`: stream one line per iteration to stderr.
/// - `extended_trace`: include the free parameter vector in entries and
///   streamed lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TraceOptions {
    pub store_trace: bool,
    pub show_trace: bool,
    pub extended_trace: bool,
}

/// Driver-level configuration.
///
/// Fields:
/// - `method`: backend selection (parse tags via [`Method::from_str`]).
/// - `tols`: convergence tolerances.
/// - `iterations`: backend iteration cap.
/// - `h0_scale`: scale of the initial inverse curvature `h0_scale * I`
///   handed to the quasi-Newton backend.
/// - `step_scale`: the neighbor proposal's `cc` constant.
/// - `initial_temperature`: annealing start temperature.
/// - `proposal_retry_cap`: optional cap on neighbor-proposal retries.
///   `None` (the default) retries indefinitely; the cap is an opt-in
///   safety valve for supports known to contain unsolvable regions.
/// - `trace`: per-iteration trace configuration.
/// - `verbose`: attach the structured solver observer (behind the
///   `obs_slog` feature).
#[derive(Debug, Clone, PartialEq)]
pub struct ModeOptions {
    pub method: Method,
    pub tols: Tolerances,
    pub iterations: u64,
    pub h0_scale: f64,
    pub step_scale: f64,
    pub initial_temperature: f64,
    pub proposal_retry_cap: Option<usize>,
    pub trace: TraceOptions,
    pub verbose: bool,
}

impl ModeOptions {
    /// Create a validated set of driver options.
    ///
    /// # Rules
    /// - `iterations > 0`.
    /// - `h0_scale`, `step_scale`, and `initial_temperature` must be
    ///   finite and strictly positive.
    ///
    /// # Errors
    /// The matching `OptError` configuration variant for the first
    /// offending field.
    pub fn new(
        method: Method, tols: Tolerances, iterations: u64, h0_scale: f64, step_scale: f64,
        initial_temperature: f64, proposal_retry_cap: Option<usize>, trace: TraceOptions,
        verbose: bool,
    ) -> OptResult<Self> {
        if iterations == 0 {
            return Err(OptError::InvalidMaxIter {
                iterations,
                reason: "Iteration cap must be greater than zero.",
            });
        }
        verify_positive_finite(h0_scale, |value, reason| OptError::InvalidCurvatureScale {
            value,
            reason,
        })?;
        verify_positive_finite(step_scale, |value, reason| OptError::InvalidStepScale {
            value,
            reason,
        })?;
        verify_positive_finite(initial_temperature, |value, reason| {
            OptError::InvalidTemperature { value, reason }
        })?;
        Ok(Self {
            method,
            tols,
            iterations,
            h0_scale,
            step_scale,
            initial_temperature,
            proposal_retry_cap,
            trace,
            verbose,
        })
    }
}

impl Default for ModeOptions {
    fn default() -> Self {
        Self {
            method: Method::Bfgs,
            tols: Tolerances::default(),
            iterations: 1000,
            h0_scale: DEFAULT_H0_SCALE,
            step_scale: DEFAULT_STEP_SCALE,
            initial_temperature: DEFAULT_TEMPERATURE,
            proposal_retry_cap: None,
            trace: TraceOptions::default(),
            verbose: false,
        }
    }
}

/// Canonical free-space result of one backend run.
///
/// - `minimum`: best free parameter vector found, in real-line
///   coordinates.
/// - `value`: log posterior at `minimum` (sign-corrected from the
///   internal cost).
/// - `curvature`: the backend's free x free curvature estimate.
/// - `converged`: `true` if the solver reported a terminating status
///   other than `NotTerminated`.
/// - `status`: human-readable termination status string.
/// - `iterations`: number of backend iterations performed.
/// - `fn_evals`: function-evaluation counters reported by Argmin.
/// - `trace`: stored per-iteration entries when requested.
#[derive(Debug, Clone, PartialEq)]
pub struct ModeOutcome {
    pub minimum: FreeVector,
    pub value: f64,
    pub curvature: CurvatureMatrix,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
    pub trace: Option<Vec<TraceEntry>>,
}

impl ModeOutcome {
    /// Build a validated [`ModeOutcome`] from raw solver state.
    ///
    /// Performs:
    /// - `minimum` check via `validate_minimum` (present and all finite).
    /// - `value` check via `validate_value` (finite).
    /// - `curvature` shape/finiteness check against the free count.
    /// - Maps `TerminationStatus` into `(converged, status)`.
    ///
    /// # Errors
    /// - Propagates any validation errors for `minimum`, `value`, or
    ///   `curvature`.
    pub fn new(
        minimum_opt: Option<FreeVector>, value: f64, curvature: CurvatureMatrix,
        termination: TerminationStatus, iterations: u64, fn_evals: FnEvalMap,
        trace: Option<Vec<TraceEntry>>,
    ) -> OptResult<Self> {
        let minimum = validate_minimum(minimum_opt)?;
        validate_value(value)?;
        validate_curvature(&curvature, minimum.len())?;
        let status: String;
        let converged = match termination {
            TerminationStatus::NotTerminated => {
                status = "Not terminated".to_string();
                false
            }
            _ => {
                status = format!("{termination:?}");
                true
            }
        };
        Ok(Self {
            minimum,
            value,
            curvature,
            converged,
            status,
            iterations: iterations as usize,
            fn_evals,
            trace,
        })
    }
}

/// Full-dimension result of a posterior-mode search.
///
/// - `minimizer`: full parameter vector in the optimizer's real-line
///   coordinates; fixed entries hold their original values.
/// - `minimizer_model`: the same point mapped into model space (the
///   model is left re-materialized there).
/// - `hessian`: full x full curvature with structural zero rows and
///   columns at fixed positions; the free block is a position-for-
///   position copy of [`ModeOutcome::curvature`].
/// - `outcome`: the raw free-space backend outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct ModeResult {
    pub minimizer: FullVector,
    pub minimizer_model: FullVector,
    pub hessian: CurvatureMatrix,
    pub outcome: ModeOutcome,
}
