use argmin::core::{ArgminError, Error};

use crate::model::errors::{ModelError, SolveError};

/// Crate-wide result alias for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- Configuration ----
    /// Method name is not one of the supported backend tags.
    InvalidMethod {
        name: String,
        reason: &'static str,
    },
    /// Parameter-space tolerance needs to be positive and finite.
    InvalidTolX {
        tol: f64,
        reason: &'static str,
    },
    /// Objective-change tolerance needs to be positive and finite.
    InvalidTolF {
        tol: f64,
        reason: &'static str,
    },
    /// Gradient tolerance needs to be positive and finite.
    InvalidTolGrad {
        tol: f64,
        reason: &'static str,
    },
    /// Iteration cap needs to be positive.
    InvalidMaxIter {
        iterations: u64,
        reason: &'static str,
    },
    /// Initial curvature scale needs to be positive and finite.
    InvalidCurvatureScale {
        value: f64,
        reason: &'static str,
    },
    /// Proposal step-scale constant needs to be positive and finite.
    InvalidStepScale {
        value: f64,
        reason: &'static str,
    },
    /// Annealing start temperature needs to be positive and finite.
    InvalidTemperature {
        value: f64,
        reason: &'static str,
    },

    // ---- Parameter view ----
    /// The model exposes no free parameters; nothing to optimize.
    NoFreeParameters,

    /// Free-vector length does not match the free-parameter count.
    FreeVectorDimMismatch {
        expected: usize,
        found: usize,
    },

    // ---- Objective ----
    /// Objective returned a non-finite value where one was required.
    NonFiniteCost {
        value: f64,
    },

    // ---- Gradient ----
    /// Gradient dimensions do not match free-parameter dimensions.
    GradientDimMismatch {
        expected: usize,
        found: usize,
    },
    /// Gradient elements need to be finite.
    InvalidGradient {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    // ---- Curvature ----
    /// Curvature matrix dimensions do not match free-parameter dimensions.
    HessianDimMismatch {
        expected: usize,
        found: (usize, usize),
    },
    /// Curvature values need to be finite.
    InvalidHessian {
        row: usize,
        col: usize,
        value: f64,
    },
    /// The deterministic backend terminated without a curvature estimate.
    MissingCurvature,

    // ---- Optimizer outcome ----
    /// Estimated minimizer entries must be finite.
    InvalidMinimum {
        index: usize,
        value: f64,
        reason: &'static str,
    },
    /// The backend terminated without a best parameter vector.
    MissingMinimum,

    // ---- Neighbor proposals ----
    /// The optional retry cap was hit before a solvable draw was found.
    ProposalRetriesExhausted {
        attempts: usize,
    },
    /// The prior sampler produced a draw matrix with no observations.
    EmptyPriorSample,
    /// Prior draw matrix row count does not match the parameter count.
    PriorSampleDimMismatch {
        expected: usize,
        found: usize,
    },

    // ---- Model ----
    /// A parameter value escaped its declared support.
    BoundsViolation {
        index: usize,
        value: f64,
        lower: f64,
        upper: f64,
    },
    /// The model's equation system has no admissible solution.
    StructuralFailure {
        reason: String,
    },
    /// A parameter value is NaN/±∞.
    NonFiniteParameter {
        index: usize,
        value: f64,
    },
    /// A standalone parameter value is NaN/±∞.
    NonFiniteValue {
        value: f64,
    },
    /// Bounds must satisfy lower < upper without NaN.
    InvalidBounds {
        lower: f64,
        upper: f64,
    },
    /// A free parameter's value must lie inside its support.
    ValueOutsideBounds {
        value: f64,
        lower: f64,
        upper: f64,
    },
    /// Candidate vector length does not match the parameter count.
    ModelDimMismatch {
        expected: usize,
        actual: usize,
    },
    /// Posterior evaluation failed for an unclassified reason.
    EvaluationFailed {
        reason: String,
    },

    // ---- Argmin ----
    /// Wrapper for argmin::InvalidParameter
    InvalidParameter {
        text: String,
    },
    /// Wrapper for argmin::NotImplemented
    NotImplemented {
        text: String,
    },
    /// Wrapper for argmin::NotInitialized
    NotInitialized {
        text: String,
    },
    /// Wrapper for argmin::ConditionViolated
    ConditionViolated {
        text: String,
    },
    /// Wrapper for argmin::CheckPointNotFound
    CheckPointNotFound {
        text: String,
    },
    /// Wrapper for argmin::PotentialBug
    PotentialBug {
        text: String,
    },
    /// Wrapper for argmin::ImpossibleError
    ImpossibleError {
        text: String,
    },
    /// Wrapper for other argmin::Error types
    BackendError {
        text: String,
    },

    // ---- Fallback ----
    UnknownError,
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Configuration ----
            OptError::InvalidMethod { name, reason } => {
                write!(f, "Invalid optimization method '{name}': {reason}")
            }
            OptError::InvalidTolX { tol, reason } => {
                write!(f, "Invalid parameter-space tolerance {tol}: {reason}")
            }
            OptError::InvalidTolF { tol, reason } => {
                write!(f, "Invalid objective-change tolerance {tol}: {reason}")
            }
            OptError::InvalidTolGrad { tol, reason } => {
                write!(f, "Invalid gradient tolerance {tol}: {reason}")
            }
            OptError::InvalidMaxIter { iterations, reason } => {
                write!(f, "Invalid iteration cap {iterations}: {reason}")
            }
            OptError::InvalidCurvatureScale { value, reason } => {
                write!(f, "Invalid initial curvature scale {value}: {reason}")
            }
            OptError::InvalidStepScale { value, reason } => {
                write!(f, "Invalid proposal step scale {value}: {reason}")
            }
            OptError::InvalidTemperature { value, reason } => {
                write!(f, "Invalid annealing temperature {value}: {reason}")
            }

            // ---- Parameter view ----
            OptError::NoFreeParameters => {
                write!(f, "Model exposes no free parameters")
            }
            OptError::FreeVectorDimMismatch { expected, found } => {
                write!(f, "Free-vector length mismatch: expected {expected}, found {found}")
            }

            // ---- Objective ----
            OptError::NonFiniteCost { value } => {
                write!(f, "Non-finite objective value: {value}")
            }

            // ---- Gradient ----
            OptError::GradientDimMismatch { expected, found } => {
                write!(f, "Gradient dimension mismatch: expected {expected}, found {found}")
            }
            OptError::InvalidGradient { index, value, reason } => {
                write!(f, "Invalid gradient at index {index}: {value}: {reason}")
            }

            // ---- Curvature ----
            OptError::HessianDimMismatch { expected, found } => {
                write!(
                    f,
                    "Curvature dimension mismatch: expected ({expected}, {expected}), found {found:?}"
                )
            }
            OptError::InvalidHessian { row, col, value } => {
                write!(f, "Invalid curvature at ({row}, {col}): {value}, must be finite")
            }
            OptError::MissingCurvature => {
                write!(f, "Backend terminated without a curvature estimate")
            }

            // ---- Optimizer outcome ----
            OptError::InvalidMinimum { index, value, reason } => {
                write!(f, "Invalid minimizer entry at index {index}: {value}: {reason}")
            }
            OptError::MissingMinimum => {
                write!(f, "Missing minimizer (no best parameter vector)")
            }

            // ---- Neighbor proposals ----
            OptError::ProposalRetriesExhausted { attempts } => {
                write!(f, "Neighbor proposal retry cap reached after {attempts} attempts")
            }
            OptError::EmptyPriorSample => {
                write!(f, "Prior sample contains no draws")
            }
            OptError::PriorSampleDimMismatch { expected, found } => {
                write!(f, "Prior sample row mismatch: expected {expected}, found {found}")
            }

            // ---- Model ----
            OptError::BoundsViolation { index, value, lower, upper } => {
                write!(
                    f,
                    "Parameter {index} violates bounds: {value} outside [{lower}, {upper}]"
                )
            }
            OptError::StructuralFailure { reason } => {
                write!(f, "Structural solution failure: {reason}")
            }
            OptError::NonFiniteParameter { index, value } => {
                write!(f, "Non-finite parameter at index {index}: {value}")
            }
            OptError::NonFiniteValue { value } => {
                write!(f, "Non-finite parameter value: {value}")
            }
            OptError::InvalidBounds { lower, upper } => {
                write!(f, "Invalid bounds: ({lower}, {upper}), need lower < upper without NaN")
            }
            OptError::ValueOutsideBounds { value, lower, upper } => {
                write!(f, "Parameter value {value} outside bounds [{lower}, {upper}]")
            }
            OptError::ModelDimMismatch { expected, actual } => {
                write!(f, "Candidate length mismatch: expected {expected}, actual {actual}")
            }
            OptError::EvaluationFailed { reason } => {
                write!(f, "Posterior evaluation failed: {reason}")
            }

            // ---- Argmin ----
            OptError::InvalidParameter { text } => {
                write!(f, "Invalid parameter: {text}")
            }
            OptError::NotImplemented { text } => {
                write!(f, "Not implemented: {text}")
            }
            OptError::NotInitialized { text } => {
                write!(f, "Not initialized: {text}")
            }
            OptError::ConditionViolated { text } => {
                write!(f, "Condition violated: {text}")
            }
            OptError::CheckPointNotFound { text } => {
                write!(f, "Checkpoint not found: {text}")
            }
            OptError::PotentialBug { text } => {
                write!(f, "Potential bug: {text}")
            }
            OptError::ImpossibleError { text } => {
                write!(f, "Impossible error: {text}")
            }
            OptError::BackendError { text } => {
                write!(f, "Backend error: {text}")
            }

            // ---- Fallback ----
            OptError::UnknownError => {
                write!(f, "Unknown error")
            }
        }
    }
}

impl From<Error> for OptError {
    fn from(original_err: Error) -> Self {
        match original_err.downcast::<OptError>() {
            Ok(opt_err) => opt_err,
            Err(err) => match err.downcast::<ArgminError>() {
                Ok(argmin_err) => match argmin_err {
                    ArgminError::InvalidParameter { text } => OptError::InvalidParameter { text },
                    ArgminError::NotImplemented { text } => OptError::NotImplemented { text },
                    ArgminError::NotInitialized { text } => OptError::NotInitialized { text },
                    ArgminError::ConditionViolated { text } => {
                        OptError::ConditionViolated { text }
                    }
                    ArgminError::CheckpointNotFound { text } => {
                        OptError::CheckPointNotFound { text }
                    }
                    ArgminError::PotentialBug { text } => OptError::PotentialBug { text },
                    ArgminError::ImpossibleError { text } => OptError::ImpossibleError { text },
                    _ => OptError::UnknownError,
                },
                Err(err) => OptError::BackendError { text: err.to_string() },
            },
        }
    }
}

impl From<SolveError> for OptError {
    fn from(err: SolveError) -> Self {
        match err {
            SolveError::BoundsViolation { index, value, lower, upper } => {
                OptError::BoundsViolation { index, value, lower, upper }
            }
            SolveError::StructuralFailure { reason } => OptError::StructuralFailure { reason },
        }
    }
}

impl From<ModelError> for OptError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Solve(solve_err) => solve_err.into(),
            ModelError::NonFiniteParameter { index, value } => {
                OptError::NonFiniteParameter { index, value }
            }
            ModelError::NonFiniteValue { value } => OptError::NonFiniteValue { value },
            ModelError::InvalidBounds { lower, upper } => OptError::InvalidBounds { lower, upper },
            ModelError::ValueOutsideBounds { value, lower, upper } => {
                OptError::ValueOutsideBounds { value, lower, upper }
            }
            ModelError::DimensionMismatch { expected, actual } => {
                OptError::ModelDimMismatch { expected, actual }
            }
            ModelError::Evaluation { reason } => OptError::EvaluationFailed { reason },
        }
    }
}
