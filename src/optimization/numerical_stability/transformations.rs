//! Numerical stability utilities.
//!
//! Provides safe implementations of common nonlinear transforms
//! that are prone to overflow/underflow in naïve form.
//! The functions here follow guarded strategies similar to those
//! in major ML libraries (e.g. PyTorch, TensorFlow), using explicit
//! cutoffs (`x > 20.0`) to keep `f64` arithmetic in a well-conditioned regime.
//!
//! # Provided items
//! - [`GENERAL_TOL`]: generic comparison tolerance shared by callers
//!   that need a "close enough" threshold for `f64` round trips.
//! - [`LOGIT_EPS`]: clamp applied to proportions before taking log-odds,
//!   keeping logits finite at the edges of (0, 1).
//! - [`safe_softplus(x)`]: stable version of `ln(1 + exp(x))`,
//!   mapping ℝ → (0, ∞) without overflow.
//! - [`safe_softplus_inv(x)`]: inverse of softplus, mapping
//!   (0, ∞) → ℝ without catastrophic cancellation.
//! - [`safe_logistic(x)`]: stable logistic `1 / (1 + exp(-x))`,
//!   mapping ℝ → (0, 1) without overflow in either tail.
//! - [`safe_logit(p)`]: inverse of the logistic on (0, 1), with
//!   [`LOGIT_EPS`] clamping so boundary inputs stay finite.
//!
//! # Rationale
//! These transforms are the building blocks of the bounded-parameter
//! reparametrization: two-sided bounds compose an affine map with the
//! logistic/logit pair, one-sided bounds compose a shift with the
//! softplus pair. Keeping the guarded scalar kernels in one place lets
//! the transform layer assume well-conditioned arithmetic.

/// Generic comparison tolerance for `f64` round-trip checks.
///
/// Used by callers that need to decide whether two floating-point values
/// obtained through a transform/inverse-transform pair should be treated
/// as equal.
pub const GENERAL_TOL: f64 = 1e-8;

/// Clamp applied to proportions before log-odds are taken.
///
/// [`safe_logit`] maps its argument into `[LOGIT_EPS, 1 - LOGIT_EPS]`
/// before evaluating `ln(p / (1 - p))`, so values at (or numerically
/// beyond) the boundary of (0, 1) produce large but finite logits
/// instead of ±∞.
pub const LOGIT_EPS: f64 = 1e-12;

/// Numerically stable softplus: `softplus(x) = ln(1 + exp(x))`.
///
/// Computes softplus without overflow for large positive `x` and
/// with good precision for large negative `x`. This implementation
/// uses a simple piecewise guard:
///
/// - For sufficiently large `x`, `softplus(x) ≈ x + ln1p(exp(-x)) ≈ x`.
/// - Otherwise, it falls back to `ln1p(exp(x))`.
///
/// The cutoff used here (`x > 20.0`) is a practical threshold that
/// keeps the calculation in a well-conditioned regime for `f64`
/// (similar to the strategy used in common ML libraries like PyTorch).
///
/// # Parameters
/// - `x`: real input
///
/// # Returns
/// - `softplus(x)` as `f64`.
pub fn safe_softplus(x: f64) -> f64 {
    if x > 20.0 { x } else { x.exp().ln_1p() }
}

/// Stable inverse of softplus on `(0, ∞)`: solves for `t` in
/// `softplus(t) = x`, returning `t = ln(exp(x) - 1)`.
///
/// Direct evaluation of `ln(exp(x) - 1)` can overflow or lose precision.
/// This implementation mirrors the guarded strategy of `safe_softplus`:
///
/// - For sufficiently large `x`, `exp(-x)` is tiny and
///   `ln(exp(x) - 1) ≈ x + ln(1 - exp(-x)) ≈ x`.
/// - Otherwise, it uses `ln(expm1(x))`.
///
/// The cutoff (`x > 20.0`) is chosen for numerical robustness with `f64`.
///
/// # Parameters
/// - `x`: a positive real (the softplus output), must be finite and `> 0`.
///
/// # Returns
/// - `t` such that `softplus(t) = x`.
pub fn safe_softplus_inv(x: f64) -> f64 {
    if x > 20.0 { x } else { x.exp_m1().ln() }
}

/// Numerically stable logistic: `logistic(x) = 1 / (1 + exp(-x))`.
///
/// Evaluates the logistic without overflow in either tail by branching
/// on the sign of `x`:
///
/// - For `x ≥ 0`, uses `1 / (1 + exp(-x))` where `exp(-x) ≤ 1`.
/// - For `x < 0`, uses `exp(x) / (1 + exp(x))` where `exp(x) < 1`.
///
/// # Parameters
/// - `x`: real input.
///
/// # Returns
/// - `logistic(x)` in (0, 1) (boundary values are reached only by
///   non-finite inputs).
pub fn safe_logistic(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Stable log-odds on (0, 1): solves for `t` in `logistic(t) = p`.
///
/// The input is clamped into `[LOGIT_EPS, 1 - LOGIT_EPS]` before
/// `ln(p / (1 - p))` is evaluated, so proportions that have been
/// rounded onto the boundary produce large finite logits instead of
/// ±∞.
///
/// # Parameters
/// - `p`: a proportion, expected in (0, 1); boundary values are
///   tolerated via clamping.
///
/// # Returns
/// - `t` such that `safe_logistic(t) ≈ p` for interior `p`.
pub fn safe_logit(p: f64) -> f64 {
    let p = p.clamp(LOGIT_EPS, 1.0 - LOGIT_EPS);
    (p / (1.0 - p)).ln()
}
