//! mode_finder::view — the free-parameter view of a model's full vector.
//!
//! Purpose
//! -------
//! Map between a model's full parameter vector and the subset the
//! optimizer is allowed to vary. The free-index set is computed once per
//! run from the model's `fixed` flags and then treated as immutable; the
//! gather/scatter pair projects full vectors onto free vectors and
//! writes optimizer iterates back into a cached full vector without
//! disturbing fixed positions.
//!
//! Key behaviors
//! -------------
//! - [`free_indices`] lists the positions of free parameters in
//!   parameter-list order.
//! - [`EvalContext`] owns the per-run state the objective needs between
//!   evaluations: a parameter snapshot (flags and bounds), the free-index
//!   set, and the cached full real-line vector seeded from the model's
//!   current values.
//! - `scatter` overwrites free positions with an optimizer iterate;
//!   `gather` reads them back out in the same relative order.
//!
//! Invariants & assumptions
//! ------------------------
//! - Fixed/free status must not change for the duration of a run; the
//!   context snapshot makes the driver's view of flags and bounds
//!   immune to mid-run model edits.
//! - The cached full vector is in real-line coordinates. Fixed entries
//!   carry their original model-space values unchanged (the transform is
//!   the identity for fixed parameters).
use crate::{
    model::{parameter::Parameter, structural::StructuralModel, transforms::to_real_line},
    optimization::{
        errors::{OptError, OptResult},
        mode_finder::types::{FreeIndexSet, FreeVector, FullVector},
    },
};
use ndarray::Array1;

/// Ordered positions of free parameters in the parameter list.
pub fn free_indices(params: &[Parameter]) -> FreeIndexSet {
    params
        .iter()
        .enumerate()
        .filter_map(|(i, p)| if p.fixed { None } else { Some(i) })
        .collect()
}

/// Per-run evaluation context owned by the objective adapter.
///
/// Holds the parameter snapshot, the free-index set, and the cached full
/// real-line vector that optimizer iterates are scattered into. This is
/// the single place where free coordinates meet the full index space, so
/// every component (objective, proposals, reconstruction) agrees on the
/// mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct EvalContext {
    /// Snapshot of the model's parameters (flags and bounds) at run start.
    pub params: Vec<Parameter>,
    /// Positions of free parameters; stable for the whole run.
    pub free: FreeIndexSet,
    /// Cached full vector in real-line coordinates. Free positions hold
    /// the most recently scattered iterate; fixed positions hold their
    /// original values.
    pub full_real: FullVector,
}

impl EvalContext {
    /// Build a context from the model's current state.
    ///
    /// Reads the parameter list, computes the free-index set, and maps
    /// the current model-space values onto the real line to seed the
    /// cached full vector.
    ///
    /// # Errors
    /// - [`OptError::NoFreeParameters`] when every parameter is fixed.
    /// - Propagates transform errors (e.g., a current value outside its
    ///   declared support).
    pub fn new<M: StructuralModel>(model: &M) -> OptResult<EvalContext> {
        let params: Vec<Parameter> = model.parameters().to_vec();
        let free = free_indices(&params);
        if free.is_empty() {
            return Err(OptError::NoFreeParameters);
        }
        let values = Array1::from_iter(params.iter().map(|p| p.value));
        let full_real = to_real_line(&params, &values)?;
        Ok(EvalContext { params, free, full_real })
    }

    /// Number of free parameters.
    pub fn n_free(&self) -> usize {
        self.free.len()
    }

    /// Total parameter count.
    pub fn n_full(&self) -> usize {
        self.params.len()
    }

    /// Overwrite the free positions of the cached full vector with an
    /// optimizer iterate.
    ///
    /// # Errors
    /// - [`OptError::FreeVectorDimMismatch`] when the iterate length does
    ///   not equal the free count.
    pub fn scatter(&mut self, x_opt: &FreeVector) -> OptResult<()> {
        if x_opt.len() != self.free.len() {
            return Err(OptError::FreeVectorDimMismatch {
                expected: self.free.len(),
                found: x_opt.len(),
            });
        }
        for (k, &i) in self.free.iter().enumerate() {
            self.full_real[i] = x_opt[k];
        }
        Ok(())
    }

    /// Read the free positions of the cached full vector, in free order.
    pub fn gather(&self) -> FreeVector {
        Array1::from_iter(self.free.iter().map(|&i| self.full_real[i]))
    }

    /// Project an arbitrary full vector onto the free positions.
    pub fn gather_from(&self, full: &FullVector) -> FreeVector {
        Array1::from_iter(self.free.iter().map(|&i| full[i]))
    }
}
