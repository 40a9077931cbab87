//! mode_finder::trace — per-iteration trace observer.
//!
//! Purpose
//! -------
//! Implement `argmin`'s observer interface to realize the driver's trace
//! options: `store_trace` retains one [`TraceEntry`] per iteration for
//! the caller, `show_trace` streams a line per iteration to stderr, and
//! `extended_trace` additionally carries the current free parameter
//! vector. The recorder is attached by the runners only when at least
//! one of the options is on, so the default path costs nothing.
//!
//! Conventions
//! -----------
//! - Costs are reported in the optimizer's minimization convention (the
//!   negated posterior); the sign flip back to posterior space happens
//!   only in [`ModeOutcome`](crate::optimization::mode_finder::traits::ModeOutcome).
//! - Entries are shared through an `Arc<Mutex<..>>` handle because
//!   `argmin` owns the observer during the run; the runner drains the
//!   handle afterwards via [`TraceRecorder::drain`].
use crate::optimization::mode_finder::{traits::TraceOptions, types::FreeVector};
use argmin::core::{Error, KV, State, observers::Observe};
use std::sync::{Arc, Mutex};

/// One recorded backend iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceEntry {
    /// Iteration counter as reported by the backend.
    pub iter: u64,
    /// Cost (negated posterior) at the current iterate.
    pub cost: f64,
    /// Best cost seen so far.
    pub best_cost: f64,
    /// Current free parameter vector; populated only under
    /// `extended_trace`.
    pub param: Option<FreeVector>,
}

/// Observer recording and/or streaming per-iteration state.
#[derive(Debug, Clone)]
pub struct TraceRecorder {
    entries: Arc<Mutex<Vec<TraceEntry>>>,
    store: bool,
    show: bool,
    extended: bool,
}

impl TraceRecorder {
    /// Build a recorder from the driver's trace options.
    pub fn new(opts: &TraceOptions) -> Self {
        TraceRecorder {
            entries: Arc::new(Mutex::new(Vec::new())),
            store: opts.store_trace,
            show: opts.show_trace,
            extended: opts.extended_trace,
        }
    }

    /// Whether any trace option requires attaching the observer.
    pub fn is_active(&self) -> bool {
        self.store || self.show
    }

    /// Shared handle to the recorded entries.
    pub fn handle(&self) -> Arc<Mutex<Vec<TraceEntry>>> {
        self.entries.clone()
    }

    /// Drain recorded entries from a handle after the run.
    pub fn drain(handle: &Arc<Mutex<Vec<TraceEntry>>>) -> Vec<TraceEntry> {
        let mut guard = handle.lock().expect("trace handle poisoned");
        std::mem::take(&mut *guard)
    }
}

impl<I> Observe<I> for TraceRecorder
where
    I: State<Param = FreeVector, Float = f64>,
{
    /// Record and/or stream one iteration.
    fn observe_iter(&mut self, state: &I, _kv: &KV) -> Result<(), Error> {
        let entry = TraceEntry {
            iter: state.get_iter(),
            cost: state.get_cost(),
            best_cost: state.get_best_cost(),
            param: if self.extended { state.get_param().cloned() } else { None },
        };
        if self.show {
            match &entry.param {
                Some(param) => eprintln!(
                    "iter {:>6}: cost = {:.6e}, best = {:.6e}, x = {:?}",
                    entry.iter,
                    entry.cost,
                    entry.best_cost,
                    param.as_slice().unwrap_or(&[])
                ),
                None => eprintln!(
                    "iter {:>6}: cost = {:.6e}, best = {:.6e}",
                    entry.iter, entry.cost, entry.best_cost
                ),
            }
        }
        if self.store {
            self.entries.lock().expect("trace handle poisoned").push(entry);
        }
        Ok(())
    }
}
