//! Shared search state and its guards.
//!
//! Three independent critical sections, one primitive each: the weight
//! table, the incumbent, and the best solution. Every pipeline stage
//! acquires at most one of them and none is ever held across a
//! destroy/repair call, so no acquisition nests and deadlock is
//! structurally impossible.

use crate::types::{PalnsError, Solution};
use crate::weights::WeightTable;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A solution paired with its cached objective value.
#[derive(Debug, Clone)]
pub(crate) struct Evaluated<S> {
    pub solution: S,
    pub objective: f64,
}

impl<S: Solution> Evaluated<S> {
    pub fn new(solution: S) -> Self {
        let objective = solution.objective();
        Self {
            solution,
            objective,
        }
    }
}

/// Concurrent holder for the best solution found so far.
///
/// Cloneable handle; all clones observe the same slot. A handle passed
/// to [`PalnsRunner::solve_shared`](crate::PalnsRunner::solve_shared)
/// lets another thread watch the search while it runs:
///
/// ```
/// use u_palns::SharedBest;
///
/// let best: SharedBest<f64> = SharedBest::new();
/// assert!(best.objective().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct SharedBest<S> {
    inner: Arc<Mutex<BestSlot<S>>>,
}

#[derive(Debug)]
struct BestSlot<S> {
    best: Option<Evaluated<S>>,
    history: Vec<f64>,
}

impl<S> Default for SharedBest<S> {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(BestSlot {
                best: None,
                history: Vec::new(),
            })),
        }
    }
}

impl<S> SharedBest<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Objective of the current best, if a search has produced one.
    pub fn objective(&self) -> Option<f64> {
        self.inner.lock().unwrap().best.as_ref().map(|b| b.objective)
    }
}

impl<S: Solution> SharedBest<S> {
    /// Cloned snapshot of the current best, if a search has produced one.
    pub fn snapshot(&self) -> Option<S> {
        self.inner
            .lock()
            .unwrap()
            .best
            .as_ref()
            .map(|b| b.solution.clone())
    }

    /// Installs the initial solution and resets the history.
    pub(crate) fn seed(&self, value: Evaluated<S>) {
        let mut slot = self.inner.lock().unwrap();
        slot.history.clear();
        slot.history.push(value.objective);
        slot.best = Some(value);
    }

    /// Installs the candidate if it beats the stored best by more than
    /// `precision`. Returns whether it was installed.
    pub(crate) fn try_install(&self, candidate: &S, objective: f64, precision: f64) -> bool {
        let mut slot = self.inner.lock().unwrap();
        let improved = match &slot.best {
            Some(best) => best.objective - objective > precision,
            None => true,
        };
        if improved {
            slot.best = Some(Evaluated {
                solution: candidate.clone(),
                objective,
            });
            slot.history.push(objective);
        }
        improved
    }

    /// Runs `f` against the current best under the lock.
    pub(crate) fn with<T>(&self, f: impl FnOnce(&S) -> T) -> T {
        let slot = self.inner.lock().unwrap();
        let best = slot
            .best
            .as_ref()
            .expect("best is seeded before workers start");
        f(&best.solution)
    }

    pub(crate) fn evaluated(&self) -> Option<Evaluated<S>> {
        self.inner.lock().unwrap().best.clone()
    }

    pub(crate) fn history(&self) -> Vec<f64> {
        self.inner.lock().unwrap().history.clone()
    }
}

/// All state shared between workers for the duration of one solve call.
pub(crate) struct SearchState<S> {
    /// Weight lock: pair weights and their cumulative distribution.
    pub weights: Mutex<WeightTable>,
    /// Clone lock: the incumbent solution.
    pub incumbent: Mutex<Evaluated<S>>,
    /// Best lock: the best solution, behind the public handle.
    pub best: SharedBest<S>,
    pub iterations: AtomicUsize,
    pub improvements: AtomicUsize,
    stop: AtomicBool,
    failure: Mutex<Option<PalnsError>>,
}

impl<S: Solution> SearchState<S> {
    pub fn new(initial: Evaluated<S>, weights: WeightTable, best: SharedBest<S>) -> Self {
        best.seed(initial.clone());
        Self {
            weights: Mutex::new(weights),
            incumbent: Mutex::new(initial),
            best,
            iterations: AtomicUsize::new(0),
            improvements: AtomicUsize::new(0),
            stop: AtomicBool::new(false),
            failure: Mutex::new(None),
        }
    }

    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    pub fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    /// Records a worker failure and drains the search. The first failure
    /// wins; later ones are dropped.
    pub fn fail(&self, error: PalnsError) {
        let mut slot = self.failure.lock().unwrap();
        if slot.is_none() {
            *slot = Some(error);
        }
        drop(slot);
        self.request_stop();
    }

    pub fn take_failure(&self) -> Option<PalnsError> {
        self.failure.lock().unwrap().take()
    }
}
