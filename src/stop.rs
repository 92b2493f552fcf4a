//! Termination conditions.
//!
//! The engine is cooperative: every worker evaluates the stop condition
//! against the current best at the end of each iteration, and the first
//! `true` drains all workers. Conditions must therefore be thread-safe.
//!
//! Any `Fn(&S) -> bool + Send + Sync` closure is a condition; the types
//! here cover the common cases (iteration budget, wall clock, objective
//! target, external interrupt) and compose with [`StopCondition::or`].

use crate::types::Solution;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Decides when the search should terminate.
pub trait StopCondition<S>: Send + Sync {
    /// Called at the end of every iteration of every worker with the
    /// current best solution.
    fn should_stop(&self, best: &S) -> bool;

    /// Combines two conditions; the search stops when either fires.
    fn or<B>(self, other: B) -> Or<Self, B>
    where
        Self: Sized,
        B: StopCondition<S>,
    {
        Or { a: self, b: other }
    }
}

impl<S, F> StopCondition<S> for F
where
    F: Fn(&S) -> bool + Send + Sync,
{
    fn should_stop(&self, best: &S) -> bool {
        self(best)
    }
}

/// Stops after a total number of iterations across all workers.
#[derive(Debug)]
pub struct IterationLimit {
    limit: usize,
    seen: AtomicUsize,
}

impl IterationLimit {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            seen: AtomicUsize::new(0),
        }
    }
}

impl<S> StopCondition<S> for IterationLimit {
    fn should_stop(&self, _best: &S) -> bool {
        self.seen.fetch_add(1, Ordering::Relaxed) + 1 >= self.limit
    }
}

/// Stops once a wall-clock budget has elapsed.
#[derive(Debug)]
pub struct TimeLimit {
    deadline: Instant,
}

impl TimeLimit {
    pub fn new(budget: Duration) -> Self {
        Self {
            deadline: Instant::now() + budget,
        }
    }
}

impl<S> StopCondition<S> for TimeLimit {
    fn should_stop(&self, _best: &S) -> bool {
        Instant::now() >= self.deadline
    }
}

/// Stops once the best objective reaches a target value (at or below).
#[derive(Debug)]
pub struct ObjectiveTarget {
    target: f64,
}

impl ObjectiveTarget {
    pub fn new(target: f64) -> Self {
        Self { target }
    }
}

impl<S: Solution> StopCondition<S> for ObjectiveTarget {
    fn should_stop(&self, best: &S) -> bool {
        best.objective() <= self.target
    }
}

/// External cancellation token.
///
/// Hand [`flag`](Interrupt::flag) to another thread and set it to stop
/// the search at the end of the current iterations.
#[derive(Debug, Default)]
pub struct Interrupt {
    flag: Arc<AtomicBool>,
}

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing flag.
    pub fn from_flag(flag: Arc<AtomicBool>) -> Self {
        Self { flag }
    }

    /// The shared flag; store `true` to interrupt.
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }
}

impl<S> StopCondition<S> for Interrupt {
    fn should_stop(&self, _best: &S) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Combination of two conditions; fires when either does.
///
/// Both sides are always evaluated so that stateful conditions (an
/// [`IterationLimit`] counter, say) keep observing every iteration.
#[derive(Debug)]
pub struct Or<A, B> {
    a: A,
    b: B,
}

impl<S, A, B> StopCondition<S> for Or<A, B>
where
    A: StopCondition<S>,
    B: StopCondition<S>,
{
    fn should_stop(&self, best: &S) -> bool {
        let a = self.a.should_stop(best);
        let b = self.b.should_stop(best);
        a || b
    }
}
