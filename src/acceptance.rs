//! Simulated-annealing acceptance oracle.

use crate::types::Outcome;

/// Classifies a candidate against the incumbent.
///
/// A candidate that beats the incumbent by more than `precision` is an
/// improvement. Anything else is put to the Metropolis criterion: it is
/// accepted with probability `exp(-delta / temperature)` where `delta`
/// is the (non-negative, up to `precision`) objective increase. A
/// candidate with equal objective has acceptance probability 1 and is
/// always accepted.
///
/// `temperature` must be positive; `draw` is a uniform sample from [0, 1).
pub(crate) fn classify(
    current: f64,
    candidate: f64,
    temperature: f64,
    precision: f64,
    draw: f64,
) -> Outcome {
    if current - candidate > precision {
        return Outcome::Improved;
    }
    let delta = candidate - current;
    let probability = (-delta / temperature).exp();
    if draw <= probability {
        Outcome::Accepted
    } else {
        Outcome::Rejected
    }
}
