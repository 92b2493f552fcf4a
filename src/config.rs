//! PALNS configuration.

use crate::types::{Outcome, PalnsError};

/// Configuration for the PALNS engine.
///
/// # Rewards
///
/// At each iteration the selected destroy/repair pair is pulled toward a
/// reward chosen by the iteration's outcome:
/// - `reward_new_best` (sigma_1): found a new global best solution
/// - `reward_improved` (sigma_2): improved the current solution
/// - `reward_accepted` (sigma_3): accepted a worse solution (via SA criterion)
/// - `reward_rejected`: the candidate was discarded
///
/// The pair's weight is updated by exponential smoothing,
/// `w <- decay * w + (1 - decay) * reward`, so under a constant outcome
/// the weight converges to that outcome's reward. Keeping every reward
/// strictly positive keeps every pair reachable.
///
/// # Acceptance Criterion
///
/// Uses Simulated Annealing: worse solutions are accepted with probability
/// `exp(-delta / temperature)`. Each worker anneals independently from
/// `initial_temperature`, decaying geometrically by `cooling_rate` per
/// iteration, clamped below at `min_temperature`.
///
/// # References
///
/// Ropke & Pisinger (2006), Section 3
///
/// # Examples
///
/// ```
/// use u_palns::PalnsConfig;
///
/// let config = PalnsConfig::default()
///     .with_temperature(50.0, 0.999, 1e-9)
///     .with_rewards(33.0, 9.0, 3.0, 1.0)
///     .with_workers(4)
///     .with_seed(42);
/// ```
#[derive(Debug, Clone)]
pub struct PalnsConfig {
    /// Initial temperature for SA acceptance. Per worker.
    pub initial_temperature: f64,

    /// Cooling rate for SA acceptance (geometric), in (0, 1).
    pub cooling_rate: f64,

    /// Minimum temperature (cooling clamps here, keeping the acceptance
    /// probability well-defined on arbitrarily long runs).
    pub min_temperature: f64,

    /// Starting weight for every destroy/repair pair.
    pub initial_weight: f64,

    /// Reward for finding a new global best (sigma_1).
    pub reward_new_best: f64,

    /// Reward for improving the current solution (sigma_2).
    pub reward_improved: f64,

    /// Reward for accepting a worse solution (sigma_3).
    pub reward_accepted: f64,

    /// Reward for a rejected candidate.
    pub reward_rejected: f64,

    /// Weight smoothing factor, in [0, 1].
    ///
    /// `1.0` freezes weights; `0.0` makes them memoryless (each update
    /// jumps straight to the outcome's reward).
    pub decay: f64,

    /// Objective comparison tolerance.
    ///
    /// A candidate only counts as an improvement when it beats the
    /// reference objective by more than this margin, guarding against
    /// float noise in operators that return numerically equivalent
    /// solutions.
    pub precision: f64,

    /// Number of parallel workers. `None` uses half the available
    /// hardware parallelism (at least one).
    pub num_workers: Option<usize>,

    /// Random seed for the master generator. Worker generators are seeded
    /// from it. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for PalnsConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 100.0,
            cooling_rate: 0.9995,
            min_temperature: 1e-12,
            initial_weight: 1.0,
            reward_new_best: 33.0,
            reward_improved: 9.0,
            reward_accepted: 3.0,
            reward_rejected: 1.0,
            decay: 0.9,
            precision: 1e-6,
            num_workers: None,
            seed: None,
        }
    }
}

impl PalnsConfig {
    pub fn with_temperature(mut self, initial: f64, cooling_rate: f64, min: f64) -> Self {
        self.initial_temperature = initial;
        self.cooling_rate = cooling_rate;
        self.min_temperature = min;
        self
    }

    pub fn with_initial_weight(mut self, weight: f64) -> Self {
        self.initial_weight = weight;
        self
    }

    pub fn with_rewards(mut self, new_best: f64, improved: f64, accepted: f64, rejected: f64) -> Self {
        self.reward_new_best = new_best;
        self.reward_improved = improved;
        self.reward_accepted = accepted;
        self.reward_rejected = rejected;
        self
    }

    pub fn with_decay(mut self, decay: f64) -> Self {
        self.decay = decay;
        self
    }

    pub fn with_precision(mut self, precision: f64) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.num_workers = Some(workers);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// The reward associated with an iteration outcome.
    pub fn reward(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::Rejected => self.reward_rejected,
            Outcome::Accepted => self.reward_accepted,
            Outcome::Improved => self.reward_improved,
            Outcome::NewBest => self.reward_new_best,
        }
    }

    /// The effective worker count: the configured value, or half the
    /// available hardware parallelism (at least one).
    pub fn worker_count(&self) -> usize {
        self.num_workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get() / 2)
                .unwrap_or(1)
                .max(1)
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), PalnsError> {
        if !(self.initial_temperature > 0.0) || !self.initial_temperature.is_finite() {
            return Err(PalnsError::InvalidConfig(format!(
                "initial_temperature must be positive, got {}",
                self.initial_temperature
            )));
        }
        if !(self.cooling_rate > 0.0 && self.cooling_rate < 1.0) {
            return Err(PalnsError::InvalidConfig(format!(
                "cooling_rate must be in (0, 1), got {}",
                self.cooling_rate
            )));
        }
        if !(self.min_temperature > 0.0) {
            return Err(PalnsError::InvalidConfig(format!(
                "min_temperature must be positive, got {}",
                self.min_temperature
            )));
        }
        if !(self.initial_weight > 0.0) || !self.initial_weight.is_finite() {
            return Err(PalnsError::InvalidConfig(format!(
                "initial_weight must be positive, got {}",
                self.initial_weight
            )));
        }
        for (name, reward) in [
            ("reward_new_best", self.reward_new_best),
            ("reward_improved", self.reward_improved),
            ("reward_accepted", self.reward_accepted),
            ("reward_rejected", self.reward_rejected),
        ] {
            if !(reward >= 0.0) || !reward.is_finite() {
                return Err(PalnsError::InvalidConfig(format!(
                    "{name} must be a non-negative finite number, got {reward}"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.decay) {
            return Err(PalnsError::InvalidConfig(format!(
                "decay must be in [0, 1], got {}",
                self.decay
            )));
        }
        if !(self.precision >= 0.0) || !self.precision.is_finite() {
            return Err(PalnsError::InvalidConfig(format!(
                "precision must be non-negative, got {}",
                self.precision
            )));
        }
        if self.num_workers == Some(0) {
            return Err(PalnsError::InvalidConfig(
                "num_workers must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
