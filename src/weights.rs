//! Adaptive operator-pair weights and roulette-wheel selection.
//!
//! The destroy × repair product is enumerated in a fixed linearization:
//! pair `k` maps to destroy `k / R` and repair `k % R`, where `R` is the
//! number of repair operators. [`WeightTable`] keeps one weight per pair
//! together with a cached cumulative distribution, rebuilt inside the
//! same critical section as every weight mutation so the two are never
//! observed out of sync.

use crate::config::PalnsConfig;
use crate::types::Outcome;
use std::fmt::Write;

/// Splits a linear pair index into `(destroy, repair)` operator indices.
pub fn split_pair(pair: usize, repair_count: usize) -> (usize, usize) {
    (pair / repair_count, pair % repair_count)
}

/// Per-pair selection weights with a cached cumulative distribution.
#[derive(Debug, Clone)]
pub struct WeightTable {
    weights: Vec<f64>,
    cumulative: Vec<f64>,
    decay: f64,
    reward_new_best: f64,
    reward_improved: f64,
    reward_accepted: f64,
    reward_rejected: f64,
}

impl WeightTable {
    /// Creates a table of `pairs` uniform weights from the configured
    /// initial weight, decay, and rewards.
    pub fn new(pairs: usize, config: &PalnsConfig) -> Self {
        let mut table = Self {
            weights: vec![config.initial_weight; pairs],
            cumulative: vec![0.0; pairs],
            decay: config.decay,
            reward_new_best: config.reward_new_best,
            reward_improved: config.reward_improved,
            reward_accepted: config.reward_accepted,
            reward_rejected: config.reward_rejected,
        };
        table.rebuild();
        table
    }

    /// Number of operator pairs.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Selects a pair by inverse-CDF sampling: the smallest index whose
    /// cumulative weight strictly exceeds `draw`, falling back to the
    /// last index when rounding pushes the draw to (or past) the top of
    /// the distribution.
    pub fn select(&self, draw: f64) -> usize {
        self.cumulative
            .iter()
            .position(|&c| c > draw)
            .unwrap_or(self.cumulative.len() - 1)
    }

    /// Pulls the pair's weight toward the outcome's reward by exponential
    /// smoothing, then rebuilds the cumulative distribution.
    pub fn update(&mut self, pair: usize, outcome: Outcome) {
        let reward = self.reward(outcome);
        self.weights[pair] = self.decay * self.weights[pair] + (1.0 - self.decay) * reward;
        self.rebuild();
    }

    /// The current weight of every pair.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// The selection probability of every pair.
    pub fn probabilities(&self) -> Vec<f64> {
        let total: f64 = self.weights.iter().sum();
        self.weights.iter().map(|w| w / total).collect()
    }

    fn reward(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::Rejected => self.reward_rejected,
            Outcome::Accepted => self.reward_accepted,
            Outcome::Improved => self.reward_improved,
            Outcome::NewBest => self.reward_new_best,
        }
    }

    fn rebuild(&mut self) {
        let total: f64 = self.weights.iter().sum();
        let mut running = 0.0;
        for (cumulative, weight) in self.cumulative.iter_mut().zip(&self.weights) {
            running += weight;
            *cumulative = running / total;
        }
        // The running sum may land a few ulps off 1; pin the top so a
        // draw below 1 always finds an index.
        if let Some(last) = self.cumulative.last_mut() {
            *last = 1.0;
        }
    }
}

/// Renders a human-readable table of pair weights and implied selection
/// probabilities. Pure formatting; not part of the search contract.
pub fn render_weight_table(
    weights: &[f64],
    destroy_names: &[&str],
    repair_names: &[&str],
) -> String {
    debug_assert_eq!(weights.len(), destroy_names.len() * repair_names.len());

    let name_width = destroy_names
        .iter()
        .chain(repair_names.iter())
        .map(|n| n.len())
        .max()
        .unwrap_or(6)
        .max(6);

    let total: f64 = weights.iter().sum();
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>4}  {:<name_width$}  {:<name_width$}  {:>10}  {:>11}",
        "pair", "destroy", "repair", "weight", "probability"
    );
    for (pair, weight) in weights.iter().enumerate() {
        let (d, r) = split_pair(pair, repair_names.len());
        let _ = writeln!(
            out,
            "{:>4}  {:<name_width$}  {:<name_width$}  {:>10.4}  {:>11.4}",
            pair,
            destroy_names[d],
            repair_names[r],
            weight,
            weight / total
        );
    }
    let _ = writeln!(
        out,
        "{:>4}  {:<name_width$}  {:<name_width$}  {:>10.4}  {:>11.4}",
        "", "total", "", total, 1.0
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    fn table(pairs: usize) -> WeightTable {
        WeightTable::new(pairs, &PalnsConfig::default())
    }

    #[test]
    fn test_initial_table_is_uniform() {
        let table = table(6);
        assert_eq!(table.len(), 6);
        assert!(table.weights().iter().all(|&w| (w - 1.0).abs() < 1e-12));
        assert!((table.cumulative[5] - 1.0).abs() < 1e-12);
        for p in table.probabilities() {
            assert!((p - 1.0 / 6.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_split_pair_linearization() {
        // 2 destroy x 3 repair: pair k -> (k / 3, k % 3).
        assert_eq!(split_pair(0, 3), (0, 0));
        assert_eq!(split_pair(2, 3), (0, 2));
        assert_eq!(split_pair(3, 3), (1, 0));
        assert_eq!(split_pair(5, 3), (1, 2));
    }

    #[test]
    fn test_select_contract() {
        let table = table(4);
        // C = [0.25, 0.5, 0.75, 1.0]; strictly-greater comparison.
        assert_eq!(table.select(0.0), 0);
        assert_eq!(table.select(0.24), 0);
        assert_eq!(table.select(0.25), 1);
        assert_eq!(table.select(0.74), 2);
        assert_eq!(table.select(0.999), 3);
    }

    #[test]
    fn test_select_falls_back_to_last_index() {
        let table = table(3);
        // No index satisfies C[i] > 1.0; the last pair is returned.
        assert_eq!(table.select(1.0), 2);
    }

    #[test]
    fn test_update_converges_to_reward() {
        let config = PalnsConfig::default().with_rewards(33.0, 9.0, 3.0, 0.5);
        let mut table = WeightTable::new(2, &config);
        for _ in 0..500 {
            table.update(0, Outcome::Rejected);
            table.update(1, Outcome::NewBest);
        }
        assert!((table.weights()[0] - 0.5).abs() < 1e-9);
        assert!((table.weights()[1] - 33.0).abs() < 1e-9);
    }

    #[test]
    fn test_decay_one_freezes_weights() {
        let config = PalnsConfig::default().with_decay(1.0);
        let mut table = WeightTable::new(2, &config);
        table.update(0, Outcome::NewBest);
        assert!((table.weights()[0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_decay_zero_is_memoryless() {
        let config = PalnsConfig::default().with_decay(0.0);
        let mut table = WeightTable::new(2, &config);
        table.update(0, Outcome::NewBest);
        assert!((table.weights()[0] - 33.0).abs() < 1e-12);
        table.update(0, Outcome::Rejected);
        assert!((table.weights()[0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cumulative_invariants_hold_under_updates() {
        let mut rng = SmallRng::seed_from_u64(11);
        let mut table = table(8);
        let outcomes = [
            Outcome::Rejected,
            Outcome::Accepted,
            Outcome::Improved,
            Outcome::NewBest,
        ];
        for _ in 0..1000 {
            let pair = rng.random_range(0..8);
            let outcome = outcomes[rng.random_range(0..4)];
            table.update(pair, outcome);

            assert!(table.weights().iter().all(|&w| w > 0.0));
            for window in table.cumulative.windows(2) {
                assert!(window[1] >= window[0] - 1e-12);
            }
            assert!((table.cumulative.last().unwrap() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_empirical_selection_frequency_tracks_weights() {
        // W = [3, 1]: pair 0 should be drawn ~75% of the time.
        let mut table = table(2);
        table.weights = vec![3.0, 1.0];
        table.rebuild();

        let mut rng = SmallRng::seed_from_u64(42);
        let draws = 10_000;
        let mut first = 0usize;
        for _ in 0..draws {
            if table.select(rng.random_range(0.0..1.0)) == 0 {
                first += 1;
            }
        }
        let frequency = first as f64 / draws as f64;
        assert!(
            (0.72..=0.78).contains(&frequency),
            "expected ~0.75, got {frequency}"
        );
    }

    #[test]
    fn test_render_weight_table() {
        let mut table = table(4);
        table.weights = vec![4.0, 2.0, 1.0, 1.0];
        table.rebuild();

        let report = render_weight_table(table.weights(), &["random", "worst"], &["greedy", "regret"]);
        assert!(report.contains("random"));
        assert!(report.contains("regret"));
        assert!(report.contains("0.5000"), "pair 0 probability:\n{report}");
        assert!(report.contains("8.0000"), "total weight:\n{report}");
        assert_eq!(report.lines().count(), 6);
    }
}
