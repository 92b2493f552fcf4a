//! PALNS execution: worker pipeline and coordinator.

use crate::acceptance;
use crate::config::PalnsConfig;
use crate::state::{Evaluated, SearchState, SharedBest};
use crate::stop::StopCondition;
use crate::types::{
    DestroyOperator, Outcome, PalnsError, PalnsProblem, RepairOperator, Solution,
};
use crate::weights::{self, WeightTable};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::Ordering;

/// Result of a PALNS run.
#[derive(Debug, Clone)]
pub struct PalnsResult<S> {
    /// The best solution found.
    pub best: S,

    /// Objective of the best solution.
    pub best_objective: f64,

    /// Total iterations across all workers.
    pub iterations: usize,

    /// Number of times the best solution was replaced.
    pub improvements: usize,

    /// Number of workers that ran.
    pub workers: usize,

    /// Final weight of every destroy/repair pair, in linearized order
    /// (pair `k` is destroy `k / R`, repair `k % R`).
    pub pair_weights: Vec<f64>,

    /// Best objective at seed time and after each improvement.
    /// Non-increasing.
    pub objective_history: Vec<f64>,
}

impl<S> PalnsResult<S> {
    /// Renders the final pair weights as a human-readable table.
    pub fn weight_report(&self, destroy_names: &[&str], repair_names: &[&str]) -> String {
        weights::render_weight_table(&self.pair_weights, destroy_names, repair_names)
    }
}

/// Executes the PALNS algorithm.
///
/// The runner owns a validated configuration; each `solve` call builds an
/// initial solution with the problem's construction heuristic, launches
/// the configured number of workers against shared current/best/weight
/// state, and blocks until the stop condition drains them.
///
/// # Usage
///
/// ```ignore
/// let runner = PalnsRunner::new(PalnsConfig::default().with_seed(42))?;
/// let result = runner.solve(&problem, &destroy_ops, &repair_ops, IterationLimit::new(10_000))?;
/// println!("best: {}", result.best_objective);
/// ```
#[derive(Debug)]
pub struct PalnsRunner {
    config: PalnsConfig,
}

impl PalnsRunner {
    /// Creates a runner, validating the configuration.
    pub fn new(config: PalnsConfig) -> Result<Self, PalnsError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PalnsConfig {
        &self.config
    }

    /// Runs the search until `stop` fires.
    pub fn solve<P, D, RP, C>(
        &self,
        problem: &P,
        destroy_ops: &[D],
        repair_ops: &[RP],
        stop: C,
    ) -> Result<PalnsResult<P::Solution>, PalnsError>
    where
        P: PalnsProblem,
        D: DestroyOperator<P::Solution>,
        RP: RepairOperator<P::Solution>,
        C: StopCondition<P::Solution>,
    {
        self.solve_impl(
            problem,
            destroy_ops,
            repair_ops,
            stop,
            SharedBest::new(),
            None::<fn(&P::Solution)>,
        )
    }

    /// Runs the search, invoking `progress` with the current best after
    /// every iteration. The callback runs under the best lock and is
    /// shared by all workers; keep it cheap.
    pub fn solve_with_progress<P, D, RP, C, F>(
        &self,
        problem: &P,
        destroy_ops: &[D],
        repair_ops: &[RP],
        stop: C,
        progress: F,
    ) -> Result<PalnsResult<P::Solution>, PalnsError>
    where
        P: PalnsProblem,
        D: DestroyOperator<P::Solution>,
        RP: RepairOperator<P::Solution>,
        C: StopCondition<P::Solution>,
        F: Fn(&P::Solution) + Send + Sync,
    {
        self.solve_impl(
            problem,
            destroy_ops,
            repair_ops,
            stop,
            SharedBest::new(),
            Some(progress),
        )
    }

    /// Runs the search publishing the best solution through `best`, so
    /// callers holding a clone of the handle can read the incumbent best
    /// while the search is still running.
    pub fn solve_shared<P, D, RP, C>(
        &self,
        problem: &P,
        destroy_ops: &[D],
        repair_ops: &[RP],
        stop: C,
        best: &SharedBest<P::Solution>,
    ) -> Result<PalnsResult<P::Solution>, PalnsError>
    where
        P: PalnsProblem,
        D: DestroyOperator<P::Solution>,
        RP: RepairOperator<P::Solution>,
        C: StopCondition<P::Solution>,
    {
        self.solve_impl(
            problem,
            destroy_ops,
            repair_ops,
            stop,
            best.clone(),
            None::<fn(&P::Solution)>,
        )
    }

    fn solve_impl<P, D, RP, C, F>(
        &self,
        problem: &P,
        destroy_ops: &[D],
        repair_ops: &[RP],
        stop: C,
        best: SharedBest<P::Solution>,
        progress: Option<F>,
    ) -> Result<PalnsResult<P::Solution>, PalnsError>
    where
        P: PalnsProblem,
        D: DestroyOperator<P::Solution>,
        RP: RepairOperator<P::Solution>,
        C: StopCondition<P::Solution>,
        F: Fn(&P::Solution) + Send + Sync,
    {
        if destroy_ops.is_empty() {
            return Err(PalnsError::InvalidConfig(
                "at least one destroy operator is required".into(),
            ));
        }
        if repair_ops.is_empty() {
            return Err(PalnsError::InvalidConfig(
                "at least one repair operator is required".into(),
            ));
        }

        let mut master = match self.config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::seed_from_u64(rand::random()),
        };

        let initial = Evaluated::new(problem.initial_solution(&mut master));
        let pairs = destroy_ops.len() * repair_ops.len();
        let state = SearchState::new(initial, WeightTable::new(pairs, &self.config), best);
        let workers = self.config.worker_count();

        let config = &self.config;
        let state_ref = &state;
        let stop_ref = &stop;
        let progress_ref = progress.as_ref();

        std::thread::scope(|scope| {
            for _ in 0..workers {
                let worker_seed: u64 = master.random();
                scope.spawn(move || {
                    let rng = SmallRng::seed_from_u64(worker_seed);
                    let outcome = worker_loop(
                        state_ref,
                        destroy_ops,
                        repair_ops,
                        config,
                        stop_ref,
                        progress_ref,
                        rng,
                    );
                    if let Err(error) = outcome {
                        state_ref.fail(error);
                    }
                });
            }
        });

        if let Some(error) = state.take_failure() {
            return Err(error);
        }

        let final_best = state
            .best
            .evaluated()
            .expect("best is seeded before workers start");
        let pair_weights = state.weights.lock().unwrap().weights().to_vec();

        Ok(PalnsResult {
            best: final_best.solution,
            best_objective: final_best.objective,
            iterations: state.iterations.load(Ordering::Relaxed),
            improvements: state.improvements.load(Ordering::Relaxed),
            workers,
            pair_weights,
            objective_history: state.best.history(),
        })
    }
}

/// One worker: repeats the seven-stage iteration pipeline until the stop
/// flag is raised. Each stage takes at most one lock, and no lock is held
/// across a destroy/repair call.
fn worker_loop<S, D, RP, C, F>(
    state: &SearchState<S>,
    destroy_ops: &[D],
    repair_ops: &[RP],
    config: &PalnsConfig,
    stop: &C,
    progress: Option<&F>,
    mut rng: SmallRng,
) -> Result<(), PalnsError>
where
    S: Solution,
    D: DestroyOperator<S>,
    RP: RepairOperator<S>,
    C: StopCondition<S>,
    F: Fn(&S) + Send + Sync,
{
    let mut temperature = config.initial_temperature;

    while !state.stop_requested() {
        // Stage 1: pick an operator pair from the live distribution.
        let draw = rng.random_range(0.0..1.0);
        let pair = state.weights.lock().unwrap().select(draw);
        let (d, r) = weights::split_pair(pair, repair_ops.len());
        let destroy = &destroy_ops[d];
        let repair = &repair_ops[r];

        // Stage 2: snapshot the incumbent.
        let snapshot = state.incumbent.lock().unwrap().solution.clone();

        // Stage 3: transform, outside all locks.
        let destroyed = destroy
            .destroy(&snapshot, &mut rng)
            .map_err(|source| PalnsError::operator(destroy.name(), source))?;
        let candidate = repair
            .repair(&destroyed, &mut rng)
            .map_err(|source| PalnsError::operator(repair.name(), source))?;
        let objective = candidate.objective();

        // Stage 4: reconsider the incumbent. The candidate is judged
        // against whatever the incumbent is now, not the snapshot it was
        // derived from.
        let draw = rng.random_range(0.0..1.0);
        let mut outcome = {
            let mut incumbent = state.incumbent.lock().unwrap();
            let outcome = acceptance::classify(
                incumbent.objective,
                objective,
                temperature,
                config.precision,
                draw,
            );
            if outcome >= Outcome::Accepted {
                *incumbent = Evaluated {
                    solution: candidate.clone(),
                    objective,
                };
            }
            outcome
        };

        // Stage 5: reconsider the best.
        if state.best.try_install(&candidate, objective, config.precision) {
            outcome = Outcome::NewBest;
            state.improvements.fetch_add(1, Ordering::Relaxed);
        }

        // Stage 6: reward the pair.
        state.weights.lock().unwrap().update(pair, outcome);

        // Stage 7: cool, report, and evaluate termination on the best.
        temperature = (temperature * config.cooling_rate).max(config.min_temperature);
        state.iterations.fetch_add(1, Ordering::Relaxed);

        let stop_now = state.best.with(|best| {
            if let Some(report) = progress {
                report(best);
            }
            stop.should_stop(best)
        });
        if stop_now {
            state.request_stop();
        }
    }

    Ok(())
}
