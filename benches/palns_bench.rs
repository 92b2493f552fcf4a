//! Criterion benchmarks for the PALNS engine.
//!
//! Uses a synthetic continuous problem (Sphere function) to measure
//! engine overhead (lock traffic, weight updates, acceptance) across
//! worker counts, independent of any domain.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::Rng;
use u_palns::stop::IterationLimit;
use u_palns::{
    DestroyOperator, OperatorError, PalnsConfig, PalnsProblem, PalnsRunner, RepairOperator,
    Solution,
};

// ===========================================================================
// Sphere function: minimize sum(x_i^2)
// ===========================================================================

#[derive(Debug, Clone)]
struct SpherePoint {
    coords: Vec<f64>,
}

impl Solution for SpherePoint {
    fn objective(&self) -> f64 {
        self.coords.iter().map(|x| x * x).sum()
    }
}

struct SphereProblem {
    dim: usize,
}

impl PalnsProblem for SphereProblem {
    type Solution = SpherePoint;

    fn initial_solution<R: Rng>(&self, rng: &mut R) -> SpherePoint {
        SpherePoint {
            coords: (0..self.dim).map(|_| rng.random_range(-5.0..5.0)).collect(),
        }
    }
}

// Destroy: re-randomize one coordinate.
struct ResetCoordinate;

impl DestroyOperator<SpherePoint> for ResetCoordinate {
    fn name(&self) -> &str {
        "reset-coordinate"
    }

    fn destroy<R: Rng>(&self, solution: &SpherePoint, rng: &mut R) -> Result<SpherePoint, OperatorError> {
        let mut out = solution.clone();
        let i = rng.random_range(0..out.coords.len());
        out.coords[i] = rng.random_range(-5.0..5.0);
        Ok(out)
    }
}

// Repair: damp every coordinate toward the origin.
struct DampRepair;

impl RepairOperator<SpherePoint> for DampRepair {
    fn name(&self) -> &str {
        "damp"
    }

    fn repair<R: Rng>(&self, solution: &SpherePoint, rng: &mut R) -> Result<SpherePoint, OperatorError> {
        let factor = rng.random_range(0.8..1.0);
        let mut out = solution.clone();
        for x in &mut out.coords {
            *x *= factor;
        }
        Ok(out)
    }
}

fn bench_palns_sphere(c: &mut Criterion) {
    let problem = SphereProblem { dim: 16 };
    let mut group = c.benchmark_group("palns_sphere");

    for workers in [1usize, 2, 4] {
        group.bench_with_input(BenchmarkId::from_parameter(workers), &workers, |b, &workers| {
            let config = PalnsConfig::default().with_workers(workers).with_seed(7);
            let runner = PalnsRunner::new(config).expect("valid config");
            b.iter(|| {
                let result = runner
                    .solve(
                        &problem,
                        &[ResetCoordinate],
                        &[DampRepair],
                        IterationLimit::new(2_000),
                    )
                    .expect("solve");
                black_box(result.best_objective)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_palns_sphere);
criterion_main!(benches);
