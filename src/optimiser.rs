// src/optimiser.rs - Parallel recursive bounded sampler
//
// The search draws uniform batches from a hyperrectangle, evaluates
// them across a rayon pool, then recurses into shrunken boxes around
// the best candidates until the time budget runs out or every side
// falls inside its rounding resolution. Sample vectors are drawn on the
// orchestrating thread from one seedable RNG and best-result updates
// happen after each batch, so a fixed seed with one worker reproduces
// the same result run to run.

use crate::constants::SAMPLES_PER_DIM;
use crate::sim_log;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Host-set cancellation flag, checked between sample batches. The host
/// wires this to Ctrl-C; a cancelled search returns its current best.
static INTERRUPTED: AtomicBool = AtomicBool::new(false);

pub fn interrupt() {
    INTERRUPTED.store(true, Ordering::SeqCst);
}

pub fn reset_interrupt() {
    INTERRUPTED.store(false, Ordering::SeqCst);
}

pub fn is_interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}

/// Payload the objective hands back per sample. Infeasible samples
/// report no score and sort after every scored sample.
pub trait OptResult: Clone + Send {
    fn score(&self) -> Option<f64>;
}

/// The best sample seen so far, with its full payload.
#[derive(Debug, Clone)]
pub struct Best<R> {
    pub score: f64,
    pub params: Vec<f64>,
    pub result: R,
}

pub struct Optimiser<F, R>
where
    F: Fn(&[f64]) -> R + Sync,
    R: OptResult,
{
    pub objective: F,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
    pub maximise: bool,
    pub max_runtime: Duration,
    pub sample_rounds: usize,
    pub bounds_scale: f64,
    pub n_threads: usize,
    pub log_level: usize,
    pub seed: Option<u64>,
    /// Per-dimension rounding resolution; a branch stops narrowing once
    /// every side is inside it. Zero entries never stop a branch.
    pub resolution: Vec<f64>,
    best: Mutex<Option<Best<R>>>,
    evaluated: AtomicUsize,
    batches: AtomicUsize,
}

impl<F, R> Optimiser<F, R>
where
    F: Fn(&[f64]) -> R + Sync,
    R: OptResult,
{
    pub fn new(objective: F, lower: Vec<f64>, upper: Vec<f64>, maximise: bool) -> Self {
        let dim = lower.len();
        Optimiser {
            objective,
            lower,
            upper,
            maximise,
            max_runtime: Duration::from_secs(3),
            sample_rounds: 5,
            bounds_scale: 0.5,
            n_threads: 1,
            log_level: 0,
            seed: None,
            resolution: vec![0.0; dim],
            best: Mutex::new(None),
            evaluated: AtomicUsize::new(0),
            batches: AtomicUsize::new(0),
        }
    }

    /// Total objective evaluations so far.
    pub fn evaluations(&self) -> usize {
        self.evaluated.load(Ordering::Relaxed)
    }

    /// Run the search to completion and return the best result found.
    pub fn find_best(&self) -> Result<Option<Best<R>>, String> {
        if self.lower.is_empty() || self.lower.len() != self.upper.len() {
            return Err("config error: optimiser bounds are empty or mismatched".to_string());
        }
        if self
            .lower
            .iter()
            .zip(&self.upper)
            .any(|(lo, hi)| !lo.is_finite() || !hi.is_finite() || lo > hi)
        {
            return Err("config error: optimiser bounds are inverted or non-finite".to_string());
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.n_threads.max(1))
            .build()
            .map_err(|e| format!("config error: failed to build worker pool: {}", e))?;

        let start = Instant::now();
        let deadline = start + self.max_runtime;
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        self.search(
            &pool,
            self.lower.clone(),
            self.upper.clone(),
            start,
            deadline,
            deadline,
            &mut rng,
            0,
        );

        Ok(self.best.lock().unwrap().clone())
    }

    fn best_score_text(&self) -> String {
        match self.best.lock().unwrap().as_ref() {
            Some(b) => format!("{:.4}", b.score),
            None => "none".to_string(),
        }
    }

    fn converged(&self, lower: &[f64], upper: &[f64]) -> bool {
        self.resolution
            .iter()
            .enumerate()
            .all(|(d, res)| *res > 0.0 && upper[d] - lower[d] <= *res)
    }

    #[allow(clippy::too_many_arguments)]
    fn search(
        &self,
        pool: &rayon::ThreadPool,
        lower: Vec<f64>,
        upper: Vec<f64>,
        start: Instant,
        global_deadline: Instant,
        branch_deadline: Instant,
        rng: &mut StdRng,
        depth: usize,
    ) {
        if is_interrupted() {
            return;
        }
        let now = Instant::now();
        if now >= global_deadline || now >= branch_deadline {
            return;
        }

        let dim = lower.len();
        let batch = (self.sample_rounds * dim * SAMPLES_PER_DIM).max(1);

        // Sample phase: draw on this thread so the sequence depends only
        // on the seed, never on worker scheduling.
        let samples: Vec<Vec<f64>> = (0..batch)
            .map(|_| {
                (0..dim)
                    .map(|d| {
                        if upper[d] > lower[d] {
                            rng.random_range(lower[d]..=upper[d])
                        } else {
                            lower[d]
                        }
                    })
                    .collect()
            })
            .collect();

        let results: Vec<R> =
            pool.install(|| samples.par_iter().map(|p| (self.objective)(p)).collect());

        self.evaluated.fetch_add(batch, Ordering::Relaxed);
        let batch_no = self.batches.fetch_add(1, Ordering::Relaxed) + 1;

        // Select phase: feasible results ranked by score, best first.
        let mut order: Vec<usize> = (0..batch)
            .filter(|i| results[*i].score().map_or(false, |s| s.is_finite()))
            .collect();
        order.sort_by(|a, b| {
            let sa = results[*a].score().unwrap_or(f64::NEG_INFINITY);
            let sb = results[*b].score().unwrap_or(f64::NEG_INFINITY);
            if self.maximise {
                sb.partial_cmp(&sa).unwrap_or(std::cmp::Ordering::Equal)
            } else {
                sa.partial_cmp(&sb).unwrap_or(std::cmp::Ordering::Equal)
            }
        });

        if let Some(&top) = order.first() {
            let score = results[top].score().unwrap_or(f64::NEG_INFINITY);
            let mut best = self.best.lock().unwrap();
            let improves = match best.as_ref() {
                None => true,
                Some(b) => {
                    if self.maximise {
                        score > b.score
                    } else {
                        score < b.score
                    }
                }
            };
            if improves {
                *best = Some(Best {
                    score,
                    params: samples[top].clone(),
                    result: results[top].clone(),
                });
            }
        }

        // Progress at levels 1 and 2 comes from depth zero only; level 3
        // narrates every batch in the tree.
        if self.log_level >= 3 || (depth == 0 && self.log_level >= 1) {
            sim_log::progress(
                self.log_level,
                &format!(
                    "[optimiser] batch {} | {} evaluated | best {} | {:.2}s elapsed",
                    batch_no,
                    self.evaluations(),
                    self.best_score_text(),
                    start.elapsed().as_secs_f64()
                ),
            );
        }

        // Narrow phase: recurse into a shrunken box around each of the
        // top candidates, splitting the remaining branch time evenly.
        let children = self.sample_rounds.min(order.len());
        for rank in 0..children {
            if is_interrupted() {
                return;
            }
            let now = Instant::now();
            let deadline = branch_deadline.min(global_deadline);
            if now >= deadline {
                return;
            }
            let share = deadline.saturating_duration_since(now) / ((children - rank) as u32);
            let child_deadline = now + share;

            let center = &samples[order[rank]];
            let mut child_lower = Vec::with_capacity(dim);
            let mut child_upper = Vec::with_capacity(dim);
            for d in 0..dim {
                let half_side = self.bounds_scale * (upper[d] - lower[d]) / 2.0;
                child_lower.push((center[d] - half_side).max(self.lower[d]));
                child_upper.push((center[d] + half_side).min(self.upper[d]));
            }
            // Nothing left to resolve inside this child box.
            if self.converged(&child_lower, &child_upper) {
                continue;
            }

            self.search(
                pool,
                child_lower,
                child_upper,
                start,
                global_deadline,
                child_deadline,
                rng,
                depth + 1,
            );

            if depth == 0 {
                sim_log::progress(
                    self.log_level,
                    &format!(
                        "[optimiser] branch {}/{} complete | {} evaluated | best {} | {:.2}s elapsed",
                        rank + 1,
                        children,
                        self.evaluations(),
                        self.best_score_text(),
                        start.elapsed().as_secs_f64()
                    ),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use more_asserts::assert_ge;

    #[derive(Clone, Debug)]
    struct Scored(Option<f64>);

    impl OptResult for Scored {
        fn score(&self) -> Option<f64> {
            self.0
        }
    }

    #[test]
    fn test_finds_peak_of_concave_objective() {
        let objective = |p: &[f64]| Scored(Some(-(p[0] - 2.0) * (p[0] - 2.0)));
        let mut optim = Optimiser::new(objective, vec![0.0], vec![10.0], true);
        optim.seed = Some(42);
        optim.resolution = vec![0.001];
        optim.max_runtime = Duration::from_secs(5);
        let best = optim.find_best().unwrap().expect("found something");
        assert_abs_diff_eq!(best.params[0], 2.0, epsilon = 0.1);
    }

    #[test]
    fn test_minimise_direction() {
        let objective = |p: &[f64]| Scored(Some((p[0] - 7.0).abs()));
        let mut optim = Optimiser::new(objective, vec![0.0], vec![10.0], false);
        optim.seed = Some(7);
        optim.resolution = vec![0.001];
        optim.max_runtime = Duration::from_secs(5);
        let best = optim.find_best().unwrap().expect("found something");
        assert_abs_diff_eq!(best.params[0], 7.0, epsilon = 0.1);
    }

    #[test]
    fn test_infeasible_region_never_wins() {
        // Everything below 5 is infeasible; the best must be >= 5.
        let objective = |p: &[f64]| {
            if p[0] < 5.0 {
                Scored(None)
            } else {
                Scored(Some(-p[0]))
            }
        };
        let mut optim = Optimiser::new(objective, vec![0.0], vec![10.0], true);
        optim.seed = Some(3);
        optim.resolution = vec![0.01];
        optim.max_runtime = Duration::from_secs(5);
        let best = optim.find_best().unwrap().expect("found something");
        assert_ge!(best.params[0], 5.0);
    }

    #[test]
    fn test_all_infeasible_yields_none() {
        let objective = |_p: &[f64]| Scored(None);
        let mut optim = Optimiser::new(objective, vec![0.0], vec![1.0], true);
        optim.seed = Some(1);
        optim.resolution = vec![0.05];
        optim.max_runtime = Duration::from_secs(2);
        assert!(optim.find_best().unwrap().is_none());
    }

    #[test]
    fn test_seeded_single_thread_is_deterministic() {
        let run = || {
            let objective = |p: &[f64]| Scored(Some(-(p[0] - 0.3).abs() - (p[1] - 0.6).abs()));
            let mut optim = Optimiser::new(objective, vec![0.0, 0.0], vec![1.0, 1.0], true);
            optim.seed = Some(1234);
            optim.n_threads = 1;
            optim.resolution = vec![0.05, 0.05];
            optim.max_runtime = Duration::from_secs(30);
            optim.find_best().unwrap().expect("found something")
        };
        let a = run();
        let b = run();
        assert_eq!(a.params, b.params);
        assert_eq!(a.score, b.score);
    }

    #[test]
    fn test_degenerate_dimension_is_pinned() {
        // Second coordinate has a collapsed range and must stay put.
        let objective = |p: &[f64]| Scored(Some(-(p[0] - 1.0).abs() + p[1]));
        let mut optim = Optimiser::new(objective, vec![0.0, 4.0], vec![2.0, 4.0], true);
        optim.seed = Some(9);
        optim.resolution = vec![0.01, 0.01];
        optim.max_runtime = Duration::from_secs(5);
        let best = optim.find_best().unwrap().expect("found something");
        assert_abs_diff_eq!(best.params[1], 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rejects_bad_bounds() {
        let objective = |_p: &[f64]| Scored(Some(0.0));
        let optim = Optimiser::new(objective, vec![1.0], vec![0.0], true);
        assert!(optim.find_best().is_err());
    }
}
