// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! # Workload Generator
//!
//! Seeded generator of synthetic periodic job sets, used by benchmarks and
//! stress tests. Each task gets a period drawn from the configured range and
//! releases one job per period up to the horizon; release jitter and a
//! best-case/worst-case execution-time ratio introduce the interval
//! uncertainty the analysis is built for.

use crate::job::Job;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sag_core::{Interval, Time};

/// Configuration of a synthetic workload.
#[derive(Debug, Clone)]
pub struct WorkloadConfig {
    /// Number of periodic tasks.
    pub num_tasks: usize,
    /// Generate releases for every task up to this instant.
    pub horizon: i64,
    /// Inclusive range from which task periods are drawn.
    pub min_period: i64,
    pub max_period: i64,
    /// Total utilization spread evenly over the tasks.
    pub utilization: f64,
    /// Maximal release jitter per job.
    pub jitter: i64,
    /// Best-case cost as a fraction of the worst-case cost.
    pub cost_ratio: f64,
    /// Rate-monotonic priorities (by period) instead of index order.
    pub rate_monotonic: bool,
    pub seed: u64,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        WorkloadConfig {
            num_tasks: 5,
            horizon: 10_000,
            min_period: 500,
            max_period: 2_500,
            utilization: 0.6,
            jitter: 10,
            cost_ratio: 0.5,
            rate_monotonic: true,
            seed: 42,
        }
    }
}

/// Deterministic workload generator. The same configuration always yields
/// the same job set.
#[derive(Debug)]
pub struct WorkloadGenerator {
    cfg: WorkloadConfig,
    rng: ChaCha8Rng,
}

impl WorkloadGenerator {
    pub fn new(cfg: WorkloadConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(cfg.seed);
        WorkloadGenerator { cfg, rng }
    }

    /// Generates the job set, ordered by task and release.
    pub fn generate<T: Time>(&mut self) -> Vec<Job<T>> {
        let cfg = self.cfg.clone();
        let per_task_util = cfg.utilization / cfg.num_tasks as f64;
        let mut jobs = Vec::new();

        for task in 0..cfg.num_tasks {
            let period = self.rng.gen_range(cfg.min_period..=cfg.max_period);
            let wcet = std::cmp::max((period as f64 * per_task_util) as i64, 1);
            let bcet = ((wcet as f64 * cfg.cost_ratio) as i64).clamp(1, wcet);
            let priority = if cfg.rate_monotonic {
                period
            } else {
                task as i64 + 1
            };

            let mut release = 0i64;
            let mut job_no = 1u64;
            while release < cfg.horizon {
                let jitter = if cfg.jitter > 0 {
                    self.rng.gen_range(0..=cfg.jitter)
                } else {
                    0
                };
                jobs.push(Job::new(
                    task as u64 + 1,
                    job_no,
                    Interval::new(cast(release), cast(release + jitter)),
                    Interval::new(cast(bcet), cast(wcet)),
                    cast(release + period),
                    cast(priority),
                ));
                release += period;
                job_no += 1;
            }
        }
        jobs
    }
}

fn cast<T: Time>(v: i64) -> T {
    num_traits::cast(v).expect("generated value representable in the time scalar")
}
