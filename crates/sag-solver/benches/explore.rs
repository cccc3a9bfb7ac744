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

use criterion::{criterion_group, criterion_main, Criterion};
use sag_model::generator::{WorkloadConfig, WorkloadGenerator};
use sag_model::job::Job;
use sag_model::problem::{AnalysisOptions, Problem};
use sag_solver::{global, uni};

fn workload(num_tasks: usize, seed: u64) -> Vec<Job<i64>> {
    WorkloadGenerator::new(WorkloadConfig {
        num_tasks,
        horizon: 5_000,
        min_period: 1_000,
        max_period: 2_500,
        utilization: 0.45,
        jitter: 5,
        cost_ratio: 0.6,
        rate_monotonic: true,
        seed,
    })
    .generate()
}

fn bench_uniprocessor(c: &mut Criterion) {
    let jobs = workload(4, 42);
    let prob = Problem::new(jobs, 1);
    let opts = AnalysisOptions::default();
    c.bench_function("uni/explore", |b| {
        b.iter(|| uni::StateSpace::<i64>::explore(&prob, &opts).is_schedulable())
    });
    let naive = AnalysisOptions {
        be_naive: true,
        ..AnalysisOptions::default()
    };
    c.bench_function("uni/explore-naive", |b| {
        b.iter(|| uni::StateSpace::<i64>::explore(&prob, &naive).is_schedulable())
    });
}

fn bench_global(c: &mut Criterion) {
    let jobs = workload(6, 7);
    let prob = Problem::new(jobs, 2);
    let opts = AnalysisOptions::default();
    c.bench_function("global/explore-2-cpus", |b| {
        b.iter(|| global::StateSpace::explore(&prob, &opts).is_schedulable())
    });
}

criterion_group!(benches, bench_uniprocessor, bench_global);
criterion_main!(benches);
