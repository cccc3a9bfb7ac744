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

use crate::uni::iip::{CriticalWindow, NullIip, PrecautiousRm};
use crate::uni::StateSpace;
use sag_core::Interval;
use sag_model::abort::AbortAction;
use sag_model::job::{Job, JobId};
use sag_model::precedence::PrecedenceConstraint;
use sag_model::problem::{AnalysisOptions, Problem};

fn i(a: i64, b: i64) -> Interval<i64> {
    Interval::new(a, b)
}

fn job(task: u64, id: u64, arr: (i64, i64), cost: (i64, i64), dl: i64, prio: i64) -> Job<i64> {
    Job::new(task, id, i(arr.0, arr.1), i(cost.0, cost.1), dl, prio)
}

fn explore(prob: &Problem<i64>) -> StateSpace<'_, i64> {
    StateSpace::explore(prob, &AnalysisOptions::default())
}

fn explore_naively(prob: &Problem<i64>) -> StateSpace<'_, i64> {
    StateSpace::explore_naively(prob, &AnalysisOptions::default())
}

/// The classic one-processor example: a high-frequency task, a middle task,
/// and one long task with a large cost range.
fn one_cpu_miss_example() -> Vec<Job<i64>> {
    vec![
        job(1, 1, (0, 0), (1, 2), 10, 10),
        job(1, 2, (10, 10), (1, 2), 20, 20),
        job(1, 3, (20, 20), (1, 2), 30, 30),
        job(1, 4, (30, 30), (1, 2), 40, 40),
        job(1, 5, (40, 40), (1, 2), 50, 50),
        job(1, 6, (50, 50), (1, 2), 60, 60),
        job(2, 7, (0, 0), (7, 8), 30, 30),
        job(2, 8, (30, 30), (7, 7), 60, 60),
        job(3, 9, (0, 0), (3, 13), 60, 60),
    ]
}

#[test]
fn one_cpu_example_misses_a_deadline() {
    let prob = Problem::new(one_cpu_miss_example(), 1);
    assert!(!explore_naively(&prob).is_schedulable());
    assert!(!explore(&prob).is_schedulable());
}

#[test]
fn one_cpu_example_response_times() {
    let prob = Problem::new(one_cpu_miss_example(), 1);
    let opts = AnalysisOptions {
        early_exit: false,
        ..AnalysisOptions::default()
    };
    let space = StateSpace::<i64>::explore(&prob, &opts);
    assert!(!space.is_schedulable());
    assert_eq!(space.get_finish_times(&prob.jobs[1]), i(11, 24));
}

#[test]
fn reprioritized_example_is_schedulable() {
    // same workload, priorities assigned to protect the high-frequency task
    let jobs = vec![
        job(1, 1, (0, 0), (1, 2), 10, 1),
        job(1, 2, (10, 10), (1, 2), 20, 2),
        job(1, 3, (20, 20), (1, 2), 30, 3),
        job(1, 4, (30, 30), (1, 2), 40, 4),
        job(1, 5, (40, 40), (1, 2), 50, 5),
        job(1, 6, (50, 50), (1, 2), 60, 6),
        job(3, 9, (0, 0), (3, 13), 60, 7),
        job(2, 7, (0, 0), (7, 8), 30, 8),
        job(2, 8, (30, 30), (7, 7), 60, 9),
    ];
    let prob = Problem::new(jobs, 1);
    let nspace = explore_naively(&prob);
    let space = explore(&prob);
    assert!(nspace.is_schedulable());
    assert!(space.is_schedulable());
    for j in &prob.jobs {
        assert_eq!(nspace.get_finish_times(j), space.get_finish_times(j));
        assert_ne!(nspace.get_finish_times(j).from(), 0);
    }
}

#[test]
fn find_all_next_jobs() {
    let jobs = vec![
        job(0, 1, (0, 0), (3, 8), 100, 1),
        job(0, 2, (7, 7), (5, 5), 100, 2),
        job(0, 3, (10, 10), (1, 11), 100, 3),
    ];
    let prob = Problem::new(jobs, 1);
    for space in [explore_naively(&prob), explore(&prob)] {
        assert!(space.is_schedulable());
        assert_eq!(space.get_finish_times(&prob.jobs[0]), i(3, 8));
        assert_eq!(space.get_finish_times(&prob.jobs[1]), i(12, 13));
        assert_eq!(space.get_finish_times(&prob.jobs[2]), i(13, 24));
    }
}

#[test]
fn consider_large_enough_interval() {
    let jobs = vec![
        job(0, 1, (0, 0), (3, 10), 100, 3),
        job(0, 2, (7, 7), (5, 5), 100, 2),
        job(0, 3, (10, 10), (5, 5), 100, 1),
    ];
    let prob = Problem::new(jobs, 1);
    for space in [explore_naively(&prob), explore(&prob)] {
        assert!(space.is_schedulable());
        assert_eq!(space.get_finish_times(&prob.jobs[0]), i(3, 10));
        assert_eq!(space.get_finish_times(&prob.jobs[1]), i(12, 20));
        assert_eq!(space.get_finish_times(&prob.jobs[2]), i(15, 19));
    }
}

#[test]
fn respect_priorities() {
    let jobs = vec![
        job(0, 1, (0, 0), (3, 10), 100, 2),
        job(0, 2, (0, 0), (5, 5), 100, 1),
    ];
    let prob = Problem::new(jobs, 1);
    for space in [explore_naively(&prob), explore(&prob)] {
        assert!(space.is_schedulable());
        assert_eq!(space.get_finish_times(&prob.jobs[0]), i(8, 15));
        assert_eq!(space.get_finish_times(&prob.jobs[1]), i(5, 5));
    }
}

#[test]
fn respect_jitter() {
    let jobs = vec![
        job(0, 1, (0, 1), (3, 10), 100, 2),
        job(0, 2, (0, 1), (5, 5), 100, 1),
    ];
    let prob = Problem::new(jobs, 1);
    for space in [explore_naively(&prob), explore(&prob)] {
        assert!(space.is_schedulable());
        assert_eq!(space.get_finish_times(&prob.jobs[0]), i(3, 16));
        assert_eq!(space.get_finish_times(&prob.jobs[1]), i(5, 15));
    }
}

#[test]
fn be_eager() {
    let jobs = vec![
        job(0, 1, (0, 0), (1, 5), 100, 2),
        job(0, 2, (0, 0), (1, 20), 100, 3),
        job(0, 3, (10, 10), (5, 5), 100, 1),
    ];
    let prob = Problem::new(jobs, 1);
    for space in [explore_naively(&prob), explore(&prob)] {
        assert!(space.is_schedulable());
        assert_eq!(space.get_finish_times(&prob.jobs[0]), i(1, 5));
        assert_eq!(space.get_finish_times(&prob.jobs[1]), i(2, 25));
        assert_eq!(space.get_finish_times(&prob.jobs[2]), i(15, 30));
    }
}

#[test]
fn be_eager_with_short_deadline() {
    let jobs = vec![
        job(0, 1, (0, 0), (1, 5), 100, 2),
        job(0, 2, (9, 9), (1, 15), 25, 3),
        job(0, 3, (30, 30), (5, 5), 100, 1),
    ];
    let prob = Problem::new(jobs, 1);
    for space in [explore_naively(&prob), explore(&prob)] {
        assert!(space.is_schedulable());
        assert_eq!(space.get_finish_times(&prob.jobs[0]), i(1, 5));
        assert_eq!(space.get_finish_times(&prob.jobs[1]), i(10, 24));
        assert_eq!(space.get_finish_times(&prob.jobs[2]), i(35, 35));
    }
}

#[test]
fn treat_equal_priority_jobs_correctly() {
    let jobs = vec![
        job(0, 1, (0, 10), (2, 50), 2000, 1),
        job(0, 2, (0, 10), (50, 1200), 5000, 2),
        job(0, 3, (1000, 1010), (2, 50), 3000, 1),
    ];
    let prob = Problem::new(jobs, 1);
    for space in [explore_naively(&prob), explore(&prob)] {
        assert!(space.is_schedulable());
        assert_eq!(space.get_finish_times(&prob.jobs[0]), i(2, 1259));
        assert_eq!(space.get_finish_times(&prob.jobs[1]), i(50, 1260));
        assert_eq!(space.get_finish_times(&prob.jobs[2]), i(1002, 1310));
    }
}

#[test]
fn equal_priority_simultaneous_arrivals() {
    let jobs = vec![
        job(0, 1, (0, 10), (2, 50), 2000, 2000),
        job(0, 2, (0, 10), (100, 150), 2000, 2000),
    ];
    let prob = Problem::new(jobs, 1);
    for space in [explore_naively(&prob), explore(&prob)] {
        assert!(space.is_schedulable());
        assert_eq!(space.get_finish_times(&prob.jobs[0]), i(2, 9 + 150 + 50));
        assert_eq!(space.get_finish_times(&prob.jobs[1]), i(100, 10 + 50 + 150));
    }
}

#[test]
fn stop_at_the_first_deadline_miss() {
    let jobs = vec![
        job(0, 1, (100, 100), (2, 50), 200, 1),
        job(0, 2, (0, 0), (1200, 1200), 5000, 2),
        job(0, 3, (200, 250), (2, 50), 6000, 3),
        job(0, 4, (200, 250), (2, 50), 6000, 4),
        job(0, 5, (200, 250), (2, 50), 6000, 5),
    ];
    let prob = Problem::new(jobs, 1);
    for space in [explore_naively(&prob), explore(&prob)] {
        assert!(!space.is_schedulable());
        assert_eq!(space.number_of_edges(), 2);
        assert_eq!(space.number_of_states(), 3);
    }
}

#[test]
fn continue_after_a_deadline_miss() {
    let jobs = vec![
        job(0, 1, (100, 100), (2, 50), 200, 1),
        job(0, 2, (0, 0), (1200, 1200), 5000, 2),
        job(0, 3, (200, 250), (2, 50), 6000, 3),
        job(0, 4, (200, 250), (2, 50), 6000, 4),
        job(0, 5, (200, 250), (2, 50), 6000, 5),
    ];
    let prob = Problem::new(jobs, 1);
    let opts = AnalysisOptions {
        early_exit: false,
        ..AnalysisOptions::default()
    };
    let space = StateSpace::<i64>::explore(&prob, &opts);
    assert!(!space.is_schedulable());
    assert_eq!(space.number_of_edges(), 5);
    assert_eq!(space.number_of_states(), 6);

    // the analysis kept exploring past the miss
    assert_eq!(space.get_finish_times(&prob.jobs[0]), i(1202, 1250));
    assert_eq!(space.get_finish_times(&prob.jobs[1]), i(1200, 1200));
    assert_eq!(space.get_finish_times(&prob.jobs[2]), i(1204, 1300));
    assert_eq!(space.get_finish_times(&prob.jobs[3]), i(1206, 1350));
    assert_eq!(space.get_finish_times(&prob.jobs[4]), i(1208, 1400));
}

#[test]
fn explore_all_branches_with_deadline_missing_jobs() {
    let jobs = vec![
        job(0, 1, (100, 100), (2, 50), 200, 1),
        job(0, 2, (0, 150), (1200, 1200), 5000, 2),
        job(0, 3, (200, 250), (2, 50), 6000, 3),
        job(0, 4, (200, 250), (2, 50), 6000, 4),
        job(0, 5, (200, 250), (2, 50), 6000, 5),
    ];
    let prob = Problem::new(jobs, 1);
    let opts = AnalysisOptions {
        early_exit: false,
        ..AnalysisOptions::default()
    };
    let space = StateSpace::<i64>::explore(&prob, &opts);
    assert!(!space.is_schedulable());
    assert_eq!(space.number_of_edges(), 7);
    assert_eq!(space.number_of_states(), 7);

    assert_eq!(space.get_finish_times(&prob.jobs[0]), i(102, 1349));
    assert_eq!(space.get_finish_times(&prob.jobs[1]), i(1200, 1350));
    assert_eq!(space.get_finish_times(&prob.jobs[2]), i(1204, 1400));
    assert_eq!(space.get_finish_times(&prob.jobs[3]), i(1206, 1450));
    assert_eq!(space.get_finish_times(&prob.jobs[4]), i(1208, 1500));
}

#[test]
fn explore_across_bucket_boundaries() {
    let jobs = vec![
        job(0, 1, (100, 100), (50, 50), 10000, 1),
        job(0, 2, (3000, 3000), (4000, 4000), 10000, 2),
        job(0, 3, (6000, 6000), (2, 2), 10000, 3),
    ];
    let prob = Problem::new(jobs, 1);
    let mut opts = AnalysisOptions {
        num_buckets: 2,
        be_naive: true,
        ..AnalysisOptions::default()
    };
    let nspace = StateSpace::<i64>::explore(&prob, &opts);
    assert!(nspace.is_schedulable());
    assert_eq!(nspace.number_of_edges(), 3);

    opts.be_naive = false;
    let space = StateSpace::<i64>::explore(&prob, &opts);
    assert!(space.is_schedulable());
    assert_eq!(space.number_of_edges(), 3);
}

#[test]
fn start_times_satisfy_the_work_conserving_property() {
    let jobs = vec![
        job(0, 0, (0, 0), (2, 2), 10, 2),
        job(1, 1, (0, 8), (2, 2), 10, 1),
    ];
    let prob = Problem::new(jobs, 1);
    for space in [explore_naively(&prob), explore(&prob)] {
        assert!(space.is_schedulable());
        assert_eq!(space.get_finish_times(&prob.jobs[0]), i(2, 4));
        assert_eq!(space.get_finish_times(&prob.jobs[1]), i(2, 10));
    }
}

// -- idle-time insertion ----------------------------------------------------

/// The motivating example for precautious rate-monotonic scheduling: strictly
/// rate-monotonic dispatching misses a deadline, precautious blocking does
/// not.
fn p_rm_example() -> Vec<Job<i64>> {
    vec![
        job(1, 1, (0, 0), (1, 1), 10, 1),
        job(1, 2, (10, 10), (1, 1), 20, 1),
        job(1, 3, (20, 20), (1, 1), 30, 1),
        job(1, 4, (30, 30), (1, 1), 40, 1),
        job(1, 5, (40, 40), (1, 1), 50, 1),
        job(1, 6, (50, 50), (1, 1), 60, 1),
        job(2, 7, (0, 0), (8, 8), 30, 2),
        job(2, 8, (30, 30), (8, 8), 60, 2),
        job(3, 9, (0, 0), (17, 17), 60, 3),
    ]
}

#[test]
fn plain_rm_misses_but_precautious_rm_does_not() {
    let prob = Problem::new(p_rm_example(), 1);
    let opts = AnalysisOptions::default();

    assert!(!StateSpace::<i64, NullIip>::explore_naively(&prob, &opts).is_schedulable());
    assert!(!StateSpace::<i64, NullIip>::explore(&prob, &opts).is_schedulable());

    assert!(StateSpace::<i64, PrecautiousRm<i64>>::explore_naively(&prob, &opts).is_schedulable());
    assert!(StateSpace::<i64, PrecautiousRm<i64>>::explore(&prob, &opts).is_schedulable());
}

#[test]
fn critical_window_is_inert_for_a_single_task() {
    let jobs = vec![
        job(1, 1, (0, 0), (2, 3), 10, 1),
        job(1, 2, (10, 10), (2, 3), 20, 1),
    ];
    let prob = Problem::new(jobs, 1);
    let opts = AnalysisOptions::default();
    let plain = StateSpace::<i64, NullIip>::explore(&prob, &opts);
    let cw = StateSpace::<i64, CriticalWindow<i64>>::explore(&prob, &opts);
    assert!(plain.is_schedulable());
    assert!(cw.is_schedulable());
    for j in &prob.jobs {
        assert_eq!(plain.get_finish_times(j), cw.get_finish_times(j));
    }
}

// -- precedence constraints -------------------------------------------------

#[test]
fn precedence_chain_keeps_the_example_schedulable() {
    let jobs = one_cpu_miss_example();
    let dag = vec![
        PrecedenceConstraint::new(JobId::new(1, 1), JobId::new(1, 2)),
        PrecedenceConstraint::new(JobId::new(1, 2), JobId::new(1, 3)),
        PrecedenceConstraint::new(JobId::new(1, 3), JobId::new(1, 4)),
        PrecedenceConstraint::new(JobId::new(1, 4), JobId::new(1, 5)),
        PrecedenceConstraint::new(JobId::new(1, 5), JobId::new(1, 6)),
        PrecedenceConstraint::new(JobId::new(2, 7), JobId::new(2, 8)),
        PrecedenceConstraint::new(JobId::new(1, 2), JobId::new(3, 9)),
    ];
    let prob = Problem::new(jobs, 1).with_precedence(dag).unwrap();
    let nspace = explore_naively(&prob);
    let space = explore(&prob);
    assert!(nspace.is_schedulable());
    assert!(space.is_schedulable());
    for j in &prob.jobs {
        assert_eq!(nspace.get_finish_times(j), space.get_finish_times(j));
        assert_ne!(nspace.get_finish_times(j).from(), 0);
    }
}

#[test]
fn cyclic_precedence_is_a_dead_end_not_a_hang() {
    let jobs: Vec<Job<i64>> = (1..=6)
        .map(|n| job(1, n, (0, 0), (1, 1), 100, n as i64))
        .collect();
    let dag = vec![
        PrecedenceConstraint::new(JobId::new(1, 1), JobId::new(1, 2)),
        PrecedenceConstraint::new(JobId::new(1, 2), JobId::new(1, 3)),
        PrecedenceConstraint::new(JobId::new(1, 3), JobId::new(1, 4)),
        PrecedenceConstraint::new(JobId::new(1, 4), JobId::new(1, 5)),
        PrecedenceConstraint::new(JobId::new(1, 5), JobId::new(1, 6)),
        PrecedenceConstraint::new(JobId::new(1, 6), JobId::new(1, 1)),
    ];
    let prob = Problem::new(jobs, 1).with_precedence(dag).unwrap();
    let space = explore(&prob);
    assert!(!space.is_schedulable());
    assert!(!space.was_timed_out());
}

// -- abort actions ----------------------------------------------------------

#[test]
fn basic_aborts() {
    let jobs = vec![
        job(1, 1, (0, 0), (30, 100), 150, 2),
        job(2, 1, (0, 0), (2, 4), 60, 4),
        job(3, 1, (0, 0), (100, 100), 100, 1),
        job(4, 1, (0, 0), (10, 10), 10, 3),
    ];
    let aborts = vec![
        AbortAction::new(JobId::new(1, 1), i(50, 54), i(1, 2)),
        AbortAction::new(JobId::new(3, 1), i(5, 5), i(0, 0)),
        AbortAction::new(JobId::new(4, 1), i(10, 10), i(0, 0)),
    ];
    let prob = Problem::new(jobs, 1).with_aborts(aborts).unwrap();
    let opts = AnalysisOptions {
        early_exit: false,
        ..AnalysisOptions::default()
    };
    let space = StateSpace::<i64>::explore(&prob, &opts);
    assert!(!space.is_schedulable());
    assert_eq!(space.get_finish_times(&prob.jobs[1]), i(37, 60));
}

#[test]
fn abort_stops_a_deadline_miss_cascade() {
    let jobs = vec![
        job(1, 1, (0, 0), (6, 6), 9, 1),
        job(2, 1, (10, 10), (2, 6), 15, 2),
        job(3, 1, (16, 16), (3, 6), 23, 3),
        job(4, 1, (5, 5), (6, 7), 15, 4),
    ];
    let opts = AnalysisOptions {
        early_exit: false,
        ..AnalysisOptions::default()
    };

    // without aborts, the second job overruns and drags the third with it
    let plain = Problem::new(jobs.clone(), 1);
    let space = StateSpace::<i64>::explore(&plain, &opts);
    assert!(!space.is_schedulable());
    assert_eq!(space.get_finish_times(&plain.jobs[0]), i(6, 6));
    assert_eq!(space.get_finish_times(&plain.jobs[1]), i(14, 19));
    assert_eq!(space.get_finish_times(&plain.jobs[2]), i(19, 25));
    assert_eq!(space.get_finish_times(&plain.jobs[3]), i(12, 13));

    // aborting the second job at its deadline window stops the cascade
    let aborts = vec![AbortAction::new(JobId::new(2, 1), i(15, 15), i(0, 0))];
    let with_aborts = Problem::new(jobs, 1).with_aborts(aborts).unwrap();
    let space = StateSpace::<i64>::explore(&with_aborts, &opts);
    assert!(space.is_schedulable());
    assert_eq!(space.get_finish_times(&with_aborts.jobs[0]), i(6, 6));
    assert_eq!(space.get_finish_times(&with_aborts.jobs[1]), i(14, 15));
    assert_eq!(space.get_finish_times(&with_aborts.jobs[2]), i(19, 22));
    assert_eq!(space.get_finish_times(&with_aborts.jobs[3]), i(12, 13));
}

// -- resource limits and diagnostics ----------------------------------------

#[test]
fn depth_cap_withholds_the_verdict() {
    let jobs = vec![
        job(0, 1, (0, 0), (1, 2), 10, 1),
        job(0, 2, (10, 10), (1, 2), 20, 2),
        job(0, 3, (20, 20), (1, 2), 30, 3),
    ];
    let prob = Problem::new(jobs, 1);
    let opts = AnalysisOptions {
        max_depth: 1,
        ..AnalysisOptions::default()
    };
    let space = StateSpace::<i64>::explore(&prob, &opts);
    assert!(!space.is_schedulable());
    assert!(!space.was_timed_out());

    let full = explore(&prob);
    assert!(full.is_schedulable());
    assert!(space.number_of_states() <= full.number_of_states());
}

#[test]
fn timeout_withholds_the_verdict() {
    let jobs: Vec<Job<i64>> = sag_model::generator::WorkloadGenerator::new(
        sag_model::generator::WorkloadConfig {
            num_tasks: 6,
            horizon: 20_000,
            min_period: 500,
            max_period: 3_000,
            utilization: 0.7,
            jitter: 100,
            cost_ratio: 0.2,
            rate_monotonic: true,
            seed: 11,
        },
    )
    .generate();
    let prob = Problem::new(jobs, 1);
    let opts = AnalysisOptions {
        timeout: 1e-12,
        early_exit: false,
        ..AnalysisOptions::default()
    };
    let space = StateSpace::<i64>::explore(&prob, &opts);
    assert!(space.was_timed_out());
    assert!(!space.is_schedulable());
}

#[test]
fn dense_time_example() {
    let jobs: Vec<Job<f64>> = vec![
        Job::new(1, 1, Interval::new(0.0, 0.0), Interval::new(1.0, 2.0), 10.0, 10.0),
        Job::new(2, 7, Interval::new(0.0, 0.0), Interval::new(7.0, 8.0), 30.0, 30.0),
        Job::new(3, 9, Interval::new(0.0, 0.0), Interval::new(3.0, 13.0), 32.0, 60.0),
    ];
    let prob = Problem::new(jobs, 1);
    let opts = AnalysisOptions::default();
    let space = StateSpace::<f64>::explore(&prob, &opts);
    // j1 then j7 then j9: [2+8+3, 2+8+13] bounds the long job
    assert!(space.get_finish_times(&prob.jobs[2]).until() <= 23.0 + 1e-9);
}

#[test]
fn graph_collection_records_states_and_edges() {
    let jobs = vec![
        job(0, 1, (0, 0), (1, 2), 10, 1),
        job(0, 2, (10, 10), (1, 2), 20, 2),
    ];
    let prob = Problem::new(jobs, 1);
    let opts = AnalysisOptions {
        collect_schedule_graph: true,
        ..AnalysisOptions::default()
    };
    let space = StateSpace::<i64>::explore(&prob, &opts);
    assert!(space.is_schedulable());
    let graph = space.schedule_graph().unwrap();
    assert_eq!(graph.nodes.len() as u64, space.number_of_states());
    assert_eq!(graph.edges.len() as u64, space.number_of_edges());
    // initial -> {1} -> {1, 2}
    assert_eq!(graph.nodes.len(), 3);
    assert_eq!(graph.edges[0].source, 0);
}

#[test]
fn rerunning_the_analysis_is_deterministic() {
    let prob = Problem::new(one_cpu_miss_example(), 1);
    let opts = AnalysisOptions {
        early_exit: false,
        ..AnalysisOptions::default()
    };
    let a = StateSpace::<i64>::explore(&prob, &opts);
    let b = StateSpace::<i64>::explore(&prob, &opts);
    assert_eq!(a.is_schedulable(), b.is_schedulable());
    assert_eq!(a.number_of_states(), b.number_of_states());
    assert_eq!(a.number_of_edges(), b.number_of_edges());
    for j in &prob.jobs {
        assert_eq!(a.get_finish_times(j), b.get_finish_times(j));
    }
}
