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

//! # Idle-Time-Insertion Policies
//!
//! An IIP restricts when a job may be dispatched: instead of greedily running
//! any ready job, the scheduler may deliberately leave the processor idle to
//! protect an upcoming higher-priority job. The engine consults the policy
//! for the latest time a candidate may still start; a candidate that cannot
//! start in time is simply not a successor.
//!
//! The policy is a static plug-in: the no-op [`NullIip`] advertises
//! `CAN_BLOCK = false`, which lets the engine skip every policy query on the
//! hot path.

use crate::index::WorkloadIndex;
use rustc_hash::{FxHashMap, FxHashSet};
use sag_core::{IndexSet, Time};
use sag_model::job::Job;

/// A pluggable idle-time-insertion policy.
pub trait IdleInsertionPolicy<T: Time>: Send + Sync {
    /// Whether this policy can ever restrict dispatching. `false` removes
    /// every policy query from the exploration hot path.
    const CAN_BLOCK: bool;

    fn new(jobs: &[Job<T>], index: &WorkloadIndex<T>) -> Self;

    /// The latest time at which `job` may be dispatched when the processor
    /// becomes available at `t`. Infinity means no restriction.
    fn latest_start(
        &self,
        jobs: &[Job<T>],
        index: &WorkloadIndex<T>,
        job: &Job<T>,
        t: T,
        scheduled: &IndexSet,
    ) -> T;
}

/// The work-conserving default: never idles, never blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullIip;

impl<T: Time> IdleInsertionPolicy<T> for NullIip {
    const CAN_BLOCK: bool = false;

    fn new(_: &[Job<T>], _: &WorkloadIndex<T>) -> Self {
        NullIip
    }

    fn latest_start(&self, _: &[Job<T>], _: &WorkloadIndex<T>, _: &Job<T>, _: T, _: &IndexSet) -> T {
        T::infinity()
    }
}

/// Precautious rate-monotonic policy.
///
/// A lower-priority job may only start if it cannot push the next release of
/// a highest-priority job past that job's deadline. Highest-priority jobs
/// themselves are never blocked.
#[derive(Debug, Clone)]
pub struct PrecautiousRm<T> {
    max_priority: T,
    /// Highest-priority jobs as `(latest arrival, index)`, sorted by latest
    /// arrival.
    hp_jobs: Vec<(T, usize)>,
}

impl<T: Time> IdleInsertionPolicy<T> for PrecautiousRm<T> {
    const CAN_BLOCK: bool = true;

    fn new(jobs: &[Job<T>], _: &WorkloadIndex<T>) -> Self {
        let max_priority = jobs
            .iter()
            .map(|j| j.priority())
            .fold(T::infinity(), Time::min);
        let mut hp_jobs: Vec<(T, usize)> = jobs
            .iter()
            .enumerate()
            .filter(|(_, j)| j.priority() == max_priority)
            .map(|(i, j)| (j.latest_arrival(), i))
            .collect();
        hp_jobs.sort_by(|a, b| a.0.partial_cmp(&b.0).expect("comparable arrival times"));
        PrecautiousRm {
            max_priority,
            hp_jobs,
        }
    }

    fn latest_start(
        &self,
        jobs: &[Job<T>],
        _: &WorkloadIndex<T>,
        job: &Job<T>,
        t: T,
        scheduled: &IndexSet,
    ) -> T {
        if job.priority() == self.max_priority {
            return T::infinity();
        }
        let start = self.hp_jobs.partition_point(|&(arr, _)| arr <= t);
        for &(_, idx) in &self.hp_jobs[start..] {
            if !scheduled.contains(idx) {
                let h = &jobs[idx];
                return h.deadline() - h.maximal_cost() - job.maximal_cost();
            }
        }
        // no pending highest-priority release: no reason to block
        T::infinity()
    }
}

/// Critical-window policy.
///
/// Considers, per other task, the most urgent incomplete job whose execution
/// could be squeezed by dispatching the candidate, and works backwards from
/// the latest deadline to the candidate's latest admissible start.
#[derive(Debug, Clone)]
pub struct CriticalWindow<T> {
    max_cost: T,
    n_tasks: usize,
}

impl<T: Time> IdleInsertionPolicy<T> for CriticalWindow<T> {
    const CAN_BLOCK: bool = true;

    fn new(jobs: &[Job<T>], _: &WorkloadIndex<T>) -> Self {
        let max_cost = jobs
            .iter()
            .map(|j| j.maximal_cost())
            .fold(T::zero(), Time::max);
        let tasks: FxHashSet<u64> = jobs.iter().map(|j| j.task_id()).collect();
        CriticalWindow {
            max_cost,
            n_tasks: tasks.len(),
        }
    }

    fn latest_start(
        &self,
        jobs: &[Job<T>],
        index: &WorkloadIndex<T>,
        job: &Job<T>,
        t: T,
        scheduled: &IndexSet,
    ) -> T {
        let influencers = self.influencing_jobs(jobs, index, job, t, scheduled);
        let mut latest = T::infinity();
        // traverse from the latest to the earliest deadline
        for &i in influencers.iter().rev() {
            latest = Time::min(latest, jobs[i].deadline()) - jobs[i].maximal_cost();
        }
        latest - job.maximal_cost()
    }
}

impl<T: Time> CriticalWindow<T> {
    /// One influencing job per other task: the earliest-arriving incomplete
    /// job active at `t`, supplemented by future releases until the
    /// accumulated horizon falls behind the next release. Sorted by deadline.
    fn influencing_jobs(
        &self,
        jobs: &[Job<T>],
        index: &WorkloadIndex<T>,
        job: &Job<T>,
        t: T,
        scheduled: &IndexSet,
    ) -> Vec<usize> {
        let mut influencers: FxHashMap<u64, usize> = FxHashMap::default();

        // everything already pending at time t
        for &idx in index.window_jobs_at(t) {
            let cand = &jobs[idx];
            if cand.scheduling_window().contains(t)
                && cand.task_id() != job.task_id()
                && !scheduled.contains(idx)
                && influencers
                    .get(&cand.task_id())
                    .is_none_or(|&cur| jobs[cur].earliest_arrival() > cand.earliest_arrival())
            {
                influencers.insert(cand.task_id(), idx);
            }
        }

        let mut latest_deadline = influencers
            .values()
            .map(|&i| jobs[i].deadline())
            .fold(T::zero(), Time::max);

        // later releases, while tasks are still missing
        for &(arrival, idx) in index.by_earliest_arrival_after(t) {
            if influencers.len() >= self.n_tasks.saturating_sub(1) {
                break;
            }
            let cand = &jobs[idx];
            if scheduled.contains(idx) || cand.task_id() == job.task_id() {
                continue;
            }
            if !influencers.contains_key(&cand.task_id()) {
                influencers.insert(cand.task_id(), idx);
                latest_deadline = Time::max(latest_deadline, cand.deadline());
            }
            if latest_deadline + self.max_cost < arrival {
                // reached the horizon: later releases cannot matter anymore
                break;
            }
        }

        let mut by_deadline: Vec<usize> = influencers.into_values().collect();
        by_deadline.sort_by(|a, b| {
            jobs[*a]
                .deadline()
                .partial_cmp(&jobs[*b].deadline())
                .expect("comparable deadlines")
        });
        by_deadline
    }
}
