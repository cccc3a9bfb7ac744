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

//! # Workload Indexes
//!
//! Read-only indexes over the job set, built once per analysis run and
//! shared by every state expansion: jobs sorted by earliest arrival, latest
//! arrival, and deadline; a bucketed lookup by scheduling window; and the
//! per-job precedence sets.

use rustc_hash::FxHashMap;
use sag_core::{Interval, IntervalLookup, Time};
use sag_model::job::{Job, JobId};
use sag_model::precedence::PrecedenceConstraint;

/// Sorted and bucketed views of one workload. Never mutated after
/// construction.
#[derive(Debug, Clone)]
pub struct WorkloadIndex<T> {
    by_earliest_arrival: Vec<(T, usize)>,
    by_latest_arrival: Vec<(T, usize)>,
    by_deadline: Vec<(T, usize)>,
    by_window: IntervalLookup<T>,
    predecessors: Vec<Vec<usize>>,
    max_deadline: T,
}

impl<T: Time> WorkloadIndex<T> {
    /// Builds the indexes. Precedence edges must refer to jobs in the set;
    /// the problem constructor guarantees that.
    pub fn new(jobs: &[Job<T>], precedence: &[PrecedenceConstraint], num_buckets: usize) -> Self {
        let max_deadline = jobs
            .iter()
            .map(|j| j.deadline())
            .fold(T::zero(), Time::max);

        let buckets: T = num_traits::cast(num_buckets.max(1)).unwrap_or_else(T::one);
        let mut by_window =
            IntervalLookup::new(Interval::new(T::zero(), max_deadline), max_deadline / buckets);

        let mut by_earliest_arrival = Vec::with_capacity(jobs.len());
        let mut by_latest_arrival = Vec::with_capacity(jobs.len());
        let mut by_deadline = Vec::with_capacity(jobs.len());
        let mut by_id: FxHashMap<JobId, usize> = FxHashMap::default();

        for (i, j) in jobs.iter().enumerate() {
            by_earliest_arrival.push((j.earliest_arrival(), i));
            by_latest_arrival.push((j.latest_arrival(), i));
            by_deadline.push((j.deadline(), i));
            by_window.insert(i, j.scheduling_window());
            by_id.entry(j.id()).or_insert(i);
        }

        let cmp = |a: &(T, usize), b: &(T, usize)| {
            a.0.partial_cmp(&b.0)
                .expect("job attributes must be comparable")
        };
        by_earliest_arrival.sort_by(cmp);
        by_latest_arrival.sort_by(cmp);
        by_deadline.sort_by(cmp);

        let mut predecessors = vec![Vec::new(); jobs.len()];
        for edge in precedence {
            let from = by_id[&edge.from];
            let to = by_id[&edge.to];
            predecessors[to].push(from);
        }

        WorkloadIndex {
            by_earliest_arrival,
            by_latest_arrival,
            by_deadline,
            by_window,
            predecessors,
            max_deadline,
        }
    }

    /// Jobs ordered by earliest arrival, restricted to arrivals `>= t`.
    #[inline]
    pub fn by_earliest_arrival_from(&self, t: T) -> &[(T, usize)] {
        let start = self.by_earliest_arrival.partition_point(|&(k, _)| k < t);
        &self.by_earliest_arrival[start..]
    }

    /// Jobs ordered by earliest arrival, restricted to arrivals `> t`.
    #[inline]
    pub fn by_earliest_arrival_after(&self, t: T) -> &[(T, usize)] {
        let start = self.by_earliest_arrival.partition_point(|&(k, _)| k <= t);
        &self.by_earliest_arrival[start..]
    }

    /// Jobs ordered by latest arrival, restricted to certain releases `>= t`.
    #[inline]
    pub fn by_latest_arrival_from(&self, t: T) -> &[(T, usize)] {
        let start = self.by_latest_arrival.partition_point(|&(k, _)| k < t);
        &self.by_latest_arrival[start..]
    }

    /// Jobs ordered by deadline, restricted to deadlines `>= t`.
    #[inline]
    pub fn by_deadline_from(&self, t: T) -> &[(T, usize)] {
        let start = self.by_deadline.partition_point(|&(k, _)| k < t);
        &self.by_deadline[start..]
    }

    /// Jobs whose scheduling window may cover `t` (bucket granularity).
    #[inline]
    pub fn window_jobs_at(&self, t: T) -> &[usize] {
        self.by_window.lookup(t)
    }

    /// Indices of the precedence predecessors of job `idx`.
    #[inline]
    pub fn predecessors_of(&self, idx: usize) -> &[usize] {
        &self.predecessors[idx]
    }

    #[inline]
    pub fn max_deadline(&self) -> T {
        self.max_deadline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jobs() -> Vec<Job<i64>> {
        vec![
            Job::new(1, 1, Interval::new(10, 15), Interval::new(1, 2), 40, 1),
            Job::new(1, 2, Interval::new(0, 5), Interval::new(1, 2), 20, 2),
            Job::new(2, 1, Interval::new(5, 30), Interval::new(1, 2), 60, 3),
        ]
    }

    #[test]
    fn sorted_views_are_sorted() {
        let jobs = jobs();
        let idx = WorkloadIndex::new(&jobs, &[], 10);
        let ea: Vec<i64> = idx.by_earliest_arrival_from(i64::MIN).iter().map(|&(t, _)| t).collect();
        assert_eq!(ea, vec![0, 5, 10]);
        let la: Vec<i64> = idx.by_latest_arrival_from(i64::MIN).iter().map(|&(t, _)| t).collect();
        assert_eq!(la, vec![5, 15, 30]);
        let dl: Vec<i64> = idx.by_deadline_from(i64::MIN).iter().map(|&(t, _)| t).collect();
        assert_eq!(dl, vec![20, 40, 60]);
    }

    #[test]
    fn from_and_after_are_inclusive_and_exclusive() {
        let jobs = jobs();
        let idx = WorkloadIndex::new(&jobs, &[], 10);
        assert_eq!(idx.by_earliest_arrival_from(5).len(), 2);
        assert_eq!(idx.by_earliest_arrival_after(5).len(), 1);
        assert!(idx.by_latest_arrival_from(31).is_empty());
    }

    #[test]
    fn precedence_sets_are_resolved_to_indices() {
        let jobs = jobs();
        let dag = vec![
            PrecedenceConstraint::new(JobId::new(1, 1), JobId::new(2, 1)),
            PrecedenceConstraint::new(JobId::new(1, 2), JobId::new(2, 1)),
        ];
        let idx = WorkloadIndex::new(&jobs, &dag, 10);
        assert_eq!(idx.predecessors_of(2), &[0, 1]);
        assert!(idx.predecessors_of(0).is_empty());
    }

    #[test]
    fn window_lookup_contains_active_jobs() {
        let jobs = jobs();
        let idx = WorkloadIndex::new(&jobs, &[], 10);
        // job 1 (index 1) has window [0, 19]
        assert!(idx.window_jobs_at(3).contains(&1));
        assert_eq!(idx.max_deadline(), 60);
    }
}
