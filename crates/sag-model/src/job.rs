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

use rustc_hash::FxHasher;
use sag_core::{Interval, Time};
use std::fmt::Display;
use std::hash::Hasher;

/// Identifies one job release: a task and a per-task job number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobId {
    pub task: u64,
    pub job: u64,
}

impl JobId {
    #[inline]
    pub const fn new(task: u64, job: u64) -> Self {
        JobId { task, job }
    }
}

impl Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "T{}J{}", self.task, self.job)
    }
}

/// An immutable job descriptor.
///
/// A job is one release of a task: it arrives at some instant within its
/// arrival window, executes non-preemptively for some duration within its
/// cost window, and must finish by its absolute deadline. A numerically
/// smaller priority value denotes a higher priority.
///
/// Jobs carry a 64-bit key derived from all attributes with a deterministic
/// hasher. The key is stable across runs, which makes state keys (XOR folds
/// of job keys) stable across runs too.
#[derive(Debug, Clone)]
pub struct Job<T> {
    id: JobId,
    arrival: Interval<T>,
    cost: Interval<T>,
    deadline: T,
    priority: T,
    key: u64,
}

impl<T: Time> Job<T> {
    pub fn new(
        task_id: u64,
        job_id: u64,
        arrival: Interval<T>,
        cost: Interval<T>,
        deadline: T,
        priority: T,
    ) -> Self {
        let id = JobId::new(task_id, job_id);
        let key = Self::compute_key(id, &arrival, &cost, deadline, priority);
        Job {
            id,
            arrival,
            cost,
            deadline,
            priority,
            key,
        }
    }

    fn compute_key(
        id: JobId,
        arrival: &Interval<T>,
        cost: &Interval<T>,
        deadline: T,
        priority: T,
    ) -> u64 {
        let mut h = FxHasher::default();
        h.write_u64(id.task);
        h.write_u64(id.job);
        h.write_u64(arrival.min().stable_bits());
        h.write_u64(arrival.max().stable_bits());
        h.write_u64(cost.min().stable_bits());
        h.write_u64(cost.max().stable_bits());
        h.write_u64(deadline.stable_bits());
        h.write_u64(priority.stable_bits());
        h.finish()
    }

    #[inline]
    pub fn id(&self) -> JobId {
        self.id
    }

    #[inline]
    pub fn task_id(&self) -> u64 {
        self.id.task
    }

    #[inline]
    pub fn job_id(&self) -> u64 {
        self.id.job
    }

    /// Run-stable key over all attributes.
    #[inline]
    pub fn key(&self) -> u64 {
        self.key
    }

    #[inline]
    pub fn arrival_window(&self) -> Interval<T> {
        self.arrival
    }

    #[inline]
    pub fn earliest_arrival(&self) -> T {
        self.arrival.min()
    }

    /// Time by which the job is certainly released.
    #[inline]
    pub fn latest_arrival(&self) -> T {
        self.arrival.max()
    }

    #[inline]
    pub fn cost(&self) -> Interval<T> {
        self.cost
    }

    #[inline]
    pub fn least_cost(&self) -> T {
        self.cost.min()
    }

    #[inline]
    pub fn maximal_cost(&self) -> T {
        self.cost.max()
    }

    #[inline]
    pub fn deadline(&self) -> T {
        self.deadline
    }

    #[inline]
    pub fn priority(&self) -> T {
        self.priority
    }

    /// Whether finishing at `t` constitutes a deadline miss.
    #[inline]
    pub fn exceeds_deadline(&self, t: T) -> bool {
        t > self.deadline + T::miss_tolerance()
    }

    /// Strict priority order. Priority ties are broken deterministically by
    /// job identity (task id, then job id), so any two distinct jobs are
    /// strictly ordered.
    #[inline]
    pub fn higher_priority_than(&self, other: &Job<T>) -> bool {
        self.priority < other.priority
            || (self.priority == other.priority && self.id < other.id)
    }

    /// The window in which the job may legally be dispatched.
    // inclusive interval, so take off one epsilon
    #[inline]
    pub fn scheduling_window(&self) -> Interval<T> {
        Interval::new(self.earliest_arrival(), self.deadline - T::epsilon())
    }
}

impl<T: Time> Display for Job<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Job{{{}, {}, {}, {}, {}}}",
            self.id, self.arrival, self.cost, self.deadline, self.priority
        )
    }
}
