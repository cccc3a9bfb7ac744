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

use sag_core::{IndexSet, Interval, Time};
use sag_model::job::Job;
use std::fmt;

/// One abstract uniprocessor state.
///
/// `finish_time` bounds when the processor becomes available again after the
/// last dispatched job; `scheduled_jobs` records which jobs have been
/// dispatched along every path into this state. The lookup key is the XOR
/// fold of the dispatched jobs' stable keys, so any two states reached via
/// different dispatch orders of the same job set share a key.
#[derive(Debug, Clone)]
pub struct State<T> {
    finish_time: Interval<T>,
    earliest_pending_release: T,
    scheduled_jobs: IndexSet,
    key: u64,
}

impl<T: Time> State<T> {
    /// The initial state: nothing dispatched, processor available at time
    /// zero.
    pub fn initial() -> Self {
        State {
            finish_time: Interval::point(T::zero()),
            earliest_pending_release: T::zero(),
            scheduled_jobs: IndexSet::new(),
            key: 0,
        }
    }

    /// Derives the state reached by dispatching `job` (at index `idx`) with
    /// the given finish-time interval.
    pub fn from_dispatch(
        from: &State<T>,
        job: &Job<T>,
        idx: usize,
        finish_times: Interval<T>,
        next_earliest_release: T,
    ) -> Self {
        State {
            finish_time: finish_times,
            earliest_pending_release: next_earliest_release,
            scheduled_jobs: IndexSet::with(&from.scheduled_jobs, idx),
            key: from.next_key(job),
        }
    }

    #[inline]
    pub fn earliest_finish_time(&self) -> T {
        self.finish_time.min()
    }

    #[inline]
    pub fn latest_finish_time(&self) -> T {
        self.finish_time.max()
    }

    #[inline]
    pub fn finish_range(&self) -> Interval<T> {
        self.finish_time
    }

    /// Earliest possible release of any not-yet-dispatched job, or infinity
    /// if none remain.
    #[inline]
    pub fn earliest_job_release(&self) -> T {
        self.earliest_pending_release
    }

    #[inline]
    pub fn scheduled_jobs(&self) -> &IndexSet {
        &self.scheduled_jobs
    }

    #[inline]
    pub fn key(&self) -> u64 {
        self.key
    }

    /// The key a successor obtained by dispatching `job` will carry.
    #[inline]
    pub fn next_key(&self, job: &Job<T>) -> u64 {
        self.key ^ job.key()
    }

    /// Whether two states may represent the same dispatched job set.
    pub fn matches(&self, other: &State<T>) -> bool {
        self.key == other.key && self.scheduled_jobs == other.scheduled_jobs
    }

    /// Widens the finish range after a merge. The caller must have verified
    /// that the ranges overlap.
    pub fn update_finish_range(&mut self, update: Interval<T>) {
        debug_assert!(update.intersects(&self.finish_time));
        self.finish_time.widen(&update);
    }
}

impl<T: Time> fmt::Display for State<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "State({}, {})", self.finish_time, self.scheduled_jobs)
    }
}
