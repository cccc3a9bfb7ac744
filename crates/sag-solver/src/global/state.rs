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
use std::fmt;

/// One abstract multiprocessor state.
///
/// `core_avail[i]` bounds when the `i`-th-soonest core becomes available;
/// the array is sorted by lower bound, so `core_avail[0]` is the soonest
/// available core. `certain_jobs` lists dispatched jobs whose finish interval
/// still lies beyond the current availability horizon, ordered by job index.
#[derive(Debug, Clone)]
pub struct State<T> {
    scheduled_jobs: IndexSet,
    num_scheduled: u32,
    core_avail: Vec<Interval<T>>,
    certain_jobs: Vec<(usize, Interval<T>)>,
    key: u64,
}

impl<T: Time> State<T> {
    /// The initial state: nothing dispatched, all cores available at time
    /// zero.
    pub fn initial(num_cores: usize) -> Self {
        assert!(num_cores > 0);
        State {
            scheduled_jobs: IndexSet::new(),
            num_scheduled: 0,
            core_avail: vec![Interval::point(T::zero()); num_cores],
            certain_jobs: Vec::new(),
            key: 0,
        }
    }

    /// Derives the state reached by dispatching job `job` with the given
    /// start- and finish-time intervals, replacing the soonest-available
    /// core.
    pub fn from_dispatch(
        from: &State<T>,
        job: usize,
        predecessors: &[usize],
        start_times: Interval<T>,
        finish_times: Interval<T>,
        job_key: u64,
    ) -> Self {
        let est = start_times.min();
        let lst = start_times.max();
        let eft = finish_times.min();
        let lft = finish_times.max();

        // core 0 is taken over by the new job; every other core remains
        // available no earlier than before, and no earlier than est, since
        // the dispatch happens at est or later
        let n = from.core_avail.len();
        let mut pa = Vec::with_capacity(n);
        let mut ca = Vec::with_capacity(n);
        pa.push(eft);
        ca.push(lft);
        for core in &from.core_avail[1..] {
            pa.push(Time::max(est, core.min()));
            ca.push(Time::max(est, core.max()));
        }

        // keep certainly-running jobs sorted by index to ease merging; a
        // predecessor certainly finishes by the new job's latest start, which
        // tightens the matching certain availability
        let mut certain_jobs = Vec::with_capacity(from.certain_jobs.len() + 1);
        let mut added = false;
        for &(x, range) in &from.certain_jobs {
            let x_eft = range.min();
            let x_lft = range.max();
            if predecessors.contains(&x) {
                if lst < x_lft {
                    if let Some(slot) = ca.iter_mut().find(|v| **v == x_lft) {
                        *slot = lst;
                    }
                }
            } else if lst <= x_eft {
                if !added && x > job {
                    certain_jobs.push((job, finish_times));
                    added = true;
                }
                certain_jobs.push((x, range));
            }
        }
        if !added {
            certain_jobs.push((job, finish_times));
        }

        let cmp = |a: &T, b: &T| a.partial_cmp(b).expect("comparable availability bounds");
        pa.sort_by(cmp);
        ca.sort_by(cmp);
        let core_avail = pa
            .into_iter()
            .zip(ca)
            .map(|(a, b)| Interval::new(a, b))
            .collect();

        State {
            scheduled_jobs: IndexSet::with(&from.scheduled_jobs, job),
            num_scheduled: from.num_scheduled + 1,
            core_avail,
            certain_jobs,
            key: from.key ^ job_key,
        }
    }

    /// Availability interval of the soonest-available core.
    #[inline]
    pub fn core_availability(&self) -> Interval<T> {
        self.core_avail[0]
    }

    #[inline]
    pub fn core_avail(&self) -> &[Interval<T>] {
        &self.core_avail
    }

    #[inline]
    pub fn scheduled_jobs(&self) -> &IndexSet {
        &self.scheduled_jobs
    }

    #[inline]
    pub fn number_of_scheduled_jobs(&self) -> usize {
        self.num_scheduled as usize
    }

    #[inline]
    pub fn job_incomplete(&self, idx: usize) -> bool {
        !self.scheduled_jobs.contains(idx)
    }

    /// All precedence predecessors have been dispatched.
    #[inline]
    pub fn job_ready(&self, predecessors: &[usize]) -> bool {
        self.scheduled_jobs.includes(predecessors)
    }

    #[inline]
    pub fn key(&self) -> u64 {
        self.key
    }

    /// The recorded finish interval of a certainly-running job, if any.
    pub fn get_finish_times(&self, job: usize) -> Option<Interval<T>> {
        for &(x, range) in &self.certain_jobs {
            if x == job {
                return Some(range);
            }
            // sorted by job index: nothing further can match
            if x > job {
                return None;
            }
        }
        None
    }

    pub fn can_merge_with(&self, other: &State<T>) -> bool {
        debug_assert_eq!(self.core_avail.len(), other.core_avail.len());
        if self.key != other.key || self.scheduled_jobs != other.scheduled_jobs {
            return false;
        }
        self.core_avail
            .iter()
            .zip(&other.core_avail)
            .all(|(a, b)| a.intersects(b))
    }

    /// Merges `other` into this state if compatible: per-core availability
    /// union, and `certain_jobs` restricted to jobs certain in both, each
    /// widened.
    pub fn try_to_merge(&mut self, other: &State<T>) -> bool {
        if !self.can_merge_with(other) {
            return false;
        }
        for (mine, theirs) in self.core_avail.iter_mut().zip(&other.core_avail) {
            mine.widen(theirs);
        }

        let mut joint = Vec::with_capacity(self.certain_jobs.len());
        let mut ours = self.certain_jobs.iter();
        let mut theirs = other.certain_jobs.iter();
        let (mut a, mut b) = (ours.next(), theirs.next());
        while let (Some(&(x, xr)), Some(&(y, yr))) = (a, b) {
            if x == y {
                joint.push((x, xr.merge(&yr)));
                a = ours.next();
                b = theirs.next();
            } else if x < y {
                a = ours.next();
            } else {
                b = theirs.next();
            }
        }
        self.certain_jobs = joint;
        true
    }
}

impl<T: Time> fmt::Display for State<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "State([")?;
        for (i, core) in self.core_avail.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", core)?;
        }
        write!(f, "], {})", self.scheduled_jobs)
    }
}
