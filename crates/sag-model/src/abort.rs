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

use crate::job::JobId;
use sag_core::Interval;

/// An abort action attached to one job.
///
/// If the job has not started executing by the action's earliest trigger
/// time, it is skipped entirely at zero cost. If it has started, it runs for
/// at most the maximal cleanup cost beyond the latest trigger time.
#[derive(Debug, Clone)]
pub struct AbortAction<T> {
    job_id: JobId,
    trigger: Interval<T>,
    cleanup: Interval<T>,
}

impl<T: Copy + PartialOrd> AbortAction<T> {
    pub fn new(job_id: JobId, trigger: Interval<T>, cleanup: Interval<T>) -> Self {
        AbortAction {
            job_id,
            trigger,
            cleanup,
        }
    }

    #[inline]
    pub fn job_id(&self) -> JobId {
        self.job_id
    }

    #[inline]
    pub fn trigger_window(&self) -> Interval<T> {
        self.trigger
    }

    #[inline]
    pub fn earliest_trigger(&self) -> T {
        self.trigger.min()
    }

    #[inline]
    pub fn latest_trigger(&self) -> T {
        self.trigger.max()
    }

    #[inline]
    pub fn least_cleanup_cost(&self) -> T {
        self.cleanup.min()
    }

    #[inline]
    pub fn maximum_cleanup_cost(&self) -> T {
        self.cleanup.max()
    }
}
