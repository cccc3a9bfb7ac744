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

use crate::abort::AbortAction;
use crate::err::ProblemError;
use crate::job::{Job, JobId};
use crate::precedence::PrecedenceConstraint;
use sag_core::Time;

/// Description of a non-preemptive scheduling problem.
///
/// Construction validates all cross references, so an engine handed a
/// `Problem` never has to deal with dangling job ids or ill-formed abort
/// windows.
#[derive(Debug, Clone)]
pub struct Problem<T> {
    /// The workload. Job order is significant: a job's position is its index
    /// in every `IndexSet` of the exploration.
    pub jobs: Vec<Job<T>>,
    /// Precedence constraints among the jobs.
    pub precedence: Vec<PrecedenceConstraint>,
    /// Abort actions for (some of) the jobs.
    pub aborts: Vec<AbortAction<T>>,
    /// On how many identical processors the jobs are dispatched, globally and
    /// in priority order.
    pub num_processors: usize,
}

impl<T: Time> Problem<T> {
    /// Classic setup: no precedence constraints, no abort actions.
    pub fn new(jobs: Vec<Job<T>>, num_processors: usize) -> Self {
        assert!(num_processors > 0);
        Problem {
            jobs,
            precedence: Vec::new(),
            aborts: Vec::new(),
            num_processors,
        }
    }

    /// Attaches precedence constraints, validating that both endpoints of
    /// every edge refer to jobs in the workload.
    pub fn with_precedence(
        mut self,
        precedence: Vec<PrecedenceConstraint>,
    ) -> Result<Self, ProblemError> {
        for edge in &precedence {
            for id in [edge.from, edge.to] {
                if self.index_of(id).is_none() {
                    return Err(ProblemError::InvalidPrecedenceReference(id));
                }
            }
        }
        self.precedence = precedence;
        Ok(self)
    }

    /// Attaches abort actions, validating that each refers to a job in the
    /// workload and that its trigger window does not start before the job's
    /// arrival window.
    pub fn with_aborts(mut self, aborts: Vec<AbortAction<T>>) -> Result<Self, ProblemError> {
        for action in &aborts {
            let job = self
                .index_of(action.job_id())
                .map(|i| &self.jobs[i])
                .ok_or(ProblemError::InvalidAbortParameter(action.job_id()))?;
            if action.earliest_trigger() < job.earliest_arrival()
                || action.latest_trigger() < job.latest_arrival()
            {
                return Err(ProblemError::InvalidAbortParameter(action.job_id()));
            }
        }
        self.aborts = aborts;
        Ok(self)
    }

    /// The index of the first job with the given id.
    pub fn index_of(&self, id: JobId) -> Option<usize> {
        self.jobs.iter().position(|j| j.id() == id)
    }
}

/// Common options for the analysis engines.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// After how many seconds of analysis time to give up. Zero means
    /// unlimited.
    pub timeout: f64,
    /// After how many scheduling decisions (depth of the schedule graph) to
    /// terminate. Zero means unlimited.
    pub max_depth: usize,
    /// Stop upon the first observed deadline miss.
    pub early_exit: bool,
    /// Disable state merging and explore the space brute-force. Only useful
    /// as a baseline.
    pub be_naive: bool,
    /// Sizing hint for the workload interval-lookup table.
    pub num_buckets: usize,
    /// Worker threads for layer expansion. One means sequential.
    pub num_threads: usize,
    /// Retain states and transitions for diagnostic graph emission.
    pub collect_schedule_graph: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        AnalysisOptions {
            timeout: 0.0,
            max_depth: 0,
            early_exit: true,
            be_naive: false,
            num_buckets: 1000,
            num_threads: 1,
            collect_schedule_graph: false,
        }
    }
}
