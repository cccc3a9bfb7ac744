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

use crate::graph::ScheduleGraph;
use rustc_hash::FxHashMap;
use sag_core::Interval;
use sag_model::job::JobId;

/// The result record of one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisReport<T> {
    /// Whether no deadline miss is possible in any admissible schedule. A
    /// timed-out or depth-capped run reports `false` (unknown).
    pub schedulable: bool,
    pub timed_out: bool,
    pub num_states: u64,
    pub num_edges: u64,
    pub max_width: u64,
    pub cpu_time_seconds: f64,
    /// Finish-time bounds per dispatched job.
    pub response_times: FxHashMap<JobId, Interval<T>>,
    /// The explored search graph, if collection was enabled.
    pub graph: Option<ScheduleGraph<T>>,
}
