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

use crate::clock::AnalysisClock;
use crate::graph::ScheduleGraph;
use crate::index::WorkloadIndex;
use crate::report::AnalysisReport;
use crate::rta::ResponseTimes;
use crate::uni::iip::{IdleInsertionPolicy, NullIip};
use crate::uni::state::State;
use rustc_hash::FxHashMap;
use sag_core::{IndexSet, Interval, Time};
use sag_model::abort::AbortAction;
use sag_model::job::Job;
use sag_model::problem::{AnalysisOptions, Problem};
use tracing::{instrument, trace};

type Entry<T> = (u64, State<T>);
type MergeIndex = FxHashMap<u64, Vec<usize>>;

/// The uniprocessor exploration engine.
///
/// Expands the abstract schedule graph breadth-first: all states with `k`
/// dispatched jobs are processed before any state with `k + 1`. Between
/// layers the merge index is cleared and, unless graph collection is on, the
/// finished layer is dropped.
pub struct StateSpace<'a, T: Time, I: IdleInsertionPolicy<T> = NullIip> {
    jobs: &'a [Job<T>],
    index: WorkloadIndex<T>,
    abort_actions: Vec<Option<&'a AbortAction<T>>>,
    iip: I,

    rta: ResponseTimes<T>,
    aborted: bool,
    timed_out: bool,
    observed_deadline_miss: bool,

    timeout: f64,
    max_depth: usize,
    early_exit: bool,
    be_naive: bool,
    collect: bool,

    num_states: u64,
    num_edges: u64,
    width: u64,
    next_state_id: u64,

    clock: AnalysisClock,
    graph: ScheduleGraph<T>,
}

impl<'a, T: Time, I: IdleInsertionPolicy<T>> StateSpace<'a, T, I> {
    /// Explores the state space of `problem` with state merging (unless the
    /// options say otherwise).
    pub fn explore(problem: &'a Problem<T>, opts: &AnalysisOptions) -> Self {
        // this is a uniprocessor analysis
        assert!(problem.num_processors == 1);
        let mut space = Self::with_problem(problem, opts);
        space.clock.start();
        space.run();
        space.clock.stop();
        space
    }

    /// Brute-force baseline without state merging.
    pub fn explore_naively(problem: &'a Problem<T>, opts: &AnalysisOptions) -> Self {
        let mut opts = opts.clone();
        opts.be_naive = true;
        Self::explore(problem, &opts)
    }

    fn with_problem(problem: &'a Problem<T>, opts: &AnalysisOptions) -> Self {
        let index = WorkloadIndex::new(&problem.jobs, &problem.precedence, opts.num_buckets);
        let iip = I::new(&problem.jobs, &index);

        let mut abort_actions: Vec<Option<&'a AbortAction<T>>> = vec![None; problem.jobs.len()];
        for action in &problem.aborts {
            if let Some(idx) = problem.index_of(action.job_id()) {
                abort_actions[idx] = Some(action);
            }
        }

        StateSpace {
            jobs: &problem.jobs,
            index,
            abort_actions,
            iip,
            rta: ResponseTimes::new(),
            aborted: false,
            timed_out: false,
            observed_deadline_miss: false,
            timeout: opts.timeout,
            max_depth: opts.max_depth,
            early_exit: opts.early_exit,
            be_naive: opts.be_naive,
            collect: opts.collect_schedule_graph,
            num_states: 0,
            num_edges: 0,
            width: 0,
            next_state_id: 0,
            clock: AnalysisClock::new(),
            graph: ScheduleGraph::new(),
        }
    }

    pub fn is_schedulable(&self) -> bool {
        !self.aborted && !self.observed_deadline_miss
    }

    pub fn was_timed_out(&self) -> bool {
        self.timed_out
    }

    pub fn number_of_states(&self) -> u64 {
        self.num_states
    }

    pub fn number_of_edges(&self) -> u64 {
        self.num_edges
    }

    pub fn max_exploration_front_width(&self) -> u64 {
        self.width
    }

    pub fn cpu_time(&self) -> f64 {
        self.clock.seconds()
    }

    /// Finish-time bounds of `job`, or `[0, infinity]` if it was never
    /// dispatched.
    pub fn get_finish_times(&self, job: &Job<T>) -> Interval<T> {
        self.rta.get(job.id())
    }

    pub fn response_times(&self) -> &ResponseTimes<T> {
        &self.rta
    }

    pub fn schedule_graph(&self) -> Option<&ScheduleGraph<T>> {
        self.collect.then_some(&self.graph)
    }

    pub fn into_report(self) -> AnalysisReport<T> {
        AnalysisReport {
            schedulable: self.is_schedulable(),
            timed_out: self.timed_out,
            num_states: self.num_states,
            num_edges: self.num_edges,
            max_width: self.width,
            cpu_time_seconds: self.clock.seconds(),
            response_times: self.rta.iter().collect(),
            graph: self.collect.then_some(self.graph),
        }
    }

    // -- exploration loop ---------------------------------------------------

    #[instrument(skip_all, fields(jobs = self.jobs.len()))]
    fn run(&mut self) {
        let mut fronts: [Vec<Entry<T>>; 3] = [Vec::new(), Vec::new(), Vec::new()];
        let mut merge_index: MergeIndex = MergeIndex::default();

        let initial = State::initial();
        if self.collect {
            self.graph
                .add_node(0, vec![initial.finish_range()], Some(T::zero()));
        }
        fronts[0].push((0, initial));
        self.next_state_id = 1;
        self.num_states = 1;

        let mut depth = 0usize;
        loop {
            if self.aborted {
                break;
            }
            if self.max_depth != 0 && depth >= self.max_depth {
                self.aborted = true;
                break;
            }

            let front = std::mem::take(&mut fronts[depth % 3]);
            if front.is_empty() {
                break;
            }
            self.width = self.width.max(front.len() as u64);
            merge_index.clear();

            let mut next = std::mem::take(&mut fronts[(depth + 1) % 3]);
            for (id, state) in &front {
                trace!(state = %state, depth, "expanding");
                self.expand(*id, state, &mut next, &mut merge_index);
                self.check_cpu_timeout();
                if self.aborted {
                    break;
                }
            }
            fronts[(depth + 1) % 3] = next;
            depth += 1;
        }
    }

    fn expand(&mut self, src_id: u64, s: &State<T>, next: &mut Vec<Entry<T>>, merge_index: &mut MergeIndex) {
        let ts_min = s.earliest_finish_time();
        let latest_idle = self.next_certain_job_release(s);
        let horizon = Time::max(latest_idle, s.latest_finish_time());
        trace!(ts_min = %ts_min, horizon = %horizon, "next-job window");

        let mut found_one = false;
        let candidates: Vec<(T, usize)> = self
            .index
            .by_earliest_arrival_from(s.earliest_job_release())
            .to_vec();
        for &(arrival, idx) in &candidates {
            if arrival > horizon {
                break;
            }
            if s.scheduled_jobs().contains(idx) {
                continue;
            }
            if self.is_eligible_successor(s, idx) {
                self.schedule(src_id, s, idx, next, merge_index);
                found_one = true;
            }
        }

        // a reachable state with pending jobs but no successor is a dead end
        if !found_one && s.scheduled_jobs().size() != self.jobs.len() {
            trace!(state = %s, "dead end");
            self.observed_deadline_miss = true;
            if self.early_exit {
                self.aborted = true;
            }
        }
    }

    // -- successor rules ----------------------------------------------------

    fn ready(&self, s: &State<T>, idx: usize) -> bool {
        s.scheduled_jobs().includes(self.index.predecessors_of(idx))
    }

    fn iip_eligible(&self, s: &State<T>, job: &Job<T>, t: T) -> bool {
        !I::CAN_BLOCK
            || t <= self
                .iip
                .latest_start(self.jobs, &self.index, job, t, s.scheduled_jobs())
    }

    /// No other already-ready job of strictly higher priority is certainly
    /// released by `t`.
    fn priority_eligible(&self, s: &State<T>, idx: usize, t: T) -> bool {
        let job = &self.jobs[idx];
        for &(arrival, other) in self.index.by_earliest_arrival_from(s.earliest_job_release()) {
            if arrival > t {
                break;
            }
            if other == idx || s.scheduled_jobs().contains(other) {
                continue;
            }
            let o = &self.jobs[other];
            if o.latest_arrival() <= t && self.ready(s, other) && o.higher_priority_than(job) {
                return false;
            }
        }
        true
    }

    /// Next time by which some incomplete, ready, policy-eligible job is
    /// certainly released, looking from this state's earliest finish time.
    fn next_certain_job_release(&self, s: &State<T>) -> T {
        for &(latest_arrival, idx) in self.index.by_latest_arrival_from(s.earliest_finish_time()) {
            if s.scheduled_jobs().contains(idx) || !self.ready(s, idx) {
                continue;
            }
            let job = &self.jobs[idx];
            // if the job is blocked when it is certainly released, some
            // schedule exists in which it does not count
            if I::CAN_BLOCK
                && (!self.iip_eligible(s, job, latest_arrival)
                    || !self.priority_eligible(s, idx, latest_arrival))
            {
                continue;
            }
            return latest_arrival;
        }
        T::infinity()
    }

    /// Next certain release of a strictly-higher-priority job, looking from
    /// this state's earliest finish time.
    fn next_certain_higher_priority_job_release(&self, s: &State<T>, idx: usize) -> T {
        let job = &self.jobs[idx];
        for &(latest_arrival, other) in self.index.by_latest_arrival_from(s.earliest_finish_time())
        {
            if s.scheduled_jobs().contains(other) {
                continue;
            }
            if self.jobs[other].higher_priority_than(job) && self.ready(s, other) {
                return latest_arrival;
            }
        }
        T::infinity()
    }

    /// A certainly-released, ready, policy-eligible job exists no later than
    /// this state's latest finish time.
    fn exists_certainly_pending_job(&self, s: &State<T>) -> bool {
        let t = s.latest_finish_time();
        for &(arrival, idx) in self.index.by_earliest_arrival_from(s.earliest_job_release()) {
            if arrival > t {
                break;
            }
            if s.scheduled_jobs().contains(idx) || !self.ready(s, idx) {
                continue;
            }
            let job = &self.jobs[idx];
            if job.latest_arrival() > t {
                continue;
            }
            if I::CAN_BLOCK
                && (!self.priority_eligible(s, idx, t) || !self.iip_eligible(s, job, t))
            {
                continue;
            }
            return true;
        }
        false
    }

    fn potentially_next(&self, s: &State<T>, idx: usize) -> bool {
        let t_latest = s.latest_finish_time();
        let job = &self.jobs[idx];

        // trivially possible if the processor may still be busy when the job
        // arrives; otherwise no other job may be certain to beat it to the
        // processor
        if t_latest < job.earliest_arrival() {
            if self.exists_certainly_pending_job(s) {
                return false;
            }
            let r = self.next_certain_job_release(s);
            if r < job.earliest_arrival() {
                return false;
            }
        }
        true
    }

    fn is_eligible_successor(&self, s: &State<T>, idx: usize) -> bool {
        let job = &self.jobs[idx];
        if s.scheduled_jobs().contains(idx) || !self.ready(s, idx) {
            return false;
        }
        let t_s = Time::max(s.earliest_finish_time(), job.earliest_arrival());
        self.priority_eligible(s, idx, t_s)
            && self.potentially_next(s, idx)
            && self.iip_eligible(s, job, t_s)
    }

    // -- successor construction ---------------------------------------------

    /// The finish-time interval of dispatching job `idx` in state `s`,
    /// given the bound imposed by the next certain higher-priority release
    /// and the policy's latest admissible start.
    fn finish_interval(
        s: &State<T>,
        job: &Job<T>,
        other_certain_start: T,
        iip_latest_start: T,
        abort: Option<&AbortAction<T>>,
    ) -> Interval<T> {
        let t_s = Time::max(s.earliest_finish_time(), job.earliest_arrival());
        let eft = t_s + job.least_cost();

        let t_r = if other_certain_start == T::infinity() {
            T::infinity()
        } else {
            Time::max(other_certain_start, t_s) - T::epsilon()
        };
        // own latest start under work conservation
        let t_s_prime = Time::max(s.latest_finish_time(), job.latest_arrival());
        let latest_start = Time::min(t_s_prime, Time::min(t_r, iip_latest_start));
        let lft = latest_start + job.maximal_cost();

        if let Some(action) = abort {
            // certainly triggered before it could start: skipped at no cost
            if s.earliest_finish_time() >= action.earliest_trigger() {
                return s.finish_range();
            }
            let earliest_abort = action.earliest_trigger() + action.least_cleanup_cost();
            let latest_abort = action.latest_trigger() + action.maximum_cleanup_cost();
            return Interval::new(
                Time::min(eft, earliest_abort),
                Time::min(lft, latest_abort),
            );
        }
        Interval::new(eft, lft)
    }

    fn next_finish_times(&self, s: &State<T>, idx: usize) -> Interval<T> {
        let job = &self.jobs[idx];
        let t_s = Time::max(s.earliest_finish_time(), job.earliest_arrival());
        let other_certain_start = self.next_certain_higher_priority_job_release(s, idx);
        let iip_latest_start = if I::CAN_BLOCK {
            self.iip
                .latest_start(self.jobs, &self.index, job, t_s, s.scheduled_jobs())
        } else {
            T::infinity()
        };
        Self::finish_interval(
            s,
            job,
            other_certain_start,
            iip_latest_start,
            self.abort_actions[idx],
        )
    }

    /// Earliest possible release of any incomplete job other than `idx`.
    fn earliest_possible_job_release(&self, s: &State<T>, idx: usize) -> T {
        for &(arrival, other) in self.index.by_earliest_arrival_from(s.earliest_job_release()) {
            if other == idx || s.scheduled_jobs().contains(other) {
                continue;
            }
            return arrival;
        }
        T::infinity()
    }

    fn update_finish_times(&mut self, idx: usize, range: Interval<T>) {
        let job = &self.jobs[idx];
        let widened = self.rta.update(job.id(), range);
        trace!(job = %job, range = %widened, "new finish-time bounds");
        if job.exceeds_deadline(widened.max()) {
            self.observed_deadline_miss = true;
            if self.early_exit {
                self.aborted = true;
            }
        }
    }

    fn schedule(
        &mut self,
        src_id: u64,
        s: &State<T>,
        idx: usize,
        next: &mut Vec<Entry<T>>,
        merge_index: &mut MergeIndex,
    ) {
        let jobs = self.jobs;
        let job = &jobs[idx];
        let finish_times = self.next_finish_times(s, idx);
        let key = s.next_key(job);

        if !self.be_naive {
            if let Some(candidates) = merge_index.get(&key) {
                let goal_set = IndexSet::with(s.scheduled_jobs(), idx);
                for &pos in candidates {
                    let (target_id, target) = &mut next[pos];
                    // key collision unless the job sets match exactly
                    if *target.scheduled_jobs() != goal_set {
                        continue;
                    }
                    // cannot merge without loss of accuracy unless the
                    // intervals overlap
                    if !finish_times.intersects(&target.finish_range()) {
                        continue;
                    }
                    target.update_finish_range(finish_times);
                    let target_id = *target_id;
                    let widened = next[pos].1.finish_range();
                    self.update_finish_times(idx, finish_times);
                    if self.collect {
                        self.graph.widen_node(target_id, &[widened]);
                        self.graph.add_edge(job.id(), src_id, target_id, finish_times);
                    }
                    self.num_edges += 1;
                    return;
                }
            }
        }

        // no merge partner: construct a new state
        let next_release = self.earliest_possible_job_release(s, idx);
        let state = State::from_dispatch(s, job, idx, finish_times, next_release);
        let id = self.next_state_id;
        self.next_state_id += 1;
        self.num_states += 1;

        self.update_finish_times(idx, finish_times);
        if self.collect {
            let epr = if next_release == T::infinity() {
                None
            } else {
                Some(next_release)
            };
            self.graph.add_node(id, vec![state.finish_range()], epr);
            self.graph.add_edge(job.id(), src_id, id, finish_times);
        }
        self.num_edges += 1;

        if !self.be_naive {
            merge_index.entry(key).or_default().push(next.len());
        }
        next.push((id, state));
    }

    // -- resource limits ----------------------------------------------------

    fn check_cpu_timeout(&mut self) {
        if self.timeout > 0.0 && self.clock.seconds() > self.timeout {
            self.aborted = true;
            self.timed_out = true;
        }
    }
}
