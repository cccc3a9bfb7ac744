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
use crate::global::state::State;
use parking_lot::Mutex;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use sag_core::{Interval, Time};
use sag_model::job::Job;
use sag_model::problem::{AnalysisOptions, Problem};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{instrument, trace};

type Entry<T> = (u64, State<T>);
type MergeIndex = FxHashMap<u64, Vec<usize>>;

/// The global multiprocessor exploration engine.
///
/// The exploration is always layer-by-layer; within one layer, expansion is
/// either sequential or fanned out over a worker pool. In parallel mode the
/// merge index is a lock-striped map (merges serialize per stripe), workers
/// aggregate response times thread-locally, and the abort flag is a monotone
/// sink.
pub struct StateSpace<'a, T: Time> {
    jobs: &'a [Job<T>],
    index: WorkloadIndex<T>,
    num_cpus: usize,

    rta: ResponseTimes<T>,
    aborted: bool,
    timed_out: bool,

    timeout: f64,
    max_depth: usize,
    be_naive: bool,
    num_threads: usize,
    collect: bool,

    num_states: u64,
    num_edges: u64,
    width: u64,
    next_state_id: u64,

    clock: AnalysisClock,
    graph: ScheduleGraph<T>,
}

/// Lock-striped merge index for parallel layer expansion. Each stripe owns
/// the successor states whose keys hash into it.
struct MergeShards<T> {
    shards: Vec<Mutex<FxHashMap<u64, Vec<State<T>>>>>,
}

impl<T: Time> MergeShards<T> {
    fn new(num_shards: usize) -> Self {
        MergeShards {
            shards: (0..num_shards).map(|_| Mutex::new(FxHashMap::default())).collect(),
        }
    }

    fn merge_or_insert(&self, state: State<T>) {
        let shard = &self.shards[(state.key() as usize) % self.shards.len()];
        let mut map = shard.lock();
        let bucket = map.entry(state.key()).or_default();
        for existing in bucket.iter_mut() {
            if existing.try_to_merge(&state) {
                return;
            }
        }
        bucket.push(state);
    }

    fn drain(self) -> Vec<State<T>> {
        self.shards
            .into_iter()
            .flat_map(|shard| shard.into_inner().into_values().flatten())
            .collect()
    }
}

/// Thread-local by-products of one worker's share of a layer.
struct WorkerOut<T> {
    rta: ResponseTimes<T>,
    edges: u64,
    states: Vec<State<T>>,
}

impl<T: Time> WorkerOut<T> {
    fn new() -> Self {
        WorkerOut {
            rta: ResponseTimes::new(),
            edges: 0,
            states: Vec::new(),
        }
    }
}

impl<'a, T: Time> StateSpace<'a, T> {
    pub fn explore(problem: &'a Problem<T>, opts: &AnalysisOptions) -> Self {
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
        StateSpace {
            jobs: &problem.jobs,
            index: WorkloadIndex::new(&problem.jobs, &problem.precedence, opts.num_buckets),
            num_cpus: problem.num_processors,
            rta: ResponseTimes::new(),
            aborted: false,
            timed_out: false,
            timeout: opts.timeout,
            max_depth: opts.max_depth,
            be_naive: opts.be_naive,
            num_threads: opts.num_threads.max(1),
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
        !self.aborted
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

    // -- shared successor rules ---------------------------------------------

    fn ready(&self, s: &State<T>, idx: usize) -> bool {
        s.job_incomplete(idx) && s.job_ready(self.index.predecessors_of(idx))
    }

    /// The interval in which `idx` becomes ready: its arrival window joined
    /// with the finish bounds of its predecessors. Predecessor bounds come
    /// from this state's certainly-running list where possible, and from the
    /// global response-time table otherwise.
    fn ready_times(&self, s: &State<T>, idx: usize) -> Interval<T> {
        self.ready_times_disregarding(s, idx, &[])
    }

    fn ready_times_disregarding(
        &self,
        s: &State<T>,
        idx: usize,
        disregard: &[usize],
    ) -> Interval<T> {
        let mut r = self.jobs[idx].arrival_window();
        for &pred in self.index.predecessors_of(idx) {
            if disregard.contains(&pred) {
                continue;
            }
            let finish = s
                .get_finish_times(pred)
                .unwrap_or_else(|| self.rta.get(self.jobs[pred].id()));
            r.lower_bound(finish.min());
            r.extend_to(finish.max());
        }
        r
    }

    /// Latest time by which the higher-priority job `hp` is certainly ready,
    /// from the perspective of dispatching `reference`. Ignores shared
    /// predecessors and never reports a time before the reference job itself
    /// can be ready.
    fn latest_ready_time_of(&self, s: &State<T>, ready_min: T, hp: usize, reference: usize) -> T {
        let rt = self.ready_times_disregarding(s, hp, self.index.predecessors_of(reference));
        Time::max(rt.max(), ready_min)
    }

    /// Latest time by which some incomplete job is certainly ready. May lie
    /// in the past.
    fn next_job_ready(&self, s: &State<T>, t_earliest: T) -> T {
        let mut when = T::infinity();

        // check everything that overlaps with t_earliest
        for &idx in self.index.window_jobs_at(t_earliest) {
            if self.ready(s, idx) {
                when = Time::min(when, self.ready_times(s, idx).max());
            }
        }
        // no point looking in the future when we've already found one in the
        // present
        if when <= t_earliest {
            return when;
        }
        for &(latest_arrival, idx) in self.index.by_latest_arrival_from(t_earliest) {
            if when < latest_arrival {
                break;
            }
            if self.ready(s, idx) {
                when = Time::min(when, self.ready_times(s, idx).max());
            }
        }
        when
    }

    /// Latest time by which some strictly-higher-priority job is certainly
    /// ready. May lie in the past.
    fn next_higher_prio_job_ready(&self, s: &State<T>, reference: usize, t_earliest: T) -> T {
        let ready_min = self.ready_times(s, reference).min();
        let ref_job = &self.jobs[reference];
        let mut when = T::infinity();

        for &idx in self.index.window_jobs_at(t_earliest) {
            if idx != reference && self.ready(s, idx) && self.jobs[idx].higher_priority_than(ref_job)
            {
                when = Time::min(when, self.latest_ready_time_of(s, ready_min, idx, reference));
            }
        }
        if when <= t_earliest {
            return when;
        }
        for &(latest_arrival, idx) in self.index.by_latest_arrival_from(t_earliest) {
            if when < latest_arrival {
                break;
            }
            if idx != reference && self.ready(s, idx) && self.jobs[idx].higher_priority_than(ref_job)
            {
                when = Time::min(when, self.latest_ready_time_of(s, ready_min, idx, reference));
            }
        }
        when
    }

    /// The dispatch window of one state: earliest time any core may be free,
    /// and the latest time by which a work-conserving scheduler certainly
    /// dispatches some job.
    fn window(&self, s: &State<T>) -> (T, T) {
        let t_min = s.core_availability().min();
        let t_job = self.next_job_ready(s, t_min);
        let t_core = s.core_availability().max();
        let t_wc = Time::max(t_core, t_job);
        trace!(t_min = %t_min, t_job = %t_job, t_core = %t_core, t_wc = %t_wc, "dispatch window");
        (t_min, t_wc)
    }

    /// Ready jobs that may be dispatched next: already-pending ones, and
    /// ones released within the work-conserving horizon.
    fn candidate_jobs(&self, s: &State<T>, t_min: T, t_wc: T) -> Vec<usize> {
        let mut candidates = Vec::new();
        for &idx in self.index.window_jobs_at(t_min) {
            if self.jobs[idx].earliest_arrival() <= t_min && self.ready(s, idx) {
                candidates.push(idx);
            }
        }
        for &(arrival, idx) in self.index.by_earliest_arrival_after(t_min) {
            if arrival > t_wc {
                break;
            }
            if self.ready(s, idx) {
                candidates.push(idx);
            }
        }
        candidates
    }

    /// Start- and finish-time intervals of dispatching `idx` next, or `None`
    /// if no admissible start time exists.
    fn start_times(&self, s: &State<T>, idx: usize, t_min: T, t_wc: T) -> Option<(Interval<T>, Interval<T>)> {
        let rt = self.ready_times(s, idx);
        let est = Time::max(rt.min(), t_min);
        let t_high = self.next_higher_prio_job_ready(s, idx, t_min);
        let lst = if t_high == T::infinity() {
            t_wc
        } else {
            Time::min(t_wc, t_high - T::epsilon())
        };
        if est > lst {
            return None;
        }
        let start = Interval::new(est, lst);
        Some((start, start + self.jobs[idx].cost()))
    }

    // -- sequential exploration ---------------------------------------------

    #[instrument(skip_all, fields(jobs = self.jobs.len(), cpus = self.num_cpus))]
    fn run(&mut self) {
        if self.num_threads > 1 && !self.collect {
            self.run_parallel();
        } else {
            self.run_sequential();
        }
    }

    fn run_sequential(&mut self) {
        let initial = State::initial(self.num_cpus);
        if self.collect {
            self.graph
                .add_node(0, initial.core_avail().to_vec(), None);
        }
        let mut front: Vec<Entry<T>> = vec![(0, initial)];
        self.next_state_id = 1;
        let mut merge_index = MergeIndex::default();

        let mut current_job_count = 0usize;
        while current_job_count < self.jobs.len() {
            self.width = self.width.max(front.len() as u64);
            self.num_states += front.len() as u64;
            self.check_depth_abort(current_job_count);
            self.check_cpu_timeout();
            if self.aborted {
                break;
            }

            let mut next: Vec<Entry<T>> = Vec::new();
            merge_index.clear();
            for (id, state) in &front {
                trace!(state = %state, depth = current_job_count, "expanding");
                self.explore_state(*id, state, &mut next, &mut merge_index);
                self.check_cpu_timeout();
                if self.aborted {
                    break;
                }
            }
            front = next;
            current_job_count += 1;
        }
    }

    fn explore_state(
        &mut self,
        src_id: u64,
        s: &State<T>,
        next: &mut Vec<Entry<T>>,
        merge_index: &mut MergeIndex,
    ) {
        let (t_min, t_wc) = self.window(s);
        let mut found_one = false;
        for idx in self.candidate_jobs(s, t_min, t_wc) {
            found_one |= self.dispatch(src_id, s, idx, t_min, t_wc, next, merge_index);
        }
        if !found_one && s.number_of_scheduled_jobs() != self.jobs.len() {
            // out of options with unscheduled jobs left: a dead end
            trace!(state = %s, "dead end");
            self.aborted = true;
        }
    }

    fn dispatch(
        &mut self,
        src_id: u64,
        s: &State<T>,
        idx: usize,
        t_min: T,
        t_wc: T,
        next: &mut Vec<Entry<T>>,
        merge_index: &mut MergeIndex,
    ) -> bool {
        let Some((start, finish)) = self.start_times(s, idx, t_min, t_wc) else {
            return false;
        };
        let job = &self.jobs[idx];
        trace!(job = %job, start = %start, finish = %finish, "dispatch");

        self.update_finish_times(idx, finish);
        let state = State::from_dispatch(
            s,
            idx,
            self.index.predecessors_of(idx),
            start,
            finish,
            self.jobs[idx].key(),
        );

        let mut merged_into = None;
        if !self.be_naive {
            if let Some(candidates) = merge_index.get(&state.key()) {
                for &pos in candidates {
                    if next[pos].1.try_to_merge(&state) {
                        merged_into = Some(pos);
                        break;
                    }
                }
            }
        }

        let pos = match merged_into {
            Some(pos) => {
                let (target_id, target) = &next[pos];
                if self.collect {
                    let target_id = *target_id;
                    let avail = target.core_avail().to_vec();
                    self.graph.widen_node(target_id, &avail);
                    self.graph
                        .add_edge(self.jobs[idx].id(), src_id, target_id, finish);
                }
                pos
            }
            None => {
                let id = self.next_state_id;
                self.next_state_id += 1;
                if self.collect {
                    self.graph.add_node(id, state.core_avail().to_vec(), None);
                    self.graph.add_edge(self.jobs[idx].id(), src_id, id, finish);
                }
                if !self.be_naive {
                    merge_index.entry(state.key()).or_default().push(next.len());
                }
                next.push((id, state));
                next.len() - 1
            }
        };
        self.num_edges += 1;

        self.check_for_deadline_misses(s.core_availability().min(), pos, next);
        true
    }

    /// After a dispatch, any incomplete job whose deadline lies before the
    /// new earliest core availability necessarily misses. Record the miss
    /// with a synthetic transition and abort.
    fn check_for_deadline_misses(
        &mut self,
        check_from: T,
        pos: usize,
        next: &mut Vec<Entry<T>>,
    ) {
        let (new_id, new_s) = &next[pos];
        let earliest = new_s.core_availability().min();
        let mut missed = None;
        for &(deadline, idx) in self.index.by_deadline_from(check_from) {
            if deadline < earliest {
                if new_s.job_incomplete(idx) {
                    missed = Some(idx);
                    break;
                }
            } else {
                // deadlines at or after the next earliest finish time
                break;
            }
        }
        let Some(idx) = missed else { return };

        trace!(job = %self.jobs[idx], state = %new_s, "necessarily missed deadline");
        let frange = new_s.core_availability() + self.jobs[idx].cost();
        let dummy = State::from_dispatch(
            new_s,
            idx,
            self.index.predecessors_of(idx),
            frange,
            frange,
            self.jobs[idx].key(),
        );
        let src = *new_id;

        self.aborted = true;
        self.update_finish_times(idx, frange);
        let id = self.next_state_id;
        self.next_state_id += 1;
        if self.collect {
            self.graph.add_node(id, dummy.core_avail().to_vec(), None);
            self.graph.add_edge(self.jobs[idx].id(), src, id, frange);
        }
        self.num_edges += 1;
        next.push((id, dummy));
    }

    fn update_finish_times(&mut self, idx: usize, range: Interval<T>) {
        let job = &self.jobs[idx];
        self.rta.update(job.id(), range);
        trace!(job = %job, range = %range, "new finish-time bounds");
        if job.exceeds_deadline(range.max()) {
            self.aborted = true;
        }
    }

    // -- parallel exploration -----------------------------------------------

    fn run_parallel(&mut self) {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.num_threads)
            .build()
            .expect("worker pool construction failed");

        let mut front: Vec<State<T>> = vec![State::initial(self.num_cpus)];
        let mut current_job_count = 0usize;
        while current_job_count < self.jobs.len() {
            self.width = self.width.max(front.len() as u64);
            self.num_states += front.len() as u64;
            self.check_depth_abort(current_job_count);
            self.check_cpu_timeout();
            if self.aborted {
                break;
            }

            let (next, layer_rta, layer_edges, layer_aborted) =
                self.expand_layer_parallel(&pool, &front);
            self.rta.absorb(&layer_rta);
            self.num_edges += layer_edges;
            self.aborted |= layer_aborted;
            front = next;
            current_job_count += 1;
        }
    }

    fn expand_layer_parallel(
        &self,
        pool: &rayon::ThreadPool,
        front: &[State<T>],
    ) -> (Vec<State<T>>, ResponseTimes<T>, u64, bool) {
        let shards = MergeShards::new(64);
        let aborted = AtomicBool::new(false);
        let chunk = (front.len() / (self.num_threads * 4)).max(1);

        let outs: Vec<WorkerOut<T>> = pool.install(|| {
            front
                .par_chunks(chunk)
                .map(|states| {
                    let mut out = WorkerOut::new();
                    for s in states {
                        self.explore_state_parallel(s, &shards, &mut out, &aborted);
                    }
                    out
                })
                .collect()
        });

        let mut next = if self.be_naive { Vec::new() } else { shards.drain() };
        let mut rta = ResponseTimes::new();
        let mut edges = 0;
        for out in outs {
            rta.absorb(&out.rta);
            edges += out.edges;
            next.extend(out.states);
        }
        (next, rta, edges, aborted.load(Ordering::Relaxed))
    }

    fn explore_state_parallel(
        &self,
        s: &State<T>,
        shards: &MergeShards<T>,
        out: &mut WorkerOut<T>,
        aborted: &AtomicBool,
    ) {
        let (t_min, t_wc) = self.window(s);
        let mut found_one = false;
        for idx in self.candidate_jobs(s, t_min, t_wc) {
            let Some((start, finish)) = self.start_times(s, idx, t_min, t_wc) else {
                continue;
            };
            found_one = true;
            let job = &self.jobs[idx];
            out.rta.update(job.id(), finish);
            if job.exceeds_deadline(finish.max()) {
                aborted.store(true, Ordering::Relaxed);
            }

            let state = State::from_dispatch(
                s,
                idx,
                self.index.predecessors_of(idx),
                start,
                finish,
                job.key(),
            );
            out.edges += 1;
            self.check_for_deadline_misses_parallel(s, &state, out, aborted);
            if self.be_naive {
                out.states.push(state);
            } else {
                shards.merge_or_insert(state);
            }
        }
        if !found_one && s.number_of_scheduled_jobs() != self.jobs.len() {
            aborted.store(true, Ordering::Relaxed);
        }
    }

    /// Parallel variant of the skip-detection; checks the freshly built
    /// state before it enters the merge index, which is sound because a miss
    /// along one path is a miss regardless of later merges.
    fn check_for_deadline_misses_parallel(
        &self,
        old_s: &State<T>,
        new_s: &State<T>,
        out: &mut WorkerOut<T>,
        aborted: &AtomicBool,
    ) {
        let earliest = new_s.core_availability().min();
        for &(deadline, idx) in self.index.by_deadline_from(old_s.core_availability().min()) {
            if deadline >= earliest {
                break;
            }
            if new_s.job_incomplete(idx) {
                aborted.store(true, Ordering::Relaxed);
                let frange = new_s.core_availability() + self.jobs[idx].cost();
                out.rta.update(self.jobs[idx].id(), frange);
                out.states.push(State::from_dispatch(
                    new_s,
                    idx,
                    self.index.predecessors_of(idx),
                    frange,
                    frange,
                    self.jobs[idx].key(),
                ));
                out.edges += 1;
                break;
            }
        }
    }

    // -- resource limits ----------------------------------------------------

    fn check_cpu_timeout(&mut self) {
        if self.timeout > 0.0 && self.clock.seconds() > self.timeout {
            self.aborted = true;
            self.timed_out = true;
        }
    }

    fn check_depth_abort(&mut self, current_job_count: usize) {
        if self.max_depth != 0 && current_job_count > self.max_depth {
            self.aborted = true;
        }
    }
}
