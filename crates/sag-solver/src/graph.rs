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

//! # Search-Graph Collection
//!
//! When enabled, the engines record one node per abstract state and one edge
//! per transition so the driver can emit the explored graph for diagnosis.
//! Node intervals reflect post-merge widening: a node is updated whenever the
//! state it describes absorbs another state.

use sag_core::{Interval, Time};
use sag_model::job::JobId;

/// One abstract state.
///
/// For the uniprocessor engine, `availability` holds the single finish-time
/// interval of the last-dispatched job; for the global engine it holds the
/// sorted per-core availability intervals.
#[derive(Debug, Clone)]
pub struct GraphNode<T> {
    pub id: u64,
    pub availability: Vec<Interval<T>>,
    /// Earliest pending release, if the engine tracks one (uniprocessor
    /// only). `None` when no job is pending or for global states.
    pub earliest_pending_release: Option<T>,
}

/// One dispatch transition between two recorded states.
#[derive(Debug, Clone)]
pub struct GraphEdge<T> {
    pub job: JobId,
    pub source: u64,
    pub target: u64,
    pub finish_range: Interval<T>,
}

/// The collected search graph of one analysis run.
#[derive(Debug, Clone, Default)]
pub struct ScheduleGraph<T> {
    pub nodes: Vec<GraphNode<T>>,
    pub edges: Vec<GraphEdge<T>>,
}

impl<T: Time> ScheduleGraph<T> {
    pub fn new() -> Self {
        ScheduleGraph {
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn add_node(&mut self, id: u64, availability: Vec<Interval<T>>, epr: Option<T>) {
        debug_assert_eq!(id as usize, self.nodes.len());
        self.nodes.push(GraphNode {
            id,
            availability,
            earliest_pending_release: epr,
        });
    }

    /// Widens a recorded node after the corresponding state absorbed another
    /// state in a merge.
    pub fn widen_node(&mut self, id: u64, availability: &[Interval<T>]) {
        let node = &mut self.nodes[id as usize];
        for (have, new) in node.availability.iter_mut().zip(availability) {
            have.widen(new);
        }
    }

    pub fn add_edge(&mut self, job: JobId, source: u64, target: u64, finish_range: Interval<T>) {
        self.edges.push(GraphEdge {
            job,
            source,
            target,
            finish_range,
        });
    }
}
