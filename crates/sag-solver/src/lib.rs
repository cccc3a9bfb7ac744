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

//! # Schedulability Analysis Engines
//!
//! Reachability analysis over an abstract schedule graph. Each abstract state
//! compactly represents all concrete schedules reachable under any admissible
//! choice of release times and execution costs; exploring all states of depth
//! `k` before any state of depth `k + 1` yields a breadth-first, depth-layered
//! search whose by-products are the schedulability verdict and best-/worst-
//! case response-time bounds for every job.
//!
//! Two engines are provided:
//!
//! - [`uni::StateSpace`]: the uniprocessor engine, with optional
//!   idle-time-insertion policies ([`uni::iip`]) and abort-action support.
//! - [`global::StateSpace`]: the global multiprocessor engine, with
//!   per-core availability intervals and optional parallel layer expansion.

pub mod clock;
pub mod global;
pub mod graph;
pub mod index;
pub mod report;
pub mod rta;
pub mod uni;

pub use report::AnalysisReport;
