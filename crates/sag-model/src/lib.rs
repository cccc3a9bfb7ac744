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

//! # Problem Model
//!
//! Everything an analysis engine consumes: immutable [`job::Job`]
//! descriptors, precedence constraints, abort actions, the validated
//! [`problem::Problem`] record, and the [`problem::AnalysisOptions`] knobs.
//! The [`io`] module ingests the CSV formats of the command-line tool, and
//! [`generator`] produces seeded synthetic workloads for benchmarks and
//! stress tests.

pub mod abort;
pub mod err;
pub mod generator;
pub mod io;
pub mod job;
pub mod precedence;
pub mod problem;

pub mod prelude {
    pub use crate::abort::AbortAction;
    pub use crate::err::ProblemError;
    pub use crate::job::{Job, JobId};
    pub use crate::precedence::PrecedenceConstraint;
    pub use crate::problem::{AnalysisOptions, Problem};
}
