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

//! # Uniprocessor Engine
//!
//! Exploration of the abstract schedule graph for a single processor. A state
//! is the finish-time interval of the last dispatched job plus the set of
//! dispatched jobs; successors are generated for every job that a
//! priority-driven, work-conserving scheduler could dispatch next under some
//! admissible choice of releases and costs. Idle-time-insertion policies
//! ([`iip`]) optionally restrict dispatching, and abort actions bound the
//! damage of overrunning jobs.

pub mod iip;
pub mod space;
pub mod state;

pub use space::StateSpace;
pub use state::State;

#[cfg(test)]
mod tests;
