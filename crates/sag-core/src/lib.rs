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

//! # Core Primitives for Schedule-Abstraction Analysis
//!
//! This crate provides the fundamental data types shared by every analysis
//! engine in the workspace:
//!
//! - [`time::Time`]: the scalar abstraction over discrete (`i64`) and dense
//!   (`f64`) time models.
//! - [`interval::Interval`]: a closed numeric interval `[min, max]` with the
//!   union/sum/widen operations the engines are built on.
//! - [`lookup::IntervalLookup`]: a bucketed index mapping a point in time to
//!   all entries whose interval covers that point.
//! - [`index_set::IndexSet`]: a compact set of small job indices with cheap
//!   derivation, subset, and equality tests.

pub mod index_set;
pub mod interval;
pub mod lookup;
pub mod time;

pub use index_set::IndexSet;
pub use interval::Interval;
pub use lookup::IntervalLookup;
pub use time::Time;
