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

//! # Time Models
//!
//! The analysis is parametric in the scalar used to represent points in time,
//! execution costs, and priorities. Two models are supported:
//!
//! - **discrete** time ([`Discrete`], `i64`): all events happen at integer
//!   instants; results are bit-identical across runs.
//! - **dense** time ([`Dense`], `f64`): events may happen at arbitrary real
//!   instants; a small tolerance absorbs floating-point noise in deadline
//!   checks.
//!
//! The [`Time`] trait captures exactly what the engines need from a scalar:
//! ring arithmetic (via `num_traits`), a total usable order, an "infinitely
//! late" sentinel, the minimal distance between two distinct events
//! (`epsilon`), and a stable bit pattern to feed run-stable hashes.

use num_traits::{Num, NumCast};
use std::fmt::{Debug, Display};
use std::str::FromStr;

/// Discrete time scalar.
pub type Discrete = i64;

/// Dense time scalar.
pub type Dense = f64;

/// Scalar abstraction over the supported time models.
///
/// Implementations must form a numeric ring with a (partial, in practice
/// total) order, and additionally provide the model-specific constants used
/// throughout the analysis.
pub trait Time:
    Num + NumCast + Copy + PartialOrd + Default + Debug + Display + FromStr + Send + Sync + 'static
{
    /// A point in time later than any event of interest.
    fn infinity() -> Self;

    /// Minimal distance before some event.
    ///
    /// Used when a job must start strictly before another one is certainly
    /// ready: `latest start = certain release - epsilon()`.
    fn epsilon() -> Self;

    /// A deadline miss of a magnitude below this tolerance is ignored as
    /// numerical noise. Zero for discrete time.
    fn miss_tolerance() -> Self;

    /// A run-stable bit pattern of the value, suitable for hashing.
    fn stable_bits(self) -> u64;

    #[inline]
    fn min(self, other: Self) -> Self {
        if other < self {
            other
        } else {
            self
        }
    }

    #[inline]
    fn max(self, other: Self) -> Self {
        if self < other {
            other
        } else {
            self
        }
    }
}

impl Time for i64 {
    #[inline]
    fn infinity() -> Self {
        i64::MAX
    }

    #[inline]
    fn epsilon() -> Self {
        1
    }

    #[inline]
    fn miss_tolerance() -> Self {
        0
    }

    #[inline]
    fn stable_bits(self) -> u64 {
        self as u64
    }
}

impl Time for f64 {
    #[inline]
    fn infinity() -> Self {
        f64::INFINITY
    }

    #[inline]
    fn epsilon() -> Self {
        f64::EPSILON
    }

    // assuming we work with microseconds, this is one picosecond
    // (i.e., much less than one processor cycle)
    #[inline]
    fn miss_tolerance() -> Self {
        1e-6
    }

    #[inline]
    fn stable_bits(self) -> u64 {
        self.to_bits()
    }
}
