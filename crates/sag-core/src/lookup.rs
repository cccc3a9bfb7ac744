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

//! # Bucketed Interval Lookup
//!
//! Maps a point to all entries whose associated interval covers that point.
//! Entries are identified by `usize` indices into some external collection
//! (jobs, in practice), which keeps the table free of lifetimes and cheap to
//! share.

use crate::interval::Interval;
use crate::time::Time;

/// A bucketed interval index over a fixed value range.
///
/// The range `[lo, hi]` is partitioned into buckets of a fixed width. An
/// entry inserted with interval `w` is recorded in every bucket overlapping
/// `w`, so a point query is a single bucket access. Points outside the range
/// are clamped to the first or last bucket.
///
/// # Examples
///
/// ```
/// use sag_core::{Interval, IntervalLookup};
///
/// let mut lut = IntervalLookup::new(Interval::new(0i64, 60), 10);
/// lut.insert(0, Interval::new(0, 59));
/// assert_eq!(lut.lookup(30), &[0]);
/// ```
#[derive(Debug, Clone)]
pub struct IntervalLookup<T> {
    range: Interval<T>,
    width: T,
    buckets: Vec<Vec<usize>>,
}

impl<T: Time> IntervalLookup<T> {
    /// Creates an empty lookup table over `range` with the given bucket
    /// width. A width below one is raised to one.
    pub fn new(range: Interval<T>, bucket_width: T) -> Self {
        let width = Time::max(bucket_width, T::one());
        let spanned = num_traits::cast::<T, usize>(range.length() / width).unwrap_or(1);
        let num_buckets = 1 + spanned.max(1);
        IntervalLookup {
            range,
            width,
            buckets: vec![Vec::new(); num_buckets],
        }
    }

    /// The bucket index covering `point`.
    pub fn bucket_of(&self, point: T) -> usize {
        if self.range.contains(point) {
            let i = num_traits::cast::<T, usize>((point - self.range.min()) / self.width)
                .unwrap_or(0);
            i.min(self.buckets.len() - 1)
        } else if point < self.range.min() {
            0
        } else {
            self.buckets.len() - 1
        }
    }

    /// Records `idx` in every bucket overlapped by `window`.
    pub fn insert(&mut self, idx: usize, window: Interval<T>) {
        let a = self.bucket_of(window.min());
        let b = self.bucket_of(window.max());
        for bucket in &mut self.buckets[a..=b] {
            bucket.push(idx);
        }
    }

    /// All entries whose interval covers `point`.
    ///
    /// A bucket may contain entries whose interval merely overlaps the
    /// bucket, not the queried point; callers filter as needed.
    #[inline]
    pub fn lookup(&self, point: T) -> &[usize] {
        &self.buckets[self.bucket_of(point)]
    }

    /// Direct access to bucket `i`.
    #[inline]
    pub fn bucket(&self, i: usize) -> &[usize] {
        &self.buckets[i]
    }

    /// The number of buckets.
    #[inline]
    pub fn num_buckets(&self) -> usize {
        self.buckets.len()
    }
}
