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

use rustc_hash::FxHashMap;
use sag_core::{Interval, Time};
use sag_model::job::JobId;

/// Per-job finish-time bounds, aggregated over every explored transition.
///
/// Entries only ever widen; the table therefore soundly bounds the finish
/// time of each dispatched job over all admissible schedules explored so far.
#[derive(Debug, Clone)]
pub struct ResponseTimes<T> {
    table: FxHashMap<JobId, Interval<T>>,
}

impl<T: Time> ResponseTimes<T> {
    pub fn new() -> Self {
        ResponseTimes {
            table: FxHashMap::default(),
        }
    }

    /// Widens (or inserts) the entry for `id` and returns the new bounds.
    pub fn update(&mut self, id: JobId, range: Interval<T>) -> Interval<T> {
        let entry = self.table.entry(id).or_insert(range);
        entry.widen(&range);
        *entry
    }

    /// The finish-time bounds recorded for `id`, or `[0, infinity]` if the
    /// job was never dispatched.
    pub fn get(&self, id: JobId) -> Interval<T> {
        self.table
            .get(&id)
            .copied()
            .unwrap_or_else(|| Interval::new(T::zero(), T::infinity()))
    }

    pub fn contains(&self, id: JobId) -> bool {
        self.table.contains_key(&id)
    }

    /// Folds another table into this one entry by entry. Used to absorb the
    /// thread-local tables after a parallel layer expansion.
    pub fn absorb(&mut self, other: &ResponseTimes<T>) {
        for (&id, &range) in &other.table {
            self.update(id, range);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (JobId, Interval<T>)> + '_ {
        self.table.iter().map(|(&id, &r)| (id, r))
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl<T: Time> Default for ResponseTimes<T> {
    fn default() -> Self {
        Self::new()
    }
}
