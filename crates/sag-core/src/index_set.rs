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

//! # Index Sets
//!
//! A bitset over small non-negative indices. The exploration engines derive
//! millions of these from one another (one per dispatched job along a path),
//! so the dominant operations are the derivation constructor, equality, and
//! containment.

use std::fmt;

const WORD_BITS: usize = 64;

/// A compact set of small `usize` indices with bitset semantics.
///
/// Capacity grows on demand; two sets compare equal iff they contain the same
/// indices, regardless of their internal capacity.
///
/// # Examples
///
/// ```
/// use sag_core::IndexSet;
///
/// let mut s = IndexSet::new();
/// s.add(3);
/// let t = IndexSet::with(&s, 40);
/// assert!(t.contains(3));
/// assert!(t.contains(40));
/// assert!(s.is_subset_of(&t));
/// assert_eq!(t.size(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct IndexSet {
    words: Vec<u64>,
}

impl IndexSet {
    /// A new empty set.
    #[inline]
    pub fn new() -> Self {
        IndexSet { words: Vec::new() }
    }

    /// Derives a new set equal to `from` with `idx` added, without mutating
    /// `from`. This is the constructor used on every state transition.
    pub fn with(from: &IndexSet, idx: usize) -> Self {
        let needed = idx / WORD_BITS + 1;
        let mut words = Vec::with_capacity(needed.max(from.words.len()));
        words.extend_from_slice(&from.words);
        if words.len() < needed {
            words.resize(needed, 0);
        }
        words[idx / WORD_BITS] |= 1u64 << (idx % WORD_BITS);
        IndexSet { words }
    }

    /// Whether `idx` is in the set.
    #[inline]
    pub fn contains(&self, idx: usize) -> bool {
        self.words
            .get(idx / WORD_BITS)
            .is_some_and(|w| w & (1u64 << (idx % WORD_BITS)) != 0)
    }

    /// Adds `idx`, growing the set if needed.
    pub fn add(&mut self, idx: usize) {
        let word = idx / WORD_BITS;
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= 1u64 << (idx % WORD_BITS);
    }

    /// Whether every index in `indices` is in the set.
    pub fn includes(&self, indices: &[usize]) -> bool {
        indices.iter().all(|&i| self.contains(i))
    }

    /// Whether every member of `self` is also a member of `other`.
    pub fn is_subset_of(&self, other: &IndexSet) -> bool {
        self.words.iter().enumerate().all(|(i, &w)| {
            let o = other.words.get(i).copied().unwrap_or(0);
            w & !o == 0
        })
    }

    /// The number of indices in the set.
    #[inline]
    pub fn size(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Whether the set is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Iterates over the members in increasing order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(wi, &w)| {
            (0..WORD_BITS).filter_map(move |b| {
                if w & (1u64 << b) != 0 {
                    Some(wi * WORD_BITS + b)
                } else {
                    None
                }
            })
        })
    }
}

impl PartialEq for IndexSet {
    fn eq(&self, other: &Self) -> bool {
        let (short, long) = if self.words.len() <= other.words.len() {
            (&self.words, &other.words)
        } else {
            (&other.words, &self.words)
        };
        short
            .iter()
            .zip(long.iter())
            .all(|(a, b)| a == b)
            && long[short.len()..].iter().all(|&w| w == 0)
    }
}

impl Eq for IndexSet {}

impl fmt::Display for IndexSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        let mut first = true;
        for i in self.iter() {
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            write!(f, "{}", i)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_set_basics() {
        let empty = IndexSet::new();
        assert_eq!(empty.size(), 0);
        assert!(empty.is_empty());
        assert!(!empty.contains(0));
        assert!(empty.is_subset_of(&IndexSet::new()));
    }

    #[test]
    fn add_and_contains() {
        let mut s = IndexSet::new();
        s.add(10);
        s.add(20);
        s.add(30);
        assert!(s.contains(10));
        assert!(s.contains(20));
        assert!(s.contains(30));
        assert!(!s.contains(29));
        assert_eq!(s.size(), 3);
    }

    #[test]
    fn subset_relation() {
        let mut all = IndexSet::new();
        all.add(10);
        all.add(20);
        all.add(30);

        let mut some = IndexSet::new();
        some.add(10);
        some.add(20);

        assert!(some.is_subset_of(&all));
        assert!(!all.is_subset_of(&some));
        assert!(IndexSet::new().is_subset_of(&all));
        assert!(!all.is_subset_of(&IndexSet::new()));
    }

    #[test]
    fn includes_lists() {
        let mut all = IndexSet::new();
        all.add(10);
        all.add(20);
        all.add(30);
        assert!(all.includes(&[10, 20]));
        assert!(all.includes(&[30, 20]));
        assert!(!all.includes(&[30, 40]));
        assert!(all.includes(&[]));
    }

    #[test]
    fn derivation_does_not_mutate_the_parent() {
        let mut parent = IndexSet::new();
        parent.add(3);
        let child = IndexSet::with(&parent, 100);
        assert!(!parent.contains(100));
        assert!(child.contains(3));
        assert!(child.contains(100));
        assert_eq!(child.size(), 2);
    }

    #[test]
    fn equality_ignores_capacity() {
        let mut a = IndexSet::new();
        a.add(5);
        let mut b = IndexSet::new();
        b.add(5);
        b.add(200);
        // force b to have more words, then compare against a logically equal set
        let mut c = IndexSet::new();
        c.add(200);
        c.add(5);
        assert_eq!(b, c);
        assert_ne!(a, b);

        let mut grown = IndexSet::new();
        grown.add(300); // allocate far out
        let mut shrunk_equal = IndexSet::new();
        shrunk_equal.add(300);
        assert_eq!(grown, shrunk_equal);
    }

    #[test]
    fn sets_with_different_members_are_unequal() {
        let mut a = IndexSet::new();
        a.add(1);
        let b = IndexSet::with(&a, 200);
        assert_ne!(a, b);
        assert_ne!(b, a);
    }

    #[test]
    fn iteration_is_sorted() {
        let mut s = IndexSet::new();
        s.add(64);
        s.add(1);
        s.add(130);
        let v: Vec<usize> = s.iter().collect();
        assert_eq!(v, vec![1, 64, 130]);
    }

    #[test]
    fn display_lists_members() {
        let mut s = IndexSet::new();
        s.add(2);
        s.add(0);
        assert_eq!(format!("{}", s), "{0, 2}");
        assert_eq!(format!("{}", IndexSet::new()), "{}");
    }
}
