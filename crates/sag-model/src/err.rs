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

use crate::job::JobId;
use std::fmt::Display;

/// A problem description that fails validation before any engine runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemError {
    /// A precedence constraint refers to a job not in the job set.
    InvalidPrecedenceReference(JobId),
    /// An abort action refers to a missing job, or its trigger window starts
    /// before the referenced job's arrival window.
    InvalidAbortParameter(JobId),
}

impl Display for ProblemError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProblemError::InvalidPrecedenceReference(id) => {
                write!(f, "precedence constraint references unknown job {}", id)
            }
            ProblemError::InvalidAbortParameter(id) => {
                write!(f, "invalid abort parameters for job {}", id)
            }
        }
    }
}

impl std::error::Error for ProblemError {}

/// A malformed input file.
///
/// Carries the 1-based line number at which ingestion failed; the file name
/// is supplied by the caller, which knows where the bytes came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseError {
    line: usize,
}

impl ParseError {
    #[inline]
    pub fn at_line(line: usize) -> Self {
        ParseError { line }
    }

    #[inline]
    pub fn line(&self) -> usize {
        self.line
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "parse error in line {}", self.line)
    }
}

impl std::error::Error for ParseError {}
