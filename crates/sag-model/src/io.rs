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

//! # CSV Ingestion
//!
//! Parsers for the three input formats of the command-line tool. All three
//! share the same shape: one header row (skipped unparsed), then one record
//! per line with comma-separated fields. Whitespace around fields is
//! ignored, as are extra trailing columns. Empty lines are skipped.
//!
//! - job sets: `task_id, job_id, r_min, r_max, c_min, c_max, deadline, priority`
//! - precedence DAGs: `from_task, from_job, to_task, to_job`
//! - abort actions: `task, job, trig_min, trig_max, cleanup_min, cleanup_max`

use crate::abort::AbortAction;
use crate::err::ParseError;
use crate::job::{Job, JobId};
use crate::precedence::PrecedenceConstraint;
use sag_core::{Interval, Time};
use std::io::BufRead;
use std::str::FromStr;

fn fields(line: &str) -> impl Iterator<Item = &str> {
    line.split(',').map(str::trim)
}

fn parse_field<F: FromStr>(field: Option<&str>, line_no: usize) -> Result<F, ParseError> {
    field
        .filter(|f| !f.is_empty())
        .and_then(|f| f.parse().ok())
        .ok_or(ParseError::at_line(line_no))
}

/// Lines of `r`, numbered from one, with the header row and blank lines
/// dropped.
fn records(r: impl BufRead) -> impl Iterator<Item = (usize, Result<String, std::io::Error>)> {
    r.lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l))
        .skip(1)
        .filter(|(_, l)| l.as_ref().map(|l| !l.trim().is_empty()).unwrap_or(true))
}

/// Parses a job-set file.
pub fn parse_job_file<T: Time>(r: impl BufRead) -> Result<Vec<Job<T>>, ParseError> {
    let mut jobs = Vec::new();
    for (line_no, line) in records(r) {
        let line = line.map_err(|_| ParseError::at_line(line_no))?;
        let mut f = fields(&line);
        let tid: u64 = parse_field(f.next(), line_no)?;
        let jid: u64 = parse_field(f.next(), line_no)?;
        let arr_min: T = parse_field(f.next(), line_no)?;
        let arr_max: T = parse_field(f.next(), line_no)?;
        let cost_min: T = parse_field(f.next(), line_no)?;
        let cost_max: T = parse_field(f.next(), line_no)?;
        let deadline: T = parse_field(f.next(), line_no)?;
        let priority: T = parse_field(f.next(), line_no)?;
        jobs.push(Job::new(
            tid,
            jid,
            Interval::new(arr_min, arr_max),
            Interval::new(cost_min, cost_max),
            deadline,
            priority,
        ));
    }
    Ok(jobs)
}

/// Parses a precedence-DAG file.
pub fn parse_precedence_file(r: impl BufRead) -> Result<Vec<PrecedenceConstraint>, ParseError> {
    let mut edges = Vec::new();
    for (line_no, line) in records(r) {
        let line = line.map_err(|_| ParseError::at_line(line_no))?;
        let mut f = fields(&line);
        let from_task: u64 = parse_field(f.next(), line_no)?;
        let from_job: u64 = parse_field(f.next(), line_no)?;
        let to_task: u64 = parse_field(f.next(), line_no)?;
        let to_job: u64 = parse_field(f.next(), line_no)?;
        edges.push(PrecedenceConstraint::new(
            JobId::new(from_task, from_job),
            JobId::new(to_task, to_job),
        ));
    }
    Ok(edges)
}

/// Parses an abort-actions file.
pub fn parse_abort_file<T: Time>(r: impl BufRead) -> Result<Vec<AbortAction<T>>, ParseError> {
    let mut actions = Vec::new();
    for (line_no, line) in records(r) {
        let line = line.map_err(|_| ParseError::at_line(line_no))?;
        let mut f = fields(&line);
        let tid: u64 = parse_field(f.next(), line_no)?;
        let jid: u64 = parse_field(f.next(), line_no)?;
        let trig_min: T = parse_field(f.next(), line_no)?;
        let trig_max: T = parse_field(f.next(), line_no)?;
        let cleanup_min: T = parse_field(f.next(), line_no)?;
        let cleanup_max: T = parse_field(f.next(), line_no)?;
        actions.push(AbortAction::new(
            JobId::new(tid, jid),
            Interval::new(trig_min, trig_max),
            Interval::new(cleanup_min, cleanup_max),
        ));
    }
    Ok(actions)
}
