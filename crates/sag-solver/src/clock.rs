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

use std::time::{Duration, Instant};

/// Start/stop accumulator for the analysis time budget.
///
/// Reading the clock while it is running includes the currently elapsed
/// span, which is what the cooperative timeout checks rely on.
#[derive(Debug, Clone, Default)]
pub struct AnalysisClock {
    accumulated: Duration,
    started: Option<Instant>,
}

impl AnalysisClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.started = Some(Instant::now());
    }

    /// Stops the clock and returns the span of the last run in seconds.
    pub fn stop(&mut self) -> f64 {
        match self.started.take() {
            Some(at) => {
                let delta = at.elapsed();
                self.accumulated += delta;
                delta.as_secs_f64()
            }
            None => 0.0,
        }
    }

    /// Total accumulated seconds, including a still-running span.
    pub fn seconds(&self) -> f64 {
        let running = self
            .started
            .map(|at| at.elapsed())
            .unwrap_or(Duration::ZERO);
        (self.accumulated + running).as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_clock_reads_zero() {
        let c = AnalysisClock::new();
        assert_eq!(c.seconds(), 0.0);
    }

    #[test]
    fn stop_without_start_is_zero() {
        let mut c = AnalysisClock::new();
        assert_eq!(c.stop(), 0.0);
    }

    #[test]
    fn accumulates_across_runs() {
        let mut c = AnalysisClock::new();
        c.start();
        let first = c.stop();
        c.start();
        let second = c.stop();
        assert!(c.seconds() >= first + second - 1e-9);
    }

    #[test]
    fn running_clock_is_monotone() {
        let mut c = AnalysisClock::new();
        c.start();
        let a = c.seconds();
        let b = c.seconds();
        assert!(b >= a);
    }
}
