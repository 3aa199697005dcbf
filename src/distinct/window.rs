//! Bounded-memory deduplication over a sliding window

use std::collections::{HashSet, VecDeque};
use std::time::{Duration, Instant};

use crate::observability::{log_event_with_fields, Event};
use crate::results::{BoxedResults, Results, ResultsError, ResultsResult};
use crate::solution::{Solution, VarNames};

/// Window size used when none is configured
pub const DEFAULT_WINDOW_SIZE: usize = 250_000;

/// Drops solutions equal to one of the last `window_size` novel solutions
///
/// Memory stays bounded on unbounded sources, at the price of exactness: a
/// duplicate of a solution that has left the window is yielded again. The
/// first eviction is logged once per instance.
pub struct WindowDistinctResults {
    vars: VarNames,
    source: BoxedResults,
    window: VecDeque<Solution>,
    members: HashSet<Solution>,
    window_size: usize,
    pending: Option<Solution>,
    evictions: u64,
    warned: bool,
    closed: bool,
}

impl WindowDistinctResults {
    pub fn new(source: BoxedResults) -> Self {
        Self::with_window(source, DEFAULT_WINDOW_SIZE)
    }

    pub fn with_window(source: BoxedResults, window_size: usize) -> Self {
        Self {
            vars: source.var_names().clone(),
            source,
            window: VecDeque::new(),
            members: HashSet::new(),
            window_size: window_size.max(1),
            pending: None,
            evictions: 0,
            warned: false,
            closed: false,
        }
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    fn admit(&mut self, solution: &Solution) -> bool {
        if self.members.contains(solution) {
            return false;
        }
        self.members.insert(solution.clone());
        self.window.push_back(solution.clone());

        if self.window.len() > self.window_size {
            if let Some(oldest) = self.window.pop_front() {
                self.members.remove(&oldest);
                self.evictions += 1;
            }
            if !self.warned {
                self.warned = true;
                log_event_with_fields(
                    Event::WindowEviction,
                    &[("window_size", &self.window_size.to_string())],
                );
            }
        }
        true
    }

    fn fill(&mut self, deadline: Option<Instant>) -> ResultsResult<bool> {
        if self.pending.is_some() {
            return Ok(true);
        }
        while !self.closed {
            let ready = match deadline {
                Some(d) => self
                    .source
                    .has_next_timeout(d.saturating_duration_since(Instant::now()))?,
                None => self.source.has_next()?,
            };
            if !ready {
                return Ok(false);
            }
            let solution = self.source.next()?;
            if self.admit(&solution) {
                self.pending = Some(solution);
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl Results for WindowDistinctResults {
    fn var_names(&self) -> &VarNames {
        &self.vars
    }

    fn has_next(&mut self) -> ResultsResult<bool> {
        self.fill(None)
    }

    fn has_next_timeout(&mut self, timeout: Duration) -> ResultsResult<bool> {
        self.fill(Some(Instant::now() + timeout))
    }

    fn next(&mut self) -> ResultsResult<Solution> {
        if !self.fill(None)? {
            return Err(ResultsError::EmptyStream);
        }
        self.pending.take().ok_or(ResultsError::EmptyStream)
    }

    fn ready_count(&self) -> usize {
        usize::from(self.pending.is_some()) + self.source.ready_count()
    }

    fn is_async(&self) -> bool {
        self.source.is_async()
    }

    fn waits_on_producers(&self) -> bool {
        self.source.waits_on_producers()
    }

    fn is_ordered(&self) -> bool {
        self.source.is_ordered()
    }

    /// Exact only within the window
    fn is_distinct(&self) -> bool {
        true
    }

    fn close(&mut self) -> ResultsResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.pending = None;
        self.window.clear();
        self.members.clear();
        self.source.close()
    }
}
