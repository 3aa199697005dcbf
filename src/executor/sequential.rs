//! Sequential fan-in
//!
//! Concatenates children strictly in order on the calling thread: the first
//! child is drained completely before the second is pulled. No threads, no
//! buffering, deterministic order.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::observability::{log_event_with_fields, Event};
use crate::results::{
    BoxedResults, CloseErrors, CollectionResults, Results, ResultsError, ResultsResult,
};
use crate::solution::{Solution, VarNames};

use super::executor::ResultsExecutor;

/// Concatenation of child streams
pub struct SequentialResults {
    vars: VarNames,
    children: Vec<BoxedResults>,
    current: usize,
    closed: bool,
}

impl SequentialResults {
    pub fn new(children: Vec<BoxedResults>, vars: VarNames) -> Self {
        Self {
            vars,
            children,
            current: 0,
            closed: false,
        }
    }

    /// Every child consulted in one call shares `deadline`
    fn advance(&mut self, deadline: Option<Instant>) -> ResultsResult<bool> {
        while !self.closed && self.current < self.children.len() {
            let child = &mut self.children[self.current];
            let ready = match deadline {
                Some(d) => child.has_next_timeout(d.saturating_duration_since(Instant::now()))?,
                None => child.has_next()?,
            };
            if ready {
                return Ok(true);
            }
            if deadline.is_some() && child.is_async() {
                // An async child that timed out is not necessarily exhausted.
                return Ok(false);
            }
            self.current += 1;
        }
        Ok(false)
    }
}

impl Results for SequentialResults {
    fn var_names(&self) -> &VarNames {
        &self.vars
    }

    fn has_next(&mut self) -> ResultsResult<bool> {
        self.advance(None)
    }

    fn has_next_timeout(&mut self, timeout: Duration) -> ResultsResult<bool> {
        self.advance(Some(Instant::now() + timeout))
    }

    fn next(&mut self) -> ResultsResult<Solution> {
        if !self.has_next()? {
            return Err(ResultsError::EmptyStream);
        }
        self.children[self.current].next()
    }

    fn ready_count(&self) -> usize {
        self.children
            .get(self.current)
            .map_or(0, |child| child.ready_count())
    }

    fn waits_on_producers(&self) -> bool {
        self.children
            .iter()
            .skip(self.current)
            .any(|child| child.waits_on_producers())
    }

    fn is_ordered(&self) -> bool {
        self.children.iter().all(|child| child.is_ordered())
    }

    fn is_distinct(&self) -> bool {
        self.children.len() == 1 && self.children[0].is_distinct()
    }

    fn close(&mut self) -> ResultsResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        let mut errors = CloseErrors::new();
        for child in &mut self.children {
            errors.close(child);
        }
        errors.into_result()
    }
}

/// Executor that merges by concatenation
#[derive(Debug, Default)]
pub struct SequentialResultsExecutor {
    closed: AtomicBool,
}

impl SequentialResultsExecutor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResultsExecutor for SequentialResultsExecutor {
    fn merge(
        &self,
        mut children: Vec<BoxedResults>,
        var_names: VarNames,
        _buffer_size: usize,
    ) -> BoxedResults {
        if self.is_closed() {
            log_event_with_fields(
                Event::ExecutorClosedMerge,
                &[("children", &children.len().to_string()), ("executor", "sequential")],
            );
            let mut errors = CloseErrors::new();
            for child in &mut children {
                errors.close(child);
            }
            let _ = errors.into_result();
            return Box::new(CollectionResults::empty(var_names));
        }
        match children.len() {
            0 => Box::new(CollectionResults::empty(var_names)),
            1 => children.remove(0),
            _ => Box::new(SequentialResults::new(children, var_names)),
        }
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }
}
