//! Scripted sources for unit tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::solution::{Solution, Term, VarNames};

use super::errors::{ResultsError, ResultsResult};
use super::results::Results;

/// Single-variable solutions `{name = n}` for each `n`
pub fn ints(name: &str, values: &[i64]) -> Vec<Solution> {
    let vars = VarNames::new([name]).unwrap();
    values
        .iter()
        .map(|n| Solution::new(vars.clone(), vec![Some(Term::from(*n))]).unwrap())
        .collect()
}

/// A source that yields fixed items, can fail, and counts pulls and closes
pub struct ScriptedResults {
    vars: VarNames,
    items: std::vec::IntoIter<Solution>,
    pending: Option<Solution>,
    fail_after: Option<usize>,
    panic_after: Option<usize>,
    fail_close: bool,
    delay: Option<Duration>,
    pulled: Arc<AtomicUsize>,
    closes: Arc<AtomicUsize>,
    distinct: bool,
    asynchronous: bool,
}

impl ScriptedResults {
    pub fn new(vars: VarNames, items: Vec<Solution>) -> Self {
        Self {
            vars,
            items: items.into_iter(),
            pending: None,
            fail_after: None,
            panic_after: None,
            fail_close: false,
            delay: None,
            pulled: Arc::new(AtomicUsize::new(0)),
            closes: Arc::new(AtomicUsize::new(0)),
            distinct: false,
            asynchronous: false,
        }
    }

    pub fn ints(name: &str, values: &[i64]) -> Self {
        Self::new(VarNames::new([name]).unwrap(), ints(name, values))
    }

    /// Fail the pull after `n` successful ones
    pub fn failing_after(mut self, n: usize) -> Self {
        self.fail_after = Some(n);
        self
    }

    /// Panic inside `has_next` after `n` successful pulls
    pub fn panicking_after(mut self, n: usize) -> Self {
        self.panic_after = Some(n);
        self
    }

    pub fn failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Report as asynchronous: a timed wait shorter than the delay gives
    /// up after the timeout without pulling
    pub fn asynchronous(mut self) -> Self {
        self.asynchronous = true;
        self
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Counter of solutions pulled from the script
    pub fn pulled(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.pulled)
    }

    /// Counter of close() calls
    pub fn closes(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.closes)
    }
}

impl Results for ScriptedResults {
    fn var_names(&self) -> &VarNames {
        &self.vars
    }

    fn has_next(&mut self) -> ResultsResult<bool> {
        if self.pending.is_some() {
            return Ok(true);
        }
        let pulled = self.pulled.load(Ordering::SeqCst);
        if self.fail_after == Some(pulled) {
            return Err(ResultsError::Source(format!("scripted failure after {}", pulled)));
        }
        if self.panic_after == Some(pulled) {
            panic!("scripted panic after {}", pulled);
        }
        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }
        self.pending = self.items.next();
        if self.pending.is_some() {
            self.pulled.fetch_add(1, Ordering::SeqCst);
        }
        Ok(self.pending.is_some())
    }

    fn has_next_timeout(&mut self, timeout: Duration) -> ResultsResult<bool> {
        if !self.asynchronous || self.pending.is_some() {
            return self.has_next();
        }
        match self.delay {
            Some(delay) if delay > timeout => {
                thread::sleep(timeout);
                Ok(false)
            }
            _ => self.has_next(),
        }
    }

    fn next(&mut self) -> ResultsResult<Solution> {
        self.has_next()?;
        self.pending.take().ok_or(ResultsError::EmptyStream)
    }

    fn ready_count(&self) -> usize {
        usize::from(self.pending.is_some())
    }

    fn is_async(&self) -> bool {
        self.asynchronous
    }

    fn is_distinct(&self) -> bool {
        self.distinct
    }

    fn close(&mut self) -> ResultsResult<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        if self.fail_close {
            return Err(ResultsError::Close("scripted close failure".into()));
        }
        Ok(())
    }
}
