//! Shared sources for integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use fedstream::results::{Results, ResultsError, ResultsResult};
use fedstream::solution::{Solution, Term, VarNames};

pub fn vars(names: &[&str]) -> VarNames {
    VarNames::new(names.iter().copied()).unwrap()
}

/// `{name = n}` for each `n`
pub fn ints(name: &str, values: &[i64]) -> Vec<Solution> {
    let vars = vars(&[name]);
    values
        .iter()
        .map(|n| Solution::new(vars.clone(), vec![Some(Term::from(*n))]).unwrap())
        .collect()
}

/// Integer bound to `name`, if any
pub fn int_of(solution: &Solution, name: &str) -> Option<i64> {
    solution.get(name).and_then(|term| term.lexical().parse().ok())
}

/// Counters shared between a test and the sources it hands out
#[derive(Clone, Default)]
pub struct Probe {
    pub pulls: Arc<AtomicUsize>,
    pub closes: Arc<AtomicUsize>,
}

impl Probe {
    pub fn pulls(&self) -> usize {
        self.pulls.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

/// Remote-like source: optional per-pull latency, optional failure
pub struct TrackedSource {
    vars: VarNames,
    items: std::vec::IntoIter<Solution>,
    pending: Option<Solution>,
    delay: Option<Duration>,
    fail_after: Option<usize>,
    panic_after: Option<usize>,
    served: usize,
    probe: Probe,
}

impl TrackedSource {
    pub fn new(vars: VarNames, items: Vec<Solution>, probe: &Probe) -> Self {
        Self {
            vars,
            items: items.into_iter(),
            pending: None,
            delay: None,
            fail_after: None,
            panic_after: None,
            served: 0,
            probe: probe.clone(),
        }
    }

    pub fn ints(name: &str, values: &[i64], probe: &Probe) -> Self {
        Self::new(vars(&[name]), ints(name, values), probe)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn failing_after(mut self, n: usize) -> Self {
        self.fail_after = Some(n);
        self
    }

    /// Panics inside `has_next` once `n` solutions were served
    pub fn panicking_after(mut self, n: usize) -> Self {
        self.panic_after = Some(n);
        self
    }
}

impl Results for TrackedSource {
    fn var_names(&self) -> &VarNames {
        &self.vars
    }

    fn has_next(&mut self) -> ResultsResult<bool> {
        if self.pending.is_some() {
            return Ok(true);
        }
        if self.fail_after == Some(self.served) {
            return Err(ResultsError::Source("remote endpoint failed".into()));
        }
        if self.panic_after == Some(self.served) {
            panic!("remote client crashed");
        }
        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }
        self.pending = self.items.next();
        if self.pending.is_some() {
            self.probe.pulls.fetch_add(1, Ordering::SeqCst);
        }
        Ok(self.pending.is_some())
    }

    fn next(&mut self) -> ResultsResult<Solution> {
        if !self.has_next()? {
            return Err(ResultsError::EmptyStream);
        }
        self.served += 1;
        self.pending.take().ok_or(ResultsError::EmptyStream)
    }

    fn close(&mut self) -> ResultsResult<()> {
        self.probe.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
