//! Exact, unbounded deduplication

use std::collections::HashSet;
use std::time::{Duration, Instant};

use crate::buffer::ReplayMode;
use crate::results::{BoxedResults, Results, ResettableResults, ResultsError, ResultsResult};
use crate::solution::{Solution, VarNames};

/// Yields each distinct solution of its source once, in first-seen order
///
/// Remembers every solution it has yielded. After the source is drained,
/// `reset` replays the unique set without pulling the source again, which
/// makes this the repeatable inner loop of a cartesian product.
pub struct HashDistinctResults {
    vars: VarNames,
    seen: HashSet<Solution>,
    mode: ReplayMode,
    pending: Option<Solution>,
}

impl HashDistinctResults {
    pub fn new(source: BoxedResults) -> Self {
        Self {
            vars: source.var_names().clone(),
            seen: HashSet::new(),
            mode: ReplayMode::live(source),
            pending: None,
        }
    }

    /// Unique solutions found so far
    pub fn unique_count(&self) -> usize {
        self.mode.recorded_len()
    }

    /// Skipping duplicates never extends `deadline`
    fn fill(&mut self, deadline: Option<Instant>) -> ResultsResult<bool> {
        if self.pending.is_some() {
            return Ok(true);
        }
        match &mut self.mode {
            ReplayMode::Live {
                source,
                recorded,
                exhausted,
            } => loop {
                if *exhausted {
                    return Ok(false);
                }
                let ready = match deadline {
                    Some(d) => source.has_next_timeout(d.saturating_duration_since(Instant::now()))?,
                    None => source.has_next()?,
                };
                if !ready {
                    if deadline.is_none() || !source.is_async() {
                        *exhausted = true;
                    }
                    return Ok(false);
                }
                let solution = source.next()?;
                if self.seen.insert(solution.clone()) {
                    recorded.push(solution.clone());
                    self.pending = Some(solution);
                    return Ok(true);
                }
            },
            ReplayMode::Replaying { replay, .. } => {
                if replay.has_next()? {
                    self.pending = Some(replay.next()?);
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
            ReplayMode::Closed => Ok(false),
        }
    }
}

impl Results for HashDistinctResults {
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
        usize::from(self.pending.is_some()) + self.mode.ready_count()
    }

    fn waits_on_producers(&self) -> bool {
        self.mode.waits_on_producers()
    }

    fn is_distinct(&self) -> bool {
        true
    }

    fn close(&mut self) -> ResultsResult<()> {
        self.pending = None;
        self.mode.close()
    }
}

impl ResettableResults for HashDistinctResults {
    fn reset(&mut self, close_source: bool) -> ResultsResult<()> {
        let was_live = self.mode.is_live();
        self.mode.reset(&self.vars, close_source, true)?;
        self.pending = None;
        if was_live {
            // The replay list is already unique.
            self.seen = HashSet::new();
        }
        Ok(())
    }
}
