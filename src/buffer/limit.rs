//! Bounded pass-through with replay

use std::time::Duration;

use crate::results::{BoxedResults, Results, ResettableResults, ResultsError, ResultsResult};
use crate::solution::{Solution, VarNames};

use super::replay::ReplayMode;

/// Yields at most `limit` solutions of its source, recording them
///
/// The source is never pulled past the limit. `reset` replays the recorded
/// solutions (at most `limit` of them) without touching the source again.
pub struct LimitResults {
    vars: VarNames,
    limit: usize,
    mode: ReplayMode,
    distinct: bool,
}

impl LimitResults {
    pub fn new(source: BoxedResults, limit: usize) -> Self {
        Self {
            vars: source.var_names().clone(),
            distinct: source.is_distinct(),
            mode: ReplayMode::live(source),
            limit,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    fn reached(&self) -> bool {
        self.mode.is_live() && self.mode.recorded_len() >= self.limit
    }
}

impl Results for LimitResults {
    fn var_names(&self) -> &VarNames {
        &self.vars
    }

    fn has_next(&mut self) -> ResultsResult<bool> {
        if self.reached() {
            return Ok(false);
        }
        self.mode.has_next(None)
    }

    fn has_next_timeout(&mut self, timeout: Duration) -> ResultsResult<bool> {
        if self.reached() {
            return Ok(false);
        }
        self.mode.has_next(Some(timeout))
    }

    fn next(&mut self) -> ResultsResult<Solution> {
        if self.reached() {
            return Err(ResultsError::EmptyStream);
        }
        self.mode.next_recorded()
    }

    fn ready_count(&self) -> usize {
        if self.mode.is_live() {
            let remaining = self.limit.saturating_sub(self.mode.recorded_len());
            self.mode.ready_count().min(remaining)
        } else {
            self.mode.ready_count()
        }
    }

    fn waits_on_producers(&self) -> bool {
        self.mode.waits_on_producers()
    }

    fn is_ordered(&self) -> bool {
        true
    }

    fn is_distinct(&self) -> bool {
        self.distinct
    }

    fn close(&mut self) -> ResultsResult<()> {
        self.mode.close()
    }
}

impl ResettableResults for LimitResults {
    fn reset(&mut self, close_source: bool) -> ResultsResult<()> {
        self.mode.reset(&self.vars, close_source, false)
    }
}
