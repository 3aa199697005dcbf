//! Transparent recording buffer

use std::time::Duration;

use crate::results::{BoxedResults, Results, ResettableResults, ResultsResult};
use crate::solution::{Solution, VarNames};

use super::replay::ReplayMode;

/// Passes its source through unchanged while recording every solution
///
/// Once the source is drained, `reset` replays the recording without
/// touching the source again. Resetting earlier would replay a truncated
/// stream and fails with `IncompleteReplay`.
pub struct ListBufferedResults {
    vars: VarNames,
    mode: ReplayMode,
    ordered: bool,
    distinct: bool,
}

impl ListBufferedResults {
    pub fn new(source: BoxedResults) -> Self {
        Self {
            vars: source.var_names().clone(),
            ordered: source.is_ordered(),
            distinct: source.is_distinct(),
            mode: ReplayMode::live(source),
        }
    }

    /// True until the first successful reset
    pub fn is_live(&self) -> bool {
        self.mode.is_live()
    }

    pub fn recorded_len(&self) -> usize {
        self.mode.recorded_len()
    }
}

impl Results for ListBufferedResults {
    fn var_names(&self) -> &VarNames {
        &self.vars
    }

    fn has_next(&mut self) -> ResultsResult<bool> {
        self.mode.has_next(None)
    }

    fn has_next_timeout(&mut self, timeout: Duration) -> ResultsResult<bool> {
        self.mode.has_next(Some(timeout))
    }

    fn next(&mut self) -> ResultsResult<Solution> {
        self.mode.next_recorded()
    }

    fn ready_count(&self) -> usize {
        self.mode.ready_count()
    }

    fn waits_on_producers(&self) -> bool {
        self.mode.waits_on_producers()
    }

    fn is_ordered(&self) -> bool {
        self.ordered
    }

    fn is_distinct(&self) -> bool {
        self.distinct
    }

    fn close(&mut self) -> ResultsResult<()> {
        self.mode.close()
    }
}

impl ResettableResults for ListBufferedResults {
    fn reset(&mut self, close_source: bool) -> ResultsResult<()> {
        self.mode.reset(&self.vars, close_source, true)
    }
}
