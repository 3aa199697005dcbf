//! Projection onto a fixed variable order

use std::time::Duration;

use crate::results::{BoxedResults, Results, ResultsResult};
use crate::solution::{Solution, SolutionFactory, VarNames};

/// Re-expresses each solution of its source over `vars`
///
/// Variables of `vars` the source does not have come out unbound.
pub struct ProjectionResults {
    source: BoxedResults,
    factory: SolutionFactory,
    distinct: bool,
    closed: bool,
}

impl ProjectionResults {
    pub fn new(source: BoxedResults, vars: VarNames) -> Self {
        let input = source.var_names().clone();
        // Dropping variables can make distinct solutions equal.
        let distinct = source.is_distinct() && input.iter().all(|name| vars.contains(name));
        Self {
            factory: SolutionFactory::projection(input, vars),
            source,
            distinct,
            closed: false,
        }
    }
}

impl Results for ProjectionResults {
    fn var_names(&self) -> &VarNames {
        self.factory.output()
    }

    fn has_next(&mut self) -> ResultsResult<bool> {
        self.source.has_next()
    }

    fn has_next_timeout(&mut self, timeout: Duration) -> ResultsResult<bool> {
        self.source.has_next_timeout(timeout)
    }

    fn next(&mut self) -> ResultsResult<Solution> {
        let solution = self.source.next()?;
        Ok(self.factory.project(&solution))
    }

    fn ready_count(&self) -> usize {
        self.source.ready_count()
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

    fn is_distinct(&self) -> bool {
        self.distinct
    }

    fn close(&mut self) -> ResultsResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.source.close()
    }
}
