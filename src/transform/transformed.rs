//! Per-solution mapping

use std::time::Duration;

use crate::results::{BoxedResults, Results, ResultsResult};
use crate::solution::{Solution, SolutionError, VarNames};

/// A pure mapping from one solution to another
pub type SolutionMapper = Box<dyn Fn(&Solution) -> Solution + Send>;

/// Applies a function to each solution of its source
///
/// The function's output must carry exactly the declared variables; a
/// solution that does not is reported as `InvalidShape`.
pub struct TransformedResults {
    vars: VarNames,
    source: BoxedResults,
    map: SolutionMapper,
    closed: bool,
}

impl TransformedResults {
    pub fn new<F>(source: BoxedResults, vars: VarNames, map: F) -> Self
    where
        F: Fn(&Solution) -> Solution + Send + 'static,
    {
        Self {
            vars,
            source,
            map: Box::new(map),
            closed: false,
        }
    }
}

impl Results for TransformedResults {
    fn var_names(&self) -> &VarNames {
        &self.vars
    }

    fn has_next(&mut self) -> ResultsResult<bool> {
        self.source.has_next()
    }

    fn has_next_timeout(&mut self, timeout: Duration) -> ResultsResult<bool> {
        self.source.has_next_timeout(timeout)
    }

    fn next(&mut self) -> ResultsResult<Solution> {
        let mapped = (self.map)(&self.source.next()?);
        if !mapped.var_names().same_set(&self.vars) {
            return Err(SolutionError::VariableMismatch {
                expected: self.vars.to_string(),
                actual: mapped.var_names().to_string(),
            }
            .into());
        }
        Ok(mapped)
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

    fn close(&mut self) -> ResultsResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.source.close()
    }
}
