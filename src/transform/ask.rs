//! Existence check

use crate::results::{BoxedResults, Results, ResultsError, ResultsResult};
use crate::solution::{Solution, VarNames};

/// Yields one empty solution if its source has any solution, else nothing
///
/// The source is pulled at most once.
pub struct AskResults {
    vars: VarNames,
    source: BoxedResults,
    answer: Option<bool>,
    delivered: bool,
    closed: bool,
}

impl AskResults {
    pub fn new(source: BoxedResults) -> Self {
        Self {
            vars: VarNames::empty(),
            source,
            answer: None,
            delivered: false,
            closed: false,
        }
    }

    fn answer(&mut self) -> ResultsResult<bool> {
        if let Some(answer) = self.answer {
            return Ok(answer);
        }
        let answer = self.source.has_next()?;
        self.answer = Some(answer);
        Ok(answer)
    }
}

impl Results for AskResults {
    fn var_names(&self) -> &VarNames {
        &self.vars
    }

    fn has_next(&mut self) -> ResultsResult<bool> {
        if self.delivered {
            return Ok(false);
        }
        self.answer()
    }

    fn next(&mut self) -> ResultsResult<Solution> {
        if !self.has_next()? {
            return Err(ResultsError::EmptyStream);
        }
        self.delivered = true;
        Ok(Solution::empty())
    }

    fn ready_count(&self) -> usize {
        usize::from(self.answer == Some(true) && !self.delivered)
    }

    fn waits_on_producers(&self) -> bool {
        self.source.waits_on_producers()
    }

    fn is_ordered(&self) -> bool {
        true
    }

    fn is_distinct(&self) -> bool {
        true
    }

    fn close(&mut self) -> ResultsResult<()> {
        self.delivered = true;
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.source.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::drain;
    use crate::results::test_support::ScriptedResults;
    use std::sync::atomic::Ordering;

    #[test]
    fn test_non_empty_source_yields_one_empty_solution() {
        let source = ScriptedResults::ints("x", &[1, 2, 3]);
        let pulled = source.pulled();
        let mut r = AskResults::new(Box::new(source));

        assert_eq!(drain(&mut r).unwrap(), vec![Solution::empty()]);
        assert_eq!(pulled.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_empty_source_yields_nothing() {
        let mut r = AskResults::new(Box::new(ScriptedResults::ints("x", &[])));
        assert!(drain(&mut r).unwrap().is_empty());
        assert!(r.var_names().is_empty());
    }
}
