//! Results over an in-memory list of solutions

use crate::solution::{Solution, VarNames};

use super::errors::{ResultsError, ResultsResult};
use super::results::{Results, ResettableResults};

/// Stream over an owned list; rewinding is free
///
/// Serves as replay buffer for the buffering combinators, as the one-shot
/// filler of empty optional cartesian dimensions, and as the leaf of
/// literal value tables.
#[derive(Debug)]
pub struct CollectionResults {
    vars: VarNames,
    items: Vec<Solution>,
    cursor: usize,
    ordered: bool,
    distinct: bool,
}

impl CollectionResults {
    /// An ordered, not necessarily distinct, stream over `items`
    pub fn new(vars: VarNames, items: Vec<Solution>) -> Self {
        Self {
            vars,
            items,
            cursor: 0,
            ordered: true,
            distinct: false,
        }
    }

    pub fn empty(vars: VarNames) -> Self {
        Self::new(vars, Vec::new()).with_distinct(true)
    }

    /// A stream yielding exactly `solution`
    pub fn singleton(solution: Solution) -> Self {
        let vars = solution.var_names().clone();
        Self::new(vars, vec![solution]).with_distinct(true)
    }

    /// Declare the items free of duplicates
    pub fn with_distinct(mut self, distinct: bool) -> Self {
        self.distinct = distinct;
        self
    }

    pub fn with_ordered(mut self, ordered: bool) -> Self {
        self.ordered = ordered;
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Results for CollectionResults {
    fn var_names(&self) -> &VarNames {
        &self.vars
    }

    fn has_next(&mut self) -> ResultsResult<bool> {
        Ok(self.cursor < self.items.len())
    }

    fn next(&mut self) -> ResultsResult<Solution> {
        let item = self
            .items
            .get(self.cursor)
            .cloned()
            .ok_or(ResultsError::EmptyStream)?;
        self.cursor += 1;
        Ok(item)
    }

    fn ready_count(&self) -> usize {
        self.items.len() - self.cursor
    }

    fn is_ordered(&self) -> bool {
        self.ordered
    }

    fn is_distinct(&self) -> bool {
        self.distinct
    }

    fn close(&mut self) -> ResultsResult<()> {
        self.cursor = self.items.len();
        Ok(())
    }
}

impl ResettableResults for CollectionResults {
    fn reset(&mut self, _close_source: bool) -> ResultsResult<()> {
        self.cursor = 0;
        Ok(())
    }
}
