//! Predicate filtering with batched pulls

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::observability::{log_event_with_fields, Event};
use crate::results::{BoxedResults, Results, ResultsError, ResultsResult};
use crate::solution::{Solution, VarNames};

/// A boolean test over one solution
pub trait SolutionPredicate: Send {
    fn test(&self, solution: &Solution) -> bool;
}

impl<F> SolutionPredicate for F
where
    F: Fn(&Solution) -> bool + Send,
{
    fn test(&self, solution: &Solution) -> bool {
        self(solution)
    }
}

/// Yields the solutions of its source that pass every predicate
///
/// Pulls in batches sized to the source's ready count. A batch in which
/// nothing passes is followed by another one, so every `has_next` either
/// finds a solution or reaches the end of the source.
pub struct FilteredResults {
    source: BoxedResults,
    predicates: Vec<Box<dyn SolutionPredicate>>,
    passed: VecDeque<Solution>,
    included: u64,
    excluded: u64,
    exhausted: bool,
    closed: bool,
}

impl FilteredResults {
    pub fn new(source: BoxedResults, predicates: Vec<Box<dyn SolutionPredicate>>) -> Self {
        Self {
            source,
            predicates,
            passed: VecDeque::new(),
            included: 0,
            excluded: 0,
            exhausted: false,
            closed: false,
        }
    }

    /// Single-predicate convenience
    pub fn with_predicate<P: SolutionPredicate + 'static>(source: BoxedResults, predicate: P) -> Self {
        Self::new(source, vec![Box::new(predicate)])
    }

    pub fn included(&self) -> u64 {
        self.included
    }

    pub fn excluded(&self) -> u64 {
        self.excluded
    }

    fn accepts(&self, solution: &Solution) -> bool {
        self.predicates.iter().all(|p| p.test(solution))
    }

    /// Batches pulled in one call share `deadline`
    fn fill(&mut self, deadline: Option<Instant>) -> ResultsResult<bool> {
        while self.passed.is_empty() && !self.exhausted && !self.closed {
            let batch = self.source.ready_count().max(1);
            for _ in 0..batch {
                let ready = match deadline {
                    Some(d) => self
                        .source
                        .has_next_timeout(d.saturating_duration_since(Instant::now()))?,
                    None => self.source.has_next()?,
                };
                if !ready {
                    if deadline.is_some() && self.source.is_async() {
                        return Ok(!self.passed.is_empty());
                    }
                    self.exhausted = true;
                    break;
                }
                let solution = self.source.next()?;
                if self.accepts(&solution) {
                    self.included += 1;
                    self.passed.push_back(solution);
                } else {
                    self.excluded += 1;
                }
            }
        }
        Ok(!self.passed.is_empty())
    }
}

impl Results for FilteredResults {
    fn var_names(&self) -> &VarNames {
        self.source.var_names()
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
        self.passed.pop_front().ok_or(ResultsError::EmptyStream)
    }

    fn ready_count(&self) -> usize {
        self.passed.len()
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
        self.source.is_distinct()
    }

    fn close(&mut self) -> ResultsResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.passed.clear();
        log_event_with_fields(
            Event::FilterStats,
            &[
                ("excluded", &self.excluded.to_string()),
                ("included", &self.included.to_string()),
            ],
        );
        self.source.close()
    }
}
