//! Correlated expansion: one inner stream per outer solution

use std::mem;

use crate::results::{BoxedResults, CloseErrors, Results, ResultsError, ResultsResult};
use crate::solution::{Solution, VarNames};

/// Derives the inner stream for one outer solution
pub type InnerFactory = Box<dyn FnMut(&Solution) -> ResultsResult<BoxedResults> + Send>;

/// For each outer solution, drains the stream derived from it
///
/// An inner stream is closed as soon as it is drained, before the next
/// outer solution is pulled. Close failures of drained inner streams are
/// kept and reported by `close()` together with those of the outer
/// source.
pub struct FlatMapResults {
    vars: VarNames,
    outer: BoxedResults,
    inner: Option<BoxedResults>,
    derive: InnerFactory,
    close_errors: CloseErrors,
    closed: bool,
}

impl FlatMapResults {
    pub fn new<F>(outer: BoxedResults, vars: VarNames, derive: F) -> Self
    where
        F: FnMut(&Solution) -> ResultsResult<BoxedResults> + Send + 'static,
    {
        Self {
            vars,
            outer,
            inner: None,
            derive: Box::new(derive),
            close_errors: CloseErrors::new(),
            closed: false,
        }
    }
}

impl Results for FlatMapResults {
    fn var_names(&self) -> &VarNames {
        &self.vars
    }

    fn has_next(&mut self) -> ResultsResult<bool> {
        while !self.closed {
            if let Some(inner) = self.inner.as_mut() {
                if inner.has_next()? {
                    return Ok(true);
                }
                if let Some(mut drained) = self.inner.take() {
                    self.close_errors.close(&mut drained);
                }
            }
            if !self.outer.has_next()? {
                return Ok(false);
            }
            let solution = self.outer.next()?;
            self.inner = Some((self.derive)(&solution)?);
        }
        Ok(false)
    }

    fn next(&mut self) -> ResultsResult<Solution> {
        if !self.has_next()? {
            return Err(ResultsError::EmptyStream);
        }
        match self.inner.as_mut() {
            Some(inner) => inner.next(),
            None => Err(ResultsError::EmptyStream),
        }
    }

    fn ready_count(&self) -> usize {
        self.inner.as_ref().map_or(0, |inner| inner.ready_count())
    }

    fn waits_on_producers(&self) -> bool {
        self.outer.waits_on_producers()
            || self.inner.as_ref().is_some_and(|inner| inner.waits_on_producers())
    }

    fn is_ordered(&self) -> bool {
        self.outer.is_ordered()
    }

    fn close(&mut self) -> ResultsResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        let mut errors = mem::take(&mut self.close_errors);
        if let Some(mut inner) = self.inner.take() {
            errors.close(&mut inner);
        }
        errors.close(&mut self.outer);
        errors.into_result()
    }
}
