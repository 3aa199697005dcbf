//! Iterator adapters over results streams

use crate::solution::Solution;

use super::close::CloseErrors;
use super::errors::ResultsResult;
use super::results::Results;

/// `Iterator` view of a results stream
///
/// Stops after the first error. Does not close the stream.
pub struct ResultsIter<'a, R: Results + ?Sized> {
    inner: &'a mut R,
    done: bool,
}

impl<'a, R: Results + ?Sized> ResultsIter<'a, R> {
    pub fn new(inner: &'a mut R) -> Self {
        Self { inner, done: false }
    }
}

impl<R: Results + ?Sized> Iterator for ResultsIter<'_, R> {
    type Item = ResultsResult<Solution>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.inner.has_next() {
            Ok(true) => {
                let item = self.inner.next();
                if item.is_err() {
                    self.done = true;
                }
                Some(item)
            }
            Ok(false) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

/// Pull `results` to exhaustion, then close it
///
/// The stream is closed on every exit path. A pull failure wins over a
/// close failure.
pub fn drain<R: Results + ?Sized>(results: &mut R) -> ResultsResult<Vec<Solution>> {
    let pulled: ResultsResult<Vec<Solution>> = ResultsIter::new(results).collect();

    let mut errors = CloseErrors::new();
    errors.close(results);
    let closed = errors.into_result();

    let items = pulled?;
    closed?;
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::CollectionResults;
    use crate::solution::{Term, VarNames};

    #[test]
    fn test_drain_collects_everything() {
        let vars = VarNames::new(["x"]).unwrap();
        let items: Vec<Solution> = (0..3)
            .map(|i| Solution::new(vars.clone(), vec![Some(Term::from(i))]).unwrap())
            .collect();
        let mut r = CollectionResults::new(vars, items.clone());

        assert_eq!(drain(&mut r).unwrap(), items);
        assert!(!r.has_next().unwrap());
    }

    #[test]
    fn test_iter_counts() {
        let mut r = CollectionResults::singleton(Solution::empty());
        assert_eq!(ResultsIter::new(&mut r).count(), 1);
    }
}
