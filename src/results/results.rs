//! The pull-based results contract
//!
//! A stream moves through these states:
//!
//! ```text
//! fresh --has_next()--> pending --next()--> fresh ... --> exhausted
//!   \____________________ close() (from any state) ____________> closed
//! ```
//!
//! - `has_next()` may block; repeated calls without `next()` are idempotent
//! - `has_next_timeout()` returning false means "nothing yet", not "exhausted"
//! - `next()` consumes the pending solution, or fails with `EmptyStream`
//! - `close()` may be called any number of times and closes every child

use std::time::Duration;

use crate::solution::{Solution, VarNames};

use super::errors::ResultsResult;

/// A stateful, pull-based stream of solutions
///
/// `Send` so that streams can be moved onto producer threads by the
/// buffered executor. A stream itself is only ever driven by one thread
/// at a time.
pub trait Results: Send {
    /// Variable names of every solution this stream yields; fixed for life
    fn var_names(&self) -> &VarNames;

    /// Returns true once a solution is pending, false when exhausted
    fn has_next(&mut self) -> ResultsResult<bool>;

    /// Bounded wait for a pending solution
    ///
    /// Synchronous streams cannot be interrupted mid-pull and ignore the
    /// timeout.
    fn has_next_timeout(&mut self, timeout: Duration) -> ResultsResult<bool> {
        let _ = timeout;
        self.has_next()
    }

    /// Takes the pending solution
    fn next(&mut self) -> ResultsResult<Solution>;

    /// Hint of how many solutions can be taken without blocking
    fn ready_count(&self) -> usize {
        0
    }

    /// True if the stream produces in the background
    fn is_async(&self) -> bool {
        false
    }

    /// True if a pull may wait on producers running on a worker pool
    ///
    /// Holds for a buffered merge and for anything still reading one. A
    /// pool worker pulling such a stream has to tell the pool it blocks.
    fn waits_on_producers(&self) -> bool {
        self.is_async()
    }

    /// True if the stream defines a deterministic relative order
    fn is_ordered(&self) -> bool {
        false
    }

    /// True if the stream never yields two equal solutions
    fn is_distinct(&self) -> bool {
        false
    }

    /// Releases the stream and all of its children
    fn close(&mut self) -> ResultsResult<()>;
}

/// A stream that can be rewound over what it has already delivered
///
/// After `reset`, reads start again from the first recorded solution
/// without pulling the original source. With `close_source`, the original
/// source is released at reset time instead of at `close()`.
pub trait ResettableResults: Results {
    fn reset(&mut self, close_source: bool) -> ResultsResult<()>;
}

/// Any results stream, boxed for heterogeneous operator trees
pub type BoxedResults = Box<dyn Results>;

/// A resettable stream, boxed
pub type BoxedResettable = Box<dyn ResettableResults>;

impl<R: Results + ?Sized> Results for Box<R> {
    fn var_names(&self) -> &VarNames {
        (**self).var_names()
    }

    fn has_next(&mut self) -> ResultsResult<bool> {
        (**self).has_next()
    }

    fn has_next_timeout(&mut self, timeout: Duration) -> ResultsResult<bool> {
        (**self).has_next_timeout(timeout)
    }

    fn next(&mut self) -> ResultsResult<Solution> {
        (**self).next()
    }

    fn ready_count(&self) -> usize {
        (**self).ready_count()
    }

    fn is_async(&self) -> bool {
        (**self).is_async()
    }

    fn waits_on_producers(&self) -> bool {
        (**self).waits_on_producers()
    }

    fn is_ordered(&self) -> bool {
        (**self).is_ordered()
    }

    fn is_distinct(&self) -> bool {
        (**self).is_distinct()
    }

    fn close(&mut self) -> ResultsResult<()> {
        (**self).close()
    }
}

impl<R: ResettableResults + ?Sized> ResettableResults for Box<R> {
    fn reset(&mut self, close_source: bool) -> ResultsResult<()> {
        (**self).reset(close_source)
    }
}
