//! Results: the pull-based solution stream contract
//!
//! Every operator of an execution tree is a `Results`. Leaves wrap sources;
//! inner nodes wrap their children. The caller pulls the root with
//! `has_next()`/`next()` and always finishes with `close()`, which releases
//! the whole tree.
//!
//! # Invariants
//!
//! - The variable names of a stream never change
//! - `next()` only succeeds while a solution is pending
//! - A stream reporting `is_distinct()` never yields two equal solutions
//! - `close()` is idempotent and reaches every child

mod close;
mod collection;
mod errors;
mod iter;
mod results;
#[cfg(test)]
pub(crate) mod test_support;

pub use close::CloseErrors;
pub use collection::CollectionResults;
pub use errors::{ResultsError, ResultsResult};
pub use iter::{drain, ResultsIter};
pub use results::{BoxedResettable, BoxedResults, ResettableResults, Results};
