//! Fan-in executors
//!
//! An executor merges K child streams with the same variable list into
//! one stream.
//!
//! # Strategies
//!
//! 1. Sequential: concatenation on the calling thread, deterministic order
//! 2. Buffered: one producer task per child on a worker pool, results
//!    delivered through a shared queue in arrival order
//!
//! # Invariants
//!
//! - The merged stream yields the multiset union of the children
//! - Every child is closed exactly once, whatever the exit path
//! - Buffered: at most `buffer_size` unconsumed solutions per child
//! - A timed-out wait is never reported as exhaustion
//! - A closed executor merges to an empty stream

mod buffered;
mod errors;
mod executor;
mod pool;
mod producer;
mod queue;
mod sequential;

pub use buffered::{BufferedResults, BufferedResultsExecutor};
pub use errors::{ExecutorError, ExecutorResult};
pub use executor::{FaultPolicy, ResultsExecutor};
pub use pool::{Job, WorkerPool};
pub use sequential::{SequentialResults, SequentialResultsExecutor};
