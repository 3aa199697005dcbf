//! The fan-in executor contract
//!
//! An executor merges several child streams into one. The buffered
//! executor pulls children concurrently on a worker pool; the sequential
//! executor concatenates them on the calling thread.

use serde::{Deserialize, Serialize};

use crate::observability::MetricsSnapshot;
use crate::results::BoxedResults;
use crate::solution::VarNames;

/// What a producer does when its child fails mid-pull
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaultPolicy {
    /// Log the failure and treat the child as exhausted
    #[default]
    Contain,
    /// Deliver the failure to the consumer once, then treat the child as exhausted
    Propagate,
}

/// Merges child streams into one
pub trait ResultsExecutor: Send + Sync {
    /// Fan `children` into a single stream over `var_names`
    ///
    /// `buffer_size` bounds how many unconsumed solutions each child may have
    /// outstanding. Never fails: a closed executor or no children yield an
    /// empty stream.
    fn merge(
        &self,
        children: Vec<BoxedResults>,
        var_names: VarNames,
        buffer_size: usize,
    ) -> BoxedResults;

    fn is_closed(&self) -> bool;

    /// Stop accepting work and release background resources. Does not wait
    /// for in-flight pulls.
    fn close(&self);

    fn metrics(&self) -> MetricsSnapshot {
        MetricsSnapshot::default()
    }
}
