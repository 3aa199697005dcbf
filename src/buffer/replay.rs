//! Live/replaying mode switch shared by the resettable combinators

use std::mem;
use std::time::Duration;

use crate::results::{
    BoxedResults, CollectionResults, ResettableResults, Results, ResultsError, ResultsResult,
};
use crate::solution::{Solution, VarNames};

/// Where a resettable combinator currently reads from
///
/// `Live` pulls the original source and records what passes through.
/// `Replaying` reads a list built from the recording; the original source
/// stays here only until it is closed.
pub(crate) enum ReplayMode {
    Live {
        source: BoxedResults,
        recorded: Vec<Solution>,
        exhausted: bool,
    },
    Replaying {
        replay: CollectionResults,
        source: Option<BoxedResults>,
    },
    Closed,
}

impl ReplayMode {
    pub(crate) fn live(source: BoxedResults) -> Self {
        ReplayMode::Live {
            source,
            recorded: Vec::new(),
            exhausted: false,
        }
    }

    pub(crate) fn is_live(&self) -> bool {
        matches!(self, ReplayMode::Live { .. })
    }

    /// Only a live source can still wait on producers
    pub(crate) fn waits_on_producers(&self) -> bool {
        match self {
            ReplayMode::Live { source, .. } => source.waits_on_producers(),
            ReplayMode::Replaying { .. } | ReplayMode::Closed => false,
        }
    }

    /// Solutions recorded so far (live) or held for replay
    pub(crate) fn recorded_len(&self) -> usize {
        match self {
            ReplayMode::Live { recorded, .. } => recorded.len(),
            ReplayMode::Replaying { replay, .. } => replay.len(),
            ReplayMode::Closed => 0,
        }
    }

    /// Pending check that records exhaustion of the live source
    ///
    /// A timed-out wait on an async source says nothing about exhaustion.
    pub(crate) fn has_next(&mut self, timeout: Option<Duration>) -> ResultsResult<bool> {
        match self {
            ReplayMode::Live {
                source, exhausted, ..
            } => {
                if *exhausted {
                    return Ok(false);
                }
                let ready = match timeout {
                    Some(t) => source.has_next_timeout(t)?,
                    None => source.has_next()?,
                };
                if !ready && (timeout.is_none() || !source.is_async()) {
                    *exhausted = true;
                }
                Ok(ready)
            }
            ReplayMode::Replaying { replay, .. } => replay.has_next(),
            ReplayMode::Closed => Ok(false),
        }
    }

    /// Take the next solution, recording it while live
    pub(crate) fn next_recorded(&mut self) -> ResultsResult<Solution> {
        if !self.has_next(None)? {
            return Err(ResultsError::EmptyStream);
        }
        match self {
            ReplayMode::Live {
                source, recorded, ..
            } => {
                let solution = source.next()?;
                recorded.push(solution.clone());
                Ok(solution)
            }
            ReplayMode::Replaying { replay, .. } => replay.next(),
            ReplayMode::Closed => Err(ResultsError::EmptyStream),
        }
    }

    /// Switch to (or rewind) the replay
    ///
    /// With `require_complete`, a live source that has not reported
    /// exhaustion yet is rejected with `IncompleteReplay` and the mode is
    /// left untouched.
    pub(crate) fn reset(
        &mut self,
        vars: &VarNames,
        close_source: bool,
        require_complete: bool,
    ) -> ResultsResult<()> {
        match mem::replace(self, ReplayMode::Closed) {
            ReplayMode::Live {
                source,
                recorded,
                exhausted,
            } => {
                if require_complete && !exhausted {
                    *self = ReplayMode::Live {
                        source,
                        recorded,
                        exhausted,
                    };
                    return Err(ResultsError::IncompleteReplay);
                }
                let mut source = Some(source);
                let closed = close_optional(&mut source, close_source);
                *self = ReplayMode::Replaying {
                    replay: CollectionResults::new(vars.clone(), recorded),
                    source,
                };
                closed
            }
            ReplayMode::Replaying {
                mut replay,
                mut source,
            } => {
                replay.reset(false)?;
                let closed = close_optional(&mut source, close_source);
                *self = ReplayMode::Replaying { replay, source };
                closed
            }
            ReplayMode::Closed => Ok(()),
        }
    }

    /// Close whatever source is still held; idempotent
    pub(crate) fn close(&mut self) -> ResultsResult<()> {
        match mem::replace(self, ReplayMode::Closed) {
            ReplayMode::Live { mut source, .. } => source.close(),
            ReplayMode::Replaying { mut source, .. } => close_optional(&mut source, true),
            ReplayMode::Closed => Ok(()),
        }
    }

    pub(crate) fn ready_count(&self) -> usize {
        match self {
            ReplayMode::Live { source, .. } => source.ready_count(),
            ReplayMode::Replaying { replay, .. } => replay.ready_count(),
            ReplayMode::Closed => 0,
        }
    }
}

fn close_optional(source: &mut Option<BoxedResults>, close: bool) -> ResultsResult<()> {
    if !close {
        return Ok(());
    }
    match source.take() {
        Some(mut source) => source.close(),
        None => Ok(()),
    }
}
