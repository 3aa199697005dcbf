//! Replay-capable buffering
//!
//! Combinators that record what passes through them so that a consumer
//! can iterate the same solutions again without re-querying the source.
//!
//! # Invariants
//!
//! - Before the first reset, the source is passed through unchanged
//! - A replay is a fresh list owned by the combinator, never the source
//! - The source is closed exactly once: at reset (if asked) or at close

mod limit;
mod list;
mod replay;

pub use limit::LimitResults;
pub use list::ListBufferedResults;

pub(crate) use replay::ReplayMode;
