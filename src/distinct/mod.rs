//! Deduplication
//!
//! Two strategies with different memory contracts:
//!
//! - `HashDistinctResults`: exact over the whole stream, memory grows with
//!   the number of unique solutions, resettable
//! - `WindowDistinctResults`: exact only within a sliding window of recent
//!   novel solutions, memory bounded by the window size
//!
//! Both keep the relative order of the first occurrences.

mod hash;
mod window;

pub use hash::HashDistinctResults;
pub use window::{WindowDistinctResults, DEFAULT_WINDOW_SIZE};
