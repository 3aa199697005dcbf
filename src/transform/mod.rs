//! Single-source transforms
//!
//! Each combinator wraps exactly one upstream stream, runs on the calling
//! thread and keeps the relative order of its source.

mod ask;
mod filter;
mod flat_map;
mod projection;
mod transformed;

pub use ask::AskResults;
pub use filter::{FilteredResults, SolutionPredicate};
pub use flat_map::{FlatMapResults, InnerFactory};
pub use projection::ProjectionResults;
pub use transformed::{SolutionMapper, TransformedResults};
