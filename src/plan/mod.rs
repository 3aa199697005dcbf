//! Plan documents
//!
//! A plan is a JSON operator tree handed to the engine by whatever planned
//! the query. `PlanNode` decodes it; `PlanBuilder` wires the matching
//! combinators together and returns the root stream.
//!
//! # Invariants
//!
//! - Building pulls nothing from any source
//! - A failed build closes every subtree it had already built

mod builder;
mod errors;
mod node;
mod predicate;

pub use builder::PlanBuilder;
pub use errors::{PlanError, PlanResult};
pub use node::{CartesianSpec, PlanNode, PredicateSpec};
