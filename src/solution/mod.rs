//! Solutions: immutable rows of variable bindings
//!
//! A solution maps each variable of a fixed, ordered name list to a term or
//! to "unbound". Solutions are created by leaf sources, by projection and by
//! cartesian assembly, and are never mutated afterwards.

mod errors;
mod factory;
mod solution;
mod term;
mod vars;

pub use errors::{SolutionError, SolutionResult};
pub use factory::SolutionFactory;
pub use solution::Solution;
pub use term::Term;
pub use vars::VarNames;
