//! Lazy cartesian product
//!
//! Nested-loop cross join over inputs with pairwise disjoint variables.
//! Combinations are produced in odometer order: the last input cycles
//! fastest, the first input advances slowest and is read exactly once.
//!
//! # Invariants
//!
//! - Every input is made distinct, and every input but the first is made
//!   replayable, before the first pull
//! - An empty required input makes the product empty without pulling the
//!   inputs after it
//! - An empty optional input contributes one all-unbound filler
//! - The product never yields the same combination twice
//! - `close()` reaches every input, including replaced ones

mod product;

pub use product::{CartesianInput, LazyCartesianResults};
