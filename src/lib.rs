//! fedstream - A pull-based result streaming engine for federated queries
//!
//! Execution trees are built from `Results` streams. Leaves wrap remote
//! sources; combinators fan them in, buffer, deduplicate, combine and
//! reshape their solutions. The caller pulls the root and closes it, which
//! releases every stream and producer underneath.
//!
//! - `results`: the stream contract and in-memory collections
//! - `executor`: sequential and buffered fan-in
//! - `buffer`: replayable buffering and limits
//! - `distinct`: exact and windowed duplicate elimination
//! - `cartesian`: lazy cross products
//! - `transform`: projection, filters, flat-map, mapping and ask
//! - `plan`, `config`, `cli`: JSON plans, execution settings and the binary

pub mod buffer;
pub mod cartesian;
pub mod cli;
pub mod config;
pub mod distinct;
pub mod executor;
pub mod observability;
pub mod plan;
pub mod results;
pub mod solution;
pub mod transform;
