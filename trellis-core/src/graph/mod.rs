//! Dependency Graph
//!
//! This module implements the dependency graph and the orderings derived
//! from it.
//!
//! # Overview
//!
//! A [`DependencyGraph`] is a directed graph stored as an adjacency mapping:
//!
//! - Keys are node identifiers.
//! - Values are the identifiers that node depends on (its predecessors).
//!
//! Identifiers that only ever appear inside a dependency list are still part
//! of the graph; they are leaves with an implicit empty dependency list.
//!
//! # Design Decisions
//!
//! 1. The graph is immutable once constructed. Every transformation
//!    ([`DependencyGraph::subgraph`], [`DependencyGraph::merge`]) returns a
//!    new graph, which keeps derived orderings trivially cacheable and makes
//!    a shared graph safe to query from multiple threads.
//!
//! 2. The adjacency mapping is an `IndexMap` so that iteration follows
//!    insertion order. Combined with sorted dependency lists this makes
//!    every derived ordering deterministic for a given input.
//!
//! 3. Derived orderings are memoized per instance with compute-once
//!    semantics; repeated queries return the same cached result.

mod dependency_graph;
mod error;
mod node;

pub use dependency_graph::DependencyGraph;
pub use error::{GraphError, GraphResult};
pub use node::Node;
