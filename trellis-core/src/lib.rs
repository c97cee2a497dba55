//! Trellis Core
//!
//! This crate provides the dependency-ordering primitives used to schedule
//! interdependent work: build steps, deployment tasks, configuration
//! resolution, anything that can be expressed as "X must happen before Y".
//!
//! The central type is [`DependencyGraph`], an immutable mapping from a node
//! identifier to the identifiers it depends on. From that one structure the
//! crate derives:
//!
//! - a topological order (and its reverse),
//! - a "parallel order" that batches nodes into waves which may run
//!   concurrently,
//! - the subgraph reachable from a single node,
//! - the union of two graphs.
//!
//! Executing the work itself is out of scope; the crate only computes
//! orderings and groupings for the caller's own execution layer.
//!
//! # Example
//!
//! ```rust
//! use trellis_core::DependencyGraph;
//!
//! let graph: DependencyGraph<&str> = [
//!     ("binary", vec!["objects"]),
//!     ("objects", vec!["sources", "headers"]),
//! ]
//! .into_iter()
//! .collect();
//!
//! let order = graph.order().unwrap();
//! assert_eq!(order.last(), Some(&"binary"));
//! ```

pub mod graph;

pub use graph::{DependencyGraph, GraphError, GraphResult, Node};
