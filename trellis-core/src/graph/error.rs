//! Error types for graph operations.

use std::fmt::Debug;

use thiserror::Error;

/// Result type for graph operations.
pub type GraphResult<T, N> = Result<T, GraphError<N>>;

/// Errors that can occur when deriving orderings from a graph.
///
/// Errors are `Clone` because failed derivations are memoized alongside
/// successful ones; every repeated query returns the same error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GraphError<N: Debug> {
    /// The dependency relation contains a cycle, so no topological order
    /// exists. `cycle` lists the nodes on one cycle, in traversal order.
    #[error("cyclic dependency detected: {cycle:?}")]
    CyclicDependency {
        /// Nodes participating in the cycle.
        cycle: Vec<N>,
    },
}

impl<N: Debug> GraphError<N> {
    /// Creates a cyclic dependency error from the nodes on the cycle.
    pub fn cyclic(cycle: Vec<N>) -> Self {
        Self::CyclicDependency { cycle }
    }
}
