//! The dependency graph itself and its derived orderings.
//!
//! # Algorithm
//!
//! The topological sort is a depth-first traversal over the dependency
//! edges: every node's dependencies are emitted before the node itself.
//! Keys are visited in insertion order and dependency lists are kept sorted,
//! so the result is deterministic for a given input.
//!
//! The parallel order is built greedily on top of the topological order:
//!
//! 1. The first ungrouped node seeds a new wave.
//! 2. Every other ungrouped node whose dependencies are all contained in
//!    *previously completed* waves joins the wave. The wave under
//!    construction does not count, which is what keeps intra-wave members
//!    independent of each other.
//! 3. The wave is sorted and sealed; repeat until nothing is ungrouped.
//!
//! Step 2 compares each candidate against all sealed waves, so the pass is
//! quadratic in the node count. Dependency graphs of build systems and
//! config resolvers stay small enough that this has never been a bottleneck.

use std::collections::{HashMap, VecDeque};
use std::sync::OnceLock;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::error::{GraphError, GraphResult};
use super::node::Node;

/// Traversal state for the depth-first topological sort.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    /// On the current traversal path; revisiting means a cycle.
    Active,
    /// Fully emitted.
    Done,
}

/// An immutable directed dependency graph.
///
/// Maps each node identifier to the identifiers it depends on. Dependency
/// lists are normalized at construction: absent lists become empty, present
/// lists are sorted ascending. Sorting does not deduplicate; a dependency
/// listed twice in the input stays listed twice.
///
/// Identifiers that appear only inside dependency lists are implicit leaves.
/// They take part in every derived ordering but are not explicit keys, which
/// matters for [`DependencyGraph::subgraph`] and [`DependencyGraph::merge`].
///
/// # Example
///
/// ```rust
/// use trellis_core::DependencyGraph;
///
/// let graph: DependencyGraph<&str> = [
///     ("deploy", vec!["test", "build"]),
///     ("test", vec!["build"]),
///     ("build", vec![]),
/// ]
/// .into_iter()
/// .collect();
///
/// assert_eq!(graph.order().unwrap(), ["build", "test", "deploy"]);
/// assert_eq!(graph.reverse_order().unwrap(), ["deploy", "test", "build"]);
/// ```
#[derive(Debug, Serialize, Deserialize)]
pub struct DependencyGraph<N: Node> {
    /// Normalized adjacency mapping, insertion-ordered.
    dependencies: IndexMap<N, Vec<N>>,

    /// Memoized topological order.
    #[serde(skip)]
    order: OnceLock<GraphResult<Vec<N>, N>>,

    /// Memoized reverse of the topological order.
    #[serde(skip)]
    reverse_order: OnceLock<GraphResult<Vec<N>, N>>,

    /// Memoized parallel waves.
    #[serde(skip)]
    parallel_order: OnceLock<GraphResult<Vec<Vec<N>>, N>>,
}

impl<N: Node> DependencyGraph<N> {
    /// Builds a graph from raw dependency data.
    ///
    /// `None` stands in for an absent or null dependency list and is
    /// normalized to empty. Present lists are sorted; duplicates are kept.
    pub fn new<I>(raw: I) -> Self
    where
        I: IntoIterator<Item = (N, Option<Vec<N>>)>,
    {
        let dependencies = raw
            .into_iter()
            .map(|(node, deps)| {
                let mut deps = deps.unwrap_or_default();
                deps.sort();
                (node, deps)
            })
            .collect();

        Self {
            dependencies,
            order: OnceLock::new(),
            reverse_order: OnceLock::new(),
            parallel_order: OnceLock::new(),
        }
    }

    /// The normalized adjacency mapping. Implicit leaves are not keys.
    pub fn dependencies(&self) -> &IndexMap<N, Vec<N>> {
        &self.dependencies
    }

    /// The dependencies of `node`, or the empty slice if `node` has none or
    /// is not an explicit key.
    ///
    /// This fallback is what defines the node universe: any identifier may
    /// be looked up, and non-keys behave as leaves.
    pub fn dependencies_of(&self, node: &N) -> &[N] {
        self.dependencies.get(node).map_or(&[], Vec::as_slice)
    }

    /// Whether `node` is an explicit key of the graph.
    pub fn contains(&self, node: &N) -> bool {
        self.dependencies.contains_key(node)
    }

    /// Number of explicit keys.
    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    /// Whether the graph has no explicit keys.
    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }

    /// Returns the full node universe in dependency order: every node
    /// appears strictly after all of its dependencies.
    ///
    /// Computed once per instance; repeated calls return the cached slice.
    ///
    /// # Errors
    ///
    /// [`GraphError::CyclicDependency`] if the relation contains a cycle.
    pub fn order(&self) -> GraphResult<&[N], N> {
        match self.order.get_or_init(|| self.compute_order()) {
            Ok(order) => Ok(order),
            Err(err) => Err(err.clone()),
        }
    }

    /// [`DependencyGraph::order`] reversed: every node appears strictly
    /// before all of its dependencies.
    ///
    /// # Errors
    ///
    /// [`GraphError::CyclicDependency`] if the relation contains a cycle.
    pub fn reverse_order(&self) -> GraphResult<&[N], N> {
        let cached = self.reverse_order.get_or_init(|| {
            self.order().map(|order| {
                let mut reversed = order.to_vec();
                reversed.reverse();
                reversed
            })
        });

        match cached {
            Ok(order) => Ok(order),
            Err(err) => Err(err.clone()),
        }
    }

    /// Partitions the topological order into waves of nodes that may be
    /// processed concurrently.
    ///
    /// Nodes share a wave when every one of their dependencies was resolved
    /// by an earlier wave. That covers both nodes with identical dependency
    /// sets and nodes whose extra dependencies happen to be satisfied
    /// already. Waves are ordered; members within a wave are sorted.
    ///
    /// # Errors
    ///
    /// [`GraphError::CyclicDependency`] if the relation contains a cycle.
    pub fn parallel_order(&self) -> GraphResult<&[Vec<N>], N> {
        let cached = self
            .parallel_order
            .get_or_init(|| self.order().map(|order| self.compute_parallel_order(order)));

        match cached {
            Ok(waves) => Ok(waves),
            Err(err) => Err(err.clone()),
        }
    }

    /// Returns the restriction of the graph to `node` and its transitive
    /// dependencies.
    ///
    /// Only explicit keys are followed: a dependency that is an implicit
    /// leaf stays inside the dependency lists but does not become a key of
    /// the subgraph. If `node` itself is not an explicit key the result is
    /// the empty graph, even when `node` appears in someone's dependency
    /// list.
    ///
    /// Traversal tracks visited keys, so a cyclic graph yields its cyclic
    /// sub-mapping instead of recursing forever; asking that subgraph for an
    /// order then reports the cycle.
    pub fn subgraph(&self, node: &N) -> Self {
        if !self.dependencies.contains_key(node) {
            return Self::default();
        }

        let mut keep: IndexMap<N, Vec<N>> = IndexMap::new();
        let mut pending: VecDeque<N> = VecDeque::from([node.clone()]);

        while let Some(current) = pending.pop_front() {
            if keep.contains_key(&current) {
                continue;
            }
            // Implicit leaves have no entry to carry over.
            let Some(deps) = self.dependencies.get(&current) else {
                continue;
            };
            pending.extend(deps.iter().cloned());
            keep.insert(current, deps.clone());
        }

        keep.into_iter().collect()
    }

    /// Returns a new graph combining this graph's dependencies with
    /// `other`'s.
    ///
    /// The key set is the union of both graphs' explicit keys. A key present
    /// in both graphs gets the set union of its two dependency lists,
    /// deduplicated and sorted. Symmetric up to key order.
    pub fn merge(&self, other: &Self) -> Self {
        let mut merged: IndexMap<N, Vec<N>> = IndexMap::new();

        for key in self.dependencies.keys().chain(other.dependencies.keys()) {
            if merged.contains_key(key) {
                continue;
            }
            let mut union = self.dependencies_of(key).to_vec();
            union.extend_from_slice(other.dependencies_of(key));
            union.sort();
            union.dedup();
            merged.insert(key.clone(), union);
        }

        merged.into_iter().collect()
    }

    /// Depth-first topological sort over the dependency edges.
    fn compute_order(&self) -> GraphResult<Vec<N>, N> {
        let mut marks: HashMap<N, Mark> = HashMap::new();
        let mut path: Vec<N> = Vec::new();
        let mut sorted: Vec<N> = Vec::new();

        for node in self.dependencies.keys() {
            self.visit(node, &mut marks, &mut path, &mut sorted)?;
        }

        trace!(nodes = sorted.len(), "computed topological order");
        Ok(sorted)
    }

    fn visit(
        &self,
        node: &N,
        marks: &mut HashMap<N, Mark>,
        path: &mut Vec<N>,
        sorted: &mut Vec<N>,
    ) -> GraphResult<(), N> {
        match marks.get(node) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::Active) => {
                // The path segment from the first occurrence of `node` to
                // the current tip is one cycle of the offending SCC.
                let start = path.iter().position(|n| n == node).unwrap_or(0);
                let cycle = path[start..].to_vec();
                debug!(?cycle, "cyclic dependency detected");
                return Err(GraphError::cyclic(cycle));
            }
            None => {}
        }

        marks.insert(node.clone(), Mark::Active);
        path.push(node.clone());

        for dep in self.dependencies_of(node) {
            // A self-edge is a trivial SCC, not a cycle.
            if dep == node {
                continue;
            }
            self.visit(dep, marks, path, sorted)?;
        }

        path.pop();
        marks.insert(node.clone(), Mark::Done);
        sorted.push(node.clone());
        Ok(())
    }

    /// Greedy wave grouping over an already-computed topological order.
    fn compute_parallel_order(&self, order: &[N]) -> Vec<Vec<N>> {
        let mut waves: Vec<Vec<N>> = Vec::new();
        let mut ungrouped: Vec<&N> = order.iter().collect();

        while !ungrouped.is_empty() {
            // The earliest ungrouped node seeds the wave unconditionally.
            let seed = ungrouped.remove(0);
            let mut wave: Vec<N> = vec![seed.clone()];

            for candidate in &ungrouped {
                let resolved = self
                    .dependencies_of(candidate)
                    .iter()
                    .all(|dep| waves.iter().any(|sealed| sealed.contains(dep)));
                if resolved {
                    wave.push((*candidate).clone());
                }
            }

            ungrouped.retain(|node| !wave.contains(node));
            wave.sort();
            trace!(wave = waves.len(), size = wave.len(), "sealed parallel wave");
            waves.push(wave);
        }

        debug!(waves = waves.len(), "computed parallel order");
        waves
    }
}

impl<N: Node> Default for DependencyGraph<N> {
    fn default() -> Self {
        Self::new([])
    }
}

// Clones carry the mapping only; derived orderings are recomputed on demand.
impl<N: Node> Clone for DependencyGraph<N> {
    fn clone(&self) -> Self {
        Self {
            dependencies: self.dependencies.clone(),
            order: OnceLock::new(),
            reverse_order: OnceLock::new(),
            parallel_order: OnceLock::new(),
        }
    }
}

/// Graphs compare by their normalized mapping, independent of key order and
/// of which derived orderings happen to be cached.
impl<N: Node> PartialEq for DependencyGraph<N> {
    fn eq(&self, other: &Self) -> bool {
        self.dependencies == other.dependencies
    }
}

impl<N: Node> Eq for DependencyGraph<N> {}

impl<N: Node> FromIterator<(N, Vec<N>)> for DependencyGraph<N> {
    fn from_iter<I: IntoIterator<Item = (N, Vec<N>)>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(|(node, deps)| (node, Some(deps))))
    }
}
