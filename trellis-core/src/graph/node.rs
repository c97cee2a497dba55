//! Node Identifiers
//!
//! The graph does not define its own identifier type. Callers bring their
//! own: string slices, owned strings, integers, or domain newtypes all work,
//! as long as the type can be compared, ordered, hashed, and cloned.

use std::fmt::Debug;
use std::hash::Hash;

/// Capability bundle required of a node identifier.
///
/// Equality and hashing are used for adjacency lookups, ordering is used to
/// normalize dependency lists and to sort parallel waves, and `Debug` lets
/// cycle errors name the offending nodes. The blanket impl means any
/// conforming type is a `Node` automatically; there is nothing to implement
/// by hand.
pub trait Node: Clone + Eq + Hash + Ord + Debug {}

impl<T: Clone + Eq + Hash + Ord + Debug> Node for T {}
