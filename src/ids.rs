//! Strongly-typed entity identifiers.
//!
//! Every entity lives in an arena (`Vec<Option<T>>`) indexed by a stable,
//! monotonically-increasing id. Ids are never reused, even after the entity
//! they named is removed, so a stale id always either resolves to `None` or
//! to the entity that has always owned it.

use std::fmt;

/// Identifies a node. Node ids are positive and unique within a topology.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// Identifies an edge. Edge ids are positive and unique within a topology.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub u64);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "EdgeId({})", self.0)
    }
}

/// Identifies a face. `FaceId(0)` is reserved for the universe face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceId(pub u64);

impl fmt::Display for FaceId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "FaceId({})", self.0)
    }
}

/// The universe face — the single unbounded face present in every topology.
pub const UNIVERSE_FACE: FaceId = FaceId(0);
