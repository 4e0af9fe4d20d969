//! The `SpatialError` taxonomy (§7): every precondition violation raised by
//! the edit API is one discriminated variant here. All variants are raised
//! before any mutation — a failed edit leaves the topology unchanged.
//!
//! Structural contradictions discovered *during* a mutation (evidence of a
//! pre-existing corruption, not a caller error) are not part of this
//! taxonomy; they surface as Rust panics via `debug_assert!`/`panic!` at the
//! point of detection, matching the spec's "distinct unchecked error".

use thiserror::Error;

use crate::ids::{EdgeId, FaceId, NodeId};

/// All precondition violations raised by the edit API (§7).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SpatialError {
    #[error("coincident node")]
    CoincidentNode,

    #[error("coincident edge {0}")]
    CoincidentEdge(EdgeId),

    #[error("geometry crosses edge {0}")]
    GeometryCrossesEdge(EdgeId),

    #[error("geometry intersects edge {0}")]
    GeometryIntersectsEdge(EdgeId),

    #[error("edge endpoint does not match declared start/end node")]
    EndpointMismatch,

    #[error("node {0} is not isolated")]
    NotIsolated(NodeId),

    #[error("geometry crosses an edge (endnodes in faces {0} and {1})")]
    EndpointsInDifferentFaces(FaceId, FaceId),

    #[error("curve not simple")]
    NotSimple,

    #[error("start and end node cannot be the same for an isolated edge")]
    DegenerateIsolatedEdge,

    #[error("the two ends of the new edge disagree on the face they split (faces {0} and {1})")]
    SideLocationConflict(FaceId, FaceId),

    #[error("no node found at the given point")]
    NodeNotFound,

    #[error("multiple nodes found at the given point")]
    AmbiguousNode,

    #[error("node {0} does not exist")]
    UnknownNode(NodeId),

    #[error("edge {0} does not exist")]
    UnknownEdge(EdgeId),

    #[error("face {0} does not exist")]
    UnknownFace(FaceId),

    #[error("coordinate does not project strictly inside edge {0}")]
    ProjectionNotInterior(EdgeId),

    #[error("edges {0} and {1} do not share exactly one endpoint node")]
    HealEndpointMismatch(EdgeId, EdgeId),

    #[error("shared node of edges {0} and {1} is incident to other edges")]
    HealNodeNotIsolated(EdgeId, EdgeId),

    #[error("edges {0} and {1} do not bound the same pair of faces")]
    HealFaceMismatch(EdgeId, EdgeId),

    #[error("polygonize: edges do not form a valid closed boundary")]
    InvalidPolygonization,

    #[error("azimuth is undefined between two identical points")]
    DegenerateAzimuth,
}

pub type Result<T> = std::result::Result<T, SpatialError>;
