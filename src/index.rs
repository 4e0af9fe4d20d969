//! The spatial index (§4.1): a black-box 2-D bounding-box index supporting
//! `insert`, `remove`, `search`, and `collides`. Backed by `rstar::RTree`,
//! the same crate and `RTreeObject`-wrapper pattern the teacher uses in
//! `src/geom/bbox.rs` (`BoundingBox` wrapping a `geo::Rect` with an index
//! payload) — here generalized over the entity id type so one wrapper
//! serves the node, edge, and face indexes.

use geo::Rect;
use rstar::{RTree, RTreeObject, AABB};

/// One bounding box in a spatial index, tagged with the id of the entity it
/// belongs to.
#[derive(Clone, Debug, PartialEq)]
pub struct IndexedBox<Id> {
    pub id: Id,
    pub bbox: Rect<f64>,
}

impl<Id: Clone + std::fmt::Debug> RTreeObject for IndexedBox<Id> {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.bbox.min().into(), self.bbox.max().into())
    }
}

/// A spatial index over bounding boxes tagged by entity id. No operation's
/// correctness depends on search order.
#[derive(Debug)]
pub struct SpatialIndex<Id> {
    tree: RTree<IndexedBox<Id>>,
}

impl<Id: Clone + std::fmt::Debug + PartialEq> Default for SpatialIndex<Id> {
    fn default() -> Self {
        Self { tree: RTree::new() }
    }
}

impl<Id: Clone + std::fmt::Debug + PartialEq> SpatialIndex<Id> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: Id, bbox: Rect<f64>) {
        self.tree.insert(IndexedBox { id, bbox });
    }

    /// Removes the entry for `id` with the given `bbox`. No-op if absent.
    pub fn remove(&mut self, id: Id, bbox: Rect<f64>) {
        self.tree.remove(&IndexedBox { id, bbox });
    }

    /// All entries whose bounding box intersects `query`.
    pub fn search(&self, query: &Rect<f64>) -> Vec<&IndexedBox<Id>> {
        let envelope = AABB::from_corners(query.min().into(), query.max().into());
        self.tree.locate_in_envelope_intersecting(&envelope).collect()
    }

    /// True iff any indexed box intersects `query`.
    pub fn collides(&self, query: &Rect<f64>) -> bool {
        let envelope = AABB::from_corners(query.min().into(), query.max().into());
        self.tree.locate_in_envelope_intersecting(&envelope).next().is_some()
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}
