//! The entity store (§2, §3, §6): arenas for nodes, edges, and faces, their
//! spatial indexes, id allocation, and the `Topology::new` constructor.
//!
//! Ids are never reused: the arenas are `Vec<Option<T>>`, grown
//! monotonically; removal clears a slot to `None` rather than shifting
//! later entries, the "arena-plus-id scheme" the spec's design notes (§5,
//! §9) call for, grounded on the teacher's flat `Vec`-indexed-by-id arenas
//! in `dcel.rs`.

use geo::{Coord, Rect};
use log::trace;

use crate::error::{Result, SpatialError};
use crate::events::{Event, EventBus, SubscriptionId};
use crate::ids::{EdgeId, FaceId, NodeId, UNIVERSE_FACE};
use crate::index::SpatialIndex;
use crate::model::{Edge, Face, Node};

/// A planar topology: the owner of all nodes, edges, and faces, their
/// spatial indexes, and the event bus. See §2 for the component overview.
pub struct Topology {
    pub(crate) name: String,
    pub(crate) srid: i32,
    pub(crate) tolerance: f64,

    pub(crate) nodes: Vec<Option<Node>>,
    pub(crate) edges: Vec<Option<Edge>>,
    pub(crate) faces: Vec<Option<Face>>,
    /// Bounding box of each bounded face's outer shell (`None` for the
    /// universe face and for a face with no cached shell yet).
    pub(crate) face_bounds: Vec<Option<Rect<f64>>>,

    pub(crate) node_index: SpatialIndex<NodeId>,
    pub(crate) edge_index: SpatialIndex<EdgeId>,
    pub(crate) face_index: SpatialIndex<FaceId>,

    next_node_id: u64,
    next_edge_id: u64,
    next_face_id: u64,

    pub(crate) events: EventBus,
}

impl Topology {
    /// Create a topology containing only the universe face (id 0), empty
    /// node/edge collections, and zero-element spatial indexes (§6).
    /// `srid` and `tolerance` are stored verbatim; the core algorithms do
    /// not consult `tolerance` (§9).
    pub fn new(name: impl Into<String>, srid: i32, tolerance: f64) -> Self {
        trace!("creating topology with srid={srid} tolerance={tolerance}");
        Self {
            name: name.into(),
            srid,
            tolerance,
            nodes: Vec::new(),
            edges: Vec::new(),
            faces: vec![Some(Face { id: UNIVERSE_FACE })],
            face_bounds: vec![None],
            node_index: SpatialIndex::new(),
            edge_index: SpatialIndex::new(),
            face_index: SpatialIndex::new(),
            next_node_id: 1,
            next_edge_id: 1,
            next_face_id: 1,
            events: EventBus::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn srid(&self) -> i32 {
        self.srid
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    // -----------------------------------------------------------------------
    // Counts
    // -----------------------------------------------------------------------

    pub fn num_nodes(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.iter().filter(|e| e.is_some()).count()
    }

    /// Number of faces including the universe face.
    pub fn num_faces(&self) -> usize {
        self.faces.iter().filter(|f| f.is_some()).count()
    }

    /// Number of bounded faces (excludes the universe face).
    pub fn num_bounded_faces(&self) -> usize {
        self.num_faces() - 1
    }

    /// A one-line diagnostic summary, grounded on the teacher's
    /// `num_vertices`/`num_half_edges`/`num_faces` counters (`dcel.rs`).
    pub fn describe(&self) -> String {
        format!(
            "Topology({:?}): {} nodes, {} edges, {} bounded faces",
            self.name,
            self.num_nodes(),
            self.num_edges(),
            self.num_bounded_faces()
        )
    }

    // -----------------------------------------------------------------------
    // Events (§4.8)
    // -----------------------------------------------------------------------

    /// Subscribe `callback` to every mutation event this topology emits.
    pub fn on(&mut self, callback: impl FnMut(&Event) + 'static) -> SubscriptionId {
        self.events.on(callback)
    }

    /// Remove a subscription previously returned by `on`.
    pub fn un(&mut self, id: SubscriptionId) {
        self.events.un(id)
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes
            .get(id.0 as usize - 1)
            .and_then(|n| n.as_ref())
            .ok_or(SpatialError::UnknownNode(id))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes
            .get_mut(id.0 as usize - 1)
            .and_then(|n| n.as_mut())
            .ok_or(SpatialError::UnknownNode(id))
    }

    pub fn edge(&self, id: EdgeId) -> Result<&Edge> {
        self.edges
            .get(id.0 as usize - 1)
            .and_then(|e| e.as_ref())
            .ok_or(SpatialError::UnknownEdge(id))
    }

    pub(crate) fn edge_mut(&mut self, id: EdgeId) -> Result<&mut Edge> {
        self.edges
            .get_mut(id.0 as usize - 1)
            .and_then(|e| e.as_mut())
            .ok_or(SpatialError::UnknownEdge(id))
    }

    pub fn face(&self, id: FaceId) -> Result<&Face> {
        self.faces
            .get(id.0 as usize)
            .and_then(|f| f.as_ref())
            .ok_or(SpatialError::UnknownFace(id))
    }

    pub fn face_exists(&self, id: FaceId) -> bool {
        matches!(self.faces.get(id.0 as usize), Some(Some(_)))
    }

    /// All live node ids, in id order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().filter_map(|n| n.as_ref()).map(|n| n.id)
    }

    /// All live edge ids, in id order.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges.iter().filter_map(|e| e.as_ref()).map(|e| e.id)
    }

    /// All live face ids (including the universe face), in id order.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> + '_ {
        self.faces.iter().filter_map(|f| f.as_ref()).map(|f| f.id)
    }

    // -----------------------------------------------------------------------
    // Id allocation
    // -----------------------------------------------------------------------

    pub(crate) fn alloc_node_id(&mut self) -> NodeId {
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        id
    }

    pub(crate) fn alloc_edge_id(&mut self) -> EdgeId {
        let id = EdgeId(self.next_edge_id);
        self.next_edge_id += 1;
        id
    }

    pub(crate) fn alloc_face_id(&mut self) -> FaceId {
        let id = FaceId(self.next_face_id);
        self.next_face_id += 1;
        id
    }

    // -----------------------------------------------------------------------
    // Bounding boxes
    // -----------------------------------------------------------------------

    pub(crate) fn node_bbox(coord: Coord<f64>) -> Rect<f64> {
        Rect::new(coord, coord)
    }

    pub(crate) fn edge_bbox(coords: &[Coord<f64>]) -> Rect<f64> {
        let mut min = coords[0];
        let mut max = coords[0];
        for c in coords {
            min.x = min.x.min(c.x);
            min.y = min.y.min(c.y);
            max.x = max.x.max(c.x);
            max.y = max.y.max(c.y);
        }
        Rect::new(min, max)
    }

    pub(crate) fn ring_bbox(ring: &[Coord<f64>]) -> Rect<f64> {
        Self::edge_bbox(ring)
    }
}
