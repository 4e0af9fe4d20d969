//! The edit API (§4.7): the seven public primitives, each checking every
//! precondition before any mutation and otherwise leaving the topology
//! untouched (§5, §7).
//!
//! Grounded on the teacher's builder methods (`Dcel::add_vertex`,
//! `add_edge`, `add_face`, `set_next` in `dcel.rs`) for the shape of "build
//! a record, wire it into the arenas, return the id" — generalized here to
//! also run preconditions and splice into an existing rotation rather than
//! only ever appending to a fresh structure.

use geo::Coord;
use log::{trace, warn};

use crate::adjacency;
use crate::error::{Result, SpatialError};
use crate::events::Event;
use crate::face_heal::{self, HealMode};
use crate::face_split::{self, SplitMode};
use crate::ids::{EdgeId, FaceId, NodeId, UNIVERSE_FACE};
use crate::model::{DirectedEdge, Edge, Node};
use crate::predicate;
use crate::store::Topology;
use crate::wiring;

/// Which of the two "recycle vs. replace" flavors an edit uses, shared
/// across the add/remove/heal primitive families (§4.7, glossary "split
/// face / mod face"). Internal: callers select a flavor through the six
/// spec-named public methods (`add_edge_new_faces`, `rem_edge_mod_face`,
/// etc.) rather than through this enum directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SplitFlavor {
    NewFace,
    ModFace,
}

impl SplitFlavor {
    fn split_mode(self) -> SplitMode {
        match self {
            SplitFlavor::NewFace => SplitMode::NewFace,
            SplitFlavor::ModFace => SplitMode::ModFace,
        }
    }

    fn heal_mode(self) -> HealMode {
        match self {
            SplitFlavor::NewFace => HealMode::NewFace,
            SplitFlavor::ModFace => HealMode::ModFace,
        }
    }
}

fn coord_eq(a: Coord<f64>, b: Coord<f64>) -> bool {
    a.x == b.x && a.y == b.y
}

impl Topology {
    // -----------------------------------------------------------------------
    // P1 addIsoNode
    // -----------------------------------------------------------------------

    pub fn add_iso_node(&mut self, coord: Coord<f64>) -> Result<NodeId> {
        let bbox = Topology::node_bbox(coord);
        if self.node_index.collides(&bbox) {
            return Err(SpatialError::CoincidentNode);
        }
        for hit in self.edge_index.search(&bbox) {
            let edge = self.edge(hit.id)?;
            if predicate::distance(coord, &edge.coordinates) == 0.0 {
                return Err(SpatialError::CoincidentEdge(hit.id));
            }
        }

        let face = self.locate_containing_face(coord);
        let id = self.alloc_node_id();
        self.nodes.push(Some(Node { id, coordinate: coord, face: Some(face) }));
        self.node_index.insert(id, bbox);
        self.events.emit(Event::AddNode(id));
        trace!("addIsoNode: {:?} at ({}, {}) in {:?}", id, coord.x, coord.y, face);
        Ok(id)
    }

    /// Which bounded face (or the universe) contains `coord`, used by
    /// `addIsoNode` to populate a new node's `face`.
    fn locate_containing_face(&self, coord: Coord<f64>) -> FaceId {
        for f in self.face_ids() {
            if f == UNIVERSE_FACE {
                continue;
            }
            if let Ok(shell) = crate::query::get_face_geometry(self, f) {
                if predicate::point_in_poly(coord, &shell) {
                    return f;
                }
            }
        }
        UNIVERSE_FACE
    }

    // -----------------------------------------------------------------------
    // P2 removeIsoNode
    // -----------------------------------------------------------------------

    pub fn remove_iso_node(&mut self, node: NodeId) -> Result<()> {
        let n = self.node(node)?;
        if n.face.is_none() {
            return Err(SpatialError::NotIsolated(node));
        }
        let bbox = Topology::node_bbox(n.coordinate);
        self.nodes[node.0 as usize - 1] = None;
        self.node_index.remove(node, bbox);
        self.events.emit(Event::RemoveNode(node));
        Ok(())
    }

    // -----------------------------------------------------------------------
    // P3 addIsoEdge
    // -----------------------------------------------------------------------

    pub fn add_iso_edge(&mut self, start: NodeId, end: NodeId, coords: Vec<Coord<f64>>) -> Result<EdgeId> {
        if start == end {
            return Err(SpatialError::DegenerateIsolatedEdge);
        }
        let start_node = self.node(start)?;
        let end_node = self.node(end)?;
        let start_face = start_node.face.ok_or(SpatialError::NotIsolated(start))?;
        let end_face = end_node.face.ok_or(SpatialError::NotIsolated(end))?;
        if start_face != end_face {
            return Err(SpatialError::EndpointsInDifferentFaces(start_face, end_face));
        }
        if !coord_eq(coords[0], start_node.coordinate) || !coord_eq(*coords.last().unwrap(), end_node.coordinate) {
            return Err(SpatialError::EndpointMismatch);
        }
        if !predicate::is_simple(&coords) {
            return Err(SpatialError::NotSimple);
        }

        let bbox = Topology::edge_bbox(&coords);
        for hit in self.edge_index.search(&bbox) {
            let other = self.edge(hit.id)?;
            let rel = predicate::relate(&coords, &other.coordinates);
            if rel.crosses() {
                return Err(SpatialError::GeometryCrossesEdge(hit.id));
            }
            if rel.is_coincident() {
                return Err(SpatialError::CoincidentEdge(hit.id));
            }
            if rel.properly_intersects() {
                return Err(SpatialError::GeometryIntersectsEdge(hit.id));
            }
        }

        let id = self.alloc_edge_id();
        let edge = Edge {
            id,
            start,
            end,
            coordinates: coords.clone(),
            left_face: start_face,
            right_face: start_face,
            next_left: id,
            next_left_dir: true,
            next_right: id,
            next_right_dir: false,
        };
        self.edges.push(Some(edge));
        self.edge_index.insert(id, bbox);
        self.node_mut(start)?.face = None;
        self.node_mut(end)?.face = None;
        self.events.emit(Event::AddEdge(id));
        trace!("addIsoEdge: {:?} from {:?} to {:?}", id, start, end);
        Ok(id)
    }

    // -----------------------------------------------------------------------
    // P4 addEdgeNewFaces / addEdgeModFace
    // -----------------------------------------------------------------------

    /// Shared preconditions for `P4`: simplicity, endpoint match, and no
    /// crossing, coincidence, or touching with existing edges. Touching an
    /// existing edge exactly at a shared endpoint is allowed (the ordinary
    /// case of connecting into an existing node) — `predicate::relate`
    /// itself does not flag that case as `touches`, so `properly_intersects`
    /// here only fires for a touch elsewhere, e.g. a T-junction against an
    /// unrelated edge's interior.
    fn check_connecting_edge(&self, start: NodeId, end: NodeId, coords: &[Coord<f64>]) -> Result<()> {
        let start_node = self.node(start)?;
        let end_node = self.node(end)?;
        if !coord_eq(coords[0], start_node.coordinate) || !coord_eq(*coords.last().unwrap(), end_node.coordinate) {
            return Err(SpatialError::EndpointMismatch);
        }
        if !predicate::is_simple(coords) {
            return Err(SpatialError::NotSimple);
        }
        if let (Some(sf), Some(ef)) = (start_node.face, end_node.face) {
            if sf != ef {
                return Err(SpatialError::EndpointsInDifferentFaces(sf, ef));
            }
        }
        let bbox = Topology::edge_bbox(coords);
        for hit in self.edge_index.search(&bbox) {
            let other = self.edge(hit.id)?;
            let rel = predicate::relate(coords, &other.coordinates);
            if rel.crosses() {
                return Err(SpatialError::GeometryCrossesEdge(hit.id));
            }
            if rel.is_coincident() {
                return Err(SpatialError::CoincidentEdge(hit.id));
            }
            if rel.properly_intersects() {
                return Err(SpatialError::GeometryIntersectsEdge(hit.id));
            }
        }
        Ok(())
    }

    /// Shared implementation of `addEdgeNewFaces`/`addEdgeModFace`; the two
    /// public primitives differ only in `flavor`.
    fn add_edge_impl(&mut self, start: NodeId, end: NodeId, coords: Vec<Coord<f64>>, flavor: SplitFlavor) -> Result<EdgeId> {
        self.check_connecting_edge(start, end, &coords)?;

        let n = coords.len();
        let az_start = predicate::azimuth(coords[0], coords[1])?;
        let az_end = predicate::azimuth(coords[n - 1], coords[n - 2])?;

        let start_isolated = self.node(start)?.face;
        let end_isolated = self.node(end)?.face;
        let common_face = start_isolated.or(end_isolated);

        let res_start = adjacency::resolve(self, start, az_start);
        let res_end = adjacency::resolve(self, end, az_end);

        // §7 "side-location conflict": the two ends of the new edge disagree
        // on the face they split. Checked before any mutation so a rejected
        // edit leaves the topology untouched.
        let left_face = resolve_face(res_start.ccw_face, res_end.cw_face, common_face)?;
        let right_face = resolve_face(res_start.cw_face, res_end.ccw_face, common_face)?;
        let origin_face = if left_face == right_face { Some(left_face) } else { None };

        let new_id = self.alloc_edge_id();
        let left_target = wiring::splice_in(self, &res_end, (new_id, true));
        let right_target = wiring::splice_in(self, &res_start, (new_id, false));

        let edge = Edge {
            id: new_id,
            start,
            end,
            coordinates: coords.clone(),
            left_face,
            right_face,
            next_left: left_target.0,
            next_left_dir: left_target.1,
            next_right: right_target.0,
            next_right_dir: right_target.1,
        };
        let bbox = Topology::edge_bbox(&coords);
        self.edges.push(Some(edge));
        self.edge_index.insert(new_id, bbox);

        if start_isolated.is_some() {
            self.node_mut(start)?.face = None;
        }
        if end_isolated.is_some() {
            self.node_mut(end)?.face = None;
        }
        self.events.emit(Event::AddEdge(new_id));

        let mode = flavor.split_mode();
        face_split::split_face(self, (new_id, true), mode);
        face_split::split_face(self, (new_id, false), mode);

        if flavor == SplitFlavor::NewFace {
            if let Some(of) = origin_face {
                if of != UNIVERSE_FACE {
                    self.retire_face_if_orphaned(of);
                }
            }
        }

        trace!("addEdge: {:?} from {:?} to {:?} ({:?})", new_id, start, end, flavor);
        Ok(new_id)
    }

    /// P4, new-face flavor: a ring closed by this insertion destroys the
    /// face it split and allocates two fresh ones in its place.
    pub fn add_edge_new_faces(&mut self, start: NodeId, end: NodeId, coords: Vec<Coord<f64>>) -> Result<EdgeId> {
        self.add_edge_impl(start, end, coords, SplitFlavor::NewFace)
    }

    /// P4, mod-face flavor: a ring closed by this insertion recycles the
    /// split face's id for one of the two resulting faces.
    pub fn add_edge_mod_face(&mut self, start: NodeId, end: NodeId, coords: Vec<Coord<f64>>) -> Result<EdgeId> {
        self.add_edge_impl(start, end, coords, SplitFlavor::ModFace)
    }

    /// Remove `face` from the store and index if no edge or node references
    /// it any longer (the "destroy the original" half of new-face §4.5/4.7).
    fn retire_face_if_orphaned(&mut self, face: FaceId) {
        let still_used = self.edge_ids().any(|eid| {
            let e = self.edge(eid).expect("edge_ids yields only live edges");
            e.left_face == face || e.right_face == face
        }) || self.node_ids().any(|nid| self.node(nid).expect("node_ids yields only live nodes").face == Some(face));
        if still_used {
            return;
        }
        if let Some(bbox) = self.face_bounds.get(face.0 as usize).copied().flatten() {
            self.face_index.remove(face, bbox);
        }
        self.faces[face.0 as usize] = None;
        self.face_bounds[face.0 as usize] = None;
        self.events.emit(Event::RemoveFace(face));
        trace!("retired orphaned face {:?}", face);
    }

    // -----------------------------------------------------------------------
    // P5 remEdgeNewFace / remEdgeModFace
    // -----------------------------------------------------------------------

    /// Shared implementation of `remEdgeNewFace`/`remEdgeModFace`.
    fn remove_edge_impl(&mut self, edge: EdgeId, flavor: SplitFlavor) -> Result<()> {
        let e = self.edge(edge)?.clone();

        wiring::splice_out(self, (edge, true), (e.next_left, e.next_left_dir));
        wiring::splice_out(self, (edge, false), (e.next_right, e.next_right_dir));

        let bbox = Topology::edge_bbox(&e.coordinates);
        self.edges[edge.0 as usize - 1] = None;
        self.edge_index.remove(edge, bbox);

        let surviving = face_heal::heal_faces(self, e.left_face, e.right_face, flavor.heal_mode());

        if adjacency::incident_edges(self, e.start).is_empty() {
            self.node_mut(e.start)?.face = Some(surviving);
        }
        if e.end != e.start && adjacency::incident_edges(self, e.end).is_empty() {
            self.node_mut(e.end)?.face = Some(surviving);
        }

        self.events.emit(Event::RemoveEdge(edge));
        trace!("remEdge: {:?} ({:?}), surviving face {:?}", edge, flavor, surviving);
        Ok(())
    }

    /// P5, new-face flavor: the two faces bordering the removed edge are
    /// destroyed and a fresh face replaces them both.
    pub fn rem_edge_new_face(&mut self, edge: EdgeId) -> Result<()> {
        self.remove_edge_impl(edge, SplitFlavor::NewFace)
    }

    /// P5, mod-face flavor: the right face survives and absorbs the left
    /// face's members (§9: the "always pick the right face" behavior this
    /// kernel preserves as specified).
    pub fn rem_edge_mod_face(&mut self, edge: EdgeId) -> Result<()> {
        self.remove_edge_impl(edge, SplitFlavor::ModFace)
    }

    // -----------------------------------------------------------------------
    // P6 modEdgeSplit
    // -----------------------------------------------------------------------

    pub fn mod_edge_split(&mut self, edge: EdgeId, coord: Coord<f64>) -> Result<NodeId> {
        let e = self.edge(edge)?.clone();
        let (first, second) = predicate::split(&e.coordinates, coord);
        let split_point = *first.last().unwrap();
        if coord_eq(split_point, e.coordinates[0]) || coord_eq(split_point, *e.coordinates.last().unwrap()) {
            return Err(SpatialError::ProjectionNotInterior(edge));
        }

        let new_node_id = self.alloc_node_id();
        self.nodes.push(Some(Node { id: new_node_id, coordinate: split_point, face: None }));
        self.node_index.insert(new_node_id, Topology::node_bbox(split_point));

        let new_edge_id = self.alloc_edge_id();

        if let Some((pid, pdir)) = wiring::find_predecessor(self, (edge, false)) {
            self.edge_mut(pid)?.set_next(pdir, (new_edge_id, false));
        }

        let new_edge = Edge {
            id: new_edge_id,
            start: new_node_id,
            end: e.end,
            coordinates: second,
            left_face: e.left_face,
            right_face: e.right_face,
            next_left: e.next_left,
            next_left_dir: e.next_left_dir,
            next_right: edge,
            next_right_dir: false,
        };
        let new_bbox = Topology::edge_bbox(&new_edge.coordinates);
        self.edges.push(Some(new_edge));
        self.edge_index.insert(new_edge_id, new_bbox);

        let old_bbox = Topology::edge_bbox(&e.coordinates);
        {
            let orig = self.edge_mut(edge)?;
            orig.coordinates = first;
            orig.end = new_node_id;
            orig.next_left = new_edge_id;
            orig.next_left_dir = true;
        }
        self.edge_index.remove(edge, old_bbox);
        let shortened_bbox = Topology::edge_bbox(&self.edge(edge)?.coordinates.clone());
        self.edge_index.insert(edge, shortened_bbox);

        self.events.emit(Event::AddNode(new_node_id));
        self.events.emit(Event::AddEdge(new_edge_id));
        self.events.emit(Event::ModEdge(edge));
        trace!("modEdgeSplit: {:?} at ({}, {}) -> new node {:?}, new edge {:?}", edge, coord.x, coord.y, new_node_id, new_edge_id);
        Ok(new_node_id)
    }

    // -----------------------------------------------------------------------
    // P7 modEdgeHeal / newEdgeHeal
    // -----------------------------------------------------------------------

    /// Shared implementation of `modEdgeHeal`/`newEdgeHeal`.
    fn heal_edges_impl(&mut self, e1_id: EdgeId, e2_id: EdgeId, flavor: SplitFlavor) -> Result<EdgeId> {
        let e1 = self.edge(e1_id)?.clone();
        let e2 = self.edge(e2_id)?.clone();

        let shared = shared_endpoint(&e1, &e2).ok_or(SpatialError::HealEndpointMismatch(e1_id, e2_id))?;
        if adjacency::incident_edges(self, shared).len() != 2 {
            return Err(SpatialError::HealNodeNotIsolated(e1_id, e2_id));
        }

        let far1 = if e1.start == shared { e1.end } else { e1.start };
        let far2 = if e2.start == shared { e2.end } else { e2.start };

        // dir1: traversing e1 in this direction goes far1 -> shared.
        let dir1 = e1.end == shared;
        // dir2: traversing e2 in this direction goes shared -> far2.
        let dir2 = e2.start == shared;

        if e1.face(dir1) != e2.face(dir2) || e1.face(!dir1) != e2.face(!dir2) {
            return Err(SpatialError::HealFaceMismatch(e1_id, e2_id));
        }

        let coords1 = if dir1 { e1.coordinates.clone() } else { reversed(&e1.coordinates) };
        let coords2 = if dir2 { e2.coordinates.clone() } else { reversed(&e2.coordinates) };
        let mut merged_coords = coords1;
        merged_coords.extend(coords2.into_iter().skip(1));

        let left_face = e1.face(dir1);
        let right_face = e1.face(!dir1);
        let far1_cont = e1.next(!dir1);
        let far2_cont = e2.next(dir2);

        let pred_far1 = wiring::find_predecessor(self, (e1_id, dir1));
        let pred_far2 = wiring::find_predecessor(self, (e2_id, !dir2));

        let surv_id = match flavor {
            SplitFlavor::ModFace => e1_id,
            SplitFlavor::NewFace => self.alloc_edge_id(),
        };

        let old_e1_bbox = Topology::edge_bbox(&e1.coordinates);
        let old_e2_bbox = Topology::edge_bbox(&e2.coordinates);
        self.edge_index.remove(e1_id, old_e1_bbox);
        self.edge_index.remove(e2_id, old_e2_bbox);
        self.edges[e1_id.0 as usize - 1] = None;
        self.edges[e2_id.0 as usize - 1] = None;

        let surv_edge = Edge {
            id: surv_id,
            start: far1,
            end: far2,
            coordinates: merged_coords,
            left_face,
            right_face,
            next_left: far2_cont.0,
            next_left_dir: far2_cont.1,
            next_right: far1_cont.0,
            next_right_dir: far1_cont.1,
        };
        let surv_bbox = Topology::edge_bbox(&surv_edge.coordinates);
        let idx = surv_id.0 as usize - 1;
        if self.edges.len() <= idx {
            self.edges.resize(idx + 1, None);
        }
        self.edges[idx] = Some(surv_edge);
        self.edge_index.insert(surv_id, surv_bbox);

        if let Some((pid, pdir)) = pred_far1 {
            if pid != e1_id && pid != e2_id {
                self.edge_mut(pid)?.set_next(pdir, (surv_id, true));
            }
        }
        if let Some((pid, pdir)) = pred_far2 {
            if pid != e1_id && pid != e2_id {
                self.edge_mut(pid)?.set_next(pdir, (surv_id, false));
            }
        }

        let shared_bbox = Topology::node_bbox(self.node(shared)?.coordinate);
        self.nodes[shared.0 as usize - 1] = None;
        self.node_index.remove(shared, shared_bbox);

        self.events.emit(Event::RemoveNode(shared));
        if surv_id != e1_id {
            self.events.emit(Event::RemoveEdge(e1_id));
        }
        self.events.emit(Event::RemoveEdge(e2_id));
        self.events.emit(Event::AddEdge(surv_id));
        trace!("heal: {:?} + {:?} -> {:?} ({:?})", e1_id, e2_id, surv_id, flavor);
        Ok(surv_id)
    }

    /// P7, mod-face flavor: `e1`'s id is recycled for the merged edge.
    pub fn mod_edge_heal(&mut self, e1: EdgeId, e2: EdgeId) -> Result<EdgeId> {
        self.heal_edges_impl(e1, e2, SplitFlavor::ModFace)
    }

    /// P7, new-face flavor: a fresh id is allocated for the merged edge and
    /// both `e1` and `e2` are destroyed.
    pub fn new_edge_heal(&mut self, e1: EdgeId, e2: EdgeId) -> Result<EdgeId> {
        self.heal_edges_impl(e1, e2, SplitFlavor::NewFace)
    }
}

fn reversed(cs: &[Coord<f64>]) -> Vec<Coord<f64>> {
    let mut out = cs.to_vec();
    out.reverse();
    out
}

fn shared_endpoint(e1: &Edge, e2: &Edge) -> Option<NodeId> {
    let candidates = [(e1.start, e2.start), (e1.start, e2.end), (e1.end, e2.start), (e1.end, e2.end)];
    let matches: Vec<NodeId> = candidates.iter().filter(|(a, b)| a == b).map(|(a, _)| *a).collect();
    if matches.len() == 1 {
        Some(matches[0])
    } else {
        None
    }
}

/// Reconcile the face a new edge's two endpoints independently resolve for
/// one of its sides. Disagreement between two live resolutions is a
/// caller-facing precondition failure (§7 "side-location conflict"), not
/// the internal corruption §4.4 guards against within a single resolution.
fn resolve_face(a: Option<FaceId>, b: Option<FaceId>, fallback: Option<FaceId>) -> Result<FaceId> {
    match (a, b) {
        (Some(x), Some(y)) => {
            if x != y {
                warn!("side-location conflict: {:?} vs {:?}", x, y);
                return Err(SpatialError::SideLocationConflict(x, y));
            }
            Ok(x)
        }
        (Some(x), None) => Ok(x),
        (None, Some(y)) => Ok(y),
        (None, None) => Ok(fallback.expect("both endpoints isolated but no common face was resolved")),
    }
}
