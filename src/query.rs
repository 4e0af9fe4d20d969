//! The read-only query surface (§6): locating nodes/edges/faces by point or
//! line, walking a ring, and recovering a face's boundary geometry.
//!
//! Grounded on the teacher's `Region::nearest_precinct`-style point lookups
//! (`region.rs`) for the "search the index, then confirm with an exact
//! predicate" shape; the ring/polygon recovery has no teacher counterpart
//! (the teacher never reconstructs a boundary from a `Dcel`) and is built
//! from the spec's own description instead.

use geo::{Coord, Rect};

use crate::error::{Result, SpatialError};
use crate::ids::{EdgeId, FaceId, NodeId, UNIVERSE_FACE};
use crate::model::DirectedEdge;
use crate::predicate;
use crate::ring;
use crate::store::Topology;

/// Find the single node at exactly `coord`. Errors if none or more than one
/// (the latter should not arise given the "no two nodes share a coordinate"
/// invariant, but the index is queried generically here).
pub fn get_node_by_point(topo: &Topology, coord: Coord<f64>) -> Result<NodeId> {
    let bbox = Topology::node_bbox(coord);
    let hits = topo.node_index.search(&bbox);
    match hits.len() {
        0 => Err(SpatialError::NodeNotFound),
        1 => Ok(hits[0].id),
        _ => Err(SpatialError::AmbiguousNode),
    }
}

/// All edges passing within `tolerance` of `coord`.
pub fn get_edge_by_point(topo: &Topology, coord: Coord<f64>, tolerance: f64) -> Vec<EdgeId> {
    let bbox = Rect::new(
        Coord { x: coord.x - tolerance, y: coord.y - tolerance },
        Coord { x: coord.x + tolerance, y: coord.y + tolerance },
    );
    topo.edge_index
        .search(&bbox)
        .into_iter()
        .filter(|hit| {
            let edge = topo.edge(hit.id).expect("indexed edge must exist");
            predicate::distance(coord, &edge.coordinates) <= tolerance
        })
        .map(|hit| hit.id)
        .collect()
}

/// All edges that intersect the given polyline (candidate bbox match
/// refined by the exact `intersects` predicate).
pub fn get_edges_by_line(topo: &Topology, coords: &[Coord<f64>]) -> Vec<EdgeId> {
    let bbox = Topology::edge_bbox(coords);
    topo.edge_index
        .search(&bbox)
        .into_iter()
        .filter(|hit| {
            let edge = topo.edge(hit.id).expect("indexed edge must exist");
            predicate::intersects(coords, &edge.coordinates)
        })
        .map(|hit| hit.id)
        .collect()
}

/// The bounded face(s) containing `coord`, or `[UNIVERSE_FACE]` if none.
pub fn get_face_by_point(topo: &Topology, coord: Coord<f64>) -> Vec<FaceId> {
    let mut out = Vec::new();
    for f in topo.face_ids() {
        if f == UNIVERSE_FACE {
            continue;
        }
        if let Some(bbox) = topo.face_bounds.get(f.0 as usize).copied().flatten() {
            if coord.x < bbox.min().x || coord.x > bbox.max().x || coord.y < bbox.min().y || coord.y > bbox.max().y {
                continue;
            }
        }
        if let Ok(shell) = get_face_geometry(topo, f) {
            if predicate::point_in_poly(coord, &shell) {
                out.push(f);
            }
        }
    }
    if out.is_empty() {
        out.push(UNIVERSE_FACE);
    }
    out
}

/// The directed edges of the ring starting at `start` (a thin wrapper over
/// [`ring::ring_edges`] exposed as part of the public query surface).
pub fn get_ring_edges(topo: &Topology, start: DirectedEdge) -> Vec<DirectedEdge> {
    ring::ring_edges(topo, start)
}

/// The closed outer shell of a bounded face (§6: "returns the polygonized
/// shell of the face by collecting every edge with that face on either side
/// and invoking the polygonizer"). Collects each bordering directed edge's
/// polyline, in its own direction of travel, as an independent linestring
/// and hands the set to [`predicate::polygonize`], which fails if they do
/// not chain into a single valid closed boundary.
pub fn get_face_geometry(topo: &Topology, face: FaceId) -> Result<Vec<Coord<f64>>> {
    if face == UNIVERSE_FACE {
        return Err(SpatialError::InvalidPolygonization);
    }
    if !topo.face_exists(face) {
        return Err(SpatialError::UnknownFace(face));
    }

    let mut borders: Vec<Vec<Coord<f64>>> = Vec::new();
    for eid in topo.edge_ids() {
        let edge = topo.edge(eid)?;
        if edge.left_face == face {
            borders.push(edge.coordinates_in_dir(true));
        }
        if edge.right_face == face {
            borders.push(edge.coordinates_in_dir(false));
        }
    }
    if borders.is_empty() {
        return Err(SpatialError::UnknownFace(face));
    }

    predicate::polygonize(&borders)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: f64, y: f64) -> Coord<f64> {
        Coord { x, y }
    }

    #[test]
    fn get_node_by_point_finds_exact_match() {
        let mut topo = Topology::new("t", 0, 0.0);
        let n = topo.add_iso_node(c(1.0, 1.0)).unwrap();
        assert_eq!(get_node_by_point(&topo, c(1.0, 1.0)), Ok(n));
        assert_eq!(get_node_by_point(&topo, c(2.0, 2.0)), Err(SpatialError::NodeNotFound));
    }

    #[test]
    fn get_face_by_point_defaults_to_universe() {
        let topo = Topology::new("t", 0, 0.0);
        assert_eq!(get_face_by_point(&topo, c(0.0, 0.0)), vec![UNIVERSE_FACE]);
    }

    #[test]
    fn get_face_geometry_recovers_square_shell() {
        let mut topo = Topology::new("t", 0, 0.0);
        let n1 = topo.add_iso_node(c(0.0, 0.0)).unwrap();
        let n2 = topo.add_iso_node(c(10.0, 0.0)).unwrap();
        let n3 = topo.add_iso_node(c(10.0, 10.0)).unwrap();
        let n4 = topo.add_iso_node(c(0.0, 10.0)).unwrap();
        topo.add_edge_mod_face(n1, n2, vec![c(0.0, 0.0), c(10.0, 0.0)]).unwrap();
        topo.add_edge_mod_face(n2, n3, vec![c(10.0, 0.0), c(10.0, 10.0)]).unwrap();
        topo.add_edge_mod_face(n3, n4, vec![c(10.0, 10.0), c(0.0, 10.0)]).unwrap();
        topo.add_edge_mod_face(n4, n1, vec![c(0.0, 10.0), c(0.0, 0.0)]).unwrap();

        let f = topo.face_ids().find(|&f| f != UNIVERSE_FACE).unwrap();
        let shell = get_face_geometry(&topo, f).unwrap();
        assert!(predicate::point_in_poly(c(5.0, 5.0), &shell));
        assert_eq!(get_face_by_point(&topo, c(5.0, 5.0)), vec![f]);
    }
}
