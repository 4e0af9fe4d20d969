//! The adjacency resolver (§4.4): for a new directed segment leaving a
//! node, finds the clockwise and counter-clockwise neighboring incident
//! edges (by azimuth) and the faces they bound.
//!
//! Grounded on the teacher's `Dcel::vertex_star` iterator (`dcel.rs`),
//! generalized from "the next outgoing half-edge" (known by construction
//! in a half-edge mesh) to "the azimuth-ordered CW/CCW neighbor", which a
//! freely-positioned node/edge model must compute explicitly.

use std::f64::consts::PI;

use crate::ids::{FaceId, NodeId};
use crate::model::DirectedEdge;
use crate::predicate;
use crate::store::Topology;

/// The existing edges incident to `node`, each tagged with the direction
/// that leaves `node`. A closed edge (start == end == node) contributes
/// both directions.
pub fn incident_edges(topo: &Topology, node: NodeId) -> Vec<DirectedEdge> {
    let mut out = Vec::new();
    for id in topo.edge_ids() {
        let edge = topo.edge(id).expect("edge_ids yields only live edges");
        if edge.start == node {
            out.push((id, true));
        }
        if edge.end == node {
            out.push((id, false));
        }
    }
    out
}

/// Result of resolving the neighbors of a new directed segment leaving a
/// node at azimuth `az`.
#[derive(Debug)]
pub struct AdjacencyResolution {
    pub next_cw: Option<DirectedEdge>,
    pub cw_face: Option<FaceId>,
    pub next_ccw: Option<DirectedEdge>,
    pub ccw_face: Option<FaceId>,
    pub incident: Vec<DirectedEdge>,
}

/// Resolve the CW/CCW neighbors of a new segment leaving `node` at azimuth
/// `az`, among the edges already incident to `node`. When `node` has no
/// other incident edges, `next_cw`/`next_ccw`/both faces are `None` — the
/// caller must determine the bounding face some other way (the common face
/// the isolated node already sits in).
pub fn resolve(topo: &Topology, node: NodeId, az: f64) -> AdjacencyResolution {
    let incident = incident_edges(topo, node);
    if incident.is_empty() {
        return AdjacencyResolution { next_cw: None, cw_face: None, next_ccw: None, ccw_face: None, incident };
    }

    let mut best_cw: Option<(f64, DirectedEdge)> = None;
    let mut best_ccw: Option<(f64, DirectedEdge)> = None;

    for &(eid, dir) in &incident {
        let edge = topo.edge(eid).expect("incident edge must exist");
        let (origin, towards) = edge.first_segment(dir);
        let az_incident = predicate::azimuth(origin, towards).expect("incident edge has a degenerate first segment");
        let azdif = (az_incident - az + 2.0 * PI).rem_euclid(2.0 * PI);

        if azdif > 0.0 && best_cw.map(|(best, _)| azdif < best).unwrap_or(true) {
            best_cw = Some((azdif, (eid, dir)));
        }
        if best_ccw.map(|(best, _)| azdif > best).unwrap_or(true) {
            best_ccw = Some((azdif, (eid, dir)));
        }
    }

    let (cw_dir, cw_face) = best_cw
        .map(|(_, de)| {
            let edge = topo.edge(de.0).unwrap();
            (Some(de), Some(edge.face(de.1)))
        })
        .unwrap_or((None, None));
    let (ccw_dir, ccw_face) = best_ccw
        .map(|(_, de)| {
            let edge = topo.edge(de.0).unwrap();
            (Some(de), Some(edge.face(!de.1)))
        })
        .unwrap_or((None, None));

    // §4.4: cwFace and ccwFace bound the same wedge around `node` (the gap
    // the new segment is inserted into), so a single resolve() call must
    // never see them disagree. Disagreement here is pre-existing topology
    // corruption, not a caller error.
    if let (Some(cw), Some(ccw)) = (cw_face, ccw_face) {
        assert_eq!(cw, ccw, "adjacency resolver: cwFace {:?} and ccwFace {:?} disagree at {:?}: topology is corrupted", cw, ccw, node);
    }

    AdjacencyResolution { next_cw: cw_dir, cw_face, next_ccw: ccw_dir, ccw_face, incident }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;

    fn c(x: f64, y: f64) -> Coord<f64> {
        Coord { x, y }
    }

    #[test]
    fn no_incident_edges_yields_none() {
        let mut topo = Topology::new("t", 0, 0.0);
        let n = topo.add_iso_node(c(0.0, 0.0)).unwrap();
        let res = resolve(&topo, n, 0.0);
        assert!(res.next_cw.is_none());
        assert!(res.next_ccw.is_none());
        assert!(res.incident.is_empty());
    }

    #[test]
    fn single_incident_edge_is_both_cw_and_ccw() {
        let mut topo = Topology::new("t", 0, 0.0);
        let n1 = topo.add_iso_node(c(0.0, 0.0)).unwrap();
        let n2 = topo.add_iso_node(c(0.0, 10.0)).unwrap();
        let e = topo.add_iso_edge(n1, n2, vec![c(0.0, 0.0), c(0.0, 10.0)]).unwrap();
        let res = resolve(&topo, n1, PI / 2.0); // azimuth east, edge goes north (az 0)
        assert_eq!(res.next_cw, Some((e, true)));
        assert_eq!(res.next_ccw, Some((e, true)));
    }
}
