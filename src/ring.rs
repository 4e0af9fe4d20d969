//! The ring walker (§4.3): given a starting directed edge, enumerates the
//! ordered set of directed edges bounding the face on that side by
//! following `nextLeft`/`nextRight` links. Pure function; no mutation.
//!
//! Grounded on the teacher's `Dcel::face_cycle` iterator (`dcel.rs`),
//! generalized from a single `next` link per half-edge to the spec's
//! separate `nextLeft`/`nextRight` pair per (undirected) edge.

use crate::model::DirectedEdge;
use crate::store::Topology;

/// Walk the ring starting at `start`, following `nextLeft` if `start.1` is
/// true, else `nextRight`. Stops when `start` is revisited. Bounded by
/// `2 * num_edges` steps — exceeding that indicates a corrupted topology,
/// which is a programming-error panic, not a `SpatialError` (§7, §9).
pub fn ring_edges(topo: &Topology, start: DirectedEdge) -> Vec<DirectedEdge> {
    let bound = topo.num_edges() * 2 + 2;
    let mut result = Vec::new();
    let mut current = start;
    loop {
        result.push(current);
        let edge = topo.edge(current.0).expect("ring walker: dangling edge id");
        let next = edge.next(current.1);
        if next == start {
            return result;
        }
        assert!(
            result.len() <= bound,
            "ring starting at {:?} does not close within {} steps: topology is corrupted",
            start,
            bound
        );
        current = next;
    }
}

/// Outcome of probing whether a just-linked ring actually closes.
#[derive(Debug)]
pub enum RingProbe {
    /// The walk returned to `start` in the same direction: a ring closed.
    Closed(Vec<DirectedEdge>),
    /// The walk returned to `start` in the *opposite* direction: no ring
    /// was closed by this insertion (§4.5 step 1).
    NotClosed(Vec<DirectedEdge>),
}

/// Like `ring_edges`, but distinguishes "closed in the same direction" from
/// "wound back on itself in the opposite direction" — the face splitter's
/// signal for whether an edge insertion closed a new ring.
pub fn probe_ring(topo: &Topology, start: DirectedEdge) -> RingProbe {
    let bound = topo.num_edges() * 2 + 2;
    let opposite = (start.0, !start.1);
    let mut result = Vec::new();
    let mut current = start;
    loop {
        result.push(current);
        let edge = topo.edge(current.0).expect("ring walker: dangling edge id");
        let next = edge.next(current.1);
        if next == start {
            return RingProbe::Closed(result);
        }
        if next == opposite {
            return RingProbe::NotClosed(result);
        }
        assert!(
            result.len() <= bound,
            "ring starting at {:?} does not resolve within {} steps: topology is corrupted",
            start,
            bound
        );
        current = next;
    }
}
