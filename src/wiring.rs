//! Shared next*-pointer splicing used when an edge is inserted at a node
//! that may already have other incident edges (§4.4, §4.7 P4).
//!
//! The adjacency resolver only tells us *which* existing directed edge is
//! angularly nearest; splicing a new edge into the rotation also requires
//! redirecting whichever existing directed edge used to point at that
//! neighbor, so the new edge takes its place in the ring. This file is the
//! generalization of the teacher's `Dcel::set_next` (`dcel.rs`) — a single
//! link mutation there — to "insert a link into an existing cycle".

use crate::adjacency::AdjacencyResolution;
use crate::model::DirectedEdge;
use crate::store::Topology;

/// Find the directed edge whose `next` pointer (on either side) currently
/// equals `target`.
pub(crate) fn find_predecessor(topo: &Topology, target: DirectedEdge) -> Option<DirectedEdge> {
    for id in topo.edge_ids() {
        let e = topo.edge(id).expect("edge_ids yields only live edges");
        if e.next(true) == target {
            return Some((id, true));
        }
        if e.next(false) == target {
            return Some((id, false));
        }
    }
    None
}

/// Splice `new_slot` (a directed edge referring to the edge being
/// inserted) into the rotation described by `resolution`. Returns the value
/// `new_slot`'s own next-pointer should take (the old target `new_slot` is
/// replacing), or `new_slot` itself (self-loop) if the node had no other
/// incident edges.
pub(crate) fn splice_in(topo: &mut Topology, resolution: &AdjacencyResolution, new_slot: DirectedEdge) -> DirectedEdge {
    match resolution.next_cw {
        None => new_slot,
        Some(target) => {
            let (pred_id, pred_dir) =
                find_predecessor(topo, target).expect("adjacency neighbor has no predecessor: topology is corrupted");
            topo.edge_mut(pred_id).expect("predecessor edge must exist").set_next(pred_dir, new_slot);
            target
        }
    }
}

/// Undo a splice: given the directed edge being removed (`old_slot`) and
/// the value its next-pointer held (`successor`), redirect whoever pointed
/// at `old_slot` to point at `successor` instead, restoring the ring to
/// what it would be without `old_slot`. Returns the predecessor that was
/// repointed, or `None` if `old_slot` was self-referencing (no predecessor
/// to fix — it was the sole member of its ring).
pub(crate) fn splice_out(topo: &mut Topology, old_slot: DirectedEdge, successor: DirectedEdge) -> Option<DirectedEdge> {
    if successor == old_slot {
        return None;
    }
    match find_predecessor(topo, old_slot) {
        Some((pred_id, pred_dir)) => {
            topo.edge_mut(pred_id).expect("predecessor edge must exist").set_next(pred_dir, successor);
            Some((pred_id, pred_dir))
        }
        None => None,
    }
}
