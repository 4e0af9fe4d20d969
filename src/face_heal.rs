//! The face healer (§4.6): invoked after an edge removal merges the two
//! faces that bordered it, reassigning every reference to the surviving
//! face and retiring the one(s) that no longer exist.
//!
//! Companion to [`crate::face_split`]; same grounding rationale (no teacher
//! counterpart, built from the spec's own algorithm description).

use geo::Rect;
use log::debug;

use crate::events::Event;
use crate::ids::{FaceId, UNIVERSE_FACE};
use crate::model::Face;
use crate::store::Topology;

/// Whether the merge keeps the right face's id ("mod-face") or allocates a
/// fresh id for the merged result ("new-face").
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HealMode {
    NewFace,
    ModFace,
}

/// Merge `left` and `right` (the two faces bordering a just-removed edge)
/// per §4.6, returning the id of the surviving face.
pub fn heal_faces(topo: &mut Topology, left: FaceId, right: FaceId, mode: HealMode) -> FaceId {
    if left == right {
        return left;
    }
    if left == UNIVERSE_FACE || right == UNIVERSE_FACE {
        let destroyed: Vec<FaceId> = [left, right].into_iter().filter(|&f| f != UNIVERSE_FACE).collect();
        reassign_and_delete(topo, &destroyed, UNIVERSE_FACE);
        return UNIVERSE_FACE;
    }

    match mode {
        HealMode::ModFace => {
            let union_bbox = union_bounds(topo, left, right);
            reassign_and_delete(topo, &[left], right);
            if let Some(old_bbox) = topo.face_bounds[right.0 as usize] {
                topo.face_index.remove(right, old_bbox);
            }
            if let Some(bbox) = union_bbox {
                topo.face_index.insert(right, bbox);
            }
            topo.face_bounds[right.0 as usize] = union_bbox;
            debug!("face healer: {:?} merged into {:?} (mod-face)", left, right);
            right
        }
        HealMode::NewFace => {
            let union_bbox = union_bounds(topo, left, right);
            let survivor = topo.alloc_face_id();
            let idx = survivor.0 as usize;
            if topo.faces.len() <= idx {
                topo.faces.resize(idx + 1, None);
                topo.face_bounds.resize(idx + 1, None);
            }
            topo.faces[idx] = Some(Face { id: survivor });
            reassign_and_delete(topo, &[left, right], survivor);
            topo.face_bounds[idx] = union_bbox;
            if let Some(bbox) = union_bbox {
                topo.face_index.insert(survivor, bbox);
            }
            topo.events.emit(Event::AddFace(survivor));
            debug!("face healer: {:?} and {:?} merged into new face {:?}", left, right, survivor);
            survivor
        }
    }
}

fn union_bounds(topo: &Topology, a: FaceId, b: FaceId) -> Option<Rect<f64>> {
    let ba = topo.face_bounds.get(a.0 as usize).copied().flatten();
    let bb = topo.face_bounds.get(b.0 as usize).copied().flatten();
    match (ba, bb) {
        (Some(x), Some(y)) => {
            let min = geo::Coord { x: x.min().x.min(y.min().x), y: x.min().y.min(y.min().y) };
            let max = geo::Coord { x: x.max().x.max(y.max().x), y: x.max().y.max(y.max().y) };
            Some(Rect::new(min, max))
        }
        (Some(x), None) => Some(x),
        (None, Some(y)) => Some(y),
        (None, None) => None,
    }
}

fn reassign_and_delete(topo: &mut Topology, destroyed: &[FaceId], survivor: FaceId) {
    let edge_ids: Vec<_> = topo.edge_ids().collect();
    for eid in edge_ids {
        let edge = topo.edge_mut(eid).expect("edge_ids yields only live edges");
        if destroyed.contains(&edge.left_face) {
            edge.left_face = survivor;
        }
        if destroyed.contains(&edge.right_face) {
            edge.right_face = survivor;
        }
    }
    let node_ids: Vec<_> = topo.node_ids().collect();
    for nid in node_ids {
        let node = topo.node_mut(nid).expect("node_ids yields only live nodes");
        if let Some(f) = node.face {
            if destroyed.contains(&f) {
                node.face = Some(survivor);
            }
        }
    }
    for &f in destroyed {
        if f == survivor {
            continue;
        }
        if let Some(bbox) = topo.face_bounds.get(f.0 as usize).copied().flatten() {
            topo.face_index.remove(f, bbox);
        }
        topo.faces[f.0 as usize] = None;
        topo.face_bounds[f.0 as usize] = None;
        topo.events.emit(Event::RemoveFace(f));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_face_on_both_sides_is_a_no_op() {
        let mut topo = Topology::new("t", 0, 0.0);
        let f = FaceId(3);
        assert_eq!(heal_faces(&mut topo, f, f, HealMode::ModFace), f);
    }

    #[test]
    fn universe_always_survives() {
        let mut topo = Topology::new("t", 0, 0.0);
        topo.faces.resize(2, None);
        topo.face_bounds.resize(2, None);
        topo.faces[1] = Some(Face { id: FaceId(1) });
        let survivor = heal_faces(&mut topo, UNIVERSE_FACE, FaceId(1), HealMode::ModFace);
        assert_eq!(survivor, UNIVERSE_FACE);
        assert!(!topo.face_exists(FaceId(1)));
    }
}
