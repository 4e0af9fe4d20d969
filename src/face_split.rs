//! The face splitter (§4.5): invoked after an edge insertion that may have
//! closed a new ring, allocates the bounded face enclosed by that ring and
//! reassigns ownership of every edge/node the ring now encloses.
//!
//! No teacher module mutates a built `Dcel` (`Region`'s builders in the
//! teacher workspace are all `todo!()` stubs), so this is grounded on the
//! spec's own step-by-step algorithm description, written as an ordinary
//! inherent method in the teacher's builder-method style (`Dcel::add_face`,
//! `set_next`).

use geo::Coord;
use log::debug;

use crate::events::Event;
use crate::ids::{FaceId, UNIVERSE_FACE};
use crate::model::{DirectedEdge, Face};
use crate::predicate;
use crate::ring::{self, RingProbe};
use crate::store::Topology;

/// Whether a newly-closed ring's bounded interior keeps the split face's
/// existing id ("mod-face") or is allocated a fresh one ("new-face").
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SplitMode {
    NewFace,
    ModFace,
}

/// Outcome of a single face-splitter invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SplitOutcome {
    /// No ring closed on this side, or the ring closed but represents the
    /// exterior boundary of the universe (rejected per §4.5 step 2).
    NoSplit,
    /// A new bounded face was created (or the id reused, in mod-face mode).
    Split(FaceId),
}

/// Run the face splitter on the ring starting at `start`, per §4.5.
pub fn split_face(topo: &mut Topology, start: DirectedEdge, mode: SplitMode) -> SplitOutcome {
    let ring_dirs = match ring::probe_ring(topo, start) {
        RingProbe::NotClosed(_) => return SplitOutcome::NoSplit,
        RingProbe::Closed(dirs) => dirs,
    };

    let old_face = topo.edge(start.0).expect("ring start edge must exist").face(start.1);

    let mut ring_coords: Vec<Coord<f64>> = Vec::new();
    for &(eid, dir) in &ring_dirs {
        let edge = topo.edge(eid).expect("ring edge must exist");
        let cs = edge.coordinates_in_dir(dir);
        if ring_coords.is_empty() {
            ring_coords.extend(cs);
        } else {
            ring_coords.extend(cs.into_iter().skip(1));
        }
    }
    let first = ring_coords[0];
    let last = *ring_coords.last().unwrap();
    if first.x != last.x || first.y != last.y {
        ring_coords.push(first);
    }

    let area = predicate::signed_area(&ring_coords);
    // area > 0 => clockwise (this kernel's convention). A clockwise ring
    // bounding the universe describes the universe's own exterior shell,
    // not a new bounded interior; reject it so the companion invocation on
    // the other side (which finds the counter-clockwise ring) does the
    // actual split.
    if area > 0.0 && old_face == UNIVERSE_FACE {
        debug!("face splitter: clockwise ring in universe, rejecting split for {:?}", start);
        return SplitOutcome::NoSplit;
    }

    let new_face = match mode {
        SplitMode::NewFace => topo.alloc_face_id(),
        SplitMode::ModFace => old_face,
    };

    let ring_bbox = Topology::ring_bbox(&ring_coords);

    // Step 4: reassign ring edges, then other nearby edges whose interior
    // point falls inside the new ring.
    let candidates: Vec<_> = topo.edge_index.search(&ring_bbox).iter().map(|b| b.id).collect();
    for eid in candidates {
        let is_ring_member = ring_dirs.iter().any(|&(rid, _)| rid == eid);
        if is_ring_member {
            continue;
        }
        let edge = topo.edge(eid).expect("candidate edge must exist");
        let interior = interior_point(&edge.coordinates);
        if predicate::point_in_poly(interior, &ring_coords) {
            let (left, right) = (edge.left_face, edge.right_face);
            let mut updated = edge.clone();
            if left == old_face {
                updated.left_face = new_face;
            }
            if right == old_face {
                updated.right_face = new_face;
            }
            *topo.edge_mut(eid).expect("candidate edge must exist") = updated;
        }
    }
    for &(rid, rdir) in &ring_dirs {
        topo.edge_mut(rid).expect("ring edge must exist").set_face(rdir, new_face);
    }

    // Step 5: isolated nodes inside the new ring.
    let node_candidates: Vec<_> = topo.node_index.search(&ring_bbox).iter().map(|b| b.id).collect();
    for nid in node_candidates {
        let node = topo.node(nid).expect("candidate node must exist");
        if node.face == Some(old_face) && predicate::point_in_poly(node.coordinate, &ring_coords) {
            topo.node_mut(nid).expect("candidate node must exist").face = Some(new_face);
        }
    }

    // Step 6: insert the new face (no-op on the store if mod-face reused an
    // existing id; the index entry is still (re)inserted with the fresh
    // bounding box).
    if mode == SplitMode::NewFace {
        let idx = new_face.0 as usize;
        if topo.faces.len() <= idx {
            topo.faces.resize(idx + 1, None);
            topo.face_bounds.resize(idx + 1, None);
        }
        topo.faces[idx] = Some(Face { id: new_face });
    }
    topo.face_bounds[new_face.0 as usize] = Some(ring_bbox);
    topo.face_index.insert(new_face, ring_bbox);

    // Step 7: emit addface(f'), unconditionally — even in mod-face mode,
    // where f' reuses the old id, the splitter still produced a face record
    // with a freshly (re)computed shell and bounding box.
    topo.events.emit(Event::AddFace(new_face));

    debug!("face splitter: allocated face {:?} (mode {:?})", new_face, mode);
    SplitOutcome::Split(new_face)
}

/// A coordinate strictly inside `coordinates` (not equal to an endpoint),
/// used as the sample point for the §4.5 step-4 containment test.
fn interior_point(coordinates: &[Coord<f64>]) -> Coord<f64> {
    if coordinates.len() > 2 {
        coordinates[coordinates.len() / 2]
    } else {
        let a = coordinates[0];
        let b = coordinates[1];
        Coord { x: (a.x + b.x) / 2.0, y: (a.y + b.y) / 2.0 }
    }
}
