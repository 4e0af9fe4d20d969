//! The entity model (§3): Node, Edge, Face records.

use geo::Coord;

use crate::ids::{EdgeId, FaceId, NodeId};

/// A node: an isolated point, or the shared endpoint of one or more edges.
#[derive(Clone, Debug)]
pub struct Node {
    pub id: NodeId,
    pub coordinate: Coord<f64>,
    /// Present iff the node is isolated (no incident edge). This field is
    /// the authoritative record of isolation.
    pub face: Option<FaceId>,
}

/// A directed edge together with a direction flag, used by the ring walker
/// and the adjacency resolver. `true` means "traverse the named edge in its
/// stored forward direction (start -> end)".
pub type DirectedEdge = (EdgeId, bool);

/// An edge: a simple polyline between two nodes, with the topology needed
/// to walk the rings on either side of it.
#[derive(Clone, Debug)]
pub struct Edge {
    pub id: EdgeId,
    pub start: NodeId,
    pub end: NodeId,
    /// first == start.coordinate, last == end.coordinate, len >= 2.
    pub coordinates: Vec<Coord<f64>>,
    pub left_face: FaceId,
    pub right_face: FaceId,
    /// The directed edge that continues the ring bounding `left_face` after
    /// traversing this edge forward (start -> end).
    pub next_left: EdgeId,
    pub next_left_dir: bool,
    /// The directed edge that continues the ring bounding `right_face`
    /// after traversing this edge in reverse (end -> start).
    pub next_right: EdgeId,
    pub next_right_dir: bool,
}

impl Edge {
    /// The directed-edge continuation for travelling this edge in `dir`
    /// (true = forward/left side, false = reverse/right side).
    pub fn next(&self, dir: bool) -> DirectedEdge {
        if dir {
            (self.next_left, self.next_left_dir)
        } else {
            (self.next_right, self.next_right_dir)
        }
    }

    /// The face on the named side of this edge.
    pub fn face(&self, dir: bool) -> FaceId {
        if dir {
            self.left_face
        } else {
            self.right_face
        }
    }

    pub fn set_face(&mut self, dir: bool, face: FaceId) {
        if dir {
            self.left_face = face;
        } else {
            self.right_face = face;
        }
    }

    pub fn set_next(&mut self, dir: bool, next: DirectedEdge) {
        if dir {
            self.next_left = next.0;
            self.next_left_dir = next.1;
        } else {
            self.next_right = next.0;
            self.next_right_dir = next.1;
        }
    }

    /// The node this edge leaves from when walked in direction `dir`.
    pub fn origin(&self, dir: bool) -> NodeId {
        if dir {
            self.start
        } else {
            self.end
        }
    }

    /// The node this edge arrives at when walked in direction `dir`.
    pub fn destination(&self, dir: bool) -> NodeId {
        if dir {
            self.end
        } else {
            self.start
        }
    }

    /// The first segment of this edge's polyline as walked in direction
    /// `dir`: the two coordinates nearest `origin(dir)`.
    pub fn first_segment(&self, dir: bool) -> (Coord<f64>, Coord<f64>) {
        if dir {
            (self.coordinates[0], self.coordinates[1])
        } else {
            let n = self.coordinates.len();
            (self.coordinates[n - 1], self.coordinates[n - 2])
        }
    }

    /// The polyline as walked in direction `dir` (reversed if `dir` is false).
    pub fn coordinates_in_dir(&self, dir: bool) -> Vec<Coord<f64>> {
        if dir {
            self.coordinates.clone()
        } else {
            let mut cs = self.coordinates.clone();
            cs.reverse();
            cs
        }
    }
}

/// A face: a bounded region, or (id 0) the unbounded universe. No explicit
/// pointer to bounding edges or contained nodes; membership is recovered by
/// traversal.
#[derive(Clone, Debug)]
pub struct Face {
    pub id: FaceId,
}
