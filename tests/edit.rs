use geotopology::{query, FaceId, SpatialError, Topology, UNIVERSE_FACE};

fn c(x: f64, y: f64) -> geo::Coord<f64> {
    geo::Coord { x, y }
}

/// Checks the seven quantified invariants of §8 against the current state
/// of `topo`. Panics with a description of the first violation found.
fn check_invariants(topo: &Topology) {
    for eid in topo.edge_ids() {
        let edge = topo.edge(eid).unwrap();
        assert_eq!(edge.coordinates[0], topo.node(edge.start).unwrap().coordinate, "edge {eid} start mismatch");
        assert_eq!(
            *edge.coordinates.last().unwrap(),
            topo.node(edge.end).unwrap().coordinate,
            "edge {eid} end mismatch"
        );
        // Rings close in finite steps, both sides.
        assert!(!query::get_ring_edges(topo, (eid, true)).is_empty());
        assert!(!query::get_ring_edges(topo, (eid, false)).is_empty());
        assert!(topo.face_exists(edge.left_face), "edge {eid} left face {:?} missing", edge.left_face);
        assert!(topo.face_exists(edge.right_face), "edge {eid} right face {:?} missing", edge.right_face);
    }

    let mut seen = std::collections::HashSet::new();
    for nid in topo.node_ids() {
        let node = topo.node(nid).unwrap();
        let coord_key = (node.coordinate.x.to_bits(), node.coordinate.y.to_bits());
        assert!(seen.insert(coord_key), "node {nid} coordinate duplicated");

        let incident_count =
            topo.edge_ids().filter(|&eid| { let e = topo.edge(eid).unwrap(); e.start == nid || e.end == nid }).count();
        assert_eq!(node.face.is_some(), incident_count == 0, "node {nid} isolation/face mismatch");

        if let Some(f) = node.face {
            if f != UNIVERSE_FACE {
                let shell = query::get_face_geometry(topo, f).unwrap();
                assert!(
                    geotopology::predicate::point_in_poly(node.coordinate, &shell),
                    "node {nid} not inside its recorded face {:?}",
                    f
                );
            }
        }
    }

    for f in topo.face_ids() {
        if f == UNIVERSE_FACE {
            continue;
        }
        let shell = query::get_face_geometry(topo, f).unwrap();
        assert!(geotopology::predicate::signed_area(&shell) < 0.0, "bounded face {:?} shell is not CCW", f);
    }

    // No two edges touch other than at a shared endpoint node.
    let edge_ids: Vec<_> = topo.edge_ids().collect();
    for i in 0..edge_ids.len() {
        for j in (i + 1)..edge_ids.len() {
            let e1 = topo.edge(edge_ids[i]).unwrap();
            let e2 = topo.edge(edge_ids[j]).unwrap();
            let shares_node = e1.start == e2.start || e1.start == e2.end || e1.end == e2.start || e1.end == e2.end;
            let rel = geotopology::predicate::relate(&e1.coordinates, &e2.coordinates);
            assert!(!rel.is_coincident(), "edges {} and {} are coincident", edge_ids[i], edge_ids[j]);
            assert!(!rel.crosses(), "edges {} and {} cross", edge_ids[i], edge_ids[j]);
            if !shares_node {
                assert!(
                    !rel.properly_intersects(),
                    "edges {} and {} touch away from a shared endpoint",
                    edge_ids[i],
                    edge_ids[j]
                );
            }
        }
    }
}

/// A topology with a single closed square (one bounded face) and its four
/// corner nodes, shared by several tests below.
///
/// ```
/// n4----n3
/// |      |
/// n1----n2
/// ```
fn square() -> (Topology, [geotopology::NodeId; 4], FaceId) {
    let mut topo = Topology::new("t", 4326, 0.0);
    let n1 = topo.add_iso_node(c(0.0, 0.0)).unwrap();
    let n2 = topo.add_iso_node(c(10.0, 0.0)).unwrap();
    let n3 = topo.add_iso_node(c(10.0, 10.0)).unwrap();
    let n4 = topo.add_iso_node(c(0.0, 10.0)).unwrap();

    topo.add_edge_mod_face(n1, n2, vec![c(0.0, 0.0), c(10.0, 0.0)]).unwrap();
    topo.add_edge_mod_face(n2, n3, vec![c(10.0, 0.0), c(10.0, 10.0)]).unwrap();
    topo.add_edge_mod_face(n3, n4, vec![c(10.0, 10.0), c(0.0, 10.0)]).unwrap();
    topo.add_edge_mod_face(n4, n1, vec![c(0.0, 10.0), c(0.0, 0.0)]).unwrap();

    let face = topo.face_ids().find(|&f| f != UNIVERSE_FACE).unwrap();
    (topo, [n1, n2, n3, n4], face)
}

#[test]
fn closing_the_square_leaves_exactly_one_bounded_face() {
    let (topo, _, _) = square();
    assert_eq!(topo.num_bounded_faces(), 1);
    assert_eq!(topo.num_nodes(), 4);
    assert_eq!(topo.num_edges(), 4);
    check_invariants(&topo);
}

#[test]
fn adding_a_diagonal_splits_the_square_into_two_faces() {
    let (mut topo, [n1, _, n3, _], _) = square();
    topo.add_edge_new_faces(n1, n3, vec![c(0.0, 0.0), c(10.0, 10.0)]).unwrap();
    assert_eq!(topo.num_bounded_faces(), 2);
    check_invariants(&topo);
}

#[test]
fn removing_the_diagonal_heals_the_two_faces_back_into_one() {
    let (mut topo, [n1, _, n3, _], _) = square();
    let diagonal = topo.add_edge_new_faces(n1, n3, vec![c(0.0, 0.0), c(10.0, 10.0)]).unwrap();
    assert_eq!(topo.num_bounded_faces(), 2);
    topo.rem_edge_mod_face(diagonal).unwrap();
    assert_eq!(topo.num_bounded_faces(), 1);
    check_invariants(&topo);
}

#[test]
fn removing_the_diagonal_new_face_allocates_a_fresh_id() {
    let (mut topo, [n1, _, n3, _], original_face) = square();
    let diagonal = topo.add_edge_new_faces(n1, n3, vec![c(0.0, 0.0), c(10.0, 10.0)]).unwrap();
    topo.rem_edge_new_face(diagonal).unwrap();
    assert_eq!(topo.num_bounded_faces(), 1);
    let survivor = topo.face_ids().find(|&f| f != UNIVERSE_FACE).unwrap();
    assert_ne!(survivor, original_face);
    check_invariants(&topo);
}

#[test]
fn splitting_an_edge_inserts_an_interior_node_and_shortens_the_edge() {
    let mut topo = Topology::new("t", 0, 0.0);
    let n1 = topo.add_iso_node(c(0.0, 0.0)).unwrap();
    let n2 = topo.add_iso_node(c(10.0, 0.0)).unwrap();
    let e = topo.add_iso_edge(n1, n2, vec![c(0.0, 0.0), c(10.0, 0.0)]).unwrap();

    let mid = topo.mod_edge_split(e, c(5.0, 0.0)).unwrap();
    assert_eq!(topo.num_nodes(), 3);
    assert_eq!(topo.num_edges(), 2);
    assert_eq!(topo.node(mid).unwrap().coordinate, c(5.0, 0.0));
    check_invariants(&topo);
}

#[test]
fn healing_back_a_split_edge_restores_the_original_shape() {
    let mut topo = Topology::new("t", 0, 0.0);
    let n1 = topo.add_iso_node(c(0.0, 0.0)).unwrap();
    let n2 = topo.add_iso_node(c(10.0, 0.0)).unwrap();
    let e = topo.add_iso_edge(n1, n2, vec![c(0.0, 0.0), c(10.0, 0.0)]).unwrap();
    topo.mod_edge_split(e, c(5.0, 0.0)).unwrap();
    assert_eq!(topo.num_edges(), 2);

    let other = topo.edge_ids().find(|&id| id != e).unwrap();
    let healed = topo.mod_edge_heal(e, other).unwrap();
    assert_eq!(topo.num_edges(), 1);
    assert_eq!(topo.num_nodes(), 2);
    assert_eq!(healed, e);
    check_invariants(&topo);
}

#[test]
fn iso_edge_between_nodes_in_different_faces_is_rejected() {
    let (mut topo, ..) = square();
    let inside = topo.add_iso_node(c(5.0, 5.0)).unwrap();
    let outside = topo.add_iso_node(c(100.0, 100.0)).unwrap();
    let result = topo.add_iso_edge(inside, outside, vec![c(5.0, 5.0), c(100.0, 100.0)]);
    assert!(matches!(result, Err(SpatialError::EndpointsInDifferentFaces(_, _))));
}

#[test]
fn connecting_edge_that_touches_an_unrelated_edges_interior_is_rejected() {
    // A T-junction: the new edge's path touches the bottom side of the
    // square at (5, 0), a point strictly interior to that edge (not one of
    // its nodes), without crossing through it. This is not a shared
    // endpoint of either polyline, so it must still be rejected.
    let (mut topo, ..) = square();
    let a = topo.add_iso_node(c(1.0, 1.0)).unwrap();
    let b = topo.add_iso_node(c(9.0, 9.0)).unwrap();
    let before = topo.num_edges();
    let result = topo.add_edge_mod_face(a, b, vec![c(1.0, 1.0), c(5.0, 0.0), c(9.0, 9.0)]);
    assert!(matches!(result, Err(SpatialError::GeometryIntersectsEdge(_))));
    assert_eq!(topo.num_edges(), before);
}

#[test]
fn removing_an_isolated_node_that_gained_incident_edges_is_rejected() {
    let mut topo = Topology::new("t", 0, 0.0);
    let n1 = topo.add_iso_node(c(0.0, 0.0)).unwrap();
    let n2 = topo.add_iso_node(c(10.0, 0.0)).unwrap();
    topo.add_iso_edge(n1, n2, vec![c(0.0, 0.0), c(10.0, 0.0)]).unwrap();
    assert_eq!(topo.remove_iso_node(n1), Err(SpatialError::NotIsolated(n1)));
}

#[test]
fn healing_edges_that_share_no_endpoint_is_rejected() {
    let mut topo = Topology::new("t", 0, 0.0);
    let n1 = topo.add_iso_node(c(0.0, 0.0)).unwrap();
    let n2 = topo.add_iso_node(c(10.0, 0.0)).unwrap();
    let n3 = topo.add_iso_node(c(100.0, 0.0)).unwrap();
    let n4 = topo.add_iso_node(c(110.0, 0.0)).unwrap();
    let e1 = topo.add_iso_edge(n1, n2, vec![c(0.0, 0.0), c(10.0, 0.0)]).unwrap();
    let e2 = topo.add_iso_edge(n3, n4, vec![c(100.0, 0.0), c(110.0, 0.0)]).unwrap();
    assert_eq!(topo.mod_edge_heal(e1, e2), Err(SpatialError::HealEndpointMismatch(e1, e2)));
}

#[test]
fn events_fire_for_every_primitive_in_order() {
    use geotopology::Event;
    use std::cell::RefCell;
    use std::rc::Rc;

    let mut topo = Topology::new("t", 0, 0.0);
    let log: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    topo.on(move |ev| {
        sink.borrow_mut().push(match ev {
            Event::AddNode(_) => "add_node",
            Event::RemoveNode(_) => "remove_node",
            Event::AddEdge(_) => "add_edge",
            Event::ModEdge(_) => "mod_edge",
            Event::RemoveEdge(_) => "remove_edge",
            Event::AddFace(_) => "add_face",
            Event::RemoveFace(_) => "remove_face",
        });
    });

    let n1 = topo.add_iso_node(c(0.0, 0.0)).unwrap();
    let n2 = topo.add_iso_node(c(10.0, 0.0)).unwrap();
    topo.add_iso_edge(n1, n2, vec![c(0.0, 0.0), c(10.0, 0.0)]).unwrap();

    assert_eq!(*log.borrow(), vec!["add_node", "add_node", "add_edge"]);
}
