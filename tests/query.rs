use geotopology::{query, Topology, UNIVERSE_FACE};

fn c(x: f64, y: f64) -> geo::Coord<f64> {
    geo::Coord { x, y }
}

/// A closed square plus one isolated node sitting inside it and one sitting
/// outside it, shared by several tests below.
fn square_with_isolated_points() -> (Topology, geotopology::NodeId, geotopology::NodeId) {
    let mut topo = Topology::new("t", 0, 0.0);
    let n1 = topo.add_iso_node(c(0.0, 0.0)).unwrap();
    let n2 = topo.add_iso_node(c(10.0, 0.0)).unwrap();
    let n3 = topo.add_iso_node(c(10.0, 10.0)).unwrap();
    let n4 = topo.add_iso_node(c(0.0, 10.0)).unwrap();
    topo.add_edge_mod_face(n1, n2, vec![c(0.0, 0.0), c(10.0, 0.0)]).unwrap();
    topo.add_edge_mod_face(n2, n3, vec![c(10.0, 0.0), c(10.0, 10.0)]).unwrap();
    topo.add_edge_mod_face(n3, n4, vec![c(10.0, 10.0), c(0.0, 10.0)]).unwrap();
    topo.add_edge_mod_face(n4, n1, vec![c(0.0, 10.0), c(0.0, 0.0)]).unwrap();

    let inside = topo.add_iso_node(c(5.0, 5.0)).unwrap();
    let outside = topo.add_iso_node(c(100.0, 100.0)).unwrap();
    (topo, inside, outside)
}

#[test]
fn get_node_by_point_finds_the_exact_node() {
    let (topo, inside, _) = square_with_isolated_points();
    assert_eq!(query::get_node_by_point(&topo, c(5.0, 5.0)).unwrap(), inside);
}

#[test]
fn get_node_by_point_misses_a_nearby_but_distinct_point() {
    let (topo, ..) = square_with_isolated_points();
    assert!(query::get_node_by_point(&topo, c(5.1, 5.1)).is_err());
}

#[test]
fn get_face_by_point_resolves_the_bounded_face_for_an_interior_point() {
    let (topo, ..) = square_with_isolated_points();
    let faces = query::get_face_by_point(&topo, c(5.0, 5.0));
    assert_eq!(faces.len(), 1);
    assert_ne!(faces[0], UNIVERSE_FACE);
}

#[test]
fn get_face_by_point_resolves_the_universe_for_an_exterior_point() {
    let (topo, ..) = square_with_isolated_points();
    let faces = query::get_face_by_point(&topo, c(100.0, 100.0));
    assert_eq!(faces, vec![UNIVERSE_FACE]);
}

#[test]
fn get_face_geometry_recovers_the_square_shell() {
    let (topo, ..) = square_with_isolated_points();
    let face = topo.face_ids().find(|&f| f != UNIVERSE_FACE).unwrap();
    let shell = query::get_face_geometry(&topo, face).unwrap();
    assert_eq!(shell.first(), shell.last());
    assert_eq!(shell.len(), 5);
}

#[test]
fn get_edge_by_point_widens_search_by_tolerance() {
    let (topo, ..) = square_with_isolated_points();
    let hits = query::get_edge_by_point(&topo, c(5.0, 0.05), 0.1);
    assert_eq!(hits.len(), 1);
}
