// Integration tests for adjacency extraction and component repair:
//   buffered adjacency over a tiling, component labelling, and bridging
//   disconnected pieces until a single component remains.

use geo::{polygon, Centroid, Coord, MultiPolygon};
use geograph::{connected_components, suggest_connection, AdjacencyMatrix, PolygonSet};

fn square(x: f64, y: f64) -> MultiPolygon<f64> {
    MultiPolygon(vec![polygon![
        (x: x, y: y),
        (x: x + 1.0, y: y),
        (x: x + 1.0, y: y + 1.0),
        (x: x, y: y + 1.0),
    ]])
}

/// A 3x3 block of unit squares plus an "island" square two units to the right.
fn block_with_island() -> PolygonSet {
    let mut shapes = (0..3)
        .flat_map(|row| (0..3).map(move |col| square(col as f64, row as f64)))
        .collect::<Vec<_>>();
    shapes.push(square(5.0, 1.0));
    PolygonSet::new(shapes).unwrap()
}

fn centroids(set: &PolygonSet) -> Vec<Coord<f64>> {
    set.shapes().iter().map(|shape| shape.centroid().unwrap().0).collect()
}

#[test]
fn block_interior_square_touches_all_eight_neighbors() {
    let adj = block_with_island().buffered_adjacencies(1e-9).unwrap();
    assert_eq!(adj.degree(4), 8);
    assert_eq!(adj.degree(9), 0);
}

#[test]
fn island_forms_its_own_component() {
    let adj = block_with_island().buffered_adjacencies(1e-9).unwrap();
    let components = connected_components(&adj);
    assert_eq!(components.count(), 2);
    assert_eq!(components.smallest(), Some(1));
    assert_eq!(components.members(1), vec![9]);
}

#[test]
fn repair_loop_reaches_single_component() {
    let set = block_with_island();
    let points = centroids(&set);
    let mut adj = set.buffered_adjacencies(1e-9).unwrap();

    let mut bridges = Vec::new();
    loop {
        let components = connected_components(&adj);
        if components.count() == 1 { break }
        let smallest = components.smallest().unwrap();
        let (a, b, _) = suggest_connection(&components, smallest, &points).unwrap();
        bridges.push((a.min(b), a.max(b)));
        adj = adj.with_edges(&[(a, b)]);
    }

    // The island's nearest block square is the middle of the right column.
    assert_eq!(bridges, vec![(5, 9)]);
    assert_eq!(connected_components(&adj).count(), 1);
}

#[test]
fn large_tolerance_joins_the_island_directly() {
    let adj = block_with_island().buffered_adjacencies(1.0).unwrap();
    assert!(adj.contains(5, 9));
    assert_eq!(connected_components(&adj).count(), 1);
}

#[test]
fn matrix_round_trips_through_lists() {
    let adj = AdjacencyMatrix::from_edges(4, [(0, 1), (1, 2), (2, 3), (3, 0)]);
    assert_eq!(AdjacencyMatrix::from_lists(adj.to_lists()), adj);
}
