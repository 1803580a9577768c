use std::collections::VecDeque;

use geo::Coord;
use rstar::{primitives::GeomWithData, RTree};

use crate::adj::AdjacencyMatrix;

/// Connected-component labelling of an adjacency matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Components {
    /// `labels[u]` is the component of unit `u`, numbered in order of first appearance.
    labels: Vec<u32>,
    /// `sizes[c]` is the number of units in component `c`.
    sizes: Vec<usize>,
}

impl Components {
    /// Number of components.
    #[inline] pub fn count(&self) -> usize { self.sizes.len() }

    /// Component label of each unit.
    #[inline] pub fn labels(&self) -> &[u32] { &self.labels }

    /// Size of each component.
    #[inline] pub fn sizes(&self) -> &[usize] { &self.sizes }

    /// Units belonging to a given component, in ascending order.
    pub fn members(&self, component: u32) -> Vec<u32> {
        self.labels.iter().enumerate()
            .filter_map(|(u, &c)| (c == component).then_some(u as u32))
            .collect()
    }

    /// The smallest component (lowest label wins ties), if any.
    pub fn smallest(&self) -> Option<u32> {
        self.sizes.iter().enumerate()
            .min_by_key(|&(c, &size)| (size, c))
            .map(|(c, _)| c as u32)
    }
}

/// Label the connected components of `adj` by breadth-first search.
pub fn connected_components(adj: &AdjacencyMatrix) -> Components {
    let mut labels = vec![u32::MAX; adj.num_units()];
    let mut sizes = Vec::new();

    for start in 0..adj.num_units() {
        if labels[start] != u32::MAX { continue }

        let component = sizes.len() as u32;
        let mut size = 0;
        labels[start] = component;
        let mut queue = VecDeque::from([start]);
        while let Some(u) = queue.pop_front() {
            size += 1;
            for &v in adj.neighbors(u) {
                if labels[v as usize] == u32::MAX {
                    labels[v as usize] = component;
                    queue.push_back(v as usize);
                }
            }
        }
        sizes.push(size);
    }

    Components { labels, sizes }
}

/// Suggest the cheapest edge joining `component` to any other component:
/// the pair `(inside, outside, distance)` whose representative points are
/// closest.  Units with non-finite points are never suggested.
///
/// Returns `None` when no unit outside the component has a usable point.
pub fn suggest_connection(components: &Components, component: u32, points: &[Coord<f64>]) -> Option<(u32, u32, f64)> {
    assert_eq!(points.len(), components.labels.len(),
        "points.len() ({}) must equal number of units ({})", points.len(), components.labels.len());

    let finite = |p: &Coord<f64>| p.x.is_finite() && p.y.is_finite();

    let outside = RTree::bulk_load(
        components.labels.iter().enumerate()
            .filter(|&(u, &c)| c != component && finite(&points[u]))
            .map(|(u, _)| GeomWithData::new([points[u].x, points[u].y], u as u32))
            .collect()
    );

    components.labels.iter().enumerate()
        .filter(|&(u, &c)| c == component && finite(&points[u]))
        .filter_map(|(u, _)| {
            let query = [points[u].x, points[u].y];
            outside.nearest_neighbor(&query).map(|nearest| {
                let [x, y] = *nearest.geom();
                (u as u32, nearest.data, (x - query[0]).hypot(y - query[1]))
            })
        })
        .min_by(|a, b| a.2.total_cmp(&b.2).then(a.0.cmp(&b.0)))
}
