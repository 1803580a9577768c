mod label;
mod proj;
mod tiling;
mod voronoi;

use geo::{BooleanOps, MultiPolygon};

pub use proj::Projection;
pub(crate) use label::label_point;
pub(crate) use tiling::flat_hexagons;
pub(crate) use voronoi::{bounded_voronoi, Voronoi};

/// Dissolve a collection of MultiPolygons into one, pairwise in a balanced
/// tree so intermediate shapes stay small.
pub(crate) fn union_all(mut shapes: Vec<MultiPolygon<f64>>) -> MultiPolygon<f64> {
    while shapes.len() > 1 {
        shapes = shapes.chunks(2)
            .map(|pair| match pair {
                [a, b] => a.union(b),
                [a] => a.clone(),
                _ => unreachable!("chunks(2) yields one or two shapes"),
            })
            .collect();
    }
    shapes.pop().unwrap_or_else(|| MultiPolygon(vec![]))
}
