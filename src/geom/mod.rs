mod algorithm;

pub use algorithm::Projection;
pub(crate) use algorithm::{bounded_voronoi, flat_hexagons, label_point, union_all, Voronoi};
