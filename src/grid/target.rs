use anyhow::{Context, Result};
use geo::{Area, Coord, MultiPolygon};
use geograph::{AdjacencyMatrix, PolygonSet};

/// The real districts a grid partition is compared against: district
/// `i` (1-based) is entry `i - 1` of every table.
#[derive(Debug, Clone)]
pub struct TargetData {
    centroids: Vec<Coord<f64>>,
    adjacency: AdjacencyMatrix,
    weights: Vec<f64>,
}

impl TargetData {
    /// Target data from known centroids and adjacency, with equal weights.
    pub fn new(centroids: Vec<Coord<f64>>, adjacency: AdjacencyMatrix) -> Self {
        assert_eq!(centroids.len(), adjacency.num_units(),
            "adjacency must have one unit per district ({} != {})", adjacency.num_units(), centroids.len());
        assert!(!centroids.is_empty(), "target data needs at least one district");

        let weights = vec![1.0 / centroids.len() as f64; centroids.len()];
        Self { centroids, adjacency, weights }
    }

    /// Derive target data from planar district shapes.
    ///
    /// Adjacency is computed after buffering each shape by `tolerance`, which
    /// closes precision gaps along shared borders; centroids and weights use
    /// the unbuffered shapes.
    pub fn from_districts(districts: &[MultiPolygon<f64>], tolerance: f64) -> Result<Self> {
        let set = PolygonSet::new(districts.to_vec())
            .context("[TargetData] cannot index district shapes")?;
        let adjacency = set.buffered_adjacencies(tolerance)
            .context("[TargetData] failed to relate district shapes")?;

        let centroids = set.centroids().into_iter().map(|p| p.0).collect::<Vec<_>>();
        let areas = set.shapes().iter().map(|shape| shape.unsigned_area()).collect::<Vec<_>>();
        let total = areas.iter().sum::<f64>();

        let mut target = Self::new(centroids, adjacency);
        if total > 0.0 {
            target.weights = areas.into_iter().map(|area| area / total).collect();
        }
        Ok(target)
    }

    /// Get the number of districts `n`.
    #[inline] pub fn len(&self) -> usize { self.centroids.len() }

    /// Target data always holds at least one district.
    #[inline] pub fn is_empty(&self) -> bool { self.centroids.is_empty() }

    /// Get each district's unbuffered centroid.
    #[inline] pub fn centroids(&self) -> &[Coord<f64>] { &self.centroids }

    /// Get the buffered adjacency between districts.
    #[inline] pub fn adjacency(&self) -> &AdjacencyMatrix { &self.adjacency }

    /// Get each district's share of the total district area.
    #[inline] pub fn weights(&self) -> &[f64] { &self.weights }
}
