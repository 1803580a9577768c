use geo::{Area, Centroid, Coord, MultiPolygon};
use geograph::{connected_components, AdjacencyMatrix};
use smallvec::SmallVec;

use crate::geom::Projection;

/// One polygon of the approximation grid.
#[derive(Debug, Clone)]
pub struct HexCell {
    id: u32,
    polygon: MultiPolygon<f64>,
    area: f64,
    centroid: Coord<f64>,
    neighbors: SmallVec<[u32; 8]>,
}

impl HexCell {
    /// Stable index of this cell within its grid.
    #[inline] pub fn id(&self) -> u32 { self.id }

    /// Cell geometry in the grid's planar coordinate system.
    #[inline] pub fn polygon(&self) -> &MultiPolygon<f64> { &self.polygon }

    /// Planar area of the cell.
    #[inline] pub fn area(&self) -> f64 { self.area }

    /// Area-weighted centroid of the cell.
    #[inline] pub fn centroid(&self) -> Coord<f64> { self.centroid }

    /// Ids of adjacent cells, ascending.
    #[inline] pub fn neighbors(&self) -> &[u32] { &self.neighbors }
}

/// A connected, near-uniform tessellation of a boundary into cells.
///
/// Built once per region by [`HexGrid::build`] and read-only afterward.
#[derive(Debug, Clone)]
pub struct HexGrid {
    cells: Vec<HexCell>,
    adjacency: AdjacencyMatrix,
    districts: usize,
    target_cells: usize,
    typical_cell_area: f64,
    components_joined: usize,
    projection: Projection,
}

impl HexGrid {
    /// Assemble a grid from finished cell polygons and their adjacency.
    pub(crate) fn from_parts(
        polygons: Vec<MultiPolygon<f64>>,
        adjacency: AdjacencyMatrix,
        districts: usize,
        projection: Projection,
    ) -> Self {
        assert_eq!(polygons.len(), adjacency.num_units(),
            "adjacency must have one unit per cell ({} != {})", adjacency.num_units(), polygons.len());
        assert!(districts > 0, "a grid needs at least one district");

        let cells = polygons.into_iter().enumerate()
            .map(|(i, polygon)| HexCell {
                id: i as u32,
                area: polygon.unsigned_area(),
                centroid: polygon.centroid()
                    .map(|p| p.0)
                    .unwrap_or(Coord { x: f64::NAN, y: f64::NAN }),
                neighbors: adjacency.neighbors(i).iter().copied().collect(),
                polygon,
            })
            .collect::<Vec<_>>();

        Self {
            target_cells: cells.len(),
            cells,
            adjacency,
            districts,
            typical_cell_area: f64::NAN,
            components_joined: 0,
            projection,
        }
    }

    /// Record the sizing and repair statistics of the build.
    pub(crate) fn with_stats(mut self, target_cells: usize, components_joined: usize, area_bucket: f64) -> Self {
        self.target_cells = target_cells;
        self.components_joined = components_joined;
        self.typical_cell_area = typical_area(self.cells.iter().map(HexCell::area), area_bucket);
        self
    }

    /// Get the cells in id order.
    #[inline] pub fn cells(&self) -> &[HexCell] { &self.cells }

    /// Get the number of cells.
    #[inline] pub fn cell_count(&self) -> usize { self.cells.len() }

    /// Get the cell adjacency graph (a single connected component).
    #[inline] pub fn adjacency(&self) -> &AdjacencyMatrix { &self.adjacency }

    /// Get the number of target districts `n`.
    #[inline] pub fn districts(&self) -> usize { self.districts }

    /// Get the cell count the sizing loop had to exceed.
    #[inline] pub fn target_cells(&self) -> usize { self.target_cells }

    /// Most frequent cell area after bucketing; informational only.
    #[inline] pub fn typical_cell_area(&self) -> f64 { self.typical_cell_area }

    /// Number of edges added to join disconnected parts of the grid.
    #[inline] pub fn components_joined(&self) -> usize { self.components_joined }

    /// Get the projection from input coordinates to the grid's plane.
    #[inline] pub fn projection(&self) -> &Projection { &self.projection }

    /// Centroid of every cell, in id order.
    pub fn centroids(&self) -> Vec<Coord<f64>> {
        self.cells.iter().map(HexCell::centroid).collect()
    }

    /// Returns true if the adjacency graph has exactly one component.
    pub fn is_connected(&self) -> bool {
        connected_components(&self.adjacency).count() == 1
    }
}

/// The most frequent value of `round(area / bucket) * bucket`; the smallest
/// bucket wins ties.  NaN when there are no areas.
pub(crate) fn typical_area(areas: impl IntoIterator<Item = f64>, bucket: f64) -> f64 {
    let mut buckets = areas.into_iter()
        .map(|area| (area / bucket).round() as i64)
        .collect::<Vec<_>>();
    buckets.sort_unstable();

    let mut best = None::<(usize, i64)>;
    for run in buckets.chunk_by(|a, b| a == b) {
        if best.map_or(true, |(count, _)| run.len() > count) {
            best = Some((run.len(), run[0]));
        }
    }
    best.map_or(f64::NAN, |(_, value)| value as f64 * bucket)
}
