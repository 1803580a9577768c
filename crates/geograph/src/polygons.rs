use geo::{BoundingRect, Centroid, Distance, Euclidean, Intersects, MultiPolygon, Point, Rect};
use rstar::{RTree, RTreeObject, AABB};

use crate::{adj::AdjacencyMatrix, error::GeographError};

/// A bounding box in an R-tree, associated with a MultiPolygon by index.
#[derive(Debug, Clone)]
pub(crate) struct BoundingBox {
    idx: usize, // Index of corresponding MultiPolygon in shapes
    bbox: Rect<f64>,
}

impl RTreeObject for BoundingBox {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.bbox.min().into(), self.bbox.max().into())
    }
}

/// An indexed collection of MultiPolygons with spatial relationships.
#[derive(Debug, Clone)]
pub struct PolygonSet {
    shapes: Vec<MultiPolygon<f64>>,
    rtree: RTree<BoundingBox>,
}

impl PolygonSet {
    /// Construct a PolygonSet from a vector of MultiPolygons.
    /// Fails if any shape is empty, since it cannot be indexed.
    pub fn new(shapes: Vec<MultiPolygon<f64>>) -> Result<Self, GeographError> {
        let boxes = shapes.iter().enumerate()
            .map(|(idx, shape)| shape.bounding_rect()
                .map(|bbox| BoundingBox { idx, bbox })
                .ok_or(GeographError::EmptyGeometry(idx)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { rtree: RTree::bulk_load(boxes), shapes })
    }

    /// Get the number of MultiPolygons.
    #[inline] pub fn len(&self) -> usize { self.shapes.len() }

    /// Check if there are no MultiPolygons.
    #[inline] pub fn is_empty(&self) -> bool { self.shapes.is_empty() }

    /// Get a reference to the list of MultiPolygons.
    #[inline] pub fn shapes(&self) -> &[MultiPolygon<f64>] { &self.shapes }

    /// Consume the set, returning the MultiPolygons.
    #[inline] pub fn into_shapes(self) -> Vec<MultiPolygon<f64>> { self.shapes }

    /// Compute the centroids of all MultiPolygons (NaN for degenerate shapes).
    pub fn centroids(&self) -> Vec<Point<f64>> {
        self.shapes.iter()
            .map(|shape| shape.centroid().unwrap_or(Point::new(f64::NAN, f64::NAN)))
            .collect()
    }

    /// Adjacency of the shapes after buffering each one outward by `tolerance`.
    ///
    /// Two buffered shapes overlap exactly when the originals are within
    /// `2 * tolerance` of each other, so no buffered geometry is materialised:
    /// pairs that already intersect are adjacent, the rest are tested by the
    /// Euclidean distance between the shapes.  Corner-only contact counts.
    pub fn buffered_adjacencies(&self, tolerance: f64) -> Result<AdjacencyMatrix, GeographError> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(GeographError::InvalidTolerance(tolerance))
        }
        let reach = 2.0 * tolerance;

        let mut edges = Vec::new();
        for (i, shape) in self.shapes.iter().enumerate() {
            let Some(rect) = shape.bounding_rect() else { continue };
            let search = AABB::from_corners(
                [rect.min().x - reach, rect.min().y - reach],
                [rect.max().x + reach, rect.max().y + reach],
            );

            for cand in self.rtree.locate_in_envelope_intersecting(&search) {
                let j = cand.idx;
                if j <= i { continue } // check each unordered pair once

                let other = &self.shapes[j];
                if shape.intersects(other) {
                    edges.push((i as u32, j as u32));
                    continue
                }

                if Euclidean.distance(shape, other) <= reach {
                    edges.push((i as u32, j as u32));
                }
            }
        }

        Ok(AdjacencyMatrix::from_edges(self.shapes.len(), edges))
    }
}
