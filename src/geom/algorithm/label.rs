use std::{cmp::Ordering, collections::BinaryHeap};

use geo::{BoundingRect, Centroid, Contains, Coord, Distance, Euclidean, InteriorPoint, MultiPolygon, Point};

/// Signed distance from `p` to the shape's boundary: positive inside.
fn signed_distance(shape: &MultiPolygon<f64>, p: Coord<f64>) -> f64 {
    let p = Point::from(p);
    let distance = shape.0.iter()
        .flat_map(|polygon| std::iter::once(polygon.exterior()).chain(polygon.interiors()))
        .map(|ring| Euclidean.distance(&p, ring))
        .fold(f64::INFINITY, f64::min);
    if shape.contains(&p) { distance } else { -distance }
}

/// A square probe cell of half-width `half` centred on `center`.
#[derive(Copy, Clone)]
struct Probe {
    center: Coord<f64>,
    half: f64,
    distance: f64,
}

impl Probe {
    fn new(shape: &MultiPolygon<f64>, center: Coord<f64>, half: f64) -> Self {
        Self { center, half, distance: signed_distance(shape, center) }
    }

    /// Best distance any point inside this probe could reach.
    #[inline] fn potential(&self) -> f64 { self.distance + self.half * std::f64::consts::SQRT_2 }
}

impl Ord for Probe {
    fn cmp(&self, other: &Self) -> Ordering {
        self.potential().total_cmp(&other.potential())
    }
}

impl PartialOrd for Probe {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl PartialEq for Probe {
    fn eq(&self, other: &Self) -> bool { self.cmp(other) == Ordering::Equal }
}

impl Eq for Probe {}

/// Approximate the centre of the largest circle inscribed in `shape`
/// (its pole of inaccessibility).
///
/// Square probes covering the bounding box are refined best-first until no
/// probe can improve on the current best by more than 0.1% of the shape's
/// extent.  The returned point always lies inside the shape; `None` is
/// returned only for an empty shape.
pub(crate) fn label_point(shape: &MultiPolygon<f64>) -> Option<Point<f64>> {
    let fallback = shape.interior_point();
    let bounds = shape.bounding_rect()?;
    let (width, height) = (bounds.width(), bounds.height());
    let size = width.min(height);
    if !(size > 0.0) { return fallback }

    let precision = 1e-3 * width.max(height);
    let half = size / 2.0;

    let mut heap = BinaryHeap::new();
    let mut x = bounds.min().x;
    while x < bounds.max().x {
        let mut y = bounds.min().y;
        while y < bounds.max().y {
            heap.push(Probe::new(shape, Coord { x: x + half, y: y + half }, half));
            y += size;
        }
        x += size;
    }

    // Seed the search with the centroid and the guaranteed interior point.
    let mut best = [shape.centroid(), fallback].into_iter()
        .flatten()
        .map(|p| Probe::new(shape, p.0, 0.0))
        .max_by(|a, b| a.distance.total_cmp(&b.distance))?;

    while let Some(probe) = heap.pop() {
        if probe.distance > best.distance { best = probe }
        if probe.potential() - best.distance <= precision { continue }

        let quarter = probe.half / 2.0;
        for (dx, dy) in [(-1.0, -1.0), (1.0, -1.0), (-1.0, 1.0), (1.0, 1.0)] {
            let center = Coord { x: probe.center.x + dx * quarter, y: probe.center.y + dy * quarter };
            heap.push(Probe::new(shape, center, quarter));
        }
    }

    if best.distance > 0.0 { Some(Point::from(best.center)) } else { fallback }
}
