use geo::{Coord, LineString, Polygon, Rect};

/// Tile `bounds` with flat-topped hexagons at a `nx` x `ny` resolution.
///
/// The circumradius is chosen so the tiling holds roughly `nx * ny` cells
/// over the bounding box: columns are spaced `1.5 r` apart and rows
/// `sqrt(3) r` apart, with odd columns shifted up half a row.  The tiling
/// extends one cell past every side so the whole box is covered.
pub(crate) fn flat_hexagons(bounds: Rect<f64>, nx: usize, ny: usize) -> Vec<Polygon<f64>> {
    assert!(nx > 0 && ny > 0, "tiling resolution must be positive, got {nx}x{ny}");

    let (width, height) = (bounds.width(), bounds.height());
    if !(width > 0.0 && height > 0.0) { return Vec::new() }

    let sqrt3 = 3f64.sqrt();
    let radius_x = width / (1.5 * nx as f64);
    let radius_y = height / (sqrt3 * ny as f64);
    let radius = (radius_x * radius_y).sqrt();

    let dx = 1.5 * radius;
    let dy = sqrt3 * radius;
    let cols = (width / dx).ceil() as i64 + 2;
    let rows = (height / dy).ceil() as i64 + 2;

    let mut hexagons = Vec::with_capacity((cols * (rows + 1)) as usize);
    for col in -1..cols {
        let shift = if col.rem_euclid(2) == 1 { 0.5 } else { 0.0 };
        for row in -1..rows {
            let center = Coord {
                x: bounds.min().x + dx * col as f64,
                y: bounds.min().y + dy * (row as f64 + shift),
            };
            hexagons.push(hexagon(center, radius));
        }
    }

    hexagons
}

/// A flat-topped regular hexagon (vertices at 0°, 60°, …, 300°).
fn hexagon(center: Coord<f64>, radius: f64) -> Polygon<f64> {
    let ring = (0..=6)
        .map(|k| {
            let angle = std::f64::consts::FRAC_PI_3 * (k % 6) as f64;
            Coord { x: center.x + radius * angle.cos(), y: center.y + radius * angle.sin() }
        })
        .collect::<Vec<_>>();

    Polygon::new(LineString::from(ring), vec![])
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Area, BooleanOps, MultiPolygon};

    fn unit_box() -> Rect<f64> {
        Rect::new(Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 1.0 })
    }

    #[test]
    fn hexagons_are_regular_and_flat_topped() {
        let hex = hexagon(Coord { x: 0.0, y: 0.0 }, 2.0);
        let coords = hex.exterior().coords().collect::<Vec<_>>();
        assert_eq!(coords.len(), 7);

        // Top edge is horizontal.
        assert!((coords[1].y - coords[2].y).abs() < 1e-12);

        let expected = 1.5 * 3f64.sqrt() * 4.0;
        assert!((hex.unsigned_area() - expected).abs() < 1e-9);
    }

    #[test]
    fn tiling_covers_the_box() {
        let tiles = flat_hexagons(unit_box(), 4, 4);
        let clipped = tiles.into_iter()
            .map(|tile| MultiPolygon(vec![tile]).intersection(&MultiPolygon(vec![unit_box().to_polygon()])))
            .map(|piece| piece.unsigned_area())
            .sum::<f64>();

        assert!((clipped - 1.0).abs() < 1e-6, "covered area was {clipped}");
    }

    #[test]
    fn finer_resolution_gives_more_cells() {
        assert!(flat_hexagons(unit_box(), 8, 8).len() > flat_hexagons(unit_box(), 4, 4).len());
    }

    #[test]
    fn degenerate_box_yields_no_tiles() {
        let flat = Rect::new(Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 0.0 });
        assert!(flat_hexagons(flat, 2, 2).is_empty());
    }
}
