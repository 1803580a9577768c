use anyhow::{anyhow, Result};
use geo::{Area, BooleanOps, BoundingRect, MultiPolygon};

use crate::{error::HexmapError, geom::flat_hexagons};

/// Cells below this fraction of the median clipped area are slivers.
const SLIVER_FRACTION: f64 = 0.25;

/// The cumulative inflation the sizing loop starts from.
const INITIAL_INFLATION: f64 = 0.75;

/// Growth of the cumulative inflation after each undershoot.
const INFLATION_STEP: f64 = 1.1;

/// Clipped hexagonal cells that exceed the target count.
#[derive(Debug, Clone)]
pub(crate) struct Sizing {
    pub cells: Vec<MultiPolygon<f64>>,
    pub attempts: usize,
    pub resolution: (usize, usize),
}

/// Median of a list of values (mean of the middle pair for even lengths).
fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    match sorted.len() {
        0 => f64::NAN,
        len if len % 2 == 1 => sorted[len / 2],
        len => (sorted[len / 2 - 1] + sorted[len / 2]) / 2.0,
    }
}

/// Tile the boundary at `nx` x `ny`, clip every tile to it, and drop slivers.
fn clipped_cells(boundary: &MultiPolygon<f64>, nx: usize, ny: usize) -> Result<Vec<MultiPolygon<f64>>> {
    let bounds = boundary.bounding_rect()
        .ok_or_else(|| anyhow!("[size_cells] boundary has no extent"))?;

    let pieces = flat_hexagons(bounds, nx, ny).into_iter()
        .map(|tile| MultiPolygon(vec![tile]).intersection(boundary))
        .filter_map(|piece| {
            let area = piece.unsigned_area();
            (area > 0.0).then_some((piece, area))
        })
        .collect::<Vec<_>>();

    let areas = pieces.iter().map(|(_, area)| *area).collect::<Vec<_>>();
    let threshold = SLIVER_FRACTION * median(&areas);

    Ok(pieces.into_iter()
        .filter(|(_, area)| *area >= threshold)
        .map(|(piece, _)| piece)
        .collect())
}

/// Grow the tiling resolution until more than `target_cells` cells survive.
///
/// `aspect` is the height/width ratio that shapes the resolution.  Each
/// attempt tiles at `ceil(sqrt(k * N / a))` x `ceil(sqrt(k * N * a))` for
/// the current cumulative inflation `k`, which starts at 0.75 and grows by
/// 10% after each undershoot.
pub(crate) fn size_cells(
    boundary: &MultiPolygon<f64>,
    aspect: f64,
    target_cells: usize,
    max_attempts: usize,
    verbose: u8,
) -> Result<Sizing> {
    assert!(aspect > 0.0 && aspect.is_finite(), "aspect ratio must be positive, got {aspect}");

    let boundary_area = boundary.unsigned_area();
    let mut inflation = INITIAL_INFLATION;
    let mut best_cells = 0;

    for attempt in 1..=max_attempts {
        let scaled = inflation * target_cells as f64;
        let nx = ((scaled / aspect).sqrt().ceil() as usize).max(1);
        let ny = ((scaled * aspect).sqrt().ceil() as usize).max(1);

        let cells = clipped_cells(boundary, nx, ny)?;
        if cells.is_empty() {
            return Err(HexmapError::NoSurvivingCells { attempt, resolution: (nx, ny), target_cells }.into())
        }

        if verbose > 1 {
            let coverage = cells.iter().map(|cell| cell.unsigned_area()).sum::<f64>() / boundary_area;
            eprintln!("[size_cells] attempt {attempt}: {nx}x{ny} tiling kept {} cells (target {target_cells}, coverage {coverage:.4})",
                cells.len());
        }

        if cells.len() > target_cells {
            return Ok(Sizing { cells, attempts: attempt, resolution: (nx, ny) })
        }

        best_cells = best_cells.max(cells.len());
        inflation *= INFLATION_STEP;
    }

    Err(HexmapError::SizingDidNotConverge { attempts: max_attempts, best_cells, target_cells }.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, Coord, Rect};

    fn rect(width: f64, height: f64) -> MultiPolygon<f64> {
        MultiPolygon(vec![Rect::new(Coord { x: 0.0, y: 0.0 }, Coord { x: width, y: height }).to_polygon()])
    }

    #[test]
    fn median_matches_middle_values() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
        assert!(median(&[]).is_nan());
    }

    #[test]
    fn sizing_exceeds_the_target() {
        let sizing = size_cells(&rect(1.0, 1.0), 1.0, 20, 60, 0).unwrap();
        assert!(sizing.cells.len() > 20);

        let total = sizing.cells.iter().map(|cell| cell.unsigned_area()).sum::<f64>();
        assert!(total <= 1.0 + 1e-9);
    }

    #[test]
    fn slivers_are_dropped() {
        let cells = clipped_cells(&rect(1.0, 1.0), 3, 3).unwrap();
        let areas = cells.iter().map(|cell| cell.unsigned_area()).collect::<Vec<_>>();
        let median = median(&areas);
        assert!(areas.iter().all(|&area| area >= SLIVER_FRACTION * median));
    }

    #[test]
    fn wide_boundaries_get_wide_resolutions() {
        let sizing = size_cells(&rect(4.0, 1.0), 0.25, 16, 60, 0).unwrap();
        assert!(sizing.resolution.0 > sizing.resolution.1);
    }

    #[test]
    fn retry_cap_is_reported() {
        let err = size_cells(&rect(1.0, 1.0), 1.0, 2_000, 1, 0).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<HexmapError>(),
            Some(HexmapError::SizingDidNotConverge { attempts: 1, target_cells: 2_000, .. }),
        ));
    }

    #[test]
    fn empty_boundary_fails() {
        let empty = MultiPolygon::<f64>(vec![]);
        assert!(size_cells(&empty, 1.0, 5, 10, 0).is_err());

        let needle = MultiPolygon(vec![polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 0.0)]]);
        assert!(size_cells(&needle, 1.0, 5, 10, 0).is_err());
    }
}
