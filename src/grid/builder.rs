use anyhow::{Context, Result};
use geo::{Area, BoundingRect, Centroid, Coord, MultiPolygon, Translate};
use geograph::{connected_components, suggest_connection, AdjacencyMatrix, PolygonSet};

use crate::{
    config::{HexmapConfig, InputCrs},
    error::HexmapError,
    geom::{bounded_voronoi, Projection},
    grid::{sizing::size_cells, HexGrid, TargetData},
};

/// Fail with `EmptyGeometry` unless `shape` has positive area.
fn require_area(shape: &MultiPolygon<f64>, what: impl FnOnce() -> String) -> Result<()> {
    if shape.unsigned_area() > 0.0 { Ok(()) } else {
        Err(HexmapError::EmptyGeometry { what: what() }.into())
    }
}

/// Choose the planar system for the inputs.
fn projection_for(boundary: &MultiPolygon<f64>, crs: InputCrs) -> Result<Projection> {
    Ok(match crs {
        InputCrs::Planar => Projection::identity(),
        InputCrs::Geographic => {
            let bounds = boundary.bounding_rect()
                .ok_or_else(|| HexmapError::EmptyGeometry { what: "boundary".into() })?;
            Projection::equal_area_at(bounds.center())
        }
    })
}

/// Join the smallest component to its nearest neighbor until one remains.
/// Returns the repaired adjacency and the number of edges added.
fn repair_connectivity(mut adjacency: AdjacencyMatrix, centroids: &[Coord<f64>], verbose: u8) -> Result<(AdjacencyMatrix, usize)> {
    let mut joined = 0;
    loop {
        let components = connected_components(&adjacency);
        if components.count() <= 1 { return Ok((adjacency, joined)) }

        let Some(component) = components.smallest() else { return Ok((adjacency, joined)) };
        let Some((inside, outside, distance)) = suggest_connection(&components, component, centroids) else {
            return Err(HexmapError::DisconnectedComponent { component, cells: components.members(component) }.into())
        };

        if verbose > 1 {
            eprintln!("[hexgrid] joining component {component} ({} cells) via cells {inside}-{outside} at distance {distance:.3}",
                components.sizes()[component as usize]);
        }
        adjacency = adjacency.with_edges(&[(inside, outside)]);
        joined += 1;
    }
}

impl HexGrid {
    /// Build a connected hex grid inside `boundary` approximating `districts`,
    /// together with the target data the grid is scored against.
    ///
    /// Districts are aligned onto the boundary by centroid; the grid holds
    /// more than `round(n * cells_per_district * inflation)` cells.
    pub fn build(districts: &[MultiPolygon<f64>], boundary: &MultiPolygon<f64>, config: &HexmapConfig) -> Result<(Self, TargetData)> {
        config.validate()?;
        if districts.is_empty() {
            return Err(HexmapError::EmptyGeometry { what: "district set".into() }.into())
        }
        require_area(boundary, || "boundary".into())?;
        for (i, district) in districts.iter().enumerate() {
            require_area(district, || format!("district {}", i + 1))?;
        }

        // Project to a common plane and align the districts onto the boundary.
        let projection = projection_for(boundary, config.crs)?;
        if let (true, Some(definition)) = (config.verbose > 0, projection.definition()) {
            eprintln!("[hexgrid] projecting inputs with {definition}");
        }
        let boundary = projection.project(boundary)
            .context("[hexgrid] failed to project boundary")?;
        let districts = districts.iter().enumerate()
            .map(|(i, district)| projection.project(district)
                .with_context(|| format!("[hexgrid] failed to project district {}", i + 1)))
            .collect::<Result<Vec<_>>>()?;

        let combined = MultiPolygon(districts.iter().flat_map(|d| d.0.iter().cloned()).collect());
        let (Some(from), Some(to)) = (combined.centroid(), boundary.centroid()) else {
            return Err(HexmapError::EmptyGeometry { what: "district set".into() }.into())
        };
        let districts = districts.into_iter()
            .map(|district| district.translate(to.x() - from.x(), to.y() - from.y()))
            .collect::<Vec<_>>();

        let n = districts.len();
        let aspect = combined.bounding_rect()
            .map(|rect| rect.height() / rect.width())
            .filter(|a| a.is_finite() && *a > 0.0)
            .unwrap_or(1.0);
        let target_cells = ((n as f64 * config.cells_per_district * config.inflation).round() as usize).max(1);

        if config.verbose > 0 {
            eprintln!("[hexgrid] sizing grid for {n} districts (target {target_cells} cells, aspect {aspect:.3})");
        }
        let sizing = size_cells(&boundary, aspect, target_cells, config.max_sizing_attempts, config.verbose)?;

        // Relax the clipped tiles into a bounded Voronoi tessellation of their centroids.
        let sites = sizing.cells.iter()
            .filter_map(|cell| cell.centroid().map(|p| p.0))
            .collect::<Vec<_>>();
        let voronoi = bounded_voronoi(&sites, &boundary)
            .context("[hexgrid] Voronoi relaxation failed")?;

        let (cells, adjacency) = if voronoi.cells.len() > target_cells {
            let adjacency = AdjacencyMatrix::from_edges(voronoi.cells.len(), voronoi.edges);
            (voronoi.cells, adjacency)
        } else {
            // Relaxation lost cells below the target; keep the clipped tiles.
            if config.verbose > 0 {
                eprintln!("[hexgrid] relaxation kept {} of {} cells; using unrelaxed tiles",
                    voronoi.cells.len(), sizing.cells.len());
            }
            let set = PolygonSet::new(sizing.cells)
                .context("[hexgrid] cannot index grid cells")?;
            let adjacency = set.buffered_adjacencies(0.0)
                .context("[hexgrid] failed to relate grid cells")?;
            (set.into_shapes(), adjacency)
        };

        let centroids = cells.iter()
            .map(|cell| cell.centroid().map_or(Coord { x: f64::NAN, y: f64::NAN }, |p| p.0))
            .collect::<Vec<_>>();
        let (adjacency, joined) = repair_connectivity(adjacency, &centroids, config.verbose)?;

        if config.verbose > 0 {
            eprintln!("[hexgrid] built {} cells after {} sizing attempts at {}x{} (joined {joined} components)",
                cells.len(), sizing.attempts, sizing.resolution.0, sizing.resolution.1);
        }

        let target = TargetData::from_districts(&districts, config.adjacency_tolerance)?;
        let grid = HexGrid::from_parts(cells, adjacency, n, projection)
            .with_stats(target_cells, joined, config.area_bucket);

        if config.verbose > 0 {
            eprintln!("[hexgrid] typical cell area {}", grid.typical_cell_area());
        }

        Ok((grid, target))
    }
}
