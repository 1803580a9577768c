use anyhow::{anyhow, ensure, Result};
use geo::{MultiPolygon, Point};

use crate::{
    geom::{label_point, union_all},
    grid::HexGrid,
    score::Scorer,
};

/// One output district: its id, dissolved cells and an interior label point.
#[derive(Debug, Clone, PartialEq)]
pub struct DistrictShape {
    pub id: u32,
    pub polygon: MultiPolygon<f64>,
    pub label_point: Point<f64>,
}

/// Dissolve cells grouped by district id (1-based) into one shape per district.
fn dissolve(grid: &HexGrid, districts: &[u32], num_districts: usize) -> Result<Vec<DistrictShape>> {
    let mut members = vec![Vec::new(); num_districts];
    for (cell, &district) in grid.cells().iter().zip(districts) {
        members[district as usize - 1].push(cell.polygon().clone());
    }

    members.into_iter().enumerate()
        .map(|(i, cells)| {
            let id = i as u32 + 1;
            ensure!(!cells.is_empty(), "[assemble] district {id} has no cells");

            let polygon = union_all(cells);
            let label_point = label_point(&polygon)
                .ok_or_else(|| anyhow!("[assemble] district {id} dissolved to an empty shape"))?;
            Ok(DistrictShape { id, polygon, label_point })
        })
        .collect()
}

/// Relabel the winning partition to true district ids and dissolve it.
///
/// Every district `1..=n` must receive at least one cell.
pub fn assemble(partition: &[u32], scorer: &Scorer, grid: &HexGrid, verbose: u8) -> Result<Vec<DistrictShape>> {
    let bijection = scorer.bijection_for(partition)?;
    let districts = bijection.relabel(partition);

    if verbose > 0 {
        eprintln!("[assemble] dissolving {} cells into {} districts (assignment cost {:.6})",
            grid.cell_count(), scorer.districts(), bijection.cost());
    }
    dissolve(grid, &districts, scorer.districts())
}

/// Dissolve every cell into district 1, for a single-district region.
pub fn assemble_single(grid: &HexGrid, verbose: u8) -> Result<Vec<DistrictShape>> {
    if verbose > 0 {
        eprintln!("[assemble] dissolving {} cells into a single district", grid.cell_count());
    }
    dissolve(grid, &vec![1; grid.cell_count()], 1)
}
