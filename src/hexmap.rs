use anyhow::Result;
use geo::MultiPolygon;

use crate::{
    assemble::{assemble, assemble_single, DistrictShape},
    config::HexmapConfig,
    grid::{HexGrid, TargetData},
    observer::{Observer, Progress},
    score::Scorer,
    search::{run_search, PartitionSearch, ShortBursts},
};

/// Everything produced for one region.
#[derive(Debug, Clone)]
pub struct HexmapOutput {
    /// The grid the districts were drawn on, for reuse or inspection.
    pub grid: HexGrid,
    /// The real districts the grid was scored against.
    pub target: TargetData,
    /// District id (1-based) of every grid cell.
    pub assignments: Vec<u32>,
    /// Score of the winning partition; `None` for a single district.
    pub score: Option<f64>,
    /// Output districts in the grid's planar coordinates, ordered by id.
    pub districts: Vec<DistrictShape>,
}

impl HexmapOutput {
    /// Output districts mapped back to the input coordinate system.
    pub fn districts_in_input_crs(&self) -> Result<Vec<DistrictShape>> {
        let projection = self.grid.projection();
        self.districts.iter()
            .map(|district| Ok(DistrictShape {
                id: district.id,
                polygon: projection.unproject(&district.polygon)?,
                label_point: projection.unproject_point(district.label_point)?,
            }))
            .collect()
    }
}

/// Builds schematic hex maps: a grid over the boundary, a partition search
/// scored against the real districts, and the dissolved result.
#[derive(Debug, Clone)]
pub struct Hexmap<S = ShortBursts> {
    config: HexmapConfig,
    search: S,
}

impl Hexmap {
    /// Create a builder using the built-in short-burst search.
    pub fn new(config: HexmapConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, search: ShortBursts })
    }
}

impl<S: PartitionSearch> Hexmap<S> {
    /// Replace the partition search procedure.
    pub fn with_search<T: PartitionSearch>(self, search: T) -> Hexmap<T> {
        Hexmap { config: self.config, search }
    }

    /// Get the configuration.
    #[inline] pub fn config(&self) -> &HexmapConfig { &self.config }

    /// Build the grid and target data without searching.
    pub fn build_grid(&self, districts: &[MultiPolygon<f64>], boundary: &MultiPolygon<f64>) -> Result<(HexGrid, TargetData)> {
        HexGrid::build(districts, boundary, &self.config)
    }

    /// Build the grid, search for the best partition and dissolve it.
    pub fn run(&self, districts: &[MultiPolygon<f64>], boundary: &MultiPolygon<f64>, observer: &dyn Observer) -> Result<HexmapOutput> {
        let verbose = self.config.verbose;
        let (grid, target) = self.build_grid(districts, boundary)?;
        observer.on_progress(&Progress::GridBuilt { cells: grid.cell_count(), components_joined: grid.components_joined() });

        if grid.districts() == 1 {
            return Ok(HexmapOutput {
                districts: assemble_single(&grid, verbose)?,
                assignments: vec![1; grid.cell_count()],
                score: None,
                grid,
                target,
            })
        }

        let scorer = Scorer::new(&grid, &target, self.config.score)?;
        let best = run_search(&self.search, &grid, &scorer, &self.config.search, observer, verbose)?;

        let districts = assemble(&best.partition, &scorer, &grid, verbose)?;
        let assignments = scorer.bijection_for(&best.partition)?.relabel(&best.partition);

        Ok(HexmapOutput { grid, target, assignments, score: Some(best.score), districts })
    }
}
