use std::sync::Arc;

use anyhow::{anyhow, ensure, Result};
use rand::{rngs::StdRng, SeedableRng};
use rayon::prelude::*;

use crate::{
    config::SearchConfig,
    graph::Graph,
    grid::HexGrid,
    observer::{Observer, Progress},
    partition::{sample_partition, short_bursts},
    score::Scorer,
};

/// The best partition one search run found.
#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    pub run: usize,
    pub partition: Vec<u32>,
    pub score: f64,
}

/// A procedure that proposes and improves contiguous partitions of a grid.
///
/// Runs must be independent: a run may only read the grid and scorer, and
/// its result must depend only on `config` and `run`.
pub trait PartitionSearch: Sync {
    fn search_run(&self, grid: &HexGrid, scorer: &Scorer, config: &SearchConfig, run: usize) -> Result<RunResult>;
}

/// Ensemble sampling followed by short-burst local search.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShortBursts;

impl PartitionSearch for ShortBursts {
    fn search_run(&self, grid: &HexGrid, scorer: &Scorer, config: &SearchConfig, run: usize) -> Result<RunResult> {
        let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(run as u64));
        let graph = Arc::new(Graph::from_adjacency(grid.adjacency()));

        let start = sample_partition(graph, grid.districts(), config.pop_tolerance, config.sampler_attempts, &mut rng);
        ensure!(start.is_contiguous(),
            "[search] run {run}: could not grow {} contiguous districts over {} cells", grid.districts(), grid.cell_count());

        let (best, score) = short_bursts(
            start,
            |partition| scorer.score(partition),
            config.burst_size,
            config.max_bursts,
            config.pop_tolerance,
            &mut rng,
        )?;
        debug_assert!(best.is_contiguous(), "burst search broke contiguity");

        Ok(RunResult { run, partition: best.into_assignments(), score })
    }
}

/// Execute `config.runs` independent runs in parallel and keep the best.
///
/// Ties in score go to the lowest run index.
pub fn run_search(
    search: &impl PartitionSearch,
    grid: &HexGrid,
    scorer: &Scorer,
    config: &SearchConfig,
    observer: &dyn Observer,
    verbose: u8,
) -> Result<RunResult> {
    if verbose > 0 {
        eprintln!("[search] starting {} runs ({} bursts of {} moves each)", config.runs, config.max_bursts, config.burst_size);
    }

    let results = (0..config.runs).into_par_iter()
        .map(|run| {
            let result = search.search_run(grid, scorer, config, run)?;
            observer.on_progress(&Progress::RunFinished { run, score: result.score });
            if verbose > 1 {
                eprintln!("[search] run {run} finished with score {:.6}", result.score);
            }
            Ok(result)
        })
        .collect::<Result<Vec<_>>>()?;

    let best = results.into_iter()
        .reduce(|best, next| if next.score > best.score { next } else { best })
        .ok_or_else(|| anyhow!("[search] no runs were requested"))?;

    if verbose > 0 {
        eprintln!("[search] best score {:.6} from run {}", best.score, best.run);
    }
    Ok(best)
}
