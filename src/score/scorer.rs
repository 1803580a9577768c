use ahash::AHashSet;
use anyhow::{ensure, Result};
use geo::Coord;
use geograph::AdjacencyMatrix;

use crate::{
    config::ScoreConfig,
    grid::{HexGrid, TargetData},
    score::assignment::{solve_assignment, AssignmentBijection},
};

/// Conversion applied to planar coordinates before squaring centroid
/// distances: meters to units of 100 km.
pub const DEFAULT_DISTANCE_SCALE: f64 = 1e-5;

/// The terms of one score evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    /// Fraction of each district's true neighbors it still borders, by district.
    pub adjacency_fractions: Vec<f64>,
    /// Total scaled squared displacement of group centroids from targets.
    pub assignment_cost: f64,
    /// Sample standard deviation of each group's share of the total area.
    pub balance: f64,
    /// Weighted total; higher is better.
    pub score: f64,
}

impl ScoreBreakdown {
    /// Mean adjacency-preservation fraction over all districts.
    pub fn mean_adjacency(&self) -> f64 {
        if self.adjacency_fractions.is_empty() { return 0.0 }
        self.adjacency_fractions.iter().sum::<f64>() / self.adjacency_fractions.len() as f64
    }
}

/// Scores partitions of a grid by how well they reproduce the target
/// districts' adjacency, position and relative area.
///
/// All tables are computed once in [`Scorer::new`] and never mutated, so a
/// scorer can be shared by reference across threads.
#[derive(Debug, Clone)]
pub struct Scorer {
    districts: usize,
    cell_centroids: Vec<Coord<f64>>,
    cell_areas: Vec<f64>, // normalized to sum to 1
    cell_adjacency: AdjacencyMatrix,
    target_centroids: Vec<Coord<f64>>,
    target_adjacency: AdjacencyMatrix,
    config: ScoreConfig,
}

impl Scorer {
    /// Precompute the scoring tables for a grid and its target districts.
    pub fn new(grid: &HexGrid, target: &TargetData, config: ScoreConfig) -> Result<Self> {
        ensure!(target.len() == grid.districts(),
            "[Scorer] grid was built for {} districts but target data has {}", grid.districts(), target.len());
        ensure!(grid.cell_count() >= target.len(),
            "[Scorer] {} cells cannot form {} districts", grid.cell_count(), target.len());

        let total = grid.cells().iter().map(|cell| cell.area()).sum::<f64>();
        ensure!(total > 0.0 && total.is_finite(), "[Scorer] grid has no area (total {total})");

        Ok(Self {
            districts: target.len(),
            cell_centroids: grid.centroids(),
            cell_areas: grid.cells().iter().map(|cell| cell.area() / total).collect(),
            cell_adjacency: grid.adjacency().clone(),
            target_centroids: target.centroids().to_vec(),
            target_adjacency: target.adjacency().clone(),
            config,
        })
    }

    /// Get the number of districts `n`.
    #[inline] pub fn districts(&self) -> usize { self.districts }

    /// Check that a partition labels every cell with a group in 1..=n.
    fn check_partition(&self, partition: &[u32]) {
        assert_eq!(partition.len(), self.cell_centroids.len(),
            "partition.len() ({}) must equal number of cells ({})", partition.len(), self.cell_centroids.len());
        assert!(partition.iter().all(|&g| g >= 1 && g as usize <= self.districts),
            "all groups must be in range [1, {}]", self.districts);
    }

    /// Mean member-cell centroid of each group (NaN for an empty group).
    fn group_centroids(&self, partition: &[u32]) -> Vec<Coord<f64>> {
        let mut sums = vec![(0.0, 0.0, 0usize); self.districts];
        for (cell, &group) in partition.iter().enumerate() {
            let sum = &mut sums[group as usize - 1];
            sum.0 += self.cell_centroids[cell].x;
            sum.1 += self.cell_centroids[cell].y;
            sum.2 += 1;
        }
        sums.into_iter()
            .map(|(x, y, count)| Coord { x: x / count as f64, y: y / count as f64 })
            .collect()
    }

    /// Scaled squared distance between a group centroid and a target centroid.
    #[inline]
    fn displacement(&self, group: Coord<f64>, target: Coord<f64>) -> f64 {
        let s = self.config.distance_scale;
        let (dx, dy) = ((group.x - target.x) * s, (group.y - target.y) * s);
        dx * dx + dy * dy
    }

    /// Find the displacement-minimizing correspondence of groups to districts.
    pub fn bijection_for(&self, partition: &[u32]) -> Result<AssignmentBijection> {
        self.check_partition(partition);
        let centroids = self.group_centroids(partition);

        let costs = centroids.iter()
            .map(|&g| self.target_centroids.iter().map(|&t| self.displacement(g, t)).collect())
            .collect::<Vec<Vec<f64>>>();
        solve_assignment(&costs)
    }

    /// Score a partition under a given correspondence of groups to districts.
    pub fn score_with(&self, partition: &[u32], bijection: &AssignmentBijection) -> ScoreBreakdown {
        self.check_partition(partition);
        assert_eq!(bijection.len(), self.districts, "bijection must cover all {} districts", self.districts);

        let centroids = self.group_centroids(partition);
        let assignment_cost = centroids.iter().enumerate()
            .map(|(g, &c)| self.displacement(c, self.target_centroids[bijection.mapping()[g] as usize - 1]))
            .sum::<f64>();

        let labels = bijection.relabel(partition);
        let adjacency_fractions = self.adjacency_fractions(&labels);
        let balance = self.balance(&labels);

        let mut breakdown = ScoreBreakdown { adjacency_fractions, assignment_cost, balance, score: 0.0 };
        breakdown.score = self.config.adjacency_weight * breakdown.mean_adjacency()
            - self.config.position_weight * assignment_cost / self.districts as f64
            - self.config.balance_weight * balance;
        breakdown
    }

    /// Score a partition, solving for its best correspondence first.
    pub fn breakdown(&self, partition: &[u32]) -> Result<ScoreBreakdown> {
        let bijection = self.bijection_for(partition)?;
        Ok(self.score_with(partition, &bijection))
    }

    /// Score a partition; higher is better.
    pub fn score(&self, partition: &[u32]) -> Result<f64> {
        Ok(self.breakdown(partition)?.score)
    }

    /// For each district, the share of its true neighbors that its group
    /// borders in the grid (0 for a district with no true neighbors).
    fn adjacency_fractions(&self, labels: &[u32]) -> Vec<f64> {
        // Coarsen the cell graph by district label.
        let borders = self.cell_adjacency.edges()
            .map(|(u, v)| (labels[u as usize] - 1, labels[v as usize] - 1))
            .filter(|(a, b)| a != b)
            .map(|(a, b)| (a.min(b), a.max(b)))
            .collect::<AHashSet<_>>();

        (0..self.districts)
            .map(|d| {
                let neighbors = self.target_adjacency.neighbors(d);
                if neighbors.is_empty() { return 0.0 }
                let shared = neighbors.iter()
                    .filter(|&&e| borders.contains(&((d as u32).min(e), (d as u32).max(e))))
                    .count();
                shared as f64 / neighbors.len() as f64
            })
            .collect()
    }

    /// Sample standard deviation of the groups' normalized area sums.
    fn balance(&self, labels: &[u32]) -> f64 {
        let n = self.districts;
        if n < 2 { return 0.0 }

        let mut sums = vec![0.0; n];
        for (cell, &label) in labels.iter().enumerate() {
            sums[label as usize - 1] += self.cell_areas[cell];
        }

        let mean = sums.iter().sum::<f64>() / n as f64;
        let variance = sums.iter().map(|s| (s - mean) * (s - mean)).sum::<f64>() / (n - 1) as f64;
        variance.sqrt()
    }
}
