use anyhow::{anyhow, ensure, Result};
use pathfinding::{kuhn_munkres::kuhn_munkres_min, matrix::Matrix};

/// Costs are quantized to integers on this scale (relative to the largest
/// entry) before solving, since the solver needs totally ordered weights.
const COST_RESOLUTION: f64 = (1u64 << 40) as f64;

/// One-to-one correspondence between computed groups and target districts.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentBijection {
    mapping: Vec<u32>, // mapping[g - 1] = target district of group g (both 1-based)
    cost: f64,
}

impl AssignmentBijection {
    /// Build a bijection from explicit targets; `mapping[g - 1]` is the
    /// target district of group `g`.
    pub fn new(mapping: Vec<u32>, cost: f64) -> Self {
        let n = mapping.len() as u32;
        let mut seen = vec![false; mapping.len()];
        for &t in &mapping {
            assert!(t >= 1 && t <= n, "target {t} out of range [1, {n}]");
            assert!(!seen[t as usize - 1], "target {t} assigned twice");
            seen[t as usize - 1] = true;
        }
        Self { mapping, cost }
    }

    /// The identity bijection on `n` districts.
    pub fn identity(n: usize) -> Self {
        Self { mapping: (1..=n as u32).collect(), cost: 0.0 }
    }

    /// Get the target district of each group, in group order.
    #[inline] pub fn mapping(&self) -> &[u32] { &self.mapping }

    /// Get the total assignment cost the bijection was solved at.
    #[inline] pub fn cost(&self) -> f64 { self.cost }

    /// Get the number of districts.
    #[inline] pub fn len(&self) -> usize { self.mapping.len() }

    /// Returns true if the bijection maps no districts.
    #[inline] pub fn is_empty(&self) -> bool { self.mapping.is_empty() }

    /// Get the target district of a 1-based group.
    #[inline]
    pub fn target_of(&self, group: u32) -> u32 {
        assert!(group >= 1 && group as usize <= self.mapping.len(), "group {group} out of range");
        self.mapping[group as usize - 1]
    }

    /// Relabel a partition from groups to target districts.
    pub fn relabel(&self, partition: &[u32]) -> Vec<u32> {
        partition.iter().map(|&g| self.target_of(g)).collect()
    }
}

/// Solve the minimum-cost perfect matching of groups (rows) to targets
/// (columns) on a square cost matrix.
pub(super) fn solve_assignment(costs: &[Vec<f64>]) -> Result<AssignmentBijection> {
    let n = costs.len();
    ensure!(n > 0, "[solve_assignment] cost matrix is empty");
    for (i, row) in costs.iter().enumerate() {
        ensure!(row.len() == n, "[solve_assignment] cost matrix is not square: row {i} has {} entries, expected {n}", row.len());
        ensure!(row.iter().all(|c| c.is_finite()),
            "[solve_assignment] cost matrix row {i} has non-finite entries: {row:?}");
    }

    let largest = costs.iter().flatten().fold(0.0f64, |acc, c| acc.max(c.abs()));
    let scale = if largest > 0.0 { COST_RESOLUTION / largest } else { 0.0 };
    let weights = Matrix::from_rows(costs.iter()
        .map(|row| row.iter().map(|&c| (c * scale).round() as i64).collect::<Vec<_>>()))
        .map_err(|e| anyhow!("[solve_assignment] invalid cost matrix: {e:?}"))?;

    let (_, columns) = kuhn_munkres_min(&weights);
    let cost = columns.iter().enumerate().map(|(row, &col)| costs[row][col]).sum::<f64>();

    Ok(AssignmentBijection::new(columns.iter().map(|&col| col as u32 + 1).collect(), cost))
}
