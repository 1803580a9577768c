use anyhow::Result;
use rand::{seq::IndexedRandom, Rng};

use crate::partition::Partition;

impl Partition {
    /// Propose one random boundary move: a frontier cell of a random
    /// district and a neighboring district to send it to.
    fn random_boundary_move(&self, rng: &mut impl Rng) -> Option<(usize, u32)> {
        let parts = (1..self.num_parts())
            .filter(|&p| !self.frontier(p).is_empty())
            .collect::<Vec<_>>();
        let &part = parts.choose(rng)?;
        let &node = self.frontier(part).choose(rng)?;
        Some((node, self.random_neighboring_part(node, rng)?))
    }

    /// Returns true if a move keeps every district non-empty, contiguous and
    /// no worse balanced than the bounds allow.
    fn accepts_move(&self, node: usize, part: u32, bounds: (f64, f64)) -> bool {
        self.part_size(self.assignment(node)) > 1
            && self.move_keeps_balance(node, part, bounds)
            && self.check_node_contiguity(node, part)
    }
}

/// Improve a partition with short bursts of random boundary moves.
///
/// Each of `max_bursts` bursts starts from the best partition seen so far
/// and proposes `burst_size` moves; accepted moves are scored and the best
/// state is retained.  Returns the best partition and its score.
pub(crate) fn short_bursts(
    start: Partition,
    score: impl Fn(&[u32]) -> Result<f64>,
    burst_size: usize,
    max_bursts: usize,
    tolerance: f64,
    rng: &mut impl Rng,
) -> Result<(Partition, f64)> {
    let bounds = start.balance_bounds(tolerance);
    let mut best_score = score(start.assignments())?;
    let mut best = start;

    for _ in 0..max_bursts {
        let mut state = best.clone();
        for _ in 0..burst_size {
            let Some((node, part)) = state.random_boundary_move(rng) else { break };
            if !state.accepts_move(node, part, bounds) { continue }

            state.move_node(node, part, false);
            let candidate = score(state.assignments())?;
            if candidate > best_score {
                best_score = candidate;
                best = state.clone();
            }
        }
    }

    Ok((best, best_score))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{graph::Graph, partition::sample_partition};
    use rand::{rngs::StdRng, SeedableRng};

    fn lattice(k: u32) -> Arc<Graph> {
        let lists = (0..k * k)
            .map(|u| {
                let (row, col) = (u / k, u % k);
                let mut neighbors = Vec::new();
                if col > 0 { neighbors.push(u - 1) }
                if col + 1 < k { neighbors.push(u + 1) }
                if row > 0 { neighbors.push(u - k) }
                if row + 1 < k { neighbors.push(u + k) }
                neighbors
            })
            .collect::<Vec<_>>();
        Arc::new(Graph::new((k * k) as usize, &lists, vec![1.0; (k * k) as usize]))
    }

    /// Rewards cells of district 1 in the left half of a 6x6 lattice.
    fn left_half(assignments: &[u32]) -> Result<f64> {
        Ok(assignments.iter().enumerate()
            .filter(|&(u, &p)| p == 1 && u % 6 < 3)
            .count() as f64)
    }

    #[test]
    fn bursts_never_lose_the_best_score() {
        let mut rng = StdRng::seed_from_u64(3);
        let start = sample_partition(lattice(6), 2, 0.5, 10, &mut rng);
        let initial = left_half(start.assignments()).unwrap();

        let (best, score) = short_bursts(start, left_half, 10, 50, 0.5, &mut rng).unwrap();
        assert!(score >= initial);
        assert_eq!(score, left_half(best.assignments()).unwrap());
    }

    #[test]
    fn bursts_preserve_contiguity_and_balance() {
        let mut rng = StdRng::seed_from_u64(9);
        let start = sample_partition(lattice(6), 3, 0.25, 20, &mut rng);
        assert!(start.imbalance() <= 0.25);

        let (best, _) = short_bursts(start, left_half, 10, 40, 0.25, &mut rng).unwrap();
        assert!(best.is_contiguous());
        assert!(best.imbalance() <= 0.25 + 1e-12);
        assert!((1..=3).all(|p| best.part_size(p) > 0));
    }

    #[test]
    fn scoring_errors_propagate() {
        let mut rng = StdRng::seed_from_u64(1);
        let start = sample_partition(lattice(4), 2, 0.5, 5, &mut rng);
        let failing = |_: &[u32]| -> Result<f64> { anyhow::bail!("scorer failed") };
        assert!(short_bursts(start, failing, 5, 5, 0.5, &mut rng).is_err());
    }
}
