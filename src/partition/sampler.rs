use std::sync::Arc;

use rand::{seq::{IndexedRandom, IteratorRandom}, Rng};

use crate::{graph::Graph, partition::Partition};

impl Partition {
    /// Select a random unassigned cell.
    fn random_unassigned_node(&self, rng: &mut impl Rng) -> Option<usize> {
        (0..self.num_nodes()).filter(|&u| self.assignment(u) == 0).choose(rng)
    }

    /// Select a random unassigned cell that borders an assigned part.
    fn random_unassigned_boundary_node(&self, rng: &mut impl Rng) -> Option<usize> {
        self.frontier(0).choose(rng).copied()
    }

    /// Select a random part, other than its own, that a cell borders.
    pub(crate) fn random_neighboring_part(&self, node: usize, rng: &mut impl Rng) -> Option<u32> {
        assert!(node < self.num_nodes(), "node {} out of range", node);
        let own = self.assignment(node);
        self.graph().edges(node)
            .map(|v| self.assignment(v))
            .filter(|&p| p != own && p != 0)
            .choose(rng)
    }

    /// Allowed `[lower, upper]` part weight for a relative tolerance.
    pub(crate) fn balance_bounds(&self, tolerance: f64) -> (f64, f64) {
        let ideal = self.graph().total_weight() / self.districts() as f64;
        (ideal * (1.0 - tolerance), ideal * (1.0 + tolerance))
    }

    /// Largest relative deviation of any district's weight from the ideal.
    pub(crate) fn imbalance(&self) -> f64 {
        let ideal = self.graph().total_weight() / self.districts() as f64;
        (1..self.num_parts())
            .map(|part| (self.part_weight(part) - ideal).abs() / ideal)
            .fold(0.0, f64::max)
    }

    /// Returns true if moving `node` to `part` leaves both parts inside the
    /// bounds, or at least no further outside them than before.
    pub(crate) fn move_keeps_balance(&self, node: usize, part: u32, (lower, upper): (f64, f64)) -> bool {
        let weight = self.graph().node_weight(node);
        let (from, to) = (self.part_weight(self.assignment(node)), self.part_weight(part));
        (from - weight >= lower || from > upper) && (to + weight <= upper || to < lower)
    }

    /// Randomly grow contiguous districts from random seed cells until every
    /// cell is assigned.
    pub(crate) fn randomize(&mut self, rng: &mut impl Rng) {
        self.clear_assignments();

        // Seed parts with random starting cells.
        for part in 1..self.num_parts() {
            let Some(seed) = self.random_unassigned_node(rng) else { break };
            self.move_node(seed, part, false);
        }

        // Expand parts until all reachable cells are assigned.
        while let Some(u) = self.random_unassigned_boundary_node(rng) {
            let Some(part) = self.random_neighboring_part(u, rng) else { break };
            self.move_node(u, part, false);
        }
    }

    /// Contiguity-preserving moves that bring `part` closer to the ideal
    /// weight: its own boundary cells into lighter neighbors when it is
    /// heavy, or neighboring cells from heavier parts when it is light.
    fn balancing_moves(&self, part: u32, heavy: bool) -> Vec<(usize, u32)> {
        let graph = self.graph();
        let moves = self.frontier(part).iter()
            .flat_map(|&u| graph.edges(u).map(move |v| (u, v)));

        let candidates = if heavy {
            moves.map(|(u, v)| (u, self.assignment(v)))
                .filter(|&(u, p)| p != part && p != 0
                    && self.part_weight(p) + graph.node_weight(u) < self.part_weight(part))
                .collect::<Vec<_>>()
        } else {
            moves.map(|(_, v)| (v, self.assignment(v)))
                .filter(|&(v, p)| p != part && p != 0
                    && self.part_weight(p) - graph.node_weight(v) > self.part_weight(part))
                .map(|(v, _)| (v, part))
                .collect::<Vec<_>>()
        };

        candidates.into_iter()
            .filter(|&(u, p)| self.part_size(self.assignment(u)) > 1 && self.check_node_contiguity(u, p))
            .collect()
    }

    /// Move boundary cells from the most over- or under-weight district
    /// toward its neighbors until every district is within `tolerance`, no
    /// contiguity-preserving move helps, or `max_moves` is spent.
    pub(crate) fn equalize(&mut self, tolerance: f64, max_moves: usize, rng: &mut impl Rng) {
        let (lower, upper) = self.balance_bounds(tolerance);
        let ideal = (lower + upper) / 2.0;

        for _ in 0..max_moves {
            let Some(worst) = (1..self.num_parts())
                .filter(|&p| self.part_weight(p) < lower || self.part_weight(p) > upper)
                .max_by(|&a, &b| {
                    (self.part_weight(a) - ideal).abs().total_cmp(&(self.part_weight(b) - ideal).abs())
                })
            else { return };

            let moves = self.balancing_moves(worst, self.part_weight(worst) > upper);
            let Some(&(u, p)) = moves.choose(rng) else { return };
            self.move_node(u, p, false);
        }
    }
}

/// Draw a contiguous starting partition with every district within
/// `tolerance` of the ideal weight, trying up to `attempts` random
/// growths and keeping the least imbalanced if none qualifies.
pub(crate) fn sample_partition(
    graph: Arc<Graph>,
    num_districts: usize,
    tolerance: f64,
    attempts: usize,
    rng: &mut impl Rng,
) -> Partition {
    assert!(attempts > 0, "attempts must be at least 1");
    let mut partition = Partition::new(num_districts, graph);
    let max_moves = 4 * partition.num_nodes();

    let mut best: Option<(f64, Partition)> = None;
    for _ in 0..attempts {
        partition.randomize(rng);
        partition.equalize(tolerance, max_moves, rng);

        let imbalance = partition.imbalance();
        let complete = partition.part_is_empty(0) && (1..partition.num_parts()).all(|p| !partition.part_is_empty(p));
        if !complete { continue }
        if imbalance <= tolerance { return partition }
        if best.as_ref().map_or(true, |(b, _)| imbalance < *b) {
            best = Some((imbalance, partition.clone()));
        }
    }

    best.map_or(partition, |(_, p)| p)
}
