use std::sync::Arc;

use crate::{graph::Graph, grid::HexGrid, partition::FrontierSet};

/// An assignment of grid cells to districts `1..=n`.
///
/// Part 0 holds unassigned cells while a partition is being grown; a
/// finished partition leaves it empty.
#[derive(Clone, Debug)]
pub struct Partition {
    assignments: Vec<u32>,          // Part of each cell
    part_sizes: Vec<usize>,         // Number of cells in each part (including unassigned 0)
    part_weights: Vec<f64>,         // Total cell weight of each part (including unassigned 0)
    pub(super) frontiers: FrontierSet, // Cells bordering another part
    graph: Arc<Graph>,
}

impl Partition {
    /// Construct a partition with every cell unassigned.
    pub(crate) fn new(num_districts: usize, graph: impl Into<Arc<Graph>>) -> Self {
        assert!(num_districts > 0, "num_districts must be at least 1");
        let graph: Arc<Graph> = graph.into();
        let num_parts = num_districts + 1;

        let mut part_sizes = vec![0; num_parts];
        let mut part_weights = vec![0.0; num_parts];
        part_sizes[0] = graph.node_count();
        part_weights[0] = graph.total_weight();

        Self {
            assignments: vec![0; graph.node_count()],
            part_sizes,
            part_weights,
            frontiers: FrontierSet::new(num_parts, graph.node_count()),
            graph,
        }
    }

    /// Wrap existing district labels (each in `1..=n`) over a grid's cells.
    pub fn from_assignments(grid: &HexGrid, assignments: Vec<u32>) -> Self {
        let mut partition = Self::new(grid.districts(), Graph::from_adjacency(grid.adjacency()));
        partition.set_assignments(assignments);
        partition
    }

    /// Get the number of parts (districts plus unassigned 0).
    #[inline] pub(crate) fn num_parts(&self) -> u32 { self.part_sizes.len() as u32 }

    /// Get the number of districts `n`.
    #[inline] pub fn districts(&self) -> usize { self.part_sizes.len() - 1 }

    /// Get the number of cells.
    #[inline] pub(crate) fn num_nodes(&self) -> usize { self.assignments.len() }

    /// Get a reference to the underlying cell graph.
    #[inline] pub(crate) fn graph(&self) -> &Graph { &self.graph }

    /// Get the part of a given cell.
    #[inline] pub fn assignment(&self, node: usize) -> u32 { self.assignments[node] }

    /// Get the part of every cell.
    #[inline] pub fn assignments(&self) -> &[u32] { &self.assignments }

    /// Consume the partition, returning its labels.
    #[inline] pub fn into_assignments(self) -> Vec<u32> { self.assignments }

    /// Get the number of cells in a part.
    #[inline] pub fn part_size(&self, part: u32) -> usize { self.part_sizes[part as usize] }

    /// Get the total cell weight of a part.
    #[inline] pub(crate) fn part_weight(&self, part: u32) -> f64 { self.part_weights[part as usize] }

    /// Get the cells of a part that border another part.
    #[inline] pub(crate) fn frontier(&self, part: u32) -> &[usize] { self.frontiers.get(part as usize) }

    /// Returns true if `node` has a neighbor outside its own part.
    #[inline]
    fn on_frontier(&self, node: usize) -> bool {
        let part = self.assignments[node];
        self.graph.edges(node).any(|v| self.assignments[v] != part)
    }

    /// Reset every cell to unassigned (0).
    pub(crate) fn clear_assignments(&mut self) {
        self.assignments.fill(0);
        self.frontiers.clear();
        self.part_sizes.fill(0);
        self.part_weights.fill(0.0);
        self.part_sizes[0] = self.graph.node_count();
        self.part_weights[0] = self.graph.total_weight();
    }

    /// Replace all assignments, rebuilding frontiers and totals.
    pub(crate) fn set_assignments(&mut self, assignments: Vec<u32>) {
        assert!(assignments.len() == self.num_nodes(), "assignments.len() must equal number of nodes");
        assert!(assignments.iter().all(|&p| p < self.num_parts()), "all assignments must be in range [0, {})", self.num_parts());

        self.assignments = assignments;

        self.part_sizes.fill(0);
        self.part_weights.fill(0.0);
        for (node, &part) in self.assignments.iter().enumerate() {
            self.part_sizes[part as usize] += 1;
            self.part_weights[part as usize] += self.graph.node_weight(node);
        }

        self.frontiers.clear();
        for node in 0..self.num_nodes() {
            if self.on_frontier(node) {
                self.frontiers.insert(node, self.assignments[node] as usize);
            }
        }
    }

    /// Move a single cell to a different part, updating caches.
    /// `check` toggles whether to assert the move keeps parts contiguous.
    pub(crate) fn move_node(&mut self, node: usize, part: u32, check: bool) {
        assert!(node < self.num_nodes(), "node {} out of range", node);
        assert!(part < self.num_parts(), "part {} out of range [0, {})", part, self.num_parts());

        let prev = self.assignments[node];
        if prev == part { return }

        if check { assert!(self.check_node_contiguity(node, part), "moving node {} would break contiguity of part {}", node, prev); }

        self.assignments[node] = part;
        let weight = self.graph.node_weight(node);
        self.part_sizes[prev as usize] -= 1;
        self.part_sizes[part as usize] += 1;
        self.part_weights[prev as usize] -= weight;
        self.part_weights[part as usize] += weight;

        // Recompute frontier membership for `node` and its neighbors.
        let touched = std::iter::once(node).chain(self.graph.edges(node)).collect::<Vec<_>>();
        for u in touched {
            if self.on_frontier(u) {
                self.frontiers.insert(u, self.assignments[u] as usize);
            } else {
                self.frontiers.remove(u);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A path 0 - 1 - 2 - 3 - 4 with unit weights.
    fn path() -> Partition {
        let lists = (0..5u32)
            .map(|u| [u.checked_sub(1), (u < 4).then_some(u + 1)].into_iter().flatten().collect())
            .collect::<Vec<Vec<u32>>>();
        Partition::new(2, Graph::new(5, &lists, vec![1.0; 5]))
    }

    #[test]
    fn new_partition_is_unassigned() {
        let partition = path();
        assert_eq!(partition.num_parts(), 3);
        assert_eq!(partition.districts(), 2);
        assert_eq!(partition.part_size(0), 5);
        assert_eq!(partition.part_weight(0), 5.0);
        assert!(partition.frontier(0).is_empty());
    }

    #[test]
    fn set_assignments_rebuilds_caches() {
        let mut partition = path();
        partition.set_assignments(vec![1, 1, 1, 2, 2]);

        assert_eq!(partition.part_size(1), 3);
        assert_eq!(partition.part_weight(2), 2.0);
        assert_eq!(partition.frontier(1), &[2]);
        assert_eq!(partition.frontier(2), &[3]);
    }

    #[test]
    fn move_node_updates_frontiers_and_totals() {
        let mut partition = path();
        partition.set_assignments(vec![1, 1, 1, 2, 2]);
        partition.move_node(2, 2, true);

        assert_eq!(partition.assignments(), &[1, 1, 2, 2, 2]);
        assert_eq!(partition.part_size(1), 2);
        assert_eq!(partition.part_size(2), 3);
        assert_eq!(partition.frontier(1), &[1]);
        assert_eq!(partition.frontier(2), &[2]);
    }

    #[test]
    #[should_panic(expected = "would break contiguity")]
    fn checked_move_rejects_cuts() {
        let mut partition = path();
        partition.set_assignments(vec![1, 1, 1, 2, 2]);
        partition.move_node(1, 2, true);
    }

    #[test]
    fn clear_resets_to_unassigned() {
        let mut partition = path();
        partition.set_assignments(vec![1, 1, 2, 2, 2]);
        partition.clear_assignments();
        assert!(partition.assignments().iter().all(|&p| p == 0));
        assert_eq!(partition.part_size(0), 5);
        assert_eq!(partition.part_size(1), 0);
    }
}
