use std::collections::VecDeque;

use crate::partition::Partition;

impl Partition {
    /// Check if a part has no cells.
    pub(crate) fn part_is_empty(&self, part: u32) -> bool {
        assert!(part < self.num_parts(), "part must be in range [0, {})", self.num_parts());
        self.part_size(part) == 0
    }

    /// Check if a cell borders a given part.
    pub(crate) fn node_borders_part(&self, node: usize, part: u32) -> bool {
        assert!(node < self.num_nodes(), "node {} out of range", node);
        self.graph().edges(node).any(|v| self.assignment(v) == part)
    }

    /// Check if moving `node` to `part` keeps both parts contiguous.
    pub(crate) fn check_node_contiguity(&self, node: usize, part: u32) -> bool {
        assert!(node < self.num_nodes(), "node {} out of range", node);
        assert!(part < self.num_parts(), "part must be in range [0, {})", self.num_parts());

        let prev = self.assignment(node);

        // The destination must be empty or adjacent.
        if !(self.part_is_empty(part) || self.node_borders_part(node, part)) { return false }

        // Unassigned cells carry no contiguity constraint.
        if prev == 0 { return true }

        let neighbors = self.graph().edges(node)
            .filter(|&v| self.assignment(v) == prev)
            .collect::<Vec<_>>();

        // With fewer than 2 same-part neighbors, `node` cannot be a cut vertex.
        if neighbors.len() <= 1 { return true }

        let mut targets = vec![false; self.num_nodes()];
        neighbors.iter().for_each(|&v| targets[v] = true);

        // BFS from one neighbor within `prev`, forbidding `node`.
        let mut visited = vec![false; self.num_nodes()];
        visited[node] = true;
        visited[neighbors[0]] = true;

        let mut remaining = neighbors.len() - 1;
        let mut queue = VecDeque::from([neighbors[0]]);
        while let Some(u) = queue.pop_front() {
            for v in self.graph().edges(u) {
                if !visited[v] && self.assignment(v) == prev {
                    visited[v] = true;
                    queue.push_back(v);

                    if targets[v] { remaining -= 1; if remaining == 0 { return true } }
                }
            }
        }

        false
    }

    /// Returns true if every cell is assigned and each district `1..=n` is
    /// a single non-empty connected component.
    pub fn is_contiguous(&self) -> bool {
        if !self.part_is_empty(0) { return false }

        let mut visited = vec![false; self.num_nodes()];
        for part in 1..self.num_parts() {
            let Some(start) = (0..self.num_nodes()).find(|&u| self.assignment(u) == part) else { return false };

            let mut seen = 1;
            visited[start] = true;
            let mut queue = VecDeque::from([start]);
            while let Some(u) = queue.pop_front() {
                for v in self.graph().edges(u) {
                    if !visited[v] && self.assignment(v) == part {
                        visited[v] = true;
                        seen += 1;
                        queue.push_back(v);
                    }
                }
            }
            if seen != self.part_size(part) { return false }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use crate::{graph::Graph, partition::Partition};

    /// A 3x3 lattice with rook adjacency:
    ///   6 7 8
    ///   3 4 5
    ///   0 1 2
    fn lattice(num_districts: usize) -> Partition {
        let lists = (0..9u32)
            .map(|u| {
                let (row, col) = (u / 3, u % 3);
                let mut neighbors = Vec::new();
                if col > 0 { neighbors.push(u - 1) }
                if col < 2 { neighbors.push(u + 1) }
                if row > 0 { neighbors.push(u - 3) }
                if row < 2 { neighbors.push(u + 3) }
                neighbors
            })
            .collect::<Vec<_>>();
        Partition::new(num_districts, Graph::new(9, &lists, vec![1.0; 9]))
    }

    #[test]
    fn cut_vertices_cannot_move() {
        let mut partition = lattice(2);
        // Part 1 is the bottom row plus the middle column; 4 joins 1 and 7.
        partition.set_assignments(vec![1, 1, 1, 2, 1, 2, 2, 1, 2]);

        assert!(!partition.check_node_contiguity(4, 2));
        assert!(!partition.check_node_contiguity(1, 2));
        assert!(partition.check_node_contiguity(7, 2));
        assert!(partition.check_node_contiguity(3, 1));
    }

    #[test]
    fn moves_must_border_the_destination() {
        let mut partition = lattice(3);
        partition.set_assignments(vec![1, 1, 1, 1, 1, 1, 2, 2, 3]);
        assert!(!partition.check_node_contiguity(0, 3));
        assert!(partition.check_node_contiguity(5, 3));
    }

    #[test]
    fn contiguity_of_whole_partitions() {
        let mut partition = lattice(2);
        partition.set_assignments(vec![1, 1, 1, 1, 1, 1, 2, 2, 2]);
        assert!(partition.is_contiguous());

        partition.set_assignments(vec![1, 2, 1, 1, 2, 1, 1, 1, 1]);
        assert!(partition.is_contiguous());

        partition.set_assignments(vec![1, 2, 1, 1, 1, 1, 1, 2, 1]);
        assert!(!partition.is_contiguous());
    }

    #[test]
    fn empty_or_unassigned_parts_are_not_contiguous() {
        let mut partition = lattice(2);
        partition.set_assignments(vec![1; 9]);
        assert!(!partition.is_contiguous());

        partition.set_assignments(vec![1, 1, 1, 1, 0, 2, 2, 2, 2]);
        assert!(!partition.is_contiguous());
    }
}
