/// A read-only CSR (Compressed Sparse Row) adjacency matrix over polygons.
///
/// `offsets[u]..offsets[u+1]` indexes into `neighbors` to give the sorted
/// list of polygons adjacent to polygon `u`.  Supports O(log deg) membership
/// tests via binary search.
///
/// The matrix is always symmetric and never contains self-loops: every
/// constructor inserts both directions of an edge and drops `u == v` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdjacencyMatrix {
    /// CSR row offsets; length = `num_units + 1`.
    offsets: Vec<u32>,
    /// Flattened neighbor lists; sorted and deduplicated within each row.
    neighbors: Vec<u32>,
}

impl AdjacencyMatrix {
    /// Build a matrix over `num_units` polygons from an undirected edge list.
    pub fn from_edges(num_units: usize, edges: impl IntoIterator<Item = (u32, u32)>) -> Self {
        let mut lists = vec![Vec::new(); num_units];
        for (u, v) in edges {
            assert!((u as usize) < num_units && (v as usize) < num_units,
                "edge ({u}, {v}) out of range for {num_units} units");
            if u == v { continue }
            lists[u as usize].push(v);
            lists[v as usize].push(u);
        }
        Self::from_lists(lists)
    }

    /// Build a matrix from per-unit neighbor lists, symmetrizing as needed.
    pub fn from_lists(mut lists: Vec<Vec<u32>>) -> Self {
        let num_units = lists.len();

        // Mirror every edge so the result is symmetric even for one-sided input.
        let mirrored = lists.iter().enumerate()
            .flat_map(|(u, row)| row.iter().map(move |&v| (v as usize, u as u32)))
            .collect::<Vec<_>>();
        for (v, u) in mirrored {
            assert!(v < num_units, "neighbor {v} out of range for {num_units} units");
            lists[v].push(u);
        }

        for (u, row) in lists.iter_mut().enumerate() {
            row.retain(|&v| v as usize != u);
            row.sort_unstable();
            row.dedup();
        }

        Self {
            offsets: std::iter::once(0u32).chain(
                lists.iter()
                    .map(|row| row.len() as u32)
                    .scan(0u32, |acc, len| { *acc += len; Some(*acc) })
            ).collect(),
            neighbors: lists.into_iter().flatten().collect(),
        }
    }

    /// Number of units covered by this matrix.
    #[inline] pub fn num_units(&self) -> usize { self.offsets.len().saturating_sub(1) }

    /// Number of undirected edges.
    #[inline] pub fn num_edges(&self) -> usize { self.neighbors.len() / 2 }

    /// Sorted slice of units adjacent to `unit`.
    #[inline]
    pub fn neighbors(&self, unit: usize) -> &[u32] {
        &self.neighbors[self.offsets[unit] as usize .. self.offsets[unit + 1] as usize]
    }

    /// Number of units adjacent to `unit`.
    #[inline] pub fn degree(&self, unit: usize) -> usize { self.neighbors(unit).len() }

    /// Returns `true` if `other` is adjacent to `unit` (binary search).
    #[inline]
    pub fn contains(&self, unit: usize, other: usize) -> bool {
        self.neighbors(unit).binary_search(&(other as u32)).is_ok()
    }

    /// Iterate over every undirected edge once, as `(u, v)` with `u < v`.
    pub fn edges(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (0..self.num_units()).flat_map(move |u| {
            self.neighbors(u).iter()
                .filter(move |&&v| (v as usize) > u)
                .map(move |&v| (u as u32, v))
        })
    }

    /// Return a copy of this matrix with additional undirected edges inserted.
    pub fn with_edges(&self, extra: &[(u32, u32)]) -> Self {
        Self::from_edges(self.num_units(), self.edges().chain(extra.iter().copied()))
    }

    /// Expand back into owned per-unit neighbor lists.
    pub fn to_lists(&self) -> Vec<Vec<u32>> {
        (0..self.num_units()).map(|u| self.neighbors(u).to_vec()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_graph() -> AdjacencyMatrix {
        // 0 - 1 - 2 - 3
        AdjacencyMatrix::from_edges(4, [(0, 1), (1, 2), (2, 3)])
    }

    #[test]
    fn csr_layout_is_cumulative() {
        let adj = path_graph();
        assert_eq!(adj.offsets, vec![0, 1, 3, 5, 6]);
        assert_eq!(adj.neighbors, vec![1, 0, 2, 1, 3, 2]);
        assert_eq!(adj.num_units(), 4);
        assert_eq!(adj.num_edges(), 3);
    }

    #[test]
    fn one_sided_lists_are_symmetrized() {
        let adj = AdjacencyMatrix::from_lists(vec![vec![1, 2], vec![], vec![]]);
        assert!(adj.contains(1, 0));
        assert!(adj.contains(2, 0));
        assert!(!adj.contains(1, 2));
    }

    #[test]
    fn self_loops_and_duplicates_are_dropped() {
        let adj = AdjacencyMatrix::from_edges(3, [(0, 0), (0, 1), (1, 0), (0, 1)]);
        assert_eq!(adj.neighbors(0), &[1]);
        assert_eq!(adj.neighbors(1), &[0]);
        assert_eq!(adj.degree(2), 0);
    }

    #[test]
    fn edges_are_listed_once() {
        let adj = path_graph();
        assert_eq!(adj.edges().collect::<Vec<_>>(), vec![(0, 1), (1, 2), (2, 3)]);
    }

    #[test]
    fn with_edges_adds_without_mutating() {
        let adj = path_graph();
        let bridged = adj.with_edges(&[(0, 3)]);
        assert!(!adj.contains(0, 3));
        assert!(bridged.contains(0, 3));
        assert!(bridged.contains(3, 0));
        assert_eq!(bridged.num_edges(), 4);
    }

    #[test]
    fn empty_matrix_is_valid() {
        let adj = AdjacencyMatrix::from_lists(vec![]);
        assert_eq!(adj.num_units(), 0);
        assert_eq!(adj.num_edges(), 0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn from_edges_panics_on_out_of_range_unit() {
        AdjacencyMatrix::from_edges(2, [(0, 2)]);
    }
}
