use geograph::AdjacencyMatrix;

/// A node-weighted, undirected graph in compressed sparse row format.
#[derive(Debug, Clone, Default)]
pub(crate) struct Graph {
    size: usize,
    offsets: Vec<u32>,
    edges: Vec<u32>,
    node_weights: Vec<f64>,
}

impl Graph {
    /// Construct a graph from adjacency lists and node weights.
    pub(crate) fn new(num_nodes: usize, edges: &[Vec<u32>], node_weights: Vec<f64>) -> Self {
        assert!(edges.len() == num_nodes, "edges.len() must equal num_nodes");
        assert!(node_weights.len() == num_nodes, "node_weights.len() must equal num_nodes");

        Self {
            size: num_nodes,
            offsets: std::iter::once(0u32).chain(
                edges.iter()
                    .map(|v| v.len() as u32)
                    .scan(0u32, |acc, len| {*acc += len; Some(*acc)})
            ).collect::<Vec<u32>>(),
            edges: edges.iter().flatten().copied().collect(),
            node_weights,
        }
    }

    /// Construct a graph with unit weight on every node.
    pub(crate) fn from_adjacency(adj: &AdjacencyMatrix) -> Self {
        Self::new(adj.num_units(), &adj.to_lists(), vec![1.0; adj.num_units()])
    }

    /// Get the number of nodes in the graph.
    #[inline] pub(crate) fn node_count(&self) -> usize { self.size }

    /// Get the weight of a node.
    #[inline] pub(crate) fn node_weight(&self, node: usize) -> f64 { self.node_weights[node] }

    /// Get the total weight of all nodes.
    #[inline] pub(crate) fn total_weight(&self) -> f64 { self.node_weights.iter().sum() }

    /// Get the range of edges for a given node.
    #[inline]
    fn range(&self, node: usize) -> std::ops::Range<usize> {
        self.offsets[node] as usize .. self.offsets[node + 1] as usize
    }

    /// Get an iterator over the neighbors of a given node.
    #[inline]
    pub(crate) fn edges(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.range(node).map(move |v| self.edges[v] as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_graph() -> Graph {
        Graph::new(
            4,
            &[
                vec![1, 2],       // 0
                vec![0, 2],       // 1
                vec![0, 1, 3],    // 2
                vec![2],          // 3
            ],
            vec![1.0, 2.0, 3.0, 4.0],
        )
    }

    #[test]
    fn csr_graph_construction() {
        let graph = make_test_graph();

        assert_eq!(graph.node_count(), 4);

        // Offsets are cumulative neighbor counts, len = nodes + 1
        assert_eq!(graph.offsets, vec![0, 2, 4, 7, 8]);
        assert_eq!(graph.edges, vec![1, 2, 0, 2, 0, 1, 3, 2]);
        assert_eq!(graph.total_weight(), 10.0);
    }

    #[test]
    fn neighbor_access() {
        let graph = make_test_graph();

        assert_eq!(graph.edges(2).collect::<Vec<_>>(), vec![0, 1, 3]);
        assert_eq!(graph.edges(3).collect::<Vec<_>>(), vec![2]);
        assert_eq!(graph.node_weight(2), 3.0);
    }

    #[test]
    fn from_adjacency_uses_unit_weights() {
        let adj = AdjacencyMatrix::from_edges(3, [(0, 1), (1, 2)]);
        let graph = Graph::from_adjacency(&adj);

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edges(1).collect::<Vec<_>>(), vec![0, 2]);
        assert!((0..3).all(|u| graph.node_weight(u) == 1.0));
    }

    #[test]
    fn empty_graph_is_valid() {
        let graph = Graph::new(0, &[], vec![]);
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.offsets, vec![0]);
    }

    #[test]
    #[should_panic(expected = "edges.len() must equal num_nodes")]
    fn new_panics_when_edges_len_mismatch() {
        Graph::new(0, &[vec![]], vec![]);
    }

    #[test]
    #[should_panic(expected = "node_weights.len() must equal num_nodes")]
    fn new_panics_when_weights_len_mismatch() {
        Graph::new(1, &[vec![]], vec![]);
    }
}
