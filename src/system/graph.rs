//! Compressed adjacency storage for compiled systems.

/// Collects directed edges, then freezes them into a [`Graph`].
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    num_nodes: usize,
    edges: Vec<(usize, usize)>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with at least `num_nodes` nodes, even if some stay unconnected
    pub fn with_nodes(num_nodes: usize) -> Self {
        GraphBuilder {
            num_nodes,
            edges: Vec::new(),
        }
    }

    pub fn add_edge(&mut self, tail: usize, head: usize) {
        self.num_nodes = self.num_nodes.max(tail + 1).max(head + 1);
        self.edges.push((tail, head));
    }

    /// Freeze into compressed sparse row form.
    ///
    /// Out-neighbors keep the order their edges were added in.
    pub fn compressed(self) -> Graph {
        let mut counts = vec![0usize; self.num_nodes + 1];
        for &(tail, _) in &self.edges {
            counts[tail + 1] += 1;
        }
        for i in 1..counts.len() {
            counts[i] += counts[i - 1];
        }

        let heads_idxs = counts.clone();
        let mut fill = counts;
        let mut heads = vec![0usize; self.edges.len()];
        for (tail, head) in self.edges {
            heads[fill[tail]] = head;
            fill[tail] += 1;
        }

        Graph { heads_idxs, heads }
    }
}

/// Directed graph in compressed sparse row form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    heads_idxs: Vec<usize>,
    heads: Vec<usize>,
}

impl Graph {
    pub fn num_nodes(&self) -> usize {
        self.heads_idxs.len() - 1
    }

    pub fn num_edges(&self) -> usize {
        self.heads.len()
    }

    /// Heads of all edges leaving `node`; empty for unknown nodes
    pub fn out_neighbors(&self, node: usize) -> &[usize] {
        match (self.heads_idxs.get(node), self.heads_idxs.get(node + 1)) {
            (Some(&start), Some(&end)) => &self.heads[start..end],
            _ => &[],
        }
    }
}

impl Default for Graph {
    fn default() -> Self {
        GraphBuilder::new().compressed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_graph() {
        let g = Graph::default();
        assert_eq!(g.num_nodes(), 0);
        assert_eq!(g.num_edges(), 0);
        assert!(g.out_neighbors(0).is_empty());
    }

    #[test]
    fn out_neighbors_keep_insertion_order() {
        let mut b = GraphBuilder::new();
        b.add_edge(2, 0);
        b.add_edge(0, 1);
        b.add_edge(2, 1);
        b.add_edge(1, 0);
        let g = b.compressed();

        assert_eq!(g.num_nodes(), 3);
        assert_eq!(g.num_edges(), 4);
        assert_eq!(g.out_neighbors(0), &[1]);
        assert_eq!(g.out_neighbors(1), &[0]);
        assert_eq!(g.out_neighbors(2), &[0, 1]);
    }

    #[test]
    fn isolated_nodes_are_kept() {
        let mut b = GraphBuilder::with_nodes(5);
        b.add_edge(0, 1);
        let g = b.compressed();
        assert_eq!(g.num_nodes(), 5);
        assert!(g.out_neighbors(4).is_empty());
        assert!(g.out_neighbors(17).is_empty());
    }
}
