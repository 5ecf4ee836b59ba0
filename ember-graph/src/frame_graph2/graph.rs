//! A minimal directed graph with stable indices.
//!
//! Nodes and edges live in flat arrays and are addressed by `u16` indices;
//! neighbor queries filter the edge list. The API imitates petgraph's, cut
//! down to what the frame graph needs.

use std::fmt::Write as _;

///
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeIndex(u16);

impl NodeIndex {
    pub(crate) const fn new(index: usize) -> Self {
        Self(index as u16)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

///
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeIndex(u16);

impl EdgeIndex {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Edge direction relative to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Outgoing,
    Incoming,
}

#[derive(Debug)]
struct NodeEntry<N> {
    weight: N,
}

#[derive(Debug)]
struct EdgeEntry<E> {
    weight: E,
    from: NodeIndex,
    to: NodeIndex,
}

///
#[derive(Debug)]
pub struct Graph<N, E> {
    nodes: Vec<NodeEntry<N>>,
    edges: Vec<EdgeEntry<E>>,
}

impl<N, E> Default for Graph<N, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N, E> Graph<N, E> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn add_node(&mut self, weight: N) -> NodeIndex {
        let index = NodeIndex::new(self.nodes.len());
        self.nodes.push(NodeEntry { weight });
        index
    }

    pub fn node_weight(&self, node: NodeIndex) -> Option<&N> {
        self.nodes.get(node.index()).map(|entry| &entry.weight)
    }

    pub fn node_weight_mut(&mut self, node: NodeIndex) -> Option<&mut N> {
        self.nodes
            .get_mut(node.index())
            .map(|entry| &mut entry.weight)
    }

    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> {
        (0..self.nodes.len()).map(NodeIndex::new)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &N)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, entry)| (NodeIndex::new(index), &entry.weight))
    }

    pub fn add_edge(&mut self, from: NodeIndex, to: NodeIndex, weight: E) -> EdgeIndex {
        let index = EdgeIndex(self.edges.len() as u16);
        self.edges.push(EdgeEntry { weight, from, to });
        index
    }

    pub fn edge_weight(&self, edge: EdgeIndex) -> Option<&E> {
        self.edges.get(edge.index()).map(|entry| &entry.weight)
    }

    /// Every edge as `(from, to, weight)`.
    pub fn edges(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex, &E)> {
        self.edges
            .iter()
            .map(|entry| (entry.from, entry.to, &entry.weight))
    }

    /// Neighbor node indices along `direction`.
    pub fn neighbors_directed(
        &self,
        node: NodeIndex,
        direction: Direction,
    ) -> impl Iterator<Item = NodeIndex> + '_ {
        self.edges.iter().filter_map(move |entry| match direction {
            Direction::Outgoing if entry.from == node => Some(entry.to),
            Direction::Incoming if entry.to == node => Some(entry.from),
            _ => None,
        })
    }

    /// Renders the graph as a GraphViz digraph.
    ///
    /// `node_attributes` and `edge_attributes` return the bracketed
    /// attribute list for each node and edge.
    pub fn export_graphviz(
        &self,
        mut node_attributes: impl FnMut(&N) -> String,
        mut edge_attributes: impl FnMut(NodeIndex, NodeIndex, &E) -> String,
    ) -> String {
        let mut out = String::new();
        out.push_str("digraph \"graph\" {\n");
        out.push_str("rankdir = LR\n");
        out.push_str("bgcolor = black\n");
        out.push_str("graph [fontname = \"helvetica\"];\n");
        out.push_str("edge [fontname = \"helvetica\", fontcolor=white, fontsize=8];\n");
        out.push_str("node [shape=rectangle, fontname=\"helvetica\", fontsize=10];\n\n");

        for (index, entry) in self.nodes.iter().enumerate() {
            let attributes = node_attributes(&entry.weight);
            let _ = writeln!(out, "\"N{index}\" {attributes}");
        }

        out.push('\n');

        for entry in &self.edges {
            let attributes = edge_attributes(entry.from, entry.to, &entry.weight);
            let _ = writeln!(
                out,
                "N{} -> N{} {};",
                entry.from.index(),
                entry.to.index(),
                attributes
            );
        }

        out.push('}');
        out
    }
}
