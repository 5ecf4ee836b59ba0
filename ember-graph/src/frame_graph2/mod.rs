//! Second-generation frame graph.
//!
//! Passes and resources are first-class vertices of one heterogeneous
//! graph. A write allocates a new version of the resource node (SSA-style),
//! which makes read-after-write dependencies plain edges; unreferenced work
//! is removed by reference-count culling before a Kahn topological sort
//! derives execution order and dependency levels in one pass.
//!
//! This generation is the declarative/analysis core; execution and barrier
//! planning stay with [`crate::frame_graph`]. [`FrameGraph::export_graphviz`]
//! renders the graph for <https://dreampuf.github.io/GraphvizOnline>.

mod builder;
mod edge;
mod graph;
mod handle;
mod node;
mod pass_node;
mod resource_node;
mod usage;

pub use builder::Builder;
pub use edge::Edge;
pub use graph::{Direction, EdgeIndex, Graph, NodeIndex};
pub use handle::{BufferHandle, NodeHandle, TextureHandle};
pub use node::{Node, NodeKind};
pub use pass_node::PassNode;
pub use resource_node::{ResourceNode, ResourcePayload};
pub use usage::{to_access_flags, BufferResourceUsage, ResourceUsage, TextureResourceUsage};

use tracing::{debug, instrument};

use crate::error::FrameGraphError;
use crate::frame_graph::{BufferCreateInfo, QueueType, TextureCreateInfo};

/// Non-culled nodes whose longest-path distance from any root is `level`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyLevel {
    pub level: u32,
    pub node_indices: Vec<NodeIndex>,
}

///
#[derive(Default)]
pub struct FrameGraph {
    graph: Graph<Node, Edge>,
    pass_nodes: Vec<NodeIndex>,
    resource_nodes: Vec<NodeIndex>,
    topologically_sorted: Vec<NodeIndex>,
    dependency_levels: Vec<DependencyLevel>,
}

impl FrameGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a pass; `setup` declares its resource edges through the
    /// [`Builder`] and returns user data handed back to the caller.
    pub fn add_pass<D, S>(&mut self, queue_type: QueueType, name: impl Into<String>, setup: S) -> D
    where
        S: FnOnce(&mut Builder<'_>) -> D,
    {
        let node_index = self
            .graph
            .add_node(Node::new(NodeKind::Pass(PassNode::new(
                name.into(),
                queue_type,
            ))));
        self.pass_nodes.push(node_index);

        let mut builder = Builder::new(self, node_index);
        setup(&mut builder)
    }

    /// Registers a texture that lives outside the graph.
    pub fn import_texture(
        &mut self,
        name: impl Into<String>,
        create_info: TextureCreateInfo,
    ) -> TextureHandle {
        let node_index = self.add_resource_node(ResourceNode::new(
            name.into(),
            true,
            None,
            None,
            None,
            0,
            ResourcePayload::Texture(create_info),
        ));
        TextureHandle::from_node_index(node_index)
    }

    /// Registers a buffer that lives outside the graph.
    pub fn import_buffer(
        &mut self,
        name: impl Into<String>,
        create_info: BufferCreateInfo,
    ) -> BufferHandle {
        let node_index = self.add_resource_node(ResourceNode::new(
            name.into(),
            true,
            None,
            None,
            None,
            0,
            ResourcePayload::Buffer(create_info),
        ));
        BufferHandle::from_node_index(node_index)
    }

    /// Culls unreferenced nodes, then derives execution order and dependency
    /// levels with Kahn's algorithm over the remaining ones.
    #[instrument(level = "debug", skip_all)]
    pub fn compile(&mut self) -> Result<(), FrameGraphError> {
        self.cull_nodes();
        let (sorted, levels) = self.topological_sort()?;
        self.topologically_sorted = sorted;
        self.dependency_levels = levels;

        debug!(
            nodes = self.graph.node_count(),
            alive = self.topologically_sorted.len(),
            levels = self.dependency_levels.len(),
            "node graph compiled"
        );
        Ok(())
    }

    /// Non-culled nodes in execution order, as of the last `compile()`.
    pub fn execution_order(&self) -> &[NodeIndex] {
        &self.topologically_sorted
    }

    /// Dependency levels as of the last `compile()`.
    pub fn dependency_levels(&self) -> &[DependencyLevel] {
        &self.dependency_levels
    }

    pub fn node(&self, node_index: NodeIndex) -> Option<&Node> {
        self.graph.node_weight(node_index)
    }

    pub fn pass_nodes(&self) -> &[NodeIndex] {
        &self.pass_nodes
    }

    pub fn resource_nodes(&self) -> &[NodeIndex] {
        &self.resource_nodes
    }

    /// Renders the graph as a colored GraphViz digraph: passes orange,
    /// resources blue, culled nodes dimmed, write edges red.
    pub fn export_graphviz(&self) -> String {
        self.graph.export_graphviz(
            |node| {
                let fill = match node.kind() {
                    NodeKind::Pass(_) => {
                        if node.is_culled() {
                            "darkorange4"
                        } else {
                            "darkorange"
                        }
                    }
                    NodeKind::Resource(_) => {
                        if node.is_culled() {
                            "skyblue4"
                        } else {
                            "skyblue"
                        }
                    }
                };
                format!("[label=\"{}\" style=filled, fillcolor={}]", node.name(), fill)
            },
            |from, to, edge| {
                let color = if edge.is_write() {
                    "firebrick"
                } else {
                    "darkolivegreen"
                };

                let culled = |index: NodeIndex| {
                    self.graph
                        .node_weight(index)
                        .is_some_and(Node::is_culled)
                };
                if culled(from) && culled(to) {
                    format!("[color={color}4 style=dashed]")
                } else {
                    format!("[color={color}2]")
                }
            },
        )
    }

    fn add_resource_node(&mut self, resource: ResourceNode) -> NodeIndex {
        let node_index = self.graph.add_node(Node::new(NodeKind::Resource(resource)));
        self.resource_nodes.push(node_index);
        node_index
    }

    fn mark_uncullable(&mut self, node_index: NodeIndex) {
        if let Some(node) = self.graph.node_weight_mut(node_index) {
            node.mark_uncullable();
        }
    }

    fn create_texture(
        &mut self,
        pass_node: NodeIndex,
        name: String,
        create_info: TextureCreateInfo,
    ) -> TextureHandle {
        let node_index = self.add_resource_node(ResourceNode::new(
            name,
            false,
            Some(pass_node),
            None,
            None,
            0,
            ResourcePayload::Texture(create_info),
        ));
        TextureHandle::from_node_index(node_index)
    }

    fn create_buffer(
        &mut self,
        pass_node: NodeIndex,
        name: String,
        create_info: BufferCreateInfo,
    ) -> BufferHandle {
        let node_index = self.add_resource_node(ResourceNode::new(
            name,
            false,
            Some(pass_node),
            None,
            None,
            0,
            ResourcePayload::Buffer(create_info),
        ));
        BufferHandle::from_node_index(node_index)
    }

    fn read_impl(
        &mut self,
        pass_node: NodeIndex,
        node_index: NodeIndex,
        resource_usage: ResourceUsage,
    ) -> NodeIndex {
        self.graph
            .add_edge(node_index, pass_node, Edge::read(resource_usage));

        if let Some(node) = self.graph.node_weight_mut(node_index)
            && let NodeKind::Resource(resource) = node.kind_mut()
        {
            resource.add_reader(pass_node);
        }

        node_index
    }

    /// A write forks a new version of the resource: the pass depends on the
    /// old version, and the new version depends on the pass.
    fn write_impl(
        &mut self,
        pass_node: NodeIndex,
        node_index: NodeIndex,
        resource_usage: ResourceUsage,
    ) -> NodeIndex {
        let (name, imported, generation) = {
            let node = self
                .graph
                .node_weight(node_index)
                .expect("write target does not exist");
            let NodeKind::Resource(resource) = node.kind() else {
                unreachable!("write target is not a resource node");
            };
            (
                resource.name().to_string(),
                resource.is_imported(),
                resource.generation(),
            )
        };

        let ref_index = self.add_resource_node(ResourceNode::new(
            name,
            imported,
            None,
            Some(pass_node),
            Some(node_index),
            generation + 1,
            ResourcePayload::Ref { origin: node_index },
        ));

        self.graph
            .add_edge(node_index, pass_node, Edge::read(ResourceUsage::NONE));
        self.graph
            .add_edge(pass_node, ref_index, Edge::write(resource_usage));

        ref_index
    }

    /// Seeds every node's reference count with its outgoing-edge count, then
    /// cascades: culling a node releases its references to the nodes it
    /// consumed, which may cull those in turn.
    fn cull_nodes(&mut self) {
        let node_count = self.graph.node_count();
        let mut counts = vec![0u16; node_count];
        for (from, _to, _edge) in self.graph.edges() {
            counts[from.index()] += 1;
        }
        let indices: Vec<NodeIndex> = self.graph.node_indices().collect();
        for index in indices {
            if let Some(node) = self.graph.node_weight_mut(index) {
                node.set_ref_count(counts[index.index()]);
            }
        }

        let mut stack: Vec<NodeIndex> = self
            .graph
            .nodes()
            .filter(|(_, node)| node.is_culled())
            .map(|(index, _)| index)
            .collect();

        while let Some(node_index) = stack.pop() {
            let incoming: Vec<NodeIndex> = self
                .graph
                .neighbors_directed(node_index, Direction::Incoming)
                .collect();

            for incoming_index in incoming {
                let node = self
                    .graph
                    .node_weight_mut(incoming_index)
                    .expect("edge endpoint does not exist");
                if node.is_culled() {
                    continue;
                }
                node.sub_ref(1);
                if node.is_culled() {
                    stack.push(incoming_index);
                }
            }
        }
    }

    /// Kahn's algorithm over non-culled nodes; levels relax to the longest
    /// path seen on any incoming edge.
    fn topological_sort(&self) -> Result<(Vec<NodeIndex>, Vec<DependencyLevel>), FrameGraphError> {
        let node_count = self.graph.node_count();
        let culled: Vec<bool> = (0..node_count)
            .map(|index| {
                self.graph
                    .node_weight(NodeIndex::new(index))
                    .is_none_or(Node::is_culled)
            })
            .collect();
        let alive_count = culled.iter().filter(|&&is_culled| !is_culled).count();

        let mut in_degree = vec![0u32; node_count];
        for (from, to, _edge) in self.graph.edges() {
            if !culled[from.index()] && !culled[to.index()] {
                in_degree[to.index()] += 1;
            }
        }

        let mut stack: Vec<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|index| !culled[index.index()] && in_degree[index.index()] == 0)
            .collect();

        let mut levels = vec![0u32; node_count];
        let mut level_count = 1;
        let mut sorted = Vec::with_capacity(alive_count);

        while let Some(node_index) = stack.pop() {
            sorted.push(node_index);

            let neighbors: Vec<NodeIndex> = self
                .graph
                .neighbors_directed(node_index, Direction::Outgoing)
                .collect();
            for neighbor in neighbors {
                if culled[neighbor.index()] {
                    continue;
                }

                let level = levels[node_index.index()] + 1;
                if levels[neighbor.index()] < level {
                    levels[neighbor.index()] = level;
                    level_count = level_count.max(level + 1);
                }

                in_degree[neighbor.index()] -= 1;
                if in_degree[neighbor.index()] == 0 {
                    stack.push(neighbor);
                }
            }
        }

        if sorted.len() != alive_count {
            let mut remaining = (0..node_count).filter(|&index| {
                !culled[index] && !sorted.contains(&NodeIndex::new(index))
            });
            let name = |index: Option<usize>| {
                index
                    .and_then(|index| self.graph.node_weight(NodeIndex::new(index)))
                    .map(|node| node.name().to_string())
                    .unwrap_or_default()
            };
            let first = remaining.next();
            let second = remaining.next().or(first);
            return Err(FrameGraphError::CycleDetected {
                from: name(first),
                to: name(second),
            });
        }

        let mut dependency_levels: Vec<DependencyLevel> = (0..level_count)
            .map(|level| DependencyLevel {
                level,
                node_indices: Vec::new(),
            })
            .collect();
        for &node_index in &sorted {
            let level = levels[node_index.index()];
            dependency_levels[level as usize].node_indices.push(node_index);
        }

        Ok((sorted, dependency_levels))
    }
}
