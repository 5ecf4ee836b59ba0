//! Heterogeneous graph nodes.

use crate::frame_graph2::pass_node::PassNode;
use crate::frame_graph2::resource_node::ResourceNode;

///
#[derive(Debug)]
pub enum NodeKind {
    Pass(PassNode),
    Resource(ResourceNode),
}

/// A vertex of the frame graph: either a pass or a resource version,
/// together with its cull bookkeeping.
#[derive(Debug)]
pub struct Node {
    kind: NodeKind,
    ref_count: u16,
    uncullable: bool,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            ref_count: 0,
            uncullable: false,
        }
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut NodeKind {
        &mut self.kind
    }

    pub fn name(&self) -> &str {
        match &self.kind {
            NodeKind::Pass(pass) => pass.name(),
            NodeKind::Resource(resource) => resource.name(),
        }
    }

    /// A node with no remaining references is dead weight unless something
    /// outside the graph observes it.
    pub fn is_culled(&self) -> bool {
        self.ref_count == 0 && !self.uncullable
    }

    pub fn is_uncullable(&self) -> bool {
        self.uncullable
    }

    pub fn ref_count(&self) -> u16 {
        self.ref_count
    }

    pub fn mark_uncullable(&mut self) {
        self.uncullable = true;
    }

    pub fn set_ref_count(&mut self, count: u16) {
        self.ref_count = count;
    }

    pub fn sub_ref(&mut self, count: u16) {
        self.ref_count = self.ref_count.saturating_sub(count);
    }
}
