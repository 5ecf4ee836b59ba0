//! The pass setup facade of the node graph.

use crate::frame_graph::{BufferCreateInfo, TextureCreateInfo};
use crate::frame_graph2::graph::NodeIndex;
use crate::frame_graph2::handle::{BufferHandle, NodeHandle, TextureHandle};
use crate::frame_graph2::FrameGraph;

/// Scoped to a single pass while its setup closure runs.
pub struct Builder<'a> {
    frame_graph: &'a mut FrameGraph,
    pass_node: NodeIndex,
}

impl<'a> Builder<'a> {
    pub(crate) fn new(frame_graph: &'a mut FrameGraph, pass_node: NodeIndex) -> Self {
        Self {
            frame_graph,
            pass_node,
        }
    }

    /// Registers a texture created by this pass.
    pub fn create_texture(
        &mut self,
        name: impl Into<String>,
        create_info: TextureCreateInfo,
    ) -> TextureHandle {
        self.frame_graph
            .create_texture(self.pass_node, name.into(), create_info)
    }

    /// Registers a buffer created by this pass.
    pub fn create_buffer(
        &mut self,
        name: impl Into<String>,
        create_info: BufferCreateInfo,
    ) -> BufferHandle {
        self.frame_graph
            .create_buffer(self.pass_node, name.into(), create_info)
    }

    /// Declares a read of the given resource version.
    pub fn read<H: NodeHandle>(&mut self, handle: H, resource_usage: H::Usage) -> H {
        let node_index =
            self.frame_graph
                .read_impl(self.pass_node, handle.node_index(), resource_usage.into());
        H::from_node_index(node_index)
    }

    /// Declares a write; allocates and returns a new version of the
    /// resource. Passes that want the written contents read the returned
    /// handle.
    pub fn write<H: NodeHandle>(&mut self, handle: H, resource_usage: H::Usage) -> H {
        let node_index =
            self.frame_graph
                .write_impl(self.pass_node, handle.node_index(), resource_usage.into());
        H::from_node_index(node_index)
    }

    /// Marks the pass as externally observable; it survives culling even
    /// with no referenced outputs.
    pub fn side_effect(&mut self) {
        self.frame_graph.mark_uncullable(self.pass_node);
    }
}
