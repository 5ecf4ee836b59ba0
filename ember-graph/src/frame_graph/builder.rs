//! The pass setup facade.

use crate::frame_graph::resource::{
    BufferCreateInfo, BufferHandle, ResourceHandle, TextureCreateInfo, TextureHandle,
};
use crate::frame_graph::usage::ResourceUsage;
use crate::frame_graph::{FrameGraph, PassId};

/// Scoped to a single pass while its setup closure runs; declares the
/// resources the pass creates, reads and writes. The builder never owns
/// resources, it only records usages by handle.
pub struct Builder<'a> {
    frame_graph: &'a mut FrameGraph,
    pass: PassId,
}

impl<'a> Builder<'a> {
    pub(crate) fn new(frame_graph: &'a mut FrameGraph, pass: PassId) -> Self {
        Self { frame_graph, pass }
    }

    /// Registers a texture created by this pass. The texture is realized on
    /// the device just before the pass executes and destroyed at frame
    /// teardown.
    pub fn create_texture(
        &mut self,
        name: impl Into<String>,
        create_info: TextureCreateInfo,
    ) -> TextureHandle {
        self.frame_graph
            .create_texture(self.pass, name.into(), create_info)
    }

    /// Registers a buffer created by this pass.
    pub fn create_buffer(
        &mut self,
        name: impl Into<String>,
        create_info: BufferCreateInfo,
    ) -> BufferHandle {
        self.frame_graph
            .create_buffer(self.pass, name.into(), create_info)
    }

    /// Declares a read of `handle`; the usage OR-merges into the pass's read
    /// set. Returns the handle for threading through pass data.
    pub fn read<H: ResourceHandle>(&mut self, handle: H, resource_usage: ResourceUsage) -> H {
        let reads = &mut self.frame_graph.pass_resources[self.pass.index()].reads;
        *reads.entry(handle.resource_id()).or_insert(ResourceUsage::NONE) |= resource_usage;
        handle
    }

    /// Declares a write of `handle`; the usage OR-merges into the pass's
    /// write set. Returns the handle for threading through pass data.
    pub fn write<H: ResourceHandle>(&mut self, handle: H, resource_usage: ResourceUsage) -> H {
        let writes = &mut self.frame_graph.pass_resources[self.pass.index()].writes;
        *writes.entry(handle.resource_id()).or_insert(ResourceUsage::NONE) |= resource_usage;
        handle
    }
}
