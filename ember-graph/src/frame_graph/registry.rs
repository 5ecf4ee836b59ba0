//! Virtual handle to backend handle mapping.

use ahash::AHashMap;

use crate::frame_graph::resource::{BufferHandle, TextureHandle};

/// Maps virtual handles to realized backend handles.
///
/// Entries appear when a resource is realized (just before its creator pass
/// runs, or at the start of execution for imported resources) and stay valid
/// until [`FrameGraph::reset`](crate::FrameGraph::reset). Execute closures
/// receive the registry read-only.
#[derive(Debug, Default)]
pub struct Registry {
    textures: AHashMap<TextureHandle, ember_rhi::TextureHandle>,
    buffers: AHashMap<BufferHandle, ember_rhi::BufferHandle>,
}

impl Registry {
    pub(crate) fn add_texture(&mut self, handle: TextureHandle, backend: ember_rhi::TextureHandle) {
        self.textures.insert(handle, backend);
    }

    pub(crate) fn add_buffer(&mut self, handle: BufferHandle, backend: ember_rhi::BufferHandle) {
        self.buffers.insert(handle, backend);
    }

    pub(crate) fn clear(&mut self) {
        self.textures.clear();
        self.buffers.clear();
    }

    /// # Panics
    ///
    /// Panics when the texture has not been realized yet; handles only
    /// resolve during `execute`.
    pub fn get_texture(&self, handle: TextureHandle) -> ember_rhi::TextureHandle {
        match self.textures.get(&handle) {
            Some(backend) => *backend,
            None => panic!("texture {handle:?} has not been realized"),
        }
    }

    /// # Panics
    ///
    /// Panics when the buffer has not been realized yet; handles only
    /// resolve during `execute`.
    pub fn get_buffer(&self, handle: BufferHandle) -> ember_rhi::BufferHandle {
        match self.buffers.get(&handle) {
            Some(backend) => *backend,
            None => panic!("buffer {handle:?} has not been realized"),
        }
    }
}
