//! A device that owns no GPU.
//!
//! [`HeadlessDevice`] implements [`DeviceContext`] by allocating virtual
//! handles and recording every call, which makes it useful for tests,
//! CI without a GPU, and inspecting what a frame graph actually submits.

use ahash::AHashMap;
use ember_rhi::{
    BufferCreateInfo, BufferHandle, BufferUpdateRegion, DeviceContext, PresentInfo,
    QueueFamilyIndices, SubmitInfo, TextureCreateInfo, TextureHandle, TextureViewCreateInfo,
    TextureViewHandle,
};
use tracing::trace;

/// One `submit` call, as received.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub submit_infos: Vec<SubmitInfo>,
    pub present_infos: Vec<PresentInfo>,
}

/// A [`DeviceContext`] that records instead of rendering.
///
/// Handles are allocated from one monotonically increasing counter, so two
/// fresh devices driven identically hand out identical handles.
#[derive(Debug)]
pub struct HeadlessDevice {
    queue_family_indices: QueueFamilyIndices,
    next_handle: u64,
    buffers: AHashMap<BufferHandle, BufferCreateInfo>,
    textures: AHashMap<TextureHandle, TextureCreateInfo>,
    texture_views: AHashMap<TextureViewHandle, TextureViewCreateInfo>,
    destroyed_buffers: Vec<BufferHandle>,
    destroyed_textures: Vec<TextureHandle>,
    buffer_updates: Vec<(BufferHandle, Vec<Vec<u8>>)>,
    submissions: Vec<Submission>,
}

impl HeadlessDevice {
    /// Graphics and present share family 0; compute and transfer get their
    /// own families, so cross-queue ownership transfers are observable.
    pub fn new() -> Self {
        Self::with_queue_family_indices(QueueFamilyIndices {
            graphics: 0,
            compute: 1,
            transfer: 2,
            present: 0,
        })
    }

    pub fn with_queue_family_indices(queue_family_indices: QueueFamilyIndices) -> Self {
        Self {
            queue_family_indices,
            next_handle: 1,
            buffers: AHashMap::new(),
            textures: AHashMap::new(),
            texture_views: AHashMap::new(),
            destroyed_buffers: Vec::new(),
            destroyed_textures: Vec::new(),
            buffer_updates: Vec::new(),
            submissions: Vec::new(),
        }
    }

    fn next_handle(&mut self) -> u64 {
        let handle = self.next_handle;
        self.next_handle += 1;
        handle
    }

    /// Every `submit` call received so far, in order.
    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }

    /// Buffers and textures that have been created but not destroyed.
    pub fn alive_buffer_count(&self) -> usize {
        self.buffers.len()
    }

    pub fn alive_texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn destroyed_buffers(&self) -> &[BufferHandle] {
        &self.destroyed_buffers
    }

    pub fn destroyed_textures(&self) -> &[TextureHandle] {
        &self.destroyed_textures
    }

    pub fn buffer_info(&self, handle: BufferHandle) -> Option<&BufferCreateInfo> {
        self.buffers.get(&handle)
    }

    pub fn texture_info(&self, handle: TextureHandle) -> Option<&TextureCreateInfo> {
        self.textures.get(&handle)
    }

    pub fn buffer_updates(&self) -> &[(BufferHandle, Vec<Vec<u8>>)] {
        &self.buffer_updates
    }
}

impl Default for HeadlessDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceContext for HeadlessDevice {
    fn queue_family_indices(&self) -> QueueFamilyIndices {
        self.queue_family_indices
    }

    fn create_buffer(&mut self, create_info: BufferCreateInfo) -> BufferHandle {
        let handle = BufferHandle::from_raw(self.next_handle());
        trace!(name = %create_info.name, ?handle, "created buffer");
        self.buffers.insert(handle, create_info);
        handle
    }

    fn update_buffer(&mut self, handle: BufferHandle, regions: &[BufferUpdateRegion<'_>]) {
        let payloads = regions.iter().map(|region| region.src.to_vec()).collect();
        self.buffer_updates.push((handle, payloads));
    }

    fn destroy_buffer(&mut self, handle: BufferHandle) {
        self.buffers.remove(&handle);
        self.destroyed_buffers.push(handle);
    }

    fn create_texture(&mut self, create_info: TextureCreateInfo) -> TextureHandle {
        let handle = TextureHandle::from_raw(self.next_handle());
        trace!(name = %create_info.name, ?handle, "created texture");
        self.textures.insert(handle, create_info);
        handle
    }

    fn destroy_texture(&mut self, handle: TextureHandle) {
        self.textures.remove(&handle);
        self.destroyed_textures.push(handle);
    }

    fn create_texture_view(&mut self, create_info: TextureViewCreateInfo) -> TextureViewHandle {
        let handle = TextureViewHandle::from_raw(self.next_handle());
        self.texture_views.insert(handle, create_info);
        handle
    }

    fn destroy_texture_view(&mut self, handle: TextureViewHandle) {
        self.texture_views.remove(&handle);
    }

    fn submit(&mut self, submit_infos: Vec<SubmitInfo>, present_infos: Vec<PresentInfo>) {
        trace!(
            batches = submit_infos.len(),
            presents = present_infos.len(),
            "submit"
        );
        self.submissions.push(Submission {
            submit_infos,
            present_infos,
        });
    }
}
