//! The device capability consumed by the frame graph.

use crate::buffer::{BufferCreateInfo, BufferUpdateRegion};
use crate::handle::{BufferHandle, TextureHandle, TextureViewHandle};
use crate::queue::QueueFamilyIndices;
use crate::submit::{PresentInfo, SubmitInfo};
use crate::texture::{TextureCreateInfo, TextureViewCreateInfo};

/// What the frame graph needs from a backend: resource creation and
/// destruction, buffer uploads, and batched submission.
///
/// Implementations own the actual GPU objects; every method hands out or
/// consumes opaque handles. The trait is object safe so recorded passes can
/// receive `&mut dyn DeviceContext`.
pub trait DeviceContext {
    /// Family indices used to decide whether two queues require ownership
    /// transfers between them.
    fn queue_family_indices(&self) -> QueueFamilyIndices;

    /// Returns a valid handle to a buffer.
    fn create_buffer(&mut self, create_info: BufferCreateInfo) -> BufferHandle;

    /// Writes host payloads into a buffer.
    fn update_buffer(&mut self, handle: BufferHandle, regions: &[BufferUpdateRegion<'_>]);

    /// Destroys a buffer. `handle` must be valid.
    fn destroy_buffer(&mut self, handle: BufferHandle);

    /// Returns a valid handle to a texture.
    fn create_texture(&mut self, create_info: TextureCreateInfo) -> TextureHandle;

    /// Destroys a texture. `handle` must be valid.
    fn destroy_texture(&mut self, handle: TextureHandle);

    /// Returns a valid handle to a texture view.
    fn create_texture_view(&mut self, create_info: TextureViewCreateInfo) -> TextureViewHandle;

    /// Destroys a texture view. `handle` must be valid.
    fn destroy_texture_view(&mut self, handle: TextureViewHandle);

    /// Submits batches in order, then presents `present_infos`.
    fn submit(&mut self, submit_infos: Vec<SubmitInfo>, present_infos: Vec<PresentInfo>);
}
