//! Buffer descriptors.

use bitflags::bitflags;

/// Matches any remaining size in a subresource range.
pub const WHOLE_SIZE: u64 = u64::MAX;

/// Specifies how memory backing a resource is going to be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MemoryType {
    /// Device-local memory with the most GPU bandwidth, no CPU access.
    ///
    /// Textures, attachments, resources written and read by the device.
    #[default]
    Gpu,
    /// CPU-visible memory optimized for uploading to the GPU.
    ///
    /// Staging buffers.
    Upload,
    /// CPU-visible memory optimized for reading data back from the GPU.
    Readback,
    /// Host-mappable memory that is still reasonably fast for the GPU.
    ///
    /// Resources written frequently by the host and read by the GPU.
    Dynamic,
}

bitflags! {
    /// Where a buffer may be used.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BufferUsageFlags: u8 {
        const TRANSFER_SOURCE = 1 << 0;
        const TRANSFER_DESTINATION = 1 << 1;
        const STORAGE_BUFFER = 1 << 2;
        const UNIFORM_BUFFER = 1 << 3;
        const INDEX_BUFFER = 1 << 4;
        const VERTEX_BUFFER = 1 << 5;
        const INDIRECT_BUFFER = 1 << 6;
    }
}

impl Default for BufferUsageFlags {
    fn default() -> Self {
        Self::STORAGE_BUFFER
    }
}

///
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BufferCreateInfo {
    pub usage: BufferUsageFlags,
    pub memory_type: MemoryType,
    /// `size` **must** be greater than `0`.
    pub size: u64,
    /// Debug name.
    pub name: String,
}

///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferCopyRegion {
    pub src_offset: u64,
    pub dst_offset: u64,
    pub size: u64,
}

///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferSubresourceRange {
    pub offset: u64,
    pub size: u64,
}

impl Default for BufferSubresourceRange {
    fn default() -> Self {
        Self {
            offset: 0,
            size: WHOLE_SIZE,
        }
    }
}

/// A host payload written into a buffer by [`DeviceContext::update_buffer`].
///
/// [`DeviceContext::update_buffer`]: crate::DeviceContext::update_buffer
#[derive(Debug, Clone, Copy)]
pub struct BufferUpdateRegion<'a> {
    pub src: &'a [u8],
    pub dst_offset: u64,
}
