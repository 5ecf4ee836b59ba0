//! Barrier records consumed by backends.

use crate::access::AccessFlags;
use crate::buffer::BufferSubresourceRange;
use crate::handle::{BufferHandle, TextureHandle};
use crate::queue::QueueType;
use crate::texture::TextureSubresourceRange;

/// An execution and memory barrier over all resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalBarrier {
    pub previous_access: AccessFlags,
    pub next_access: AccessFlags,
}

impl GlobalBarrier {
    /// Waits for everything, flushes and invalidates everything.
    pub const FULL_BARRIER: Self = Self {
        previous_access: AccessFlags::ALL,
        next_access: AccessFlags::ALL,
    };
}

impl Default for GlobalBarrier {
    fn default() -> Self {
        Self::FULL_BARRIER
    }
}

/// A barrier over a texture subresource range, possibly transferring queue
/// ownership and transitioning the image layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureBarrier {
    pub texture: TextureHandle,
    pub previous_access: AccessFlags,
    pub next_access: AccessFlags,
    pub source_queue: Option<QueueType>,
    pub destination_queue: Option<QueueType>,
    pub subresource_range: TextureSubresourceRange,
    /// The previous contents need not be preserved; lets the backend pick a
    /// layout transition from `UNDEFINED` without a copy.
    pub discard_contents: bool,
}

/// A barrier over a buffer range, possibly transferring queue ownership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferBarrier {
    pub buffer: BufferHandle,
    pub previous_access: AccessFlags,
    pub next_access: AccessFlags,
    pub source_queue: Option<QueueType>,
    pub destination_queue: Option<QueueType>,
    pub subresource_range: BufferSubresourceRange,
}
