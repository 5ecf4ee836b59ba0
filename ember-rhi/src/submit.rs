//! Submission payloads.

use crate::access::AccessFlags;
use crate::command::CommandEncoder;
use crate::handle::{SwapchainHandle, TextureHandle};
use crate::queue::{QueueType, SynchronizationStage};

/// A batch of encoders submitted to a single queue.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitInfo {
    pub encoders: Vec<CommandEncoder>,
    pub synchronization_stage: SynchronizationStage,
    pub queue_type: QueueType,
}

/// Hands a texture over to a swapchain at the end of a submission batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresentInfo {
    pub swapchain: SwapchainHandle,
    /// Texture kind **must** be 2D.
    pub texture: TextureHandle,
    /// Previous texture access; determines the layout the texture is
    /// currently in.
    pub texture_previous_access: AccessFlags,
}
