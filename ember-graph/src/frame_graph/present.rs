//! Present pass records.

use ember_rhi::{AccessFlags, SwapchainHandle};

use crate::frame_graph::barrier::TextureBarrier;
use crate::frame_graph::resource::TextureHandle;

/// The access a texture must be in when it is handed to a swapchain.
pub const PRESENT_ACCESS: AccessFlags = AccessFlags::TRANSFER_SOURCE;

/// A terminal pass that hands a texture over to a swapchain. Emits only its
/// deferred barrier, no user work.
#[derive(Debug, Clone)]
pub(crate) struct PresentPass {
    pub swapchain: SwapchainHandle,
    pub texture: TextureHandle,
    /// Computed by the barrier planner.
    pub barrier: Option<TextureBarrier>,
}
