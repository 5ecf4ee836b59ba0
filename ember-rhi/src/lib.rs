//! Hardware-facing data model consumed by the frame graph.
//!
//! This crate defines the types a backend implementation speaks: typed
//! handles, access masks, resource descriptors, barrier records, the
//! recorded command stream and the [`DeviceContext`] capability. It contains
//! no GPU code of its own; backends implement [`DeviceContext`] and replay
//! [`Command`] streams however they see fit.

pub mod access;
pub mod barrier;
pub mod buffer;
pub mod command;
pub mod context;
pub mod format;
pub mod handle;
pub mod queue;
pub mod render_pass;
pub mod submit;
pub mod texture;

pub use access::AccessFlags;
pub use barrier::{BufferBarrier, GlobalBarrier, TextureBarrier};
pub use buffer::{
    BufferCopyRegion, BufferCreateInfo, BufferSubresourceRange, BufferUpdateRegion,
    BufferUsageFlags, MemoryType, WHOLE_SIZE,
};
pub use command::{Command, CommandEncoder, CullingMode, IndexType, Rect, Scissor, Viewport};
pub use context::DeviceContext;
pub use format::{TextureFormat, TextureFormatDesc};
pub use handle::{
    BufferHandle, GraphicsPipelineHandle, SwapchainHandle, TextureHandle, TextureViewHandle,
};
pub use queue::{QueueFamilyIndices, QueueType, SynchronizationStage};
pub use render_pass::{
    AttachmentLoadOp, AttachmentOps, AttachmentStoreOp, AttachmentTexture, ClearDepthStencil,
    ClearValue, ColorAttachment, DepthStencilAttachment, RenderPass, ResolveTexture,
    MAX_COLOR_ATTACHMENTS,
};
pub use submit::{PresentInfo, SubmitInfo};
pub use texture::{
    BufferTextureCopyRegion, Extent, Offset, SampleCount, TextureAspectFlags, TextureCopyRegion,
    TextureCreateInfo, TextureKind, TextureSubresourceLayers, TextureSubresourceRange,
    TextureTiling, TextureUsageFlags, TextureViewCreateInfo, REMAINING_ARRAY_LAYERS,
    REMAINING_MIP_LEVELS,
};
