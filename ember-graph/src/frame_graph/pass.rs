//! Pass records and the render-pass attachment declaration.

use ember_rhi::{
    AttachmentOps, ClearDepthStencil, ClearValue, CommandEncoder, DeviceContext,
    QueueFamilyIndices, SynchronizationStage, MAX_COLOR_ATTACHMENTS,
};
use smallvec::SmallVec;

use crate::frame_graph::registry::Registry;
use crate::frame_graph::resource::{ResourceHandle, ResourceId, TextureHandle, TextureViewHandle};

/// Dense id of a pass within one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PassId(u32);

impl PassId {
    pub(crate) const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

/// The queue a pass is scheduled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueueType {
    Graphics,
    AsyncCompute,
    Transfer,
    Present,
}

impl QueueType {
    /// Physical family index; equal indices mean no ownership transfer is
    /// needed.
    pub(crate) fn family_index(self, indices: &QueueFamilyIndices) -> u32 {
        match self {
            Self::Graphics => indices.graphics,
            Self::AsyncCompute => indices.compute,
            Self::Transfer => indices.transfer,
            Self::Present => indices.present,
        }
    }

    pub(crate) fn to_rhi(self) -> ember_rhi::QueueType {
        match self {
            Self::Graphics => ember_rhi::QueueType::Graphics,
            Self::AsyncCompute => ember_rhi::QueueType::Compute,
            Self::Transfer => ember_rhi::QueueType::Transfer,
            Self::Present => ember_rhi::QueueType::Present,
        }
    }

    /// Canonical stage a submission on this queue synchronizes at.
    pub(crate) fn synchronization_stage(self) -> SynchronizationStage {
        match self {
            Self::Graphics => {
                SynchronizationStage::ALL_GRAPHICS | SynchronizationStage::COMPUTE_SHADER
            }
            Self::AsyncCompute => SynchronizationStage::COMPUTE_SHADER,
            Self::Transfer => SynchronizationStage::TRANSFER,
            Self::Present => SynchronizationStage::BOTTOM_OF_PIPE,
        }
    }
}

///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    Generic,
    Render,
}

/// The virtual dispatch boundary pass closures are erased behind. Captured
/// state (the user data returned from setup) lives inside the erased object.
pub(crate) trait FrameGraphPass {
    fn execute(
        &mut self,
        device: &mut dyn DeviceContext,
        registry: &Registry,
        encoder: &mut CommandEncoder,
        render_pass: Option<&ember_rhi::RenderPass>,
    );
    fn name(&self) -> &str;
    fn queue_type(&self) -> QueueType;
    fn kind(&self) -> PassKind;
}

pub(crate) struct GenericPass<D, E> {
    pub name: String,
    pub queue_type: QueueType,
    pub data: D,
    pub execute: E,
}

impl<D, E> FrameGraphPass for GenericPass<D, E>
where
    E: FnMut(&mut dyn DeviceContext, &Registry, &mut CommandEncoder, &D),
{
    fn execute(
        &mut self,
        device: &mut dyn DeviceContext,
        registry: &Registry,
        encoder: &mut CommandEncoder,
        _render_pass: Option<&ember_rhi::RenderPass>,
    ) {
        (self.execute)(device, registry, encoder, &self.data);
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn queue_type(&self) -> QueueType {
        self.queue_type
    }

    fn kind(&self) -> PassKind {
        PassKind::Generic
    }
}

pub(crate) struct RenderGraphPass<D, E> {
    pub name: String,
    pub queue_type: QueueType,
    pub data: D,
    pub execute: E,
}

impl<D, E> FrameGraphPass for RenderGraphPass<D, E>
where
    E: FnMut(&mut dyn DeviceContext, &Registry, &mut CommandEncoder, &D, &ember_rhi::RenderPass),
{
    fn execute(
        &mut self,
        device: &mut dyn DeviceContext,
        registry: &Registry,
        encoder: &mut CommandEncoder,
        render_pass: Option<&ember_rhi::RenderPass>,
    ) {
        let render_pass = render_pass.expect("render pass descriptor was not resolved");
        (self.execute)(device, registry, encoder, &self.data, render_pass);
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn queue_type(&self) -> QueueType {
        self.queue_type
    }

    fn kind(&self) -> PassKind {
        PassKind::Render
    }
}

/// The texture (or texture view) bound to an attachment slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentTexture {
    Texture(TextureHandle),
    TextureView(TextureViewHandle),
}

impl AttachmentTexture {
    pub(crate) fn resource_id(self) -> ResourceId {
        match self {
            Self::Texture(handle) => handle.resource_id(),
            Self::TextureView(handle) => handle.resource_id(),
        }
    }
}

impl From<TextureHandle> for AttachmentTexture {
    fn from(handle: TextureHandle) -> Self {
        Self::Texture(handle)
    }
}

impl From<TextureViewHandle> for AttachmentTexture {
    fn from(handle: TextureViewHandle) -> Self {
        Self::TextureView(handle)
    }
}

///
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorAttachment {
    /// Load and store operations of the attachment.
    pub ops: AttachmentOps,
    /// The texture that will be rendered to.
    pub texture: AttachmentTexture,
    /// Receives resolved multisample data at the end of rendering.
    pub resolve_texture: Option<AttachmentTexture>,
    /// Used when the load op is `Clear`.
    pub clear_value: ClearValue,
}

///
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthStencilAttachment {
    /// Load and store operations of the attachment.
    pub ops: AttachmentOps,
    /// Load and store operations of the stencil aspect.
    pub stencil_ops: AttachmentOps,
    /// The texture that will be rendered to.
    pub texture: AttachmentTexture,
    /// Receives resolved multisample data at the end of rendering.
    pub resolve_texture: Option<AttachmentTexture>,
    /// Used when the load op is `Clear`.
    pub clear_value: ClearDepthStencil,
}

/// Attachment declaration filled in by a render pass's setup closure.
///
/// The hardware access of every attachment is resolved during `compile()`;
/// the execute closure receives the resulting [`ember_rhi::RenderPass`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderPass {
    /// At most [`MAX_COLOR_ATTACHMENTS`] entries.
    pub color_attachments: SmallVec<[ColorAttachment; MAX_COLOR_ATTACHMENTS]>,
    pub depth_stencil_attachment: Option<DepthStencilAttachment>,
}
