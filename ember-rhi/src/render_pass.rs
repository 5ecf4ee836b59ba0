//! Render pass descriptors.

use crate::access::AccessFlags;
use crate::handle::{TextureHandle, TextureViewHandle};
use glam::{IVec4, UVec4, Vec4};

/// Maximum number of color attachments of a single render pass.
pub const MAX_COLOR_ATTACHMENTS: usize = 8;

/// How the contents of an attachment are treated at the beginning of a
/// render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentLoadOp {
    /// Preserve the existing contents.
    Load,
    /// Clear the attachment.
    Clear,
    /// The previous contents need not be preserved; contents are undefined
    /// inside the render area.
    DontCare,
}

/// How the contents of an attachment are treated at the end of a render
/// pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentStoreOp {
    /// Contents written during the pass are preserved.
    Store,
    /// Contents are not needed after the pass and **may** be discarded.
    DontCare,
}

///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttachmentOps {
    pub load: AttachmentLoadOp,
    pub store: AttachmentStoreOp,
}

impl AttachmentOps {
    /// Don't load, don't store.
    pub const DONT_CARE: Self = Self {
        load: AttachmentLoadOp::DontCare,
        store: AttachmentStoreOp::DontCare,
    };
    /// Clear on load, store on exit.
    pub const INIT: Self = Self {
        load: AttachmentLoadOp::Clear,
        store: AttachmentStoreOp::Store,
    };
    /// Load existing contents, store on exit.
    pub const PRESERVE: Self = Self {
        load: AttachmentLoadOp::Load,
        store: AttachmentStoreOp::Store,
    };
}

/// The texture (or texture view) bound to an attachment slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentTexture {
    Texture(TextureHandle),
    TextureView(TextureViewHandle),
}

/// Values used to clear a color attachment when its load op is
/// [`AttachmentLoadOp::Clear`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClearValue {
    Float(Vec4),
    Int(IVec4),
    Uint(UVec4),
}

impl Default for ClearValue {
    fn default() -> Self {
        Self::Float(Vec4::ZERO)
    }
}

/// Values used to clear a depth/stencil attachment.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClearDepthStencil {
    pub depth: f32,
    pub stencil: u32,
}

///
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolveTexture {
    /// Current texture access; determines the layout the backend picks.
    pub texture_access: AccessFlags,
    /// The texture that receives resolved multisample data at the end of
    /// the pass.
    pub resolve_texture: AttachmentTexture,
}

///
#[derive(Debug, Clone, PartialEq)]
pub struct ColorAttachment {
    pub ops: AttachmentOps,
    /// Current texture access; determines the layout the backend picks.
    /// Must carry `COLOR_ATTACHMENT_READ` and/or `COLOR_ATTACHMENT_WRITE`.
    pub texture_access: AccessFlags,
    pub texture: AttachmentTexture,
    pub resolve_texture: Option<ResolveTexture>,
    pub clear_value: ClearValue,
}

///
#[derive(Debug, Clone, PartialEq)]
pub struct DepthStencilAttachment {
    pub ops: AttachmentOps,
    pub stencil_ops: AttachmentOps,
    /// Current texture access; determines the layout the backend picks.
    /// Must carry `DEPTH_STENCIL_ATTACHMENT_READ` and/or
    /// `DEPTH_STENCIL_ATTACHMENT_WRITE`.
    pub texture_access: AccessFlags,
    pub texture: AttachmentTexture,
    pub resolve_texture: Option<ResolveTexture>,
    pub clear_value: ClearDepthStencil,
}

///
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderPass {
    /// At most [`MAX_COLOR_ATTACHMENTS`] entries.
    pub color_attachments: Vec<ColorAttachment>,
    pub depth_stencil_attachment: Option<DepthStencilAttachment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attachment_op_shorthands() {
        assert_eq!(AttachmentOps::INIT.load, AttachmentLoadOp::Clear);
        assert_eq!(AttachmentOps::INIT.store, AttachmentStoreOp::Store);
        assert_eq!(AttachmentOps::PRESERVE.load, AttachmentLoadOp::Load);
        assert_eq!(AttachmentOps::PRESERVE.store, AttachmentStoreOp::Store);
        assert_eq!(AttachmentOps::DONT_CARE.load, AttachmentLoadOp::DontCare);
        assert_eq!(AttachmentOps::DONT_CARE.store, AttachmentStoreOp::DontCare);
    }
}
