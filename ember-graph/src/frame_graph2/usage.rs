//! Granular per-kind resource usages.
//!
//! Unlike the coarse first-generation [`ResourceUsage`] masks, these
//! distinguish sampled from storage accesses and buffers from images; the
//! typed handles only accept the matching kind. Bit positions are shared
//! with the combined mask so conversions are lossless.
//!
//! [`ResourceUsage`]: crate::frame_graph::ResourceUsage

use bitflags::bitflags;
use ember_rhi::AccessFlags;

bitflags! {
    /// How a pass uses a buffer.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct BufferResourceUsage: u16 {
        const NONE = 0;
        const TRANSFER = 1 << 1;
        const COMPUTE_STORAGE_BUFFER = 1 << 2;
        const GRAPHICS_STORAGE_BUFFER = 1 << 3;
        const UNIFORM_BUFFER = 1 << 4;
        const INDEX_BUFFER = 1 << 5;
        const VERTEX_BUFFER = 1 << 6;
        const INDIRECT_BUFFER = 1 << 7;
    }
}

bitflags! {
    /// How a pass uses a texture.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TextureResourceUsage: u16 {
        const NONE = 0;
        const TRANSFER = 1 << 1;
        const GRAPHICS_SAMPLED_IMAGE = 1 << 8;
        const COMPUTE_SAMPLED_IMAGE = 1 << 9;
        const COMPUTE_STORAGE_IMAGE = 1 << 10;
        const GRAPHICS_STORAGE_IMAGE = 1 << 11;
        const COLOR_ATTACHMENT = 1 << 12;
        const DEPTH_STENCIL_ATTACHMENT = 1 << 13;
    }
}

bitflags! {
    /// Union of the buffer and texture usage spaces; what edges carry.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ResourceUsage: u16 {
        const NONE = 0;
        const TRANSFER = 1 << 1;
        // Buffers.
        const COMPUTE_STORAGE_BUFFER = 1 << 2;
        const GRAPHICS_STORAGE_BUFFER = 1 << 3;
        const UNIFORM_BUFFER = 1 << 4;
        const INDEX_BUFFER = 1 << 5;
        const VERTEX_BUFFER = 1 << 6;
        const INDIRECT_BUFFER = 1 << 7;
        // Textures.
        const GRAPHICS_SAMPLED_IMAGE = 1 << 8;
        const COMPUTE_SAMPLED_IMAGE = 1 << 9;
        const COMPUTE_STORAGE_IMAGE = 1 << 10;
        const GRAPHICS_STORAGE_IMAGE = 1 << 11;
        const COLOR_ATTACHMENT = 1 << 12;
        const DEPTH_STENCIL_ATTACHMENT = 1 << 13;
    }
}

impl From<BufferResourceUsage> for ResourceUsage {
    fn from(usage: BufferResourceUsage) -> Self {
        // Bit positions are shared.
        Self::from_bits_truncate(usage.bits())
    }
}

impl From<TextureResourceUsage> for ResourceUsage {
    fn from(usage: TextureResourceUsage) -> Self {
        Self::from_bits_truncate(usage.bits())
    }
}

/// Maps a usage mask to the hardware access mask barriers are built from.
pub fn to_access_flags(resource_usage: ResourceUsage, write: bool) -> AccessFlags {
    let mut flags = AccessFlags::NONE;
    if resource_usage == ResourceUsage::NONE {
        return flags;
    }

    if resource_usage.contains(ResourceUsage::TRANSFER) {
        flags |= AccessFlags::TRANSFER_READ | AccessFlags::TRANSFER_WRITE;
    }
    if resource_usage.contains(ResourceUsage::COMPUTE_STORAGE_BUFFER) {
        flags |= if write {
            AccessFlags::UAV_COMPUTE
        } else {
            AccessFlags::SRV_COMPUTE
        };
    }
    if resource_usage.contains(ResourceUsage::GRAPHICS_STORAGE_BUFFER) {
        flags |= if write {
            AccessFlags::UAV_GRAPHICS
        } else {
            AccessFlags::SRV_GRAPHICS
        };
    }
    if resource_usage.contains(ResourceUsage::UNIFORM_BUFFER) {
        flags |= AccessFlags::UNIFORM_BUFFER;
    }
    if resource_usage.contains(ResourceUsage::INDEX_BUFFER) {
        flags |= AccessFlags::INDEX_BUFFER;
    }
    if resource_usage.contains(ResourceUsage::VERTEX_BUFFER) {
        flags |= AccessFlags::VERTEX_BUFFER;
    }
    if resource_usage.contains(ResourceUsage::INDIRECT_BUFFER) {
        flags |= AccessFlags::INDIRECT_BUFFER;
    }
    if resource_usage.contains(ResourceUsage::GRAPHICS_SAMPLED_IMAGE) {
        flags |= AccessFlags::SRV_GRAPHICS;
    }
    if resource_usage.contains(ResourceUsage::COMPUTE_SAMPLED_IMAGE) {
        flags |= AccessFlags::SRV_COMPUTE;
    }
    if resource_usage.contains(ResourceUsage::COMPUTE_STORAGE_IMAGE) {
        flags |= if write {
            AccessFlags::UAV_COMPUTE
        } else {
            AccessFlags::SRV_COMPUTE
        };
    }
    if resource_usage.contains(ResourceUsage::GRAPHICS_STORAGE_IMAGE) {
        flags |= if write {
            AccessFlags::UAV_GRAPHICS
        } else {
            AccessFlags::SRV_GRAPHICS
        };
    }
    if resource_usage.contains(ResourceUsage::COLOR_ATTACHMENT) {
        flags |= if write {
            AccessFlags::COLOR_ATTACHMENT_WRITE
        } else {
            AccessFlags::COLOR_ATTACHMENT_READ
        };
    }
    if resource_usage.contains(ResourceUsage::DEPTH_STENCIL_ATTACHMENT) {
        flags |= if write {
            AccessFlags::DEPTH_STENCIL_ATTACHMENT_WRITE
        } else {
            AccessFlags::DEPTH_STENCIL_ATTACHMENT_READ
        };
    }

    flags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions_are_lossless() {
        let buffer = BufferResourceUsage::COMPUTE_STORAGE_BUFFER | BufferResourceUsage::TRANSFER;
        let combined: ResourceUsage = buffer.into();
        assert!(combined.contains(ResourceUsage::COMPUTE_STORAGE_BUFFER));
        assert!(combined.contains(ResourceUsage::TRANSFER));

        let texture = TextureResourceUsage::COLOR_ATTACHMENT;
        let combined: ResourceUsage = texture.into();
        assert_eq!(combined, ResourceUsage::COLOR_ATTACHMENT);
    }

    #[test]
    fn storage_accesses_split_by_write() {
        assert_eq!(
            to_access_flags(ResourceUsage::COMPUTE_STORAGE_BUFFER, true),
            AccessFlags::UAV_COMPUTE
        );
        assert_eq!(
            to_access_flags(ResourceUsage::COMPUTE_STORAGE_BUFFER, false),
            AccessFlags::SRV_COMPUTE
        );
        assert_eq!(
            to_access_flags(ResourceUsage::COLOR_ATTACHMENT, true),
            AccessFlags::COLOR_ATTACHMENT_WRITE
        );
    }

    #[test]
    fn sampled_images_are_reads() {
        assert_eq!(
            to_access_flags(ResourceUsage::COMPUTE_SAMPLED_IMAGE, true),
            AccessFlags::SRV_COMPUTE
        );
    }

    #[test]
    fn transfer_covers_both_directions() {
        assert_eq!(
            to_access_flags(ResourceUsage::TRANSFER, false),
            AccessFlags::TRANSFER_READ | AccessFlags::TRANSFER_WRITE
        );
    }
}
