//! High-level resource usages and their hardware access mapping.

use bitflags::bitflags;
use ember_rhi::AccessFlags;

bitflags! {
    /// How a pass uses a resource.
    ///
    /// Declared per pass through [`Builder::read`] / [`Builder::write`];
    /// read and write usages of the same resource are tracked separately.
    ///
    /// [`Builder::read`]: crate::frame_graph::Builder::read
    /// [`Builder::write`]: crate::frame_graph::Builder::write
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ResourceUsage: u8 {
        /// No access.
        const NONE = 0;
        /// Used as a color attachment during rendering.
        const COLOR_ATTACHMENT = 1 << 0;
        /// Used as a depth/stencil attachment during rendering.
        const DEPTH_STENCIL_ATTACHMENT = 1 << 1;
        /// Used in a graphics pipeline.
        const SHADER_GRAPHICS = 1 << 2;
        /// Used in a compute pipeline.
        const SHADER_COMPUTE = 1 << 3;
        /// Used as an indirect buffer for drawing or dispatch.
        const INDIRECT_BUFFER = 1 << 4;
        /// Used as an index buffer for drawing.
        const INDEX_BUFFER = 1 << 5;
        /// Used in transfer operations.
        const TRANSFER = 1 << 6;
        const ALL = Self::COLOR_ATTACHMENT.bits()
            | Self::DEPTH_STENCIL_ATTACHMENT.bits()
            | Self::SHADER_GRAPHICS.bits()
            | Self::SHADER_COMPUTE.bits()
            | Self::INDIRECT_BUFFER.bits()
            | Self::INDEX_BUFFER.bits()
            | Self::TRANSFER.bits();
    }
}

/// Maps a usage mask to the hardware access mask barriers are built from.
///
/// `INDIRECT_BUFFER` and `INDEX_BUFFER` are read-only accesses regardless of
/// the `write` flag.
pub fn map_resource_usage(resource_usage: ResourceUsage, write: bool) -> AccessFlags {
    let mut flags = AccessFlags::NONE;

    if write {
        if resource_usage.contains(ResourceUsage::COLOR_ATTACHMENT) {
            flags |= AccessFlags::COLOR_ATTACHMENT_WRITE;
        }
        if resource_usage.contains(ResourceUsage::DEPTH_STENCIL_ATTACHMENT) {
            flags |= AccessFlags::DEPTH_STENCIL_ATTACHMENT_WRITE;
        }
        if resource_usage.contains(ResourceUsage::SHADER_GRAPHICS) {
            flags |= AccessFlags::UAV_GRAPHICS;
        }
        if resource_usage.contains(ResourceUsage::SHADER_COMPUTE) {
            flags |= AccessFlags::UAV_COMPUTE;
        }
        if resource_usage.contains(ResourceUsage::TRANSFER) {
            flags |= AccessFlags::TRANSFER_WRITE;
        }
    } else {
        if resource_usage.contains(ResourceUsage::COLOR_ATTACHMENT) {
            flags |= AccessFlags::COLOR_ATTACHMENT_READ;
        }
        if resource_usage.contains(ResourceUsage::DEPTH_STENCIL_ATTACHMENT) {
            flags |= AccessFlags::DEPTH_STENCIL_ATTACHMENT_READ;
        }
        if resource_usage.contains(ResourceUsage::SHADER_GRAPHICS) {
            flags |= AccessFlags::SRV_GRAPHICS;
        }
        if resource_usage.contains(ResourceUsage::SHADER_COMPUTE) {
            flags |= AccessFlags::SRV_COMPUTE;
        }
        if resource_usage.contains(ResourceUsage::TRANSFER) {
            flags |= AccessFlags::TRANSFER_READ;
        }
    }

    if resource_usage.contains(ResourceUsage::INDIRECT_BUFFER) {
        flags |= AccessFlags::INDIRECT_BUFFER;
    }
    if resource_usage.contains(ResourceUsage::INDEX_BUFFER) {
        flags |= AccessFlags::INDEX_BUFFER;
    }

    flags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attachment_mapping() {
        assert_eq!(
            map_resource_usage(ResourceUsage::COLOR_ATTACHMENT, true),
            AccessFlags::COLOR_ATTACHMENT_WRITE
        );
        assert_eq!(
            map_resource_usage(ResourceUsage::COLOR_ATTACHMENT, false),
            AccessFlags::COLOR_ATTACHMENT_READ
        );
        assert_eq!(
            map_resource_usage(ResourceUsage::DEPTH_STENCIL_ATTACHMENT, true),
            AccessFlags::DEPTH_STENCIL_ATTACHMENT_WRITE
        );
    }

    #[test]
    fn shader_mapping() {
        assert_eq!(
            map_resource_usage(ResourceUsage::SHADER_COMPUTE, false),
            AccessFlags::SRV_COMPUTE
        );
        assert_eq!(
            map_resource_usage(ResourceUsage::SHADER_COMPUTE, true),
            AccessFlags::UAV_COMPUTE
        );
        assert_eq!(
            map_resource_usage(ResourceUsage::SHADER_GRAPHICS, false),
            AccessFlags::SRV_GRAPHICS
        );
    }

    #[test]
    fn fixed_function_reads_ignore_write_flag() {
        assert_eq!(
            map_resource_usage(ResourceUsage::INDEX_BUFFER, true),
            AccessFlags::INDEX_BUFFER
        );
        assert_eq!(
            map_resource_usage(ResourceUsage::INDIRECT_BUFFER, true),
            AccessFlags::INDIRECT_BUFFER
        );
    }

    #[test]
    fn transfer_mapping() {
        assert_eq!(
            map_resource_usage(ResourceUsage::TRANSFER, true),
            AccessFlags::TRANSFER_WRITE
        );
        assert_eq!(
            map_resource_usage(ResourceUsage::TRANSFER, false),
            AccessFlags::TRANSFER_READ
        );
    }

    #[test]
    fn combined_masks_union() {
        let usage = ResourceUsage::SHADER_COMPUTE | ResourceUsage::INDIRECT_BUFFER;
        assert_eq!(
            map_resource_usage(usage, false),
            AccessFlags::SRV_COMPUTE | AccessFlags::INDIRECT_BUFFER
        );
    }

    #[test]
    fn none_maps_to_none() {
        assert_eq!(map_resource_usage(ResourceUsage::NONE, false), AccessFlags::NONE);
        assert_eq!(map_resource_usage(ResourceUsage::NONE, true), AccessFlags::NONE);
    }
}
