//! Hardware access masks.

use bitflags::bitflags;

bitflags! {
    /// Access patterns a resource is used with.
    ///
    /// These flags drive barrier generation and, for textures, determine the
    /// image layout the backend picks. Variants can be OR-combined to
    /// describe multiple accesses within the same scope.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AccessFlags: u32 {
        const NONE = 0;
        /// Read as a color attachment (blending, logic ops).
        const COLOR_ATTACHMENT_READ = 1 << 0;
        /// Written as a color attachment during rendering.
        const COLOR_ATTACHMENT_WRITE = 1 << 1;
        /// Read as a depth/stencil attachment (depth test).
        const DEPTH_STENCIL_ATTACHMENT_READ = 1 << 2;
        /// Written as a depth/stencil attachment.
        const DEPTH_STENCIL_ATTACHMENT_WRITE = 1 << 3;
        /// Sampled or storage-read in a graphics pipeline.
        const SRV_GRAPHICS = 1 << 4;
        /// Sampled or storage-read in a compute pipeline.
        const SRV_COMPUTE = 1 << 5;
        /// Storage write in a graphics pipeline.
        const UAV_GRAPHICS = 1 << 6;
        /// Storage write in a compute pipeline.
        const UAV_COMPUTE = 1 << 7;
        /// Read as an index buffer.
        const INDEX_BUFFER = 1 << 8;
        /// Read as an indirect draw/dispatch argument buffer.
        const INDIRECT_BUFFER = 1 << 9;
        /// Read as a uniform buffer.
        const UNIFORM_BUFFER = 1 << 10;
        /// Read as a vertex buffer.
        const VERTEX_BUFFER = 1 << 11;
        /// Read by a transfer operation.
        const TRANSFER_READ = 1 << 12;
        /// Written by a transfer operation.
        const TRANSFER_WRITE = 1 << 13;
        /// Source of a swapchain presentation; the layout a texture must be
        /// in when it is handed over in a `PresentInfo`.
        const TRANSFER_SOURCE = 1 << 14;
        /// Presented by the swapchain engine.
        const PRESENT = 1 << 15;

        const COLOR_ATTACHMENT =
            Self::COLOR_ATTACHMENT_READ.bits() | Self::COLOR_ATTACHMENT_WRITE.bits();
        const DEPTH_STENCIL_ATTACHMENT = Self::DEPTH_STENCIL_ATTACHMENT_READ.bits()
            | Self::DEPTH_STENCIL_ATTACHMENT_WRITE.bits();
        const ANY_WRITE = Self::COLOR_ATTACHMENT_WRITE.bits()
            | Self::DEPTH_STENCIL_ATTACHMENT_WRITE.bits()
            | Self::UAV_GRAPHICS.bits()
            | Self::UAV_COMPUTE.bits()
            | Self::TRANSFER_WRITE.bits();
        const ANY_READ = Self::COLOR_ATTACHMENT_READ.bits()
            | Self::DEPTH_STENCIL_ATTACHMENT_READ.bits()
            | Self::SRV_GRAPHICS.bits()
            | Self::SRV_COMPUTE.bits()
            | Self::INDEX_BUFFER.bits()
            | Self::INDIRECT_BUFFER.bits()
            | Self::UNIFORM_BUFFER.bits()
            | Self::VERTEX_BUFFER.bits()
            | Self::TRANSFER_READ.bits()
            | Self::TRANSFER_SOURCE.bits();
        const ALL = Self::ANY_WRITE.bits() | Self::ANY_READ.bits() | Self::PRESENT.bits();
    }
}

impl AccessFlags {
    /// True when any write access is present.
    pub const fn is_write_access(self) -> bool {
        self.intersects(Self::ANY_WRITE)
    }

    /// True when any read access is present.
    pub const fn is_read_access(self) -> bool {
        self.intersects(Self::ANY_READ)
    }
}
