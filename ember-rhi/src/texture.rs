//! Texture descriptors.

use crate::buffer::MemoryType;
use crate::format::TextureFormat;
use crate::handle::TextureHandle;
use bitflags::bitflags;

/// Matches any remaining layers in a subresource range.
pub const REMAINING_ARRAY_LAYERS: u32 = u32::MAX;

/// Matches any remaining mip levels in a subresource range.
pub const REMAINING_MIP_LEVELS: u32 = u32::MAX;

bitflags! {
    /// Which aspects of a texture a range addresses.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TextureAspectFlags: u8 {
        const COLOR = 1 << 0;
        const DEPTH = 1 << 1;
        const STENCIL = 1 << 2;
    }
}

/// Texel layout in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureTiling {
    /// Implementation-dependent arrangement, optimal for GPU access.
    #[default]
    Optimal,
    /// Row-major order, optimal for CPU read/write.
    Linear,
}

bitflags! {
    /// Where a texture may be used.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TextureUsageFlags: u8 {
        /// Used as a color attachment.
        const COLOR_ATTACHMENT = 1 << 0;
        /// Used as a depth attachment.
        const DEPTH_ATTACHMENT = 1 << 1;
        /// Used as a stencil attachment.
        const STENCIL_ATTACHMENT = 1 << 2;
        /// Sampled in shaders.
        const SRV = 1 << 3;
        /// Storage image in shaders.
        const UAV = 1 << 4;
        /// Source of transfer operations.
        const TRANSFER_SOURCE = 1 << 5;
        /// Destination of transfer operations.
        const TRANSFER_DESTINATION = 1 << 6;
        /// Source texture of a `PresentInfo`.
        const PRESENT = 1 << 7;
    }
}

impl Default for TextureUsageFlags {
    fn default() -> Self {
        Self::SRV
    }
}

/// Samples per texel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SampleCount {
    #[default]
    Count1,
    Count2,
    Count4,
    Count8,
}

///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extent {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
}

impl Default for Extent {
    fn default() -> Self {
        Self {
            width: 1,
            height: 1,
            depth: 1,
        }
    }
}

/// An offset into a texture used by copy operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Offset {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

/// Dimensionality of a texture together with its dimensions.
///
/// `sample_count` only exists for 2D textures; every other kind is
/// single-sampled. Cube textures always have 6 layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureKind {
    Texture1D {
        width: u32,
        num_layers: u32,
        num_mips: u32,
    },
    Texture2D {
        width: u32,
        height: u32,
        num_layers: u32,
        num_mips: u32,
        sample_count: SampleCount,
    },
    Texture3D {
        width: u32,
        height: u32,
        depth: u32,
        num_mips: u32,
    },
    TextureCube {
        width: u32,
        height: u32,
        num_mips: u32,
    },
}

impl TextureKind {
    pub fn extent(&self) -> Extent {
        match *self {
            Self::Texture1D { width, .. } => Extent {
                width,
                height: 1,
                depth: 1,
            },
            Self::Texture2D { width, height, .. } => Extent {
                width,
                height,
                depth: 1,
            },
            Self::Texture3D {
                width,
                height,
                depth,
                ..
            } => Extent {
                width,
                height,
                depth,
            },
            Self::TextureCube { width, height, .. } => Extent {
                width,
                height,
                depth: 1,
            },
        }
    }

    pub fn sample_count(&self) -> SampleCount {
        match *self {
            Self::Texture2D { sample_count, .. } => sample_count,
            _ => SampleCount::Count1,
        }
    }

    pub fn num_layers(&self) -> u32 {
        match *self {
            Self::Texture1D { num_layers, .. } | Self::Texture2D { num_layers, .. } => num_layers,
            Self::Texture3D { .. } => 1,
            Self::TextureCube { .. } => 6,
        }
    }

    pub fn num_mips(&self) -> u32 {
        match *self {
            Self::Texture1D { num_mips, .. }
            | Self::Texture2D { num_mips, .. }
            | Self::Texture3D { num_mips, .. }
            | Self::TextureCube { num_mips, .. } => num_mips,
        }
    }

    /// Number of mips in a full chain for this extent.
    pub fn compute_num_mips(&self) -> u32 {
        let extent = self.extent();
        let largest = extent.width.max(extent.height).max(extent.depth);
        32 - largest.max(1).leading_zeros()
    }
}

///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureCreateInfo {
    pub kind: TextureKind,
    pub format: TextureFormat,
    pub usage: TextureUsageFlags,
    pub tiling: TextureTiling,
    pub memory_type: MemoryType,
    /// Debug name.
    pub name: String,
}

///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureSubresourceRange {
    pub first_layer: u32,
    pub layer_count: u32,
    pub first_mip_level: u32,
    pub mip_count: u32,
}

impl Default for TextureSubresourceRange {
    fn default() -> Self {
        Self {
            first_layer: 0,
            layer_count: REMAINING_ARRAY_LAYERS,
            first_mip_level: 0,
            mip_count: REMAINING_MIP_LEVELS,
        }
    }
}

/// The layers of a single mip level addressed by a copy operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureSubresourceLayers {
    pub mip_level: u32,
    pub first_layer: u32,
    pub layer_count: u32,
}

impl Default for TextureSubresourceLayers {
    fn default() -> Self {
        Self {
            mip_level: 0,
            first_layer: 0,
            layer_count: 1,
        }
    }
}

///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureCopyRegion {
    pub src_subresource: TextureSubresourceLayers,
    pub src_offset: Offset,
    pub dst_subresource: TextureSubresourceLayers,
    pub dst_offset: Offset,
    pub extent: Extent,
}

///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferTextureCopyRegion {
    pub buffer_offset: u64,
    pub texture_subresource: TextureSubresourceLayers,
    pub texture_offset: Offset,
    pub texture_extent: Extent,
}

///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureViewCreateInfo {
    pub texture: TextureHandle,
    pub subresource_range: TextureSubresourceRange,
    /// Debug name.
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_accessors() {
        let kind = TextureKind::Texture2D {
            width: 1920,
            height: 1080,
            num_layers: 1,
            num_mips: 1,
            sample_count: SampleCount::Count4,
        };
        assert_eq!(kind.extent().width, 1920);
        assert_eq!(kind.extent().depth, 1);
        assert_eq!(kind.sample_count(), SampleCount::Count4);

        let cube = TextureKind::TextureCube {
            width: 64,
            height: 64,
            num_mips: 1,
        };
        assert_eq!(cube.num_layers(), 6);
        assert_eq!(cube.sample_count(), SampleCount::Count1);
    }

    #[test]
    fn full_mip_chain() {
        let kind = TextureKind::Texture2D {
            width: 1024,
            height: 512,
            num_layers: 1,
            num_mips: 1,
            sample_count: SampleCount::Count1,
        };
        assert_eq!(kind.compute_num_mips(), 11);

        let tiny = TextureKind::Texture1D {
            width: 1,
            num_layers: 1,
            num_mips: 1,
        };
        assert_eq!(tiny.compute_num_mips(), 1);
    }
}
