//! Texture formats and their descriptors.
//!
//! # Format types
//! - `UNORM` - unsigned normalized, range `[0, 1]`.
//! - `SNORM` - signed normalized, range `[-1, 1]`.
//! - `UINT` - unsigned integer, range `[0, 2^n - 1]`.
//! - `SINT` - signed integer, range `[-2^(n-1), 2^(n-1) - 1]`.
//! - `FLOAT` - signed floating point.
//!
//! The table only lists formats supported by any PC GPU with optimal tiling.

use crate::texture::TextureAspectFlags;

const COLOR: TextureAspectFlags = TextureAspectFlags::COLOR;
const DEPTH: TextureAspectFlags = TextureAspectFlags::DEPTH;
const DEPTH_STENCIL: TextureAspectFlags = TextureAspectFlags::DEPTH.union(TextureAspectFlags::STENCIL);

/// Per-format properties.
///
/// `num_bits` is per texel for uncompressed formats and per
/// `block_dim x block_dim` block for compressed ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureFormatDesc {
    pub num_bits: u16,
    pub block_dim: u8,
    pub packed: bool,
    pub aspect: TextureAspectFlags,
}

impl TextureFormatDesc {
    pub const fn is_packed(&self) -> bool {
        self.packed
    }

    pub const fn is_compressed(&self) -> bool {
        self.block_dim != 1
    }
}

macro_rules! texture_formats {
    ($($name:ident => ($bits:expr, $block_dim:expr, $packed:expr, $aspect:expr)),+ $(,)?) => {
        ///
        #[allow(non_camel_case_types)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub enum TextureFormat {
            #[default]
            INVALID,
            $($name,)+
        }

        impl TextureFormat {
            pub fn desc(self) -> TextureFormatDesc {
                match self {
                    Self::INVALID => TextureFormatDesc {
                        num_bits: 0,
                        block_dim: 1,
                        packed: false,
                        aspect: TextureAspectFlags::empty(),
                    },
                    $(Self::$name => TextureFormatDesc {
                        num_bits: $bits,
                        block_dim: $block_dim,
                        packed: $packed,
                        aspect: $aspect,
                    },)+
                }
            }
        }
    };
}

texture_formats! {
    // Packed formats.
    A1_R5_G5_B5_UNORM => (16, 1, true, COLOR),
    R5_G6_B5_UNORM => (16, 1, true, COLOR),
    A2_B10_G10_R10_UNORM => (32, 1, true, COLOR),
    A2_B10_G10_R10_UINT => (32, 1, true, COLOR),
    A8_B8_G8_R8_UNORM => (32, 1, true, COLOR),
    A8_B8_G8_R8_SNORM => (32, 1, true, COLOR),
    A8_B8_G8_R8_UINT => (32, 1, true, COLOR),
    A8_B8_G8_R8_SINT => (32, 1, true, COLOR),
    B10_G11_R11_FLOAT => (32, 1, true, COLOR),
    // 8 bit.
    R8_UNORM => (8, 1, false, COLOR),
    R8_SNORM => (8, 1, false, COLOR),
    R8_UINT => (8, 1, false, COLOR),
    R8_SINT => (8, 1, false, COLOR),
    R8_G8_UNORM => (16, 1, false, COLOR),
    R8_G8_SNORM => (16, 1, false, COLOR),
    R8_G8_UINT => (16, 1, false, COLOR),
    R8_G8_SINT => (16, 1, false, COLOR),
    R8_G8_B8_A8_UNORM => (32, 1, false, COLOR),
    R8_G8_B8_A8_SNORM => (32, 1, false, COLOR),
    R8_G8_B8_A8_UINT => (32, 1, false, COLOR),
    R8_G8_B8_A8_SINT => (32, 1, false, COLOR),
    B8_G8_R8_A8_UNORM => (32, 1, false, COLOR),
    // 16 bit.
    R16_UNORM => (16, 1, false, COLOR),
    R16_SNORM => (16, 1, false, COLOR),
    R16_UINT => (16, 1, false, COLOR),
    R16_SINT => (16, 1, false, COLOR),
    R16_FLOAT => (16, 1, false, COLOR),
    R16_G16_UNORM => (32, 1, false, COLOR),
    R16_G16_SNORM => (32, 1, false, COLOR),
    R16_G16_UINT => (32, 1, false, COLOR),
    R16_G16_SINT => (32, 1, false, COLOR),
    R16_G16_FLOAT => (32, 1, false, COLOR),
    R16_G16_B16_A16_UNORM => (64, 1, false, COLOR),
    R16_G16_B16_A16_SNORM => (64, 1, false, COLOR),
    R16_G16_B16_A16_UINT => (64, 1, false, COLOR),
    R16_G16_B16_A16_SINT => (64, 1, false, COLOR),
    R16_G16_B16_A16_FLOAT => (64, 1, false, COLOR),
    // 32 bit.
    R32_UINT => (32, 1, false, COLOR),
    R32_SINT => (32, 1, false, COLOR),
    R32_FLOAT => (32, 1, false, COLOR),
    R32_G32_UINT => (64, 1, false, COLOR),
    R32_G32_SINT => (64, 1, false, COLOR),
    R32_G32_FLOAT => (64, 1, false, COLOR),
    R32_G32_B32_A32_UINT => (128, 1, false, COLOR),
    R32_G32_B32_A32_SINT => (128, 1, false, COLOR),
    R32_G32_B32_A32_FLOAT => (128, 1, false, COLOR),
    // Block compressed.
    BC1_RGBA_UNORM => (64, 4, false, COLOR),
    BC1_RGBA_SRGB => (64, 4, false, COLOR),
    BC2_UNORM => (128, 4, false, COLOR),
    BC2_SRGB => (128, 4, false, COLOR),
    BC3_UNORM => (128, 4, false, COLOR),
    BC3_SRGB => (128, 4, false, COLOR),
    BC4_UNORM => (64, 4, false, COLOR),
    BC4_SNORM => (64, 4, false, COLOR),
    BC5_UNORM => (128, 4, false, COLOR),
    BC5_SNORM => (128, 4, false, COLOR),
    BC6H_UFLOAT => (128, 4, false, COLOR),
    BC6H_SFLOAT => (128, 4, false, COLOR),
    BC7_UNORM => (128, 4, false, COLOR),
    BC7_SRGB => (128, 4, false, COLOR),
    // Depth/stencil.
    D16_UNORM => (16, 1, false, DEPTH),
    D32_FLOAT => (32, 1, false, DEPTH),
    D32_FLOAT_S8_UINT => (64, 1, false, DEPTH_STENCIL),
}

impl TextureFormat {
    /// True when a texture of this format can be the source of a present
    /// pass.
    pub fn is_valid_present_src(self) -> bool {
        matches!(
            self,
            Self::B8_G8_R8_A8_UNORM
                | Self::R8_G8_B8_A8_UNORM
                | Self::A8_B8_G8_R8_UNORM
                | Self::A2_B10_G10_R10_UNORM
                | Self::R16_G16_B16_A16_FLOAT
                | Self::R5_G6_B5_UNORM
                | Self::A1_R5_G5_B5_UNORM
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptors() {
        let desc = TextureFormat::R8_G8_B8_A8_UNORM.desc();
        assert_eq!(desc.num_bits, 32);
        assert!(!desc.is_compressed());
        assert_eq!(desc.aspect, TextureAspectFlags::COLOR);

        let desc = TextureFormat::BC7_UNORM.desc();
        assert_eq!(desc.block_dim, 4);
        assert!(desc.is_compressed());

        let desc = TextureFormat::D32_FLOAT_S8_UINT.desc();
        assert!(desc.aspect.contains(TextureAspectFlags::DEPTH));
        assert!(desc.aspect.contains(TextureAspectFlags::STENCIL));

        let desc = TextureFormat::B10_G11_R11_FLOAT.desc();
        assert!(desc.is_packed());
    }

    #[test]
    fn present_sources() {
        assert!(TextureFormat::R8_G8_B8_A8_UNORM.is_valid_present_src());
        assert!(TextureFormat::B8_G8_R8_A8_UNORM.is_valid_present_src());
        assert!(!TextureFormat::D32_FLOAT.is_valid_present_src());
        assert!(!TextureFormat::BC1_RGBA_UNORM.is_valid_present_src());
        assert!(!TextureFormat::R32_G32_B32_A32_FLOAT.is_valid_present_src());
    }
}
