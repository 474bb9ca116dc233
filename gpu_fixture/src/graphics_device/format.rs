/// Native element/pixel format enumerant
///
/// Names follow the device's own enumerants. `UNKNOWN` means "no format",
/// which is what structured buffer views require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[allow(non_camel_case_types)]
pub enum Format {
    #[default]
    UNKNOWN,

    // 128-bit
    R32G32B32A32_FLOAT,
    R32G32B32A32_UINT,
    R32G32B32A32_SINT,

    // 96-bit
    R32G32B32_FLOAT,

    // 64-bit
    R16G16B16A16_FLOAT,
    R16G16B16A16_UNORM,
    R32G32_FLOAT,
    R32G32_UINT,

    // 32-bit color
    R8G8B8A8_UNORM,
    R8G8B8A8_UNORM_SRGB,
    R8G8B8A8_UINT,
    B8G8R8A8_UNORM,
    B8G8R8A8_UNORM_SRGB,
    R10G10B10A2_UNORM,
    R11G11B10_FLOAT,
    R16G16_FLOAT,

    // 32-bit single channel
    R32_FLOAT,
    R32_UINT,
    R32_SINT,
    R32_TYPELESS,

    // 16/8-bit
    R16_FLOAT,
    R16_UINT,
    R8_UNORM,
    R8_UINT,

    // Depth/stencil
    D32_FLOAT,
    D24_UNORM_S8_UINT,
    D16_UNORM,
    D32_FLOAT_S8X24_UINT,
}

impl Format {
    /// Size of one element/pixel in bytes, 0 for `UNKNOWN`
    pub fn size_bytes(&self) -> u32 {
        match self {
            Format::UNKNOWN => 0,

            Format::R32G32B32A32_FLOAT
            | Format::R32G32B32A32_UINT
            | Format::R32G32B32A32_SINT => 16,

            Format::R32G32B32_FLOAT => 12,

            Format::R16G16B16A16_FLOAT
            | Format::R16G16B16A16_UNORM
            | Format::R32G32_FLOAT
            | Format::R32G32_UINT
            | Format::D32_FLOAT_S8X24_UINT => 8,

            Format::R8G8B8A8_UNORM
            | Format::R8G8B8A8_UNORM_SRGB
            | Format::R8G8B8A8_UINT
            | Format::B8G8R8A8_UNORM
            | Format::B8G8R8A8_UNORM_SRGB
            | Format::R10G10B10A2_UNORM
            | Format::R11G11B10_FLOAT
            | Format::R16G16_FLOAT
            | Format::R32_FLOAT
            | Format::R32_UINT
            | Format::R32_SINT
            | Format::R32_TYPELESS
            | Format::D32_FLOAT
            | Format::D24_UNORM_S8_UINT => 4,

            Format::R16_FLOAT | Format::R16_UINT | Format::D16_UNORM => 2,

            Format::R8_UNORM | Format::R8_UINT => 1,
        }
    }

    /// True for `UNKNOWN`
    pub fn is_unknown(&self) -> bool {
        matches!(self, Format::UNKNOWN)
    }

    /// True for formats usable as a depth-stencil target
    pub fn is_depth_stencil(&self) -> bool {
        matches!(
            self,
            Format::D32_FLOAT
                | Format::D24_UNORM_S8_UINT
                | Format::D16_UNORM
                | Format::D32_FLOAT_S8X24_UINT
        )
    }
}

#[cfg(test)]
#[path = "format_tests.rs"]
mod tests;
