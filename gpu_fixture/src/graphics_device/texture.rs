/// Texture trait and 2D texture descriptor

use crate::graphics_device::{BindFlags, CpuAccessFlags, Format, ResourceMiscFlags, Usage};

/// Multisampling parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleDesc {
    pub count: u32,
    pub quality: u32,
}

impl Default for SampleDesc {
    fn default() -> Self {
        Self { count: 1, quality: 0 }
    }
}

/// Descriptor for creating a 2D texture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture2dDesc {
    pub width: u32,
    pub height: u32,
    pub mip_levels: u32,
    pub array_size: u32,
    pub format: Format,
    pub sample_desc: SampleDesc,
    pub usage: Usage,
    pub bind_flags: BindFlags,
    pub cpu_access_flags: CpuAccessFlags,
    pub misc_flags: ResourceMiscFlags,
}

impl Texture2dDesc {
    /// Returns true if the texture stores more than one sample per pixel
    pub fn is_multisampled(&self) -> bool {
        self.sample_desc.count > 1
    }
}

/// 2D texture resource trait
///
/// Implemented by backend-specific texture types.
/// The native object is released when the last reference is dropped.
pub trait Texture2d: Send + Sync {
    /// Descriptor the texture was created with
    fn desc(&self) -> &Texture2dDesc;
}
