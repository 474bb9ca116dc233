/// Resource views: descriptors, view traits, and the shared resource handle
///
/// Every view keeps a `Resource` clone, so a resource stays alive as long
/// as any view on it exists, even after its creator dropped its own handle.

use std::fmt;
use std::sync::Arc;
use crate::graphics_device::{Buffer, BufferUavFlags, DsvFlags, Format, Texture2d};

// ===== RESOURCE =====

/// Shared handle to a buffer or texture
#[derive(Clone)]
pub enum Resource {
    Buffer(Arc<dyn Buffer>),
    Texture2d(Arc<dyn Texture2d>),
}

impl Resource {
    /// True if both handles point to the same native object
    pub fn same_object(&self, other: &Resource) -> bool {
        match (self, other) {
            (Resource::Buffer(a), Resource::Buffer(b)) => {
                std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
            }
            (Resource::Texture2d(a), Resource::Texture2d(b)) => {
                std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
            }
            _ => false,
        }
    }

    /// Number of strong references held on the resource
    pub fn ref_count(&self) -> usize {
        match self {
            Resource::Buffer(b) => Arc::strong_count(b),
            Resource::Texture2d(t) => Arc::strong_count(t),
        }
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Buffer(b) => f.debug_tuple("Buffer").field(b.desc()).finish(),
            Resource::Texture2d(t) => f.debug_tuple("Texture2d").field(t.desc()).finish(),
        }
    }
}

// ===== VIEW DESCRIPTORS =====

/// Element range of a buffer view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferElements {
    pub first_element: u32,
    pub num_elements: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SrvDimension {
    Buffer(BufferElements),
    Texture2d { most_detailed_mip: u32, mip_levels: u32 },
    Texture2dMs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderResourceViewDesc {
    pub format: Format,
    pub dimension: SrvDimension,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UavDimension {
    Buffer { elements: BufferElements, flags: BufferUavFlags },
    Texture2d { mip_slice: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnorderedAccessViewDesc {
    pub format: Format,
    pub dimension: UavDimension,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RtvDimension {
    Buffer(BufferElements),
    Texture2d { mip_slice: u32 },
    Texture2dMs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTargetViewDesc {
    pub format: Format,
    pub dimension: RtvDimension,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DsvDimension {
    Texture2d { mip_slice: u32 },
    Texture2dMs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthStencilViewDesc {
    pub format: Format,
    pub flags: DsvFlags,
    pub dimension: DsvDimension,
}

// ===== VIEW TRAITS =====

pub trait ShaderResourceView: Send + Sync {
    fn desc(&self) -> &ShaderResourceViewDesc;
    fn resource(&self) -> &Resource;
}

pub trait UnorderedAccessView: Send + Sync {
    fn desc(&self) -> &UnorderedAccessViewDesc;
    fn resource(&self) -> &Resource;
}

pub trait RenderTargetView: Send + Sync {
    fn desc(&self) -> &RenderTargetViewDesc;
    fn resource(&self) -> &Resource;
}

pub trait DepthStencilView: Send + Sync {
    fn desc(&self) -> &DepthStencilViewDesc;
    fn resource(&self) -> &Resource;
}
