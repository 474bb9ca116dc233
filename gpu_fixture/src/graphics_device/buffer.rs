/// Buffer trait and buffer descriptor

use crate::graphics_device::{BindFlags, CpuAccessFlags, ResourceMiscFlags, Usage};

/// Descriptor for creating a buffer
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BufferDesc {
    /// Size in bytes
    pub byte_width: u32,
    /// Residency policy
    pub usage: Usage,
    /// Pipeline bind capability
    pub bind_flags: BindFlags,
    /// Host access capability
    pub cpu_access_flags: CpuAccessFlags,
    /// Extra options (structured, raw views, indirect args, ...)
    pub misc_flags: ResourceMiscFlags,
    /// Element size for structured buffers, 0 otherwise
    pub structure_byte_stride: u32,
}

impl BufferDesc {
    /// Whether the buffer is a structured store
    pub fn is_structured(&self) -> bool {
        self.misc_flags.contains(ResourceMiscFlags::BUFFER_STRUCTURED)
    }
}

/// Initial contents handed to the device at creation time
#[derive(Debug, Clone, Copy)]
pub struct SubresourceData<'a> {
    pub data: &'a [u8],
    /// Distance between rows, in bytes
    pub row_pitch: u32,
    /// Distance between depth slices, in bytes
    pub slice_pitch: u32,
}

/// Buffer resource trait
///
/// Implemented by backend-specific buffer types.
/// The native object is released when the last reference is dropped.
pub trait Buffer: Send + Sync {
    /// Descriptor the buffer was created with
    fn desc(&self) -> &BufferDesc;
}
