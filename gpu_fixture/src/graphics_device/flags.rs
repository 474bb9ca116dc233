/// Device-level flag sets and the residency enum
///
/// Bit values match the native enumerants so a hardware backend can pass
/// them straight through.

use bitflags::bitflags;

bitflags! {
    /// Pipeline stages/slots a resource may be attached to
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct BindFlags: u32 {
        const VERTEX_BUFFER    = 0x1;
        const INDEX_BUFFER     = 0x2;
        const CONSTANT_BUFFER  = 0x4;
        const SHADER_RESOURCE  = 0x8;
        const STREAM_OUTPUT    = 0x10;
        const RENDER_TARGET    = 0x20;
        const DEPTH_STENCIL    = 0x40;
        const UNORDERED_ACCESS = 0x80;
    }
}

bitflags! {
    /// Host access to resource memory
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CpuAccessFlags: u32 {
        const WRITE = 0x10000;
        const READ  = 0x20000;
    }
}

bitflags! {
    /// Miscellaneous resource options
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ResourceMiscFlags: u32 {
        const GENERATE_MIPS          = 0x1;
        const SHARED                 = 0x2;
        const TEXTURECUBE            = 0x4;
        const DRAWINDIRECT_ARGS      = 0x10;
        const BUFFER_ALLOW_RAW_VIEWS = 0x20;
        const BUFFER_STRUCTURED      = 0x40;
        const RESOURCE_CLAMP         = 0x80;
    }
}

bitflags! {
    /// Options of a buffer unordered-access view
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct BufferUavFlags: u32 {
        const RAW     = 0x1;
        const APPEND  = 0x2;
        const COUNTER = 0x4;
    }
}

bitflags! {
    /// Read-only options of a depth-stencil view
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DsvFlags: u32 {
        const READ_ONLY_DEPTH   = 0x1;
        const READ_ONLY_STENCIL = 0x2;
    }
}

/// Residency / update policy of a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Usage {
    /// GPU read/write, no host access
    #[default]
    Default,
    /// GPU read only, contents fixed at creation
    Immutable,
    /// Host-writable every frame, GPU read only
    Dynamic,
    /// Host copy target, no pipeline binding
    Staging,
}
