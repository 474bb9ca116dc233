/// Buffer factory
///
/// Turns a usage class, a byte size, an optional element stride and
/// view format, and a set of view requests into one buffer plus its views.
///
/// The usage class fixes bind capability, host access and residency:
///
/// | Usage class     | Bind              | CPU access   | Usage   |
/// |-----------------|-------------------|--------------|---------|
/// | ConstantBuffer  | CONSTANT_BUFFER   | WRITE        | Dynamic |
/// | StagingBuffer   | (none)            | READ + WRITE | Staging |
/// | VertexBuffer    | VERTEX_BUFFER     | WRITE        | Dynamic |
/// | IndexBuffer     | INDEX_BUFFER      | WRITE        | Dynamic |
/// | ShaderBuffer    | SHADER_RESOURCE   | WRITE        | Dynamic |
/// | StreamOutBuffer | STREAM_OUTPUT     | (none)       | Default |
/// | ComputeBuffer   | UNORDERED_ACCESS  | (none)       | Default |
///
/// Each requested view ORs its own bind flag on top.

use std::borrow::Cow;
use std::sync::Arc;
use bytemuck::Pod;

use crate::error::{CreationStep, Result};
use crate::graphics_device::{
    GraphicsDevice, Resource, Format,
    BindFlags, CpuAccessFlags, ResourceMiscFlags, BufferUavFlags, Usage,
    Buffer, BufferDesc, SubresourceData, BufferElements,
    ShaderResourceView, ShaderResourceViewDesc, SrvDimension,
    UnorderedAccessView, UnorderedAccessViewDesc, UavDimension,
    RenderTargetView, RenderTargetViewDesc, RtvDimension,
};
use crate::resource::{device_error, ViewRequest};
use crate::{fixture_bail, fixture_debug, fixture_trace};

const SOURCE: &str = "gpu_fixture::buffer";

/// Constant buffer sizes are rounded up to this many bytes
pub const CONSTANT_BUFFER_ALIGNMENT: u32 = 16;

/// Element size a shader-resource view assumes when the buffer has no stride.
///
/// Legacy sizing rule: such a view covers `byte_size / 16` elements whatever
/// its format. Kept as-is for compatibility with existing captures.
pub const RAW_VIEW_ELEMENT_SIZE: u32 = 16;

// ===== USAGE CLASS =====

/// Purpose of a buffer, fixing its device-level properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UsageClass {
    ConstantBuffer,
    StagingBuffer,
    VertexBuffer,
    IndexBuffer,
    ShaderBuffer,
    StreamOutBuffer,
    ComputeBuffer,
}

impl UsageClass {
    pub const ALL: [UsageClass; 7] = [
        UsageClass::ConstantBuffer,
        UsageClass::StagingBuffer,
        UsageClass::VertexBuffer,
        UsageClass::IndexBuffer,
        UsageClass::ShaderBuffer,
        UsageClass::StreamOutBuffer,
        UsageClass::ComputeBuffer,
    ];

    /// Base bind capability, before view requests are added
    pub fn bind_flags(&self) -> BindFlags {
        match self {
            UsageClass::ConstantBuffer => BindFlags::CONSTANT_BUFFER,
            UsageClass::StagingBuffer => BindFlags::empty(),
            UsageClass::VertexBuffer => BindFlags::VERTEX_BUFFER,
            UsageClass::IndexBuffer => BindFlags::INDEX_BUFFER,
            UsageClass::ShaderBuffer => BindFlags::SHADER_RESOURCE,
            UsageClass::StreamOutBuffer => BindFlags::STREAM_OUTPUT,
            UsageClass::ComputeBuffer => BindFlags::UNORDERED_ACCESS,
        }
    }

    pub fn cpu_access_flags(&self) -> CpuAccessFlags {
        match self {
            UsageClass::StagingBuffer => CpuAccessFlags::READ | CpuAccessFlags::WRITE,
            UsageClass::StreamOutBuffer | UsageClass::ComputeBuffer => CpuAccessFlags::empty(),
            UsageClass::ConstantBuffer
            | UsageClass::VertexBuffer
            | UsageClass::IndexBuffer
            | UsageClass::ShaderBuffer => CpuAccessFlags::WRITE,
        }
    }

    pub fn usage(&self) -> Usage {
        match self {
            UsageClass::StagingBuffer => Usage::Staging,
            UsageClass::StreamOutBuffer | UsageClass::ComputeBuffer => Usage::Default,
            UsageClass::ConstantBuffer
            | UsageClass::VertexBuffer
            | UsageClass::IndexBuffer
            | UsageClass::ShaderBuffer => Usage::Dynamic,
        }
    }
}

/// Secondary tag of the unordered-access view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UavKind {
    #[default]
    Plain,
    Append,
}

// ===== REQUEST =====

/// Everything one buffer creation call needs
#[derive(Debug, Clone)]
pub struct BufferRequest<'a> {
    pub usage: UsageClass,
    pub uav_kind: UavKind,
    /// Extra resource flags passed through to the descriptor
    pub misc_flags: ResourceMiscFlags,
    pub byte_size: u32,
    /// Element size, 0 for none
    pub element_stride: u32,
    /// View format, `UNKNOWN` for none
    pub view_format: Format,
    pub initial_data: Option<&'a [u8]>,
    pub srv: ViewRequest,
    pub uav: ViewRequest,
    pub rtv: ViewRequest,
    /// When false, the factory drops its buffer handle once the views exist
    pub retain_buffer: bool,
}

impl<'a> BufferRequest<'a> {
    pub fn new(usage: UsageClass, byte_size: u32) -> Self {
        Self {
            usage,
            uav_kind: UavKind::Plain,
            misc_flags: ResourceMiscFlags::empty(),
            byte_size,
            element_stride: 0,
            view_format: Format::UNKNOWN,
            initial_data: None,
            srv: ViewRequest::None,
            uav: ViewRequest::None,
            rtv: ViewRequest::None,
            retain_buffer: true,
        }
    }

    pub fn with_stride(mut self, element_stride: u32) -> Self {
        self.element_stride = element_stride;
        self
    }

    pub fn with_format(mut self, view_format: Format) -> Self {
        self.view_format = view_format;
        self
    }

    pub fn with_misc_flags(mut self, misc_flags: ResourceMiscFlags) -> Self {
        self.misc_flags = misc_flags;
        self
    }

    pub fn with_uav_kind(mut self, uav_kind: UavKind) -> Self {
        self.uav_kind = uav_kind;
        self
    }

    pub fn with_data(mut self, data: &'a [u8]) -> Self {
        self.initial_data = Some(data);
        self
    }

    /// Initial contents from a slice of plain-old-data values
    pub fn with_typed_data<T: Pod>(mut self, data: &'a [T]) -> Self {
        self.initial_data = Some(bytemuck::cast_slice(data));
        self
    }

    pub fn with_srv(mut self, request: ViewRequest) -> Self {
        self.srv = request;
        self
    }

    pub fn with_uav(mut self, request: ViewRequest) -> Self {
        self.uav = request;
        self
    }

    pub fn with_rtv(mut self, request: ViewRequest) -> Self {
        self.rtv = request;
        self
    }

    /// Keep only the views; the buffer lives as long as they do
    pub fn views_only(mut self) -> Self {
        self.retain_buffer = false;
        self
    }
}

// ===== COMPILATION =====

/// Native descriptors derived from a request, before any device call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledBuffer {
    pub desc: BufferDesc,
    pub srv: Option<ShaderResourceViewDesc>,
    pub uav: Option<UnorderedAccessViewDesc>,
    pub rtv: Option<RenderTargetViewDesc>,
}

/// Derive the buffer descriptor and the requested view descriptors
///
/// # Errors
///
/// `Error::InvalidConfiguration` if the size is zero, the stride does not
/// divide the (normalized) size, or the initial data is shorter than the
/// buffer. No device call is made in that case.
pub fn compile_buffer(request: &BufferRequest<'_>) -> Result<CompiledBuffer> {
    if request.byte_size == 0 {
        fixture_bail!(SOURCE, "Buffer byte size must be non-zero");
    }

    let mut byte_size = request.byte_size;
    if request.usage == UsageClass::ConstantBuffer {
        byte_size = match byte_size.checked_next_multiple_of(CONSTANT_BUFFER_ALIGNMENT) {
            Some(size) => size,
            None => fixture_bail!(SOURCE, "Constant buffer size {} overflows when aligned", byte_size),
        };
    }

    let stride = request.element_stride;
    if stride > 0 && byte_size % stride != 0 {
        fixture_bail!(SOURCE,
            "Invalid structure size - {} is not a divisor of byte size {}", stride, byte_size);
    }

    // Constant buffers accept contents of the requested size, padded below
    if let Some(data) = request.initial_data {
        let required = if request.usage == UsageClass::ConstantBuffer {
            request.byte_size
        } else {
            byte_size
        };
        if (data.len() as u64) < required as u64 {
            fixture_bail!(SOURCE,
                "Initial data holds {} bytes, buffer needs {}", data.len(), required);
        }
    }

    let mut misc_flags = request.misc_flags;
    let mut structure_byte_stride = 0;
    if stride > 0 && request.view_format.is_unknown() {
        misc_flags |= ResourceMiscFlags::BUFFER_STRUCTURED;
        structure_byte_stride = stride;
    }

    let mut bind_flags = request.usage.bind_flags();
    if request.srv.binds() {
        bind_flags |= BindFlags::SHADER_RESOURCE;
    }
    if request.uav.binds() {
        bind_flags |= BindFlags::UNORDERED_ACCESS;
    }
    if request.rtv.binds() {
        bind_flags |= BindFlags::RENDER_TARGET;
    }

    let desc = BufferDesc {
        byte_width: byte_size,
        usage: request.usage.usage(),
        bind_flags,
        cpu_access_flags: request.usage.cpu_access_flags(),
        misc_flags,
        structure_byte_stride,
    };

    let format = request.view_format;
    let elements = BufferElements {
        first_element: 0,
        num_elements: byte_size / stride.max(1),
    };

    let srv = request.srv.creates().then(|| {
        let num_elements = if stride == 0 {
            byte_size / RAW_VIEW_ELEMENT_SIZE
        } else {
            elements.num_elements
        };
        ShaderResourceViewDesc {
            format,
            dimension: SrvDimension::Buffer(BufferElements { first_element: 0, num_elements }),
        }
    });

    let uav = request.uav.creates().then(|| UnorderedAccessViewDesc {
        format,
        dimension: UavDimension::Buffer {
            elements,
            flags: match request.uav_kind {
                UavKind::Append => BufferUavFlags::APPEND,
                UavKind::Plain => BufferUavFlags::empty(),
            },
        },
    });

    let rtv = request.rtv.creates().then(|| RenderTargetViewDesc {
        format,
        dimension: RtvDimension::Buffer(elements),
    });

    fixture_debug!(SOURCE, "{:?} buffer: {} bytes, bind {:?}, stride {}, format {:?}",
        request.usage, byte_size, bind_flags, structure_byte_stride, format);

    Ok(CompiledBuffer { desc, srv, uav, rtv })
}

// ===== CREATION =====

/// Objects produced by one buffer creation call, owned by the caller
pub struct CreatedBuffer {
    /// `None` when the request asked for views only
    pub buffer: Option<Arc<dyn Buffer>>,
    pub srv: Option<Arc<dyn ShaderResourceView>>,
    pub uav: Option<Arc<dyn UnorderedAccessView>>,
    pub rtv: Option<Arc<dyn RenderTargetView>>,
}

/// Create a buffer and its requested views on `device`
///
/// On a device failure everything created by this call is released before
/// the error is returned.
pub fn create_buffer(device: &mut dyn GraphicsDevice, request: &BufferRequest<'_>) -> Result<CreatedBuffer> {
    let compiled = compile_buffer(request)?;
    let byte_width = compiled.desc.byte_width;

    let contents = request.initial_data.map(|data| pad_contents(data, byte_width));
    let initial_data = contents.as_deref().map(|data| SubresourceData {
        data,
        row_pitch: byte_width,
        slice_pitch: byte_width,
    });

    let buffer = device
        .create_buffer(&compiled.desc, initial_data)
        .map_err(|code| device_error(SOURCE, CreationStep::Buffer, code))?;
    let resource = Resource::Buffer(Arc::clone(&buffer));

    let srv = match &compiled.srv {
        Some(desc) => {
            fixture_trace!(SOURCE, "SRV: {:?}", desc);
            Some(device
                .create_shader_resource_view(&resource, desc)
                .map_err(|code| device_error(SOURCE, CreationStep::ShaderResourceView, code))?)
        }
        None => None,
    };

    let uav = match &compiled.uav {
        Some(desc) => {
            fixture_trace!(SOURCE, "UAV: {:?}", desc);
            Some(device
                .create_unordered_access_view(&resource, desc)
                .map_err(|code| device_error(SOURCE, CreationStep::UnorderedAccessView, code))?)
        }
        None => None,
    };

    let rtv = match &compiled.rtv {
        Some(desc) => {
            fixture_trace!(SOURCE, "RTV: {:?}", desc);
            Some(device
                .create_render_target_view(&resource, desc)
                .map_err(|code| device_error(SOURCE, CreationStep::RenderTargetView, code))?)
        }
        None => None,
    };

    Ok(CreatedBuffer {
        buffer: request.retain_buffer.then_some(buffer),
        srv,
        uav,
        rtv,
    })
}

/// Zero-fill contents up to `byte_width` when alignment grew the buffer
fn pad_contents(data: &[u8], byte_width: u32) -> Cow<'_, [u8]> {
    let byte_width = byte_width as usize;
    if data.len() >= byte_width {
        return Cow::Borrowed(data);
    }
    fixture_trace!(SOURCE, "Padding {} bytes of initial data to {}", data.len(), byte_width);
    let mut padded = Vec::with_capacity(byte_width);
    padded.extend_from_slice(data);
    padded.resize(byte_width, 0);
    Cow::Owned(padded)
}

#[cfg(test)]
#[path = "buffer_factory_tests.rs"]
mod tests;
