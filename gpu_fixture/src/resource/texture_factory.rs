/// Texture factory
///
/// Creates a single-mip, single-slice 2D texture (optionally multisampled)
/// plus its requested views. The bind capability is the union of the
/// requested views. With more than one sample every view takes its
/// multisampled shape, and an unordered-access request adds neither the
/// view nor its bind flag.

use std::sync::Arc;

use crate::error::{CreationStep, Result};
use crate::graphics_device::{
    GraphicsDevice, Resource, Format,
    BindFlags, CpuAccessFlags, ResourceMiscFlags, DsvFlags, Usage,
    Texture2d, Texture2dDesc, SampleDesc,
    ShaderResourceView, ShaderResourceViewDesc, SrvDimension,
    UnorderedAccessView, UnorderedAccessViewDesc, UavDimension,
    RenderTargetView, RenderTargetViewDesc, RtvDimension,
    DepthStencilView, DepthStencilViewDesc, DsvDimension,
};
use crate::resource::{device_error, ViewRequest};
use crate::{fixture_bail, fixture_debug, fixture_trace, fixture_warn};

const SOURCE: &str = "gpu_fixture::texture";

/// Size, format and views of a 2D texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureRequest {
    pub width: u32,
    pub height: u32,
    pub format: Format,
    pub srv: ViewRequest,
    pub uav: ViewRequest,
    pub rtv: ViewRequest,
    pub dsv: ViewRequest,
}

impl TextureRequest {
    pub fn new(width: u32, height: u32, format: Format) -> Self {
        Self {
            width,
            height,
            format,
            srv: ViewRequest::None,
            uav: ViewRequest::None,
            rtv: ViewRequest::None,
            dsv: ViewRequest::None,
        }
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

    pub fn with_dsv(mut self, request: ViewRequest) -> Self {
        self.dsv = request;
        self
    }
}

/// Native descriptors derived from a texture request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledTexture {
    pub desc: Texture2dDesc,
    pub srv: Option<ShaderResourceViewDesc>,
    pub uav: Option<UnorderedAccessViewDesc>,
    pub rtv: Option<RenderTargetViewDesc>,
    pub dsv: Option<DepthStencilViewDesc>,
    /// An unordered-access request was dropped because the texture is multisampled
    pub uav_skipped: bool,
}

/// Derive the texture descriptor and view descriptors for `sample_count` samples
///
/// # Errors
///
/// `Error::InvalidConfiguration` if `sample_count` is zero.
pub fn compile_texture_2d(sample_count: u32, request: &TextureRequest) -> Result<CompiledTexture> {
    if sample_count == 0 {
        fixture_bail!(SOURCE, "Sample count must be at least 1");
    }

    let multisampled = sample_count > 1;
    let uav_skipped = multisampled && request.uav.binds();
    if uav_skipped {
        fixture_warn!(SOURCE,
            "Skipping unordered-access view on {}x{} texture with {} samples",
            request.width, request.height, sample_count);
    }

    let mut bind_flags = BindFlags::empty();
    if request.srv.binds() {
        bind_flags |= BindFlags::SHADER_RESOURCE;
    }
    if request.rtv.binds() {
        bind_flags |= BindFlags::RENDER_TARGET;
    }
    if request.dsv.binds() {
        bind_flags |= BindFlags::DEPTH_STENCIL;
    }
    if request.uav.binds() && !multisampled {
        bind_flags |= BindFlags::UNORDERED_ACCESS;
    }

    let format = request.format;
    let desc = Texture2dDesc {
        width: request.width,
        height: request.height,
        mip_levels: 1,
        array_size: 1,
        format,
        sample_desc: SampleDesc { count: sample_count, quality: 0 },
        usage: Usage::Default,
        bind_flags,
        cpu_access_flags: CpuAccessFlags::empty(),
        misc_flags: ResourceMiscFlags::empty(),
    };

    let srv = request.srv.creates().then(|| ShaderResourceViewDesc {
        format,
        dimension: if multisampled {
            SrvDimension::Texture2dMs
        } else {
            SrvDimension::Texture2d { most_detailed_mip: 0, mip_levels: 1 }
        },
    });

    let uav = (request.uav.creates() && !multisampled).then(|| UnorderedAccessViewDesc {
        format,
        dimension: UavDimension::Texture2d { mip_slice: 0 },
    });

    let rtv = request.rtv.creates().then(|| RenderTargetViewDesc {
        format,
        dimension: if multisampled {
            RtvDimension::Texture2dMs
        } else {
            RtvDimension::Texture2d { mip_slice: 0 }
        },
    });

    let dsv = request.dsv.creates().then(|| DepthStencilViewDesc {
        format,
        flags: DsvFlags::empty(),
        dimension: if multisampled {
            DsvDimension::Texture2dMs
        } else {
            DsvDimension::Texture2d { mip_slice: 0 }
        },
    });

    fixture_debug!(SOURCE, "{}x{} {:?} texture: {} sample(s), bind {:?}",
        request.width, request.height, format, sample_count, bind_flags);

    Ok(CompiledTexture { desc, srv, uav, rtv, dsv, uav_skipped })
}

/// Objects produced by one texture creation call, owned by the caller
pub struct CreatedTexture {
    pub texture: Arc<dyn Texture2d>,
    pub srv: Option<Arc<dyn ShaderResourceView>>,
    pub uav: Option<Arc<dyn UnorderedAccessView>>,
    pub rtv: Option<Arc<dyn RenderTargetView>>,
    pub dsv: Option<Arc<dyn DepthStencilView>>,
}

/// Create a single-sample 2D texture and its requested views
pub fn create_texture_2d(device: &mut dyn GraphicsDevice, request: &TextureRequest) -> Result<CreatedTexture> {
    create_texture_2d_ms(device, 1, request)
}

/// Create a 2D texture with `sample_count` samples and its requested views
///
/// On a device failure everything created by this call is released before
/// the error is returned.
pub fn create_texture_2d_ms(
    device: &mut dyn GraphicsDevice,
    sample_count: u32,
    request: &TextureRequest,
) -> Result<CreatedTexture> {
    let compiled = compile_texture_2d(sample_count, request)?;

    let texture = device
        .create_texture_2d(&compiled.desc)
        .map_err(|code| device_error(SOURCE, CreationStep::Texture2d, code))?;
    let resource = Resource::Texture2d(Arc::clone(&texture));

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

    let dsv = match &compiled.dsv {
        Some(desc) => {
            fixture_trace!(SOURCE, "DSV: {:?}", desc);
            Some(device
                .create_depth_stencil_view(&resource, desc)
                .map_err(|code| device_error(SOURCE, CreationStep::DepthStencilView, code))?)
        }
        None => None,
    };

    Ok(CreatedTexture { texture, srv, uav, rtv, dsv })
}

#[cfg(test)]
#[path = "texture_factory_tests.rs"]
mod tests;
