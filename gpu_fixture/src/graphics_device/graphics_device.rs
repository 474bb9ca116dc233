/// GraphicsDevice trait - the creation entry points the factories consume
///
/// Device bring-up (adapter, swapchain, window) happens elsewhere; this
/// trait only describes an already-initialized device. Each entry point
/// either returns the new object or the native status code of the failure.

use std::sync::Arc;
use crate::error::StatusCode;
use crate::graphics_device::{
    Buffer, BufferDesc, SubresourceData, Texture2d, Texture2dDesc, Resource,
    ShaderResourceView, ShaderResourceViewDesc,
    UnorderedAccessView, UnorderedAccessViewDesc,
    RenderTargetView, RenderTargetViewDesc,
    DepthStencilView, DepthStencilViewDesc,
};

/// Result of a raw device call
pub type DeviceResult<T> = std::result::Result<T, StatusCode>;

/// Resource creation interface of a graphics device
///
/// Implemented by hardware backends and by `MockGraphicsDevice`.
pub trait GraphicsDevice: Send + Sync {
    /// Create a buffer, optionally filled with initial contents
    fn create_buffer(
        &mut self,
        desc: &BufferDesc,
        initial_data: Option<SubresourceData<'_>>,
    ) -> DeviceResult<Arc<dyn Buffer>>;

    /// Create a 2D texture (single or multisampled)
    fn create_texture_2d(&mut self, desc: &Texture2dDesc) -> DeviceResult<Arc<dyn Texture2d>>;

    /// Create a shader-readable view on `resource`
    fn create_shader_resource_view(
        &mut self,
        resource: &Resource,
        desc: &ShaderResourceViewDesc,
    ) -> DeviceResult<Arc<dyn ShaderResourceView>>;

    /// Create an unordered-access view on `resource`
    fn create_unordered_access_view(
        &mut self,
        resource: &Resource,
        desc: &UnorderedAccessViewDesc,
    ) -> DeviceResult<Arc<dyn UnorderedAccessView>>;

    /// Create a render-target view on `resource`
    fn create_render_target_view(
        &mut self,
        resource: &Resource,
        desc: &RenderTargetViewDesc,
    ) -> DeviceResult<Arc<dyn RenderTargetView>>;

    /// Create a depth-stencil view on `resource`
    fn create_depth_stencil_view(
        &mut self,
        resource: &Resource,
        desc: &DepthStencilViewDesc,
    ) -> DeviceResult<Arc<dyn DepthStencilView>>;
}
