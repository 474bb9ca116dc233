/// Mock graphics device (no GPU required)
///
/// A software implementation of `GraphicsDevice` used by the unit tests,
/// the integration tests and the demo. It
/// - keeps every created object in a live-object arena, so outstanding
///   references can be reported after a test tears down
/// - counts creation calls per step
/// - optionally validates descriptors the way a debug device layer does
/// - lets tests inject a failure status for any creation step

use std::sync::{Arc, Mutex, PoisonError};
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};

use crate::config::Config;
use crate::error::{CreationStep, StatusCode};
use crate::graphics_device::{
    GraphicsDevice, DeviceResult, Resource,
    BindFlags, CpuAccessFlags, BufferUavFlags, Format, Usage,
    Buffer, BufferDesc, SubresourceData, Texture2d, Texture2dDesc,
    BufferElements,
    ShaderResourceView, ShaderResourceViewDesc, SrvDimension,
    UnorderedAccessView, UnorderedAccessViewDesc, UavDimension,
    RenderTargetView, RenderTargetViewDesc, RtvDimension,
    DepthStencilView, DepthStencilViewDesc, DsvDimension,
};
use crate::fixture_warn;

new_key_type! {
    /// Key of a live object in the mock device arena
    pub struct ObjectKey;
}

/// Entry of the live-object arena
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveObject {
    pub kind: CreationStep,
    pub label: String,
}

type LiveArena = Arc<Mutex<SlotMap<ObjectKey, LiveObject>>>;

/// Registration in the arena, removed when the owning object drops
#[derive(Debug)]
struct Tracked {
    key: ObjectKey,
    arena: LiveArena,
}

impl Drop for Tracked {
    fn drop(&mut self) {
        let mut arena = self.arena.lock().unwrap_or_else(PoisonError::into_inner);
        arena.remove(self.key);
    }
}

/// Initial contents received by `create_buffer`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRecord {
    pub data: Vec<u8>,
    pub row_pitch: u32,
    pub slice_pitch: u32,
}

// ============================================================================
// Mock resources and views
// ============================================================================

#[derive(Debug)]
pub struct MockBuffer {
    desc: BufferDesc,
    _tracked: Tracked,
}

impl Buffer for MockBuffer {
    fn desc(&self) -> &BufferDesc {
        &self.desc
    }
}

#[derive(Debug)]
pub struct MockTexture2d {
    desc: Texture2dDesc,
    _tracked: Tracked,
}

impl Texture2d for MockTexture2d {
    fn desc(&self) -> &Texture2dDesc {
        &self.desc
    }
}

pub struct MockShaderResourceView {
    desc: ShaderResourceViewDesc,
    resource: Resource,
    _tracked: Tracked,
}

impl ShaderResourceView for MockShaderResourceView {
    fn desc(&self) -> &ShaderResourceViewDesc { &self.desc }
    fn resource(&self) -> &Resource { &self.resource }
}

pub struct MockUnorderedAccessView {
    desc: UnorderedAccessViewDesc,
    resource: Resource,
    _tracked: Tracked,
}

impl UnorderedAccessView for MockUnorderedAccessView {
    fn desc(&self) -> &UnorderedAccessViewDesc { &self.desc }
    fn resource(&self) -> &Resource { &self.resource }
}

pub struct MockRenderTargetView {
    desc: RenderTargetViewDesc,
    resource: Resource,
    _tracked: Tracked,
}

impl RenderTargetView for MockRenderTargetView {
    fn desc(&self) -> &RenderTargetViewDesc { &self.desc }
    fn resource(&self) -> &Resource { &self.resource }
}

pub struct MockDepthStencilView {
    desc: DepthStencilViewDesc,
    resource: Resource,
    _tracked: Tracked,
}

impl DepthStencilView for MockDepthStencilView {
    fn desc(&self) -> &DepthStencilViewDesc { &self.desc }
    fn resource(&self) -> &Resource { &self.resource }
}

// ============================================================================
// Mock device
// ============================================================================

pub struct MockGraphicsDevice {
    validation: bool,
    arena: LiveArena,
    next_id: u64,
    creation_counts: FxHashMap<CreationStep, u32>,
    failures: FxHashMap<CreationStep, StatusCode>,
    uploads: Vec<UploadRecord>,
}

impl MockGraphicsDevice {
    /// Create a device; `validation` enables debug-layer style descriptor checks
    pub fn new(validation: bool) -> Self {
        Self {
            validation,
            arena: Arc::new(Mutex::new(SlotMap::with_key())),
            next_id: 0,
            creation_counts: FxHashMap::default(),
            failures: FxHashMap::default(),
            uploads: Vec::new(),
        }
    }

    /// Create a device following the harness configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.debug_device)
    }

    pub fn validation_enabled(&self) -> bool {
        self.validation
    }

    /// Make every subsequent call of `step` fail with `code`
    pub fn fail_on(&mut self, step: CreationStep, code: StatusCode) {
        self.failures.insert(step, code);
    }

    /// Remove all injected failures
    pub fn clear_failures(&mut self) {
        self.failures.clear();
    }

    /// Number of successful creations for `step`
    pub fn creation_count(&self, step: CreationStep) -> u32 {
        self.creation_counts.get(&step).copied().unwrap_or(0)
    }

    /// Number of successful creations across all steps
    pub fn total_creations(&self) -> u32 {
        self.creation_counts.values().sum()
    }

    /// Initial contents received so far, in creation order
    pub fn uploads(&self) -> &[UploadRecord] {
        &self.uploads
    }

    /// Number of objects created by this device that are still referenced
    pub fn live_object_count(&self) -> usize {
        self.arena.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Snapshot of objects still referenced
    pub fn live_objects(&self) -> Vec<LiveObject> {
        self.arena
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }

    /// Log a warning for every outstanding object and return how many remain
    pub fn report_live_objects(&self) -> usize {
        let live = self.live_objects();
        for object in &live {
            fixture_warn!("gpu_fixture::mock", "Live object: {} ({:?})", object.label, object.kind);
        }
        live.len()
    }

    // ===== INTERNAL =====

    /// Injected failure check, then validation, then registration
    fn begin(&mut self, step: CreationStep, valid: impl FnOnce() -> bool) -> DeviceResult<Tracked> {
        if let Some(code) = self.failures.get(&step) {
            return Err(*code);
        }
        if self.validation && !valid() {
            return Err(StatusCode::E_INVALIDARG);
        }

        self.next_id += 1;
        let label = format!("{}#{}", step, self.next_id);
        let key = self
            .arena
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(LiveObject { kind: step, label });
        *self.creation_counts.entry(step).or_insert(0) += 1;

        Ok(Tracked { key, arena: Arc::clone(&self.arena) })
    }
}

impl Default for MockGraphicsDevice {
    fn default() -> Self {
        Self::new(true)
    }
}

// ===== VALIDATION RULES =====

fn valid_buffer(desc: &BufferDesc, initial_data: Option<&SubresourceData<'_>>) -> bool {
    if desc.byte_width == 0 {
        return false;
    }
    if let Some(init) = initial_data {
        if (init.data.len() as u64) < desc.byte_width as u64 {
            return false;
        }
    }
    if desc.bind_flags.contains(BindFlags::CONSTANT_BUFFER)
        && (desc.byte_width % 16 != 0 || desc.bind_flags != BindFlags::CONSTANT_BUFFER)
    {
        return false;
    }
    if desc.is_structured()
        && (desc.structure_byte_stride == 0 || desc.byte_width % desc.structure_byte_stride != 0)
    {
        return false;
    }
    match desc.usage {
        Usage::Staging => desc.bind_flags.is_empty() && !desc.cpu_access_flags.is_empty(),
        Usage::Dynamic => {
            desc.cpu_access_flags == CpuAccessFlags::WRITE
                && !desc.bind_flags.intersects(BindFlags::UNORDERED_ACCESS | BindFlags::STREAM_OUTPUT)
        }
        Usage::Immutable => initial_data.is_some() && desc.cpu_access_flags.is_empty(),
        Usage::Default => desc.cpu_access_flags.is_empty(),
    }
}

fn valid_texture(desc: &Texture2dDesc) -> bool {
    if desc.width == 0 || desc.height == 0 || desc.mip_levels == 0 || desc.array_size == 0 {
        return false;
    }
    if desc.sample_desc.count == 0 || desc.format.is_unknown() {
        return false;
    }
    if desc.is_multisampled() && desc.bind_flags.contains(BindFlags::UNORDERED_ACCESS) {
        return false;
    }
    if desc.format.is_depth_stencil() {
        !desc.bind_flags.intersects(
            BindFlags::RENDER_TARGET | BindFlags::SHADER_RESOURCE | BindFlags::UNORDERED_ACCESS,
        )
    } else {
        !desc.bind_flags.contains(BindFlags::DEPTH_STENCIL)
    }
}

/// Element range must fit the buffer, format must match structuring
fn valid_buffer_range(desc: &BufferDesc, format: Format, elements: &BufferElements) -> bool {
    if elements.num_elements == 0 {
        return false;
    }
    let element_size = if desc.is_structured() {
        if !format.is_unknown() {
            return false;
        }
        desc.structure_byte_stride
    } else {
        if format.is_unknown() {
            return false;
        }
        format.size_bytes()
    };
    let end = (elements.first_element as u64 + elements.num_elements as u64) * element_size as u64;
    end <= desc.byte_width as u64
}

fn bound_as(resource: &Resource, flag: BindFlags) -> bool {
    match resource {
        Resource::Buffer(b) => b.desc().bind_flags.contains(flag),
        Resource::Texture2d(t) => t.desc().bind_flags.contains(flag),
    }
}

fn valid_srv(resource: &Resource, desc: &ShaderResourceViewDesc) -> bool {
    if !bound_as(resource, BindFlags::SHADER_RESOURCE) {
        return false;
    }
    match (resource, &desc.dimension) {
        (Resource::Buffer(b), SrvDimension::Buffer(elements)) => {
            valid_buffer_range(b.desc(), desc.format, elements)
        }
        (Resource::Texture2d(t), SrvDimension::Texture2d { most_detailed_mip, mip_levels }) => {
            !t.desc().is_multisampled()
                && most_detailed_mip + mip_levels <= t.desc().mip_levels
        }
        (Resource::Texture2d(t), SrvDimension::Texture2dMs) => t.desc().is_multisampled(),
        _ => false,
    }
}

fn valid_uav(resource: &Resource, desc: &UnorderedAccessViewDesc) -> bool {
    if !bound_as(resource, BindFlags::UNORDERED_ACCESS) {
        return false;
    }
    match (resource, &desc.dimension) {
        (Resource::Buffer(b), UavDimension::Buffer { elements, flags }) => {
            let appendable = !flags.intersects(BufferUavFlags::APPEND | BufferUavFlags::COUNTER)
                || b.desc().is_structured();
            appendable && valid_buffer_range(b.desc(), desc.format, elements)
        }
        (Resource::Texture2d(t), UavDimension::Texture2d { mip_slice }) => {
            !t.desc().is_multisampled() && *mip_slice < t.desc().mip_levels
        }
        _ => false,
    }
}

fn valid_rtv(resource: &Resource, desc: &RenderTargetViewDesc) -> bool {
    if !bound_as(resource, BindFlags::RENDER_TARGET) {
        return false;
    }
    match (resource, &desc.dimension) {
        (Resource::Buffer(b), RtvDimension::Buffer(elements)) => {
            valid_buffer_range(b.desc(), desc.format, elements)
        }
        (Resource::Texture2d(t), RtvDimension::Texture2d { mip_slice }) => {
            !t.desc().is_multisampled() && *mip_slice < t.desc().mip_levels
        }
        (Resource::Texture2d(t), RtvDimension::Texture2dMs) => t.desc().is_multisampled(),
        _ => false,
    }
}

fn valid_dsv(resource: &Resource, desc: &DepthStencilViewDesc) -> bool {
    if !bound_as(resource, BindFlags::DEPTH_STENCIL) || !desc.format.is_depth_stencil() {
        return false;
    }
    match (resource, &desc.dimension) {
        (Resource::Texture2d(t), DsvDimension::Texture2d { mip_slice }) => {
            !t.desc().is_multisampled() && *mip_slice < t.desc().mip_levels
        }
        (Resource::Texture2d(t), DsvDimension::Texture2dMs) => t.desc().is_multisampled(),
        _ => false,
    }
}

// ===== TRAIT IMPLEMENTATION =====

impl GraphicsDevice for MockGraphicsDevice {
    fn create_buffer(
        &mut self,
        desc: &BufferDesc,
        initial_data: Option<SubresourceData<'_>>,
    ) -> DeviceResult<Arc<dyn Buffer>> {
        let tracked = self.begin(CreationStep::Buffer, || valid_buffer(desc, initial_data.as_ref()))?;

        if let Some(init) = initial_data {
            self.uploads.push(UploadRecord {
                data: init.data.to_vec(),
                row_pitch: init.row_pitch,
                slice_pitch: init.slice_pitch,
            });
        }

        Ok(Arc::new(MockBuffer { desc: desc.clone(), _tracked: tracked }))
    }

    fn create_texture_2d(&mut self, desc: &Texture2dDesc) -> DeviceResult<Arc<dyn Texture2d>> {
        let tracked = self.begin(CreationStep::Texture2d, || valid_texture(desc))?;
        Ok(Arc::new(MockTexture2d { desc: desc.clone(), _tracked: tracked }))
    }

    fn create_shader_resource_view(
        &mut self,
        resource: &Resource,
        desc: &ShaderResourceViewDesc,
    ) -> DeviceResult<Arc<dyn ShaderResourceView>> {
        let tracked = self.begin(CreationStep::ShaderResourceView, || valid_srv(resource, desc))?;
        Ok(Arc::new(MockShaderResourceView {
            desc: *desc,
            resource: resource.clone(),
            _tracked: tracked,
        }))
    }

    fn create_unordered_access_view(
        &mut self,
        resource: &Resource,
        desc: &UnorderedAccessViewDesc,
    ) -> DeviceResult<Arc<dyn UnorderedAccessView>> {
        let tracked = self.begin(CreationStep::UnorderedAccessView, || valid_uav(resource, desc))?;
        Ok(Arc::new(MockUnorderedAccessView {
            desc: *desc,
            resource: resource.clone(),
            _tracked: tracked,
        }))
    }

    fn create_render_target_view(
        &mut self,
        resource: &Resource,
        desc: &RenderTargetViewDesc,
    ) -> DeviceResult<Arc<dyn RenderTargetView>> {
        let tracked = self.begin(CreationStep::RenderTargetView, || valid_rtv(resource, desc))?;
        Ok(Arc::new(MockRenderTargetView {
            desc: *desc,
            resource: resource.clone(),
            _tracked: tracked,
        }))
    }

    fn create_depth_stencil_view(
        &mut self,
        resource: &Resource,
        desc: &DepthStencilViewDesc,
    ) -> DeviceResult<Arc<dyn DepthStencilView>> {
        let tracked = self.begin(CreationStep::DepthStencilView, || valid_dsv(resource, desc))?;
        Ok(Arc::new(MockDepthStencilView {
            desc: *desc,
            resource: resource.clone(),
            _tracked: tracked,
        }))
    }
}

#[cfg(test)]
#[path = "mock_graphics_device_tests.rs"]
mod tests;
