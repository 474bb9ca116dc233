//! Unit tests for the buffer factory
//!
//! Descriptor compilation is tested without a device; creation is tested
//! against MockGraphicsDevice with validation enabled.

use std::sync::Arc;
use crate::error::{CreationStep, Error, StatusCode};
use crate::graphics_device::{
    BindFlags, BufferElements, BufferUavFlags, CpuAccessFlags, Format, MockGraphicsDevice,
    Resource, ResourceMiscFlags, RtvDimension, SrvDimension, UavDimension, Usage,
};
use crate::resource::{
    compile_buffer, create_buffer, BufferRequest, UavKind, UsageClass, ViewRequest,
    RAW_VIEW_ELEMENT_SIZE,
};

fn srv_elements(request: &BufferRequest<'_>) -> u32 {
    match compile_buffer(request).unwrap().srv.unwrap().dimension {
        SrvDimension::Buffer(elements) => elements.num_elements,
        other => panic!("unexpected SRV dimension {:?}", other),
    }
}

// ============================================================================
// USAGE CLASS TABLE
// ============================================================================

#[test]
fn test_usage_class_triples_without_views() {
    let expected = [
        (UsageClass::ConstantBuffer, BindFlags::CONSTANT_BUFFER, CpuAccessFlags::WRITE, Usage::Dynamic),
        (UsageClass::StagingBuffer, BindFlags::empty(), CpuAccessFlags::READ | CpuAccessFlags::WRITE, Usage::Staging),
        (UsageClass::VertexBuffer, BindFlags::VERTEX_BUFFER, CpuAccessFlags::WRITE, Usage::Dynamic),
        (UsageClass::IndexBuffer, BindFlags::INDEX_BUFFER, CpuAccessFlags::WRITE, Usage::Dynamic),
        (UsageClass::ShaderBuffer, BindFlags::SHADER_RESOURCE, CpuAccessFlags::WRITE, Usage::Dynamic),
        (UsageClass::StreamOutBuffer, BindFlags::STREAM_OUTPUT, CpuAccessFlags::empty(), Usage::Default),
        (UsageClass::ComputeBuffer, BindFlags::UNORDERED_ACCESS, CpuAccessFlags::empty(), Usage::Default),
    ];
    assert_eq!(expected.len(), UsageClass::ALL.len());

    for (class, bind, cpu, usage) in expected {
        let compiled = compile_buffer(&BufferRequest::new(class, 256)).unwrap();
        assert_eq!(compiled.desc.bind_flags, bind, "bind flags of {:?}", class);
        assert_eq!(compiled.desc.cpu_access_flags, cpu, "cpu access of {:?}", class);
        assert_eq!(compiled.desc.usage, usage, "usage of {:?}", class);
        assert!(compiled.srv.is_none() && compiled.uav.is_none() && compiled.rtv.is_none());
    }
}

#[test]
fn test_view_requests_add_bind_flags() {
    let request = BufferRequest::new(UsageClass::ComputeBuffer, 64)
        .with_stride(16)
        .with_srv(ViewRequest::Create);
    let compiled = compile_buffer(&request).unwrap();
    assert_eq!(compiled.desc.bind_flags, BindFlags::UNORDERED_ACCESS | BindFlags::SHADER_RESOURCE);

    let request = BufferRequest::new(UsageClass::StreamOutBuffer, 64)
        .with_format(Format::R32_FLOAT)
        .with_uav(ViewRequest::Create)
        .with_rtv(ViewRequest::Create);
    let compiled = compile_buffer(&request).unwrap();
    assert_eq!(
        compiled.desc.bind_flags,
        BindFlags::STREAM_OUTPUT | BindFlags::UNORDERED_ACCESS | BindFlags::RENDER_TARGET
    );
}

#[test]
fn test_bind_only_adds_flag_without_view() {
    let request = BufferRequest::new(UsageClass::VertexBuffer, 64).with_srv(ViewRequest::BindOnly);
    let compiled = compile_buffer(&request).unwrap();
    assert!(compiled.desc.bind_flags.contains(BindFlags::SHADER_RESOURCE));
    assert!(compiled.srv.is_none());
}

// ============================================================================
// SIZE AND STRIDE
// ============================================================================

#[test]
fn test_constant_buffer_size_rounded_to_16() {
    let compiled = compile_buffer(&BufferRequest::new(UsageClass::ConstantBuffer, 50)).unwrap();
    assert_eq!(compiled.desc.byte_width, 64);

    let compiled = compile_buffer(&BufferRequest::new(UsageClass::ConstantBuffer, 64)).unwrap();
    assert_eq!(compiled.desc.byte_width, 64);
}

#[test]
fn test_other_classes_keep_exact_size() {
    let compiled = compile_buffer(&BufferRequest::new(UsageClass::VertexBuffer, 50)).unwrap();
    assert_eq!(compiled.desc.byte_width, 50);
}

#[test]
fn test_stride_checked_against_rounded_size() {
    // 50 rounds up to 64, which 32 divides
    let request = BufferRequest::new(UsageClass::ConstantBuffer, 50).with_stride(32);
    assert!(compile_buffer(&request).is_ok());
}

#[test]
fn test_stride_not_dividing_size_is_fatal() {
    for (size, stride) in [(64, 12), (100, 48), (10, 3), (7, 8)] {
        let request = BufferRequest::new(UsageClass::ComputeBuffer, size).with_stride(stride);
        let err = compile_buffer(&request).unwrap_err();
        assert!(err.is_fatal(), "size {} stride {}", size, stride);
        assert!(matches!(err, Error::InvalidConfiguration(_)));
    }
}

#[test]
fn test_stride_violation_makes_no_device_call() {
    let mut device = MockGraphicsDevice::new(true);
    let request = BufferRequest::new(UsageClass::ComputeBuffer, 100)
        .with_stride(16)
        .with_srv(ViewRequest::Create)
        .with_uav(ViewRequest::Create);

    let result = create_buffer(&mut device, &request);
    assert!(matches!(result, Err(Error::InvalidConfiguration(_))));
    assert_eq!(device.total_creations(), 0);
    assert_eq!(device.live_object_count(), 0);
}

#[test]
fn test_zero_size_is_fatal() {
    let err = compile_buffer(&BufferRequest::new(UsageClass::VertexBuffer, 0)).unwrap_err();
    assert!(err.is_fatal());
}

#[test]
fn test_constant_buffer_alignment_overflow_is_fatal() {
    let err = compile_buffer(&BufferRequest::new(UsageClass::ConstantBuffer, u32::MAX)).unwrap_err();
    assert!(err.is_fatal());
}

// ============================================================================
// STRUCTURING
// ============================================================================

#[test]
fn test_stride_without_format_is_structured() {
    let compiled = compile_buffer(&BufferRequest::new(UsageClass::ComputeBuffer, 64).with_stride(16)).unwrap();
    assert!(compiled.desc.is_structured());
    assert_eq!(compiled.desc.structure_byte_stride, 16);
}

#[test]
fn test_format_suppresses_structuring() {
    let request = BufferRequest::new(UsageClass::ComputeBuffer, 64)
        .with_stride(16)
        .with_format(Format::R32G32B32A32_FLOAT);
    let compiled = compile_buffer(&request).unwrap();
    assert!(!compiled.desc.is_structured());
    assert_eq!(compiled.desc.structure_byte_stride, 0);
}

#[test]
fn test_misc_flags_pass_through() {
    let request = BufferRequest::new(UsageClass::ComputeBuffer, 64)
        .with_stride(4)
        .with_misc_flags(ResourceMiscFlags::DRAWINDIRECT_ARGS);
    let compiled = compile_buffer(&request).unwrap();
    assert_eq!(
        compiled.desc.misc_flags,
        ResourceMiscFlags::DRAWINDIRECT_ARGS | ResourceMiscFlags::BUFFER_STRUCTURED
    );
}

// ============================================================================
// VIEW ELEMENT COUNTS
// ============================================================================

#[test]
fn test_structured_srv_element_count() {
    let request = BufferRequest::new(UsageClass::ComputeBuffer, 64)
        .with_stride(16)
        .with_srv(ViewRequest::Create);
    assert_eq!(srv_elements(&request), 4);
}

#[test]
fn test_srv_without_stride_uses_legacy_raw_size() {
    // Quirk: element count is size / 16 regardless of the 4-byte format
    let request = BufferRequest::new(UsageClass::ShaderBuffer, 256)
        .with_format(Format::R32_FLOAT)
        .with_srv(ViewRequest::Create);
    assert_eq!(RAW_VIEW_ELEMENT_SIZE, 16);
    assert_eq!(srv_elements(&request), 256 / 16);
}

#[test]
fn test_typed_srv_with_stride_counts_by_stride() {
    let request = BufferRequest::new(UsageClass::ShaderBuffer, 256)
        .with_stride(4)
        .with_format(Format::R32_UINT)
        .with_srv(ViewRequest::Create);
    assert_eq!(srv_elements(&request), 64);
}

#[test]
fn test_uav_append_flag_from_sub_tag() {
    let request = BufferRequest::new(UsageClass::ComputeBuffer, 128)
        .with_stride(8)
        .with_uav(ViewRequest::Create)
        .with_uav_kind(UavKind::Append);
    let uav = compile_buffer(&request).unwrap().uav.unwrap();
    assert_eq!(
        uav.dimension,
        UavDimension::Buffer {
            elements: BufferElements { first_element: 0, num_elements: 16 },
            flags: BufferUavFlags::APPEND,
        }
    );

    let plain = compile_buffer(&request.clone().with_uav_kind(UavKind::Plain)).unwrap().uav.unwrap();
    assert!(matches!(plain.dimension, UavDimension::Buffer { flags, .. } if flags.is_empty()));
}

#[test]
fn test_uav_without_stride_counts_bytes() {
    let request = BufferRequest::new(UsageClass::ComputeBuffer, 128)
        .with_format(Format::R8_UINT)
        .with_uav(ViewRequest::Create);
    let uav = compile_buffer(&request).unwrap().uav.unwrap();
    assert!(matches!(
        uav.dimension,
        UavDimension::Buffer { elements: BufferElements { num_elements: 128, .. }, .. }
    ));
}

#[test]
fn test_rtv_element_count_matches_stride_rule() {
    let request = BufferRequest::new(UsageClass::ShaderBuffer, 256)
        .with_stride(16)
        .with_format(Format::R32G32B32A32_FLOAT)
        .with_rtv(ViewRequest::Create);
    let rtv = compile_buffer(&request).unwrap().rtv.unwrap();
    assert_eq!(rtv.format, Format::R32G32B32A32_FLOAT);
    assert_eq!(rtv.dimension, RtvDimension::Buffer(BufferElements { first_element: 0, num_elements: 16 }));
}

// ============================================================================
// CREATION
// ============================================================================

#[test]
fn test_create_buffer_views_reference_buffer() {
    let mut device = MockGraphicsDevice::new(true);
    let request = BufferRequest::new(UsageClass::ComputeBuffer, 64)
        .with_stride(16)
        .with_srv(ViewRequest::Create)
        .with_uav(ViewRequest::Create);

    let created = create_buffer(&mut device, &request).unwrap();
    let buffer = Resource::Buffer(created.buffer.clone().unwrap());

    assert!(created.srv.as_ref().unwrap().resource().same_object(&buffer));
    assert!(created.uav.as_ref().unwrap().resource().same_object(&buffer));
    assert!(created.rtv.is_none());
    assert_eq!(device.live_object_count(), 3);
}

#[test]
fn test_create_buffer_views_only_releases_scratch_handle() {
    let mut device = MockGraphicsDevice::new(true);
    let request = BufferRequest::new(UsageClass::ComputeBuffer, 64)
        .with_stride(16)
        .with_uav(ViewRequest::Create)
        .views_only();

    let created = create_buffer(&mut device, &request).unwrap();
    assert!(created.buffer.is_none());

    let uav = created.uav.unwrap();
    // Only the view holds the buffer now
    assert_eq!(uav.resource().ref_count(), 1);
    assert_eq!(device.live_object_count(), 2);

    drop(uav);
    assert_eq!(device.live_object_count(), 0);
}

#[test]
fn test_create_buffer_passes_initial_data() {
    let mut device = MockGraphicsDevice::new(true);
    let data: Vec<u8> = (0..32).collect();
    let request = BufferRequest::new(UsageClass::VertexBuffer, 32).with_data(&data);

    let _created = create_buffer(&mut device, &request).unwrap();

    let upload = &device.uploads()[0];
    assert_eq!(upload.data, data);
    assert_eq!(upload.row_pitch, 32);
    assert_eq!(upload.slice_pitch, 32);
}

#[test]
fn test_constant_buffer_initial_data_padded_to_aligned_size() {
    let mut device = MockGraphicsDevice::new(true);
    let data = [7u8; 50];
    let request = BufferRequest::new(UsageClass::ConstantBuffer, 50).with_data(&data);

    let created = create_buffer(&mut device, &request).unwrap();
    assert_eq!(created.buffer.unwrap().desc().byte_width, 64);

    let upload = &device.uploads()[0];
    assert_eq!(upload.data.len(), 64);
    assert!(upload.data[..50].iter().all(|&b| b == 7));
    assert!(upload.data[50..].iter().all(|&b| b == 0));
    assert_eq!(upload.row_pitch, 64);
    assert_eq!(upload.slice_pitch, 64);
}

#[test]
fn test_short_initial_data_is_fatal() {
    // Without validation the device would accept the short slice
    let mut device = MockGraphicsDevice::new(false);
    let data = [1u8; 4];
    let request = BufferRequest::new(UsageClass::VertexBuffer, 64).with_data(&data);

    let err = create_buffer(&mut device, &request).err().unwrap();
    assert!(err.is_fatal());
    assert_eq!(device.total_creations(), 0);
    assert!(device.uploads().is_empty());
}

#[test]
fn test_constant_buffer_data_shorter_than_request_is_fatal() {
    let data = [0u8; 40];
    let request = BufferRequest::new(UsageClass::ConstantBuffer, 50).with_data(&data);
    assert!(compile_buffer(&request).unwrap_err().is_fatal());
}

#[test]
fn test_longer_initial_data_passed_unchanged() {
    let mut device = MockGraphicsDevice::new(true);
    let data = [3u8; 48];
    let request = BufferRequest::new(UsageClass::IndexBuffer, 32)
        .with_format(Format::R16_UINT)
        .with_data(&data);

    let _created = create_buffer(&mut device, &request).unwrap();
    assert_eq!(device.uploads()[0].data.len(), 48);
    assert_eq!(device.uploads()[0].row_pitch, 32);
}

#[test]
fn test_create_buffer_typed_data() {
    let mut device = MockGraphicsDevice::new(true);
    let vertices = [glam::Vec4::new(0.0, 0.5, 0.0, 1.0), glam::Vec4::new(0.5, -0.5, 0.0, 1.0)];
    let request = BufferRequest::new(UsageClass::VertexBuffer, 32).with_typed_data(&vertices);

    let created = create_buffer(&mut device, &request).unwrap();
    assert_eq!(created.buffer.unwrap().desc().byte_width, 32);
    assert_eq!(device.uploads()[0].data.len(), 32);
}

#[test]
fn test_create_buffer_twice_gives_independent_buffers() {
    let mut device = MockGraphicsDevice::new(true);
    let request = BufferRequest::new(UsageClass::ConstantBuffer, 50);

    let a = create_buffer(&mut device, &request).unwrap().buffer.unwrap();
    let b = create_buffer(&mut device, &request).unwrap().buffer.unwrap();

    assert!(!Arc::ptr_eq(&a, &b));
    assert_eq!(a.desc(), b.desc());
    assert_eq!(device.creation_count(CreationStep::Buffer), 2);
}

// ============================================================================
// DEVICE FAILURES
// ============================================================================

#[test]
fn test_buffer_failure_reports_step_and_code() {
    let mut device = MockGraphicsDevice::new(true);
    device.fail_on(CreationStep::Buffer, StatusCode::E_OUTOFMEMORY);

    let err = create_buffer(&mut device, &BufferRequest::new(UsageClass::VertexBuffer, 64)).err().unwrap();
    assert_eq!(err, Error::Device { step: CreationStep::Buffer, code: StatusCode::E_OUTOFMEMORY });
    assert!(!err.is_fatal());
}

#[test]
fn test_view_failure_releases_earlier_objects() {
    let mut device = MockGraphicsDevice::new(true);
    device.fail_on(CreationStep::RenderTargetView, StatusCode::E_INVALIDARG);

    let request = BufferRequest::new(UsageClass::ShaderBuffer, 256)
        .with_format(Format::R32G32B32A32_FLOAT)
        .with_stride(16)
        .with_srv(ViewRequest::Create)
        .with_rtv(ViewRequest::Create);

    let err = create_buffer(&mut device, &request).err().unwrap();
    assert_eq!(err.status_code(), Some(StatusCode::E_INVALIDARG));
    assert!(matches!(err, Error::Device { step: CreationStep::RenderTargetView, .. }));

    // Buffer and SRV were created, then released
    assert_eq!(device.creation_count(CreationStep::Buffer), 1);
    assert_eq!(device.creation_count(CreationStep::ShaderResourceView), 1);
    assert_eq!(device.live_object_count(), 0);
}

#[test]
fn test_validating_device_rejects_dynamic_uav() {
    // A dynamic buffer cannot be bound for unordered access
    let mut device = MockGraphicsDevice::new(true);
    let request = BufferRequest::new(UsageClass::VertexBuffer, 64)
        .with_format(Format::R32_FLOAT)
        .with_uav(ViewRequest::Create);

    let err = create_buffer(&mut device, &request).err().unwrap();
    assert!(matches!(err, Error::Device { step: CreationStep::Buffer, code: StatusCode::E_INVALIDARG }));
}
