//! GPU fixture demo
//!
//! Brings up a mock device from the command line, builds the resources a
//! typical rendering test needs, then checks that nothing is left alive.
//!
//! Run with: cargo run -p gpu_fixture_demo -- --msaa 4 --debug

use bytemuck::{Pod, Zeroable};
use clap::Parser;
use glam::{Mat4, Vec3};
use gpu_fixture::fixture::{Config, FixtureArgs, GraphicsDevice, MockGraphicsDevice, Result};
use gpu_fixture::fixture::device::Format;
use gpu_fixture::fixture::resource::{
    create_buffer, create_texture_2d, create_texture_2d_ms, BufferRequest, TextureRequest,
    UavKind, UsageClass, ViewRequest,
};
use gpu_fixture::{fixture_error, fixture_info};

const SOURCE: &str = "gpu_fixture_demo";

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
    color: [f32; 4],
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct FrameConstants {
    view_projection: Mat4,
    world: Mat4,
}

/// Particle record read and written by compute passes
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct Particle {
    position: [f32; 3],
    age: f32,
}

fn main() {
    let config = match Config::try_from(FixtureArgs::parse()) {
        Ok(config) => config,
        Err(err) => {
            fixture_error!(SOURCE, "{}", err);
            std::process::exit(err.exit_code());
        }
    };

    fixture_info!(SOURCE, "{} ({}x{}, {} sample(s), {:?}, debug device: {})",
        config.app_name, config.screen_width, config.screen_height,
        config.backbuffer_msaa, config.feature_level, config.debug_device);

    let mut device = MockGraphicsDevice::from_config(&config);

    if let Err(err) = run_scenario(&mut device, &config) {
        fixture_error!(SOURCE, "Scenario failed: {}", err);
        std::process::exit(err.exit_code());
    }

    let live = device.report_live_objects();
    if live > 0 {
        fixture_error!(SOURCE, "{} object(s) still alive after teardown", live);
        std::process::exit(1);
    }

    fixture_info!(SOURCE, "Created {} object(s), all released", device.total_creations());
}

fn run_scenario(device: &mut dyn GraphicsDevice, config: &Config) -> Result<()> {
    let width = config.screen_width;
    let height = config.screen_height;
    let samples = config.backbuffer_msaa;

    // Back buffer, readable by the present pass only through its bind flag
    let backbuffer = create_texture_2d_ms(device, samples,
        &TextureRequest::new(width, height, config.backbuffer_format)
            .with_rtv(ViewRequest::Create)
            .with_srv(ViewRequest::BindOnly))?;
    fixture_info!(SOURCE, "Back buffer: {:?}", backbuffer.texture.desc().format);

    let aspect = width as f32 / height as f32;
    let constants = [FrameConstants {
        view_projection: Mat4::perspective_rh(std::f32::consts::FRAC_PI_4, aspect, 0.1, 100.0)
            * Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y),
        world: Mat4::IDENTITY,
    }];
    let constant_buffer = create_buffer(device,
        &BufferRequest::new(UsageClass::ConstantBuffer, std::mem::size_of::<FrameConstants>() as u32)
            .with_typed_data(&constants))?;

    let vertices = [
        Vertex { position: [0.0, 0.5, 0.0], color: [1.0, 0.0, 0.0, 1.0] },
        Vertex { position: [0.5, -0.5, 0.0], color: [0.0, 1.0, 0.0, 1.0] },
        Vertex { position: [-0.5, -0.5, 0.0], color: [0.0, 0.0, 1.0, 1.0] },
    ];
    let vertex_bytes: &[u8] = bytemuck::cast_slice(&vertices);
    let vertex_buffer = create_buffer(device,
        &BufferRequest::new(UsageClass::VertexBuffer, vertex_bytes.len() as u32)
            .with_data(vertex_bytes))?;

    let indices: [u16; 4] = [0, 1, 2, 0];
    let index_buffer = create_buffer(device,
        &BufferRequest::new(UsageClass::IndexBuffer, std::mem::size_of_val(&indices) as u32)
            .with_format(Format::R16_UINT)
            .with_typed_data(&indices))?;

    // Particle store for compute passes
    let particle_count = 1024u32;
    let particle_stride = std::mem::size_of::<Particle>() as u32;
    let particles = create_buffer(device,
        &BufferRequest::new(UsageClass::ComputeBuffer, particle_count * particle_stride)
            .with_stride(particle_stride)
            .with_srv(ViewRequest::Create)
            .with_uav(ViewRequest::Create)
            .views_only())?;

    let emitted = create_buffer(device,
        &BufferRequest::new(UsageClass::ComputeBuffer, particle_count * particle_stride)
            .with_stride(particle_stride)
            .with_uav(ViewRequest::Create)
            .with_uav_kind(UavKind::Append)
            .views_only())?;

    // Offscreen HDR target, resolved into a single-sample copy for compute
    let hdr = create_texture_2d_ms(device, samples,
        &TextureRequest::new(width, height, Format::R16G16B16A16_FLOAT)
            .with_rtv(ViewRequest::Create)
            .with_srv(ViewRequest::Create))?;
    let resolved = create_texture_2d(device,
        &TextureRequest::new(width, height, Format::R16G16B16A16_FLOAT)
            .with_srv(ViewRequest::Create)
            .with_uav(ViewRequest::Create))?;

    let depth = create_texture_2d_ms(device, samples,
        &TextureRequest::new(width, height, Format::D32_FLOAT).with_dsv(ViewRequest::Create))?;

    fixture_info!(SOURCE, "Scenario ready: {} + {} + {} bytes of geometry and constants",
        vertex_bytes.len(),
        std::mem::size_of_val(&indices),
        constant_buffer.buffer.as_ref().map_or(0, |b| b.desc().byte_width));

    // Views go before the resources they reference
    drop((particles, emitted));
    drop((hdr.srv, hdr.rtv, resolved.srv, resolved.uav, depth.dsv, backbuffer.rtv));
    drop((hdr.texture, resolved.texture, depth.texture, backbuffer.texture));
    drop((constant_buffer, vertex_buffer, index_buffer));

    Ok(())
}
