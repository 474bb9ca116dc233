//! Resource factories
//!
//! Compile an abstract buffer/texture request into native descriptors,
//! then create the resource and its views on a caller-supplied device.

pub mod view_request;
pub mod buffer_factory;
pub mod texture_factory;

pub use view_request::ViewRequest;
pub use buffer_factory::{
    UsageClass, UavKind, BufferRequest, CompiledBuffer, CreatedBuffer,
    compile_buffer, create_buffer,
    CONSTANT_BUFFER_ALIGNMENT, RAW_VIEW_ELEMENT_SIZE,
};
pub use texture_factory::{
    TextureRequest, CompiledTexture, CreatedTexture,
    compile_texture_2d, create_texture_2d, create_texture_2d_ms,
};

use crate::error::{CreationStep, Error, StatusCode};
use crate::fixture_error;

/// Log a rejected device call and wrap it with its step
pub(crate) fn device_error(source: &str, step: CreationStep, code: StatusCode) -> Error {
    fixture_error!(source, "{} failed: {}", step, code);
    Error::Device { step, code }
}
