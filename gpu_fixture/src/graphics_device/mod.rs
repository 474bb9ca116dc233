/// Graphics device module - device interface and native descriptor types

pub mod graphics_device;
pub mod format;
pub mod flags;
pub mod buffer;
pub mod texture;
pub mod view;
pub mod mock_graphics_device;

pub use graphics_device::*;
pub use format::*;
pub use flags::*;
pub use buffer::*;
pub use texture::*;
pub use view::*;

pub use mock_graphics_device::{MockGraphicsDevice, LiveObject, ObjectKey, UploadRecord};
