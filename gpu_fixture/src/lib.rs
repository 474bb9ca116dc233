/*!
# GPU Fixture

Resource-creation helpers for graphics test programs.

A test program brings up a device, then asks this crate for the buffers
and textures its scenario needs. The factories compile an abstract request
(usage class, size, stride, format, which views) into native descriptors
and create the resource plus its views on the device passed in.

## Architecture

- **GraphicsDevice**: creation entry points of an initialized device
- **Buffer factory**: usage class + size + stride/format + view requests
- **Texture factory**: size + sample count + format + view requests
- **MockGraphicsDevice**: software device with validation and live-object tracking
- **Harness**: process-wide log sink
*/

mod error;
mod harness;
pub mod config;
pub mod log;
pub mod graphics_device;
pub mod resource;

// Main namespace module
pub mod fixture {
    // Error types
    pub use crate::error::{Error, Result, CreationStep, StatusCode};

    // Log sink
    pub use crate::harness::Harness;

    // Configuration
    pub use crate::config::{Config, FeatureLevel, FixtureArgs};

    // Device interface
    pub use crate::graphics_device::{GraphicsDevice, DeviceResult, MockGraphicsDevice};

    // Logging sub-module (types only, macros are exported at the crate root)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Device types sub-module
    pub mod device {
        pub use crate::graphics_device::*;
    }

    // Factories sub-module
    pub mod resource {
        pub use crate::resource::*;
    }
}
