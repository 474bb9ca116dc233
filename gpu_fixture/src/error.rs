//! Error types for the GPU fixture library
//!
//! Two failure classes exist:
//! - configuration errors, raised when a test fixture asks for something
//!   internally inconsistent (fatal, the run must stop)
//! - device errors, raised when the graphics device rejects a creation call
//!   (carry the native status code and the sub-step that failed)

use std::fmt;

/// Result type for fixture operations
pub type Result<T> = std::result::Result<T, Error>;

/// Native status code returned by a device entry point (HRESULT layout)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusCode(pub u32);

impl StatusCode {
    pub const S_OK: StatusCode = StatusCode(0x0000_0000);
    pub const E_FAIL: StatusCode = StatusCode(0x8000_4005);
    pub const E_INVALIDARG: StatusCode = StatusCode(0x8007_0057);
    pub const E_OUTOFMEMORY: StatusCode = StatusCode(0x8007_000E);
    pub const DXGI_ERROR_UNSUPPORTED: StatusCode = StatusCode(0x887A_0004);

    /// Failure codes have the severity bit set
    pub fn is_failure(&self) -> bool {
        self.0 & 0x8000_0000 != 0
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

/// Device call that produced an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CreationStep {
    Buffer,
    Texture2d,
    ShaderResourceView,
    UnorderedAccessView,
    RenderTargetView,
    DepthStencilView,
}

impl fmt::Display for CreationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CreationStep::Buffer => "CreateBuffer",
            CreationStep::Texture2d => "CreateTexture2D",
            CreationStep::ShaderResourceView => "CreateShaderResourceView",
            CreationStep::UnorderedAccessView => "CreateUnorderedAccessView",
            CreationStep::RenderTargetView => "CreateRenderTargetView",
            CreationStep::DepthStencilView => "CreateDepthStencilView",
        };
        f.write_str(name)
    }
}

/// Fixture errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The request is malformed (e.g. stride not dividing the byte size).
    /// Indicates a defective test fixture, never retried.
    InvalidConfiguration(String),

    /// The device rejected a creation call
    Device {
        step: CreationStep,
        code: StatusCode,
    },

    /// Harness setup failed (argument parsing, invalid config)
    InitializationFailed(String),
}

impl Error {
    /// Whether this error must terminate the test run immediately
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::InvalidConfiguration(_))
    }

    /// Process exit code a test program reports for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InitializationFailed(_) => 1,
            Error::InvalidConfiguration(_) => 2,
            Error::Device { .. } => 3,
        }
    }

    /// Native status code, if the error came from the device
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            Error::Device { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidConfiguration(msg) => write!(f, "Invalid configuration: {}", msg),
            Error::Device { step, code } => write!(f, "{} failed: {}", step, code),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
