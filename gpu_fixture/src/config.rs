/// Harness configuration
///
/// Parameters a test program hands to device bring-up, overridable from
/// the command line through `FixtureArgs`.

use clap::Parser;

use crate::error::{Error, Result};
use crate::graphics_device::Format;
use crate::fixture_warn;

/// Device feature level requested at bring-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FeatureLevel {
    Level11_0,
    Level11_1,
    Level11_2,
}

/// Test program configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Application name (window title)
    pub app_name: String,
    /// Back buffer width in pixels
    pub screen_width: u32,
    /// Back buffer height in pixels
    pub screen_height: u32,
    /// Back buffer format
    pub backbuffer_format: Format,
    /// Number of swapchain buffers
    pub backbuffer_count: u32,
    /// Back buffer sample count
    pub backbuffer_msaa: u32,
    /// Exclusive fullscreen instead of windowed
    pub fullscreen: bool,
    /// Enable the device debug layer (descriptor validation)
    pub debug_device: bool,
    /// Requested feature level
    pub feature_level: FeatureLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "GPU fixture test program".to_string(),
            screen_width: 400,
            screen_height: 300,
            backbuffer_format: Format::R8G8B8A8_UNORM_SRGB,
            backbuffer_count: 1,
            backbuffer_msaa: 1,
            fullscreen: false,
            debug_device: cfg!(debug_assertions),
            feature_level: FeatureLevel::Level11_0,
        }
    }
}

/// Command-line overrides of the harness configuration
#[derive(Parser, Debug, Default)]
#[command(name = "gpu_fixture", about = "GPU fixture test program")]
pub struct FixtureArgs {
    /// Back buffer width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Back buffer height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Back buffer sample count
    #[arg(long)]
    pub msaa: Option<u32>,

    /// Number of swapchain buffers
    #[arg(long)]
    pub buffers: Option<u32>,

    /// Exclusive fullscreen instead of windowed
    #[arg(long)]
    pub fullscreen: bool,

    /// Enable the device debug layer
    #[arg(long, conflicts_with = "no_debug")]
    pub debug: bool,

    /// Disable the device debug layer
    #[arg(long, conflicts_with = "debug")]
    pub no_debug: bool,

    /// Request feature level 11.1
    #[arg(long = "d3d11_1")]
    pub d3d11_1: bool,

    /// Request feature level 11.2
    #[arg(long = "d3d11_2")]
    pub d3d11_2: bool,
}

impl TryFrom<FixtureArgs> for Config {
    type Error = Error;

    fn try_from(args: FixtureArgs) -> Result<Self> {
        let defaults = Config::default();

        // Explicit switches override the build default
        let debug_device = args.debug || (!args.no_debug && defaults.debug_device);

        let feature_level = if args.d3d11_2 {
            FeatureLevel::Level11_2
        } else if args.d3d11_1 {
            FeatureLevel::Level11_1
        } else {
            defaults.feature_level
        };

        let config = Config {
            screen_width: args.width.unwrap_or(defaults.screen_width),
            screen_height: args.height.unwrap_or(defaults.screen_height),
            backbuffer_msaa: args.msaa.unwrap_or(defaults.backbuffer_msaa),
            backbuffer_count: args.buffers.unwrap_or(defaults.backbuffer_count),
            fullscreen: args.fullscreen,
            debug_device,
            feature_level,
            ..defaults
        };

        config.validate()?;
        Ok(config)
    }
}

impl Config {
    /// Build a configuration from command-line arguments (program name excluded)
    ///
    /// Recognized: `--width N`, `--height N`, `--msaa N`, `--buffers N`,
    /// `--fullscreen`, `--debug`, `--no-debug`, `--d3d11_1`, `--d3d11_2`.
    /// Unknown arguments and malformed values are `InitializationFailed`.
    pub fn from_args<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let argv = std::iter::once("gpu_fixture".to_string())
            .chain(args.into_iter().map(|arg| arg.as_ref().to_string()));

        let parsed = FixtureArgs::try_parse_from(argv).map_err(|err| {
            fixture_warn!("gpu_fixture::config", "Rejected arguments: {:?}", err.kind());
            Error::InitializationFailed(err.to_string())
        })?;

        Config::try_from(parsed)
    }

    /// Reject parameters no device accepts
    pub fn validate(&self) -> Result<()> {
        if self.screen_width == 0 || self.screen_height == 0 {
            return Err(Error::InitializationFailed(format!(
                "Back buffer size must be non-zero (got {}x{})",
                self.screen_width, self.screen_height
            )));
        }
        if self.backbuffer_count == 0 {
            return Err(Error::InitializationFailed("Back buffer count must be at least 1".to_string()));
        }
        if !self.backbuffer_msaa.is_power_of_two() || self.backbuffer_msaa > 32 {
            return Err(Error::InitializationFailed(format!(
                "Unsupported back buffer sample count {}",
                self.backbuffer_msaa
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
