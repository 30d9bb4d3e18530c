//! Pipeline configuration definitions

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::sensor::SensorSettings;
use crate::frame::{PixelFormat, DISPLAY_HEIGHT, DISPLAY_WIDTH};

/// Largest source frame accepted by the pipeline (QQVGA)
pub const MAX_SOURCE_WIDTH: u16 = 160;

/// Largest source frame height accepted by the pipeline
pub const MAX_SOURCE_HEIGHT: u16 = 120;

/// Image dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Resolution {
    pub width: u16,
    pub height: u16,
}

impl Resolution {
    /// Resolution of the OLED panel
    pub const DISPLAY: Self = Self::new(DISPLAY_WIDTH as u16, DISPLAY_HEIGHT as u16);

    /// 96x96 center window, the default sensor mode
    pub const SQUARE_96: Self = Self::new(96, 96);

    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Total pixel count
    pub const fn pixels(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Check if this resolution fits inside `other`
    pub const fn fits_within(&self, other: &Resolution) -> bool {
        self.width <= other.width && self.height <= other.height
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Reasons a configuration is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Source width or height is zero
    ZeroResolution,
    /// Source frame is larger than the pipeline supports
    SourceTooLarge,
    /// At least one camera initialization attempt is required
    ZeroRetries,
    /// Frame interval must be non-zero
    ZeroFrameDelay,
    /// Error counter saturation limit must be non-zero
    ZeroSaturationLimit,
    /// Statistics interval must be non-zero
    ZeroStatsInterval,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ConfigError::ZeroResolution => "source resolution must be non-zero",
            ConfigError::SourceTooLarge => "source resolution exceeds 160x120",
            ConfigError::ZeroRetries => "max_retries must be at least 1",
            ConfigError::ZeroFrameDelay => "frame_delay_ms must be non-zero",
            ConfigError::ZeroSaturationLimit => "error_saturation_limit must be non-zero",
            ConfigError::ZeroStatsInterval => "stats_interval must be non-zero",
        };
        f.write_str(msg)
    }
}

/// Pipeline configuration
///
/// Immutable for the lifetime of the firmware. Missing keys in
/// `camera.toml` take the values from [`PipelineConfig::DEFAULT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct PipelineConfig {
    /// Sensor frame size
    pub source: Resolution,
    /// Pixels strictly brighter than this are lit
    pub brightness_threshold: u8,
    /// Target frame interval (ms)
    pub frame_delay_ms: u32,
    /// Camera initialization attempts before giving up
    pub max_retries: u8,
    /// Power stabilization wait before touching any bus (ms)
    pub startup_delay_ms: u32,
    /// Error counter is reset once it exceeds this value
    pub error_saturation_limit: u32,
    /// Frames between statistics reports
    pub stats_interval: u32,
    /// Show liveness test patterns once the display is up
    pub self_test: bool,
}

impl PipelineConfig {
    pub const DEFAULT: Self = Self {
        source: Resolution::SQUARE_96,
        brightness_threshold: 128,
        frame_delay_ms: 100,
        max_retries: 5,
        startup_delay_ms: 2000,
        error_saturation_limit: 1000,
        stats_interval: 100,
        self_test: true,
    };

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.width == 0 || self.source.height == 0 {
            return Err(ConfigError::ZeroResolution);
        }
        let max = Resolution::new(MAX_SOURCE_WIDTH, MAX_SOURCE_HEIGHT);
        if !self.source.fits_within(&max) {
            return Err(ConfigError::SourceTooLarge);
        }
        if self.max_retries == 0 {
            return Err(ConfigError::ZeroRetries);
        }
        if self.frame_delay_ms == 0 {
            return Err(ConfigError::ZeroFrameDelay);
        }
        if self.error_saturation_limit == 0 {
            return Err(ConfigError::ZeroSaturationLimit);
        }
        if self.stats_interval == 0 {
            return Err(ConfigError::ZeroStatsInterval);
        }
        Ok(())
    }

    /// Settings requested from the sensor driver
    pub const fn sensor_settings(&self) -> SensorSettings {
        SensorSettings {
            resolution: self.source,
            format: PixelFormat::Grayscale,
            frame_buffers: 1,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
