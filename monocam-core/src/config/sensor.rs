//! Sensor configuration requested by the device initializer

use crate::frame::PixelFormat;

use super::types::Resolution;

/// Capture mode requested from the sensor driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorSettings {
    /// Frame size delivered to the pipeline
    pub resolution: Resolution,
    /// Pixel format delivered to the pipeline
    pub format: PixelFormat,
    /// Number of frame buffers the driver may allocate
    pub frame_buffers: u8,
}

/// Analog gain ceiling for automatic gain control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GainCeiling {
    X1,
    X2,
    X4,
    X8,
}

impl GainCeiling {
    /// Gain ceiling as a multiplier
    pub const fn multiplier(&self) -> u8 {
        match self {
            GainCeiling::X1 => 1,
            GainCeiling::X2 => 2,
            GainCeiling::X4 => 4,
            GainCeiling::X8 => 8,
        }
    }
}

/// Runtime tuning applied after a successful configure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorTuning {
    pub auto_exposure: bool,
    pub auto_gain: bool,
    /// Ignored by monochrome sensors
    pub auto_white_balance: bool,
    pub gain_ceiling: GainCeiling,
    pub test_pattern: bool,
}

impl SensorTuning {
    /// Stable exposure over image quality: everything automatic, gain capped
    pub const CONSERVATIVE: Self = Self {
        auto_exposure: true,
        auto_gain: true,
        auto_white_balance: true,
        gain_ceiling: GainCeiling::X2,
        test_pattern: false,
    };
}
